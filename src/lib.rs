pub mod auth;
pub mod config;
pub mod creation;
pub mod db;
pub mod directory;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod signup;
pub mod state;
pub mod validators;
