use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every trip created through the app carries the same hosted image; there
/// is no upload pipeline.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://drive.usercontent.google.com/download?id=1UcB1GAett1uo02U_87-kiG9IuhdgI9Wr&export=view&authuser=0";

/// Shown when an account has no usable profile name.
pub const FALLBACK_PARTICIPANT_NAME: &str = "Volunteer";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organizer {
    pub name: String,
}

/// One signup on a trip. Insertion order is signup order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// A cleanup trip document. `participants` is append-only from the client's
/// perspective; its length staying below `max_participants` is a soft
/// invariant, enforced when signups go through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub title: String,
    pub location: String,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub cleanup_goal: String,
    pub organizer: Organizer,
    pub image_url: String,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<Participant>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn create(draft: NewTrip) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            location: draft.location,
            date: draft.date,
            time: draft.time,
            cleanup_goal: draft.cleanup_goal,
            organizer: Organizer {
                name: draft.organizer_name,
            },
            image_url: draft.image_url,
            max_participants: draft.max_participants,
            participants: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.id == user_id)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() as u32 >= self.max_participants
    }
}

/// Validated creation payload. Built by the creation flow, never directly
/// from user input.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub title: String,
    pub location: String,
    pub date: String,
    pub time: Option<String>,
    pub cleanup_goal: String,
    pub organizer_name: String,
    pub image_url: String,
    pub max_participants: u32,
}
