//! Client-side filtering for the trip directory. The filter state lives only
//! for one request; every listing re-fetches the full snapshot from the
//! store and projects it through the filter.

use serde::Deserialize;

use crate::models::trip::Trip;

/// The four directory controls, exactly as typed. Empty means "not set".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripFilter {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub max_participants: String,
}

impl TripFilter {
    /// All clauses must hold. The search query is a case-insensitive
    /// substring over title, location and organizer name; location and date
    /// are exact matches; the capacity bound only applies when the typed
    /// value parses as an integer.
    pub fn matches(&self, trip: &Trip) -> bool {
        if !self.query.is_empty() {
            let needle = self.query.to_lowercase();
            let hit = trip.title.to_lowercase().contains(&needle)
                || trip.location.to_lowercase().contains(&needle)
                || trip.organizer.name.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if !self.location.is_empty() && trip.location != self.location {
            return false;
        }

        if !self.date.is_empty() && trip.date != self.date {
            return false;
        }

        if let Ok(bound) = self.max_participants.trim().parse::<u32>() {
            if trip.max_participants > bound {
                return false;
            }
        }

        true
    }

    /// Deterministic projection of a snapshot: a subset of `trips` in the
    /// same relative order.
    pub fn apply(&self, trips: &[Trip]) -> Vec<Trip> {
        trips
            .iter()
            .filter(|trip| self.matches(trip))
            .cloned()
            .collect()
    }
}
