//! The trip creation flow: turn the form exactly as typed into a validated
//! `NewTrip`, or hand the typed values back untouched with field errors.

use serde::{Deserialize, Serialize};

use crate::{
    error::FieldError,
    models::trip::{NewTrip, PLACEHOLDER_IMAGE_URL},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub max_participants: String,
    #[serde(default)]
    pub cleanup_goal: String,
    #[serde(default)]
    pub organizer: String,
}

impl TripForm {
    /// Every field except `time` must be non-empty and `max_participants`
    /// must parse as a non-negative integer. The form itself is left intact
    /// so a failed submission can be re-entered without data loss.
    pub fn validate(&self) -> Result<NewTrip, Vec<FieldError>> {
        let mut errors = Vec::new();

        let required = [
            ("title", &self.title),
            ("date", &self.date),
            ("location", &self.location),
            ("max_participants", &self.max_participants),
            ("cleanup_goal", &self.cleanup_goal),
            ("organizer", &self.organizer),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, "Please fill in all fields."));
            }
        }

        let max_participants = match self.max_participants.trim().parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => {
                if !self.max_participants.trim().is_empty() {
                    errors.push(FieldError::new(
                        "max_participants",
                        "Max participants must be a non-negative number.",
                    ));
                }
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let time = self.time.trim();
        Ok(NewTrip {
            title: self.title.trim().to_string(),
            location: self.location.trim().to_string(),
            date: self.date.trim().to_string(),
            time: (!time.is_empty()).then(|| time.to_string()),
            cleanup_goal: self.cleanup_goal.trim().to_string(),
            organizer_name: self.organizer.trim().to_string(),
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            max_participants: max_participants.unwrap_or_default(),
        })
    }
}
