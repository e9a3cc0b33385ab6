//! The trip signup flow. A detail view waits on two independent async
//! inputs, the session lookup and the trip fetch, which may resolve in
//! either order; eligibility is only decided once both have arrived.

use serde::Serialize;

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::trip::Trip,
    services::trips::TripGateway,
};

/// Whether the current viewer may sign up for the loaded trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupEligibility {
    Open,
    SignInRequired,
    AlreadyJoined,
    Full,
}

pub fn eligibility(trip: &Trip, user: Option<&AuthenticatedUser>) -> SignupEligibility {
    let Some(user) = user else {
        return SignupEligibility::SignInRequired;
    };
    if trip.has_participant(&user.uuid) {
        return SignupEligibility::AlreadyJoined;
    }
    if trip.is_full() {
        return SignupEligibility::Full;
    }
    SignupEligibility::Open
}

/// Accumulates the two inputs of the detail view. `view()` stays `None`
/// until both have resolved, whichever lands first.
#[derive(Debug, Default)]
pub struct SignupFlow {
    auth: Option<Option<AuthenticatedUser>>,
    trip: Option<Trip>,
}

#[derive(Debug, Serialize)]
pub struct TripDetailView {
    pub trip: Trip,
    pub signup: SignupEligibility,
    pub can_sign_up: bool,
}

impl SignupFlow {
    pub fn auth_resolved(&mut self, user: Option<AuthenticatedUser>) {
        self.auth = Some(user);
    }

    pub fn trip_resolved(&mut self, trip: Trip) {
        self.trip = Some(trip);
    }

    pub fn view(&self) -> Option<TripDetailView> {
        let auth = self.auth.as_ref()?;
        let trip = self.trip.as_ref()?;
        let signup = eligibility(trip, auth.as_ref());
        Some(TripDetailView {
            trip: trip.clone(),
            signup,
            can_sign_up: signup == SignupEligibility::Open,
        })
    }
}

/// Two-phase signup: persist the append through the store first, then hand
/// back the committed trip for the caller to mirror. On any store error the
/// loaded trip is untouched and the caller keeps its last successful read.
pub async fn join_trip(
    gateway: &dyn TripGateway,
    trip: &Trip,
    user: &AuthenticatedUser,
) -> Result<Trip, AppError> {
    match eligibility(trip, Some(user)) {
        SignupEligibility::Open => {}
        SignupEligibility::SignInRequired => return Err(AppError::Unauthorized),
        SignupEligibility::AlreadyJoined => {
            return Err(AppError::Conflict(
                "you are already signed up for this trip".into(),
            ))
        }
        SignupEligibility::Full => {
            return Err(AppError::Conflict("this trip is already full".into()))
        }
    }

    gateway
        .append_participant_if_absent(&trip.id, user.participant())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::{NewTrip, Participant, PLACEHOLDER_IMAGE_URL};

    fn trip_with_capacity(cap: u32) -> Trip {
        Trip::create(NewTrip {
            title: "Shore Cleanup".into(),
            location: "Pier 7".into(),
            date: "2025-05-01".into(),
            time: None,
            cleanup_goal: "Remove plastic".into(),
            organizer_name: "Alice".into(),
            image_url: PLACEHOLDER_IMAGE_URL.into(),
            max_participants: cap,
        })
    }

    fn user(uuid: &str, name: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            id: 1,
            uuid: uuid.into(),
            name: name.into(),
            email: format!("{uuid}@example.com"),
        }
    }

    #[test]
    fn signed_out_viewer_cannot_join() {
        let trip = trip_with_capacity(5);
        assert_eq!(eligibility(&trip, None), SignupEligibility::SignInRequired);
    }

    #[test]
    fn existing_participant_cannot_join_twice() {
        let mut trip = trip_with_capacity(5);
        trip.participants.push(Participant {
            id: "uid-1".into(),
            name: "Hassan".into(),
        });
        assert_eq!(
            eligibility(&trip, Some(&user("uid-1", "Hassan"))),
            SignupEligibility::AlreadyJoined
        );
    }

    #[test]
    fn zero_capacity_trip_never_opens() {
        let trip = trip_with_capacity(0);
        assert_eq!(
            eligibility(&trip, Some(&user("uid-1", "Hassan"))),
            SignupEligibility::Full
        );
        assert_eq!(eligibility(&trip, None), SignupEligibility::SignInRequired);
    }

    #[test]
    fn flow_waits_for_both_inputs() {
        let mut flow = SignupFlow::default();
        assert!(flow.view().is_none());

        flow.auth_resolved(Some(user("uid-1", "Hassan")));
        assert!(flow.view().is_none());

        flow.trip_resolved(trip_with_capacity(5));
        let view = flow.view().expect("both inputs resolved");
        assert!(view.can_sign_up);
    }

    #[test]
    fn input_order_does_not_change_the_outcome() {
        let trip = trip_with_capacity(5);
        let viewer = user("uid-1", "Hassan");

        let mut auth_first = SignupFlow::default();
        auth_first.auth_resolved(Some(viewer.clone()));
        auth_first.trip_resolved(trip.clone());

        let mut trip_first = SignupFlow::default();
        trip_first.trip_resolved(trip);
        trip_first.auth_resolved(Some(viewer));

        let a = auth_first.view().expect("resolved");
        let b = trip_first.view().expect("resolved");
        assert_eq!(a.signup, b.signup);
        assert_eq!(a.can_sign_up, b.can_sign_up);
    }

    #[test]
    fn fallback_name_is_used_for_blank_profiles() {
        let viewer = user("uid-1", "  ");
        let participant = viewer.participant();
        assert_eq!(participant.name, crate::models::trip::FALLBACK_PARTICIPANT_NAME);
    }
}
