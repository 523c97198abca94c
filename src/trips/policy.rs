//! Access policy for trip operations.
//!
//! Reads are open to any authenticated actor. Changing a trip is limited to
//! its traveler (owner-or-read-only); approving and rejecting is limited to
//! managers (manager-or-read-only).

use super::error::TripError;
use super::model::{TravelerId, Trip};

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub traveler_id: Option<TravelerId>,
    pub is_manager: bool,
}

impl Actor {
    pub fn traveler(id: TravelerId) -> Self {
        Self {
            traveler_id: Some(id),
            is_manager: false,
        }
    }

    pub fn manager() -> Self {
        Self {
            traveler_id: None,
            is_manager: true,
        }
    }
}

pub fn can_modify(actor: &Actor, trip: &Trip) -> bool {
    actor.traveler_id == Some(trip.traveler_id)
}

pub fn can_review(actor: &Actor) -> bool {
    actor.is_manager
}

pub(crate) fn ensure_owner(actor: &Actor, trip: &Trip) -> Result<(), TripError> {
    if can_modify(actor, trip) {
        Ok(())
    } else {
        Err(TripError::Forbidden(format!(
            "only the traveler may change trip {}",
            trip.id
        )))
    }
}

pub(crate) fn ensure_reviewer(actor: &Actor) -> Result<(), TripError> {
    if can_review(actor) {
        Ok(())
    } else {
        Err(TripError::Forbidden(
            "only managers may approve or reject trips".to_string(),
        ))
    }
}
