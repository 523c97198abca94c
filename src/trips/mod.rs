//! Trip domain: travelers, trips, approval workflow.
//!
//! This is the caller of the integration layer. It keeps state in memory and
//! turns client failures into structured error payloads.

mod error;
mod model;
mod policy;
mod service;

pub use error::TripError;
pub use model::{
    Action, Decision, NewTraveler, Traveler, TravelerId, TravelerSummary, Trip, TripDraft, TripId,
    TripStatus, TripSummary,
};
pub use policy::{Actor, can_modify, can_review};
pub use service::{Clock, SystemClock, TripService};
