//! In-memory trip service.
//!
//! Owns travelers and trips, enforces validation, the approval workflow and the
//! access policy, and calls the integration clients for lookups. A failed
//! lookup is returned as [`TripError::Integration`] and never changes trip
//! state.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::TripError;
use super::model::{
    Action, Decision, NewTraveler, Traveler, TravelerId, TravelerSummary, Trip, TripDraft, TripId,
    TripStatus, TripSummary,
};
use super::policy::{Actor, ensure_owner, ensure_reviewer};
use crate::provider::{
    CityQuery, CurrentWeather, FlightResults, FlightSearch, HotelResults, HotelSearch,
};
use crate::services::Services;

/// Source of the current time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct TripService {
    services: Arc<Services>,
    clock: Arc<dyn Clock>,
    travelers: BTreeMap<TravelerId, Traveler>,
    trips: BTreeMap<TripId, Trip>,
    next_traveler_id: TravelerId,
    next_trip_id: TripId,
}

impl TripService {
    pub fn new(services: Arc<Services>) -> Self {
        Self::with_clock(services, Arc::new(SystemClock))
    }

    pub fn with_clock(services: Arc<Services>, clock: Arc<dyn Clock>) -> Self {
        Self {
            services,
            clock,
            travelers: BTreeMap::new(),
            trips: BTreeMap::new(),
            next_traveler_id: 1,
            next_trip_id: 1,
        }
    }

    // Travelers

    pub fn create_traveler(&mut self, new: NewTraveler) -> Result<Traveler, TripError> {
        let email = new.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(TripError::validation("email", "Enter a valid email address."));
        }
        if new.first_name.trim().is_empty() {
            return Err(TripError::validation("first_name", "First name is required."));
        }
        if new.last_name.trim().is_empty() {
            return Err(TripError::validation("last_name", "Last name is required."));
        }
        if self.travelers.values().any(|t| t.email == email) {
            return Err(TripError::DuplicateEmail(email));
        }

        let id = self.next_traveler_id;
        self.next_traveler_id += 1;
        let traveler = Traveler {
            id,
            first_name: new.first_name.trim().to_string(),
            last_name: new.last_name.trim().to_string(),
            email,
            department: new.department.trim().to_string(),
            created_at: self.clock.now(),
        };
        info!("Registered traveler {} ({})", traveler.id, traveler.email);
        self.travelers.insert(id, traveler.clone());
        Ok(traveler)
    }

    pub fn traveler(&self, id: TravelerId) -> Result<&Traveler, TripError> {
        self.travelers.get(&id).ok_or(TripError::TravelerNotFound(id))
    }

    /// Travelers ordered by last name, then first name, with their trip counts.
    pub fn list_travelers(&self) -> Vec<TravelerSummary> {
        let mut travelers: Vec<&Traveler> = self.travelers.values().collect();
        travelers.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        travelers
            .into_iter()
            .map(|t| TravelerSummary {
                id: t.id,
                full_name: t.full_name(),
                email: t.email.clone(),
                department: t.department.clone(),
                trip_count: self.trip_count(t.id),
            })
            .collect()
    }

    pub fn trip_count(&self, traveler_id: TravelerId) -> usize {
        self.trips
            .values()
            .filter(|t| t.traveler_id == traveler_id)
            .count()
    }

    // Trips

    pub fn create_trip(&mut self, actor: &Actor, draft: TripDraft) -> Result<Trip, TripError> {
        self.traveler(draft.traveler_id)?;
        let now = self.clock.now();
        draft.validate(Some(now.date_naive()))?;

        let id = self.next_trip_id;
        let trip = Trip {
            id,
            title: draft.title.trim().to_string(),
            traveler_id: draft.traveler_id,
            destination: draft.destination.trim().to_string(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: TripStatus::Draft,
            estimated_cost: draft.estimated_cost,
            created_at: now,
            updated_at: now,
        };
        ensure_owner(actor, &trip)?;

        self.next_trip_id += 1;
        info!("Created trip {} for traveler {}", id, trip.traveler_id);
        self.trips.insert(id, trip.clone());
        Ok(trip)
    }

    pub fn trip(&self, id: TripId) -> Result<&Trip, TripError> {
        self.trips.get(&id).ok_or(TripError::TripNotFound(id))
    }

    /// Replaces the editable fields of a draft trip.
    pub fn update_trip(
        &mut self,
        actor: &Actor,
        id: TripId,
        draft: TripDraft,
    ) -> Result<Trip, TripError> {
        let trip = self.trip(id)?;
        ensure_owner(actor, trip)?;
        if !trip.is_editable() {
            return Err(TripError::validation(
                "status",
                format!("Trip {} is {} and can no longer be edited.", id, trip.status),
            ));
        }
        if draft.traveler_id != trip.traveler_id {
            return Err(TripError::validation(
                "traveler",
                "A trip cannot be moved to another traveler.",
            ));
        }
        draft.validate(None)?;

        let now = self.clock.now();
        let trip = self.trip_mut(id)?;
        trip.title = draft.title.trim().to_string();
        trip.destination = draft.destination.trim().to_string();
        trip.start_date = draft.start_date;
        trip.end_date = draft.end_date;
        trip.estimated_cost = draft.estimated_cost;
        trip.updated_at = now;
        debug!("Updated trip {}", id);
        Ok(trip.clone())
    }

    pub fn delete_trip(&mut self, actor: &Actor, id: TripId) -> Result<Trip, TripError> {
        ensure_owner(actor, self.trip(id)?)?;
        info!("Deleted trip {}", id);
        self.trips.remove(&id).ok_or(TripError::TripNotFound(id))
    }

    /// Summaries, newest first, optionally filtered by status.
    pub fn list_trips(&self, status: Option<TripStatus>) -> Vec<TripSummary> {
        self.trips
            .values()
            .rev()
            .filter(|t| status.is_none_or(|s| t.status == s))
            .map(|t| TripSummary {
                id: t.id,
                title: t.title.clone(),
                destination: t.destination.clone(),
                start_date: t.start_date,
                end_date: t.end_date,
                status: t.status,
                traveler_name: self
                    .travelers
                    .get(&t.traveler_id)
                    .map(Traveler::full_name)
                    .unwrap_or_default(),
            })
            .collect()
    }

    // Workflow

    pub fn submit(&mut self, actor: &Actor, id: TripId) -> Result<Decision, TripError> {
        ensure_owner(actor, self.trip(id)?)?;
        self.transition(id, Action::Submit)
    }

    pub fn approve(&mut self, actor: &Actor, id: TripId) -> Result<Decision, TripError> {
        ensure_reviewer(actor)?;
        self.transition(id, Action::Approve)
    }

    pub fn reject(&mut self, actor: &Actor, id: TripId) -> Result<Decision, TripError> {
        ensure_reviewer(actor)?;
        self.transition(id, Action::Reject)
    }

    /// Approves every pending trip among `ids`; returns how many changed.
    pub fn approve_many(&mut self, actor: &Actor, ids: &[TripId]) -> Result<usize, TripError> {
        ensure_reviewer(actor)?;
        Ok(self.transition_pending(ids, Action::Approve))
    }

    /// Rejects every pending trip among `ids`; returns how many changed.
    pub fn reject_many(&mut self, actor: &Actor, ids: &[TripId]) -> Result<usize, TripError> {
        ensure_reviewer(actor)?;
        Ok(self.transition_pending(ids, Action::Reject))
    }

    fn transition(&mut self, id: TripId, action: Action) -> Result<Decision, TripError> {
        let now = self.clock.now();
        let trip = self.trip_mut(id)?;
        let status = action.apply(trip.status)?;
        info!("Trip {}: {} -> {} ({})", id, trip.status, status, action);
        trip.status = status;
        trip.updated_at = now;
        Ok(Decision {
            trip_id: id,
            status,
        })
    }

    fn transition_pending(&mut self, ids: &[TripId], action: Action) -> usize {
        let pending: Vec<TripId> = ids
            .iter()
            .copied()
            .filter(|id| {
                self.trips
                    .get(id)
                    .is_some_and(|t| t.status == TripStatus::Pending)
            })
            .collect();
        pending
            .into_iter()
            .filter(|&id| self.transition(id, action).is_ok())
            .count()
    }

    fn trip_mut(&mut self, id: TripId) -> Result<&mut Trip, TripError> {
        self.trips.get_mut(&id).ok_or(TripError::TripNotFound(id))
    }

    // Lookups

    pub async fn search_flights(&self, search: &FlightSearch) -> Result<FlightResults, TripError> {
        Ok(self.services.flights.fetch_with_retry(search).await?)
    }

    pub async fn search_hotels(&self, search: &HotelSearch) -> Result<HotelResults, TripError> {
        Ok(self.services.hotels.fetch_with_retry(search).await?)
    }

    /// Current weather at a trip's destination.
    pub async fn destination_weather(&self, id: TripId) -> Result<CurrentWeather, TripError> {
        let city = CityQuery::new(self.trip(id)?.destination.clone());
        Ok(self.services.weather.fetch(&city).await?)
    }
}
