//! Travelers, trips and the approval workflow.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::TripError;

pub type TravelerId = u64;
pub type TripId = u64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Traveler {
    pub id: TravelerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

impl Traveler {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Traveler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Input for registering a traveler.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTraveler {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

/// Traveler listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelerSummary {
    pub id: TravelerId,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub trip_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl TripStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Pending => "pending",
            TripStatus::Approved => "approved",
            TripStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow actions on a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Submit,
    Approve,
    Reject,
}

impl Action {
    /// `draft -> pending -> {approved, rejected}`. Everything else is refused.
    pub fn apply(self, from: TripStatus) -> Result<TripStatus, TripError> {
        match (self, from) {
            (Action::Submit, TripStatus::Draft) => Ok(TripStatus::Pending),
            (Action::Approve, TripStatus::Pending) => Ok(TripStatus::Approved),
            (Action::Reject, TripStatus::Pending) => Ok(TripStatus::Rejected),
            (action, from) => Err(TripError::InvalidTransition { from, action }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Submit => write!(f, "submit"),
            Action::Approve => write!(f, "approve"),
            Action::Reject => write!(f, "reject"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub id: TripId,
    pub title: String,
    pub traveler_id: TravelerId,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub estimated_cost: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Only drafts may be edited.
    pub fn is_editable(&self) -> bool {
        self.status == TripStatus::Draft
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.title, self.destination)
    }
}

/// Editable trip fields, used for both create and update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripDraft {
    pub title: String,
    pub traveler_id: TravelerId,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
}

impl TripDraft {
    /// Field checks. `today` is given only for new trips, which may not start in the past.
    pub fn validate(&self, today: Option<NaiveDate>) -> Result<(), TripError> {
        if self.title.trim().is_empty() {
            return Err(TripError::validation("title", "Title is required."));
        }
        if self.destination.trim().is_empty() {
            return Err(TripError::validation("destination", "Destination is required."));
        }
        if self.end_date < self.start_date {
            return Err(TripError::validation(
                "end_date",
                "End date must be after start date.",
            ));
        }
        if let Some(today) = today {
            if self.start_date < today {
                return Err(TripError::validation(
                    "start_date",
                    "Start date cannot be in the past.",
                ));
            }
        }
        if let Some(cost) = self.estimated_cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err(TripError::validation(
                    "estimated_cost",
                    "Estimated cost cannot be negative.",
                ));
            }
        }
        Ok(())
    }
}

/// Lightweight listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub id: TripId,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub traveler_name: String,
}

/// Result of an approve/reject action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub trip_id: TripId,
    pub status: TripStatus,
}
