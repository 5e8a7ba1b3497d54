//! # Weight History
//!
//! A pet's weight history is an ordered list of `{date, weight}` samples kept
//! in insertion order and keyed by calendar day. Three operations mutate it,
//! each with its own merge policy:
//!
//! - [`WeightHistory::record_observation`] scans the whole history and
//!   overwrites the sample for the observed day, or appends one.
//! - [`WeightHistory::merge_on_profile_edit`] only looks at the **last**
//!   sample and appends whenever the day or the weight differs from it. This
//!   can leave two samples on the same day.
//! - [`WeightHistory::remove_observation`] removes one exact `(day, weight)`
//!   match.
//!
//! Samples are never re-sorted: appending a back-dated observation puts it at
//! the end of the list.
//!
//! Persistence is left to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::dates;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightLogError {
    #[error("Weight must be a valid number greater than zero")]
    InvalidWeight,
    #[error("Date is required")]
    MissingDate,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("No weight entry of {weight} on {day}")]
    SampleNotFound { day: NaiveDate, weight: f64 },
}

/// One observation. `date` is already a calendar-day key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    pub date: NaiveDate,
    pub weight: f64,
}

/// What `record_observation` did to the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// An existing sample for that day had its weight replaced
    Overwritten { index: usize },
    Appended,
}

/// Validate a weight: finite and strictly positive.
pub fn validate_weight(weight: f64) -> Result<f64, WeightLogError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(WeightLogError::InvalidWeight)
    }
}

/// Validate an optional parsed weight, where `None` means "sent but not a number".
pub fn require_weight(weight: Option<f64>) -> Result<f64, WeightLogError> {
    weight.map_or(Err(WeightLogError::InvalidWeight), validate_weight)
}

/// Normalize a client supplied date or timestamp to its calendar-day key.
pub fn parse_observed_day(input: Option<&str>) -> Result<NaiveDate, WeightLogError> {
    let raw = input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(WeightLogError::MissingDate)?;
    dates::parse_day(raw).ok_or_else(|| WeightLogError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightHistory(Vec<WeightSample>);

impl WeightHistory {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// History with a single validated starting sample
    pub fn starting_with(day: NaiveDate, weight: f64) -> Result<Self, WeightLogError> {
        let weight = validate_weight(weight)?;
        Ok(Self(vec![WeightSample { date: day, weight }]))
    }

    pub fn samples(&self) -> &[WeightSample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&WeightSample> {
        self.0.last()
    }

    pub fn into_samples(self) -> Vec<WeightSample> {
        self.0
    }

    /// Record a dated observation, keeping at most one sample for that day.
    ///
    /// The first sample whose day equals `day` gets its weight replaced;
    /// otherwise a new sample is appended. An invalid weight leaves the
    /// history untouched.
    pub fn record_observation(
        &mut self,
        day: NaiveDate,
        weight: f64,
    ) -> Result<RecordOutcome, WeightLogError> {
        let weight = validate_weight(weight)?;

        match self.0.iter().position(|sample| sample.date == day) {
            Some(index) => {
                self.0[index].weight = weight;
                Ok(RecordOutcome::Overwritten { index })
            }
            None => {
                self.0.push(WeightSample { date: day, weight });
                Ok(RecordOutcome::Appended)
            }
        }
    }

    /// Merge the weight sent along with a profile edit.
    ///
    /// Only the last sample is compared. A new `{today, weight}` sample is
    /// appended when its day is not `today` or its weight differs, even if an
    /// earlier sample already covers `today`. With no weight sent, or with no
    /// sample to compare against, nothing is appended.
    ///
    /// Returns whether a sample was appended.
    pub fn merge_on_profile_edit(
        &mut self,
        today: NaiveDate,
        new_weight: Option<f64>,
    ) -> Result<bool, WeightLogError> {
        let Some(weight) = new_weight else {
            return Ok(false);
        };
        let weight = validate_weight(weight)?;

        let should_append = match self.0.last() {
            Some(last) => {
                let date_changed = last.date != today;
                let weight_changed = last.weight != weight;
                date_changed || weight_changed
            }
            None => false,
        };

        if should_append {
            self.0.push(WeightSample { date: today, weight });
        }
        Ok(should_append)
    }

    /// Remove the sample matching `day` and exactly `weight`.
    pub fn remove_observation(
        &mut self,
        day: NaiveDate,
        weight: f64,
    ) -> Result<WeightSample, WeightLogError> {
        let index = self
            .0
            .iter()
            .position(|sample| sample.date == day && sample.weight == weight)
            .ok_or(WeightLogError::SampleNotFound { day, weight })?;
        Ok(self.0.remove(index))
    }
}

impl From<Vec<WeightSample>> for WeightHistory {
    fn from(samples: Vec<WeightSample>) -> Self {
        Self(samples)
    }
}
