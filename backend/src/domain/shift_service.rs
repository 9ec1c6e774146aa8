use chrono::{NaiveTime, Timelike};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::shifts::ShiftListQuery;
use crate::domain::models::{NewShiftDefinition, ShiftDefinition};
use crate::error::ShiftError;
use crate::storage::ShiftStorage;

const MAX_NAME_LEN: usize = 100;

/// Service for managing shift definitions
#[derive(Clone)]
pub struct ShiftService {
    shift_repository: Arc<dyn ShiftStorage>,
}

impl ShiftService {
    pub fn new(shift_repository: Arc<dyn ShiftStorage>) -> Self {
        Self { shift_repository }
    }

    /// Create a new shift
    pub async fn create_shift(&self, mut shift: NewShiftDefinition) -> Result<ShiftDefinition, ShiftError> {
        info!(
            "Creating shift: name={}, center={}, {}-{}",
            shift.name, shift.center_id, shift.start_time, shift.end_time
        );

        shift.name = shift.name.trim().to_string();
        // Times are stored with minute precision
        shift.start_time = truncate_to_minute(shift.start_time);
        shift.end_time = truncate_to_minute(shift.end_time);
        self.validate_new_shift(&shift)?;

        let stored = self.shift_repository.store_shift(&shift).await?;

        info!("Created shift: {} with ID: {}", stored.name, stored.id);
        Ok(stored)
    }

    /// Get a shift by ID
    pub async fn get_shift(&self, shift_id: i64) -> Result<ShiftDefinition, ShiftError> {
        match self.shift_repository.get_shift(shift_id).await? {
            Some(shift) => Ok(shift),
            None => {
                warn!("Shift not found: {}", shift_id);
                Err(ShiftError::not_found("Shift", shift_id))
            }
        }
    }

    /// List shifts, optionally for a single center
    pub async fn list_shifts(&self, query: ShiftListQuery) -> Result<Vec<ShiftDefinition>, ShiftError> {
        let shifts = self.shift_repository.list_shifts(query.center_id).await?;
        info!("Found {} shifts (center: {:?})", shifts.len(), query.center_id);
        Ok(shifts)
    }

    /// Delete a shift together with its assignments
    pub async fn delete_shift(&self, shift_id: i64) -> Result<(), ShiftError> {
        info!("Deleting shift: {}", shift_id);

        if !self.shift_repository.delete_shift(shift_id).await? {
            warn!("Shift not found for deletion: {}", shift_id);
            return Err(ShiftError::not_found("Shift", shift_id));
        }

        Ok(())
    }

    fn validate_new_shift(&self, shift: &NewShiftDefinition) -> Result<(), ShiftError> {
        if shift.name.is_empty() {
            return Err(ShiftError::validation("Shift name cannot be empty"));
        }

        if shift.name.chars().count() > MAX_NAME_LEN {
            return Err(ShiftError::validation(format!(
                "Shift name cannot exceed {} characters",
                MAX_NAME_LEN
            )));
        }

        // End before start is an overnight shift; equal times describe nothing
        if shift.start_time == shift.end_time {
            return Err(ShiftError::validation("Shift start and end time cannot be equal"));
        }

        if shift.min_staff > shift.max_staff {
            return Err(ShiftError::validation(format!(
                "Minimum staff ({}) cannot exceed maximum staff ({})",
                shift.min_staff, shift.max_staff
            )));
        }

        Ok(())
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}
