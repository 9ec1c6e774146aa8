//! Domain model for a recurring shift.
use chrono::{NaiveTime, Weekday};
use shared::StaffingStatus;

/// Set of weekdays, indexed Monday..Sunday
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet([bool; 7]);

impl WeekdaySet {
    pub fn empty() -> Self {
        Self([false; 7])
    }

    pub fn every_day() -> Self {
        Self([true; 7])
    }

    /// Monday through Friday
    pub fn weekdays() -> Self {
        Self([true, true, true, true, true, false, false])
    }

    pub fn from_flags(flags: [bool; 7]) -> Self {
        Self(flags)
    }

    pub fn flags(&self) -> [bool; 7] {
        self.0
    }

    pub fn with(mut self, day: Weekday) -> Self {
        self.0[day.num_days_from_monday() as usize] = true;
        self
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|d| *d)
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, day| set.with(day))
    }
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShiftDefinition {
    pub id: i64,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub recurrence: WeekdaySet,
    pub min_staff: u32,
    pub max_staff: u32,
    pub center_id: i64,
}

impl ShiftDefinition {
    pub fn recurs_on(&self, day: Weekday) -> bool {
        self.recurrence.contains(day)
    }

    /// Compare a head count against the staffing bounds
    pub fn staffing_status(&self, assigned: usize) -> StaffingStatus {
        if assigned < self.min_staff as usize {
            StaffingStatus::Understaffed
        } else if assigned > self.max_staff as usize {
            StaffingStatus::Overstaffed
        } else {
            StaffingStatus::Staffed
        }
    }
}

/// A shift that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewShiftDefinition {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub recurrence: WeekdaySet,
    pub min_staff: u32,
    pub max_staff: u32,
    pub center_id: i64,
}

impl NewShiftDefinition {
    pub fn with_id(self, id: i64) -> ShiftDefinition {
        ShiftDefinition {
            id,
            name: self.name,
            start_time: self.start_time,
            end_time: self.end_time,
            recurrence: self.recurrence,
            min_staff: self.min_staff,
            max_staff: self.max_staff,
            center_id: self.center_id,
        }
    }
}
