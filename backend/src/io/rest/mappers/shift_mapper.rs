use chrono::NaiveTime;
use shared::{
    CreateShiftRequest, ShiftDefinition as SharedShift, ShiftListResponse, ShiftResponse,
    WeekdayFlags,
};

use crate::domain::models::{NewShiftDefinition, ShiftDefinition as DomainShift, WeekdaySet};
use crate::error::ShiftError;
use crate::storage::repositories::shift_repository::TIME_FORMAT;

/// Mapper to convert between shared shift DTOs and domain shift models.
pub struct ShiftMapper;

impl ShiftMapper {
    /// Converts a create request into a domain shift, parsing its times.
    pub fn to_new_domain(request: CreateShiftRequest) -> Result<NewShiftDefinition, ShiftError> {
        Ok(NewShiftDefinition {
            start_time: Self::parse_time("start_time", &request.start_time)?,
            end_time: Self::parse_time("end_time", &request.end_time)?,
            name: request.name,
            recurrence: WeekdaySet::from_flags(request.days.as_array()),
            min_staff: request.min_staff,
            max_staff: request.max_staff,
            center_id: request.center_id,
        })
    }

    pub fn to_dto(domain: DomainShift) -> SharedShift {
        SharedShift {
            id: domain.id,
            name: domain.name,
            start_time: domain.start_time.format(TIME_FORMAT).to_string(),
            end_time: domain.end_time.format(TIME_FORMAT).to_string(),
            days: WeekdayFlags::from_array(domain.recurrence.flags()),
            min_staff: domain.min_staff,
            max_staff: domain.max_staff,
            center_id: domain.center_id,
        }
    }

    pub fn to_shift_response_dto(domain: DomainShift, message: &str) -> ShiftResponse {
        ShiftResponse {
            shift: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_shift_list_dto(shifts: Vec<DomainShift>) -> ShiftListResponse {
        ShiftListResponse {
            shifts: shifts.into_iter().map(Self::to_dto).collect(),
        }
    }

    /// Accepts `HH:MM`, and `HH:MM:SS` as some clients send seconds; the
    /// service drops the seconds before storing
    fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ShiftError> {
        let value = value.trim();
        NaiveTime::parse_from_str(value, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .map_err(|_| {
                ShiftError::validation(format!("Invalid {} '{}', expected HH:MM", field, value))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn request(start: &str, end: &str) -> CreateShiftRequest {
        CreateShiftRequest {
            name: "Morning".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            days: WeekdayFlags {
                monday: true,
                friday: true,
                ..Default::default()
            },
            min_staff: 2,
            max_staff: 4,
            center_id: 1,
        }
    }

    #[test]
    fn test_request_to_domain() {
        let shift = ShiftMapper::to_new_domain(request("08:00", "14:00:00")).unwrap();

        assert_eq!(shift.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(shift.end_time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert!(shift.recurrence.contains(Weekday::Mon));
        assert!(shift.recurrence.contains(Weekday::Fri));
        assert!(!shift.recurrence.contains(Weekday::Sat));
    }

    #[test]
    fn test_bad_time_is_a_validation_error() {
        let result = ShiftMapper::to_new_domain(request("8am", "14:00"));
        assert!(matches!(result, Err(ShiftError::Validation(msg)) if msg.contains("start_time")));
    }

    #[test]
    fn test_domain_to_dto_formats_times() {
        let domain = ShiftMapper::to_new_domain(request("08:05", "14:00")).unwrap().with_id(3);
        let dto = ShiftMapper::to_dto(domain);

        assert_eq!(dto.start_time, "08:05");
        assert_eq!(dto.end_time, "14:00");
        assert!(dto.days.monday && dto.days.friday && !dto.days.sunday);
    }
}
