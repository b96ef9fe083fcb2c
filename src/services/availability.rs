//! Availability calculation and working-hours management

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{
        availability::{parse_time_range, BulkSetAvailability, SetAvailability, UpdateAvailability},
        BookingEvent, WorkingHoursWindow,
    },
    repository::{availability::AvailabilityRepository, events::EventsRepository},
};

/// Start times of every free slot of `duration_minutes` on `date`.
///
/// Windows are anchored on `date` in UTC and walked in start order, stepping by
/// `granularity_minutes`. A candidate `[t, t + duration)` must fit inside its
/// window and must not intersect any booking. A duration too large to
/// represent yields no slots.
pub fn compute_available_slots(
    date: NaiveDate,
    windows: &[WorkingHoursWindow],
    bookings: &[BookingEvent],
    duration_minutes: i64,
    granularity_minutes: i64,
) -> Vec<NaiveTime> {
    if duration_minutes <= 0 || granularity_minutes <= 0 {
        return Vec::new();
    }
    let (Some(duration), Some(step)) = (
        Duration::try_minutes(duration_minutes),
        Duration::try_minutes(granularity_minutes),
    ) else {
        return Vec::new();
    };

    let mut ordered: Vec<&WorkingHoursWindow> = windows.iter().collect();
    ordered.sort_by_key(|w| w.start_time);

    let mut slots = Vec::new();
    for window in ordered {
        let window_end = date.and_time(window.end_time).and_utc();
        let mut start = date.and_time(window.start_time).and_utc();

        while let Some(end) = start.checked_add_signed(duration) {
            if end > window_end {
                break;
            }
            if !bookings.iter().any(|b| b.overlaps(start, end)) {
                slots.push(start.time());
            }
            match start.checked_add_signed(step) {
                Some(next) => start = next,
                None => break,
            }
        }
    }
    slots
}

/// Day of week as stored in `barber_availability` (0=Sunday)
pub fn day_of_week(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

#[derive(Clone)]
pub struct AvailabilityService {
    availability: Arc<dyn AvailabilityRepository>,
    events: Arc<dyn EventsRepository>,
    booking: BookingConfig,
}

impl AvailabilityService {
    pub fn new(
        availability: Arc<dyn AvailabilityRepository>,
        events: Arc<dyn EventsRepository>,
        booking: BookingConfig,
    ) -> Self {
        Self { availability, events, booking }
    }

    /// Default service duration used when the caller gives none
    pub fn default_duration(&self) -> i64 {
        self.booking.default_service_duration_minutes
    }

    pub async fn get_available_slots(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        service_duration: Option<i64>,
    ) -> AppResult<Vec<NaiveTime>> {
        let duration = service_duration.unwrap_or(self.booking.default_service_duration_minutes);
        if duration <= 0 {
            return Err(AppError::BadRequest(
                "service_duration must be a positive number of minutes".to_string(),
            ));
        }

        let windows = self
            .availability
            .list_active_for_day(barber_id, day_of_week(date))
            .await?;
        if windows.is_empty() {
            return Ok(Vec::new());
        }

        let day_start: DateTime<Utc> = date.and_time(NaiveTime::default()).and_utc();
        let day_end = day_start + Duration::days(1);
        let bookings = self
            .events
            .list_for_barber_between(barber_id, day_start, day_end)
            .await?;

        tracing::debug!(
            %barber_id,
            %date,
            windows = windows.len(),
            bookings = bookings.len(),
            "Computing available slots"
        );

        Ok(compute_available_slots(
            date,
            &windows,
            &bookings,
            duration,
            self.booking.slot_granularity_minutes,
        ))
    }

    pub async fn list_windows(&self, barber_id: Uuid) -> AppResult<Vec<WorkingHoursWindow>> {
        self.availability.list_for_barber(barber_id).await
    }

    pub async fn create_window(
        &self,
        barber_id: Uuid,
        data: &SetAvailability,
    ) -> AppResult<WorkingHoursWindow> {
        let window = data.to_new_window()?;
        self.availability.create(barber_id, &window).await
    }

    pub async fn set_windows(
        &self,
        barber_id: Uuid,
        data: &BulkSetAvailability,
    ) -> AppResult<Vec<WorkingHoursWindow>> {
        let windows = data.to_new_windows()?;
        self.availability.upsert_many(barber_id, &windows).await
    }

    pub async fn update_window(
        &self,
        barber_id: Uuid,
        id: Uuid,
        data: &UpdateAvailability,
    ) -> AppResult<WorkingHoursWindow> {
        let existing = self.owned_window(barber_id, id, "update").await?;
        let (start_time, end_time) = parse_time_range(&data.start_time, &data.end_time)?;
        let is_active = data.is_active.unwrap_or(existing.is_active);
        self.availability.update(id, start_time, end_time, is_active).await
    }

    pub async fn delete_window(&self, barber_id: Uuid, id: Uuid) -> AppResult<()> {
        self.owned_window(barber_id, id, "delete").await?;
        self.availability.delete(id).await
    }

    async fn owned_window(&self, barber_id: Uuid, id: Uuid, action: &str) -> AppResult<WorkingHoursWindow> {
        let window = self.availability.get_by_id(id).await?;
        if window.barber_id != barber_id {
            return Err(AppError::Authorization(format!(
                "You can only {} your own availability",
                action
            )));
        }
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{availability::MockAvailabilityRepository, events::MockEventsRepository};
    use tokio_test::{assert_err, assert_ok};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2025-09-22 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 22).unwrap()
    }

    fn window(barber_id: Uuid, start: NaiveTime, end: NaiveTime) -> WorkingHoursWindow {
        WorkingHoursWindow {
            id: Uuid::new_v4(),
            barber_id,
            day_of_week: 1,
            start_time: start,
            end_time: end,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn booking(barber_id: Uuid, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> BookingEvent {
        BookingEvent {
            id: Uuid::new_v4(),
            barber_id,
            customer_id: Uuid::new_v4(),
            service_type_id: Uuid::new_v4(),
            begin_date_time: date.and_time(start).and_utc(),
            end_date_time: date.and_time(end).and_utc(),
            barber_name: "Sam Barber".to_string(),
            customer_name: "Chris Client".to_string(),
            service_name: "Fade".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(availability: MockAvailabilityRepository, events: MockEventsRepository) -> AvailabilityService {
        AvailabilityService::new(Arc::new(availability), Arc::new(events), BookingConfig::default())
    }

    #[test]
    fn test_day_of_week_starts_on_sunday() {
        assert_eq!(day_of_week(monday()), 1);
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 9, 21).unwrap()), 0);
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 9, 27).unwrap()), 6);
    }

    #[test]
    fn test_booking_blocks_overlapping_candidates() {
        let barber = Uuid::new_v4();
        let windows = vec![window(barber, t(9, 0), t(17, 0))];
        let bookings = vec![booking(barber, monday(), t(10, 0), t(10, 30))];

        let slots = compute_available_slots(monday(), &windows, &bookings, 30, 15);

        assert_eq!(&slots[..5], &[t(9, 0), t(9, 15), t(9, 30), t(10, 30), t(10, 45)]);
        for excluded in [t(9, 45), t(10, 0), t(10, 15)] {
            assert!(!slots.contains(&excluded));
        }
        assert_eq!(slots.last(), Some(&t(16, 30)));
    }

    #[test]
    fn test_slots_fit_windows_and_avoid_bookings() {
        let barber = Uuid::new_v4();
        let date = monday();
        let windows = vec![
            window(barber, t(13, 0), t(17, 30)),
            window(barber, t(8, 0), t(12, 0)),
        ];
        let bookings = vec![
            booking(barber, date, t(8, 40), t(9, 10)),
            booking(barber, date, t(14, 0), t(15, 0)),
        ];
        let duration = Duration::minutes(45);

        let slots = compute_available_slots(date, &windows, &bookings, 45, 15);
        assert!(!slots.is_empty());

        for slot in &slots {
            let start = date.and_time(*slot).and_utc();
            let end = start + duration;
            assert_eq!(end - start, duration);
            assert!(windows.iter().any(|w| {
                start >= date.and_time(w.start_time).and_utc()
                    && end <= date.and_time(w.end_time).and_utc()
            }));
            assert!(bookings.iter().all(|b| !b.overlaps(start, end)));
        }

        // Window order is preserved even when given out of order
        assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(slots.first(), Some(&t(9, 15)));
    }

    #[test]
    fn test_short_window_yields_nothing() {
        let barber = Uuid::new_v4();
        let windows = vec![window(barber, t(9, 0), t(9, 20))];
        assert!(compute_available_slots(monday(), &windows, &[], 30, 15).is_empty());
    }

    #[test]
    fn test_back_to_back_booking_is_free() {
        let barber = Uuid::new_v4();
        let windows = vec![window(barber, t(9, 0), t(10, 0))];
        let bookings = vec![booking(barber, monday(), t(9, 0), t(9, 30))];

        let slots = compute_available_slots(monday(), &windows, &bookings, 30, 15);
        assert_eq!(slots, vec![t(9, 30)]);
    }

    #[test]
    fn test_oversized_duration_yields_nothing() {
        let barber = Uuid::new_v4();
        let windows = vec![window(barber, t(9, 0), t(17, 0))];
        assert!(compute_available_slots(monday(), &windows, &[], i64::MAX, 15).is_empty());
        assert!(compute_available_slots(monday(), &windows, &[], 10_000_000_000_000, 15).is_empty());
    }

    #[test]
    fn test_computation_is_idempotent() {
        let barber = Uuid::new_v4();
        let windows = vec![window(barber, t(9, 0), t(12, 0))];
        let bookings = vec![booking(barber, monday(), t(10, 0), t(10, 45))];

        let first = compute_available_slots(monday(), &windows, &bookings, 30, 15);
        let second = compute_available_slots(monday(), &windows, &bookings, 30, 15);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_windows_returns_empty_without_loading_bookings() {
        let barber = Uuid::new_v4();
        let mut availability = MockAvailabilityRepository::new();
        availability
            .expect_list_active_for_day()
            .withf(move |id, day| *id == barber && *day == 1)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let events = MockEventsRepository::new();

        let slots = assert_ok!(service(availability, events).get_available_slots(barber, monday(), None).await);
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_error() {
        let barber = Uuid::new_v4();
        let mut availability = MockAvailabilityRepository::new();
        availability
            .expect_list_active_for_day()
            .returning(move |_, _| Ok(vec![window(barber, t(9, 0), t(17, 0))]));
        let mut events = MockEventsRepository::new();
        events
            .expect_list_for_barber_between()
            .returning(|_, _, _| Err(AppError::Internal("connection reset".to_string())));

        let result = service(availability, events).get_available_slots(barber, monday(), None).await;
        assert!(matches!(assert_err!(result), AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_bookings_are_loaded_for_the_whole_day() {
        let barber = Uuid::new_v4();
        let date = monday();
        let mut availability = MockAvailabilityRepository::new();
        availability
            .expect_list_active_for_day()
            .returning(move |_, _| Ok(vec![window(barber, t(9, 0), t(17, 0))]));
        let mut events = MockEventsRepository::new();
        events
            .expect_list_for_barber_between()
            .withf(move |id, start, end| {
                *id == barber
                    && *start == date.and_time(NaiveTime::default()).and_utc()
                    && *end - *start == Duration::days(1)
            })
            .returning(move |_, _, _| Ok(vec![booking(barber, date, t(10, 0), t(10, 30))]));

        let slots = assert_ok!(service(availability, events).get_available_slots(barber, date, Some(30)).await);
        assert_eq!(&slots[..4], &[t(9, 0), t(9, 15), t(9, 30), t(10, 30)]);
    }

    #[tokio::test]
    async fn test_non_positive_duration_is_rejected() {
        let svc = service(MockAvailabilityRepository::new(), MockEventsRepository::new());
        let result = svc.get_available_slots(Uuid::new_v4(), monday(), Some(0)).await;
        assert!(matches!(assert_err!(result), AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_huge_duration_returns_no_slots() {
        let barber = Uuid::new_v4();
        let mut availability = MockAvailabilityRepository::new();
        availability
            .expect_list_active_for_day()
            .returning(move |_, _| Ok(vec![window(barber, t(9, 0), t(17, 0))]));
        let mut events = MockEventsRepository::new();
        events
            .expect_list_for_barber_between()
            .returning(|_, _, _| Ok(Vec::new()));

        let slots = assert_ok!(
            service(availability, events)
                .get_available_slots(barber, monday(), Some(10_000_000_000_000))
                .await
        );
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_update_checks_ownership_before_parsing_times() {
        let owner = Uuid::new_v4();
        let existing = window(owner, t(9, 0), t(12, 0));
        let id = existing.id;
        let mut availability = MockAvailabilityRepository::new();
        availability
            .expect_get_by_id()
            .times(1)
            .returning(move |_| Ok(existing.clone()));
        availability.expect_update().never();

        let svc = service(availability, MockEventsRepository::new());
        let data = UpdateAvailability {
            start_time: "late".to_string(),
            end_time: "25:99".to_string(),
            is_active: None,
        };
        let result = svc.update_window(Uuid::new_v4(), id, &data).await;
        assert!(matches!(assert_err!(result), AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_update_requires_ownership() {
        let owner = Uuid::new_v4();
        let existing = window(owner, t(9, 0), t(12, 0));
        let id = existing.id;
        let mut availability = MockAvailabilityRepository::new();
        availability
            .expect_get_by_id()
            .returning(move |_| Ok(existing.clone()));
        availability.expect_update().never();

        let svc = service(availability, MockEventsRepository::new());
        let data = UpdateAvailability {
            start_time: "10:00".to_string(),
            end_time: "13:00".to_string(),
            is_active: None,
        };
        let result = svc.update_window(Uuid::new_v4(), id, &data).await;
        match assert_err!(result) {
            AppError::Authorization(msg) => assert_eq!(msg, "You can only update your own availability"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_keeps_active_flag_when_omitted() {
        let owner = Uuid::new_v4();
        let mut existing = window(owner, t(9, 0), t(12, 0));
        existing.is_active = false;
        let id = existing.id;
        let current = existing.clone();
        let mut availability = MockAvailabilityRepository::new();
        availability
            .expect_get_by_id()
            .returning(move |_| Ok(current.clone()));
        availability
            .expect_update()
            .withf(move |_, start, end, active| *start == t(10, 0) && *end == t(13, 0) && !*active)
            .times(1)
            .returning(move |_, start, end, active| {
                let mut updated = existing.clone();
                updated.start_time = start;
                updated.end_time = end;
                updated.is_active = active;
                Ok(updated)
            });

        let svc = service(availability, MockEventsRepository::new());
        let data = UpdateAvailability {
            start_time: "10:00".to_string(),
            end_time: "13:00".to_string(),
            is_active: None,
        };
        let updated = assert_ok!(svc.update_window(owner, id, &data).await);
        assert_eq!(updated.start_time, t(10, 0));
        assert!(!updated.is_active);
    }
}
