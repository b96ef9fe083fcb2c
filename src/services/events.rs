//! Booking events service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::event::{BookingEvent, EventFilter, NewBookingEvent},
    repository::{barber_services::BarberServicesRepository, events::EventsRepository},
};

#[derive(Clone)]
pub struct EventsService {
    events: Arc<dyn EventsRepository>,
    barber_services: Arc<dyn BarberServicesRepository>,
}

impl EventsService {
    pub fn new(
        events: Arc<dyn EventsRepository>,
        barber_services: Arc<dyn BarberServicesRepository>,
    ) -> Self {
        Self { events, barber_services }
    }

    /// Book `service_name` with a barber for the given interval.
    ///
    /// Overlap with an existing booking is rejected by the database and comes
    /// back as `AppError::Conflict`.
    pub async fn create_event(
        &self,
        barber_id: Uuid,
        customer_id: Uuid,
        service_name: &str,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<BookingEvent> {
        if begin >= end {
            return Err(AppError::BadRequest("end time must be after start time".to_string()));
        }

        let service_type_id = self.resolve_service(barber_id, service_name).await?;

        let event = self
            .events
            .create(&NewBookingEvent {
                begin_date_time: begin,
                end_date_time: end,
                barber_id,
                customer_id,
                service_type_id,
            })
            .await?;

        tracing::info!(
            event_id = %event.id,
            %barber_id,
            %customer_id,
            begin = %event.begin_date_time,
            "Haircut event created"
        );
        Ok(event)
    }

    /// Id of the barber's service called `service_name`
    async fn resolve_service(&self, barber_id: Uuid, service_name: &str) -> AppResult<Uuid> {
        let offered = self.barber_services.list_for_barber(barber_id).await?;
        if let Some(service) = offered.iter().find(|s| s.haircut_name == service_name) {
            return Ok(service.service_type_id);
        }

        let available: Vec<&str> = offered.iter().map(|s| s.haircut_name.as_str()).collect();
        Err(AppError::BadRequest(format!(
            "Service '{}' not found. Available services: {}",
            service_name,
            available.join(", ")
        )))
    }

    pub async fn list(&self, filter: &EventFilter) -> AppResult<Vec<BookingEvent>> {
        self.events.list(filter).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookingEvent> {
        self.events.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.events.delete(id).await?;
        tracing::info!(event_id = %id, "Haircut event deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::BarberService,
        repository::{barber_services::MockBarberServicesRepository, events::MockEventsRepository},
    };
    use chrono::TimeZone;
    use tokio_test::{assert_err, assert_ok};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 22, h, m, 0).unwrap()
    }

    fn offering(barber_id: Uuid, name: &str) -> BarberService {
        BarberService {
            id: Uuid::new_v4(),
            barber_id,
            service_type_id: Uuid::new_v4(),
            haircut_name: name.to_string(),
            barber_name: "Sam Barber".to_string(),
            duration_minutes: 30,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stored(event: &NewBookingEvent) -> BookingEvent {
        BookingEvent {
            id: Uuid::new_v4(),
            barber_id: event.barber_id,
            customer_id: event.customer_id,
            service_type_id: event.service_type_id,
            begin_date_time: event.begin_date_time,
            end_date_time: event.end_date_time,
            barber_name: "Sam Barber".to_string(),
            customer_name: "Chris Client".to_string(),
            service_name: "Fade".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_inverted_interval_never_reaches_storage() {
        // Mocks without expectations panic if called
        let service = EventsService::new(
            Arc::new(MockEventsRepository::new()),
            Arc::new(MockBarberServicesRepository::new()),
        );

        for (begin, end) in [(at(10, 30), at(10, 0)), (at(10, 0), at(10, 0))] {
            let result = service
                .create_event(Uuid::new_v4(), Uuid::new_v4(), "Fade", begin, end)
                .await;
            match assert_err!(result) {
                AppError::BadRequest(msg) => assert_eq!(msg, "end time must be after start time"),
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_service_lists_available_ones() {
        let barber = Uuid::new_v4();
        let mut services = MockBarberServicesRepository::new();
        services
            .expect_list_for_barber()
            .returning(move |_| Ok(vec![offering(barber, "Beard Trim"), offering(barber, "Fade")]));
        let mut events = MockEventsRepository::new();
        events.expect_create().never();

        let service = EventsService::new(Arc::new(events), Arc::new(services));
        let result = service
            .create_event(barber, Uuid::new_v4(), "Buzz Cut", at(10, 0), at(10, 30))
            .await;
        match assert_err!(result) {
            AppError::BadRequest(msg) => assert_eq!(
                msg,
                "Service 'Buzz Cut' not found. Available services: Beard Trim, Fade"
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_resolves_service_type() {
        let barber = Uuid::new_v4();
        let customer = Uuid::new_v4();
        let fade = offering(barber, "Fade");
        let fade_id = fade.service_type_id;

        let mut services = MockBarberServicesRepository::new();
        services
            .expect_list_for_barber()
            .withf(move |id| *id == barber)
            .returning(move |_| Ok(vec![fade.clone()]));
        let mut events = MockEventsRepository::new();
        events
            .expect_create()
            .withf(move |e| {
                e.service_type_id == fade_id && e.customer_id == customer && e.begin_date_time == at(10, 0)
            })
            .times(1)
            .returning(|e| Ok(stored(e)));

        let service = EventsService::new(Arc::new(events), Arc::new(services));
        let event = assert_ok!(
            service
                .create_event(barber, customer, "Fade", at(10, 0), at(10, 30))
                .await
        );
        assert_eq!(event.barber_id, barber);
        assert_eq!(event.end_date_time, at(10, 30));
    }

    #[tokio::test]
    async fn test_overlap_conflict_is_passed_through() {
        let barber = Uuid::new_v4();
        let mut services = MockBarberServicesRepository::new();
        services
            .expect_list_for_barber()
            .returning(move |_| Ok(vec![offering(barber, "Fade")]));
        let mut events = MockEventsRepository::new();
        events.expect_create().returning(|_| {
            Err(AppError::Conflict(
                "An event at this schedule overlaps with an existing event".to_string(),
            ))
        });

        let service = EventsService::new(Arc::new(events), Arc::new(services));
        let result = service
            .create_event(barber, Uuid::new_v4(), "Fade", at(10, 0), at(10, 30))
            .await;
        assert_eq!(assert_err!(result).status(), axum::http::StatusCode::CONFLICT);
    }
}
