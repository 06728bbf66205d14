//! Attendee registration for free, no-account events.

use gather_core::models::{Attendee, NotificationKind, RegisterAttendeeRequest};
use gather_core::{AppError, PageParams, Pagination};
use gather_db::{AttendeeRepository, EventRepository, NotificationRepository};

#[derive(Clone)]
pub struct RegistrationsService {
    attendees: AttendeeRepository,
    events: EventRepository,
    notifications: NotificationRepository,
}

impl RegistrationsService {
    pub fn new(
        attendees: AttendeeRepository,
        events: EventRepository,
        notifications: NotificationRepository,
    ) -> Self {
        Self {
            attendees,
            events,
            notifications,
        }
    }

    /// Register an attendee. Capacity and duplicate checks run inside the
    /// repository transaction; the organizer notification is best-effort
    /// after the commit.
    #[tracing::instrument(skip(self, request), fields(event_id = %event_id))]
    pub async fn register(
        &self,
        event_id: &str,
        request: RegisterAttendeeRequest,
    ) -> Result<Attendee, AppError> {
        let attendee = self
            .attendees
            .register(event_id, &request.name, &request.email)
            .await?;

        if let Some(event) = self.events.get_by_id(event_id).await? {
            if let Some(creator) = &event.created_by {
                let result = self
                    .notifications
                    .create(
                        creator,
                        NotificationKind::RegistrationConfirmed,
                        "New registration",
                        &format!("{} registered for {}", attendee.name, event.title),
                        Some(&format!("/events/{}", event.id)),
                    )
                    .await;
                if let Err(err) = result {
                    tracing::warn!(error = %err, event_id = %event.id, "failed to create registration notification");
                }
            }
        }

        Ok(attendee)
    }

    #[tracing::instrument(skip(self), fields(event_id = %event_id))]
    pub async fn list_attendees(
        &self,
        event_id: &str,
        page: PageParams,
    ) -> Result<(Vec<Attendee>, Pagination), AppError> {
        if self.events.get_by_id(event_id).await?.is_none() {
            return Err(AppError::EventNotFound(format!(
                "Event not found: {}",
                event_id
            )));
        }
        let (attendees, total) = self
            .attendees
            .list_for_event(event_id, page.limit, page.offset())
            .await?;
        Ok((attendees, Pagination::new(total, page)))
    }
}
