//! Event lifecycle and participant registration.
//!
//! An event goes from creation through any number of owner updates to
//! deletion, which removes it outright. Every check that guards a mutation
//! runs inside the same store lock as the mutation itself.

use chrono::{Local, NaiveDateTime, Utc};
use evently_id::EventId;
use tracing::{info, warn};

use super::ServiceError;
use crate::model::{Actor, Event, EventInput, EventSummary};
use crate::notify;
use crate::policy::{can_create_event, can_modify_event, can_register_for_event};
use crate::state::AppState;
use crate::validation::{validate_event_patch, validate_new_event};

/// Event dates and times are local wall-clock values.
fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn event_not_found() -> ServiceError {
    ServiceError::NotFound("Event not found".to_string())
}

/// All events in creation order.
pub async fn list(state: &AppState) -> Vec<Event> {
    state.events().list().await
}

/// Creates an event owned by `actor`. Only organizers may create events.
pub async fn create(
    state: &AppState,
    actor: &Actor,
    input: &EventInput,
) -> Result<Event, ServiceError> {
    if !can_create_event(actor) {
        return Err(ServiceError::Forbidden(
            "Only organizers can create events".to_string(),
        ));
    }

    let fields = validate_new_event(input, local_now())?;

    let now = Utc::now();
    let event = Event {
        id: EventId::new(),
        title: fields.title,
        description: fields.description,
        date: fields.date,
        time: fields.time,
        created_by: actor.id,
        participants: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    state.events().insert(event.clone()).await?;
    info!(event_id = %event.id, user_id = %actor.id, "Event created");

    Ok(event)
}

/// Applies the provided fields to an event owned by `actor`.
pub async fn update(
    state: &AppState,
    actor: &Actor,
    id: &EventId,
    input: &EventInput,
) -> Result<Event, ServiceError> {
    let now = local_now();
    let updated = state
        .events()
        .modify(id, |event| {
            if !can_modify_event(actor, event) {
                return Err(ServiceError::Forbidden(
                    "Only the event organizer can update this event".to_string(),
                ));
            }

            let patch = validate_event_patch(input, event, now)?;
            if let Some(title) = patch.title {
                event.title = title;
            }
            if let Some(description) = patch.description {
                event.description = description;
            }
            if let Some(date) = patch.date {
                event.date = date;
            }
            if let Some(time) = patch.time {
                event.time = time;
            }
            event.updated_at = Utc::now();

            Ok(event.clone())
        })
        .await
        .ok_or_else(event_not_found)??;

    info!(event_id = %id, user_id = %actor.id, "Event updated");
    Ok(updated)
}

/// Deletes an event owned by `actor`.
pub async fn delete(state: &AppState, actor: &Actor, id: &EventId) -> Result<(), ServiceError> {
    state
        .events()
        .remove_if(id, |event| {
            if can_modify_event(actor, event) {
                Ok(())
            } else {
                Err(ServiceError::Forbidden(
                    "Only the event organizer can delete this event".to_string(),
                ))
            }
        })
        .await
        .ok_or_else(event_not_found)??;

    info!(event_id = %id, user_id = %actor.id, "Event deleted");
    Ok(())
}

/// Adds `actor` to the event's participants and sends a confirmation.
///
/// The confirmation is sent after the store lock is released. Its outcome
/// does not affect the result: a registration that was recorded stays
/// recorded.
pub async fn register(
    state: &AppState,
    actor: &Actor,
    id: &EventId,
) -> Result<EventSummary, ServiceError> {
    let event = state
        .events()
        .modify(id, |event| {
            can_register_for_event(actor, event)?;
            event.participants.push(actor.id);
            Ok::<_, ServiceError>(event.clone())
        })
        .await
        .ok_or_else(event_not_found)??;

    info!(event_id = %id, user_id = %actor.id, "Participant registered");

    match state.users().find_by_id(&actor.id).await {
        Some(user) => {
            notify::dispatch(
                state.notifier(),
                state.notify_timeout(),
                &user.email,
                &event,
            )
            .await;
        }
        None => warn!(
            event_id = %id,
            user_id = %actor.id,
            "Skipping confirmation: registrant has no user record"
        ),
    }

    Ok(event.summary())
}
