//! Authorization decisions for event operations.
//!
//! These are pure functions over an [`Actor`] and the target [`Event`]. The
//! workflows in [`crate::service::events`] evaluate them while holding the
//! event store lock so the decision and the mutation see the same record.

use thiserror::Error;

use crate::model::{Actor, Event, Role};

/// Reasons a registration request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistrationDenial {
    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("Event organizer cannot register as a participant")]
    SelfRegistrationForbidden,
}

/// Only organizers create events.
pub fn can_create_event(actor: &Actor) -> bool {
    actor.role == Role::Organizer
}

/// Only the creator may update or delete an event, regardless of role.
pub fn can_modify_event(actor: &Actor, event: &Event) -> bool {
    event.created_by == actor.id
}

/// Decides whether `actor` may join `event` as a participant.
///
/// Duplicate registration is checked before self-registration.
pub fn can_register_for_event(actor: &Actor, event: &Event) -> Result<(), RegistrationDenial> {
    if event.is_participant(&actor.id) {
        return Err(RegistrationDenial::AlreadyRegistered);
    }
    if event.created_by == actor.id {
        return Err(RegistrationDenial::SelfRegistrationForbidden);
    }
    Ok(())
}
