use std::time::Duration;

use bevy_ecs::{
    event::{Event, EventReader},
    system::NonSendMut,
};
use tracing::{trace, warn};

use crate::constants::notification;
use crate::food::FoodKind;
use crate::notify::NotificationService;

/// A message queued for the host's notification service.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub message: String,
    pub duration: Duration,
}

impl NotificationEvent {
    pub fn session_started() -> Self {
        Self {
            message: "Collect as much food as you can!".to_string(),
            duration: notification::START_DURATION,
        }
    }

    pub fn collected(kind: FoodKind) -> Self {
        Self {
            message: format!("+{} {}!", kind.points(), kind.name()),
            duration: notification::COLLECT_DURATION,
        }
    }

    pub fn game_over(final_score: u32) -> Self {
        Self {
            message: format!("Game Over! Your final score is {final_score}."),
            duration: notification::GAME_OVER_DURATION,
        }
    }
}

/// Non-send resource wrapper for the host's notification service
pub struct NotifierResource(pub Box<dyn NotificationService>);

pub fn notification_system(mut notifier: NonSendMut<NotifierResource>, mut events: EventReader<NotificationEvent>) {
    for event in events.read() {
        trace!(message = %event.message, "Delivering notification");
        if let Err(e) = notifier.0.notify(&event.message, event.duration) {
            warn!(message = %event.message, error = %e, "Notification service failed");
        }
    }
}
