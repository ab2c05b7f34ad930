//! The sound collaborator the simulation calls into.
//!
//! Playback itself lives outside the core. Hosts provide a [`SoundService`]; the core only decides
//! *when* sounds happen and forwards the caller-supplied mute flag.

use tracing::{debug, info};

use crate::error::ServiceError;
use crate::food::FoodKind;

/// One-shot sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// The character's target changed
    Move,
    /// A food item was collected
    Collect(FoodKind),
    GameOver,
}

/// Audio playback provided by the host.
///
/// Failures are reported back so they can be logged, but they never affect the simulation.
pub trait SoundService {
    fn play(&mut self, sound: Sound) -> Result<(), ServiceError>;

    /// Starts the looping background track.
    fn start_loop(&mut self) -> Result<(), ServiceError>;

    fn stop_loop(&mut self) -> Result<(), ServiceError>;

    fn set_mute(&mut self, muted: bool) -> Result<(), ServiceError>;
}

/// A [`SoundService`] that only logs what it would have played.
#[derive(Debug, Default)]
pub struct TracingSound {
    muted: bool,
}

impl SoundService for TracingSound {
    fn play(&mut self, sound: Sound) -> Result<(), ServiceError> {
        if !self.muted {
            debug!(?sound, "Playing sound");
        }
        Ok(())
    }

    fn start_loop(&mut self) -> Result<(), ServiceError> {
        debug!(muted = self.muted, "Background loop started");
        Ok(())
    }

    fn stop_loop(&mut self) -> Result<(), ServiceError> {
        debug!("Background loop stopped");
        Ok(())
    }

    fn set_mute(&mut self, muted: bool) -> Result<(), ServiceError> {
        self.muted = muted;
        info!(muted, "Audio mute state changed");
        Ok(())
    }
}
