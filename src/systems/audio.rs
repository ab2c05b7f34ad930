//! Audio dispatch for the simulation.
//!
//! Gameplay systems write [`AudioEvent`]s; this system forwards them to the host's
//! [`SoundService`](crate::audio::SoundService). The service is stored as a `NonSend` resource
//! since hosts are free to hand over thread-bound playback handles.

use bevy_ecs::{
    event::{Event, EventReader},
    resource::Resource,
    system::{Local, NonSendMut, Res},
};
use tracing::{debug, trace, warn};

use crate::audio::{Sound, SoundService};

/// Resource for tracking audio state
#[derive(Resource, Debug, Clone, Default)]
pub struct AudioState {
    /// Whether audio is currently muted. Passed through to the service untouched.
    pub muted: bool,
}

/// Events for triggering audio playback
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    /// Play a specific sound effect
    Play(Sound),
    /// Start the background track
    StartLoop,
    /// Stop the background track
    StopLoop,
}

/// Non-send resource wrapper for the host's sound service
pub struct AudioResource(pub Box<dyn SoundService>);

/// System that forwards the mute flag and queued audio events to the sound service.
///
/// Failures are logged and dropped.
pub fn audio_system(
    mut audio: NonSendMut<AudioResource>,
    state: Res<AudioState>,
    mut applied_mute: Local<Option<bool>>,
    mut events: EventReader<AudioEvent>,
) {
    // Set mute state if it has changed
    if *applied_mute != Some(state.muted) {
        debug!(muted = state.muted, "Forwarding mute state");
        if let Err(e) = audio.0.set_mute(state.muted) {
            warn!(error = %e, "Sound service rejected mute change");
        }
        *applied_mute = Some(state.muted);
    }

    for event in events.read() {
        trace!(?event, "Dispatching audio event");
        let result = match event {
            AudioEvent::Play(sound) => audio.0.play(*sound),
            AudioEvent::StartLoop => audio.0.start_loop(),
            AudioEvent::StopLoop => audio.0.stop_loop(),
        };

        if let Err(e) = result {
            warn!(?event, error = %e, "Sound service failed");
        }
    }
}
