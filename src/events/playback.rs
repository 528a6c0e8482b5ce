//! Playback change events.
//!
//! Every state change a
//! [`SpriteController`](crate::components::spritecontroller::SpriteController)
//! goes through is buffered on the controller and re-triggered by
//! [`playback_system`](crate::systems::playback::playback_system) as a
//! [`PlaybackEvent`] carrying the owning entity. Observers subscribe with
//! `world.add_observer` and stop listening when their observer entity is
//! despawned.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<PlaybackEvent>| {
//!     let event = trigger.event();
//!     if event.change == PlaybackChange::Stopped {
//!         // react to the animation finishing
//!     }
//! });
//! ```
//!
//! # Related
//!
//! - [`crate::components::spritecontroller::SpriteController`] – records the changes
//! - [`crate::systems::playback::playback_system`] – drains and triggers them

use bevy_ecs::prelude::*;

/// What changed on a controller during one operation or timer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackChange {
    /// Playback started or resumed, possibly on a different animation.
    Started,
    /// Playback paused, holding the current frame.
    Paused,
    /// Playback stopped and the frame was rewound.
    Stopped,
    /// The timer stepped the current frame.
    Frame,
    /// A seek moved the current frame.
    Seeked,
    /// A flip flag changed.
    Flipped,
}

/// Event triggered for each drained [`PlaybackChange`].
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackEvent {
    /// The entity whose controller changed.
    pub entity: Entity,
    /// The change that occurred.
    pub change: PlaybackChange,
}
