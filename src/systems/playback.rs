//! Playback advancement system.
//!
//! Feeds scaled world time into every [`SpriteController`] and republishes
//! the changes the controllers recorded as entity-tagged
//! [`PlaybackEvent`]s, so observers see operations performed directly on a
//! controller (play, seek, flips) and timer-driven frame steps through one
//! channel, in order.
//!
//! # Playback Flow
//!
//! 1. [`update_world_time`](crate::systems::time::update_world_time) scales the raw delta
//! 2. This system pumps each controller's frame timer, stepping frames and
//!    handing off queued animations
//! 3. Buffered [`PlaybackChange`](crate::events::playback::PlaybackChange)s
//!    are drained and triggered as [`PlaybackEvent`]s
//! 4. [`sprite_apply_system`](crate::systems::sprite::sprite_apply_system)
//!    projects the new frame onto the [`Sprite`](crate::components::sprite::Sprite)
//!
//! # Related
//!
//! - [`crate::components::spritecontroller::SpriteController`] – per-entity playback state
//! - [`crate::events::playback::PlaybackEvent`] – the event observers receive

use bevy_ecs::prelude::*;

use crate::components::spritecontroller::{AnimationKey, SpriteController};
use crate::events::playback::PlaybackEvent;
use crate::resources::worldtime::WorldTime;

/// Advance controller playback and trigger the recorded change events.
///
/// Contract
/// - Reads [`WorldTime`] for the scaled delta.
/// - Mutates [`SpriteController`] state through its own tick logic.
/// - Triggers one [`PlaybackEvent`] per drained change, in record order.
///
/// Generic over the controller's key type; register one instance per key
/// type in use, e.g. `playback_system::<String>`.
pub fn playback_system<K: AnimationKey>(
    time: Res<WorldTime>,
    mut query: Query<(Entity, &mut SpriteController<K>)>,
    mut commands: Commands,
) {
    let dt = time.delta.max(0.0);
    for (entity, mut controller) in query.iter_mut() {
        controller.advance(dt);
        for change in controller.drain_changes() {
            commands.trigger(PlaybackEvent { entity, change });
        }
    }
}
