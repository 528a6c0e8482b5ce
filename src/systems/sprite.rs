//! Sprite projection system.
//!
//! Copies each controller's current frame onto the entity's
//! [`Sprite`](crate::components::sprite::Sprite): texture key, source
//! rectangle, flips and glow. Runs after
//! [`playback_system`](crate::systems::playback::playback_system) so the
//! render layer always sees the frame the controller settled on this update.

use bevy_ecs::prelude::*;

use crate::components::sprite::Sprite;
use crate::components::spritecontroller::{AnimationKey, SpriteController};

/// Refresh [`Sprite`] components from their controllers.
///
/// Contract
/// - Reads controller state only; entities without an active animation are
///   left untouched.
/// - Writes the full render view every update, including the texture key,
///   since a queue handoff can switch sheets between updates.
pub fn sprite_apply_system<K: AnimationKey>(
    mut query: Query<(&SpriteController<K>, &mut Sprite)>,
) {
    for (controller, mut sprite) in query.iter_mut() {
        let Some(sheet) = controller.sheet() else {
            continue;
        };
        sprite.tex_key = sheet.image().tex_key.clone();
        sprite.src = sheet.source_rect(controller.current_frame());
        sprite.flip_x = controller.is_flipped_x();
        sprite.flip_y = controller.is_flipped_y();
        sprite.glow = sheet.glow_color(controller.frame());
    }
}
