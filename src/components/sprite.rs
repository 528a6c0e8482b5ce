use std::sync::Arc;

use bevy_ecs::prelude::Component;
use palette::Srgba;

use crate::components::spritesheet::{FramePos, FrameRect, SpriteSheet};

/// Render-facing view of an animated sprite: the texture key, the source
/// rectangle of the frame to draw, mirroring flags and an optional glow.
/// [`sprite_apply_system`](crate::systems::sprite::sprite_apply_system)
/// refreshes it from the entity's controller every frame; the render layer
/// only reads it.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub tex_key: Arc<str>,
    pub src: FrameRect,
    pub flip_x: bool,
    pub flip_y: bool,
    pub glow: Option<Srgba<u8>>,
}

impl Sprite {
    pub fn new(tex_key: impl Into<Arc<str>>) -> Self {
        Self {
            tex_key: tex_key.into(),
            src: FrameRect::default(),
            flip_x: false,
            flip_y: false,
            glow: None,
        }
    }

    /// Sprite pre-sized to the first frame of `sheet`.
    pub fn from_sheet(sheet: &SpriteSheet) -> Self {
        let mut sprite = Self::new(sheet.image().tex_key.clone());
        sprite.src = sheet.source_rect(FramePos::default());
        sprite
    }
}
