//! Sprite-sheet registry and manifest loading.
//!
//! This module provides a store for sheet definitions that can be reused by
//! multiple entities. Sheets are registered in code or loaded from a JSON
//! manifest, and handed out as shared [`Arc`]s so controllers never copy
//! them.
//!
//! # Manifest Format
//!
//! ```json
//! {
//!   "sheets": {
//!     "walk": {
//!       "image": "hero_walk", "image_width": 384, "image_height": 64,
//!       "columns": 6, "rows": 1, "frame_duration": 0.12
//!     },
//!     "blink": {
//!       "image": "hero_blink", "image_width": 128, "image_height": 64,
//!       "frame_width": 64, "frame_height": 64,
//!       "looping": false, "direction": "ping_pong"
//!     }
//!   }
//! }
//! ```
//!
//! Each axis takes either a cell count (`columns`/`rows`) or a frame size in
//! pixels (`frame_width`/`frame_height`); the count wins when both appear.
//! `glow` is an optional `[r, g, b, a]` array mapped to a static
//! [`GlowStyle`](crate::components::spritesheet::GlowStyle); per-frame glow
//! functions can only be attached in code.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use palette::Srgba;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::spritecontroller::{ControllerError, SpriteController};
use crate::components::spritesheet::{
    GlowStyle, GridSpec, PlayDirection, SheetAxis, SheetError, SheetImage, SpriteSheet,
};

/// Errors raised while loading manifests or assembling controllers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The manifest was not valid JSON for the expected shape.
    #[error("failed to parse sheet manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    /// A requested key has no sheet in the store.
    #[error("no sheet named '{0}' in the store")]
    UnknownSheet(String),
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

/// Central registry of reusable sprite sheets keyed by string IDs.
#[derive(Resource, Default)]
pub struct SheetStore {
    pub sheets: FxHashMap<String, Arc<SpriteSheet>>,
}

impl SheetStore {
    pub fn insert(&mut self, key: impl Into<String>, sheet: impl Into<Arc<SpriteSheet>>) {
        self.sheets.insert(key.into(), sheet.into());
    }

    pub fn get(&self, key: &str) -> Option<&Arc<SpriteSheet>> {
        self.sheets.get(key)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Parses a JSON manifest and registers every sheet it defines.
    /// Returns how many sheets were added. Already-registered keys are
    /// overwritten.
    pub fn load_manifest(&mut self, json: &str) -> Result<usize, StoreError> {
        let manifest: SheetManifest = serde_json::from_str(json)?;
        let count = manifest.sheets.len();
        for (name, def) in manifest.sheets {
            let sheet = def.build(&name)?;
            self.sheets.insert(name, Arc::new(sheet));
        }
        Ok(count)
    }

    /// Assembles a controller over the given store keys, each animation
    /// keyed by its store name.
    pub fn controller<I, S>(&self, keys: I) -> Result<SpriteController<String>, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut animations = FxHashMap::default();
        for key in keys {
            let key: String = key.into();
            let sheet = self
                .sheets
                .get(&key)
                .ok_or_else(|| StoreError::UnknownSheet(key.clone()))?;
            animations.insert(key, Arc::clone(sheet));
        }
        Ok(SpriteController::new(animations)?)
    }
}

/// Top-level manifest document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetManifest {
    pub sheets: FxHashMap<String, SheetDef>,
}

fn default_looping() -> bool {
    true
}

/// One sheet entry of a manifest, mirroring the [`SpriteSheet`] builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetDef {
    /// Texture key resolved by the render layer.
    pub image: String,
    pub image_width: u32,
    pub image_height: u32,
    #[serde(default)]
    pub columns: Option<u32>,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub frame_width: Option<u32>,
    #[serde(default)]
    pub frame_height: Option<u32>,
    #[serde(default)]
    pub frame_duration: Option<f32>,
    #[serde(default = "default_looping")]
    pub looping: bool,
    #[serde(default)]
    pub axis: SheetAxis,
    #[serde(default)]
    pub direction: PlayDirection,
    #[serde(default)]
    pub glow: Option<[u8; 4]>,
}

impl SheetDef {
    /// Resolves the definition into a validated sheet. `name` only feeds
    /// error messages.
    pub fn build(&self, name: &str) -> Result<SpriteSheet, SheetError> {
        let columns = match (self.columns, self.frame_width) {
            (Some(count), _) => GridSpec::Cells(count),
            (None, Some(pixels)) => GridSpec::FrameSize(pixels),
            (None, None) => return Err(SheetError::MissingColumnSpec(name.to_string())),
        };
        let rows = match (self.rows, self.frame_height) {
            (Some(count), _) => GridSpec::Cells(count),
            (None, Some(pixels)) => GridSpec::FrameSize(pixels),
            (None, None) => return Err(SheetError::MissingRowSpec(name.to_string())),
        };
        let image = SheetImage::new(self.image.as_str(), self.image_width, self.image_height);
        let mut sheet = SpriteSheet::new(image, columns, rows)?
            .with_looping(self.looping)
            .with_axis(self.axis)
            .with_direction(self.direction);
        if let Some(seconds) = self.frame_duration {
            sheet = sheet.with_frame_duration(seconds);
        }
        if let Some([red, green, blue, alpha]) = self.glow {
            sheet = sheet.with_glow(GlowStyle::Static(Srgba::new(red, green, blue, alpha)));
        }
        Ok(sheet)
    }
}
