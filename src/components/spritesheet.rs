//! Immutable sprite-sheet descriptions.
//!
//! A [`SpriteSheet`] describes how one texture is cut into a grid of frames
//! and how those frames should be played back:
//! - grid geometry, given as cell counts or derived from frame pixel sizes
//! - playback parameters (frame duration, looping, [`PlayDirection`])
//! - layout [`SheetAxis`] used when mapping a frame to its source rectangle
//! - an optional [`GlowStyle`] consulted by the render stage
//!
//! Sheets carry no playback state. They are built once, validated, and then
//! shared behind an [`Arc`](std::sync::Arc) by every
//! [`SpriteController`](super::spritecontroller::SpriteController) that plays
//! them. All getters are pure.

use std::sync::Arc;

use palette::Srgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frame duration applied when a sheet does not specify one.
const DEFAULT_FRAME_DURATION: f32 = 0.1;

/// Errors raised while resolving a sheet definition into a [`SpriteSheet`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    /// The grid resolved to zero columns, either explicitly or because the
    /// requested frame width exceeds the image width.
    #[error("sprite sheet resolved to zero columns")]
    NoColumns,
    /// The grid resolved to zero rows.
    #[error("sprite sheet resolved to zero rows")]
    NoRows,
    /// A frame size of zero pixels can not divide an image.
    #[error("frame size in pixels must be non-zero")]
    ZeroFrameSize,
    /// A manifest entry gave neither a column count nor a frame width.
    #[error("sheet '{0}': neither columns nor frame_width given")]
    MissingColumnSpec(String),
    /// A manifest entry gave neither a row count nor a frame height.
    #[error("sheet '{0}': neither rows nor frame_height given")]
    MissingRowSpec(String),
}

/// Reference to the texture backing a sheet.
///
/// The engine never touches pixel data. `tex_key` names an image in whatever
/// texture registry the render layer uses, and the dimensions are carried here
/// so grids can be resolved without loading the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetImage {
    /// Texture key resolved by the render layer.
    pub tex_key: Arc<str>,
    /// Full image width in pixels.
    pub width: u32,
    /// Full image height in pixels.
    pub height: u32,
}

impl SheetImage {
    pub fn new(tex_key: impl Into<Arc<str>>, width: u32, height: u32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
        }
    }
}

/// How many cells one grid axis holds.
///
/// Either an explicit cell count or a frame size in pixels that the image
/// dimension is divided by (flooring, so partial trailing cells are dropped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSpec {
    /// Explicit number of cells.
    Cells(u32),
    /// Cell size in pixels along this axis.
    FrameSize(u32),
}

/// Axis along which frames are laid out when computing source rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetAxis {
    /// Frames advance left to right within a row.
    #[default]
    Horizontal,
    /// Frames advance top to bottom within a column.
    Vertical,
}

/// Traversal order used when the playback timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayDirection {
    /// First frame to last frame.
    #[default]
    Forward,
    /// Last frame to first frame.
    Reverse,
    /// Forward to the last frame, then backward to the first, repeating.
    PingPong,
    /// Ping-pong that starts at the last frame.
    ReversePingPong,
}

/// Signature for per-frame glow colors. Receives the sheet and the linear
/// frame index currently displayed.
pub type GlowColorFn = fn(&SpriteSheet, u32) -> Srgba<u8>;

/// Glow contract a sheet offers to the render stage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GlowStyle {
    /// No glow.
    #[default]
    None,
    /// One fixed color for every frame.
    Static(Srgba<u8>),
    /// Color recomputed from the current frame index.
    PerFrame(GlowColorFn),
}

/// Grid coordinate of a frame, column first.
///
/// `(0, 0)` is the first frame of a sheet. Coordinates are normally kept
/// inside the grid; only
/// [`seek_frame`](super::spritecontroller::SpriteController::seek_frame) may
/// move the row past the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramePos {
    pub col: u32,
    pub row: u32,
}

impl FramePos {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Source rectangle of one frame inside the sheet image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Immutable description of a frame grid over one texture.
///
/// Construction validates the grid; afterwards nothing can change, which is
/// what lets controllers share one sheet through an `Arc` without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    image: SheetImage,
    columns: u32,
    rows: u32,
    frame_duration: f32,
    looping: bool,
    axis: SheetAxis,
    direction: PlayDirection,
    glow: GlowStyle,
}

impl SpriteSheet {
    /// Builds a sheet over `image`, resolving both grid axes.
    ///
    /// Defaults: frame duration 0.1 s, looping, horizontal axis, forward
    /// direction, no glow. Override with the `with_*` builders.
    pub fn new(image: SheetImage, columns: GridSpec, rows: GridSpec) -> Result<Self, SheetError> {
        let columns = resolve_axis(columns, image.width, SheetError::NoColumns)?;
        let rows = resolve_axis(rows, image.height, SheetError::NoRows)?;
        Ok(Self {
            image,
            columns,
            rows,
            frame_duration: DEFAULT_FRAME_DURATION,
            looping: true,
            axis: SheetAxis::default(),
            direction: PlayDirection::default(),
            glow: GlowStyle::default(),
        })
    }

    /// Seconds each frame stays on screen. Non-positive values disarm the
    /// playback timer, freezing the animation on its current frame.
    pub fn with_frame_duration(mut self, seconds: f32) -> Self {
        self.frame_duration = seconds;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_axis(mut self, axis: SheetAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_direction(mut self, direction: PlayDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_glow(mut self, glow: GlowStyle) -> Self {
        self.glow = glow;
        self
    }

    pub fn image(&self) -> &SheetImage {
        &self.image
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn axis(&self) -> SheetAxis {
        self.axis
    }

    pub fn direction(&self) -> PlayDirection {
        self.direction
    }

    pub fn glow(&self) -> GlowStyle {
        self.glow
    }

    /// Width of one frame in pixels.
    pub fn width(&self) -> u32 {
        self.image.width / self.columns
    }

    /// Height of one frame in pixels.
    pub fn height(&self) -> u32 {
        self.image.height / self.rows
    }

    pub fn total_frames(&self) -> u32 {
        self.columns * self.rows
    }

    /// Grid coordinate of the last frame.
    pub fn last_frame(&self) -> FramePos {
        FramePos::new(self.columns - 1, self.rows - 1)
    }

    /// Whether playback is seeded at the last frame instead of the first.
    pub fn is_reversed(&self) -> bool {
        matches!(
            self.direction,
            PlayDirection::Reverse | PlayDirection::ReversePingPong
        )
    }

    /// Source rectangle of `frame` inside the sheet image.
    ///
    /// Along the playback axis the offset is the frame's proportional share
    /// of the image dimension; across it the offset steps by whole frames.
    /// For single-row (horizontal) or single-column (vertical) sheets this is
    /// pixel-exact.
    pub fn source_rect(&self, frame: FramePos) -> FrameRect {
        let width = self.width() as f32;
        let height = self.height() as f32;
        let total = self.total_frames() as f32;
        match self.axis {
            SheetAxis::Horizontal => FrameRect {
                x: (frame.col as f32 / total) * self.image.width as f32,
                y: (frame.row * self.height()) as f32,
                width,
                height,
            },
            SheetAxis::Vertical => FrameRect {
                x: (frame.col * self.width()) as f32,
                y: (frame.row as f32 / total) * self.image.height as f32,
                width,
                height,
            },
        }
    }

    /// Glow color for the given linear frame index, if the sheet has one.
    pub fn glow_color(&self, frame_index: u32) -> Option<Srgba<u8>> {
        match self.glow {
            GlowStyle::None => None,
            GlowStyle::Static(color) => Some(color),
            GlowStyle::PerFrame(color_fn) => Some(color_fn(self, frame_index)),
        }
    }
}

fn resolve_axis(spec: GridSpec, image_pixels: u32, empty: SheetError) -> Result<u32, SheetError> {
    let cells = match spec {
        GridSpec::Cells(count) => count,
        GridSpec::FrameSize(0) => return Err(SheetError::ZeroFrameSize),
        GridSpec::FrameSize(pixels) => image_pixels / pixels,
    };
    if cells == 0 { Err(empty) } else { Ok(cells) }
}
