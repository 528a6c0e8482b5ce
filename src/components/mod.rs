//! ECS components for animated entities.
//!
//! This module groups the component types that can be attached to entities
//! in the world. Components carry the data the playback and render stages
//! operate on.
//!
//! Submodules overview:
//! - [`sprite`] – render-facing frame rectangle, flips and glow
//! - [`spritecontroller`] – stateful playback over registered sheets
//! - [`spritesheet`] – immutable sheet grids and playback parameters

pub mod sprite;
pub mod spritecontroller;
pub mod spritesheet;
