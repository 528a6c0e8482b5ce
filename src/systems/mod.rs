//! Engine systems.
//!
//! This module groups the ECS systems that advance playback and publish its
//! results.
//!
//! Submodules overview
//! - [`playback`] – pump controller timers and trigger change events
//! - [`sprite`] – project controller frames onto render-facing sprites
//! - [`time`] – update simulation time and delta

pub mod playback;
pub mod sprite;
pub mod time;
