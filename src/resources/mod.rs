//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `engineconfig` – fixed update rate and run settings from an INI file
//! - `sheetstore` – sprite sheets keyed by string IDs, with manifest loading
//! - `worldtime` – simulation time and delta
pub mod engineconfig;
pub mod sheetstore;
pub mod worldtime;
