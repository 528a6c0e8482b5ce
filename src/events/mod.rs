//! Event types exchanged across systems.
//!
//! Events provide a decoupled way for the playback stage to notify the rest
//! of the application without direct dependencies. Observers registered on
//! the world receive them as they are triggered.
//!
//! Submodules:
//! - [`playback`] – controller state changes tagged with their entity
//!
//! See each submodule for concrete event data, semantics, and example usage.
pub mod playback;
