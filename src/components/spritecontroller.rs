//! Stateful playback over a set of [`SpriteSheet`]s.
//!
//! A [`SpriteController`] owns a map of animation keys to shared sheets plus
//! everything that changes at runtime: the active key, the current grid
//! frame, play/pause state, flip flags, a FIFO handoff queue and the frame
//! timer. One controller drives one on-screen sprite; many controllers can
//! share the same sheets.
//!
//! # How it works
//! - [`play`](SpriteController::play) arms the timer at the active sheet's
//!   frame duration. [`advance`](SpriteController::advance) feeds elapsed
//!   seconds into the timer and steps one frame per whole interval, following
//!   the sheet's [`PlayDirection`].
//! - When a non-looping traversal runs off the grid the controller first
//!   consults its queue; a waiting key is played immediately, otherwise the
//!   controller stops. The queue also preempts the wrap of looping sheets at
//!   the end of each cycle.
//! - Every observable change is buffered as a
//!   [`PlaybackChange`](crate::events::playback::PlaybackChange) and drained
//!   by [`playback_system`](crate::systems::playback::playback_system), which
//!   re-triggers them as entity-tagged events.
//!
//! Controllers are plain values. They can be driven without an ECS world by
//! calling [`advance`](SpriteController::advance) directly, which is how the
//! unit tests below exercise them.

use std::hash::Hash;
use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::warn;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::components::spritesheet::{FramePos, PlayDirection, SpriteSheet};
use crate::events::playback::PlaybackChange;

/// Marker bounds for animation keys. Blanket-implemented, so any hashable,
/// cloneable, thread-safe type works: `&'static str`, `String`, an enum.
pub trait AnimationKey: Eq + Hash + Clone + Send + Sync + 'static {}

impl<T: Eq + Hash + Clone + Send + Sync + 'static> AnimationKey for T {}

/// Errors raised when assembling a [`SpriteController`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// A controller without animations can never play anything.
    #[error("sprite controller needs at least one animation")]
    NoAnimations,
}

/// Accumulating frame timer.
///
/// [`advance`](SpriteController::advance) adds scaled delta seconds to
/// `elapsed`; each time a whole `interval` has accumulated one frame step
/// fires and the interval is subtracted, so no time is lost between frames.
/// A non-positive interval never fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTimer {
    /// Seconds between frame steps.
    pub interval: f32,
    /// Seconds accumulated toward the next step.
    pub elapsed: f32,
    /// Whether the timer is running.
    pub armed: bool,
}

impl FrameTimer {
    fn idle() -> Self {
        Self {
            interval: 0.0,
            elapsed: 0.0,
            armed: false,
        }
    }

    fn start(&mut self, interval: f32) {
        self.interval = interval;
        self.elapsed = 0.0;
        self.armed = true;
    }

    fn cancel(&mut self) {
        self.armed = false;
        self.elapsed = 0.0;
    }

    fn fire(&mut self) -> bool {
        if self.armed && self.interval > 0.0 && self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            true
        } else {
            false
        }
    }
}

/// Drives frame-by-frame playback of registered [`SpriteSheet`]s.
///
/// All state is private and only changes through the playback operations, so
/// the grid invariants hold whenever a caller can observe the controller.
#[derive(Component, Debug, Clone)]
pub struct SpriteController<K: AnimationKey> {
    animations: FxHashMap<K, Arc<SpriteSheet>>,
    current_animation: Option<K>,
    current_frame: FramePos,
    playing: bool,
    flip_x: bool,
    flip_y: bool,
    reversing: bool,
    queue: SmallVec<[K; 4]>,
    timer: FrameTimer,
    pending: SmallVec<[PlaybackChange; 8]>,
}

impl<K: AnimationKey> SpriteController<K> {
    /// Builds a controller over a non-empty animation map. Nothing plays
    /// until [`play`](Self::play) is called.
    pub fn new(animations: FxHashMap<K, Arc<SpriteSheet>>) -> Result<Self, ControllerError> {
        if animations.is_empty() {
            return Err(ControllerError::NoAnimations);
        }
        Ok(Self {
            animations,
            current_animation: None,
            current_frame: FramePos::default(),
            playing: false,
            flip_x: false,
            flip_y: false,
            reversing: false,
            queue: SmallVec::new(),
            timer: FrameTimer::idle(),
            pending: SmallVec::new(),
        })
    }

    /// Convenience constructor for a controller with a single animation.
    pub fn from_sheet(key: K, sheet: impl Into<Arc<SpriteSheet>>) -> Self {
        let mut animations = FxHashMap::default();
        animations.insert(key, sheet.into());
        Self::new(animations).expect("one animation was just inserted")
    }

    /// The sheet of the active animation, if any animation was ever played.
    pub fn sheet(&self) -> Option<&Arc<SpriteSheet>> {
        self.current_animation
            .as_ref()
            .and_then(|key| self.animations.get(key))
    }

    /// The sheet registered under `key`.
    pub fn sheet_for(&self, key: &K) -> Option<&Arc<SpriteSheet>> {
        self.animations.get(key)
    }

    pub fn has_animation(&self, key: &K) -> bool {
        self.animations.contains_key(key)
    }

    /// Key of the active animation. `None` until the first successful play.
    pub fn current_animation(&self) -> Option<&K> {
        self.current_animation.as_ref()
    }

    /// Grid coordinate currently displayed.
    pub fn current_frame(&self) -> FramePos {
        self.current_frame
    }

    /// Linear index of the current frame in row-major order, `0` when no
    /// animation has ever played.
    pub fn frame(&self) -> u32 {
        match self.sheet() {
            Some(sheet) => self.current_frame.col + self.current_frame.row * sheet.columns(),
            None => 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether a ping-pong traversal is currently on its backward leg. For
    /// [`PlayDirection::ReversePingPong`] the legs are mirrored, so `true`
    /// means frames are incrementing.
    pub fn is_reversing(&self) -> bool {
        self.reversing
    }

    pub fn is_flipped_x(&self) -> bool {
        self.flip_x
    }

    pub fn is_flipped_y(&self) -> bool {
        self.flip_y
    }

    /// Keys waiting for automatic handoff, front of the queue first.
    pub fn queued(&self) -> &[K] {
        &self.queue
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Starts or resumes playback.
    ///
    /// With `Some(key)` naming a registered animation that is not already
    /// active, the controller switches to it and rewinds to the origin.
    /// An unregistered key logs a warning and leaves the active animation
    /// unchanged. With `None` the current animation resumes at its held
    /// frame.
    ///
    /// The frame timer always restarts at the active sheet's frame duration,
    /// and reverse-seeded sheets are re-seeded at their last frame. If no
    /// animation resolves at all this is a no-op.
    pub fn play(&mut self, animation: impl Into<Option<K>>) {
        if let Some(next) = animation.into() {
            if self.current_animation.as_ref() != Some(&next) {
                if self.animations.contains_key(&next) {
                    self.current_animation = Some(next);
                    self.current_frame = FramePos::default();
                } else {
                    warn!("play requested for an unregistered animation key");
                }
            }
        }
        let Some(sheet) = self.sheet() else {
            warn!("play resolved no animation to start");
            debug_assert!(
                self.current_animation.is_some(),
                "play resolved no animation to start"
            );
            return;
        };
        let frame_duration = sheet.frame_duration();
        let reversed = sheet.is_reversed();
        let last = sheet.last_frame();
        self.timer.start(frame_duration);
        if reversed {
            self.current_frame = last;
            self.reversing = true;
        } else {
            self.reversing = false;
        }
        self.playing = true;
        self.record(PlaybackChange::Started);
    }

    /// Halts playback, keeping the current frame for a later resume.
    pub fn pause(&mut self) {
        self.playing = false;
        self.timer.cancel();
        self.record(PlaybackChange::Paused);
    }

    /// Halts playback and rewinds: to the last frame for reverse-seeded
    /// sheets, to the origin for everything else.
    pub fn stop(&mut self) {
        self.playing = false;
        self.timer.cancel();
        self.current_frame = match self.sheet() {
            Some(sheet) if sheet.is_reversed() => sheet.last_frame(),
            _ => FramePos::default(),
        };
        self.record(PlaybackChange::Stopped);
    }

    /// Appends `animation` to the handoff queue. Queued keys take over in
    /// FIFO order whenever the active traversal finishes a pass, without any
    /// further `play` call.
    pub fn add_to_queue(&mut self, animation: K) {
        self.queue.push(animation);
    }

    /// Jumps to a grid coordinate; both axes wrap inside the active grid.
    /// Ignored when nothing has been played yet.
    pub fn seek(&mut self, frame: FramePos) {
        let Some(sheet) = self.sheet() else {
            warn!("seek ignored: no animation has been played yet");
            return;
        };
        let columns = sheet.columns();
        let rows = sheet.rows();
        self.current_frame = FramePos::new(frame.col % columns, frame.row % rows);
        self.record(PlaybackChange::Seeked);
    }

    /// Jumps to a linear frame index. The column wraps inside the grid but
    /// the row keeps any overflow, so indexes past the last frame are
    /// representable and [`frame`](Self::frame) round-trips them.
    pub fn seek_frame(&mut self, index: u32) {
        let Some(sheet) = self.sheet() else {
            warn!("seek_frame ignored: no animation has been played yet");
            return;
        };
        let columns = sheet.columns();
        self.current_frame = FramePos::new(index % columns, index / columns);
        self.record(PlaybackChange::Seeked);
    }

    /// Sets horizontal mirroring, notifying only on an actual change.
    pub fn set_flip_x(&mut self, flipped: bool) {
        if self.flip_x != flipped {
            self.flip_x = flipped;
            self.record(PlaybackChange::Flipped);
        }
    }

    /// Sets vertical mirroring, notifying only on an actual change.
    pub fn set_flip_y(&mut self, flipped: bool) {
        if self.flip_y != flipped {
            self.flip_y = flipped;
            self.record(PlaybackChange::Flipped);
        }
    }

    /// Feeds `dt` seconds into the frame timer and steps once per whole
    /// interval elapsed. Does nothing while the timer is disarmed.
    pub fn advance(&mut self, dt: f32) {
        if !self.timer.armed {
            return;
        }
        self.timer.elapsed += dt.max(0.0);
        while self.timer.fire() {
            self.tick();
        }
    }

    /// Drains the buffered notifications in the order they were recorded.
    pub fn drain_changes(&mut self) -> impl Iterator<Item = PlaybackChange> + '_ {
        self.pending.drain(..)
    }

    fn record(&mut self, change: PlaybackChange) {
        self.pending.push(change);
    }

    fn next_queued(&mut self) -> Option<K> {
        if self.queue.is_empty() {
            None
        } else {
            Some(self.queue.remove(0))
        }
    }

    /// One timer firing: move a frame along the active direction.
    fn tick(&mut self) {
        let Some(sheet) = self.sheet() else {
            self.timer.cancel();
            return;
        };
        let columns = sheet.columns();
        let rows = sheet.rows();
        let looping = sheet.is_looping();
        let direction = sheet.direction();
        let last = sheet.last_frame();
        if !self.playing {
            self.timer.cancel();
            return;
        }
        match direction {
            PlayDirection::Forward => {
                self.increment_frame(columns, rows, looping, true);
            }
            PlayDirection::Reverse => {
                self.decrement_frame(columns, rows, looping, true);
            }
            PlayDirection::PingPong => {
                if self.reversing {
                    self.decrement_frame(columns, rows, looping, false);
                    if self.current_frame == FramePos::default() {
                        self.reversing = false;
                        if let Some(next) = self.next_queued() {
                            self.play(Some(next));
                        }
                    }
                } else {
                    self.increment_frame(columns, rows, looping, false);
                    if self.current_frame == last {
                        self.reversing = true;
                    }
                }
            }
            PlayDirection::ReversePingPong => {
                // Mirrored legs: `reversing` marks the climb back toward the
                // last frame, where the queue is consulted.
                if self.reversing {
                    self.increment_frame(columns, rows, looping, false);
                    if self.current_frame == last {
                        self.reversing = false;
                        if let Some(next) = self.next_queued() {
                            self.play(Some(next));
                        }
                    }
                } else {
                    self.decrement_frame(columns, rows, looping, false);
                    if self.current_frame == FramePos::default() {
                        self.reversing = true;
                    }
                }
            }
        }
        self.record(PlaybackChange::Frame);
    }

    /// Steps one frame forward in row-major order.
    ///
    /// Past the last frame the queue is consulted first (when `queue_check`
    /// is set), then looping wraps to the origin, otherwise the controller
    /// stops. Ping-pong legs pass `queue_check = false` and always wrap, so
    /// their turnaround logic in [`tick`](Self::tick) stays in control.
    fn increment_frame(&mut self, columns: u32, rows: u32, looping: bool, queue_check: bool) {
        let mut col = self.current_frame.col + 1;
        let mut row = self.current_frame.row;
        if col >= columns {
            col = 0;
            row = row.saturating_add(1);
        }
        if row >= rows {
            if queue_check {
                if let Some(next) = self.next_queued() {
                    self.play(Some(next));
                    return;
                }
                if !looping {
                    self.stop();
                    return;
                }
            }
            col = 0;
            row = 0;
        }
        self.current_frame = FramePos::new(col, row);
    }

    /// Steps one frame backward in row-major order; mirror of
    /// [`increment_frame`](Self::increment_frame), with the origin as the
    /// boundary.
    fn decrement_frame(&mut self, columns: u32, rows: u32, looping: bool, queue_check: bool) {
        if self.current_frame == FramePos::default() {
            if queue_check {
                if let Some(next) = self.next_queued() {
                    self.play(Some(next));
                    return;
                }
                if !looping {
                    self.stop();
                    return;
                }
            }
            self.current_frame = FramePos::new(columns - 1, rows - 1);
            return;
        }
        let mut col = self.current_frame.col;
        let mut row = self.current_frame.row;
        if col == 0 {
            col = columns - 1;
            row = row.saturating_sub(1);
        } else {
            col -= 1;
        }
        self.current_frame = FramePos::new(col, row);
    }
}
