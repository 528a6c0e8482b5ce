use bevy_ecs::prelude::Resource;

/// Simulation clock shared by every time-driven system.
///
/// `delta` is the scaled step of the current update and `elapsed` the scaled
/// total. `time_scale` slows down or speeds up playback globally without
/// touching any controller.
#[derive(Resource, Clone, Copy)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
