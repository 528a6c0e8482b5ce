//! Flipbook engine main entry point.
//!
//! A sprite-sheet animation engine written in Rust using:
//! - **bevy_ecs** for entity-component-system architecture
//! - **serde/serde_json** for sheet manifests
//! - **configparser** for INI configuration
//!
//! This executable runs a headless playback demo: it registers a few sprite
//! sheets (or loads them from a manifest), spawns entities playing them and
//! steps the world at a fixed rate while logging playback events. No window
//! is opened; the render layer is whatever consumes the resulting `Sprite`
//! components.
//!
//! # Project Structure
//!
//! - `components` – ECS components (sheets, controllers, sprites)
//! - `events` – Event types (playback changes)
//! - `resources` – ECS resources (sheet store, config, time)
//! - `systems` – ECS systems (playback, sprite projection, time)
//!
//! # Main Loop
//!
//! 1. Load configuration and sheet definitions
//! 2. Spawn entities with controllers and sprites
//! 3. Register playback observers
//! 4. Step the world at `tick_rate` for `duration` simulated seconds
//! 5. Log the final playback state of every entity
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --seconds 2 --tick-rate 30
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{debug, info};
use palette::Srgba;
use std::path::PathBuf;

use flipbook::components::sprite::Sprite;
use flipbook::components::spritecontroller::SpriteController;
use flipbook::components::spritesheet::{
    GlowStyle, GridSpec, PlayDirection, SheetAxis, SheetImage, SpriteSheet,
};
use flipbook::events::playback::PlaybackEvent;
use flipbook::resources::engineconfig::EngineConfig;
use flipbook::resources::sheetstore::SheetStore;
use flipbook::resources::worldtime::WorldTime;
use flipbook::systems::playback::playback_system;
use flipbook::systems::sprite::sprite_apply_system;
use flipbook::systems::time::update_world_time;

/// Flipbook sprite-sheet playback
#[derive(Parser)]
#[command(version, about = "Headless sprite-sheet playback demo")]
struct Cli {
    /// Path to the INI configuration file (default: ./flipbook.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Load sheets from a JSON manifest instead of the built-in demo set.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Simulated seconds to run (overrides the config file).
    #[arg(long)]
    seconds: Option<f32>,

    /// Fixed updates per simulated second (overrides the config file).
    #[arg(long)]
    tick_rate: Option<u32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => EngineConfig::with_path(path),
        None => EngineConfig::new(),
    };
    config.load_from_file().ok(); // ignore errors, use defaults
    if let Some(seconds) = cli.seconds {
        config.duration_secs = seconds;
    }
    if let Some(tick_rate) = cli.tick_rate {
        config.tick_rate = tick_rate;
    }

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));

    let mut store = SheetStore::default();
    let sparkle = match &cli.manifest {
        Some(path) => {
            let json = match std::fs::read_to_string(path) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("Error reading manifest {}: {e}", path.display());
                    std::process::exit(1);
                }
            };
            match store.load_manifest(&json) {
                Ok(count) => info!("Loaded {} sheets from {}", count, path.display()),
                Err(e) => {
                    eprintln!("Error loading manifest: {e}");
                    std::process::exit(1);
                }
            }
            spawn_manifest_cast(&mut world, &store);
            None
        }
        None => {
            register_demo_sheets(&mut store);
            Some(spawn_demo_cast(&mut world, &store))
        }
    };
    world.insert_resource(store);

    world.add_observer(
        |trigger: On<PlaybackEvent>, query: Query<&SpriteController<String>>| {
            let event = trigger.event();
            if let Ok(controller) = query.get(event.entity) {
                debug!(
                    "{:?}: {:?} at frame {}",
                    event.entity,
                    event.change,
                    controller.frame()
                );
            }
        },
    );
    // Ensure the observer is registered before we run any systems that may trigger events.
    world.flush();

    let mut update = Schedule::default();
    update.add_systems((playback_system::<String>, sprite_apply_system::<String>).chain());
    update
        .initialize(&mut world)
        .expect("Failed to initialize schedule");

    // --------------- Main loop ---------------
    let dt = config.step();
    let total_steps = (config.duration_secs / dt).ceil().max(0.0) as u64;
    let reseek_step = total_steps / 2;
    info!(
        "Running {} fixed steps at {} ticks per second",
        total_steps, config.tick_rate
    );
    world.insert_resource(config);

    for step_index in 0..total_steps {
        if step_index == reseek_step
            && let Some(entity) = sparkle
            && let Some(mut controller) = world.get_mut::<SpriteController<String>>(entity)
        {
            let frames = controller
                .sheet()
                .map(|sheet| sheet.total_frames())
                .unwrap_or(1);
            controller.seek_frame(fastrand::u32(0..frames));
        }
        update_world_time(&mut world, dt);
        update.run(&mut world);
        world.clear_trackers(); // Clear changed components for next frame
    }

    // --------------- Final report ---------------
    let time = *world.resource::<WorldTime>();
    info!(
        "Simulated {:.2}s in {} updates",
        time.elapsed, time.frame_count
    );
    let mut query = world.query::<(Entity, &SpriteController<String>, &Sprite)>();
    for (entity, controller, sprite) in query.iter(&world) {
        info!(
            "{:?}: '{}' frame {} src ({}, {}) {}x{} playing={}",
            entity,
            controller
                .current_animation()
                .map(String::as_str)
                .unwrap_or("-"),
            controller.frame(),
            sprite.src.x,
            sprite.src.y,
            sprite.src.width,
            sprite.src.height,
            controller.is_playing()
        );
    }
}

/// Built-in sheets covering every playback direction.
fn register_demo_sheets(store: &mut SheetStore) {
    let walk = SpriteSheet::new(
        SheetImage::new("hero_walk", 384, 64),
        GridSpec::FrameSize(64),
        GridSpec::Cells(1),
    )
    .expect("demo walk sheet")
    .with_frame_duration(0.12);
    store.insert("walk", walk);

    let blink = SpriteSheet::new(
        SheetImage::new("hero_blink", 128, 64),
        GridSpec::Cells(2),
        GridSpec::Cells(1),
    )
    .expect("demo blink sheet")
    .with_frame_duration(0.06)
    .with_looping(false);
    store.insert("blink", blink);

    let shimmer = SpriteSheet::new(
        SheetImage::new("gem_shimmer", 256, 64),
        GridSpec::Cells(4),
        GridSpec::Cells(1),
    )
    .expect("demo shimmer sheet")
    .with_direction(PlayDirection::ReversePingPong)
    .with_glow(GlowStyle::PerFrame(shimmer_glow));
    store.insert("shimmer", shimmer);

    let sparkle = SpriteSheet::new(
        SheetImage::new("sparkle", 64, 256),
        GridSpec::Cells(1),
        GridSpec::FrameSize(64),
    )
    .expect("demo sparkle sheet")
    .with_axis(SheetAxis::Vertical)
    .with_frame_duration(0.2);
    store.insert("sparkle", sparkle);
}

/// Brightness follows the displayed frame, warm tint.
fn shimmer_glow(sheet: &SpriteSheet, frame: u32) -> Srgba<u8> {
    let total = sheet.total_frames().max(1);
    let level = (255 * (frame.min(total - 1) + 1) / total) as u8;
    Srgba::new(level, level, 64, 255)
}

/// Spawns the built-in demo entities; returns the sparkle entity so the main
/// loop can re-seek it mid-run.
fn spawn_demo_cast(world: &mut World, store: &SheetStore) -> Entity {
    // hero: looping walk that hands off to a blink and back via the queue
    let mut hero = store
        .controller(["walk", "blink"])
        .expect("demo sheets registered");
    hero.play("walk".to_string());
    hero.add_to_queue("blink".to_string());
    hero.add_to_queue("walk".to_string());
    hero.set_flip_x(true);
    let hero_sprite = Sprite::from_sheet(store.get("walk").expect("walk sheet"));
    let hero_entity = world.spawn((hero, hero_sprite)).id();
    debug!("{:?} is the hero", hero_entity);

    // gem: reverse ping-pong with a per-frame glow
    let mut gem = store.controller(["shimmer"]).expect("demo sheets registered");
    gem.play("shimmer".to_string());
    let gem_sprite = Sprite::from_sheet(store.get("shimmer").expect("shimmer sheet"));
    world.spawn((gem, gem_sprite));

    // sparkle: vertical strip, re-seeked to a random frame mid-run
    let mut sparkle = store.controller(["sparkle"]).expect("demo sheets registered");
    sparkle.play("sparkle".to_string());
    let sparkle_sprite = Sprite::from_sheet(store.get("sparkle").expect("sparkle sheet"));
    world.spawn((sparkle, sparkle_sprite)).id()
}

/// Spawns one entity per manifest sheet, each playing its own key.
fn spawn_manifest_cast(world: &mut World, store: &SheetStore) {
    let mut keys: Vec<String> = store.sheets.keys().cloned().collect();
    keys.sort();
    for key in keys {
        let sheet = store.get(&key).expect("key came from the store");
        let mut controller = store
            .controller([key.clone()])
            .expect("key came from the store");
        controller.play(key.clone());
        let sprite = Sprite::from_sheet(sheet);
        let entity = world.spawn((controller, sprite)).id();
        debug!("{:?} plays '{}'", entity, key);
    }
}
