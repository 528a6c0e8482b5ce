//! World tick integration tests for playback, sprite projection, and events.

#![allow(dead_code, unused_imports)]

use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use flipbook::components::sprite::Sprite;
use flipbook::components::spritecontroller::SpriteController;
use flipbook::components::spritesheet::{
    FramePos, GlowStyle, GridSpec, PlayDirection, SheetImage, SpriteSheet,
};
use flipbook::events::playback::{PlaybackChange, PlaybackEvent};
use flipbook::resources::worldtime::WorldTime;
use flipbook::systems::playback::playback_system;
use flipbook::systems::sprite::sprite_apply_system;
use flipbook::systems::time::update_world_time;

use palette::Srgba;
use rustc_hash::FxHashMap;

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime {
        elapsed: 0.0,
        delta: 0.0,
        time_scale: 1.0,
        frame_count: 0,
    });
    world
}

fn tick_playback(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            playback_system::<&'static str>,
            sprite_apply_system::<&'static str>,
        )
            .chain(),
    );
    schedule.run(world);
}

fn strip(tex_key: &str, frames: u32) -> SpriteSheet {
    SpriteSheet::new(
        SheetImage::new(tex_key, frames * 64, 64),
        GridSpec::Cells(frames),
        GridSpec::Cells(1),
    )
    .unwrap()
}

fn pair_controller(
    first: (&'static str, SpriteSheet),
    second: (&'static str, SpriteSheet),
) -> SpriteController<&'static str> {
    let mut animations = FxHashMap::default();
    animations.insert(first.0, Arc::new(first.1));
    animations.insert(second.0, Arc::new(second.1));
    SpriteController::new(animations).unwrap()
}

#[test]
fn playback_advances_frames_through_world_time() {
    let mut world = make_world();

    let mut controller = SpriteController::from_sheet("walk", strip("hero_walk", 6));
    controller.play("walk");
    let sheet = controller.sheet().unwrap().clone();
    let entity = world
        .spawn((controller, Sprite::from_sheet(&sheet)))
        .id();

    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);

    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    let sprite = world.get::<Sprite>(entity).unwrap();
    assert_eq!(controller.frame(), 1);
    assert!(approx_eq(sprite.src.x, 64.0));
    assert!(approx_eq(sprite.src.width, 64.0));

    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);

    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    let sprite = world.get::<Sprite>(entity).unwrap();
    assert_eq!(controller.frame(), 2);
    assert!(approx_eq(sprite.src.x, 128.0));
}

#[test]
fn sprite_reflects_flips_and_glow() {
    let mut world = make_world();

    let glow = Srgba::new(255u8, 215, 64, 255);
    let sheet = strip("gem", 4).with_glow(GlowStyle::Static(glow));
    let mut controller = SpriteController::from_sheet("gem", sheet);
    controller.play("gem");
    controller.set_flip_x(true);
    let entity = world.spawn((controller, Sprite::new("gem"))).id();

    tick_playback(&mut world);

    let sprite = world.get::<Sprite>(entity).unwrap();
    assert!(sprite.flip_x);
    assert!(!sprite.flip_y);
    assert_eq!(sprite.glow, Some(glow));
}

#[test]
fn observers_receive_playback_events_in_order() {
    let mut world = make_world();

    let mut controller = SpriteController::from_sheet("walk", strip("hero_walk", 6));
    controller.play("walk");
    let entity = world.spawn((controller, Sprite::new("hero_walk"))).id();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    world.add_observer(move |trigger: On<PlaybackEvent>| {
        let event = trigger.event();
        seen_clone.lock().unwrap().push((event.entity, event.change));
    });
    world.flush();

    // the play() above was buffered before the entity ever ticked
    tick_playback(&mut world);
    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            (entity, PlaybackChange::Started),
            (entity, PlaybackChange::Frame),
        ]
    );
}

#[test]
fn queue_handoff_switches_sheets_in_world() {
    let mut world = make_world();

    let mut controller = pair_controller(
        ("blink", strip("hero_blink", 2).with_looping(false)),
        ("walk", strip("hero_walk", 6)),
    );
    controller.play("blink");
    controller.add_to_queue("walk");
    let entity = world.spawn((controller, Sprite::new("hero_blink"))).id();

    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);

    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    assert_eq!(controller.current_animation(), Some(&"blink"));
    assert_eq!(controller.frame(), 1);

    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);

    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    let sprite = world.get::<Sprite>(entity).unwrap();
    assert_eq!(controller.current_animation(), Some(&"walk"));
    assert!(controller.is_playing());
    assert_eq!(controller.frame(), 0);
    assert_eq!(&*sprite.tex_key, "hero_walk");
}

#[test]
fn time_scale_slows_playback() {
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(0.5));

    let mut controller = SpriteController::from_sheet("walk", strip("hero_walk", 6));
    controller.play("walk");
    let entity = world.spawn((controller, Sprite::new("hero_walk"))).id();

    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);
    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    assert_eq!(controller.frame(), 0); // only half an interval has passed

    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);
    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    assert_eq!(controller.frame(), 1);
}

#[test]
fn paused_controller_ignores_world_time() {
    let mut world = make_world();

    let mut controller = SpriteController::from_sheet("walk", strip("hero_walk", 6));
    controller.play("walk");
    let entity = world.spawn((controller, Sprite::new("hero_walk"))).id();

    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);

    world
        .get_mut::<SpriteController<&'static str>>(entity)
        .unwrap()
        .pause();

    update_world_time(&mut world, 1.0);
    tick_playback(&mut world);

    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    assert!(!controller.is_playing());
    assert_eq!(controller.frame(), 1);
}

#[test]
fn one_shot_emits_stopped_event() {
    let mut world = make_world();

    let mut controller =
        SpriteController::from_sheet("blink", strip("hero_blink", 2).with_looping(false));
    controller.play("blink");
    let entity = world.spawn((controller, Sprite::new("hero_blink"))).id();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    world.add_observer(move |trigger: On<PlaybackEvent>| {
        seen_clone.lock().unwrap().push(trigger.event().change);
    });
    world.flush();

    for _ in 0..2 {
        update_world_time(&mut world, 0.1);
        tick_playback(&mut world);
    }

    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    assert!(!controller.is_playing());
    assert_eq!(controller.frame(), 0);
    assert!(seen.lock().unwrap().contains(&PlaybackChange::Stopped));
}

#[test]
fn reverse_ping_pong_runs_forever_in_world() {
    let mut world = make_world();

    let sheet = strip("gem_shimmer", 4)
        .with_direction(PlayDirection::ReversePingPong)
        .with_looping(false);
    let mut controller = SpriteController::from_sheet("shimmer", sheet);
    controller.play("shimmer");
    let entity = world.spawn((controller, Sprite::new("gem_shimmer"))).id();

    for _ in 0..20 {
        update_world_time(&mut world, 0.1);
        tick_playback(&mut world);
    }

    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    assert!(controller.is_playing());
    assert!(controller.current_frame().col < 4);
}

#[test]
fn idle_controller_leaves_sprite_untouched() {
    let mut world = make_world();

    let controller = SpriteController::from_sheet("walk", strip("hero_walk", 6));
    let entity = world.spawn((controller, Sprite::new("placeholder"))).id();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    world.add_observer(move |trigger: On<PlaybackEvent>| {
        seen_clone.lock().unwrap().push(trigger.event().change);
    });
    world.flush();

    update_world_time(&mut world, 0.5);
    tick_playback(&mut world);

    let sprite = world.get::<Sprite>(entity).unwrap();
    assert_eq!(&*sprite.tex_key, "placeholder");
    assert!(approx_eq(sprite.src.x, 0.0));
    assert!(approx_eq(sprite.src.width, 0.0));
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn seek_through_world_updates_sprite_rect() {
    let mut world = make_world();

    let mut controller = SpriteController::from_sheet("walk", strip("hero_walk", 6));
    controller.play("walk");
    let entity = world.spawn((controller, Sprite::new("hero_walk"))).id();

    tick_playback(&mut world);

    world
        .get_mut::<SpriteController<&'static str>>(entity)
        .unwrap()
        .seek(FramePos::new(4, 0));

    tick_playback(&mut world);

    let controller = world.get::<SpriteController<&'static str>>(entity).unwrap();
    let sprite = world.get::<Sprite>(entity).unwrap();
    assert_eq!(controller.frame(), 4);
    assert!(approx_eq(sprite.src.x, 256.0));
}
