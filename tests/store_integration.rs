//! Integration tests for manifest loading and store-assembled controllers.

#![allow(dead_code, unused_imports)]

use std::sync::Arc;

use bevy_ecs::prelude::*;

use flipbook::components::sprite::Sprite;
use flipbook::components::spritecontroller::SpriteController;
use flipbook::resources::engineconfig::EngineConfig;
use flipbook::resources::sheetstore::SheetStore;
use flipbook::resources::worldtime::WorldTime;
use flipbook::systems::playback::playback_system;
use flipbook::systems::sprite::sprite_apply_system;
use flipbook::systems::time::update_world_time;

use palette::Srgba;

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

const MANIFEST: &str = r#"{
    "sheets": {
        "walk": {
            "image": "hero_walk", "image_width": 384, "image_height": 64,
            "columns": 6, "rows": 1, "frame_duration": 0.12
        },
        "blink": {
            "image": "hero_blink", "image_width": 128, "image_height": 64,
            "frame_width": 64, "frame_height": 64,
            "looping": false, "direction": "ping_pong",
            "glow": [255, 215, 64, 255]
        }
    }
}"#;

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime {
        elapsed: 0.0,
        delta: 0.0,
        time_scale: 1.0,
        frame_count: 0,
    });
    let mut store = SheetStore::default();
    store
        .load_manifest(MANIFEST)
        .expect("manifest should parse");
    world.insert_resource(store);
    world
}

fn tick_playback(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems((playback_system::<String>, sprite_apply_system::<String>).chain());
    schedule.run(world);
}

#[test]
fn manifest_sheets_drive_entities_end_to_end() {
    let mut world = make_world();

    let mut controller = world
        .resource::<SheetStore>()
        .controller(["walk"])
        .unwrap();
    controller.play("walk".to_string());
    let entity = world.spawn((controller, Sprite::new("hero_walk"))).id();

    update_world_time(&mut world, 0.12);
    tick_playback(&mut world);

    let controller = world.get::<SpriteController<String>>(entity).unwrap();
    let sprite = world.get::<Sprite>(entity).unwrap();
    assert_eq!(controller.frame(), 1);
    assert_eq!(&*sprite.tex_key, "hero_walk");
    assert!(approx_eq(sprite.src.x, 64.0));
    assert!(approx_eq(sprite.src.height, 64.0));
}

#[test]
fn ping_pong_sheet_hands_off_queue_at_origin() {
    let mut world = make_world();

    let mut controller = world
        .resource::<SheetStore>()
        .controller(["blink", "walk"])
        .unwrap();
    controller.play("blink".to_string());
    controller.add_to_queue("walk".to_string());
    let entity = world.spawn((controller, Sprite::new("hero_blink"))).id();

    // out to the turnaround frame
    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);
    let controller = world.get::<SpriteController<String>>(entity).unwrap();
    assert_eq!(controller.current_animation().map(String::as_str), Some("blink"));
    assert_eq!(controller.frame(), 1);

    // and back to the origin, where the queued animation takes over
    update_world_time(&mut world, 0.1);
    tick_playback(&mut world);
    let controller = world.get::<SpriteController<String>>(entity).unwrap();
    let sprite = world.get::<Sprite>(entity).unwrap();
    assert_eq!(controller.current_animation().map(String::as_str), Some("walk"));
    assert!(controller.is_playing());
    assert_eq!(&*sprite.tex_key, "hero_walk");
}

#[test]
fn store_shares_sheets_across_controllers() {
    let mut world = make_world();

    for _ in 0..2 {
        let mut controller = world
            .resource::<SheetStore>()
            .controller(["walk"])
            .unwrap();
        controller.play("walk".to_string());
        world.spawn((controller, Sprite::new("hero_walk")));
    }

    // one owner in the store plus one clone per controller
    let store = world.resource::<SheetStore>();
    assert_eq!(Arc::strong_count(store.get("walk").unwrap()), 3);

    update_world_time(&mut world, 0.12);
    tick_playback(&mut world);

    let mut query = world.query::<&SpriteController<String>>();
    for controller in query.iter(&world) {
        assert_eq!(controller.frame(), 1);
    }
}

#[test]
fn manifest_glow_reaches_sprite() {
    let mut world = make_world();

    let mut controller = world
        .resource::<SheetStore>()
        .controller(["blink"])
        .unwrap();
    controller.play("blink".to_string());
    let entity = world.spawn((controller, Sprite::new("hero_blink"))).id();

    tick_playback(&mut world);

    let sprite = world.get::<Sprite>(entity).unwrap();
    assert_eq!(sprite.glow, Some(Srgba::new(255u8, 215, 64, 255)));
}

#[test]
fn config_step_feeds_world_time() {
    let mut world = make_world();
    let config = EngineConfig::default();

    let mut controller = world
        .resource::<SheetStore>()
        .controller(["walk"])
        .unwrap();
    controller.play("walk".to_string());
    let entity = world.spawn((controller, Sprite::new("hero_walk"))).id();

    for _ in 0..60 {
        update_world_time(&mut world, config.step());
        tick_playback(&mut world);
    }

    let time = world.resource::<WorldTime>();
    assert_eq!(time.frame_count, 60);
    assert!(approx_eq(time.elapsed, 1.0));

    // a whole second of 0.12s frames on a six frame loop
    let controller = world.get::<SpriteController<String>>(entity).unwrap();
    assert_eq!(controller.frame(), 8 % 6);
}
