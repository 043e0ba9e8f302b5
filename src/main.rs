use ascent::config::{self, FlightConfig};
use ascent::craft::{self, CollisionGate, ControlIntent, CraftSounds, LifecycleOutcome, SurfaceContact};
use ascent::level::{self, CurrentLevel, LevelCatalog, LevelReload};
use ascent::{graphics, oscillator, particles, rendering};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use std::env;

/// Configure Rapier gravity from the flight config.
///
/// Must run after `load_flight_config` so a TOML override of `gravity_accel`
/// takes effect.
fn setup_gravity(mut q: Query<&mut RapierConfiguration>, config: Res<FlightConfig>) {
    for mut cfg in q.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -config.gravity_accel);
    }
}

fn main() {
    // Optional start-level override for quickly reaching a later pad.
    let start_level = env::var("ASCENT_LEVEL")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Ascent".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    // Compiled defaults; the startup loaders overwrite them from
    // assets/flight.toml and assets/levels.toml when present.
    .insert_resource(FlightConfig::default())
    .insert_resource(LevelCatalog::compiled_default())
    .insert_resource(CurrentLevel(start_level))
    .init_resource::<ControlIntent>()
    .init_resource::<CollisionGate>()
    .init_resource::<CraftSounds>()
    // pixels_per_meter(1.0) keeps world units identical to screen pixels;
    // larger values shrink collider mass quadratically and throw off the
    // thrust-to-weight tuning in constants.rs.
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
    .add_plugins(particles::ParticlesPlugin)
    .add_message::<SurfaceContact>()
    .add_message::<LifecycleOutcome>()
    .add_message::<LevelReload>()
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            config::load_flight_config,
            level::load_level_catalog,
            graphics::setup_camera,
            craft::load_craft_sounds,
            craft::spawn_engine_loop.after(craft::load_craft_sounds),
            setup_gravity.after(config::load_flight_config),
            rendering::setup_hud.after(config::load_flight_config),
            level::initial_level_spawn
                .after(config::load_flight_config)
                .after(level::load_level_catalog),
        ),
    )
    .add_systems(
        Update,
        (
            // Input pipeline: clear → read keys → apply → drive effects.
            (
                craft::intent_clear_system,
                craft::keyboard_intent_system,
                craft::apply_intent_system,
                craft::exhaust_emission_system,
                craft::engine_audio_system,
            )
                .chain(),
            // Lifecycle pipeline: classify contacts → state machine →
            // transition timer → reload.
            (
                craft::surface_contact_system,
                craft::lifecycle_system,
                level::level_transition_system,
                level::reload_level_system,
            )
                .chain(),
            craft::debug_keys_system.run_if(craft::debug_build),
            oscillator::oscillator_system,
            craft::outcome_audio_system,
            craft::outcome_burst_system,
            craft::attach_craft_mesh_system,
            rendering::attach_surface_mesh_system,
            rendering::hud_level_system,
            rendering::banner_system,
            craft::camera_follow_system,
        ),
    );

    app.run();
}
