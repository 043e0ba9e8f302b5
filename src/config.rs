//! Runtime flight configuration loaded from `assets/flight.toml`.
//!
//! [`FlightConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`]. At startup, [`load_flight_config`] reads
//! `assets/flight.toml` and overwrites the defaults with any values present in
//! the file. Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<FlightConfig>` to any system parameter list and read
//! values with `config.main_thrust`, `config.level_load_delay`, etc.

use crate::constants::*;
use crate::error::{validate_level_load_delay, validate_main_thrust};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable flight and gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`. Override any subset by setting the value in
/// `assets/flight.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    // ── Gravity ──────────────────────────────────────────────────────────────
    pub gravity_accel: f32,

    // ── Craft: Thrust & Steering ─────────────────────────────────────────────
    pub main_thrust: f32,
    pub rcs_thrust: f32,
    pub craft_linear_damping: f32,
    pub craft_angular_damping: f32,
    pub craft_collider_half_x: f32,
    pub craft_collider_half_y: f32,
    pub craft_restitution: f32,

    // ── Lifecycle ────────────────────────────────────────────────────────────
    pub level_load_delay: f32,

    // ── Exhaust plume ────────────────────────────────────────────────────────
    pub exhaust_particles_per_frame: u32,
    pub exhaust_tail_offset: f32,

    // ── HUD ──────────────────────────────────────────────────────────────────
    pub hud_font_size: f32,
    pub banner_font_size: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            // Gravity
            gravity_accel: GRAVITY_ACCEL,
            // Thrust & Steering
            main_thrust: MAIN_THRUST,
            rcs_thrust: RCS_THRUST,
            craft_linear_damping: CRAFT_LINEAR_DAMPING,
            craft_angular_damping: CRAFT_ANGULAR_DAMPING,
            craft_collider_half_x: CRAFT_COLLIDER_HALF_X,
            craft_collider_half_y: CRAFT_COLLIDER_HALF_Y,
            craft_restitution: CRAFT_RESTITUTION,
            // Lifecycle
            level_load_delay: LEVEL_LOAD_DELAY,
            // Exhaust
            exhaust_particles_per_frame: EXHAUST_PARTICLES_PER_FRAME,
            exhaust_tail_offset: EXHAUST_TAIL_OFFSET,
            // HUD
            hud_font_size: HUD_FONT_SIZE,
            banner_font_size: BANNER_FONT_SIZE,
        }
    }
}

/// Startup system: attempt to load `assets/flight.toml` and overwrite the
/// `FlightConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults. TOML parse errors and unsafe
/// values are logged but do not abort the game. A missing file is silently
/// ignored (defaults are already in place from `insert_resource`).
pub fn load_flight_config(mut config: ResMut<FlightConfig>) {
    let path = "assets/flight.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<FlightConfig>(&contents) {
            Ok(loaded) => {
                if let Err(e) = validate_main_thrust(loaded.main_thrust)
                    .and_then(|_| validate_level_load_delay(loaded.level_load_delay))
                {
                    warn!("rejected {path}: {e}; using defaults");
                    return;
                }
                *config = loaded;
                info!("loaded flight config from {path}");
            }
            Err(e) => {
                warn!("failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            info!("no {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = FlightConfig::default();
        assert_eq!(config.main_thrust, MAIN_THRUST);
        assert_eq!(config.rcs_thrust, RCS_THRUST);
        assert_eq!(config.level_load_delay, LEVEL_LOAD_DELAY);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let loaded: FlightConfig = toml::from_str("main_thrust = 95000.0").unwrap();
        assert_eq!(loaded.main_thrust, 95_000.0);
        assert_eq!(loaded.rcs_thrust, RCS_THRUST);
        assert_eq!(loaded.gravity_accel, GRAVITY_ACCEL);
    }

    #[test]
    fn defaults_pass_validation() {
        let config = FlightConfig::default();
        assert!(validate_main_thrust(config.main_thrust).is_ok());
        assert!(validate_level_load_delay(config.level_load_delay).is_ok());
    }
}
