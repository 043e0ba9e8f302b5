//! Centralised flight and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! Every constant is mirrored by a field on [`crate::config::FlightConfig`],
//! which can override it at runtime from `assets/flight.toml`.

// ── Gravity ───────────────────────────────────────────────────────────────────

/// Downward gravitational acceleration applied to the craft (world units/s²).
///
/// Lower values make the game floatier and more forgiving; higher values
/// demand more aggressive throttle work. Tested range: 100.0–240.0.
pub const GRAVITY_ACCEL: f32 = 160.0;

// ── Craft: Thrust & Steering ──────────────────────────────────────────────────

/// Continuous main-engine force along the craft's local up axis.
///
/// Must comfortably exceed the craft's weight (collider mass × GRAVITY_ACCEL,
/// roughly 54 000 at the default collider size) or the craft can never leave
/// the pad. At 110 000 the craft lifts off at about 1 g of net acceleration.
pub const MAIN_THRUST: f32 = 110_000.0;

/// Manual steering rate (radians/second) while a rotation key is held.
///
/// The craft's angular velocity is zeroed on steering ticks, so this value is
/// the full observed roll rate. 4.0 rad/s is a touch over half a turn per
/// second; above ~6.0 precise pad landings become twitchy.
pub const RCS_THRUST: f32 = 4.0;

/// Linear damping on the craft body. Small but non-zero so residual drift
/// bleeds off between burns.
pub const CRAFT_LINEAR_DAMPING: f32 = 0.2;

/// Angular damping on the craft body; governs how fast collision-induced spin
/// decays once the player stops steering.
pub const CRAFT_ANGULAR_DAMPING: f32 = 1.2;

/// Craft collider half-extents (x, y). The visual mesh is slightly larger so
/// near-misses look honest.
pub const CRAFT_COLLIDER_HALF_X: f32 = 7.0;
pub const CRAFT_COLLIDER_HALF_Y: f32 = 12.0;

/// Restitution of the craft body. Kept low: pads should feel like landings,
/// not trampolines.
pub const CRAFT_RESTITUTION: f32 = 0.1;

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Seconds between a terminal event (crash or goal touchdown) and the level
/// transition it schedules. Long enough to read the outcome banner and watch
/// the burst effect finish.
pub const LEVEL_LOAD_DELAY: f32 = 2.0;

// ── Exhaust plume ─────────────────────────────────────────────────────────────

/// Particles emitted per frame while the main engine burns.
pub const EXHAUST_PARTICLES_PER_FRAME: u32 = 3;

/// Distance from the craft centre to the exhaust emission point, along the
/// local down axis. Should sit just behind the tail of the craft mesh.
pub const EXHAUST_TAIL_OFFSET: f32 = 14.0;

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Font size for the pad-counter HUD text.
pub const HUD_FONT_SIZE: f32 = 14.0;

/// Font size for the centred outcome banner.
pub const BANNER_FONT_SIZE: f32 = 28.0;
