//! Sine-wave oscillation for moving platforms.
//!
//! Purely decorative motion driver: samples a half-sine factor from the
//! global clock each tick and repositions the platform between its origin and
//! `origin + displacement`. The platforms are kinematic Rapier bodies, so the
//! physics engine handles pushing the craft; this module never touches
//! velocities or forces.

use bevy::prelude::*;

/// Back-and-forth motion description for a kinematic platform.
///
/// Stateless beyond the spawn-time origin: position is a pure function of the
/// elapsed clock, so oscillators never drift and need no per-tick bookkeeping.
#[derive(Component, Debug, Clone, Copy)]
pub struct Oscillator {
    /// Rest position captured at spawn.
    pub origin: Vec2,
    /// Peak offset from the origin.
    pub displacement: Vec2,
    /// Full cycle time in seconds. Non-positive periods disable the
    /// oscillator rather than dividing by zero.
    pub period_secs: f32,
}

/// Position factor in `[0, 1]` for the given elapsed time and period:
/// 0.5 at the origin-phase start, peaking at 1 a quarter-period in.
fn movement_factor(elapsed_secs: f32, period_secs: f32) -> f32 {
    let cycles = elapsed_secs / period_secs;
    (cycles * std::f32::consts::TAU).sin() / 2.0 + 0.5
}

/// Reposition every oscillating platform from the global clock.
pub fn oscillator_system(time: Res<Time>, mut q: Query<(&Oscillator, &mut Transform)>) {
    for (osc, mut transform) in q.iter_mut() {
        if osc.period_secs <= f32::EPSILON {
            continue;
        }
        let target = osc.origin + osc.displacement * movement_factor(time.elapsed_secs(), osc.period_secs);
        transform.translation.x = target.x;
        transform.translation.y = target.y;
    }
}
