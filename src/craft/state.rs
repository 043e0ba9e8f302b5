//! Craft components, resources, and domain messages.
//!
//! All ECS state describing the craft lives here. Systems that mutate this
//! state are in the sibling modules:
//! - [`super::control`] — input + steering
//! - [`super::collision`] — contact classification + lifecycle transitions
//! - [`super::rendering`] — mesh, exhaust plume, camera
//! - [`super::audio`] — engine loop + outcome one-shots

use bevy::prelude::*;
use serde::Deserialize;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the player-controlled craft entity.
#[derive(Component)]
pub struct Craft;

/// Lifecycle phase of the craft.
///
/// Transitions are one-directional and terminal: `Alive` may move to `Dying`
/// or `Transcending` exactly once, and nothing ever leaves a terminal state.
/// The only writer is `super::collision::lifecycle_system`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CraftState {
    /// Under player control; input is interpreted and collisions matter.
    #[default]
    Alive,
    /// Crashed; waiting out the transition back to the first level.
    Dying,
    /// Reached the goal pad; waiting out the transition to the next level.
    Transcending,
}

impl CraftState {
    /// Returns `true` while the craft still responds to input and collisions.
    #[inline]
    pub fn is_alive(self) -> bool {
        self == CraftState::Alive
    }
}

/// Category of a collidable level surface.
///
/// A closed enum rather than a free-text tag: a typo in a level file fails
/// deserialization at load time instead of silently classifying a pad as a
/// hazard at the moment of contact.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// The pad the craft starts on; touching it is harmless.
    LaunchPad,
    /// The destination pad; touching it completes the level.
    GoalPad,
    /// Anything else — terrain, obstacles, moving platforms. Touching it is
    /// fatal.
    Hazard,
}

// ── Resources ──────────────────────────────────────────────────────────────────

/// Steering direction requested this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    /// Roll counter-clockwise (positive Z rotation).
    Left,
    /// Roll clockwise (negative Z rotation).
    Right,
}

/// Aggregated control intent for the current frame, derived from input.
///
/// The keyboard system writes to this resource each frame after it is
/// cleared. [`super::control::apply_intent_system`] reads it and applies the
/// corresponding force and steering. Tests populate this directly to drive
/// craft behaviour without a real input device.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct ControlIntent {
    /// Main engine held on this frame.
    pub thrust: bool,
    /// Active steering direction. `None` leaves angular velocity to the
    /// physics engine.
    pub steer: Option<Steer>,
}

/// Debug gate over collision handling.
///
/// While disabled, contacts are classified but never change craft state —
/// the development-build invulnerability toggle.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CollisionGate {
    pub enabled: bool,
}

impl Default for CollisionGate {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ── Messages ───────────────────────────────────────────────────────────────────

/// A classified physical contact between the craft and a level surface.
///
/// Written by `super::collision::surface_contact_system` from raw physics
/// collision events; consumed by the lifecycle state machine. Tests write
/// these directly to exercise the state machine without a physics world.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct SurfaceContact {
    pub kind: SurfaceKind,
    /// Craft position at the moment of contact, for effect placement.
    pub at: Vec2,
}

/// Terminal lifecycle outcome, emitted exactly once per craft lifetime.
///
/// Effects systems (audio, particles, banner) react to this; none of them
/// touch `CraftState` themselves.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum LifecycleOutcome {
    /// The craft reached the goal pad.
    Success { at: Vec2 },
    /// The craft hit a hazard.
    Failure { at: Vec2 },
}
