//! Contact classification and the craft lifecycle state machine.
//!
//! Two stages, so the state machine never touches physics types directly:
//!
//! 1. [`surface_contact_system`] — translates raw Rapier collision events
//!    involving the craft into domain [`SurfaceContact`] messages carrying the
//!    other body's [`SurfaceKind`].
//! 2. [`lifecycle_system`] — consumes `SurfaceContact` and drives the
//!    Alive → {Dying, Transcending} transition, schedules the delayed level
//!    transition, and emits [`LifecycleOutcome`] for the effects systems.
//!
//! Most tests write `SurfaceContact` messages directly and exercise stage 2
//! alone; stage 1 is covered by feeding raw collision events through both.

use super::state::{CollisionGate, Craft, CraftState, LifecycleOutcome, SurfaceContact, SurfaceKind};
use crate::config::FlightConfig;
use crate::level::{next_level_index, CurrentLevel, LevelCatalog, PendingTransition};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Stage 1: physics → domain ─────────────────────────────────────────────────

/// Translate Rapier `CollisionEvent::Started` pairs involving the craft into
/// [`SurfaceContact`] messages.
///
/// Contacts between two non-craft bodies, and contacts with anything that
/// carries no [`SurfaceKind`] (e.g. loose particles), are ignored.
pub fn surface_contact_system(
    mut collisions: MessageReader<CollisionEvent>,
    mut contacts: MessageWriter<SurfaceContact>,
    q_craft: Query<(Entity, &Transform), With<Craft>>,
    q_surfaces: Query<&SurfaceKind>,
) {
    let Ok((craft_entity, craft_transform)) = q_craft.single() else {
        return;
    };

    for event in collisions.read() {
        let CollisionEvent::Started(e1, e2, _) = event else {
            continue;
        };
        let other = if *e1 == craft_entity {
            *e2
        } else if *e2 == craft_entity {
            *e1
        } else {
            continue;
        };
        if let Ok(kind) = q_surfaces.get(other) {
            contacts.write(SurfaceContact {
                kind: *kind,
                at: craft_transform.translation.truncate(),
            });
        }
    }
}

// ── Stage 2: the state machine ────────────────────────────────────────────────

/// Drive the craft lifecycle from classified contacts.
///
/// A contact is a no-op unless the craft is `Alive` and the collision gate is
/// enabled. Because the first terminal contact flips the state out of
/// `Alive`, every later contact — in the same frame or any other — falls
/// through the guard, which is what makes the terminal sequence exactly-once.
///
/// | Surface     | Effect                                                       |
/// |-------------|--------------------------------------------------------------|
/// | `LaunchPad` | none                                                         |
/// | `GoalPad`   | `Transcending`; schedule `(current + 1) % len` after delay   |
/// | `Hazard`    | `Dying`; schedule level 0 after delay                        |
pub fn lifecycle_system(
    mut contacts: MessageReader<SurfaceContact>,
    mut outcomes: MessageWriter<LifecycleOutcome>,
    mut commands: Commands,
    gate: Res<CollisionGate>,
    config: Res<FlightConfig>,
    current: Res<CurrentLevel>,
    catalog: Res<LevelCatalog>,
    mut q: Query<&mut CraftState, With<Craft>>,
) {
    let Ok(mut state) = q.single_mut() else {
        return;
    };

    for contact in contacts.read() {
        if !state.is_alive() || !gate.enabled {
            continue;
        }

        match contact.kind {
            SurfaceKind::LaunchPad => {}
            SurfaceKind::GoalPad => {
                *state = CraftState::Transcending;
                outcomes.write(LifecycleOutcome::Success { at: contact.at });
                commands.insert_resource(PendingTransition::after(
                    next_level_index(current.0, catalog.len()),
                    config.level_load_delay,
                ));
            }
            SurfaceKind::Hazard => {
                *state = CraftState::Dying;
                outcomes.write(LifecycleOutcome::Failure { at: contact.at });
                commands.insert_resource(PendingTransition::after(0, config.level_load_delay));
            }
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
