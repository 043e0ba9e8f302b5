//! Level catalog, spawning, and delayed transitions.
//!
//! The catalog is the game's "scene list": an ordered set of level layouts,
//! compiled-in by default and overridable from `assets/levels.toml`. Each
//! layout describes the craft start position and the collidable surfaces —
//! every surface carries a [`SurfaceKind`], so classification is decided at
//! load time, not at the moment of contact.
//!
//! Transitions are one-shot: a [`PendingTransition`] resource holds the
//! target index and a timer; when the timer finishes the current level index
//! changes, the resource is consumed, and a [`LevelReload`] message triggers
//! despawn-and-respawn of all level content.

use crate::config::FlightConfig;
use crate::craft::SurfaceKind;
use crate::error::{LevelError, LevelResult};
use crate::oscillator::Oscillator;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use serde::Deserialize;

// ── Catalog data model ─────────────────────────────────────────────────────────

/// Oscillation parameters for a moving surface.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OscillationSpec {
    /// Peak displacement from the surface's rest position.
    pub displacement: [f32; 2],
    /// Full back-and-forth cycle time in seconds.
    pub period_secs: f32,
}

/// One collidable surface in a level layout.
#[derive(Debug, Clone, Deserialize)]
pub struct SurfaceSpec {
    pub kind: SurfaceKind,
    pub center: [f32; 2],
    pub half_extents: [f32; 2],
    #[serde(default)]
    pub oscillation: Option<OscillationSpec>,
}

/// A complete level: craft start position plus its surfaces.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    pub craft_start: [f32; 2],
    pub surfaces: Vec<SurfaceSpec>,
}

/// Ordered catalog of levels. Index 0 is where failed runs restart.
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelLayout>,
}

impl LevelCatalog {
    /// Number of levels in the catalog.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Layout at `index`, if it exists.
    pub fn level(&self, index: usize) -> Option<&LevelLayout> {
        self.levels.get(index)
    }

    /// The compiled-in catalog used when `assets/levels.toml` is absent or
    /// rejected.
    pub fn compiled_default() -> Self {
        let ground = |half_x: f32| SurfaceSpec {
            kind: SurfaceKind::Hazard,
            center: [0.0, -320.0],
            half_extents: [half_x, 20.0],
            oscillation: None,
        };
        Self {
            levels: vec![
                LevelLayout {
                    name: "Liftoff".to_string(),
                    craft_start: [-420.0, -250.0],
                    surfaces: vec![
                        SurfaceSpec {
                            kind: SurfaceKind::LaunchPad,
                            center: [-420.0, -280.0],
                            half_extents: [60.0, 12.0],
                            oscillation: None,
                        },
                        SurfaceSpec {
                            kind: SurfaceKind::GoalPad,
                            center: [420.0, -280.0],
                            half_extents: [60.0, 12.0],
                            oscillation: None,
                        },
                        ground(600.0),
                        SurfaceSpec {
                            kind: SurfaceKind::Hazard,
                            center: [0.0, -210.0],
                            half_extents: [25.0, 90.0],
                            oscillation: None,
                        },
                    ],
                },
                LevelLayout {
                    name: "The Gate".to_string(),
                    craft_start: [-420.0, -250.0],
                    surfaces: vec![
                        SurfaceSpec {
                            kind: SurfaceKind::LaunchPad,
                            center: [-420.0, -280.0],
                            half_extents: [60.0, 12.0],
                            oscillation: None,
                        },
                        SurfaceSpec {
                            kind: SurfaceKind::GoalPad,
                            center: [420.0, -80.0],
                            half_extents: [60.0, 12.0],
                            oscillation: None,
                        },
                        ground(600.0),
                        SurfaceSpec {
                            kind: SurfaceKind::Hazard,
                            center: [-120.0, -160.0],
                            half_extents: [20.0, 140.0],
                            oscillation: None,
                        },
                        SurfaceSpec {
                            kind: SurfaceKind::Hazard,
                            center: [140.0, -150.0],
                            half_extents: [70.0, 10.0],
                            oscillation: Some(OscillationSpec {
                                displacement: [0.0, 130.0],
                                period_secs: 3.0,
                            }),
                        },
                    ],
                },
                LevelLayout {
                    name: "Crosswinds".to_string(),
                    craft_start: [-420.0, -250.0],
                    surfaces: vec![
                        SurfaceSpec {
                            kind: SurfaceKind::LaunchPad,
                            center: [-420.0, -280.0],
                            half_extents: [60.0, 12.0],
                            oscillation: None,
                        },
                        SurfaceSpec {
                            kind: SurfaceKind::GoalPad,
                            center: [430.0, 200.0],
                            half_extents: [60.0, 12.0],
                            oscillation: None,
                        },
                        ground(600.0),
                        SurfaceSpec {
                            kind: SurfaceKind::Hazard,
                            center: [-40.0, -20.0],
                            half_extents: [80.0, 10.0],
                            oscillation: Some(OscillationSpec {
                                displacement: [170.0, 0.0],
                                period_secs: 4.0,
                            }),
                        },
                        SurfaceSpec {
                            kind: SurfaceKind::Hazard,
                            center: [220.0, 110.0],
                            half_extents: [80.0, 10.0],
                            oscillation: Some(OscillationSpec {
                                displacement: [-170.0, 0.0],
                                period_secs: 2.5,
                            }),
                        },
                    ],
                },
            ],
        }
    }

    /// Reject catalogs that describe an unplayable game.
    pub fn validate(&self) -> LevelResult<()> {
        if self.levels.is_empty() {
            return Err(LevelError::EmptyCatalog);
        }
        for (li, layout) in self.levels.iter().enumerate() {
            if !layout
                .surfaces
                .iter()
                .any(|s| s.kind == SurfaceKind::LaunchPad)
            {
                return Err(LevelError::MissingLaunchPad { level: li });
            }
            if !layout
                .surfaces
                .iter()
                .any(|s| s.kind == SurfaceKind::GoalPad)
            {
                return Err(LevelError::MissingGoalPad { level: li });
            }
            for (si, surface) in layout.surfaces.iter().enumerate() {
                if surface.half_extents[0] <= 0.0 || surface.half_extents[1] <= 0.0 {
                    return Err(LevelError::NonPositiveExtent {
                        level: li,
                        surface: si,
                    });
                }
                if let Some(osc) = surface.oscillation {
                    if osc.period_secs <= 0.0 {
                        return Err(LevelError::NonPositivePeriod {
                            level: li,
                            surface: si,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

// ── Runtime resources, components, messages ───────────────────────────────────

/// Index of the currently loaded level.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentLevel(pub usize);

/// Marker for every entity that belongs to the loaded level (surfaces and the
/// craft). A reload despawns exactly this set.
#[derive(Component)]
pub struct LevelEntity;

/// Collider footprint of a surface, kept for the mesh-attach system.
#[derive(Component, Debug, Clone, Copy)]
pub struct SurfaceShape {
    pub half_extents: Vec2,
}

/// Requests a despawn-and-respawn of all level content.
#[derive(Message, Debug, Clone, Copy)]
pub struct LevelReload;

/// One-shot scheduled level transition.
///
/// Inserted by the lifecycle state machine (or the debug skip key); consumed
/// by [`level_transition_system`] when the timer finishes. There is no
/// cancellation path, and the terminal state guard means a second insert
/// cannot happen during a craft lifetime.
#[derive(Resource, Debug)]
pub struct PendingTransition {
    pub target: usize,
    pub timer: Timer,
}

impl PendingTransition {
    /// Fire after `delay_secs` of real time.
    pub fn after(target: usize, delay_secs: f32) -> Self {
        Self {
            target,
            timer: Timer::from_seconds(delay_secs, TimerMode::Once),
        }
    }

    /// Fire on the next transition tick.
    pub fn immediate(target: usize) -> Self {
        Self::after(target, 0.0)
    }
}

/// Index of the level after `current`, wrapping past the end of the catalog.
///
/// Wrap-around (rather than stay-on-last) is the generalized behaviour: the
/// game loops forever over however many levels the catalog holds.
pub fn next_level_index(current: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (current + 1) % count
    }
}

// ── Startup systems ────────────────────────────────────────────────────────────

/// Startup system: attempt to load `assets/levels.toml` and replace the
/// compiled catalog with it. Parse or validation failures keep the compiled
/// catalog and log a warning — the game always has something playable.
pub fn load_level_catalog(mut catalog: ResMut<LevelCatalog>) {
    let path = "assets/levels.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<LevelCatalog>(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    info!("loaded {} levels from {path}", loaded.len());
                    *catalog = loaded;
                }
                Err(e) => warn!("rejected {path}: {e}; using compiled catalog"),
            },
            Err(e) => warn!("failed to parse {path}: {e}; using compiled catalog"),
        },
        Err(_) => {
            info!("no {path} found; using compiled catalog");
        }
    }
}

/// Startup system: spawn the starting level's content.
///
/// An out-of-range start index (e.g. from the `ASCENT_LEVEL` override) falls
/// back to level 0 with a warning.
pub fn initial_level_spawn(
    mut commands: Commands,
    catalog: Res<LevelCatalog>,
    mut current: ResMut<CurrentLevel>,
    config: Res<FlightConfig>,
) {
    if current.0 >= catalog.len() {
        warn!(
            "{}",
            LevelError::StartIndexOutOfRange {
                index: current.0,
                len: catalog.len(),
            }
        );
        current.0 = 0;
    }
    spawn_level_content(&mut commands, &catalog, current.0, &config);
}

// ── Update systems ─────────────────────────────────────────────────────────────

/// Tick the pending transition; when it finishes, advance the level index,
/// consume the resource (the callback fires exactly once), and request a
/// reload.
pub fn level_transition_system(
    time: Res<Time>,
    pending: Option<ResMut<PendingTransition>>,
    mut current: ResMut<CurrentLevel>,
    mut reloads: MessageWriter<LevelReload>,
    mut commands: Commands,
) {
    let Some(mut pending) = pending else {
        return;
    };
    pending.timer.tick(time.delta());
    if !pending.timer.finished() {
        return;
    }

    current.0 = pending.target;
    commands.remove_resource::<PendingTransition>();
    reloads.write(LevelReload);
    info!("loading level {}", current.0);
}

/// Despawn all level content and respawn it for the (new) current level.
pub fn reload_level_system(
    mut reloads: MessageReader<LevelReload>,
    mut commands: Commands,
    q_level: Query<Entity, With<LevelEntity>>,
    catalog: Res<LevelCatalog>,
    current: Res<CurrentLevel>,
    config: Res<FlightConfig>,
) {
    if reloads.is_empty() {
        return;
    }
    reloads.clear();

    for entity in q_level.iter() {
        commands.entity(entity).despawn();
    }
    spawn_level_content(&mut commands, &catalog, current.0, &config);
}

/// Spawn every surface of the layout plus a fresh craft.
///
/// Oscillating surfaces are kinematic bodies driven by [`Oscillator`]; static
/// ones are fixed colliders.
fn spawn_level_content(
    commands: &mut Commands,
    catalog: &LevelCatalog,
    index: usize,
    config: &FlightConfig,
) {
    let Some(layout) = catalog.level(index) else {
        return;
    };

    for spec in &layout.surfaces {
        let center = Vec2::from(spec.center);
        let half = Vec2::from(spec.half_extents);
        let mut surface = commands.spawn((
            spec.kind,
            SurfaceShape { half_extents: half },
            Collider::cuboid(half.x, half.y),
            Transform::from_translation(center.extend(0.0)),
            Visibility::default(),
            LevelEntity,
        ));
        match spec.oscillation {
            Some(osc) => {
                surface.insert((
                    RigidBody::KinematicPositionBased,
                    Oscillator {
                        origin: center,
                        displacement: Vec2::from(osc.displacement),
                        period_secs: osc.period_secs,
                    },
                ));
            }
            None => {
                surface.insert(RigidBody::Fixed);
            }
        }
    }

    crate::craft::spawn_craft(commands, Vec2::from(layout.craft_start), config);
    info!("level {index} \"{}\" spawned", layout.name);
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── next_level_index ──────────────────────────────────────────────────────

    #[test]
    fn next_index_advances_and_wraps() {
        assert_eq!(next_level_index(0, 3), 1);
        assert_eq!(next_level_index(1, 3), 2);
        assert_eq!(next_level_index(2, 3), 0, "last level wraps to the first");
    }

    #[test]
    fn next_index_degenerate_catalogs() {
        assert_eq!(next_level_index(0, 1), 0);
        assert_eq!(next_level_index(0, 0), 0);
    }

    // ── catalog validation ────────────────────────────────────────────────────

    #[test]
    fn compiled_catalog_validates() {
        assert!(LevelCatalog::compiled_default().validate().is_ok());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let catalog = LevelCatalog { levels: vec![] };
        assert!(matches!(
            catalog.validate(),
            Err(LevelError::EmptyCatalog)
        ));
    }

    #[test]
    fn level_without_goal_pad_is_rejected() {
        let mut catalog = LevelCatalog::compiled_default();
        catalog.levels[1]
            .surfaces
            .retain(|s| s.kind != SurfaceKind::GoalPad);
        assert!(matches!(
            catalog.validate(),
            Err(LevelError::MissingGoalPad { level: 1 })
        ));
    }

    #[test]
    fn zero_period_oscillation_is_rejected() {
        let mut catalog = LevelCatalog::compiled_default();
        catalog.levels[0].surfaces[2].oscillation = Some(OscillationSpec {
            displacement: [10.0, 0.0],
            period_secs: 0.0,
        });
        assert!(matches!(
            catalog.validate(),
            Err(LevelError::NonPositivePeriod { level: 0, surface: 2 })
        ));
    }

    #[test]
    fn unknown_surface_kind_fails_deserialization() {
        // The closed enum rejects tag typos at load time — a "bouncy" surface
        // cannot reach the collision handler misclassified.
        let toml_src = r#"
            [[levels]]
            name = "typo"
            craft_start = [0.0, 0.0]

            [[levels.surfaces]]
            kind = "bouncy"
            center = [0.0, 0.0]
            half_extents = [10.0, 10.0]
        "#;
        assert!(toml::from_str::<LevelCatalog>(toml_src).is_err());
    }

    #[test]
    fn catalog_round_trips_through_toml() {
        let toml_src = r#"
            [[levels]]
            name = "one hop"
            craft_start = [-100.0, 0.0]

            [[levels.surfaces]]
            kind = "launch_pad"
            center = [-100.0, -20.0]
            half_extents = [30.0, 8.0]

            [[levels.surfaces]]
            kind = "goal_pad"
            center = [100.0, -20.0]
            half_extents = [30.0, 8.0]

            [[levels.surfaces]]
            kind = "hazard"
            center = [0.0, 50.0]
            half_extents = [40.0, 8.0]
            oscillation = { displacement = [0.0, 60.0], period_secs = 2.0 }
        "#;
        let catalog: LevelCatalog = toml::from_str(toml_src).unwrap();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.len(), 1);
        let osc = catalog.levels[0].surfaces[2].oscillation.unwrap();
        assert_eq!(osc.period_secs, 2.0);
    }

    // ── transition timing ─────────────────────────────────────────────────────

    fn build_transition_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<LevelReload>();
        app.insert_resource(CurrentLevel(0));
        app.add_systems(Update, level_transition_system);
        app
    }

    #[test]
    fn finished_transition_fires_exactly_once() {
        let mut app = build_transition_app();
        app.insert_resource(PendingTransition::immediate(2));

        app.update();
        assert_eq!(app.world().resource::<CurrentLevel>().0, 2);
        assert!(
            app.world().get_resource::<PendingTransition>().is_none(),
            "the one-shot callback must be consumed on firing"
        );
        assert_eq!(app.world().resource::<Messages<LevelReload>>().len(), 1);

        app.update();
        assert_eq!(app.world().resource::<CurrentLevel>().0, 2);
    }

    #[test]
    fn unelapsed_delay_does_not_fire() {
        let mut app = build_transition_app();
        app.insert_resource(PendingTransition::after(1, 60.0));

        app.update();
        app.update();

        assert_eq!(app.world().resource::<CurrentLevel>().0, 0);
        assert!(app.world().get_resource::<PendingTransition>().is_some());
    }
}
