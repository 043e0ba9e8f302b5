//! Scene and HUD rendering: surface meshes, the pad-counter HUD, and the
//! outcome banner.
//!
//! ## Layer model
//!
//! | Layer            | Technology | Notes                                   |
//! |------------------|------------|-----------------------------------------|
//! | Surface fills    | `Mesh2d`   | attached once per surface on spawn      |
//! | Craft hull       | `Mesh2d`   | see `craft::rendering`                  |
//! | Exhaust/bursts   | `Mesh2d`   | see `particles`                         |
//! | Pad counter HUD  | Bevy UI    | top-left, always visible                |
//! | Outcome banner   | Bevy UI    | centred, set on outcome, cleared on reload |

use crate::config::FlightConfig;
use crate::craft::{LifecycleOutcome, SurfaceKind};
use crate::level::{CurrentLevel, LevelCatalog, LevelReload, SurfaceShape};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

// ── Component markers ─────────────────────────────────────────────────────────

/// Marker for the pad-counter HUD text.
#[derive(Component)]
pub struct HudLevelText;

/// Marker for the centred outcome banner text.
#[derive(Component)]
pub struct OutcomeBanner;

// ── Mesh helpers ──────────────────────────────────────────────────────────────

/// Build a filled mesh for the polygon `verts` using a triangle fan from the
/// first vertex. Intended for the small convex-ish silhouettes this game
/// draws; not a general tessellator.
pub fn filled_polygon_mesh(verts: &[Vec2]) -> Mesh {
    let positions: Vec<[f32; 3]> = verts.iter().map(|v| [v.x, v.y, 0.0]).collect();
    let normals: Vec<[f32; 3]> = verts.iter().map(|_| [0.0, 0.0, 1.0]).collect();
    let uvs: Vec<[f32; 2]> = verts.iter().map(|_| [0.5, 0.5]).collect();

    let mut indices: Vec<u32> = Vec::with_capacity((verts.len().saturating_sub(2)) * 3);
    for i in 1..verts.len().saturating_sub(1) as u32 {
        indices.extend_from_slice(&[0, i, i + 1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Axis-aligned rectangle mesh from half-extents.
fn rect_mesh(half: Vec2) -> Mesh {
    filled_polygon_mesh(&[
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ])
}

/// Fill colour per surface category.
fn surface_color(kind: SurfaceKind) -> Color {
    match kind {
        SurfaceKind::LaunchPad => Color::srgb(0.30, 0.42, 0.50),
        SurfaceKind::GoalPad => Color::srgb(0.88, 0.72, 0.18),
        SurfaceKind::Hazard => Color::srgb(0.48, 0.20, 0.16),
    }
}

/// Attach a filled rectangle `Mesh2d` to every newly-spawned surface.
///
/// Runs once per surface (via [`Added<SurfaceKind>`]), including respawns
/// after a level reload.
pub fn attach_surface_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &SurfaceKind, &SurfaceShape), Added<SurfaceKind>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, kind, shape) in query.iter() {
        let mesh_handle = meshes.add(rect_mesh(shape.half_extents));
        let mat_handle = materials.add(ColorMaterial::from_color(surface_color(*kind)));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh_handle), MeshMaterial2d(mat_handle)));
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Spawn the permanent top-left pad counter and the (initially empty) centred
/// outcome banner.
pub fn setup_hud(mut commands: Commands, config: Res<FlightConfig>) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Pad 1"),
                TextFont {
                    font_size: config.hud_font_size,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.88, 0.45)),
                HudLevelText,
            ));
        });

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            right: Val::Px(0.0),
            top: Val::Percent(38.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: config.banner_font_size,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.95, 0.95)),
                OutcomeBanner,
            ));
        });
}

/// Refresh the pad counter whenever the current level changes.
pub fn hud_level_system(
    current: Res<CurrentLevel>,
    catalog: Res<LevelCatalog>,
    mut q: Query<&mut Text, With<HudLevelText>>,
) {
    if !current.is_changed() && !catalog.is_changed() {
        return;
    }
    let Ok(mut text) = q.single_mut() else {
        return;
    };
    text.0 = format!("Pad {} / {}", current.0 + 1, catalog.len());
}

/// Show the outcome banner on terminal events and clear it on level reload.
pub fn banner_system(
    mut outcomes: MessageReader<LifecycleOutcome>,
    mut reloads: MessageReader<LevelReload>,
    mut q: Query<(&mut Text, &mut TextColor), With<OutcomeBanner>>,
) {
    let Ok((mut text, mut color)) = q.single_mut() else {
        return;
    };

    for outcome in outcomes.read() {
        match outcome {
            LifecycleOutcome::Success { .. } => {
                text.0 = "TOUCHDOWN CONFIRMED".to_string();
                color.0 = Color::srgb(0.90, 0.80, 0.30);
            }
            LifecycleOutcome::Failure { .. } => {
                text.0 = "CRAFT LOST".to_string();
                color.0 = Color::srgb(0.95, 0.35, 0.25);
            }
        }
    }

    if !reloads.is_empty() {
        reloads.clear();
        text.0.clear();
    }
}
