//! Craft audio: looping engine rumble and one-shot outcome sounds.
//!
//! The engine loop is a single persistent entity spawned at startup with a
//! paused looping sink; [`engine_audio_system`] unpauses it only on frames
//! where the craft is alive and thrusting. Outcome sounds are fire-and-forget
//! entities that despawn themselves when playback ends.

use super::state::{ControlIntent, Craft, CraftState, LifecycleOutcome};
use bevy::prelude::*;

/// Handles to the three craft sound assets.
#[derive(Resource, Default)]
pub struct CraftSounds {
    pub engine: Handle<AudioSource>,
    pub explosion: Handle<AudioSource>,
    pub fanfare: Handle<AudioSource>,
}

/// Marker for the persistent engine-loop audio entity.
#[derive(Component)]
pub struct EngineSound;

/// Load the craft sound assets at startup.
///
/// Must run before [`spawn_engine_loop`].
pub fn load_craft_sounds(mut sounds: ResMut<CraftSounds>, asset_server: Res<AssetServer>) {
    sounds.engine = asset_server.load("audio/engine_loop.ogg");
    sounds.explosion = asset_server.load("audio/explosion.ogg");
    sounds.fanfare = asset_server.load("audio/fanfare.ogg");
}

/// Spawn the engine-loop entity, paused until the first burn.
///
/// The entity survives level reloads; the sink's pause state is re-derived
/// every frame from craft state and intent.
pub fn spawn_engine_loop(mut commands: Commands, sounds: Res<CraftSounds>) {
    commands.spawn((
        EngineSound,
        AudioPlayer(sounds.engine.clone()),
        PlaybackSettings {
            paused: true,
            ..PlaybackSettings::LOOP
        },
    ));
}

/// Play the engine loop while the craft is alive and thrusting; pause it
/// otherwise. Also covers the terminal-state case: once the craft leaves
/// `Alive` the burn condition can never hold again this lifetime.
pub fn engine_audio_system(
    q_craft: Query<&CraftState, With<Craft>>,
    intent: Res<ControlIntent>,
    q_sink: Query<&AudioSink, With<EngineSound>>,
) {
    let Ok(sink) = q_sink.single() else {
        return; // sink not ready on the first frames after startup
    };
    let burning = matches!(q_craft.single(), Ok(state) if state.is_alive()) && intent.thrust;
    if burning {
        if sink.is_paused() {
            sink.play();
        }
    } else if !sink.is_paused() {
        sink.pause();
    }
}

/// React to terminal outcomes: silence the engine and play the one-shot
/// fanfare or explosion.
pub fn outcome_audio_system(
    mut outcomes: MessageReader<LifecycleOutcome>,
    sounds: Res<CraftSounds>,
    q_sink: Query<&AudioSink, With<EngineSound>>,
    mut commands: Commands,
) {
    for outcome in outcomes.read() {
        if let Ok(sink) = q_sink.single() {
            sink.pause();
        }
        let clip = match outcome {
            LifecycleOutcome::Success { .. } => sounds.fanfare.clone(),
            LifecycleOutcome::Failure { .. } => sounds.explosion.clone(),
        };
        commands.spawn((AudioPlayer(clip), PlaybackSettings::DESPAWN));
    }
}
