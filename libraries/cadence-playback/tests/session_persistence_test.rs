//! Session persistence across reloads
//!
//! A "reload" is a fresh `Player` built over a copy of the storage the first
//! one wrote to.

use std::sync::Arc;

use cadence_core::{Catalog, PersistenceGateway, Track, TrackId, View};
use cadence_playback::{
    Command, HeadlessSink, PlaybackStatus, Player, PlayerConfig, SessionSnapshot, SinkRegistry,
};
use cadence_storage::{keys, JsonFileGateway, MemoryGateway};

fn catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::new(
            (1..=6)
                .map(|n| Track::new(format!("m{n}"), format!("Song {n}"), format!("Artist {n}")))
                .collect(),
        )
        .unwrap(),
    )
}

fn sinks(catalog: &Catalog) -> (SinkRegistry, Vec<HeadlessSink>) {
    let mut registry = SinkRegistry::new();
    let mut handles = Vec::new();
    for track in catalog.iter() {
        let sink = HeadlessSink::new(track.id.clone(), 240.0);
        handles.push(sink.clone());
        registry.insert(track.id.clone(), Box::new(sink));
    }
    (registry, handles)
}

fn player_over(gateway: impl PersistenceGateway + 'static) -> (Player, Vec<HeadlessSink>) {
    let catalog = catalog();
    let (registry, handles) = sinks(&catalog);
    let player = Player::new(catalog, registry, Box::new(gateway), PlayerConfig::default());
    (player, handles)
}

fn saved(storage: &mut MemoryGateway, snapshot: &SessionSnapshot) {
    snapshot.save(storage, keys::SESSION_STATE).unwrap();
}

#[test]
fn fresh_storage_starts_idle_with_defaults() {
    let (player, _) = player_over(MemoryGateway::new());
    let state = player.state();

    assert_eq!(state.status(), PlaybackStatus::Idle);
    assert_eq!(state.volume, 0.8);
    assert_eq!(state.current_view, View::Home);
    assert_eq!(state.active_playlist.len(), 6);
}

#[test]
fn saved_session_round_trips_without_autoplay() {
    let mut storage = MemoryGateway::new();
    saved(
        &mut storage,
        &SessionSnapshot {
            current_track_id: Some(TrackId::new("m3")),
            is_playing: true,
            volume: 0.4,
            is_shuffle: true,
            is_repeat: false,
            current_time: 42.0,
            current_view: View::Home,
        },
    );

    let (player, handles) = player_over(storage);
    let state = player.state();

    assert_eq!(state.current_track_id, Some(TrackId::new("m3")));
    assert_eq!(state.volume, 0.4);
    assert!(state.is_shuffle);
    assert!(!state.is_repeat);
    assert!(!state.is_playing);
    assert_eq!(state.status(), PlaybackStatus::Loaded);
    assert_eq!(state.active_index, Some(2));
    assert_eq!(player.progress().position, 42.0);
    assert!(handles.iter().all(|sink| sink.play_calls() == 0));
    assert!(handles.iter().all(|sink| sink.volume() == 0.4));
}

#[test]
fn unload_then_reload_restores_position_and_view() {
    let mut storage = MemoryGateway::new();
    storage
        .set(keys::LIKED_TRACKS, r#"{"likedTrackIds":["m2","m5"]}"#)
        .unwrap();

    let catalog = catalog();
    let (registry, handles) = sinks(&catalog);
    let mut player = Player::new(
        catalog,
        registry,
        Box::new(storage.clone()),
        PlayerConfig::default(),
    );
    assert!(player.is_liked(&TrackId::new("m5")));

    player.dispatch(Command::SetView(View::Liked)).unwrap();
    player.dispatch(Command::SelectTrack(TrackId::new("m5"))).unwrap();
    player.dispatch(Command::ToggleRepeat).unwrap();
    for event in handles[4].tick(30.0) {
        player.handle_sink_event(&event);
    }

    // Capture what the page would write on unload
    let snapshot = SessionSnapshot::capture(player.state(), player.progress().position);
    saved(&mut storage, &snapshot);

    let (reloaded, _) = player_over(storage);
    let state = reloaded.state();
    assert_eq!(state.current_view, View::Liked);
    assert_eq!(
        state.active_playlist,
        vec![TrackId::new("m2"), TrackId::new("m5")]
    );
    assert_eq!(state.current_track_id, Some(TrackId::new("m5")));
    assert_eq!(state.active_index, Some(1));
    assert!(state.is_repeat);
    assert!(!state.is_playing);
    assert_eq!(reloaded.progress().position, 30.0);
}

#[test]
fn malformed_snapshot_falls_back_to_defaults() {
    let mut storage = MemoryGateway::new();
    storage.set(keys::SESSION_STATE, "{not json").unwrap();

    let (player, _) = player_over(storage);
    assert_eq!(player.state().status(), PlaybackStatus::Idle);
    assert_eq!(player.state().volume, 0.8);
}

#[test]
fn snapshot_with_vanished_track_restores_the_rest() {
    let mut storage = MemoryGateway::new();
    saved(
        &mut storage,
        &SessionSnapshot {
            current_track_id: Some(TrackId::new("deleted")),
            volume: 0.2,
            is_repeat: true,
            ..SessionSnapshot::default()
        },
    );

    let (player, _) = player_over(storage);
    let state = player.state();
    assert!(state.current_track_id.is_none());
    assert_eq!(state.volume, 0.2);
    assert!(state.is_repeat);
}

#[test]
fn partial_snapshot_uses_field_defaults() {
    let mut storage = MemoryGateway::new();
    storage
        .set(keys::SESSION_STATE, r#"{"currentTrackId":"m1"}"#)
        .unwrap();

    let (player, _) = player_over(storage);
    let state = player.state();
    assert_eq!(state.current_track_id, Some(TrackId::new("m1")));
    assert_eq!(state.volume, 0.8);
    assert_eq!(state.current_view, View::Home);
}

#[test]
fn json_file_gateway_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let gateway = JsonFileGateway::open(&path).unwrap();
        let (mut player, _) = player_over(gateway);
        player.dispatch(Command::SelectTrack(TrackId::new("m4"))).unwrap();
        player.dispatch(Command::SetVolume(0.25)).unwrap();
        player.unload();
    }

    let gateway = JsonFileGateway::open(&path).unwrap();
    let (player, _) = player_over(gateway);
    assert_eq!(player.state().current_track_id, Some(TrackId::new("m4")));
    assert_eq!(player.state().volume, 0.25);
    assert!(!player.state().is_playing);
}
