use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sprandcli::catalog::{
    CatalogGateway, CreatedPlaylist, GatewayError, PlaylistTrackEntry, TrackDetail,
};
use sprandcli::generator::{
    GenerateError, GenerationRequest, Generator, GeneratorConfig, Progress, aggregate,
};

/// Remote calls with side effects, recorded in invocation order.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreatePlaylist(String),
    AddTracks(String, Vec<String>),
    SetShuffle(String, bool),
    SetRepeatContext(String),
    StartPlayback(String, String),
}

/// In-memory catalog. Lookups that have no fixture answer with NotFound,
/// which the engine treats like any other transient failure.
#[derive(Clone, Default)]
struct MockGateway {
    playlists: HashMap<String, Vec<PlaylistTrackEntry>>,
    tracks: HashMap<String, TrackDetail>,
    devices: Vec<String>,
    fail_create: bool,
    fail_add: bool,
    fail_playback: bool,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockGateway {
    fn with_playlist(mut self, id: &str, entries: Vec<PlaylistTrackEntry>) -> Self {
        self.playlists.insert(id.to_string(), entries);
        self
    }

    fn with_track(mut self, id: &str, detail: TrackDetail) -> Self {
        self.tracks.insert(id.to_string(), detail);
        self
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn recorded(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogGateway for MockGateway {
    async fn playlist_track_entries(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistTrackEntry>, GatewayError> {
        self.playlists
            .get(playlist_id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn track(&self, track_id: &str) -> Result<TrackDetail, GatewayError> {
        self.tracks
            .get(track_id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn album_track_ids(&self, _album_id: &str) -> Result<Vec<String>, GatewayError> {
        Err(GatewayError::NotFound)
    }

    async fn artist_top_track_ids(
        &self,
        _artist_id: &str,
        _market: &str,
    ) -> Result<Vec<String>, GatewayError> {
        Err(GatewayError::NotFound)
    }

    async fn artist_album_ids(
        &self,
        _artist_id: &str,
        _market: &str,
    ) -> Result<Vec<String>, GatewayError> {
        Err(GatewayError::NotFound)
    }

    async fn create_playlist(&self, name: &str) -> Result<CreatedPlaylist, GatewayError> {
        self.record(Call::CreatePlaylist(name.to_string()));
        if self.fail_create {
            return Err(GatewayError::Api(403));
        }
        Ok(CreatedPlaylist {
            id: "PL1".to_string(),
            url: "https://open.spotify.com/playlist/PL1".to_string(),
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), GatewayError> {
        self.record(Call::AddTracks(playlist_id.to_string(), track_ids.to_vec()));
        if self.fail_add {
            return Err(GatewayError::Api(500));
        }
        Ok(())
    }

    async fn playback_device_ids(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.devices.clone())
    }

    async fn set_shuffle(&self, device_id: &str, state: bool) -> Result<(), GatewayError> {
        self.record(Call::SetShuffle(device_id.to_string(), state));
        Ok(())
    }

    async fn set_repeat_context(&self, device_id: &str) -> Result<(), GatewayError> {
        self.record(Call::SetRepeatContext(device_id.to_string()));
        Ok(())
    }

    async fn start_playback(
        &self,
        device_id: &str,
        context_uri: &str,
    ) -> Result<(), GatewayError> {
        self.record(Call::StartPlayback(
            device_id.to_string(),
            context_uri.to_string(),
        ));
        if self.fail_playback {
            return Err(GatewayError::Api(404));
        }
        Ok(())
    }
}

fn entry(id: &str) -> PlaylistTrackEntry {
    PlaylistTrackEntry {
        id: Some(id.to_string()),
        is_local: false,
    }
}

fn local_entry() -> PlaylistTrackEntry {
    PlaylistTrackEntry {
        id: None,
        is_local: true,
    }
}

/// A track with no album and no artists: every non-pool strategy falls back
/// to the seed, keeping candidates inside the source pool.
fn detail(name: &str, markets: &[&str]) -> TrackDetail {
    TrackDetail {
        name: name.to_string(),
        artists: Vec::new(),
        album_id: None,
        available_markets: markets.iter().map(|m| m.to_string()).collect(),
    }
}

fn request(sources: &[&str], songs: u32) -> GenerationRequest {
    GenerationRequest {
        source_playlist_ids: sources.iter().map(|s| s.to_string()).collect(),
        song_count: songs,
        exclude_reference: false,
        autoplay: false,
    }
}

fn config(references: &[&str]) -> GeneratorConfig {
    GeneratorConfig {
        reference_playlist_ids: references.iter().map(|s| s.to_string()).collect(),
        ..GeneratorConfig::default()
    }
}

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_gather_skips_unusable_entries_and_bad_playlists() {
    let gateway = MockGateway::default().with_playlist(
        "good",
        vec![entry("a"), local_entry(), entry("b")],
    );

    let events: Mutex<Vec<(u32, u32)>> = Mutex::new(Vec::new());
    let cb = |completed: u32, total: u32| events.lock().unwrap().push((completed, total));
    let mut progress = Progress::new(&cb, 2);

    let pool = aggregate::gather(&gateway, &ids(&["good", "missing"]), &mut progress).await;

    // Local files and entries without ids are dropped; the missing playlist
    // contributes nothing but still counts as a unit of work
    assert_eq!(pool, vec!["a", "b"]);
    assert_eq!(*events.lock().unwrap(), vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_build_exclusion_set_disabled_is_empty_and_free() {
    let gateway =
        MockGateway::default().with_playlist("ref", vec![entry("a"), entry("b")]);

    let events: Mutex<Vec<(u32, u32)>> = Mutex::new(Vec::new());
    let cb = |completed: u32, total: u32| events.lock().unwrap().push((completed, total));
    let mut progress = Progress::new(&cb, 1);

    let set = aggregate::build_exclusion_set(&gateway, false, &ids(&["ref"]), &mut progress).await;

    assert!(set.is_empty());
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_build_exclusion_set_deduplicates() {
    let gateway = MockGateway::default()
        .with_playlist("r1", vec![entry("a"), entry("b")])
        .with_playlist("r2", vec![entry("b"), entry("c")]);

    let cb = |_: u32, _: u32| {};
    let mut progress = Progress::new(&cb, 2);

    let set = aggregate::build_exclusion_set(
        &gateway,
        true,
        &ids(&["r1", "r2"]),
        &mut progress,
    )
    .await;

    let expected: HashSet<String> = ids(&["a", "b", "c"]).into_iter().collect();
    assert_eq!(set, expected);
}

#[tokio::test]
async fn test_generate_empty_source_fails_fast() {
    let gateway = MockGateway::default().with_playlist("src", vec![local_entry()]);
    let generator = Generator::new(gateway.clone(), config(&[]));

    let result = generator.generate(&request(&["src"], 5), |_, _| {}).await;

    assert!(matches!(result, Err(GenerateError::EmptySource)));
    assert!(gateway.recorded().is_empty());
}

#[tokio::test]
async fn test_generate_fills_exact_count_from_pool() {
    let gateway = MockGateway::default()
        .with_playlist("src", vec![entry("t1"), entry("t2"), entry("t3")])
        .with_track("t1", detail("One", &["US", "DE"]))
        .with_track("t2", detail("Two", &["US"]))
        .with_track("t3", detail("Three", &["US"]));
    let generator = Generator::new(gateway.clone(), config(&[]));

    let result = generator.generate(&request(&["src"], 3), |_, _| {}).await;

    let playlist = result.expect("generation should succeed");
    assert_eq!(playlist.id, "PL1");
    assert_eq!(playlist.url, "https://open.spotify.com/playlist/PL1");

    let calls = gateway.recorded();
    let added = calls
        .iter()
        .find_map(|c| match c {
            Call::AddTracks(_, tracks) => Some(tracks.clone()),
            _ => None,
        })
        .expect("tracks should be added");

    // Exactly the requested count, every id from the source pool
    assert_eq!(added.len(), 3);
    let pool: HashSet<&str> = ["t1", "t2", "t3"].into_iter().collect();
    assert!(added.iter().all(|id| pool.contains(id.as_str())));
}

#[tokio::test]
async fn test_generate_rejects_unavailable_market() {
    // The only track is not playable in the configured market, so every
    // attempt for slot 1 is rejected until the budget runs out
    let gateway = MockGateway::default()
        .with_playlist("src", vec![entry("t1")])
        .with_track("t1", detail("One", &["DE", "FR"]));
    let generator = Generator::new(gateway.clone(), config(&[]));

    let result = generator.generate(&request(&["src"], 1), |_, _| {}).await;

    match result {
        Err(GenerateError::InsufficientTracks { slot, attempts }) => {
            assert_eq!(slot, 1);
            assert_eq!(attempts, 30);
        }
        other => panic!("expected InsufficientTracks, got {:?}", other),
    }

    // No playlist may exist after a failed run
    assert!(
        !gateway
            .recorded()
            .iter()
            .any(|c| matches!(c, Call::CreatePlaylist(_)))
    );
}

#[tokio::test]
async fn test_generate_exclusion_covering_pool_fails_without_playlist() {
    let gateway = MockGateway::default()
        .with_playlist("src", vec![entry("a"), entry("b")])
        .with_playlist("ref", vec![entry("a"), entry("b")])
        .with_track("a", detail("A", &["US"]))
        .with_track("b", detail("B", &["US"]));
    let generator = Generator::new(gateway.clone(), config(&["ref"]));

    let mut req = request(&["src"], 2);
    req.exclude_reference = true;

    let result = generator.generate(&req, |_, _| {}).await;

    assert!(matches!(
        result,
        Err(GenerateError::InsufficientTracks { slot: 1, .. })
    ));
    assert!(
        !gateway
            .recorded()
            .iter()
            .any(|c| matches!(c, Call::CreatePlaylist(_)))
    );
}

#[tokio::test]
async fn test_generate_excluded_tracks_never_selected() {
    let gateway = MockGateway::default()
        .with_playlist("src", vec![entry("a"), entry("b"), entry("c"), entry("d")])
        .with_playlist("ref", vec![entry("a"), entry("b")])
        .with_track("a", detail("A", &["US"]))
        .with_track("b", detail("B", &["US"]))
        .with_track("c", detail("C", &["US"]))
        .with_track("d", detail("D", &["US"]));
    let generator = Generator::new(gateway.clone(), config(&["ref"]));

    let mut req = request(&["src"], 2);
    req.exclude_reference = true;

    generator
        .generate(&req, |_, _| {})
        .await
        .expect("generation should succeed");

    let added = gateway
        .recorded()
        .iter()
        .find_map(|c| match c {
            Call::AddTracks(_, tracks) => Some(tracks.clone()),
            _ => None,
        })
        .expect("tracks should be added");

    assert_eq!(added.len(), 2);
    assert!(added.iter().all(|id| id == "c" || id == "d"));
}

#[tokio::test]
async fn test_generate_progress_is_strictly_increasing_with_fixed_total() {
    let gateway = MockGateway::default()
        .with_playlist("p1", vec![entry("t1"), entry("t2")])
        .with_playlist("p2", vec![entry("t3")])
        .with_track("t1", detail("One", &["US"]))
        .with_track("t2", detail("Two", &["US"]))
        .with_track("t3", detail("Three", &["US"]));
    let generator = Generator::new(gateway, config(&[]));

    let events: Mutex<Vec<(u32, u32)>> = Mutex::new(Vec::new());
    generator
        .generate(&request(&["p1", "p2"], 5), |completed, total| {
            events.lock().unwrap().push((completed, total))
        })
        .await
        .expect("generation should succeed");

    // 2 source playlists + 5 songs, exclusion disabled
    let events = events.into_inner().unwrap();
    assert_eq!(events.len(), 7);
    for (i, (completed, total)) in events.iter().enumerate() {
        assert_eq!(*completed, i as u32 + 1);
        assert_eq!(*total, 7);
    }
}

#[tokio::test]
async fn test_generate_playlist_creation_failure_propagates() {
    let mut gateway = MockGateway::default()
        .with_playlist("src", vec![entry("t1")])
        .with_track("t1", detail("One", &["US"]));
    gateway.fail_create = true;
    let generator = Generator::new(gateway, config(&[]));

    let result = generator.generate(&request(&["src"], 1), |_, _| {}).await;

    assert!(matches!(result, Err(GenerateError::PlaylistCreation(_))));
}

#[tokio::test]
async fn test_generate_population_failure_propagates() {
    let mut gateway = MockGateway::default()
        .with_playlist("src", vec![entry("t1")])
        .with_track("t1", detail("One", &["US"]));
    gateway.fail_add = true;
    let generator = Generator::new(gateway.clone(), config(&[]));

    let result = generator.generate(&request(&["src"], 1), |_, _| {}).await;

    assert!(matches!(result, Err(GenerateError::PlaylistCreation(_))));

    // The empty playlist was created before population failed
    assert!(
        gateway
            .recorded()
            .iter()
            .any(|c| matches!(c, Call::CreatePlaylist(_)))
    );
}

#[tokio::test]
async fn test_generate_single_track_name_uses_unknown_second_title() {
    let gateway = MockGateway::default()
        .with_playlist("src", vec![entry("t1")])
        .with_track("t1", detail("Solo (Edit)", &["US"]));
    let generator = Generator::new(gateway.clone(), config(&[]));

    generator
        .generate(&request(&["src"], 1), |_, _| {})
        .await
        .expect("generation should succeed");

    let created = gateway
        .recorded()
        .iter()
        .find_map(|c| match c {
            Call::CreatePlaylist(name) => Some(name.clone()),
            _ => None,
        })
        .expect("playlist should be created");

    assert_eq!(created, "Solo Unknown");
}

#[tokio::test]
async fn test_generate_autoplay_runs_playback_sequence() {
    let mut gateway = MockGateway::default()
        .with_playlist("src", vec![entry("t1")])
        .with_track("t1", detail("One", &["US"]));
    gateway.devices = vec!["dev1".to_string()];
    let generator = Generator::new(gateway.clone(), config(&[]));

    let mut req = request(&["src"], 1);
    req.autoplay = true;

    generator
        .generate(&req, |_, _| {})
        .await
        .expect("generation should succeed");

    let calls = gateway.recorded();
    let playback: Vec<&Call> = calls
        .iter()
        .filter(|c| {
            matches!(
                c,
                Call::SetShuffle(..) | Call::SetRepeatContext(_) | Call::StartPlayback(..)
            )
        })
        .collect();

    // Shuffle off, context repeat, then playback of the new playlist
    assert_eq!(
        playback,
        vec![
            &Call::SetShuffle("dev1".to_string(), false),
            &Call::SetRepeatContext("dev1".to_string()),
            &Call::StartPlayback("dev1".to_string(), "spotify:playlist:PL1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_generate_autoplay_without_devices_still_succeeds() {
    let gateway = MockGateway::default()
        .with_playlist("src", vec![entry("t1")])
        .with_track("t1", detail("One", &["US"]));
    let generator = Generator::new(gateway.clone(), config(&[]));

    let mut req = request(&["src"], 1);
    req.autoplay = true;

    let playlist = generator
        .generate(&req, |_, _| {})
        .await
        .expect("autoplay failure must not fail the run");
    assert_eq!(playlist.id, "PL1");

    assert!(
        !gateway
            .recorded()
            .iter()
            .any(|c| matches!(c, Call::StartPlayback(..)))
    );
}

#[tokio::test]
async fn test_generate_autoplay_failure_is_swallowed() {
    let mut gateway = MockGateway::default()
        .with_playlist("src", vec![entry("t1")])
        .with_track("t1", detail("One", &["US"]));
    gateway.devices = vec!["dev1".to_string()];
    gateway.fail_playback = true;
    let generator = Generator::new(gateway, config(&[]));

    let mut req = request(&["src"], 1);
    req.autoplay = true;

    let playlist = generator
        .generate(&req, |_, _| {})
        .await
        .expect("autoplay failure must not fail the run");
    assert_eq!(playlist.id, "PL1");
}
