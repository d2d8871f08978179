use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config, error,
    generator::{GenerationRequest, Generator, GeneratorConfig},
    info,
    spotify::SpotifyGateway,
    success, warning,
};

pub async fn generate(
    playlists: Vec<String>,
    featured: Option<usize>,
    songs: u32,
    exclude_reference: bool,
    play: bool,
) {
    let source_playlist_ids = resolve_sources(playlists, featured);
    if source_playlist_ids.is_empty() {
        error!(
            "No source playlists. Pass --playlist, pick one with --featured, or set SPOTIFY_REFERENCE_PLAYLISTS."
        );
    }

    let gateway = match SpotifyGateway::load().await {
        Ok(gateway) => gateway,
        Err(e) => {
            error!(
                "Failed to load token. Please run sprandcli auth\n Error: {}",
                e
            );
        }
    };

    let generator = Generator::new(
        gateway,
        GeneratorConfig {
            reference_playlist_ids: config::reference_playlists(),
            market: config::spotify_market(),
            ..GeneratorConfig::default()
        },
    );

    let request = GenerationRequest {
        source_playlist_ids,
        song_count: songs,
        exclude_reference,
        autoplay: play,
    };

    info!("Generating random playlist ({} songs)...", songs);

    // Length is corrected by the first progress callback; the engine knows
    // the real total, this layer does not.
    let pb = ProgressBar::new(songs as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message("Generating...");

    let progress = pb.clone();
    let handle = tokio::spawn(async move {
        generator
            .generate(&request, move |completed, total| {
                progress.set_length(total as u64);
                progress.set_position(completed as u64);
            })
            .await
    });

    let result = match handle.await {
        Ok(result) => result,
        Err(e) => {
            pb.finish_and_clear();
            error!("Task join error: {}", e);
        }
    };
    pb.finish_and_clear();

    match result {
        Ok(playlist) => {
            success!("Playlist created: {} ({})", playlist.name, playlist.url);
            open_playlist(&playlist.url, &playlist.id);
            if play {
                info!("Playback requested on your active device.");
            }
        }
        Err(e) => error!("{}", e),
    }
}

/// Explicit `--playlist` ids win, then the chosen featured playlist, then
/// the configured reference playlists as the default source group.
fn resolve_sources(playlists: Vec<String>, featured: Option<usize>) -> Vec<String> {
    if !playlists.is_empty() {
        return playlists;
    }

    if let Some(index) = featured {
        let featured_playlists = config::featured_playlists();
        match featured_playlists.get(index) {
            Some(fp) => return vec![fp.id.clone()],
            None => error!(
                "No featured playlist #{} ({} configured). Run sprandcli featured.",
                index,
                featured_playlists.len()
            ),
        }
    }

    config::reference_playlists()
}

fn open_playlist(url: &str, playlist_id: &str) {
    if webbrowser::open(url).is_err() {
        warning!("Failed to open playlist in browser: {}", url);
    }

    let desktop_uri = format!("spotify:playlist:{}", playlist_id);
    if let Err(e) = open_native_uri(&desktop_uri) {
        warning!("Failed to open Spotify app: {}", e);
    }
}

#[cfg(target_os = "macos")]
fn open_native_uri(uri: &str) -> std::io::Result<()> {
    std::process::Command::new("open").arg(uri).spawn().map(|_| ())
}

#[cfg(target_os = "windows")]
fn open_native_uri(uri: &str) -> std::io::Result<()> {
    std::process::Command::new("cmd")
        .args(["/C", "start", "", uri])
        .spawn()
        .map(|_| ())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_native_uri(uri: &str) -> std::io::Result<()> {
    std::process::Command::new("xdg-open")
        .arg(uri)
        .spawn()
        .map(|_| ())
}
