//! Playlist assembly: naming, creation, population, and optional autoplay.

use rand::seq::IndexedRandom;

use crate::{
    catalog::CatalogGateway,
    info, utils, warning,
};

use super::{GenerateError, GeneratedPlaylist};

/// Turns a completed track list into a real playlist.
///
/// Creation and population are two separate remote calls with no atomicity
/// guarantee; when population fails, the empty playlist stays behind and the
/// run surfaces [`GenerateError::PlaylistCreation`]. Autoplay is best-effort
/// and never affects the result.
pub async fn assemble<G: CatalogGateway>(
    gateway: &G,
    final_tracks: &[String],
    autoplay: bool,
) -> Result<GeneratedPlaylist, GenerateError> {
    let name = derive_name(gateway, final_tracks).await;

    info!("Creating new playlist: {}", name);
    let created = gateway.create_playlist(&name).await?;
    gateway.add_tracks(&created.id, final_tracks).await?;
    info!("Created new playlist: {}", created.id);

    if autoplay {
        let context_uri = format!("spotify:playlist:{}", created.id);
        autoplay_on_first_device(gateway, &context_uri).await;
    }

    Ok(GeneratedPlaylist {
        id: created.id,
        name,
        url: created.url,
    })
}

/// Derives the playlist name from two sampled track titles.
///
/// Samples two distinct tracks when possible; a single-track list uses the
/// literal "Unknown" as the second title. Title lookups that fail default to
/// "Unknown Track", matching the aggregator's tolerance for vanished tracks.
async fn derive_name<G: CatalogGateway>(gateway: &G, final_tracks: &[String]) -> String {
    let sampled: Vec<&String> = final_tracks
        .choose_multiple(&mut rand::rng(), 2)
        .collect();

    let first_title = match sampled.first() {
        Some(id) => track_title(gateway, id).await,
        None => "Unknown Track".to_string(),
    };
    let second_title = match sampled.get(1) {
        Some(id) => track_title(gateway, id).await,
        None => "Unknown".to_string(),
    };

    utils::derive_playlist_name(&first_title, &second_title)
}

async fn track_title<G: CatalogGateway>(gateway: &G, track_id: &str) -> String {
    match gateway.track(track_id).await {
        Ok(detail) => detail.name,
        Err(_) => "Unknown Track".to_string(),
    }
}

/// Starts context playback of the new playlist on the first available
/// device, with shuffle off and context repeat on. Every failure here is
/// logged and swallowed.
async fn autoplay_on_first_device<G: CatalogGateway>(gateway: &G, context_uri: &str) {
    info!("Starting playlist playback...");

    let devices = match gateway.playback_device_ids().await {
        Ok(devices) => devices,
        Err(e) => {
            warning!("Failed to set playback: {}", e);
            return;
        }
    };

    let Some(device_id) = devices.first() else {
        warning!("No active Spotify devices found for playback.");
        return;
    };

    if let Err(e) = gateway.set_shuffle(device_id, false).await {
        warning!("Failed to set playback: {}", e);
        return;
    }
    if let Err(e) = gateway.set_repeat_context(device_id).await {
        warning!("Failed to set playback: {}", e);
        return;
    }
    if let Err(e) = gateway.start_playback(device_id, context_uri).await {
        warning!("Failed to set playback: {}", e);
    }
}
