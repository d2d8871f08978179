//! Track aggregation over playlists, plus the exclusion-set builder.

use std::collections::HashSet;

use crate::{
    catalog::{CatalogGateway, GatewayError},
    info, warning,
};

use super::Progress;

/// Fetches all usable track ids from a single playlist.
///
/// Local files and entries without a resolvable id are skipped.
async fn playlist_track_ids<G: CatalogGateway>(
    gateway: &G,
    playlist_id: &str,
) -> Result<Vec<String>, GatewayError> {
    let entries = gateway.playlist_track_entries(playlist_id).await?;
    Ok(entries
        .into_iter()
        .filter(|e| !e.is_local)
        .filter_map(|e| e.id)
        .collect())
}

/// Gathers track ids from multiple playlists, ticking progress once per
/// playlist.
///
/// A playlist that fails to load contributes zero tracks but still consumes
/// its progress unit; aggregation continues with the remaining ids. Duplicate
/// ids across playlists are kept on purpose - selection samples the pool
/// uniformly by index, so overlap weights those tracks accordingly.
pub async fn gather<G: CatalogGateway>(
    gateway: &G,
    playlist_ids: &[String],
    progress: &mut Progress<'_>,
) -> Vec<String> {
    let mut all_ids = Vec::new();

    for playlist_id in playlist_ids {
        match playlist_track_ids(gateway, playlist_id).await {
            Ok(ids) => {
                info!("Found {} valid tracks in playlist: {}", ids.len(), playlist_id);
                all_ids.extend(ids);
            }
            Err(GatewayError::NotFound) => {
                warning!("Playlist {} not found or inaccessible.", playlist_id);
            }
            Err(e) => {
                warning!("Error fetching playlist {}: {}", playlist_id, e);
            }
        }
        progress.tick();
    }

    all_ids
}

/// Builds the exclusion set from the reference playlists.
///
/// When exclusion is disabled this returns an empty set and consumes zero
/// progress units. Unlike the source pool, the result is deduplicated - only
/// membership matters here.
pub async fn build_exclusion_set<G: CatalogGateway>(
    gateway: &G,
    enabled: bool,
    reference_playlist_ids: &[String],
    progress: &mut Progress<'_>,
) -> HashSet<String> {
    if !enabled {
        return HashSet::new();
    }

    info!("Gathering reference-playlist tracks for exclusion...");
    let ids = gather(gateway, reference_playlist_ids, progress).await;
    let set: HashSet<String> = ids.into_iter().collect();
    info!("Total tracks for exclusion: {}", set.len());
    set
}
