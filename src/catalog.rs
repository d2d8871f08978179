//! Catalog gateway abstraction.
//!
//! The playlist generation engine never talks HTTP directly; it consumes the
//! [`CatalogGateway`] trait defined here. The production implementation is
//! [`crate::spotify::SpotifyGateway`]; tests substitute an in-memory mock.
//! All listing operations return fully materialized sequences - pagination is
//! the gateway's concern, not the engine's.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by gateway operations.
///
/// The engine only ever distinguishes "it failed" from "it worked"; the
/// variants exist so call sites can log something useful and so not-found
/// playlists can be reported as such during aggregation.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("resource not found")]
    NotFound,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spotify api error: status {0}")]
    Api(u16),
}

/// One entry of a playlist as reported by the catalog.
///
/// Local files carry no catalog id and cannot be added to generated
/// playlists; the aggregator skips them.
#[derive(Debug, Clone)]
pub struct PlaylistTrackEntry {
    pub id: Option<String>,
    pub is_local: bool,
}

/// A reference to an artist on a track.
#[derive(Debug, Clone)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// Full track details needed by the strategies and the market check.
#[derive(Debug, Clone)]
pub struct TrackDetail {
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album_id: Option<String>,
    pub available_markets: Vec<String>,
}

/// A freshly created playlist.
#[derive(Debug, Clone)]
pub struct CreatedPlaylist {
    pub id: String,
    pub url: String,
}

/// Narrow interface to the remote music catalog.
///
/// Read operations may fail with any [`GatewayError`]; the engine's policy
/// per call site (skip, fall back, reject the attempt) is decided by the
/// caller, never here.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// All entries of a playlist, in playlist order.
    async fn playlist_track_entries(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistTrackEntry>, GatewayError>;

    /// Details for a single track.
    async fn track(&self, track_id: &str) -> Result<TrackDetail, GatewayError>;

    /// IDs of all tracks on an album.
    async fn album_track_ids(&self, album_id: &str) -> Result<Vec<String>, GatewayError>;

    /// IDs of an artist's top tracks in the given market.
    async fn artist_top_track_ids(
        &self,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<String>, GatewayError>;

    /// IDs of an artist's albums and singles in the given market.
    async fn artist_album_ids(
        &self,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<String>, GatewayError>;

    /// Creates a private playlist owned by the configured user.
    async fn create_playlist(&self, name: &str) -> Result<CreatedPlaylist, GatewayError>;

    /// Appends tracks to a playlist in the given order.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String])
    -> Result<(), GatewayError>;

    /// IDs of the currently available playback devices.
    async fn playback_device_ids(&self) -> Result<Vec<String>, GatewayError>;

    async fn set_shuffle(&self, device_id: &str, state: bool) -> Result<(), GatewayError>;

    async fn set_repeat_context(&self, device_id: &str) -> Result<(), GatewayError>;

    async fn start_playback(
        &self,
        device_id: &str,
        context_uri: &str,
    ) -> Result<(), GatewayError>;
}
