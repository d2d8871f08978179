//! # Playlist Generation Engine
//!
//! This module implements the core of sprandcli: building a new playlist by
//! sampling tracks from one or more source playlists through the catalog
//! gateway. A single generation run flows through four stages:
//!
//! ```text
//! gather sources -> build exclusion set -> fill song slots -> assemble playlist
//! ```
//!
//! - [`aggregate`] - pulls track ids from playlists and builds the exclusion set
//! - [`strategy`] - the four randomized candidate-picking strategies
//! - [`select`] - the bounded retry loop that fills each song slot
//! - [`assemble`] - playlist naming, creation, population, and autoplay
//!
//! The engine owns no persistent state. A run either returns a
//! [`GeneratedPlaylist`] with exactly the requested number of tracks or fails
//! with one of the [`GenerateError`] kinds; it never produces a short
//! playlist. Progress is reported through a caller-supplied callback, invoked
//! once per completed unit of work (one per source playlist, one per
//! reference playlist when exclusion is enabled, one per accepted song).
//!
//! All catalog calls happen strictly sequentially on whatever task runs
//! `generate`; callers wanting a responsive front end spawn the run on its
//! own task and observe progress via the callback (see
//! [`crate::cli::generate`]).

pub mod aggregate;
pub mod assemble;
pub mod select;
pub mod strategy;

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    catalog::{CatalogGateway, GatewayError},
    info,
};

/// Default retry bound per song slot.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// One playlist generation request.
///
/// `song_count` must be at least 1; the CLI enforces this at argument parsing.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub source_playlist_ids: Vec<String>,
    pub song_count: u32,
    pub exclude_reference: bool,
    pub autoplay: bool,
}

/// Construction-time engine configuration.
///
/// Reference playlists, the playability market, and the per-slot retry bound
/// are explicit here rather than ambient globals, so independent engine
/// instances (one per test, for example) never share state.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub reference_playlist_ids: Vec<String>,
    pub market: String,
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            reference_playlist_ids: Vec::new(),
            market: "US".to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// The playlist produced by a successful run.
#[derive(Debug, Clone)]
pub struct GeneratedPlaylist {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Fatal outcomes of a generation run.
///
/// These are the only errors that cross the engine boundary; every transient
/// lookup failure inside aggregation, the strategies, or the market check is
/// absorbed at the point of failure.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The source pool had zero usable tracks after aggregation.
    #[error("no valid source tracks found")]
    EmptySource,

    /// A song slot exhausted its retry budget. No playlist was created.
    #[error(
        "couldn't find enough valid tracks to fill your desired playlist size \
         (song #{slot} gave up after {attempts} attempts)"
    )]
    InsufficientTracks { slot: u32, attempts: u32 },

    /// The catalog rejected playlist creation or population. A created but
    /// empty playlist may remain behind; it is not cleaned up.
    #[error("failed to create playlist: {0}")]
    PlaylistCreation(#[from] GatewayError),
}

/// Progress accounting for one run.
///
/// `total` is computed up front and never changes; `completed` advances by
/// exactly one per unit of work, so the callback sees a strictly increasing
/// sequence from 1 to `total` on a successful run.
pub struct Progress<'a> {
    on_progress: &'a (dyn Fn(u32, u32) + Send + Sync),
    completed: u32,
    total: u32,
}

impl<'a> Progress<'a> {
    pub fn new(on_progress: &'a (dyn Fn(u32, u32) + Send + Sync), total: u32) -> Self {
        Self {
            on_progress,
            completed: 0,
            total,
        }
    }

    pub fn tick(&mut self) {
        self.completed += 1;
        (self.on_progress)(self.completed, self.total);
    }
}

/// The playlist generation engine.
pub struct Generator<G> {
    gateway: G,
    config: GeneratorConfig,
}

impl<G: CatalogGateway> Generator<G> {
    pub fn new(gateway: G, config: GeneratorConfig) -> Self {
        Self { gateway, config }
    }

    /// Runs one generation end to end.
    ///
    /// Gathers the source pool, optionally builds the exclusion set from the
    /// configured reference playlists, fills every song slot, then creates
    /// and populates the playlist. Returns the created playlist or the first
    /// fatal error; on failure no playlist with tracks ever exists.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        on_progress: impl Fn(u32, u32) + Send + Sync,
    ) -> Result<GeneratedPlaylist, GenerateError> {
        let mut total = request.source_playlist_ids.len() as u32 + request.song_count;
        if request.exclude_reference {
            total += self.config.reference_playlist_ids.len() as u32;
        }
        let mut progress = Progress::new(&on_progress, total);

        info!("Gathering source tracks...");
        let source_pool =
            aggregate::gather(&self.gateway, &request.source_playlist_ids, &mut progress).await;
        info!("Total source tracks gathered: {}", source_pool.len());
        if source_pool.is_empty() {
            return Err(GenerateError::EmptySource);
        }

        let excluded: HashSet<String> = aggregate::build_exclusion_set(
            &self.gateway,
            request.exclude_reference,
            &self.config.reference_playlist_ids,
            &mut progress,
        )
        .await;

        let final_tracks = select::fill_slots(
            &self.gateway,
            &self.config,
            &source_pool,
            &excluded,
            request.song_count,
            &mut progress,
        )
        .await?;

        assemble::assemble(&self.gateway, &final_tracks, request.autoplay).await
    }
}
