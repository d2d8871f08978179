//! The four randomized candidate-picking strategies.
//!
//! Every strategy degrades to the seed track instead of failing: a lookup
//! error or an empty intermediate result yields [`Pick::Fallback`] carrying
//! the seed and the reason. The selection loop treats both variants the same
//! for accept/reject purposes and only uses the distinction for logging.

use rand::{Rng, seq::IndexedRandom};

use crate::catalog::CatalogGateway;

/// One of the four ways to turn a seed (or the whole pool) into a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Uniform sample from the full source pool; ignores the seed.
    PoolUniform,
    /// Random track from the seed's album.
    SameAlbum,
    /// Random track from a random seed artist's top tracks.
    ArtistTop,
    /// Random track from a random album of a random seed artist.
    ArtistDiscography,
}

impl Strategy {
    /// Draws a strategy uniformly, independent of previous draws.
    pub fn draw() -> Strategy {
        match rand::rng().random_range(0..4u8) {
            0 => Strategy::PoolUniform,
            1 => Strategy::SameAlbum,
            2 => Strategy::ArtistTop,
            _ => Strategy::ArtistDiscography,
        }
    }
}

/// Why a strategy fell back to the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    LookupFailed,
    NoAlbum,
    NoAlbumTracks,
    NoArtists,
    NoTopTracks,
    NoAlbums,
    EmptyPool,
}

/// The outcome of one strategy invocation.
#[derive(Debug, Clone)]
pub enum Pick {
    /// A candidate genuinely produced by the strategy.
    Fresh(String),
    /// The strategy could not produce anything and returned the seed.
    Fallback { seed: String, reason: FallbackReason },
}

impl Pick {
    pub fn track_id(&self) -> &str {
        match self {
            Pick::Fresh(id) => id,
            Pick::Fallback { seed, .. } => seed,
        }
    }

    fn fallback(seed: &str, reason: FallbackReason) -> Pick {
        Pick::Fallback {
            seed: seed.to_string(),
            reason,
        }
    }
}

/// Runs one strategy against the pool/seed and returns its pick.
pub async fn pick_candidate<G: CatalogGateway>(
    gateway: &G,
    market: &str,
    strategy: Strategy,
    pool: &[String],
    seed: &str,
) -> Pick {
    match strategy {
        Strategy::PoolUniform => match choose(pool) {
            Some(id) => Pick::Fresh(id),
            None => Pick::fallback(seed, FallbackReason::EmptyPool),
        },
        Strategy::SameAlbum => same_album(gateway, seed).await,
        Strategy::ArtistTop => artist_top(gateway, market, seed).await,
        Strategy::ArtistDiscography => artist_discography(gateway, market, seed).await,
    }
}

// The thread-local rng must not be held across an await, so every random
// choice happens inside these helpers.
fn choose(ids: &[String]) -> Option<String> {
    ids.choose(&mut rand::rng()).cloned()
}

async fn random_seed_artist<G: CatalogGateway>(gateway: &G, seed: &str) -> Result<String, FallbackReason> {
    let detail = gateway
        .track(seed)
        .await
        .map_err(|_| FallbackReason::LookupFailed)?;
    let artist_ids: Vec<String> = detail.artists.into_iter().map(|a| a.id).collect();
    choose(&artist_ids).ok_or(FallbackReason::NoArtists)
}

async fn same_album<G: CatalogGateway>(gateway: &G, seed: &str) -> Pick {
    let detail = match gateway.track(seed).await {
        Ok(d) => d,
        Err(_) => return Pick::fallback(seed, FallbackReason::LookupFailed),
    };
    let album_id = match detail.album_id {
        Some(id) => id,
        None => return Pick::fallback(seed, FallbackReason::NoAlbum),
    };
    let track_ids = match gateway.album_track_ids(&album_id).await {
        Ok(ids) => ids,
        Err(_) => return Pick::fallback(seed, FallbackReason::LookupFailed),
    };
    match choose(&track_ids) {
        Some(id) => Pick::Fresh(id),
        None => Pick::fallback(seed, FallbackReason::NoAlbumTracks),
    }
}

async fn artist_top<G: CatalogGateway>(gateway: &G, market: &str, seed: &str) -> Pick {
    let artist_id = match random_seed_artist(gateway, seed).await {
        Ok(id) => id,
        Err(reason) => return Pick::fallback(seed, reason),
    };
    let top_ids = match gateway.artist_top_track_ids(&artist_id, market).await {
        Ok(ids) => ids,
        Err(_) => return Pick::fallback(seed, FallbackReason::LookupFailed),
    };
    match choose(&top_ids) {
        Some(id) => Pick::Fresh(id),
        None => Pick::fallback(seed, FallbackReason::NoTopTracks),
    }
}

async fn artist_discography<G: CatalogGateway>(gateway: &G, market: &str, seed: &str) -> Pick {
    let artist_id = match random_seed_artist(gateway, seed).await {
        Ok(id) => id,
        Err(reason) => return Pick::fallback(seed, reason),
    };
    let album_ids = match gateway.artist_album_ids(&artist_id, market).await {
        Ok(ids) => ids,
        Err(_) => return Pick::fallback(seed, FallbackReason::LookupFailed),
    };
    let album_id = match choose(&album_ids) {
        Some(id) => id,
        None => return Pick::fallback(seed, FallbackReason::NoAlbums),
    };
    let track_ids = match gateway.album_track_ids(&album_id).await {
        Ok(ids) => ids,
        Err(_) => return Pick::fallback(seed, FallbackReason::LookupFailed),
    };
    match choose(&track_ids) {
        Some(id) => Pick::Fresh(id),
        None => Pick::fallback(seed, FallbackReason::NoAlbumTracks),
    }
}
