//! The selection loop: fills each song slot with a validated candidate.

use std::collections::HashSet;

use rand::seq::IndexedRandom;

use crate::{catalog::CatalogGateway, info, warning};

use super::{
    GenerateError, GeneratorConfig, Progress,
    strategy::{self, Pick, Strategy},
};

/// Fills `song_count` slots from the pool, one validated track per slot.
///
/// Each attempt draws a fresh uniform seed and strategy. A candidate is
/// rejected when it sits in the exclusion set or fails the market check;
/// rejection just burns one attempt. A slot that exhausts
/// `config.max_attempts` attempts fails the whole run - the partial track
/// list is discarded and no playlist is created.
pub async fn fill_slots<G: CatalogGateway>(
    gateway: &G,
    config: &GeneratorConfig,
    pool: &[String],
    excluded: &HashSet<String>,
    song_count: u32,
    progress: &mut Progress<'_>,
) -> Result<Vec<String>, GenerateError> {
    let mut final_tracks: Vec<String> = Vec::with_capacity(song_count as usize);

    for slot in 1..=song_count {
        let mut chosen: Option<String> = None;
        let mut attempts = 0;

        while chosen.is_none() && attempts < config.max_attempts {
            attempts += 1;

            let strategy = Strategy::draw();
            let seed = draw_seed(pool);

            let pick =
                strategy::pick_candidate(gateway, &config.market, strategy, pool, &seed).await;
            if let Pick::Fallback { reason, .. } = &pick {
                info!(
                    "Attempt {} for song #{}: {:?} fell back to seed ({:?})",
                    attempts, slot, strategy, reason
                );
            }
            let candidate = pick.track_id().to_string();

            if excluded.contains(&candidate) {
                continue;
            }

            if !passes_market_check(gateway, &config.market, &candidate).await {
                continue;
            }

            info!("Song #{} selected: {}", slot, candidate);
            chosen = Some(candidate);
        }

        match chosen {
            Some(id) => {
                final_tracks.push(id);
                progress.tick();
            }
            None => return Err(GenerateError::InsufficientTracks { slot, attempts }),
        }
    }

    Ok(final_tracks)
}

fn draw_seed(pool: &[String]) -> String {
    // The pool is non-empty by the time the loop runs; the engine bails out
    // with EmptySource before reaching this point.
    pool.choose(&mut rand::rng()).cloned().unwrap_or_default()
}

/// A candidate passes when its detail resolves and the configured market is
/// listed in its available markets. Lookup failures count as a rejection.
async fn passes_market_check<G: CatalogGateway>(
    gateway: &G,
    market: &str,
    track_id: &str,
) -> bool {
    match gateway.track(track_id).await {
        Ok(detail) => detail.available_markets.iter().any(|m| m == market),
        Err(e) => {
            warning!("Error checking track availability for {}: {}", track_id, e);
            false
        }
    }
}
