use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;

use crate::domains::links::models::Link;
use crate::kernel::BaseLinkStore;

pub const DEFAULT_ROULETTE_DAYS: i64 = 30;
const ROULETTE_FALLBACK_POOL: i64 = 100;

/// The instant `days_ago` days before now. `None` when `days_ago` is below 1
/// or reaches past the representable range.
pub fn forgotten_cutoff(days_ago: i64) -> Option<DateTime<Utc>> {
    if days_ago < 1 {
        return None;
    }
    Utc::now().checked_sub_signed(Duration::try_days(days_ago)?)
}

/// Pick a random processed link saved before `cutoff`. With no such link,
/// pick from the most recent ones instead. `None` means the store is empty.
pub async fn pick_forgotten_link(
    cutoff: DateTime<Utc>,
    store: &dyn BaseLinkStore,
) -> Result<Option<Link>> {
    let mut pool = store.list_older_than(cutoff).await?;
    if pool.is_empty() {
        pool = store.list(ROULETTE_FALLBACK_POOL, 0, None).await?;
    }

    Ok(pool.choose(&mut rand::rng()).cloned())
}
