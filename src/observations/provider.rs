use anyhow::Result;

use super::models::Game;

/// Trait that every source of historical box scores must implement.
pub trait GameSource {
    /// Regular-season games for `team` in source order (preseason already dropped).
    fn fetch_games(&self, team: &str) -> Result<Vec<Game>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
