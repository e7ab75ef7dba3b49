//! Score and combo bookkeeping.

/// Accumulates score across clear cycles.
///
/// Each clear cycle scores `cleared * base + combo * base`, where `combo` is the
/// number of consecutive cycles since the last player swap, including this one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreTracker {
    base_score_per_tile: u64,
    score: u64,
    combo_count: u32,
}

impl ScoreTracker {
    pub fn new(base_score_per_tile: u32) -> Self {
        ScoreTracker {
            base_score_per_tile: u64::from(base_score_per_tile),
            score: 0,
            combo_count: 0,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    /// The combo as it should be shown: hidden until the second chained clear.
    pub fn displayed_combo(&self) -> Option<u32> {
        (self.combo_count >= 2).then_some(self.combo_count)
    }

    /// A new player-initiated swap starts a fresh chain.
    pub fn begin_player_swap(&mut self) {
        self.combo_count = 0;
    }

    /// Scores one clear cycle of `cleared` tiles and returns the points it earned.
    pub fn record_clear(&mut self, cleared: usize) -> u64 {
        self.combo_count += 1;
        let base_score = cleared as u64 * self.base_score_per_tile;
        let combo_score = u64::from(self.combo_count) * self.base_score_per_tile;
        let cycle_score = base_score + combo_score;
        self.score += cycle_score;
        cycle_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_clear_after_swap() {
        let mut tracker = ScoreTracker::new(10);
        tracker.begin_player_swap();
        assert_eq!(tracker.record_clear(3), 3 * 10 + 10);
        assert_eq!(tracker.score(), 40);
        assert_eq!(tracker.combo_count(), 1);
        assert_eq!(tracker.displayed_combo(), None);
    }

    #[test]
    fn test_cascade_increments_combo() {
        let mut tracker = ScoreTracker::new(10);
        tracker.begin_player_swap();
        tracker.record_clear(3);
        assert_eq!(tracker.record_clear(4), 4 * 10 + 2 * 10);
        assert_eq!(tracker.score(), 40 + 60);
        assert_eq!(tracker.displayed_combo(), Some(2));
    }

    #[test]
    fn test_player_swap_resets_combo_not_score() {
        let mut tracker = ScoreTracker::new(5);
        tracker.record_clear(3);
        tracker.record_clear(3);
        tracker.begin_player_swap();
        assert_eq!(tracker.combo_count(), 0);
        assert_eq!(tracker.score(), (15 + 5) + (15 + 10));
        assert_eq!(tracker.record_clear(3), 15 + 5);
    }

    #[test]
    fn test_full_board_clear_is_one_cycle() {
        let mut tracker = ScoreTracker::new(10);
        assert_eq!(tracker.record_clear(25), 250 + 10);
        assert_eq!(tracker.combo_count(), 1);
    }
}
