//! Scoring: line-clear points, running score, high score

/// Points awarded for clearing `cleared` rows in one lock
///
/// Four at once is a tetris and worth a flat 1000; anything less pays 100
/// per row; locking without a clear pays nothing.
pub fn clear_points(cleared: usize) -> u64 {
    match cleared {
        0 => 0,
        4 => 1000,
        n => n as u64 * 100,
    }
}

/// Running score for one session plus the persisted best
#[derive(Debug, Clone, Default)]
pub struct Score {
    /// Current session score
    pub points: u64,
    /// Total lines cleared this session
    pub lines: u32,
    /// Best score seen across sessions (loaded at startup)
    pub high: u64,
}

impl Score {
    pub fn new(high: u64) -> Self {
        Self {
            points: 0,
            lines: 0,
            high,
        }
    }

    /// Record a lock's clear result
    pub fn add_clear(&mut self, cleared: usize) {
        self.points += clear_points(cleared);
        self.lines += cleared as u32;
    }

    /// Whether this session beat the stored best (zero never counts)
    pub fn is_new_high(&self) -> bool {
        self.points > 0 && self.points > self.high
    }
}
