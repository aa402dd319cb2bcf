//! 7-bag randomizer for piece generation
//!
//! Every 7 consecutive pieces drawn from a bag are a permutation of all 7
//! types, which prevents long droughts. Two queues are kept: the current bag
//! being dealt from and a lookahead bag so the next-piece preview never waits
//! on a fresh shuffle. Each queue is refilled lazily when it empties and a
//! bag is never topped up mid-permutation.

use crate::tetromino::PieceType;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// The two-queue 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    current: Vec<PieceType>,
    lookahead: Vec<PieceType>,
    rng: ChaCha8Rng,
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

impl Bag {
    /// Create an empty bag randomizer; queues fill on first use
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a bag randomizer with a fixed seed (deterministic sequence)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            current: Vec::with_capacity(7),
            lookahead: Vec::with_capacity(7),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Remove and return the next piece type
    pub fn draw(&mut self) -> PieceType {
        if self.current.is_empty() {
            self.current = self.fresh_bag();
        }
        if self.lookahead.is_empty() {
            self.lookahead = self.fresh_bag();
        }
        self.current.remove(0)
    }

    /// Produce the first two piece types (current + next) for a new session
    ///
    /// Both queues are freshly shuffled and each gives up its head, leaving
    /// both one element short and ready for subsequent `draw` calls.
    pub fn initialize(&mut self) -> (PieceType, PieceType) {
        self.current = self.fresh_bag();
        self.lookahead = self.fresh_bag();
        let first = self.current.remove(0);
        let second = self.lookahead.remove(0);
        (first, second)
    }

    /// Shuffle a full permutation of the 7 types (Fisher-Yates via rand)
    fn fresh_bag(&mut self) -> Vec<PieceType> {
        let mut bag = PieceType::ALL.to_vec();
        bag.shuffle(&mut self.rng);
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seven_draws_are_a_permutation() {
        let mut bag = Bag::new();
        let drawn: HashSet<_> = (0..7).map(|_| bag.draw()).collect();
        assert_eq!(drawn.len(), 7);
    }

    #[test]
    fn test_every_window_of_seven_is_fair() {
        let mut bag = Bag::new();
        for _ in 0..10 {
            let drawn: HashSet<_> = (0..7).map(|_| bag.draw()).collect();
            assert_eq!(drawn.len(), 7);
        }
    }

    #[test]
    fn test_initialize_leaves_both_queues_one_short() {
        let mut bag = Bag::new();
        let (first, second) = bag.initialize();
        assert_eq!(bag.current.len(), 6);
        assert_eq!(bag.lookahead.len(), 6);
        assert!(!bag.current.contains(&first));
        assert!(!bag.lookahead.contains(&second));
    }

    #[test]
    fn test_seeded_bags_are_deterministic() {
        let mut a = Bag::with_seed(42);
        let mut b = Bag::with_seed(42);
        for _ in 0..21 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_many_draws() {
        let mut bag = Bag::new();
        for _ in 0..200 {
            let _ = bag.draw();
        }
    }
}
