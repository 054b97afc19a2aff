use crate::error::{GameError, Result};
use rand::Rng;
use rand::seq::index;
use std::time::SystemTime;

/// Number of chambers in the revolver's cylinder.
pub const CHAMBER_COUNT: usize = 6;

pub type GroupId = u64;
pub type UserId = u64;

/// Identifies one game instance within an engine.
///
/// Two consecutive games in the same group never share an id, which lets a
/// timeout tell whether the game it was armed for is still the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(pub u64);

/// Result of pulling the trigger once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shot {
    Hit,
    Miss,
}

/// A revolver loaded for one group.
///
/// `current` always points at the chamber the next pull fires, and loaded
/// chambers are only ever cleared, never added.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: GameId,
    chambers: [bool; CHAMBER_COUNT],
    current: usize,
    started_at: SystemTime,
    turns: u32,
}

impl Game {
    /// Loads `bullets` rounds into distinct, randomly chosen chambers.
    pub fn load<R: Rng + ?Sized>(id: GameId, bullets: usize, rng: &mut R) -> Result<Self> {
        if !(1..=CHAMBER_COUNT).contains(&bullets) {
            return Err(GameError::InvalidBulletCount {
                got: bullets,
                max: CHAMBER_COUNT,
            });
        }

        let mut chambers = [false; CHAMBER_COUNT];
        for pos in index::sample(rng, CHAMBER_COUNT, bullets) {
            chambers[pos] = true;
        }
        Ok(Self::with_chambers(id, chambers))
    }

    /// Builds a game from an explicit cylinder layout, starting at chamber 0.
    pub fn with_chambers(id: GameId, chambers: [bool; CHAMBER_COUNT]) -> Self {
        Self {
            id,
            chambers,
            current: 0,
            started_at: SystemTime::now(),
            turns: 0,
        }
    }

    /// Fires the current chamber and rotates the cylinder.
    pub fn pull_trigger(&mut self) -> Shot {
        let shot = if self.chambers[self.current] {
            self.chambers[self.current] = false;
            Shot::Hit
        } else {
            Shot::Miss
        };
        self.current = (self.current + 1) % CHAMBER_COUNT;
        self.turns += 1;
        shot
    }

    pub fn remaining(&self) -> usize {
        self.chambers.iter().filter(|loaded| **loaded).count()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn current_loaded(&self) -> bool {
        self.chambers[self.current]
    }

    /// Zero-based index of the chamber under the hammer.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_load_marks_exact_bullet_count() {
        let mut rng = StdRng::seed_from_u64(7);
        for bullets in 1..=CHAMBER_COUNT {
            for _ in 0..50 {
                let game = Game::load(GameId(1), bullets, &mut rng).unwrap();
                assert_eq!(game.remaining(), bullets);
                assert_eq!(game.current(), 0);
                assert_eq!(game.turns(), 0);
            }
        }
    }

    #[test]
    fn test_load_rejects_out_of_range_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            Game::load(GameId(1), 0, &mut rng),
            Err(GameError::InvalidBulletCount { got: 0, max: 6 })
        ));
        assert!(matches!(
            Game::load(GameId(1), 7, &mut rng),
            Err(GameError::InvalidBulletCount { got: 7, .. })
        ));
    }

    #[test]
    fn test_load_spreads_single_bullet_over_all_chambers() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; CHAMBER_COUNT];
        for _ in 0..500 {
            let game = Game::load(GameId(1), 1, &mut rng).unwrap();
            let pos = game.chambers.iter().position(|c| *c).unwrap();
            seen[pos] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_hit_clears_chamber_and_advances() {
        let mut game = Game::with_chambers(GameId(1), [true, false, false, false, false, true]);

        assert!(game.current_loaded());
        assert_eq!(game.pull_trigger(), Shot::Hit);
        assert_eq!(game.remaining(), 1);
        assert_eq!(game.current(), 1);
        assert!(!game.current_loaded());

        assert_eq!(game.pull_trigger(), Shot::Miss);
        assert_eq!(game.remaining(), 1);
        assert_eq!(game.current(), 2);
        assert_eq!(game.turns(), 2);
    }

    #[test]
    fn test_cylinder_wraps_around() {
        let mut game = Game::with_chambers(GameId(1), [false; CHAMBER_COUNT]);
        for _ in 0..CHAMBER_COUNT {
            assert_eq!(game.pull_trigger(), Shot::Miss);
        }
        assert_eq!(game.current(), 0);
        assert!(game.is_empty());
    }

    #[test]
    fn test_emptied_after_exactly_bullet_count_hits() {
        let mut rng = StdRng::seed_from_u64(99);
        for bullets in 1..=CHAMBER_COUNT {
            let mut game = Game::load(GameId(1), bullets, &mut rng).unwrap();
            let mut hits = 0;
            let mut turns = 0;
            while !game.is_empty() {
                if game.pull_trigger() == Shot::Hit {
                    hits += 1;
                }
                turns += 1;
            }
            assert_eq!(hits, bullets);
            assert!(turns >= bullets);
            assert!(turns <= CHAMBER_COUNT);
        }
    }
}
