//! Dice sources for rolls.
//!
//! Handlers take the roller from `AppState`, so tests and replays can swap in a
//! deterministic source without touching production code paths.

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DICE_FACES: u8 = 6;

/// A uniform six-sided dice. Implementations must only return 1..=6.
pub trait DiceRoller: Send + Sync + Debug {
    fn roll(&self) -> u8;
}

/// Thread-local OS-seeded RNG. Production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct RngDice;

impl DiceRoller for RngDice {
    fn roll(&self) -> u8 {
        rand::rng().random_range(1..=DICE_FACES)
    }
}

/// Reproducible stream from a fixed seed (`BACKEND_DICE_SEED`).
#[derive(Debug)]
pub struct SeededDice {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl DiceRoller for SeededDice {
    fn roll(&self) -> u8 {
        self.rng.lock().random_range(1..=DICE_FACES)
    }
}

/// Cycles through a fixed sequence of faces.
#[derive(Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    cursor: AtomicUsize,
}

impl ScriptedDice {
    /// Faces outside 1..=6 are clamped into range; an empty script rolls 1s.
    pub fn new(faces: impl Into<Vec<u8>>) -> Self {
        let mut faces: Vec<u8> = faces
            .into()
            .into_iter()
            .map(|f| f.clamp(1, DICE_FACES))
            .collect();
        if faces.is_empty() {
            faces.push(1);
        }
        Self {
            faces,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Always rolls `face`.
    pub fn constant(face: u8) -> Self {
        Self::new(vec![face])
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&self) -> u8 {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.faces[i % self.faces.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_dice_stays_in_range() {
        let dice = RngDice;
        for _ in 0..1000 {
            let v = dice.roll();
            assert!((1..=6).contains(&v), "rolled {v}");
        }
    }

    #[test]
    fn seeded_dice_is_reproducible() {
        let a = SeededDice::new(2026);
        let b = SeededDice::new(2026);
        let xs: Vec<u8> = (0..32).map(|_| a.roll()).collect();
        let ys: Vec<u8> = (0..32).map(|_| b.roll()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|v| (1..=6).contains(v)));
    }

    #[test]
    fn scripted_dice_cycles() {
        let dice = ScriptedDice::new(vec![2, 5, 6]);
        let rolls: Vec<u8> = (0..7).map(|_| dice.roll()).collect();
        assert_eq!(rolls, vec![2, 5, 6, 2, 5, 6, 2]);
    }

    #[test]
    fn scripted_dice_clamps_and_defaults() {
        assert_eq!(ScriptedDice::new(vec![0]).roll(), 1);
        assert_eq!(ScriptedDice::new(vec![9]).roll(), 6);
        assert_eq!(ScriptedDice::new(Vec::<u8>::new()).roll(), 1);
        assert_eq!(ScriptedDice::constant(4).roll(), 4);
    }
}
