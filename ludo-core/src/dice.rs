//! Die faces and rolling utilities.
//!
//! The engine itself consumes pre-rolled [`DieFace`] values; the rollers
//! here are conveniences for hosts that want the crate to produce them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for die face construction.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("invalid die face: {0} (expected 1-6)")]
    InvalidFace(u8),
}

/// A face of a standard six-sided die, guaranteed to be in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieFace(u8);

impl DieFace {
    /// The lowest face.
    pub const ONE: DieFace = DieFace(1);

    /// The face that launches tokens and grants another roll.
    pub const SIX: DieFace = DieFace(6);

    /// Validate a raw value into a die face.
    pub fn new(value: u8) -> Result<DieFace, DiceError> {
        if (1..=6).contains(&value) {
            Ok(DieFace(value))
        } else {
            Err(DiceError::InvalidFace(value))
        }
    }

    /// The numeric value of the face.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this face is a six.
    pub fn is_six(self) -> bool {
        self.0 == 6
    }
}

impl TryFrom<u8> for DieFace {
    type Error = DiceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DieFace::new(value)
    }
}

impl From<DieFace> for u8 {
    fn from(face: DieFace) -> u8 {
        face.0
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of die faces.
///
/// Implemented by [`FairDie`] and [`SeededDie`] here and by the scripted
/// die in [`crate::testing`].
pub trait DieRoller {
    /// Produce the next face.
    fn roll(&mut self) -> DieFace;
}

/// Uniform die backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct FairDie;

impl FairDie {
    pub fn new() -> Self {
        FairDie
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_with_rng<R: Rng>(&mut self, rng: &mut R) -> DieFace {
        DieFace(rng.gen_range(1..=6))
    }
}

impl DieRoller for FairDie {
    fn roll(&mut self) -> DieFace {
        self.roll_with_rng(&mut rand::thread_rng())
    }
}

/// Uniform die drawing from a seeded stream, for reproducible games.
#[derive(Debug, Clone)]
pub struct SeededDie {
    rng: StdRng,
}

impl SeededDie {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DieRoller for SeededDie {
    fn roll(&mut self) -> DieFace {
        DieFace(self.rng.gen_range(1..=6))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_bounds() {
        assert!(DieFace::new(0).is_err());
        assert!(DieFace::new(7).is_err());
        for v in 1..=6 {
            assert_eq!(DieFace::new(v).unwrap().value(), v);
        }
    }

    #[test]
    fn test_six_detection() {
        assert!(DieFace::SIX.is_six());
        assert!(!DieFace::ONE.is_six());
    }

    #[test]
    fn test_fair_die_range() {
        let mut die = FairDie::new();
        for _ in 0..100 {
            let face = die.roll();
            assert!((1..=6).contains(&face.value()));
        }
    }

    #[test]
    fn test_seeded_die_reproducible() {
        let mut a = SeededDie::new(42);
        let mut b = SeededDie::new(42);
        let faces_a: Vec<u8> = (0..20).map(|_| a.roll().value()).collect();
        let faces_b: Vec<u8> = (0..20).map(|_| b.roll().value()).collect();
        assert_eq!(faces_a, faces_b);
    }

    #[test]
    fn test_face_deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<DieFace>("9").is_err());
        assert!(serde_json::from_str::<DieFace>("0").is_err());
        assert_eq!(serde_json::from_str::<DieFace>("6").unwrap(), DieFace::SIX);
    }
}
