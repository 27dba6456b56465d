//! Fair number generation shared by both parties.
//!
//! The host commits to a uniform value and shows the digest. The
//! counterpart then picks any number in range, the host reveals its key,
//! and the joint result is `(committed + contribution) mod range`. As long
//! as the digest goes out before the contribution comes in, neither side
//! can bias the result.

use crate::commitment::{Commitment, CommitmentGenerator, Reveal};
use crate::{DiceError, Die, Result};
use rand::{CryptoRng, RngCore};

/// Range of the first-move draw: 0 or 1
pub const FIRST_MOVE_RANGE: u64 = 2;

pub fn modular_sum(committed: u64, contribution: u64, range: u64) -> u64 {
    // widened so ranges above u64::MAX / 2 cannot overflow
    let sum = (committed % range) as u128 + (contribution % range) as u128;
    (sum % range as u128) as u64
}

fn reveal_checked(commitment: Commitment) -> Result<Reveal> {
    if !commitment.verify()? {
        return Err(DiceError::crypto("commitment digest does not match its own value"));
    }
    Ok(commitment.reveal())
}

fn check_contribution(value: u64, range: u64) -> Result<()> {
    if value >= range {
        return Err(DiceError::invalid_state(format!(
            "contribution {} outside 0..{}",
            value,
            range - 1
        )));
    }
    Ok(())
}

/// An outstanding draw in `[0, range)` waiting for the counterpart's number
#[derive(Debug)]
pub struct FairDraw {
    commitment: Commitment,
}

impl FairDraw {
    pub fn begin<R: RngCore + CryptoRng>(
        generator: &mut CommitmentGenerator<R>,
        range: u64,
    ) -> Result<Self> {
        Ok(Self {
            commitment: generator.commit(range)?,
        })
    }

    pub fn range(&self) -> u64 {
        self.commitment.range()
    }

    pub fn digest_hex(&self) -> String {
        self.commitment.digest_hex()
    }

    /// Combine with the counterpart's number and disclose the key.
    /// Callers validate `contribution` first; an out-of-range value here is
    /// a contract violation, not bad user input.
    pub fn resolve(self, contribution: u64) -> Result<ThrowResult> {
        let range = self.range();
        check_contribution(contribution, range)?;

        let reveal = reveal_checked(self.commitment)?;
        let index = modular_sum(reveal.value, contribution, range);

        tracing::debug!(
            "Fair draw resolved: {} + {} = {} (mod {})",
            reveal.value,
            contribution,
            index,
            range
        );

        Ok(ThrowResult {
            contribution,
            index,
            reveal,
        })
    }
}

/// Outcome of one fair draw
#[derive(Debug, Clone)]
pub struct ThrowResult {
    pub contribution: u64,
    /// `(committed + contribution) mod range`
    pub index: u64,
    pub reveal: Reveal,
}

impl ThrowResult {
    pub fn committed(&self) -> u64 {
        self.reveal.value
    }

    pub fn range(&self) -> u64 {
        self.reveal.range
    }

    /// Face of `die` selected by this draw
    pub fn face(&self, die: &Die) -> Result<i64> {
        if die.len() as u64 != self.range() {
            return Err(DiceError::invalid_state(format!(
                "draw over {} values used with a {}-sided die",
                self.range(),
                die.len()
            )));
        }
        die.face(self.index as usize)
    }
}

/// Host commits to 0 or 1 and the player guesses it.
///
/// Unlike a throw, the guess is compared for equality with the committed
/// bit rather than added to it.
#[derive(Debug)]
pub struct FirstMoveDraw {
    commitment: Commitment,
}

impl FirstMoveDraw {
    pub fn begin<R: RngCore + CryptoRng>(generator: &mut CommitmentGenerator<R>) -> Result<Self> {
        Ok(Self {
            commitment: generator.commit(FIRST_MOVE_RANGE)?,
        })
    }

    pub fn range(&self) -> u64 {
        self.commitment.range()
    }

    pub fn digest_hex(&self) -> String {
        self.commitment.digest_hex()
    }

    pub fn resolve(self, guess: u64) -> Result<FirstMoveResult> {
        check_contribution(guess, FIRST_MOVE_RANGE)?;

        let reveal = reveal_checked(self.commitment)?;
        let player_first = reveal.value == guess;

        Ok(FirstMoveResult {
            player_first,
            reveal,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FirstMoveResult {
    /// The player moves first when the guess matched the committed bit
    pub player_first: bool,
    pub reveal: Reveal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded(seed: u64) -> CommitmentGenerator<StdRng> {
        CommitmentGenerator::with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_modular_sum_cancels_bias() {
        // Whatever the committed value, a uniform contribution gives a
        // uniform result: every residue appears exactly once.
        let range = 6;
        for committed in 0..range {
            let mut seen = vec![0u32; range as usize];
            for contribution in 0..range {
                seen[modular_sum(committed, contribution, range) as usize] += 1;
            }
            assert!(seen.iter().all(|&count| count == 1));
        }
    }

    #[test]
    fn test_modular_sum_near_u64_max() {
        let range = u64::MAX;
        assert_eq!(modular_sum(range - 1, range - 1, range), range - 2);
        assert_eq!(modular_sum(range - 1, 1, range), 0);

        let mut generator = seeded(5);
        let result = FairDraw::begin(&mut generator, range).unwrap().resolve(range - 1).unwrap();
        assert_eq!(result.index, modular_sum(result.committed(), range - 1, range));
    }

    #[test]
    fn test_fixed_contribution_still_uniform() {
        // A player who always adds 0 cannot steer the outcome either
        let mut generator = seeded(7);
        let range = 3;
        let mut seen = [0usize; 3];
        for _ in 0..3_000 {
            let result = FairDraw::begin(&mut generator, range).unwrap().resolve(0).unwrap();
            seen[result.index as usize] += 1;
        }
        assert!(seen.iter().all(|&count| count > 800), "{:?}", seen);
    }

    #[test]
    fn test_throw_resolves_face() {
        let die = Die::new(vec![10, 20, 30, 40, 50, 60]).unwrap();
        let mut generator = seeded(1);

        let draw = FairDraw::begin(&mut generator, die.len() as u64).unwrap();
        let digest = draw.digest_hex();
        let result = draw.resolve(4).unwrap();

        assert_eq!(result.reveal.digest_hex(), digest);
        assert!(result.reveal.verify().unwrap());
        assert_eq!(result.index, (result.committed() + 4) % 6);
        assert_eq!(result.face(&die).unwrap(), die.faces()[result.index as usize]);
    }

    #[test]
    fn test_throw_against_wrong_die() {
        let mut generator = seeded(2);
        let result = FairDraw::begin(&mut generator, 6).unwrap().resolve(0).unwrap();
        let small = Die::new(vec![1, 2]).unwrap();
        assert!(matches!(result.face(&small), Err(DiceError::InvalidState(_))));
    }

    #[test]
    fn test_out_of_range_contribution() {
        let mut generator = seeded(3);
        let draw = FairDraw::begin(&mut generator, 6).unwrap();
        assert!(matches!(draw.resolve(6), Err(DiceError::InvalidState(_))));
    }

    #[test]
    fn test_first_move_uses_equality() {
        let mut generator = seeded(4);
        for _ in 0..20 {
            let draw = FirstMoveDraw::begin(&mut generator).unwrap();
            assert_eq!(draw.range(), FIRST_MOVE_RANGE);

            let result = draw.resolve(1).unwrap();
            assert!(result.reveal.value < 2);
            assert_eq!(result.player_first, result.reveal.value == 1);
        }
    }
}
