pub mod scheme;

pub use scheme::{CommitmentScheme, HmacSha3};

use crate::{DiceError, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};
use std::fmt;

/// Secret key size in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// The committed message is the decimal string of the value
fn message_for(value: u64) -> Vec<u8> {
    value.to_string().into_bytes()
}

/// Fresh random key for a single commitment
pub fn generate_key<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; KEY_SIZE] {
    let mut key = [0u8; KEY_SIZE];
    rng.fill_bytes(&mut key);
    key
}

/// Binding to a random value in `[0, range)`.
///
/// Only the digest may be shown before the counterpart contributes. The key
/// and value stay private until [`Commitment::reveal`], which consumes the
/// commitment so it can never be revealed twice or reused.
pub struct Commitment {
    range: u64,
    value: u64,
    key: [u8; KEY_SIZE],
    digest: Vec<u8>,
}

impl Commitment {
    pub fn range(&self) -> u64 {
        self.range
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(&self.digest)
    }

    /// Recompute the digest from the withheld key and value
    pub fn verify(&self) -> Result<bool> {
        HmacSha3::verify(&self.key, &message_for(self.value), &self.digest)
    }

    pub fn reveal(self) -> Reveal {
        Reveal {
            range: self.range,
            value: self.value,
            key: self.key,
            digest: self.digest,
        }
    }
}

// Keep key and value out of logs
impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("range", &self.range)
            .field("digest", &self.digest_hex())
            .finish()
    }
}

/// A disclosed commitment: everything a third party needs to check the digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub range: u64,
    pub value: u64,
    pub key: [u8; KEY_SIZE],
    pub digest: Vec<u8>,
}

impl Reveal {
    pub fn key_hex(&self) -> String {
        hex::encode(self.key)
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(&self.digest)
    }

    pub fn verify(&self) -> Result<bool> {
        Ok(self.value < self.range
            && HmacSha3::verify(&self.key, &message_for(self.value), &self.digest)?)
    }
}

/// Check a disclosed `(key, value)` pair against a digest seen earlier.
/// Both key and digest are hex strings as printed by the game.
pub fn verify_disclosure(key_hex: &str, value: u64, digest_hex: &str) -> Result<bool> {
    let key = hex::decode(key_hex.trim())?;
    if key.len() != KEY_SIZE {
        return Err(DiceError::crypto(format!(
            "key must be {} bytes, got {}",
            KEY_SIZE,
            key.len()
        )));
    }
    let digest = hex::decode(digest_hex.trim())?;

    HmacSha3::verify(&key, &message_for(value), &digest)
}

/// Produces commitments from a cryptographically secure generator
pub struct CommitmentGenerator<R = OsRng> {
    rng: R,
}

impl CommitmentGenerator<OsRng> {
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for CommitmentGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> CommitmentGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Commit to a value drawn uniformly from `[0, range)`.
    ///
    /// `gen_range` rejects out-of-zone samples, so there is no modulo bias
    /// when `range` does not divide the generator's output space.
    pub fn commit(&mut self, range: u64) -> Result<Commitment> {
        if range == 0 {
            return Err(DiceError::invalid_state("commitment range must be positive"));
        }

        let key = generate_key(&mut self.rng);
        let value = self.rng.gen_range(0..range);
        let digest = HmacSha3::digest(&key, &message_for(value))?;

        tracing::debug!("Committed to a value in 0..{}", range - 1);
        Ok(Commitment {
            range,
            value,
            key,
            digest,
        })
    }

    /// The secure source behind every commitment, for the host's other draws
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded() -> CommitmentGenerator<StdRng> {
        CommitmentGenerator::with_rng(StdRng::seed_from_u64(0x5eed))
    }

    #[test]
    fn test_commitment_verifies() {
        let mut generator = CommitmentGenerator::new();
        for range in [1, 2, 3, 6, 7, 20, 1000] {
            let commitment = generator.commit(range).unwrap();
            assert!(commitment.verify().unwrap());

            let reveal = commitment.reveal();
            assert!(reveal.value < range);
            assert!(reveal.verify().unwrap());
            assert!(verify_disclosure(&reveal.key_hex(), reveal.value, &reveal.digest_hex()).unwrap());
        }
    }

    #[test]
    fn test_digest_matches_independent_hmac() {
        use hmac::{Hmac, Mac};
        use sha3::Sha3_256;

        let reveal = seeded().commit(6).unwrap().reveal();
        let mut mac = Hmac::<Sha3_256>::new_from_slice(&reveal.key).unwrap();
        mac.update(reveal.value.to_string().as_bytes());
        assert_eq!(mac.finalize().into_bytes().to_vec(), reveal.digest);
    }

    #[test]
    fn test_substituted_value_is_detected() {
        let reveal = seeded().commit(6).unwrap().reveal();
        let other = (reveal.value + 1) % 6;

        assert!(!verify_disclosure(&reveal.key_hex(), other, &reveal.digest_hex()).unwrap());

        let mut forged = reveal.clone();
        forged.value = other;
        assert!(!forged.verify().unwrap());
    }

    #[test]
    fn test_fresh_key_per_commitment() {
        let mut generator = seeded();
        let a = generator.commit(2).unwrap().reveal();
        let b = generator.commit(2).unwrap().reveal();
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn test_zero_range_is_rejected() {
        assert!(matches!(
            seeded().commit(0),
            Err(DiceError::InvalidState(_))
        ));
    }

    #[test]
    fn test_bad_disclosure_encoding() {
        assert!(verify_disclosure("zz", 1, "00").is_err());
        assert!(verify_disclosure("00ff", 1, "00").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let commitment = seeded().commit(6).unwrap();
        let printed = format!("{:?}", commitment);
        let key_hex = commitment.reveal().key_hex();
        assert!(!printed.contains(&key_hex));
        assert!(!printed.contains("value"));
    }

    #[test]
    fn test_committed_values_are_uniform() {
        // chi-square, 5 degrees of freedom, critical value at p = 0.001
        const CRITICAL: f64 = 20.515;
        const RANGE: u64 = 6;
        const TRIALS: usize = 60_000;

        let mut generator = seeded();
        let mut counts = [0usize; RANGE as usize];
        for _ in 0..TRIALS {
            let value = generator.commit(RANGE).unwrap().reveal().value;
            counts[value as usize] += 1;
        }

        let expected = TRIALS as f64 / RANGE as f64;
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let delta = observed as f64 - expected;
                delta * delta / expected
            })
            .sum();

        assert!(chi_square < CRITICAL, "chi-square {} for {:?}", chi_square, counts);
    }
}
