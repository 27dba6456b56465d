use crate::{DiceError, Result};
use rand::{CryptoRng, Rng};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A die with an arbitrary ordered list of integer faces.
///
/// Faces may repeat and need not start at 1. The order matters: the face
/// index is the value the fair-throw protocol resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Die {
    faces: Vec<i64>,
}

impl Die {
    pub fn new(faces: Vec<i64>) -> Result<Self> {
        if faces.is_empty() {
            return Err(DiceError::configuration("a die needs at least one face"));
        }
        Ok(Self { faces })
    }

    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    /// Number of faces, which is also the range of a throw
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn face(&self, index: usize) -> Result<i64> {
        self.faces.get(index).copied().ok_or_else(|| {
            DiceError::invalid_state(format!(
                "face index {} out of range for a {}-sided die",
                index,
                self.faces.len()
            ))
        })
    }

    /// Uniformly random face index in `[0, len)`
    pub fn draw_uniform_index<R: Rng + CryptoRng>(&self, rng: &mut R) -> Result<usize> {
        uniform_index(rng, self.faces.len())
    }
}

/// Uniform index in `[0, len)` from a secure source. `gen_range` rejects
/// out-of-zone samples, so there is no modulo bias.
pub fn uniform_index<R: Rng + CryptoRng>(rng: &mut R, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(DiceError::invalid_state("cannot pick from an empty set"));
    }
    Ok(rng.gen_range(0..len))
}

impl FromStr for Die {
    type Err = DiceError;

    /// Parses a comma-separated face list such as `2,2,4,4,9,9`.
    fn from_str(spec: &str) -> Result<Self> {
        if spec.trim().is_empty() {
            return Err(DiceError::configuration("empty die specification"));
        }

        let faces = spec
            .split(',')
            .map(|raw| {
                let raw = raw.trim();
                raw.parse::<i64>().map_err(|_| {
                    DiceError::configuration(format!(
                        "face '{}' in die '{}' is not an integer",
                        raw, spec
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Die::new(faces)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(|face| face.to_string()).collect();
        write!(f, "[{}]", faces.join(","))
    }
}
