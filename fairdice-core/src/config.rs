use crate::{DiceError, Die, Result};

/// Fewest dice a game accepts; fewer would leave no non-transitive cycle to play with
pub const MIN_DICE: usize = 3;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub dice: Vec<Die>,
}

impl GameConfig {
    pub fn new(dice: Vec<Die>) -> Result<Self> {
        let config = Self { dice };
        config.validate()?;
        Ok(config)
    }

    /// Build from raw specifications like `["2,2,4,4,9,9", "6,8,1,1,8,6", ...]`
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let dice = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.as_ref().parse::<Die>().map_err(|e| match e {
                    DiceError::Configuration(msg) => {
                        DiceError::configuration(format!("die #{}: {}", index, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(dice)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dice.len() < MIN_DICE {
            return Err(DiceError::configuration(format!(
                "at least {} dice are required, got {} (example: fairdice play 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3)",
                MIN_DICE,
                self.dice.len()
            )));
        }

        Ok(())
    }
}
