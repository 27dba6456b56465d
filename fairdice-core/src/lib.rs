//! Provably fair non-transitive dice for two parties.
//!
//! The host commits to every random value with HMAC-SHA3-256 before the
//! player answers, then reveals the key so the player can check nothing
//! was swapped. Each throw is `(committed + player's number) mod faces`,
//! which stays uniform whatever number the player picks.

pub mod commitment;
pub mod config;
pub mod console;
pub mod die;
pub mod error;
pub mod game;
pub mod probability;
pub mod protocol;

pub use commitment::{verify_disclosure, Commitment, CommitmentGenerator, CommitmentScheme, HmacSha3, Reveal};
pub use config::{GameConfig, MIN_DICE};
pub use console::{Console, Menu, MenuKind, MenuOption, Selection};
pub use die::Die;
pub use error::{DiceError, Result};
pub use game::{Game, GameState, GameSummary, Mover, Outcome, RoundRecord};
pub use probability::{win_probability, ProbabilityMatrix};
pub use protocol::{FairDraw, FirstMoveDraw, FirstMoveResult, ThrowResult};

/// Start a game on the given console with OS randomness
pub fn new_game<C: Console>(config: GameConfig, console: C) -> Game<C> {
    Game::new(config, console)
}
