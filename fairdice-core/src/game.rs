use crate::commitment::CommitmentGenerator;
use crate::console::{Console, Menu, MenuKind, MenuOption, Selection};
use crate::die::uniform_index;
use crate::protocol::{FairDraw, FirstMoveDraw};
use crate::{DiceError, Die, GameConfig, ProbabilityMatrix, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::Serialize;
use std::cmp::Ordering;
use uuid::Uuid;

/// Game loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Start,
    FirstMovePending,
    ChooseDice,
    HostThrow,
    PlayerThrow,
    Compare,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mover {
    Host,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    PlayerWins,
    HostWins,
    Tie,
}

impl Outcome {
    /// Higher face wins, equal faces tie
    pub fn compare(player_face: i64, host_face: i64) -> Self {
        match player_face.cmp(&host_face) {
            Ordering::Greater => Outcome::PlayerWins,
            Ordering::Less => Outcome::HostWins,
            Ordering::Equal => Outcome::Tie,
        }
    }
}

/// One finished round
#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    pub round: usize,
    pub host_die: usize,
    pub player_die: usize,
    pub host_face: i64,
    pub player_face: i64,
    pub outcome: Outcome,
}

/// What a game leaves behind once the player exits
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub id: Uuid,
    pub first_mover: Option<Mover>,
    pub rounds: Vec<RoundRecord>,
}

impl GameSummary {
    fn count(&self, outcome: Outcome) -> usize {
        self.rounds.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn player_wins(&self) -> usize {
        self.count(Outcome::PlayerWins)
    }

    pub fn host_wins(&self) -> usize {
        self.count(Outcome::HostWins)
    }

    pub fn ties(&self) -> usize {
        self.count(Outcome::Tie)
    }
}

/// Round state between die selection and comparison
#[derive(Debug, Clone, Default)]
struct RoundInProgress {
    host_die: usize,
    player_die: usize,
    host_face: Option<i64>,
    player_face: Option<i64>,
}

/// Host-versus-player dice game over a [`Console`].
///
/// The host is this process. Every random value it contributes is
/// committed before the player is asked for anything.
pub struct Game<C, R = OsRng> {
    id: Uuid,
    dice: Vec<Die>,
    generator: CommitmentGenerator<R>,
    console: C,
    state: GameState,
    first_mover: Option<Mover>,
    round: RoundInProgress,
    history: Vec<RoundRecord>,
    matrix: Option<ProbabilityMatrix>,
}

impl<C: Console> Game<C, OsRng> {
    pub fn new(config: GameConfig, console: C) -> Self {
        Self::with_rng(config, console, OsRng)
    }
}

impl<C: Console, R: RngCore + CryptoRng + Send> Game<C, R> {
    pub fn with_rng(config: GameConfig, console: C, rng: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            dice: config.dice,
            generator: CommitmentGenerator::with_rng(rng),
            console,
            state: GameState::Start,
            first_mover: None,
            round: RoundInProgress::default(),
            history: Vec::new(),
            matrix: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Play rounds until the player exits
    pub async fn run(&mut self) -> Result<GameSummary> {
        while self.state != GameState::Exit {
            self.state = self.step().await?;
        }

        Ok(self.summary())
    }

    /// Advance one state
    pub async fn step(&mut self) -> Result<GameState> {
        match self.state {
            GameState::Start => self.start(),
            GameState::FirstMovePending => self.first_move().await,
            GameState::ChooseDice => self.choose_dice().await,
            GameState::HostThrow => self.host_throw().await,
            GameState::PlayerThrow => self.player_throw().await,
            GameState::Compare => self.compare(),
            GameState::Exit => Ok(GameState::Exit),
        }
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id,
            first_mover: self.first_mover,
            rounds: self.history.clone(),
        }
    }

    fn start(&mut self) -> Result<GameState> {
        GameConfig::new(self.dice.clone())?;
        tracing::info!("Game {} started with {} dice", self.id, self.dice.len());
        Ok(GameState::FirstMovePending)
    }

    async fn first_move(&mut self) -> Result<GameState> {
        self.console.say("Let's determine who makes the first move.");

        let draw = FirstMoveDraw::begin(&mut self.generator)?;
        self.console.say(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            draw.range() - 1,
            draw.digest_hex()
        ));

        let menu = Menu::numbers(MenuKind::FirstMove, "Try to guess my selection.", draw.range());
        let Some(guess) = self.prompt(&menu).await? else {
            return Ok(self.exit());
        };

        let result = draw.resolve(guess)?;
        self.console.say(&format!(
            "My selection: {} (KEY={}).",
            result.reveal.value,
            result.reveal.key_hex()
        ));

        let mover = if result.player_first {
            self.console.say("You guessed right, you make the first move.");
            Mover::Player
        } else {
            self.console.say("Wrong guess, I make the first move.");
            Mover::Host
        };

        tracing::info!("Game {} first move: {:?}", self.id, mover);
        self.first_mover = Some(mover);
        Ok(GameState::ChooseDice)
    }

    async fn choose_dice(&mut self) -> Result<GameState> {
        let mover = self
            .first_mover
            .ok_or_else(|| DiceError::invalid_state("dice chosen before the first move was decided"))?;

        let (host_die, player_die) = match mover {
            Mover::Host => {
                let host_die = self.host_pick(None)?;
                self.console.say(&format!(
                    "I make the first move and choose die #{} {}.",
                    host_die, self.dice[host_die]
                ));
                let Some(player_die) = self.player_pick(Some(host_die)).await? else {
                    return Ok(self.exit());
                };
                (host_die, player_die)
            }
            Mover::Player => {
                let Some(player_die) = self.player_pick(None).await? else {
                    return Ok(self.exit());
                };
                let host_die = self.host_pick(Some(player_die))?;
                self.console.say(&format!(
                    "You chose die #{}. I choose die #{} {}.",
                    player_die, host_die, self.dice[host_die]
                ));
                (host_die, player_die)
            }
        };

        self.round = RoundInProgress {
            host_die,
            player_die,
            ..Default::default()
        };
        Ok(GameState::HostThrow)
    }

    async fn host_throw(&mut self) -> Result<GameState> {
        self.console.say("It's time for my throw.");
        let Some(face) = self.fair_throw(self.round.host_die, MenuKind::HostThrow).await? else {
            return Ok(self.exit());
        };

        self.console.say(&format!("My throw is {}.", face));
        self.round.host_face = Some(face);
        Ok(GameState::PlayerThrow)
    }

    async fn player_throw(&mut self) -> Result<GameState> {
        self.console.say("It's time for your throw.");
        let Some(face) = self.fair_throw(self.round.player_die, MenuKind::PlayerThrow).await? else {
            return Ok(self.exit());
        };

        self.console.say(&format!("Your throw is {}.", face));
        self.round.player_face = Some(face);
        Ok(GameState::Compare)
    }

    fn compare(&mut self) -> Result<GameState> {
        let (Some(host_face), Some(player_face)) = (self.round.host_face, self.round.player_face) else {
            return Err(DiceError::invalid_state("comparing before both throws resolved"));
        };

        let outcome = Outcome::compare(player_face, host_face);
        let line = match outcome {
            Outcome::PlayerWins => format!("You win ({} > {})!", player_face, host_face),
            Outcome::HostWins => format!("I win ({} > {})!", host_face, player_face),
            Outcome::Tie => format!("It's a tie ({} = {})!", player_face, host_face),
        };
        self.console.say(&line);

        let record = RoundRecord {
            round: self.history.len() + 1,
            host_die: self.round.host_die,
            player_die: self.round.player_die,
            host_face,
            player_face,
            outcome,
        };
        tracing::info!("Game {} round {}: {:?}", self.id, record.round, outcome);
        self.history.push(record);

        Ok(GameState::ChooseDice)
    }

    fn exit(&mut self) -> GameState {
        self.console.say("Goodbye!");
        if !self.history.is_empty() {
            let summary = self.summary();
            self.console.say(&format!(
                "Rounds: {}. You won {}, I won {}, ties {}.",
                summary.rounds.len(),
                summary.player_wins(),
                summary.host_wins(),
                summary.ties()
            ));
        }

        tracing::info!("Game {} exited after {} rounds", self.id, self.history.len());
        GameState::Exit
    }

    /// One commit, contribute, reveal cycle over `die_index`'s faces.
    /// `None` when the player exits before contributing.
    async fn fair_throw(&mut self, die_index: usize, kind: MenuKind) -> Result<Option<i64>> {
        let range = self.dice[die_index].len() as u64;

        let draw = FairDraw::begin(&mut self.generator, range)?;
        self.console.say(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            range - 1,
            draw.digest_hex()
        ));

        let menu = Menu::numbers(kind, format!("Add your number modulo {}.", range), range);
        let Some(contribution) = self.prompt(&menu).await? else {
            tracing::debug!("Abandoning unrevealed commitment on exit");
            return Ok(None);
        };

        let result = draw.resolve(contribution)?;
        self.console.say(&format!(
            "My number is {} (KEY={}).",
            result.committed(),
            result.reveal.key_hex()
        ));
        self.console.say(&format!(
            "The fair number generation result is {} + {} = {} (mod {}).",
            result.committed(),
            result.contribution,
            result.index,
            range
        ));

        result.face(&self.dice[die_index]).map(Some)
    }

    /// Host takes a die uniformly from those not yet taken this round
    fn host_pick(&mut self, taken: Option<usize>) -> Result<usize> {
        let available: Vec<usize> = (0..self.dice.len()).filter(|&i| Some(i) != taken).collect();
        let pick = uniform_index(self.generator.rng(), available.len())?;
        Ok(available[pick])
    }

    async fn player_pick(&mut self, taken: Option<usize>) -> Result<Option<usize>> {
        let options = self
            .dice
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != taken)
            .map(|(i, die)| MenuOption::new(i as u64, die.to_string()))
            .collect();

        let menu = Menu::new(MenuKind::ChooseDie, "Choose your die:", options);
        Ok(self.prompt(&menu).await?.map(|index| index as usize))
    }

    /// Ask until the answer is a listed option. Bad answers and help
    /// requests repeat the same menu, so any outstanding commitment stays
    /// as it was. `None` means the player wants out.
    async fn prompt(&mut self, menu: &Menu) -> Result<Option<u64>> {
        loop {
            let Some(line) = self.console.ask(menu).await? else {
                return Ok(None);
            };

            match menu.parse(&line) {
                Ok(Selection::Pick(value)) => return Ok(Some(value)),
                Ok(Selection::Exit) => return Ok(None),
                Ok(Selection::Help) => self.show_help(),
                Err(e) if e.is_recoverable() => {
                    tracing::debug!("Game {} rejected input: {}", self.id, e);
                    self.console.say(&format!("{}. Try again.", e));
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn show_help(&mut self) {
        let Self {
            dice,
            matrix,
            console,
            ..
        } = self;
        let matrix = matrix.get_or_insert_with(|| ProbabilityMatrix::compute(dice));
        console.show_help(dice, matrix);
    }
}
