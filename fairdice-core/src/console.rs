use crate::{DiceError, Die, ProbabilityMatrix, Result};
use async_trait::async_trait;
use std::fmt;

/// Which decision a menu is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    FirstMove,
    ChooseDie,
    HostThrow,
    PlayerThrow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub value: u64,
    pub label: String,
}

impl MenuOption {
    pub fn new(value: u64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// What the player answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Pick(u64),
    Help,
    Exit,
}

/// A numbered list of choices. `X` exits and `?` asks for help at every menu.
#[derive(Debug, Clone)]
pub struct Menu {
    pub kind: MenuKind,
    pub title: String,
    pub options: Vec<MenuOption>,
}

impl Menu {
    pub fn new(kind: MenuKind, title: impl Into<String>, options: Vec<MenuOption>) -> Self {
        Self {
            kind,
            title: title.into(),
            options,
        }
    }

    /// Numbers `0..range`, each labelled by itself
    pub fn numbers(kind: MenuKind, title: impl Into<String>, range: u64) -> Self {
        let options = (0..range)
            .map(|value| MenuOption::new(value, value.to_string()))
            .collect();
        Self::new(kind, title, options)
    }

    pub fn parse(&self, input: &str) -> Result<Selection> {
        let input = input.trim();
        match input {
            "x" | "X" => return Ok(Selection::Exit),
            "?" => return Ok(Selection::Help),
            _ => {}
        }

        let value = input
            .parse::<u64>()
            .map_err(|_| DiceError::invalid_selection(format!("'{}' is not a menu option", input)))?;

        if self.options.iter().any(|option| option.value == value) {
            Ok(Selection::Pick(value))
        } else {
            Err(DiceError::invalid_selection(format!(
                "{} is not one of the listed options",
                value
            )))
        }
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for option in &self.options {
            writeln!(f, "{} - {}", option.value, option.label)?;
        }
        writeln!(f, "X - exit")?;
        write!(f, "? - help")
    }
}

/// The interactive surface the game talks through
#[async_trait]
pub trait Console: Send {
    /// Show `menu` and wait for one line. `None` means input is closed.
    async fn ask(&mut self, menu: &Menu) -> Result<Option<String>>;

    fn say(&mut self, line: &str);

    fn show_help(&mut self, dice: &[Die], matrix: &ProbabilityMatrix);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    type Responder = Box<dyn FnMut(&Menu, &[String]) -> Option<String> + Send>;

    /// Console driven by a closure; records everything the game prints
    pub struct ScriptedConsole {
        responder: Responder,
        pub transcript: Vec<String>,
        pub asked: Vec<MenuKind>,
        pub help_shown: usize,
    }

    impl ScriptedConsole {
        pub fn with_responder(
            responder: impl FnMut(&Menu, &[String]) -> Option<String> + Send + 'static,
        ) -> Self {
            Self {
                responder: Box::new(responder),
                transcript: Vec::new(),
                asked: Vec::new(),
                help_shown: 0,
            }
        }

        /// Answers taken in order; input closes when they run out
        pub fn with_answers(answers: &[&str]) -> Self {
            let mut queue: std::collections::VecDeque<String> =
                answers.iter().map(|answer| answer.to_string()).collect();
            Self::with_responder(move |_, _| queue.pop_front())
        }

        pub fn count(&self, needle: &str) -> usize {
            self.transcript.iter().filter(|line| line.contains(needle)).count()
        }
    }

    #[async_trait]
    impl Console for ScriptedConsole {
        async fn ask(&mut self, menu: &Menu) -> Result<Option<String>> {
            self.asked.push(menu.kind);
            self.transcript.push(menu.to_string());
            Ok((self.responder)(menu, &self.transcript))
        }

        fn say(&mut self, line: &str) {
            self.transcript.push(line.to_string());
        }

        fn show_help(&mut self, _dice: &[Die], _matrix: &ProbabilityMatrix) {
            self.help_shown += 1;
        }
    }
}
