use hearts_core::model::card::Card;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// One line typed at the terminal prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bare card codes: three while passing, one while playing.
    Cards(Vec<Card>),
    Show,
    Save(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("{0}")]
    BadCard(#[from] hearts_core::error::GameError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let first = words.next().ok_or(CommandError::Empty)?;
        match first.to_ascii_lowercase().as_str() {
            "show" | "table" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "save" => words
                .next()
                .map(|path| Command::Save(PathBuf::from(path)))
                .ok_or(CommandError::MissingArgument("save <file>")),
            _ => {
                let cards = std::iter::once(first)
                    .chain(words)
                    .flat_map(|word| word.split(','))
                    .filter(|code| !code.is_empty())
                    .map(Card::from_code)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Command::Cards(cards))
            }
        }
    }
}

pub const HELP: &str = "\
Commands:
  <cards>       card codes such as `Qs`, `10h` or `2c`; three to pass, one to play
  show          print the table again
  save <file>   write the session to a JSON file
  help          this text
  quit          leave without saving";
