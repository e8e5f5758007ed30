//! User input for the terminal front-end
//!
//! One command per line. The picker and the confirm/cancel bar are driven by
//! `select`, `confirm` and `cancel`; `plane` stands in for the camera finding
//! a surface.

use perch_core::math::Vec3;
use std::str::FromStr;
use thiserror::Error;

/// Which model a `select` refers to
#[derive(Debug, Clone, PartialEq)]
pub enum ModelRef {
    Index(usize),
    Name(String),
}

/// Orientation given to `plane`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneKind {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    List,
    Select(ModelRef),
    Cancel,
    Confirm,
    Plane { kind: PlaneKind, position: Vec3 },
    Tick(u32),
    Wait,
    Scene,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid argument '{value}' for '{command}'")]
    InvalidArgument { command: &'static str, value: String },
}

pub const HELP: &str = "\
commands:
  list                     show the model picker
  select <name|index>      pick a model for placement
  confirm                  place the picked model
  cancel                   put the picked model back
  plane <h|v> <x> <y> <z>  report a detected plane
  tick [n]                 run n refresh cycles (default 1)
  wait                     wait for every model to finish loading
  scene                    show anchored models
  help                     show this message
  quit                     exit";

impl FromStr for UiCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(CommandParseError::Empty)?;

        let parsed = match command {
            "list" | "ls" => UiCommand::List,
            "cancel" | "x" => UiCommand::Cancel,
            "confirm" | "ok" => UiCommand::Confirm,
            "wait" => UiCommand::Wait,
            "scene" => UiCommand::Scene,
            "help" | "?" => UiCommand::Help,
            "quit" | "exit" | "q" => UiCommand::Quit,
            "select" => {
                let target = words.collect::<Vec<_>>().join(" ");
                if target.is_empty() {
                    return Err(CommandParseError::MissingArgument {
                        command: "select",
                        expected: "a model name or index",
                    });
                }
                match target.parse::<usize>() {
                    Ok(index) => UiCommand::Select(ModelRef::Index(index)),
                    Err(_) => UiCommand::Select(ModelRef::Name(target)),
                }
            }
            "tick" => match words.next() {
                None => UiCommand::Tick(1),
                Some(n) => UiCommand::Tick(n.parse().map_err(|_| {
                    CommandParseError::InvalidArgument {
                        command: "tick",
                        value: n.to_string(),
                    }
                })?),
            },
            "plane" => parse_plane(&mut words)?,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };

        Ok(parsed)
    }
}

fn parse_plane<'a>(
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<UiCommand, CommandParseError> {
    const EXPECTED: &str = "an orientation (h|v) and three coordinates";

    let kind = match words.next() {
        Some("h" | "horizontal") => PlaneKind::Horizontal,
        Some("v" | "vertical") => PlaneKind::Vertical,
        Some(other) => {
            return Err(CommandParseError::InvalidArgument {
                command: "plane",
                value: other.to_string(),
            })
        }
        None => {
            return Err(CommandParseError::MissingArgument {
                command: "plane",
                expected: EXPECTED,
            })
        }
    };

    let mut coords = [0.0f32; 3];
    for coord in &mut coords {
        let word = words.next().ok_or(CommandParseError::MissingArgument {
            command: "plane",
            expected: EXPECTED,
        })?;
        *coord = word.parse().map_err(|_| CommandParseError::InvalidArgument {
            command: "plane",
            value: word.to_string(),
        })?;
    }

    Ok(UiCommand::Plane {
        kind,
        position: Vec3::from_array(coords),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("list".parse::<UiCommand>(), Ok(UiCommand::List));
        assert_eq!("  confirm ".parse::<UiCommand>(), Ok(UiCommand::Confirm));
        assert_eq!("cancel".parse::<UiCommand>(), Ok(UiCommand::Cancel));
        assert_eq!("tick".parse::<UiCommand>(), Ok(UiCommand::Tick(1)));
        assert_eq!("tick 5".parse::<UiCommand>(), Ok(UiCommand::Tick(5)));
    }

    #[test]
    fn test_parse_select() {
        assert_eq!("select 2".parse::<UiCommand>(), Ok(UiCommand::Select(ModelRef::Index(2))));
        assert_eq!(
            "select toy robot".parse::<UiCommand>(),
            Ok(UiCommand::Select(ModelRef::Name("toy robot".to_string())))
        );
        assert!(matches!(
            "select".parse::<UiCommand>(),
            Err(CommandParseError::MissingArgument { command: "select", .. })
        ));
    }

    #[test]
    fn test_parse_plane() {
        assert_eq!(
            "plane v 0 1.5 -2".parse::<UiCommand>(),
            Ok(UiCommand::Plane {
                kind: PlaneKind::Vertical,
                position: Vec3::new(0.0, 1.5, -2.0),
            })
        );
        assert!(matches!(
            "plane h 0 1".parse::<UiCommand>(),
            Err(CommandParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            "plane diagonal 0 0 0".parse::<UiCommand>(),
            Err(CommandParseError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<UiCommand>(), Err(CommandParseError::Empty));
        assert_eq!(
            "jump".parse::<UiCommand>(),
            Err(CommandParseError::Unknown("jump".to_string()))
        );
    }
}
