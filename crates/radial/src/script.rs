//! Line-oriented drag event scripts.
//!
//! One event per line:
//!
//! ```text
//! resize 100 100 310 310   # ring bounding box: x y width height
//! start p7                 # drag-start with the active item id
//! move 310 160             # pointer position in client coordinates
//! end
//! switch 1 | add | delete 1
//! wait 150                 # advance the clock by 150 ms
//! ```
//!
//! Blank lines and `#` comments are ignored.

use crate::events::AppEvent;
use sectors::{ItemId, Point, Rect};
use std::str::FromStr;
use std::time::Duration;
use strum::{Display, EnumString};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum Verb {
    Resize,
    Start,
    Move,
    End,
    Switch,
    Add,
    Delete,
    Wait,
}

impl Verb {
    fn arity(self) -> usize {
        match self {
            Self::Resize => 4,
            Self::Move => 2,
            Self::Start | Self::Switch | Self::Delete | Self::Wait => 1,
            Self::End | Self::Add => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Event(AppEvent),
    Wait(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    /// 1-based line number in the source.
    pub line: usize,
    pub step: ScriptStep,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("unknown command '{0}'")]
    UnknownVerb(String),
    #[error("'{verb}' takes {expected} argument(s), got {found}")]
    Arity {
        verb: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: LineError,
}

fn number<T: FromStr>(arg: &str) -> Result<T, LineError> {
    arg.parse()
        .map_err(|_| LineError::InvalidNumber(arg.to_string()))
}

/// Parses one line; `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<ScriptStep>, LineError> {
    let content = line.split('#').next().unwrap_or_default().trim();
    let mut words = content.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let verb =
        Verb::from_str(head).map_err(|_| LineError::UnknownVerb(head.to_string()))?;
    let args: Vec<&str> = words.collect();
    if args.len() != verb.arity() {
        return Err(LineError::Arity {
            verb: verb.to_string(),
            expected: verb.arity(),
            found: args.len(),
        });
    }

    let event = match verb {
        Verb::Resize => AppEvent::Resize(Rect::new(
            number(args[0])?,
            number(args[1])?,
            number(args[2])?,
            number(args[3])?,
        )),
        Verb::Start => AppEvent::DragStart(ItemId::from(args[0])),
        Verb::Move => AppEvent::PointerMove(Point::new(number(args[0])?, number(args[1])?)),
        Verb::End => AppEvent::DragEnd,
        Verb::Switch => AppEvent::SwitchMenu(number(args[0])?),
        Verb::Add => AppEvent::AddMenu,
        Verb::Delete => AppEvent::DeleteMenu(number(args[0])?),
        Verb::Wait => return Ok(Some(ScriptStep::Wait(Duration::from_millis(number(args[0])?)))),
    };
    Ok(Some(ScriptStep::Event(event)))
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut steps = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let parsed = parse_line(line).map_err(|source| ScriptError {
            line: i + 1,
            source,
        })?;
        if let Some(step) = parsed {
            steps.push(ScriptLine { line: i + 1, step });
        }
    }
    Ok(steps)
}
