use privat_rates::MAX_DAYS;
use std::{fmt, num::IntErrorKind};

pub const TOO_MANY_DAYS: &str = "Error: Maximum number of days is 10";

/// One line of client input, split on whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInvocation {
    pub name: String,
    pub params: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Exchange { days: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    TooManyDays,
    InvalidDays(String),
    Unknown(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooManyDays => f.write_str(TOO_MANY_DAYS),
            Rejection::InvalidDays(param) => write!(f, "Error: Invalid number of days '{param}'"),
            Rejection::Unknown(name) => write!(f, "Error: Unknown command '{name}'"),
        }
    }
}

impl CommandInvocation {
    /// `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().map(str::to_string);
        let name = tokens.next()?;
        Some(Self {
            name,
            params: tokens.collect(),
        })
    }

    pub fn command(&self) -> Result<Command, Rejection> {
        match self.name.as_str() {
            "exchange" => {
                let days = match self.params.first() {
                    Some(param) => parse_days(param)?,
                    None => 1,
                };
                Ok(Command::Exchange { days })
            }
            other => Err(Rejection::Unknown(other.to_string())),
        }
    }
}

/// Values above the limit are rejected, values below one are raised to one.
fn parse_days(param: &str) -> Result<u32, Rejection> {
    let days = match param.parse::<i64>() {
        Ok(days) => days,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => return Err(Rejection::TooManyDays),
            IntErrorKind::NegOverflow => 1,
            _ => return Err(Rejection::InvalidDays(param.to_string())),
        },
    };
    if days > i64::from(MAX_DAYS) {
        return Err(Rejection::TooManyDays);
    }
    Ok(days.max(1) as u32)
}
