use std::fmt;

use serde::Deserialize;

/// How the free-text command arguments are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandConvention {
    /// `<collection> & <environment> & <iterations>`
    Separated,
    /// `<environment> <iterations>`; the collection comes from configuration.
    Positional,
}

/// Parsed command arguments, ready for name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    /// `None` when the convention does not carry a collection.
    pub collection: Option<String>,
    pub environment: String,
    pub iterations: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    MissingCommand,
    MissingArgument(&'static str),
    InvalidIterationCount(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::MissingCommand => f.write_str("Missing Slack command arguments"),
            CommandError::MissingArgument(name) => write!(f, "Missing {name} argument"),
            CommandError::InvalidIterationCount(raw) => write!(
                f,
                "Iteration count must be a positive whole number, got `{raw}`"
            ),
        }
    }
}

const SEPARATOR: char = '&';

pub struct CommandParser;

impl CommandParser {
    /// Parse the command text using `convention`; absent iteration counts use `default_iterations`.
    pub fn parse(
        text: &str,
        convention: CommandConvention,
        default_iterations: u32,
    ) -> Result<CommandArgs, CommandError> {
        // Step 1: Reject empty commands up front.
        let text = text.trim();
        if text.is_empty() {
            return Err(CommandError::MissingCommand);
        }

        // Step 2: Split into tokens according to the convention.
        match convention {
            CommandConvention::Separated => {
                let mut parts = text.split(SEPARATOR).map(str::trim);
                let collection = non_empty(parts.next())
                    .ok_or(CommandError::MissingArgument("Collection"))?;
                let environment = non_empty(parts.next())
                    .ok_or(CommandError::MissingArgument("Environment"))?;
                let iterations = parse_iterations(non_empty(parts.next()), default_iterations)?;
                Ok(CommandArgs {
                    collection: Some(collection.to_string()),
                    environment: environment.to_string(),
                    iterations,
                })
            }
            CommandConvention::Positional => {
                let mut tokens = text.split_whitespace();
                let environment = tokens
                    .next()
                    .ok_or(CommandError::MissingArgument("Environment"))?;
                let iterations = parse_iterations(tokens.next(), default_iterations)?;
                Ok(CommandArgs {
                    collection: None,
                    environment: environment.to_string(),
                    iterations,
                })
            }
        }
    }
}

fn non_empty(part: Option<&str>) -> Option<&str> {
    part.filter(|p| !p.is_empty())
}

fn parse_iterations(raw: Option<&str>, default_iterations: u32) -> Result<u32, CommandError> {
    let Some(raw) = raw else {
        return Ok(default_iterations.max(1));
    };
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidIterationCount(raw.to_string())),
    }
}
