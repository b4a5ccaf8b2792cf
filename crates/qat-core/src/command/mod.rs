//! Arabic sale and debt command parsing.

mod parser;
pub mod rules;

pub use parser::{infer_action, parse_full_command, FieldMatch, ParseResult, RuleCommandParser};

use crate::models::command::ParsedCommand;

/// Trait for command parsers.
pub trait CommandParser {
    /// Parse a command, keeping the rule trail and validation warnings.
    fn parse(&self, text: &str) -> ParseResult;

    /// Parse a command into its structured form only.
    fn parse_command(&self, text: &str) -> ParsedCommand {
        self.parse(text).command
    }
}
