//! Command-line token source.
//!
//! [`Arguments`] is a queue of tokens consumed from the front. Option tokens
//! (`--name`, `--name=value`, `--no-name`) are pulled out in one pass by
//! [`Arguments::handle_options`]; everything else stays positional.
use std::collections::VecDeque;
use std::ffi::OsStr;

use clap::builder::{BoolishValueParser, TypedValueParser};

use crate::error::{Error, Result};
use crate::types::OptionValue;

const OPTION_PREFIX: &str = "--";
const NEGATION_PREFIX: &str = "no-";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arguments {
    tokens: VecDeque<String>,
}

impl Arguments {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn peek(&self) -> Option<&str> {
        self.tokens.front().map(String::as_str)
    }

    pub fn shift_string(&mut self) -> Option<String> {
        self.tokens.pop_front()
    }

    /// Like [`Arguments::shift_string`], but a missing token is an error.
    #[track_caller]
    pub fn shift_string_ex(&mut self) -> Result<String> {
        match self.tokens.pop_front() {
            Some(token) => Ok(token),
            None => Err(Error::missing_argument("Missing argument")),
        }
    }

    /// Tokens not yet consumed, in order.
    pub fn remaining(&self) -> Vec<String> {
        self.tokens.iter().cloned().collect()
    }

    /// Succeeds only if every token has been consumed.
    #[track_caller]
    pub fn end(&self) -> Result<()> {
        if self.tokens.is_empty() {
            return Ok(());
        }
        Err(Error::extra_arguments(
            format!("Unexpected extra arguments: {}", self.remaining().join(" ")),
            self.remaining(),
        ))
    }

    /// Remove option tokens and return them as `(name, value)` pairs in the
    /// order they appeared.
    ///
    /// Scanning stops at a bare `--`, which is itself removed; tokens after
    /// it stay positional even if they look like options.
    pub fn handle_options(&mut self) -> Vec<(String, OptionValue)> {
        let mut options = Vec::new();
        let mut positional = VecDeque::with_capacity(self.tokens.len());
        while let Some(token) = self.tokens.pop_front() {
            if token == OPTION_PREFIX {
                positional.extend(self.tokens.drain(..));
                break;
            }
            match parse_option(&token) {
                Some(option) => options.push(option),
                None => positional.push_back(token),
            }
        }
        self.tokens = positional;
        options
    }
}

fn parse_option(token: &str) -> Option<(String, OptionValue)> {
    let body = token.strip_prefix(OPTION_PREFIX)?;
    if body.is_empty() {
        return None;
    }
    if let Some((name, value)) = body.split_once('=') {
        return Some((name.to_string(), OptionValue::Value(value.to_string())));
    }
    if let Some(name) = body.strip_prefix(NEGATION_PREFIX) {
        if !name.is_empty() {
            return Some((name.to_string(), OptionValue::Flag(false)));
        }
    }
    Some((body.to_string(), OptionValue::Flag(true)))
}

/// Parse a boolean token: y/yes/t/true/on/1 or n/no/f/false/off/0, any case.
///
/// Anything else fails with [`Error::BadArgument`] carrying the token.
#[track_caller]
pub fn parse_bool(token: &str) -> Result<bool> {
    let cmd = clap::Command::new(env!("CARGO_PKG_NAME"));
    BoolishValueParser::new()
        .parse_ref(&cmd, None, OsStr::new(token))
        .map_err(|_| Error::bad_argument(format!("Invalid boolean value: \"{}\"", token), token))
}
