use std::ffi::OsString;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::args::parse_bool;

/// Environment variable read by [`AppConfig::from_env`] to preset debug mode.
pub const DEBUG_ENV: &str = "CLIFRAME_DEBUG";

/// Everything an application run needs from its surroundings, passed in
/// explicitly so the library never reads process-wide state itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Program path followed by option and positional tokens.
    pub argv: Vec<String>,
    /// Initial debug state; `--debug` may still change it.
    pub debug: bool,
    pub pid: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            argv: Vec::new(),
            debug: false,
            pid: std::process::id(),
        }
    }
}

impl AppConfig {
    pub fn with_args<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    /// Read argv and the debug preset from the current process.
    ///
    /// An unparsable `CLIFRAME_DEBUG` fails with `BadArgument`; an unset or
    /// non-UTF-8 one leaves debug off. Non-UTF-8 argv tokens are kept with
    /// invalid sequences replaced, see [`AppConfig::with_os_args`].
    pub fn from_env() -> Result<Self> {
        let debug = match std::env::var(DEBUG_ENV) {
            Ok(token) if !token.is_empty() => parse_bool(&token)?,
            _ => false,
        };
        Ok(Self::with_os_args(std::env::args_os()).debug(debug))
    }

    /// Like [`AppConfig::with_args`] for platform strings. Tokens that are
    /// not valid UTF-8 are converted lossily (U+FFFD) rather than rejected.
    pub fn with_os_args<I>(argv: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::with_args(argv.into_iter().map(|token| match token.into_string() {
            Ok(token) => token,
            Err(raw) => raw.to_string_lossy().into_owned(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = AppConfig::with_args(["prog", "--x"]).debug(true).pid(42);
        assert_eq!(config.argv, vec!["prog", "--x"]);
        assert!(config.debug);
        assert_eq!(config.pid, 42);
    }

    #[test]
    fn deserializes_with_all_fields() {
        let config: AppConfig =
            serde_json::from_str(r#"{"argv":["tool","a"],"debug":true,"pid":7}"#).unwrap();
        assert_eq!(config, AppConfig::with_args(["tool", "a"]).debug(true).pid(7));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_tokens_are_kept_lossily() {
        use std::os::unix::ffi::OsStringExt;

        let argv = vec![
            OsString::from("prog"),
            OsString::from_vec(b"a\xff".to_vec()),
            OsString::from("b"),
        ];
        let config = AppConfig::with_os_args(argv);
        assert_eq!(config.argv, vec!["prog", "a\u{FFFD}", "b"]);
    }
}
