use std::io::Write;

use clap::ValueEnum;
use cliframe::{
    Application, EXIT_SUCCESS, Error, Logger, OptionRegistry, OptionValue, Result, Runtime,
    Severity, context,
};

/// Called with the final status instead of returning from `run`.
pub type ExitFn = Box<dyn FnMut(i32)>;

/// Prints its positional words on one line, `repeat` times, then logs a
/// summary at `level`.
pub struct EchoApp {
    upper: bool,
    repeat: u32,
    level: Severity,
    out: Box<dyn Write>,
    on_exit: ExitFn,
}

impl Default for EchoApp {
    fn default() -> Self {
        Self::new(Box::new(std::io::stdout()), Box::new(exit_process))
    }
}

fn exit_process(status: i32) {
    std::process::exit(status)
}

impl EchoApp {
    pub fn new(out: Box<dyn Write>, on_exit: ExitFn) -> Self {
        Self {
            upper: false,
            repeat: 1,
            level: Severity::Debug,
            out,
            on_exit,
        }
    }

    /// The line printed for `words`, before repetition.
    pub fn line(&self, words: &[String]) -> String {
        let line = words.join(" ");
        if self.upper { line.to_uppercase() } else { line }
    }
}

fn option_token<'a>(name: &str, value: &'a OptionValue) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::invalid_argument(format!("--{} needs a value", name)))
}

/// Positive count, at most `u32::MAX`.
fn parse_repeat(value: &OptionValue) -> Result<u32> {
    let token = option_token("repeat", value)?;
    match token.parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(Error::bad_argument(
            format!("Invalid repeat count: \"{}\"", token),
            token,
        )),
    }
}

/// Severity name, any case.
fn parse_level(value: &OptionValue) -> Result<Severity> {
    let token = option_token("level", value)?;
    <Severity as ValueEnum>::from_str(token, true)
        .map_err(|_| Error::bad_argument(format!("Invalid level: \"{}\"", token), token))
}

impl Application for EchoApp {
    fn options(registry: &mut OptionRegistry<Self>) {
        registry
            .on("upper", |app: &mut EchoApp, _rt, value| {
                app.upper = value.to_bool()?;
                Ok(())
            })
            .on("repeat", |app: &mut EchoApp, _rt, value| {
                app.repeat = parse_repeat(&value)?;
                Ok(())
            })
            .on("level", |app: &mut EchoApp, _rt, value| {
                app.level = parse_level(&value)?;
                Ok(())
            });
    }

    fn debug_setup(&mut self, rt: &mut Runtime) -> Result<()> {
        rt.debug(
            "echo settings",
            context! {
                "upper" => self.upper,
                "repeat" => self.repeat,
                "level" => self.level.name(),
            },
        );
        Ok(())
    }

    fn main(&mut self, rt: &mut Runtime) -> Result<i32> {
        let mut words = Vec::new();
        while let Some(word) = rt.args_mut().shift_string() {
            words.push(word);
        }
        if words.is_empty() {
            return Err(Error::missing_argument("Nothing to echo"));
        }

        let line = self.line(&words);
        for _ in 0..self.repeat {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        let count = i64::try_from(words.len()).unwrap_or(i64::MAX);
        rt.log(self.level, &"echoed", context! { "words" => count });
        Ok(EXIT_SUCCESS)
    }

    fn exit(&mut self, status: i32) {
        (self.on_exit)(status)
    }
}
