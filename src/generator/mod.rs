//! Content generators: the external callables a worker polls for fresh lines.
//!
//! Any `FnMut() -> GeneratorResult + Send` closure is a generator. The helpers
//! below cover the common dashboard cases.

use std::process::Command;
use std::time::{Duration, Instant};

use crate::error::GeneratorError;

pub type GeneratorResult = std::result::Result<Vec<String>, GeneratorError>;

/// Produces the lines shown in one tile. Called from the tile's worker thread.
pub trait ContentGenerator: Send {
    fn generate(&mut self) -> GeneratorResult;
}

impl<F> ContentGenerator for F
where
    F: FnMut() -> GeneratorResult + Send,
{
    fn generate(&mut self) -> GeneratorResult {
        self()
    }
}

/// Wrap an infallible closure.
pub fn from_fn<F>(mut produce: F) -> impl ContentGenerator
where
    F: FnMut() -> Vec<String> + Send,
{
    move || -> GeneratorResult { Ok(produce()) }
}

/// Always yields the same lines.
pub fn fixed_lines<I, S>(lines: I) -> impl ContentGenerator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
    move || -> GeneratorResult { Ok(lines.clone()) }
}

/// Runs an external program each tick and yields its output lines.
///
/// Standard error is appended after standard output. A non-zero exit status is
/// not a failure; only a program that cannot be started is.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    program: String,
    args: Vec<String>,
    skip_blank: bool,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            skip_blank: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank = skip;
        self
    }
}

impl ContentGenerator for ShellCommand {
    fn generate(&mut self) -> GeneratorResult {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|err| GeneratorError::with_source(format!("failed to run `{}`", self.program), err))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(stdout
            .lines()
            .chain(stderr.lines())
            .filter(|line| !self.skip_blank || !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Single line reporting elapsed time since construction, e.g. `Runtime: 0:01:05.27`.
#[derive(Debug, Clone)]
pub struct Uptime {
    label: String,
    started: Instant,
}

impl Uptime {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
        }
    }
}

impl ContentGenerator for Uptime {
    fn generate(&mut self) -> GeneratorResult {
        Ok(vec![format!(
            "{}: {}",
            self.label,
            format_elapsed(self.started.elapsed())
        )])
    }
}

/// `H:MM:SS.cc` rendering of a duration.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let centis = elapsed.subsec_millis() / 10;
    format!(
        "{}:{:02}:{:02}.{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60,
        centis
    )
}
