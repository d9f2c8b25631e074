//! Diagnostic sink passed explicitly into each compilation.
//!
//! Every compilation owns its own [`Diagnostics`], so concurrent or
//! back-to-back compilations never share state. Recorded entries are also
//! forwarded to `tracing`, which lets a binary with a subscriber installed
//! see the same stream without capturing anything global in tests.

use crate::ast::Location;
use crate::error::CompileError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(f, "[{}] {}: {}", self.level, loc, self.message),
            None => write!(f, "[{}] {}", self.level, self.message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostics {
    min_level: Level,
    entries: Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics::new(Level::Info)
    }
}

impl Diagnostics {
    /// A sink that keeps entries at `min_level` and above.
    pub fn new(min_level: Level) -> Self {
        Diagnostics {
            min_level,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, level: Level, location: Option<Location>, message: impl Into<String>) {
        if level < self.min_level {
            return;
        }
        let diag = Diagnostic {
            level,
            location,
            message: message.into(),
        };
        match level {
            Level::Debug => tracing::debug!("{}", diag),
            Level::Info => tracing::info!("{}", diag),
            Level::Warning => tracing::warn!("{}", diag),
            Level::Error => tracing::error!("{}", diag),
        }
        self.entries.push(diag);
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.record(Level::Debug, None, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Level::Info, None, message);
    }

    pub fn warning(&mut self, location: Option<Location>, message: impl Into<String>) {
        self.record(Level::Warning, location, message);
    }

    /// Record the error that terminated a compilation.
    pub fn error(&mut self, err: &CompileError) {
        self.record(Level::Error, err.location, err.message.clone());
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.level == Level::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.level == Level::Warning)
    }
}
