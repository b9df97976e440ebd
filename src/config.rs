use std::{fmt::Display, time::Duration};

use crate::solver::MicroLp;

/// How much the scorer reports besides the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    SummaryOnly,         // precision, recall and f-score
    WithAlignmentDetail, // plus matched nodes and triples
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub detail: Detail,
    /// Suppresses the solver's own progress output.
    pub quiet: bool,
    /// Wall-clock limit for a single solve.
    pub time_limit: Option<Duration>,
    /// Score graph pairs in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail)?;
        if self.quiet {
            write!(f, "/quiet")?;
        }
        if let Some(limit) = self.time_limit {
            write!(f, "/limit={:?}", limit)?;
        }
        if self.parallel {
            write!(f, "/parallel")?;
        }
        Ok(())
    }
}

impl Config {
    pub fn new(detail: Detail, quiet: bool, time_limit: Option<Duration>, parallel: bool) -> Self {
        Config {
            detail,
            quiet,
            time_limit,
            parallel,
        }
    }

    /// The solver adapter configured by this config.
    pub fn solver(&self) -> MicroLp {
        MicroLp::new(self.quiet, self.time_limit)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            detail: Detail::SummaryOnly,
            quiet: true,
            time_limit: None,
            parallel: false,
        }
    }
}

impl From<Detail> for Config {
    fn from(detail: Detail) -> Self {
        Config {
            detail,
            ..Config::default()
        }
    }
}

impl From<Duration> for Config {
    fn from(time_limit: Duration) -> Self {
        Config {
            time_limit: Some(time_limit),
            ..Config::default()
        }
    }
}
