//! Score accumulators

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How the scores of successive actions combine into a derivation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccumulatorKind {
    /// Plain sum of scores.
    #[default]
    Sum,
    /// Arithmetic mean of scores.
    Average,
    /// Sum of log-scores; scores must be probabilities in `(0, 1]`.
    LogProduct,
}

impl AccumulatorKind {
    fn accepts(self, value: f64) -> bool {
        match self {
            AccumulatorKind::Sum | AccumulatorKind::Average => value.is_finite(),
            AccumulatorKind::LogProduct => value > 0.0 && value <= 1.0,
        }
    }
}

impl FromStr for AccumulatorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(AccumulatorKind::Sum),
            "average" | "avg" => Ok(AccumulatorKind::Average),
            "log-product" | "logproduct" => Ok(AccumulatorKind::LogProduct),
            _ => Err(Error::ParseAccumulator {
                input: s.to_string(),
                expected: "sum, average, log-product".to_string(),
            }),
        }
    }
}

impl fmt::Display for AccumulatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccumulatorKind::Sum => write!(f, "sum"),
            AccumulatorKind::Average => write!(f, "average"),
            AccumulatorKind::LogProduct => write!(f, "log-product"),
        }
    }
}

/// Running score of a derivation.
///
/// [`ScoreAccumulator::accumulate`] is the only mutator;
/// [`ScoreAccumulator::estimate`] previews the result of accumulating a
/// value without changing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAccumulator {
    kind: AccumulatorKind,
    accumulated: f64,
    accumulations: usize,
}

impl ScoreAccumulator {
    pub fn new(kind: AccumulatorKind) -> Self {
        Self {
            kind,
            accumulated: 0.0,
            accumulations: 0,
        }
    }

    pub fn kind(&self) -> AccumulatorKind {
        self.kind
    }

    pub fn accumulations(&self) -> usize {
        self.accumulations
    }

    /// The score accumulated so far.
    pub fn current(&self) -> f64 {
        match self.kind {
            AccumulatorKind::Sum | AccumulatorKind::LogProduct => self.accumulated,
            AccumulatorKind::Average if self.accumulations == 0 => 0.0,
            AccumulatorKind::Average => self.accumulated / self.accumulations as f64,
        }
    }

    pub fn accumulate(&mut self, value: f64) -> Result<()> {
        self.accumulated = self.next_accumulated(value)?;
        self.accumulations += 1;
        Ok(())
    }

    /// The score [`ScoreAccumulator::current`] would return after
    /// accumulating `value`.
    pub fn estimate(&self, value: f64) -> Result<f64> {
        let accumulated = self.next_accumulated(value)?;
        Ok(match self.kind {
            AccumulatorKind::Sum | AccumulatorKind::LogProduct => accumulated,
            AccumulatorKind::Average => accumulated / (self.accumulations + 1) as f64,
        })
    }

    fn next_accumulated(&self, value: f64) -> Result<f64> {
        if !self.kind.accepts(value) {
            return Err(Error::ScoreOutOfDomain {
                value,
                accumulator: self.kind.to_string(),
            });
        }
        Ok(match self.kind {
            AccumulatorKind::Sum | AccumulatorKind::Average => self.accumulated + value,
            AccumulatorKind::LogProduct => self.accumulated + value.ln(),
        })
    }
}

impl Default for ScoreAccumulator {
    fn default() -> Self {
        Self::new(AccumulatorKind::default())
    }
}
