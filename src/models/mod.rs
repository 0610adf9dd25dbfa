//! Concrete transition systems
//!
//! Each system comes with its transition enum, its oracle and the oracle
//! factory the trainer uses to supervise derivations against gold trees.

pub mod arc_hybrid;
pub mod arc_relocate;
pub mod arc_spine;
pub mod arc_standard;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use arc_hybrid::{ArcHybrid, ArcHybridOracle, ArcHybridOracleFactory, ArcHybridTransition};
pub use arc_relocate::{
    ArcRelocate, ArcRelocateOracle, ArcRelocateOracleFactory, ArcRelocateTransition,
};
pub use arc_spine::{
    ArcSpine, ArcSpineOracle, ArcSpineOracleFactory, ArcSpineState, ArcSpineTransition,
    StackElement,
};
pub use arc_standard::{
    ArcStandard, ArcStandardOracle, ArcStandardOracleFactory, ArcStandardTransition,
};

use crate::{
    Error, Result,
    syntax::ItemId,
    transition::StackBufferState,
};

/// Names the available transition systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemKind {
    ArcStandard,
    ArcHybrid,
    ArcSpine,
    ArcRelocate,
}

impl SystemKind {
    pub const ALL: [SystemKind; 4] = [
        SystemKind::ArcStandard,
        SystemKind::ArcHybrid,
        SystemKind::ArcSpine,
        SystemKind::ArcRelocate,
    ];

    /// Whether the system can only build projective trees.
    pub fn is_projective(self) -> bool {
        !matches!(self, SystemKind::ArcRelocate)
    }
}

impl FromStr for SystemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "arc-standard" | "standard" => Ok(SystemKind::ArcStandard),
            "arc-hybrid" | "hybrid" => Ok(SystemKind::ArcHybrid),
            "arc-spine" | "spine" => Ok(SystemKind::ArcSpine),
            "arc-relocate" | "relocate" => Ok(SystemKind::ArcRelocate),
            _ => Err(Error::ParseSystem {
                input: s.to_string(),
                expected: "arc-standard, arc-hybrid, arc-spine, arc-relocate".to_string(),
            }),
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemKind::ArcStandard => write!(f, "arc-standard"),
            SystemKind::ArcHybrid => write!(f, "arc-hybrid"),
            SystemKind::ArcSpine => write!(f, "arc-spine"),
            SystemKind::ArcRelocate => write!(f, "arc-relocate"),
        }
    }
}

// Stack/buffer moves shared by the systems built on `StackBufferState`.

fn shift(state: &mut StackBufferState, transition: &dyn fmt::Display) -> Result<()> {
    let item = state.buffer.pop_front().ok_or_else(|| Error::EmptyBuffer {
        transition: transition.to_string(),
    })?;
    state.stack.push(item);
    Ok(())
}

fn pop(state: &mut StackBufferState, transition: &dyn fmt::Display) -> Result<ItemId> {
    state.stack.pop().ok_or_else(|| Error::EmptyStack {
        transition: transition.to_string(),
    })
}

/// Remove s1, keeping s0 on top.
fn remove_second(state: &mut StackBufferState, transition: &dyn fmt::Display) -> Result<ItemId> {
    if state.stack.len() < 2 {
        return Err(Error::EmptyStack {
            transition: transition.to_string(),
        });
    }
    let s1 = state.stack.len() - 2;
    Ok(state.stack.remove(s1))
}
