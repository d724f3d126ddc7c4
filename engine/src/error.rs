//! Errors raised by session mutations.
//!
//! Only [`SessionError::CapacityExceeded`] is meant for the user. The rest are
//! guards against ids the presentation layer should never produce; callers
//! treat them as no-ops. No variant leaves the session partially modified.

use crate::types::{InstanceId, OptionSet, WarbandId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{hero} cannot lead more than {capacity} warriors.")]
    CapacityExceeded { hero: String, capacity: usize },

    #[error("no army data is loaded")]
    NoArmyLoaded,

    #[error("unknown unit template `{0}`")]
    UnknownTemplate(String),

    #[error("unknown warband {0}")]
    UnknownWarband(WarbandId),

    #[error("unknown unit instance {0}")]
    UnknownInstance(InstanceId),

    #[error("no `{template}` stack with options {options:?}")]
    UnknownStack { template: String, options: OptionSet },

    #[error("unit `{template}` has no option `{option}`")]
    UnknownOption { template: String, option: String },
}

impl SessionError {
    /// True for should-not-happen conditions that are ignored rather than
    /// shown to the user.
    pub const fn is_guard(&self) -> bool {
        !matches!(self, Self::CapacityExceeded { .. })
    }
}
