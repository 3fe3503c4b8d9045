#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Output planning for one schema file.
//!
//! Given a resolved configuration and the number of top-level messages and
//! extensions, the planner decides which artifacts an invocation produces and
//! in what order. Planning is pure: identical inputs give identical plans.
//!
//! - `naming` - artifact file names derived from the schema basename
//! - `bootstrap` - basename override for the compiler's own schemas
//! - `plan` - the ordered artifact slots

use thiserror::Error;

pub mod bootstrap;
pub mod naming;
pub mod plan;

pub use bootstrap::{resolve_basename, BootstrapDecision, BootstrapGuard};
pub use plan::{plan, ArtifactSlot, LogicalUnit, OutputPlan, SlotKind};

/// Errors raised while computing a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The caller asked for fewer numbered source files than there are units to place
    #[error(
        "There must be at least as many numbered source files as messages and extensions: \
         requested {requested}, need {required}"
    )]
    FileCountTooSmall {
        /// Count from `lite_implicit_weak_fields=N`
        requested: usize,
        /// Messages plus extensions
        required: usize,
    },
}
