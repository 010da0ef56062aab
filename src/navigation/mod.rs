//! Wizard navigation: which steps may be shown, and where each one leads.
//!
//! [`can_reach`] is the guard and [`resolve_next_step`] is the resolver. Both
//! are read-only over the application. Every step the resolver returns is
//! reachable from the state that produced it.

mod guard;
mod redirect;
mod step;

pub use guard::{can_reach, holds, overview_step, requirements, Requirement};
pub use redirect::resolve_next_step;
pub use step::{Stage, Step};

#[cfg(test)]
#[path = "tests/step_tests.rs"]
mod step_tests;

#[cfg(test)]
#[path = "tests/guard_tests.rs"]
mod guard_tests;
