//! External CLI adapters
//!
//! - [`candidate`]: structured descriptors of ways to reach the CLI
//! - [`catalog`]: the default, configurable candidate list
//! - [`prober`]: version probing of a single candidate
//! - [`resolver`]: memoized, single-flight selection of the working candidate
//! - [`invoker`]: [`ProcessCliGateway`], one subprocess per prompt

pub mod candidate;
pub mod catalog;
pub mod invoker;
pub mod prober;
mod process;
pub mod resolver;

pub use candidate::{
    Arg, CandidateError, InvocationCandidate, MODEL_TOKEN, Program, ResolvedCommand, shell_quote,
};
pub use catalog::default_candidates;
pub use invoker::{InvokeLimits, ProcessCliGateway, run_prompt};
pub use prober::{CandidateProber, ProbeFailure, ProcessProber};
pub use resolver::{CommandResolver, ResolveError};
