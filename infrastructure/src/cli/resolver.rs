//! Command resolution
//!
//! [`CommandResolver`] walks the candidate list once per process, stops at
//! the first candidate whose probe succeeds and memoizes the outcome. A
//! `OnceCell` makes the first resolution single-flight: concurrent callers
//! wait for it instead of probing again, and a failed resolution is
//! remembered just like a successful one.

use super::candidate::{InvocationCandidate, ResolvedCommand};
use super::prober::CandidateProber;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no working CLI candidate (tried: {})", .tried.join(", "))]
    NotFound { tried: Vec<String> },
}

pub struct CommandResolver {
    candidates: Vec<InvocationCandidate>,
    prober: Arc<dyn CandidateProber>,
    resolved: OnceCell<Result<ResolvedCommand, ResolveError>>,
}

impl CommandResolver {
    pub fn new(candidates: Vec<InvocationCandidate>, prober: Arc<dyn CandidateProber>) -> Self {
        Self {
            candidates,
            prober,
            resolved: OnceCell::new(),
        }
    }

    /// Resolve the command, probing only on the first call.
    pub async fn resolve(&self) -> Result<ResolvedCommand, ResolveError> {
        self.resolved
            .get_or_init(|| self.probe_candidates())
            .await
            .clone()
    }

    /// The memoized outcome, if resolution already ran.
    pub fn resolved(&self) -> Option<Result<ResolvedCommand, ResolveError>> {
        self.resolved.get().cloned()
    }

    async fn probe_candidates(&self) -> Result<ResolvedCommand, ResolveError> {
        let mut tried = Vec::with_capacity(self.candidates.len());

        for candidate in &self.candidates {
            match self.prober.probe(candidate).await {
                Ok(resolved) => {
                    info!(
                        "Resolved CLI via {} ({})",
                        candidate.label(),
                        resolved.program().display()
                    );
                    return Ok(resolved);
                }
                Err(failure) => {
                    warn!("CLI candidate {} rejected: {}", candidate.label(), failure);
                    tried.push(candidate.label().to_string());
                }
            }
        }

        Err(ResolveError::NotFound { tried })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::candidate::{Arg, Program};
    use crate::cli::prober::ProbeFailure;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Succeeds for the labels in `working`, records every probe.
    struct FakeProber {
        working: HashSet<&'static str>,
        probed: Mutex<Vec<String>>,
        delay: Duration,
    }

    impl FakeProber {
        fn new(working: &[&'static str]) -> Self {
            Self {
                working: working.iter().copied().collect(),
                probed: Mutex::new(Vec::new()),
                delay: Duration::ZERO,
            }
        }

        fn probed(&self) -> Vec<String> {
            self.probed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CandidateProber for FakeProber {
        async fn probe(
            &self,
            candidate: &InvocationCandidate,
        ) -> Result<ResolvedCommand, ProbeFailure> {
            self.probed.lock().unwrap().push(candidate.label().to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.working.contains(candidate.label()) {
                Ok(ResolvedCommand::new(
                    candidate,
                    format!("/bin/{}", candidate.label()),
                ))
            } else {
                Err(ProbeFailure::MarkerMissing("Claude Code".into()))
            }
        }
    }

    fn candidates(labels: &[&str]) -> Vec<InvocationCandidate> {
        labels
            .iter()
            .map(|label| {
                InvocationCandidate::new(
                    *label,
                    Program::Named((*label).to_string()),
                    vec![],
                    vec!["--version".into()],
                    vec![Arg::Literal("-p".into()), Arg::Model],
                    "Claude Code",
                )
                .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_first_working_candidate_wins() {
        let prober = Arc::new(FakeProber::new(&["b", "c"]));
        let resolver = CommandResolver::new(candidates(&["a", "b", "c"]), prober.clone());

        let resolved = resolver.resolve().await.unwrap();
        assert_eq!(resolved.label(), "b");
        assert_eq!(prober.probed(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_result_is_cached() {
        let prober = Arc::new(FakeProber::new(&["a"]));
        let resolver = CommandResolver::new(candidates(&["a"]), prober.clone());
        assert!(resolver.resolved().is_none());

        let first = resolver.resolve().await.unwrap();
        let second = resolver.resolve().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(prober.probed().len(), 1);
        assert_eq!(resolver.resolved(), Some(Ok(first)));
    }

    #[tokio::test]
    async fn test_not_found_is_memoized() {
        let prober = Arc::new(FakeProber::new(&[]));
        let resolver = CommandResolver::new(candidates(&["a", "b"]), prober.clone());

        let expected = Err(ResolveError::NotFound {
            tried: vec!["a".into(), "b".into()],
        });
        assert_eq!(resolver.resolve().await, expected);
        assert_eq!(resolver.resolve().await, expected);
        assert_eq!(prober.probed(), vec!["a", "b"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_resolution_probes_once() {
        let mut fake = FakeProber::new(&["a"]);
        fake.delay = Duration::from_millis(50);
        let prober = Arc::new(fake);
        let resolver = Arc::new(CommandResolver::new(candidates(&["a"]), prober.clone()));

        let calls = (0..8).map(|_| {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.resolve().await })
        });
        let results = futures::future::join_all(calls).await;

        for result in results {
            assert_eq!(result.unwrap().unwrap().label(), "a");
        }
        assert_eq!(prober.probed().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_candidate_list() {
        let resolver = CommandResolver::new(Vec::new(), Arc::new(FakeProber::new(&[])));
        assert_eq!(
            resolver.resolve().await,
            Err(ResolveError::NotFound { tried: vec![] })
        );
    }
}
