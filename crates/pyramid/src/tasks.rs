//! Sequential task runner.
//!
//! Steps run strictly in insertion order against a shared context; the
//! first failing step stops the chain.

use std::fmt;

use tiler_common::{TilerError, TilerResult};
use tracing::{debug, error};

type Step<C> = Box<dyn FnOnce(&mut C) -> TilerResult<()> + Send>;

/// The step that stopped a chain.
#[derive(Debug)]
pub struct StepFailure {
    pub index: usize,
    pub label: String,
    pub error: TilerError,
}

/// Result of running a chain.
#[derive(Debug)]
pub struct ChainOutcome {
    pub completed: usize,
    pub total: usize,
    pub failure: Option<StepFailure>,
}

impl ChainOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of completed steps, or the failing step's error labelled with
    /// the step name.
    pub fn into_result(self) -> TilerResult<usize> {
        match self.failure {
            None => Ok(self.completed),
            Some(failure) => Err(TilerError::Step {
                step: failure.label,
                source: Box::new(failure.error),
            }),
        }
    }
}

pub struct TaskChain<C> {
    steps: Vec<(String, Step<C>)>,
}

impl<C> Default for TaskChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for TaskChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskChain")
            .field("steps", &self.labels())
            .finish()
    }
}

impl<C> TaskChain<C> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step.
    pub fn push<F>(&mut self, label: impl Into<String>, step: F) -> &mut Self
    where
        F: FnOnce(&mut C) -> TilerResult<()> + Send + 'static,
    {
        self.steps.push((label.into(), Box::new(step)));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Run every step in order, stopping at the first error.
    pub fn run(self, context: &mut C) -> ChainOutcome {
        let total = self.steps.len();

        for (index, (label, step)) in self.steps.into_iter().enumerate() {
            debug!(step = %label, index, total, "Running step");
            if let Err(e) = step(context) {
                error!(step = %label, error = %e, "Step failed");
                return ChainOutcome {
                    completed: index,
                    total,
                    failure: Some(StepFailure {
                        index,
                        label,
                        error: e,
                    }),
                };
            }
        }

        ChainOutcome {
            completed: total,
            total,
            failure: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_run_in_order() {
        let mut chain: TaskChain<Vec<u32>> = TaskChain::new();
        for i in 0..4 {
            chain.push(format!("step {}", i), move |log: &mut Vec<u32>| {
                log.push(i);
                Ok(())
            });
        }
        assert_eq!(chain.len(), 4);

        let mut log = Vec::new();
        let outcome = chain.run(&mut log);
        assert!(outcome.is_success());
        assert_eq!(outcome.completed, 4);
        assert_eq!(log, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_first_failure_stops_chain() {
        let mut chain: TaskChain<Vec<&'static str>> = TaskChain::new();
        chain
            .push("first", |log: &mut Vec<&'static str>| {
                log.push("first");
                Ok(())
            })
            .push("second", |_: &mut Vec<&'static str>| Err(TilerError::NoSource))
            .push("third", |log: &mut Vec<&'static str>| {
                log.push("third");
                Ok(())
            });

        let mut log = Vec::new();
        let outcome = chain.run(&mut log);
        assert_eq!(log, vec!["first"]);
        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.total, 3);

        let err = outcome.into_result().unwrap_err();
        assert!(matches!(&err, TilerError::Step { step, .. } if step == "second"));
        assert!(matches!(err.root(), TilerError::NoSource));
    }

    #[test]
    fn test_empty_chain() {
        let chain: TaskChain<()> = TaskChain::default();
        assert!(chain.is_empty());
        assert_eq!(chain.run(&mut ()).into_result().unwrap(), 0);
    }
}
