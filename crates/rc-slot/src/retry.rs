//! Bounded generate-and-test loop

use crate::error::{SlotError, SlotResult};

/// What to do when every attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExhaustionPolicy {
    /// Hand back the last candidate anyway. Guarantees termination; the
    /// result may violate the acceptance test.
    #[default]
    ReturnLast,
    /// Report [`SlotError::RetryBudgetExhausted`]
    Fail,
}

/// Result of a bounded retry
#[derive(Debug, Clone)]
pub struct RetryOutcome<T> {
    pub value: T,
    /// Attempts made, 1-based
    pub attempts: usize,
    /// The value passed the acceptance test
    pub accepted: bool,
}

/// Call `attempt` until `accept` approves a candidate or `cap` attempts are spent.
///
/// `attempt` receives the 0-based attempt index.
pub fn retry_bounded<T>(
    cap: usize,
    policy: ExhaustionPolicy,
    mut attempt: impl FnMut(usize) -> SlotResult<T>,
    mut accept: impl FnMut(&T) -> bool,
) -> SlotResult<RetryOutcome<T>> {
    if cap == 0 {
        return Err(SlotError::InvalidConfig("retry cap must be at least 1".into()));
    }

    let mut last = None;
    for index in 0..cap {
        let candidate = attempt(index)?;
        if accept(&candidate) {
            return Ok(RetryOutcome {
                value: candidate,
                attempts: index + 1,
                accepted: true,
            });
        }
        last = Some(candidate);
    }

    match (policy, last) {
        (ExhaustionPolicy::ReturnLast, Some(value)) => Ok(RetryOutcome {
            value,
            attempts: cap,
            accepted: false,
        }),
        _ => Err(SlotError::RetryBudgetExhausted { attempts: cap }),
    }
}
