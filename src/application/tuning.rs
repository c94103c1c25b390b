//! Host tuning requested by a template.

use std::sync::Arc;

use tracing::info;

use crate::error::TuningError;
use crate::port::HostTuner;

/// What tuning did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningOutcome {
    /// The template asks for no tuning.
    NotRequested,
    /// The host already had the requested level.
    AlreadySet(u32),
    Changed { from: u32, to: u32 },
}

/// Bring the SMT level to `target`, verifying the change took effect.
pub fn apply_smt_target(
    tuner: &dyn HostTuner,
    target: Option<u32>,
) -> Result<TuningOutcome, TuningError> {
    let Some(target) = target else {
        return Ok(TuningOutcome::NotRequested);
    };

    let current = tuner.smt_level()?;
    if current == target {
        info!(level = current, "SMT level already set");
        return Ok(TuningOutcome::AlreadySet(current));
    }

    info!(from = current, to = target, "Changing SMT level");
    tuner.set_smt_level(target)?;

    let actual = tuner.smt_level()?;
    if actual != target {
        return Err(TuningError::VerificationFailed {
            expected: target,
            actual,
        });
    }

    Ok(TuningOutcome::Changed {
        from: current,
        to: target,
    })
}

/// [`apply_smt_target`] on the blocking pool.
///
/// Tuners shell out and wait on the host, so they must not hold an async
/// worker thread.
pub async fn apply_smt_target_off_worker(
    tuner: Arc<dyn HostTuner>,
    target: Option<u32>,
) -> Result<TuningOutcome, TuningError> {
    if target.is_none() {
        return Ok(TuningOutcome::NotRequested);
    }
    tokio::task::spawn_blocking(move || apply_smt_target(tuner.as_ref(), target))
        .await
        .map_err(|e| TuningError::Interrupted(e.to_string()))?
}
