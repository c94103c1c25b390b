//! Run lifecycle state and per-layer results.

use std::fmt;

use crate::error::{ComponentFailure, LayerError};

/// Lifecycle of one orchestration run.
///
/// `Pending -> Running(0) -> Running(1) -> ... -> Done | Failed`.
/// There is no partial-success terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    /// Executing the layer at this zero-based index.
    Running(usize),
    Done,
    /// The layer at this zero-based index failed.
    Failed(usize),
}

impl RunState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Running(index) => write!(f, "running layer {}", index + 1),
            Self::Done => f.write_str("done"),
            Self::Failed(index) => write!(f, "failed at layer {}", index + 1),
        }
    }
}

/// Outcome of executing one layer. Transient: consumed by the executor.
#[derive(Debug)]
pub struct LayerResult {
    pub layer_index: usize,
    pub errors: Vec<ComponentFailure>,
}

impl LayerResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold the per-component failures into the composite layer error.
    ///
    /// Returns `Ok(())` when every component succeeded.
    pub fn into_result(self) -> Result<(), LayerError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(LayerError {
                layer: self.layer_index + 1,
                failures: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::ComponentId;
    use crate::error::ComponentError;

    #[test]
    fn empty_result_is_success() {
        let result = LayerResult {
            layer_index: 0,
            errors: vec![],
        };
        assert!(result.is_success());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn failures_become_one_based_layer_error() {
        let result = LayerResult {
            layer_index: 2,
            errors: vec![ComponentFailure {
                component: ComponentId::from("x"),
                error: ComponentError::MissingSpec,
            }],
        };
        let err = result.into_result().unwrap_err();
        assert_eq!(err.layer, 3);
    }

    #[test]
    fn state_display_is_one_based() {
        assert_eq!(RunState::Running(0).to_string(), "running layer 1");
        assert!(RunState::Failed(1).is_terminal());
        assert!(!RunState::Pending.is_terminal());
    }
}
