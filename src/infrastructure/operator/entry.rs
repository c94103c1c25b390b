//! Operator entry type.

/// Implements every inbound operator port over the configured adapters.
///
/// Stateless: each call parses the configuration it is handed and wires
/// what it needs through [`crate::infrastructure::bootstrap`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Operator;
