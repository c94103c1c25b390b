//! Host tuning port.

use crate::error::TuningError;

/// Reads and changes host-level tuning knobs a template may ask for.
pub trait HostTuner: Send + Sync {
    /// Current simultaneous multithreading level.
    fn smt_level(&self) -> Result<u32, TuningError>;

    /// Change the simultaneous multithreading level.
    fn set_smt_level(&self, level: u32) -> Result<(), TuningError>;
}
