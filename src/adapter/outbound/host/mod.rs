//! Host tuning adapters.

pub mod smt;

pub use smt::SmtTuner;
