//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for the available backends. The
//! terminal progress notifier lives with the CLI.

pub mod log;

pub use log::LogNotifier;
