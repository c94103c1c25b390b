//! Inbound adapters (driving side): the command-line front end.

pub mod cli;
