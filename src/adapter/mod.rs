//! Implementations of ports (hexagonal adapters).
//!
//! - `inbound` - the command-line interface driving the application
//! - `outbound` - concrete collaborators behind each port

pub mod inbound;
pub mod outbound;
