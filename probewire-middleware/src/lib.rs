//! probewire-middleware
//!
//! Wrappers around [`TelemetryProvider`](probewire_core::TelemetryProvider)
//! implementations.

mod gateway;

pub use crate::gateway::RateLimitedGateway;
