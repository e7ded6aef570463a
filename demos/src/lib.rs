//! Shared helpers for the probewire demo binaries.

pub mod common;
