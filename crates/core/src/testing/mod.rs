//! Test doubles for the provider port

pub mod in_memory;

pub use in_memory::{InMemoryProvider, Operation};
