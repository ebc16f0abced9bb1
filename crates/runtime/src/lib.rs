//! Encounter host for the combat rules.
//!
//! This crate wires the deterministic [`combat_core::CombatEngine`] to loaded
//! content, an RNG seed, a topic event bus and telemetry counters. Consumers
//! embed [`Runtime`] to spawn battlers, submit actions, step ticks and
//! subscribe to the resulting event stream.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`events`] provides the topic-based event bus
//! - [`telemetry`] aggregates per-battler combat counters
//! - [`config`] and [`error`] hold the host configuration and failures
//! - [`logging`] installs a `tracing` subscriber for embedders and tests
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod runtime;
pub mod telemetry;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use runtime::{Runtime, RuntimeBuilder};
pub use telemetry::Telemetry;
