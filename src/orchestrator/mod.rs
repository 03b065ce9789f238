//! Three-stage lookup orchestration.

pub mod controller;

pub use controller::Orchestrator;
