//! End-to-end booking and payment verification for the rental platform.

pub mod api;
pub mod auth;
pub mod blockchain;
pub mod booking;
pub mod config;
pub mod observability;
pub mod payments;
pub mod resilience;
pub mod scenario;

pub use config::schema::VerifierConfig;
pub use scenario::{Scenario, ScenarioError, ScenarioReport};
