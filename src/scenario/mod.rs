//! End-to-end verification scenario.
//!
//! `runner::Scenario` drives the platform API and the payment gateway through
//! one booking's full lifecycle. Failures map to `error::ScenarioError`, each
//! with its own process exit code; a success yields `report::ScenarioReport`.

pub mod error;
pub mod report;
pub mod runner;

pub use error::{Role, ScenarioError, Step};
pub use report::ScenarioReport;
pub use runner::{Scenario, UserSession};
