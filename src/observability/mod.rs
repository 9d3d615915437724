//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every step produces:
//!     → logging.rs (structured log events, run_id span)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → optional Prometheus text snapshot written at the end of a run
//! ```

pub mod logging;
pub mod metrics;
