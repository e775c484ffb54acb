//! # tuberag-cost
//!
//! Cost ledger and natural-language cost queries for TUBERAG.
//!
//! This crate provides:
//! - [`CostLedger`] - JSON-backed append-only ledger of billable events
//! - [`CostWindow`] - calendar-anchored windows with a free-text classifier
//! - [`window_report`] / [`answer_cost_query`] - pure aggregation over a
//!   ledger snapshot
//! - [`Pricing`] - the vendor's published per-token rates
//!
//! ## Example
//!
//! ```no_run
//! use chrono::{Local, Utc};
//! use tuberag_cost::{answer_cost_query, CostEvent, CostLedger, Pricing};
//!
//! fn main() -> anyhow::Result<()> {
//!     let pricing = Pricing::default();
//!     let mut ledger = CostLedger::load("costs.json")?;
//!     ledger.record(CostEvent::index(Utc::now(), 12_000, pricing.indexing_cost(12_000)))?;
//!
//!     let report = answer_cost_query(ledger.events(), "How much did yesterday cost?", Local::now());
//!     println!("{}", report.render());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod ledger;
pub mod models;
pub mod pricing;
pub mod report;
pub mod window;

// Re-export main types
pub use error::{CostError, Result};
pub use ledger::CostLedger;
pub use models::{CostEvent, CostKind};
pub use pricing::{estimate_tokens, Pricing, StorageEstimate};
pub use report::{answer_cost_query, render_summary, window_report, CostReport};
pub use window::CostWindow;
