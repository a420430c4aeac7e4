//! Genetic search for synthetic relevance-judgment profiles.
//!
//! Given a target average nDCG (either configured directly or harvested from
//! trec_eval-style report files), the crate evolves a fixed-length list of
//! graded relevance judgments whose average normalized discounted cumulative
//! gain matches the target, subject to per-grade occurrence caps.

pub mod config;
pub mod evolution;
pub mod export;
pub mod metrics;
pub mod problem;
pub mod report;
