//! # Drugcounter
//!
//! Ranks the drugs in a prescription ledger by total cost.
//!
//! ## Pipeline Overview
//!
//! 1. **Validation** ([`record`]): split each ledger line and check the record
//!    number and cost fields
//! 2. **Aggregation** ([`aggregate`]): per drug, collect distinct prescribers
//!    and sum costs
//! 3. **Selection** ([`heap`]): keep the top K drugs in a bounded min-heap
//! 4. **Reporting** ([`pipeline`]): write `drug_name,num_prescriber,total_cost`
//!    rows, highest cost first
//!
//! An optional tab-delimited audit log ([`audit`]) records each stage and
//! every skipped line.

pub mod aggregate;
pub mod audit;
pub mod config;
pub mod error;
pub mod heap;
pub mod pipeline;
pub mod record;

pub use aggregate::{Aggregator, DrugAggregate, RankedEntry};
pub use config::RunConfig;
pub use error::{Error, Result};
pub use pipeline::{run, Pipeline, RunSummary};
pub use record::{LineValidator, Rejection, ValidatedRecord};
