//! # Ledger Line Validation
//!
//! Turns one raw ledger line into a [`ValidatedRecord`], or explains why the
//! line was skipped.
//!
//! ## Line Layout
//!
//! ```text
//! <record number>,<name field>...,<drug name>,<cost>
//! ```
//!
//! The layout is positional. The record number is the first field, the cost
//! is the last and the drug name is second to last. Everything in between is
//! the patient name, which may itself contain commas ("Smith,John"), so those
//! fields are rejoined rather than kept separate.

use regex::Regex;
use std::fmt;

use crate::error::Result;

const DELIMITER: char = ',';

/// Signed decimal integer, no exponent.
const INTEGER_PATTERN: &str = r"^[+-]?[0-9]+$";

/// Signed decimal with optional fraction and exponent. `inf`/`nan` are not accepted.
const DECIMAL_PATTERN: &str = r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$";

/// A ledger line that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    /// Every field between the record number and the drug name, comma-joined
    pub patient_name: String,

    /// Second-to-last field, verbatim
    pub drug_name: String,

    /// Parsed last field
    pub cost: f64,
}

/// Reason a ledger line was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// First field is not an integer
    MissingRecordNumber,

    /// Last field is not a finite decimal number
    MissingDrugPrice,

    /// Too few fields to hold a drug name next to the record number and cost
    MissingDrugName,
}

impl Rejection {
    /// Audit log message for this rejection
    pub fn message(self) -> &'static str {
        match self {
            Rejection::MissingRecordNumber => "Missing record number.",
            Rejection::MissingDrugPrice => "Missing drug price.",
            Rejection::MissingDrugName => "Missing drug name.",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Per-line structural and numeric validation
///
/// Holds the compiled numeric grammars so they are built once per run
/// instead of once per line.
pub struct LineValidator {
    /// Grammar for the record number field
    integer: Regex,

    /// Grammar for the cost field
    decimal: Regex,
}

impl LineValidator {
    /// Compile the numeric grammars
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`](crate::Error::Pattern) if a grammar fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            integer: Regex::new(INTEGER_PATTERN)?,
            decimal: Regex::new(DECIMAL_PATTERN)?,
        })
    }

    /// Validate one data line (header excluded)
    ///
    /// The line is trimmed before splitting. Numeric fields are trimmed again
    /// before matching, so `" 12 "` is a valid record number. The drug name
    /// is kept exactly as it appears between its commas.
    ///
    /// Checks run in a fixed order: record number, then cost, then field
    /// count. A line failing several checks reports the first.
    ///
    /// # Arguments
    ///
    /// * `line` - Raw line text without its terminator
    ///
    /// # Returns
    ///
    /// The extracted record, or the [`Rejection`] for the first failed check
    pub fn validate(&self, line: &str) -> std::result::Result<ValidatedRecord, Rejection> {
        let fields: Vec<&str> = line.trim().split(DELIMITER).collect();

        // split always yields at least one field
        let record_number = fields[0].trim();
        if !self.integer.is_match(record_number) {
            return Err(Rejection::MissingRecordNumber);
        }

        let raw_cost = fields[fields.len() - 1].trim();
        if !self.decimal.is_match(raw_cost) {
            return Err(Rejection::MissingDrugPrice);
        }
        let cost: f64 = raw_cost.parse().map_err(|_| Rejection::MissingDrugPrice)?;
        // exponents past f64 range parse to infinity
        if !cost.is_finite() {
            return Err(Rejection::MissingDrugPrice);
        }

        if fields.len() < 3 {
            return Err(Rejection::MissingDrugName);
        }

        let drug_index = fields.len() - 2;
        Ok(ValidatedRecord {
            patient_name: fields[1..drug_index].join(","),
            drug_name: fields[drug_index].to_string(),
            cost,
        })
    }
}
