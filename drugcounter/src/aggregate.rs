//! # Per-Drug Aggregation
//!
//! Folds validated ledger records into one [`DrugAggregate`] per drug name.
//! Prescribers are kept as a set, so a patient seen twice for the same drug
//! counts once while both costs still add to the total.

use std::collections::{HashMap, HashSet};

use crate::heap::EvictionOrder;
use crate::record::ValidatedRecord;

/// Running totals for one drug
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrugAggregate {
    /// Distinct patient names seen with this drug
    pub prescribers: HashSet<String>,

    /// Sum of every validated cost, in input order
    pub total_cost: f64,
}

/// Frozen view of one drug's aggregate, as ranked and reported
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub drug_name: String,
    pub prescriber_count: usize,
    pub total_cost: f64,
}

impl RankedEntry {
    /// Snapshot `aggregate` under its drug name
    pub fn from_aggregate(drug_name: String, aggregate: &DrugAggregate) -> Self {
        Self {
            drug_name,
            prescriber_count: aggregate.prescribers.len(),
            total_cost: aggregate.total_cost,
        }
    }
}

impl EvictionOrder for RankedEntry {
    /// Lower cost evicts first; among equal costs the alphabetically later name does
    fn evicts_before(&self, other: &Self) -> bool {
        self.total_cost < other.total_cost
            || (self.total_cost == other.total_cost && self.drug_name > other.drug_name)
    }
}

/// Per-drug accumulator fed by the ledger scan
#[derive(Debug, Default)]
pub struct Aggregator {
    drugs: HashMap<String, DrugAggregate>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into its drug's totals
    pub fn observe(&mut self, record: ValidatedRecord) {
        let entry = self.drugs.entry(record.drug_name).or_default();
        entry.prescribers.insert(record.patient_name);
        entry.total_cost += record.cost;
    }

    /// Read-only view of every drug seen so far, keyed by name
    pub fn snapshot(&self) -> &HashMap<String, DrugAggregate> {
        &self.drugs
    }

    /// Number of distinct drugs seen
    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    /// Consume the accumulator, yielding one ranked entry per drug (in no particular order)
    pub fn into_ranked_entries(self) -> impl Iterator<Item = RankedEntry> {
        self.drugs
            .into_iter()
            .map(|(drug_name, aggregate)| RankedEntry::from_aggregate(drug_name, &aggregate))
    }
}
