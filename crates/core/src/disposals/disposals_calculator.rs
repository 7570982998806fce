//! Disposal chain calculator.
//!
//! Each disposal's capital fraction depends on the previous disposal's raw
//! proceeds ratio, so the whole sequence is recomputed in one left-to-right
//! pass whenever any record changes. Arithmetic is plain `f64` and is never
//! rounded here; a zero portfolio value yields a non-finite gain that is
//! propagated to the aggregate.

use super::disposals_model::{ComputedRecord, DisposalRecord, DisposalSummary};
use crate::constants::FLAT_TAX_RATE;

/// Computes the derived rows for `records`, index-aligned with the input.
///
/// `carry_in_fraction` is only used as the capital fraction of the first record.
pub fn compute_disposal_chain(
    records: &[DisposalRecord],
    carry_in_fraction: f64,
) -> Vec<ComputedRecord> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let capital_fraction = match index.checked_sub(1).and_then(|i| records.get(i)) {
                Some(previous) => capital_fraction_after(previous, record),
                None => carry_in_fraction,
            };
            ComputedRecord::derive(record, capital_fraction)
        })
        .collect()
}

/// Capital fraction of `current` given the raw record disposed just before it.
pub fn capital_fraction_after(previous: &DisposalRecord, current: &DisposalRecord) -> f64 {
    current.total_acquisition_cost
        * (previous.net_of_balancing() / previous.total_portfolio_value)
}

/// Sum of every row's gain or loss. Zero for an empty sequence.
pub fn aggregate_gain_or_loss(rows: &[ComputedRecord]) -> f64 {
    rows.iter().fold(0.0, |total, row| total + row.gain_or_loss)
}

pub fn estimate_flat_tax(total_gain_or_loss: f64) -> f64 {
    total_gain_or_loss * FLAT_TAX_RATE
}

/// Runs the chain and bundles the rows with their aggregate and tax estimate.
pub fn summarize_disposals(records: &[DisposalRecord], carry_in_fraction: f64) -> DisposalSummary {
    let disposals = compute_disposal_chain(records, carry_in_fraction);
    let total_gain_or_loss = aggregate_gain_or_loss(&disposals);
    DisposalSummary {
        disposals,
        carry_in_fraction,
        total_gain_or_loss,
        estimated_tax: estimate_flat_tax(total_gain_or_loss),
    }
}
