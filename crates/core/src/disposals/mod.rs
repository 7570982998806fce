//! Disposals module - domain models, chain calculator, services, and traits.

mod disposals_calculator;
mod disposals_model;
mod disposals_service;
mod disposals_traits;

mod disposals_service_tests;

pub use disposals_calculator::{
    aggregate_gain_or_loss, capital_fraction_after, compute_disposal_chain, estimate_flat_tax,
    summarize_disposals,
};
pub use disposals_model::{
    ComputedRecord, DisposalField, DisposalFieldUpdate, DisposalRecord, DisposalState,
    DisposalSummary, FieldValue,
};
pub use disposals_service::DisposalService;
pub use disposals_traits::{DisposalMutation, DisposalServiceTrait, DisposalStoreTrait};
