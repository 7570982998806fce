//! Disposal domain models.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::DISPOSAL_DATE_FORMAT;
use crate::errors::{Result, ValidationError};
use crate::utils::number_utils::parse_amount_lenient;

/// One disposal ("cession") as entered by the user.
///
/// Records are kept in chronological order; the capital fraction of every
/// record after the first is derived from its predecessor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisposalRecord {
    pub date: NaiveDate,
    pub total_portfolio_value: f64,
    pub disposal_amount: f64,
    pub disposal_fees: f64,
    pub balancing_payment: f64,
    pub total_acquisition_cost: f64,
    pub prior_balancing_payment_received: f64,
}

impl DisposalRecord {
    /// Disposal price net of the balancing payment (line 217).
    pub fn net_of_balancing(&self) -> f64 {
        self.disposal_amount - self.balancing_payment
    }

    /// Disposal price net of fees and balancing payment (line 218).
    pub fn net_of_fees_and_balancing(&self) -> f64 {
        self.disposal_amount - self.disposal_fees - self.balancing_payment
    }

    /// Applies a single-field edit in place.
    ///
    /// Numeric fields accept either a number or numeric text; text that does
    /// not parse is coerced to zero. The date only accepts `YYYY-MM-DD` text.
    pub fn apply_update(&mut self, update: &DisposalFieldUpdate) -> Result<()> {
        let field = update.field;
        if field == DisposalField::Date {
            self.date = match &update.value {
                FieldValue::Text(text) => {
                    NaiveDate::parse_from_str(text.trim(), DISPOSAL_DATE_FORMAT)?
                }
                FieldValue::Number(_) => {
                    return Err(ValidationError::FieldTypeMismatch {
                        field: field.as_str(),
                        expected: "a YYYY-MM-DD date",
                    }
                    .into())
                }
            };
            return Ok(());
        }

        let amount = match &update.value {
            FieldValue::Number(value) => *value,
            FieldValue::Text(text) => parse_amount_lenient(text),
        };
        debug!("Setting {} to {}", field.as_str(), amount);

        match field {
            DisposalField::TotalPortfolioValue => self.total_portfolio_value = amount,
            DisposalField::DisposalAmount => self.disposal_amount = amount,
            DisposalField::DisposalFees => self.disposal_fees = amount,
            DisposalField::BalancingPayment => self.balancing_payment = amount,
            DisposalField::TotalAcquisitionCost => self.total_acquisition_cost = amount,
            DisposalField::PriorBalancingPaymentReceived => {
                self.prior_balancing_payment_received = amount
            }
            DisposalField::Date => {}
        }
        Ok(())
    }
}

/// A disposal together with its derived form values.
///
/// Never stored: rebuilt from the raw sequence on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputedRecord {
    #[serde(flatten)]
    pub disposal: DisposalRecord,
    pub net_of_balancing: f64,
    pub net_of_fees_and_balancing: f64,
    pub capital_fraction: f64,
    pub net_acquisition_cost: f64,
    pub gain_or_loss: f64,
}

impl ComputedRecord {
    /// Derives every computed field of `disposal` once its capital fraction is known.
    pub fn derive(disposal: &DisposalRecord, capital_fraction: f64) -> Self {
        let net_of_balancing = disposal.net_of_balancing();
        let net_of_fees_and_balancing = disposal.net_of_fees_and_balancing();
        let net_acquisition_cost = disposal.total_acquisition_cost
            - capital_fraction
            - disposal.prior_balancing_payment_received;
        let gain_or_loss = net_of_fees_and_balancing
            - net_acquisition_cost * (net_of_balancing / disposal.total_portfolio_value);

        ComputedRecord {
            disposal: disposal.clone(),
            net_of_balancing,
            net_of_fees_and_balancing,
            capital_fraction,
            net_acquisition_cost,
            gain_or_loss,
        }
    }
}

/// Persisted inputs of the calculation, edited as one unit by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisposalState {
    pub records: Vec<DisposalRecord>,
    pub carry_in_fraction: f64,
}

/// Result of a calculation over the whole disposal sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisposalSummary {
    pub disposals: Vec<ComputedRecord>,
    pub carry_in_fraction: f64,
    pub total_gain_or_loss: f64,
    /// Flat-tax estimate on the aggregate.
    pub estimated_tax: f64,
}

/// The raw fields a user can edit on a recorded disposal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DisposalField {
    Date,
    TotalPortfolioValue,
    DisposalAmount,
    DisposalFees,
    BalancingPayment,
    TotalAcquisitionCost,
    PriorBalancingPaymentReceived,
}

impl DisposalField {
    pub const ALL: [DisposalField; 7] = [
        DisposalField::Date,
        DisposalField::TotalPortfolioValue,
        DisposalField::DisposalAmount,
        DisposalField::DisposalFees,
        DisposalField::BalancingPayment,
        DisposalField::TotalAcquisitionCost,
        DisposalField::PriorBalancingPaymentReceived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisposalField::Date => "date",
            DisposalField::TotalPortfolioValue => "totalPortfolioValue",
            DisposalField::DisposalAmount => "disposalAmount",
            DisposalField::DisposalFees => "disposalFees",
            DisposalField::BalancingPayment => "balancingPayment",
            DisposalField::TotalAcquisitionCost => "totalAcquisitionCost",
            DisposalField::PriorBalancingPaymentReceived => "priorBalancingPaymentReceived",
        }
    }
}

/// Value submitted for a single-field edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

/// Input model for editing one field of a recorded disposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisposalFieldUpdate {
    pub field: DisposalField,
    pub value: FieldValue,
}
