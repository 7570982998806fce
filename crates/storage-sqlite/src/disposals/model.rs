//! Database models for the key/value state table and stored disposals.

use chrono::NaiveDate;
use diesel::prelude::*;
use formulaire2086_core::disposals::DisposalRecord;
use serde::{Deserialize, Serialize};

/// Database model for app state key-value pairs
#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::app_state)]
pub struct AppStateDB {
    pub state_key: String,
    pub state_value: String,
}

/// A disposal as stored under the records key.
///
/// Field names follow the layout written by the browser calculator, so an
/// exported array can be stored as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredDisposal {
    pub date: NaiveDate,
    pub valeur_globale: f64,
    pub prix_cession: f64,
    pub frais_cession: f64,
    pub soulte: f64,
    pub prix_total_acquisition: f64,
    pub soulte_recue_precedente: f64,
}

impl From<StoredDisposal> for DisposalRecord {
    fn from(stored: StoredDisposal) -> Self {
        DisposalRecord {
            date: stored.date,
            total_portfolio_value: stored.valeur_globale,
            disposal_amount: stored.prix_cession,
            disposal_fees: stored.frais_cession,
            balancing_payment: stored.soulte,
            total_acquisition_cost: stored.prix_total_acquisition,
            prior_balancing_payment_received: stored.soulte_recue_precedente,
        }
    }
}

impl From<&DisposalRecord> for StoredDisposal {
    fn from(record: &DisposalRecord) -> Self {
        StoredDisposal {
            date: record.date,
            valeur_globale: record.total_portfolio_value,
            prix_cession: record.disposal_amount,
            frais_cession: record.disposal_fees,
            soulte: record.balancing_payment,
            prix_total_acquisition: record.total_acquisition_cost,
            soulte_recue_precedente: record.prior_balancing_payment_received,
        }
    }
}
