use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::disposals_calculator::summarize_disposals;
use super::disposals_model::{DisposalFieldUpdate, DisposalRecord, DisposalSummary};
use super::disposals_traits::{DisposalMutation, DisposalServiceTrait, DisposalStoreTrait};
use crate::errors::{Error, Result};
use crate::report::{build_form_2086_report, Form2086Report};

pub struct DisposalService {
    store: Arc<dyn DisposalStoreTrait>,
}

impl DisposalService {
    pub fn new(store: Arc<dyn DisposalStoreTrait>) -> Self {
        DisposalService { store }
    }

    fn summarize(&self, records: &[DisposalRecord]) -> Result<DisposalSummary> {
        let carry_in_fraction = self.store.load_carry_in_fraction()?;
        let summary = summarize_disposals(records, carry_in_fraction);
        Self::log_summary(&summary);
        Ok(summary)
    }

    fn log_summary(summary: &DisposalSummary) {
        for (index, row) in summary.disposals.iter().enumerate() {
            if row.disposal.total_portfolio_value == 0.0 {
                warn!(
                    "Disposal {} on {} has a zero portfolio value; its gain is not finite",
                    index + 1,
                    row.disposal.date
                );
            }
        }
        debug!(
            "Recomputed {} disposals, total gain/loss {}",
            summary.disposals.len(),
            summary.total_gain_or_loss
        );
    }

    /// Applies a change; the store persists it with the new aggregate in one unit.
    async fn commit(&self, mutation: DisposalMutation) -> Result<DisposalSummary> {
        let summary = self.store.mutate_disposals(mutation).await?;
        Self::log_summary(&summary);
        Ok(summary)
    }
}

#[async_trait]
impl DisposalServiceTrait for DisposalService {
    fn get_disposals(&self) -> Result<Vec<DisposalRecord>> {
        self.store.load_disposals()
    }

    fn get_summary(&self) -> Result<DisposalSummary> {
        let records = self.store.load_disposals()?;
        self.summarize(&records)
    }

    fn get_report(&self) -> Result<Form2086Report> {
        let summary = self.get_summary()?;
        Ok(build_form_2086_report(&summary))
    }

    fn get_carry_in_fraction(&self) -> Result<f64> {
        self.store.load_carry_in_fraction()
    }

    async fn set_carry_in_fraction(&self, value: f64) -> Result<DisposalSummary> {
        self.commit(Box::new(move |state| {
            state.carry_in_fraction = value;
            Ok(())
        }))
        .await
    }

    async fn add_disposal(&self, record: DisposalRecord) -> Result<DisposalSummary> {
        debug!("Appending disposal dated {}", record.date);
        self.commit(Box::new(move |state| {
            state.records.push(record);
            Ok(())
        }))
        .await
    }

    async fn update_disposal_field(
        &self,
        index: usize,
        update: DisposalFieldUpdate,
    ) -> Result<DisposalSummary> {
        self.commit(Box::new(move |state| {
            let len = state.records.len();
            let record = state
                .records
                .get_mut(index)
                .ok_or(Error::IndexOutOfRange { index, len })?;
            record.apply_update(&update)
        }))
        .await
    }

    async fn delete_disposal(&self, index: usize) -> Result<DisposalSummary> {
        self.commit(Box::new(move |state| {
            let len = state.records.len();
            if index >= len {
                return Err(Error::IndexOutOfRange { index, len });
            }
            state.records.remove(index);
            Ok(())
        }))
        .await
    }

    async fn replace_disposals(&self, records: Vec<DisposalRecord>) -> Result<DisposalSummary> {
        debug!("Replacing disposal sequence with {} records", records.len());
        self.commit(Box::new(move |state| {
            state.records = records;
            Ok(())
        }))
        .await
    }
}
