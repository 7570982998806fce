use crate::disposals::disposals_model::{
    DisposalFieldUpdate, DisposalRecord, DisposalState, DisposalSummary,
};
use crate::errors::Result;
use crate::report::Form2086Report;
use async_trait::async_trait;

/// In-place edit of the stored disposals and carry-in, run atomically by the store.
pub type DisposalMutation = Box<dyn FnOnce(&mut DisposalState) -> Result<()> + Send + 'static>;

/// Persistence port for the disposal sequence and its companion values.
#[async_trait]
pub trait DisposalStoreTrait: Send + Sync {
    /// Loads the stored sequence. Stored data that is not an array loads as
    /// empty; array elements that cannot be decoded are skipped.
    fn load_disposals(&self) -> Result<Vec<DisposalRecord>>;

    /// Replaces the stored sequence.
    async fn save_disposals(&self, records: Vec<DisposalRecord>) -> Result<()>;

    /// Loads the sequence and carry-in, applies `mutation`, then saves both
    /// together with the recomputed aggregate as one unit. Returns the summary
    /// of the saved state. Nothing is written when `mutation` fails.
    async fn mutate_disposals(&self, mutation: DisposalMutation) -> Result<DisposalSummary>;

    /// Last persisted aggregate gain or loss, if any.
    fn load_gain_total(&self) -> Result<Option<f64>>;

    async fn save_gain_total(&self, total: f64) -> Result<()>;

    /// Capital fraction carried in from the previous filing; 0 when never set.
    fn load_carry_in_fraction(&self) -> Result<f64>;

    async fn save_carry_in_fraction(&self, value: f64) -> Result<()>;
}

/// Trait for disposal service operations
#[async_trait]
pub trait DisposalServiceTrait: Send + Sync {
    fn get_disposals(&self) -> Result<Vec<DisposalRecord>>;
    fn get_summary(&self) -> Result<DisposalSummary>;
    fn get_report(&self) -> Result<Form2086Report>;
    fn get_carry_in_fraction(&self) -> Result<f64>;
    async fn set_carry_in_fraction(&self, value: f64) -> Result<DisposalSummary>;
    async fn add_disposal(&self, record: DisposalRecord) -> Result<DisposalSummary>;
    async fn update_disposal_field(
        &self,
        index: usize,
        update: DisposalFieldUpdate,
    ) -> Result<DisposalSummary>;
    async fn delete_disposal(&self, index: usize) -> Result<DisposalSummary>;
    async fn replace_disposals(&self, records: Vec<DisposalRecord>) -> Result<DisposalSummary>;
}
