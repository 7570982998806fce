use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::warn;
use std::sync::Arc;

use super::model::{AppStateDB, StoredDisposal};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_state::dsl::*;
use formulaire2086_core::constants::{
    CARRY_IN_FRACTION_STORAGE_KEY, DISPOSALS_BACKUP_STORAGE_KEY, DISPOSALS_STORAGE_KEY,
    GAIN_TOTAL_STORAGE_KEY,
};
use formulaire2086_core::disposals::{
    summarize_disposals, DisposalMutation, DisposalRecord, DisposalState, DisposalStoreTrait,
    DisposalSummary,
};
use formulaire2086_core::errors::Result;

/// Stored disposals after decoding; `lossy` is set when part of the raw value was dropped.
struct DecodedDisposals {
    records: Vec<DisposalRecord>,
    lossy: bool,
}

fn decode_stored(raw: &str) -> DecodedDisposals {
    let items = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            warn!("Stored disposals are not an array; starting empty");
            return DecodedDisposals {
                records: Vec::new(),
                lossy: true,
            };
        }
        Err(e) => {
            warn!("Stored disposals are not valid JSON ({}); starting empty", e);
            return DecodedDisposals {
                records: Vec::new(),
                lossy: true,
            };
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut lossy = false;
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<StoredDisposal>(item) {
            Ok(stored) => records.push(DisposalRecord::from(stored)),
            Err(e) => {
                warn!("Skipping stored disposal {} ({})", index + 1, e);
                lossy = true;
            }
        }
    }
    DecodedDisposals { records, lossy }
}

/// Decodes the stored disposal array.
///
/// A value that is not a JSON array decodes as an empty sequence. Elements
/// that cannot be decoded are skipped; the others keep their order.
pub fn decode_disposals(raw: &str) -> Vec<DisposalRecord> {
    decode_stored(raw).records
}

pub fn encode_disposals(records: &[DisposalRecord]) -> serde_json::Result<String> {
    let stored: Vec<StoredDisposal> = records.iter().map(StoredDisposal::from).collect();
    serde_json::to_string(&stored)
}

fn parse_stored_number(key: &str, raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!("Ignoring non-numeric value stored under '{}': {}", key, raw);
            None
        }
    }
}

fn read_value(
    conn: &mut SqliteConnection,
    key: &str,
) -> std::result::Result<Option<String>, StorageError> {
    let value = app_state
        .filter(state_key.eq(key))
        .select(state_value)
        .first::<String>(conn)
        .optional()?;
    Ok(value)
}

fn write_value(
    conn: &mut SqliteConnection,
    key: &str,
    value: String,
) -> std::result::Result<(), StorageError> {
    diesel::replace_into(app_state)
        .values(AppStateDB {
            state_key: key.to_string(),
            state_value: value,
        })
        .execute(conn)?;
    Ok(())
}

fn read_number(
    conn: &mut SqliteConnection,
    key: &str,
) -> std::result::Result<Option<f64>, StorageError> {
    Ok(read_value(conn, key)?.and_then(|raw| parse_stored_number(key, &raw)))
}

fn read_disposals(conn: &mut SqliteConnection) -> std::result::Result<Vec<DisposalRecord>, StorageError> {
    Ok(read_value(conn, DISPOSALS_STORAGE_KEY)?
        .map(|raw| decode_disposals(&raw))
        .unwrap_or_default())
}

/// Reads the sequence ahead of a write. When part of the stored value cannot
/// be decoded, the raw value is first copied to the backup key.
fn read_disposals_for_update(
    conn: &mut SqliteConnection,
) -> std::result::Result<Vec<DisposalRecord>, StorageError> {
    let Some(raw) = read_value(conn, DISPOSALS_STORAGE_KEY)? else {
        return Ok(Vec::new());
    };
    let decoded = decode_stored(&raw);
    if decoded.lossy {
        warn!(
            "Keeping undecodable stored disposals under '{}'",
            DISPOSALS_BACKUP_STORAGE_KEY
        );
        write_value(conn, DISPOSALS_BACKUP_STORAGE_KEY, raw)?;
    }
    Ok(decoded.records)
}

fn write_disposals(
    conn: &mut SqliteConnection,
    records: &[DisposalRecord],
) -> std::result::Result<(), StorageError> {
    write_value(conn, DISPOSALS_STORAGE_KEY, encode_disposals(records)?)
}

pub struct DisposalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DisposalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        DisposalRepository { pool, writer }
    }

    fn load_number(&self, key: &str) -> Result<Option<f64>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(read_number(&mut conn, key)?)
    }

    async fn write_number(&self, key: &'static str, number: f64) -> Result<()> {
        self.writer
            .exec(move |conn| Ok(write_value(conn, key, number.to_string())?))
            .await
    }
}

#[async_trait]
impl DisposalStoreTrait for DisposalRepository {
    fn load_disposals(&self) -> Result<Vec<DisposalRecord>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(read_disposals(&mut conn)?)
    }

    async fn save_disposals(&self, records: Vec<DisposalRecord>) -> Result<()> {
        self.writer
            .exec(move |conn| {
                read_disposals_for_update(conn)?;
                Ok(write_disposals(conn, &records)?)
            })
            .await
    }

    async fn mutate_disposals(&self, mutation: DisposalMutation) -> Result<DisposalSummary> {
        self.writer
            .exec(move |conn| {
                let mut state = DisposalState {
                    records: read_disposals_for_update(conn)?,
                    carry_in_fraction: read_number(conn, CARRY_IN_FRACTION_STORAGE_KEY)?
                        .unwrap_or(0.0),
                };
                mutation(&mut state)?;

                let summary = summarize_disposals(&state.records, state.carry_in_fraction);
                write_disposals(conn, &state.records)?;
                write_value(
                    conn,
                    CARRY_IN_FRACTION_STORAGE_KEY,
                    state.carry_in_fraction.to_string(),
                )?;
                write_value(
                    conn,
                    GAIN_TOTAL_STORAGE_KEY,
                    summary.total_gain_or_loss.to_string(),
                )?;
                Ok(summary)
            })
            .await
    }

    fn load_gain_total(&self) -> Result<Option<f64>> {
        self.load_number(GAIN_TOTAL_STORAGE_KEY)
    }

    async fn save_gain_total(&self, total: f64) -> Result<()> {
        self.write_number(GAIN_TOTAL_STORAGE_KEY, total).await
    }

    fn load_carry_in_fraction(&self) -> Result<f64> {
        Ok(self
            .load_number(CARRY_IN_FRACTION_STORAGE_KEY)?
            .unwrap_or(0.0))
    }

    async fn save_carry_in_fraction(&self, value: f64) -> Result<()> {
        self.write_number(CARRY_IN_FRACTION_STORAGE_KEY, value).await
    }
}
