use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use formulaire2086_core::errors::{DatabaseError, Error, Result};
use log::debug;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// Jobs run on the writer's connection and return a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type ErasedReply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, ErasedReply)>,
}

fn writer_stopped() -> Error {
    Error::Database(DatabaseError::Internal(
        "database writer is no longer running".to_string(),
    ))
}

impl WriteHandle {
    /// Executes `job` inside an immediate transaction on the writer's connection.
    ///
    /// Jobs run one at a time, so a load-modify-save job cannot interleave
    /// with another write. The transaction is rolled back when the job fails.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_stopped())?;

        let boxed = ret_rx.await.map_err(|_| writer_stopped())??;
        boxed.downcast::<T>().map(|value| *value).map_err(|_| {
            Error::Unexpected("writer job returned an unexpected type".to_string())
        })
    }
}

/// Spawns a background Tokio task that acts as the single writer to the database.
///
/// The actor holds one pooled connection for its lifetime and processes jobs
/// serially. It stops once every `WriteHandle` has been dropped.
pub fn spawn_writer(pool: DbPool) -> Result<WriteHandle> {
    let mut conn = pool.get().map_err(StorageError::from)?;
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, ErasedReply)>(1024);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            // The requester may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
        debug!("Database writer stopped");
    });

    Ok(WriteHandle { tx })
}
