//! Single-writer actor.
//!
//! SQLite allows one writer at a time. Every write goes through one task that
//! owns one pooled connection and runs each job inside an immediate
//! transaction, so writers queue instead of failing with `SQLITE_BUSY`.

use std::any::Any;

use diesel::SqliteConnection;
use propdesk_core::errors::Result;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;

type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type Erased = Box<dyn Any + Send + 'static>;
type Envelope = (Job<Erased>, oneshot::Sender<Result<Erased>>);

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Runs `job` on the writer's connection and waits for its result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel();
        let erased: Job<Erased> = Box::new(move |conn| job(conn).map(|v| Box::new(v) as Erased));

        self.tx
            .send((erased, ret_tx))
            .await
            .map_err(|_| StorageError::WriterUnavailable("writer stopped".to_string()))?;

        let boxed = ret_rx
            .await
            .map_err(|_| StorageError::WriterUnavailable("writer dropped the reply".to_string()))??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            StorageError::WriterUnavailable("writer returned an unexpected type".to_string())
                .into()
        })
    }
}

/// Spawns the writer task. It holds one connection from `pool` for its whole
/// lifetime and stops once every [`WriteHandle`] is dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                log::error!("Writer actor could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Into::into);
            // The requester may have gone away.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
