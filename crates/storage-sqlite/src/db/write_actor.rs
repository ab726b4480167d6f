use super::DbPool;
use crate::errors::StorageError;
use budgetwatch_core::errors::{DatabaseError, Error, Result};
use diesel::SqliteConnection;
use log::error;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A write job runs against the actor's connection and reports core errors,
// since that's what repository callers expect.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

// Jobs and replies cross the channel with their result type erased; `exec`
// downcasts back to the caller's `T`.
type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type ErasedReply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
///
/// Cloning is cheap; every clone feeds the same actor.
#[derive(Clone)]
pub struct WriteHandle {
    // Each job travels with the oneshot sender its result is returned on.
    tx: mpsc::Sender<(ErasedJob, ErasedReply)>,
}

fn writer_gone() -> Error {
    Error::Database(DatabaseError::Internal(
        "Database writer is no longer running".to_string(),
    ))
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an immediate transaction. Jobs run one at a time
    /// in submission order, so a budget check and the insert it guards see
    /// no interleaved writes.
    ///
    /// # Arguments
    /// * `job`: A closure that takes a mutable reference to `SqliteConnection`
    ///   and performs the reads and writes of one unit of work.
    ///
    /// # Returns
    /// The job's own `Result<T>`. If the actor has stopped, or hands back a
    /// value of the wrong type, a `DatabaseError::Internal` instead.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        // Box the job's output so every job fits the same channel type.
        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_gone())?;

        let boxed = ret_rx.await.map_err(|_| writer_gone())??;
        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Writer returned an unexpected result type".to_string(),
            ))
        })
    }
}

/// Spawns a background Tokio task that is the only writer to the database.
/// The actor holds one pooled connection for its lifetime and processes jobs
/// serially.
///
/// # Arguments
/// * `pool`: The database connection pool the actor takes its connection from.
///
/// # Returns
/// A `WriteHandle` to send jobs to the spawned actor.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    // Bounded: `exec` waits once 1024 jobs are queued.
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, ErasedReply)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer actor could not acquire a connection: {}", e);
                // Dropping `rx` fails every pending and future `exec`.
                return;
            }
        };

        // Ends once every `WriteHandle` has been dropped.
        while let Some((job, reply_tx)) = rx.recv().await {
            // Core errors raised by the job pass through `StorageError::Core`
            // unchanged.
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            // The caller may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
