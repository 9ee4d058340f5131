//! Background drift repair for ordered sibling collections.
//!
//! Writers that race on the same parent can leave gaps or duplicate ordinals
//! behind. A repair job rewrites one parent's children to `1..=N`, keeping
//! their relative order (ties broken by id). Jobs are fire-and-forget: the
//! request that scheduled one has already returned, and a failure only shows
//! up in the log.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::db::finalize_transaction;
use crate::error::AppError;
use crate::ordering::{ExercisePlanScope, SetPlanScope, SiblingScope};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    ExercisePlans,
    SetPlans,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExercisePlans => write!(f, "exercise plans"),
            Self::SetPlans => write!(f, "set plans"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RepairJob {
    pub kind: CollectionKind,
    pub parent_id: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepairRequest {
    pub job: RepairJob,
    pub delay: Duration,
}

/// Sending half handed to the services. Cloning is cheap; the worker stops
/// once every clone has been dropped.
#[derive(Clone, Debug)]
pub struct RepairQueue {
    tx: mpsc::UnboundedSender<RepairRequest>,
}

impl RepairQueue {
    /// A queue with no worker behind it; the caller reads requests directly.
    #[cfg(test)]
    pub fn detached() -> (Self, mpsc::UnboundedReceiver<RepairRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn enqueue(&self, job: RepairJob, delay: Duration) {
        debug!(kind = %job.kind, parent_id = job.parent_id, ?delay, "scheduling repair");
        if self.tx.send(RepairRequest { job, delay }).is_err() {
            warn!(
                kind = %job.kind,
                parent_id = job.parent_id,
                "repair worker has stopped; job dropped"
            );
        }
    }
}

pub struct RepairWorker {
    dispatcher: JoinHandle<()>,
}

impl RepairWorker {
    /// Starts the dispatcher on the current tokio runtime.
    pub fn spawn(db: DatabaseConnection) -> (RepairQueue, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = tokio::spawn(dispatch(db, rx));
        (RepairQueue { tx }, Self { dispatcher })
    }

    /// Waits for queued and in-flight jobs. Every `RepairQueue` clone must be
    /// dropped first or this never returns.
    pub async fn shutdown(self) {
        if let Err(err) = self.dispatcher.await {
            error!(error = %err, "repair dispatcher panicked");
        }
    }
}

async fn dispatch(db: DatabaseConnection, mut rx: mpsc::UnboundedReceiver<RepairRequest>) {
    let mut running = JoinSet::new();
    while let Some(RepairRequest { job, delay }) = rx.recv().await {
        let db = db.clone();
        running.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            run_logged(&db, job).await;
        });
        while let Some(finished) = running.try_join_next() {
            report_join(finished);
        }
    }
    while let Some(finished) = running.join_next().await {
        report_join(finished);
    }
    debug!("repair dispatcher stopped");
}

fn report_join(finished: Result<(), JoinError>) {
    if let Err(err) = finished {
        error!(error = %err, "repair task panicked");
    }
}

async fn run_logged(db: &DatabaseConnection, job: RepairJob) {
    match run_job(db, job).await {
        Ok(0) => debug!(kind = %job.kind, parent_id = job.parent_id, "ordinals already dense"),
        Ok(rewritten) => info!(
            kind = %job.kind,
            parent_id = job.parent_id,
            rewritten,
            "repaired ordinal drift"
        ),
        Err(err) => error!(
            kind = %job.kind,
            parent_id = job.parent_id,
            error = %err,
            "ordinal repair failed"
        ),
    }
}

/// Runs one job in the caller's task. Returns the number of rows rewritten.
pub async fn run_job(db: &DatabaseConnection, job: RepairJob) -> Result<u64, AppError> {
    match job.kind {
        CollectionKind::ExercisePlans => resequence::<ExercisePlanScope>(db, job.parent_id).await,
        CollectionKind::SetPlans => resequence::<SetPlanScope>(db, job.parent_id).await,
    }
}

/// Rewrites the children of `parent_id` to `1..=N` in one transaction.
pub async fn resequence<S: SiblingScope>(
    db: &DatabaseConnection,
    parent_id: i64,
) -> Result<u64, AppError> {
    let txn = db.begin().await?;
    let result: Result<u64, AppError> = async {
        let rows: Vec<(i64, i32)> = S::Entity::find()
            .select_only()
            .column(S::id_column())
            .column(S::ordinal_column())
            .filter(S::parent_column().eq(parent_id))
            .order_by_asc(S::ordinal_column())
            .order_by_asc(S::id_column())
            .into_tuple()
            .all(&txn)
            .await?;

        let assignments = dense_assignments(&rows);
        let now = Utc::now();
        for &(id, ordinal) in &assignments {
            S::Entity::update_many()
                .col_expr(S::ordinal_column(), Expr::value(ordinal))
                .col_expr(S::updated_at_column(), Expr::value(now))
                .filter(S::id_column().eq(id))
                .exec(&txn)
                .await?;
        }
        Ok(assignments.len() as u64)
    }
    .await;

    finalize_transaction(txn, result).await
}

/// `(id, ordinal)` pairs whose ordinal must change for the rows to read
/// `1..=N` in `(ordinal, id)` order.
pub fn dense_assignments(rows: &[(i64, i32)]) -> Vec<(i64, i32)> {
    let mut ordered = rows.to_vec();
    ordered.sort_by_key(|&(id, ordinal)| (ordinal, id));
    ordered
        .into_iter()
        .zip(1..)
        .filter(|&((_, current), dense)| current != dense)
        .map(|((id, _), dense)| (id, dense))
        .collect()
}
