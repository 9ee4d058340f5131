use std::marker::PhantomData;
use std::time::Duration;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::debug;

use super::position::{max_ordinal, validate_position, PositionKind};
use super::scope::SiblingScope;
use super::unit_of_work::UnitOfWork;
use crate::db::finalize_transaction;
use crate::error::AppError;
use crate::ownership::Owner;
use crate::repair::{resequence, RepairJob, RepairQueue};

/// Add, move and delete for one sibling collection. Every write runs
/// resolve → validate → shift → mutate inside a single transaction, so
/// sibling ordinals are dense again when the call returns.
///
/// Concurrent writers on the same parent are not serialized; the last commit
/// wins and a delete schedules a drift repair as a backstop.
pub struct OrderedCollection<S: SiblingScope> {
    db: DatabaseConnection,
    repairs: Option<RepairQueue>,
    repair_delay: Duration,
    _scope: PhantomData<S>,
}

impl<S: SiblingScope> OrderedCollection<S> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            repairs: None,
            repair_delay: Duration::ZERO,
            _scope: PhantomData,
        }
    }

    pub fn with_repairs(mut self, queue: RepairQueue, delay: Duration) -> Self {
        self.repairs = Some(queue);
        self.repair_delay = delay;
        self
    }

    pub async fn add(
        &self,
        owner: Owner,
        parent: S::ParentKey,
        draft: S::Draft,
    ) -> Result<S::Detail, AppError> {
        S::validate_draft(&draft)?;

        let txn = self.db.begin().await?;
        let result: Result<S::Detail, AppError> = async {
            let parent_id = S::resolve_parent(&txn, owner, parent).await?;
            let max = max_ordinal::<S, _>(&txn, parent_id).await?;
            let ordinal = S::draft_ordinal(&draft).unwrap_or(max + 1);
            validate_position(PositionKind::Create, S::ORDINAL_FIELD, max, ordinal)?;
            debug!(collection = S::LABEL, parent_id, ordinal, max, "adding sibling");

            let created = UnitOfWork::<S>::insert(parent_id, draft, ordinal)
                .flush(&txn)
                .await?;
            S::detail(&txn, created).await
        }
        .await;

        finalize_transaction(txn, result).await
    }

    /// Applies field changes and, when the changes name a new ordinal, moves
    /// the child within the occupied range.
    pub async fn update(
        &self,
        owner: Owner,
        child: S::ChildKey,
        changes: S::Changes,
    ) -> Result<S::Detail, AppError> {
        S::validate_changes(&changes)?;

        let txn = self.db.begin().await?;
        let result: Result<S::Detail, AppError> = async {
            let current = S::resolve_child(&txn, owner, child).await?;
            let ordinal = match S::changed_ordinal(&changes) {
                Some(requested) => {
                    let max = max_ordinal::<S, _>(&txn, S::parent_id(&current)).await?;
                    validate_position(PositionKind::Update, S::ORDINAL_FIELD, max, requested)?;
                    requested
                }
                None => S::ordinal(&current),
            };
            debug!(
                collection = S::LABEL,
                id = S::id(&current),
                from = S::ordinal(&current),
                to = ordinal,
                "updating sibling"
            );

            let updated = UnitOfWork::<S>::update(current, changes, ordinal)
                .flush(&txn)
                .await?;
            S::detail(&txn, updated).await
        }
        .await;

        finalize_transaction(txn, result).await
    }

    /// Deletes the child, closes the gap it leaves and, once committed,
    /// schedules a drift repair for the parent. Returns the deleted row.
    pub async fn delete(&self, owner: Owner, child: S::ChildKey) -> Result<S::Model, AppError> {
        let txn = self.db.begin().await?;
        let result: Result<S::Model, AppError> = async {
            let current = S::resolve_child(&txn, owner, child).await?;
            UnitOfWork::<S>::delete(current).flush(&txn).await
        }
        .await;

        let deleted = finalize_transaction(txn, result).await?;
        if let Some(queue) = &self.repairs {
            queue.enqueue(
                RepairJob {
                    kind: S::KIND,
                    parent_id: S::parent_id(&deleted),
                },
                self.repair_delay,
            );
        }
        Ok(deleted)
    }

    pub async fn get(&self, owner: Owner, child: S::ChildKey) -> Result<S::Detail, AppError> {
        let model = S::resolve_child(&self.db, owner, child).await?;
        S::detail(&self.db, model).await
    }

    /// Siblings under `parent` in ordinal order; ties fall back to id.
    pub async fn list(&self, owner: Owner, parent: S::ParentKey) -> Result<Vec<S::Model>, AppError> {
        let parent_id = S::resolve_parent(&self.db, owner, parent).await?;
        Ok(S::Entity::find()
            .filter(S::parent_column().eq(parent_id))
            .order_by_asc(S::ordinal_column())
            .order_by_asc(S::id_column())
            .all(&self.db)
            .await?)
    }

    /// Rewrites the siblings under `parent` to `1..=N` right away instead of
    /// waiting for the worker. Returns the number of rows rewritten.
    pub async fn repair(&self, owner: Owner, parent: S::ParentKey) -> Result<u64, AppError> {
        let parent_id = S::resolve_parent(&self.db, owner, parent).await?;
        resequence::<S>(&self.db, parent_id).await
    }
}
