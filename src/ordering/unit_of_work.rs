use sea_orm::ConnectionTrait;
use tracing::debug;

use super::scope::SiblingScope;
use super::shift::{apply_shift, Shift};
use crate::error::AppError;

/// Primary row change recorded alongside its sibling shift.
pub enum Mutation<S: SiblingScope> {
    Insert {
        draft: S::Draft,
        ordinal: i32,
    },
    Update {
        current: S::Model,
        changes: S::Changes,
        ordinal: i32,
    },
    Delete {
        current: S::Model,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushOrder {
    ShiftThenMutate,
    MutateThenShift,
}

/// The shift intent and the mutation intent of one request. Both are flushed
/// into the same connection, which the caller wraps in a transaction.
pub struct UnitOfWork<S: SiblingScope> {
    parent_id: i64,
    shift: Shift,
    mutation: Mutation<S>,
}

impl<S: SiblingScope> UnitOfWork<S> {
    pub fn insert(parent_id: i64, draft: S::Draft, ordinal: i32) -> Self {
        Self {
            parent_id,
            shift: Shift::Insert { target: ordinal },
            mutation: Mutation::Insert { draft, ordinal },
        }
    }

    pub fn update(current: S::Model, changes: S::Changes, ordinal: i32) -> Self {
        Self {
            parent_id: S::parent_id(&current),
            shift: Shift::Move {
                child_id: S::id(&current),
                from: S::ordinal(&current),
                to: ordinal,
            },
            mutation: Mutation::Update {
                current,
                changes,
                ordinal,
            },
        }
    }

    pub fn delete(current: S::Model) -> Self {
        Self {
            parent_id: S::parent_id(&current),
            shift: Shift::Delete {
                removed: S::ordinal(&current),
            },
            mutation: Mutation::Delete { current },
        }
    }

    #[cfg(test)]
    pub fn shift(&self) -> Shift {
        self.shift
    }

    /// Inserts and moves open their slot first; a delete frees its slot first.
    pub fn flush_order(&self) -> FlushOrder {
        match self.mutation {
            Mutation::Insert { .. } | Mutation::Update { .. } => FlushOrder::ShiftThenMutate,
            Mutation::Delete { .. } => FlushOrder::MutateThenShift,
        }
    }

    /// Writes both intents and returns the mutated row (the prior snapshot
    /// for a delete).
    pub async fn flush<C: ConnectionTrait>(self, db: &C) -> Result<S::Model, AppError> {
        let order = self.flush_order();
        let Self {
            parent_id,
            shift,
            mutation,
        } = self;
        debug!(collection = S::LABEL, parent_id, ?order, "flushing unit of work");

        match mutation {
            Mutation::Insert { draft, ordinal } => {
                apply_shift::<S, C>(db, parent_id, shift).await?;
                S::insert(db, parent_id, draft, ordinal).await
            }
            Mutation::Update {
                current,
                changes,
                ordinal,
            } => {
                apply_shift::<S, C>(db, parent_id, shift).await?;
                S::update(db, current, changes, ordinal).await
            }
            Mutation::Delete { current } => {
                S::delete(db, &current).await?;
                apply_shift::<S, C>(db, parent_id, shift).await?;
                Ok(current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::set_plan;
    use crate::model::{SetPlanChanges, SetPlanDraft};
    use crate::ordering::SetPlanScope;
    use chrono::Utc;

    fn set_row(id: i64, set_number: i32) -> set_plan::Model {
        let now = Utc::now();
        set_plan::Model {
            id,
            exercise_plan_id: 7,
            set_number,
            target_reps: 8,
            target_weight: 60.0,
            target_duration_seconds: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_shifts_before_mutating() {
        let draft = SetPlanDraft {
            set_number: Some(2),
            target_reps: 5,
            target_weight: 80.0,
            target_duration_seconds: None,
        };
        let work = UnitOfWork::<SetPlanScope>::insert(7, draft, 2);
        assert_eq!(work.flush_order(), FlushOrder::ShiftThenMutate);
        assert_eq!(work.shift(), Shift::Insert { target: 2 });
    }

    #[test]
    fn update_records_move_from_current_ordinal() {
        let work =
            UnitOfWork::<SetPlanScope>::update(set_row(31, 3), SetPlanChanges::default(), 1);
        assert_eq!(work.flush_order(), FlushOrder::ShiftThenMutate);
        assert_eq!(
            work.shift(),
            Shift::Move {
                child_id: 31,
                from: 3,
                to: 1
            }
        );
    }

    #[test]
    fn delete_mutates_before_shifting() {
        let work = UnitOfWork::<SetPlanScope>::delete(set_row(31, 2));
        assert_eq!(work.flush_order(), FlushOrder::MutateThenShift);
        assert_eq!(work.shift(), Shift::Delete { removed: 2 });
    }
}
