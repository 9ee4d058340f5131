use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use serde::Serialize;

use super::scope::SiblingScope;
use crate::error::AppError;

/// Inclusive range of ordinals a request may name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OrdinalBound {
    pub min: i32,
    pub max: i32,
}

impl OrdinalBound {
    pub fn contains(&self, ordinal: i32) -> bool {
        (self.min..=self.max).contains(&ordinal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionKind {
    /// A new sibling may land anywhere in `1..=max+1`.
    Create,
    /// An existing sibling may only move inside the occupied range `1..=max`.
    Update,
}

impl PositionKind {
    pub fn bound(self, max: i32) -> OrdinalBound {
        match self {
            Self::Create => OrdinalBound {
                min: 1,
                max: max + 1,
            },
            Self::Update => OrdinalBound { min: 1, max },
        }
    }
}

/// Checks `requested` against the bound derived from the current maximum.
/// Runs before any mutating statement.
pub fn validate_position(
    kind: PositionKind,
    field: &'static str,
    max: i32,
    requested: i32,
) -> Result<(), AppError> {
    let bound = kind.bound(max);
    if bound.contains(requested) {
        Ok(())
    } else {
        Err(AppError::InvalidPosition {
            field,
            requested,
            bound,
        })
    }
}

/// Highest ordinal under `parent_id`, or 0 when the parent has no children.
pub async fn max_ordinal<S, C>(db: &C, parent_id: i64) -> Result<i32, AppError>
where
    S: SiblingScope,
    C: ConnectionTrait,
{
    let max: Option<Option<i32>> = S::Entity::find()
        .select_only()
        .column_as(S::ordinal_column().max(), "max_ordinal")
        .filter(S::parent_column().eq(parent_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(max.flatten().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_allows_append_slot() {
        assert!(validate_position(PositionKind::Create, "set_number", 4, 5).is_ok());
        assert!(validate_position(PositionKind::Create, "set_number", 4, 1).is_ok());
    }

    #[test]
    fn create_on_empty_parent_requires_one() {
        assert!(validate_position(PositionKind::Create, "set_number", 0, 1).is_ok());
        let err = validate_position(PositionKind::Create, "set_number", 0, 2).expect_err("gap");
        match err {
            AppError::InvalidPosition { bound, .. } => {
                assert_eq!(bound, OrdinalBound { min: 1, max: 1 })
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn create_past_append_slot_reports_bound() {
        let err = validate_position(PositionKind::Create, "order_in_plan", 4, 7)
            .expect_err("too far");
        match err {
            AppError::InvalidPosition {
                field,
                requested,
                bound,
            } => {
                assert_eq!(field, "order_in_plan");
                assert_eq!(requested, 7);
                assert_eq!(bound, OrdinalBound { min: 1, max: 5 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn update_cannot_extend_sequence() {
        assert!(validate_position(PositionKind::Update, "set_number", 3, 3).is_ok());
        assert!(validate_position(PositionKind::Update, "set_number", 3, 4).is_err());
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert!(validate_position(PositionKind::Create, "set_number", 3, 0).is_err());
        assert!(validate_position(PositionKind::Update, "set_number", 3, -1).is_err());
    }
}
