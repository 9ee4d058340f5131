use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::debug;

use super::scope::SiblingScope;
use crate::error::AppError;

/// Sibling renumbering that accompanies one primary mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    /// A new sibling takes `target`; everything at or after it moves up.
    Insert { target: i32 },
    /// `child_id` moves from `from` to `to`; the rows in between close ranks.
    Move { child_id: i64, from: i32, to: i32 },
    /// The sibling at `removed` is gone; everything after it moves down.
    Delete { removed: i32 },
}

/// `ordinal += delta` for siblings with `lower <= ordinal <= upper`,
/// skipping `exclude`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftPlan {
    pub delta: i32,
    pub lower: i32,
    pub upper: Option<i32>,
    pub exclude: Option<i64>,
}

impl Shift {
    /// `None` when nothing needs renumbering.
    pub fn plan(&self) -> Option<ShiftPlan> {
        match *self {
            Self::Insert { target } => Some(ShiftPlan {
                delta: 1,
                lower: target,
                upper: None,
                exclude: None,
            }),
            Self::Move { child_id, from, to } if to < from => Some(ShiftPlan {
                delta: 1,
                lower: to,
                upper: Some(from - 1),
                exclude: Some(child_id),
            }),
            Self::Move { child_id, from, to } if to > from => Some(ShiftPlan {
                delta: -1,
                lower: from + 1,
                upper: Some(to),
                exclude: Some(child_id),
            }),
            Self::Move { .. } => None,
            Self::Delete { removed } => Some(ShiftPlan {
                delta: -1,
                lower: removed + 1,
                upper: None,
                exclude: None,
            }),
        }
    }
}

#[cfg(test)]
impl ShiftPlan {
    pub fn covers(&self, id: i64, ordinal: i32) -> bool {
        if self.exclude == Some(id) || ordinal < self.lower {
            return false;
        }
        self.upper.map_or(true, |upper| ordinal <= upper)
    }

    /// The ordinal a sibling ends with once the plan has run.
    pub fn apply_to(&self, id: i64, ordinal: i32) -> i32 {
        if self.covers(id, ordinal) {
            ordinal + self.delta
        } else {
            ordinal
        }
    }
}

/// Issues the shift as a single conditional bulk update scoped to `parent_id`.
/// Returns the number of siblings renumbered.
pub async fn apply_shift<S, C>(db: &C, parent_id: i64, shift: Shift) -> Result<u64, AppError>
where
    S: SiblingScope,
    C: ConnectionTrait,
{
    let Some(plan) = shift.plan() else {
        return Ok(0);
    };
    let ordinal = S::ordinal_column();
    let mut update = S::Entity::update_many()
        .col_expr(ordinal, Expr::col(ordinal).add(plan.delta))
        .col_expr(S::updated_at_column(), Expr::value(Utc::now()))
        .filter(S::parent_column().eq(parent_id))
        .filter(ordinal.gte(plan.lower));
    if let Some(upper) = plan.upper {
        update = update.filter(ordinal.lte(upper));
    }
    if let Some(exclude) = plan.exclude {
        update = update.filter(S::id_column().ne(exclude));
    }
    let result = update.exec(db).await?;
    debug!(
        collection = S::LABEL,
        parent_id,
        ?shift,
        rows = result.rows_affected,
        "shifted siblings"
    );
    Ok(result.rows_affected)
}
