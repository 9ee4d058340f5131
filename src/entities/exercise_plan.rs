use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::{set_plan, workout_plan};

/// One exercise inside a workout plan; `order_in_plan` ranks it among its
/// siblings and is kept dense (1..N) per workout plan.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "exercise_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub workout_plan_id: i64,
    pub exercise_id: i64,
    pub order_in_plan: i32,
    pub target_sets: i32,
    pub target_duration_minutes: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    WorkoutPlan,
    SetPlan,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::WorkoutPlan => Entity::belongs_to(workout_plan::Entity)
                .from(Column::WorkoutPlanId)
                .to(workout_plan::Column::Id)
                .into(),
            Self::SetPlan => Entity::has_many(set_plan::Entity).into(),
        }
    }
}

impl Related<workout_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkoutPlan.def()
    }
}

impl Related<set_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SetPlan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
