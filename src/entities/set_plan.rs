use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::exercise_plan;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "set_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exercise_plan_id: i64,
    pub set_number: i32,
    pub target_reps: i32,
    pub target_weight: f64,
    pub target_duration_seconds: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ExercisePlan,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::ExercisePlan => Entity::belongs_to(exercise_plan::Entity)
                .from(Column::ExercisePlanId)
                .to(exercise_plan::Column::Id)
                .into(),
        }
    }
}

impl Related<exercise_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExercisePlan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
