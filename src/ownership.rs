//! Resolves rows through the user → workout plan → exercise plan → set plan
//! chain with one joined lookup per request.
//!
//! A row that exists but belongs to another user yields exactly the same
//! `NotFound` as a row that does not exist.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
};
use serde::Serialize;

use crate::entities::{exercise_plan, set_plan, workout_plan};
use crate::error::AppError;

/// The acting user. Authentication happens before this layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub user_id: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WorkoutPlanKey {
    pub workout_plan_id: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ExercisePlanKey {
    pub workout_plan_id: i64,
    pub exercise_plan_id: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SetPlanKey {
    pub workout_plan_id: i64,
    pub exercise_plan_id: i64,
    pub set_plan_id: i64,
}

impl ExercisePlanKey {
    pub fn parent(&self) -> WorkoutPlanKey {
        WorkoutPlanKey {
            workout_plan_id: self.workout_plan_id,
        }
    }
}

impl SetPlanKey {
    pub fn parent(&self) -> ExercisePlanKey {
        ExercisePlanKey {
            workout_plan_id: self.workout_plan_id,
            exercise_plan_id: self.exercise_plan_id,
        }
    }
}

pub async fn resolve_workout_plan<C: ConnectionTrait>(
    db: &C,
    owner: Owner,
    key: WorkoutPlanKey,
) -> Result<workout_plan::Model, AppError> {
    workout_plan::Entity::find_by_id(key.workout_plan_id)
        .filter(workout_plan::Column::UserId.eq(owner.user_id))
        .one(db)
        .await?
        .ok_or_else(|| not_found("workout plan", key.workout_plan_id))
}

pub async fn resolve_exercise_plan<C: ConnectionTrait>(
    db: &C,
    owner: Owner,
    key: ExercisePlanKey,
) -> Result<exercise_plan::Model, AppError> {
    exercise_plan::Entity::find_by_id(key.exercise_plan_id)
        .filter(exercise_plan::Column::WorkoutPlanId.eq(key.workout_plan_id))
        .inner_join(workout_plan::Entity)
        .filter(workout_plan::Column::UserId.eq(owner.user_id))
        .one(db)
        .await?
        .ok_or_else(|| not_found("exercise plan", key.exercise_plan_id))
}

pub async fn resolve_set_plan<C: ConnectionTrait>(
    db: &C,
    owner: Owner,
    key: SetPlanKey,
) -> Result<set_plan::Model, AppError> {
    set_plan::Entity::find_by_id(key.set_plan_id)
        .filter(set_plan::Column::ExercisePlanId.eq(key.exercise_plan_id))
        .inner_join(exercise_plan::Entity)
        .join(
            JoinType::InnerJoin,
            exercise_plan::Relation::WorkoutPlan.def(),
        )
        .filter(exercise_plan::Column::WorkoutPlanId.eq(key.workout_plan_id))
        .filter(workout_plan::Column::UserId.eq(owner.user_id))
        .one(db)
        .await?
        .ok_or_else(|| not_found("set plan", key.set_plan_id))
}

fn not_found(label: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{label} id {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::open_temp_db;
    use crate::test_support::{seed_exercise_plan, seed_set_plan, seed_user, seed_workout_plan};

    #[tokio::test]
    async fn resolves_full_chain_for_owner() {
        let (_dir, db) = open_temp_db().await;
        let user = seed_user(&db, "owner@example.com").await;
        let workout = seed_workout_plan(&db, user.id).await;
        let exercise = seed_exercise_plan(&db, workout.id, 1).await;
        let set = seed_set_plan(&db, exercise.id, 1).await;
        let owner = Owner { user_id: user.id };

        let key = SetPlanKey {
            workout_plan_id: workout.id,
            exercise_plan_id: exercise.id,
            set_plan_id: set.id,
        };
        let resolved = resolve_set_plan(&db, owner, key).await.expect("set plan");
        assert_eq!(resolved.id, set.id);

        let resolved = resolve_exercise_plan(&db, owner, key.parent())
            .await
            .expect("exercise plan");
        assert_eq!(resolved.id, exercise.id);
    }

    #[tokio::test]
    async fn foreign_and_missing_rows_look_identical() {
        let (_dir, db) = open_temp_db().await;
        let owner_row = seed_user(&db, "owner@example.com").await;
        let intruder = seed_user(&db, "intruder@example.com").await;
        let workout = seed_workout_plan(&db, owner_row.id).await;
        let exercise = seed_exercise_plan(&db, workout.id, 1).await;

        let key = ExercisePlanKey {
            workout_plan_id: workout.id,
            exercise_plan_id: exercise.id,
        };
        let foreign = resolve_exercise_plan(&db, Owner { user_id: intruder.id }, key)
            .await
            .expect_err("foreign");
        let missing_key = ExercisePlanKey {
            exercise_plan_id: exercise.id + 100,
            ..key
        };
        let missing = resolve_exercise_plan(&db, Owner { user_id: owner_row.id }, missing_key)
            .await
            .expect_err("missing");

        assert!(matches!(foreign, AppError::NotFound(_)));
        assert!(matches!(missing, AppError::NotFound(_)));
        assert_eq!(
            foreign.to_string(),
            format!("Not found: exercise plan id {}", exercise.id)
        );
    }

    #[tokio::test]
    async fn set_plan_under_wrong_exercise_is_not_found() {
        let (_dir, db) = open_temp_db().await;
        let user = seed_user(&db, "owner@example.com").await;
        let workout = seed_workout_plan(&db, user.id).await;
        let first = seed_exercise_plan(&db, workout.id, 1).await;
        let second = seed_exercise_plan(&db, workout.id, 2).await;
        let set = seed_set_plan(&db, first.id, 1).await;

        let err = resolve_set_plan(
            &db,
            Owner { user_id: user.id },
            SetPlanKey {
                workout_plan_id: workout.id,
                exercise_plan_id: second.id,
                set_plan_id: set.id,
            },
        )
        .await
        .expect_err("wrong parent");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
