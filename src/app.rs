use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::debug;

use crate::db::finalize_transaction;
use crate::entities::{exercise_plan, set_plan, user, workout_plan};
use crate::error::AppError;
use crate::model::{
    ExercisePlanDraft, ExerciseSpec, SetPlanDraft, UserInput, WorkoutPlanChanges,
    WorkoutPlanInput,
};
use crate::ordering::{
    ExercisePlanDetail, ExercisePlanScope, OrderedCollection, SetPlanScope, SiblingScope,
};
use crate::ownership::{resolve_workout_plan, Owner, WorkoutPlanKey};
use crate::repair::RepairQueue;

pub struct App {
    db: DatabaseConnection,
    exercises: OrderedCollection<ExercisePlanScope>,
    sets: OrderedCollection<SetPlanScope>,
}

#[derive(Clone, Debug, Serialize)]
pub struct WorkoutPlanDetail {
    pub workout_plan: workout_plan::Model,
    pub exercise_plans: Vec<ExercisePlanDetail>,
}

#[derive(Clone, Debug, Serialize)]
pub struct WorkoutTreeSummary {
    pub workout_plan: workout_plan::Model,
    pub exercise_plans: usize,
    pub set_plans: usize,
}

impl App {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            exercises: OrderedCollection::new(db.clone()),
            sets: OrderedCollection::new(db.clone()),
            db,
        }
    }

    pub fn with_repairs(self, queue: RepairQueue, delay: Duration) -> Self {
        Self {
            exercises: self.exercises.with_repairs(queue.clone(), delay),
            sets: self.sets.with_repairs(queue, delay),
            db: self.db,
        }
    }

    pub fn exercises(&self) -> &OrderedCollection<ExercisePlanScope> {
        &self.exercises
    }

    pub fn sets(&self) -> &OrderedCollection<SetPlanScope> {
        &self.sets
    }

    pub async fn add_user(&self, input: UserInput) -> Result<user::Model, AppError> {
        ensure_non_empty("full name", &input.full_name)?;
        ensure_non_empty("email", &input.email)?;
        let email = input.email.trim().to_string();
        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AppError::InvalidInput(format!(
                "email already registered: {email}"
            )));
        }

        let created = user::ActiveModel {
            full_name: Set(input.full_name.trim().to_string()),
            email: Set(email),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        debug!(user_id = created.id, "added user");
        Ok(created)
    }

    pub async fn add_workout_plan(
        &self,
        owner: Owner,
        input: WorkoutPlanInput,
    ) -> Result<workout_plan::Model, AppError> {
        ensure_non_empty("workout plan title", &input.title)?;
        ensure_user(&self.db, owner).await?;
        insert_workout_plan(&self.db, owner, input).await
    }

    /// Creates a workout plan with its exercise plans and set plans in one
    /// transaction. Ordinals follow the order of `exercises` and their sets.
    pub async fn add_workout_tree(
        &self,
        owner: Owner,
        input: WorkoutPlanInput,
        exercises: Vec<ExerciseSpec>,
    ) -> Result<WorkoutTreeSummary, AppError> {
        ensure_non_empty("workout plan title", &input.title)?;
        let mut drafts = Vec::with_capacity(exercises.len());
        for (idx, spec) in exercises.into_iter().enumerate() {
            let draft = ExercisePlanDraft {
                exercise_id: spec.exercise_id,
                order_in_plan: Some(idx as i32 + 1),
                target_sets: spec.target_sets,
                target_duration_minutes: None,
                notes: None,
            };
            draft.validate()?;
            let sets = spec
                .sets
                .iter()
                .enumerate()
                .map(|(set_idx, set)| SetPlanDraft {
                    set_number: Some(set_idx as i32 + 1),
                    target_reps: set.target_reps,
                    target_weight: set.target_weight,
                    target_duration_seconds: None,
                })
                .collect::<Vec<_>>();
            for set in &sets {
                set.validate()?;
            }
            drafts.push((draft, sets));
        }

        let txn = self.db.begin().await?;
        let result: Result<WorkoutTreeSummary, AppError> = async {
            ensure_user(&txn, owner).await?;
            let workout = insert_workout_plan(&txn, owner, input).await?;

            let mut exercise_count = 0usize;
            let mut set_count = 0usize;
            for (draft, sets) in drafts {
                let ordinal = draft.order_in_plan.unwrap_or(exercise_count as i32 + 1);
                let exercise =
                    ExercisePlanScope::insert(&txn, workout.id, draft, ordinal).await?;
                exercise_count += 1;
                for set in sets {
                    let set_number = set.set_number.unwrap_or(1);
                    SetPlanScope::insert(&txn, exercise.id, set, set_number).await?;
                    set_count += 1;
                }
            }

            Ok(WorkoutTreeSummary {
                workout_plan: workout,
                exercise_plans: exercise_count,
                set_plans: set_count,
            })
        }
        .await;

        finalize_transaction(txn, result).await
    }

    pub async fn list_workout_plans(
        &self,
        owner: Owner,
    ) -> Result<Vec<workout_plan::Model>, AppError> {
        Ok(workout_plan::Entity::find()
            .filter(workout_plan::Column::UserId.eq(owner.user_id))
            .order_by_asc(workout_plan::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_workout_detail(
        &self,
        owner: Owner,
        key: WorkoutPlanKey,
    ) -> Result<WorkoutPlanDetail, AppError> {
        let workout = resolve_workout_plan(&self.db, owner, key).await?;
        let exercises = exercise_plan::Entity::find()
            .filter(exercise_plan::Column::WorkoutPlanId.eq(workout.id))
            .order_by_asc(exercise_plan::Column::OrderInPlan)
            .order_by_asc(exercise_plan::Column::Id)
            .all(&self.db)
            .await?;
        let exercise_ids: Vec<i64> = exercises.iter().map(|exercise| exercise.id).collect();
        let mut sets = self.sets_for_exercises(&exercise_ids).await?;
        let exercise_plans = exercises
            .into_iter()
            .map(|exercise| ExercisePlanDetail {
                set_plans: sets.remove(&exercise.id).unwrap_or_default(),
                exercise_plan: exercise,
            })
            .collect();
        Ok(WorkoutPlanDetail {
            workout_plan: workout,
            exercise_plans,
        })
    }

    async fn sets_for_exercises(
        &self,
        exercise_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<set_plan::Model>>, AppError> {
        if exercise_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sets = set_plan::Entity::find()
            .filter(set_plan::Column::ExercisePlanId.is_in(exercise_ids.to_vec()))
            .order_by_asc(set_plan::Column::ExercisePlanId)
            .order_by_asc(set_plan::Column::SetNumber)
            .order_by_asc(set_plan::Column::Id)
            .all(&self.db)
            .await?;
        let mut grouped: HashMap<i64, Vec<set_plan::Model>> = HashMap::new();
        for set in sets {
            grouped.entry(set.exercise_plan_id).or_default().push(set);
        }
        Ok(grouped)
    }

    pub async fn update_workout_plan(
        &self,
        owner: Owner,
        key: WorkoutPlanKey,
        changes: WorkoutPlanChanges,
    ) -> Result<workout_plan::Model, AppError> {
        if let Some(title) = changes.title.as_deref() {
            ensure_non_empty("workout plan title", title)?;
        }
        let current = resolve_workout_plan(&self.db, owner, key).await?;
        let id = current.id;
        let mut active: workout_plan::ActiveModel = current.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(comments) = changes.comments {
            active.comments = Set(Some(comments));
        }
        active.updated_at = Set(Utc::now());

        match active.update(&self.db).await {
            Ok(model) => Ok(model),
            Err(sea_orm::DbErr::RecordNotFound(_)) | Err(sea_orm::DbErr::RecordNotUpdated) => {
                Err(AppError::NotFound(format!("workout plan id {id}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Removes the workout plan together with its exercise plans and their sets.
    pub async fn delete_workout_plan(
        &self,
        owner: Owner,
        key: WorkoutPlanKey,
    ) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        let result: Result<(), AppError> = async {
            let workout = resolve_workout_plan(&txn, owner, key).await?;
            let exercise_ids: Vec<i64> = exercise_plan::Entity::find()
                .filter(exercise_plan::Column::WorkoutPlanId.eq(workout.id))
                .all(&txn)
                .await?
                .into_iter()
                .map(|exercise| exercise.id)
                .collect();
            if !exercise_ids.is_empty() {
                set_plan::Entity::delete_many()
                    .filter(set_plan::Column::ExercisePlanId.is_in(exercise_ids))
                    .exec(&txn)
                    .await?;
                exercise_plan::Entity::delete_many()
                    .filter(exercise_plan::Column::WorkoutPlanId.eq(workout.id))
                    .exec(&txn)
                    .await?;
            }
            let result = workout_plan::Entity::delete_by_id(workout.id)
                .exec(&txn)
                .await?;
            if result.rows_affected == 0 {
                return Err(AppError::NotFound(format!("workout plan id {}", workout.id)));
            }
            Ok(())
        }
        .await;

        finalize_transaction(txn, result).await
    }
}

async fn ensure_user<C: ConnectionTrait>(db: &C, owner: Owner) -> Result<(), AppError> {
    user::Entity::find_by_id(owner.user_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("user id {}", owner.user_id)))
}

async fn insert_workout_plan<C: ConnectionTrait>(
    db: &C,
    owner: Owner,
    input: WorkoutPlanInput,
) -> Result<workout_plan::Model, AppError> {
    let now = Utc::now();
    let active = workout_plan::ActiveModel {
        user_id: Set(owner.user_id),
        title: Set(input.title),
        description: Set(input.description),
        comments: Set(input.comments),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let insert = workout_plan::Entity::insert(active).exec(db).await?;
    workout_plan::Entity::find_by_id(insert.last_insert_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("workout plan not found after insert".to_string()))
}

fn ensure_non_empty(label: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{label} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::open_temp_db;
    use crate::model::{ExercisePlanChanges, SetSpec};
    use crate::ownership::ExercisePlanKey;
    use sea_orm::PaginatorTrait;
    use tempfile::TempDir;

    async fn setup_app() -> (TempDir, App, Owner) {
        let (dir, db) = open_temp_db().await;
        let app = App::new(db);
        let user = app
            .add_user(UserInput {
                full_name: "Ada Lift".to_string(),
                email: "ada@example.com".to_string(),
            })
            .await
            .expect("add user");
        (dir, app, Owner { user_id: user.id })
    }

    fn workout_input(title: &str) -> WorkoutPlanInput {
        WorkoutPlanInput {
            title: title.to_string(),
            description: None,
            comments: None,
        }
    }

    fn exercise_spec(exercise_id: i64, reps: &[i32]) -> ExerciseSpec {
        ExerciseSpec {
            exercise_id,
            target_sets: reps.len().max(1) as i32,
            sets: reps
                .iter()
                .map(|&target_reps| SetSpec {
                    target_reps,
                    target_weight: 20.0,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_dir, app, _owner) = setup_app().await;
        let err = app
            .add_user(UserInput {
                full_name: "Other".to_string(),
                email: "ada@example.com".to_string(),
            })
            .await
            .expect_err("duplicate");
        assert!(err.to_string().contains("email already registered"));
    }

    #[tokio::test]
    async fn workout_plan_requires_existing_user() {
        let (_dir, app, owner) = setup_app().await;
        let err = app
            .add_workout_plan(
                Owner {
                    user_id: owner.user_id + 10,
                },
                workout_input("Legs"),
            )
            .await
            .expect_err("missing user");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let (_dir, app, owner) = setup_app().await;
        let err = app
            .add_workout_plan(owner, workout_input("   "))
            .await
            .expect_err("blank");
        assert_eq!(
            err.to_string(),
            "Invalid input: workout plan title cannot be empty"
        );
    }

    #[tokio::test]
    async fn workout_tree_assigns_dense_ordinals() {
        let (_dir, app, owner) = setup_app().await;
        let summary = app
            .add_workout_tree(
                owner,
                workout_input("Full body"),
                vec![
                    exercise_spec(11, &[10, 8, 6]),
                    exercise_spec(12, &[]),
                    exercise_spec(13, &[15, 15]),
                ],
            )
            .await
            .expect("tree");
        assert_eq!(summary.exercise_plans, 3);
        assert_eq!(summary.set_plans, 5);

        let detail = app
            .get_workout_detail(
                owner,
                WorkoutPlanKey {
                    workout_plan_id: summary.workout_plan.id,
                },
            )
            .await
            .expect("detail");
        let orders: Vec<(i64, i32)> = detail
            .exercise_plans
            .iter()
            .map(|entry| (entry.exercise_plan.exercise_id, entry.exercise_plan.order_in_plan))
            .collect();
        assert_eq!(orders, vec![(11, 1), (12, 2), (13, 3)]);
        let first_sets: Vec<(i32, i32)> = detail.exercise_plans[0]
            .set_plans
            .iter()
            .map(|set| (set.set_number, set.target_reps))
            .collect();
        assert_eq!(first_sets, vec![(1, 10), (2, 8), (3, 6)]);
        assert!(detail.exercise_plans[1].set_plans.is_empty());
    }

    #[tokio::test]
    async fn invalid_tree_writes_nothing() {
        let (_dir, app, owner) = setup_app().await;
        let err = app
            .add_workout_tree(
                owner,
                workout_input("Broken"),
                vec![exercise_spec(1, &[5]), exercise_spec(2, &[0])],
            )
            .await
            .expect_err("zero reps");
        assert!(matches!(err, AppError::InvalidInput(_)));
        let count = workout_plan::Entity::find()
            .count(&app.db)
            .await
            .expect("count");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn update_workout_plan_changes_fields() {
        let (_dir, app, owner) = setup_app().await;
        let workout = app
            .add_workout_plan(owner, workout_input("Push"))
            .await
            .expect("add");
        let updated = app
            .update_workout_plan(
                owner,
                WorkoutPlanKey {
                    workout_plan_id: workout.id,
                },
                WorkoutPlanChanges {
                    title: Some("Push heavy".to_string()),
                    comments: Some("deload next week".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.title, "Push heavy");
        assert_eq!(updated.comments.as_deref(), Some("deload next week"));
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn delete_workout_plan_cascades() {
        let (_dir, app, owner) = setup_app().await;
        let summary = app
            .add_workout_tree(
                owner,
                workout_input("Pull"),
                vec![exercise_spec(21, &[8, 8]), exercise_spec(22, &[12])],
            )
            .await
            .expect("tree");
        let key = WorkoutPlanKey {
            workout_plan_id: summary.workout_plan.id,
        };

        app.delete_workout_plan(owner, key).await.expect("delete");

        let exercises = exercise_plan::Entity::find()
            .count(&app.db)
            .await
            .expect("count exercises");
        let sets = set_plan::Entity::find()
            .count(&app.db)
            .await
            .expect("count sets");
        assert_eq!((exercises, sets), (0, 0));
        let err = app
            .get_workout_detail(owner, key)
            .await
            .expect_err("gone");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn workout_plans_are_scoped_to_owner() {
        let (_dir, app, owner) = setup_app().await;
        let other = app
            .add_user(UserInput {
                full_name: "Bo".to_string(),
                email: "bo@example.com".to_string(),
            })
            .await
            .expect("add user");
        let other = Owner { user_id: other.id };
        let workout = app
            .add_workout_plan(owner, workout_input("Mine"))
            .await
            .expect("add");
        let key = WorkoutPlanKey {
            workout_plan_id: workout.id,
        };

        assert!(app.list_workout_plans(other).await.expect("list").is_empty());
        assert_eq!(app.list_workout_plans(owner).await.expect("list").len(), 1);
        assert!(matches!(
            app.get_workout_detail(other, key).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            app.delete_workout_plan(other, key).await,
            Err(AppError::NotFound(_))
        ));
        assert!(app.get_workout_detail(owner, key).await.is_ok());
    }

    #[tokio::test]
    async fn detail_reflects_moves_through_collections() {
        let (_dir, app, owner) = setup_app().await;
        let summary = app
            .add_workout_tree(
                owner,
                workout_input("Arms"),
                vec![
                    exercise_spec(31, &[10]),
                    exercise_spec(32, &[10]),
                    exercise_spec(33, &[10]),
                ],
            )
            .await
            .expect("tree");
        let key = WorkoutPlanKey {
            workout_plan_id: summary.workout_plan.id,
        };
        let detail = app.get_workout_detail(owner, key).await.expect("detail");
        let last = &detail.exercise_plans[2].exercise_plan;

        app.exercises()
            .update(
                owner,
                ExercisePlanKey {
                    workout_plan_id: key.workout_plan_id,
                    exercise_plan_id: last.id,
                },
                ExercisePlanChanges {
                    order_in_plan: Some(1),
                    ..Default::default()
                },
            )
            .await
            .expect("move");

        let detail = app.get_workout_detail(owner, key).await.expect("detail");
        let catalog_ids: Vec<i64> = detail
            .exercise_plans
            .iter()
            .map(|entry| entry.exercise_plan.exercise_id)
            .collect();
        assert_eq!(catalog_ids, vec![33, 31, 32]);
    }
}
