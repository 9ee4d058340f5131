use std::fmt::Debug;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::entities::{exercise_plan, set_plan};
use crate::error::AppError;
use crate::model::{ExercisePlanChanges, ExercisePlanDraft, SetPlanChanges, SetPlanDraft};
use crate::ownership::{
    resolve_exercise_plan, resolve_set_plan, resolve_workout_plan, ExercisePlanKey, Owner,
    SetPlanKey, WorkoutPlanKey,
};
use crate::repair::CollectionKind;

/// One kind of ordered sibling collection: which table holds the children,
/// which columns carry parent, ordinal and identity, and how a child is
/// resolved and persisted.
#[allow(async_fn_in_trait)]
pub trait SiblingScope: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: Clone + Debug + Send + Sync;
    type ParentKey: Copy + Debug + Send + Sync;
    type ChildKey: Copy + Debug + Send + Sync;
    type Draft: Send;
    type Changes: Send;
    type Detail: Serialize + Send;

    const KIND: CollectionKind;
    const LABEL: &'static str;
    const ORDINAL_FIELD: &'static str;

    fn parent_column() -> <Self::Entity as EntityTrait>::Column;
    fn ordinal_column() -> <Self::Entity as EntityTrait>::Column;
    fn id_column() -> <Self::Entity as EntityTrait>::Column;
    fn updated_at_column() -> <Self::Entity as EntityTrait>::Column;

    fn id(model: &Self::Model) -> i64;
    fn parent_id(model: &Self::Model) -> i64;
    fn ordinal(model: &Self::Model) -> i32;

    fn draft_ordinal(draft: &Self::Draft) -> Option<i32>;
    fn changed_ordinal(changes: &Self::Changes) -> Option<i32>;
    fn validate_draft(draft: &Self::Draft) -> Result<(), AppError>;
    fn validate_changes(changes: &Self::Changes) -> Result<(), AppError>;

    /// Confirms the parent belongs to `owner` and returns its id.
    async fn resolve_parent<C: ConnectionTrait>(
        db: &C,
        owner: Owner,
        key: Self::ParentKey,
    ) -> Result<i64, AppError>;

    async fn resolve_child<C: ConnectionTrait>(
        db: &C,
        owner: Owner,
        key: Self::ChildKey,
    ) -> Result<Self::Model, AppError>;

    async fn insert<C: ConnectionTrait>(
        db: &C,
        parent_id: i64,
        draft: Self::Draft,
        ordinal: i32,
    ) -> Result<Self::Model, AppError>;

    /// Writes the field changes and the final ordinal of `current`.
    async fn update<C: ConnectionTrait>(
        db: &C,
        current: Self::Model,
        changes: Self::Changes,
        ordinal: i32,
    ) -> Result<Self::Model, AppError>;

    async fn delete<C: ConnectionTrait>(db: &C, current: &Self::Model) -> Result<(), AppError>;

    async fn detail<C: ConnectionTrait>(
        db: &C,
        model: Self::Model,
    ) -> Result<Self::Detail, AppError>;
}

/// Exercise plans ordered by `order_in_plan` inside a workout plan.
pub struct ExercisePlanScope;

/// Set plans ordered by `set_number` inside an exercise plan.
pub struct SetPlanScope;

#[derive(Clone, Debug, Serialize)]
pub struct ExercisePlanDetail {
    pub exercise_plan: exercise_plan::Model,
    pub set_plans: Vec<set_plan::Model>,
}

impl SiblingScope for ExercisePlanScope {
    type Entity = exercise_plan::Entity;
    type Model = exercise_plan::Model;
    type ParentKey = WorkoutPlanKey;
    type ChildKey = ExercisePlanKey;
    type Draft = ExercisePlanDraft;
    type Changes = ExercisePlanChanges;
    type Detail = ExercisePlanDetail;

    const KIND: CollectionKind = CollectionKind::ExercisePlans;
    const LABEL: &'static str = "exercise plan";
    const ORDINAL_FIELD: &'static str = "order_in_plan";

    fn parent_column() -> exercise_plan::Column {
        exercise_plan::Column::WorkoutPlanId
    }

    fn ordinal_column() -> exercise_plan::Column {
        exercise_plan::Column::OrderInPlan
    }

    fn id_column() -> exercise_plan::Column {
        exercise_plan::Column::Id
    }

    fn updated_at_column() -> exercise_plan::Column {
        exercise_plan::Column::UpdatedAt
    }

    fn id(model: &exercise_plan::Model) -> i64 {
        model.id
    }

    fn parent_id(model: &exercise_plan::Model) -> i64 {
        model.workout_plan_id
    }

    fn ordinal(model: &exercise_plan::Model) -> i32 {
        model.order_in_plan
    }

    fn draft_ordinal(draft: &ExercisePlanDraft) -> Option<i32> {
        draft.order_in_plan
    }

    fn changed_ordinal(changes: &ExercisePlanChanges) -> Option<i32> {
        changes.order_in_plan
    }

    fn validate_draft(draft: &ExercisePlanDraft) -> Result<(), AppError> {
        draft.validate()
    }

    fn validate_changes(changes: &ExercisePlanChanges) -> Result<(), AppError> {
        changes.validate()
    }

    async fn resolve_parent<C: ConnectionTrait>(
        db: &C,
        owner: Owner,
        key: WorkoutPlanKey,
    ) -> Result<i64, AppError> {
        Ok(resolve_workout_plan(db, owner, key).await?.id)
    }

    async fn resolve_child<C: ConnectionTrait>(
        db: &C,
        owner: Owner,
        key: ExercisePlanKey,
    ) -> Result<exercise_plan::Model, AppError> {
        resolve_exercise_plan(db, owner, key).await
    }

    async fn insert<C: ConnectionTrait>(
        db: &C,
        parent_id: i64,
        draft: ExercisePlanDraft,
        ordinal: i32,
    ) -> Result<exercise_plan::Model, AppError> {
        let now = Utc::now();
        let active = exercise_plan::ActiveModel {
            workout_plan_id: Set(parent_id),
            exercise_id: Set(draft.exercise_id),
            order_in_plan: Set(ordinal),
            target_sets: Set(draft.target_sets),
            target_duration_minutes: Set(draft.target_duration_minutes),
            notes: Set(draft.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let insert = exercise_plan::Entity::insert(active).exec(db).await?;
        exercise_plan::Entity::find_by_id(insert.last_insert_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("exercise plan not found after insert".to_string()))
    }

    async fn update<C: ConnectionTrait>(
        db: &C,
        current: exercise_plan::Model,
        changes: ExercisePlanChanges,
        ordinal: i32,
    ) -> Result<exercise_plan::Model, AppError> {
        let id = current.id;
        let mut active: exercise_plan::ActiveModel = current.into();
        active.order_in_plan = Set(ordinal);
        if let Some(exercise_id) = changes.exercise_id {
            active.exercise_id = Set(exercise_id);
        }
        if let Some(target_sets) = changes.target_sets {
            active.target_sets = Set(target_sets);
        }
        if let Some(minutes) = changes.target_duration_minutes {
            active.target_duration_minutes = Set(Some(minutes));
        }
        if let Some(notes) = changes.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());

        match active.update(db).await {
            Ok(model) => Ok(model),
            Err(sea_orm::DbErr::RecordNotFound(_)) | Err(sea_orm::DbErr::RecordNotUpdated) => {
                Err(AppError::NotFound(format!("exercise plan id {id}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete<C: ConnectionTrait>(
        db: &C,
        current: &exercise_plan::Model,
    ) -> Result<(), AppError> {
        set_plan::Entity::delete_many()
            .filter(set_plan::Column::ExercisePlanId.eq(current.id))
            .exec(db)
            .await?;
        let result = exercise_plan::Entity::delete_by_id(current.id)
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "exercise plan id {}",
                current.id
            )));
        }
        Ok(())
    }

    async fn detail<C: ConnectionTrait>(
        db: &C,
        model: exercise_plan::Model,
    ) -> Result<ExercisePlanDetail, AppError> {
        let set_plans = set_plan::Entity::find()
            .filter(set_plan::Column::ExercisePlanId.eq(model.id))
            .order_by_asc(set_plan::Column::SetNumber)
            .order_by_asc(set_plan::Column::Id)
            .all(db)
            .await?;
        Ok(ExercisePlanDetail {
            exercise_plan: model,
            set_plans,
        })
    }
}

impl SiblingScope for SetPlanScope {
    type Entity = set_plan::Entity;
    type Model = set_plan::Model;
    type ParentKey = ExercisePlanKey;
    type ChildKey = SetPlanKey;
    type Draft = SetPlanDraft;
    type Changes = SetPlanChanges;
    type Detail = set_plan::Model;

    const KIND: CollectionKind = CollectionKind::SetPlans;
    const LABEL: &'static str = "set plan";
    const ORDINAL_FIELD: &'static str = "set_number";

    fn parent_column() -> set_plan::Column {
        set_plan::Column::ExercisePlanId
    }

    fn ordinal_column() -> set_plan::Column {
        set_plan::Column::SetNumber
    }

    fn id_column() -> set_plan::Column {
        set_plan::Column::Id
    }

    fn updated_at_column() -> set_plan::Column {
        set_plan::Column::UpdatedAt
    }

    fn id(model: &set_plan::Model) -> i64 {
        model.id
    }

    fn parent_id(model: &set_plan::Model) -> i64 {
        model.exercise_plan_id
    }

    fn ordinal(model: &set_plan::Model) -> i32 {
        model.set_number
    }

    fn draft_ordinal(draft: &SetPlanDraft) -> Option<i32> {
        draft.set_number
    }

    fn changed_ordinal(changes: &SetPlanChanges) -> Option<i32> {
        changes.set_number
    }

    fn validate_draft(draft: &SetPlanDraft) -> Result<(), AppError> {
        draft.validate()
    }

    fn validate_changes(changes: &SetPlanChanges) -> Result<(), AppError> {
        changes.validate()
    }

    async fn resolve_parent<C: ConnectionTrait>(
        db: &C,
        owner: Owner,
        key: ExercisePlanKey,
    ) -> Result<i64, AppError> {
        Ok(resolve_exercise_plan(db, owner, key).await?.id)
    }

    async fn resolve_child<C: ConnectionTrait>(
        db: &C,
        owner: Owner,
        key: SetPlanKey,
    ) -> Result<set_plan::Model, AppError> {
        resolve_set_plan(db, owner, key).await
    }

    async fn insert<C: ConnectionTrait>(
        db: &C,
        parent_id: i64,
        draft: SetPlanDraft,
        ordinal: i32,
    ) -> Result<set_plan::Model, AppError> {
        let now = Utc::now();
        let active = set_plan::ActiveModel {
            exercise_plan_id: Set(parent_id),
            set_number: Set(ordinal),
            target_reps: Set(draft.target_reps),
            target_weight: Set(draft.target_weight),
            target_duration_seconds: Set(draft.target_duration_seconds),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let insert = set_plan::Entity::insert(active).exec(db).await?;
        set_plan::Entity::find_by_id(insert.last_insert_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("set plan not found after insert".to_string()))
    }

    async fn update<C: ConnectionTrait>(
        db: &C,
        current: set_plan::Model,
        changes: SetPlanChanges,
        ordinal: i32,
    ) -> Result<set_plan::Model, AppError> {
        let id = current.id;
        let mut active: set_plan::ActiveModel = current.into();
        active.set_number = Set(ordinal);
        if let Some(reps) = changes.target_reps {
            active.target_reps = Set(reps);
        }
        if let Some(weight) = changes.target_weight {
            active.target_weight = Set(weight);
        }
        if let Some(seconds) = changes.target_duration_seconds {
            active.target_duration_seconds = Set(Some(seconds));
        }
        active.updated_at = Set(Utc::now());

        match active.update(db).await {
            Ok(model) => Ok(model),
            Err(sea_orm::DbErr::RecordNotFound(_)) | Err(sea_orm::DbErr::RecordNotUpdated) => {
                Err(AppError::NotFound(format!("set plan id {id}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete<C: ConnectionTrait>(db: &C, current: &set_plan::Model) -> Result<(), AppError> {
        let result = set_plan::Entity::delete_by_id(current.id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("set plan id {}", current.id)));
        }
        Ok(())
    }

    async fn detail<C: ConnectionTrait>(
        _db: &C,
        model: set_plan::Model,
    ) -> Result<set_plan::Model, AppError> {
        Ok(model)
    }
}
