use std::fs;
use std::path::Path;

use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DatabaseTransaction, Schema,
    Statement,
};
use url::Url;

use crate::entities::{exercise_plan, set_plan, user, workout_plan};
use crate::error::AppError;

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub async fn connect(path: &Path) -> Result<DatabaseConnection, AppError> {
    let mut url = Url::from_file_path(path)
        .map_err(|_| AppError::InvalidInput(format!("invalid sqlite path: {}", path.display())))?;
    url.set_query(Some("mode=rwc"));
    let sqlite_url = url.as_str().replacen("file://", "sqlite://", 1);
    Ok(Database::connect(&sqlite_url).await?)
}

pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), AppError> {
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await?;

    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_stmt = schema.create_table_from_entity(user::Entity);
    user_stmt.if_not_exists();
    db.execute(builder.build(&user_stmt)).await?;

    let mut workout_stmt = schema.create_table_from_entity(workout_plan::Entity);
    workout_stmt.if_not_exists();
    db.execute(builder.build(&workout_stmt)).await?;

    let mut exercise_stmt = schema.create_table_from_entity(exercise_plan::Entity);
    exercise_stmt.if_not_exists();
    db.execute(builder.build(&exercise_stmt)).await?;

    let mut set_stmt = schema.create_table_from_entity(set_plan::Entity);
    set_stmt.if_not_exists();
    db.execute(builder.build(&set_stmt)).await?;

    let mut workout_index = Index::create()
        .name("idx_workout_plans_user")
        .table(workout_plan::Entity)
        .col(workout_plan::Column::UserId)
        .to_owned();
    workout_index.if_not_exists();
    db.execute(builder.build(&workout_index)).await?;

    // Ordinal indexes stay non-unique: drift has to be storable to be repairable.
    let mut exercise_index = Index::create()
        .name("idx_exercise_plans_workout_order")
        .table(exercise_plan::Entity)
        .col(exercise_plan::Column::WorkoutPlanId)
        .col(exercise_plan::Column::OrderInPlan)
        .to_owned();
    exercise_index.if_not_exists();
    db.execute(builder.build(&exercise_index)).await?;

    let mut set_index = Index::create()
        .name("idx_set_plans_exercise_number")
        .table(set_plan::Entity)
        .col(set_plan::Column::ExercisePlanId)
        .col(set_plan::Column::SetNumber)
        .to_owned();
    set_index.if_not_exists();
    db.execute(builder.build(&set_index)).await?;

    Ok(())
}

/// Commits the unit of work when `result` is `Ok`, rolls it back otherwise.
pub async fn finalize_transaction<T>(
    txn: DatabaseTransaction,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                return Err(rollback_err.into());
            }
            Err(err)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use sea_orm::DatabaseConnection;
    use tempfile::TempDir;

    pub async fn open_temp_db() -> (TempDir, DatabaseConnection) {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("liftplan.db");
        super::ensure_parent_dir(&db_path).expect("ensure parent");
        let db = super::connect(&db_path).await.expect("connect db");
        super::ensure_schema(&db).await.expect("ensure schema");
        (dir, db)
    }
}
