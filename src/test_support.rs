//! Raw row seeding for tests. Ordinals are written as given, so callers can
//! stage drift that the services would never produce.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::entities::{exercise_plan, set_plan, user, workout_plan};

pub async fn seed_user(db: &DatabaseConnection, email: &str) -> user::Model {
    user::ActiveModel {
        full_name: Set("Test Lifter".to_string()),
        email: Set(email.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed user")
}

pub async fn seed_workout_plan(db: &DatabaseConnection, user_id: i64) -> workout_plan::Model {
    let now = Utc::now();
    workout_plan::ActiveModel {
        user_id: Set(user_id),
        title: Set("Push day".to_string()),
        description: Set(None),
        comments: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed workout plan")
}

pub async fn seed_exercise_plan(
    db: &DatabaseConnection,
    workout_plan_id: i64,
    order_in_plan: i32,
) -> exercise_plan::Model {
    let now = Utc::now();
    exercise_plan::ActiveModel {
        workout_plan_id: Set(workout_plan_id),
        exercise_id: Set(100 + i64::from(order_in_plan)),
        order_in_plan: Set(order_in_plan),
        target_sets: Set(3),
        target_duration_minutes: Set(None),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed exercise plan")
}

pub async fn seed_set_plan(
    db: &DatabaseConnection,
    exercise_plan_id: i64,
    set_number: i32,
) -> set_plan::Model {
    let now = Utc::now();
    set_plan::ActiveModel {
        exercise_plan_id: Set(exercise_plan_id),
        set_number: Set(set_number),
        target_reps: Set(8),
        target_weight: Set(40.0),
        target_duration_seconds: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed set plan")
}
