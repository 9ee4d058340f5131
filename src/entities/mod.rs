pub mod exercise_plan;
pub mod set_plan;
pub mod user;
pub mod workout_plan;
