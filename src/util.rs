use chrono::{DateTime, Utc};

use crate::app::WorkoutPlanDetail;
use crate::entities::{exercise_plan, set_plan};
use crate::ordering::ExercisePlanDetail;

fn has_text(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{weight:.0}")
    } else {
        format!("{weight}")
    }
}

pub fn format_set_line(set: &set_plan::Model) -> String {
    let mut line = format!(
        "{}. {} x {} (set id {})",
        set.set_number,
        set.target_reps,
        format_weight(set.target_weight),
        set.id
    );
    if let Some(seconds) = set.target_duration_seconds {
        line.push_str(&format!(", {seconds}s"));
    }
    line
}

fn format_exercise_line(exercise: &exercise_plan::Model, set_count: usize) -> String {
    let mut line = format!(
        "{}. exercise {} (exercise plan id {}, sets {}/{})",
        exercise.order_in_plan, exercise.exercise_id, exercise.id, set_count, exercise.target_sets
    );
    if let Some(minutes) = exercise.target_duration_minutes {
        line.push_str(&format!(", {minutes} min"));
    }
    line
}

pub fn format_set_detail(set: &set_plan::Model) -> String {
    let mut output = String::new();
    output.push_str(&format!("Set Plan ID: {}\n", set.id));
    output.push_str(&format!("Exercise Plan ID: {}\n", set.exercise_plan_id));
    output.push_str(&format!("Set Number: {}\n", set.set_number));
    output.push_str(&format!("Target Reps: {}\n", set.target_reps));
    output.push_str(&format!(
        "Target Weight: {}\n",
        format_weight(set.target_weight)
    ));
    if let Some(seconds) = set.target_duration_seconds {
        output.push_str(&format!("Target Duration: {seconds}s\n"));
    }
    output.push_str(&format!("Created: {}\n", format_datetime(set.created_at)));
    output.push_str(&format!("Updated: {}\n", format_datetime(set.updated_at)));
    output.trim_end().to_string()
}

pub fn format_exercise_detail(detail: &ExercisePlanDetail) -> String {
    let exercise = &detail.exercise_plan;
    let mut output = String::new();
    output.push_str(&format!("Exercise Plan ID: {}\n", exercise.id));
    output.push_str(&format!("Workout Plan ID: {}\n", exercise.workout_plan_id));
    output.push_str(&format!("Exercise ID: {}\n", exercise.exercise_id));
    output.push_str(&format!("Order: {}\n", exercise.order_in_plan));
    output.push_str(&format!("Target Sets: {}\n", exercise.target_sets));
    if let Some(minutes) = exercise.target_duration_minutes {
        output.push_str(&format!("Target Duration: {minutes} min\n"));
    }
    if has_text(&exercise.notes) {
        output.push_str(&format!(
            "Notes: {}\n",
            exercise.notes.as_deref().unwrap_or("")
        ));
    }
    output.push_str(&format!(
        "Created: {}\n",
        format_datetime(exercise.created_at)
    ));
    output.push_str(&format!(
        "Updated: {}\n",
        format_datetime(exercise.updated_at)
    ));
    output.push('\n');
    if detail.set_plans.is_empty() {
        output.push_str("Sets: (none)");
        return output;
    }
    output.push_str("Sets:\n");
    for set in &detail.set_plans {
        output.push_str(&format!("- {}\n", format_set_line(set)));
    }
    output.trim_end().to_string()
}

pub fn format_workout_detail(detail: &WorkoutPlanDetail) -> String {
    let workout = &detail.workout_plan;
    let mut output = String::new();
    output.push_str(&format!("Workout Plan ID: {}\n", workout.id));
    output.push_str(&format!("Title: {}\n", workout.title));
    if has_text(&workout.description) {
        output.push_str(&format!(
            "Description: {}\n",
            workout.description.as_deref().unwrap_or("")
        ));
    }
    if has_text(&workout.comments) {
        output.push_str(&format!(
            "Comments: {}\n",
            workout.comments.as_deref().unwrap_or("")
        ));
    }
    output.push_str(&format!("Created: {}\n", format_datetime(workout.created_at)));
    output.push_str(&format!("Updated: {}\n", format_datetime(workout.updated_at)));
    output.push('\n');
    if detail.exercise_plans.is_empty() {
        output.push_str("Exercises: (none)");
        return output;
    }
    output.push_str("Exercises:\n");
    for entry in &detail.exercise_plans {
        output.push_str(&format!(
            "- {}\n",
            format_exercise_line(&entry.exercise_plan, entry.set_plans.len())
        ));
        if has_text(&entry.exercise_plan.notes) {
            output.push_str(&format!(
                "  Notes: {}\n",
                entry.exercise_plan.notes.as_deref().unwrap_or("")
            ));
        }
        for set in &entry.set_plans {
            output.push_str(&format!("  - {}\n", format_set_line(set)));
        }
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_row(set_number: i32, weight: f64, seconds: Option<i32>) -> set_plan::Model {
        let now = Utc::now();
        set_plan::Model {
            id: 40 + i64::from(set_number),
            exercise_plan_id: 4,
            set_number,
            target_reps: 5,
            target_weight: weight,
            target_duration_seconds: seconds,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn set_line_trims_whole_weights() {
        assert_eq!(format_set_line(&set_row(1, 100.0, None)), "1. 5 x 100 (set id 41)");
        assert_eq!(
            format_set_line(&set_row(2, 22.5, Some(45))),
            "2. 5 x 22.5 (set id 42), 45s"
        );
    }
}
