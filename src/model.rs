use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserInput {
    pub full_name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutPlanInput {
    pub title: String,
    pub description: Option<String>,
    pub comments: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkoutPlanChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub comments: Option<String>,
}

/// Create payload for an exercise plan. `order_in_plan: None` appends.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExercisePlanDraft {
    pub exercise_id: i64,
    pub order_in_plan: Option<i32>,
    pub target_sets: i32,
    pub target_duration_minutes: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExercisePlanChanges {
    pub exercise_id: Option<i64>,
    pub order_in_plan: Option<i32>,
    pub target_sets: Option<i32>,
    pub target_duration_minutes: Option<f64>,
    pub notes: Option<String>,
}

/// Create payload for a set plan. `set_number: None` appends.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetPlanDraft {
    pub set_number: Option<i32>,
    pub target_reps: i32,
    pub target_weight: f64,
    pub target_duration_seconds: Option<i32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SetPlanChanges {
    pub set_number: Option<i32>,
    pub target_reps: Option<i32>,
    pub target_weight: Option<f64>,
    pub target_duration_seconds: Option<i32>,
}

/// One exercise of a workout tree; ordinals come from its position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSpec {
    pub exercise_id: i64,
    pub target_sets: i32,
    pub sets: Vec<SetSpec>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetSpec {
    pub target_reps: i32,
    pub target_weight: f64,
}

impl ExercisePlanDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        ensure_at_least("target_sets", self.target_sets, 1)?;
        if let Some(minutes) = self.target_duration_minutes {
            ensure_non_negative("target_duration_minutes", minutes)?;
        }
        Ok(())
    }
}

impl ExercisePlanChanges {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(target_sets) = self.target_sets {
            ensure_at_least("target_sets", target_sets, 1)?;
        }
        if let Some(minutes) = self.target_duration_minutes {
            ensure_non_negative("target_duration_minutes", minutes)?;
        }
        Ok(())
    }
}

impl SetPlanDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        ensure_at_least("target_reps", self.target_reps, 1)?;
        ensure_non_negative("target_weight", self.target_weight)?;
        if let Some(seconds) = self.target_duration_seconds {
            ensure_at_least("target_duration_seconds", seconds, 0)?;
        }
        Ok(())
    }
}

impl SetPlanChanges {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(reps) = self.target_reps {
            ensure_at_least("target_reps", reps, 1)?;
        }
        if let Some(weight) = self.target_weight {
            ensure_non_negative("target_weight", weight)?;
        }
        if let Some(seconds) = self.target_duration_seconds {
            ensure_at_least("target_duration_seconds", seconds, 0)?;
        }
        Ok(())
    }
}

fn ensure_at_least(label: &str, value: i32, min: i32) -> Result<(), AppError> {
    if value < min {
        return Err(AppError::InvalidInput(format!(
            "{label} must be at least {min}, got {value}"
        )));
    }
    Ok(())
}

fn ensure_non_negative(label: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "{label} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_draft_rejects_zero_reps() {
        let draft = SetPlanDraft {
            set_number: None,
            target_reps: 0,
            target_weight: 20.0,
            target_duration_seconds: None,
        };
        let err = draft.validate().expect_err("zero reps");
        assert!(err.to_string().contains("target_reps must be at least 1"));
    }

    #[test]
    fn set_changes_reject_nan_weight() {
        let changes = SetPlanChanges {
            target_weight: Some(f64::NAN),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn exercise_changes_without_fields_are_valid() {
        assert!(ExercisePlanChanges::default().validate().is_ok());
    }
}
