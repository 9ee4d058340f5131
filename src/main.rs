mod app;
mod cli;
mod config;
mod db;
mod entities;
mod error;
mod model;
mod ordering;
mod ownership;
mod repair;
#[cfg(test)]
mod test_support;
mod util;

use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::{
    Cli, Command, ExerciseAdd, ExerciseCommand, ExerciseList, ExerciseMove, ExerciseShow,
    ExerciseTreeSpec, ExerciseUpdate, RepairCommand, SetAdd, SetCommand, SetMove, SetShow,
    SetUpdate, UserAdd, UserCommand, WorkoutAdd, WorkoutAddTree, WorkoutCommand, WorkoutRemove,
    WorkoutShow, WorkoutUpdate,
};
use crate::config::Config;
use crate::entities::{exercise_plan, set_plan, workout_plan};
use crate::error::AppError;
use crate::model::{
    ExercisePlanChanges, ExercisePlanDraft, ExerciseSpec, SetPlanChanges, SetPlanDraft, SetSpec,
    UserInput, WorkoutPlanChanges, WorkoutPlanInput,
};
use crate::ownership::{ExercisePlanKey, Owner, SetPlanKey, WorkoutPlanKey};
use crate::repair::RepairWorker;
use crate::util::{
    format_exercise_detail, format_set_detail, format_weight, format_workout_detail,
};

const DEFAULT_TARGET_SETS: i32 = 3;
const FALLBACK_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let Cli {
        home,
        user_id,
        json,
        command,
    } = Cli::parse();

    let config = Config::load(home)?;
    init_tracing(&config.log_filter);

    db::ensure_parent_dir(&config.db_path)?;
    let db = db::connect(&config.db_path).await?;
    db::ensure_schema(&db).await?;

    let (app, worker) = if config.repair.enabled {
        let (queue, worker) = RepairWorker::spawn(db.clone());
        let delay = Duration::from_millis(config.repair.delay_ms);
        (App::new(db).with_repairs(queue, delay), Some(worker))
    } else {
        (App::new(db), None)
    };

    let ctx = Context {
        user_id,
        output: Output { json },
    };
    let result = match command {
        Command::User(command) => handle_user(&app, ctx, command).await,
        Command::Workout(command) => handle_workout(&app, ctx, command).await,
        Command::Exercise(command) => handle_exercise(&app, ctx, command).await,
        Command::Set(command) => handle_set(&app, ctx, command).await,
        Command::Repair(command) => handle_repair(&app, ctx, command).await,
    };

    // Queue handles live inside `app`; dropping it lets the worker drain.
    drop(app);
    if let Some(worker) = worker {
        worker.shutdown().await;
    }
    result
}

fn init_tracing(filter: &str) {
    let (env_filter, rejected) = match EnvFilter::try_new(filter) {
        Ok(env_filter) => (env_filter, None),
        Err(err) => (EnvFilter::new(FALLBACK_LOG_FILTER), Some(err)),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Some(err) = rejected {
        warn!(filter, error = %err, "invalid log filter; using default");
    }
}

#[derive(Clone, Copy)]
struct Context {
    user_id: Option<i64>,
    output: Output,
}

impl Context {
    fn owner(&self) -> Result<Owner, AppError> {
        self.user_id
            .map(|user_id| Owner { user_id })
            .ok_or_else(|| {
                AppError::InvalidInput("--user-id is required for this command".to_string())
            })
    }
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<(), AppError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

async fn handle_user(app: &App, ctx: Context, command: UserCommand) -> Result<(), AppError> {
    match command {
        UserCommand::Add(args) => handle_user_add(app, ctx, args).await,
    }
}

async fn handle_workout(app: &App, ctx: Context, command: WorkoutCommand) -> Result<(), AppError> {
    let owner = ctx.owner()?;
    match command {
        WorkoutCommand::Add(args) => handle_workout_add(app, ctx, owner, args).await,
        WorkoutCommand::AddTree(args) => handle_workout_add_tree(app, ctx, owner, args).await,
        WorkoutCommand::List(_) => handle_workout_list(app, ctx, owner).await,
        WorkoutCommand::Show(args) => handle_workout_show(app, ctx, owner, args).await,
        WorkoutCommand::Update(args) => handle_workout_update(app, ctx, owner, args).await,
        WorkoutCommand::Remove(args) => handle_workout_remove(app, ctx, owner, args).await,
    }
}

async fn handle_exercise(
    app: &App,
    ctx: Context,
    command: ExerciseCommand,
) -> Result<(), AppError> {
    let owner = ctx.owner()?;
    match command {
        ExerciseCommand::Add(args) => handle_exercise_add(app, ctx, owner, args).await,
        ExerciseCommand::List(args) => handle_exercise_list(app, ctx, owner, args).await,
        ExerciseCommand::Show(args) => handle_exercise_show(app, ctx, owner, args).await,
        ExerciseCommand::Update(args) => handle_exercise_update(app, ctx, owner, args).await,
        ExerciseCommand::Move(args) => handle_exercise_move(app, ctx, owner, args).await,
        ExerciseCommand::Remove(args) => handle_exercise_remove(app, ctx, owner, args).await,
    }
}

async fn handle_set(app: &App, ctx: Context, command: SetCommand) -> Result<(), AppError> {
    let owner = ctx.owner()?;
    match command {
        SetCommand::Add(args) => handle_set_add(app, ctx, owner, args).await,
        SetCommand::List(args) => handle_set_list(app, ctx, owner, args).await,
        SetCommand::Show(args) => handle_set_show(app, ctx, owner, args).await,
        SetCommand::Update(args) => handle_set_update(app, ctx, owner, args).await,
        SetCommand::Move(args) => handle_set_move(app, ctx, owner, args).await,
        SetCommand::Remove(args) => handle_set_remove(app, ctx, owner, args).await,
    }
}

async fn handle_repair(app: &App, ctx: Context, command: RepairCommand) -> Result<(), AppError> {
    let owner = ctx.owner()?;
    match command {
        RepairCommand::Exercises(args) => {
            let key = workout_key(args.workout_id);
            let rewritten = app.exercises().repair(owner, key).await?;
            ctx.output.emit(
                &json!({ "workout_plan_id": key.workout_plan_id, "rewritten": rewritten }),
                || {
                    format!(
                        "Repaired exercise plans for workout plan ID: {} (rewritten: {rewritten})",
                        key.workout_plan_id
                    )
                },
            )
        }
        RepairCommand::Sets(args) => {
            let key = exercise_key(&args);
            let rewritten = app.sets().repair(owner, key).await?;
            ctx.output.emit(
                &json!({ "exercise_plan_id": key.exercise_plan_id, "rewritten": rewritten }),
                || {
                    format!(
                        "Repaired set plans for exercise plan ID: {} (rewritten: {rewritten})",
                        key.exercise_plan_id
                    )
                },
            )
        }
    }
}

async fn handle_user_add(app: &App, ctx: Context, args: UserAdd) -> Result<(), AppError> {
    let user = app
        .add_user(UserInput {
            full_name: args.full_name,
            email: args.email,
        })
        .await?;
    ctx.output
        .emit(&user, || format!("Created user ID: {}: {}", user.id, user.email))
}

async fn handle_workout_add(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: WorkoutAdd,
) -> Result<(), AppError> {
    let workout = app
        .add_workout_plan(
            owner,
            WorkoutPlanInput {
                title: args.title,
                description: args.description,
                comments: args.comments,
            },
        )
        .await?;
    ctx.output.emit(&workout, || {
        format!("Created workout plan ID: {}: {}", workout.id, workout.title)
    })
}

async fn handle_workout_add_tree(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: WorkoutAddTree,
) -> Result<(), AppError> {
    let specs = parse_workout_tree_exercises(&args.args)?;
    let exercises = specs.into_iter().map(exercise_spec_from_tree).collect();
    let summary = app
        .add_workout_tree(
            owner,
            WorkoutPlanInput {
                title: args.title,
                description: args.description,
                comments: None,
            },
            exercises,
        )
        .await?;
    ctx.output.emit(&summary, || {
        format!(
            "Created workout plan ID: {}: {} (exercises: {}, sets: {})",
            summary.workout_plan.id,
            summary.workout_plan.title,
            summary.exercise_plans,
            summary.set_plans
        )
    })
}

async fn handle_workout_list(app: &App, ctx: Context, owner: Owner) -> Result<(), AppError> {
    let plans = app.list_workout_plans(owner).await?;
    if ctx.output.json {
        return ctx.output.emit(&plans, String::new);
    }
    if plans.is_empty() {
        println!("No workout plans found.");
        return Ok(());
    }
    print_workout_list(&plans);
    Ok(())
}

async fn handle_workout_show(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: WorkoutShow,
) -> Result<(), AppError> {
    let detail = app
        .get_workout_detail(owner, workout_key(args.workout_id))
        .await?;
    ctx.output.emit(&detail, || format_workout_detail(&detail))
}

async fn handle_workout_update(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: WorkoutUpdate,
) -> Result<(), AppError> {
    if args.title.is_none() && args.description.is_none() && args.comments.is_none() {
        return Err(AppError::InvalidInput("no changes provided".to_string()));
    }
    let workout = app
        .update_workout_plan(
            owner,
            workout_key(args.workout_id),
            WorkoutPlanChanges {
                title: args.title,
                description: args.description,
                comments: args.comments,
            },
        )
        .await?;
    ctx.output
        .emit(&workout, || format!("Updated workout plan ID: {}.", workout.id))
}

async fn handle_workout_remove(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: WorkoutRemove,
) -> Result<(), AppError> {
    app.delete_workout_plan(owner, workout_key(args.workout_id))
        .await?;
    ctx.output.emit(&json!({ "removed": args.workout_id }), || {
        format!("Workout plan ID: {} removed.", args.workout_id)
    })
}

async fn handle_exercise_add(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: ExerciseAdd,
) -> Result<(), AppError> {
    let detail = app
        .exercises()
        .add(
            owner,
            workout_key(args.workout_id),
            ExercisePlanDraft {
                exercise_id: args.exercise_id,
                order_in_plan: args.at,
                target_sets: args.sets,
                target_duration_minutes: args.minutes,
                notes: args.notes,
            },
        )
        .await?;
    let exercise = &detail.exercise_plan;
    ctx.output.emit(&detail, || {
        format!(
            "Created exercise plan ID: {} at position {} in workout plan ID: {}",
            exercise.id, exercise.order_in_plan, exercise.workout_plan_id
        )
    })
}

async fn handle_exercise_list(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: ExerciseList,
) -> Result<(), AppError> {
    let exercises = app
        .exercises()
        .list(owner, workout_key(args.workout_id))
        .await?;
    if ctx.output.json {
        return ctx.output.emit(&exercises, String::new);
    }
    if exercises.is_empty() {
        println!("No exercise plans found.");
        return Ok(());
    }
    print_exercise_list(&exercises);
    Ok(())
}

async fn handle_exercise_show(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: ExerciseShow,
) -> Result<(), AppError> {
    let detail = app.exercises().get(owner, exercise_key(&args)).await?;
    ctx.output.emit(&detail, || format_exercise_detail(&detail))
}

async fn handle_exercise_update(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: ExerciseUpdate,
) -> Result<(), AppError> {
    let key = ExercisePlanKey {
        workout_plan_id: args.workout_id,
        exercise_plan_id: args.exercise_plan_id,
    };
    let changes = ExercisePlanChanges {
        exercise_id: args.exercise_id,
        order_in_plan: args.to,
        target_sets: args.sets,
        target_duration_minutes: args.minutes,
        notes: args.notes,
    };
    if changes.exercise_id.is_none()
        && changes.order_in_plan.is_none()
        && changes.target_sets.is_none()
        && changes.target_duration_minutes.is_none()
        && changes.notes.is_none()
    {
        return Err(AppError::InvalidInput("no changes provided".to_string()));
    }
    let detail = app.exercises().update(owner, key, changes).await?;
    let exercise = &detail.exercise_plan;
    ctx.output.emit(&detail, || {
        format!(
            "Updated exercise plan ID: {} (position {}).",
            exercise.id, exercise.order_in_plan
        )
    })
}

async fn handle_exercise_move(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: ExerciseMove,
) -> Result<(), AppError> {
    let key = ExercisePlanKey {
        workout_plan_id: args.workout_id,
        exercise_plan_id: args.exercise_plan_id,
    };
    app.exercises()
        .update(
            owner,
            key,
            ExercisePlanChanges {
                order_in_plan: Some(args.to),
                ..Default::default()
            },
        )
        .await?;
    let exercises = app.exercises().list(owner, key.parent()).await?;
    if ctx.output.json {
        return ctx.output.emit(&exercises, String::new);
    }
    println!(
        "Reordered exercise plans for workout plan ID: {}:",
        key.workout_plan_id
    );
    print_exercise_list(&exercises);
    Ok(())
}

async fn handle_exercise_remove(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: ExerciseShow,
) -> Result<(), AppError> {
    let deleted = app.exercises().delete(owner, exercise_key(&args)).await?;
    ctx.output.emit(&deleted, || {
        format!("Exercise plan ID: {} removed.", deleted.id)
    })
}

async fn handle_set_add(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: SetAdd,
) -> Result<(), AppError> {
    let set = app
        .sets()
        .add(
            owner,
            ExercisePlanKey {
                workout_plan_id: args.workout_id,
                exercise_plan_id: args.exercise_plan_id,
            },
            SetPlanDraft {
                set_number: args.at,
                target_reps: args.reps,
                target_weight: args.weight,
                target_duration_seconds: args.seconds,
            },
        )
        .await?;
    ctx.output.emit(&set, || {
        format!(
            "Created set plan ID: {} as set {} for exercise plan ID: {}",
            set.id, set.set_number, set.exercise_plan_id
        )
    })
}

async fn handle_set_list(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: ExerciseShow,
) -> Result<(), AppError> {
    let sets = app.sets().list(owner, exercise_key(&args)).await?;
    if ctx.output.json {
        return ctx.output.emit(&sets, String::new);
    }
    if sets.is_empty() {
        println!("No set plans found.");
        return Ok(());
    }
    print_set_list(&sets);
    Ok(())
}

async fn handle_set_show(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: SetShow,
) -> Result<(), AppError> {
    let set = app.sets().get(owner, set_key(&args)).await?;
    ctx.output.emit(&set, || format_set_detail(&set))
}

async fn handle_set_update(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: SetUpdate,
) -> Result<(), AppError> {
    let key = SetPlanKey {
        workout_plan_id: args.workout_id,
        exercise_plan_id: args.exercise_plan_id,
        set_plan_id: args.set_plan_id,
    };
    let changes = SetPlanChanges {
        set_number: args.to,
        target_reps: args.reps,
        target_weight: args.weight,
        target_duration_seconds: args.seconds,
    };
    if changes.set_number.is_none()
        && changes.target_reps.is_none()
        && changes.target_weight.is_none()
        && changes.target_duration_seconds.is_none()
    {
        return Err(AppError::InvalidInput("no changes provided".to_string()));
    }
    let set = app.sets().update(owner, key, changes).await?;
    ctx.output.emit(&set, || {
        format!("Updated set plan ID: {} (set {}).", set.id, set.set_number)
    })
}

async fn handle_set_move(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: SetMove,
) -> Result<(), AppError> {
    let key = SetPlanKey {
        workout_plan_id: args.workout_id,
        exercise_plan_id: args.exercise_plan_id,
        set_plan_id: args.set_plan_id,
    };
    app.sets()
        .update(
            owner,
            key,
            SetPlanChanges {
                set_number: Some(args.to),
                ..Default::default()
            },
        )
        .await?;
    let sets = app.sets().list(owner, key.parent()).await?;
    if ctx.output.json {
        return ctx.output.emit(&sets, String::new);
    }
    println!(
        "Reordered set plans for exercise plan ID: {}:",
        key.exercise_plan_id
    );
    print_set_list(&sets);
    Ok(())
}

async fn handle_set_remove(
    app: &App,
    ctx: Context,
    owner: Owner,
    args: SetShow,
) -> Result<(), AppError> {
    let deleted = app.sets().delete(owner, set_key(&args)).await?;
    ctx.output
        .emit(&deleted, || format!("Set plan ID: {} removed.", deleted.id))
}

fn workout_key(workout_plan_id: i64) -> WorkoutPlanKey {
    WorkoutPlanKey { workout_plan_id }
}

fn exercise_key(args: &ExerciseShow) -> ExercisePlanKey {
    ExercisePlanKey {
        workout_plan_id: args.workout_id,
        exercise_plan_id: args.exercise_plan_id,
    }
}

fn set_key(args: &SetShow) -> SetPlanKey {
    SetPlanKey {
        workout_plan_id: args.workout_id,
        exercise_plan_id: args.exercise_plan_id,
        set_plan_id: args.set_plan_id,
    }
}

fn exercise_spec_from_tree(spec: ExerciseTreeSpec) -> ExerciseSpec {
    let target_sets = spec.target_sets.unwrap_or(if spec.sets.is_empty() {
        DEFAULT_TARGET_SETS
    } else {
        spec.sets.len() as i32
    });
    ExerciseSpec {
        exercise_id: spec.exercise_id,
        target_sets,
        sets: spec
            .sets
            .into_iter()
            .map(|(target_reps, target_weight)| SetSpec {
                target_reps,
                target_weight,
            })
            .collect(),
    }
}

fn parse_workout_tree_exercises(args: &[String]) -> Result<Vec<ExerciseTreeSpec>, AppError> {
    let mut exercises = Vec::new();
    let mut current: Option<ExerciseTreeSpec> = None;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--" => {
                idx += 1;
            }
            "--exercise" => {
                let value = args.get(idx + 1).ok_or_else(|| {
                    AppError::InvalidInput(
                        "workout add-tree --exercise requires a value".to_string(),
                    )
                })?;
                if let Some(exercise) = current.take() {
                    exercises.push(exercise);
                }
                current = Some(parse_exercise_value(value)?);
                idx += 2;
            }
            "--set" => {
                let value = args.get(idx + 1).ok_or_else(|| {
                    AppError::InvalidInput("workout add-tree --set requires a value".to_string())
                })?;
                let set = parse_set_value(value)?;
                match current.as_mut() {
                    Some(exercise) => exercise.sets.push(set),
                    None => {
                        return Err(AppError::InvalidInput(
                            "workout add-tree --set must follow an --exercise".to_string(),
                        ));
                    }
                }
                idx += 2;
            }
            unexpected => {
                return Err(AppError::InvalidInput(format!(
                    "workout add-tree unexpected argument: {unexpected}"
                )));
            }
        }
    }

    if let Some(exercise) = current.take() {
        exercises.push(exercise);
    }
    if exercises.is_empty() {
        return Err(AppError::InvalidInput(
            "workout add-tree requires at least one --exercise".to_string(),
        ));
    }
    Ok(exercises)
}

/// `ID` or `ID:SETS`.
fn parse_exercise_value(value: &str) -> Result<ExerciseTreeSpec, AppError> {
    let invalid = || {
        AppError::InvalidInput(format!(
            "invalid exercise '{value}', expected <id> or <id>:<sets>"
        ))
    };
    let (id, sets) = match value.trim().split_once(':') {
        Some((id, sets)) => (id, Some(sets)),
        None => (value.trim(), None),
    };
    let exercise_id = id.trim().parse::<i64>().map_err(|_| invalid())?;
    let target_sets = sets
        .map(|sets| sets.trim().parse::<i32>().map_err(|_| invalid()))
        .transpose()?;
    Ok(ExerciseTreeSpec {
        exercise_id,
        target_sets,
        sets: Vec::new(),
    })
}

/// `REPS` or `REPSxWEIGHT`.
fn parse_set_value(value: &str) -> Result<(i32, f64), AppError> {
    let invalid = || {
        AppError::InvalidInput(format!(
            "invalid set '{value}', expected <reps> or <reps>x<weight>"
        ))
    };
    let trimmed = value.trim().to_ascii_lowercase();
    let (reps, weight) = match trimmed.split_once('x') {
        Some((reps, weight)) => (reps, Some(weight)),
        None => (trimmed.as_str(), None),
    };
    let reps = reps.trim().parse::<i32>().map_err(|_| invalid())?;
    let weight = match weight {
        Some(weight) => weight.trim().parse::<f64>().map_err(|_| invalid())?,
        None => 0.0,
    };
    Ok((reps, weight))
}

fn print_workout_list(plans: &[workout_plan::Model]) {
    println!("{:<4} {:<30} {}", "ID", "TITLE", "COMMENTS");
    for plan in plans {
        println!(
            "{:<4} {:<30} {}",
            plan.id,
            plan.title,
            plan.comments.as_deref().unwrap_or("")
        );
    }
}

fn print_exercise_list(exercises: &[exercise_plan::Model]) {
    println!(
        "{:<4} {:<6} {:<9} {:<6} {}",
        "POS", "ID", "EXERCISE", "SETS", "NOTES"
    );
    for exercise in exercises {
        println!(
            "{:<4} {:<6} {:<9} {:<6} {}",
            exercise.order_in_plan,
            exercise.id,
            exercise.exercise_id,
            exercise.target_sets,
            exercise.notes.as_deref().unwrap_or("")
        );
    }
}

fn print_set_list(sets: &[set_plan::Model]) {
    println!("{:<4} {:<6} {:<6} {}", "SET", "ID", "REPS", "WEIGHT");
    for set in sets {
        println!(
            "{:<4} {:<6} {:<6} {}",
            set.set_number,
            set.id,
            set.target_reps,
            format_weight(set.target_weight)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn tree_args_group_sets_under_exercises() {
        let parsed = parse_workout_tree_exercises(&args(&[
            "--exercise",
            "12:4",
            "--set",
            "10x60",
            "--set",
            "8X62.5",
            "--exercise",
            "7",
        ]))
        .expect("parse");
        assert_eq!(
            parsed,
            vec![
                ExerciseTreeSpec {
                    exercise_id: 12,
                    target_sets: Some(4),
                    sets: vec![(10, 60.0), (8, 62.5)],
                },
                ExerciseTreeSpec {
                    exercise_id: 7,
                    target_sets: None,
                    sets: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn tree_set_before_exercise_is_rejected() {
        let err = parse_workout_tree_exercises(&args(&["--set", "5"])).expect_err("orphan set");
        assert_eq!(
            err.to_string(),
            "Invalid input: workout add-tree --set must follow an --exercise"
        );
    }

    #[test]
    fn tree_target_sets_default_to_set_count() {
        let spec = exercise_spec_from_tree(ExerciseTreeSpec {
            exercise_id: 1,
            target_sets: None,
            sets: vec![(5, 0.0), (5, 0.0)],
        });
        assert_eq!(spec.target_sets, 2);
        let spec = exercise_spec_from_tree(ExerciseTreeSpec {
            exercise_id: 1,
            target_sets: None,
            sets: Vec::new(),
        });
        assert_eq!(spec.target_sets, DEFAULT_TARGET_SETS);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(parse_exercise_value("abc").is_err());
        assert!(parse_exercise_value("3:x").is_err());
        assert!(parse_set_value("tenx5").is_err());
        assert_eq!(parse_set_value(" 12 ").expect("reps only"), (12, 0.0));
    }
}
