use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "liftplan",
    version,
    about = "Plan workouts, exercises and sets with SQLite"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Data directory (overrides LIFTPLAN_HOME)"
    )]
    pub home: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "ID",
        help = "Acting user; required for everything except `user add`"
    )]
    pub user_id: Option<i64>,
    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    User(UserCommand),
    #[command(subcommand)]
    Workout(WorkoutCommand),
    #[command(subcommand)]
    Exercise(ExerciseCommand),
    #[command(subcommand)]
    Set(SetCommand),
    #[command(subcommand)]
    Repair(RepairCommand),
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    Add(UserAdd),
}

#[derive(Subcommand, Debug)]
pub enum WorkoutCommand {
    Add(WorkoutAdd),
    #[command(name = "add-tree")]
    AddTree(WorkoutAddTree),
    List(WorkoutList),
    Show(WorkoutShow),
    Update(WorkoutUpdate),
    Remove(WorkoutRemove),
}

#[derive(Subcommand, Debug)]
pub enum ExerciseCommand {
    Add(ExerciseAdd),
    List(ExerciseList),
    Show(ExerciseShow),
    Update(ExerciseUpdate),
    Move(ExerciseMove),
    Remove(ExerciseShow),
}

#[derive(Subcommand, Debug)]
pub enum SetCommand {
    Add(SetAdd),
    List(ExerciseShow),
    Show(SetShow),
    Update(SetUpdate),
    Move(SetMove),
    Remove(SetShow),
}

#[derive(Subcommand, Debug)]
pub enum RepairCommand {
    /// Renumber the exercise plans of one workout plan
    Exercises(WorkoutShow),
    /// Renumber the set plans of one exercise plan
    Sets(ExerciseShow),
}

#[derive(Args, Debug)]
pub struct UserAdd {
    pub full_name: String,
    pub email: String,
}

#[derive(Args, Debug)]
pub struct WorkoutAdd {
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub comments: Option<String>,
}

#[derive(Args, Debug)]
pub struct WorkoutAddTree {
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(
        value_name = "ARGS",
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Use --exercise <id>[:<sets>] [--set <reps>x<weight> ...] repeating per exercise"
    )]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct WorkoutList {}

#[derive(Args, Debug)]
pub struct WorkoutShow {
    pub workout_id: i64,
}

#[derive(Args, Debug)]
pub struct WorkoutUpdate {
    pub workout_id: i64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub comments: Option<String>,
}

#[derive(Args, Debug)]
pub struct WorkoutRemove {
    pub workout_id: i64,
}

#[derive(Args, Debug)]
pub struct ExerciseAdd {
    pub workout_id: i64,
    /// Catalog id of the exercise
    pub exercise_id: i64,
    #[arg(long, default_value_t = 3)]
    pub sets: i32,
    #[arg(long, help = "Position in the workout (default: append)")]
    pub at: Option<i32>,
    #[arg(long)]
    pub minutes: Option<f64>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExerciseList {
    pub workout_id: i64,
}

#[derive(Args, Debug)]
pub struct ExerciseShow {
    pub workout_id: i64,
    pub exercise_plan_id: i64,
}

#[derive(Args, Debug)]
pub struct ExerciseUpdate {
    pub workout_id: i64,
    pub exercise_plan_id: i64,
    #[arg(long)]
    pub exercise_id: Option<i64>,
    #[arg(long)]
    pub sets: Option<i32>,
    #[arg(long)]
    pub minutes: Option<f64>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, help = "Move to this position")]
    pub to: Option<i32>,
}

#[derive(Args, Debug)]
pub struct ExerciseMove {
    pub workout_id: i64,
    pub exercise_plan_id: i64,
    #[arg(long)]
    pub to: i32,
}

#[derive(Args, Debug)]
pub struct SetAdd {
    pub workout_id: i64,
    pub exercise_plan_id: i64,
    #[arg(long)]
    pub reps: i32,
    #[arg(long, default_value_t = 0.0)]
    pub weight: f64,
    #[arg(long)]
    pub seconds: Option<i32>,
    #[arg(long, help = "Set number (default: append)")]
    pub at: Option<i32>,
}

#[derive(Args, Debug)]
pub struct SetShow {
    pub workout_id: i64,
    pub exercise_plan_id: i64,
    pub set_plan_id: i64,
}

#[derive(Args, Debug)]
pub struct SetUpdate {
    pub workout_id: i64,
    pub exercise_plan_id: i64,
    pub set_plan_id: i64,
    #[arg(long)]
    pub reps: Option<i32>,
    #[arg(long)]
    pub weight: Option<f64>,
    #[arg(long)]
    pub seconds: Option<i32>,
    #[arg(long, help = "Move to this set number")]
    pub to: Option<i32>,
}

#[derive(Args, Debug)]
pub struct SetMove {
    pub workout_id: i64,
    pub exercise_plan_id: i64,
    pub set_plan_id: i64,
    #[arg(long)]
    pub to: i32,
}

/// One `--exercise` group of `workout add-tree`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseTreeSpec {
    pub exercise_id: i64,
    pub target_sets: Option<i32>,
    pub sets: Vec<(i32, f64)>,
}
