//! Keeps sibling ordinals (`order_in_plan`, `set_number`) dense and 1-based
//! under insert, move and delete.

mod position;
mod scope;
mod service;
mod shift;
mod unit_of_work;

pub use position::OrdinalBound;
pub use scope::{ExercisePlanDetail, ExercisePlanScope, SetPlanScope, SiblingScope};
pub use service::OrderedCollection;
