pub mod constraints;
pub mod data;
pub mod error;
pub mod model;
pub mod objective;
pub mod planner;
pub mod report;
pub mod tables;
pub mod variables;

#[cfg(test)]
mod testing;

pub use constraints::ConstraintGenerator;
pub use data::{Blendstock, DEFAULT_OPENING_INVENTORY, ProblemData, Product, QualitySpec, TankageLimits};
pub use error::{InputError, PlanError};
pub use model::BlendModel;
pub use objective::compose_objective;
pub use planner::{Planner, SolvedModel};
pub use report::{BlendLine, BlendstockReport, PeriodReport, PlanReport, ProductReport};
pub use tables::{InventoryRow, PlanTables, TableRow};
pub use variables::{VarKey, VariableStore};
