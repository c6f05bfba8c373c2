//! Core library for planning guillotine cuts of rectangular panels from stock boards.
//!
//! - Placement: best-fit over free rectangles (top-most, then left-most, then least waste),
//!   optional 90° rotation, kerf reserved only where material is left behind
//! - Allocation: `plan` expands demand by quantity and opens boards on demand
//! - Cut length: `cut_length::estimate` reconstructs strip/column cuts per board
//! - Data model is serde-serializable; `export::to_json` renders a whole plan.
//!
//! Quick example:
//! ```
//! use kerfcut_core::{Demand, PlanConfig, plan};
//! # fn main() -> kerfcut_core::Result<()> {
//! let cfg = PlanConfig::builder().with_board(2070, 2800).kerf(3).build();
//! let demand = vec![
//!     Demand::new("side", 600, 400, 2),
//!     Demand::new("top", 800, 600, 1),
//! ];
//! let out = plan(&demand, &cfg)?;
//! println!("boards: {}, cut: {} mm", out.boards.len(), out.stats.total_cut_length);
//! # Ok(()) }
//! ```

pub mod board;
pub mod config;
pub mod cut_length;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use board::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `kerfcut_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::board::Board;
    pub use crate::config::{BoardSpec, PlanConfig, PlanConfigBuilder, SortOrder, Trim};
    pub use crate::cut_length::{Cut, CutAxis, CutReport};
    pub use crate::model::{Demand, Panel, PlacedPanel, PlanStats, Rect, Unplaced, UnplacedReason};
    pub use crate::packer::Packer;
    pub use crate::{CuttingPlan, MaterialJob, plan, plan_materials};
}
