use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::board::Board;
use crate::config::{PlanConfig, SortOrder, validate_demand};
use crate::cut_length::{CutReport, estimate_for_spec};
use crate::error::Result;
use crate::model::{Demand, Panel, PlanStats, RejectedDemand, Unplaced, UnplacedReason};
use crate::packer::Packer;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Output of a planning run.
///
/// Every accepted demand unit is placed on exactly one board or listed in `unplaced`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuttingPlan {
    pub boards: Vec<Board>,
    /// Cut report per board, same order as `boards`.
    pub cuts: Vec<CutReport>,
    pub unplaced: Vec<Unplaced>,
    /// Demand entries refused by validation; none of their units were attempted.
    pub rejected: Vec<RejectedDemand>,
    pub stats: PlanStats,
}

/// One material's demand and board configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialJob {
    pub material: String,
    pub config: PlanConfig,
    pub demand: Vec<Demand>,
}

#[instrument(skip_all)]
/// Places `demand` onto boards described by `cfg` and estimates cut length per board.
///
/// Notes:
/// - The board spec is validated first; an invalid spec produces no boards.
/// - Invalid demand entries are collected in `rejected` and the rest still run.
/// - An empty demand list yields a plan with no boards.
/// - Units are processed in caller order unless `cfg.sort_order` says otherwise.
pub fn plan(demand: &[Demand], cfg: &PlanConfig) -> Result<CuttingPlan> {
    cfg.validate()?;

    let (panels, rejected) = expand_demand(demand, cfg);
    debug!(
        units = panels.len(),
        rejected = rejected.len(),
        "expanded demand"
    );
    let (boards, unplaced) = allocate(&panels, cfg);
    let cuts: Vec<CutReport> = boards
        .iter()
        .map(|b| estimate_for_spec(b, &cfg.board))
        .collect();
    let stats = PlanStats::collect(&boards, &cuts, unplaced.len());
    debug!(
        boards = stats.num_boards,
        placed = stats.num_panels,
        unplaced = stats.num_unplaced,
        "plan complete"
    );
    Ok(CuttingPlan {
        boards,
        cuts,
        unplaced,
        rejected,
        stats,
    })
}

/// Expands each valid demand entry into `quantity` panels and applies the configured sort.
pub fn expand_demand(demand: &[Demand], cfg: &PlanConfig) -> (Vec<Panel>, Vec<RejectedDemand>) {
    let mut panels = Vec::new();
    let mut rejected = Vec::new();
    for (index, d) in demand.iter().enumerate() {
        if let Err(err) = validate_demand(index, d) {
            warn!(index, key = %d.key, %err, "rejected demand item");
            rejected.push(RejectedDemand {
                demand_index: index,
                key: d.key.clone(),
                reason: err.to_string(),
            });
            continue;
        }
        for _ in 0..d.quantity {
            panels.push(Panel {
                key: d.key.clone(),
                demand_index: index,
                width: d.width,
                height: d.height,
                rotatable: d.rotatable && cfg.allow_rotation,
            });
        }
    }
    sort_panels(&mut panels, cfg.sort_order);
    (panels, rejected)
}

// stable sorts keep caller order among equal keys
fn sort_panels(panels: &mut [Panel], order: SortOrder) {
    match order {
        SortOrder::None => {}
        SortOrder::AreaDesc => panels.sort_by(|a, b| b.area().cmp(&a.area())),
        SortOrder::MaxSideDesc => {
            panels.sort_by(|a, b| b.width.max(b.height).cmp(&a.width.max(a.height)))
        }
        SortOrder::HeightDesc => panels.sort_by(|a, b| b.height.cmp(&a.height)),
        SortOrder::WidthDesc => panels.sort_by(|a, b| b.width.cmp(&a.width)),
    }
}

/// Places `panels` in order, first-fit across open boards, opening a new board
/// when none accepts a panel.
///
/// A panel that does not fit an empty board is reported once as `TooLarge`.
/// When `cfg.max_boards` is reached, panels needing another board are reported
/// as `BoardLimit`.
pub fn allocate(panels: &[Panel], cfg: &PlanConfig) -> (Vec<Board>, Vec<Unplaced>) {
    let spec = &cfg.board;
    let blank = Board::from_spec(0, spec);
    let mut boards: Vec<Board> = Vec::new();
    let mut unplaced: Vec<Unplaced> = Vec::new();
    let mut limit_hit = false;

    'panels: for panel in panels {
        if !blank.can_insert(panel) {
            debug!(key = %panel.key, w = panel.width, h = panel.height, "panel exceeds board");
            unplaced.push(unplaced_record(panel, UnplacedReason::TooLarge));
            continue;
        }
        for board in boards.iter_mut() {
            if board.insert(panel).is_some() {
                continue 'panels;
            }
        }
        if let Some(limit) = cfg.max_boards
            && boards.len() >= limit
        {
            if !limit_hit {
                warn!(limit, "board budget exhausted; remaining panels are left unplaced");
                limit_hit = true;
            }
            unplaced.push(unplaced_record(panel, UnplacedReason::BoardLimit));
            continue;
        }
        let mut board = Board::from_spec(boards.len(), spec);
        debug!(board = board.id(), "opened board");
        match board.insert(panel) {
            Some(_) => boards.push(board),
            None => unplaced.push(unplaced_record(panel, UnplacedReason::TooLarge)),
        }
    }
    (boards, unplaced)
}

fn unplaced_record(panel: &Panel, reason: UnplacedReason) -> Unplaced {
    Unplaced {
        key: panel.key.clone(),
        demand_index: panel.demand_index,
        width: panel.width,
        height: panel.height,
        reason,
    }
}

#[instrument(skip_all)]
/// Plans several independent materials. Results keep job order.
///
/// With the `parallel` feature, jobs run on the rayon pool when every job's
/// `config.parallel` is set. Otherwise they run one after another.
pub fn plan_materials(jobs: &[MaterialJob]) -> Vec<Result<CuttingPlan>> {
    #[cfg(feature = "parallel")]
    {
        if !jobs.is_empty() && jobs.iter().all(|job| job.config.parallel) {
            debug!(materials = jobs.len(), "planning materials in parallel");
            return jobs
                .par_iter()
                .map(|job| plan(&job.demand, &job.config))
                .collect();
        }
    }
    jobs.iter()
        .map(|job| {
            debug!(material = %job.material, "planning material");
            plan(&job.demand, &job.config)
        })
        .collect()
}
