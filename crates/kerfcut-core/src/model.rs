use serde::{Deserialize, Serialize};

use crate::cut_length::CutReport;

/// Axis-aligned rectangle in board-local units. `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// True if the interiors of `self` and `other` intersect. Touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
}

/// A required panel size as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Demand {
    /// Caller label (part name, article number). Carried through to placements.
    #[serde(default)]
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub quantity: u32,
    #[serde(default = "default_rotatable")]
    pub rotatable: bool,
}

fn default_rotatable() -> bool {
    true
}

impl Demand {
    pub fn new(key: impl Into<String>, width: u32, height: u32, quantity: u32) -> Self {
        Self {
            key: key.into(),
            width,
            height,
            quantity,
            rotatable: true,
        }
    }

    pub fn rotatable(mut self, v: bool) -> Self {
        self.rotatable = v;
        self
    }
}

/// One unit of demand awaiting placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub key: String,
    /// Index of the originating entry in the demand list.
    pub demand_index: usize,
    pub width: u32,
    pub height: u32,
    pub rotatable: bool,
}

impl Panel {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A panel committed to a board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacedPanel {
    pub key: String,
    pub demand_index: usize,
    /// Placed rectangle in its as-placed orientation.
    pub rect: Rect,
    /// True if width and height were swapped when placed.
    pub rotated: bool,
}

impl PlacedPanel {
    /// Width and height as requested, with any rotation undone.
    pub fn source_size(&self) -> (u32, u32) {
        if self.rotated {
            (self.rect.h, self.rect.w)
        } else {
            (self.rect.w, self.rect.h)
        }
    }
}

/// Why a demand unit ended up without a board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    /// Does not fit an empty board in any allowed orientation.
    TooLarge,
    /// Would need a board beyond `PlanConfig::max_boards`.
    BoardLimit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Unplaced {
    pub key: String,
    pub demand_index: usize,
    pub width: u32,
    pub height: u32,
    pub reason: UnplacedReason,
}

/// A demand entry refused during validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectedDemand {
    pub demand_index: usize,
    pub key: String,
    pub reason: String,
}

/// Statistics about board usage for a plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanStats {
    pub num_boards: usize,
    pub num_panels: usize,
    pub num_rotated: usize,
    pub num_unplaced: usize,
    /// Sum of usable board areas.
    pub total_board_area: u64,
    /// Sum of placed panel areas.
    pub used_area: u64,
    /// used_area / total_board_area (0.0 to 1.0).
    pub occupancy: f64,
    /// Sum of all board cut lengths.
    pub total_cut_length: u64,
}

impl PlanStats {
    pub(crate) fn collect(
        boards: &[crate::board::Board],
        cuts: &[CutReport],
        num_unplaced: usize,
    ) -> Self {
        let mut num_panels = 0;
        let mut num_rotated = 0;
        let mut total_board_area = 0u64;
        let mut used_area = 0u64;
        for board in boards {
            total_board_area += board.width() as u64 * board.height() as u64;
            for p in board.placed() {
                num_panels += 1;
                used_area += p.rect.area();
                if p.rotated {
                    num_rotated += 1;
                }
            }
        }
        let occupancy = if total_board_area > 0 {
            used_area as f64 / total_board_area as f64
        } else {
            0.0
        };
        Self {
            num_boards: boards.len(),
            num_panels,
            num_rotated,
            num_unplaced,
            total_board_area,
            used_area,
            occupancy,
            total_cut_length: cuts.iter().map(|c| c.total).sum(),
        }
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Boards: {}, Panels: {}, Occupancy: {:.2}%, Rotated: {}, Unplaced: {}, Cut length: {}",
            self.num_boards,
            self.num_panels,
            self.occupancy * 100.0,
            self.num_rotated,
            self.num_unplaced,
            self.total_cut_length,
        )
    }

    pub fn wasted_area(&self) -> u64 {
        self.total_board_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_board_area > 0 {
            (self.wasted_area() as f64 / self.total_board_area as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.overlaps(&Rect::new(10, 0, 5, 5)));
        assert!(!a.overlaps(&Rect::new(0, 10, 5, 5)));
        assert!(a.overlaps(&Rect::new(9, 9, 5, 5)));
    }

    #[test]
    fn source_size_undoes_rotation() {
        let p = PlacedPanel {
            key: "door".into(),
            demand_index: 0,
            rect: Rect::new(0, 0, 400, 600),
            rotated: true,
        };
        assert_eq!(p.source_size(), (600, 400));
    }
}
