use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{KerfcutError, Result};
use crate::model::Demand;

/// Material trimmed from each raw board edge before the usable area begins.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trim {
    #[serde(default)]
    pub top: u32,
    #[serde(default)]
    pub right: u32,
    #[serde(default)]
    pub bottom: u32,
    #[serde(default)]
    pub left: u32,
}

impl Trim {
    pub fn uniform(v: u32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
    pub fn is_zero(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }
}

/// Raw stock board dimensions plus saw configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardSpec {
    /// Raw stock width (before trim).
    pub width: u32,
    /// Raw stock height (before trim).
    pub height: u32,
    /// Saw blade width consumed between adjacent pieces.
    pub kerf: u32,
    #[serde(default)]
    pub trim: Trim,
}

impl Default for BoardSpec {
    fn default() -> Self {
        Self {
            width: 2070,
            height: 2800,
            kerf: 3,
            trim: Trim::default(),
        }
    }
}

impl BoardSpec {
    /// Usable width after left/right trim.
    pub fn usable_width(&self) -> u32 {
        self.width
            .saturating_sub(self.trim.left.saturating_add(self.trim.right))
    }
    /// Usable height after top/bottom trim.
    pub fn usable_height(&self) -> u32 {
        self.height
            .saturating_sub(self.trim.top.saturating_add(self.trim.bottom))
    }

    /// Rejects zero dimensions, zero kerf, and trim that consumes an axis.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(KerfcutError::InvalidBoardSpec(format!(
                "board dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.kerf == 0 {
            return Err(KerfcutError::InvalidBoardSpec(
                "kerf must be positive".into(),
            ));
        }
        let horizontal = self.trim.left.saturating_add(self.trim.right);
        if horizontal >= self.width {
            return Err(KerfcutError::InvalidBoardSpec(format!(
                "left+right trim ({}) leaves no usable width on a {} wide board",
                horizontal, self.width
            )));
        }
        let vertical = self.trim.top.saturating_add(self.trim.bottom);
        if vertical >= self.height {
            return Err(KerfcutError::InvalidBoardSpec(format!(
                "top+bottom trim ({}) leaves no usable height on a {} high board",
                vertical, self.height
            )));
        }
        Ok(())
    }
}

/// Pre-sort applied to expanded demand units before allocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep the caller's order.
    None,
    AreaDesc,
    MaxSideDesc,
    HeightDesc,
    WidthDesc,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "height_desc" => Ok(Self::HeightDesc),
            "width_desc" => Ok(Self::WidthDesc),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanConfig {
    pub board: BoardSpec,
    /// Global rotation switch, ANDed with each demand's `rotatable`.
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
    /// Upper bound on boards opened per run. None means unbounded.
    #[serde(default)]
    pub max_boards: Option<usize>,
    /// Lets `plan_materials` run jobs on the rayon pool when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            board: BoardSpec::default(),
            allow_rotation: default_allow_rotation(),
            sort_order: default_sort_order(),
            max_boards: None,
            parallel: false,
        }
    }
}

impl PlanConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if the board spec is unusable or `max_boards` is zero.
    pub fn validate(&self) -> Result<()> {
        self.board.validate()?;
        if self.max_boards == Some(0) {
            return Err(KerfcutError::InvalidConfig(
                "max_boards must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Create a fluent builder for `PlanConfig`.
    pub fn builder() -> PlanConfigBuilder {
        PlanConfigBuilder::new()
    }
}

/// Checks one demand entry; `index` is its position in the demand list.
pub fn validate_demand(index: usize, d: &Demand) -> Result<()> {
    let reason = if d.width == 0 || d.height == 0 {
        format!("dimensions must be positive, got {}x{}", d.width, d.height)
    } else if d.quantity == 0 {
        "quantity must be positive".to_string()
    } else {
        return Ok(());
    };
    Err(KerfcutError::InvalidDemand { index, reason })
}

fn default_allow_rotation() -> bool {
    true
}
fn default_sort_order() -> SortOrder {
    SortOrder::None
}

/// Builder for `PlanConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PlanConfigBuilder {
    cfg: PlanConfig,
}

impl PlanConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PlanConfig::default(),
        }
    }
    pub fn with_board(mut self, width: u32, height: u32) -> Self {
        self.cfg.board.width = width;
        self.cfg.board.height = height;
        self
    }
    pub fn kerf(mut self, v: u32) -> Self {
        self.cfg.board.kerf = v;
        self
    }
    pub fn trim(mut self, v: Trim) -> Self {
        self.cfg.board.trim = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn max_boards(mut self, v: Option<usize>) -> Self {
        self.cfg.max_boards = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PlanConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_area_subtracts_trim() {
        let spec = BoardSpec {
            width: 2070,
            height: 2800,
            kerf: 3,
            trim: Trim {
                top: 10,
                right: 5,
                bottom: 20,
                left: 15,
            },
        };
        assert_eq!(spec.usable_width(), 2050);
        assert_eq!(spec.usable_height(), 2770);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn sort_order_parses_case_insensitively() {
        assert_eq!("AREA_DESC".parse::<SortOrder>(), Ok(SortOrder::AreaDesc));
        assert!("biggest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = validate_demand(3, &Demand::new("shelf", 500, 300, 0)).unwrap_err();
        assert!(matches!(err, KerfcutError::InvalidDemand { index: 3, .. }));
    }
}
