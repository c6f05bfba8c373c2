use serde::{Deserialize, Serialize};

use crate::config::BoardSpec;
use crate::model::{PlacedPanel, Rect};

/// One stock sheet: usable area, placed panels, and the free rectangles left to fill.
///
/// Coordinates are relative to the usable area; trim is already removed.
/// `free` never overlaps `placed` and free rectangles never overlap each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub(crate) id: usize,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) kerf: u32,
    pub(crate) placed: Vec<PlacedPanel>,
    pub(crate) free: Vec<Rect>,
}

impl Board {
    /// Empty board with a single free rectangle spanning `width x height`.
    pub fn new(id: usize, width: u32, height: u32, kerf: u32) -> Self {
        Self {
            id,
            width,
            height,
            kerf,
            placed: Vec::new(),
            free: vec![Rect::new(0, 0, width, height)],
        }
    }

    /// Empty board sized to the usable area of `spec`.
    pub fn from_spec(id: usize, spec: &BoardSpec) -> Self {
        Self::new(id, spec.usable_width(), spec.usable_height(), spec.kerf)
    }

    pub fn id(&self) -> usize {
        self.id
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn kerf(&self) -> u32 {
        self.kerf
    }
    pub fn placed(&self) -> &[PlacedPanel] {
        &self.placed
    }
    /// Free rectangles, in scan order. Diagnostic only.
    pub fn free(&self) -> &[Rect] {
        &self.free
    }
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
    pub fn used_area(&self) -> u64 {
        self.placed.iter().map(|p| p.rect.area()).sum()
    }
}
