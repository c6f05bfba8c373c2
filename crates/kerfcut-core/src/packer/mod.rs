use crate::model::{Panel, PlacedPanel};

pub mod guillotine;

/// A packer places panels onto a board.
///
/// Implementations must ensure no overlaps and reserve kerf between neighbours.
/// `insert` returns `None` and leaves the board untouched if the panel cannot be placed.
pub trait Packer {
    fn can_insert(&self, panel: &Panel) -> bool;
    fn insert(&mut self, panel: &Panel) -> Option<PlacedPanel>;
}
