use super::Packer;
use crate::board::Board;
use crate::model::{Panel, PlacedPanel, Rect};

/// Ordering of candidate placements: top-most, then left-most, then least waste.
///
/// Compared lexicographically, so a free rectangle higher on the board always
/// wins over a lower one regardless of how much material either would waste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CandidateKey {
    pub y: u32,
    pub x: u32,
    pub waste: u64,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    idx: usize,
    w: u32,
    h: u32,
    rotated: bool,
    key: CandidateKey,
}

/// Returns true if a `w x h` placement fits `fr` with kerf reserved on each axis
/// that leaves material behind. An axis filled exactly needs no kerf.
pub fn fits(fr: &Rect, w: u32, h: u32, kerf: u32) -> bool {
    let kerf_x = if fr.w > w { kerf } else { 0 };
    let kerf_y = if fr.h > h { kerf } else { 0 };
    fr.w as u64 >= w as u64 + kerf_x as u64 && fr.h as u64 >= h as u64 + kerf_y as u64
}

fn waste(fr: &Rect, w: u32, h: u32) -> u64 {
    (fr.w - w) as u64 * (fr.h - h) as u64
}

/// Horizontal-first split of `fr` around a panel placed at its origin.
///
/// The right remainder spans only the panel's height; the bottom remainder spans
/// the full width of `fr`. Remainders no wider than one kerf are dropped.
pub fn split(fr: &Rect, w: u32, h: u32, kerf: u32) -> (Option<Rect>, Option<Rect>) {
    let w_right = fr.w - w;
    let right = if w_right > kerf {
        Some(Rect::new(fr.x + w + kerf, fr.y, w_right - kerf, h))
    } else {
        None
    };
    let h_bottom = fr.h - h;
    let bottom = if h_bottom > kerf {
        Some(Rect::new(fr.x, fr.y + h + kerf, fr.w, h_bottom - kerf))
    } else {
        None
    };
    (right, bottom)
}

impl Board {
    fn choose(&self, panel: &Panel) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        let mut consider = |c: Candidate| {
            if best.is_none_or(|b| c.key < b.key) {
                best = Some(c);
            }
        };
        for (idx, fr) in self.free.iter().enumerate() {
            let (w, h) = (panel.width, panel.height);
            if fits(fr, w, h, self.kerf) {
                consider(Candidate {
                    idx,
                    w,
                    h,
                    rotated: false,
                    key: CandidateKey {
                        y: fr.y,
                        x: fr.x,
                        waste: waste(fr, w, h),
                    },
                });
            }
            if panel.rotatable && w != h && fits(fr, h, w, self.kerf) {
                consider(Candidate {
                    idx,
                    w: h,
                    h: w,
                    rotated: true,
                    key: CandidateKey {
                        y: fr.y,
                        x: fr.x,
                        waste: waste(fr, h, w),
                    },
                });
            }
        }
        best
    }

    fn commit(&mut self, panel: &Panel, c: Candidate) -> PlacedPanel {
        let fr = self.free.remove(c.idx);
        let placed = PlacedPanel {
            key: panel.key.clone(),
            demand_index: panel.demand_index,
            rect: Rect::new(fr.x, fr.y, c.w, c.h),
            rotated: c.rotated,
        };
        let (right, bottom) = split(&fr, c.w, c.h, self.kerf);
        self.free.extend(right);
        self.free.extend(bottom);
        tracing::trace!(
            board = self.id,
            key = %panel.key,
            x = fr.x,
            y = fr.y,
            w = c.w,
            h = c.h,
            rotated = c.rotated,
            "placed panel"
        );
        self.placed.push(placed.clone());
        placed
    }
}

impl Packer for Board {
    fn can_insert(&self, panel: &Panel) -> bool {
        self.choose(panel).is_some()
    }

    fn insert(&mut self, panel: &Panel) -> Option<PlacedPanel> {
        let c = self.choose(panel)?;
        Some(self.commit(panel, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(w: u32, h: u32, rotatable: bool) -> Panel {
        Panel {
            key: format!("{w}x{h}"),
            demand_index: 0,
            width: w,
            height: h,
            rotatable,
        }
    }

    #[test]
    fn exact_fill_needs_no_kerf_and_leaves_no_free_space() {
        let mut board = Board::new(0, 600, 400, 3);
        let placed = board.insert(&panel(600, 400, true)).expect("exact fit");
        assert_eq!(placed.rect, Rect::new(0, 0, 600, 400));
        assert!(!placed.rotated);
        assert!(board.free().is_empty());
    }

    #[test]
    fn leftover_narrower_than_kerf_rejects_the_axis() {
        // 1 unit of leftover cannot absorb a 3 unit kerf.
        let fr = Rect::new(0, 0, 601, 400);
        assert!(!fits(&fr, 600, 400, 3));
        assert!(fits(&fr, 598, 400, 3));
    }

    #[test]
    fn split_is_horizontal_first() {
        let fr = Rect::new(0, 0, 2070, 2800);
        let (right, bottom) = split(&fr, 800, 600, 3);
        assert_eq!(right, Some(Rect::new(803, 0, 1267, 600)));
        assert_eq!(bottom, Some(Rect::new(0, 603, 2070, 2197)));
    }

    #[test]
    fn remainders_within_kerf_are_trapped() {
        let fr = Rect::new(0, 0, 603, 403);
        assert_eq!(split(&fr, 600, 400, 3), (None, None));
    }

    #[test]
    fn rotates_when_only_rotated_fits() {
        let mut board = Board::new(0, 1000, 500, 3);
        let placed = board.insert(&panel(400, 800, true)).expect("rotated fit");
        assert!(placed.rotated);
        assert_eq!((placed.rect.w, placed.rect.h), (800, 400));
    }

    #[test]
    fn non_rotatable_panel_is_refused_without_mutation() {
        let mut board = Board::new(0, 1000, 500, 3);
        assert!(board.insert(&panel(400, 800, false)).is_none());
        assert!(board.placed().is_empty());
        assert_eq!(board.free(), &[Rect::new(0, 0, 1000, 500)]);
    }

    #[test]
    fn prefers_top_most_free_rect_over_lower_waste() {
        let mut board = Board::new(0, 1000, 1000, 2);
        // Right column (top) is 498x300; bottom row is 1000x698.
        board.insert(&panel(500, 300, false)).expect("first");
        let placed = board.insert(&panel(200, 200, false)).expect("second");
        assert_eq!((placed.rect.x, placed.rect.y), (502, 0));
    }

    #[test]
    fn candidate_key_orders_by_row_then_column_then_waste() {
        let a = CandidateKey { y: 0, x: 900, waste: 10_000 };
        let b = CandidateKey { y: 1, x: 0, waste: 0 };
        let c = CandidateKey { y: 0, x: 900, waste: 5 };
        assert!(a < b);
        assert!(c < a);
    }
}
