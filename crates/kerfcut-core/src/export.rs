use crate::pipeline::CuttingPlan;
use serde_json::{Value, json};

/// Serialize a plan as `{ boards, unplaced, rejected, stats }` with per-board
/// panels, cuts, and cut totals. Free rectangles are included only when `with_free` is set.
pub fn to_json(plan: &CuttingPlan, with_free: bool) -> Value {
    let boards_val = plan
        .boards
        .iter()
        .zip(&plan.cuts)
        .map(|(board, cuts)| {
            let panels: Vec<Value> = board
                .placed()
                .iter()
                .map(|p| {
                    let (src_w, src_h) = p.source_size();
                    json!({
                        "key": p.key,
                        "demand": p.demand_index,
                        "rect": {"x": p.rect.x, "y": p.rect.y, "w": p.rect.w, "h": p.rect.h},
                        "rotated": p.rotated,
                        "sourceSize": {"w": src_w, "h": src_h},
                    })
                })
                .collect();
            let mut val = json!({
                "id": board.id(),
                "width": board.width(),
                "height": board.height(),
                "kerf": board.kerf(),
                "panels": panels,
                "cuts": &cuts.cuts,
                "cutLength": {
                    "horizontal": cuts.horizontal,
                    "vertical": cuts.vertical,
                    "correction": cuts.correction,
                    "total": cuts.total,
                    "metres": cuts.metres(),
                },
            });
            if with_free {
                val["free"] = json!(board.free());
            }
            val
        })
        .collect::<Vec<_>>();
    json!({
        "boards": boards_val,
        "unplaced": &plan.unplaced,
        "rejected": &plan.rejected,
        "stats": &plan.stats,
    })
}
