use kerfcut_core::prelude::*;
use kerfcut_core::{MaterialJob, to_json};

#[test]
fn test_plan_stats_basic() {
    let cfg = PlanConfig::builder().with_board(1000, 1000).kerf(4).build();
    let out = plan(&[Demand::new("tile", 400, 400, 4)], &cfg).expect("plan");
    let stats = out.stats;

    assert_eq!(stats.num_boards, 1);
    assert_eq!(stats.num_panels, 4);
    assert_eq!(stats.used_area, 4 * 400 * 400);
    assert_eq!(stats.total_board_area, 1_000_000);
    assert!((stats.occupancy - 0.64).abs() < 1e-9);
    assert!((stats.waste_percentage() - 36.0).abs() < 1e-9);
    assert_eq!(stats.total_cut_length, out.cuts.iter().map(|c| c.total).sum::<u64>());
    assert!(stats.summary().contains("Panels: 4"));
}

#[test]
fn test_export_json_shape() {
    let cfg = PlanConfig::default();
    let demand = vec![
        Demand::new("side", 600, 400, 2),
        Demand::new("slab", 5000, 5000, 1),
    ];
    let out = plan(&demand, &cfg).expect("plan");
    let v = to_json(&out, false);

    let boards = v["boards"].as_array().expect("boards array");
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0]["panels"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(boards[0]["cutLength"]["total"], out.cuts[0].total);
    assert!(boards[0].get("free").is_none());
    assert_eq!(v["unplaced"][0]["reason"], "too_large");
    assert_eq!(v["stats"]["num_panels"], 2);

    let with_free = to_json(&out, true);
    assert!(with_free["boards"][0]["free"].is_array());
}

#[test]
fn test_plan_materials_keeps_job_order() {
    for parallel in [false, true] {
        let base = PlanConfig::builder().parallel(parallel).build();
        let jobs = vec![
            MaterialJob {
                material: "oak".into(),
                config: base.clone(),
                demand: vec![Demand::new("door", 700, 2000, 3)],
            },
            MaterialJob {
                material: "mdf".into(),
                config: PlanConfig::builder().kerf(0).parallel(parallel).build(),
                demand: vec![Demand::new("back", 500, 500, 1)],
            },
            MaterialJob {
                material: "birch".into(),
                config: base,
                demand: vec![Demand::new("shelf", 600, 300, 5)],
            },
        ];
        assert!(jobs.iter().all(|j| j.config.parallel == parallel));
        let results = plan_materials(&jobs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().map(|p| p.stats.num_panels).ok(), Some(3));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().map(|p| p.stats.num_panels).ok(), Some(5));
    }
}

#[test]
fn test_plan_materials_matches_single_plans() {
    let demand = vec![Demand::new("door", 700, 2000, 3), Demand::new("shelf", 600, 300, 4)];
    let serial = PlanConfig::default();
    let parallel = PlanConfig::builder().parallel(true).build();
    let jobs: Vec<MaterialJob> = ["oak", "walnut"]
        .into_iter()
        .map(|material| MaterialJob {
            material: material.into(),
            config: parallel.clone(),
            demand: demand.clone(),
        })
        .collect();
    let expected = plan(&demand, &serial).expect("plan");
    for result in plan_materials(&jobs) {
        let got = result.expect("plan");
        assert_eq!(got.stats.total_cut_length, expected.stats.total_cut_length);
        assert_eq!(got.cuts, expected.cuts);
    }
    assert!(plan_materials(&[]).is_empty());
}
