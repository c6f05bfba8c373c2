use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use kerfcut_core::config::{BoardSpec, SortOrder, Trim};
use kerfcut_core::{CuttingPlan, Demand, MaterialJob, PlanConfig, plan_materials, to_json};
use serde::Deserialize;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "kerfcut",
    about = "Plan guillotine cuts of panels from stock boards",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Place panels on boards and report cut length per board
    Plan(PlanArgs),
    /// Validate a job file and report rejected demand items without placing anything
    Check(PlanArgs),
}

#[derive(Parser, Debug, Clone)]
struct PlanArgs {
    // Input/Output
    /// Job file (YAML, or JSON with a .json extension)
    #[arg(help_heading = "Input/Output")]
    job: PathBuf,
    /// Write the plan to this file instead of stdout
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// Output format: summary | json
    #[arg(long, default_value = "summary", value_parser = ["summary", "json"], help_heading = "Input/Output")]
    format: String,
    /// Include free rectangles in JSON output (diagnostic)
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    with_free: bool,

    // Board (overrides the job file)
    /// Raw board width
    #[arg(long, help_heading = "Board")]
    width: Option<u32>,
    /// Raw board height
    #[arg(long, help_heading = "Board")]
    height: Option<u32>,
    /// Saw blade width
    #[arg(long, help_heading = "Board")]
    kerf: Option<u32>,
    /// Trim on all four edges
    #[arg(long, help_heading = "Board")]
    trim: Option<u32>,

    // Allocation
    /// Sort order: none|area_desc|max_side_desc|height_desc|width_desc
    #[arg(long, help_heading = "Allocation")]
    sort_order: Option<String>,
    /// Allow 90deg rotation of rotatable panels
    #[arg(long, action=ArgAction::Set, help_heading = "Allocation")]
    allow_rotation: Option<bool>,
    /// Maximum boards per material
    #[arg(long, help_heading = "Allocation")]
    max_boards: Option<usize>,
    /// Plan materials in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Allocation")]
    parallel: bool,

    /// Print the merged configuration per material and exit
    #[arg(long, default_value_t = false)]
    print_config: bool,
}

/// Job file: either a single material (`board` + `demand`) or a `materials` list.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobFile {
    board: Option<BoardSpec>,
    #[serde(default)]
    demand: Vec<Demand>,
    #[serde(default)]
    materials: Vec<MaterialEntry>,
    allow_rotation: Option<bool>,
    sort_order: Option<String>,
    max_boards: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MaterialEntry {
    name: String,
    board: Option<BoardSpec>,
    demand: Vec<Demand>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Plan(args) => run_plan(args),
        Commands::Check(args) => run_check(args),
    }
}

fn run_plan(args: &PlanArgs) -> anyhow::Result<()> {
    let jobs = load_jobs(args)?;
    if args.print_config {
        for job in &jobs {
            println!("# {}", job.material);
            println!("{}", serde_yaml::to_string(&job.config)?);
        }
        return Ok(());
    }

    let start = Instant::now();
    let results = plan_materials(&jobs);
    info!(
        materials = jobs.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "planning finished"
    );

    let mut summaries = Vec::with_capacity(jobs.len());
    let mut values = Vec::with_capacity(jobs.len());
    let mut failed = 0usize;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(plan) => {
                report_problems(&job.material, &plan);
                if args.format == "json" {
                    let mut value = to_json(&plan, args.with_free);
                    value["material"] = job.material.as_str().into();
                    values.push(value);
                } else {
                    summaries.push(render_summary(&job.material, &plan));
                }
            }
            Err(e) => {
                error!(material = %job.material, "{e}");
                failed += 1;
            }
        }
    }

    let text = if args.format == "json" {
        serde_json::to_string_pretty(&values)?
    } else {
        summaries.join("\n")
    };
    match &args.out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            info!(?path, "plan written");
        }
        None => println!("{text}"),
    }

    if failed > 0 {
        anyhow::bail!("{failed} material(s) could not be planned");
    }
    Ok(())
}

fn run_check(args: &PlanArgs) -> anyhow::Result<()> {
    let jobs = load_jobs(args)?;
    let mut problems = 0usize;
    for job in &jobs {
        if let Err(e) = job.config.validate() {
            error!(material = %job.material, "{e}");
            problems += 1;
            continue;
        }
        for (index, d) in job.demand.iter().enumerate() {
            if let Err(e) = kerfcut_core::validate_demand(index, d) {
                warn!(material = %job.material, key = %d.key, "{e}");
                problems += 1;
            }
        }
        let units: u64 = job.demand.iter().map(|d| d.quantity as u64).sum();
        println!(
            "{}: {} demand items, {} units, board {}x{} kerf {}",
            job.material,
            job.demand.len(),
            units,
            job.config.board.width,
            job.config.board.height,
            job.config.board.kerf
        );
    }
    if problems > 0 {
        anyhow::bail!("{problems} problem(s) found");
    }
    Ok(())
}

fn render_summary(material: &str, plan: &CuttingPlan) -> String {
    let mut out = format!("[{}] {}\n", material, plan.stats.summary());
    for (board, cuts) in plan.boards.iter().zip(&plan.cuts) {
        out.push_str(&format!(
            "  board {}: {} panels, {} horizontal + {} vertical + {} correction = {} ({:.2} m)\n",
            board.id(),
            board.placed().len(),
            cuts.horizontal,
            cuts.vertical,
            cuts.correction,
            cuts.total,
            cuts.metres()
        ));
    }
    out
}

fn report_problems(material: &str, plan: &CuttingPlan) {
    for r in &plan.rejected {
        warn!(material, key = %r.key, index = r.demand_index, "rejected: {}", r.reason);
    }
    for u in &plan.unplaced {
        warn!(
            material,
            key = %u.key,
            w = u.width,
            h = u.height,
            reason = ?u.reason,
            "panel not placed"
        );
    }
}

fn load_jobs(args: &PlanArgs) -> anyhow::Result<Vec<MaterialJob>> {
    let job = read_job_file(&args.job)?;
    let mut base = PlanConfig::default();
    if let Some(board) = job.board {
        base.board = board;
    }
    if let Some(v) = job.allow_rotation {
        base.allow_rotation = v;
    }
    if let Some(v) = job.sort_order {
        base.sort_order = parse_sort_order(&v)?;
    }
    if let Some(v) = job.max_boards {
        base.max_boards = Some(v);
    }
    base.parallel = args.parallel;

    let mut entries: Vec<(String, Option<BoardSpec>, Vec<Demand>)> = job
        .materials
        .into_iter()
        .map(|m| (m.name, m.board, m.demand))
        .collect();
    if !job.demand.is_empty() {
        let name = args
            .job
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "default".into());
        entries.insert(0, (name, None, job.demand));
    }
    if entries.is_empty() {
        anyhow::bail!("{}: no demand and no materials", args.job.display());
    }

    entries
        .into_iter()
        .map(|(material, board, demand)| {
            let mut config = base.clone();
            if let Some(board) = board {
                config.board = board;
            }
            apply_overrides(&mut config, args)?;
            Ok(MaterialJob {
                material,
                config,
                demand,
            })
        })
        .collect()
}

fn apply_overrides(cfg: &mut PlanConfig, args: &PlanArgs) -> anyhow::Result<()> {
    if let Some(v) = args.width {
        cfg.board.width = v;
    }
    if let Some(v) = args.height {
        cfg.board.height = v;
    }
    if let Some(v) = args.kerf {
        cfg.board.kerf = v;
    }
    if let Some(v) = args.trim {
        cfg.board.trim = Trim::uniform(v);
    }
    if let Some(v) = &args.sort_order {
        cfg.sort_order = parse_sort_order(v)?;
    }
    if let Some(v) = args.allow_rotation {
        cfg.allow_rotation = v;
    }
    if let Some(v) = args.max_boards {
        cfg.max_boards = Some(v);
    }
    Ok(())
}

fn read_job_file(path: &Path) -> anyhow::Result<JobFile> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let job = if is_json {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    Ok(job)
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown sort order: {}", s))
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_job_with_materials_parses() {
        let text = r#"
board: { width: 2070, height: 2800, kerf: 3, trim: { top: 10, left: 10 } }
sort_order: area_desc
materials:
  - name: oak
    demand:
      - { key: door, width: 700, height: 2000, quantity: 2 }
  - name: mdf
    board: { width: 1220, height: 2440, kerf: 4 }
    demand:
      - { key: back, width: 600, height: 900, quantity: 1, rotatable: false }
"#;
        let job: JobFile = serde_yaml::from_str(text).expect("job parses");
        let board = job.board.expect("board");
        assert_eq!(board.trim.top, 10);
        assert_eq!(board.trim.right, 0);
        assert_eq!(job.materials.len(), 2);
        assert!(job.materials[0].demand[0].rotatable);
        assert!(!job.materials[1].demand[0].rotatable);
    }

    #[test]
    fn unknown_sort_order_is_an_error() {
        assert!(parse_sort_order("largest").is_err());
        assert_eq!(parse_sort_order("height_desc").ok(), Some(SortOrder::HeightDesc));
    }
}
