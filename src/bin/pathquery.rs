use clap::Parser;
use ledge::config::load_config;
use ledge::game_logic::errors::{LedgeError, LedgeResult};
use ledge::level::LevelDefinition;
use ledge::pathfinding::{ObstacleManager, PathPlanner, PlanOutcome};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod pathquery {
    pub mod cli_utils;
}

use pathquery::cli_utils::*;

#[derive(Parser, Clone)]
#[command(name = "pathquery")]
#[command(about = "Run one path query against a ledge level file")]
struct Args {
    /// Level file (ASCII, or bincode when the extension is .bin)
    level: PathBuf,

    /// Start position in world pixels (format: X,Y)
    #[arg(long)]
    from: Option<String>,

    /// Goal position in world pixels (format: X,Y)
    #[arg(long)]
    to: Option<String>,

    /// Agent kind (ground, flying)
    #[arg(long, default_value = "ground")]
    kind: String,

    /// Agent collider size in pixels (format: WIDTHxHEIGHT); defaults to the configured size
    #[arg(long)]
    footprint: Option<String>,

    /// Log every rejected query and illegal path step
    #[arg(long)]
    verbose: bool,

    /// Write the level in the binary format to this path and exit
    #[arg(long)]
    convert: Option<PathBuf>,
}

fn main() -> LedgeResult<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let level = LevelDefinition::load_from_path(&args.level)?;

    if let Some(output) = &args.convert {
        return convert_level(&level, output);
    }

    let (Some(from), Some(to)) = (&args.from, &args.to) else {
        return Err(LedgeError::InvalidArgument {
            reason: "both --from and --to are required unless --convert is given".to_string(),
        });
    };
    let start = parse_point(from)?;
    let goal = parse_point(to)?;
    let kind = parse_kind(&args.kind)?;

    let config = load_config();
    let settings = &config.settings;
    let footprint = match &args.footprint {
        Some(size) => parse_footprint(size)?,
        None => settings.agent_footprint(),
    };

    let mut debug = settings.debug_flags();
    debug.verbose_search |= args.verbose;

    let obstacles = ObstacleManager::from_level(&level);
    let planner = PathPlanner::new(
        &obstacles,
        level.mapper(),
        level.bounds(),
        settings.planner_config(),
    )
    .with_debug(debug);

    match planner.plan(start, goal, kind, footprint) {
        Some(outcome) => print_outcome(&level, &outcome),
        None => println!(
            "No {kind} path from ({}, {}) to ({}, {}) in '{}'",
            start.x, start.y, goal.x, goal.y, level.name
        ),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ledge=trace" } else { "ledge=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn convert_level(level: &LevelDefinition, output: &Path) -> LedgeResult<()> {
    validate_output_path(output)?;
    level.save_to_path(output)?;
    println!(
        "Level '{}' ({}x{}, {} blocks) written to {}",
        level.name,
        level.width,
        level.height,
        level.blocks.len(),
        output.display()
    );
    Ok(())
}

fn print_outcome(level: &LevelDefinition, outcome: &PlanOutcome) {
    println!("Path found in '{}':", level.name);
    println!(
        "  cost {}, {} cells searched, {} raw cells, {} after simplification{}",
        outcome.cost,
        outcome.stats.expanded,
        outcome.raw_cells.len(),
        outcome.cells.len(),
        if outcome.stats.used_shortcut {
            " (direct shortcut)"
        } else {
            ""
        }
    );

    for (i, waypoint) in outcome.path.iter().enumerate() {
        match waypoint.cell {
            Some(cell) => println!(
                "  {i:>3}: ({:.0}, {:.0}) cell {cell}",
                waypoint.position.x, waypoint.position.y
            ),
            None => println!("  {i:>3}: ({:.0}, {:.0})", waypoint.position.x, waypoint.position.y),
        }
    }
}
