use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use ledge::components::{Body, ChaseTarget, Grounded, Navigator};
use ledge::config::{load_config, load_config_from, save_config};
use ledge::game_logic::errors::LedgeResult;
use ledge::game_logic::navigation::NavigationState;
use ledge::plugins::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Clone)]
#[command(name = "ledge")]
#[command(about = "Headless simulation of platformer agents chasing a target")]
struct Args {
    /// Level file; overrides level_file_path from the config
    level: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value = "600")]
    frames: u32,

    /// Simulation rate in frames per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Config file to use instead of the one in the user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective config to the user config directory and exit
    #[arg(long)]
    save_config: bool,
}

fn main() -> LedgeResult<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    if let Some(level) = &args.level {
        config.level_file_path = level.display().to_string();
    }

    if args.save_config {
        save_config(&config)?;
        println!("Config saved");
        return Ok(());
    }

    let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(frame))
        .insert_resource(config)
        .add_plugins((LevelPlugin, NavigationPlugin));
    app.finish();
    app.cleanup();

    for _ in 0..args.frames {
        app.update();
    }

    print_agent_states(&mut app, args.frames);
    Ok(())
}

fn print_agent_states(app: &mut App, frames: u32) {
    let world = app.world_mut();
    let elapsed = world.resource::<Time>().elapsed_secs();
    println!("After {frames} frames ({elapsed:.2}s):");

    let mut targets = world.query_filtered::<&Body, With<ChaseTarget>>();
    for target in targets.iter(world) {
        let center = target.center();
        println!("  target at ({:.0}, {:.0})", center.x, center.y);
    }

    let mut agents = world.query::<(&Navigator, &Body, &Grounded, &NavigationState)>();
    let mut rows: Vec<_> = agents.iter(world).collect();
    rows.sort_by_key(|(navigator, ..)| navigator.id);

    for (navigator, body, grounded, state) in rows {
        let center = body.center();
        let path = state
            .current_path()
            .map(|path| format!("waypoint {}/{}", state.waypoint_index(), path.len()))
            .unwrap_or_else(|| "no path".to_string());
        println!(
            "  {navigator}: at ({:.0}, {:.0}), {}, {path}, {:?}, stuck episodes {}{}",
            center.x,
            center.y,
            if grounded.0 { "grounded" } else { "airborne" },
            state.behavior(),
            state.stuck.episodes(),
            if state.stuck.in_recovery() {
                " (recovering)"
            } else {
                ""
            }
        );
    }
}
