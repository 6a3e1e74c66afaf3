use clap::{Parser, Subcommand};
use foundation::math::{Orientation, Vec2, solve_center, wrap_pi};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tools::{parse_geo, parse_pair, parse_path, replay_drag};

#[derive(Parser, Debug)]
#[command(author, version, about = "Orthographic globe projection and drag probe")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a geographic point for a view center
    Project {
        /// View center: lat,lon in degrees
        #[arg(long, allow_hyphen_values = true, default_value = "60,25")]
        center: String,

        /// Point to project: lat,lon in degrees
        #[arg(long, allow_hyphen_values = true)]
        point: String,
    },

    /// Find the geographic point under a screen position
    Unproject {
        /// View center: lat,lon in degrees
        #[arg(long, allow_hyphen_values = true, default_value = "60,25")]
        center: String,

        /// Screen position: x,y in disc units, y up
        #[arg(long, allow_hyphen_values = true)]
        screen: String,
    },

    /// Solve for the center that puts a point at a screen position
    Solve {
        /// Grabbed point: lat,lon in degrees
        #[arg(long, allow_hyphen_values = true)]
        point: String,

        /// Target screen position: x,y in disc units, y up
        #[arg(long, allow_hyphen_values = true)]
        screen: String,

        /// Keep the point beyond the north-south axis
        #[arg(long)]
        far_side: bool,
    },

    /// Replay a pointer path and report every solved center
    Drag {
        /// Starting view center: lat,lon in degrees
        #[arg(long, allow_hyphen_values = true, default_value = "60,25")]
        center: String,

        /// Screen samples "x,y;x,y;...", first one is the press
        #[arg(long, allow_hyphen_values = true)]
        path: String,

        /// Feed screen samples to the solver without the equal-area lens
        #[arg(long)]
        no_lens: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    match args.command {
        Command::Project { center, point } => cmd_project(&center, &point),
        Command::Unproject { center, screen } => cmd_unproject(&center, &screen),
        Command::Solve {
            point,
            screen,
            far_side,
        } => cmd_solve(&point, &screen, far_side),
        Command::Drag {
            center,
            path,
            no_lens,
        } => cmd_drag(&center, &path, !no_lens),
    }
}

fn cmd_project(center: &str, point: &str) -> Result<(), String> {
    let orientation = Orientation::from_center(parse_geo(center)?);
    let p = orientation.project(parse_geo(point)?);
    print_json(&json!({
        "x": p.x,
        "y": p.y,
        "z": p.z,
        "visible": p.z >= 0.0,
    }))
}

fn cmd_unproject(center: &str, screen: &str) -> Result<(), String> {
    let orientation = Orientation::from_center(parse_geo(center)?);
    let [x, y] = parse_pair(screen)?;
    let g = orientation.unproject(Vec2::new(x, y));
    print_json(&json!({
        "lat_deg": g.lat_deg(),
        "lon_deg": wrap_pi(g.lon_rad).to_degrees(),
    }))
}

fn cmd_solve(point: &str, screen: &str, far_side: bool) -> Result<(), String> {
    let point = parse_geo(point)?;
    let [x, y] = parse_pair(screen)?;
    let solve = solve_center(Vec2::new(x, y), point, far_side);
    info!(flippable = solve.flippable, "solved center");
    print_json(&json!({
        "center_lat_deg": solve.center.lat_deg(),
        "center_lon_deg": wrap_pi(solve.center.lon_rad).to_degrees(),
        "flippable": solve.flippable,
    }))
}

fn cmd_drag(center: &str, path: &str, lens: bool) -> Result<(), String> {
    let center = parse_geo(center)?;
    let samples = parse_path(path)?;
    let replay = replay_drag(center, &samples, lens)?;
    info!(
        samples = samples.len(),
        far_side_at_start = replay.far_side_at_start,
        "replayed drag"
    );
    print_json(&replay)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("serialize: {e}"))?;
    println!("{text}");
    Ok(())
}
