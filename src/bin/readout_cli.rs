use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nalgebra::{Point2, Vector2};

use ksp_orbit_readout::map::{FrameOptions, MapFrame, TopDown};
use ksp_orbit_readout::overlay::{Focus, FocusSource, FrameInput, Overlay, OverlaySettings};
use ksp_orbit_readout::scenario::{Scenario, ScenarioArgs};

/// Prints the readout for one cursor position, using a top-down map centered
/// on the ship's parent body.
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Overlay settings file (TOML)
    #[arg(long, default_value = "overlay.toml")]
    settings: PathBuf,

    /// Follow the camera focus (the ship) instead of flying it
    #[arg(long)]
    tracking_station: bool,

    /// Universal time of the frame, in seconds
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Cursor position in pixels from the top-left corner
    #[arg(long, num_args = 2, value_names = ["X", "Y"], default_values_t = [400.0, 300.0])]
    cursor: Vec<f32>,

    /// Map scale
    #[arg(long, default_value_t = 2000.0)]
    meters_per_pixel: f64,

    /// Screen size in pixels
    #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [800.0, 600.0])]
    screen: Vec<f32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = OverlaySettings::load(&args.settings)
        .with_context(|| format!("Failed to load {}", args.settings.display()))?;
    let scenario = Scenario::from_args(&args.scenario)
        .with_context(|| format!("Failed to load {}", args.scenario.bodies.display()))?;
    let orrery = &scenario.orrery;
    let ship_id = scenario
        .active_ship
        .context("Scenario has no active ship")?;
    let ship = orrery
        .get_ship(ship_id)
        .context("Active ship is missing from the orrery")?;

    let (cursor, screen_size) = match (args.cursor.as_slice(), args.screen.as_slice()) {
        ([x, y], [w, h]) => (Point2::new(*x, *y), Vector2::new(*w, *h)),
        _ => anyhow::bail!("--cursor and --screen each take two numbers"),
    };

    let center = orrery.body_position(ship.parent_id(), args.time);
    let projector = TopDown::new(center, args.meters_per_pixel, screen_size);
    let options = FrameOptions {
        active_ship: Some(ship_id),
        camera_focus: Some(Focus::Vessel(ship_id)),
        hit_tolerance: settings.hit_tolerance,
    };
    let frame = MapFrame::build(orrery, args.time, &projector, options);

    let source = if args.tracking_station {
        FocusSource::CameraTarget
    } else {
        FocusSource::ActiveVessel
    };
    let overlay = Overlay::new(settings, source);

    let input = FrameInput {
        map_active: true,
        cursor,
        time: args.time,
        screen_size,
    };
    match overlay.update(&frame, &input) {
        Some(readout) => {
            println!(
                "Hit at ({:.0}, {:.0}){}",
                readout.anchor.x,
                readout.anchor.y,
                if readout.is_secondary { ", on the target's orbit" } else { "" }
            );
            for line in readout.lines.iter() {
                println!("  {}", line);
            }
        }
        None => println!("No orbit under the cursor"),
    }
    Ok(())
}
