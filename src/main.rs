use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use log::info;

use ksp_orbit_readout::gui::Simulation;
use ksp_orbit_readout::overlay::{FocusSource, Overlay, OverlaySettings};
use ksp_orbit_readout::scenario::{Scenario, ScenarioArgs};

/// Map view of a KSP-like solar system, with a readout of the orbit under the
/// mouse cursor.
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Overlay settings file (TOML)
    #[arg(long, default_value = "overlay.toml")]
    settings: PathBuf,

    /// Start in the tracking station, where the readout follows the camera
    #[arg(long)]
    tracking_station: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = OverlaySettings::load(&args.settings).with_context(|| {
        format!(
            "Failed to load overlay settings from {}",
            args.settings.display()
        )
    })?;
    let scenario = Scenario::from_args(&args.scenario).with_context(|| {
        format!(
            "Failed to set up scenario from {}",
            args.scenario.bodies.display()
        )
    })?;
    info!(
        "Loaded {} bodies and {} ships",
        scenario.orrery.bodies().count(),
        scenario.orrery.ships().count()
    );

    let source = if args.tracking_station {
        FocusSource::CameraTarget
    } else {
        FocusSource::ActiveVessel
    };

    let mut window = Window::new("KSP Orbit Readout");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));

    let simulation = Simulation::new(scenario, Overlay::new(settings, source), &mut window);
    window.render_loop(simulation);
    Ok(())
}
