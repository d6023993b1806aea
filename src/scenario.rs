//! Starting setups shared by the binaries: which bodies are loaded, which
//! ships fly where, and what they target.

use std::path::PathBuf;

use log::debug;
use nalgebra::{UnitQuaternion, Vector3};
use thiserror::Error;

use crate::file::{read_file, BodyFileError};
use crate::model::orrery::{Maneuver, Orrery, ShipID, TargetRef};

pub const ACTIVE_SHIP_NAME: &str = "Orbiter";
pub const RELAY_SHIP_NAME: &str = "Relay";

// Relay orbit, relative to the active ship's
const RELAY_ALTITUDE_FACTOR: f64 = 3.0;
const RELAY_INCLINATION_DEG: f64 = 20.0;

#[derive(Debug, Clone, clap::Args)]
pub struct ScenarioArgs {
    /// Table of celestial bodies to load
    #[arg(long, default_value = "ksp-bodies.txt")]
    pub bodies: PathBuf,

    /// Body the ship starts out orbiting
    #[arg(long, default_value = "Kerbin")]
    pub parent: String,

    /// Altitude of the ship's circular starting orbit, in meters
    #[arg(long, default_value_t = 100_000.0)]
    pub altitude: f64,

    /// Plan a burn a quarter orbit ahead: prograde,normal,radial in m/s
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub burn: Option<Vec<f64>>,

    /// Name of the ship or body the ship targets
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    BodyFile(#[from] BodyFileError),
    #[error("No body named {0:?}")]
    UnknownBody(String),
    #[error("No ship or body named {0:?}")]
    UnknownTarget(String),
    #[error("A burn needs three components, got {0}")]
    BadBurn(usize),
    #[error("Altitude must be positive, got {0}")]
    BadAltitude(f64),
}

/// What the viewer starts with.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub orrery: Orrery,
    /// The ship being flown, if any.
    pub active_ship: Option<ShipID>,
    /// Prograde, normal and radial-out delta-v of newly placed maneuver nodes.
    pub node_delta_v: Vector3<f64>,
}

impl Scenario {
    pub fn from_args(args: &ScenarioArgs) -> Result<Self, ScenarioError> {
        let orrery = read_file(&args.bodies)?;
        Self::setup(orrery, args)
    }

    /// Puts a solver-carrying ship in a circular orbit around the chosen
    /// parent, and a relay without a solver in a higher, inclined one.
    pub fn setup(mut orrery: Orrery, args: &ScenarioArgs) -> Result<Self, ScenarioError> {
        let parent_id = orrery
            .find_body(&args.parent)
            .ok_or_else(|| ScenarioError::UnknownBody(args.parent.clone()))?;
        if !(args.altitude > 0.0) {
            return Err(ScenarioError::BadAltitude(args.altitude));
        }

        let parent = orrery.get_body(parent_id);
        let (mu, radius) = (parent.info.mu, parent.info.radius);

        let r = radius + args.altitude;
        let ship_id = orrery.add_ship(
            ACTIVE_SHIP_NAME,
            Vector3::x() * r,
            Vector3::y() * (mu / r).sqrt(),
            0.0,
            parent_id,
            true,
        );

        let relay_r = radius + args.altitude * RELAY_ALTITUDE_FACTOR;
        let tilt = UnitQuaternion::from_axis_angle(
            &Vector3::x_axis(),
            RELAY_INCLINATION_DEG.to_radians(),
        );
        orrery.add_ship(
            RELAY_SHIP_NAME,
            -Vector3::x() * relay_r,
            tilt * (-Vector3::y() * (mu / relay_r).sqrt()),
            0.0,
            parent_id,
            false,
        );

        let node_delta_v = match &args.burn {
            Some(burn) => {
                let delta_v = match burn.as_slice() {
                    [prograde, normal, radial] => Vector3::new(*prograde, *normal, *radial),
                    other => return Err(ScenarioError::BadBurn(other.len())),
                };
                // Circular orbits always have a period
                let quarter = orrery
                    .get_ship(ship_id)
                    .and_then(|ship| ship.orbit.orbit().period())
                    .map_or(0.0, |period| period / 4.0);
                orrery.add_maneuver(
                    ship_id,
                    Maneuver {
                        time: quarter,
                        delta_v,
                    },
                );
                delta_v
            }
            None => Vector3::x() * 100.0,
        };

        if let Some(name) = &args.target {
            let target = match (orrery.find_ship(name), orrery.find_body(name)) {
                (Some(id), _) => TargetRef::Ship(id),
                (None, Some(id)) => TargetRef::Body(id),
                (None, None) => return Err(ScenarioError::UnknownTarget(name.clone())),
            };
            orrery.set_target(ship_id, Some(target));
        }

        debug!(
            "Scenario: {} at {:.0} m around {}, target {:?}",
            ACTIVE_SHIP_NAME, args.altitude, args.parent, args.target
        );
        Ok(Self {
            orrery,
            active_ship: Some(ship_id),
            node_delta_v,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::file::parse_bodies;

    const BODIES: &str = "\
name mu radius color parent a ecc incl lan argp maae
Kerbol 1.1723328e18 261600000 ffff00 -
Kerbin 3.5316e12 600000 3366ff Kerbol 13599840256 0 0 0 0 0
Mun 6.5138398e10 200000 999999 Kerbin 12000000 0 0 0 0 0
";

    fn args() -> ScenarioArgs {
        ScenarioArgs {
            bodies: PathBuf::from("unused"),
            parent: String::from("kerbin"),
            altitude: 100_000.0,
            burn: None,
            target: None,
        }
    }

    #[test]
    fn test_default_setup() {
        let scenario = Scenario::setup(parse_bodies(BODIES).unwrap(), &args()).unwrap();
        let orrery = &scenario.orrery;
        let ship = orrery.get_ship(scenario.active_ship.unwrap()).unwrap();

        assert!(ship.has_solver);
        assert!(ship.maneuvers.is_empty());
        assert_eq!(ship.target, None);
        assert_relative_eq!(ship.orbit.orbit().eccentricity(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(ship.orbit.orbit().periapsis(), 700_000.0, max_relative = 1e-6);

        let relay = orrery.get_ship(orrery.find_ship("relay").unwrap()).unwrap();
        assert!(!relay.has_solver);
        assert_relative_eq!(
            relay.orbit.orbit().inclination().to_degrees(),
            RELAY_INCLINATION_DEG,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_burn_and_target() {
        let args = ScenarioArgs {
            burn: Some(vec![250.0, 0.0, -10.0]),
            target: Some(String::from("Mun")),
            ..args()
        };
        let scenario = Scenario::setup(parse_bodies(BODIES).unwrap(), &args).unwrap();
        let orrery = &scenario.orrery;
        let ship = orrery.get_ship(scenario.active_ship.unwrap()).unwrap();

        assert_eq!(scenario.node_delta_v, Vector3::new(250.0, 0.0, -10.0));
        assert_eq!(ship.maneuvers.len(), 1);
        assert!(ship.maneuvers[0].time > 0.0);
        assert_eq!(
            ship.target,
            Some(TargetRef::Body(orrery.find_body("Mun").unwrap()))
        );
    }

    #[test]
    fn test_ship_target_wins_over_body() {
        let args = ScenarioArgs {
            target: Some(String::from(RELAY_SHIP_NAME)),
            ..args()
        };
        let scenario = Scenario::setup(parse_bodies(BODIES).unwrap(), &args).unwrap();
        let orrery = &scenario.orrery;
        let ship = orrery.get_ship(scenario.active_ship.unwrap()).unwrap();
        let relay = orrery.find_ship(RELAY_SHIP_NAME).unwrap();
        assert_eq!(ship.target, Some(TargetRef::Ship(relay)));
    }

    #[test]
    fn test_errors() {
        let bodies = || parse_bodies(BODIES).unwrap();

        let unknown_parent = ScenarioArgs {
            parent: String::from("Duna"),
            ..args()
        };
        assert!(matches!(
            Scenario::setup(bodies(), &unknown_parent),
            Err(ScenarioError::UnknownBody(_))
        ));

        let unknown_target = ScenarioArgs {
            target: Some(String::from("Jool")),
            ..args()
        };
        assert!(matches!(
            Scenario::setup(bodies(), &unknown_target),
            Err(ScenarioError::UnknownTarget(_))
        ));

        let short_burn = ScenarioArgs {
            burn: Some(vec![1.0]),
            ..args()
        };
        assert!(matches!(
            Scenario::setup(bodies(), &short_burn),
            Err(ScenarioError::BadBurn(1))
        ));

        let underground = ScenarioArgs {
            altitude: -5.0,
            ..args()
        };
        assert!(matches!(
            Scenario::setup(bodies(), &underground),
            Err(ScenarioError::BadAltitude(_))
        ));
    }
}
