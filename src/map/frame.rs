use std::collections::BTreeMap;

use log::debug;
use nalgebra::Point2;

use super::curves::{path_iter_parametric, Curve, CurveSet, PathSample};
use super::projection::Projector;
use crate::model::geometry::OrreryOrbit;
use crate::model::orrery::{BodyID, Orrery, ShipID, TargetRef};
use crate::model::trajectory::{Patch, Trajectory};
use crate::overlay::{CastHit, CurveSetKind, Focus, MapScene, SolverState, Target};

/// Line segments per drawn conic section.
pub const NUM_SEGMENTS: usize = 180;

/// What a ship's curve set shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Solver prediction with no maneuvers.
    Patches,
    /// Solver prediction including the maneuver nodes.
    FlightPlan,
    /// Plain orbit of a ship without a solver.
    Orbit,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOptions {
    pub active_ship: Option<ShipID>,
    pub camera_focus: Option<Focus<ShipID, BodyID>>,
    /// How close to a curve, in pixels, counts as a hit.
    pub hit_tolerance: f32,
}

#[derive(Debug, Clone)]
struct ShipCurves<'a> {
    solver: Option<SolverState>,
    curves: CurveSet<OrreryOrbit<'a>>,
    kind: PathKind,
}

/// Everything drawn on the map for one frame, already projected to the
/// screen.
#[derive(Debug, Clone)]
pub struct MapFrame<'a> {
    orrery: &'a Orrery,
    options: FrameOptions,
    ships: BTreeMap<ShipID, ShipCurves<'a>>,
    bodies: BTreeMap<BodyID, CurveSet<OrreryOrbit<'a>>>,
}

impl<'a> MapFrame<'a> {
    pub fn build<P: Projector + ?Sized>(
        orrery: &'a Orrery,
        time: f64,
        projector: &P,
        options: FrameOptions,
    ) -> Self {
        let mut ships = BTreeMap::new();
        for ship in orrery.ships() {
            let entry = if ship.has_solver {
                let maneuver_nodes = ship.pending_maneuvers(time).len();
                let (kind, trajectory) = match Trajectory::flight_plan(orrery, ship, time) {
                    Some(plan) => (PathKind::FlightPlan, plan),
                    None => (PathKind::Patches, Trajectory::coast(orrery, ship, time)),
                };
                let curves = project_patches(orrery, trajectory.patches(), time, projector);
                ShipCurves {
                    solver: Some(SolverState {
                        maneuver_nodes,
                        has_flight_plan: kind == PathKind::FlightPlan,
                        has_patches: kind == PathKind::Patches,
                    }),
                    curves,
                    kind,
                }
            } else {
                let trajectory = Trajectory::predict(orrery, ship.orbit.clone(), time, 1);
                ShipCurves {
                    solver: None,
                    curves: project_patches(orrery, trajectory.patches(), time, projector),
                    kind: PathKind::Orbit,
                }
            };
            ships.insert(ship.id, entry);
        }

        let mut bodies = BTreeMap::new();
        for body in orrery.bodies() {
            let orbit = match orrery.orbit_of_body(body.id) {
                Some(orbit) => orbit,
                None => continue,
            };
            let period = match orbit.orbit().period() {
                Some(period) => period,
                None => continue,
            };

            let orbit = OrreryOrbit::new(orrery, orbit.clone());
            let samples = sample_arc(orrery, &orbit, time, time + period, time);
            let mut set = CurveSet::new();
            set.push(Curve::new(orbit, samples, projector));
            bodies.insert(body.id, set);
        }

        debug!(
            "Built map frame at t={:.0} with {} ship and {} body curve sets",
            time,
            ships.len(),
            bodies.len()
        );
        Self {
            orrery,
            options,
            ships,
            bodies,
        }
    }

    pub fn ship_curves(
        &self,
    ) -> impl Iterator<Item = (ShipID, PathKind, &CurveSet<OrreryOrbit<'a>>)> + '_ {
        self.ships
            .iter()
            .map(|(id, ship)| (*id, ship.kind, &ship.curves))
    }

    pub fn body_curves(&self) -> impl Iterator<Item = (BodyID, &CurveSet<OrreryOrbit<'a>>)> + '_ {
        self.bodies.iter().map(|(id, set)| (*id, set))
    }
}

fn project_patches<'a, P: Projector + ?Sized>(
    orrery: &'a Orrery,
    patches: &[Patch],
    time: f64,
    projector: &P,
) -> CurveSet<OrreryOrbit<'a>> {
    let mut set = CurveSet::new();
    for patch in patches {
        let orbit = OrreryOrbit::new(orrery, patch.orbit.clone());
        let samples = sample_arc(orrery, &orbit, patch.start_time, patch.end_time, time);
        set.push(Curve::new(orbit, samples, projector));
    }
    set
}

/// Samples an arc uniformly in universal anomaly. Points are placed relative
/// to where the reference body is at `now`, which is how the map draws them.
fn sample_arc(
    orrery: &Orrery,
    orbit: &OrreryOrbit,
    start_time: f64,
    end_time: f64,
    now: f64,
) -> Vec<PathSample> {
    let orbit = orbit.orbit();
    let origin = orrery.body_position(orbit.primary().id, now);

    let s_start = orbit.s_at_time(start_time);
    let s_end = orbit.s_at_time(end_time);
    path_iter_parametric(
        |s| PathSample {
            position: origin + orbit.orbit().get_state_at_universal_anomaly(s).position(),
            time: orbit.time_at_s(s),
        },
        s_start,
        s_end,
        NUM_SEGMENTS,
    )
    .collect()
}

impl<'a> MapScene for MapFrame<'a> {
    type Orbit = OrreryOrbit<'a>;
    type Vessel = ShipID;
    type Body = BodyID;

    fn active_vessel(&self) -> Option<ShipID> {
        self.options.active_ship
    }

    fn camera_focus(&self) -> Option<Focus<ShipID, BodyID>> {
        self.options.camera_focus
    }

    fn solver(&self, vessel: ShipID) -> Option<SolverState> {
        self.ships.get(&vessel)?.solver
    }

    fn target(&self, vessel: ShipID) -> Target<ShipID, BodyID> {
        let target = self.orrery.get_ship(vessel).and_then(|ship| ship.target);
        match target {
            Some(TargetRef::Ship(id)) if id != vessel && self.ships.contains_key(&id) => {
                Target::Vessel(id)
            }
            Some(TargetRef::Body(id)) => Target::Object(id),
            _ => Target::None,
        }
    }

    fn cast_curves(
        &self,
        vessel: ShipID,
        kind: CurveSetKind,
        cursor: Point2<f32>,
    ) -> Option<CastHit<OrreryOrbit<'a>>> {
        let ship = self.ships.get(&vessel)?;
        let wanted = match kind {
            CurveSetKind::FlightPlan => PathKind::FlightPlan,
            CurveSetKind::Patches => PathKind::Patches,
        };
        if ship.kind != wanted {
            return None;
        }
        ship.curves.cast(cursor, self.options.hit_tolerance)
    }

    fn cast_vessel_orbit(
        &self,
        vessel: ShipID,
        cursor: Point2<f32>,
    ) -> Option<CastHit<OrreryOrbit<'a>>> {
        let ship = self.ships.get(&vessel)?;
        if ship.kind != PathKind::Orbit {
            return None;
        }
        ship.curves.cast(cursor, self.options.hit_tolerance)
    }

    fn cast_orbit(&self, body: BodyID, cursor: Point2<f32>) -> Option<CastHit<OrreryOrbit<'a>>> {
        self.bodies
            .get(&body)?
            .cast(cursor, self.options.hit_tolerance)
    }
}
