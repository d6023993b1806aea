//! The view of the map scene that the overlay needs. Anything that can answer
//! these questions (the live simulation, or a mock in tests) can drive it.

use nalgebra::{Point2, Point3, Unit, Vector2, Vector3};

/// A trajectory segment that can be evaluated at arbitrary times.
pub trait OrbitGeometry {
    type Body: BodyGeometry;

    /// The body this orbit is relative to.
    fn reference_body(&self) -> Self::Body;

    /// Position in the world frame at the given time.
    fn position_at(&self, time: f64) -> Point3<f64>;

    /// Position relative to the reference body at the given time.
    fn relative_position_at(&self, time: f64) -> Vector3<f64>;

    /// Velocity relative to the reference body at the given time.
    fn orbital_velocity_at(&self, time: f64) -> Vector3<f64>;

    fn orbital_speed_at(&self, time: f64) -> f64 {
        self.orbital_velocity_at(time).norm()
    }

    fn normal_vector(&self) -> Unit<Vector3<f64>>;
}

pub trait BodyGeometry {
    type Orbit: OrbitGeometry;

    fn radius(&self) -> f64;

    /// Position of the body's center in the world frame at the given time.
    fn position_at(&self, time: f64) -> Point3<f64>;

    /// The body's own orbit, or `None` for the root body.
    fn orbit(&self) -> Option<Self::Orbit>;
}

/// What a screen-space cast against a set of curves found.
#[derive(Debug, Clone)]
pub struct CastHit<O> {
    pub orbit: O,
    /// Point on the curve nearest to the cursor, in pixels.
    pub screen_point: Point2<f32>,
    /// Universal time at that point of the orbit.
    pub time: f64,
}

/// The object the map is centered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus<V, B> {
    Vessel(V),
    Body(B),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<V, B> {
    None,
    Vessel(V),
    /// Some other object with an orbit, e.g. a celestial body.
    Object(B),
}

/// The two sets of curves a patched conic solver draws for a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveSetKind {
    /// The trajectory including the effect of maneuver nodes.
    FlightPlan,
    /// The trajectory the vessel follows on its own.
    Patches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverState {
    pub maneuver_nodes: usize,
    pub has_flight_plan: bool,
    pub has_patches: bool,
}

impl SolverState {
    /// Picks which curves are on screen. With maneuver nodes the flight plan
    /// is shown, otherwise the plain patches; never a fallback to the other.
    pub fn displayed_curves(&self) -> Option<CurveSetKind> {
        if self.maneuver_nodes > 0 {
            self.has_flight_plan.then_some(CurveSetKind::FlightPlan)
        } else {
            self.has_patches.then_some(CurveSetKind::Patches)
        }
    }
}

/// Per-frame input to the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub map_active: bool,
    /// Cursor position in pixels, from the top-left of the window.
    pub cursor: Point2<f32>,
    /// Current universal time.
    pub time: f64,
    pub screen_size: Vector2<f32>,
}

/// The map view as seen by the overlay.
pub trait MapScene {
    type Orbit: OrbitGeometry + Clone;
    type Vessel: Copy;
    type Body: Copy;

    fn active_vessel(&self) -> Option<Self::Vessel>;

    fn camera_focus(&self) -> Option<Focus<Self::Vessel, Self::Body>>;

    /// The vessel's patched conic solver, if it has one.
    fn solver(&self, vessel: Self::Vessel) -> Option<SolverState>;

    fn target(&self, vessel: Self::Vessel) -> Target<Self::Vessel, Self::Body>;

    /// Casts the cursor against one of the vessel's solver curve sets.
    fn cast_curves(
        &self,
        vessel: Self::Vessel,
        kind: CurveSetKind,
        cursor: Point2<f32>,
    ) -> Option<CastHit<Self::Orbit>>;

    /// Casts the cursor against the plain orbit line of a vessel that has no
    /// solver.
    fn cast_vessel_orbit(
        &self,
        _vessel: Self::Vessel,
        _cursor: Point2<f32>,
    ) -> Option<CastHit<Self::Orbit>> {
        None
    }

    /// Casts the cursor against a body's orbit line.
    fn cast_orbit(&self, body: Self::Body, cursor: Point2<f32>) -> Option<CastHit<Self::Orbit>>;
}
