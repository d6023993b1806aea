//! Hover readouts for orbit lines on the map view.
//!
//! Each frame the overlay finds the orbit curve under the cursor
//! ([`hit_test::evaluate`]), works out the kinematics at that point
//! ([`sample::summarize`]) and lays out a popup ([`display::Readout`]).
//! Nothing is carried over from one frame to the next.

use log::trace;

pub mod display;
pub mod host;
pub mod sample;
pub mod settings;

pub use display::{Readout, Rect};
pub use hit_test::HitResult;
pub use host::{
    BodyGeometry, CastHit, CurveSetKind, Focus, FrameInput, MapScene, OrbitGeometry, SolverState,
    Target,
};
pub use sample::DisplayFields;
pub use settings::{Calendar, OverlaySettings, SettingsError};

/// Where the object under evaluation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSource {
    /// The vessel being flown.
    ActiveVessel,
    /// Whatever the map camera is centered on, as in the tracking station.
    CameraTarget,
}

#[derive(Debug, Clone)]
pub struct Overlay {
    settings: OverlaySettings,
    source: FocusSource,
}

impl Overlay {
    pub fn new(settings: OverlaySettings, source: FocusSource) -> Self {
        Self { settings, source }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut OverlaySettings {
        &mut self.settings
    }

    pub fn source(&self) -> FocusSource {
        self.source
    }

    pub fn set_source(&mut self, source: FocusSource) {
        self.source = source;
    }

    pub fn focus<S: MapScene>(&self, scene: &S) -> Option<Focus<S::Vessel, S::Body>> {
        match self.source {
            FocusSource::ActiveVessel => scene.active_vessel().map(Focus::Vessel),
            FocusSource::CameraTarget => scene.camera_focus(),
        }
    }

    /// Runs one frame. Returns the popup to draw, if the cursor is over an
    /// orbit.
    pub fn update<S: MapScene>(&self, scene: &S, input: &FrameInput) -> Option<Readout> {
        let focus = self.focus(scene);
        let hit = hit_test::evaluate(scene, focus, input, self.settings.allow_target)?;
        trace!(
            "Hovering t={:.1} at ({:.0}, {:.0}), secondary: {}",
            hit.time,
            hit.screen_point.x,
            hit.screen_point.y,
            hit.is_secondary
        );

        let fields = sample::summarize(&hit, input.time, &self.settings);
        let width = self.settings.display_width;
        Some(Readout::layout(
            &hit,
            fields,
            Rect::new(0.0, 0.0, width, width),
            input.screen_size,
            self.settings.calendar,
        ))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point2, Point3, Unit, Vector2, Vector3};

    use super::*;

    // A body at the origin, with a circular orbit of radius 1000 in the xy
    // plane, drawn as if the screen were that plane with 1 px = 1 m.
    #[derive(Debug, Clone)]
    struct Ring;

    #[derive(Debug, Clone, Copy)]
    struct Center;

    impl OrbitGeometry for Ring {
        type Body = Center;

        fn reference_body(&self) -> Center {
            Center
        }
        fn position_at(&self, time: f64) -> Point3<f64> {
            Point3::from(self.relative_position_at(time))
        }
        fn relative_position_at(&self, time: f64) -> Vector3<f64> {
            Vector3::new(time.cos(), time.sin(), 0.0) * 1000.0
        }
        fn orbital_velocity_at(&self, time: f64) -> Vector3<f64> {
            Vector3::new(-time.sin(), time.cos(), 0.0) * 10.0
        }
        fn normal_vector(&self) -> Unit<Vector3<f64>> {
            Vector3::z_axis()
        }
    }

    impl BodyGeometry for Center {
        type Orbit = Ring;

        fn radius(&self) -> f64 {
            100.0
        }
        fn position_at(&self, _: f64) -> Point3<f64> {
            Point3::origin()
        }
        fn orbit(&self) -> Option<Ring> {
            None
        }
    }

    struct Scene {
        camera: Option<Focus<u8, u8>>,
    }

    impl MapScene for Scene {
        type Orbit = Ring;
        type Vessel = u8;
        type Body = u8;

        fn active_vessel(&self) -> Option<u8> {
            Some(1)
        }
        fn camera_focus(&self) -> Option<Focus<u8, u8>> {
            self.camera
        }
        fn solver(&self, _: u8) -> Option<SolverState> {
            Some(SolverState {
                maneuver_nodes: 0,
                has_flight_plan: false,
                has_patches: true,
            })
        }
        fn target(&self, _: u8) -> Target<u8, u8> {
            Target::None
        }
        fn cast_curves(&self, _: u8, _: CurveSetKind, cursor: Point2<f32>) -> Option<CastHit<Ring>> {
            // Hit whenever the cursor is on the ring's right half
            (cursor.x > 0.0).then(|| CastHit {
                orbit: Ring,
                screen_point: Point2::new(1000.0, 0.0),
                time: 0.0,
            })
        }
        fn cast_orbit(&self, _: u8, _: Point2<f32>) -> Option<CastHit<Ring>> {
            None
        }
    }

    fn input(cursor_x: f32) -> FrameInput {
        FrameInput {
            map_active: true,
            cursor: Point2::new(cursor_x, 0.0),
            time: 30.0,
            screen_size: Vector2::new(1920.0, 1080.0),
        }
    }

    #[test]
    fn test_update() {
        let overlay = Overlay::new(OverlaySettings::default(), FocusSource::ActiveVessel);

        let scene = Scene { camera: None };
        let readout = overlay.update(&scene, &input(990.0)).unwrap();
        assert_eq!(readout.anchor, Point2::new(1000.0, 0.0));
        // Centered on the hit, but pushed down onto the screen
        assert_eq!(readout.popup, Rect::new(920.0, 0.0, 160.0, 160.0));
        assert_eq!(readout.fields.altitude, Some(900.0));
        assert_eq!(readout.fields.time_remaining, Some(30.0));
        assert!(readout.fields.angle_to_prograde.is_none());
        assert_eq!(readout.lines[0], "T: +30s");
        assert!(!readout.is_secondary);
    }

    #[test]
    fn test_no_stale_readout() {
        let overlay = Overlay::new(OverlaySettings::default(), FocusSource::ActiveVessel);

        let scene = Scene { camera: None };
        assert!(overlay.update(&scene, &input(990.0)).is_some());
        assert!(overlay.update(&scene, &input(-990.0)).is_none());

        let mut hidden = input(990.0);
        hidden.map_active = false;
        assert!(overlay.update(&scene, &hidden).is_none());
    }

    #[test]
    fn test_camera_source() {
        let mut overlay = Overlay::new(OverlaySettings::default(), FocusSource::CameraTarget);

        // Nothing under the camera
        let scene = Scene { camera: None };
        assert!(overlay.update(&scene, &input(990.0)).is_none());

        let scene = Scene {
            camera: Some(Focus::Vessel(1)),
        };
        assert!(overlay.update(&scene, &input(990.0)).is_some());

        overlay.set_source(FocusSource::ActiveVessel);
        assert_eq!(overlay.focus(&Scene { camera: None }), Some(Focus::Vessel(1)));
    }

    #[test]
    fn test_popup_follows_display_width() {
        let scene = Scene { camera: None };
        let mut overlay = Overlay::new(OverlaySettings::default(), FocusSource::ActiveVessel);

        // Sized from the very first frame
        let readout = overlay.update(&scene, &input(990.0)).unwrap();
        assert_eq!(readout.popup.width, 160.0);

        overlay.settings_mut().display_width = 240.0;
        let readout = overlay.update(&scene, &input(990.0)).unwrap();
        assert_eq!(readout.popup.width, 240.0);
        assert_eq!(readout.popup.height, 240.0);
    }
}
