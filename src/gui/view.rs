use std::collections::HashMap;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::text::Font;
use kiss3d::window::Window;
use log::{info, warn};
use nalgebra::{Point2, Point3, Translation3, Vector2, Vector3};

use super::camera::{FocusedCamera, ZoomableCamera};
use super::controller::Controller;
use crate::map::{CurveSet, FrameOptions, MapFrame, PathKind};
use crate::model::geometry::OrreryOrbit;
use crate::model::orrery::{Body, BodyID, Maneuver, Orrery, Ship, ShipID, TargetRef};
use crate::overlay::display::format_duration;
use crate::overlay::{Focus, FocusSource, FrameInput, Overlay};

const SHIP_SIZE: f32 = 1e5;
// Used when the ship's orbit has no period to take a fraction of.
const DEFAULT_NODE_LEAD: f64 = 600.0;

const HUD_FONT_SIZE: f32 = 60.0;
const POPUP_FONT_SIZE: f32 = 32.0;

const SHIP_PATH_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const FLIGHT_PLAN_COLOR: [f32; 3] = [1.0, 0.6, 0.0];

pub struct View {
    // Object state
    orrery: Orrery,
    time: f64,
    active_ship: Option<ShipID>,
    node_delta_v: Vector3<f64>,
    body_spheres: HashMap<BodyID, SceneNode>,
    ship_objects: HashMap<ShipID, SceneNode>,
    // Camera
    camera: ZoomableCamera,
    camera_focus: CameraFocus,
    map_active: bool,
    // Overlay
    overlay: Overlay,
    cursor: Point2<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPoint {
    Body(BodyID),
    Ship(ShipID),
}

/// The overlay settings that can be flipped from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    Time,
    Altitude,
    Speed,
    AngleToPrograde,
    AllowTarget,
}

pub struct CameraFocus {
    focus_points: Vec<FocusPoint>,
    focus_idx: usize,
}

impl CameraFocus {
    pub fn new(orrery: &Orrery) -> Self {
        let mut focus_points = vec![];
        for body in orrery.bodies() {
            focus_points.push(FocusPoint::Body(body.id));
            // Now put in all ships orbiting that body
            for ship in orrery.ships() {
                if ship.parent_id() == body.id {
                    focus_points.push(FocusPoint::Ship(ship.id));
                }
            }
        }

        CameraFocus {
            focus_points,
            focus_idx: 0,
        }
    }

    pub fn next(&mut self) {
        let num_points = self.focus_points.len().max(1);
        self.focus_idx = (self.focus_idx + 1) % num_points;
    }

    pub fn prev(&mut self) {
        let num_points = self.focus_points.len().max(1);
        self.focus_idx = (self.focus_idx + num_points - 1) % num_points;
    }

    pub fn focus_on(&mut self, point: FocusPoint) {
        if let Some(idx) = self.focus_points.iter().position(|p| *p == point) {
            self.focus_idx = idx;
        }
    }

    pub fn point(&self) -> Option<FocusPoint> {
        self.focus_points.get(self.focus_idx).copied()
    }
}

impl View {
    pub fn new(
        orrery: Orrery,
        active_ship: Option<ShipID>,
        node_delta_v: Vector3<f64>,
        overlay: Overlay,
        window: &mut Window,
    ) -> Self {
        // Initial distance doesn't matter, since we're about to call fix_camera_zoom
        let camera = ZoomableCamera::new(1.0);
        let mut camera_focus = CameraFocus::new(&orrery);
        if let Some(id) = active_ship {
            camera_focus.focus_on(FocusPoint::Ship(id));
        }

        // Create objects for bodies
        let mut body_spheres = HashMap::new();
        for body in orrery.bodies() {
            let sphere = Self::create_body_object(window, body);
            body_spheres.insert(body.id, sphere);
        }

        // Create objects for ships
        let mut ship_objects = HashMap::new();
        for ship in orrery.ships() {
            let cube = Self::create_ship_object(window, ship);
            ship_objects.insert(ship.id, cube);
        }

        let mut view = Self {
            orrery,
            time: 0.0,
            active_ship,
            node_delta_v,
            body_spheres,
            ship_objects,
            camera,
            camera_focus,
            map_active: true,
            overlay,
            cursor: Point2::origin(),
        };
        view.fix_camera_zoom();
        view.update_scene_objects();

        view
    }

    fn create_body_object(window: &mut Window, body: &Body) -> SceneNode {
        // Make the sphere that represents the body
        let mut sphere = window.add_sphere(body.info.radius as f32);
        let color = &body.info.color;
        sphere.set_color(color.x, color.y, color.z);
        sphere
    }

    fn create_ship_object(window: &mut Window, _: &Ship) -> SceneNode {
        // Make the cube that represents the ship
        let mut cube = window.add_cube(SHIP_SIZE, SHIP_SIZE, SHIP_SIZE);
        cube.set_color(1.0, 1.0, 1.0);
        cube
    }

    pub fn update_state_by(&mut self, timestep: f64) {
        self.time = f64::max(self.time + timestep, 0.0);
        self.update_scene_objects();
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Point2::new(x, y);
    }

    pub fn camera_focus_next(&mut self) {
        self.camera_focus.next();
        self.fix_camera_zoom();
        self.update_scene_objects();
    }

    pub fn camera_focus_prev(&mut self) {
        self.camera_focus.prev();
        self.fix_camera_zoom();
        self.update_scene_objects();
    }

    pub fn toggle_map(&mut self) {
        self.map_active = !self.map_active;
        info!("Map view {}", if self.map_active { "on" } else { "off" });
    }

    /// Switches between flying the active ship and the tracking station,
    /// where the overlay follows the camera focus instead.
    pub fn switch_focus_source(&mut self) {
        let source = match self.overlay.source() {
            FocusSource::ActiveVessel => FocusSource::CameraTarget,
            FocusSource::CameraTarget => FocusSource::ActiveVessel,
        };
        self.overlay.set_source(source);
        info!("Overlay now follows {}", source_name(source));
    }

    pub fn toggle_setting(&mut self, toggle: SettingToggle) {
        let settings = self.overlay.settings_mut();
        let (name, flag) = match toggle {
            SettingToggle::Time => ("time", &mut settings.show_time),
            SettingToggle::Altitude => ("altitude", &mut settings.show_altitude),
            SettingToggle::Speed => ("speed", &mut settings.show_speed),
            SettingToggle::AngleToPrograde => {
                ("angle to prograde", &mut settings.show_angle_to_prograde)
            }
            SettingToggle::AllowTarget => ("target orbit", &mut settings.allow_target),
        };
        *flag = !*flag;
        info!("Readout {}: {}", name, if *flag { "on" } else { "off" });
    }

    /// Steps the active ship's target through nothing, the other ships, then
    /// every body.
    pub fn cycle_target(&mut self) {
        let ship_id = match self.active_ship {
            Some(id) => id,
            None => return,
        };

        let mut candidates = vec![None];
        candidates.extend(
            self.orrery
                .ships()
                .filter(|s| s.id != ship_id)
                .map(|s| Some(TargetRef::Ship(s.id))),
        );
        candidates.extend(self.orrery.bodies().map(|b| Some(TargetRef::Body(b.id))));

        let current = self.orrery.get_ship(ship_id).and_then(|s| s.target);
        let idx = candidates.iter().position(|c| *c == current).unwrap_or(0);
        let next = candidates[(idx + 1) % candidates.len()];

        self.orrery.set_target(ship_id, next);
        info!("Target: {}", self.target_name(next));
    }

    /// Plans a burn a quarter orbit after the last pending node.
    pub fn add_maneuver_node(&mut self) {
        let ship = match self.active_ship.and_then(|id| self.orrery.get_ship(id)) {
            Some(ship) => ship,
            None => return,
        };
        if !ship.has_solver {
            warn!("{} has no patched conic solver, can't plan a burn", ship.name);
            return;
        }

        let lead = ship
            .orbit
            .orbit()
            .period()
            .map_or(DEFAULT_NODE_LEAD, |period| period / 4.0);
        let last = ship
            .pending_maneuvers(self.time)
            .last()
            .map_or(self.time, |m| m.time);
        let maneuver = Maneuver {
            time: last + lead,
            delta_v: self.node_delta_v,
        };

        info!(
            "Maneuver node for {} in {}",
            ship.name,
            format_duration(maneuver.time - self.time, self.overlay.settings().calendar)
        );
        let id = ship.id;
        self.orrery.add_maneuver(id, maneuver);
    }

    pub fn clear_maneuver_nodes(&mut self) {
        if let Some(id) = self.active_ship {
            self.orrery.clear_maneuvers(id);
            info!("Cleared maneuver nodes");
        }
    }

    fn fix_camera_zoom(&mut self) {
        let dist = match self.camera_focus.point() {
            Some(FocusPoint::Body(id)) => self.orrery.get_body(id).info.radius as f32 * 2.0,
            Some(FocusPoint::Ship(_)) | None => SHIP_SIZE * 2.0,
        };
        self.camera.set_min_distance(dist);
    }

    /// World position the camera is centered on.
    fn focus_position(&self) -> Point3<f64> {
        match self.camera_focus.point() {
            Some(FocusPoint::Body(id)) => self.orrery.body_position(id, self.time),
            Some(FocusPoint::Ship(id)) => self
                .orrery
                .ship_position(id, self.time)
                .unwrap_or_else(Point3::origin),
            None => Point3::origin(),
        }
    }

    fn update_scene_objects(&mut self) {
        // does some nice conversions
        fn set_position_helper(obj: &mut SceneNode, position: Point3<f64>, origin: Point3<f64>) {
            let position: Point3<f32> = nalgebra::convert(Point3::from(position - origin));
            obj.set_local_translation(Translation3::from(position));
        }

        let origin = self.focus_position();
        for (id, sphere) in self.body_spheres.iter_mut() {
            let position = self.orrery.body_position(*id, self.time);
            set_position_helper(sphere, position, origin);
        }

        for (id, cube) in self.ship_objects.iter_mut() {
            if let Some(position) = self.orrery.ship_position(*id, self.time) {
                set_position_helper(cube, position, origin);
            }
        }
    }

    // the big boy
    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        let origin = self.focus_position();
        let projector = FocusedCamera::new(&self.camera, origin);
        let options = FrameOptions {
            active_ship: self.active_ship,
            camera_focus: self.camera_focus.point().map(|point| match point {
                FocusPoint::Body(id) => Focus::Body(id),
                FocusPoint::Ship(id) => Focus::Vessel(id),
            }),
            hit_tolerance: self.overlay.settings().hit_tolerance,
        };
        let frame = MapFrame::build(&self.orrery, self.time, &projector, options);

        let input = FrameInput {
            map_active: self.map_active,
            cursor: self.cursor,
            time: self.time,
            screen_size: Vector2::new(self.camera.width() as f32, self.camera.height() as f32),
        };
        let readout = self.overlay.update(&frame, &input);

        if self.map_active {
            for (_, kind, curves) in frame.ship_curves() {
                let color = match kind {
                    PathKind::FlightPlan => FLIGHT_PLAN_COLOR,
                    PathKind::Patches | PathKind::Orbit => SHIP_PATH_COLOR,
                };
                draw_curves(window, curves, origin, &Point3::from(color));
            }
            for (id, curves) in frame.body_curves() {
                let color = self.orrery.get_body(id).info.color;
                draw_curves(window, curves, origin, &color);
            }
        }

        // Draw text
        let default_font = Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.left_hand_text(),
            &Point2::origin(),
            HUD_FONT_SIZE,
            &default_font,
            &text_color,
        );
        window.draw_text(
            &self.time_summary_text(controller.timestep(), controller.fps()),
            &Point2::new(self.camera.width() as f32 - 600.0, 0.0),
            HUD_FONT_SIZE,
            &default_font,
            &text_color,
        );
        if let Some(readout) = readout {
            window.draw_text(
                &readout.text(),
                &Point2::new(readout.popup.x, readout.popup.y),
                POPUP_FONT_SIZE,
                &default_font,
                &readout.color(),
            );
        }
    }

    fn left_hand_text(&self) -> String {
        let target = self
            .active_ship
            .and_then(|id| self.orrery.get_ship(id))
            .and_then(|ship| ship.target);
        let nodes = self
            .active_ship
            .and_then(|id| self.orrery.get_ship(id))
            .map_or(0, |ship| ship.pending_maneuvers(self.time).len());
        let settings = self.overlay.settings();
        let flag = |on: bool| if on { "on" } else { "off" };

        format!(
            "Focused on: {}
Mode: {}
Map: {}
Target: {}
Nodes: {}
Readout:
    [1] Time: {}
    [2] Altitude: {}
    [3] Speed: {}
    [4] Angle: {}
    [5] Target: {}",
            self.focused_name(),
            source_name(self.overlay.source()),
            flag(self.map_active),
            self.target_name(target),
            nodes,
            flag(settings.show_time),
            flag(settings.show_altitude),
            flag(settings.show_speed),
            flag(settings.show_angle_to_prograde),
            flag(settings.allow_target),
        )
    }

    fn focused_name(&self) -> String {
        match self.camera_focus.point() {
            Some(FocusPoint::Body(id)) => self.orrery.get_body(id).info.name.clone(),
            Some(FocusPoint::Ship(id)) => match self.orrery.get_ship(id) {
                Some(ship) => format!("<Ship> {}", ship.name),
                None => String::from("N/A"),
            },
            None => String::from("N/A"),
        }
    }

    fn target_name(&self, target: Option<TargetRef>) -> String {
        match target {
            None => String::from("none"),
            Some(TargetRef::Body(id)) => self.orrery.get_body(id).info.name.clone(),
            Some(TargetRef::Ship(id)) => self
                .orrery
                .get_ship(id)
                .map_or_else(|| String::from("N/A"), |ship| ship.name.clone()),
        }
    }

    fn time_summary_text(&self, timestep: f64, fps: f64) -> String {
        format!(
            "Time: {}
Timestep: {} s/frame
FPS: {:.0}",
            format_duration(self.time, self.overlay.settings().calendar),
            timestep,
            fps,
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, None, None)
    }
}

fn source_name(source: FocusSource) -> &'static str {
    match source {
        FocusSource::ActiveVessel => "flight",
        FocusSource::CameraTarget => "tracking station",
    }
}

fn draw_curves(
    window: &mut Window,
    curves: &CurveSet<OrreryOrbit>,
    origin: Point3<f64>,
    color: &Point3<f32>,
) {
    let to_focus_space =
        |position: &Point3<f64>| -> Point3<f32> { nalgebra::convert(Point3::from(position - origin)) };

    for curve in curves.curves() {
        for pair in curve.samples().windows(2) {
            let a = to_focus_space(&pair[0].position);
            let b = to_focus_space(&pair[1].position);
            window.draw_line(&a, &b, color);
        }
    }
}
