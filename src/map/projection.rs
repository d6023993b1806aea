use nalgebra::{Point2, Point3, Vector2};

/// Maps points in the world onto the screen.
pub trait Projector {
    /// Pixel coordinates of the point, measured from the top-left corner of
    /// the window, or `None` if the point can't be seen (e.g. it's behind
    /// the camera).
    fn project(&self, point: &Point3<f64>) -> Option<Point2<f32>>;
}

/// An orthographic view straight down the z-axis, with +y pointing up the
/// screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopDown {
    /// World point shown at the center of the screen.
    pub center: Point3<f64>,
    pub meters_per_pixel: f64,
    pub screen_size: Vector2<f32>,
}

impl TopDown {
    pub fn new(center: Point3<f64>, meters_per_pixel: f64, screen_size: Vector2<f32>) -> Self {
        Self {
            center,
            meters_per_pixel,
            screen_size,
        }
    }
}

impl Projector for TopDown {
    fn project(&self, point: &Point3<f64>) -> Option<Point2<f32>> {
        let offset = (point - self.center) / self.meters_per_pixel;
        if !offset.x.is_finite() || !offset.y.is_finite() {
            return None;
        }

        let x = self.screen_size.x / 2.0 + offset.x as f32;
        let y = self.screen_size.y / 2.0 - offset.y as f32;
        Some(Point2::new(x, y))
    }
}
