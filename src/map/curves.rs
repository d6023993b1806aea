use nalgebra::{Point2, Point3};

use super::projection::Projector;
use crate::overlay::CastHit;

pub fn path_iter_parametric<F, S, T>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = T>
where
    F: Fn(S) -> T,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

/// A point along an orbit, in the world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub position: Point3<f64>,
    pub time: f64,
}

/// A sampled orbit arc, along with where each sample lands on screen.
#[derive(Debug, Clone)]
pub struct Curve<O> {
    orbit: O,
    samples: Vec<PathSample>,
    screen: Vec<Option<Point2<f32>>>,
}

impl<O> Curve<O> {
    pub fn new<P: Projector + ?Sized>(orbit: O, samples: Vec<PathSample>, projector: &P) -> Self {
        let screen = samples
            .iter()
            .map(|s| projector.project(&s.position))
            .collect();
        Self {
            orbit,
            samples,
            screen,
        }
    }

    pub fn orbit(&self) -> &O {
        &self.orbit
    }

    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    /// Distance from the cursor to the nearest point of the drawn curve,
    /// along with that point and its time.
    fn nearest(&self, cursor: Point2<f32>) -> Option<(f32, Point2<f32>, f64)> {
        let mut best: Option<(f32, Point2<f32>, f64)> = None;

        for i in 1..self.samples.len() {
            // A vertex that didn't project breaks the line
            let (a, b) = match (self.screen[i - 1], self.screen[i]) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };

            let (u, point) = nearest_on_segment(cursor, a, b);
            let distance = (cursor - point).norm();
            if best.map_or(true, |(d, _, _)| distance < d) {
                let t0 = self.samples[i - 1].time;
                let t1 = self.samples[i].time;
                best = Some((distance, point, t0 + f64::from(u) * (t1 - t0)));
            }
        }

        best
    }
}

/// Returns how far along the segment the nearest point to `p` is (0 to 1),
/// and that point.
fn nearest_on_segment(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> (f32, Point2<f32>) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < f32::EPSILON {
        return (0.0, a);
    }

    // Project point onto line, clamped to segment
    let u = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (u, a + ab * u)
}

/// All the curves drawn for one object.
#[derive(Debug, Clone)]
pub struct CurveSet<O> {
    curves: Vec<Curve<O>>,
}

impl<O> Default for CurveSet<O> {
    fn default() -> Self {
        Self { curves: vec![] }
    }
}

impl<O> CurveSet<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, curve: Curve<O>) {
        self.curves.push(curve);
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn curves(&self) -> &[Curve<O>] {
        &self.curves
    }
}

impl<O: Clone> CurveSet<O> {
    /// Finds the point of these curves closest to the cursor, as long as it's
    /// within `tolerance` pixels.
    pub fn cast(&self, cursor: Point2<f32>, tolerance: f32) -> Option<CastHit<O>> {
        let mut best: Option<(f32, &Curve<O>, Point2<f32>, f64)> = None;
        for curve in &self.curves {
            if let Some((distance, point, time)) = curve.nearest(cursor) {
                if distance <= tolerance && best.map_or(true, |(d, ..)| distance < d) {
                    best = Some((distance, curve, point, time));
                }
            }
        }

        best.map(|(_, curve, screen_point, time)| CastHit {
            orbit: curve.orbit.clone(),
            screen_point,
            time,
        })
    }
}
