use nalgebra::{Point2, Point3, Vector2};

use super::hit_test::HitResult;
use super::sample::DisplayFields;
use super::settings::Calendar;

/// Most units a duration is broken into, e.g. `1y 2d 3h 4m 5s`.
pub const DURATION_UNITS: usize = 5;

pub const PRIMARY_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
// Cyan
pub const SECONDARY_COLOR: [f32; 3] = [0.0, 1.0, 1.0];

/// Axis-aligned rectangle in pixels; `x` and `y` are the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn with_center(self, center: Point2<f32>) -> Self {
        Self {
            x: center.x - self.width / 2.0,
            y: center.y - self.height / 2.0,
            ..self
        }
    }

    /// Slides the rectangle onto a screen of the given size. One that is too
    /// big is pinned to the top-left corner.
    pub fn clamped_to(self, screen_size: Vector2<f32>) -> Self {
        Self {
            x: self.x.min(screen_size.x - self.width).max(0.0),
            y: self.y.min(screen_size.y - self.height).max(0.0),
            ..self
        }
    }
}

/// Everything the renderer needs to draw one frame's popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    /// The hovered point on the curve.
    pub anchor: Point2<f32>,
    pub popup: Rect,
    pub fields: DisplayFields,
    pub lines: Vec<String>,
    pub is_secondary: bool,
}

impl Readout {
    pub fn layout<O>(
        hit: &HitResult<O>,
        fields: DisplayFields,
        popup: Rect,
        screen_size: Vector2<f32>,
        calendar: Calendar,
    ) -> Self {
        Self {
            anchor: hit.screen_point,
            popup: popup.with_center(hit.screen_point).clamped_to(screen_size),
            fields,
            lines: label_lines(&fields, calendar),
            is_secondary: hit.is_secondary,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn color(&self) -> Point3<f32> {
        if self.is_secondary {
            Point3::from(SECONDARY_COLOR)
        } else {
            Point3::from(PRIMARY_COLOR)
        }
    }
}

pub fn label_lines(fields: &DisplayFields, calendar: Calendar) -> Vec<String> {
    let mut lines = vec![];
    if let Some(t) = fields.time_remaining {
        lines.push(format!("T: {}", format_duration(t, calendar)));
    }
    if let Some(alt) = fields.altitude {
        lines.push(format!("Alt: {}m", format_grouped(alt)));
    }
    if let Some(speed) = fields.speed {
        lines.push(format!("Vel: {}m/s", format_grouped(speed)));
    }
    if let Some(angle) = fields.angle_to_prograde {
        lines.push(format!("\u{03B1}P: {:.1}\u{00B0}", angle));
    }
    lines
}

/// Signed duration in whole seconds, largest units first, e.g. `-2d 3h 0m 5s`.
/// Leading zero units are left out.
pub fn format_duration(seconds: f64, calendar: Calendar) -> String {
    if !seconds.is_finite() {
        return String::from("?");
    }

    let total = seconds.abs().floor() as u64;
    if total == 0 {
        return String::from("0s");
    }

    let minute = 60;
    let hour = 60 * minute;
    let day = calendar.hours_per_day() * hour;
    let year = calendar.days_per_year() * day;

    let units = [
        (total / year, "y"),
        (total % year / day, "d"),
        (total % day / hour, "h"),
        (total % hour / minute, "m"),
        (total % minute, "s"),
    ];

    let parts: Vec<String> = units
        .iter()
        .skip_while(|(n, _)| *n == 0)
        .take(DURATION_UNITS)
        .map(|(n, suffix)| format!("{}{}", n, suffix))
        .collect();

    let sign = if seconds < 0.0 { '-' } else { '+' };
    format!("{}{}", sign, parts.join(" "))
}

/// Rounds to an integer and separates thousands with commas.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return String::from("?");
    }

    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
