use std::collections::HashMap;
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use nalgebra::Point3;
use thiserror::Error;

use crate::astro::{Orbit, PointMass};
use crate::model::orrery::{BodyID, BodyInfo, Orrery};

#[derive(Error, Debug)]
pub enum BodyFileError {
    #[error("Could not read body file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: missing field `{field}`")]
    MissingField { line: usize, field: &'static str },
    #[error("Line {line}: bad number {value:?} for `{field}`")]
    BadNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("Line {line}: bad color {value:?}, expected six hex digits")]
    BadColor { line: usize, value: String },
    #[error("Line {line}: parent {parent:?} must be listed before its children")]
    UnknownParent { line: usize, parent: String },
    #[error("Line {line}: only elliptic orbits can be loaded, got eccentricity {ecc}")]
    NotElliptic { line: usize, ecc: f64 },
}

/// Loads bodies from a whitespace separated table. After a header line, each
/// row is `name mu radius color parent`, followed by the orbital elements
/// `a ecc incl lan argp maae` unless the parent is `-`. Angles are in degrees,
/// except the mean anomaly at epoch, which is in radians.
pub fn read_file(path: &Path) -> Result<Orrery, BodyFileError> {
    let text = fs::read_to_string(path)?;
    parse_bodies(&text)
}

pub fn parse_bodies(text: &str) -> Result<Orrery, BodyFileError> {
    let mut orrery = Orrery::new();

    let mut name_to_id: HashMap<&str, BodyID> = HashMap::new();
    let mut name_to_mu: HashMap<&str, f64> = HashMap::new();

    // Read lines, skipping header
    for (idx, line) in text.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let mut row = Row {
            fields: line.split_ascii_whitespace(),
            line: line_no,
        };

        let name = row.next_str("name")?;
        let mu = row.next_f64("mu")?;
        let body_info = BodyInfo {
            name: name.to_owned(),
            mu,
            radius: row.next_f64("radius")?,
            color: parse_color(row.next_str("color")?, line_no)?,
        };

        // Figure out what our orbit is
        let parent = row.next_str("parent")?;

        let id = if parent == "-" {
            orrery.add_fixed_body(body_info)
        } else {
            let (parent_id, parent_mu) = match (name_to_id.get(parent), name_to_mu.get(parent)) {
                (Some(id), Some(mu)) => (*id, *mu),
                _ => {
                    return Err(BodyFileError::UnknownParent {
                        line: line_no,
                        parent: parent.to_owned(),
                    })
                }
            };

            let a = row.next_f64("a")?;
            let ecc = row.next_f64("ecc")?;
            let incl = row.next_f64("incl")?.to_radians();
            let lan = row.next_f64("lan")?.to_radians();
            let argp = row.next_f64("argp")?.to_radians();
            let maae = row.next_f64("maae")?; // already in radians!

            if !(0.0..1.0).contains(&ecc) {
                return Err(BodyFileError::NotElliptic { line: line_no, ecc });
            }

            let orbit =
                Orbit::from_kepler(PointMass::with_mu(parent_mu), (), a, ecc, incl, lan, argp);
            let period = match orbit.period() {
                Some(period) => period,
                None => return Err(BodyFileError::NotElliptic { line: line_no, ecc }),
            };

            // M = 2pi/P (t - t_periapse), evaluated at t = 0
            let time_since_periapsis = maae * period / 2.0 / PI;
            orrery.add_body(body_info, orbit, -time_since_periapsis, parent_id)
        };
        name_to_id.insert(name, id);
        name_to_mu.insert(name, mu);
    }

    Ok(orrery)
}

struct Row<'a> {
    fields: std::str::SplitAsciiWhitespace<'a>,
    line: usize,
}

impl<'a> Row<'a> {
    fn next_str(&mut self, field: &'static str) -> Result<&'a str, BodyFileError> {
        self.fields.next().ok_or(BodyFileError::MissingField {
            line: self.line,
            field,
        })
    }

    fn next_f64(&mut self, field: &'static str) -> Result<f64, BodyFileError> {
        let value = self.next_str(field)?;
        value.parse::<f64>().map_err(|_| BodyFileError::BadNumber {
            line: self.line,
            field,
            value: value.to_owned(),
        })
    }
}

fn parse_color(s: &str, line: usize) -> Result<Point3<f32>, BodyFileError> {
    let bad_color = || BodyFileError::BadColor {
        line,
        value: s.to_owned(),
    };

    if s.len() != 6 || !s.is_ascii() {
        return Err(bad_color());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16)
            .map(|c| c as f32 / 255.0)
            .map_err(|_| bad_color())
    };

    Ok(Point3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SMALL_SYSTEM: &str = "\
name mu radius color parent a ecc incl lan argp maae
Kerbol 1.1723328e18 261600000 ffff00 -
Kerbin 3.5316e12 600000 3366ff Kerbol 13599840256 0 0 0 0 0
# the Mun starts a quarter turn along its orbit
Mun 6.5138398e10 200000 999999 Kerbin 12000000 0 0 0 0 1.5707963267948966
";

    #[test]
    fn test_parse_small_system() {
        let orrery = parse_bodies(SMALL_SYSTEM).unwrap();
        assert_eq!(orrery.bodies().count(), 3);

        let kerbin = orrery.find_body("Kerbin").unwrap();
        let mun = orrery.find_body("Mun").unwrap();
        assert_eq!(orrery.get_parent(mun), Some(kerbin));
        assert_eq!(orrery.get_body(kerbin).info.radius, 600_000.0);
        assert_relative_eq!(orrery.get_body(kerbin).info.color.z, 1.0);

        // A quarter turn from periapsis puts the Mun on +y
        let mun_orbit = orrery.orbit_of_body(mun).unwrap();
        let position = mun_orbit.state_at_time(0.0).position();
        assert_relative_eq!(position.x, 0.0, epsilon = 1.0);
        assert_relative_eq!(position.y, 12_000_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_errors() {
        let unknown = "header\nMun 1 1 ffffff Kerbin 1 0 0 0 0 0\n";
        assert!(matches!(
            parse_bodies(unknown),
            Err(BodyFileError::UnknownParent { line: 2, .. })
        ));

        let short = "header\nKerbol 1 1 ffffff\n";
        assert!(matches!(
            parse_bodies(short),
            Err(BodyFileError::MissingField { field: "parent", .. })
        ));

        let color = "header\nKerbol 1 1 fffzff -\n";
        assert!(matches!(parse_bodies(color), Err(BodyFileError::BadColor { .. })));

        let number = "header\nKerbol lots 1 ffffff -\n";
        assert!(matches!(
            parse_bodies(number),
            Err(BodyFileError::BadNumber { field: "mu", .. })
        ));

        let hyperbolic = "header\nA 1 1 ffffff -\nB 1 1 ffffff A 10 1.5 0 0 0 0\n";
        assert!(matches!(
            parse_bodies(hyperbolic),
            Err(BodyFileError::NotElliptic { line: 3, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = read_file(Path::new("/no/such/bodies.txt")).unwrap_err();
        assert!(matches!(err, BodyFileError::Io(_)));
    }
}
