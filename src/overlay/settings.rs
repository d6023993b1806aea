use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const ENV_PREFIX: &str = "ORBIT_READOUT";

/// Which calendar durations are broken down with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Calendar {
    /// 6 hour days, 426 day years
    #[default]
    Kerbin,
    /// 24 hour days, 365 day years
    Earth,
}

impl Calendar {
    pub fn hours_per_day(self) -> u64 {
        match self {
            Calendar::Kerbin => 6,
            Calendar::Earth => 24,
        }
    }

    pub fn days_per_year(self) -> u64 {
        match self {
            Calendar::Kerbin => 426,
            Calendar::Earth => 365,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub show_time: bool,
    pub show_altitude: bool,
    pub show_speed: bool,
    pub show_angle_to_prograde: bool,
    /// Whether the focus's target is hovered when the focus itself isn't.
    pub allow_target: bool,
    /// Side of the popup, in pixels.
    pub display_width: f32,
    /// How far from a curve, in pixels, the cursor still counts as on it.
    pub hit_tolerance: f32,
    pub calendar: Calendar,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_time: true,
            show_altitude: true,
            show_speed: true,
            show_angle_to_prograde: true,
            allow_target: true,
            display_width: 160.0,
            hit_tolerance: 8.0,
            calendar: Calendar::Kerbin,
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("display_width must be positive, got {0}")]
    DisplayWidth(f32),
    #[error("hit_tolerance must not be negative, got {0}")]
    HitTolerance(f32),
}

impl OverlaySettings {
    /// Reads settings from a TOML file, with `ORBIT_READOUT_*` environment
    /// variables taking precedence. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let s = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let settings: Self = s.try_deserialize()?;
        settings.validate()
    }

    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;

        let settings: Self = s.try_deserialize()?;
        settings.validate()
    }

    fn validate(self) -> Result<Self, SettingsError> {
        if !(self.display_width > 0.0) {
            return Err(SettingsError::DisplayWidth(self.display_width));
        }
        if !(self.hit_tolerance >= 0.0) {
            return Err(SettingsError::HitTolerance(self.hit_tolerance));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::{env, fs};

    use super::*;

    #[test]
    fn test_empty_is_default() {
        let settings = OverlaySettings::from_toml("").unwrap();
        assert_eq!(settings, OverlaySettings::default());
    }

    #[test]
    fn test_partial_file() {
        let settings = OverlaySettings::from_toml(
            "show_speed = false\ndisplay_width = 220.0\ncalendar = \"earth\"\n",
        )
        .unwrap();

        assert!(!settings.show_speed);
        assert!(settings.show_time);
        assert_eq!(settings.display_width, 220.0);
        assert_eq!(settings.calendar, Calendar::Earth);
        assert_eq!(settings.hit_tolerance, 8.0);
    }

    #[test]
    fn test_validation() {
        let err = OverlaySettings::from_toml("display_width = 0.0").unwrap_err();
        assert!(matches!(err, SettingsError::DisplayWidth(_)));

        let err = OverlaySettings::from_toml("hit_tolerance = -1.0").unwrap_err();
        assert!(matches!(err, SettingsError::HitTolerance(_)));

        let err = OverlaySettings::from_toml("show_time = \"maybe\"").unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));
    }

    // Tests that read or write ORBIT_READOUT_* variables take this first
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_missing_file_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = std::env::temp_dir().join("orbit-readout-no-such-settings.toml");
        let settings = OverlaySettings::load(&path).unwrap();
        assert_eq!(settings.display_width, 160.0);
    }

    #[test]
    fn test_environment_beats_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = std::env::temp_dir().join(format!(
            "orbit-readout-settings-{}.toml",
            std::process::id()
        ));
        fs::write(
            &path,
            "show_speed = true\ndisplay_width = 220.0\ncalendar = \"earth\"\n",
        )
        .unwrap();

        env::set_var("ORBIT_READOUT_SHOW_SPEED", "false");
        env::set_var("ORBIT_READOUT_DISPLAY_WIDTH", "200");
        let result = OverlaySettings::load(&path);
        env::remove_var("ORBIT_READOUT_SHOW_SPEED");
        env::remove_var("ORBIT_READOUT_DISPLAY_WIDTH");
        fs::remove_file(&path).unwrap();

        let settings = result.unwrap();
        assert!(!settings.show_speed);
        assert_eq!(settings.display_width, 200.0);
        // Keys the environment leaves alone still come from the file
        assert_eq!(settings.calendar, Calendar::Earth);
        assert!(settings.show_time);
    }

    #[test]
    fn test_calendars() {
        assert_eq!(Calendar::Kerbin.hours_per_day(), 6);
        assert_eq!(Calendar::Earth.days_per_year(), 365);
    }
}
