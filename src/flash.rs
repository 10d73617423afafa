// SPDX-License-Identifier: GPL-3.0-only

//! Flash selection and LED flash control via Linux sysfs
//!
//! Flash LEDs are exposed at `/sys/class/leds/*:flash`. They are driven in
//! torch mode through the `brightness` file, which is group-writable by
//! `feedbackd` on phones, avoiding the root-only `flash_strobe` interface.
//! Cameras without an LED (laptops, front cameras) fall back to a screen
//! flash drawn by the UI.

use crate::backends::camera::Facing;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default sysfs directory holding LED class devices
pub const SYSFS_LEDS: &str = "/sys/class/leds";

/// Flash selection for the next capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashMode {
    /// Capture without flash
    #[default]
    Off,
    /// Fire the flash during capture
    On,
}

impl FlashMode {
    /// Flip Off <-> On
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == FlashMode::On
    }
}

/// How a flash capture is lit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashStrategy {
    /// No flash
    None,
    /// Light the sysfs LED during capture
    Led,
    /// White full-screen overlay before capture
    Screen,
}

impl FlashStrategy {
    /// LEDs only sit next to the back lens; everything else uses the screen
    pub fn select(flash: FlashMode, facing: Facing, has_led: bool) -> Self {
        match (flash, facing) {
            (FlashMode::Off, _) => FlashStrategy::None,
            (FlashMode::On, Facing::Back) if has_led => FlashStrategy::Led,
            (FlashMode::On, _) => FlashStrategy::Screen,
        }
    }
}

/// A writable flash LED
#[derive(Debug, Clone)]
pub struct FlashDevice {
    /// Sysfs path, e.g. `/sys/class/leds/white:flash`
    path: PathBuf,
    /// Value of `max_brightness`
    max_brightness: u32,
    /// Directory basename
    name: String,
}

impl FlashDevice {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full brightness
    pub fn on(&self) -> io::Result<()> {
        self.set_brightness(self.max_brightness)
    }

    pub fn off(&self) -> io::Result<()> {
        self.set_brightness(0)
    }

    fn set_brightness(&self, value: u32) -> io::Result<()> {
        let clamped = value.min(self.max_brightness);
        std::fs::write(self.path.join("brightness"), clamped.to_string())
    }
}

/// Result of flash LED discovery
#[derive(Debug, Clone, Default)]
pub struct FlashHardware {
    /// LEDs we can drive
    pub devices: Vec<FlashDevice>,
}

impl FlashHardware {
    /// Scan the system LED directory
    pub fn detect() -> Self {
        Self::detect_in(Path::new(SYSFS_LEDS))
    }

    /// Scan `leds_dir` for `*:flash` entries
    pub fn detect_in(leds_dir: &Path) -> Self {
        let Ok(entries) = std::fs::read_dir(leds_dir) else {
            info!(dir = %leds_dir.display(), "No LED class directory, flash LEDs unavailable");
            return Self::default();
        };

        let mut hardware = Self::default();

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            // Entries look like "white:flash", "yellow:flash"
            if !name.ends_with(":flash") {
                continue;
            }

            let led_path = entry.path();
            let max_brightness_path = led_path.join("max_brightness");

            let max_brightness = match std::fs::read_to_string(&max_brightness_path)
                .map(|s| s.trim().parse::<u32>())
            {
                Ok(Ok(value)) if value > 0 => value,
                Ok(_) => {
                    warn!(path = %max_brightness_path.display(), "Invalid max_brightness value");
                    continue;
                }
                Err(e) => {
                    warn!(path = %max_brightness_path.display(), error = %e, "Cannot read max_brightness");
                    continue;
                }
            };

            let writable = std::fs::OpenOptions::new()
                .write(true)
                .open(led_path.join("brightness"))
                .is_ok();

            if writable {
                info!(name, max_brightness, "Discovered flash LED");
                hardware.devices.push(FlashDevice {
                    path: led_path,
                    max_brightness,
                    name: name.to_string(),
                });
            } else {
                warn!(name, "Flash LED found but not writable (missing 'feedbackd' group?)");
            }
        }

        // Deterministic order (white before yellow)
        hardware.devices.sort_by(|a, b| a.name.cmp(&b.name));
        hardware
    }

    pub fn has_devices(&self) -> bool {
        !self.devices.is_empty()
    }

    pub fn all_on(&self) {
        for dev in &self.devices {
            if let Err(e) = dev.on() {
                warn!(device = %dev.name, error = %e, "Failed to turn on flash LED");
            }
        }
    }

    pub fn all_off(&self) {
        for dev in &self.devices {
            if let Err(e) = dev.off() {
                warn!(device = %dev.name, error = %e, "Failed to turn off flash LED");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_leds_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snapcam-leds-{}", uuid::Uuid::new_v4()));
        let led = dir.join("white:flash");
        std::fs::create_dir_all(&led).unwrap();
        std::fs::write(led.join("max_brightness"), "255\n").unwrap();
        std::fs::write(led.join("brightness"), "0\n").unwrap();
        // Not a flash LED
        let other = dir.join("input0::capslock");
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(other.join("max_brightness"), "1\n").unwrap();
        dir
    }

    #[test]
    fn test_flash_mode_toggles() {
        assert_eq!(FlashMode::default(), FlashMode::Off);
        assert_eq!(FlashMode::Off.toggled(), FlashMode::On);
        assert_eq!(FlashMode::On.toggled(), FlashMode::Off);
    }

    #[test]
    fn test_strategy_selection() {
        use Facing::*;
        assert_eq!(FlashStrategy::select(FlashMode::Off, Back, true), FlashStrategy::None);
        assert_eq!(FlashStrategy::select(FlashMode::On, Back, true), FlashStrategy::Led);
        assert_eq!(FlashStrategy::select(FlashMode::On, Back, false), FlashStrategy::Screen);
        assert_eq!(FlashStrategy::select(FlashMode::On, Front, true), FlashStrategy::Screen);
    }

    #[test]
    fn test_detect_only_flash_leds() {
        let dir = fake_leds_dir();
        let hardware = FlashHardware::detect_in(&dir);
        assert_eq!(hardware.devices.len(), 1);
        assert_eq!(hardware.devices[0].name(), "white:flash");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_on_writes_max_brightness() {
        let dir = fake_leds_dir();
        let hardware = FlashHardware::detect_in(&dir);
        hardware.all_on();
        let value = std::fs::read_to_string(dir.join("white:flash/brightness")).unwrap();
        assert_eq!(value, "255");
        hardware.all_off();
        let value = std::fs::read_to_string(dir.join("white:flash/brightness")).unwrap();
        assert_eq!(value, "0");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_directory_yields_no_devices() {
        let hardware = FlashHardware::detect_in(Path::new("/nonexistent/snapcam/leds"));
        assert!(!hardware.has_devices());
    }
}
