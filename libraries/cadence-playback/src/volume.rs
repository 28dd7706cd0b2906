//! Volume control with mute memory
//!
//! Volume is a linear level in `[0, 1]` handed straight to the sinks (media
//! elements apply their own curve). Muting is "volume 0" rather than a
//! separate flag, so a user dragging the slider to zero is muted too.

use crate::types::DEFAULT_VOLUME;

/// Global volume shared by every sink
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Current level (0.0-1.0)
    level: f64,

    /// Last nonzero level, restored by unmute
    last_non_zero: f64,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume, clamped to `[0, 1]`
    pub fn new(level: f64) -> Self {
        let mut volume = Self {
            level: DEFAULT_VOLUME,
            last_non_zero: DEFAULT_VOLUME,
        };
        volume.set_level(level);
        volume
    }

    /// Set volume level, clamping to `[0, 1]` (NaN counts as 0)
    ///
    /// Returns the applied level.
    pub fn set_level(&mut self, level: f64) -> f64 {
        self.level = Self::clamp(level);
        if self.level > 0.0 {
            self.last_non_zero = self.level;
        }
        self.level
    }

    /// Current level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Level that unmute restores
    pub fn last_non_zero(&self) -> f64 {
        self.last_non_zero
    }

    /// Whether the level is zero
    pub fn is_muted(&self) -> bool {
        self.level == 0.0
    }

    /// Toggle mute
    ///
    /// Audible → remember the level and go silent. Silent → restore the last
    /// nonzero level (0.8 if there never was one). Returns the new level.
    pub fn toggle_mute(&mut self) -> f64 {
        if self.level > 0.0 {
            self.last_non_zero = self.level;
            self.level = 0.0;
        } else {
            self.level = self.last_non_zero;
        }
        self.level
    }

    fn clamp(level: f64) -> f64 {
        if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.5);
        assert_eq!(vol.level(), 0.5);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::default();

        assert_eq!(vol.set_level(1.5), 1.0);
        assert_eq!(vol.set_level(-0.2), 0.0);
        assert_eq!(vol.set_level(f64::NAN), 0.0);
    }

    #[test]
    fn mute_round_trip() {
        let mut vol = Volume::new(0.6);

        assert_eq!(vol.toggle_mute(), 0.0);
        assert!(vol.is_muted());

        assert_eq!(vol.toggle_mute(), 0.6);
        assert!(!vol.is_muted());
    }

    #[test]
    fn unmute_after_slider_to_zero_restores_previous_level() {
        let mut vol = Volume::new(0.3);
        vol.set_level(0.0);

        assert_eq!(vol.toggle_mute(), 0.3);
    }

    #[test]
    fn unmute_without_history_uses_default() {
        let mut vol = Volume::new(0.0);
        assert_eq!(vol.toggle_mute(), 0.8);
    }

    #[test]
    fn zero_does_not_overwrite_memory() {
        let mut vol = Volume::new(0.7);
        vol.set_level(0.0);
        assert_eq!(vol.last_non_zero(), 0.7);

        vol.set_level(0.2);
        assert_eq!(vol.last_non_zero(), 0.2);
    }
}
