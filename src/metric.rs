//! The closed set of tracked posture metrics and their severity tiers.

use crate::color::{palette, Rgba};
use std::fmt;
use std::str::FromStr;

/// A tracked posture metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Torso deviation from vertical, hip to neck (degrees).
    TorsoLean,
    /// Head ahead of the neck relative to vertical (degrees).
    HeadForward,
    /// Neck flexion: how far nose, neck and hip are from a straight line (degrees).
    NeckFlex,
    /// Shoulder height difference (% of frame height).
    ShoulderSym,
    /// Horizontal ear-midpoint offset from the neck (% of frame width).
    EarOffset,
}

/// Unit a metric value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Angle in degrees.
    Degrees,
    /// Percentage of a frame dimension.
    Percent,
}

impl Unit {
    /// Suffix used when displaying values.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Degrees => "deg",
            Self::Percent => "%",
        }
    }
}

impl Metric {
    /// Number of metrics.
    pub const COUNT: usize = 5;

    /// All metrics in storage order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::TorsoLean,
        Self::HeadForward,
        Self::NeckFlex,
        Self::ShoulderSym,
        Self::EarOffset,
    ];

    /// Panel row order.
    pub const DISPLAY_ORDER: [Self; Self::COUNT] = [
        Self::TorsoLean,
        Self::NeckFlex,
        Self::HeadForward,
        Self::ShoulderSym,
        Self::EarOffset,
    ];

    /// Configuration key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::TorsoLean => "torso_lean",
            Self::HeadForward => "head_forward",
            Self::NeckFlex => "neck_flex",
            Self::ShoulderSym => "shoulder_sym",
            Self::EarOffset => "ear_offset",
        }
    }

    /// Panel label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TorsoLean => "Torso",
            Self::HeadForward => "Head",
            Self::NeckFlex => "Neck",
            Self::ShoulderSym => "Shoulders",
            Self::EarOffset => "Ear offset",
        }
    }

    /// Display unit.
    #[must_use]
    pub const fn unit(self) -> Unit {
        match self {
            Self::TorsoLean | Self::HeadForward | Self::NeckFlex => Unit::Degrees,
            Self::ShoulderSym | Self::EarOffset => Unit::Percent,
        }
    }

    /// Dense index in `0..COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display string for a value, rounded to whole units (`"12 deg"`).
    #[must_use]
    pub fn format_value(self, value: f32) -> String {
        format!("{value:.0} {}", self.unit().suffix())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| format!("unknown metric '{s}'"))
    }
}

/// Severity tier of a classified metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Within the good range.
    Good,
    /// Above `good_max`, within `warn_max`.
    Warning,
    /// Above `warn_max`.
    Poor,
}

impl Tier {
    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Warning => "Warning",
            Self::Poor => "Poor",
        }
    }

    /// Fixed tier color.
    #[must_use]
    pub const fn color(self) -> Rgba {
        match self {
            Self::Good => palette::GOOD,
            Self::Warning => palette::WARNING,
            Self::Poor => palette::POOR,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.key().parse::<Metric>().unwrap(), metric);
        }
        assert!("leg_angle".parse::<Metric>().is_err());
    }

    #[test]
    fn test_index_is_dense() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }

    #[test]
    fn test_display_order_covers_all() {
        let mut sorted = Metric::DISPLAY_ORDER;
        sorted.sort();
        assert_eq!(sorted, Metric::ALL);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(Metric::NeckFlex.format_value(12.4), "12 deg");
        assert_eq!(Metric::EarOffset.format_value(3.6), "4 %");
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(Tier::Good.color(), palette::GOOD);
        assert_eq!(Tier::Warning.color(), palette::WARNING);
        assert_eq!(Tier::Poor.color(), palette::POOR);
        assert_eq!(Tier::Warning.to_string(), "Warning");
    }
}
