//! Closed pattern vocabularies resolved once at ingestion.
//!
//! Detection tags and ring pattern types arrive as free text. They are matched
//! against the fixed precedence (cycle, fan-in, fan-out, shell, high velocity)
//! here and nowhere else; the rest of the crate only sees these enums.

use serde::{Deserialize, Serialize};

pub const CYCLE_COLOR: &str = "#e11d48";
pub const FAN_IN_COLOR: &str = "#f97316";
pub const FAN_OUT_COLOR: &str = "#eab308";
pub const SHELL_COLOR: &str = "#84cc16";
pub const HIGH_VELOCITY_COLOR: &str = "#8b5cf6";
pub const NORMAL_COLOR: &str = "#94a3b8";
pub const UNKNOWN_COLOR: &str = "#64748b";

/// A single detection tag attached to a suspicious account.
///
/// Variant order is the classification precedence: a lower variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternTag {
    Cycle,
    FanIn,
    FanOut,
    Shell,
    HighVelocity,
    Other,
}

impl PatternTag {
    /// Resolve a raw tag such as `cycle_length_3` or `fan_in`.
    ///
    /// Cycle and shell match as substrings; fan-in, fan-out and high velocity
    /// require the exact tag.
    pub fn from_tag(tag: &str) -> Self {
        if tag.contains("cycle") {
            PatternTag::Cycle
        } else if tag == "fan_in" {
            PatternTag::FanIn
        } else if tag == "fan_out" {
            PatternTag::FanOut
        } else if tag.contains("shell") {
            PatternTag::Shell
        } else if tag == "high_velocity" {
            PatternTag::HighVelocity
        } else {
            PatternTag::Other
        }
    }

    /// Highest-precedence tag in a set, if any tag is recognised.
    pub fn strongest<'a, I>(tags: I) -> Option<PatternTag>
    where
        I: IntoIterator<Item = &'a PatternTag>,
    {
        tags.into_iter()
            .copied()
            .filter(|tag| *tag != PatternTag::Other)
            .min()
    }
}

/// Topology declared by a fraud ring's `pattern_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingPattern {
    Cycle,
    FanIn,
    FanOut,
    Shell,
    /// `mixed` or anything unrecognised.
    Unknown,
}

impl RingPattern {
    /// Case-insensitive substring match against the known topologies.
    pub fn from_pattern_type(pattern_type: &str) -> Self {
        let pattern = pattern_type.to_lowercase();
        if pattern.contains("cycle") {
            RingPattern::Cycle
        } else if pattern.contains("fan_in") {
            RingPattern::FanIn
        } else if pattern.contains("fan_out") {
            RingPattern::FanOut
        } else if pattern.contains("shell") {
            RingPattern::Shell
        } else {
            RingPattern::Unknown
        }
    }

    /// Pattern carried by edges synthesized for this ring.
    pub fn link_pattern(self) -> LinkPattern {
        match self {
            RingPattern::Cycle => LinkPattern::Cycle,
            RingPattern::FanIn => LinkPattern::FanIn,
            RingPattern::FanOut => LinkPattern::FanOut,
            RingPattern::Shell => LinkPattern::Shell,
            RingPattern::Unknown => LinkPattern::Unknown,
        }
    }

    /// Display category of the ring as a whole. Rings are always flagged.
    pub fn category(self) -> PatternCategory {
        match self {
            RingPattern::Cycle => PatternCategory::Cycle,
            RingPattern::FanIn => PatternCategory::FanIn,
            RingPattern::FanOut => PatternCategory::FanOut,
            RingPattern::Shell => PatternCategory::Shell,
            RingPattern::Unknown => PatternCategory::Suspicious,
        }
    }
}

/// Classification assigned to every graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternCategory {
    Normal,
    Cycle,
    #[serde(rename = "Fan-in")]
    FanIn,
    #[serde(rename = "Fan-out")]
    FanOut,
    Shell,
    #[serde(rename = "High Velocity")]
    HighVelocity,
    Suspicious,
}

impl PatternCategory {
    /// Apply the precedence rules to a node's resolved tags.
    pub fn classify(tags: &[PatternTag], is_suspicious: bool) -> Self {
        match PatternTag::strongest(tags) {
            Some(PatternTag::Cycle) => PatternCategory::Cycle,
            Some(PatternTag::FanIn) => PatternCategory::FanIn,
            Some(PatternTag::FanOut) => PatternCategory::FanOut,
            Some(PatternTag::Shell) => PatternCategory::Shell,
            Some(PatternTag::HighVelocity) => PatternCategory::HighVelocity,
            _ if is_suspicious => PatternCategory::Suspicious,
            _ => PatternCategory::Normal,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PatternCategory::Normal => NORMAL_COLOR,
            PatternCategory::Cycle => CYCLE_COLOR,
            PatternCategory::FanIn => FAN_IN_COLOR,
            PatternCategory::FanOut => FAN_OUT_COLOR,
            PatternCategory::Shell => SHELL_COLOR,
            PatternCategory::HighVelocity => HIGH_VELOCITY_COLOR,
            PatternCategory::Suspicious => CYCLE_COLOR,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PatternCategory::Normal => "⚪",
            PatternCategory::Cycle => "🔄",
            PatternCategory::FanIn => "📥",
            PatternCategory::FanOut => "📤",
            PatternCategory::Shell => "🐚",
            PatternCategory::HighVelocity => "⚡",
            PatternCategory::Suspicious => "⚠️",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PatternCategory::Normal => "Normal",
            PatternCategory::Cycle => "Cycle",
            PatternCategory::FanIn => "Fan-in",
            PatternCategory::FanOut => "Fan-out",
            PatternCategory::Shell => "Shell",
            PatternCategory::HighVelocity => "High Velocity",
            PatternCategory::Suspicious => "Suspicious",
        }
    }
}

/// Pattern carried by a graph link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPattern {
    Cycle,
    FanIn,
    FanOut,
    Shell,
    Normal,
    Unknown,
}

impl LinkPattern {
    /// Link pattern for an explicit edge, from the union of both endpoints' tags.
    ///
    /// Only the four topologies colour an edge; anything else is `Normal`.
    pub fn from_tags<'a, I>(tags: I) -> Self
    where
        I: IntoIterator<Item = &'a PatternTag>,
    {
        match PatternTag::strongest(tags) {
            Some(PatternTag::Cycle) => LinkPattern::Cycle,
            Some(PatternTag::FanIn) => LinkPattern::FanIn,
            Some(PatternTag::FanOut) => LinkPattern::FanOut,
            Some(PatternTag::Shell) => LinkPattern::Shell,
            _ => LinkPattern::Normal,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            LinkPattern::Cycle => CYCLE_COLOR,
            LinkPattern::FanIn => FAN_IN_COLOR,
            LinkPattern::FanOut => FAN_OUT_COLOR,
            LinkPattern::Shell => SHELL_COLOR,
            LinkPattern::Normal => NORMAL_COLOR,
            LinkPattern::Unknown => UNKNOWN_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(raw: &[&str]) -> Vec<PatternTag> {
        raw.iter().map(|t| PatternTag::from_tag(t)).collect()
    }

    #[test]
    fn test_tag_resolution() {
        assert_eq!(PatternTag::from_tag("cycle_length_3"), PatternTag::Cycle);
        assert_eq!(PatternTag::from_tag("fan_in"), PatternTag::FanIn);
        assert_eq!(PatternTag::from_tag("fan_in_burst"), PatternTag::Other);
        assert_eq!(PatternTag::from_tag("layered_shell"), PatternTag::Shell);
        assert_eq!(PatternTag::from_tag("high_velocity"), PatternTag::HighVelocity);
        assert_eq!(PatternTag::from_tag("two_hop_exposure"), PatternTag::Other);
    }

    #[test]
    fn test_category_precedence() {
        let mixed = tags(&["layered_shell", "fan_out", "cycle_length_4"]);
        assert_eq!(PatternCategory::classify(&mixed, true), PatternCategory::Cycle);

        let fans = tags(&["fan_out", "fan_in"]);
        assert_eq!(PatternCategory::classify(&fans, true), PatternCategory::FanIn);

        let velocity = tags(&["high_velocity", "layered_shell"]);
        assert_eq!(PatternCategory::classify(&velocity, true), PatternCategory::Shell);

        let only_velocity = tags(&["high_velocity"]);
        assert_eq!(
            PatternCategory::classify(&only_velocity, true),
            PatternCategory::HighVelocity
        );
    }

    #[test]
    fn test_category_fallbacks() {
        let other = tags(&["two_hop_exposure"]);
        assert_eq!(PatternCategory::classify(&other, true), PatternCategory::Suspicious);
        assert_eq!(PatternCategory::classify(&[], false), PatternCategory::Normal);
    }

    #[test]
    fn test_ring_pattern_is_case_insensitive_substring() {
        assert_eq!(RingPattern::from_pattern_type("CYCLE_LENGTH_3"), RingPattern::Cycle);
        assert_eq!(RingPattern::from_pattern_type("Fan_In"), RingPattern::FanIn);
        assert_eq!(RingPattern::from_pattern_type("smurf_fan_out"), RingPattern::FanOut);
        assert_eq!(RingPattern::from_pattern_type("layered_shell"), RingPattern::Shell);
        assert_eq!(RingPattern::from_pattern_type("mixed"), RingPattern::Unknown);
    }

    #[test]
    fn test_legend_colors() {
        assert_eq!(PatternCategory::Cycle.color(), "#e11d48");
        assert_eq!(PatternCategory::FanIn.color(), "#f97316");
        assert_eq!(PatternCategory::FanOut.color(), "#eab308");
        assert_eq!(PatternCategory::Shell.color(), "#84cc16");
        assert_eq!(PatternCategory::Normal.color(), "#94a3b8");
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&PatternCategory::HighVelocity).unwrap();
        assert_eq!(json, "\"High Velocity\"");
        let json = serde_json::to_string(&LinkPattern::FanOut).unwrap();
        assert_eq!(json, "\"fan_out\"");
    }
}
