//! Confidence representation for condition assessments.
//!
//! The inference service reports confidence either as a numeric percentage
//! or as a discrete risk category. Both collapse into `Confidence` at the
//! service boundary so ranking and rendering never re-inspect raw payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Percentage;

/// Discrete risk category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    /// A category outside the known scale; ranks with the lowest tier.
    Other(String),
}

impl RiskLevel {
    /// Parses a service category, case-insensitively.
    ///
    /// Accepts `medium` and `moderate` as the same tier and tolerates
    /// `very high`, `very_high` and `very-high`.
    pub fn parse(raw: &str) -> Self {
        let normalised: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();
        let normalised = normalised.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalised.as_str() {
            "low" => Self::Low,
            "medium" | "moderate" => Self::Medium,
            "high" => Self::High,
            "very high" => Self::VeryHigh,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Severity rank: very high > high > medium > low = unranked.
    pub fn severity(&self) -> u8 {
        match self {
            Self::VeryHigh => 3,
            Self::High => 2,
            Self::Medium => 1,
            Self::Low | Self::Other(_) => 0,
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Confidence attached to a condition assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Confidence {
    /// Numeric 0-100 confidence.
    Percent(Percentage),
    /// Discrete risk category.
    Level(RiskLevel),
    /// The record carried neither representation.
    Unrated,
}

impl Confidence {
    /// Resolves the service's optional fields into one representation.
    ///
    /// `confidence_percentage` wins over `confidence`; a numeric value wins
    /// over `risk_level`; nothing usable yields `Unrated`.
    pub fn resolve(
        confidence_percentage: Option<f64>,
        confidence: Option<f64>,
        risk_level: Option<&str>,
    ) -> Self {
        let numeric = confidence_percentage
            .and_then(Percentage::from_score)
            .or_else(|| confidence.and_then(Percentage::from_score));
        if let Some(pct) = numeric {
            return Self::Percent(pct);
        }
        match risk_level.map(str::trim).filter(|s| !s.is_empty()) {
            Some(level) => Self::Level(RiskLevel::parse(level)),
            None => Self::Unrated,
        }
    }

    /// Numeric value, if this is a percentage.
    pub fn percent(&self) -> Option<Percentage> {
        match self {
            Self::Percent(p) => Some(*p),
            _ => None,
        }
    }

    /// Numeric value, falling back to zero for non-numeric records.
    pub fn percent_or_zero(&self) -> Percentage {
        self.percent().unwrap_or(Percentage::ZERO)
    }

    /// Severity rank, falling back to the lowest tier for non-categorical records.
    pub fn severity_or_lowest(&self) -> u8 {
        match self {
            Self::Level(level) => level.severity(),
            _ => 0,
        }
    }

    /// Returns true for numeric confidence.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Percent(_))
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{}", p),
            Self::Level(level) => write!(f, "{} risk", level),
            Self::Unrated => write!(f, "unrated"),
        }
    }
}

/// Risk band derived from numeric confidence, as shown on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskBand {
    High,
    Moderate,
    LowModerate,
    Low,
}

impl RiskBand {
    /// Band for a numeric confidence: >=80 high, >=60 moderate, >=40 low-moderate.
    pub fn for_percentage(pct: Percentage) -> Self {
        match pct.value() {
            80..=100 => Self::High,
            60..=79 => Self::Moderate,
            40..=59 => Self::LowModerate,
            _ => Self::Low,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Moderate => "Moderate Risk",
            Self::LowModerate => "Low-Moderate Risk",
            Self::Low => "Low Risk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod risk_level {
        use super::*;

        #[test]
        fn parses_known_categories_case_insensitively() {
            assert_eq!(RiskLevel::parse("LOW"), RiskLevel::Low);
            assert_eq!(RiskLevel::parse("Moderate"), RiskLevel::Medium);
            assert_eq!(RiskLevel::parse("medium"), RiskLevel::Medium);
            assert_eq!(RiskLevel::parse("High"), RiskLevel::High);
            assert_eq!(RiskLevel::parse("Very High"), RiskLevel::VeryHigh);
            assert_eq!(RiskLevel::parse("very_high"), RiskLevel::VeryHigh);
            assert_eq!(RiskLevel::parse(" very-high "), RiskLevel::VeryHigh);
        }

        #[test]
        fn unknown_category_is_kept_verbatim() {
            assert_eq!(
                RiskLevel::parse("Elevated"),
                RiskLevel::Other("Elevated".to_string())
            );
        }

        #[test]
        fn severity_orders_scale() {
            assert!(RiskLevel::VeryHigh.severity() > RiskLevel::High.severity());
            assert!(RiskLevel::High.severity() > RiskLevel::Medium.severity());
            assert!(RiskLevel::Medium.severity() > RiskLevel::Low.severity());
            assert_eq!(RiskLevel::Other("x".into()).severity(), RiskLevel::Low.severity());
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn prefers_confidence_percentage() {
            let c = Confidence::resolve(Some(64.0), Some(20.0), Some("low"));
            assert_eq!(c, Confidence::Percent(Percentage::new(64)));
        }

        #[test]
        fn falls_back_to_confidence() {
            let c = Confidence::resolve(None, Some(70.0), None);
            assert_eq!(c, Confidence::Percent(Percentage::new(70)));
        }

        #[test]
        fn uses_risk_level_without_numbers() {
            let c = Confidence::resolve(None, None, Some("Very High"));
            assert_eq!(c, Confidence::Level(RiskLevel::VeryHigh));
        }

        #[test]
        fn nothing_usable_is_unrated() {
            assert_eq!(Confidence::resolve(None, None, None), Confidence::Unrated);
            assert_eq!(Confidence::resolve(None, Some(f64::NAN), Some("  ")), Confidence::Unrated);
        }

        #[test]
        fn fallbacks_are_zero_and_lowest() {
            let level = Confidence::Level(RiskLevel::High);
            assert_eq!(level.percent_or_zero(), Percentage::ZERO);
            assert_eq!(Confidence::Percent(Percentage::new(90)).severity_or_lowest(), 0);
            assert_eq!(level.severity_or_lowest(), 2);
        }
    }

    #[test]
    fn risk_band_thresholds() {
        assert_eq!(RiskBand::for_percentage(Percentage::new(80)), RiskBand::High);
        assert_eq!(RiskBand::for_percentage(Percentage::new(79)), RiskBand::Moderate);
        assert_eq!(RiskBand::for_percentage(Percentage::new(40)), RiskBand::LowModerate);
        assert_eq!(RiskBand::for_percentage(Percentage::new(39)), RiskBand::Low);
    }

    #[test]
    fn confidence_displays_by_kind() {
        assert_eq!(Confidence::Percent(Percentage::new(70)).to_string(), "70%");
        assert_eq!(Confidence::Level(RiskLevel::VeryHigh).to_string(), "Very High risk");
    }
}
