// Display formatting that keeps "0" and "undefined" visibly distinct.

use serde::{Deserialize, Serialize};

/// Shown wherever a value is undefined. Never used for a genuine zero.
pub const PLACEHOLDER: &str = "—";

/// How a stat is displayed and how close two values must be to count as even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    /// Counting stats and age: rounded integer.
    Integer,
    /// Three decimal places (AVG, OBP, ...).
    Rate,
    /// Fraction shown as a one-decimal percentage; differences in points.
    Percent,
    /// OPS+ as a rounded integer.
    OpsPlus,
}

/// Sign classification of a difference cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffClass {
    Positive,
    Negative,
    Even,
}

impl DiffClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffClass::Positive => "positive",
            DiffClass::Negative => "negative",
            DiffClass::Even => "even",
        }
    }
}

/// Below this magnitude a rate or percent difference is even.
const RATE_EPSILON: f64 = 0.0005;

impl StatKind {
    /// Format a single value; `None` renders as the placeholder.
    pub fn format(&self, value: Option<f64>) -> String {
        let Some(value) = value else {
            return PLACEHOLDER.to_string();
        };
        match self {
            StatKind::Integer | StatKind::OpsPlus => format!("{}", value.round() as i64),
            StatKind::Rate => format!("{value:.3}"),
            StatKind::Percent => format!("{:.1}%", value * 100.0),
        }
    }

    /// Format `left - right` and classify it. Either side undefined gives a
    /// placeholder classified as even.
    pub fn format_difference(&self, left: Option<f64>, right: Option<f64>) -> (String, DiffClass) {
        let (Some(left), Some(right)) = (left, right) else {
            return (PLACEHOLDER.to_string(), DiffClass::Even);
        };
        let diff = left - right;

        match self {
            StatKind::Integer | StatKind::OpsPlus => {
                let rounded = diff.round() as i64;
                if rounded == 0 {
                    ("0".to_string(), DiffClass::Even)
                } else {
                    (format!("{rounded:+}"), classify(diff))
                }
            }
            StatKind::Percent => {
                if diff.abs() < RATE_EPSILON {
                    ("0.0 pts".to_string(), DiffClass::Even)
                } else {
                    (format!("{:+.1} pts", diff * 100.0), classify(diff))
                }
            }
            StatKind::Rate => {
                if diff.abs() < RATE_EPSILON {
                    ("0.000".to_string(), DiffClass::Even)
                } else {
                    (format!("{diff:+.3}"), classify(diff))
                }
            }
        }
    }
}

fn classify(diff: f64) -> DiffClass {
    if diff > 0.0 {
        DiffClass::Positive
    } else {
        DiffClass::Negative
    }
}

pub fn format_rate(value: f64) -> String {
    StatKind::Rate.format(Some(value))
}

pub fn format_percent(value: Option<f64>) -> String {
    StatKind::Percent.format(value)
}

pub fn format_ops_plus(value: Option<f64>) -> String {
    StatKind::OpsPlus.format(value)
}

pub fn format_age(age: Option<i32>) -> String {
    match age {
        Some(age) => age.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_is_not_zero() {
        assert_eq!(format_percent(None), "—");
        assert_eq!(format_percent(Some(0.0)), "0.0%");
        assert_eq!(format_ops_plus(None), "—");
        assert_eq!(format_ops_plus(Some(0.0)), "0");
        assert_eq!(format_age(None), "—");
    }

    #[test]
    fn value_formats() {
        assert_eq!(format_rate(0.3), "0.300");
        assert_eq!(format_rate(1.0 / 3.0), "0.333");
        assert_eq!(format_percent(Some(2.0 / 3.0)), "66.7%");
        assert_eq!(format_ops_plus(Some(119.6)), "120");
        assert_eq!(StatKind::Integer.format(Some(42.0)), "42");
    }

    #[test]
    fn integer_differences() {
        let k = StatKind::Integer;
        assert_eq!(k.format_difference(Some(30.0), Some(25.0)), ("+5".into(), DiffClass::Positive));
        assert_eq!(k.format_difference(Some(25.0), Some(30.0)), ("-5".into(), DiffClass::Negative));
        assert_eq!(k.format_difference(Some(7.0), Some(7.0)), ("0".into(), DiffClass::Even));
    }

    #[test]
    fn ops_plus_difference_rounds_before_classifying() {
        let k = StatKind::OpsPlus;
        assert_eq!(k.format_difference(Some(110.3), Some(110.0)), ("0".into(), DiffClass::Even));
        assert_eq!(k.format_difference(Some(110.0), Some(110.4)), ("0".into(), DiffClass::Even));
        assert_eq!(k.format_difference(Some(112.0), Some(110.0)), ("+2".into(), DiffClass::Positive));
    }

    #[test]
    fn rate_differences_use_epsilon_regardless_of_sign() {
        let k = StatKind::Rate;
        assert_eq!(k.format_difference(Some(0.3002), Some(0.3)), ("0.000".into(), DiffClass::Even));
        assert_eq!(k.format_difference(Some(0.3), Some(0.3002)), ("0.000".into(), DiffClass::Even));
        assert_eq!(k.format_difference(Some(0.310), Some(0.300)), ("+0.010".into(), DiffClass::Positive));
        assert_eq!(k.format_difference(Some(0.290), Some(0.300)), ("-0.010".into(), DiffClass::Negative));
    }

    #[test]
    fn percent_differences_in_points() {
        let k = StatKind::Percent;
        assert_eq!(k.format_difference(Some(0.75), Some(0.5)), ("+25.0 pts".into(), DiffClass::Positive));
        assert_eq!(k.format_difference(Some(0.5001), Some(0.5)), ("0.0 pts".into(), DiffClass::Even));
    }

    #[test]
    fn undefined_side_gives_placeholder_even() {
        for k in [StatKind::Integer, StatKind::Rate, StatKind::Percent, StatKind::OpsPlus] {
            assert_eq!(k.format_difference(None, Some(1.0)), ("—".into(), DiffClass::Even));
            assert_eq!(k.format_difference(Some(1.0), None), ("—".into(), DiffClass::Even));
        }
    }
}
