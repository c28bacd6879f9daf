//! Face values produced by a roll.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rolled face: numeric for standard dice, textual for custom dice.
///
/// Thresholds and match targets reuse the same type, since users may type
/// either a number or a label into them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaceValue {
    /// A whole-number face.
    Number(i64),
    /// An arbitrary label such as `"HIT"` or `"3"`.
    Text(String),
}

impl FaceValue {
    /// The numeric reading of this value, if it has one.
    ///
    /// Text is trimmed and parsed; non-finite parses count as non-numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n as f64),
            Self::Text(s) => parse_number(s),
        }
    }

    /// Trimmed, upper-cased string form used for all textual comparisons.
    pub fn normalized(&self) -> String {
        normalize(&self.to_string())
    }

    /// Whether two values are equal after normalization.
    pub fn matches(&self, other: &FaceValue) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for FaceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FaceValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for FaceValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FaceValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parse trimmed text as a finite number.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Trim and upper-case a label.
pub fn normalize(s: &str) -> String {
    s.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_reading() {
        assert_eq!(FaceValue::Number(5).as_number(), Some(5.0));
        assert_eq!(FaceValue::from(" 3 ").as_number(), Some(3.0));
        assert_eq!(FaceValue::from("2.5").as_number(), Some(2.5));
        assert_eq!(FaceValue::from("HIT").as_number(), None);
        assert_eq!(FaceValue::from("NaN").as_number(), None);
        assert_eq!(FaceValue::from("inf").as_number(), None);
    }

    #[test]
    fn normalization() {
        assert_eq!(FaceValue::from(" hit ").normalized(), "HIT");
        assert_eq!(FaceValue::Number(12).normalized(), "12");
        assert!(FaceValue::from("hit").matches(&FaceValue::from("HIT ")));
        assert!(FaceValue::from("4").matches(&FaceValue::Number(4)));
    }

    #[test]
    fn serde_is_untagged() {
        let values: Vec<FaceValue> = serde_json::from_str(r#"[4, "CRIT"]"#).unwrap();
        assert_eq!(values, vec![FaceValue::Number(4), FaceValue::from("CRIT")]);
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[4,"CRIT"]"#);
    }
}
