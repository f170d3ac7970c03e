use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

/// A single scalar cell as produced by ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum Value {
    #[default]
    Empty,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Value {
    /// Types a raw cell by inspection. Numbers and booleans are only typed
    /// when their display form reproduces the raw text, so identifiers like
    /// `00123` and spellings like `TRUE` stay strings. Surrounding whitespace
    /// is kept since key comparison may be whitespace sensitive.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return if raw.is_empty() {
                Value::Empty
            } else {
                Value::String(raw.to_string())
            };
        }
        if trimmed.len() == raw.len() {
            if let Ok(parsed) = trimmed.parse::<i64>()
                && parsed.to_string() == trimmed
            {
                return Value::Integer(parsed);
            }
            if looks_like_float(trimmed)
                && let Ok(parsed) = trimmed.parse::<f64>()
                && Value::Float(parsed).as_display() == trimmed
            {
                return Value::Float(parsed);
            }
            if let Ok(parsed) = trimmed.parse::<bool>() {
                return Value::Boolean(parsed);
            }
        }
        Value::String(raw.to_string())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Numeric ordering when both sides are numbers, text ordering otherwise.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(left), Some(right)) => left.total_cmp(&right),
            _ => self.as_display().cmp(&other.as_display()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Value::infer(raw)
    }
}

// Rejects spellings such as "inf" or "NaN" that `f64::from_str` accepts.
fn looks_like_float(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && value.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_recognizes_scalar_types() {
        assert_eq!(Value::infer(""), Value::Empty);
        assert_eq!(Value::infer("42"), Value::Integer(42));
        assert_eq!(Value::infer("-3.5"), Value::Float(-3.5));
        assert_eq!(Value::infer("true"), Value::Boolean(true));
        assert_eq!(Value::infer("false"), Value::Boolean(false));
        assert_eq!(
            Value::infer("Alice Smith"),
            Value::String("Alice Smith".to_string())
        );
    }

    #[test]
    fn infer_keeps_padded_and_non_numeric_text_as_strings() {
        assert_eq!(Value::infer(" 42 "), Value::String(" 42 ".to_string()));
        assert_eq!(Value::infer("   "), Value::String("   ".to_string()));
        assert_eq!(Value::infer("inf"), Value::String("inf".to_string()));
        assert_eq!(Value::infer("NaN"), Value::String("NaN".to_string()));
        assert_eq!(Value::infer("00123"), Value::String("00123".to_string()));
        assert_eq!(Value::infer("1.50"), Value::String("1.50".to_string()));
        assert_eq!(Value::infer("TRUE"), Value::String("TRUE".to_string()));
        assert_eq!(Value::infer("False"), Value::String("False".to_string()));
    }

    #[test]
    fn display_renders_whole_floats_without_fraction() {
        assert_eq!(Value::Float(3.0).as_display(), "3");
        assert_eq!(Value::Float(2.25).as_display(), "2.25");
        assert_eq!(Value::Empty.as_display(), "");
    }

    #[test]
    fn compare_prefers_numeric_ordering() {
        assert_eq!(
            Value::Integer(10).compare(&Value::Float(9.5)),
            Ordering::Greater
        );
        assert_eq!(
            Value::String("10".to_string()).compare(&Value::String("9".to_string())),
            Ordering::Less
        );
    }

    #[test]
    fn whitespace_only_strings_count_as_non_empty_values() {
        assert!(Value::Empty.is_empty());
        assert!(!Value::String(" ".to_string()).is_empty());
        assert!(!Value::Integer(0).is_empty());
    }
}
