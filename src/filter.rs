//! Row filters for result views, e.g. `region = EMEA` or `amount >= 100`.
//!
//! Filters narrow what is displayed or exported from a finished comparison.
//! They never influence which records are matched.

use std::cmp::Ordering;

use anyhow::{Result, anyhow};

use crate::{
    config::require_column,
    data::Value,
    dataset::{Dataset, Record},
    error::ConfigError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub column: String,
    pub operator: ComparisonOperator,
    pub value: Value,
}

impl FilterCondition {
    pub fn parse(filter: &str) -> Result<Self> {
        let trimmed = filter.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("Empty filter expression"));
        }

        let lowered = trimmed.to_ascii_lowercase();
        for (needle, operator) in [
            (" contains ", ComparisonOperator::Contains),
            (" startswith ", ComparisonOperator::StartsWith),
            (" endswith ", ComparisonOperator::EndsWith),
        ] {
            if let Some(idx) = lowered.find(needle) {
                return Self::from_parts(
                    trimmed,
                    &trimmed[..idx],
                    operator,
                    &trimmed[idx + needle.len()..],
                );
            }
        }

        for (needle, operator) in [
            ("!=", ComparisonOperator::NotEq),
            (">=", ComparisonOperator::Ge),
            ("<=", ComparisonOperator::Le),
            ("=", ComparisonOperator::Eq),
            (">", ComparisonOperator::Gt),
            ("<", ComparisonOperator::Lt),
        ] {
            if let Some(idx) = trimmed.find(needle) {
                return Self::from_parts(
                    trimmed,
                    &trimmed[..idx],
                    operator,
                    &trimmed[idx + needle.len()..],
                );
            }
        }

        Err(anyhow!("Failed to parse filter expression '{trimmed}'"))
    }

    fn from_parts(
        expression: &str,
        column: &str,
        operator: ComparisonOperator,
        value: &str,
    ) -> Result<Self> {
        let column = column.trim();
        if column.is_empty() {
            return Err(anyhow!("Filter expression '{expression}' is missing a column name"));
        }
        Ok(FilterCondition {
            column: column.to_string(),
            operator,
            value: Value::infer(unquote(value.trim())),
        })
    }

    pub fn matches(&self, cell: &Value) -> bool {
        use ComparisonOperator::*;
        match self.operator {
            Contains => cell.as_display().contains(&self.value.as_display()),
            StartsWith => cell.as_display().starts_with(&self.value.as_display()),
            EndsWith => cell.as_display().ends_with(&self.value.as_display()),
            Eq => cell.compare(&self.value) == Ordering::Equal,
            NotEq => cell.compare(&self.value) != Ordering::Equal,
            Gt => cell.compare(&self.value) == Ordering::Greater,
            Ge => cell.compare(&self.value) != Ordering::Less,
            Lt => cell.compare(&self.value) == Ordering::Less,
            Le => cell.compare(&self.value) != Ordering::Greater,
        }
    }
}

pub fn parse_filters(filters: &[String]) -> Result<Vec<FilterCondition>> {
    filters.iter().map(|f| FilterCondition::parse(f)).collect()
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && ((bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\''))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Conditions bound to column positions of one dataset; all must hold.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    conditions: Vec<(usize, FilterCondition)>,
}

impl RowFilter {
    pub fn resolve(dataset: &Dataset, conditions: &[FilterCondition]) -> Result<Self, ConfigError> {
        let conditions = conditions
            .iter()
            .map(|condition| Ok((require_column(dataset, &condition.column)?, condition.clone())))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(RowFilter { conditions })
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn accepts(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(column, condition)| condition.matches(record.cell(*column)))
    }
}
