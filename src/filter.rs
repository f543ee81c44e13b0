//! Numeric filters and the `numericFilters` query parameter.
//!
//! A filter is a `(field, operator, value)` triple such as
//! `("points", ">", 100)`. Filters are encoded as `points>100` and joined with
//! commas, which the service ANDs together. The service's OR-grouping syntax
//! is not supported.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// Numeric attributes the service can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    CreatedAtI,
    Points,
    NumComments,
}

impl NumericField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAtI => "created_at_i",
            Self::Points => "points",
            Self::NumComments => "num_comments",
        }
    }
}

impl FromStr for NumericField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "created_at_i" => Ok(Self::CreatedAtI),
            "points" => Ok(Self::Points),
            "num_comments" => Ok(Self::NumComments),
            other => Err(Error::validation(
                other,
                "filter field must be created_at_i, points, or num_comments",
            )),
        }
    }
}

/// Comparison operators accepted in numeric filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Comparison {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl FromStr for Comparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            "=" => Ok(Self::Eq),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            other => Err(Error::validation(
                other,
                "filter operator must be one of <, <=, =, >, >=",
            )),
        }
    }
}

/// A caller-supplied filter triple.
///
/// Field and operator are kept as raw strings; they are checked against the
/// closed sets when the filter is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    pub field: String,
    pub operator: String,
    pub value: i64,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: i64) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }

    /// Check field and operator, returning the typed triple.
    pub fn validate(&self) -> Result<(NumericField, Comparison, i64)> {
        let field = self.field.parse::<NumericField>()?;
        let operator = self.operator.parse::<Comparison>()?;
        Ok((field, operator, self.value))
    }
}

impl<F: Into<String>, O: Into<String>> From<(F, O, i64)> for FilterCondition {
    fn from((field, operator, value): (F, O, i64)) -> Self {
        Self::new(field, operator, value)
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.operator, self.value)
    }
}

/// Parse the encoded form, e.g. `num_comments>=10`.
///
/// The field is everything before the first comparison character, so a
/// negative value (`points>-5`) parses as expected.
impl FromStr for FilterCondition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let op_start = s
            .find(['<', '=', '>'])
            .ok_or_else(|| Error::validation(s, "filter has no comparison operator"))?;
        let (field, rest) = s.split_at(op_start);
        let op_len = if rest.starts_with("<=") || rest.starts_with(">=") {
            2
        } else {
            1
        };
        let (operator, value) = rest.split_at(op_len);
        let value = value
            .parse::<i64>()
            .map_err(|_| Error::validation(s, "filter value must be an integer"))?;

        let condition = Self::new(field, operator, value);
        condition.validate()?;
        Ok(condition)
    }
}

/// Encode filter triples as the value of the `numericFilters` parameter.
///
/// Each triple renders as `field` + `operator` + `value` with no separators,
/// and triples are joined with `,` in input order. The first invalid field or
/// operator fails the whole call with [`Error::Validation`]; an empty list
/// encodes to `""`.
pub fn encode_filters(filters: &[FilterCondition]) -> Result<String> {
    let parts = filters
        .iter()
        .map(|filter| {
            let (field, operator, value) = filter.validate()?;
            Ok(format!("{}{}{}", field.as_str(), operator.as_str(), value))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parts.join(","))
}
