//! Category keys used to group rows by a feature column
//!
//! Grouping happens on typed keys rather than on stringified column names, so integer
//! bins sort numerically, floats sort by IEEE total order, and missing values form their
//! own group that sorts before every observed value.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single distinct value of a grouping column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CategoryKey {
    /// Null in the source column
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl CategoryKey {
    fn rank(&self) -> u8 {
        match self {
            CategoryKey::Missing => 0,
            CategoryKey::Bool(_) => 1,
            CategoryKey::Int(_) => 2,
            CategoryKey::Float(_) => 3,
            CategoryKey::Str(_) => 4,
        }
    }

    /// Float key with `-0.0` folded into `0.0` and every NaN payload into one NaN.
    pub fn float(value: f64) -> Self {
        CategoryKey::Float(canonical_float(value))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CategoryKey::Missing)
    }

    /// Display label, `None` for missing so tables keep a real null.
    pub fn label(&self) -> Option<String> {
        match self {
            CategoryKey::Missing => None,
            other => Some(other.to_string()),
        }
    }
}

fn canonical_float(value: f64) -> f64 {
    if value.is_nan() {
        f64::NAN
    } else if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl PartialEq for CategoryKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CategoryKey {}

impl PartialOrd for CategoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CategoryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CategoryKey::Missing, CategoryKey::Missing) => Ordering::Equal,
            (CategoryKey::Bool(a), CategoryKey::Bool(b)) => a.cmp(b),
            (CategoryKey::Int(a), CategoryKey::Int(b)) => a.cmp(b),
            (CategoryKey::Float(a), CategoryKey::Float(b)) => {
                canonical_float(*a).total_cmp(&canonical_float(*b))
            }
            (CategoryKey::Str(a), CategoryKey::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for CategoryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            CategoryKey::Missing => {}
            CategoryKey::Bool(b) => b.hash(state),
            CategoryKey::Int(i) => i.hash(state),
            CategoryKey::Float(f) => canonical_float(*f).to_bits().hash(state),
            CategoryKey::Str(s) => s.hash(state),
        }
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryKey::Missing => write!(f, "null"),
            CategoryKey::Bool(b) => write!(f, "{}", b),
            CategoryKey::Int(i) => write!(f, "{}", i),
            CategoryKey::Float(x) => write!(f, "{}", x),
            CategoryKey::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for CategoryKey {
    fn from(value: bool) -> Self {
        CategoryKey::Bool(value)
    }
}

impl From<i32> for CategoryKey {
    fn from(value: i32) -> Self {
        CategoryKey::Int(value as i64)
    }
}

impl From<i64> for CategoryKey {
    fn from(value: i64) -> Self {
        CategoryKey::Int(value)
    }
}

impl From<f64> for CategoryKey {
    fn from(value: f64) -> Self {
        CategoryKey::float(value)
    }
}

impl From<&str> for CategoryKey {
    fn from(value: &str) -> Self {
        CategoryKey::Str(value.to_string())
    }
}

impl From<String> for CategoryKey {
    fn from(value: String) -> Self {
        CategoryKey::Str(value)
    }
}

/// Convert every row of `column` to a [`CategoryKey`].
///
/// Integer columns become `Int`, float columns `Float`, booleans `Bool`; everything else
/// (strings, categoricals, binned labels) is cast to string.
pub fn category_keys(column: &Column) -> Result<Vec<CategoryKey>> {
    let dtype = column.dtype();

    let keys = if dtype.is_integer() {
        let cast = column.cast(&DataType::Int64)?;
        cast.i64()?
            .into_iter()
            .map(|v| v.map_or(CategoryKey::Missing, CategoryKey::Int))
            .collect()
    } else if dtype.is_float() {
        let cast = column.cast(&DataType::Float64)?;
        cast.f64()?
            .into_iter()
            .map(|v| v.map_or(CategoryKey::Missing, CategoryKey::float))
            .collect()
    } else if matches!(dtype, DataType::Boolean) {
        column
            .bool()?
            .into_iter()
            .map(|v| v.map_or(CategoryKey::Missing, CategoryKey::Bool))
            .collect()
    } else {
        let cast = column.cast(&DataType::String)?;
        cast.str()?
            .into_iter()
            .map(|v| v.map_or(CategoryKey::Missing, |s| CategoryKey::Str(s.to_string())))
            .collect()
    };

    Ok(keys)
}

/// Values of `column` as `f64`, nulls preserved.
pub fn float_values(column: &Column) -> Result<Vec<Option<f64>>> {
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}
