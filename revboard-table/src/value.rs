//! Typed cell values produced by column accessors.

use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

/// The runtime type a column promises its accessor will produce.
///
/// A column is only sortable when its kind has a total order. `Any` marks a
/// column whose values may mix types; it can be displayed and filtered but
/// never sorted.
///
/// | Kind | Accepted values |
/// |------|-----------------|
/// | `Text` | `Text` |
/// | `Number` | `Int`, `Float` |
/// | `Decimal` | `Decimal` |
/// | `Bool` | `Bool` |
/// | `Date` | `Date` |
/// | `DateTime` | `DateTime` |
/// | `Any` | everything |
///
/// `Null` is accepted by every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Number,
    Decimal,
    Bool,
    Date,
    DateTime,
    #[default]
    Any,
}

impl ValueKind {
    /// Returns `true` if values of this kind can be compared with a total order.
    pub fn is_sortable(self) -> bool {
        !matches!(self, ValueKind::Any)
    }

    /// Returns the kind name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Number => "number",
            ValueKind::Decimal => "decimal",
            ValueKind::Bool => "bool",
            ValueKind::Date => "date",
            ValueKind::DateTime => "datetime",
            ValueKind::Any => "any",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell value, as returned by a column accessor.
///
/// # Example
///
/// ```
/// use revboard_table::CellValue;
///
/// let channel = CellValue::from("retail");
/// let quantity = CellValue::from(42i64);
/// let missing = CellValue::Null;
/// assert!(missing.is_null());
/// assert_eq!(quantity.display(), "42");
/// assert_eq!(channel.type_name(), "text");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact decimal, used for money amounts.
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl CellValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Bool(_) => "bool",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::Decimal(_) => "decimal",
            CellValue::Text(_) => "text",
            CellValue::Date(_) => "date",
            CellValue::DateTime(_) => "datetime",
        }
    }

    /// Returns the kind of this value, or `None` for `Null`.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(_) => Some(ValueKind::Bool),
            CellValue::Int(_) | CellValue::Float(_) => Some(ValueKind::Number),
            CellValue::Decimal(_) => Some(ValueKind::Decimal),
            CellValue::Text(_) => Some(ValueKind::Text),
            CellValue::Date(_) => Some(ValueKind::Date),
            CellValue::DateTime(_) => Some(ValueKind::DateTime),
        }
    }

    /// Returns `true` if this value may appear in a column of `kind`.
    pub fn fits(&self, kind: ValueKind) -> bool {
        match self.kind() {
            None => true,
            Some(own) => kind == ValueKind::Any || own == kind,
        }
    }

    /// The stringified form used by text filtering and default cell rendering.
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(v) => v.to_string(),
            CellValue::Int(v) => v.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Decimal(v) => v.to_string(),
            CellValue::Text(v) => v.clone(),
            CellValue::Date(v) => v.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(v) => v.to_rfc3339(),
        }
    }

    /// Total order between two values.
    ///
    /// Values of the same kind compare naturally: numbers numerically, text
    /// case-insensitively (raw bytes break ties), dates chronologically.
    /// `Null` orders after every other value. Values of different kinds
    /// fall back to a fixed kind rank so the order stays total.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            (CellValue::Null, _) => Ordering::Greater,
            (_, CellValue::Null) => Ordering::Less,
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Float(b)) => compare_int_float(*a, *b),
            (CellValue::Float(a), CellValue::Int(b)) => compare_int_float(*b, *a).reverse(),
            (CellValue::Float(a), CellValue::Float(b)) => compare_floats(*a, *b),
            (CellValue::Decimal(a), CellValue::Decimal(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => compare_text(a, b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Int(_) | CellValue::Float(_) => 1,
            CellValue::Decimal(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Date(_) => 4,
            CellValue::DateTime(_) => 5,
            CellValue::Null => 6,
        }
    }
}

/// Numeric order with `-0.0 == 0.0`. NaN sorts by sign past the infinities.
fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Exact comparison of an integer with a float.
///
/// Casting the integer to `f64` rounds above 2^53 and would break
/// transitivity with `Int`/`Int` comparisons.
fn compare_int_float(a: i64, b: f64) -> Ordering {
    // 2^63, exactly representable.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if b.is_nan() {
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if b >= LIMIT {
        return Ordering::Less;
    }
    if b < -LIMIT {
        return Ordering::Greater;
    }
    let whole = b.trunc();
    // In range, so the cast is exact.
    a.cmp(&(whole as i64)).then_with(|| {
        let fraction = b - whole;
        if fraction > 0.0 {
            Ordering::Less
        } else if fraction < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

/// Case-folded comparison with a byte-wise tie-break.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(i64::from(v))
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::Int(i64::from(v))
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<Decimal> for CellValue {
    fn from(v: Decimal) -> Self {
        CellValue::Decimal(v)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(v: DateTime<Utc>) -> Self {
        CellValue::DateTime(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_compare_ignores_case_first() {
        let a = CellValue::from("apple");
        let b = CellValue::from("Banana");
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(
            CellValue::from("Apple").compare(&CellValue::from("apple")),
            Ordering::Less
        );
    }

    #[test]
    fn test_null_orders_last() {
        assert_eq!(CellValue::Null.compare(&CellValue::from(1i64)), Ordering::Greater);
        assert_eq!(CellValue::from(1i64).compare(&CellValue::Null), Ordering::Less);
    }

    #[test]
    fn test_mixed_numbers_compare_numerically() {
        assert_eq!(
            CellValue::from(2i64).compare(&CellValue::from(1.5)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_int_float_compare_is_exact_above_f64_precision() {
        let big = CellValue::Int(9_007_199_254_740_993);
        let float = CellValue::Float(9_007_199_254_740_992.0);
        let exact = CellValue::Int(9_007_199_254_740_992);
        assert_eq!(big.compare(&float), Ordering::Greater);
        assert_eq!(float.compare(&exact), Ordering::Equal);
        assert_eq!(big.compare(&exact), Ordering::Greater);
        assert_eq!(float.compare(&big), Ordering::Less);
    }

    #[test]
    fn test_int_float_compare_edges() {
        let zero = CellValue::Int(0);
        assert_eq!(zero.compare(&CellValue::Float(-0.0)), Ordering::Equal);
        assert_eq!(CellValue::Float(-0.0).compare(&CellValue::Float(0.0)), Ordering::Equal);
        assert_eq!(zero.compare(&CellValue::Float(-0.5)), Ordering::Greater);
        assert_eq!(CellValue::Int(-1).compare(&CellValue::Float(-0.5)), Ordering::Less);
        assert_eq!(CellValue::Int(i64::MAX).compare(&CellValue::Float(f64::INFINITY)), Ordering::Less);
        assert_eq!(CellValue::Int(i64::MIN).compare(&CellValue::Float(-9.3e18)), Ordering::Greater);
        assert_eq!(CellValue::Int(i64::MIN).compare(&CellValue::Float(i64::MIN as f64)), Ordering::Equal);
        assert_eq!(zero.compare(&CellValue::Float(f64::NAN)), Ordering::Less);
        assert_eq!(
            CellValue::Float(f64::NAN).compare(&CellValue::Float(f64::INFINITY)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_fits_kind() {
        assert!(CellValue::from(3i64).fits(ValueKind::Number));
        assert!(CellValue::Null.fits(ValueKind::Date));
        assert!(!CellValue::from("x").fits(ValueKind::Number));
        assert!(CellValue::from("x").fits(ValueKind::Any));
    }
}
