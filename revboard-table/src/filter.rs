//! Column filter predicates and the global text matcher.

use std::cmp::Ordering;

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::value::CellValue;

/// A predicate applied to one column's value.
///
/// # Example
///
/// ```
/// use revboard_table::{CellValue, ColumnFilter};
///
/// let filter = ColumnFilter::between(Some(100i64), None::<i64>);
/// assert!(filter.matches(&CellValue::from(250i64)));
/// assert!(!filter.matches(&CellValue::from(50i64)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Value compares equal (numerically for numbers).
    Equals(CellValue),
    /// Display text contains the needle, ignoring case.
    Contains(String),
    /// Value equals any of the listed values.
    OneOf(Vec<CellValue>),
    /// Value lies within the inclusive bounds. A missing bound is open.
    Between {
        min: Option<CellValue>,
        max: Option<CellValue>,
    },
    /// Value is present.
    NotNull,
}

impl ColumnFilter {
    pub fn equals(value: impl Into<CellValue>) -> Self {
        Self::Equals(value.into())
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    pub fn one_of<V: Into<CellValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn between<A: Into<CellValue>, B: Into<CellValue>>(min: Option<A>, max: Option<B>) -> Self {
        Self::Between {
            min: min.map(Into::into),
            max: max.map(Into::into),
        }
    }

    /// Test a cell value against this predicate.
    ///
    /// `Null` only passes `Contains("")`; it never equals, falls within a
    /// range, or counts as present.
    pub fn matches(&self, value: &CellValue) -> bool {
        match self {
            ColumnFilter::Equals(expected) => {
                !value.is_null() && value.compare(expected) == Ordering::Equal
            }
            ColumnFilter::Contains(needle) => TextMatcher::new(needle).matches(&value.display()),
            ColumnFilter::OneOf(options) => {
                !value.is_null()
                    && options
                        .iter()
                        .any(|option| value.compare(option) == Ordering::Equal)
            }
            ColumnFilter::Between { min, max } => {
                if value.is_null() {
                    return false;
                }
                let above = min
                    .as_ref()
                    .is_none_or(|min| value.compare(min) != Ordering::Less);
                let below = max
                    .as_ref()
                    .is_none_or(|max| value.compare(max) != Ordering::Greater);
                above && below
            }
            ColumnFilter::NotNull => !value.is_null(),
        }
    }
}

/// Case-insensitive substring matcher.
///
/// Wraps a single nucleo substring atom so the whole filter text, spaces
/// included, is matched literally.
pub struct TextMatcher {
    atom: Option<Atom>,
    matcher: Matcher,
    buf: Vec<char>,
}

impl TextMatcher {
    /// An empty needle matches everything.
    pub fn new(needle: &str) -> Self {
        let atom = (!needle.is_empty()).then(|| {
            Atom::new(
                needle,
                CaseMatching::Ignore,
                Normalization::Never,
                AtomKind::Substring,
                true,
            )
        });
        Self {
            atom,
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.atom.is_none()
    }

    pub fn matches(&mut self, haystack: &str) -> bool {
        let Some(atom) = &self.atom else {
            return true;
        };
        let haystack = Utf32Str::new(haystack, &mut self.buf);
        atom.score(haystack, &mut self.matcher).is_some()
    }
}
