//! Key conditions and non-key filter expressions.

use std::cmp::Ordering;

use super::attribute::{AttributeValue, Item};

/// Condition on an index's sort key.
///
/// `Between` is inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub enum SortCondition {
    Eq(AttributeValue),
    Lt(AttributeValue),
    Le(AttributeValue),
    Gt(AttributeValue),
    Ge(AttributeValue),
    Between(AttributeValue, AttributeValue),
}

impl SortCondition {
    pub fn matches(&self, value: &AttributeValue) -> bool {
        match self {
            SortCondition::Eq(v) => value.compare(v) == Some(Ordering::Equal),
            SortCondition::Lt(v) => value.compare(v) == Some(Ordering::Less),
            SortCondition::Le(v) => matches!(
                value.compare(v),
                Some(Ordering::Less | Ordering::Equal)
            ),
            SortCondition::Gt(v) => value.compare(v) == Some(Ordering::Greater),
            SortCondition::Ge(v) => matches!(
                value.compare(v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            SortCondition::Between(lo, hi) => {
                matches!(
                    value.compare(lo),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(value.compare(hi), Some(Ordering::Less | Ordering::Equal))
            }
        }
    }
}

/// Post-read filter over non-key attributes.
///
/// Comparisons against a missing or `NULL` attribute never match.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, AttributeValue),
    Gt(String, AttributeValue),
    Ge(String, AttributeValue),
    Lt(String, AttributeValue),
    Le(String, AttributeValue),
    /// Case-sensitive substring match on a string attribute.
    Contains(String, String),
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(attribute: &str, value: impl Into<AttributeValue>) -> Self {
        Filter::Eq(attribute.to_string(), value.into())
    }

    pub fn gt(attribute: &str, value: impl Into<AttributeValue>) -> Self {
        Filter::Gt(attribute.to_string(), value.into())
    }

    pub fn ge(attribute: &str, value: impl Into<AttributeValue>) -> Self {
        Filter::Ge(attribute.to_string(), value.into())
    }

    pub fn lt(attribute: &str, value: impl Into<AttributeValue>) -> Self {
        Filter::Lt(attribute.to_string(), value.into())
    }

    pub fn le(attribute: &str, value: impl Into<AttributeValue>) -> Self {
        Filter::Le(attribute.to_string(), value.into())
    }

    pub fn contains(attribute: &str, needle: impl Into<String>) -> Self {
        Filter::Contains(attribute.to_string(), needle.into())
    }

    /// Conjoin two filters, flattening nested `And`s.
    pub fn and(self, other: Filter) -> Filter {
        let mut terms = match self {
            Filter::And(terms) => terms,
            single => vec![single],
        };
        match other {
            Filter::And(more) => terms.extend(more),
            single => terms.push(single),
        }
        Filter::And(terms)
    }

    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Filter::Eq(attr, v) => compare_attr(item, attr, v) == Some(Ordering::Equal),
            Filter::Gt(attr, v) => compare_attr(item, attr, v) == Some(Ordering::Greater),
            Filter::Ge(attr, v) => matches!(
                compare_attr(item, attr, v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::Lt(attr, v) => compare_attr(item, attr, v) == Some(Ordering::Less),
            Filter::Le(attr, v) => matches!(
                compare_attr(item, attr, v),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Filter::Contains(attr, needle) => item
                .get(attr)
                .and_then(AttributeValue::as_str)
                .map(|haystack| haystack.contains(needle.as_str()))
                .unwrap_or(false),
            Filter::And(terms) => terms.iter().all(|term| term.matches(item)),
        }
    }
}

fn compare_attr(item: &Item, attribute: &str, value: &AttributeValue) -> Option<Ordering> {
    item.get(attribute)?.compare(value)
}
