use super::{Record, Value};
use crate::{bail, Result};

/// Predicate evaluated against the fields of a record.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Filter {
    /// Matches every record
    #[default]
    All,

    /// `field = value`
    Eq(String, Value),

    /// `field IN (values)`
    InList(String, Vec<Value>),

    /// `field IS NULL`
    IsNull(String),

    And(Vec<Filter>),

    Or(Vec<Filter>),

    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::Eq(field.into(), value.into())
    }

    pub fn in_list<T: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Filter {
        Filter::InList(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn is_null(field: impl Into<String>) -> Filter {
        Filter::IsNull(field.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Filter {
        Filter::Not(Box::new(filter))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }

    /// Narrows this filter with `other`.
    pub fn add_filter(&mut self, other: impl Into<Filter>) {
        let other = other.into();

        match (self, other) {
            (_, Filter::All) => {}
            (this @ Filter::All, other) => *this = other,
            (Filter::And(operands), Filter::And(rest)) => operands.extend(rest),
            (Filter::And(operands), other) => operands.push(other),
            (this, other) => {
                let lhs = std::mem::take(this);
                *this = Filter::And(vec![lhs, other]);
            }
        }
    }

    /// Evaluates the filter against a record. Referencing a field the record
    /// does not have is an error.
    pub fn eval(&self, record: &Record) -> Result<bool> {
        Ok(match self {
            Filter::All => true,
            Filter::Eq(field, value) => !value.is_null() && field_value(record, field)? == value,
            Filter::InList(field, values) => {
                let actual = field_value(record, field)?;
                !actual.is_null() && values.contains(actual)
            }
            Filter::IsNull(field) => field_value(record, field)?.is_null(),
            Filter::And(operands) => {
                for operand in operands {
                    if !operand.eval(record)? {
                        return Ok(false);
                    }
                }
                true
            }
            Filter::Or(operands) => {
                for operand in operands {
                    if operand.eval(record)? {
                        return Ok(true);
                    }
                }
                false
            }
            Filter::Not(operand) => !operand.eval(record)?,
        })
    }
}

fn field_value<'a>(record: &'a Record, field: &str) -> Result<&'a Value> {
    match record.get(field) {
        Some(value) => Ok(value),
        None => bail!("filter references unknown field `{field}`"),
    }
}
