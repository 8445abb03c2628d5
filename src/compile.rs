//! Command compilation: binding a parsed clause to its field and coercing its
//! literals into canonical tag values.

use std::fmt;

use tracing::debug;

use crate::error::{Result, SpellfallError};
use crate::field::{FieldDescriptor, FieldRegistry, Operator, OperatorClass};
use crate::query::Clause;
use crate::units;
use crate::value::TagValue;

// ------------- Command -------------
/// A validated clause. Values keep the order they were written in, with
/// duplicates collapsed.
#[derive(Debug, Clone)]
pub struct Command<'r> {
    field: &'r FieldDescriptor,
    operator: Operator,
    values: Vec<TagValue>,
}

impl<'r> Command<'r> {
    pub fn field(&self) -> &'r FieldDescriptor {
        self.field
    }
    pub fn operator(&self) -> Operator {
        self.operator
    }
    pub fn values(&self) -> &[TagValue] {
        &self.values
    }
}
impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(ToString::to_string).collect();
        write!(f, "{}{}({})", self.field.name(), self.operator, values.join(" "))
    }
}

fn coerce(field: &FieldDescriptor, literal: &str) -> Result<TagValue> {
    let invalid = |reason: String| SpellfallError::InvalidValue {
        value: literal.to_string(),
        field: field.name().to_string(),
        reason,
    };
    match field.class() {
        OperatorClass::Numeric => {
            let number = match literal.parse::<f64>() {
                Ok(number) if number.is_finite() => number,
                // unit words stand for one such unit, `bonus_action` for "bonus action"
                _ => field
                    .dimension()
                    .and_then(|dimension| units::resolve(dimension, &literal.replace('_', " ")))
                    .ok_or_else(|| {
                        invalid(String::from(match field.dimension() {
                            Some(_) => "expected a number or a unit",
                            None => "expected a number",
                        }))
                    })?,
            };
            if !field.domain().admits_number(number) {
                return Err(invalid(format!("expected {}", field.domain().describe())));
            }
            TagValue::number(number).ok_or_else(|| invalid(String::from("expected a finite number")))
        }
        OperatorClass::Boolean => match literal.to_lowercase().as_str() {
            "true" | "yes" => Ok(TagValue::Flag(true)),
            "false" | "no" => Ok(TagValue::Flag(false)),
            _ => Err(invalid(String::from("expected true, yes, false or no"))),
        },
        OperatorClass::Text => {
            let text = TagValue::text(literal);
            match text.as_text() {
                Some(folded) if !field.domain().admits_text(folded) => {
                    Err(invalid(format!("expected {}", field.domain().describe())))
                }
                _ => Ok(text),
            }
        }
    }
}

/// Resolves the clause's alias, checks the operator against the field's
/// operator class, then coerces every literal. The first failure is returned.
pub fn compile<'r>(clause: &Clause, registry: &'r FieldRegistry) -> Result<Command<'r>> {
    let field = registry
        .resolve(clause.alias())
        .ok_or_else(|| SpellfallError::UnknownField {
            alias: clause.alias().to_string(),
        })?;
    if !field.class().permits(clause.operator()) {
        return Err(SpellfallError::InvalidOperator {
            operator: clause.operator().token().to_string(),
            field: field.name().to_string(),
        });
    }
    let mut values = Vec::with_capacity(clause.values().len());
    for literal in clause.values() {
        let value = coerce(field, literal)?;
        if !values.contains(&value) {
            values.push(value);
        }
    }
    let command = Command {
        field,
        operator: clause.operator(),
        values,
    };
    debug!(clause = %clause, command = %command, "compiled");
    Ok(command)
}
