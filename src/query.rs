//! The query parser: text in, clauses out.
//!
//! A query is a sequence of clauses separated by whitespace, where whitespace
//! inside parentheses does not separate. Each clause is `alias<operator>value`
//! with `value` a bare token or a parenthesized list of tokens, for example
//! `level>=3` or `dt:(fire lightning)`. Clauses are parsed with the grammar in
//! `query.pest`. Aliases and values are folded to lower case; nothing here
//! knows which aliases exist, that is left to the compiler.

use std::fmt;

use pest::Parser;
use pest::error::{Error, ErrorVariant, InputLocation};
use pest_derive::Parser;

use crate::error::{Result, SpellfallError};
use crate::field::Operator;

#[derive(Parser)]
#[grammar = "query.pest"]
struct ClauseParser;

// ------------- Clause -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    alias: String,
    operator: Operator,
    values: Vec<String>,
}

impl Clause {
    pub fn new(alias: &str, operator: Operator, values: Vec<String>) -> Self {
        Self {
            alias: alias.to_lowercase(),
            operator,
            values: values.into_iter().map(|value| value.to_lowercase()).collect(),
        }
    }
    pub fn alias(&self) -> &str {
        &self.alias
    }
    pub fn operator(&self) -> Operator {
        self.operator
    }
    pub fn values(&self) -> &[String] {
        &self.values
    }
}
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.values.as_slice() {
            [value] => write!(f, "{}{}{}", self.alias, self.operator, value),
            values => write!(f, "{}{}({})", self.alias, self.operator, values.join(" ")),
        }
    }
}

fn parse_error(clause: &str, message: impl Into<String>) -> SpellfallError {
    SpellfallError::Parse {
        clause: clause.to_string(),
        message: message.into(),
    }
}

// ------------- Parsing -------------
/// Splits on whitespace outside parentheses.
fn chunks(query: &str) -> Result<Vec<&str>> {
    let mut chunks = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (position, c) in query.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    let from = start.unwrap_or(position);
                    return Err(parse_error(
                        &query[from..position + c.len_utf8()],
                        "unbalanced parentheses",
                    ));
                }
                depth -= 1;
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(from) = start.take() {
                    chunks.push(&query[from..position]);
                }
                continue;
            }
            _ => (),
        }
        if start.is_none() {
            start = Some(position);
        }
    }
    if let Some(from) = start {
        if depth > 0 {
            return Err(parse_error(&query[from..], "unbalanced parentheses"));
        }
        chunks.push(&query[from..]);
    }
    Ok(chunks)
}

fn explain(text: &str, error: Error<Rule>) -> SpellfallError {
    let position = match error.location {
        InputLocation::Pos(position) => position,
        InputLocation::Span((start, _)) => start,
    };
    let message = match &error.variant {
        ErrorVariant::ParsingError { positives, .. } => {
            if positives.contains(&Rule::operator) {
                String::from("no recognized operator")
            } else if positives.contains(&Rule::alias) {
                String::from("expected a field name before the operator")
            } else if positives.iter().any(|rule| matches!(rule, Rule::token | Rule::group)) {
                String::from("missing value")
            } else {
                format!("unexpected input at position {position}")
            }
        }
        ErrorVariant::CustomError { message } => message.clone(),
    };
    parse_error(text, message)
}

fn parse_clause(text: &str) -> Result<Clause> {
    let mut pairs = ClauseParser::parse(Rule::clause, text).map_err(|e| explain(text, e))?;
    let clause = pairs
        .next()
        .ok_or_else(|| parse_error(text, "empty clause"))?;
    let mut alias = None;
    let mut operator = None;
    let mut values = Vec::new();
    for pair in clause.into_inner() {
        match pair.as_rule() {
            Rule::alias => alias = Some(pair.as_str()),
            Rule::operator => operator = Operator::from_token(pair.as_str()),
            Rule::token => values.push(pair.as_str().to_string()),
            Rule::group => {
                values.extend(pair.into_inner().map(|token| token.as_str().to_string()))
            }
            _ => (),
        }
    }
    let alias = alias.ok_or_else(|| parse_error(text, "expected a field name before the operator"))?;
    let operator = operator.ok_or_else(|| parse_error(text, "no recognized operator"))?;
    if values.is_empty() {
        return Err(parse_error(text, "empty value list"));
    }
    Ok(Clause::new(alias, operator, values))
}

/// Parses a query into its clauses, in the order they were written. A blank
/// query has no clauses.
pub fn parse(query: &str) -> Result<Vec<Clause>> {
    chunks(query)?.into_iter().map(parse_clause).collect()
}
