//! Query grammar: the single-line command surface.
//!
//! Fixed shape, case-insensitive keywords:
//!
//! ```text
//! SELECT <indicator> FROM <asset> WHERE CHANGE=<signed-float> SIM=<int>
//! ```
//!
//! Indicator and asset are identifiers (letters, digits, underscore) and are
//! upper-cased on output. Anything that does not match the full shape is
//! rejected outright; there are no partial parses.

use thiserror::Error;

/// A parsed simulation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub indicator: String,
    pub asset: String,
    pub change: f64,
    pub sim: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("invalid query format: expected `SELECT <indicator> FROM <asset> WHERE CHANGE=<float> SIM=<int>`")]
    InvalidQuery,
}

/// Parse a query string into its structured form.
pub fn parse_query(query: &str) -> Result<ParsedQuery, QueryError> {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.len() != 7 {
        return Err(QueryError::InvalidQuery);
    }

    expect_keyword(tokens[0], "SELECT")?;
    let indicator = expect_ident(tokens[1])?;
    expect_keyword(tokens[2], "FROM")?;
    let asset = expect_ident(tokens[3])?;
    expect_keyword(tokens[4], "WHERE")?;
    let change = parse_float_clause(tokens[5], "CHANGE")?;
    let sim = parse_int_clause(tokens[6], "SIM")?;

    Ok(ParsedQuery {
        indicator,
        asset,
        change,
        sim,
    })
}

fn expect_keyword(token: &str, keyword: &str) -> Result<(), QueryError> {
    if token.eq_ignore_ascii_case(keyword) {
        Ok(())
    } else {
        Err(QueryError::InvalidQuery)
    }
}

fn expect_ident(token: &str) -> Result<String, QueryError> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(QueryError::InvalidQuery);
    }
    Ok(token.to_ascii_uppercase())
}

/// Split `KEY=value` on the first `=`, matching KEY case-insensitively.
fn clause_value<'a>(token: &'a str, key: &str) -> Result<&'a str, QueryError> {
    let (k, v) = token.split_once('=').ok_or(QueryError::InvalidQuery)?;
    if !k.eq_ignore_ascii_case(key) {
        return Err(QueryError::InvalidQuery);
    }
    Ok(v)
}

/// Signed decimal: optional leading `-`, at least one digit, at most one `.`.
fn parse_float_clause(token: &str, key: &str) -> Result<f64, QueryError> {
    let value = clause_value(token, key)?;
    let digits = value.strip_prefix('-').unwrap_or(value);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return Err(QueryError::InvalidQuery),
        }
    }
    if !seen_digit {
        return Err(QueryError::InvalidQuery);
    }
    value.parse().map_err(|_| QueryError::InvalidQuery)
}

fn parse_int_clause(token: &str, key: &str) -> Result<usize, QueryError> {
    let value = clause_value(token, key)?;
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(QueryError::InvalidQuery);
    }
    value.parse().map_err(|_| QueryError::InvalidQuery)
}
