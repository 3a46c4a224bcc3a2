//! Parsing of free-form coordinate cells.

use crate::error::CoordinateError;

fn is_delimiter(c: char) -> bool {
    c == ',' || c == ';' || c.is_whitespace()
}

/// Parses a delimited coordinate string into its numeric values.
///
/// Tokens are separated by any run of commas, semicolons or whitespace, so
/// `"55.75, 37.62"`, `"55.75;37.62"` and `"55.75 37.62"` all yield
/// `[55.75, 37.62]`. Values keep the order they were written in and the count
/// is not checked; that is up to the caller.
///
/// # Errors
///
/// Returns [`CoordinateError::Malformed`] for the first token that is not a
/// finite base-10 number.
///
/// # Examples
///
/// ```
/// use geosheet_core::coordinates::parse_coordinates;
///
/// assert_eq!(parse_coordinates("55.75, 37.62").unwrap(), vec![55.75, 37.62]);
/// assert!(parse_coordinates("1.5,abc").is_err());
/// ```
pub fn parse_coordinates(text: &str) -> Result<Vec<f64>, CoordinateError> {
    text.split(is_delimiter)
        .filter(|token| !token.is_empty())
        .map(|token| parse_token(token, text))
        .collect()
}

fn parse_token(token: &str, text: &str) -> Result<f64, CoordinateError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoordinateError::Malformed {
            token: token.to_string(),
            text: text.to_string(),
        }),
    }
}
