use crate::error::{Error, Result};

/// Selects transactions sold in a given calendar month of any year.
///
/// The month is left-padded with `0` to two characters and placed in a SQLite `GLOB` pattern,
/// `[0-9][0-9][0-9][0-9]-MM-*`, that is matched against the stored date of sale. The match is
/// purely textual: `"3"` and `"03"` are the same filter, while `"13"`, `"x"` or `""` produce a
/// valid filter that matches nothing.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MonthFilter {
    month: String,
    pattern: String,
}

impl MonthFilter {
    pub fn new(month: impl AsRef<str>) -> Self {
        let month = pad_month(month.as_ref());
        let mut pattern = String::from("[0-9][0-9][0-9][0-9]-");
        for c in month.chars() {
            push_literal(&mut pattern, c);
        }
        pattern.push_str("-*");
        Self { month, pattern }
    }

    /// Builds the filter from a query parameter that must be present.
    pub fn required(month: Option<&str>) -> Result<Self> {
        match month {
            Some(m) => Ok(Self::new(m)),
            None => Err(Error::request("Missing required query parameter 'month'")),
        }
    }

    /// The padded month text, e.g. `03`.
    pub fn month(&self) -> &str {
        &self.month
    }

    /// The `GLOB` pattern to bind against `date_of_sale`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

fn pad_month(month: &str) -> String {
    let len = month.chars().count();
    if len >= 2 {
        month.to_string()
    } else {
        format!("{}{month}", "0".repeat(2 - len))
    }
}

/// GLOB treats `*`, `?`, `[` and `]` as special; a single-character class matches them literally.
fn push_literal(pattern: &mut String, c: char) {
    match c {
        '*' | '?' | '[' | ']' => {
            pattern.push('[');
            pattern.push(c);
            pattern.push(']');
        }
        _ => pattern.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;

    #[test]
    fn test_pads_single_digit() {
        let f = MonthFilter::new("3");
        assert_eq!(f.month(), "03");
        assert_eq!(f.pattern(), "[0-9][0-9][0-9][0-9]-03-*");
        assert_eq!(f, MonthFilter::new("03"));
    }

    #[test]
    fn test_two_digits_unchanged() {
        assert_eq!(
            MonthFilter::new("12").pattern(),
            "[0-9][0-9][0-9][0-9]-12-*"
        );
    }

    #[test]
    fn test_empty_and_long_values_are_not_rejected() {
        assert_eq!(MonthFilter::new("").month(), "00");
        assert_eq!(MonthFilter::new("123").month(), "123");
        assert_eq!(MonthFilter::new("march").month(), "march");
    }

    #[test]
    fn test_glob_characters_are_literal() {
        assert_eq!(
            MonthFilter::new("*").pattern(),
            "[0-9][0-9][0-9][0-9]-0[*]-*"
        );
        assert_eq!(
            MonthFilter::new("?]").pattern(),
            "[0-9][0-9][0-9][0-9]-[?][]]-*"
        );
    }

    #[test]
    fn test_required_month_missing() {
        let e = MonthFilter::required(None).unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Request);
        assert!(MonthFilter::required(Some("7")).is_ok());
    }
}
