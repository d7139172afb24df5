use crate::error::{Error, Result};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 10;

/// One page of the transaction listing. `page` is 1-based; a `per_page` of zero means no limit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Page {
    page: u32,
    per_page: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Page {
    pub fn new(page: u32, per_page: u32) -> Result<Self> {
        if page == 0 {
            return Err(Error::request("Query parameter 'page' must be 1 or greater"));
        }
        Ok(Self { page, per_page })
    }

    /// Parses the raw `page` and `perPage` query parameters, applying defaults when absent.
    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> Result<Self> {
        let page = parse_number("page", page, DEFAULT_PAGE)?;
        let per_page = parse_number("perPage", per_page, DEFAULT_PER_PAGE)?;
        Self::new(page, per_page)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Rows to skip: `(page - 1) * per_page`.
    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    /// Rows to return. SQLite treats a negative limit as unbounded.
    pub(crate) fn limit(&self) -> i64 {
        match self.per_page {
            0 => -1,
            n => i64::from(n),
        }
    }
}

fn parse_number(name: &str, value: Option<&str>, default: u32) -> Result<u32> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s.parse::<u32>().map_err(|_| {
            Error::request(format!(
                "Query parameter '{name}' must be a non-negative integer, got '{s}'"
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Page::parse(None, None).unwrap();
        assert_eq!(p, Page::default());
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_second_page_of_five() {
        let p = Page::parse(Some("2"), Some("5")).unwrap();
        assert_eq!(p.offset(), 5);
        assert_eq!(p.limit(), 5);
    }

    #[test]
    fn test_zero_per_page_is_unbounded() {
        let p = Page::parse(Some("3"), Some("0")).unwrap();
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), -1);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Page::parse(Some("0"), None).is_err());
        assert!(Page::parse(Some("-1"), None).is_err());
        assert!(Page::parse(None, Some("ten")).is_err());
        assert!(Page::parse(Some("1.5"), None).is_err());
    }
}
