use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A transaction row as it is stored and returned by the `/transactions` endpoint.
///
/// Every field other than `id` is optional because the loader does not require any of them to be
/// present in the upstream data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Identifier generated by the store.
    pub(crate) id: i64,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) price: Option<f64>,
    /// UTC timestamp text, e.g. `2022-03-05T00:00:00.000Z`.
    pub(crate) date_of_sale: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) sold: Option<bool>,
}

impl Transaction {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

}

/// A transaction as it arrives from the dataset source, before the store assigns an `id`.
///
/// Unknown fields in the upstream JSON (such as `id` and `image`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) price: Option<f64>,
    #[serde(default)]
    pub(crate) date_of_sale: Option<SaleDate>,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default)]
    pub(crate) sold: Option<bool>,
}

impl NewTransaction {
    pub fn new(
        title: impl Into<String>,
        price: f64,
        date_of_sale: SaleDate,
        category: impl Into<String>,
        sold: bool,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
            price: Some(price),
            date_of_sale: Some(date_of_sale),
            category: Some(category.into()),
            sold: Some(sold),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The moment a product was sold, normalized to UTC.
///
/// Parses either an RFC 3339 timestamp (any offset, converted to UTC) or a plain `YYYY-MM-DD`
/// date (midnight UTC). Displays in the store format, `YYYY-MM-DDTHH:MM:SS.mmmZ`, which is what
/// the month filter matches against.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SaleDate(DateTime<Utc>);

impl FromStr for SaleDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .with_context(|| format!("Unable to build midnight for '{s}'"))?;
            return Ok(Self(midnight.and_utc()));
        }
        bail!("Unable to parse '{s}' as a date of sale")
    }
}

impl Display for SaleDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

serde_plain::derive_serialize_from_display!(SaleDate);
serde_plain::derive_deserialize_from_fromstr!(SaleDate, "an RFC 3339 timestamp or YYYY-MM-DD");
