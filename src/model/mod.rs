//! Types that represent the core data model, such as `Transaction` and `MonthFilter`, and the
//! shapes of the aggregate reports.
mod month;
mod page;
mod price_range;
mod report;
mod transaction;

pub use month::MonthFilter;
pub use page::Page;
pub use price_range::{PriceBucket, PRICE_BUCKETS};
pub use report::{CategoryCount, Combined, PriceRangeCount, Statistics};
pub use transaction::{NewTransaction, SaleDate, Transaction};
