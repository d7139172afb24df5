use serde::{Deserialize, Serialize};

/// Monthly totals returned by `/statistics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Sum of `price` over every transaction in the month, sold or not.
    pub total_sale_amount: f64,
    pub total_sold_items: u64,
    pub total_unsold_items: u64,
}

/// One bar of `/price-range`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    pub range: String,
    pub count: u64,
}

/// One slice of `/category-breakdown`. Transactions without a category form their own group with
/// a `null` category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Option<String>,
    pub count: u64,
}

/// The merged body of `/combined`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combined {
    pub statistics: Statistics,
    pub price_range: Vec<PriceRangeCount>,
    pub category_breakdown: Vec<CategoryCount>,
}
