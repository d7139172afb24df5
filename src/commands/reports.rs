//! Monthly aggregates: statistics, the price histogram, the category breakdown and all three
//! combined.

use crate::db::Db;
use crate::error::{ErrorType, IntoResult};
use crate::model::{
    CategoryCount, Combined, MonthFilter, PriceRangeCount, Statistics, PRICE_BUCKETS,
};
use crate::Result;
use futures::future::try_join_all;
use std::future::Future;

/// Total sale amount and sold/unsold counts for the month. The three queries run concurrently and
/// are not isolated from a concurrent reload.
pub async fn statistics(db: &Db, filter: &MonthFilter) -> Result<Statistics> {
    let (total_sale_amount, total_sold_items, total_unsold_items) = tokio::try_join!(
        db.sum_price(filter),
        db.count_sold(filter, true),
        db.count_sold(filter, false)
    )
    .pub_result(ErrorType::Database)?;

    Ok(Statistics {
        total_sale_amount,
        total_sold_items,
        total_unsold_items,
    })
}

/// One count per fixed price bucket, in bucket order.
pub async fn price_range(db: &Db, filter: &MonthFilter) -> Result<Vec<PriceRangeCount>> {
    try_join_all(PRICE_BUCKETS.iter().map(|bucket| async move {
        let count = db.count_in_range(filter, bucket).await?;
        Ok::<_, anyhow::Error>(PriceRangeCount {
            range: bucket.label().to_string(),
            count,
        })
    }))
    .await
    .pub_result(ErrorType::Database)
}

/// Transaction count per category. Order is unspecified.
pub async fn category_breakdown(db: &Db, filter: &MonthFilter) -> Result<Vec<CategoryCount>> {
    db.category_counts(filter)
        .await
        .pub_result(ErrorType::Database)
}

/// Statistics, price histogram and category breakdown for the month in one response.
pub async fn combined(db: &Db, filter: &MonthFilter) -> Result<Combined> {
    compose(
        statistics(db, filter),
        price_range(db, filter),
        category_breakdown(db, filter),
    )
    .await
}

/// Awaits the three parts concurrently. If any part fails the whole call fails.
pub(crate) async fn compose<S, P, C>(
    statistics: S,
    price_range: P,
    category_breakdown: C,
) -> Result<Combined>
where
    S: Future<Output = Result<Statistics>>,
    P: Future<Output = Result<Vec<PriceRangeCount>>>,
    C: Future<Output = Result<Vec<CategoryCount>>>,
{
    let (statistics, price_range, category_breakdown) =
        tokio::try_join!(statistics, price_range, category_breakdown)?;
    Ok(Combined {
        statistics,
        price_range,
        category_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{record, TestEnv};
    use crate::Error;

    #[tokio::test]
    async fn test_statistics_example() {
        let env = TestEnv::new().await;
        env.seed(&[record("A", 150.0, "2023-03-05", "X", true)])
            .await;

        let march = statistics(env.db(), &MonthFilter::new("3")).await.unwrap();
        assert_eq!(march.total_sale_amount, 150.0);
        assert_eq!(march.total_sold_items, 1);
        assert_eq!(march.total_unsold_items, 0);

        let april = statistics(env.db(), &MonthFilter::new("4")).await.unwrap();
        assert_eq!(april.total_sale_amount, 0.0);
        assert_eq!(april.total_sold_items, 0);
        assert_eq!(april.total_unsold_items, 0);
    }

    #[tokio::test]
    async fn test_sold_plus_unsold_is_month_count_for_seed_data() {
        let env = TestEnv::seeded().await;
        for month in 1..=12 {
            let filter = MonthFilter::new(month.to_string());
            let stats = statistics(env.db(), &filter).await.unwrap();
            let count = env.db().count(&filter).await.unwrap();
            assert_eq!(stats.total_sold_items + stats.total_unsold_items, count);
        }
    }

    #[tokio::test]
    async fn test_histogram_sums_to_month_count_for_seed_data() {
        let env = TestEnv::seeded().await;
        for month in 1..=12 {
            let filter = MonthFilter::new(format!("{month:02}"));
            let buckets = price_range(env.db(), &filter).await.unwrap();
            let total: u64 = buckets.iter().map(|b| b.count).sum();
            assert_eq!(total, env.db().count(&filter).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_price_range_labels_and_boundaries() {
        let env = TestEnv::new().await;
        env.seed(&[
            record("a", 0.0, "2022-07-01", "X", true),
            record("b", 100.0, "2022-07-01", "X", true),
            record("c", 100.5, "2022-07-01", "X", true),
            record("d", 101.0, "2022-07-01", "X", true),
            record("e", 900.0, "2022-07-01", "X", true),
            record("f", 900.01, "2022-07-01", "X", true),
            record("g", 5000.0, "2022-07-01", "X", true),
        ])
        .await;

        let buckets = price_range(env.db(), &MonthFilter::new("7")).await.unwrap();

        let labels: Vec<_> = buckets.iter().map(|b| b.range.as_str()).collect();
        assert_eq!(
            labels,
            [
                "0-100", "101-200", "201-300", "301-400", "401-500", "501-600", "601-700",
                "701-800", "801-900", "901-above"
            ]
        );
        let counts: Vec<_> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, [2, 2, 0, 0, 0, 0, 0, 0, 1, 2]);
    }

    #[tokio::test]
    async fn test_category_breakdown_groups_missing_category() {
        let env = TestEnv::new().await;
        let mut uncategorized = record("n", 1.0, "2022-02-01", "", false);
        uncategorized.category = None;
        env.seed(&[
            record("a", 1.0, "2022-02-01", "X", true),
            record("b", 1.0, "2022-02-01", "X", true),
            record("c", 1.0, "2022-02-01", "Y", true),
            uncategorized,
        ])
        .await;

        let mut rows = category_breakdown(env.db(), &MonthFilter::new("2"))
            .await
            .unwrap();
        rows.sort_by(|a, b| a.category.cmp(&b.category));

        assert_eq!(
            rows,
            vec![
                CategoryCount {
                    category: None,
                    count: 1
                },
                CategoryCount {
                    category: Some("X".into()),
                    count: 2
                },
                CategoryCount {
                    category: Some("Y".into()),
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_combined_matches_individual_calls() {
        let env = TestEnv::seeded().await;
        let filter = MonthFilter::new("3");

        let all = combined(env.db(), &filter).await.unwrap();

        assert_eq!(all.statistics, statistics(env.db(), &filter).await.unwrap());
        assert_eq!(all.price_range, price_range(env.db(), &filter).await.unwrap());
        assert_eq!(all.category_breakdown.len(), 2);
    }

    #[tokio::test]
    async fn test_compose_fails_when_one_part_fails() {
        let env = TestEnv::seeded().await;
        let filter = MonthFilter::new("3");

        let result = compose(
            statistics(env.db(), &filter),
            price_range(env.db(), &filter),
            async {
                Err::<Vec<CategoryCount>, _>(Error::new(
                    ErrorType::Database,
                    anyhow::anyhow!("category query failed"),
                ))
            },
        )
        .await;

        let e = result.unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Database);
        assert_eq!(e.message(), "category query failed");
    }
}
