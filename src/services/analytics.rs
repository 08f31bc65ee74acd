use chrono::{DateTime, Duration, Utc};

use crate::{
    error::Result,
    models::{
        analytics::{AnalyticsSummary, CategoryCount, ChartData, PriceRanges, Stats},
        category::Category,
        product::{Product, ProductFilter},
    },
    state::AppState,
};

/// How far back a product still counts as recent.
const RECENT_WINDOW_DAYS: i64 = 7;

fn bucket(ranges: &mut PriceRanges, price: f64) {
    let slot = if price <= 50.0 {
        &mut ranges.up_to_50
    } else if price <= 100.0 {
        &mut ranges.up_to_100
    } else if price <= 200.0 {
        &mut ranges.up_to_200
    } else if price <= 500.0 {
        &mut ranges.up_to_500
    } else {
        &mut ranges.above_500
    };
    *slot += 1;
}

/// Computes the analytics view from the full product and category sets.
///
/// Every product lands in exactly one price bucket, so the bucket counts
/// always add up to `stats.total_products`.
pub fn summarize(products: &[Product], categories: &[Category], now: DateTime<Utc>) -> AnalyticsSummary {
    let recent_since = now - Duration::days(RECENT_WINDOW_DAYS);

    let mut price_ranges = PriceRanges::default();
    for product in products {
        bucket(&mut price_ranges, product.price);
    }

    let products_by_category = categories
        .iter()
        .map(|category| CategoryCount {
            name: category.name.clone(),
            count: products.iter().filter(|p| p.category == category.id).count(),
        })
        .collect();

    AnalyticsSummary {
        stats: Stats {
            total_products: products.len(),
            total_categories: categories.len(),
            recent_products: products
                .iter()
                .filter(|p| p.created_at >= recent_since)
                .count(),
            discounted_products: products
                .iter()
                .filter(|p| p.discount.is_some_and(|d| d > 0.0))
                .count(),
        },
        chart_data: ChartData {
            products_by_category,
            price_ranges,
        },
    }
}

/// Loads both collections and summarizes them.
pub async fn load_summary(state: &AppState) -> Result<AnalyticsSummary> {
    let products = state.products.list(&ProductFilter::default()).await?;
    let categories = state.categories.list().await?;
    Ok(summarize(&products, &categories, Utc::now()))
}
