use serde::Serialize;

/// Headline counts for the analytics view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_products: usize,
    pub total_categories: usize,
    pub recent_products: usize,
    pub discounted_products: usize,
}

/// Product count for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Price histogram. Bucket bounds are inclusive except the open top bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceRanges {
    #[serde(rename = "0-50")]
    pub up_to_50: usize,
    #[serde(rename = "51-100")]
    pub up_to_100: usize,
    #[serde(rename = "101-200")]
    pub up_to_200: usize,
    #[serde(rename = "201-500")]
    pub up_to_500: usize,
    #[serde(rename = "501+")]
    pub above_500: usize,
}

impl PriceRanges {
    /// Sum of all buckets.
    pub fn total(&self) -> usize {
        self.up_to_50 + self.up_to_100 + self.up_to_200 + self.up_to_500 + self.above_500
    }
}

/// Chart-ready groupings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub products_by_category: Vec<CategoryCount>,
    pub price_ranges: PriceRanges,
}

/// Everything the analytics view shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub stats: Stats,
    pub chart_data: ChartData,
}
