use std::collections::HashMap;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::metrics_dto::{ComparisonRow, RecommendationItem};
use crate::error::Result;

const LOOKBACK_DAYS: i64 = 30;

#[derive(Clone)]
pub struct AnalyticsService {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct CategorySample {
    category: String,
    value: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct ComparisonAggregates {
    metric_id: Uuid,
    name: String,
    category: String,
    current_avg: f64,
    previous_avg: f64,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Trend-based recommendations over the last 30 days of samples,
    /// grouped by metric category.
    pub async fn recommendations(&self) -> Result<Vec<RecommendationItem>> {
        let since = Utc::now() - Duration::days(LOOKBACK_DAYS);
        let samples = sqlx::query_as::<_, CategorySample>(
            r#"
            SELECT m.category, ms.value
            FROM metric_samples ms
            JOIN metrics m ON m.id = ms.metric_id
            WHERE ms.recorded_at >= $1
            ORDER BY ms.recorded_at DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
        for sample in samples {
            if !groups.contains_key(&sample.category) {
                order.push(sample.category.clone());
            }
            groups.entry(sample.category).or_default().push(sample.value);
        }

        let mut recommendations = Vec::new();
        for category in order {
            let values = &groups[&category];
            if values.len() < 2 {
                continue;
            }
            // Values arrive newest first.
            let latest = values[0];
            let earliest = values[values.len() - 1];
            let Some(trend) = trend_percent(earliest, latest) else {
                continue;
            };
            if let Some(item) = recommendation_for(&category, trend) {
                recommendations.push(item);
            }
        }

        Ok(recommendations)
    }

    /// Mean value per metric over the current 30-day window against the 30
    /// days before it. Metrics with no samples in the previous window are
    /// omitted, there is no baseline to compare against.
    pub async fn comparison(&self) -> Result<Vec<ComparisonRow>> {
        let now = Utc::now();
        let window_start = now - Duration::days(LOOKBACK_DAYS);
        let previous_start = now - Duration::days(LOOKBACK_DAYS * 2);

        let aggregates = sqlx::query_as::<_, ComparisonAggregates>(
            r#"
            SELECT m.id AS metric_id, m.name, m.category,
                   COALESCE(AVG(ms.value) FILTER (WHERE ms.recorded_at >= $1), 0) AS current_avg,
                   COALESCE(AVG(ms.value) FILTER (WHERE ms.recorded_at < $1), 0) AS previous_avg
            FROM metrics m
            LEFT JOIN metric_samples ms
                ON ms.metric_id = m.id AND ms.recorded_at >= $2
            GROUP BY m.id, m.name, m.category
            ORDER BY m.name
            "#,
        )
        .bind(window_start)
        .bind(previous_start)
        .fetch_all(&self.pool)
        .await?;

        let rows = aggregates
            .into_iter()
            .filter_map(|agg| {
                let change = change_percent(agg.current_avg, agg.previous_avg)?;
                Some(ComparisonRow {
                    metric_id: agg.metric_id,
                    name: agg.name,
                    category: agg.category,
                    current: agg.current_avg,
                    previous: agg.previous_avg,
                    change_percent: change,
                })
            })
            .collect();

        Ok(rows)
    }
}

/// Relative change from the earliest to the latest sample, as a percentage.
/// An earliest value of zero has no meaningful relative change.
fn trend_percent(earliest: f64, latest: f64) -> Option<f64> {
    if earliest == 0.0 {
        return None;
    }
    Some((latest - earliest) / earliest * 100.0)
}

fn recommendation_for(category: &str, trend: f64) -> Option<RecommendationItem> {
    let (impact, description) = if trend < -10.0 {
        ("high", format!("Critical decline in {category}"))
    } else if trend < -5.0 {
        ("medium", format!("Decline in {category}"))
    } else if trend > 10.0 {
        ("low", format!("Strong growth in {category}"))
    } else {
        return None;
    };

    let reason = if trend < 0.0 {
        format!("Down {:.1}% over the last 30 days", trend.abs())
    } else {
        format!("Up {:.1}% over the last 30 days", trend)
    };

    Some(RecommendationItem {
        metric: category.to_string(),
        description,
        reason,
        impact: impact.to_string(),
    })
}

/// Percentage change between two window means, rounded to one decimal.
/// A previous mean of zero yields no comparison.
fn change_percent(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some(((current - previous) / previous * 1000.0).round() / 10.0)
}
