//! KPI aggregation.
//!
//! Pure function from a [`Dataset`] to a [`KpiBundle`]. Keys are simply
//! absent when their prerequisite columns are missing; callers treat absence
//! as "not applicable", never as zero.

use chrono::Duration;
use indexmap::IndexMap;
use serde::Serialize;

use crate::dataset::Dataset;

/// Revenue over the trailing 30-day window vs the preceding one, anchored at
/// the dataset's maximum parseable date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendWindow {
    pub recent: f64,
    pub prior: f64,
}

/// Computed business metrics. All scalars are floating point even when the
/// source column is integral.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<f64>,

    /// Region -> revenue total, ordered by descending revenue. Ties keep the
    /// first-encountered insertion order of the grouping pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_region: Option<IndexMap<String, f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_30d: Option<TrendWindow>,
}

impl KpiBundle {
    pub fn is_empty(&self) -> bool {
        self.total_revenue.is_none() && self.by_region.is_none() && self.trend_30d.is_none()
    }

    /// Flatten into `key: value` lines for the exported KPI listing.
    pub fn lines(&self) -> Vec<(String, String)> {
        let mut lines = Vec::new();
        if let Some(total) = self.total_revenue {
            lines.push(("Total revenue".to_string(), format!("{total:.2}")));
        }
        if let Some(by_region) = &self.by_region {
            for (region, revenue) in by_region {
                lines.push((format!("Revenue ({region})"), format!("{revenue:.2}")));
            }
        }
        if let Some(trend) = self.trend_30d {
            lines.push((
                "Trend (last 30 days)".to_string(),
                format!("{:.2} vs {:.2} prior", trend.recent, trend.prior),
            ));
        }
        lines
    }
}

/// Compute the KPI bundle for a dataset. Pure, no side effects.
pub fn compute_kpis(dataset: &Dataset) -> KpiBundle {
    KpiBundle {
        total_revenue: total_revenue(dataset),
        by_region: by_region(dataset),
        trend_30d: trend_30d(dataset),
    }
}

fn total_revenue(dataset: &Dataset) -> Option<f64> {
    if !dataset.has_revenue {
        return None;
    }
    Some(dataset.rows.iter().filter_map(|r| r.revenue).sum())
}

fn by_region(dataset: &Dataset) -> Option<IndexMap<String, f64>> {
    if !dataset.has_region || !dataset.has_revenue {
        return None;
    }

    let mut groups: IndexMap<String, f64> = IndexMap::new();
    for row in &dataset.rows {
        if let Some(region) = &row.region {
            *groups.entry(region.clone()).or_insert(0.0) += row.revenue.unwrap_or(0.0);
        }
    }

    // Stable sort keeps insertion order for equal revenue sums.
    groups.sort_by(|_, a, _, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    Some(groups)
}

fn trend_30d(dataset: &Dataset) -> Option<TrendWindow> {
    if !dataset.has_date || !dataset.has_revenue {
        return None;
    }

    // Rows with unparseable dates are excluded from both windows.
    let max_date = dataset.rows.iter().filter_map(|r| r.date).max()?;
    let recent_start = max_date - Duration::days(30);
    let prior_start = max_date - Duration::days(60);

    let mut recent = 0.0;
    let mut prior = 0.0;
    for row in &dataset.rows {
        let (Some(date), Some(revenue)) = (row.date, row.revenue) else {
            continue;
        };
        if date >= recent_start && date <= max_date {
            recent += revenue;
        } else if date >= prior_start && date < recent_start {
            prior += revenue;
        }
    }

    Some(TrendWindow { recent, prior })
}
