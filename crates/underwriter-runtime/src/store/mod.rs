//! Application store
//!
//! Persists each application together with the decision it received, and
//! answers the dashboard queries (daily counts, approval rate, averages).
//!
//! Implementations:
//! - [`MemoryStore`] - process-local, the default
//! - [`SqlStore`] - SQLite through sqlx (requires the `sqlx` feature)

mod memory;
#[cfg(feature = "sqlx")]
mod sql;

pub use memory::MemoryStore;
#[cfg(feature = "sqlx")]
pub use sql::SqlStore;

use crate::error::StoreResult;
use crate::router::{DecisionSource, RoutedDecision};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use underwriter_core::{Decision, DecisionResult, LoanApplication};

/// Window for the approval rate and average credit score
const LONG_WINDOW_DAYS: i64 = 30;

/// Window for the average processing time
const SHORT_WINDOW_DAYS: i64 = 7;

/// A stored application and its decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredApplication {
    pub application_id: String,

    pub created_at: DateTime<Utc>,

    pub application: LoanApplication,

    pub result: DecisionResult,

    pub source: DecisionSource,

    pub degraded: bool,
}

impl StoredApplication {
    /// New record for a routed decision, with a fresh id and the current time
    pub fn new(application: &LoanApplication, routed: &RoutedDecision) -> Self {
        Self {
            application_id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            application: application.clone(),
            result: routed.result.clone(),
            source: routed.source,
            degraded: routed.degraded,
        }
    }

    /// Override the creation time
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Dashboard headline figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub applications_today: u64,

    /// Percent approved over the last 30 days, one decimal
    pub approval_rate: f64,

    /// Mean seconds per decision over the last 7 days, one decimal
    pub avg_processing_time: f64,

    /// Mean credit score over the last 30 days
    pub avg_credit_score: u32,
}

/// Per-day application counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub total: u64,
    pub approved: u64,
    pub rejected: u64,
    pub avg_loan_amount: f64,
    pub avg_credit_score: f64,
}

/// Storage for applications and their decisions
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Store a complete record
    async fn insert(&self, record: StoredApplication) -> StoreResult<()>;

    /// Look up a record by id
    async fn get(&self, application_id: &str) -> StoreResult<Option<StoredApplication>>;

    /// Records created at or after `since`
    async fn created_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<StoredApplication>>;

    /// Record a routed decision and return its new application id
    async fn save(
        &self,
        application: &LoanApplication,
        routed: &RoutedDecision,
    ) -> StoreResult<String> {
        let record = StoredApplication::new(application, routed);
        let id = record.application_id.clone();
        self.insert(record).await?;
        tracing::info!("Loan application {} saved", id);
        Ok(id)
    }

    /// Headline figures as of `now`
    async fn analytics(&self, now: DateTime<Utc>) -> StoreResult<AnalyticsSummary> {
        let records = self
            .created_since(window_start(now, LONG_WINDOW_DAYS))
            .await?;
        Ok(summarize(&records, now))
    }

    /// Daily figures for the last `days` days, oldest first
    async fn trends(&self, days: u32, now: DateTime<Utc>) -> StoreResult<Vec<DailyTrend>> {
        let records = self.created_since(window_start(now, i64::from(days))).await?;
        Ok(daily_trends(&records))
    }
}

/// Midnight UTC `days` days before the date of `now`
pub(crate) fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let midnight = now.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
    midnight.and_utc() - Duration::days(days)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn summarize(records: &[StoredApplication], now: DateTime<Utc>) -> AnalyticsSummary {
    let today = now.date_naive();
    let long_start = window_start(now, LONG_WINDOW_DAYS);
    let short_start = window_start(now, SHORT_WINDOW_DAYS);

    let recent: Vec<&StoredApplication> = records
        .iter()
        .filter(|r| r.created_at >= long_start)
        .collect();

    let applications_today = recent
        .iter()
        .filter(|r| r.created_at.date_naive() == today)
        .count() as u64;

    let approved = recent.iter().filter(|r| r.result.is_approved()).count();
    let approval_rate = if recent.is_empty() {
        0.0
    } else {
        round1(approved as f64 / recent.len() as f64 * 100.0)
    };

    let avg_processing_time = round1(mean(
        recent
            .iter()
            .filter(|r| r.created_at >= short_start)
            .map(|r| r.result.processing_time),
    ));

    let avg_credit_score = mean(recent.iter().map(|r| f64::from(r.application.credit_score))).round() as u32;

    AnalyticsSummary {
        applications_today,
        approval_rate,
        avg_processing_time,
        avg_credit_score,
    }
}

fn daily_trends(records: &[StoredApplication]) -> Vec<DailyTrend> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&StoredApplication>> = BTreeMap::new();
    for record in records {
        by_day
            .entry(record.created_at.date_naive())
            .or_default()
            .push(record);
    }

    by_day
        .into_iter()
        .map(|(date, day)| DailyTrend {
            date,
            total: day.len() as u64,
            approved: day
                .iter()
                .filter(|r| r.result.decision == Decision::Approved)
                .count() as u64,
            rejected: day
                .iter()
                .filter(|r| r.result.decision == Decision::Rejected)
                .count() as u64,
            avg_loan_amount: mean(day.iter().map(|r| r.application.loan_amount)),
            avg_credit_score: mean(day.iter().map(|r| f64::from(r.application.credit_score))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_start_is_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 15, 42, 7).unwrap();
        assert_eq!(
            window_start(now, 30),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_mean_of_nothing_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(66.666), 66.7);
    }
}
