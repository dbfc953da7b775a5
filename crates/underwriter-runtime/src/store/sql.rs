//! SQLite application store
//!
//! Table `loan_applications`, one row per decision:
//! application_id, applicant fields, decision, decision_reason,
//! approved_amount, interest_rate, risk_score, processing_time_seconds,
//! source, degraded, application_timestamp.

use super::{ApplicationStore, StoredApplication};
use crate::error::{StoreError, StoreResult};
use crate::router::DecisionSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use underwriter_core::{Decision, DecisionResult, LoanApplication};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS loan_applications (
    application_id TEXT PRIMARY KEY,
    applicant_name TEXT NOT NULL,
    age INTEGER NOT NULL,
    annual_income REAL NOT NULL,
    employment_type TEXT NOT NULL,
    credit_score INTEGER NOT NULL,
    loan_amount REAL NOT NULL,
    loan_purpose TEXT NOT NULL,
    loan_term INTEGER NOT NULL,
    down_payment REAL NOT NULL,
    debt_to_income_ratio REAL NOT NULL,
    decision TEXT NOT NULL,
    decision_reason TEXT NOT NULL,
    approved_amount REAL NOT NULL,
    interest_rate REAL NOT NULL,
    risk_score INTEGER NOT NULL,
    processing_time_seconds REAL NOT NULL,
    source TEXT NOT NULL,
    degraded BOOLEAN NOT NULL,
    application_timestamp TEXT NOT NULL
)
"#;

const CREATE_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_loan_applications_timestamp \
     ON loan_applications (application_timestamp)";

const SELECT_COLUMNS: &str = "application_id, applicant_name, age, annual_income, employment_type, \
     credit_score, loan_amount, loan_purpose, loan_term, down_payment, debt_to_income_ratio, \
     decision, decision_reason, approved_amount, interest_rate, risk_score, \
     processing_time_seconds, source, degraded, application_timestamp";

/// Application store backed by SQLite
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Connect to a database URL (e.g. `sqlite:underwriting.db` or
    /// `sqlite::memory:`) and create the schema if needed
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Each connection to an in-memory database sees its own database
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self::from_pool(pool);
        store.init_schema().await?;
        tracing::info!("Connected application store at {}", url);
        Ok(store)
    }

    /// Use an existing pool; call [`init_schema`](Self::init_schema) before use
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    /// Read back an enum stored by its serde string form
    fn parse_enum<T: DeserializeOwned>(column: &str, value: String) -> StoreResult<T> {
        serde_json::from_value(serde_json::Value::String(value))
            .map_err(|e| StoreError::Serialization(format!("{}: {}", column, e)))
    }

    fn row_to_record(row: &SqliteRow) -> StoreResult<StoredApplication> {
        let decision: String = row.try_get("decision")?;
        let decision = Decision::parse(&decision)
            .ok_or_else(|| StoreError::Serialization(format!("decision: unknown value '{}'", decision)))?;

        let application = LoanApplication {
            applicant_name: row.try_get("applicant_name")?,
            age: row.try_get::<i64, _>("age")? as u32,
            annual_income: row.try_get("annual_income")?,
            employment_type: Self::parse_enum("employment_type", row.try_get("employment_type")?)?,
            credit_score: row.try_get::<i64, _>("credit_score")? as u32,
            loan_amount: row.try_get("loan_amount")?,
            loan_purpose: Self::parse_enum("loan_purpose", row.try_get("loan_purpose")?)?,
            loan_term: row.try_get::<i64, _>("loan_term")? as u32,
            down_payment: row.try_get("down_payment")?,
            debt_to_income_ratio: row.try_get("debt_to_income_ratio")?,
        };

        let result = DecisionResult {
            decision,
            approved_amount: row.try_get("approved_amount")?,
            interest_rate: row.try_get("interest_rate")?,
            risk_score: row.try_get::<i64, _>("risk_score")? as i32,
            reasoning: row.try_get("decision_reason")?,
            processing_time: row.try_get("processing_time_seconds")?,
        };

        Ok(StoredApplication {
            application_id: row.try_get("application_id")?,
            created_at: row.try_get("application_timestamp")?,
            application,
            result,
            source: Self::parse_enum::<DecisionSource>("source", row.try_get("source")?)?,
            degraded: row.try_get("degraded")?,
        })
    }
}

#[async_trait]
impl ApplicationStore for SqlStore {
    async fn insert(&self, record: StoredApplication) -> StoreResult<()> {
        let app = &record.application;
        let result = &record.result;

        sqlx::query(
            "INSERT INTO loan_applications (application_id, applicant_name, age, annual_income, \
             employment_type, credit_score, loan_amount, loan_purpose, loan_term, down_payment, \
             debt_to_income_ratio, decision, decision_reason, approved_amount, interest_rate, \
             risk_score, processing_time_seconds, source, degraded, application_timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        )
        .bind(&record.application_id)
        .bind(&app.applicant_name)
        .bind(i64::from(app.age))
        .bind(app.annual_income)
        .bind(app.employment_type.as_str())
        .bind(i64::from(app.credit_score))
        .bind(app.loan_amount)
        .bind(app.loan_purpose.as_str())
        .bind(i64::from(app.loan_term))
        .bind(app.down_payment)
        .bind(app.debt_to_income_ratio)
        .bind(result.decision.as_str())
        .bind(&result.reasoning)
        .bind(result.approved_amount)
        .bind(result.interest_rate)
        .bind(i64::from(result.risk_score))
        .bind(result.processing_time)
        .bind(record.source.as_str())
        .bind(record.degraded)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, application_id: &str) -> StoreResult<Option<StoredApplication>> {
        let query = format!(
            "SELECT {} FROM loan_applications WHERE application_id = ?1",
            SELECT_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(application_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn created_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<StoredApplication>> {
        let query = format!(
            "SELECT {} FROM loan_applications WHERE application_timestamp >= ?1 \
             ORDER BY application_timestamp",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RoutedDecision;
    use chrono::{Duration, TimeZone};
    use underwriter_core::{EmploymentType, LoanPurpose};

    fn application() -> LoanApplication {
        LoanApplication {
            applicant_name: "Persisted".to_string(),
            age: 27,
            annual_income: 64_000.0,
            employment_type: EmploymentType::PartTime,
            credit_score: 690,
            loan_amount: 18_000.0,
            loan_purpose: LoanPurpose::DebtConsolidation,
            loan_term: 48,
            down_payment: 0.0,
            debt_to_income_ratio: 31.5,
        }
    }

    fn routed() -> RoutedDecision {
        RoutedDecision {
            result: DecisionResult {
                decision: Decision::Approved,
                approved_amount: 18_000.0,
                interest_rate: 7.1,
                risk_score: 402,
                reasoning: "Approved".to_string(),
                processing_time: 0.25,
            },
            source: DecisionSource::Http,
            degraded: false,
            fallback_reasons: Vec::new(),
            elapsed: std::time::Duration::from_millis(250),
        }
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let store = SqlStore::connect("sqlite::memory:").await.unwrap();

        let id = store.save(&application(), &routed()).await.unwrap();
        let stored = store.get(&id).await.unwrap().unwrap();

        assert_eq!(stored.application, application());
        assert_eq!(stored.result, routed().result);
        assert_eq!(stored.source, DecisionSource::Http);
        assert!(!stored.degraded);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let store = SqlStore::connect("sqlite::memory:").await.unwrap();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_analytics_uses_timestamp_window() {
        let store = SqlStore::connect("sqlite::memory:").await.unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

        for age_days in [0, 3, 40] {
            let record = StoredApplication::new(&application(), &routed()).at(now - Duration::days(age_days));
            store.insert(record).await.unwrap();
        }

        let summary = store.analytics(now).await.unwrap();
        assert_eq!(summary.applications_today, 1);
        assert_eq!(summary.approval_rate, 100.0);
        assert_eq!(summary.avg_credit_score, 690);

        let trends = store.trends(30, now).await.unwrap();
        assert_eq!(trends.len(), 2);
    }
}
