//! Shared fixtures for runtime integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use underwriter_core::{EmploymentType, LoanApplication, LoanPurpose};

/// A typical applicant with the given credit score and debt-to-income ratio
pub fn application(credit_score: u32, debt_to_income_ratio: f64, loan_amount: f64) -> LoanApplication {
    LoanApplication {
        applicant_name: "Jordan Rivera".to_string(),
        age: 34,
        annual_income: 120_000.0,
        employment_type: EmploymentType::FullTime,
        credit_score,
        loan_amount,
        loan_purpose: LoanPurpose::HomePurchase,
        loan_term: 360,
        down_payment: 60_000.0,
        debt_to_income_ratio,
    }
}

/// A well-formed approval as an external service would send it
pub fn approved_body() -> Value {
    json!({
        "decision": "approved",
        "approved_amount": 200000,
        "interest_rate": 5.25,
        "risk_score": 412,
        "reasoning": "Strong credit history and low debt burden",
        "processing_time": 1.8
    })
}

/// Address of a local port with nothing listening on it
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/decide", addr)
}
