//! Shared scoring formulas for the built-in backends

use underwriter_core::LoanApplication;

pub(crate) const MIN_RISK_SCORE: f64 = 300.0;
pub(crate) const MAX_RISK_SCORE: f64 = 850.0;

/// Risk score on the 300-850 scale; higher means riskier
///
/// Sums a credit component (700 - credit score), a loan-to-income component
/// (loan / income * 100, or 100 without income) and twice the
/// debt-to-income percentage, then clamps.
pub(crate) fn risk_score(application: &LoanApplication) -> i32 {
    let credit_risk = 700.0 - f64::from(application.credit_score);
    let income_risk = if application.annual_income > 0.0 {
        application.loan_amount / application.annual_income * 100.0
    } else {
        100.0
    };
    let debt_risk = application.debt_to_income_ratio * 2.0;

    (credit_risk + income_risk + debt_risk)
        .clamp(MIN_RISK_SCORE, MAX_RISK_SCORE)
        .round() as i32
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
