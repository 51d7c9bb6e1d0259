//! Human-readable input checks run before a calculation is shown.
//!
//! The engines themselves never reject input; these lists let a caller decide
//! whether a result is worth presenting.

use super::investment::normalize_investment;
use super::types::{InvestmentInputs, LoanInputs};

/// Checks the clamped input. The year, frequency and window checks can never
/// fire after clamping; they are kept so the message set matches the web form.
pub fn investment_issues(inputs: &InvestmentInputs) -> Vec<String> {
    let normalized = normalize_investment(inputs);
    let mut issues = Vec::new();

    if normalized.years() < 1 {
        issues.push("Years must be at least 1.".to_string());
    }

    match &normalized {
        InvestmentInputs::Lumpsum(p) => {
            if p.lumpsum_investment <= 0.0 {
                issues.push("Lumpsum amount must be greater than 0.".to_string());
            }
        }
        InvestmentInputs::Hybrid(p) => {
            if p.monthly_investment <= 0.0 {
                issues.push("Monthly SIP amount must be greater than 0.".to_string());
            }
            if p.lumpsum_amount <= 0.0 {
                issues.push("Periodic lumpsum amount must be greater than 0.".to_string());
            }
            if p.lumpsum_every_years < 1 {
                issues.push("Lumpsum frequency must be at least every 1 year.".to_string());
            }
            if p.lumpsum_start_year < 1 || p.lumpsum_start_year > p.years {
                issues.push("Lumpsum start year must be within the time period.".to_string());
            }
            if p.lumpsum_end_year < p.lumpsum_start_year {
                issues.push("Lumpsum end year must be after start year.".to_string());
            }
        }
        InvestmentInputs::Sip(p) => {
            if p.monthly_investment <= 0.0 {
                issues.push("Monthly SIP amount must be greater than 0.".to_string());
            }
        }
        InvestmentInputs::StepUp(p) => {
            if p.monthly_investment <= 0.0 {
                issues.push("Monthly SIP amount must be greater than 0.".to_string());
            }
        }
    }

    if normalized.annual_return_rate() <= -100.0 {
        issues.push("Expected return must be greater than -100%.".to_string());
    }

    issues
}

/// Checks the loan input as entered, before clamping.
pub fn loan_issues(inputs: &LoanInputs) -> Vec<String> {
    let terms = inputs.terms();
    let mut issues = Vec::new();

    if terms.principal.is_nan() || terms.principal <= 0.0 {
        issues.push("Loan amount must be greater than 0.".to_string());
    }
    if terms.years < 1 {
        issues.push("Loan tenure must be at least 1 year.".to_string());
    }
    if terms.annual_interest_rate < 0.0 {
        issues.push("Interest rate cannot be negative.".to_string());
    }

    if let LoanInputs::Neutralize(n) = inputs {
        if n.mf_monthly_investment < 0.0 {
            issues.push("MF monthly investment cannot be negative.".to_string());
        }
        if n.mf_annual_return_rate <= -100.0 {
            issues.push("MF expected return must be greater than -100%.".to_string());
        }
    }

    issues
}
