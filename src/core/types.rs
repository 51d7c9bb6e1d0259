use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentMode {
    Sip,
    StepUp,
    Lumpsum,
    Hybrid,
}

impl InvestmentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InvestmentMode::Sip => "sip",
            InvestmentMode::StepUp => "stepup",
            InvestmentMode::Lumpsum => "lumpsum",
            InvestmentMode::Hybrid => "hybrid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InvestmentMode::Sip => "SIP",
            InvestmentMode::StepUp => "Step-up SIP",
            InvestmentMode::Lumpsum => "Lumpsum",
            InvestmentMode::Hybrid => "SIP + Lumpsum",
        }
    }
}

impl FromStr for InvestmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sip" => Ok(InvestmentMode::Sip),
            "stepup" => Ok(InvestmentMode::StepUp),
            "lumpsum" => Ok(InvestmentMode::Lumpsum),
            "hybrid" => Ok(InvestmentMode::Hybrid),
            other => Err(format!("unknown investment mode: {other}")),
        }
    }
}

impl fmt::Display for InvestmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanMode {
    Emi,
    Neutralize,
}

impl LoanMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LoanMode::Emi => "emi",
            LoanMode::Neutralize => "neutralize",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoanMode::Emi => "Home Loan EMI",
            LoanMode::Neutralize => "EMI + MF neutralizer",
        }
    }
}

impl FromStr for LoanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emi" => Ok(LoanMode::Emi),
            "neutralize" => Ok(LoanMode::Neutralize),
            other => Err(format!("unknown loan mode: {other}")),
        }
    }
}

impl fmt::Display for LoanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-number input field. JSON bodies may carry fractional counts; they are
/// rounded half away from zero and saturate into `u32`.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    Ok(value.round() as u32)
}

/// Flat monthly SIP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipPlan {
    pub monthly_investment: f64,
    pub annual_return_rate: f64,
    #[serde(deserialize_with = "whole_number")]
    pub years: u32,
}

/// Monthly SIP that grows by `annual_step_up_percent` once per elapsed year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpPlan {
    pub monthly_investment: f64,
    pub annual_step_up_percent: f64,
    pub annual_return_rate: f64,
    #[serde(deserialize_with = "whole_number")]
    pub years: u32,
}

/// Single deposit at the start of year 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpsumPlan {
    pub lumpsum_investment: f64,
    pub annual_return_rate: f64,
    #[serde(deserialize_with = "whole_number")]
    pub years: u32,
}

/// SIP (optionally stepped up) plus a periodic lumpsum deposited at the start of
/// every `lumpsum_every_years`-th year between the 1-based start and end years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridPlan {
    pub monthly_investment: f64,
    pub step_up_enabled: bool,
    pub annual_step_up_percent: f64,
    pub lumpsum_amount: f64,
    #[serde(deserialize_with = "whole_number")]
    pub lumpsum_every_years: u32,
    #[serde(deserialize_with = "whole_number")]
    pub lumpsum_start_year: u32,
    #[serde(deserialize_with = "whole_number")]
    pub lumpsum_end_year: u32,
    pub annual_return_rate: f64,
    #[serde(deserialize_with = "whole_number")]
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum InvestmentInputs {
    Sip(SipPlan),
    StepUp(StepUpPlan),
    Lumpsum(LumpsumPlan),
    Hybrid(HybridPlan),
}

impl InvestmentInputs {
    pub fn mode(&self) -> InvestmentMode {
        match self {
            InvestmentInputs::Sip(_) => InvestmentMode::Sip,
            InvestmentInputs::StepUp(_) => InvestmentMode::StepUp,
            InvestmentInputs::Lumpsum(_) => InvestmentMode::Lumpsum,
            InvestmentInputs::Hybrid(_) => InvestmentMode::Hybrid,
        }
    }

    pub fn annual_return_rate(&self) -> f64 {
        match self {
            InvestmentInputs::Sip(p) => p.annual_return_rate,
            InvestmentInputs::StepUp(p) => p.annual_return_rate,
            InvestmentInputs::Lumpsum(p) => p.annual_return_rate,
            InvestmentInputs::Hybrid(p) => p.annual_return_rate,
        }
    }

    pub fn years(&self) -> u32 {
        match self {
            InvestmentInputs::Sip(p) => p.years,
            InvestmentInputs::StepUp(p) => p.years,
            InvestmentInputs::Lumpsum(p) => p.years,
            InvestmentInputs::Hybrid(p) => p.years,
        }
    }

    pub fn months(&self) -> u32 {
        self.years() * 12
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRow {
    pub year: u32,
    pub invested_this_year: f64,
    pub invested_total: f64,
    pub end_value: f64,
    pub gains_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sip_monthly_for_year: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lumpsum_this_year: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentResult {
    pub inputs: InvestmentInputs,
    pub total_invested: f64,
    pub maturity_value: f64,
    pub estimated_returns: f64,
    pub monthly_rate: f64,
    pub schedule: Vec<YearlyRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_interest_rate: f64,
    #[serde(deserialize_with = "whole_number")]
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeutralizedLoan {
    #[serde(flatten)]
    pub loan: LoanTerms,
    pub mf_monthly_investment: f64,
    pub mf_annual_return_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LoanInputs {
    Emi(LoanTerms),
    Neutralize(NeutralizedLoan),
}

impl LoanInputs {
    pub fn mode(&self) -> LoanMode {
        match self {
            LoanInputs::Emi(_) => LoanMode::Emi,
            LoanInputs::Neutralize(_) => LoanMode::Neutralize,
        }
    }

    pub fn terms(&self) -> &LoanTerms {
        match self {
            LoanInputs::Emi(terms) => terms,
            LoanInputs::Neutralize(n) => &n.loan,
        }
    }

    pub fn months(&self) -> u32 {
        self.terms().years * 12
    }
}

/// Mutual-fund side of the neutralizer at a point in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MfSnapshot {
    pub mf_invested_total: f64,
    pub mf_value: f64,
    pub mf_gains: f64,
}

impl MfSnapshot {
    pub fn new(invested_total: f64, value: f64) -> Self {
        Self {
            mf_invested_total: invested_total,
            mf_value: value,
            mf_gains: value - invested_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanMonthRow {
    pub month: u32,
    pub year: u32,
    pub month_of_year: u32,
    pub opening_balance: f64,
    pub emi: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub closing_balance: f64,
    pub cumulative_principal_paid: f64,
    pub cumulative_interest_paid: f64,
    pub cumulative_total_paid: f64,
    #[serde(flatten)]
    pub mf: Option<MfSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanYearRow {
    pub year: u32,
    pub opening_balance: f64,
    pub principal_paid_year: f64,
    pub interest_paid_year: f64,
    pub total_paid_year: f64,
    pub closing_balance: f64,
    pub cumulative_principal_paid: f64,
    pub cumulative_interest_paid: f64,
    pub cumulative_total_paid: f64,
    #[serde(flatten)]
    pub mf: Option<MfSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeutralizerSummary {
    pub mf_monthly_rate: f64,
    pub mf_maturity_value: f64,
    pub mf_total_invested: f64,
    pub mf_estimated_gains: f64,
    pub mf_required_monthly_investment_to_match_interest: f64,
    pub mf_amount_left_after_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    pub inputs: LoanInputs,
    pub months: u32,
    pub monthly_rate_loan: f64,
    pub emi: f64,
    pub total_interest: f64,
    pub total_payment: f64,
    pub schedule: Vec<LoanYearRow>,
    pub monthly_schedule: Vec<LoanMonthRow>,
    #[serde(flatten)]
    pub neutralizer: Option<NeutralizerSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_counts_in_json_round_to_whole() {
        let inputs: InvestmentInputs = serde_json::from_str(
            r#"{"mode":"sip","monthlyInvestment":5000,"annualReturnRate":12,"years":10.5}"#,
        )
        .expect("json should parse");
        assert_eq!(inputs.years(), 11);

        let loan: LoanInputs = serde_json::from_str(
            r#"{"mode":"emi","principal":100000,"annualInterestRate":9,"years":-3}"#,
        )
        .expect("json should parse");
        assert_eq!(loan.terms().years, 0);
    }

    #[test]
    fn hybrid_window_fields_accept_fractions() {
        let inputs: InvestmentInputs = serde_json::from_str(
            r#"{"mode":"hybrid","monthlyInvestment":5000,"stepUpEnabled":true,
                "annualStepUpPercent":10,"lumpsumAmount":100000,"lumpsumEveryYears":1.6,
                "lumpsumStartYear":2.2,"lumpsumEndYear":7,"annualReturnRate":12,"years":10}"#,
        )
        .expect("json should parse");
        let InvestmentInputs::Hybrid(plan) = inputs else {
            panic!("expected hybrid");
        };
        assert_eq!(plan.lumpsum_every_years, 2);
        assert_eq!(plan.lumpsum_start_year, 2);
        assert_eq!(plan.lumpsum_end_year, 7);
    }
}
