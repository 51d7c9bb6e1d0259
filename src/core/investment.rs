use super::rates::{clamp_to, effective_monthly_rate, stepped_amount};
use super::types::{
    HybridPlan, InvestmentInputs, InvestmentResult, LumpsumPlan, SipPlan, StepUpPlan, YearlyRow,
};

pub const MAX_YEARS: u32 = 60;
pub const MAX_MONTHLY_INVESTMENT: f64 = 10_000_000.0;
pub const MAX_LUMPSUM: f64 = 1_000_000_000.0;
pub const MAX_LUMPSUM_EVERY_YEARS: u32 = 10;

fn clamp_rate(annual_return_rate: f64) -> f64 {
    clamp_to(annual_return_rate, -100.0, 100.0)
}

fn clamp_monthly(amount: f64) -> f64 {
    clamp_to(amount, 0.0, MAX_MONTHLY_INVESTMENT)
}

fn clamp_step_up(percent: f64) -> f64 {
    clamp_to(percent, 0.0, 100.0)
}

/// Clamps every field into its supported range. Never fails.
pub fn normalize_investment(raw: &InvestmentInputs) -> InvestmentInputs {
    let years = raw.years().clamp(1, MAX_YEARS);

    match raw {
        InvestmentInputs::Sip(p) => InvestmentInputs::Sip(SipPlan {
            monthly_investment: clamp_monthly(p.monthly_investment),
            annual_return_rate: clamp_rate(p.annual_return_rate),
            years,
        }),
        InvestmentInputs::StepUp(p) => InvestmentInputs::StepUp(StepUpPlan {
            monthly_investment: clamp_monthly(p.monthly_investment),
            annual_step_up_percent: clamp_step_up(p.annual_step_up_percent),
            annual_return_rate: clamp_rate(p.annual_return_rate),
            years,
        }),
        InvestmentInputs::Lumpsum(p) => InvestmentInputs::Lumpsum(LumpsumPlan {
            lumpsum_investment: clamp_to(p.lumpsum_investment, 0.0, MAX_LUMPSUM),
            annual_return_rate: clamp_rate(p.annual_return_rate),
            years,
        }),
        InvestmentInputs::Hybrid(p) => {
            let start = p.lumpsum_start_year.clamp(1, years);
            let end = p.lumpsum_end_year.clamp(start, years);
            InvestmentInputs::Hybrid(HybridPlan {
                monthly_investment: clamp_monthly(p.monthly_investment),
                step_up_enabled: p.step_up_enabled,
                annual_step_up_percent: clamp_step_up(p.annual_step_up_percent),
                lumpsum_amount: clamp_to(p.lumpsum_amount, 0.0, MAX_LUMPSUM),
                lumpsum_every_years: p.lumpsum_every_years.clamp(1, MAX_LUMPSUM_EVERY_YEARS),
                lumpsum_start_year: start,
                lumpsum_end_year: end,
                annual_return_rate: clamp_rate(p.annual_return_rate),
                years,
            })
        }
    }
}

/// SIP contribution due at the start of month `month_index` (0-based).
pub fn sip_amount_for_month(inputs: &InvestmentInputs, month_index: u32) -> f64 {
    let years = month_index / 12;
    match inputs {
        InvestmentInputs::Sip(p) => p.monthly_investment,
        InvestmentInputs::StepUp(p) => {
            stepped_amount(p.monthly_investment, p.annual_step_up_percent, years)
        }
        InvestmentInputs::Lumpsum(_) => 0.0,
        InvestmentInputs::Hybrid(p) if p.step_up_enabled => {
            stepped_amount(p.monthly_investment, p.annual_step_up_percent, years)
        }
        InvestmentInputs::Hybrid(p) => p.monthly_investment,
    }
}

/// Lumpsum deposit due at the start of month `month_index` (0-based).
///
/// Deposits only land on the first month of a year.
pub fn lumpsum_for_month(inputs: &InvestmentInputs, month_index: u32) -> f64 {
    if month_index % 12 != 0 {
        return 0.0;
    }
    let year = month_index / 12 + 1;

    match inputs {
        InvestmentInputs::Lumpsum(p) if year == 1 => p.lumpsum_investment,
        InvestmentInputs::Hybrid(p) => {
            if year < p.lumpsum_start_year || year > p.lumpsum_end_year {
                return 0.0;
            }
            let every = p.lumpsum_every_years.max(1);
            if (year - p.lumpsum_start_year) % every != 0 {
                return 0.0;
            }
            p.lumpsum_amount
        }
        _ => 0.0,
    }
}

fn sip_monthly_for_year(inputs: &InvestmentInputs, year: u32) -> Option<f64> {
    match inputs {
        InvestmentInputs::Lumpsum(_) => None,
        _ => Some(sip_amount_for_month(inputs, (year - 1) * 12)),
    }
}

/// Simulates contributions at the start of each month followed by one month of
/// compounding, and reports one row per elapsed year.
pub fn calculate_investment(inputs: &InvestmentInputs) -> InvestmentResult {
    let normalized = normalize_investment(inputs);
    let monthly_rate = effective_monthly_rate(normalized.annual_return_rate());
    let months = normalized.months();

    let mut schedule = Vec::with_capacity(normalized.years() as usize);
    let mut value = 0.0;
    let mut invested_total = 0.0;
    let mut invested_this_year = 0.0;
    let mut lumpsum_this_year = 0.0;

    for month in 0..months {
        let sip = sip_amount_for_month(&normalized, month);
        let lumpsum = lumpsum_for_month(&normalized, month);

        let contribution = sip + lumpsum;
        if contribution > 0.0 {
            invested_total += contribution;
            invested_this_year += contribution;
            value += contribution;
        }
        if lumpsum > 0.0 {
            lumpsum_this_year += lumpsum;
        }

        value *= 1.0 + monthly_rate;

        if (month + 1) % 12 == 0 {
            let year = (month + 1) / 12;
            schedule.push(YearlyRow {
                year,
                invested_this_year,
                invested_total,
                end_value: value,
                gains_total: value - invested_total,
                sip_monthly_for_year: sip_monthly_for_year(&normalized, year),
                lumpsum_this_year: matches!(normalized, InvestmentInputs::Hybrid(_))
                    .then_some(lumpsum_this_year),
            });
            invested_this_year = 0.0;
            lumpsum_this_year = 0.0;
        }
    }

    log::debug!(
        "investment {}: {} years, invested {:.2}, maturity {:.2}",
        normalized.mode(),
        normalized.years(),
        invested_total,
        value
    );

    InvestmentResult {
        inputs: normalized,
        total_invested: invested_total,
        maturity_value: value,
        estimated_returns: value - invested_total,
        monthly_rate,
        schedule,
    }
}
