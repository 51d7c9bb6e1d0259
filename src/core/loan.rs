use super::rates::{clamp_to, effective_monthly_rate, finite_or_zero, loan_monthly_rate};
use super::types::{
    LoanInputs, LoanMonthRow, LoanResult, LoanTerms, LoanYearRow, MfSnapshot, NeutralizedLoan,
    NeutralizerSummary,
};

pub const MAX_YEARS: u32 = 50;
pub const MAX_PRINCIPAL: f64 = 1_000_000_000.0;
pub const MAX_INTEREST_RATE: f64 = 50.0;
pub const MAX_MF_MONTHLY_INVESTMENT: f64 = 10_000_000.0;

/// Clamps every field into its supported range. Never fails.
pub fn normalize_loan(raw: &LoanInputs) -> LoanInputs {
    let terms = raw.terms();
    let loan = LoanTerms {
        principal: clamp_to(terms.principal, 0.0, MAX_PRINCIPAL),
        annual_interest_rate: clamp_to(terms.annual_interest_rate, 0.0, MAX_INTEREST_RATE),
        years: terms.years.clamp(1, MAX_YEARS),
    };

    match raw {
        LoanInputs::Emi(_) => LoanInputs::Emi(loan),
        LoanInputs::Neutralize(n) => LoanInputs::Neutralize(NeutralizedLoan {
            loan,
            mf_monthly_investment: clamp_to(
                n.mf_monthly_investment,
                0.0,
                MAX_MF_MONTHLY_INVESTMENT,
            ),
            mf_annual_return_rate: clamp_to(n.mf_annual_return_rate, -100.0, 50.0),
        }),
    }
}

/// Fixed monthly installment `P·r·(1+r)^n / ((1+r)^n − 1)`.
///
/// A zero (or unusable) rate falls back to straight-line `P / n`.
pub fn calculate_emi(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if !principal.is_finite() || principal <= 0.0 || months == 0 {
        return 0.0;
    }
    if !monthly_rate.is_finite() || monthly_rate <= 0.0 {
        return principal / months as f64;
    }

    let pow = (1.0 + monthly_rate).powi(months as i32);
    finite_or_zero(principal * monthly_rate * pow / (pow - 1.0))
}

/// Level monthly contribution, paid at the start of each month, whose future
/// value after `months` at `monthly_rate` equals `target`.
pub fn required_monthly_investment(target: f64, monthly_rate: f64, months: u32) -> f64 {
    if !target.is_finite() || target <= 0.0 || months == 0 {
        return 0.0;
    }
    if !monthly_rate.is_finite() || monthly_rate == 0.0 {
        return target / months as f64;
    }

    let pow = (1.0 + monthly_rate).powi(months as i32);
    let factor = (pow - 1.0) / monthly_rate * (1.0 + monthly_rate);
    if !factor.is_finite() || factor <= 0.0 {
        return 0.0;
    }
    target / factor
}

struct MfAccount {
    monthly_investment: f64,
    monthly_rate: f64,
    invested_total: f64,
    value: f64,
}

impl MfAccount {
    fn new(plan: &NeutralizedLoan) -> Self {
        Self {
            monthly_investment: plan.mf_monthly_investment,
            monthly_rate: effective_monthly_rate(plan.mf_annual_return_rate),
            invested_total: 0.0,
            value: 0.0,
        }
    }

    fn advance_month(&mut self) {
        if self.monthly_investment > 0.0 {
            self.invested_total += self.monthly_investment;
            self.value += self.monthly_investment;
        }
        self.value *= 1.0 + self.monthly_rate;
    }

    fn snapshot(&self) -> MfSnapshot {
        MfSnapshot::new(self.invested_total, self.value)
    }
}

fn summarize_year(year: u32, months: &[LoanMonthRow], fallback_balance: f64) -> LoanYearRow {
    let opening_balance = months
        .first()
        .map_or(fallback_balance, |r| r.opening_balance);
    let last = months.last();

    LoanYearRow {
        year,
        opening_balance,
        principal_paid_year: months.iter().map(|r| r.principal_paid).sum(),
        interest_paid_year: months.iter().map(|r| r.interest_paid).sum(),
        total_paid_year: months.iter().map(|r| r.emi).sum(),
        closing_balance: last.map_or(fallback_balance, |r| r.closing_balance),
        cumulative_principal_paid: last.map_or(0.0, |r| r.cumulative_principal_paid),
        cumulative_interest_paid: last.map_or(0.0, |r| r.cumulative_interest_paid),
        cumulative_total_paid: last.map_or(0.0, |r| r.cumulative_total_paid),
        mf: last.and_then(|r| r.mf),
    }
}

/// Amortizes the loan month by month and, for the neutralizer mode, runs the
/// mutual-fund SIP in lockstep.
pub fn calculate_loan(inputs: &LoanInputs) -> LoanResult {
    let normalized = normalize_loan(inputs);
    let terms = normalized.terms();

    let months = normalized.months();
    let monthly_rate_loan = loan_monthly_rate(terms.annual_interest_rate);
    let emi = calculate_emi(terms.principal, monthly_rate_loan, months);

    let mut mf = match &normalized {
        LoanInputs::Neutralize(plan) => Some(MfAccount::new(plan)),
        LoanInputs::Emi(_) => None,
    };

    let mut schedule = Vec::with_capacity(terms.years as usize);
    let mut monthly_schedule: Vec<LoanMonthRow> = Vec::with_capacity(months as usize);

    let mut balance = terms.principal;
    let mut cumulative_principal_paid = 0.0;
    let mut cumulative_interest_paid = 0.0;
    let mut cumulative_total_paid = 0.0;

    for month_index in 0..months {
        let opening_balance = balance;
        let interest = opening_balance * monthly_rate_loan;

        // The final installment may be smaller than the EMI.
        let principal_paid = finite_or_zero(emi - interest).min(balance);

        balance = opening_balance - principal_paid;
        cumulative_principal_paid += principal_paid;
        cumulative_interest_paid += interest;
        cumulative_total_paid += principal_paid + interest;

        if let Some(account) = mf.as_mut() {
            account.advance_month();
        }

        monthly_schedule.push(LoanMonthRow {
            month: month_index + 1,
            year: month_index / 12 + 1,
            month_of_year: month_index % 12 + 1,
            opening_balance,
            emi,
            principal_paid,
            interest_paid: interest,
            closing_balance: balance,
            cumulative_principal_paid,
            cumulative_interest_paid,
            cumulative_total_paid,
            mf: mf.as_ref().map(MfAccount::snapshot),
        });

        if (month_index + 1) % 12 == 0 {
            let year = (month_index + 1) / 12;
            let start = ((year - 1) * 12) as usize;
            schedule.push(summarize_year(year, &monthly_schedule[start..], balance));
        }
    }

    let total_interest = cumulative_interest_paid;
    let total_payment = cumulative_total_paid;

    let neutralizer = mf.map(|account| NeutralizerSummary {
        mf_monthly_rate: account.monthly_rate,
        mf_maturity_value: account.value,
        mf_total_invested: account.invested_total,
        mf_estimated_gains: account.value - account.invested_total,
        mf_required_monthly_investment_to_match_interest: required_monthly_investment(
            total_interest,
            account.monthly_rate,
            months,
        ),
        mf_amount_left_after_interest: account.value - total_interest,
    });

    log::debug!(
        "loan {}: {} months, emi {:.2}, total interest {:.2}",
        normalized.mode(),
        months,
        emi,
        total_interest
    );

    LoanResult {
        inputs: normalized,
        months,
        monthly_rate_loan,
        emi,
        total_interest,
        total_payment,
        schedule,
        monthly_schedule,
        neutralizer,
    }
}
