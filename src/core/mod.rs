mod investment;
mod loan;
mod rates;
mod types;
mod validate;

pub use investment::{
    calculate_investment, lumpsum_for_month, normalize_investment, sip_amount_for_month,
};
pub use loan::{calculate_emi, calculate_loan, normalize_loan, required_monthly_investment};
pub use rates::{effective_monthly_rate, loan_monthly_rate, round_to};
pub use types::{
    HybridPlan, InvestmentInputs, InvestmentMode, InvestmentResult, LoanInputs, LoanMode,
    LoanMonthRow, LoanResult, LoanTerms, LoanYearRow, LumpsumPlan, MfSnapshot, NeutralizedLoan,
    NeutralizerSummary, SipPlan, StepUpPlan, YearlyRow,
};
pub use validate::{investment_issues, loan_issues};
