use crate::core::{LoanInputs, LoanMode, LoanTerms, NeutralizedLoan};

use super::params::QueryParams;

pub const DEFAULT_MODE: LoanMode = LoanMode::Emi;
pub const DEFAULT_PRINCIPAL: f64 = 1_000_000.0;
pub const DEFAULT_ANNUAL_INTEREST_RATE: f64 = 8.5;
pub const DEFAULT_YEARS: u32 = 20;
pub const DEFAULT_MF_MONTHLY_INVESTMENT: f64 = 10_000.0;
pub const DEFAULT_MF_ANNUAL_RETURN_RATE: f64 = 12.0;

const RATE_DECIMALS: i32 = 3;

const MODE_KEYS: &[&str] = &["mode"];
const PRINCIPAL_KEYS: &[&str] = &["principal", "p", "amt"];
const RATE_KEYS: &[&str] = &["rate", "r"];
const YEARS_KEYS: &[&str] = &["years", "y"];
const MF_SIP_KEYS: &[&str] = &["sip", "mfSip"];
const MF_RATE_KEYS: &[&str] = &["mfRate", "mfr"];

fn parse_mode(params: &QueryParams) -> LoanMode {
    params
        .get("mode")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_MODE)
}

/// Reads a loan input from share-link parameters, defaulting absent fields.
pub fn loan_from_params(params: &QueryParams) -> LoanInputs {
    let loan = LoanTerms {
        principal: params
            .first_number(PRINCIPAL_KEYS)
            .unwrap_or(DEFAULT_PRINCIPAL),
        annual_interest_rate: params
            .first_number(RATE_KEYS)
            .unwrap_or(DEFAULT_ANNUAL_INTEREST_RATE),
        years: params.first_whole(YEARS_KEYS).unwrap_or(DEFAULT_YEARS),
    };

    match parse_mode(params) {
        LoanMode::Emi => LoanInputs::Emi(loan),
        LoanMode::Neutralize => LoanInputs::Neutralize(NeutralizedLoan {
            loan,
            mf_monthly_investment: params
                .first_number(MF_SIP_KEYS)
                .unwrap_or(DEFAULT_MF_MONTHLY_INVESTMENT),
            mf_annual_return_rate: params
                .first_number(MF_RATE_KEYS)
                .unwrap_or(DEFAULT_MF_ANNUAL_RETURN_RATE),
        }),
    }
}

pub fn params_from_loan(inputs: &LoanInputs) -> QueryParams {
    let terms = inputs.terms();
    let mut params = QueryParams::new();
    params.set("mode", inputs.mode().as_str());
    params.set_number("principal", terms.principal, 0);
    params.set_number("rate", terms.annual_interest_rate, RATE_DECIMALS);
    params.set_whole("years", terms.years);

    if let LoanInputs::Neutralize(n) = inputs {
        params.set_number("sip", n.mf_monthly_investment, 0);
        params.set_number("mfRate", n.mf_annual_return_rate, RATE_DECIMALS);
    }

    params
}

pub fn has_loan_params(params: &QueryParams) -> bool {
    [
        MODE_KEYS,
        PRINCIPAL_KEYS,
        RATE_KEYS,
        YEARS_KEYS,
        MF_SIP_KEYS,
        MF_RATE_KEYS,
    ]
    .iter()
    .flat_map(|keys| keys.iter())
    .any(|key| params.contains_key(key))
}
