use crate::core::{HybridPlan, InvestmentInputs, InvestmentMode, LumpsumPlan, SipPlan, StepUpPlan};

use super::params::QueryParams;

pub const DEFAULT_MODE: InvestmentMode = InvestmentMode::Sip;
pub const DEFAULT_MONTHLY_INVESTMENT: f64 = 5_000.0;
pub const DEFAULT_STEP_UP_PERCENT: f64 = 10.0;
pub const DEFAULT_LUMPSUM: f64 = 100_000.0;
pub const DEFAULT_ANNUAL_RETURN_RATE: f64 = 12.0;
pub const DEFAULT_YEARS: u32 = 10;
pub const DEFAULT_LUMPSUM_EVERY_YEARS: u32 = 1;
pub const DEFAULT_LUMPSUM_START_YEAR: u32 = 1;

const RATE_DECIMALS: i32 = 2;

const MODE_KEYS: &[&str] = &["mode"];
const RATE_KEYS: &[&str] = &["rate", "r"];
const YEARS_KEYS: &[&str] = &["years", "y"];
const MONTHLY_KEYS: &[&str] = &["amt", "m"];
const LUMPSUM_KEYS: &[&str] = &["amt", "l"];
const STEP_KEYS: &[&str] = &["step", "s"];
const HYBRID_LUMP_KEYS: &[&str] = &["lump", "lumpAmt"];
const EVERY_KEYS: &[&str] = &["every", "freq"];
const START_KEYS: &[&str] = &["start"];
const END_KEYS: &[&str] = &["end"];
const STEP_UP_FLAG_KEYS: &[&str] = &["stepUp", "su"];

fn parse_mode(params: &QueryParams) -> InvestmentMode {
    params
        .get("mode")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_MODE)
}

/// Reads an investment input from share-link parameters.
///
/// Missing or non-numeric fields take their defaults; nothing is clamped here.
pub fn investment_from_params(params: &QueryParams) -> InvestmentInputs {
    let mode = parse_mode(params);
    let annual_return_rate = params
        .first_number(RATE_KEYS)
        .unwrap_or(DEFAULT_ANNUAL_RETURN_RATE);
    let years = params.first_whole(YEARS_KEYS).unwrap_or(DEFAULT_YEARS);

    if mode == InvestmentMode::Lumpsum {
        return InvestmentInputs::Lumpsum(LumpsumPlan {
            lumpsum_investment: params.first_number(LUMPSUM_KEYS).unwrap_or(DEFAULT_LUMPSUM),
            annual_return_rate,
            years,
        });
    }

    let monthly_investment = params
        .first_number(MONTHLY_KEYS)
        .unwrap_or(DEFAULT_MONTHLY_INVESTMENT);
    let annual_step_up_percent = params
        .first_number(STEP_KEYS)
        .unwrap_or(DEFAULT_STEP_UP_PERCENT);

    match mode {
        InvestmentMode::StepUp => InvestmentInputs::StepUp(StepUpPlan {
            monthly_investment,
            annual_step_up_percent,
            annual_return_rate,
            years,
        }),
        InvestmentMode::Hybrid => InvestmentInputs::Hybrid(HybridPlan {
            monthly_investment,
            step_up_enabled: params.first_flag(STEP_UP_FLAG_KEYS).unwrap_or(false),
            annual_step_up_percent,
            lumpsum_amount: params
                .first_number(HYBRID_LUMP_KEYS)
                .unwrap_or(DEFAULT_LUMPSUM),
            lumpsum_every_years: params
                .first_whole(EVERY_KEYS)
                .unwrap_or(DEFAULT_LUMPSUM_EVERY_YEARS),
            lumpsum_start_year: params
                .first_whole(START_KEYS)
                .unwrap_or(DEFAULT_LUMPSUM_START_YEAR),
            lumpsum_end_year: params.first_whole(END_KEYS).unwrap_or(years),
            annual_return_rate,
            years,
        }),
        _ => InvestmentInputs::Sip(SipPlan {
            monthly_investment,
            annual_return_rate,
            years,
        }),
    }
}

/// Writes the canonical share-link parameters for an investment input.
pub fn params_from_investment(inputs: &InvestmentInputs) -> QueryParams {
    let mut params = QueryParams::new();
    params.set("mode", inputs.mode().as_str());
    params.set_number("rate", inputs.annual_return_rate(), RATE_DECIMALS);
    params.set_whole("years", inputs.years());

    match inputs {
        InvestmentInputs::Sip(p) => {
            params.set_number("amt", p.monthly_investment, 0);
        }
        InvestmentInputs::StepUp(p) => {
            params.set_number("amt", p.monthly_investment, 0);
            params.set_number("step", p.annual_step_up_percent, RATE_DECIMALS);
        }
        InvestmentInputs::Lumpsum(p) => {
            params.set_number("amt", p.lumpsum_investment, 0);
        }
        InvestmentInputs::Hybrid(p) => {
            params.set_number("amt", p.monthly_investment, 0);
            params.set("stepUp", if p.step_up_enabled { "1" } else { "0" });
            params.set_number("step", p.annual_step_up_percent, RATE_DECIMALS);
            params.set_number("lump", p.lumpsum_amount, 0);
            params.set_whole("every", p.lumpsum_every_years);
            params.set_whole("start", p.lumpsum_start_year);
            params.set_whole("end", p.lumpsum_end_year);
        }
    }

    params
}

/// Whether the parameters carry any investment field at all.
pub fn has_investment_params(params: &QueryParams) -> bool {
    [
        MODE_KEYS,
        RATE_KEYS,
        YEARS_KEYS,
        MONTHLY_KEYS,
        LUMPSUM_KEYS,
        STEP_KEYS,
        HYBRID_LUMP_KEYS,
        EVERY_KEYS,
        START_KEYS,
        END_KEYS,
        STEP_UP_FLAG_KEYS,
    ]
    .iter()
    .flat_map(|keys| keys.iter())
    .any(|key| params.contains_key(key))
}
