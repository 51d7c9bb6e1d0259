//! Rupee formatting with Indian digit grouping (`12,34,567`) and
//! hundred/thousand/lakh/crore hints.

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

/// Whole-rupee amount with Indian digit grouping. Non-finite input renders as `0`.
pub fn inr_number(value: f64) -> String {
    let rounded = if value.is_finite() {
        value.round()
    } else {
        0.0
    };
    let digits = format!("{:.0}", rounded.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (front, back) = rest.split_at(rest.len() - 2);
            groups.push(back);
            rest = front;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn inr(value: f64) -> String {
    let number = inr_number(value);
    match number.strip_prefix('-') {
        Some(abs) => format!("-₹{abs}"),
        None => format!("₹{number}"),
    }
}

/// 0-2 decimals with trailing zeros trimmed.
fn short_number(value: f64) -> String {
    let fixed = format!("{:.2}", (value * 100.0).round() / 100.0);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Grouped amount followed by a spoken-unit hint, e.g. `1,50,000 (1.5 lakh)`.
pub fn amount_hint(amount: f64) -> Option<String> {
    if !amount.is_finite() || amount == 0.0 {
        return None;
    }

    let abs = amount.abs();
    let number = inr_number(amount);
    if abs < 100.0 {
        return Some(number);
    }

    let hint = if abs < 1_000.0 {
        format!("{} hundred", short_number(amount / 100.0))
    } else if abs < LAKH {
        format!("{} thousand", short_number(amount / 1_000.0))
    } else if abs < CRORE {
        format!("{} lakh", short_number(amount / LAKH))
    } else {
        format!("{} crore", short_number(amount / CRORE))
    };

    Some(format!("{number} ({hint})"))
}

/// Short signed form used in chart axes and summaries, e.g. `-1.5 lakh`.
pub fn compact(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();

    if abs < 1_000.0 {
        format!("{sign}{}", inr_number(abs))
    } else if abs < LAKH {
        format!("{sign}{} thousand", short_number(abs / 1_000.0))
    } else if abs < CRORE {
        format!("{sign}{} lakh", short_number(abs / LAKH))
    } else {
        format!("{sign}{} crore", short_number(abs / CRORE))
    }
}
