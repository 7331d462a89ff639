//! Dollar rounding and display helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole cents, halves away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format as US dollars with thousands separators, e.g. `-$1,234.50`
pub fn format_usd(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Format a signed dollar amount with an explicit `+` for non-negative values
pub fn format_signed_usd(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format_usd(amount)
    } else {
        format!("+{}", format_usd(amount))
    }
}

/// Insert comma separators into an unsigned integer string
pub fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
