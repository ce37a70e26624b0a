use rust_decimal::{Decimal, RoundingStrategy};

/// Format a money amount: `$1,234.56`, `-$1,234.56`.
pub fn format_currency(value: Decimal, decimals: u32, symbol: &str) -> String {
    let rounded = round(value, decimals);
    let digits = group_thousands(&format!("{:.*}", decimals as usize, rounded.abs()));

    if rounded.is_sign_negative() {
        format!("-{}{}", symbol, digits)
    } else {
        format!("{}{}", symbol, digits)
    }
}

/// Format a percentage with an explicit sign: `+5.67%`, `-2.34%`.
pub fn format_percentage(value: Decimal, decimals: u32) -> String {
    let rounded = round(value, decimals);
    let sign = if rounded.is_sign_negative() { "" } else { "+" };
    format!("{}{:.*}%", sign, decimals as usize, rounded)
}

// Rounds half away from zero; a result that rounds to zero loses its sign.
fn round(value: Decimal, decimals: u32) -> Decimal {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

fn group_thousands(number: &str) -> String {
    let (integer, fraction) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}
