// Display formatting for prices, percentages and fundamentals.
//
// Every formatter renders missing or non-finite input as NOT_AVAILABLE.

/// Sentinel shown wherever a value cannot be computed or was not supplied.
pub const NOT_AVAILABLE: &str = "N/A";

/// Currency symbol for a currency code. Only JPY gets its own symbol; every
/// other code falls back to `$`.
pub fn currency_symbol(currency_code: &str) -> &'static str {
    if currency_code == "JPY" {
        "¥"
    } else {
        "$"
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Price label with the currency prefix, e.g. `$187.44`.
pub fn format_currency(value: f64, currency_code: &str) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{}{:.2}", currency_symbol(currency_code), value)
}

/// Market cap in trillions of yen (`兆`) for JPY, billions of dollars otherwise.
pub fn format_market_cap(market_cap: Option<f64>, currency_code: &str) -> String {
    match finite(market_cap) {
        Some(cap) if currency_code == "JPY" => format!("¥{:.1}兆", cap / 1e12),
        Some(cap) => format!("${:.1}B", cap / 1e9),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_decimal(value: Option<f64>, decimals: usize) -> String {
    match finite(value) {
        Some(v) => format!("{:.*}", decimals, v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Value already expressed in percent, e.g. `12.3%`.
pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    match finite(value) {
        Some(v) => format!("{:.*}%", decimals, v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Dividend yield supplied as a fraction. Zero counts as "no dividend".
pub fn format_dividend_yield(dividend_yield: Option<f64>) -> String {
    match finite(dividend_yield) {
        Some(y) if y != 0.0 => format!("{:.2}%", y * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Rounds to a whole number and inserts `,` thousands separators.
pub fn format_grouped(value: Option<f64>) -> String {
    let Some(v) = finite(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let rounded = format!("{:.0}", v);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if grouped == "0" {
        return grouped;
    }
    format!("{}{}", sign, grouped)
}
