//! Money helpers shared by the parser and the exporters

/// Round a currency value to whole cents.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Parse an amount token such as `3,525,000.00`.
///
/// Thousands separators are dropped; anything unparsable yields `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok()
}

/// Format a value with thousands separators and two decimals: `1,234,567.89`
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && to_cents(amount) != 0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
