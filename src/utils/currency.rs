/// Currency utility functions for handling Rupee conversions
///
/// All commission arithmetic runs in paise (1 Rupee = 100 paise)
/// so reward and bonus totals never drift.

/// Convert Rupees to paise (multiply by 100)
pub fn rupees_to_paise(rupees: f64) -> i64 {
    (rupees * 100.0).round() as i64
}

/// Convert paise to Rupees (divide by 100)
pub fn paise_to_rupees(paise: i64) -> f64 {
    paise as f64 / 100.0
}

/// Format paise as a Rupee string with 2 decimal places
pub fn format_paise_as_rupees(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    format!("{}₹{:.2}", sign, paise_to_rupees(paise.abs()))
}

/// Whole-number percentage of an amount, truncated toward zero
pub fn percent_of(paise: i64, percent: i64) -> i64 {
    paise * percent / 100
}

/// Largest amount accepted from user input, in Rupees (1000 crore)
pub const MAX_AMOUNT_RUPEES: f64 = 10_000_000_000.0;

/// Validate and parse amount string to paise
pub fn parse_amount_to_paise(amount_str: &str) -> Result<i64, String> {
    amount_str
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid amount format".to_string())
        .and_then(|amount| {
            if !amount.is_finite() {
                Err("Invalid amount format".to_string())
            } else if amount < 0.0 {
                Err("Amount cannot be negative".to_string())
            } else if amount > MAX_AMOUNT_RUPEES {
                Err("Amount is too large".to_string())
            } else {
                Ok(rupees_to_paise(amount))
            }
        })
}
