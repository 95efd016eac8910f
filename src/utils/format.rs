//! Human-readable formatting helpers shared by reports and the CLI.

/// Formats whole currency units as USD without fraction digits (`$12,500`).
pub fn format_currency(amount: u64) -> String {
    format!("${}", group_thousands(amount))
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats fractional hours, dropping trailing zeros (`4`, `0.5`, `0.25`).
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
