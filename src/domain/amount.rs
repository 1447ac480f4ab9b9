/// Coerces free-form numeric input to a number, defaulting to zero.
///
/// Every numeric patch path (defect impact percentages, warm rent) funnels
/// through this so that empty or invalid input is stored as `0`, never as
/// `NaN` or left undefined. Accepts a decimal comma as well as a decimal
/// point.
#[must_use]
pub fn parse_amount(input: &str) -> f64 {
    let value: f64 = input.trim().replace(',', ".").parse().unwrap_or(0.0);
    if value.is_finite() { value } else { 0.0 }
}
