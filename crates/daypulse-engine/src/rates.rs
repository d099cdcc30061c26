/// Rendered rate when the denominator is zero - "no basis", not 0%.
pub const NO_RATE: &str = "—";

/// Safe percentage string: `round(100 * num / den)` as `"<int>%"`, or the
/// em-dash sentinel when the denominator is zero. Division never escapes
/// this function.
pub fn percentage(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        return NO_RATE.to_string();
    }
    let percent = (numerator as f64 / denominator as f64) * 100.0;
    format!("{}%", percent.round() as i64)
}
