//! Input-assist formatting applied when a field loses focus.

/// Reformats a telephone number as `(AAA) BBB-CCCC` when the input holds
/// exactly ten digits; anything else is left alone.
pub fn format_telephone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 10 {
        return None;
    }
    Some(format!(
        "({}) {}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..]
    ))
}

/// Reformats a social security number as `AAA-BB-CCCC` when the input holds
/// exactly nine digits. Eight-character UPINs fall through untouched.
pub fn format_ssn(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 9 {
        return None;
    }
    Some(format!(
        "{}-{}-{}",
        &digits[..3],
        &digits[3..5],
        &digits[5..]
    ))
}
