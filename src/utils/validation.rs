//! Centralized validation and helper functions.

/// Maximum length of a vendor model name (DOS protection)
pub const MAX_MODEL_NAME_LENGTH: usize = 512;

/// Maximum number of records mapped in one batch invocation
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// # Examples
///
/// ```
/// use device_matcher::utils::validation::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  iPad\t Pro  11 "), "iPad Pro 11");
/// ```
#[must_use]
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form of a hardware identifier: uppercase, no whitespace.
/// Returns None when nothing is left.
#[must_use]
pub fn normalize_hardware_id(s: &str) -> Option<String> {
    let id: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Parse a price written the way vendor feeds write them.
///
/// Accepts currency symbols and codes, thousands separators and comma
/// decimals: `"$1,299.99"`, `"1.299,99 €"`, `"EUR 999"`. A single separator
/// followed by exactly three digits is read as a thousands separator.
/// Returns None for anything that does not yield a finite, non-negative number.
#[must_use]
pub fn parse_price(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if cleaned.is_empty() || cleaned.starts_with('-') || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');
    let normalized = match (last_comma, last_dot) {
        (Some(c), Some(d)) => {
            let (decimal, thousands) = if c > d { (',', '.') } else { ('.', ',') };
            cleaned.replace(thousands, "").replace(decimal, ".")
        }
        (Some(_), None) => resolve_single_separator(&cleaned, ','),
        (None, Some(_)) => resolve_single_separator(&cleaned, '.'),
        (None, None) => cleaned,
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

fn resolve_single_separator(s: &str, sep: char) -> String {
    let count = s.matches(sep).count();
    let fraction_len = s.rsplit(sep).next().map_or(0, str::len);
    if count > 1 || fraction_len == 3 {
        s.replace(sep, "")
    } else {
        s.replace(sep, ".")
    }
}

/// Check a batch size against `MAX_BATCH_SIZE` and an optional caller limit.
///
/// Returns the number of records to process and, when records are dropped,
/// a message describing the truncation.
#[must_use]
pub fn check_batch_limit(count: usize, limit: Option<usize>) -> (usize, Option<String>) {
    let cap = limit.map_or(MAX_BATCH_SIZE, |l| l.min(MAX_BATCH_SIZE));
    if count > cap {
        (
            cap,
            Some(format!(
                "Batch of {count} records truncated to the first {cap}"
            )),
        )
    } else {
        (count, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a  b\n c"), "a b c");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_normalize_hardware_id() {
        assert_eq!(normalize_hardware_id(" a2991 "), Some("A2991".to_string()));
        assert_eq!(normalize_hardware_id("sm- s918b"), Some("SM-S918B".to_string()));
        assert_eq!(normalize_hardware_id("  "), None);
    }

    #[test]
    fn test_parse_price_formats() {
        let cases = [
            ("1299", 1299.0),
            ("$1,299.99", 1299.99),
            ("1.299,99 €", 1299.99),
            ("999,50", 999.5),
            ("EUR 1.299", 1299.0),
            ("12.5", 12.5),
            ("1,234,567", 1_234_567.0),
        ];
        for (input, expected) in cases {
            let parsed = parse_price(input);
            assert!(
                parsed.is_some_and(|p| (p - expected).abs() < 0.001),
                "{input} parsed as {parsed:?}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert_eq!(parse_price("call us"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("-5"), None);
    }

    #[test]
    fn test_check_batch_limit() {
        assert_eq!(check_batch_limit(10, None), (10, None));
        let (count, message) = check_batch_limit(10, Some(3));
        assert_eq!(count, 3);
        assert!(message.is_some());
        assert_eq!(check_batch_limit(MAX_BATCH_SIZE + 1, None).0, MAX_BATCH_SIZE);
    }
}
