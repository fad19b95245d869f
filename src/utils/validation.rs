use validator::ValidationError;

/// Normalises Kenyan mobile numbers to `2547XXXXXXXX` / `2541XXXXXXXX`.
///
/// Accepts `07..`, `01..`, `7..`, `1..`, `2547..`, `+2547..` with optional
/// spaces or dashes.
pub fn normalize_kenyan_phone(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = digits.strip_prefix('+').unwrap_or(digits.as_str());
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let local = if let Some(rest) = digits.strip_prefix("254") {
        rest
    } else if let Some(rest) = digits.strip_prefix('0') {
        rest
    } else {
        digits
    };

    if local.len() == 9 && (local.starts_with('7') || local.starts_with('1')) {
        Some(format!("254{}", local))
    } else {
        None
    }
}

pub fn validate_kenyan_phone(raw: &str) -> Result<(), ValidationError> {
    match normalize_kenyan_phone(raw) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("kenyan_phone")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_formats() {
        assert_eq!(normalize_kenyan_phone("0712 345 678").as_deref(), Some("254712345678"));
        assert_eq!(normalize_kenyan_phone("+254712345678").as_deref(), Some("254712345678"));
        assert_eq!(normalize_kenyan_phone("0110-123-456").as_deref(), Some("254110123456"));
        assert_eq!(normalize_kenyan_phone("712345678").as_deref(), Some("254712345678"));
    }

    #[test]
    fn rejects_non_kenyan_numbers() {
        assert!(normalize_kenyan_phone("0812345678").is_none());
        assert!(normalize_kenyan_phone("+1 555 123 4567").is_none());
        assert!(normalize_kenyan_phone("07123abc78").is_none());
        assert!(validate_kenyan_phone("12").is_err());
    }
}
