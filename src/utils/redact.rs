use serde::Serializer;

pub const REDACTED: &str = "***";

/// Masks a secret for logs and JSON dumps, keeping only whether it is set.
pub fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        REDACTED
    }
}

pub fn serialize_secret<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(mask(value))
}

pub fn serialize_optional_secret<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(mask(v)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("service-role-secret"), REDACTED);
        assert_eq!(mask(""), "");
    }
}
