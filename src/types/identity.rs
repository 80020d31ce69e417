/// A subscriber identity as it appears in a request path: either a plain
/// IMSI-style SUPI, or a concealed SUCI this function recognizes but never
/// de-conceals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UeIdentity {
    Supi(String),
    Suci(String),
}

impl UeIdentity {
    pub fn parse(input: &str) -> Result<Self, String> {
        if input.starts_with("suci-") {
            return Ok(UeIdentity::Suci(input.to_string()));
        }

        if let Some(imsi) = input.strip_prefix("imsi-") {
            if imsi.len() < 5 || imsi.len() > 15 {
                return Err(format!("Invalid IMSI length: {}", imsi.len()));
            }
            if !imsi.chars().all(|c| c.is_ascii_digit()) {
                return Err(format!("IMSI must contain only digits: {}", input));
            }
            return Ok(UeIdentity::Supi(input.to_string()));
        }

        Err(format!("Unrecognized UE identity format: {}", input))
    }

    pub fn is_concealed(&self) -> bool {
        matches!(self, UeIdentity::Suci(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            UeIdentity::Supi(value) | UeIdentity::Suci(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_imsi_supi() {
        let id = UeIdentity::parse("imsi-001010000000001").unwrap();
        assert!(!id.is_concealed());
        assert_eq!(id.as_str(), "imsi-001010000000001");
    }

    #[test]
    fn recognizes_suci_as_concealed() {
        let id = UeIdentity::parse("suci-0-001-01-0000-0-0-0000000001").unwrap();
        assert!(id.is_concealed());
    }

    #[test]
    fn rejects_malformed_identities() {
        assert!(UeIdentity::parse("imsi-12ab").is_err());
        assert!(UeIdentity::parse("imsi-123").is_err());
        assert!(UeIdentity::parse("imsi-0123456789012345").is_err());
        assert!(UeIdentity::parse("001010000000001").is_err());
        assert!(UeIdentity::parse("").is_err());
    }
}
