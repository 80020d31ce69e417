use regex::Regex;
use std::sync::OnceLock;

static SNN_REGEX: OnceLock<Regex> = OnceLock::new();

pub type PlmnDigits = (String, String);

pub fn validate_snn(snn: &str) -> Result<PlmnDigits, String> {
    let regex = SNN_REGEX.get_or_init(|| {
        Regex::new(r"^5G:mnc(\d{2,3})\.mcc(\d{3})\.3gppnetwork\.org$")
            .expect("Invalid SNN regex")
    });

    let captures = regex
        .captures(snn)
        .ok_or_else(|| format!("Invalid Serving Network Name format: {}", snn))?;

    let mnc = captures.get(1)
        .ok_or_else(|| "Missing MNC in SNN".to_string())?
        .as_str()
        .to_string();

    let mcc = captures.get(2)
        .ok_or_else(|| "Missing MCC in SNN".to_string())?
        .as_str()
        .to_string();

    Ok((mcc, mnc))
}

/// PLMN identity in the 3-octet BCD layout of TS 24.301 clause 9.9.3.32,
/// as consumed by the KASME derivation. A 2-digit MNC fills the spare
/// nibble with 0xF.
pub fn plmn_id_bytes(mcc: &str, mnc: &str) -> Result<[u8; 3], String> {
    if mcc.len() != 3 || !mcc.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Invalid MCC: {}", mcc));
    }
    if (mnc.len() != 2 && mnc.len() != 3) || !mnc.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Invalid MNC: {}", mnc));
    }

    let d = |s: &str, i: usize| s.as_bytes()[i] - b'0';

    let mnc3 = if mnc.len() == 3 { d(mnc, 2) } else { 0x0F };

    Ok([
        (d(mcc, 1) << 4) | d(mcc, 0),
        (mnc3 << 4) | d(mcc, 2),
        (d(mnc, 1) << 4) | d(mnc, 0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_snn_accepts_well_formed_names() {
        let (mcc, mnc) = validate_snn("5G:mnc001.mcc001.3gppnetwork.org").unwrap();
        assert_eq!(mcc, "001");
        assert_eq!(mnc, "001");

        let (mcc, mnc) = validate_snn("5G:mnc15.mcc234.3gppnetwork.org").unwrap();
        assert_eq!(mcc, "234");
        assert_eq!(mnc, "15");
    }

    #[test]
    fn validate_snn_rejects_malformed_names() {
        assert!(validate_snn("mnc001.mcc001.3gppnetwork.org").is_err());
        assert!(validate_snn("5G:mnc001.mcc01.3gppnetwork.org").is_err());
        assert!(validate_snn("5G:mnc001.mcc001.example.org").is_err());
        assert!(validate_snn("").is_err());
    }

    #[test]
    fn plmn_id_bytes_two_digit_mnc() {
        assert_eq!(plmn_id_bytes("001", "01").unwrap(), [0x00, 0xF1, 0x10]);
        assert_eq!(plmn_id_bytes("234", "15").unwrap(), [0x32, 0xF4, 0x51]);
    }

    #[test]
    fn plmn_id_bytes_three_digit_mnc() {
        assert_eq!(plmn_id_bytes("001", "001").unwrap(), [0x00, 0x11, 0x00]);
    }

    #[test]
    fn plmn_id_bytes_rejects_bad_digits() {
        assert!(plmn_id_bytes("01", "01").is_err());
        assert!(plmn_id_bytes("001", "1").is_err());
        assert!(plmn_id_bytes("0a1", "01").is_err());
    }
}
