use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::CryptoError;

type HmacSha256 = Hmac<Sha256>;

// FC values from TS 33.220 Annex B, TS 33.501 Annex A, TS 33.401 Annex A
// and TS 33.402 Annex A.2.
const FC_KAUSF: u8 = 0x6A;
const FC_XRES_STAR: u8 = 0x6B;
const FC_KASME: u8 = 0x10;
const FC_CK_IK_PRIME: u8 = 0x20;

pub fn kdf(key: &[u8], input: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(input);
    mac.finalize().into_bytes().to_vec()
}

fn check_len(field: &'static str, expected: usize, buf: &[u8]) -> Result<(), CryptoError> {
    if buf.len() != expected {
        return Err(CryptoError::InvalidLength {
            field,
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

fn ck_ik_key(ck: &[u8], ik: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_len("CK", 16, ck)?;
    check_len("IK", 16, ik)?;

    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(ck);
    key.extend_from_slice(ik);
    Ok(key)
}

/// TS 33.501 Annex A.2: KAUSF from CK || IK, serving network name and SQN xor AK.
pub fn derive_kausf(
    ck: &[u8],
    ik: &[u8],
    serving_network_name: &str,
    sqn_xor_ak: &[u8],
) -> Result<[u8; 32], CryptoError> {
    check_len("SQN^AK", 6, sqn_xor_ak)?;
    let key = ck_ik_key(ck, ik)?;

    let snn = serving_network_name.as_bytes();

    let mut s = Vec::new();
    s.push(FC_KAUSF);
    s.extend_from_slice(snn);
    s.extend_from_slice(&(snn.len() as u16).to_be_bytes());
    s.extend_from_slice(sqn_xor_ak);
    s.extend_from_slice(&[0x00, 0x06]);

    let mut out = [0u8; 32];
    out.copy_from_slice(&kdf(&key, &s));
    Ok(out)
}

/// TS 33.501 Annex A.4: XRES* from CK || IK, serving network name, RAND and XRES.
/// The low 16 bytes of the 32-byte KDF output are the XRES*.
pub fn derive_xres_star(
    ck: &[u8],
    ik: &[u8],
    serving_network_name: &str,
    rand: &[u8],
    xres: &[u8],
) -> Result<[u8; 16], CryptoError> {
    check_len("RAND", 16, rand)?;
    check_len("XRES", 8, xres)?;
    let key = ck_ik_key(ck, ik)?;

    let snn = serving_network_name.as_bytes();

    let mut s = Vec::new();
    s.push(FC_XRES_STAR);
    s.extend_from_slice(snn);
    s.extend_from_slice(&(snn.len() as u16).to_be_bytes());
    s.extend_from_slice(rand);
    s.extend_from_slice(&[0x00, 0x10]);
    s.extend_from_slice(xres);
    s.extend_from_slice(&[0x00, 0x08]);

    let out = kdf(&key, &s);
    let mut xres_star = [0u8; 16];
    xres_star.copy_from_slice(&out[16..]);
    Ok(xres_star)
}

/// TS 33.401 Annex A.2: KASME from CK || IK, PLMN identity and SQN xor AK.
pub fn derive_kasme(
    ck: &[u8],
    ik: &[u8],
    plmn_id: &[u8],
    sqn_xor_ak: &[u8],
) -> Result<[u8; 32], CryptoError> {
    check_len("PLMN-ID", 3, plmn_id)?;
    check_len("SQN^AK", 6, sqn_xor_ak)?;
    let key = ck_ik_key(ck, ik)?;

    let mut s = Vec::new();
    s.push(FC_KASME);
    s.extend_from_slice(plmn_id);
    s.extend_from_slice(&[0x00, 0x03]);
    s.extend_from_slice(sqn_xor_ak);
    s.extend_from_slice(&[0x00, 0x06]);

    let mut out = [0u8; 32];
    out.copy_from_slice(&kdf(&key, &s));
    Ok(out)
}

/// TS 33.402 Annex A.2 / RFC 5448: CK' and IK' from CK || IK, the access
/// network identity and SQN xor AK.
pub fn derive_ck_ik_prime(
    ck: &[u8],
    ik: &[u8],
    access_network_id: &str,
    sqn_xor_ak: &[u8],
) -> Result<([u8; 16], [u8; 16]), CryptoError> {
    check_len("SQN^AK", 6, sqn_xor_ak)?;
    let key = ck_ik_key(ck, ik)?;

    let ani = access_network_id.as_bytes();

    let mut s = Vec::new();
    s.push(FC_CK_IK_PRIME);
    s.extend_from_slice(ani);
    s.extend_from_slice(&(ani.len() as u16).to_be_bytes());
    s.extend_from_slice(sqn_xor_ak);
    s.extend_from_slice(&[0x00, 0x06]);

    let out = kdf(&key, &s);
    let mut ck_prime = [0u8; 16];
    let mut ik_prime = [0u8; 16];
    ck_prime.copy_from_slice(&out[..16]);
    ik_prime.copy_from_slice(&out[16..]);
    Ok((ck_prime, ik_prime))
}
