use super::{kdf, milenage, rand, CryptoError};
use crate::sqn::SQN_MASK;
use crate::types::subscriber::{OperatorKey, SubscriberCredential};
use crate::types::ueau::{
    Av5gHeAka, AvEapAkaPrime, AvEpsAka, AvImsGbaEapAka, AvType, HssAuthType,
    HssAuthenticationVector, ThreeGAkaAv,
};

pub const AUTS_LEN: usize = 14;

/// Decoded per-subscriber key material, taken explicitly on every call.
pub struct KeyMaterial {
    pub k: [u8; 16],
    pub opc: [u8; 16],
    pub amf: [u8; 2],
}

impl KeyMaterial {
    pub fn from_credential(credential: &SubscriberCredential) -> Result<Self, CryptoError> {
        let k: [u8; 16] = decode_fixed("K", &credential.permanent_key)?;

        let opc = match credential.operator_key.as_ref() {
            Some(OperatorKey::Opc(value)) => decode_fixed("OPc", value)?,
            Some(OperatorKey::Op(value)) => {
                let op: [u8; 16] = decode_fixed("OP", value)?;
                milenage::opc_from_op(&op, &k)?
            }
            // ensure_complete() runs before derivation; an absent key here
            // is the same data-integrity condition as a zero-length one.
            None => {
                return Err(CryptoError::InvalidLength {
                    field: "OPc",
                    expected: 16,
                    actual: 0,
                })
            }
        };

        let amf: [u8; 2] = decode_fixed("AMF", &credential.amf_hex)?;

        Ok(Self { k, opc, amf })
    }
}

fn decode_fixed<const N: usize>(field: &'static str, value: &str) -> Result<[u8; N], CryptoError> {
    let bytes = hex::decode(value).map_err(|_| CryptoError::MalformedHex { field })?;
    if bytes.len() != N {
        return Err(CryptoError::InvalidLength {
            field,
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// 48-bit counter as the 6-byte big-endian value Milenage consumes.
pub fn sqn_bytes(sqn: u64) -> [u8; 6] {
    let be = (sqn & SQN_MASK).to_be_bytes();
    let mut out = [0u8; 6];
    out.copy_from_slice(&be[2..]);
    out
}

struct AkaTransients {
    rand: [u8; 16],
    autn: [u8; 16],
    res: [u8; 8],
    ck: [u8; 16],
    ik: [u8; 16],
    sqn_xor_ak: [u8; 6],
}

// One fresh challenge: RAND, MAC-A, RES/CK/IK/AK and
// AUTN = (SQN xor AK) || AMF || MAC-A.
fn compute_transients(km: &KeyMaterial, sqn: u64) -> Result<AkaTransients, CryptoError> {
    let rand = rand::fresh_rand();
    let sqn = sqn_bytes(sqn);

    let mac_a = milenage::f1(&km.k, &km.opc, &rand, &sqn, &km.amf)?;
    let out = milenage::f2345(&km.k, &km.opc, &rand)?;

    let mut sqn_xor_ak = [0u8; 6];
    for i in 0..6 {
        sqn_xor_ak[i] = sqn[i] ^ out.ak[i];
    }

    let mut autn = [0u8; 16];
    autn[..6].copy_from_slice(&sqn_xor_ak);
    autn[6..8].copy_from_slice(&km.amf);
    autn[8..].copy_from_slice(&mac_a);

    Ok(AkaTransients {
        rand,
        autn,
        res: out.res,
        ck: out.ck,
        ik: out.ik,
        sqn_xor_ak,
    })
}

fn hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// 5G home-environment AV: RAND/AUTN plus XRES* and KAUSF bound to the
/// serving network name.
pub fn derive_he_av(
    km: &KeyMaterial,
    sqn: u64,
    serving_network_name: &str,
) -> Result<Av5gHeAka, CryptoError> {
    let t = compute_transients(km, sqn)?;

    let xres_star = kdf::derive_xres_star(&t.ck, &t.ik, serving_network_name, &t.rand, &t.res)?;
    let kausf = kdf::derive_kausf(&t.ck, &t.ik, serving_network_name, &t.sqn_xor_ak)?;

    Ok(Av5gHeAka {
        av_type: AvType::FiveGHeAka,
        rand: hex_upper(&t.rand),
        xres_star: hex_upper(&xres_star),
        autn: hex_upper(&t.autn),
        kausf: hex_upper(&kausf),
    })
}

/// EPS AV: plain XRES plus KASME bound to the serving PLMN.
pub fn derive_eps_av(km: &KeyMaterial, sqn: u64, plmn_id: &[u8; 3]) -> Result<AvEpsAka, CryptoError> {
    let t = compute_transients(km, sqn)?;

    let kasme = kdf::derive_kasme(&t.ck, &t.ik, plmn_id, &t.sqn_xor_ak)?;

    Ok(AvEpsAka {
        av_type: HssAuthType::EpsAka,
        rand: hex_upper(&t.rand),
        xres: hex_upper(&t.res),
        autn: hex_upper(&t.autn),
        kasme: hex_upper(&kasme),
    })
}

/// IMS/EAP/GBA/UMTS AV: the raw Milenage RES/CK/IK with no further
/// derivation. The four families share one shape and differ only in the
/// avType the caller selected.
pub fn derive_ims_av(
    km: &KeyMaterial,
    sqn: u64,
    family: HssAuthType,
) -> Result<AvImsGbaEapAka, CryptoError> {
    let t = compute_transients(km, sqn)?;

    Ok(AvImsGbaEapAka {
        av_type: family,
        rand: hex_upper(&t.rand),
        xres: hex_upper(&t.res),
        autn: hex_upper(&t.autn),
        ck: hex_upper(&t.ck),
        ik: hex_upper(&t.ik),
    })
}

/// EAP-AKA' AV: CK'/IK' bound to the access network identity.
pub fn derive_eap_prime_av(
    km: &KeyMaterial,
    sqn: u64,
    access_network_id: &str,
) -> Result<AvEapAkaPrime, CryptoError> {
    let t = compute_transients(km, sqn)?;

    let (ck_prime, ik_prime) =
        kdf::derive_ck_ik_prime(&t.ck, &t.ik, access_network_id, &t.sqn_xor_ak)?;

    Ok(AvEapAkaPrime {
        av_type: HssAuthType::EapAkaPrime,
        rand: hex_upper(&t.rand),
        xres: hex_upper(&t.res),
        autn: hex_upper(&t.autn),
        ck_prime: hex_upper(&ck_prime),
        ik_prime: hex_upper(&ik_prime),
    })
}

/// GBA AV: UMTS-shaped, returned under the 3G AKA envelope.
pub fn derive_gba_av(km: &KeyMaterial, sqn: u64) -> Result<ThreeGAkaAv, CryptoError> {
    let t = compute_transients(km, sqn)?;

    Ok(ThreeGAkaAv {
        rand: hex_upper(&t.rand),
        autn: hex_upper(&t.autn),
        xres: hex_upper(&t.res),
        ck: hex_upper(&t.ck),
        ik: hex_upper(&t.ik),
    })
}

fn derive_hss_vector(
    km: &KeyMaterial,
    sqn: u64,
    family: HssAuthType,
    plmn_id: &[u8; 3],
    access_network_id: &str,
) -> Result<HssAuthenticationVector, CryptoError> {
    let vector = match family {
        HssAuthType::EpsAka => {
            HssAuthenticationVector::EpsAka(derive_eps_av(km, sqn, plmn_id)?)
        }
        HssAuthType::EapAkaPrime => {
            HssAuthenticationVector::EapAkaPrime(derive_eap_prime_av(km, sqn, access_network_id)?)
        }
        HssAuthType::ImsAka | HssAuthType::EapAka | HssAuthType::GbaAka | HssAuthType::UmtsAka => {
            HssAuthenticationVector::ImsGbaEapAka(derive_ims_av(km, sqn, family)?)
        }
    };
    Ok(vector)
}

/// Batch derivation for the HSS entry point: `count` independent vectors,
/// each with its own fresh RAND, over the consecutive counter values
/// base, base+1, ... All vectors must derive before any counter movement,
/// so a failure here leaves the stored SQN untouched.
pub fn derive_hss_batch(
    km: &KeyMaterial,
    base_sqn: u64,
    count: u8,
    family: HssAuthType,
    plmn_id: &[u8; 3],
    access_network_id: &str,
) -> Result<Vec<HssAuthenticationVector>, CryptoError> {
    let mut vectors = Vec::with_capacity(count as usize);
    for i in 0..count {
        let sqn = (base_sqn + i as u64) & SQN_MASK;
        vectors.push(derive_hss_vector(km, sqn, family, plmn_id, access_network_id)?);
    }
    Ok(vectors)
}

/// Resynchronization (TS 33.102 6.3.3): recover SQN_MS from
/// AUTS = CONC(SQN_MS) || MAC-S and verify MAC-S with AMF = 0x0000.
pub fn recover_resync_sqn(km: &KeyMaterial, rand: &[u8], auts: &[u8]) -> Result<u64, CryptoError> {
    if auts.len() != AUTS_LEN {
        return Err(CryptoError::InvalidLength {
            field: "AUTS",
            expected: AUTS_LEN,
            actual: auts.len(),
        });
    }

    let ak_star = milenage::f5_star(&km.k, &km.opc, rand)?;

    let mut sqn_ms = [0u8; 6];
    for i in 0..6 {
        sqn_ms[i] = auts[i] ^ ak_star[i];
    }

    // AMF is all zeroes in the resynchronization message.
    let mac_s = milenage::f1_star(&km.k, &km.opc, rand, &sqn_ms, &[0x00, 0x00])?;
    if mac_s != auts[6..] {
        return Err(CryptoError::MacMismatch);
    }

    let mut be = [0u8; 8];
    be[2..].copy_from_slice(&sqn_ms);
    Ok(u64::from_be_bytes(be))
}
