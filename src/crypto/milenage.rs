use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;

use super::CryptoError;

pub const KEY_LEN: usize = 16;
pub const OPC_LEN: usize = 16;
pub const RAND_LEN: usize = 16;
pub const SQN_LEN: usize = 6;
pub const AMF_LEN: usize = 2;
pub const MAC_LEN: usize = 8;
pub const RES_LEN: usize = 8;
pub const CK_LEN: usize = 16;
pub const IK_LEN: usize = 16;
pub const AK_LEN: usize = 6;

/// Output of f2/f3/f4/f5 for one (K, OPc, RAND) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilenageOutput {
    pub res: [u8; RES_LEN],
    pub ck: [u8; CK_LEN],
    pub ik: [u8; IK_LEN],
    pub ak: [u8; AK_LEN],
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

fn to_block(buf: &[u8]) -> [u8; 16] {
    let mut block = [0u8; 16];
    block.copy_from_slice(buf);
    block
}

fn xor16(a: &[u8; 16], b: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for i in 0..16 {
        out[i] = a[i] ^ b[i];
    }
    out
}

fn aes128_encrypt(k: &[u8; 16], input: &[u8; 16]) -> [u8; 16] {
    let cipher = Aes128::new(GenericArray::from_slice(k));
    let mut block = GenericArray::clone_from_slice(input);
    cipher.encrypt_block(&mut block);
    to_block(&block)
}

/// OPc = E_K(OP) XOR OP (TS 35.206 clause 4.1).
pub fn opc_from_op(op: &[u8], k: &[u8]) -> Result<[u8; OPC_LEN], CryptoError> {
    check_len("OP", OPC_LEN, op)?;
    check_len("K", KEY_LEN, k)?;

    let op = to_block(op);
    let k = to_block(k);
    Ok(xor16(&aes128_encrypt(&k, &op), &op))
}

/// f1: network authentication code MAC-A.
pub fn f1(
    k: &[u8],
    opc: &[u8],
    rand: &[u8],
    sqn: &[u8],
    amf: &[u8],
) -> Result<[u8; MAC_LEN], CryptoError> {
    let out1 = f1_base(k, opc, rand, sqn, amf)?;
    let mut mac_a = [0u8; MAC_LEN];
    mac_a.copy_from_slice(&out1[..8]);
    Ok(mac_a)
}

/// f1*: resynchronisation authentication code MAC-S.
pub fn f1_star(
    k: &[u8],
    opc: &[u8],
    rand: &[u8],
    sqn: &[u8],
    amf: &[u8],
) -> Result<[u8; MAC_LEN], CryptoError> {
    let out1 = f1_base(k, opc, rand, sqn, amf)?;
    let mut mac_s = [0u8; MAC_LEN];
    mac_s.copy_from_slice(&out1[8..]);
    Ok(mac_s)
}

// OUT1 = E_K(TEMP XOR rot(IN1 XOR OPc, r1) XOR c1) XOR OPc with r1 = 64, c1 = 0.
// MAC-A is the top half of OUT1, MAC-S the bottom half.
fn f1_base(
    k: &[u8],
    opc: &[u8],
    rand: &[u8],
    sqn: &[u8],
    amf: &[u8],
) -> Result<[u8; 16], CryptoError> {
    check_len("K", KEY_LEN, k)?;
    check_len("OPc", OPC_LEN, opc)?;
    check_len("RAND", RAND_LEN, rand)?;
    check_len("SQN", SQN_LEN, sqn)?;
    check_len("AMF", AMF_LEN, amf)?;

    let k = to_block(k);
    let opc = to_block(opc);
    let rand = to_block(rand);

    let temp = aes128_encrypt(&k, &xor16(&rand, &opc));

    // IN1 = SQN || AMF || SQN || AMF
    let mut in1 = [0u8; 16];
    in1[..6].copy_from_slice(sqn);
    in1[6..8].copy_from_slice(amf);
    in1[8..14].copy_from_slice(sqn);
    in1[14..16].copy_from_slice(amf);

    let mut input = [0u8; 16];
    for i in 0..16 {
        input[(i + 8) % 16] = in1[i] ^ opc[i];
    }
    for i in 0..16 {
        input[i] ^= temp[i];
    }

    Ok(xor16(&aes128_encrypt(&k, &input), &opc))
}

/// f2/f3/f4/f5: RES, CK, IK, AK from one challenge.
pub fn f2345(k: &[u8], opc: &[u8], rand: &[u8]) -> Result<MilenageOutput, CryptoError> {
    check_len("K", KEY_LEN, k)?;
    check_len("OPc", OPC_LEN, opc)?;
    check_len("RAND", RAND_LEN, rand)?;

    let k = to_block(k);
    let opc = to_block(opc);
    let rand = to_block(rand);

    let temp = aes128_encrypt(&k, &xor16(&rand, &opc));

    // OUT2: rotate by r2 = 0, c2 = ..01. RES is the bottom half, AK the first 6 bytes.
    let mut input = xor16(&temp, &opc);
    input[15] ^= 1;
    let out2 = xor16(&aes128_encrypt(&k, &input), &opc);

    let mut res = [0u8; RES_LEN];
    let mut ak = [0u8; AK_LEN];
    res.copy_from_slice(&out2[8..]);
    ak.copy_from_slice(&out2[..6]);

    // OUT3: rotate by r3 = 32, c3 = ..02.
    let mut input = [0u8; 16];
    for i in 0..16 {
        input[(i + 12) % 16] = temp[i] ^ opc[i];
    }
    input[15] ^= 2;
    let ck = xor16(&aes128_encrypt(&k, &input), &opc);

    // OUT4: rotate by r4 = 64, c4 = ..04.
    let mut input = [0u8; 16];
    for i in 0..16 {
        input[(i + 8) % 16] = temp[i] ^ opc[i];
    }
    input[15] ^= 4;
    let ik = xor16(&aes128_encrypt(&k, &input), &opc);

    Ok(MilenageOutput { res, ck, ik, ak })
}

/// f5*: anonymity key for the resynchronisation message.
pub fn f5_star(k: &[u8], opc: &[u8], rand: &[u8]) -> Result<[u8; AK_LEN], CryptoError> {
    check_len("K", KEY_LEN, k)?;
    check_len("OPc", OPC_LEN, opc)?;
    check_len("RAND", RAND_LEN, rand)?;

    let k = to_block(k);
    let opc = to_block(opc);
    let rand = to_block(rand);

    let temp = aes128_encrypt(&k, &xor16(&rand, &opc));

    // OUT5: rotate by r5 = 96, c5 = ..08.
    let mut input = [0u8; 16];
    for i in 0..16 {
        input[(i + 4) % 16] = temp[i] ^ opc[i];
    }
    input[15] ^= 8;
    let out5 = xor16(&aes128_encrypt(&k, &input), &opc);

    let mut ak = [0u8; AK_LEN];
    ak.copy_from_slice(&out5[..6]);
    Ok(ak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // Test set 1 from 3GPP TS 35.207/35.208.
    const K1: [u8; 16] = hex!("465b5ce8b199b49faa5f0a2ee238a6bc");
    const OP1: [u8; 16] = hex!("cdc202d5123e20f62b6d676ac72cb318");
    const OPC1: [u8; 16] = hex!("cd63cb71954a9f4e48a5994e37a02baf");
    const RAND1: [u8; 16] = hex!("23553cbe9637a89d218ae64dae47bf35");
    const SQN1: [u8; 6] = hex!("ff9bb4d0b607");
    const AMF1: [u8; 2] = hex!("b9b9");

    #[test]
    fn opc_from_op_set1() {
        assert_eq!(opc_from_op(&OP1, &K1).unwrap(), OPC1);
    }

    #[test]
    fn f1_set1() {
        let mac_a = f1(&K1, &OPC1, &RAND1, &SQN1, &AMF1).unwrap();
        assert_eq!(mac_a, hex!("4a9ffac354dfafb3"));
    }

    #[test]
    fn f1_star_set1() {
        let mac_s = f1_star(&K1, &OPC1, &RAND1, &SQN1, &AMF1).unwrap();
        assert_eq!(mac_s, hex!("01cfaf9ec4e871e9"));
    }

    #[test]
    fn f2345_set1() {
        let out = f2345(&K1, &OPC1, &RAND1).unwrap();
        assert_eq!(out.res, hex!("a54211d5e3ba50bf"));
        assert_eq!(out.ck, hex!("b40ba9a3c58b2a05bbf0d987b21bf8cb"));
        assert_eq!(out.ik, hex!("f769bcd751044604127672711c6d3441"));
        assert_eq!(out.ak, hex!("aa689c648370"));
    }

    #[test]
    fn f5_star_set1() {
        assert_eq!(f5_star(&K1, &OPC1, &RAND1).unwrap(), hex!("451e8beca43b"));
    }

    // Test set 2.
    const K2: [u8; 16] = hex!("0396eb317b6d1c36f19c1c84cd6ffd16");
    const OP2: [u8; 16] = hex!("ff53bade17df5d4e793073ce9d7579fa");
    const OPC2: [u8; 16] = hex!("53c15671c60a4b731c55b4a441c0bde2");
    const RAND2: [u8; 16] = hex!("c00d603103dcee52c4478119494202e8");
    const SQN2: [u8; 6] = hex!("fd8eef40df7d");
    const AMF2: [u8; 2] = hex!("af17");

    #[test]
    fn opc_from_op_set2() {
        assert_eq!(opc_from_op(&OP2, &K2).unwrap(), OPC2);
    }

    #[test]
    fn f1_set2() {
        let mac_a = f1(&K2, &OPC2, &RAND2, &SQN2, &AMF2).unwrap();
        assert_eq!(mac_a, hex!("5df5b31807e258b0"));
    }

    #[test]
    fn f2345_set2() {
        let out = f2345(&K2, &OPC2, &RAND2).unwrap();
        assert_eq!(out.res, hex!("d3a628ed988620f0"));
        assert_eq!(out.ck, hex!("58c433ff7a7082acd424220f2b67c556"));
        assert_eq!(out.ik, hex!("21a8c1f929702adb3e738488b9f5c5da"));
        assert_eq!(out.ak, hex!("c47783995f72"));
    }

    #[test]
    fn deterministic_across_calls() {
        let a = f2345(&K1, &OPC1, &RAND1).unwrap();
        let b = f2345(&K1, &OPC1, &RAND1).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            f1(&K1, &OPC1, &RAND1, &SQN1, &AMF1).unwrap(),
            f1(&K1, &OPC1, &RAND1, &SQN1, &AMF1).unwrap()
        );
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(matches!(
            f2345(&K1[..15], &OPC1, &RAND1),
            Err(CryptoError::InvalidLength { field: "K", .. })
        ));
        assert!(matches!(
            f2345(&K1, &OPC1[..1], &RAND1),
            Err(CryptoError::InvalidLength { field: "OPc", .. })
        ));
        assert!(matches!(
            f1(&K1, &OPC1, &RAND1, &SQN1[..5], &AMF1),
            Err(CryptoError::InvalidLength { field: "SQN", .. })
        ));
        assert!(matches!(
            f1(&K1, &OPC1, &RAND1, &SQN1, &[0u8; 3]),
            Err(CryptoError::InvalidLength { field: "AMF", .. })
        ));
        assert!(matches!(
            opc_from_op(&[0u8; 17], &K1),
            Err(CryptoError::InvalidLength { field: "OP", .. })
        ));
    }
}
