use crate::mgf::HashAlgorithm;

/// An immutable NTRUEncrypt parameter set.
///
/// The protocol layer only ever consumes these by reference; nothing in the
/// crate mutates one. The fields follow the EESS #1 / X9.92 parameter
/// tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParams {
    /// Ring degree (all polynomials live in Z[X]/(X^N - 1)).
    pub n: usize,
    /// Small modulus, 3 for every standard set.
    pub p: i16,
    /// Large modulus, a power of two.
    pub q: i16,
    /// Number of +1 (and -1) coefficients in the private trinomial F.
    pub df: usize,
    /// g is sampled with dg+1 ones and dg negative ones.
    pub dg: usize,
    /// Number of +1 (and -1) coefficients in the blinding trinomial r.
    pub dr: usize,
    /// Minimum count of +1s, -1s and 0s a message representative must have.
    pub dm0: usize,
    /// Bit length of the random prefix b in the formatted message.
    pub db: usize,
    /// Byte length of the message length field.
    pub llen: usize,
    /// Longest plaintext this set can carry.
    pub max_msg_len_bytes: usize,
    /// Bits drawn per candidate index by the IGF.
    pub c: u32,
    /// Hash blocks an IGF-backing MGF1 produces up front.
    pub min_calls_r: usize,
    /// Hash blocks the mask MGF1 produces up front.
    pub min_calls_mask: usize,
    /// Hash used by both MGF1 instances.
    pub hash: HashAlgorithm,
    /// Bit length of the public key prefix bound into sData.
    pub pk_len: usize,
    /// Parameter set identifier, carried in key blobs.
    pub oid_bytes: [u8; 3],
}

pub const EES401EP1: KeyParams = KeyParams {
    n: 401,
    p: 3,
    q: 2048,
    df: 113,
    dg: 133,
    dr: 113,
    dm0: 113,
    db: 112,
    llen: 1,
    max_msg_len_bytes: 60,
    c: 11,
    min_calls_r: 32,
    min_calls_mask: 9,
    hash: HashAlgorithm::Sha1,
    pk_len: 114,
    oid_bytes: [0, 2, 4],
};

pub const EES449EP1: KeyParams = KeyParams {
    n: 449,
    p: 3,
    q: 2048,
    df: 134,
    dg: 149,
    dr: 134,
    dm0: 134,
    db: 128,
    llen: 1,
    max_msg_len_bytes: 67,
    c: 9,
    min_calls_r: 31,
    min_calls_mask: 9,
    hash: HashAlgorithm::Sha1,
    pk_len: 128,
    oid_bytes: [0, 3, 3],
};

pub const EES677EP1: KeyParams = KeyParams {
    n: 677,
    p: 3,
    q: 2048,
    df: 157,
    dg: 225,
    dr: 157,
    dm0: 157,
    db: 192,
    llen: 1,
    max_msg_len_bytes: 101,
    c: 11,
    min_calls_r: 27,
    min_calls_mask: 9,
    hash: HashAlgorithm::Sha256,
    pk_len: 192,
    oid_bytes: [0, 5, 3],
};

pub const EES1087EP2: KeyParams = KeyParams {
    n: 1087,
    p: 3,
    q: 2048,
    df: 120,
    dg: 362,
    dr: 120,
    dm0: 120,
    db: 256,
    llen: 1,
    max_msg_len_bytes: 170,
    c: 13,
    min_calls_r: 25,
    min_calls_mask: 14,
    hash: HashAlgorithm::Sha256,
    pk_len: 256,
    oid_bytes: [0, 6, 3],
};

pub const EES659EP1: KeyParams = KeyParams {
    n: 659,
    p: 3,
    q: 2048,
    df: 38,
    dg: 219,
    dr: 38,
    dm0: 38,
    db: 112,
    llen: 1,
    max_msg_len_bytes: 108,
    c: 11,
    min_calls_r: 11,
    min_calls_mask: 14,
    hash: HashAlgorithm::Sha1,
    pk_len: 112,
    oid_bytes: [0, 2, 6],
};

pub const EES1171EP1: KeyParams = KeyParams {
    n: 1171,
    p: 3,
    q: 2048,
    df: 106,
    dg: 390,
    dr: 106,
    dm0: 106,
    db: 256,
    llen: 1,
    max_msg_len_bytes: 186,
    c: 12,
    min_calls_r: 20,
    min_calls_mask: 15,
    hash: HashAlgorithm::Sha256,
    pk_len: 256,
    oid_bytes: [0, 6, 4],
};

/// Every parameter set this build knows about.
pub const ALL_PARAM_SETS: &[&KeyParams] = &[
    &EES401EP1,
    &EES449EP1,
    &EES677EP1,
    &EES1087EP2,
    &EES659EP1,
    &EES1171EP1,
];

/// Looks a parameter set up by its OID bytes, as found in key blobs.
pub fn param_from_oid(oid: &[u8]) -> Option<&'static KeyParams> {
    ALL_PARAM_SETS.iter().find(|p| oid == p.oid_bytes).copied()
}

impl KeyParams {
    /// Byte length of a formatted message M = b | len | msg | p0.
    pub(crate) fn formatted_msg_len(&self) -> usize {
        self.db / 8 + self.llen + self.max_msg_len_bytes + 1
    }
}
