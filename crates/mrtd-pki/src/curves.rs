//! Domain parameters for the prime-field curves found in travel documents.
//!
//! Covers NIST P-256, P-384, P-521 and the Brainpool P160..P512 families in
//! both r1 and t1 (twisted, `a = p - 3`) form. Certificates that spell the
//! curve out as explicit `ECParameters` are matched against this table.

use mrtd_bignum::BigNum;
use mrtd_types::EccCurveId;

/// Parameters for a short Weierstrass curve: y² = x³ + ax + b (mod p).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveParams {
    pub id: EccCurveId,
    /// Prime field modulus.
    pub p: BigNum,
    /// Curve coefficient a.
    pub a: BigNum,
    /// Curve coefficient b.
    pub b: BigNum,
    /// Order of the base point.
    pub n: BigNum,
}

/// Parse a hex string into a BigNum. Non-hex characters are ignored.
fn bn(hex: &str) -> BigNum {
    let nibbles: Vec<u8> = hex
        .chars()
        .filter_map(|c| c.to_digit(16))
        .map(|d| d as u8)
        .collect();
    let mut bytes: Vec<u8> = nibbles
        .rchunks(2)
        .map(|pair| pair.iter().fold(0u8, |acc, &n| (acc << 4) | n))
        .collect();
    bytes.reverse();
    BigNum::from_bytes_be(&bytes)
}

/// p - 3, the `a` coefficient of every twisted Brainpool curve.
fn minus_3(p: &BigNum) -> BigNum {
    p.checked_sub(&BigNum::from_u64(3)).unwrap_or_default()
}

/// Return curve parameters for the given curve ID.
pub fn curve_params(id: EccCurveId) -> CurveParams {
    match id {
        EccCurveId::NistP256 => nist(
            id,
            "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF",
            "5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B",
            "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551",
        ),
        EccCurveId::NistP384 => nist(
            id,
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFE\
             FFFFFFFF0000000000000000FFFFFFFF",
            "B3312FA7E23EE7E4988E056BE3F82D19181D9C6EFE8141120314088F5013875A\
             C656398D8A2ED19D2A85C8EDD3EC2AEF",
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC7634D81F4372DDF\
             581A0DB248B0A77AECEC196ACCC52973",
        ),
        EccCurveId::NistP521 => CurveParams {
            id,
            p: p521_prime(),
            a: minus_3(&p521_prime()),
            b: bn("0051953EB9618E1C9A1F929A21A0B68540EEA2DA725B99B315F3B8B489918EF1\
                   09E156193951EC7E937B1652C0BD3BB1BF073573DF883D2C34F1EF451FD46B50\
                   3F00"),
            n: bn("01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF\
                   FFFFFA51868783BF2F966B7FCC0148F709A5D03BB5C9B8899C47AEBB6FB71E91\
                   386409"),
        },
        EccCurveId::BrainpoolP160r1 | EccCurveId::BrainpoolP160t1 => brainpool(
            id,
            "E95E4A5F737059DC60DFC7AD95B3D8139515620F",
            "340E7BE2A280EB74E2BE61BADA745D97E8F7C300",
            "1E589A8595423412134FAA2DBDEC95C8D8675E58",
            "7A556B6DAE535B7B51ED2C4D7DAA7A0B5C55F380",
            "E95E4A5F737059DC60DF5991D45029409E60FC09",
        ),
        EccCurveId::BrainpoolP192r1 | EccCurveId::BrainpoolP192t1 => brainpool(
            id,
            "C302F41D932A36CDA7A3463093D18DB78FCE476DE1A86297",
            "6A91174076B1E0E19C39C031FE8685C1CAE040E5C69A28EF",
            "469A28EF7C28CCA3DC721D044F4496BCCA7EF4146FBF25C9",
            "13D56FFAEC78681E68F9DEB43B35BEC2FB68542E27897B79",
            "C302F41D932A36CDA7A3462F9E9E916B5BE8F1029AC4ACC1",
        ),
        EccCurveId::BrainpoolP224r1 | EccCurveId::BrainpoolP224t1 => brainpool(
            id,
            "D7C134AA264366862A18302575D1D787B09F075797DA89F57EC8C0FF",
            "68A5E62CA9CE6C1C299803A6C1530B514E182AD8B0042A59CAD29F43",
            "2580F63CCFE44138870713B1A92369E33E2135D266DBB372386C400B",
            "4B337D934104CD7BEF271BF60CED1ED20DA14C08B3BB64F18A60888D",
            "D7C134AA264366862A18302575D0FB98D116BC4B6DDEBCA3A5A7939F",
        ),
        EccCurveId::BrainpoolP256r1 | EccCurveId::BrainpoolP256t1 => brainpool(
            id,
            "A9FB57DBA1EEA9BC3E660A909D838D726E3BF623D52620282013481D1F6E5377",
            "7D5A0975FC2C3057EEF67530417AFFE7FB8055C126DC5C6CE94A4B44F330B5D9",
            "26DC5C6CE94A4B44F330B5D9BBD77CBF958416295CF7E1CE6BCCDC18FF8C07B6",
            "662C61C430D84EA4FE66A7733D0B76B7BF93EBC4AF2F49256AE58101FEE92B04",
            "A9FB57DBA1EEA9BC3E660A909D838D718C397AA3B561A6F7901E0E82974856A7",
        ),
        EccCurveId::BrainpoolP320r1 | EccCurveId::BrainpoolP320t1 => brainpool(
            id,
            "D35E472036BC4FB7E13C785ED201E065F98FCFA6F6F40DEF4F92B9EC7893EC28FCD412B1F1B32E27",
            "3EE30B568FBAB0F883CCEBD46D3F3BB8A2A73513F5EB79DA66190EB085FFA9F492F375A97D860EB4",
            "520883949DFDBC42D3AD198640688A6FE13F41349554B49ACC31DCCD884539816F5EB4AC8FB1F1A6",
            "A7F561E038EB1ED560B3D147DB782013064C19F27ED27C6780AAF77FB8A547CEB5B4FEF422340353",
            "D35E472036BC4FB7E13C785ED201E065F98FCFA5B68F12A32D482EC7EE8658E98691555B44C59311",
        ),
        EccCurveId::BrainpoolP384r1 | EccCurveId::BrainpoolP384t1 => brainpool(
            id,
            "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B412B1DA197FB71123\
             ACD3A729901D1A71874700133107EC53",
            "7BC382C63D8C150C3C72080ACE05AFA0C2BEA28E4FB22787139165EFBA91F90F\
             8AA5814A503AD4EB04A8C7DD22CE2826",
            "04A8C7DD22CE28268B39B55416F0447C2FB77DE107DCD2A62E880EA53EEB62D5\
             7CB4390295DBC9943AB78696FA504C11",
            "7F519EADA7BDA81BD826DBA647910F8C4B9346ED8CCDC64E4B1ABD11756DCE1D\
             2074AA263B88805CED70355A33B471EE",
            "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B31F166E6CAC0425A7\
             CF3AB6AF6B7FC3103B883202E9046565",
        ),
        EccCurveId::BrainpoolP512r1 | EccCurveId::BrainpoolP512t1 => brainpool(
            id,
            "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA70330871\
             7D4D9B009BC66842AECDA12AE6A380E62881FF2F2D82C68528AA6056583A48F3",
            "7830A3318B603B89E2327145AC234CC594CBDD8D3DF91610A83441CAEA9863BC\
             2DED5D5AA8253AA10A2EF1C98B9AC8B57F1117A72BF2C7B9E7C1AC4D77FC94CA",
            "3DF91610A83441CAEA9863BC2DED5D5AA8253AA10A2EF1C98B9AC8B57F1117A7\
             2BF2C7B9E7C1AC4D77FC94CADC083E67984050B75EBAE5DD2809BD638016F723",
            "7CBBBCF9441CFAB76E1890E46884EAE321F70C0BCB4981527897504BEC3E36A6\
             2BCDFA2304976540F6450085F2DAE145C22553B465763689180EA2571867423E",
            "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA70330870\
             553E5C414CA92619418661197FAC10471DB1D381085DDADDB58796829CA90069",
        ),
    }
}

/// NIST curves all have a = p - 3.
fn nist(id: EccCurveId, p: &str, b: &str, n: &str) -> CurveParams {
    let p = bn(p);
    CurveParams {
        id,
        a: minus_3(&p),
        p,
        b: bn(b),
        n: bn(n),
    }
}

/// 2^521 - 1.
fn p521_prime() -> BigNum {
    BigNum::power_of_two(521)
        .checked_sub(&BigNum::one())
        .unwrap_or_default()
}

/// A Brainpool pair shares p and n; the t1 twist replaces a with p - 3 and
/// carries its own b.
fn brainpool(id: EccCurveId, p: &str, a: &str, b_r1: &str, b_t1: &str, n: &str) -> CurveParams {
    let p = bn(p);
    let twisted = id.name().ends_with("t1");
    CurveParams {
        id,
        a: if twisted { minus_3(&p) } else { bn(a) },
        b: if twisted { bn(b_t1) } else { bn(b_r1) },
        p,
        n: bn(n),
    }
}

/// Identify a curve given as explicit domain parameters.
///
/// All four values must match; leading zero octets in the encoding are
/// irrelevant since the comparison is numeric.
pub fn resolve_explicit(p: &[u8], a: &[u8], b: &[u8], n: &[u8]) -> Option<EccCurveId> {
    let (p, a, b, n) = (
        BigNum::from_bytes_be(p),
        BigNum::from_bytes_be(a),
        BigNum::from_bytes_be(b),
        BigNum::from_bytes_be(n),
    );
    EccCurveId::ALL
        .into_iter()
        .map(curve_params)
        .find(|c| c.p == p && c.a == a && c.b == b && c.n == n)
        .map(|c| c.id)
}
