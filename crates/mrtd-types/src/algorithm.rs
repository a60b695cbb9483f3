use std::fmt;

/// Hash algorithm identifiers used by ICAO 9303 security objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashAlgId {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgId {
    /// Display name as used in credential records (e.g. `"SHA256"`).
    pub fn name(self) -> &'static str {
        match self {
            HashAlgId::Sha1 => "SHA1",
            HashAlgId::Sha224 => "SHA224",
            HashAlgId::Sha256 => "SHA256",
            HashAlgId::Sha384 => "SHA384",
            HashAlgId::Sha512 => "SHA512",
        }
    }

    /// Digest output size in bytes.
    pub fn output_size(self) -> usize {
        match self {
            HashAlgId::Sha1 => 20,
            HashAlgId::Sha224 => 28,
            HashAlgId::Sha256 => 32,
            HashAlgId::Sha384 => 48,
            HashAlgId::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashAlgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signature algorithm identifiers (CMS `signatureAlgorithm` and X.509
/// `signatureAlgorithm` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigAlgId {
    /// Bare rsaEncryption; the hash comes from the digest algorithm.
    RsaEncryption,
    Sha1WithRsa,
    Sha224WithRsa,
    Sha256WithRsa,
    Sha384WithRsa,
    Sha512WithRsa,
    /// RSASSA-PSS; the hash lives in the algorithm parameters.
    RsaPss,
    /// Bare ecPublicKey; the hash comes from the digest algorithm and the
    /// signature is DER encoded.
    Ecdsa,
    EcdsaWithSha1,
    EcdsaWithSha224,
    EcdsaWithSha256,
    EcdsaWithSha384,
    EcdsaWithSha512,
    /// BSI TR-03111 `ecdsa-plain-SHA256`: the signature is raw `r ‖ s`.
    EcdsaPlainSha256,
    Unknown,
}

impl SigAlgId {
    pub fn name(self) -> &'static str {
        match self {
            SigAlgId::RsaEncryption => "rsaEncryption",
            SigAlgId::Sha1WithRsa => "sha1WithRSAEncryption",
            SigAlgId::Sha224WithRsa => "sha224WithRSAEncryption",
            SigAlgId::Sha256WithRsa => "sha256WithRSAEncryption",
            SigAlgId::Sha384WithRsa => "sha384WithRSAEncryption",
            SigAlgId::Sha512WithRsa => "sha512WithRSAEncryption",
            SigAlgId::RsaPss => "rsaPSS",
            SigAlgId::Ecdsa => "ecdsa",
            SigAlgId::EcdsaWithSha1 => "ecdsa-with-SHA1",
            SigAlgId::EcdsaWithSha224 => "ecdsa-with-SHA224",
            SigAlgId::EcdsaWithSha256 => "ecdsa-with-SHA256",
            SigAlgId::EcdsaWithSha384 => "ecdsa-with-SHA384",
            SigAlgId::EcdsaWithSha512 => "ecdsa-with-SHA512",
            SigAlgId::EcdsaPlainSha256 => "ecdsa-plain-SHA256",
            SigAlgId::Unknown => "unknown",
        }
    }

    /// The signature family, or `None` for unknown algorithms.
    pub fn family(self) -> Option<SignatureFamily> {
        match self {
            SigAlgId::RsaEncryption
            | SigAlgId::Sha1WithRsa
            | SigAlgId::Sha224WithRsa
            | SigAlgId::Sha256WithRsa
            | SigAlgId::Sha384WithRsa
            | SigAlgId::Sha512WithRsa => Some(SignatureFamily::RsaPkcs),
            SigAlgId::RsaPss => Some(SignatureFamily::RsaPss),
            SigAlgId::Ecdsa
            | SigAlgId::EcdsaWithSha1
            | SigAlgId::EcdsaWithSha224
            | SigAlgId::EcdsaWithSha256
            | SigAlgId::EcdsaWithSha384
            | SigAlgId::EcdsaWithSha512
            | SigAlgId::EcdsaPlainSha256 => Some(SignatureFamily::Ecdsa),
            SigAlgId::Unknown => None,
        }
    }

    /// The hash bound into the algorithm identifier itself, if any.
    pub fn hash(self) -> Option<HashAlgId> {
        match self {
            SigAlgId::Sha1WithRsa | SigAlgId::EcdsaWithSha1 => Some(HashAlgId::Sha1),
            SigAlgId::Sha224WithRsa | SigAlgId::EcdsaWithSha224 => Some(HashAlgId::Sha224),
            SigAlgId::Sha256WithRsa | SigAlgId::EcdsaWithSha256 | SigAlgId::EcdsaPlainSha256 => {
                Some(HashAlgId::Sha256)
            }
            SigAlgId::Sha384WithRsa | SigAlgId::EcdsaWithSha384 => Some(HashAlgId::Sha384),
            SigAlgId::Sha512WithRsa | SigAlgId::EcdsaWithSha512 => Some(HashAlgId::Sha512),
            SigAlgId::RsaEncryption | SigAlgId::RsaPss | SigAlgId::Ecdsa | SigAlgId::Unknown => {
                None
            }
        }
    }
}

impl SigAlgId {
    /// How an ECDSA signature value is laid out, `None` outside the ECDSA
    /// family.
    pub fn ecdsa_encoding(self) -> Option<EcdsaEncoding> {
        match self {
            SigAlgId::EcdsaPlainSha256 => Some(EcdsaEncoding::Plain),
            _ if self.family() == Some(SignatureFamily::Ecdsa) => Some(EcdsaEncoding::Der),
            _ => None,
        }
    }
}

/// Layout of an ECDSA signature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcdsaEncoding {
    /// `Ecdsa-Sig-Value ::= SEQUENCE { r INTEGER, s INTEGER }`.
    Der,
    /// Fixed-width `r ‖ s`, each half the curve's field size.
    Plain,
}

impl fmt::Display for SigAlgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signature family as seen by the circuit layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureFamily {
    RsaPkcs,
    RsaPss,
    Ecdsa,
}

impl SignatureFamily {
    pub fn name(self) -> &'static str {
        match self {
            SignatureFamily::RsaPkcs => "rsa_pkcs",
            SignatureFamily::RsaPss => "rsa_pss",
            SignatureFamily::Ecdsa => "ecdsa",
        }
    }
}

/// Subject public key algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PkeyAlgId {
    Rsa,
    RsaPss,
    Ec,
    Unknown,
}

/// Elliptic curve parameter identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EccCurveId {
    NistP256,
    NistP384,
    NistP521,
    BrainpoolP160r1,
    BrainpoolP160t1,
    BrainpoolP192r1,
    BrainpoolP192t1,
    BrainpoolP224r1,
    BrainpoolP224t1,
    BrainpoolP256r1,
    BrainpoolP256t1,
    BrainpoolP320r1,
    BrainpoolP320t1,
    BrainpoolP384r1,
    BrainpoolP384t1,
    BrainpoolP512r1,
    BrainpoolP512t1,
}

impl EccCurveId {
    /// Every curve in the resolver table, in table order.
    pub const ALL: [EccCurveId; 17] = [
        EccCurveId::NistP256,
        EccCurveId::NistP384,
        EccCurveId::NistP521,
        EccCurveId::BrainpoolP160r1,
        EccCurveId::BrainpoolP160t1,
        EccCurveId::BrainpoolP192r1,
        EccCurveId::BrainpoolP192t1,
        EccCurveId::BrainpoolP224r1,
        EccCurveId::BrainpoolP224t1,
        EccCurveId::BrainpoolP256r1,
        EccCurveId::BrainpoolP256t1,
        EccCurveId::BrainpoolP320r1,
        EccCurveId::BrainpoolP320t1,
        EccCurveId::BrainpoolP384r1,
        EccCurveId::BrainpoolP384t1,
        EccCurveId::BrainpoolP512r1,
        EccCurveId::BrainpoolP512t1,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EccCurveId::NistP256 => "P-256",
            EccCurveId::NistP384 => "P-384",
            EccCurveId::NistP521 => "P-521",
            EccCurveId::BrainpoolP160r1 => "brainpoolP160r1",
            EccCurveId::BrainpoolP160t1 => "brainpoolP160t1",
            EccCurveId::BrainpoolP192r1 => "brainpoolP192r1",
            EccCurveId::BrainpoolP192t1 => "brainpoolP192t1",
            EccCurveId::BrainpoolP224r1 => "brainpoolP224r1",
            EccCurveId::BrainpoolP224t1 => "brainpoolP224t1",
            EccCurveId::BrainpoolP256r1 => "brainpoolP256r1",
            EccCurveId::BrainpoolP256t1 => "brainpoolP256t1",
            EccCurveId::BrainpoolP320r1 => "brainpoolP320r1",
            EccCurveId::BrainpoolP320t1 => "brainpoolP320t1",
            EccCurveId::BrainpoolP384r1 => "brainpoolP384r1",
            EccCurveId::BrainpoolP384t1 => "brainpoolP384t1",
            EccCurveId::BrainpoolP512r1 => "brainpoolP512r1",
            EccCurveId::BrainpoolP512t1 => "brainpoolP512t1",
        }
    }

    /// Field element size in bytes.
    pub fn field_size(self) -> usize {
        match self {
            EccCurveId::BrainpoolP160r1 | EccCurveId::BrainpoolP160t1 => 20,
            EccCurveId::BrainpoolP192r1 | EccCurveId::BrainpoolP192t1 => 24,
            EccCurveId::BrainpoolP224r1 | EccCurveId::BrainpoolP224t1 => 28,
            EccCurveId::NistP256 | EccCurveId::BrainpoolP256r1 | EccCurveId::BrainpoolP256t1 => 32,
            EccCurveId::BrainpoolP320r1 | EccCurveId::BrainpoolP320t1 => 40,
            EccCurveId::NistP384 | EccCurveId::BrainpoolP384r1 | EccCurveId::BrainpoolP384t1 => 48,
            EccCurveId::BrainpoolP512r1 | EccCurveId::BrainpoolP512t1 => 64,
            EccCurveId::NistP521 => 66,
        }
    }

    /// Look a curve up by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for EccCurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
