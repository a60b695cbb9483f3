//! Fixture builder: synthesizes certificates and security objects with the
//! workspace encoder.

#![allow(dead_code)]

use mrtd_pki::digest::digest;
use mrtd_pki::oid_mapping::hash_to_oid;
use mrtd_types::HashAlgId;
use mrtd_utils::asn1::{Encoder, Tag};
use mrtd_utils::oid::{known, Oid};

/// 2013-12-16T21:43:18Z
pub const NOT_BEFORE: i64 = 1387230198;
/// 2023-12-16T21:43:18Z
pub const NOT_AFTER: i64 = 1702762998;

/// DG1 hash of the reference security object.
pub const REFERENCE_DG1_HASH: &str =
    "4170ca879fce6a5a5c6ad0e1b1a5d5f2c32d1a0e8a9bf7a6a6ac5c3b3d1f42b6";

pub fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

fn tlv(f: impl FnOnce(&mut Encoder)) -> Vec<u8> {
    let mut e = Encoder::new();
    f(&mut e);
    e.finish()
}

/// `AlgorithmIdentifier` with NULL or absent parameters.
pub fn alg_id(oid: &Oid, null_params: bool) -> Vec<u8> {
    tlv(|e| {
        e.write_sequence_with(|e| {
            e.write_oid(&oid.to_der_value());
            if null_params {
                e.write_null();
            }
        });
    })
}

/// `id-RSASSA-PSS` with SHA-256, MGF1-SHA-256 and a 32 byte salt.
pub fn rsa_pss_sha256() -> Vec<u8> {
    let sha256 = alg_id(&known::sha256(), true);
    let mgf = tlv(|e| {
        e.write_sequence_with(|e| {
            e.write_oid(&known::mgf1().to_der_value()).write_raw(&sha256);
        });
    });
    let salt = tlv(|e| {
        e.write_integer_u64(32);
    });
    tlv(|e| {
        e.write_sequence_with(|e| {
            e.write_oid(&known::rsassa_pss().to_der_value());
            e.write_sequence_with(|e| {
                e.write_context_specific(0, true, &sha256)
                    .write_context_specific(1, true, &mgf)
                    .write_context_specific(2, true, &salt);
            });
        });
    })
}

pub fn name(country: &str, cn: &str) -> Vec<u8> {
    tlv(|e| {
        e.write_sequence_with(|e| {
            e.write_set_with(|e| {
                e.write_sequence_with(|e| {
                    e.write_oid(&known::country_name().to_der_value())
                        .write_printable_string(country);
                });
            });
            e.write_set_with(|e| {
                e.write_sequence_with(|e| {
                    e.write_oid(&known::common_name().to_der_value())
                        .write_utf8_string(cn);
                });
            });
        });
    })
}

/// Subject public key of a fixture certificate.
#[derive(Clone)]
pub enum KeySpec {
    Rsa { modulus: Vec<u8>, exponent: Vec<u8> },
    Ec { curve: Oid, point: Vec<u8> },
}

impl KeySpec {
    /// An RSA key with a modulus of exactly `bits` bits.
    pub fn rsa(bits: usize) -> Self {
        let mut modulus = vec![0xA5; bits / 8];
        modulus[0] = 0xC3;
        KeySpec::Rsa {
            modulus,
            exponent: vec![0x01, 0x00, 0x01],
        }
    }

    /// An uncompressed point on a named curve.
    pub fn ec(curve: Oid, field_size: usize) -> Self {
        let mut point = vec![0x04];
        point.extend(std::iter::repeat(0x11).take(field_size));
        point.extend(std::iter::repeat(0x22).take(field_size));
        KeySpec::Ec { curve, point }
    }

    pub fn spki(&self) -> Vec<u8> {
        match self {
            KeySpec::Rsa { modulus, exponent } => {
                let key = tlv(|e| {
                    e.write_sequence_with(|e| {
                        e.write_integer(modulus).write_integer(exponent);
                    });
                });
                tlv(|e| {
                    e.write_sequence_with(|e| {
                        e.write_raw(&alg_id(&known::rsa_encryption(), true))
                            .write_bit_string(0, &key);
                    });
                })
            }
            KeySpec::Ec { curve, point } => tlv(|e| {
                e.write_sequence_with(|e| {
                    e.write_sequence_with(|e| {
                        e.write_oid(&known::ec_public_key().to_der_value())
                            .write_oid(&curve.to_der_value());
                    })
                    .write_bit_string(0, point);
                });
            }),
        }
    }
}

/// Builds a v3 certificate. The signature is filler.
#[derive(Clone)]
pub struct CertBuilder {
    pub serial: Vec<u8>,
    pub issuer: (String, String),
    pub subject: (String, String),
    pub validity: (i64, i64),
    pub key: KeySpec,
    pub subject_key_identifier: Option<Vec<u8>>,
    pub authority_key_identifier: Option<Vec<u8>>,
    pub private_key_usage_period: Option<(i64, i64)>,
    pub signature_algorithm: Vec<u8>,
    pub signature_value: Vec<u8>,
}

impl CertBuilder {
    /// A document signer issued by the CSCA of `country`.
    pub fn dsc(country: &str) -> Self {
        CertBuilder {
            serial: vec![0x10, 0x01],
            issuer: (country.into(), format!("CSCA {country}")),
            subject: (country.into(), "DS 01".into()),
            validity: (NOT_BEFORE, NOT_AFTER),
            key: KeySpec::rsa(2048),
            subject_key_identifier: None,
            authority_key_identifier: None,
            private_key_usage_period: None,
            signature_algorithm: alg_id(&known::sha256_with_rsa_encryption(), true),
            signature_value: vec![0x5A; 256],
        }
    }

    /// A self-signed country signing certificate.
    pub fn csca(country: &str) -> Self {
        CertBuilder {
            serial: vec![0x01],
            issuer: (country.into(), format!("CSCA {country}")),
            subject: (country.into(), format!("CSCA {country}")),
            validity: (NOT_BEFORE - 86_400 * 365, NOT_AFTER + 86_400 * 365 * 5),
            key: KeySpec::rsa(4096),
            subject_key_identifier: None,
            authority_key_identifier: None,
            private_key_usage_period: None,
            signature_algorithm: alg_id(&known::sha256_with_rsa_encryption(), true),
            signature_value: vec![0x5A; 256],
        }
    }

    pub fn key(mut self, key: KeySpec) -> Self {
        self.key = key;
        self
    }

    pub fn ski(mut self, ski: &[u8]) -> Self {
        self.subject_key_identifier = Some(ski.to_vec());
        self
    }

    pub fn aki(mut self, aki: &[u8]) -> Self {
        self.authority_key_identifier = Some(aki.to_vec());
        self
    }

    /// Signed with ECDSA; the signature value is a DER `{r, s}` pair.
    pub fn ecdsa_signed(mut self, field_size: usize) -> Self {
        self.signature_algorithm = alg_id(&known::ecdsa_with_sha256(), false);
        self.signature_value = tlv(|e| {
            e.write_sequence_with(|e| {
                e.write_integer(&vec![0x7E; field_size])
                    .write_integer(&vec![0x3C; field_size]);
            });
        });
        self
    }

    pub fn usage_period(mut self, not_before: i64, not_after: i64) -> Self {
        self.private_key_usage_period = Some((not_before, not_after));
        self
    }

    fn extensions(&self) -> Vec<u8> {
        let mut exts = Encoder::new();
        if let Some(aki) = &self.authority_key_identifier {
            let value = tlv(|e| {
                e.write_sequence_with(|e| {
                    e.write_context_specific(0, false, aki);
                });
            });
            exts.write_sequence_with(|e| {
                e.write_oid(&known::authority_key_identifier().to_der_value())
                    .write_octet_string(&value);
            });
        }
        if let Some(ski) = &self.subject_key_identifier {
            let value = tlv(|e| {
                e.write_octet_string(ski);
            });
            exts.write_sequence_with(|e| {
                e.write_oid(&known::subject_key_identifier().to_der_value())
                    .write_octet_string(&value);
            });
        }
        if let Some((start, end)) = self.private_key_usage_period {
            let start = generalized_time(start);
            let end = generalized_time(end);
            let value = tlv(|e| {
                e.write_sequence_with(|e| {
                    e.write_context_specific(0, false, &start)
                        .write_context_specific(1, false, &end);
                });
            });
            exts.write_sequence_with(|e| {
                e.write_oid(&known::private_key_usage_period().to_der_value())
                    .write_octet_string(&value);
            });
        }
        exts.write_sequence_with(|e| {
            e.write_oid(&known::key_usage().to_der_value())
                .write_boolean(true)
                .write_octet_string(&[0x03, 0x02, 0x07, 0x80]);
        });
        exts.finish()
    }

    pub fn tbs(&self) -> Vec<u8> {
        let version = tlv(|e| {
            e.write_integer_u64(2);
        });
        let exts = tlv(|e| {
            e.write_sequence(&self.extensions());
        });
        tlv(|e| {
            e.write_sequence_with(|e| {
                e.write_context_specific(0, true, &version)
                    .write_integer(&self.serial)
                    .write_raw(&self.signature_algorithm)
                    .write_raw(&name(&self.issuer.0, &self.issuer.1));
                e.write_sequence_with(|e| {
                    e.write_utc_time(self.validity.0)
                        .write_utc_time(self.validity.1);
                });
                e.write_raw(&name(&self.subject.0, &self.subject.1))
                    .write_raw(&self.key.spki())
                    .write_context_specific(3, true, &exts);
            });
        })
    }

    pub fn build(&self) -> Vec<u8> {
        let tbs = self.tbs();
        tlv(|e| {
            e.write_sequence_with(|e| {
                e.write_raw(&tbs)
                    .write_raw(&self.signature_algorithm)
                    .write_bit_string(0, &self.signature_value);
            });
        })
    }
}

/// Content octets of a GeneralizedTime, for IMPLICIT tagging.
fn generalized_time(ts: i64) -> Vec<u8> {
    let der = tlv(|e| {
        e.write_generalized_time(ts);
    });
    der[2..].to_vec()
}

/// How the fixture SignerInfo names its certificate.
#[derive(Clone)]
pub enum Sid {
    IssuerAndSerial,
    SubjectKeyIdentifier(Vec<u8>),
}

/// Builds an EF.SOD.
#[derive(Clone)]
pub struct SodBuilder {
    pub version: u64,
    pub hash: HashAlgId,
    pub data_groups: Vec<(u64, Vec<u8>)>,
    pub outer_content_type: Oid,
    pub e_content_type: Oid,
    pub dsc: CertBuilder,
    pub extra_certificates: Vec<Vec<u8>>,
    pub sid: Sid,
    pub signer_count: usize,
    pub signature_algorithm: Vec<u8>,
    pub signature: Vec<u8>,
    pub signing_time: Option<i64>,
    pub message_digest: Option<Vec<u8>>,
    pub legacy_header: bool,
}

impl SodBuilder {
    /// Version 3, SHA-256, five data groups, signed with RSASSA-PSS by a
    /// Dutch DSC valid from 2013-12-16T21:43:18Z.
    pub fn reference() -> Self {
        SodBuilder {
            version: 3,
            hash: HashAlgId::Sha256,
            data_groups: vec![
                (1, unhex(REFERENCE_DG1_HASH)),
                (2, vec![0x22; 32]),
                (3, vec![0x33; 32]),
                (14, vec![0xEE; 32]),
                (15, vec![0xFF; 32]),
            ],
            outer_content_type: known::pkcs7_signed_data(),
            e_content_type: known::icao_lds_security_object(),
            dsc: CertBuilder::dsc("NL"),
            extra_certificates: Vec::new(),
            sid: Sid::IssuerAndSerial,
            signer_count: 1,
            signature_algorithm: rsa_pss_sha256(),
            signature: vec![0x6B; 256],
            signing_time: Some(NOT_BEFORE + 3600),
            message_digest: None,
            legacy_header: false,
        }
    }

    /// Replace the stored hash of data group `n` with the hash of `content`.
    pub fn data_group(mut self, n: u64, content: &[u8]) -> Self {
        let hash = digest(self.hash, content);
        self.data_groups.retain(|(m, _)| *m != n);
        self.data_groups.push((n, hash));
        self.data_groups.sort_by_key(|(m, _)| *m);
        self
    }

    pub fn lds_security_object(&self) -> Vec<u8> {
        tlv(|e| {
            e.write_sequence_with(|e| {
                e.write_integer_u64(0)
                    .write_raw(&alg_id(&hash_to_oid(self.hash), true));
                e.write_sequence_with(|e| {
                    for (n, hash) in &self.data_groups {
                        e.write_sequence_with(|e| {
                            e.write_integer_u64(*n).write_octet_string(hash);
                        });
                    }
                });
            });
        })
    }

    fn attribute(oid: &Oid, value: &[u8]) -> Vec<u8> {
        tlv(|e| {
            e.write_sequence_with(|e| {
                e.write_oid(&oid.to_der_value()).write_set(value);
            });
        })
    }

    /// The attribute list in the order it is encoded.
    pub fn signed_attribute_list(&self) -> Vec<u8> {
        let lds = self.lds_security_object();
        let message_digest = self
            .message_digest
            .clone()
            .unwrap_or_else(|| digest(self.hash, &lds));
        let mut attrs = Self::attribute(
            &known::content_type(),
            &tlv(|e| {
                e.write_oid(&self.e_content_type.to_der_value());
            }),
        );
        if let Some(ts) = self.signing_time {
            attrs.extend(Self::attribute(
                &known::signing_time(),
                &tlv(|e| {
                    e.write_utc_time(ts);
                }),
            ));
        }
        attrs.extend(Self::attribute(
            &known::message_digest(),
            &tlv(|e| {
                e.write_octet_string(&message_digest);
            }),
        ));
        attrs
    }

    fn signer_info(&self) -> Vec<u8> {
        let attrs = self.signed_attribute_list();
        tlv(|e| {
            e.write_sequence_with(|e| {
                match &self.sid {
                    Sid::IssuerAndSerial => {
                        e.write_integer_u64(1);
                        e.write_sequence_with(|e| {
                            e.write_raw(&name(&self.dsc.issuer.0, &self.dsc.issuer.1))
                                .write_integer(&self.dsc.serial);
                        });
                    }
                    Sid::SubjectKeyIdentifier(ski) => {
                        e.write_integer_u64(3)
                            .write_tagged(Tag::context(0, false), ski);
                    }
                }
                e.write_raw(&alg_id(&hash_to_oid(self.hash), true))
                    .write_context_specific(0, true, &attrs)
                    .write_raw(&self.signature_algorithm)
                    .write_octet_string(&self.signature);
            });
        })
    }

    pub fn build(&self) -> Vec<u8> {
        let lds = self.lds_security_object();
        let mut certs = self.dsc.build();
        for extra in &self.extra_certificates {
            certs.extend_from_slice(extra);
        }
        let signer = self.signer_info();
        let econtent = tlv(|e| {
            e.write_octet_string(&lds);
        });

        let signed_data = tlv(|e| {
            e.write_sequence_with(|e| {
                e.write_integer_u64(self.version);
                e.write_set_with(|e| {
                    e.write_raw(&alg_id(&hash_to_oid(self.hash), true));
                });
                e.write_sequence_with(|e| {
                    e.write_oid(&self.e_content_type.to_der_value())
                        .write_context_specific(0, true, &econtent);
                });
                e.write_context_specific(0, true, &certs);
                e.write_set_with(|e| {
                    for _ in 0..self.signer_count {
                        e.write_raw(&signer);
                    }
                });
            });
        });
        let der = tlv(|e| {
            e.write_sequence_with(|e| {
                e.write_oid(&self.outer_content_type.to_der_value())
                    .write_context_specific(0, true, &signed_data);
            });
        });

        if self.legacy_header {
            let len = der.len() as u16;
            let mut out = vec![0x77, 0x82];
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(&der);
            out
        } else {
            der
        }
    }
}

/// A DG1 file around a TD3 specimen MRZ.
pub fn specimen_dg1() -> Vec<u8> {
    let mrz = b"P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<\
                L898902C36UTO7408122F1204159ZE184226B<<<<<10";
    let inner = tlv(|e| {
        e.write_tagged(Tag::application(0x1F, false), mrz);
    });
    tlv(|e| {
        e.write_tagged(Tag::application(1, true), &inner);
    })
}
