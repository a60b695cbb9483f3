//! Cross-crate tests: a synthesized EF.SOD and DG1 through decoding, CSC
//! lookup and circuit input assembly.

#[cfg(test)]
#[path = "../../../crates/mrtd-pki/tests/common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use crate::common::{self, CertBuilder, KeySpec, SodBuilder};
    use mrtd_inputs::{CredentialInputs, InputConfig, KeyFields};
    use mrtd_pki::csca::CscCandidate;
    use mrtd_pki::digest::digest;
    use mrtd_pki::sod::SecurityObject;
    use mrtd_pki::x509::Certificate;
    use mrtd_types::{HashAlgId, InputError, PkiError};
    use mrtd_utils::asn1::Encoder;
    use mrtd_utils::oid::known;

    fn csc(builder: CertBuilder) -> CscCandidate {
        let cert = Certificate::from_der(&builder.build()).unwrap();
        CscCandidate::from_certificate(&cert).unwrap()
    }

    fn rsa_document() -> (SecurityObject, Vec<u8>, Vec<CscCandidate>) {
        let dg1 = common::specimen_dg1();
        let mut builder = SodBuilder::reference().data_group(1, &dg1);
        builder.dsc = CertBuilder::dsc("NL").aki(&[0xC5; 20]);
        let sod = SecurityObject::from_der(&builder.build()).unwrap();
        let candidates = vec![
            csc(CertBuilder::csca("BE").ski(&[0xC5; 20])),
            csc(CertBuilder::csca("NL").ski(&[0xC5; 20])),
        ];
        (sod, dg1, candidates)
    }

    fn ecdsa_sig(field_size: usize) -> Vec<u8> {
        let mut e = Encoder::new();
        e.write_sequence_with(|e| {
            e.write_integer(&vec![0x4D; field_size])
                .write_integer(&vec![0x2B; field_size]);
        });
        e.finish()
    }

    // -------------------------------------------------------
    // 1. RSA-PSS document, RSA CSC
    // -------------------------------------------------------
    #[test]
    fn test_rsa_document_inputs() {
        let (sod, dg1, candidates) = rsa_document();
        let inputs =
            CredentialInputs::assemble(&sod, &dg1, &candidates, &InputConfig::default()).unwrap();

        let dsc = &inputs.dsc;
        assert_eq!(dsc.signature_algorithm, "rsa_pkcs_sha256_4096");
        let tbs = &sod.certificate.tbs_raw;
        assert_eq!(dsc.tbs_certificate.len(), 700);
        assert_eq!(dsc.tbs_certificate_len, tbs.len());
        assert_eq!(&dsc.tbs_certificate[..tbs.len()], tbs.as_slice());
        assert!(dsc.tbs_certificate[tbs.len()..].iter().all(|&b| b == 0));
        // modulus magnitude follows the INTEGER sign octet
        assert_eq!(dsc.tbs_certificate[dsc.dsc_pubkey_offset - 1], 0x00);
        assert_eq!(dsc.tbs_certificate[dsc.dsc_pubkey_offset], 0xC3);
        assert_eq!(dsc.dsc_signature.len(), 512);
        match &dsc.csc_pubkey {
            KeyFields::Rsa {
                bits,
                modulus,
                exponent,
                redc_param,
                ..
            } => {
                assert_eq!(*bits, 4096);
                assert_eq!(modulus.len(), 512);
                assert_eq!(redc_param.len(), 513);
                assert_eq!(*exponent, 65537);
            }
            other => panic!("unexpected CSC key {other:?}"),
        }

        let id = &inputs.id_data;
        assert_eq!(id.signature_algorithm, "rsa_pss_sha256_2048");
        assert_eq!(id.dg1.len(), 95);
        assert_eq!(&id.dg1[..dg1.len()], dg1.as_slice());
        let attrs = &sod.signed_attrs().unwrap().raw;
        assert_eq!(id.signed_attrs.len(), 200);
        assert_eq!(id.signed_attrs_len, attrs.len());
        assert_eq!(id.econtent.len(), 700);
        assert_eq!(id.econtent_len, sod.encapsulated_content.raw.len());
        let dg1_hash = digest(HashAlgId::Sha256, &dg1);
        assert_eq!(
            &id.econtent[id.dg1_hash_offset..id.dg1_hash_offset + 32],
            dg1_hash.as_slice()
        );
        assert_eq!(id.sod_signature, vec![0x6B; 256]);
    }

    #[test]
    fn test_json_output() {
        let (sod, dg1, candidates) = rsa_document();
        let inputs =
            CredentialInputs::assemble(&sod, &dg1, &candidates, &InputConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&inputs.to_json().unwrap()).unwrap();
        assert_eq!(json["dsc"]["csc_pubkey"]["type"], "rsa");
        assert_eq!(json["dsc"]["signature_algorithm"], "rsa_pkcs_sha256_4096");
        assert_eq!(json["id_data"]["dg1"].as_array().unwrap().len(), 95);
        let limb = json["id_data"]["dsc_pubkey"]["redc_limbs"][0].as_str().unwrap();
        assert!(limb.starts_with("0x"));
    }

    #[test]
    fn test_configured_widths() {
        let (sod, dg1, candidates) = rsa_document();
        let config = InputConfig::builder()
            .tbs_width(1000)
            .signed_attrs_width(220)
            .build()
            .unwrap();
        let inputs = CredentialInputs::assemble(&sod, &dg1, &candidates, &config).unwrap();
        assert_eq!(inputs.dsc.tbs_certificate.len(), 1000);
        assert_eq!(inputs.id_data.signed_attrs.len(), 220);

        let bad = InputConfig {
            tbs_width: Some(800),
            ..InputConfig::default()
        };
        assert!(matches!(
            CredentialInputs::assemble(&sod, &dg1, &candidates, &bad),
            Err(InputError::InvalidConfig(_))
        ));
    }

    // -------------------------------------------------------
    // 2. ECDSA document with legacy header, EC CSC
    // -------------------------------------------------------
    #[test]
    fn test_ecdsa_document_inputs() {
        let dg1 = common::specimen_dg1();
        let mut builder = SodBuilder::reference().data_group(1, &dg1);
        builder.dsc = CertBuilder::dsc("DE")
            .key(KeySpec::ec(known::prime256v1(), 32))
            .aki(&[0x07; 20])
            .ecdsa_signed(48);
        builder.signature_algorithm = common::alg_id(&known::ecdsa_with_sha256(), false);
        builder.signature = ecdsa_sig(32);
        builder.legacy_header = true;
        let sod = SecurityObject::from_der(&builder.build()).unwrap();

        let candidates = vec![csc(CertBuilder::csca("DE")
            .key(KeySpec::ec(known::secp384r1(), 48))
            .ski(&[0x07; 20]))];
        let inputs =
            CredentialInputs::assemble(&sod, &dg1, &candidates, &InputConfig::default()).unwrap();

        assert_eq!(inputs.dsc.signature_algorithm, "ecdsa_sha256_P-384");
        assert_eq!(inputs.dsc.dsc_signature.len(), 96);
        assert_eq!(inputs.dsc.dsc_signature[..48], [0x7E; 48]);
        let offset = inputs.dsc.dsc_pubkey_offset;
        assert_eq!(inputs.dsc.tbs_certificate[offset - 1], 0x04);
        assert_eq!(inputs.dsc.tbs_certificate[offset..offset + 32], [0x11; 32]);

        assert_eq!(inputs.id_data.signature_algorithm, "ecdsa_sha256_P-256");
        assert_eq!(inputs.id_data.sod_signature.len(), 64);
        assert_eq!(inputs.id_data.sod_signature[32..], [0x2B; 32]);
        assert!(matches!(
            inputs.id_data.dsc_pubkey,
            KeyFields::Ecdsa { curve: "P-256", .. }
        ));
    }

    #[test]
    fn test_plain_ecdsa_document_inputs() {
        let dg1 = common::specimen_dg1();
        let mut builder = SodBuilder::reference().data_group(1, &dg1);
        builder.dsc = CertBuilder::dsc("DE")
            .key(KeySpec::ec(known::brainpool(7), 32))
            .aki(&[0x07; 20]);
        builder.signature_algorithm = common::alg_id(&known::ecdsa_plain_sha256(), false);
        let mut raw = vec![0x5A; 32];
        raw.extend_from_slice(&[0x6B; 32]);
        builder.signature = raw.clone();
        let sod = SecurityObject::from_der(&builder.build()).unwrap();

        let candidates = vec![csc(CertBuilder::csca("DE").ski(&[0x07; 20]))];
        let inputs =
            CredentialInputs::assemble(&sod, &dg1, &candidates, &InputConfig::default()).unwrap();
        assert_eq!(
            inputs.id_data.signature_algorithm,
            "ecdsa_sha256_brainpoolP256r1"
        );
        assert_eq!(inputs.id_data.sod_signature, raw);
    }

    // -------------------------------------------------------
    // 3. Failures
    // -------------------------------------------------------
    #[test]
    fn test_csc_not_found() {
        let (sod, dg1, _) = rsa_document();
        let candidates = vec![csc(CertBuilder::csca("FR").ski(&[0xC5; 20]))];
        assert!(matches!(
            CredentialInputs::assemble(&sod, &dg1, &candidates, &InputConfig::default()),
            Err(InputError::PkiError(PkiError::CertificateNotFound(_)))
        ));
    }

    #[test]
    fn test_dg1_must_match_security_object() {
        let (sod, _, candidates) = rsa_document();
        assert!(matches!(
            CredentialInputs::assemble(&sod, b"forged", &candidates, &InputConfig::default()),
            Err(InputError::DigestMismatch(_))
        ));
    }

    #[test]
    fn test_unsupported_modulus_size() {
        let dg1 = common::specimen_dg1();
        let mut builder = SodBuilder::reference().data_group(1, &dg1);
        builder.dsc = CertBuilder::dsc("NL").key(KeySpec::rsa(1536)).aki(&[0xC5; 20]);
        builder.signature = vec![0x6B; 192];
        let sod = SecurityObject::from_der(&builder.build()).unwrap();
        let candidates = vec![csc(CertBuilder::csca("NL").ski(&[0xC5; 20]))];
        assert!(matches!(
            CredentialInputs::assemble(&sod, &dg1, &candidates, &InputConfig::default()),
            Err(InputError::PkiError(PkiError::UnsupportedAlgorithm(_)))
        ));
    }
}
