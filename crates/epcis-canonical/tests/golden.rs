use epcis_canonical::{
    encode, generate, CanonicalInput, Canonicalizer, CbvVersion, DigestAlg, EncodeError,
    FieldValue, HashIdError, HashIdentifier, NamespaceContext, ReportStatus, Scalar, ScalarType,
    TypeTag, EPCIS_NS,
};
use serde_json::json;

fn encode_text(ty: ScalarType, value: serde_json::Value) -> Result<String, EncodeError> {
    encode(&Scalar::new(ty, value)).map(|e| e.text)
}

#[test]
fn identifier_round_trips_through_wire_format() {
    let text = format!("ni:///sha-256;{}?ver=CBV2.0", "ab".repeat(32));
    let id = HashIdentifier::parse(&text).unwrap();
    assert_eq!(id.alg(), DigestAlg::Sha256);
    assert_eq!(id.digest_hex(), "ab".repeat(32));
    assert_eq!(id.cbv_version().as_ref(), "CBV2.0");
    assert_eq!(id.to_string(), text);
}

#[test]
fn identifier_rejects_malformed_text() {
    let upper = format!("ni:///sha-256;{}?ver=CBV2.0", "AB".repeat(32));
    let short = format!("ni:///sha-256;{}?ver=CBV2.0", "ab".repeat(31));
    let no_version = format!("ni:///sha-256;{}", "ab".repeat(32));
    for text in [upper, short, no_version] {
        assert!(matches!(
            HashIdentifier::parse(&text),
            Err(HashIdError::InvalidIdentifier(_))
        ));
    }
    let bad_version = format!("ni:///sha-256;{}?ver=2.0", "ab".repeat(32));
    assert!(matches!(
        HashIdentifier::parse(&bad_version),
        Err(HashIdError::Version(_))
    ));
}

#[test]
fn identifier_serializes_as_plain_string() {
    let text = format!("ni:///sha-256;{}?ver=CBV2.0", "0f".repeat(32));
    let id = HashIdentifier::parse(&text).unwrap();
    assert_eq!(serde_json::to_value(&id).unwrap(), json!(text));
    let back: HashIdentifier = serde_json::from_value(json!(text)).unwrap();
    assert_eq!(back, id);
}

#[test]
fn encoder_normalizes_numbers() {
    assert_eq!(encode_text(ScalarType::Number, json!(42)).unwrap(), "42");
    assert_eq!(encode_text(ScalarType::Number, json!(1.5)).unwrap(), "1.5");
    assert_eq!(encode_text(ScalarType::Number, json!(2.0)).unwrap(), "2");
    assert_eq!(encode_text(ScalarType::Number, json!("0012.3400")).unwrap(), "12.34");
    assert_eq!(encode_text(ScalarType::Number, json!("-0")).unwrap(), "0");
    assert_eq!(encode_text(ScalarType::Number, json!(1e21)).unwrap(), "1000000000000000000000");
}

#[test]
fn encoder_rejects_non_numeric_number() {
    let err = encode_text(ScalarType::Number, json!("twelve")).unwrap_err();
    assert_eq!(
        err,
        EncodeError::InvalidValue {
            expected: ScalarType::Number,
            found: "\"twelve\"".to_string(),
        }
    );
    assert!(encode_text(ScalarType::Number, json!(true)).is_err());
}

#[test]
fn encoder_handles_booleans_and_hex() {
    assert_eq!(encode_text(ScalarType::Boolean, json!(true)).unwrap(), "true");
    assert_eq!(encode_text(ScalarType::Boolean, json!("false")).unwrap(), "false");
    assert!(encode_text(ScalarType::Boolean, json!("yes")).is_err());
    assert_eq!(encode_text(ScalarType::HexBinary, json!("DEADbeef")).unwrap(), "deadbeef");
    assert!(encode_text(ScalarType::HexBinary, json!("abc")).is_err());
}

#[test]
fn encoder_keeps_timestamp_offset_verbatim() {
    assert_eq!(
        encode_text(ScalarType::Timestamp, json!("2024-03-01T10:00:00+02:00")).unwrap(),
        "2024-03-01T10:00:00+02:00"
    );
    assert_eq!(
        encode_text(ScalarType::Timestamp, json!("2024-03-01T08:00:00.000Z")).unwrap(),
        "2024-03-01T08:00:00.000Z"
    );
    assert!(encode_text(ScalarType::Timestamp, json!("2024-03-01T10:00:00")).is_err());
    assert!(encode_text(ScalarType::Timestamp, json!("yesterday")).is_err());
}

#[test]
fn encoder_checks_uris_and_strings() {
    assert_eq!(
        encode_text(ScalarType::Uri, json!("urn:epc:id:sgln:0614141.00777.0")).unwrap(),
        "urn:epc:id:sgln:0614141.00777.0"
    );
    assert!(encode_text(ScalarType::Uri, json!("")).is_err());
    assert!(encode_text(ScalarType::Uri, json!("has space")).is_err());
    assert_eq!(encode_text(ScalarType::String, json!(" as is ")).unwrap(), " as is ");
    assert!(encode_text(ScalarType::String, json!(7)).is_err());
}

#[test]
fn token_bytes_follow_length_prefixed_layout() {
    let context = NamespaceContext::default();
    let action = FieldValue::string("ADD");
    let input = CanonicalInput {
        event_type: "ObjectEvent",
        well_known: vec![("action", &action)],
        extensions: vec![],
    };
    let stream = Canonicalizer::new(&context).canonicalize(&input).unwrap();
    assert_eq!(stream.tokens.len(), 2);
    assert_eq!(stream.report.status, ReportStatus::Complete);

    let mut expected = Vec::new();
    for (local, value) in [("type", "ObjectEvent"), ("action", "ADD")] {
        expected.extend_from_slice(&0u32.to_be_bytes());
        expected.extend_from_slice(&0u64.to_be_bytes());
        expected.push(b's');
        for part in [EPCIS_NS, local, value] {
            expected.extend_from_slice(&(part.len() as u64).to_be_bytes());
            expected.extend_from_slice(part.as_bytes());
        }
    }
    assert_eq!(stream.to_bytes(), expected);
}

#[test]
fn containers_record_parent_and_depth() {
    let context = NamespaceContext::default();
    let epcs = FieldValue::array([FieldValue::uri("urn:epc:id:sgtin:1"), FieldValue::uri("urn:epc:id:sgtin:2")]);
    let input = CanonicalInput {
        event_type: "ObjectEvent",
        well_known: vec![("epcList", &epcs)],
        extensions: vec![],
    };
    let stream = Canonicalizer::new(&context).canonicalize(&input).unwrap();
    let list = &stream.tokens[1];
    assert_eq!(list.tag, TypeTag::Array);
    assert_eq!(list.value, "2");
    assert_eq!(list.depth, 0);
    for element in &stream.tokens[2..] {
        assert_eq!(element.depth, 1);
        assert_eq!(element.parent, Some(1));
        assert_eq!(element.name, None);
        assert_eq!(element.tag, TypeTag::Uri);
    }
    assert_eq!(stream.report.metrics.get("tokens"), Some(&4));
    assert_eq!(stream.report.metrics.get("max_depth"), Some(&1));
}

#[test]
fn generate_is_deterministic() {
    let context = NamespaceContext::default();
    let action = FieldValue::string("OBSERVE");
    let input = CanonicalInput {
        event_type: "ObjectEvent",
        well_known: vec![("action", &action)],
        extensions: vec![],
    };
    let canonicalizer = Canonicalizer::new(&context);
    let first = generate(&canonicalizer.canonicalize(&input).unwrap(), &CbvVersion::default()).unwrap();
    let second = generate(&canonicalizer.canonicalize(&input).unwrap(), &CbvVersion::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.digest_hex().len(), 64);
    assert!(first.digest_hex().chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));

    let v21 = CbvVersion::parse("CBV2.1").unwrap();
    let other = generate(&canonicalizer.canonicalize(&input).unwrap(), &v21).unwrap();
    assert_eq!(other.digest_hex(), first.digest_hex());
    assert!(other.to_string().ends_with("?ver=CBV2.1"));
}
