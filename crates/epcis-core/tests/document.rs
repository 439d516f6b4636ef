use epcis_canonical::{CbvVersion, FieldValue, HashIdError};
use epcis_core::{
    compute_event_id, verify_event_id, Action, DocumentError, EpcisDocument, EventBuilder,
    EventIdError, EventType, HashConfig, NamespaceBinding, QuantityElement, ReadPoint,
    SensorElement, SensorMetadata,
};
use serde_json::json;

fn epcis_document(events: serde_json::Value) -> serde_json::Value {
    json!({
        "@context": [
            "https://ref.gs1.org/standards/epcis/epcis-context.jsonld",
            {"ext1": "https://example.com/ext1/"}
        ],
        "type": "EPCISDocument",
        "schemaVersion": "2.0",
        "creationDate": "2024-01-01T00:00:00Z",
        "epcisBody": {"eventList": events}
    })
}

#[test]
fn document_matches_builder() {
    let doc = EpcisDocument::from_json(&epcis_document(json!([{
        "type": "ObjectEvent",
        "eventTime": "2024-01-01T00:00:00.000Z",
        "eventTimeZoneOffset": "+00:00",
        "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"],
        "action": "OBSERVE",
        "bizStep": "shipping",
        "readPoint": {"id": "urn:epc:id:sgln:0614141.07346.1234"},
        "quantityList": [{
            "epcClass": "urn:epc:class:lgtin:4012345.012345.998877",
            "quantity": 200,
            "uom": "KGM"
        }],
        "ext1:temperature": 21.5
    }])))
    .unwrap();
    assert_eq!(doc.events.len(), 1);
    assert_eq!(doc.events[0].event_type(), &EventType::ObjectEvent);

    let built = EventBuilder::object_event()
        .event_time("2024-01-01T00:00:00.000Z")
        .event_time_zone_offset(&epcis_canonical::TimeZoneOffset::parse("+00:00").unwrap())
        .epc_list(["urn:epc:id:sgtin:0614141.107346.2017"])
        .action(Action::Observe)
        .biz_step("shipping")
        .read_point(ReadPoint::new("urn:epc:id:sgln:0614141.07346.1234"))
        .add_quantity(
            QuantityElement::new("urn:epc:class:lgtin:4012345.012345.998877")
                .quantity(200)
                .uom("KGM"),
        )
        .field("ext1:temperature", FieldValue::number(21.5))
        .build();

    let version = CbvVersion::default();
    let from_doc = doc.hash_events(&version).unwrap();
    let from_builder = compute_event_id(&built, &doc.context, &version).unwrap();
    assert_eq!(from_doc, vec![from_builder]);
}

#[test]
fn document_context_aliases_hash_alike() {
    let full = EpcisDocument::from_json(&json!({
        "type": "ObjectEvent",
        "action": "OBSERVE",
        "https://example.com/ext1/foo": "bar"
    }))
    .unwrap();
    let aliased = EpcisDocument::from_json(&json!({
        "@context": {"vendor": "https://example.com/ext1/"},
        "type": "ObjectEvent",
        "action": "OBSERVE",
        "vendor:foo": "bar"
    }))
    .unwrap();

    let version = CbvVersion::default();
    assert_eq!(
        full.hash_events(&version).unwrap(),
        aliased.hash_events(&version).unwrap()
    );
}

#[test]
fn reads_query_documents_and_bare_arrays() {
    let event = json!({"type": "TransactionEvent", "action": "ADD", "parentID": "urn:x:1"});

    let query = EpcisDocument::from_json(&json!({
        "type": "EPCISQueryDocument",
        "epcisBody": {"queryResults": {"resultsBody": {"eventList": [event.clone()]}}}
    }))
    .unwrap();
    let array = EpcisDocument::from_json(&json!([event.clone(), event])).unwrap();

    assert_eq!(query.events.len(), 1);
    assert_eq!(array.events.len(), 2);
    assert_eq!(array.events[0], array.events[1]);
}

#[test]
fn assign_then_verify_round_trip() {
    let mut doc = EpcisDocument::from_json(&epcis_document(json!([
        {"type": "ObjectEvent", "action": "OBSERVE", "epcList": ["urn:a", "urn:b"]},
        {"type": "AggregationEvent", "action": "ADD", "parentID": "urn:p", "childEPCs": ["urn:c"]}
    ])))
    .unwrap();
    doc.assign_event_ids(&CbvVersion::default()).unwrap();

    for event in &doc.events {
        assert!(event.event_id().is_some());
        assert!(verify_event_id(event, &doc.context).unwrap());
    }
}

#[test]
fn record_time_and_claimed_id_are_kept_but_not_hashed() {
    let plain = EpcisDocument::from_json(&json!({"type": "ObjectEvent", "action": "ADD"})).unwrap();
    let stamped = EpcisDocument::from_json(&json!({
        "type": "ObjectEvent",
        "action": "ADD",
        "eventID": "urn:uuid:1",
        "recordTime": "2024-05-05T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(stamped.events[0].event_id(), Some("urn:uuid:1"));
    assert_eq!(stamped.events[0].record_time(), Some("2024-05-05T00:00:00Z"));

    let version = CbvVersion::default();
    assert_eq!(
        plain.hash_events(&version).unwrap(),
        stamped.hash_events(&version).unwrap()
    );
}

#[test]
fn typed_literals_do_not_collide() {
    let boolean = EpcisDocument::from_json(&json!({
        "@context": {"ext1": "https://example.com/ext1/"},
        "type": "ObjectEvent",
        "ext1:flag": true
    }))
    .unwrap();
    let string = EpcisDocument::from_json(&json!({
        "@context": {"ext1": "https://example.com/ext1/"},
        "type": "ObjectEvent",
        "ext1:flag": "true"
    }))
    .unwrap();
    let version = CbvVersion::default();
    assert_ne!(
        boolean.hash_events(&version).unwrap(),
        string.hash_events(&version).unwrap()
    );
}

#[test]
fn value_objects_are_typed() {
    let typed = EpcisDocument::from_json(&json!({
        "@context": {"ext1": "https://example.com/ext1/"},
        "type": "ObjectEvent",
        "ext1:checked": {"@value": "2024-01-01T00:00:00Z", "@type": "xsd:dateTime"}
    }))
    .unwrap();
    assert_eq!(
        typed.events[0].field("ext1:checked"),
        Some(&FieldValue::timestamp("2024-01-01T00:00:00Z"))
    );

    let bad = EpcisDocument::from_json(&json!({
        "@context": {"ext1": "https://example.com/ext1/"},
        "type": "ObjectEvent",
        "ext1:checked": {"@value": "not a time", "@type": "xsd:dateTime"}
    }))
    .unwrap();
    assert!(matches!(
        bad.hash_events(&CbvVersion::default()),
        Err(EventIdError::Canonicalization(_))
    ));
}

#[test]
fn config_namespaces_apply_before_document_context() {
    let config = HashConfig {
        namespaces: vec![NamespaceBinding {
            prefix: "ext1".to_string(),
            uri: "https://config.example/".to_string(),
        }],
        ..HashConfig::default()
    };
    let value = json!({"type": "ObjectEvent", "ext1:x": "1"});

    let from_config = EpcisDocument::from_json_with(&value, config.context_builder().unwrap())
        .unwrap();
    assert_eq!(
        from_config.context.resolve("ext1").unwrap(),
        "https://config.example/"
    );

    let mut overridden = value.clone();
    overridden["@context"] = json!({"ext1": "https://document.example/"});
    let from_doc =
        EpcisDocument::from_json_with(&overridden, config.context_builder().unwrap()).unwrap();
    assert_eq!(
        from_doc.context.resolve("ext1").unwrap(),
        "https://document.example/"
    );
}

#[test]
fn rejects_malformed_documents() {
    assert!(matches!(
        EpcisDocument::from_json_str("{not json"),
        Err(DocumentError::Json(_))
    ));
    assert!(matches!(
        EpcisDocument::from_json(&json!({"hello": "world"})),
        Err(DocumentError::UnrecognizedShape(_))
    ));
    assert!(matches!(
        EpcisDocument::from_json(&json!([{"action": "ADD"}])),
        Err(DocumentError::MissingType { index: 0 })
    ));
    assert!(matches!(
        EpcisDocument::from_json(&json!([{"type": "ObjectEvent"}, 5])),
        Err(DocumentError::NotAnObject { index: 1 })
    ));
    assert!(matches!(
        EpcisDocument::from_json(&json!({"type": "ObjectEvent", "bizStep": null})),
        Err(DocumentError::NullValue { .. })
    ));
    assert!(matches!(
        EpcisDocument::from_json(&json!({"type": "ObjectEvent", "eventID": 7})),
        Err(DocumentError::NotAString { .. })
    ));
    assert!(matches!(
        EpcisDocument::from_json(&json!({"@context": {"bad": "https://x/ y"}, "type": "ObjectEvent"})),
        Err(DocumentError::Context(_))
    ));
}

#[test]
fn stale_identifier_version_is_reported() {
    let doc = EpcisDocument::from_json(&json!({
        "type": "ObjectEvent",
        "action": "ADD",
        "eventID": format!("ni:///sha-256;{}?ver=2.0", "0".repeat(64))
    }))
    .unwrap();
    assert!(matches!(
        verify_event_id(&doc.events[0], &doc.context),
        Err(EventIdError::HashId(HashIdError::Version(_)))
    ));
}

fn ext1_event(uri: &str) -> serde_json::Value {
    json!({
        "@context": {"ext1": uri},
        "type": "ObjectEvent",
        "action": "OBSERVE",
        "ext1:x": "1"
    })
}

#[test]
fn event_contexts_do_not_leak_into_siblings() {
    let version = CbvVersion::default();
    let alone = EpcisDocument::from_json(&epcis_document(json!([ext1_event(
        "https://a.example/"
    )])))
    .unwrap()
    .hash_events(&version)
    .unwrap();

    let both = EpcisDocument::from_json(&epcis_document(json!([
        ext1_event("https://a.example/"),
        ext1_event("https://b.example/")
    ])))
    .unwrap();
    let ids = both.hash_events(&version).unwrap();
    assert_eq!(ids[0], alone[0]);
    assert_ne!(ids[0], ids[1]);

    assert_eq!(both.context_for(0).resolve("ext1").unwrap(), "https://a.example/");
    assert_eq!(both.context_for(1).resolve("ext1").unwrap(), "https://b.example/");
    assert_eq!(
        both.context.resolve("ext1").unwrap(),
        "https://example.com/ext1/"
    );
}

#[test]
fn event_context_overrides_document_context() {
    let version = CbvVersion::default();
    let scoped = EpcisDocument::from_json(&epcis_document(json!([
        ext1_event("https://a.example/"),
        {"type": "ObjectEvent", "action": "OBSERVE", "ext1:x": "1"}
    ])))
    .unwrap();
    let ids = scoped.hash_events(&version).unwrap();

    let expanded = EpcisDocument::from_json(&json!({
        "type": "ObjectEvent",
        "action": "OBSERVE",
        "https://a.example/x": "1"
    }))
    .unwrap();
    assert_eq!(ids[0], expanded.hash_events(&version).unwrap()[0]);

    let inherited = EpcisDocument::from_json(&json!({
        "type": "ObjectEvent",
        "action": "OBSERVE",
        "https://example.com/ext1/x": "1"
    }))
    .unwrap();
    assert_eq!(ids[1], inherited.hash_events(&version).unwrap()[0]);
}

#[test]
fn assigned_ids_use_each_event_context() {
    let mut doc = EpcisDocument::from_json(&epcis_document(json!([
        ext1_event("https://a.example/"),
        ext1_event("https://b.example/")
    ])))
    .unwrap();
    let expected = doc.hash_events(&CbvVersion::default()).unwrap();
    doc.assign_event_ids(&CbvVersion::default()).unwrap();

    for (index, (event, context)) in doc.scoped_events().enumerate() {
        assert_eq!(event.event_id(), Some(expected[index].to_string().as_str()));
        assert!(verify_event_id(event, context).unwrap());
    }
    assert!(!verify_event_id(&doc.events[1], &doc.context).unwrap());
}

#[test]
fn absolute_and_prefixed_names_hash_alike() {
    let version = CbvVersion::default();
    let prefixed = EpcisDocument::from_json(&json!({
        "@context": {"ext1": "https://a.example/ns/"},
        "type": "ObjectEvent",
        "ext1:b/c": "v"
    }))
    .unwrap();
    let absolute = EpcisDocument::from_json(&json!({
        "type": "ObjectEvent",
        "https://a.example/ns/b/c": "v"
    }))
    .unwrap();
    assert_eq!(
        prefixed.hash_events(&version).unwrap(),
        absolute.hash_events(&version).unwrap()
    );

    let both = EpcisDocument::from_json(&json!({
        "@context": {"ext1": "https://a.example/ns/"},
        "type": "ObjectEvent",
        "ext1:b/c": "v",
        "https://a.example/ns/b/c": "v"
    }))
    .unwrap();
    assert!(matches!(
        both.hash_events(&version),
        Err(EventIdError::Canonicalization(_))
    ));

    let urn = EpcisDocument::from_json(&json!({
        "type": "ObjectEvent",
        "urn:example:foo": "v"
    }))
    .unwrap();
    assert!(urn.hash_events(&version).is_ok());
}

#[test]
fn language_tagged_strings_keep_their_tag() {
    let version = CbvVersion::default();
    let hash_of = |value: serde_json::Value| {
        EpcisDocument::from_json(&json!({
            "@context": {"ext1": "https://example.com/ext1/"},
            "type": "ObjectEvent",
            "ext1:label": value
        }))
        .unwrap()
        .hash_events(&version)
        .unwrap()
    };
    let english = hash_of(json!({"@value": "x", "@language": "en"}));
    let french = hash_of(json!({"@value": "x", "@language": "fr"}));
    let plain = hash_of(json!("x"));
    assert_ne!(english, french);
    assert_ne!(english, plain);
    assert_ne!(french, plain);
    assert_eq!(english, hash_of(json!({"@value": "x", "@language": "EN"})));

    assert!(matches!(
        EpcisDocument::from_json(&json!({
            "@context": {"ext1": "https://example.com/ext1/"},
            "type": "ObjectEvent",
            "ext1:label": {"@value": "x", "@type": "ext1:Custom"}
        })),
        Err(DocumentError::InvalidValueObject { .. })
    ));
}

#[test]
fn sensor_element_without_reports_matches_document() {
    let doc = EpcisDocument::from_json(&json!({
        "type": "ObjectEvent",
        "action": "OBSERVE",
        "sensorElementList": [{"sensorMetadata": {"time": "2024-01-01T09:59:00Z"}}]
    }))
    .unwrap();
    let built = EventBuilder::object_event()
        .action(Action::Observe)
        .add_sensor_element(
            SensorElement::new().metadata(SensorMetadata::new().time("2024-01-01T09:59:00Z")),
        )
        .build();

    let version = CbvVersion::default();
    assert_eq!(
        doc.hash_events(&version).unwrap(),
        vec![compute_event_id(&built, &doc.context, &version).unwrap()]
    );
}
