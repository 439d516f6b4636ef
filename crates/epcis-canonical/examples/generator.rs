use epcis_canonical::{
    generate, CanonicalInput, Canonicalizer, CbvVersion, FieldValue, NamespaceContext,
};

fn main() {
    let context = NamespaceContext::with_overrides([("ext1", "https://example.com/ext1/")])
        .expect("valid context");
    let epcs = FieldValue::array([
        FieldValue::uri("urn:epc:id:sgtin:0614141.107346.2017"),
        FieldValue::uri("urn:epc:id:sgtin:0614141.107346.2018"),
    ]);
    let action = FieldValue::string("OBSERVE");
    let temperature = FieldValue::object([("ext1:celsius", FieldValue::number(21.5))]);
    let input = CanonicalInput {
        event_type: "ObjectEvent",
        well_known: vec![("epcList", &epcs), ("action", &action)],
        extensions: vec![("ext1:temperature", &temperature)],
    };

    let stream = match Canonicalizer::new(&context).canonicalize(&input) {
        Ok(stream) => stream,
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    };
    for token in &stream.tokens {
        println!("{:?}", token);
    }
    match generate(&stream, &CbvVersion::default()) {
        Ok(id) => println!("{}", id),
        Err(err) => {
            eprintln!("hashing failed: {}", err);
            std::process::exit(1);
        }
    }
}
