//! EPCIS JSON / JSON-LD document ingestion.
//!
//! Well-known leaves take their declared type from a fixed table; extension
//! leaves take it from the JSON shape, or from an XSD `@type` on JSON-LD
//! value objects. Nothing is coerced: a mismatch surfaces when the event is
//! canonicalized.

use epcis_canonical::{
    CbvVersion, FieldMap, FieldValue, HashIdentifier, NamespaceContext, NamespaceContextBuilder,
    NamespaceError, Scalar, ScalarType,
};
use serde_json::{Map, Value};

use crate::builder::EventBuilder;
use crate::event_id::{assign_event_id, compute_event_id, EventIdError};
use crate::events::{Event, EventType};

const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Errors raised while reading a document.
#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    /// Input is not JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Neither an EPCIS document, an event, nor a list of events.
    #[error("unrecognized document shape: {0}")]
    UnrecognizedShape(String),
    /// An event entry is not a JSON object.
    #[error("event {index} is not an object")]
    NotAnObject {
        /// Position in the event list.
        index: usize,
    },
    /// An event entry lacks a string `type`.
    #[error("event {index} has no type")]
    MissingType {
        /// Position in the event list.
        index: usize,
    },
    /// A member that must be a string is not.
    #[error("{path} must be a string")]
    NotAString {
        /// Offending member.
        path: String,
    },
    /// `null` has no canonical form.
    #[error("null value at {path}")]
    NullValue {
        /// Offending member.
        path: String,
    },
    /// `@value` object with a non-scalar value, an unknown datatype, or
    /// an unusable language tag.
    #[error("invalid value object at {path}")]
    InvalidValueObject {
        /// Offending member.
        path: String,
    },
    /// `@context` could not be applied.
    #[error("invalid context: {0}")]
    Context(#[from] NamespaceError),
}

/// Events of one document together with the contexts they resolve against.
#[derive(Debug, Clone)]
pub struct EpcisDocument {
    /// Namespace context built from the base bindings and the document's
    /// own `@context`.
    pub context: NamespaceContext,
    /// Events in document order.
    pub events: Vec<Event>,
    /// Context of each event that carries its own `@context`.
    event_contexts: Vec<Option<NamespaceContext>>,
}

impl EpcisDocument {
    /// Parses document text against the built-in namespace table.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    /// Reads a document against the built-in namespace table.
    pub fn from_json(value: &Value) -> Result<Self, DocumentError> {
        Self::from_json_with(value, NamespaceContextBuilder::new())
    }

    /// Reads a document, applying its `@context` on top of `base`.
    ///
    /// Accepts an EPCIS document (`epcisBody.eventList`), a query document
    /// (`epcisBody.queryResults.resultsBody.eventList`), a single event, or
    /// a JSON array of events. An event's own `@context` applies to that
    /// event only, on top of the document context.
    pub fn from_json_with(
        value: &Value,
        mut base: NamespaceContextBuilder,
    ) -> Result<Self, DocumentError> {
        // A lone event's `@context` is the document context.
        let (entries, scoped): (&[Value], bool) = match value {
            Value::Array(items) => (items.as_slice(), true),
            Value::Object(map) if map.contains_key("epcisBody") || map.contains_key("type") => {
                if let Some(context) = map.get("@context") {
                    base.json_ld(context)?;
                }
                if map.contains_key("epcisBody") {
                    (event_list(map)?, true)
                } else {
                    (std::slice::from_ref(value), false)
                }
            }
            other => return Err(DocumentError::UnrecognizedShape(shape_of(other))),
        };

        let mut events = Vec::with_capacity(entries.len());
        let mut event_contexts = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let own = match entry.get("@context") {
                Some(context) if scoped => {
                    let mut local = base.clone();
                    local.json_ld(context)?;
                    Some(local.build())
                }
                _ => None,
            };
            event_contexts.push(own);
            events.push(event_from_json(entry, index)?);
        }
        tracing::debug!(
            events = events.len(),
            scoped = event_contexts.iter().flatten().count(),
            "read EPCIS document"
        );

        Ok(Self {
            context: base.build(),
            events,
            event_contexts,
        })
    }

    /// Context the event at `index` resolves against.
    pub fn context_for(&self, index: usize) -> &NamespaceContext {
        self.event_contexts
            .get(index)
            .and_then(Option::as_ref)
            .unwrap_or(&self.context)
    }

    /// Iterates events together with their contexts, in order.
    pub fn scoped_events(&self) -> impl Iterator<Item = (&Event, &NamespaceContext)> {
        self.events
            .iter()
            .enumerate()
            .map(|(index, event)| (event, self.context_for(index)))
    }

    /// Computes the identifier of every event, in order.
    pub fn hash_events(
        &self,
        cbv_version: &CbvVersion,
    ) -> Result<Vec<HashIdentifier>, EventIdError> {
        self.scoped_events()
            .map(|(event, context)| compute_event_id(event, context, cbv_version))
            .collect()
    }

    /// Computes and writes back the identifier of every event.
    pub fn assign_event_ids(&mut self, cbv_version: &CbvVersion) -> Result<(), EventIdError> {
        for (index, event) in self.events.iter_mut().enumerate() {
            let context = self
                .event_contexts
                .get(index)
                .and_then(Option::as_ref)
                .unwrap_or(&self.context);
            assign_event_id(event, context, cbv_version)?;
        }
        Ok(())
    }
}

fn event_list(doc: &Map<String, Value>) -> Result<&[Value], DocumentError> {
    let body = &doc["epcisBody"];
    let list = body
        .get("eventList")
        .or_else(|| body.pointer("/queryResults/resultsBody/eventList"));
    match list {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(DocumentError::UnrecognizedShape(format!(
            "eventList is {}",
            shape_of(other)
        ))),
        None => Err(DocumentError::UnrecognizedShape(
            "epcisBody has no eventList".to_string(),
        )),
    }
}

fn shape_of(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without type or epcisBody",
    }
    .to_string()
}

/// Converts one JSON event object into an [`Event`].
pub fn event_from_json(value: &Value, index: usize) -> Result<Event, DocumentError> {
    let map = value
        .as_object()
        .ok_or(DocumentError::NotAnObject { index })?;
    let event_type = map
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DocumentError::MissingType { index })?;

    let mut builder = EventBuilder::new(EventType::from(event_type));
    for (key, member) in map {
        let path = format!("eventList[{}].{}", index, key);
        match key.as_str() {
            "type" | "@context" => {}
            "eventID" => builder = builder.event_id(expect_str(member, &path)?),
            "recordTime" => builder = builder.record_time(expect_str(member, &path)?),
            _ => {
                let field = convert(key, member, is_bare(key), &path)?;
                builder = builder.field(key.as_str(), field);
            }
        }
    }
    Ok(builder.build())
}

fn expect_str<'v>(value: &'v Value, path: &str) -> Result<&'v str, DocumentError> {
    value.as_str().ok_or_else(|| DocumentError::NotAString {
        path: path.to_string(),
    })
}

fn is_bare(key: &str) -> bool {
    !key.contains(':')
}

/// Converts a JSON member; `well_known` selects table typing over inference.
fn convert(
    name: &str,
    value: &Value,
    well_known: bool,
    path: &str,
) -> Result<FieldValue, DocumentError> {
    match value {
        Value::Null => Err(DocumentError::NullValue {
            path: path.to_string(),
        }),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| convert(name, item, well_known, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::Array),
        Value::Object(map) => {
            if map.contains_key("@value") {
                return value_object(map, path);
            }
            if let (1, Some(Value::String(id))) = (map.len(), map.get("@id")) {
                return Ok(FieldValue::uri(id.as_str()));
            }
            let mut members = FieldMap::new();
            for (key, child) in map {
                let child_path = format!("{}.{}", path, key);
                let child_known = well_known && is_bare(key);
                members.insert(key.as_str(), convert(key, child, child_known, &child_path)?);
            }
            Ok(FieldValue::Object(members))
        }
        scalar => {
            let ty = if well_known {
                well_known_type(name)
            } else {
                inferred_type(scalar)
            };
            Ok(FieldValue::Scalar(Scalar::new(ty, scalar.clone())))
        }
    }
}

/// JSON-LD value object. A typed value needs an XSD datatype; a
/// language-tagged string keeps its tag as a sibling of the text.
fn value_object(map: &Map<String, Value>, path: &str) -> Result<FieldValue, DocumentError> {
    let invalid = || DocumentError::InvalidValueObject {
        path: path.to_string(),
    };
    if map
        .keys()
        .any(|key| !matches!(key.as_str(), "@value" | "@type" | "@language"))
    {
        return Err(invalid());
    }
    let raw = &map["@value"];
    if raw.is_null() || raw.is_array() || raw.is_object() {
        return Err(invalid());
    }

    match (map.get("@type"), map.get("@language")) {
        (Some(_), Some(_)) => Err(invalid()),
        (Some(datatype), None) => {
            let ty = datatype.as_str().and_then(xsd_type).ok_or_else(invalid)?;
            Ok(FieldValue::Scalar(Scalar::new(ty, raw.clone())))
        }
        (None, Some(language)) => {
            let (Some(text), Some(tag)) = (raw.as_str(), language.as_str()) else {
                return Err(invalid());
            };
            if tag.is_empty() {
                return Err(invalid());
            }
            Ok(FieldValue::object([
                ("@value", FieldValue::string(text)),
                ("@language", FieldValue::string(tag.to_ascii_lowercase())),
            ]))
        }
        (None, None) => Ok(FieldValue::Scalar(Scalar::new(inferred_type(raw), raw.clone()))),
    }
}

fn xsd_type(datatype: &str) -> Option<ScalarType> {
    let local = datatype
        .strip_prefix("xsd:")
        .or_else(|| datatype.strip_prefix(XSD_NS))?;
    let ty = match local {
        "dateTime" | "dateTimeStamp" => ScalarType::Timestamp,
        "hexBinary" => ScalarType::HexBinary,
        "anyURI" => ScalarType::Uri,
        "boolean" => ScalarType::Boolean,
        "decimal" | "integer" | "double" | "float" | "int" | "long" | "short" | "byte"
        | "nonNegativeInteger" | "positiveInteger" | "negativeInteger"
        | "nonPositiveInteger" | "unsignedLong" | "unsignedInt" | "unsignedShort"
        | "unsignedByte" => ScalarType::Number,
        "string" => ScalarType::String,
        _ => return None,
    };
    Some(ty)
}

fn inferred_type(value: &Value) -> ScalarType {
    match value {
        Value::Bool(_) => ScalarType::Boolean,
        Value::Number(_) => ScalarType::Number,
        _ => ScalarType::String,
    }
}

/// Declared type of a well-known EPCIS leaf, by member name.
fn well_known_type(name: &str) -> ScalarType {
    match name {
        "eventTime" | "declarationTime" | "time" | "startTime" | "endTime" => {
            ScalarType::Timestamp
        }
        "quantity" | "value" | "minValue" | "maxValue" | "meanValue" | "sDev" | "percRank"
        | "percValue" => ScalarType::Number,
        "booleanValue" => ScalarType::Boolean,
        "hexBinaryValue" => ScalarType::HexBinary,
        "epcList" | "childEPCs" | "inputEPCList" | "outputEPCList" | "parentID" | "id"
        | "epcClass" | "bizTransaction" | "source" | "destination" | "deviceID"
        | "deviceMetadata" | "rawData" | "dataProcessingMethod" | "bizRules" | "uriValue"
        | "chemicalSubstance" | "microorganism" | "coordinateReferenceSystem"
        | "certificationInfo" | "correctiveEventIDs" | "transformationID" => ScalarType::Uri,
        _ => ScalarType::String,
    }
}
