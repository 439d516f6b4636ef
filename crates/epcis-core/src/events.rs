use epcis_canonical::{CanonicalInput, FieldMap, FieldValue, HashIdentifier};
use serde::{Deserialize, Serialize};
use std::fmt;

const OBJECT_EVENT_FIELDS: &[&str] = &[
    "eventTime",
    "eventTimeZoneOffset",
    "certificationInfo",
    "errorDeclaration",
    "epcList",
    "action",
    "bizStep",
    "disposition",
    "persistentDisposition",
    "readPoint",
    "bizLocation",
    "bizTransactionList",
    "quantityList",
    "sourceList",
    "destinationList",
    "sensorElementList",
    "ilmd",
];

const AGGREGATION_EVENT_FIELDS: &[&str] = &[
    "eventTime",
    "eventTimeZoneOffset",
    "certificationInfo",
    "errorDeclaration",
    "parentID",
    "childEPCs",
    "action",
    "bizStep",
    "disposition",
    "persistentDisposition",
    "readPoint",
    "bizLocation",
    "bizTransactionList",
    "childQuantityList",
    "sourceList",
    "destinationList",
    "sensorElementList",
];

const TRANSACTION_EVENT_FIELDS: &[&str] = &[
    "eventTime",
    "eventTimeZoneOffset",
    "certificationInfo",
    "errorDeclaration",
    "bizTransactionList",
    "parentID",
    "epcList",
    "action",
    "bizStep",
    "disposition",
    "persistentDisposition",
    "readPoint",
    "bizLocation",
    "quantityList",
    "sourceList",
    "destinationList",
    "sensorElementList",
];

const TRANSFORMATION_EVENT_FIELDS: &[&str] = &[
    "eventTime",
    "eventTimeZoneOffset",
    "certificationInfo",
    "errorDeclaration",
    "inputEPCList",
    "inputQuantityList",
    "outputEPCList",
    "outputQuantityList",
    "transformationID",
    "bizStep",
    "disposition",
    "persistentDisposition",
    "readPoint",
    "bizLocation",
    "bizTransactionList",
    "sourceList",
    "destinationList",
    "sensorElementList",
    "ilmd",
];

const ASSOCIATION_EVENT_FIELDS: &[&str] = &[
    "eventTime",
    "eventTimeZoneOffset",
    "certificationInfo",
    "errorDeclaration",
    "parentID",
    "childEPCs",
    "childQuantityList",
    "action",
    "bizStep",
    "disposition",
    "persistentDisposition",
    "readPoint",
    "bizLocation",
    "bizTransactionList",
    "sourceList",
    "destinationList",
    "sensorElementList",
];

const EXTENDED_EVENT_FIELDS: &[&str] = &[
    "eventTime",
    "eventTimeZoneOffset",
    "certificationInfo",
    "errorDeclaration",
];

/// EPCIS event type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// Observation of objects.
    ObjectEvent,
    /// Packing / unpacking of children into a parent.
    AggregationEvent,
    /// Association of objects with business transactions.
    TransactionEvent,
    /// Inputs consumed to produce outputs.
    TransformationEvent,
    /// Assembly of components into a parent asset.
    AssociationEvent,
    /// Any other (vendor or future) event type.
    Extended(String),
}

impl EventType {
    /// Type name as written in documents.
    pub fn as_str(&self) -> &str {
        match self {
            EventType::ObjectEvent => "ObjectEvent",
            EventType::AggregationEvent => "AggregationEvent",
            EventType::TransactionEvent => "TransactionEvent",
            EventType::TransformationEvent => "TransformationEvent",
            EventType::AssociationEvent => "AssociationEvent",
            EventType::Extended(name) => name,
        }
    }

    /// Well-known fields in declaration order.
    pub fn well_known_fields(&self) -> &'static [&'static str] {
        match self {
            EventType::ObjectEvent => OBJECT_EVENT_FIELDS,
            EventType::AggregationEvent => AGGREGATION_EVENT_FIELDS,
            EventType::TransactionEvent => TRANSACTION_EVENT_FIELDS,
            EventType::TransformationEvent => TRANSFORMATION_EVENT_FIELDS,
            EventType::AssociationEvent => ASSOCIATION_EVENT_FIELDS,
            EventType::Extended(_) => EXTENDED_EVENT_FIELDS,
        }
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        match name {
            "ObjectEvent" => EventType::ObjectEvent,
            "AggregationEvent" => EventType::AggregationEvent,
            "TransactionEvent" => EventType::TransactionEvent,
            "TransformationEvent" => EventType::TransformationEvent,
            "AssociationEvent" => EventType::AssociationEvent,
            other => EventType::Extended(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        EventType::from(name.as_str())
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        event_type.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Objects added / created.
    Add,
    /// Objects observed.
    Observe,
    /// Objects removed / decommissioned.
    Delete,
}

impl Action {
    /// Action as written in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Add => "ADD",
            Action::Observe => "OBSERVE",
            Action::Delete => "DELETE",
        }
    }
}

/// A populated EPCIS event.
///
/// Fields are held as a single map keyed by name as written; the event type
/// decides which of them are well-known. `eventID` and `recordTime` are kept
/// apart and never hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub(crate) event_type: EventType,
    pub(crate) event_id: Option<String>,
    pub(crate) record_time: Option<String>,
    pub(crate) fields: FieldMap,
}

impl Event {
    /// Event type.
    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    /// Identity field, if set.
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    /// Writes a computed identifier onto the identity field.
    ///
    /// Identifiers are not recomputed when the event changes afterwards.
    pub fn set_event_id(&mut self, id: &HashIdentifier) {
        self.event_id = Some(id.to_string());
    }

    /// Capture time assigned by a repository, if any.
    pub fn record_time(&self) -> Option<&str> {
        self.record_time.as_deref()
    }

    /// Looks up a field by name as written.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// All fields, well-known and extension.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Splits the fields into declaration-ordered well-known fields and extensions.
    pub fn canonical_input(&self) -> CanonicalInput<'_> {
        let declared = self.event_type.well_known_fields();
        let well_known = declared
            .iter()
            .filter_map(|name| self.fields.get(name).map(|value| (*name, value)))
            .collect();
        let extensions = self
            .fields
            .iter()
            .filter(|(key, _)| !declared.iter().any(|name| name == key))
            .collect();
        CanonicalInput {
            event_type: self.event_type.as_str(),
            well_known,
            extensions,
        }
    }
}
