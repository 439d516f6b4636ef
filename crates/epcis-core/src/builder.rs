use epcis_canonical::{FieldMap, FieldValue, TimeZoneOffset};

use crate::events::{Action, Event, EventType};
use crate::shared::{
    BizLocation, BizTransaction, ErrorDeclaration, PersistentDisposition, QuantityElement,
    ReadPoint, SensorElement, SourceDest,
};

/// Fluent builder for [`Event`] values.
///
/// Setters take and return the builder by value. Values are stored with
/// their declared type and checked when the event is canonicalized.
///
/// ```rust
/// use epcis_core::{Action, EventBuilder, ReadPoint};
///
/// let event = EventBuilder::object_event()
///     .event_time("2024-01-01T00:00:00.000Z")
///     .epc_list(["urn:epc:id:sgtin:0614141.107346.2017"])
///     .action(Action::Observe)
///     .biz_step("shipping")
///     .read_point(ReadPoint::new("urn:epc:id:sgln:0614141.07346.1234"))
///     .build();
/// assert!(event.field("bizStep").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    /// Starts an event of the given type.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event: Event {
                event_type,
                event_id: None,
                record_time: None,
                fields: FieldMap::new(),
            },
        }
    }

    /// Starts an `ObjectEvent`.
    pub fn object_event() -> Self {
        Self::new(EventType::ObjectEvent)
    }

    /// Starts an `AggregationEvent`.
    pub fn aggregation_event() -> Self {
        Self::new(EventType::AggregationEvent)
    }

    /// Starts a `TransactionEvent`.
    pub fn transaction_event() -> Self {
        Self::new(EventType::TransactionEvent)
    }

    /// Starts a `TransformationEvent`.
    pub fn transformation_event() -> Self {
        Self::new(EventType::TransformationEvent)
    }

    /// Starts an `AssociationEvent`.
    pub fn association_event() -> Self {
        Self::new(EventType::AssociationEvent)
    }

    /// Starts an event of a vendor-defined type.
    pub fn extended_event(name: impl Into<String>) -> Self {
        Self::new(EventType::Extended(name.into()))
    }

    /// Sets any field by qualified name: well-known (`bizStep`) or
    /// extension (`ext1:temperature`).
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.event.fields.insert(name, value);
        self
    }

    fn append(mut self, list: &str, item: FieldValue) -> Self {
        match self.event.fields.get_mut(list) {
            Some(FieldValue::Array(items)) => items.push(item),
            _ => {
                self.event.fields.insert(list, FieldValue::Array(vec![item]));
            }
        }
        self
    }

    fn uri_list<I, S>(self, list: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = values.into_iter().map(FieldValue::uri);
        self.field(list, FieldValue::array(items))
    }

    fn object_list<I, T>(self, list: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FieldValue>,
    {
        self.field(list, FieldValue::array(values))
    }

    /// Identity field; normally written by `assign_event_id`.
    pub fn event_id(mut self, id: impl Into<String>) -> Self {
        self.event.event_id = Some(id.into());
        self
    }

    /// Repository capture time. Not hashed.
    pub fn record_time(mut self, time: impl Into<String>) -> Self {
        self.event.record_time = Some(time.into());
        self
    }

    /// When the event took place.
    pub fn event_time(self, time: impl Into<String>) -> Self {
        self.field("eventTime", FieldValue::timestamp(time))
    }

    /// Local offset at the event location.
    pub fn event_time_zone_offset(self, offset: &TimeZoneOffset) -> Self {
        self.field("eventTimeZoneOffset", FieldValue::string(offset.to_string()))
    }

    /// Certification reference.
    pub fn certification_info(self, uri: impl Into<String>) -> Self {
        self.field("certificationInfo", FieldValue::uri(uri))
    }

    /// Marks the event as erroneous.
    pub fn error_declaration(self, declaration: ErrorDeclaration) -> Self {
        self.field("errorDeclaration", declaration)
    }

    /// Instance-level identifiers.
    pub fn epc_list<I, S>(self, epcs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uri_list("epcList", epcs)
    }

    /// Appends one identifier to `epcList`.
    pub fn add_epc(self, epc: impl Into<String>) -> Self {
        self.append("epcList", FieldValue::uri(epc))
    }

    /// Children of an aggregation or association.
    pub fn child_epcs<I, S>(self, epcs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uri_list("childEPCs", epcs)
    }

    /// Transformation inputs.
    pub fn input_epc_list<I, S>(self, epcs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uri_list("inputEPCList", epcs)
    }

    /// Transformation outputs.
    pub fn output_epc_list<I, S>(self, epcs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uri_list("outputEPCList", epcs)
    }

    /// Parent container or asset.
    pub fn parent_id(self, id: impl Into<String>) -> Self {
        self.field("parentID", FieldValue::uri(id))
    }

    /// Transformation identifier.
    pub fn transformation_id(self, id: impl Into<String>) -> Self {
        self.field("transformationID", FieldValue::uri(id))
    }

    /// Event action.
    pub fn action(self, action: Action) -> Self {
        self.field("action", FieldValue::string(action.as_str()))
    }

    /// Business step, passed through unchanged.
    pub fn biz_step(self, step: impl Into<String>) -> Self {
        self.field("bizStep", FieldValue::string(step))
    }

    /// Disposition, passed through unchanged.
    pub fn disposition(self, disposition: impl Into<String>) -> Self {
        self.field("disposition", FieldValue::string(disposition))
    }

    /// Persistent disposition changes.
    pub fn persistent_disposition(self, pd: PersistentDisposition) -> Self {
        self.field("persistentDisposition", pd)
    }

    /// Read point.
    pub fn read_point(self, read_point: ReadPoint) -> Self {
        self.field("readPoint", read_point)
    }

    /// Business location.
    pub fn biz_location(self, location: BizLocation) -> Self {
        self.field("bizLocation", location)
    }

    /// Business transactions.
    pub fn biz_transaction_list<I>(self, txs: I) -> Self
    where
        I: IntoIterator<Item = BizTransaction>,
    {
        self.object_list("bizTransactionList", txs)
    }

    /// Appends one business transaction.
    pub fn add_biz_transaction(self, tx: BizTransaction) -> Self {
        self.append("bizTransactionList", tx.into())
    }

    /// Class-level quantities.
    pub fn quantity_list<I>(self, quantities: I) -> Self
    where
        I: IntoIterator<Item = QuantityElement>,
    {
        self.object_list("quantityList", quantities)
    }

    /// Appends one quantity element.
    pub fn add_quantity(self, quantity: QuantityElement) -> Self {
        self.append("quantityList", quantity.into())
    }

    /// Child quantities of an aggregation or association.
    pub fn child_quantity_list<I>(self, quantities: I) -> Self
    where
        I: IntoIterator<Item = QuantityElement>,
    {
        self.object_list("childQuantityList", quantities)
    }

    /// Transformation input quantities.
    pub fn input_quantity_list<I>(self, quantities: I) -> Self
    where
        I: IntoIterator<Item = QuantityElement>,
    {
        self.object_list("inputQuantityList", quantities)
    }

    /// Transformation output quantities.
    pub fn output_quantity_list<I>(self, quantities: I) -> Self
    where
        I: IntoIterator<Item = QuantityElement>,
    {
        self.object_list("outputQuantityList", quantities)
    }

    /// Sources.
    pub fn source_list<I>(self, sources: I) -> Self
    where
        I: IntoIterator<Item = SourceDest>,
    {
        let items = sources.into_iter().map(|s| s.into_field_value("source"));
        self.object_list("sourceList", items)
    }

    /// Destinations.
    pub fn destination_list<I>(self, destinations: I) -> Self
    where
        I: IntoIterator<Item = SourceDest>,
    {
        let items = destinations
            .into_iter()
            .map(|d| d.into_field_value("destination"));
        self.object_list("destinationList", items)
    }

    /// Sensor elements.
    pub fn sensor_element_list<I>(self, elements: I) -> Self
    where
        I: IntoIterator<Item = SensorElement>,
    {
        self.object_list("sensorElementList", elements)
    }

    /// Appends one sensor element.
    pub fn add_sensor_element(self, element: SensorElement) -> Self {
        self.append("sensorElementList", element.into())
    }

    /// Instance/lot master data.
    pub fn ilmd(self, ilmd: FieldMap) -> Self {
        self.field("ilmd", ilmd)
    }

    /// Finishes the event.
    pub fn build(self) -> Event {
        self.event
    }
}
