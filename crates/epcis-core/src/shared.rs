use epcis_canonical::{FieldMap, FieldValue};
use serde_json::Value;

macro_rules! location {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            /// Location identifier (e.g. an SGLN URI).
            pub id: String,
            /// Vendor extension members.
            pub extensions: FieldMap,
        }

        impl $name {
            /// Location with the given identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self {
                    id: id.into(),
                    extensions: FieldMap::new(),
                }
            }

            /// Adds an extension member.
            pub fn with_extension(
                mut self,
                name: impl Into<String>,
                value: impl Into<FieldValue>,
            ) -> Self {
                self.extensions.insert(name, value);
                self
            }
        }

        impl From<$name> for FieldValue {
            fn from(location: $name) -> Self {
                let mut map = FieldMap::new();
                map.insert("id", FieldValue::uri(location.id));
                map.extend(location.extensions.iter().map(|(k, v)| (k, v.clone())));
                FieldValue::Object(map)
            }
        }
    };
}

location!(ReadPoint, "Where an event was observed.");
location!(BizLocation, "Where objects are expected to be after the event.");

/// Class-level quantity of objects.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityElement {
    /// EPC class URI.
    pub epc_class: String,
    /// Amount; kept raw so the encoder validates it.
    pub quantity: Option<Value>,
    /// Unit of measure code.
    pub uom: Option<String>,
}

impl QuantityElement {
    /// Quantity element for an EPC class.
    pub fn new(epc_class: impl Into<String>) -> Self {
        Self {
            epc_class: epc_class.into(),
            quantity: None,
            uom: None,
        }
    }

    /// Sets the amount.
    pub fn quantity(mut self, quantity: impl Into<Value>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Sets the unit of measure.
    pub fn uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }
}

impl From<QuantityElement> for FieldValue {
    fn from(element: QuantityElement) -> Self {
        let mut map = FieldMap::new();
        map.insert("epcClass", FieldValue::uri(element.epc_class));
        if let Some(quantity) = element.quantity {
            map.insert("quantity", FieldValue::number(quantity));
        }
        if let Some(uom) = element.uom {
            map.insert("uom", FieldValue::string(uom));
        }
        FieldValue::Object(map)
    }
}

/// Business transaction reference.
#[derive(Debug, Clone, PartialEq)]
pub struct BizTransaction {
    /// Transaction type (e.g. `po`).
    pub kind: Option<String>,
    /// Transaction identifier.
    pub id: String,
}

impl BizTransaction {
    /// Untyped transaction reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: None,
            id: id.into(),
        }
    }

    /// Sets the transaction type.
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

impl From<BizTransaction> for FieldValue {
    fn from(tx: BizTransaction) -> Self {
        let mut map = FieldMap::new();
        if let Some(kind) = tx.kind {
            map.insert("type", FieldValue::string(kind));
        }
        map.insert("bizTransaction", FieldValue::uri(tx.id));
        FieldValue::Object(map)
    }
}

/// Source or destination party/location. The member name (`source` or
/// `destination`) comes from the list it is placed in.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDest {
    /// Type (e.g. `owning_party`, `location`).
    pub kind: String,
    /// Party or location identifier.
    pub id: String,
}

impl SourceDest {
    /// Creates an entry.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub(crate) fn into_field_value(self, role: &str) -> FieldValue {
        let mut map = FieldMap::new();
        map.insert("type", FieldValue::string(self.kind));
        map.insert(role, FieldValue::uri(self.id));
        FieldValue::Object(map)
    }
}

/// Dispositions set or unset persistently by an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistentDisposition {
    /// Dispositions set; `None` when absent.
    pub set: Option<Vec<String>>,
    /// Dispositions unset; `None` when absent.
    pub unset: Option<Vec<String>>,
}

impl PersistentDisposition {
    /// Empty disposition change.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `set` list.
    pub fn set<I, S>(mut self, dispositions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set = Some(dispositions.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the `unset` list.
    pub fn unset<I, S>(mut self, dispositions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unset = Some(dispositions.into_iter().map(Into::into).collect());
        self
    }
}

impl From<PersistentDisposition> for FieldValue {
    fn from(pd: PersistentDisposition) -> Self {
        let mut map = FieldMap::new();
        if let Some(set) = pd.set {
            map.insert("set", FieldValue::array(set.into_iter().map(FieldValue::string)));
        }
        if let Some(unset) = pd.unset {
            map.insert(
                "unset",
                FieldValue::array(unset.into_iter().map(FieldValue::string)),
            );
        }
        FieldValue::Object(map)
    }
}

macro_rules! setters {
    ($($(#[$doc:meta])* $method:ident => $key:literal: $ctor:ident($arg:ty);)*) => {
        $(
            $(#[$doc])*
            pub fn $method(mut self, value: $arg) -> Self {
                self.fields.insert($key, FieldValue::$ctor(value));
                self
            }
        )*

        /// Adds an extension member.
        pub fn extension(
            mut self,
            name: impl Into<String>,
            value: impl Into<FieldValue>,
        ) -> Self {
            self.fields.insert(name, value);
            self
        }
    };
}

/// Sensor device metadata shared by the reports of one sensor element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorMetadata {
    fields: FieldMap,
}

impl SensorMetadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    setters! {
        /// Measurement time.
        time => "time": timestamp(impl Into<String>);
        /// Interval start.
        start_time => "startTime": timestamp(impl Into<String>);
        /// Interval end.
        end_time => "endTime": timestamp(impl Into<String>);
        /// Device identifier.
        device_id => "deviceID": uri(impl Into<String>);
        /// Device metadata URI.
        device_metadata => "deviceMetadata": uri(impl Into<String>);
        /// Raw data URI.
        raw_data => "rawData": uri(impl Into<String>);
        /// Processing method URI.
        data_processing_method => "dataProcessingMethod": uri(impl Into<String>);
        /// Business rules URI.
        biz_rules => "bizRules": uri(impl Into<String>);
    }
}

impl From<SensorMetadata> for FieldValue {
    fn from(metadata: SensorMetadata) -> Self {
        FieldValue::Object(metadata.fields)
    }
}

/// A single sensor reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReport {
    fields: FieldMap,
}

impl SensorReport {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    setters! {
        /// Measurement type (e.g. `gs1:Temperature`).
        kind => "type": string(impl Into<String>);
        /// Measured value.
        value => "value": number(impl Into<Value>);
        /// Minimum value.
        min_value => "minValue": number(impl Into<Value>);
        /// Maximum value.
        max_value => "maxValue": number(impl Into<Value>);
        /// Mean value.
        mean_value => "meanValue": number(impl Into<Value>);
        /// Standard deviation.
        s_dev => "sDev": number(impl Into<Value>);
        /// Percentile rank.
        perc_rank => "percRank": number(impl Into<Value>);
        /// Percentile value.
        perc_value => "percValue": number(impl Into<Value>);
        /// Unit of measure code.
        uom => "uom": string(impl Into<String>);
        /// Measurement time.
        time => "time": timestamp(impl Into<String>);
        /// Boolean reading.
        boolean_value => "booleanValue": boolean(bool);
        /// Binary reading, hex encoded.
        hex_binary_value => "hexBinaryValue": hex_binary(impl Into<String>);
        /// Text reading.
        string_value => "stringValue": string(impl Into<String>);
        /// URI reading.
        uri_value => "uriValue": uri(impl Into<String>);
        /// Device identifier.
        device_id => "deviceID": uri(impl Into<String>);
        /// Raw data URI.
        raw_data => "rawData": uri(impl Into<String>);
        /// Measured component.
        component => "component": string(impl Into<String>);
        /// Chemical substance URI.
        chemical_substance => "chemicalSubstance": uri(impl Into<String>);
        /// Microorganism URI.
        microorganism => "microorganism": uri(impl Into<String>);
        /// Coordinate reference system URI.
        coordinate_reference_system => "coordinateReferenceSystem": uri(impl Into<String>);
        /// Exception code.
        exception => "exception": string(impl Into<String>);
    }
}

impl From<SensorReport> for FieldValue {
    fn from(report: SensorReport) -> Self {
        FieldValue::Object(report.fields)
    }
}

/// Sensor metadata plus its readings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorElement {
    /// Device metadata.
    pub metadata: Option<SensorMetadata>,
    /// Readings, in order.
    pub reports: Vec<SensorReport>,
    /// Vendor extension members.
    pub extensions: FieldMap,
}

impl SensorElement {
    /// Element without readings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the metadata.
    pub fn metadata(mut self, metadata: SensorMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Appends a reading.
    pub fn report(mut self, report: SensorReport) -> Self {
        self.reports.push(report);
        self
    }

    /// Adds an extension member.
    pub fn with_extension(
        mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.extensions.insert(name, value);
        self
    }
}

impl From<SensorElement> for FieldValue {
    fn from(element: SensorElement) -> Self {
        let mut map = FieldMap::new();
        if let Some(metadata) = element.metadata {
            map.insert("sensorMetadata", metadata);
        }
        if !element.reports.is_empty() {
            map.insert("sensorReport", FieldValue::array(element.reports));
        }
        map.extend(element.extensions.iter().map(|(k, v)| (k, v.clone())));
        FieldValue::Object(map)
    }
}

/// Retraction or correction of an earlier event.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDeclaration {
    fields: FieldMap,
}

impl ErrorDeclaration {
    /// Declaration made at `declaration_time`.
    pub fn new(declaration_time: impl Into<String>) -> Self {
        let mut fields = FieldMap::new();
        fields.insert("declarationTime", FieldValue::timestamp(declaration_time));
        Self { fields }
    }

    /// Identifiers of the events that correct the erroneous one.
    pub fn corrective_event_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = ids.into_iter().map(FieldValue::uri);
        self.fields.insert("correctiveEventIDs", FieldValue::array(ids));
        self
    }

    setters! {
        /// Reason code.
        reason => "reason": string(impl Into<String>);
    }
}

impl From<ErrorDeclaration> for FieldValue {
    fn from(declaration: ErrorDeclaration) -> Self {
        FieldValue::Object(declaration.fields)
    }
}
