//! Order and line item records as supplied by the systems of record
use super::error::SnapshotError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    /// Panics on an out of range date, only meant for fixtures.
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }
    /// Parses ISO-8601 / RFC 3339 text with any offset, normalised to UTC
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| SnapshotError::InvalidTimestamp(text.to_string(), e))
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

// chrono's Utc marker isn't ordered, so a derive would never apply
impl PartialOrd for TimeStamp<Utc> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeStamp<Utc> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl Serialize for TimeStamp<Utc> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TimeStamp<Utc> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        DateTime::<Utc>::deserialize(deserializer).map(TimeStamp)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

/// Reads a json `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Descriptive line item fields the resolver doesn't interpret. They are
/// carried through to the output untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extras(serde_json::Map<String, serde_json::Value>);

impl Extras {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
    pub fn insert(&mut self, key: String, value: serde_json::Value) {
        self.0.insert(key, value);
    }
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.0.remove(key)
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// stored as json text, cbor has no schema for arbitrary json values
impl<C> minicbor::Encode<C> for Extras {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let text = serde_json::to_string(&self.0)
            .map_err(|_| minicbor::encode::Error::message("failed to encode line item extras"))?;
        e.str(&text)?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for Extras {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let text = d.str()?;

        serde_json::from_str(text)
            .map(Extras)
            .map_err(|_| minicbor::decode::Error::message("failed to decode line item extras"))
    }
}

/// The secondary identity of a purchased unit: only one collector can hold
/// a given edition of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditionKey {
    pub product_id: String,
    pub edition_number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, minicbor::Encode, minicbor::Decode)]
pub struct LineItem {
    #[n(0)]
    pub line_item_id: String, // primary identity within its source system
    #[n(1)]
    #[serde(default)]
    pub product_id: Option<String>,
    #[n(2)]
    #[serde(default)]
    pub edition_number: Option<i64>,
    #[n(3)]
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[n(4)]
    #[serde(default)]
    pub restocked: Option<bool>,
    #[n(5)]
    #[serde(default)]
    pub refund_status: Option<String>,
    #[n(6)]
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[n(7)]
    #[serde(flatten)]
    pub extra: Extras,
}

impl LineItem {
    /// A fresh active line item, the basis for fixtures
    pub fn new(line_item_id: &str) -> Self {
        Self {
            line_item_id: line_item_id.to_string(),
            product_id: None,
            edition_number: None,
            status: "active".to_string(),
            restocked: None,
            refund_status: None,
            fulfillment_status: None,
            extra: Extras::default(),
        }
    }
    pub fn set_product(mut self, product_id: &str) -> Self {
        self.product_id = Some(product_id.to_string());
        self
    }
    pub fn set_edition(mut self, product_id: &str, edition_number: i64) -> Self {
        self.product_id = Some(product_id.to_string());
        self.edition_number = Some(edition_number);
        self
    }
    pub fn set_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }
    pub fn set_restocked(mut self, restocked: bool) -> Self {
        self.restocked = Some(restocked);
        self
    }
    pub fn set_refund_status(mut self, refund_status: &str) -> Self {
        self.refund_status = Some(refund_status.to_string());
        self
    }
    pub fn set_fulfillment_status(mut self, fulfillment_status: &str) -> Self {
        self.fulfillment_status = Some(fulfillment_status.to_string());
        self
    }
    pub fn set_extra(mut self, key: &str, value: serde_json::Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }
    /// `(product_id, edition_number)`, only when both are present
    pub fn edition_key(&self) -> Option<EditionKey> {
        match (&self.product_id, self.edition_number) {
            (Some(product_id), Some(edition_number)) => Some(EditionKey {
                product_id: product_id.clone(),
                edition_number,
            }),
            _ => None,
        }
    }
    pub fn is_restocked(&self) -> bool {
        self.restocked == Some(true)
    }
    /// Absent and "none" both mean the purchase was never refunded
    pub fn is_refunded(&self) -> bool {
        self.refund_status.as_deref().is_some_and(|s| s != "none")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, minicbor::Encode, minicbor::Decode)]
pub struct Order {
    #[n(0)]
    pub id: String, // manually entered orders carry a source prefix
    #[n(1)]
    #[serde(default)]
    pub order_name: Option<String>, // e.g. "#1188", "1188A"
    #[n(2)]
    pub processed_at: TimeStamp<Utc>,
    #[n(3)]
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[n(4)]
    #[serde(default)]
    pub financial_status: Option<String>,
    #[n(5)]
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
}

impl Order {
    pub fn new(id: &str, processed_at: TimeStamp<Utc>) -> Self {
        Self {
            id: id.to_string(),
            order_name: None,
            processed_at,
            fulfillment_status: None,
            financial_status: None,
            line_items: vec![],
        }
    }
    pub fn set_order_name(mut self, order_name: &str) -> Self {
        self.order_name = Some(order_name.to_string());
        self
    }
    pub fn set_fulfillment_status(mut self, status: &str) -> Self {
        self.fulfillment_status = Some(status.to_string());
        self
    }
    pub fn set_financial_status(mut self, status: &str) -> Self {
        self.financial_status = Some(status.to_string());
        self
    }
    pub fn add_line_item(mut self, line_item: LineItem) -> Self {
        self.line_items.push(line_item);
        self
    }
}
