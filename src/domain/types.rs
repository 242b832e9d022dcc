//! Payload and series types.
//!
//! The endpoint returns a loosely-typed JSON object. We classify every field
//! exactly once, in `StatsResponse::from_slice`, so the rest of the pipeline
//! works on `StatValue` instead of raw JSON.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FetchError;

/// One per-channel withdraw aggregate, as found under `withdrawData`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub total_amount: f64,
    pub tds_amount: f64,
    pub count: f64,
}

impl WithdrawRecord {
    /// Coerce a JSON object into a record.
    ///
    /// Missing or non-numeric amounts become `0`, a missing `_id` becomes "".
    fn from_object(obj: &Map<String, Value>) -> Self {
        let id = match obj.get("_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let num = |key: &str| obj.get(key).and_then(Value::as_f64).unwrap_or(0.0);
        Self {
            id,
            total_amount: num("totalAmount"),
            tds_amount: num("tdsAmount"),
            count: num("count"),
        }
    }
}

/// A classified payload value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
    /// An array whose every element is an object.
    Records(Vec<WithdrawRecord>),
    /// Anything else (bool, null, nested object, mixed array), passed through.
    Other(Value),
}

impl StatValue {
    fn classify(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) => StatValue::Number(v),
                None => StatValue::Other(value.clone()),
            },
            Value::String(s) => StatValue::Text(s.clone()),
            Value::Array(items) if items.iter().all(Value::is_object) => StatValue::Records(
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(WithdrawRecord::from_object)
                    .collect(),
            ),
            other => StatValue::Other(other.clone()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StatValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(v) => write!(f, "{}", format_number(*v)),
            StatValue::Text(s) => write!(f, "{s}"),
            StatValue::Records(records) => write!(f, "{} records", records.len()),
            StatValue::Other(Value::Null) => Ok(()),
            StatValue::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Render a number the way a JSON consumer would: integers without a fraction.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

/// The statistics object, fields in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsPayload {
    fields: Vec<(String, StatValue)>,
}

impl StatsPayload {
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        let fields = obj
            .iter()
            .map(|(key, value)| (key.clone(), StatValue::classify(value)))
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Numeric field lookup; absent or non-numeric fields read as `0`.
    pub fn number_or_zero(&self, key: &str) -> f64 {
        self.get(key).and_then(StatValue::as_number).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A decoded response body plus the time it arrived.
#[derive(Debug, Clone)]
pub struct StatsResponse {
    pub data: StatsPayload,
    pub received_at: DateTime<Local>,
}

impl StatsResponse {
    /// Decode a response body.
    ///
    /// The body must be a JSON object. Its `data` field must be an object when
    /// present; a missing or null `data` yields an empty payload.
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        let root: Value =
            serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;
        let Value::Object(root) = root else {
            return Err(FetchError::Decode("response body is not a JSON object".to_string()));
        };

        let data = match root.get("data") {
            None | Some(Value::Null) => StatsPayload::default(),
            Some(Value::Object(obj)) => StatsPayload::from_object(obj),
            Some(_) => {
                return Err(FetchError::Decode("`data` is not a JSON object".to_string()));
            }
        };

        Ok(Self {
            data,
            received_at: Local::now(),
        })
    }
}

/// A labelled statistic, ready for a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatEntry {
    pub label: String,
    pub value: StatValue,
}

/// A numeric statistic with a display-sized name, ready for a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_preserves_document_order() {
        let body = br#"{"data":{"zeta":1,"alpha":"x","mid":2.5}}"#;
        let resp = StatsResponse::from_slice(body).unwrap();
        let keys: Vec<&str> = resp.data.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(resp.data.get("alpha"), Some(&StatValue::Text("x".to_string())));
        assert_eq!(resp.data.get("mid"), Some(&StatValue::Number(2.5)));
    }

    #[test]
    fn decode_coerces_withdraw_records() {
        let body = br#"{"data":{"withdrawData":[
            {"_id":"bank","totalAmount":100,"tdsAmount":10,"count":2},
            {"_id":"upi","totalAmount":"n/a"}
        ]}}"#;
        let resp = StatsResponse::from_slice(body).unwrap();
        let Some(StatValue::Records(records)) = resp.data.get("withdrawData") else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "bank");
        assert_eq!(records[0].count, 2.0);
        assert_eq!(records[1].total_amount, 0.0);
        assert_eq!(records[1].tds_amount, 0.0);
    }

    #[test]
    fn mixed_arrays_stay_opaque() {
        let body = br#"{"data":{"tags":["a",{"b":1}]}}"#;
        let resp = StatsResponse::from_slice(body).unwrap();
        assert!(matches!(resp.data.get("tags"), Some(StatValue::Other(_))));
    }

    #[test]
    fn missing_data_is_empty_payload() {
        let resp = StatsResponse::from_slice(br#"{"status":"ok"}"#).unwrap();
        assert!(resp.data.is_empty());
        let resp = StatsResponse::from_slice(br#"{"data":null}"#).unwrap();
        assert!(resp.data.is_empty());
    }

    #[test]
    fn malformed_bodies_are_decode_errors() {
        assert!(matches!(
            StatsResponse::from_slice(b"<html>"),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(
            StatsResponse::from_slice(b"[1,2]"),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(
            StatsResponse::from_slice(br#"{"data":[1]}"#),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn number_or_zero_defaults_missing_and_text() {
        let body = br#"{"data":{"a":3,"b":"7"}}"#;
        let resp = StatsResponse::from_slice(body).unwrap();
        assert_eq!(resp.data.number_or_zero("a"), 3.0);
        assert_eq!(resp.data.number_or_zero("b"), 0.0);
        assert_eq!(resp.data.number_or_zero("missing"), 0.0);
    }

    #[test]
    fn display_formats_integers_without_fraction() {
        assert_eq!(StatValue::Number(500.0).to_string(), "500");
        assert_eq!(StatValue::Number(12.5).to_string(), "12.5");
        assert_eq!(StatValue::Other(Value::Null).to_string(), "");
        assert_eq!(StatValue::Other(Value::Bool(true)).to_string(), "true");
    }
}
