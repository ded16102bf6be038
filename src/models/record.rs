// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user records (receipts, warranties, categories) as seen by triggers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Title used in messages when a record has none.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// The three per-user record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordCollection {
    Receipts,
    Warranties,
    Categories,
}

impl RecordCollection {
    pub const ALL: [RecordCollection; 3] = [
        RecordCollection::Receipts,
        RecordCollection::Warranties,
        RecordCollection::Categories,
    ];

    /// Collection name under `users/{uid}/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordCollection::Receipts => crate::db::collections::RECEIPTS,
            RecordCollection::Warranties => crate::db::collections::WARRANTIES,
            RecordCollection::Categories => crate::db::collections::CATEGORIES,
        }
    }
}

impl fmt::Display for RecordCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordCollection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordCollection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown collection: {}", s))
    }
}

/// A record payload carried by a trigger.
///
/// Only the fields the event reactions read are typed; everything else is
/// kept in `fields`. Decoding never fails, so a malformed payload still
/// produces a record (and its sync metadata write).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub title: Option<String>,
    /// `expiryDate`, or the legacy `warrantyExpiryDate`
    pub expiry_date: Option<Value>,
    pub days_until_expiry: Option<f64>,
    /// Remaining payload fields
    pub fields: Map<String, Value>,
}

impl Record {
    /// Decode a trigger payload. Anything but a JSON object is an empty record.
    ///
    /// `expiryDate` wins over the legacy `warrantyExpiryDate` when both are set.
    pub fn from_payload(payload: Value) -> Self {
        let Value::Object(mut fields) = payload else {
            return Self::default();
        };

        let title = fields.remove(TITLE_FIELD).and_then(lenient_title);
        let legacy_expiry = fields.remove(LEGACY_EXPIRY_FIELD);
        let expiry_date = fields
            .remove(EXPIRY_FIELD)
            .filter(|value| !value.is_null())
            .or(legacy_expiry)
            .filter(|value| !value.is_null());
        let days_until_expiry = fields.remove(DAYS_FIELD).and_then(lenient_days);

        Self {
            title,
            expiry_date,
            days_until_expiry,
            fields,
        }
    }

    pub fn title_or_unknown(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => UNKNOWN_TITLE,
        }
    }

    /// True if the record carries a non-empty expiry value.
    pub fn has_expiry(&self) -> bool {
        match &self.expiry_date {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }
}

const TITLE_FIELD: &str = "title";
const EXPIRY_FIELD: &str = "expiryDate";
const LEGACY_EXPIRY_FIELD: &str = "warrantyExpiryDate";
const DAYS_FIELD: &str = "daysUntilExpiry";

/// Strings as-is; numbers and booleans in their JSON text form.
fn lenient_title(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Finite numbers and numeric strings; anything else is absent.
fn lenient_days(value: Value) -> Option<f64> {
    let days = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    days.is_finite().then_some(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_round_trip_names() {
        for collection in RecordCollection::ALL {
            assert_eq!(
                collection.as_str().parse::<RecordCollection>().unwrap(),
                collection
            );
        }
        assert!("notes".parse::<RecordCollection>().is_err());
    }

    #[test]
    fn test_record_keeps_unknown_fields() {
        let record = Record::from_payload(json!({
            "title": "Laptop",
            "company": "Acme",
            "daysUntilExpiry": 5
        }));

        assert_eq!(record.title_or_unknown(), "Laptop");
        assert_eq!(record.days_until_expiry, Some(5.0));
        assert_eq!(record.fields["company"], "Acme");
        assert!(!record.fields.contains_key("title"));
    }

    #[test]
    fn test_warranty_expiry_alias() {
        let record = Record::from_payload(json!({"warrantyExpiryDate": 1735689600000_i64}));
        assert!(record.has_expiry());
        assert_eq!(record.title_or_unknown(), UNKNOWN_TITLE);
    }

    #[test]
    fn test_expiry_date_preferred_over_legacy_name() {
        let record = Record::from_payload(json!({
            "expiryDate": "2030-01-01",
            "warrantyExpiryDate": 1
        }));
        assert_eq!(record.expiry_date, Some(json!("2030-01-01")));

        let record = Record::from_payload(json!({
            "expiryDate": null,
            "warrantyExpiryDate": "2031-06-30"
        }));
        assert_eq!(record.expiry_date, Some(json!("2031-06-30")));
    }

    #[test]
    fn test_has_expiry_falsy_values() {
        for value in [json!(null), json!(""), json!(0), json!(false)] {
            let record = Record::from_payload(json!({"expiryDate": value}));
            assert!(!record.has_expiry());
        }
    }

    #[test]
    fn test_lenient_days() {
        let days =
            |value: Value| Record::from_payload(json!({"daysUntilExpiry": value})).days_until_expiry;

        assert_eq!(days(json!("3")), Some(3.0));
        assert_eq!(days(json!(2.5)), Some(2.5));
        assert_eq!(days(json!("soon")), None);
        assert_eq!(days(json!("NaN")), None);
        assert_eq!(days(json!([1])), None);
    }

    #[test]
    fn test_malformed_payloads_still_decode() {
        let record = Record::from_payload(json!({"title": 12345}));
        assert_eq!(record.title_or_unknown(), "12345");

        let record = Record::from_payload(json!({"title": {"nested": true}}));
        assert_eq!(record.title_or_unknown(), UNKNOWN_TITLE);

        assert_eq!(Record::from_payload(json!("not an object")), Record::default());
        assert_eq!(Record::from_payload(json!([1, 2])), Record::default());
    }
}
