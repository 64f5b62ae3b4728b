//! Core data types for institution lookups.
//!
//! This module defines the fundamental data structures:
//!
//! - [`CertNumber`] - FDIC certificate number identifying an institution
//! - [`Institution`] - A row returned by the institution search endpoint
//! - [`FinancialsRecord`] - A row returned by the financials endpoint
//!
//! Field names on the wire are the FDIC's upper-case aliases (`CERT`, `NAME`,
//! `REPDTE`, `CHBAL`, ...). The API is loose about numeric typing, so numbers
//! are accepted either as JSON numbers or as numeric strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ReservesError;

/// An FDIC certificate number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CertNumber(u64);

impl CertNumber {
    /// Creates a certificate number from its integer value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CertNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CertNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for CertNumber {
    type Err = ReservesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ReservesError::InvalidParameter(format!("Invalid certificate number: {s}")))
    }
}

impl<'de> Deserialize<'de> for CertNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        cert_from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid certificate number: {value}")))
    }
}

fn cert_from_value(value: &Value) -> Option<CertNumber> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .map(CertNumber)
}

/// An institution row from the search endpoint.
///
/// Text fields that are `null` or numeric on the wire are read as text, so a
/// sparse row is still listed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    /// Certificate number.
    #[serde(rename = "CERT")]
    pub cert: CertNumber,
    /// Legal name.
    #[serde(rename = "NAME", default, deserialize_with = "lenient_string")]
    pub name: String,
    /// City of the main office.
    #[serde(rename = "CITY", default, deserialize_with = "lenient_string")]
    pub city: String,
    /// State name of the main office.
    #[serde(rename = "STNAME", default, deserialize_with = "lenient_string")]
    pub state: String,
}

impl Institution {
    /// Creates a new institution row.
    #[must_use]
    pub fn new(
        cert: impl Into<CertNumber>,
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            cert: cert.into(),
            name: name.into(),
            city: city.into(),
            state: state.into(),
        }
    }

    /// Display label, `NAME (CITY, STATE)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({}, {})", self.name, self.city, self.state)
    }
}

/// The most recent financial filing for an institution.
///
/// The row is kept exactly as the API sent it (see [`fields`](Self::fields));
/// the typed fields are a read of that row. A typed field the API sent in an
/// unusable form is `None` here but still present in the raw row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct FinancialsRecord {
    /// Certificate number (`CERT`).
    pub cert: Option<CertNumber>,
    /// Institution name (`NAME`).
    pub name: Option<String>,
    /// Report date, usually `YYYYMMDD` (`REPDTE`).
    pub report_date: Option<String>,
    /// Cash and balances due from depository institutions (`CHBAL`).
    pub cash_and_balances: Option<f64>,
    /// Balances due from Federal Reserve Banks (`CHFRB`).
    pub fed_balances: Option<f64>,
    /// Total liabilities (`LIAB`).
    pub total_liabilities: Option<f64>,
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for FinancialsRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            cert: fields.get("CERT").and_then(cert_from_value),
            name: fields.get("NAME").and_then(text_from_value),
            report_date: fields.get("REPDTE").and_then(text_from_value),
            cash_and_balances: fields.get("CHBAL").and_then(number_from_value),
            fed_balances: fields.get("CHFRB").and_then(number_from_value),
            total_liabilities: fields.get("LIAB").and_then(number_from_value),
            fields,
        }
    }
}

impl From<FinancialsRecord> for Map<String, Value> {
    fn from(record: FinancialsRecord) -> Self {
        record.fields
    }
}

impl FinancialsRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the certificate number.
    #[must_use]
    pub fn with_cert(mut self, cert: CertNumber) -> Self {
        self.cert = Some(cert);
        self.fields.insert("CERT".to_string(), Value::from(cert.get()));
        self
    }

    /// Sets the institution name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.fields.insert("NAME".to_string(), Value::from(name.as_str()));
        self.name = Some(name);
        self
    }

    /// Sets the report date.
    #[must_use]
    pub fn with_report_date(mut self, report_date: impl Into<String>) -> Self {
        let report_date = report_date.into();
        self.fields
            .insert("REPDTE".to_string(), Value::from(report_date.as_str()));
        self.report_date = Some(report_date);
        self
    }

    /// Sets cash and balances due.
    #[must_use]
    pub fn with_cash_and_balances(mut self, value: f64) -> Self {
        self.cash_and_balances = Some(value);
        self.fields.insert("CHBAL".to_string(), Value::from(value));
        self
    }

    /// Sets balances due from the Federal Reserve.
    #[must_use]
    pub fn with_fed_balances(mut self, value: f64) -> Self {
        self.fed_balances = Some(value);
        self.fields.insert("CHFRB".to_string(), Value::from(value));
        self
    }

    /// Sets total liabilities.
    #[must_use]
    pub fn with_total_liabilities(mut self, value: f64) -> Self {
        self.total_liabilities = Some(value);
        self.fields.insert("LIAB".to_string(), Value::from(value));
        self
    }

    /// The row as the API sent it.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns true if the API returned no fields at all for this record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the row, as sent, as indented JSON.
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.fields).unwrap_or_else(|_| "{}".to_string())
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_institution_label() {
        let inst = Institution::new(628u64, "JPMorgan Chase Bank", "Columbus", "Ohio");
        assert_eq!(inst.label(), "JPMorgan Chase Bank (Columbus, Ohio)");
    }

    #[test]
    fn test_institution_from_api_row() {
        let inst: Institution = serde_json::from_value(json!({
            "CERT": 3511,
            "NAME": "Wells Fargo Bank",
            "CITY": "Sioux Falls",
            "STNAME": "South Dakota",
            "ID": "3511"
        }))
        .unwrap();
        assert_eq!(inst.cert, CertNumber::new(3511));
        assert_eq!(inst.state, "South Dakota");
    }

    #[test]
    fn test_institution_with_null_and_numeric_text() {
        let inst: Institution = serde_json::from_value(json!({
            "CERT": 5,
            "NAME": 1,
            "CITY": null,
            "STNAME": "Ohio"
        }))
        .unwrap();
        assert_eq!(inst.label(), "1 (, Ohio)");
    }

    #[test]
    fn test_cert_accepts_text_and_float() {
        let inst: Institution = serde_json::from_value(json!({"CERT": "57", "NAME": "A"})).unwrap();
        assert_eq!(inst.cert.get(), 57);
        assert_eq!(inst.city, "");

        let inst: Institution = serde_json::from_value(json!({"CERT": 57.0})).unwrap();
        assert_eq!(inst.cert.get(), 57);

        assert!(serde_json::from_value::<Institution>(json!({"CERT": "abc"})).is_err());
    }

    #[test]
    fn test_cert_from_str() {
        assert_eq!(" 628 ".parse::<CertNumber>().unwrap(), CertNumber::new(628));
        assert!("x".parse::<CertNumber>().is_err());
    }

    #[test]
    fn test_financials_record_keeps_extra_fields() {
        let record: FinancialsRecord = serde_json::from_value(json!({
            "NAME": "Example Bank",
            "CERT": 1234,
            "REPDTE": "20230630",
            "CHBAL": 1500.0,
            "CHFRB": "250",
            "LIAB": 10000,
            "ID": "1234_20230630"
        }))
        .unwrap();

        assert_eq!(record.cert, Some(CertNumber::new(1234)));
        assert_eq!(record.report_date.as_deref(), Some("20230630"));
        assert_eq!(record.cash_and_balances, Some(1500.0));
        assert_eq!(record.fed_balances, Some(250.0));
        assert_eq!(record.total_liabilities, Some(10000.0));
        assert_eq!(record.fields().get("ID"), Some(&json!("1234_20230630")));
        assert!(!record.is_empty());
    }

    #[test]
    fn test_financials_record_tolerates_bad_values() {
        let record: FinancialsRecord = serde_json::from_value(json!({
            "NAME": 123,
            "REPDTE": 20230331,
            "CHBAL": null,
            "CHFRB": "n/a",
            "LIAB": true
        }))
        .unwrap();

        assert_eq!(record.name.as_deref(), Some("123"));
        assert_eq!(record.report_date.as_deref(), Some("20230331"));
        assert_eq!(record.cash_and_balances, None);
        assert_eq!(record.fed_balances, None);
        assert_eq!(record.total_liabilities, None);
    }

    #[test]
    fn test_pretty_json_shows_row_as_sent() {
        let sent = json!({"NAME": "X", "CHFRB": "n/a", "LIAB": 10000, "REPDTE": 20230630});
        let record: FinancialsRecord = serde_json::from_value(sent.clone()).unwrap();

        assert_eq!(record.fed_balances, None);
        assert_eq!(record.to_pretty_json(), serde_json::to_string_pretty(&sent).unwrap());
        assert_eq!(serde_json::to_value(&record).unwrap(), sent);
    }

    #[test]
    fn test_empty_record() {
        let record: FinancialsRecord = serde_json::from_value(json!({})).unwrap();
        assert!(record.is_empty());
        assert_eq!(record.to_pretty_json(), "{}");
    }

    #[test]
    fn test_pretty_json_uses_api_names() {
        let record = FinancialsRecord::new()
            .with_name("Example Bank")
            .with_total_liabilities(42.0);
        let json = record.to_pretty_json();
        assert!(json.contains("\"NAME\": \"Example Bank\""));
        assert!(json.contains("\"LIAB\": 42.0"));
        assert!(!json.contains("CHBAL"));
    }
}
