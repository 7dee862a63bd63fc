use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Attribute dimension a historical conversion rate is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateKeyField {
    Service,
    AdSet,
    AdName,
    Date,
}

/// Historical conversion ratio for one attribute bucket, owned by the
/// analytics backend and immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRate {
    pub client_id: String,
    pub key_field: RateKeyField,
    pub key_name: String,
    pub conversion_rate: f64,
    #[serde(default)]
    pub past_total_count: u64,
    #[serde(default)]
    pub past_total_est: u64,
}

/// Wire shape of `GET /leads/conversion-rates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRatesEnvelope {
    pub success: bool,
    pub data: Vec<ConversionRate>,
}

/// Flat lookup over the fetched rate table.
///
/// Absent keys resolve to 0.0; rates outside [0, 1] (or non-finite values from
/// a misbehaving backend) are clamped on the way in so scoring never sees a
/// value it cannot average.
#[derive(Debug, Clone, Default)]
pub struct RateBook {
    rates: HashMap<(RateKeyField, String), f64>,
}

impl RateBook {
    pub fn from_rates(rates: &[ConversionRate]) -> Self {
        let mut table = HashMap::with_capacity(rates.len());
        for rate in rates {
            let value = if rate.conversion_rate.is_finite() {
                rate.conversion_rate.clamp(0.0, 1.0)
            } else {
                0.0
            };
            table.insert((rate.key_field, rate.key_name.clone()), value);
        }
        Self { rates: table }
    }

    pub fn from_envelope(envelope: &ConversionRatesEnvelope) -> Self {
        Self::from_rates(&envelope.data)
    }

    pub fn lookup(&self, field: RateKeyField, name: &str) -> f64 {
        self.rates
            .get(&(field, name.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Month-year bucket used as the `Date` rate key for a lead, e.g. "2026-08".
/// Returns `None` for dates the backend sent malformed; the caller treats that
/// as a zero-rate contribution.
pub fn month_bucket(lead_date: &str) -> Option<String> {
    NaiveDate::parse_from_str(lead_date.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(field: RateKeyField, name: &str, value: f64) -> ConversionRate {
        ConversionRate {
            client_id: "client-1".to_string(),
            key_field: field,
            key_name: name.to_string(),
            conversion_rate: value,
            past_total_count: 120,
            past_total_est: 34,
        }
    }

    #[test]
    fn lookup_defaults_to_zero_for_missing_keys() {
        let book = RateBook::from_rates(&[rate(RateKeyField::Service, "Roofing", 0.42)]);
        assert_eq!(book.lookup(RateKeyField::Service, "Roofing"), 0.42);
        assert_eq!(book.lookup(RateKeyField::Service, "Siding"), 0.0);
        assert_eq!(book.lookup(RateKeyField::AdName, "Roofing"), 0.0);
    }

    #[test]
    fn out_of_range_rates_are_clamped() {
        let book = RateBook::from_rates(&[
            rate(RateKeyField::Service, "Roofing", 3.5),
            rate(RateKeyField::AdSet, "Metro", -0.2),
            rate(RateKeyField::AdName, "Promo", f64::NAN),
        ]);
        assert_eq!(book.lookup(RateKeyField::Service, "Roofing"), 1.0);
        assert_eq!(book.lookup(RateKeyField::AdSet, "Metro"), 0.0);
        assert_eq!(book.lookup(RateKeyField::AdName, "Promo"), 0.0);
    }

    #[test]
    fn month_bucket_formats_year_month() {
        assert_eq!(month_bucket("2026-08-12"), Some("2026-08".to_string()));
        assert_eq!(month_bucket(" 2026-01-03 "), Some("2026-01".to_string()));
        assert_eq!(month_bucket("08/12/2026"), None);
        assert_eq!(month_bucket(""), None);
    }

    #[test]
    fn envelope_deserializes_backend_shape() {
        let json = r#"{
            "success": true,
            "data": [{
                "clientId": "client-9",
                "keyField": "adSet",
                "keyName": "Des Moines Metro",
                "conversionRate": 0.31,
                "pastTotalCount": 200,
                "pastTotalEst": 62
            }]
        }"#;

        let envelope: ConversionRatesEnvelope = serde_json::from_str(json).expect("parses");
        assert!(envelope.success);
        let book = RateBook::from_envelope(&envelope);
        assert_eq!(book.lookup(RateKeyField::AdSet, "Des Moines Metro"), 0.31);
    }
}
