// src/domain/listing.rs

use serde::{Deserialize, Serialize};

/// One listing as returned by the listings API.
///
/// `prices` holds raw `"dd/mm/yyyy | price"` strings in whatever order the
/// source inserted them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub beds: u32,
    #[serde(default)]
    pub baths: f32,
    #[serde(default)]
    pub size_sqft: Option<f64>,
    #[serde(default)]
    pub listing_type: ListingStatus,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub home_type: Option<String>,
    #[serde(default)]
    pub garage: bool,
    #[serde(default)]
    pub garden: bool,
    #[serde(default)]
    pub prices: Vec<String>,
}

impl ListingRecord {
    /// Stable identity used for memoization: explicit id, else address, else coordinates.
    pub fn key(&self) -> ListingKey {
        if let Some(id) = self.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return ListingKey::Id(id.to_string());
        }

        let address = self.address.trim();
        if !address.is_empty() {
            return ListingKey::Address(address.to_string());
        }

        ListingKey::Coordinates {
            lat_bits: self.lat.to_bits(),
            lon_bits: self.lon.to_bits(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListingKey {
    Id(String),
    Address(String),
    // f64 has no Eq/Hash, so the raw bit patterns stand in for the pair.
    Coordinates { lat_bits: u64, lon_bits: u64 },
}

/// Listing lifecycle status as reported by the source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ListingStatus {
    #[default]
    Active,
    Pending,
    Sold,
    Other(String),
}

impl From<String> for ListingStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" | "for sale" | "for_sale" => ListingStatus::Active,
            "pending" | "contingent" => ListingStatus::Pending,
            "sold" => ListingStatus::Sold,
            _ => ListingStatus::Other(raw),
        }
    }
}

impl From<ListingStatus> for String {
    fn from(status: ListingStatus) -> Self {
        match status {
            ListingStatus::Active => "Active".to_string(),
            ListingStatus::Pending => "Pending".to_string(),
            ListingStatus::Sold => "Sold".to_string(),
            ListingStatus::Other(raw) => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: Option<&str>, address: &str) -> ListingRecord {
        ListingRecord {
            id: id.map(str::to_string),
            lat: 40.5,
            lon: -74.25,
            beds: 3,
            baths: 2.0,
            size_sqft: Some(1400.0),
            listing_type: ListingStatus::Active,
            address: address.to_string(),
            description: None,
            year_built: Some(1998),
            home_type: Some("House".to_string()),
            garage: true,
            garden: false,
            prices: vec!["01/01/2020 | 100".to_string()],
        }
    }

    #[test]
    fn key_prefers_id_then_address_then_coordinates() {
        assert_eq!(
            record(Some("abc"), "1 Main St").key(),
            ListingKey::Id("abc".to_string())
        );
        assert_eq!(
            record(Some("  "), "1 Main St").key(),
            ListingKey::Address("1 Main St".to_string())
        );
        assert_eq!(
            record(None, "").key(),
            ListingKey::Coordinates {
                lat_bits: 40.5f64.to_bits(),
                lon_bits: (-74.25f64).to_bits(),
            }
        );
    }

    #[test]
    fn deserializes_api_shape() {
        let raw = json!({
            "_id": "65f0",
            "lat": 53.4,
            "lon": -2.2,
            "beds": 2,
            "baths": 1,
            "sizeSqft": 820,
            "listingType": "Sold",
            "address": "4 Canal St",
            "yearBuilt": 1920,
            "homeType": "Flat",
            "garage": false,
            "garden": true,
            "prices": ["12/03/2019 | 180000", "01/06/2023 | 210000"]
        });

        let rec: ListingRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(rec.id.as_deref(), Some("65f0"));
        assert_eq!(rec.listing_type, ListingStatus::Sold);
        assert_eq!(rec.size_sqft, Some(820.0));
        assert_eq!(rec.prices.len(), 2);
        assert!(rec.description.is_none());
    }

    #[test]
    fn unknown_status_round_trips_verbatim() {
        let status = ListingStatus::from("Auction".to_string());
        assert_eq!(status, ListingStatus::Other("Auction".to_string()));
        assert_eq!(String::from(status), "Auction");
    }
}
