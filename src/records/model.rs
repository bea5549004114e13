use serde::{Deserialize, Serialize};
use std::fmt;

/// Key prefix that separates bid records from the plain-id records.
pub const BID_KEY_PREFIX: &str = "BID_";

/// World state key of the bid opened for `crop_id`.
pub fn bid_key(crop_id: &str) -> String {
    format!("{}{}", BID_KEY_PREFIX, crop_id)
}

// region:    --- Record Kind
/// The four record kinds sharing the world state namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Farmer,
    Company,
    Crop,
    Bid,
}

impl RecordKind {
    /// Field that only records of this kind carry. Used to tell kinds apart
    /// while scanning the shared key-space.
    pub fn signature_field(self) -> &'static str {
        match self {
            RecordKind::Farmer => "aadhar",
            RecordKind::Company => "gst",
            RecordKind::Crop => "price",
            RecordKind::Bid => "crop_id",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Farmer => "farmer",
            RecordKind::Company => "company",
            RecordKind::Crop => "crop",
            RecordKind::Bid => "bid",
        };
        f.write_str(name)
    }
}
// endregion: --- Record Kind

// region:    --- Records
/// Registered farmer. `aadhar` is the 12-digit government ID kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farmer {
    pub aadhar: String,
    pub id: String,
    pub name: String,
}

/// Buying company identified by its GST number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub gst: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub last_update: String,
}

/// One company's offer on a bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bidder {
    pub company_name: String,
    pub bid_price: i64,
    pub timestamp: String,
}

/// Open bid for a crop, keyed by [`bid_key`]. Bidders are kept in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub crop_id: String,
    pub crop_name: String,
    pub farmer_aadhar: String,
    pub base_price: i64,
    pub date: String,
    pub expiry: String,
    #[serde(default)]
    pub bidders: Vec<Bidder>,
}
// endregion: --- Records
