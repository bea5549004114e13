use crop_ledger::records::{Bid, Bidder, Company, Crop, Farmer};
use proptest::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encoding a decoded record reproduces the original bytes.
fn assert_idempotent<T: Serialize + DeserializeOwned>(record: &T) {
    let first = serde_json::to_vec(record).unwrap();
    let decoded: T = serde_json::from_slice(&first).unwrap();
    let second = serde_json::to_vec(&decoded).unwrap();
    assert_eq!(first, second);
}

fn bidder() -> impl Strategy<Value = Bidder> {
    (".*", any::<i64>(), ".*").prop_map(|(company_name, bid_price, timestamp)| Bidder {
        company_name,
        bid_price,
        timestamp,
    })
}

proptest! {
    #[test]
    fn plain_records_encode_idempotently(
        id in ".*",
        name in ".*",
        text in ".*",
        price in any::<i64>(),
    ) {
        assert_idempotent(&Farmer { aadhar: text.clone(), id: id.clone(), name: name.clone() });
        assert_idempotent(&Company { id: id.clone(), name: name.clone(), gst: text.clone() });
        assert_idempotent(&Crop { id, name, price, last_update: text });
    }

    #[test]
    fn bids_encode_idempotently(
        crop_id in ".*",
        base_price in any::<i64>(),
        bidders in prop::collection::vec(bidder(), 0..8),
    ) {
        let bid = Bid {
            crop_id,
            crop_name: "Wheat".to_string(),
            farmer_aadhar: "123456789012".to_string(),
            base_price,
            date: "2025-03-01T09:00:00Z".to_string(),
            expiry: "2025-03-08T09:00:00Z".to_string(),
            bidders,
        };
        assert_idempotent(&bid);
    }
}

#[test]
fn test_wire_field_names() {
    let bid = Bid {
        crop_id: "crop1".to_string(),
        crop_name: "Wheat".to_string(),
        farmer_aadhar: "123456789012".to_string(),
        base_price: 2100,
        date: "2025-03-01T09:00:00Z".to_string(),
        expiry: "2025-03-08T09:00:00Z".to_string(),
        bidders: vec![Bidder {
            company_name: "Agro Foods".to_string(),
            bid_price: 2200,
            timestamp: "2025-03-02T10:00:00Z".to_string(),
        }],
    };
    let value = serde_json::to_value(&bid).unwrap();
    assert_eq!(value["crop_id"], "crop1");
    assert_eq!(value["base_price"], 2100);
    assert_eq!(value["bidders"][0]["company_name"], "Agro Foods");
    assert_eq!(value["bidders"][0]["bid_price"], 2200);

    let crop: Crop = serde_json::from_str(
        r#"{"id":"crop1","name":"Wheat","price":2100,"last_update":"2025-03-01T09:00:00Z"}"#,
    )
    .unwrap();
    assert_eq!(crop.last_update, "2025-03-01T09:00:00Z");

    // bids written without a bidder list decode as empty
    let bid: Bid = serde_json::from_str(
        r#"{"crop_id":"c","crop_name":"n","farmer_aadhar":"a","base_price":1,"date":"d","expiry":"e"}"#,
    )
    .unwrap();
    assert!(bid.bidders.is_empty());
}
