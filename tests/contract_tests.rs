use async_trait::async_trait;
use crop_ledger::contract;
use crop_ledger::error::{ContractError, StateError, StateResult};
use crop_ledger::records::{bid_key, Bid, Bidder, Company, Crop, Farmer, RecordKind};
use crop_ledger::service::{NewBid, RecordService};
use crop_ledger::state::{MemoryLedger, StateRangeIterator, StateStore};
use std::sync::Arc;

fn setup() -> (Arc<MemoryLedger>, RecordService<MemoryLedger>) {
    let ledger = Arc::new(MemoryLedger::new());
    let service = RecordService::new(Arc::clone(&ledger));
    (ledger, service)
}

fn tomato_bid(crop_id: &str) -> NewBid {
    NewBid {
        crop_id: crop_id.to_string(),
        crop_name: "Tomato".to_string(),
        farmer_aadhar: "123456789012".to_string(),
        base_price: 1800,
        date: "2025-03-01T09:00:00Z".to_string(),
        expiry: "2025-03-08T09:00:00Z".to_string(),
    }
}

// region:    --- Farmers
#[tokio::test]
async fn test_create_then_read_farmer() {
    let (_, service) = setup();
    service
        .create_farmer("f1".into(), "Ravi Kumar".into(), "123456789012".into())
        .await
        .unwrap();

    let farmer = service.read_farmer("f1".into()).await.unwrap();
    assert_eq!(
        farmer,
        Farmer {
            aadhar: "123456789012".to_string(),
            id: "f1".to_string(),
            name: "Ravi Kumar".to_string(),
        }
    );
    assert!(service.farmer_exists("f1".into()).await.unwrap());
    assert!(!service.farmer_exists("f2".into()).await.unwrap());
}

#[tokio::test]
async fn test_create_farmer_twice_fails() {
    let (_, service) = setup();
    service
        .create_farmer("f1".into(), "Ravi".into(), "111111111111".into())
        .await
        .unwrap();

    let err = service
        .create_farmer("f1".into(), "Other".into(), "222222222222".into())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ContractError::AlreadyExists { kind: RecordKind::Farmer, ref id } if id == "f1"
    ));
    assert_eq!(err.to_string(), "the farmer f1 already exists");

    let farmer = service.read_farmer("f1".into()).await.unwrap();
    assert_eq!(farmer.name, "Ravi");
}

#[tokio::test]
async fn test_update_farmer_replaces_record() {
    let (_, service) = setup();
    service
        .create_farmer("f1".into(), "Ravi".into(), "111111111111".into())
        .await
        .unwrap();
    service
        .update_farmer("f1".into(), "Ravi Kumar".into(), "999999999999".into())
        .await
        .unwrap();

    let farmer = service.read_farmer("f1".into()).await.unwrap();
    assert_eq!(farmer.name, "Ravi Kumar");
    assert_eq!(farmer.aadhar, "999999999999");
}

#[tokio::test]
async fn test_update_and_delete_missing_farmer_leave_store_unchanged() {
    let (ledger, service) = setup();
    service
        .create_farmer("f1".into(), "Ravi".into(), "111111111111".into())
        .await
        .unwrap();
    let before = ledger.keys().await;

    let err = service
        .update_farmer("ghost".into(), "Nobody".into(), "000000000000".into())
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::NotFound { kind: RecordKind::Farmer, .. }));

    let err = service.delete_farmer("ghost".into()).await.unwrap_err();
    assert!(matches!(err, ContractError::NotFound { kind: RecordKind::Farmer, .. }));
    assert_eq!(err.to_string(), "the farmer ghost does not exist");

    assert_eq!(ledger.keys().await, before);
}

#[tokio::test]
async fn test_delete_farmer() {
    let (_, service) = setup();
    service
        .create_farmer("f1".into(), "Ravi".into(), "111111111111".into())
        .await
        .unwrap();
    service.delete_farmer("f1".into()).await.unwrap();

    assert!(!service.farmer_exists("f1".into()).await.unwrap());
    let err = service.read_farmer("f1".into()).await.unwrap_err();
    assert!(matches!(err, ContractError::NotFound { .. }));
}

#[tokio::test]
async fn test_init_ledger_seeds_four_farmers() {
    let (_, service) = setup();
    service.init_ledger().await.unwrap();

    let mut ids: Vec<String> = service
        .get_all_farmers()
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["farmer1", "farmer2", "farmer3", "farmer4"]);

    let geeta = service.read_farmer("farmer4".into()).await.unwrap();
    assert_eq!(geeta.name, "Geeta Verma");
    assert_eq!(geeta.aadhar, "456789012345");
}
// endregion: --- Farmers

// region:    --- Companies
#[tokio::test]
async fn test_company_lifecycle() {
    let (_, service) = setup();
    service
        .create_company("c1".into(), "Agro Foods".into(), "29ABCDE1234F1Z5".into())
        .await
        .unwrap();
    assert_eq!(
        service.read_company("c1".into()).await.unwrap(),
        Company {
            id: "c1".to_string(),
            name: "Agro Foods".to_string(),
            gst: "29ABCDE1234F1Z5".to_string(),
        }
    );

    service
        .update_company("c1".into(), "Agro Foods Ltd".into(), "29ABCDE1234F1Z6".into())
        .await
        .unwrap();
    assert_eq!(
        service.read_company("c1".into()).await.unwrap().name,
        "Agro Foods Ltd"
    );

    service.delete_company("c1".into()).await.unwrap();
    assert!(!service.company_exists("c1".into()).await.unwrap());

    let err = service.delete_company("c1".into()).await.unwrap_err();
    assert!(matches!(err, ContractError::NotFound { kind: RecordKind::Company, .. }));
}

#[tokio::test]
async fn test_company_and_farmer_share_key_space() {
    let (_, service) = setup();
    service
        .create_farmer("x1".into(), "Ravi".into(), "111111111111".into())
        .await
        .unwrap();

    let err = service
        .create_company("x1".into(), "Agro".into(), "GST1".into())
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::AlreadyExists { kind: RecordKind::Company, .. }));
}

#[tokio::test]
async fn test_create_company_twice_fails() {
    let (_, service) = setup();
    service
        .create_company("c1".into(), "Agro Foods".into(), "GST1".into())
        .await
        .unwrap();

    let err = service
        .create_company("c1".into(), "Other Co".into(), "GST2".into())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ContractError::AlreadyExists { kind: RecordKind::Company, ref id } if id == "c1"
    ));
    assert_eq!(err.to_string(), "the company c1 already exists");

    let company = service.read_company("c1".into()).await.unwrap();
    assert_eq!(company.name, "Agro Foods");
    assert_eq!(company.gst, "GST1");
}

#[tokio::test]
async fn test_update_and_delete_missing_company_leave_store_unchanged() {
    let (ledger, service) = setup();
    service
        .create_company("c1".into(), "Agro Foods".into(), "GST1".into())
        .await
        .unwrap();
    let before = ledger.keys().await;
    let stored = ledger.raw_get("c1").await;

    let err = service
        .update_company("ghost".into(), "Nobody".into(), "GST0".into())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ContractError::NotFound { kind: RecordKind::Company, ref id } if id == "ghost"
    ));
    assert_eq!(err.to_string(), "the company ghost does not exist");

    let err = service.delete_company("ghost".into()).await.unwrap_err();
    assert!(matches!(err, ContractError::NotFound { kind: RecordKind::Company, .. }));

    assert_eq!(ledger.keys().await, before);
    assert_eq!(ledger.raw_get("c1").await, stored);
}
// endregion: --- Companies

// region:    --- Listing
#[tokio::test]
async fn test_listing_separates_kinds() {
    let (ledger, service) = setup();
    service.init_ledger().await.unwrap();
    service
        .create_company("c1".into(), "Agro Foods".into(), "GST1".into())
        .await
        .unwrap();
    service
        .create_crop("crop1".into(), "Wheat".into(), 2100, "2025-03-01T09:00:00Z".into())
        .await
        .unwrap();
    service.create_bid(tomato_bid("crop1")).await.unwrap();

    assert_eq!(service.get_all_farmers().await.unwrap().len(), 4);

    let companies = service.get_all_companies().await.unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].id, "c1");

    let crops = service.get_all_crops().await.unwrap();
    assert_eq!(crops.len(), 1);
    assert_eq!(crops[0].name, "Wheat");

    let bids = service.get_all_bids().await.unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].crop_id, "crop1");

    assert_eq!(ledger.open_cursors(), 0);
}

#[tokio::test]
async fn test_listing_skips_unrecognized_values() {
    let (ledger, service) = setup();
    ledger
        .raw_put("misc", br#"{"note":"not a record"}"#.to_vec())
        .await;
    service
        .create_company("c1".into(), "Agro Foods".into(), "GST1".into())
        .await
        .unwrap();

    let companies = service.get_all_companies().await.unwrap();
    assert_eq!(companies.len(), 1);
    assert!(service.get_all_farmers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_fails_on_malformed_value_and_releases_cursor() {
    let (ledger, service) = setup();
    service.init_ledger().await.unwrap();
    ledger.raw_put("broken", b"{not json".to_vec()).await;

    let err = service.get_all_farmers().await.unwrap_err();
    assert!(matches!(err, ContractError::Codec { kind: RecordKind::Farmer, .. }));
    assert_eq!(ledger.open_cursors(), 0);
}

#[tokio::test]
async fn test_listing_fails_on_record_of_kind_with_bad_fields() {
    let (ledger, service) = setup();
    ledger
        .raw_put("crop9", br#"{"id":"crop9","name":"Rice","price":"cheap","last_update":""}"#.to_vec())
        .await;

    let err = service.get_all_crops().await.unwrap_err();
    assert!(matches!(err, ContractError::Codec { kind: RecordKind::Crop, .. }));
    assert_eq!(ledger.open_cursors(), 0);
}
// endregion: --- Listing

// region:    --- Crops
#[tokio::test]
async fn test_create_crop_overwrites() {
    let (_, service) = setup();
    service
        .create_crop("crop1".into(), "Wheat".into(), 2100, "2025-03-01T09:00:00Z".into())
        .await
        .unwrap();
    service
        .create_crop("crop1".into(), "Wheat".into(), 2300, "2025-03-02T09:00:00Z".into())
        .await
        .unwrap();

    assert_eq!(
        service.get_crop("crop1".into()).await.unwrap(),
        Crop {
            id: "crop1".to_string(),
            name: "Wheat".to_string(),
            price: 2300,
            last_update: "2025-03-02T09:00:00Z".to_string(),
        }
    );

    let err = service.get_crop("crop2".into()).await.unwrap_err();
    assert!(matches!(err, ContractError::NotFound { kind: RecordKind::Crop, .. }));
}
// endregion: --- Crops

// region:    --- Bids
#[tokio::test]
async fn test_create_bid_stored_under_prefixed_key() {
    let (ledger, service) = setup();
    service.create_bid(tomato_bid("crop1")).await.unwrap();

    assert!(ledger.raw_get(&bid_key("crop1")).await.is_some());
    assert!(ledger.raw_get("crop1").await.is_none());

    let bid = service.get_bid("crop1".into()).await.unwrap();
    assert_eq!(bid.crop_name, "Tomato");
    assert_eq!(bid.base_price, 1800);
    assert!(bid.bidders.is_empty());
}

#[tokio::test]
async fn test_create_then_read_bid() {
    let (_, service) = setup();
    service.create_bid(tomato_bid("crop1")).await.unwrap();

    assert_eq!(
        service.get_bid("crop1".into()).await.unwrap(),
        Bid {
            crop_id: "crop1".to_string(),
            crop_name: "Tomato".to_string(),
            farmer_aadhar: "123456789012".to_string(),
            base_price: 1800,
            date: "2025-03-01T09:00:00Z".to_string(),
            expiry: "2025-03-08T09:00:00Z".to_string(),
            bidders: Vec::new(),
        }
    );
}

#[tokio::test]
async fn test_create_bid_twice_resets_bidders() {
    let (_, service) = setup();
    service.create_bid(tomato_bid("crop1")).await.unwrap();
    service
        .make_bid("crop1".into(), "Agro".into(), 1900, "2025-03-02T10:00:00Z".into())
        .await
        .unwrap();

    let mut second = tomato_bid("crop1");
    second.base_price = 2000;
    service.create_bid(second).await.unwrap();

    let bid = service.get_bid("crop1".into()).await.unwrap();
    assert_eq!(bid.base_price, 2000);
    assert!(bid.bidders.is_empty());
}

#[tokio::test]
async fn test_make_bid_without_bid_fails() {
    let (ledger, service) = setup();
    let err = service
        .make_bid("crop1".into(), "Agro".into(), 1900, "2025-03-02T10:00:00Z".into())
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::NotFound { kind: RecordKind::Bid, ref id } if id == "crop1"));
    assert!(ledger.keys().await.is_empty());
}

#[tokio::test]
async fn test_make_bid_appends_in_call_order() {
    let (_, service) = setup();
    service.create_bid(tomato_bid("crop1")).await.unwrap();

    let offers = [
        ("Agro Foods", 1700, "2025-03-02T10:00:00Z"),
        ("Fresh Farms", 2500, "2025-03-02T11:00:00Z"),
        ("Agro Foods", 2500, "2025-03-02T11:00:00Z"),
    ];
    for (company, price, at) in offers {
        service
            .make_bid("crop1".into(), company.into(), price, at.into())
            .await
            .unwrap();
    }

    let bid: Bid = service.get_bid("crop1".into()).await.unwrap();
    let expected: Vec<Bidder> = offers
        .iter()
        .map(|(company, price, at)| Bidder {
            company_name: company.to_string(),
            bid_price: *price,
            timestamp: at.to_string(),
        })
        .collect();
    assert_eq!(bid.bidders, expected);
}
// endregion: --- Bids

// region:    --- Store Failures
/// Store whose every call fails.
struct UnavailableStore;

#[async_trait]
impl StateStore for UnavailableStore {
    async fn get_state(&mut self, _key: &str) -> StateResult<Option<Vec<u8>>> {
        Err(StateError::Unavailable("peer offline".to_string()))
    }

    async fn put_state(&mut self, _key: &str, _value: Vec<u8>) -> StateResult<()> {
        Err(StateError::Unavailable("peer offline".to_string()))
    }

    async fn del_state(&mut self, _key: &str) -> StateResult<()> {
        Err(StateError::Unavailable("peer offline".to_string()))
    }

    async fn get_state_by_range(
        &mut self,
        _start: &str,
        _end: &str,
    ) -> StateResult<StateRangeIterator> {
        Err(StateError::Unavailable("peer offline".to_string()))
    }
}

#[tokio::test]
async fn test_store_failures_are_wrapped() {
    let mut stub = UnavailableStore;

    let err = contract::read_farmer(&mut stub, "f1").await.unwrap_err();
    assert!(matches!(err, ContractError::Store { .. }));
    assert_eq!(
        err.to_string(),
        "failed to read from world state: state backend unavailable: peer offline"
    );

    let err = contract::create_crop(&mut stub, "crop1", "Wheat", 2100, "")
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::Store { action: "put to", .. }));

    let err = contract::get_all_bids(&mut stub).await.unwrap_err();
    assert!(matches!(err, ContractError::Store { action: "scan", .. }));
}

#[tokio::test]
async fn test_failed_operation_rolls_back() {
    let (ledger, service) = setup();
    service.create_bid(tomato_bid("crop1")).await.unwrap();

    // write inside the transaction, then fail
    let result: Result<(), ContractError> = service
        .transaction(|stub| {
            Box::pin(async move {
                contract::create_crop(stub, "crop1", "Wheat", 2100, "").await?;
                contract::make_bid(stub, "missing", "Agro", 1, "").await
            })
        })
        .await;

    assert!(matches!(result, Err(ContractError::NotFound { .. })));
    assert!(ledger.raw_get("crop1").await.is_none());
}
// endregion: --- Store Failures
