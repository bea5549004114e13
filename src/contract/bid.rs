// region:    --- Imports
use super::{put_record, read_record, scan_records};
use crate::error::ContractResult;
use crate::records::{bid_key, Bid, Bidder, RecordKind};
use crate::state::StateStore;
use tracing::debug;

// endregion: --- Imports

/// Opens a bid for `crop_id` with no bidders. An existing bid for the same
/// crop is replaced, bidders included.
pub async fn create_bid<S: StateStore + ?Sized>(
    stub: &mut S,
    crop_id: &str,
    crop_name: &str,
    farmer_aadhar: &str,
    base_price: i64,
    date: &str,
    expiry: &str,
) -> ContractResult<()> {
    let bid = Bid {
        crop_id: crop_id.to_string(),
        crop_name: crop_name.to_string(),
        farmer_aadhar: farmer_aadhar.to_string(),
        base_price,
        date: date.to_string(),
        expiry: expiry.to_string(),
        bidders: Vec::new(),
    };
    put_record(stub, RecordKind::Bid, &bid_key(crop_id), &bid).await
}

/// Fetches the bid opened for `crop_id`.
pub async fn get_bid<S: StateStore + ?Sized>(stub: &mut S, crop_id: &str) -> ContractResult<Bid> {
    read_record(stub, RecordKind::Bid, &bid_key(crop_id), crop_id).await
}

/// All bids, in key order.
pub async fn get_all_bids<S: StateStore + ?Sized>(stub: &mut S) -> ContractResult<Vec<Bid>> {
    scan_records(stub, RecordKind::Bid).await
}

/// Appends a bidder to the bid for `crop_id`.
///
/// Bids are accepted as given: the price is not compared with the base price
/// or other bidders, and the expiry is not checked.
pub async fn make_bid<S: StateStore + ?Sized>(
    stub: &mut S,
    crop_id: &str,
    company_name: &str,
    bid_price: i64,
    timestamp: &str,
) -> ContractResult<()> {
    let mut bid = get_bid(stub, crop_id).await?;

    bid.bidders.push(Bidder {
        company_name: company_name.to_string(),
        bid_price,
        timestamp: timestamp.to_string(),
    });

    put_record(stub, RecordKind::Bid, &bid_key(crop_id), &bid).await?;
    debug!(
        "{:<12} --> bid on {} by {} ({} bidders)",
        "Contract",
        crop_id,
        company_name,
        bid.bidders.len()
    );
    Ok(())
}
