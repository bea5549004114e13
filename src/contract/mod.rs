//! Record operations over a [`StateStore`].
//!
//! Every function here is one contract call: it reads and writes the given
//! transaction view and never commits. Farmers, companies and crops live under
//! their plain ids; bids live under [`bid_key`](crate::records::bid_key).
// region:    --- Imports
use crate::error::{ContractError, ContractResult};
use crate::records::{Farmer, RecordKind};
use crate::state::StateStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

// endregion: --- Imports

// region:    --- Modules
pub mod bid;
pub mod company;
pub mod crop;
pub mod farmer;

pub use bid::{create_bid, get_all_bids, get_bid, make_bid};
pub use company::{
    company_exists, create_company, delete_company, get_all_companies, read_company,
    update_company,
};
pub use crop::{create_crop, get_all_crops, get_crop};
pub use farmer::{
    create_farmer, delete_farmer, farmer_exists, get_all_farmers, read_farmer, update_farmer,
};
// endregion: --- Modules

// region:    --- Ledger Seed
/// Seeds the world state with the base set of farmers, overwriting any
/// values already stored at their keys.
pub async fn init_ledger<S: StateStore + ?Sized>(stub: &mut S) -> ContractResult<()> {
    let farmers = [
        ("farmer1", "Ravi Kumar", "123456789012"),
        ("farmer2", "Sunita Sharma", "234567890123"),
        ("farmer3", "Amit Patel", "345678901234"),
        ("farmer4", "Geeta Verma", "456789012345"),
    ];

    for (id, name, aadhar) in farmers {
        let farmer = Farmer {
            aadhar: aadhar.to_string(),
            id: id.to_string(),
            name: name.to_string(),
        };
        put_record(stub, RecordKind::Farmer, id, &farmer).await?;
    }
    debug!("{:<12} --> seeded {} farmers", "Contract", farmers.len());
    Ok(())
}
// endregion: --- Ledger Seed

// region:    --- State Helpers
/// Whether any value is stored at `key`, regardless of its kind.
pub(crate) async fn key_exists<S: StateStore + ?Sized>(
    stub: &mut S,
    key: &str,
) -> ContractResult<bool> {
    let value = stub
        .get_state(key)
        .await
        .map_err(ContractError::store("read from"))?;
    Ok(value.is_some())
}

/// Reads and decodes the record at `key`. `id` names the record in errors.
pub(crate) async fn read_record<S, T>(
    stub: &mut S,
    kind: RecordKind,
    key: &str,
    id: &str,
) -> ContractResult<T>
where
    S: StateStore + ?Sized,
    T: DeserializeOwned,
{
    let bytes = stub
        .get_state(key)
        .await
        .map_err(ContractError::store("read from"))?
        .ok_or_else(|| ContractError::NotFound {
            kind,
            id: id.to_string(),
        })?;

    serde_json::from_slice(&bytes).map_err(ContractError::codec(kind, "decode"))
}

/// Encodes `record` and stores it at `key`.
pub(crate) async fn put_record<S, T>(
    stub: &mut S,
    kind: RecordKind,
    key: &str,
    record: &T,
) -> ContractResult<()>
where
    S: StateStore + ?Sized,
    T: Serialize,
{
    let bytes = serde_json::to_vec(record).map_err(ContractError::codec(kind, "encode"))?;
    stub.put_state(key, bytes)
        .await
        .map_err(ContractError::store("put to"))
}

/// Scans the whole key-space and decodes every record of `kind`.
///
/// A value belongs to a kind when it is a JSON object carrying that kind's
/// signature field. Records of other kinds are skipped; values that are not
/// JSON, or that claim `kind` but fail to decode, abort the scan.
pub(crate) async fn scan_records<S, T>(stub: &mut S, kind: RecordKind) -> ContractResult<Vec<T>>
where
    S: StateStore + ?Sized,
    T: DeserializeOwned,
{
    let mut iterator = stub
        .get_state_by_range("", "")
        .await
        .map_err(ContractError::store("scan"))?;

    let mut records = Vec::new();
    for entry in iterator.by_ref() {
        let value: serde_json::Value =
            serde_json::from_slice(&entry.value).map_err(ContractError::codec(kind, "decode"))?;

        match detect_kind(&value) {
            Some(found) if found == kind => {
                let record =
                    serde_json::from_value(value).map_err(ContractError::codec(kind, "decode"))?;
                records.push(record);
            }
            Some(_) => {}
            None => warn!(
                "{:<12} --> skipping unrecognized value at key {:?}",
                "Contract", entry.key
            ),
        }
    }
    iterator.close();

    Ok(records)
}

/// Kind whose signature field the value carries, if any.
fn detect_kind(value: &serde_json::Value) -> Option<RecordKind> {
    let object = value.as_object()?;
    [
        RecordKind::Bid,
        RecordKind::Crop,
        RecordKind::Company,
        RecordKind::Farmer,
    ]
    .into_iter()
    .find(|kind| object.contains_key(kind.signature_field()))
}
// endregion: --- State Helpers
