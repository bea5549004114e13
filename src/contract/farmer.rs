// region:    --- Imports
use super::{key_exists, put_record, read_record, scan_records};
use crate::error::{ContractError, ContractResult};
use crate::records::{Farmer, RecordKind};
use crate::state::StateStore;
use tracing::debug;

// endregion: --- Imports

/// Adds a new farmer. Fails if anything is already stored under `id`.
pub async fn create_farmer<S: StateStore + ?Sized>(
    stub: &mut S,
    id: &str,
    name: &str,
    aadhar: &str,
) -> ContractResult<()> {
    if farmer_exists(stub, id).await? {
        return Err(ContractError::AlreadyExists {
            kind: RecordKind::Farmer,
            id: id.to_string(),
        });
    }

    let farmer = Farmer {
        aadhar: aadhar.to_string(),
        id: id.to_string(),
        name: name.to_string(),
    };
    put_record(stub, RecordKind::Farmer, id, &farmer).await?;
    debug!("{:<12} --> farmer created: {}", "Contract", id);
    Ok(())
}

/// Fetches the farmer stored under `id`.
pub async fn read_farmer<S: StateStore + ?Sized>(stub: &mut S, id: &str) -> ContractResult<Farmer> {
    read_record(stub, RecordKind::Farmer, id, id).await
}

/// Replaces an existing farmer with the given fields.
pub async fn update_farmer<S: StateStore + ?Sized>(
    stub: &mut S,
    id: &str,
    name: &str,
    aadhar: &str,
) -> ContractResult<()> {
    if !farmer_exists(stub, id).await? {
        return Err(ContractError::NotFound {
            kind: RecordKind::Farmer,
            id: id.to_string(),
        });
    }

    let farmer = Farmer {
        aadhar: aadhar.to_string(),
        id: id.to_string(),
        name: name.to_string(),
    };
    put_record(stub, RecordKind::Farmer, id, &farmer).await
}

/// Removes the farmer stored under `id`.
pub async fn delete_farmer<S: StateStore + ?Sized>(stub: &mut S, id: &str) -> ContractResult<()> {
    if !farmer_exists(stub, id).await? {
        return Err(ContractError::NotFound {
            kind: RecordKind::Farmer,
            id: id.to_string(),
        });
    }

    stub.del_state(id)
        .await
        .map_err(ContractError::store("delete from"))?;
    debug!("{:<12} --> farmer deleted: {}", "Contract", id);
    Ok(())
}

/// Key-level check, shared with companies.
pub async fn farmer_exists<S: StateStore + ?Sized>(stub: &mut S, id: &str) -> ContractResult<bool> {
    key_exists(stub, id).await
}

/// All farmers, in key order.
pub async fn get_all_farmers<S: StateStore + ?Sized>(stub: &mut S) -> ContractResult<Vec<Farmer>> {
    scan_records(stub, RecordKind::Farmer).await
}
