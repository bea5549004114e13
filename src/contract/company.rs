// region:    --- Imports
use super::{key_exists, put_record, read_record, scan_records};
use crate::error::{ContractError, ContractResult};
use crate::records::{Company, RecordKind};
use crate::state::StateStore;
use tracing::debug;

// endregion: --- Imports

/// Adds a new company. Companies share the farmers' key-space, so a farmer
/// stored under `id` blocks creation too.
pub async fn create_company<S: StateStore + ?Sized>(
    stub: &mut S,
    id: &str,
    name: &str,
    gst: &str,
) -> ContractResult<()> {
    if company_exists(stub, id).await? {
        return Err(ContractError::AlreadyExists {
            kind: RecordKind::Company,
            id: id.to_string(),
        });
    }

    let company = Company {
        id: id.to_string(),
        name: name.to_string(),
        gst: gst.to_string(),
    };
    put_record(stub, RecordKind::Company, id, &company).await?;
    debug!("{:<12} --> company created: {}", "Contract", id);
    Ok(())
}

/// Fetches the company stored under `id`.
pub async fn read_company<S: StateStore + ?Sized>(
    stub: &mut S,
    id: &str,
) -> ContractResult<Company> {
    read_record(stub, RecordKind::Company, id, id).await
}

/// Replaces an existing company with the given fields.
pub async fn update_company<S: StateStore + ?Sized>(
    stub: &mut S,
    id: &str,
    name: &str,
    gst: &str,
) -> ContractResult<()> {
    if !company_exists(stub, id).await? {
        return Err(ContractError::NotFound {
            kind: RecordKind::Company,
            id: id.to_string(),
        });
    }

    let company = Company {
        id: id.to_string(),
        name: name.to_string(),
        gst: gst.to_string(),
    };
    put_record(stub, RecordKind::Company, id, &company).await
}

/// Removes the company stored under `id`.
pub async fn delete_company<S: StateStore + ?Sized>(stub: &mut S, id: &str) -> ContractResult<()> {
    if !company_exists(stub, id).await? {
        return Err(ContractError::NotFound {
            kind: RecordKind::Company,
            id: id.to_string(),
        });
    }

    stub.del_state(id)
        .await
        .map_err(ContractError::store("delete from"))?;
    debug!("{:<12} --> company deleted: {}", "Contract", id);
    Ok(())
}

/// Key-level check, shared with farmers.
pub async fn company_exists<S: StateStore + ?Sized>(
    stub: &mut S,
    id: &str,
) -> ContractResult<bool> {
    key_exists(stub, id).await
}

/// All companies, in key order.
pub async fn get_all_companies<S: StateStore + ?Sized>(
    stub: &mut S,
) -> ContractResult<Vec<Company>> {
    scan_records(stub, RecordKind::Company).await
}
