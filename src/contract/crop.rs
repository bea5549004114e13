// region:    --- Imports
use super::{put_record, read_record, scan_records};
use crate::error::ContractResult;
use crate::records::{Crop, RecordKind};
use crate::state::StateStore;

// endregion: --- Imports

/// Stores a crop under `id`, replacing whatever was there.
pub async fn create_crop<S: StateStore + ?Sized>(
    stub: &mut S,
    id: &str,
    name: &str,
    price: i64,
    last_update: &str,
) -> ContractResult<()> {
    let crop = Crop {
        id: id.to_string(),
        name: name.to_string(),
        price,
        last_update: last_update.to_string(),
    };
    put_record(stub, RecordKind::Crop, id, &crop).await
}

/// Fetches the crop stored under `id`.
pub async fn get_crop<S: StateStore + ?Sized>(stub: &mut S, id: &str) -> ContractResult<Crop> {
    read_record(stub, RecordKind::Crop, id, id).await
}

/// All crops, in key order.
pub async fn get_all_crops<S: StateStore + ?Sized>(stub: &mut S) -> ContractResult<Vec<Crop>> {
    scan_records(stub, RecordKind::Crop).await
}
