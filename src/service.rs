//! Transactional entry points.
//!
//! Each public method runs exactly one contract operation inside one ledger
//! transaction: committed when the operation succeeds, rolled back otherwise.
// region:    --- Imports
use crate::contract;
use crate::error::{ContractError, ContractResult};
use crate::records::{Bid, Company, Crop, Farmer};
use crate::state::{Ledger, LedgerTransaction};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::warn;

// endregion: --- Imports

// region:    --- Record Service
/// Contract operations bound to a ledger backend.
pub struct RecordService<L: Ledger> {
    ledger: Arc<L>,
}

impl<L: Ledger> RecordService<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Runs `f` against a fresh transaction and commits it, or rolls it back
    /// if `f` fails.
    pub async fn transaction<F, R>(&self, f: F) -> ContractResult<R>
    where
        F: for<'c> FnOnce(
            &'c mut L::Transaction,
        ) -> Pin<Box<dyn Future<Output = ContractResult<R>> + Send + 'c>>,
    {
        let mut tx = self
            .ledger
            .begin()
            .await
            .map_err(ContractError::store("begin transaction on"))?;

        match f(&mut tx).await {
            Ok(r) => {
                tx.commit()
                    .await
                    .map_err(ContractError::store("commit to"))?;
                Ok(r)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(
                        "{:<12} --> rollback failed after {}: {}",
                        "Service", e, rollback_err
                    );
                }
                Err(e)
            }
        }
    }

    /// Seeds the base farmers.
    pub async fn init_ledger(&self) -> ContractResult<()> {
        self.transaction(|stub| Box::pin(contract::init_ledger(stub)))
            .await
    }
}
// endregion: --- Record Service

// region:    --- Farmers
impl<L: Ledger> RecordService<L> {
    /// Registers a farmer; fails if the id is taken.
    pub async fn create_farmer(
        &self,
        id: String,
        name: String,
        aadhar: String,
    ) -> ContractResult<()> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::create_farmer(stub, &id, &name, &aadhar).await })
        })
        .await
    }

    /// Farmer stored under `id`.
    pub async fn read_farmer(&self, id: String) -> ContractResult<Farmer> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::read_farmer(stub, &id).await })
        })
        .await
    }

    /// Replaces an existing farmer.
    pub async fn update_farmer(
        &self,
        id: String,
        name: String,
        aadhar: String,
    ) -> ContractResult<()> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::update_farmer(stub, &id, &name, &aadhar).await })
        })
        .await
    }

    /// Removes an existing farmer.
    pub async fn delete_farmer(&self, id: String) -> ContractResult<()> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::delete_farmer(stub, &id).await })
        })
        .await
    }

    /// Whether anything is stored under `id`.
    pub async fn farmer_exists(&self, id: String) -> ContractResult<bool> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::farmer_exists(stub, &id).await })
        })
        .await
    }

    /// Every farmer in key order.
    pub async fn get_all_farmers(&self) -> ContractResult<Vec<Farmer>> {
        self.transaction(|stub| Box::pin(contract::get_all_farmers(stub)))
            .await
    }
}
// endregion: --- Farmers

// region:    --- Companies
impl<L: Ledger> RecordService<L> {
    /// Registers a company; fails if the id is taken.
    pub async fn create_company(
        &self,
        id: String,
        name: String,
        gst: String,
    ) -> ContractResult<()> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::create_company(stub, &id, &name, &gst).await })
        })
        .await
    }

    /// Company stored under `id`.
    pub async fn read_company(&self, id: String) -> ContractResult<Company> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::read_company(stub, &id).await })
        })
        .await
    }

    /// Replaces an existing company.
    pub async fn update_company(
        &self,
        id: String,
        name: String,
        gst: String,
    ) -> ContractResult<()> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::update_company(stub, &id, &name, &gst).await })
        })
        .await
    }

    /// Removes an existing company.
    pub async fn delete_company(&self, id: String) -> ContractResult<()> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::delete_company(stub, &id).await })
        })
        .await
    }

    /// Whether anything is stored under `id`.
    pub async fn company_exists(&self, id: String) -> ContractResult<bool> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::company_exists(stub, &id).await })
        })
        .await
    }

    /// Every company in key order.
    pub async fn get_all_companies(&self) -> ContractResult<Vec<Company>> {
        self.transaction(|stub| Box::pin(contract::get_all_companies(stub)))
            .await
    }
}
// endregion: --- Companies

// region:    --- Crops
impl<L: Ledger> RecordService<L> {
    /// Stores a crop, overwriting any previous one.
    pub async fn create_crop(
        &self,
        id: String,
        name: String,
        price: i64,
        last_update: String,
    ) -> ContractResult<()> {
        self.transaction(move |stub| {
            Box::pin(async move {
                contract::create_crop(stub, &id, &name, price, &last_update).await
            })
        })
        .await
    }

    /// Crop stored under `id`.
    pub async fn get_crop(&self, id: String) -> ContractResult<Crop> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::get_crop(stub, &id).await })
        })
        .await
    }

    /// Every crop in key order.
    pub async fn get_all_crops(&self) -> ContractResult<Vec<Crop>> {
        self.transaction(|stub| Box::pin(contract::get_all_crops(stub)))
            .await
    }
}
// endregion: --- Crops

// region:    --- Bids
/// Fields of a new bid, as submitted by the farmer.
#[derive(Debug, Clone)]
pub struct NewBid {
    pub crop_id: String,
    pub crop_name: String,
    pub farmer_aadhar: String,
    pub base_price: i64,
    pub date: String,
    pub expiry: String,
}

impl<L: Ledger> RecordService<L> {
    /// Opens (or reopens) the bid for a crop.
    pub async fn create_bid(&self, bid: NewBid) -> ContractResult<()> {
        self.transaction(move |stub| {
            Box::pin(async move {
                contract::create_bid(
                    stub,
                    &bid.crop_id,
                    &bid.crop_name,
                    &bid.farmer_aadhar,
                    bid.base_price,
                    &bid.date,
                    &bid.expiry,
                )
                .await
            })
        })
        .await
    }

    /// Bid opened for `crop_id`.
    pub async fn get_bid(&self, crop_id: String) -> ContractResult<Bid> {
        self.transaction(move |stub| {
            Box::pin(async move { contract::get_bid(stub, &crop_id).await })
        })
        .await
    }

    /// Every open bid in key order.
    pub async fn get_all_bids(&self) -> ContractResult<Vec<Bid>> {
        self.transaction(|stub| Box::pin(contract::get_all_bids(stub)))
            .await
    }

    /// Appends a bidder to the bid for `crop_id`.
    pub async fn make_bid(
        &self,
        crop_id: String,
        company_name: String,
        bid_price: i64,
        timestamp: String,
    ) -> ContractResult<()> {
        self.transaction(move |stub| {
            Box::pin(async move {
                contract::make_bid(stub, &crop_id, &company_name, bid_price, &timestamp).await
            })
        })
        .await
    }
}
// endregion: --- Bids
