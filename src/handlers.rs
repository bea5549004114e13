// region:    --- Imports
use crate::error::ContractError;
use crate::service::{NewBid, RecordService};
use crate::state::Ledger;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Router
/// Routes for every contract operation, backed by `service`.
pub fn router<L: Ledger>(service: Arc<RecordService<L>>) -> Router {
    // open CORS for local test pages
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // route table
    Router::new()
        .route("/ledger/init", post(handle_init_ledger::<L>))
        .route(
            "/farmers",
            post(handle_create_farmer::<L>).get(handle_get_all_farmers::<L>),
        )
        .route(
            "/farmers/:id",
            get(handle_read_farmer::<L>)
                .put(handle_update_farmer::<L>)
                .delete(handle_delete_farmer::<L>),
        )
        .route("/farmers/:id/exists", get(handle_farmer_exists::<L>))
        .route(
            "/companies",
            post(handle_create_company::<L>).get(handle_get_all_companies::<L>),
        )
        .route(
            "/companies/:id",
            get(handle_read_company::<L>)
                .put(handle_update_company::<L>)
                .delete(handle_delete_company::<L>),
        )
        .route("/companies/:id/exists", get(handle_company_exists::<L>))
        .route(
            "/crops",
            post(handle_create_crop::<L>).get(handle_get_all_crops::<L>),
        )
        .route("/crops/:id", get(handle_get_crop::<L>))
        .route(
            "/bids",
            post(handle_create_bid::<L>).get(handle_get_all_bids::<L>),
        )
        .route("/bids/:crop_id", get(handle_get_bid::<L>))
        .route("/bids/:crop_id/bidders", post(handle_make_bid::<L>))
        .layer(cors)
        .with_state(service)
}
// endregion: --- Router

// region:    --- Requests
#[derive(Debug, Deserialize)]
pub struct CreateFarmerRequest {
    pub id: String,
    pub name: String,
    pub aadhar: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFarmerRequest {
    pub name: String,
    pub aadhar: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub id: String,
    pub name: String,
    pub gst: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: String,
    pub gst: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCropRequest {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub last_update: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBidRequest {
    pub crop_id: String,
    pub crop_name: String,
    pub farmer_aadhar: String,
    pub base_price: i64,
    pub date: String,
    pub expiry: String,
}

/// `timestamp` defaults to the current UTC time when omitted.
#[derive(Debug, Deserialize)]
pub struct MakeBidRequest {
    pub company_name: String,
    pub bid_price: i64,
    pub timestamp: Option<String>,
}
// endregion: --- Requests

// region:    --- Error Response
impl IntoResponse for ContractError {
    fn into_response(self) -> Response {
        let status = match &self {
            ContractError::AlreadyExists { .. } => StatusCode::CONFLICT,
            ContractError::NotFound { .. } => StatusCode::NOT_FOUND,
            ContractError::Store { .. } | ContractError::Codec { .. } => {
                error!("{:<12} --> {}", "Handler", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            })),
        )
            .into_response()
    }
}

/// Malformed or mistyped request body.
fn invalid_body(rejection: JsonRejection) -> Response {
    info!("{:<12} --> rejected body: {}", "Handler", rejection.body_text());
    (
        rejection.status(),
        Json(serde_json::json!({
            "error": rejection.body_text(),
            "code": "INVALID_BODY",
        })),
    )
        .into_response()
}

/// 201 for a stored record.
fn created() -> Response {
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "created" })),
    )
        .into_response()
}

/// 200 with a short confirmation.
fn done(message: &str) -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "message": message }))).into_response()
}
// endregion: --- Error Response

// region:    --- Ledger Handlers
/// Seed request
pub async fn handle_init_ledger<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
) -> Response {
    info!("{:<12} --> init ledger", "Handler");
    match service.init_ledger().await {
        Ok(()) => done("ledger initialized"),
        Err(e) => e.into_response(),
    }
}
// endregion: --- Ledger Handlers

// region:    --- Farmer Handlers
/// Farmer registration
pub async fn handle_create_farmer<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    payload: Result<Json<CreateFarmerRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("{:<12} --> create farmer: {:?}", "Handler", req);
    match service.create_farmer(req.id, req.name, req.aadhar).await {
        Ok(()) => created(),
        Err(e) => e.into_response(),
    }
}

/// Farmer lookup
pub async fn handle_read_farmer<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(id): Path<String>,
) -> Response {
    info!("{:<12} --> read farmer id: {}", "Handler", id);
    match service.read_farmer(id).await {
        Ok(farmer) => Json(farmer).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Farmer replacement
pub async fn handle_update_farmer<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateFarmerRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("{:<12} --> update farmer id: {}", "Handler", id);
    match service.update_farmer(id, req.name, req.aadhar).await {
        Ok(()) => done("updated"),
        Err(e) => e.into_response(),
    }
}

/// Farmer removal
pub async fn handle_delete_farmer<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(id): Path<String>,
) -> Response {
    info!("{:<12} --> delete farmer id: {}", "Handler", id);
    match service.delete_farmer(id).await {
        Ok(()) => done("deleted"),
        Err(e) => e.into_response(),
    }
}

/// Farmer existence check
pub async fn handle_farmer_exists<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(id): Path<String>,
) -> Response {
    match service.farmer_exists(id).await {
        Ok(exists) => Json(serde_json::json!({ "exists": exists })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Farmer listing
pub async fn handle_get_all_farmers<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
) -> Response {
    info!("{:<12} --> list farmers", "Handler");
    match service.get_all_farmers().await {
        Ok(farmers) => Json(farmers).into_response(),
        Err(e) => e.into_response(),
    }
}
// endregion: --- Farmer Handlers

// region:    --- Company Handlers
/// Company registration
pub async fn handle_create_company<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    payload: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("{:<12} --> create company: {:?}", "Handler", req);
    match service.create_company(req.id, req.name, req.gst).await {
        Ok(()) => created(),
        Err(e) => e.into_response(),
    }
}

/// Company lookup
pub async fn handle_read_company<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(id): Path<String>,
) -> Response {
    info!("{:<12} --> read company id: {}", "Handler", id);
    match service.read_company(id).await {
        Ok(company) => Json(company).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Company replacement
pub async fn handle_update_company<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCompanyRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("{:<12} --> update company id: {}", "Handler", id);
    match service.update_company(id, req.name, req.gst).await {
        Ok(()) => done("updated"),
        Err(e) => e.into_response(),
    }
}

/// Company removal
pub async fn handle_delete_company<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(id): Path<String>,
) -> Response {
    info!("{:<12} --> delete company id: {}", "Handler", id);
    match service.delete_company(id).await {
        Ok(()) => done("deleted"),
        Err(e) => e.into_response(),
    }
}

/// Company existence check
pub async fn handle_company_exists<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(id): Path<String>,
) -> Response {
    match service.company_exists(id).await {
        Ok(exists) => Json(serde_json::json!({ "exists": exists })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Company listing
pub async fn handle_get_all_companies<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
) -> Response {
    info!("{:<12} --> list companies", "Handler");
    match service.get_all_companies().await {
        Ok(companies) => Json(companies).into_response(),
        Err(e) => e.into_response(),
    }
}
// endregion: --- Company Handlers

// region:    --- Crop Handlers
/// Crop registration
pub async fn handle_create_crop<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    payload: Result<Json<CreateCropRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("{:<12} --> create crop: {:?}", "Handler", req);
    match service
        .create_crop(req.id, req.name, req.price, req.last_update)
        .await
    {
        Ok(()) => created(),
        Err(e) => e.into_response(),
    }
}

/// Crop lookup
pub async fn handle_get_crop<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(id): Path<String>,
) -> Response {
    info!("{:<12} --> get crop id: {}", "Handler", id);
    match service.get_crop(id).await {
        Ok(crop) => Json(crop).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Crop listing
pub async fn handle_get_all_crops<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
) -> Response {
    info!("{:<12} --> list crops", "Handler");
    match service.get_all_crops().await {
        Ok(crops) => Json(crops).into_response(),
        Err(e) => e.into_response(),
    }
}
// endregion: --- Crop Handlers

// region:    --- Bid Handlers
/// Bid opening
pub async fn handle_create_bid<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    payload: Result<Json<CreateBidRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("{:<12} --> create bid: {:?}", "Handler", req);
    // request body -> service input
    let bid = NewBid {
        crop_id: req.crop_id,
        crop_name: req.crop_name,
        farmer_aadhar: req.farmer_aadhar,
        base_price: req.base_price,
        date: req.date,
        expiry: req.expiry,
    };
    match service.create_bid(bid).await {
        Ok(()) => created(),
        Err(e) => e.into_response(),
    }
}

/// Bid lookup
pub async fn handle_get_bid<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(crop_id): Path<String>,
) -> Response {
    info!("{:<12} --> get bid for crop: {}", "Handler", crop_id);
    match service.get_bid(crop_id).await {
        Ok(bid) => Json(bid).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Bid listing
pub async fn handle_get_all_bids<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
) -> Response {
    info!("{:<12} --> list bids", "Handler");
    match service.get_all_bids().await {
        Ok(bids) => Json(bids).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Bidder append
pub async fn handle_make_bid<L: Ledger>(
    State(service): State<Arc<RecordService<L>>>,
    Path(crop_id): Path<String>,
    payload: Result<Json<MakeBidRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("{:<12} --> make bid on {}: {:?}", "Handler", crop_id, req);
    // stamp with server time when the client sent none
    let timestamp = req
        .timestamp
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    match service
        .make_bid(crop_id, req.company_name, req.bid_price, timestamp)
        .await
    {
        Ok(()) => done("bid placed"),
        Err(e) => e.into_response(),
    }
}
// endregion: --- Bid Handlers
