pub mod model;

pub use model::{bid_key, Bid, Bidder, Company, Crop, Farmer, RecordKind, BID_KEY_PREFIX};
