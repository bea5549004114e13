pub mod config;
pub mod contract;
pub mod error;
pub mod handlers;
pub mod records;
pub mod service;
pub mod state;
