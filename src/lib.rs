/*
 * dxsp - DEX aggregator and block explorer helpers
 * Core library exports and module declarations
 */

pub mod aggregator;
pub mod config;
pub mod explorer;
pub mod http;
pub mod models;
pub mod service;
pub mod utils;

pub use config::Config;
pub use models::*;
pub use service::DexSwap;
