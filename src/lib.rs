pub mod db;

pub mod matrix;
pub mod pricing;
pub mod products;
pub mod reconcile;
pub mod tiers;

pub mod constants;
pub mod errors;
pub mod schema;

pub use errors::{Error, Result};
