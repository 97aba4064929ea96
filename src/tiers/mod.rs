pub(crate) mod tiers_errors;
pub(crate) mod tiers_model;
pub(crate) mod tiers_repository;
pub(crate) mod tiers_service;
pub(crate) mod tiers_traits;

pub use tiers_errors::TierError;
pub use tiers_model::{NewPriceTier, PriceTier, TierSearchResponse, TierSort, TierUpdate};
pub use tiers_repository::TierRepository;
pub use tiers_service::TierService;
pub use tiers_traits::{TierRepositoryTrait, TierServiceTrait};
