pub(crate) mod products_model;
pub(crate) mod products_repository;
pub(crate) mod products_service;
pub(crate) mod products_traits;

pub use products_model::{
    AppliedRow, ApplyOutcome, Product, ProductUpsert, ProductVariant, TierPriceOverride,
    UpsertDecision, VariantInput,
};
pub use products_repository::ProductRepository;
pub use products_service::ProductService;
pub use products_traits::{ProductCatalogTrait, ProductRepositoryTrait};
