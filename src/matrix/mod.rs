pub(crate) mod matrix_model;
pub(crate) mod matrix_repository;
pub(crate) mod matrix_service;
pub(crate) mod matrix_traits;

pub use matrix_model::{TierPriceLink, VariantPrice};
pub use matrix_repository::MatrixRepository;
pub use matrix_service::MatrixService;
pub use matrix_traits::{MatrixRepositoryTrait, MatrixServiceTrait};
