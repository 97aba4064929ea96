pub(crate) mod pricing_service;
pub(crate) mod pricing_traits;

pub use pricing_service::{FlatRateTaxStrategy, PricingService};
pub use pricing_traits::{PricingServiceTrait, TaxStrategyTrait};
