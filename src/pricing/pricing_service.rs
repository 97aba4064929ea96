use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;

use crate::matrix::MatrixRepositoryTrait;
use crate::Result;

use super::pricing_traits::{PricingServiceTrait, TaxStrategyTrait};

/// Flat-rate tax per channel, falling back to a default rate.
pub struct FlatRateTaxStrategy {
    rates: HashMap<String, Decimal>,
    default_rate: Decimal,
}

impl FlatRateTaxStrategy {
    pub fn new(default_rate: Decimal) -> Self {
        Self {
            rates: HashMap::new(),
            default_rate,
        }
    }

    pub fn with_channel_rate(mut self, channel_id: &str, rate: Decimal) -> Self {
        self.rates.insert(channel_id.to_string(), rate);
        self
    }
}

impl TaxStrategyTrait for FlatRateTaxStrategy {
    fn price_including_tax(&self, channel_id: &str, base_price: Decimal) -> Decimal {
        let rate = self.rates.get(channel_id).unwrap_or(&self.default_rate);
        base_price * (Decimal::ONE + rate)
    }
}

/// Resolves effective tier prices from the price matrix.
pub struct PricingService {
    matrix_repository: Arc<dyn MatrixRepositoryTrait>,
    tax_strategy: Arc<dyn TaxStrategyTrait>,
}

impl PricingService {
    /// Creates a new PricingService instance with injected dependencies
    pub fn new(
        matrix_repository: Arc<dyn MatrixRepositoryTrait>,
        tax_strategy: Arc<dyn TaxStrategyTrait>,
    ) -> Self {
        Self {
            matrix_repository,
            tax_strategy,
        }
    }

    fn link_price(&self, variant_price_id: &str, tier_id: &str) -> Result<Decimal> {
        match self.matrix_repository.get_link(variant_price_id, tier_id)? {
            Some(link) => Ok(Decimal::from_f64(link.price).unwrap_or_default()),
            None => Ok(Decimal::ZERO),
        }
    }
}

impl PricingServiceTrait for PricingService {
    fn get_price(&self, variant_id: &str, channel_id: &str, tier_id: &str) -> Result<Decimal> {
        let variant_price = match self
            .matrix_repository
            .get_variant_price(variant_id, channel_id)?
        {
            Some(vp) => vp,
            None => return Ok(Decimal::ZERO),
        };

        self.link_price(&variant_price.id, tier_id)
    }

    fn get_price_with_tax(
        &self,
        variant_id: &str,
        channel_id: &str,
        tier_id: &str,
    ) -> Result<Decimal> {
        let variant_price = match self
            .matrix_repository
            .get_variant_price(variant_id, channel_id)?
        {
            Some(vp) => vp,
            None => return Ok(Decimal::ZERO),
        };

        // The channel adjustment covers the base price only; tier override
        // amounts are looked up afterwards and returned without re-applying
        // tax to them.
        let base = Decimal::from_f64(variant_price.base_price).unwrap_or_default();
        let base_with_tax = self.tax_strategy.price_including_tax(channel_id, base);
        debug!(
            "Variant {} channel {}: base {} including tax {}",
            variant_id, channel_id, base, base_with_tax
        );

        self.link_price(&variant_price.id, tier_id)
    }
}
