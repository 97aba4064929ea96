use rust_decimal::Decimal;

use crate::Result;

/// Channel-scoped tax adjustment applied to base prices.
pub trait TaxStrategyTrait: Send + Sync {
    fn price_including_tax(&self, channel_id: &str, base_price: Decimal) -> Decimal;
}

/// Trait defining the contract for resolving effective tier prices.
pub trait PricingServiceTrait: Send + Sync {
    /// Returns the tier price for a variant in a channel; `Decimal::ZERO`
    /// when the variant price or link does not exist ("unset" is a valid,
    /// non-exceptional state).
    fn get_price(&self, variant_id: &str, channel_id: &str, tier_id: &str) -> Result<Decimal>;

    /// Same lookup, with the channel tax strategy applied to the base price
    /// beforehand. The tier override amount itself is returned untouched.
    fn get_price_with_tax(
        &self,
        variant_id: &str,
        channel_id: &str,
        tier_id: &str,
    ) -> Result<Decimal>;
}
