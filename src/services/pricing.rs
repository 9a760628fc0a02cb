use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::product::{self, Entity as ProductEntity};
use crate::errors::ServiceError;

/// Tax-inclusive price breakdown for an order. Full precision is kept;
/// rounding for display is the presentation layer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Resolves unit prices and computes tax-inclusive totals.
#[derive(Clone)]
pub struct PricingService {
    db: Arc<DbPool>,
    tax_rate: Decimal,
}

impl PricingService {
    pub fn new(db: Arc<DbPool>, tax_rate: Decimal) -> Self {
        Self { db, tax_rate }
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Returns the explicit price when the caller supplied one, otherwise
    /// the product's catalog price.
    #[instrument(skip(self))]
    pub async fn resolve_unit_price(
        &self,
        product_id: Uuid,
        explicit_price: Option<Decimal>,
    ) -> Result<Decimal, ServiceError> {
        if let Some(price) = explicit_price {
            if price <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Unit price must be positive".to_string(),
                ));
            }
            return Ok(price);
        }

        let product = ProductEntity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or(ServiceError::ProductNotFound(product_id))?;

        Ok(product.unit_price)
    }

    /// `subtotal = unit_price * volume`, `tax = subtotal * tax_rate`,
    /// `total = subtotal + tax`. Deterministic, no rounding.
    pub fn compute_total(&self, unit_price: Decimal, volume: Decimal) -> PriceBreakdown {
        let subtotal = unit_price * volume;
        let tax = subtotal * self.tax_rate;
        PriceBreakdown {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::DatabaseConnection;

    fn service() -> PricingService {
        PricingService::new(Arc::new(DatabaseConnection::Disconnected), dec!(0.18))
    }

    #[test]
    fn tax_inclusive_total() {
        let breakdown = service().compute_total(dec!(10), dec!(5));
        assert_eq!(breakdown.subtotal, dec!(50));
        assert_eq!(breakdown.tax, dec!(9));
        assert_eq!(breakdown.total, dec!(59));
    }

    #[test]
    fn fractional_volumes_keep_full_precision() {
        let breakdown = service().compute_total(dec!(3.25), dec!(12.4));
        assert_eq!(breakdown.subtotal, dec!(40.3));
        assert_eq!(breakdown.tax, dec!(7.254));
        assert_eq!(breakdown.total, dec!(47.554));
    }

    #[tokio::test]
    async fn explicit_price_wins_without_touching_catalog() {
        // Disconnected DB: any catalog lookup would error, so success proves
        // the explicit price short-circuits.
        let price = service()
            .resolve_unit_price(Uuid::new_v4(), Some(dec!(12.50)))
            .await
            .unwrap();
        assert_eq!(price, dec!(12.50));
    }

    #[tokio::test]
    async fn explicit_price_must_be_positive() {
        let err = service()
            .resolve_unit_price(Uuid::new_v4(), Some(dec!(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }
}
