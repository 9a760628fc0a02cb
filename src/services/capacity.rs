use rust_decimal::Decimal;

use crate::entities::product::UnitOfMeasure;
use crate::errors::ServiceError;

/// Capacity checks for vehicles and warehouses. Conversion factors are
/// injected from configuration; vehicle capacities are always in liters.
#[derive(Debug, Clone)]
pub struct CapacityValidator {
    liters_per_gallon: Decimal,
    liters_per_barrel: Decimal,
}

impl CapacityValidator {
    pub fn new(liters_per_gallon: Decimal, liters_per_barrel: Decimal) -> Self {
        Self {
            liters_per_gallon,
            liters_per_barrel,
        }
    }

    /// Converts a volume in the given unit of measure to liters.
    pub fn to_liters(&self, volume: Decimal, unit: UnitOfMeasure) -> Decimal {
        match unit {
            UnitOfMeasure::Liter => volume,
            UnitOfMeasure::Gallon => volume * self.liters_per_gallon,
            UnitOfMeasure::Barrel => volume * self.liters_per_barrel,
        }
    }

    /// Checks that a vehicle can carry the requested volume, comparing in
    /// liters.
    pub fn check_vehicle_capacity(
        &self,
        vehicle_capacity_liters: Decimal,
        requested_volume: Decimal,
        requested_unit: UnitOfMeasure,
    ) -> Result<(), ServiceError> {
        let requested_liters = self.to_liters(requested_volume, requested_unit);
        if requested_liters > vehicle_capacity_liters {
            return Err(ServiceError::CapacityExceeded {
                requested: requested_liters,
                deficit: requested_liters - vehicle_capacity_liters,
            });
        }
        Ok(())
    }

    /// Checks that a warehouse has room for additional stock: remaining
    /// capacity (total minus current usage) must cover the addition.
    pub fn check_warehouse_capacity(
        total_capacity: Decimal,
        used: Decimal,
        additional_volume: Decimal,
    ) -> Result<(), ServiceError> {
        let available = total_capacity - used;
        if additional_volume > available {
            return Err(ServiceError::CapacityExceeded {
                requested: additional_volume,
                deficit: additional_volume - available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn validator() -> CapacityValidator {
        CapacityValidator::new(dec!(3.78541), dec!(159))
    }

    #[test]
    fn converts_units_to_liters() {
        let v = validator();
        assert_eq!(v.to_liters(dec!(10), UnitOfMeasure::Liter), dec!(10));
        assert_eq!(v.to_liters(dec!(300), UnitOfMeasure::Gallon), dec!(1135.623));
        assert_eq!(v.to_liters(dec!(2), UnitOfMeasure::Barrel), dec!(318));
    }

    #[test]
    fn vehicle_too_small_for_gallon_order() {
        // 300 gallons is about 1135.6 L, over a 1000 L tank.
        let err = validator()
            .check_vehicle_capacity(dec!(1000), dec!(300), UnitOfMeasure::Gallon)
            .unwrap_err();
        match err {
            ServiceError::CapacityExceeded { requested, deficit } => {
                assert_eq!(requested, dec!(1135.623));
                assert_eq!(deficit, dec!(135.623));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn vehicle_large_enough_passes() {
        assert!(validator()
            .check_vehicle_capacity(dec!(1200), dec!(300), UnitOfMeasure::Gallon)
            .is_ok());
        assert!(validator()
            .check_vehicle_capacity(dec!(1000), dec!(1000), UnitOfMeasure::Liter)
            .is_ok());
    }

    #[test]
    fn warehouse_capacity_reports_deficit() {
        assert!(CapacityValidator::check_warehouse_capacity(dec!(500), dec!(200), dec!(300)).is_ok());
        let err = CapacityValidator::check_warehouse_capacity(dec!(500), dec!(450), dec!(100))
            .unwrap_err();
        match err {
            ServiceError::CapacityExceeded { deficit, .. } => assert_eq!(deficit, dec!(50)),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
