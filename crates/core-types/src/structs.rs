use crate::error::CoreError;
use crate::period::Period;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sales outlet. `dealer_id` is the join key into `SalesRecord` and must be
/// unique within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dealer {
    pub dealer_id: String,
    pub name: String,
    pub region: String,
}

/// Units sold and revenue earned by one dealer for one product in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub dealer_id: String,
    #[serde(alias = "vehicleId")]
    pub product_id: String,
    pub period: Period,
    pub quantity: u32,
    pub revenue: Decimal,
}

impl SalesRecord {
    /// Builds a validated record. Revenue must not be negative.
    pub fn new(
        dealer_id: impl Into<String>,
        product_id: impl Into<String>,
        period: Period,
        quantity: u32,
        revenue: Decimal,
    ) -> Result<Self, CoreError> {
        let record = Self {
            dealer_id: dealer_id.into(),
            product_id: product_id.into(),
            period,
            quantity,
            revenue,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.dealer_id.trim().is_empty() {
            return Err(CoreError::validation("dealerId", "must not be empty"));
        }
        if self.revenue < Decimal::ZERO {
            return Err(CoreError::validation(
                "revenue",
                format!("{} is negative for dealer {}", self.revenue, self.dealer_id),
            ));
        }
        Ok(())
    }

    /// The (dealer, product) group this record belongs to for forecasting.
    pub fn forecast_key(&self) -> ForecastKey {
        ForecastKey::new(self.dealer_id.clone(), self.product_id.clone())
    }
}

/// Stock position of one model at one dealer over a reporting interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    pub dealer_id: String,
    pub model: String,
    pub begin_stock: u32,
    pub imported: u32,
    pub end_stock: u32,
}

impl InventorySnapshot {
    /// `begin + imported - sold - end`. Zero when the snapshot balances.
    pub fn stock_discrepancy(&self, sold: u32) -> i64 {
        i64::from(self.begin_stock) + i64::from(self.imported) - i64::from(sold) - i64::from(self.end_stock)
    }
}

/// Units of a model sold by a dealer, joined onto `InventorySnapshot` by
/// `(dealer_id, model)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldQuantity {
    pub dealer_id: String,
    pub model: String,
    pub sold: u32,
}

/// Composite grouping key for demand forecasts.
///
/// Structural equality on both parts, so ids containing any delimiter can
/// never collide the way a concatenated string key would.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastKey {
    pub dealer_id: String,
    pub product_id: String,
}

impl ForecastKey {
    pub fn new(dealer_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            dealer_id: dealer_id.into(),
            product_id: product_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn q3() -> Period {
        "2025-Q3".parse().unwrap()
    }

    #[test]
    fn rejects_negative_revenue() {
        let err = SalesRecord::new("DL001", "VF5", q3(), 1, dec!(-10)).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "revenue"));
    }

    #[test]
    fn accepts_zero_revenue() {
        assert!(SalesRecord::new("DL001", "VF5", q3(), 0, dec!(0)).is_ok());
    }

    #[test]
    fn forecast_keys_do_not_collide_on_concatenation() {
        let a = ForecastKey::new("DL1", "0VF5");
        let b = ForecastKey::new("DL10", "VF5");
        assert_ne!(a, b);
    }

    #[test]
    fn stock_discrepancy_is_zero_for_balanced_snapshot() {
        let snapshot = InventorySnapshot {
            dealer_id: "DL001".into(),
            model: "VF5".into(),
            begin_stock: 15,
            imported: 10,
            end_stock: 8,
        };
        assert_eq!(snapshot.stock_discrepancy(17), 0);
        assert_eq!(snapshot.stock_discrepancy(10), 7);
    }

    #[test]
    fn sales_record_accepts_vehicle_id_alias() {
        let json = r#"{"dealerId":"DL001","vehicleId":"VF8","period":"2025-Q3","quantity":3,"revenue":"1500"}"#;
        let record: SalesRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.product_id, "VF8");
        assert_eq!(record.revenue, dec!(1500));
    }
}
