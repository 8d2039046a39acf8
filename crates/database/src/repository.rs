use crate::DbError;
use core_types::{CoreError, Dealer, InventorySnapshot, SalesRecord, SoldQuantity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Every record the analytics read, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub dealers: Vec<Dealer>,
    #[serde(default)]
    pub sales: Vec<SalesRecord>,
    #[serde(default)]
    pub inventory: Vec<InventorySnapshot>,
    #[serde(default)]
    pub sold: Vec<SoldQuantity>,
}

impl Dataset {
    /// Checks the invariants the analytics rely on.
    ///
    /// Inventory snapshots that do not balance against sold units are accepted;
    /// the turnover report surfaces the discrepancy instead.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(self.dealers.len());
        for dealer in &self.dealers {
            if dealer.dealer_id.trim().is_empty() {
                return Err(CoreError::validation("dealerId", "must not be empty"));
            }
            if !seen.insert(dealer.dealer_id.as_str()) {
                return Err(CoreError::validation(
                    "dealerId",
                    format!("'{}' is defined more than once", dealer.dealer_id),
                ));
            }
        }

        for record in &self.sales {
            record.validate()?;
        }
        Ok(())
    }
}

/// The `DataRepository` provides read access to the validated dataset.
#[derive(Debug, Clone)]
pub struct DataRepository {
    dataset: Arc<Dataset>,
}

impl DataRepository {
    /// Validates `dataset` and wraps it for shared, read-only use.
    pub fn new(dataset: Dataset) -> Result<Self, DbError> {
        dataset.validate()?;
        tracing::info!(
            dealers = dataset.dealers.len(),
            sales = dataset.sales.len(),
            inventory = dataset.inventory.len(),
            sold = dataset.sold.len(),
            "Dataset loaded."
        );
        Ok(Self {
            dataset: Arc::new(dataset),
        })
    }

    pub fn dealers(&self) -> &[Dealer] {
        &self.dataset.dealers
    }

    pub fn sales(&self) -> &[SalesRecord] {
        &self.dataset.sales
    }

    pub fn inventory(&self) -> &[InventorySnapshot] {
        &self.dataset.inventory
    }

    pub fn sold(&self) -> &[SoldQuantity] {
        &self.dataset.sold
    }
}
