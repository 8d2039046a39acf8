use crate::repository::Dataset;
use core_types::{CoreError, Dealer, InventorySnapshot, Period, SalesRecord, SoldQuantity};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn dealer(dealer_id: &str, name: &str, region: &str) -> Dealer {
    Dealer {
        dealer_id: dealer_id.to_string(),
        name: name.to_string(),
        region: region.to_string(),
    }
}

fn sale(
    dealer_id: &str,
    product_id: &str,
    year: u16,
    quarter: u8,
    quantity: u32,
    revenue: Decimal,
) -> Result<SalesRecord, CoreError> {
    SalesRecord::new(dealer_id, product_id, Period::new(year, quarter)?, quantity, revenue)
}

fn snapshot(dealer_id: &str, model: &str, begin_stock: u32, imported: u32, end_stock: u32) -> InventorySnapshot {
    InventorySnapshot {
        dealer_id: dealer_id.to_string(),
        model: model.to_string(),
        begin_stock,
        imported,
        end_stock,
    }
}

fn sold(dealer_id: &str, model: &str, sold: u32) -> SoldQuantity {
    SoldQuantity {
        dealer_id: dealer_id.to_string(),
        model: model.to_string(),
        sold,
    }
}

/// The built-in sample dataset used when no dataset file is configured.
///
/// 2025-Q3 totals per dealer: DL001 120 units / 60M, DL002 200 / 100M,
/// DL003 90 / 45M, DL004 60 / 36M, DL005 80 / 44M. DL999 has sales but no
/// dealer entry.
pub fn seed_dataset() -> Result<Dataset, CoreError> {
    let dealers = vec![
        dealer("DL001", "Hanoi Motors", "North"),
        dealer("DL002", "Saigon Auto", "South"),
        dealer("DL003", "Da Nang Cars", "Central"),
        dealer("DL004", "Hai Phong Auto", "North"),
        dealer("DL005", "Can Tho Motors", "South"),
    ];

    let sales = vec![
        // 2025-Q1
        sale("DL001", "VF5", 2025, 1, 80, dec!(40_000_000))?,
        sale("DL002", "VF8", 2025, 1, 120, dec!(60_000_000))?,
        sale("DL005", "VF5", 2025, 1, 30, dec!(16_500_000))?,
        // 2025-Q2
        sale("DL001", "VF5", 2025, 2, 100, dec!(50_000_000))?,
        sale("DL002", "VF8", 2025, 2, 140, dec!(70_000_000))?,
        sale("DL003", "VF5", 2025, 2, 100, dec!(50_000_000))?,
        sale("DL999", "VF5", 2025, 2, 10, dec!(5_000_000))?,
        // 2025-Q3
        sale("DL001", "VF5", 2025, 3, 120, dec!(60_000_000))?,
        sale("DL002", "VF8", 2025, 3, 160, dec!(80_000_000))?,
        sale("DL002", "VF5", 2025, 3, 40, dec!(20_000_000))?,
        sale("DL003", "VF5", 2025, 3, 90, dec!(45_000_000))?,
        sale("DL004", "VF8", 2025, 3, 60, dec!(36_000_000))?,
        sale("DL005", "VF5", 2025, 3, 80, dec!(44_000_000))?,
    ];

    let inventory = vec![
        snapshot("DL001", "VF5", 15, 10, 8),
        snapshot("DL001", "VF8", 5, 5, 6),
        snapshot("DL002", "VF8", 20, 30, 10),
        snapshot("DL003", "VF5", 0, 0, 0),
        snapshot("DL004", "VF8", 12, 8, 14),
        snapshot("DL005", "VF5", 10, 20, 12),
    ];

    let sold = vec![
        sold("DL001", "VF5", 17),
        sold("DL001", "VF8", 4),
        sold("DL002", "VF8", 40),
        sold("DL004", "VF8", 6),
        sold("DL005", "VF5", 18),
    ];

    Ok(Dataset {
        dealers,
        sales,
        inventory,
        sold,
    })
}
