//! Inventory CSV loading and built-in sample data

use std::io;
use std::path::{Path, PathBuf};

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Customer, CustomerType, InventoryItem, Transaction, DEFAULT_CATEGORY};
use crate::types::{Days, Money};

/// One row of an inventory file: `id,name,cost,price,days,quantity[,category]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryRecord {
    pub id: u32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub cost: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Money,
    #[serde(alias = "daysInStock", alias = "days_in_stock")]
    pub days: Days,
    pub quantity: u32,
    #[serde(default)]
    pub category: Option<String>,
}

impl InventoryRecord {
    pub fn into_item(self) -> EngineResult<InventoryItem> {
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        Ok(InventoryItem::new(self.id, self.name, self.cost, self.price, self.days, self.quantity)?
            .with_category(category))
    }
}

/// Parse inventory rows; any missing or unparseable field fails the whole load
pub fn read_inventory<R: io::Read>(reader: R) -> EngineResult<Vec<InventoryItem>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut items = Vec::new();
    for (row, record) in rdr.deserialize::<InventoryRecord>().enumerate() {
        let item = record?.into_item().map_err(|e| match e {
            EngineError::InvalidInput { field, message } => {
                EngineError::invalid(format!("row {}: {field}", row + 1), message)
            }
            other => other,
        })?;
        items.push(item);
    }
    Ok(items)
}

pub fn read_inventory_file(path: impl AsRef<Path>) -> EngineResult<Vec<InventoryItem>> {
    let file = std::fs::File::open(path)?;
    read_inventory(file)
}

/// Where a loaded inventory came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "path", rename_all = "snake_case")]
pub enum InventorySource {
    File(PathBuf),
    Sample,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryLoad {
    pub items: Vec<InventoryItem>,
    pub source: InventorySource,
    /// Set when the file could not be used and the sample data was substituted
    pub warning: Option<String>,
}

/// Load inventory from `path`, falling back to the sample dataset.
///
/// A missing path, an unreadable file, a malformed row or an empty file all
/// produce the sample dataset together with a warning; this never fails.
pub fn load_inventory_or_sample(path: Option<&Path>) -> InventoryLoad {
    let Some(path) = path else {
        return InventoryLoad {
            items: sample_inventory(),
            source: InventorySource::Sample,
            warning: None,
        };
    };

    let failure = match read_inventory_file(path) {
        Ok(items) if !items.is_empty() => {
            tracing::info!(path = %path.display(), count = items.len(), "Loaded inventory");
            return InventoryLoad {
                items,
                source: InventorySource::File(path.to_path_buf()),
                warning: None,
            };
        }
        Ok(_) => "file contains no products".to_string(),
        Err(e) => e.to_string(),
    };

    let warning = format!(
        "Could not load inventory from {}: {}. Using sample data instead.",
        path.display(),
        failure
    );
    tracing::warn!("{}", warning);
    InventoryLoad {
        items: sample_inventory(),
        source: InventorySource::Sample,
        warning: Some(warning),
    }
}

fn sample_item(
    id: u32,
    name: &str,
    cost: Money,
    price: Money,
    days: Days,
    quantity: u32,
    category: &str,
) -> InventoryItem {
    InventoryItem {
        id,
        name: name.to_string(),
        category: category.to_string(),
        cost_price: cost,
        selling_price: price,
        quantity,
        days_in_stock: days,
        min_stock: None,
        supplier: None,
    }
}

/// Five building-materials products covering every age class
pub fn sample_inventory() -> Vec<InventoryItem> {
    vec![
        sample_item(1, "Cement 25kg", dec!(10.50), dec!(15.75), 45, 100, "Construction"),
        sample_item(2, "Šperploča 18mm", dec!(8.20), dec!(13.50), 120, 50, "Construction"),
        sample_item(3, "Gvozdeni šip 6mm", dec!(15.00), dec!(22.50), 210, 20, "Metal"),
        sample_item(4, "Boja bijela 10L", dec!(18.00), dec!(27.00), 15, 30, "Paint"),
        sample_item(5, "PVC cijev 50mm", dec!(3.50), dec!(6.00), 250, 150, "Plumbing"),
    ]
}

/// A large, slow-paying construction customer
pub fn sample_customer() -> Customer {
    let transaction = |product: &str, quantity, cost, selling, days| Transaction {
        product: product.to_string(),
        quantity,
        cost_price: cost,
        selling_price: selling,
        days_in_stock: days,
    };

    Customer {
        name: "Gradevinar DOO".to_string(),
        dso: 110,
        customer_type: CustomerType::Large,
        payment_history: dec!(0.85),
        transactions: vec![
            transaction("Cement 25kg", 400, dec!(10.50), dec!(15.75), 45),
            transaction("Šperploča 18mm", 60, dec!(8.20), dec!(13.50), 120),
            transaction("Gvozdeni šip 6mm", 40, dec!(15.00), dec!(22.50), 210),
        ],
    }
}
