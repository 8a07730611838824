//! Inventory models and age classification

use serde::{Deserialize, Serialize};

use crate::config::PricingPolicy;
use crate::error::{check, EngineResult};
use crate::types::{Days, Money};
use crate::validation::{validate_name, validate_non_negative};

pub const DEFAULT_CATEGORY: &str = "General";

/// A stock-keeping item as loaded for one calculation pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub cost_price: Money,
    /// Current list price
    pub selling_price: Money,
    pub quantity: u32,
    pub days_in_stock: Days,
    pub min_stock: Option<u32>,
    pub supplier: Option<String>,
}

impl InventoryItem {
    /// Create a validated inventory item in the default category
    pub fn new(
        id: u32,
        name: impl Into<String>,
        cost_price: Money,
        selling_price: Money,
        days_in_stock: Days,
        quantity: u32,
    ) -> EngineResult<Self> {
        let item = Self {
            id,
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            cost_price,
            selling_price,
            quantity,
            days_in_stock,
            min_stock: None,
            supplier: None,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_min_stock(mut self, min_stock: u32) -> Self {
        self.min_stock = Some(min_stock);
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        check("name", validate_name(&self.name))?;
        check("cost_price", validate_non_negative(self.cost_price))?;
        check("selling_price", validate_non_negative(self.selling_price))
    }

    /// Stock value at cost
    pub fn stock_value(&self) -> Money {
        self.cost_price * Money::from(self.quantity)
    }

    pub fn is_below_min_stock(&self) -> bool {
        self.min_stock.is_some_and(|min| self.quantity < min)
    }
}

/// Inventory age class
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    Fresh,
    Normal,
    SlowMoving,
    /// Aged beyond the last tier; cleared at a loss
    DeadStock,
}

impl std::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryStatus::Fresh => write!(f, "Fresh"),
            InventoryStatus::Normal => write!(f, "Normal"),
            InventoryStatus::SlowMoving => write!(f, "Slow Moving"),
            InventoryStatus::DeadStock => write!(f, "Dead Stock"),
        }
    }
}

/// Classify inventory age; thresholds are inclusive upper bounds
pub fn classify_age(days_in_stock: Days, policy: &PricingPolicy) -> InventoryStatus {
    if days_in_stock > policy.slow_moving_max_days {
        InventoryStatus::DeadStock
    } else if days_in_stock > policy.normal_max_days {
        InventoryStatus::SlowMoving
    } else if days_in_stock > policy.fresh_max_days {
        InventoryStatus::Normal
    } else {
        InventoryStatus::Fresh
    }
}

/// What the sales team should do with an item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceAction {
    SellImmediately,
    OfferDiscount,
    HoldOrSmallDiscount,
    HoldPrice,
}

impl std::fmt::Display for PriceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceAction::SellImmediately => write!(f, "Sell immediately"),
            PriceAction::OfferDiscount => write!(f, "Offer discount"),
            PriceAction::HoldOrSmallDiscount => write!(f, "Hold or small discount"),
            PriceAction::HoldPrice => write!(f, "Hold price"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::Low => write!(f, "Low"),
            Urgency::Medium => write!(f, "Medium"),
            Urgency::High => write!(f, "High"),
            Urgency::Critical => write!(f, "Critical"),
        }
    }
}

pub fn action_for(status: InventoryStatus) -> PriceAction {
    match status {
        InventoryStatus::DeadStock => PriceAction::SellImmediately,
        InventoryStatus::SlowMoving => PriceAction::OfferDiscount,
        InventoryStatus::Normal => PriceAction::HoldOrSmallDiscount,
        InventoryStatus::Fresh => PriceAction::HoldPrice,
    }
}

pub fn urgency_for(status: InventoryStatus) -> Urgency {
    match status {
        InventoryStatus::DeadStock => Urgency::Critical,
        InventoryStatus::SlowMoving => Urgency::High,
        InventoryStatus::Normal => Urgency::Medium,
        InventoryStatus::Fresh => Urgency::Low,
    }
}
