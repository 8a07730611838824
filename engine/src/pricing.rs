//! Age-tiered dynamic pricing with a financing-cost adjustment

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{EngineParameters, PricingPolicy};
use crate::models::{
    action_for, classify_age, urgency_for, InventoryItem, InventoryStatus, PriceAction, Urgency,
};
use crate::types::{percent_of, round_money, Days, Money, Rate, DAYS_PER_YEAR};

/// Days between collecting from the customer and paying the supplier; never negative
pub fn cash_gap(dso: Days, supplier_terms: Days) -> Days {
    dso.saturating_sub(supplier_terms)
}

pub fn daily_interest_rate(annual_interest_rate: Rate) -> Rate {
    annual_interest_rate / Decimal::from(DAYS_PER_YEAR)
}

/// Interest on `amount` for the financed period
pub fn financing_cost(
    amount: Money,
    dso: Days,
    supplier_terms: Days,
    annual_interest_rate: Rate,
) -> Money {
    amount * daily_interest_rate(annual_interest_rate) * Decimal::from(cash_gap(dso, supplier_terms))
}

pub fn age_multiplier(days_in_stock: Days, policy: &PricingPolicy) -> Decimal {
    policy.multiplier_for(classify_age(days_in_stock, policy))
}

/// Lowest price the engine will ever recommend
pub fn price_floor(cost_price: Money, policy: &PricingPolicy) -> Money {
    cost_price * policy.floor_ratio
}

/// Recommended unit price for stock of a given age sold on the given terms.
///
/// The tier multiplier gives a base price; the interest carried over the
/// cash gap is subtracted from it, and the result is bounded from below by
/// the price floor.
pub fn recommended_price(
    cost_price: Money,
    days_in_stock: Days,
    dso: Days,
    supplier_terms: Days,
    annual_interest_rate: Rate,
    policy: &PricingPolicy,
) -> Money {
    let base = cost_price * age_multiplier(days_in_stock, policy);
    let financing = financing_cost(base, dso, supplier_terms, annual_interest_rate);
    (base - financing).max(price_floor(cost_price, policy))
}

/// Customer terms and rate constants a batch of items is priced against
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    pub dso: Days,
    pub params: &'a EngineParameters,
}

impl<'a> PricingContext<'a> {
    pub fn new(dso: Days, params: &'a EngineParameters) -> Self {
        Self { dso, params }
    }

    pub fn price(&self, cost_price: Money, days_in_stock: Days) -> Money {
        recommended_price(
            cost_price,
            days_in_stock,
            self.dso,
            self.params.supplier_terms_days,
            self.params.annual_interest_rate,
            &self.params.pricing,
        )
    }
}

/// Pricing output for one inventory item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingRecommendation {
    pub id: u32,
    pub product: String,
    pub category: String,
    pub cost_price: Money,
    pub current_price: Money,
    pub recommended_price: Money,
    pub age_days: Days,
    pub status: InventoryStatus,
    pub action: PriceAction,
    pub urgency: Urgency,
    pub quantity: u32,
    /// Quantity at the recommended price
    pub total_value: Money,
    pub unit_profit: Money,
    /// Unit profit over cost, in percent
    pub margin_percent: Decimal,
    pub total_profit: Money,
    /// Cut from the current price, in percent; negative when the price should rise
    pub discount_percent: Decimal,
}

impl PricingRecommendation {
    /// Short human-readable instruction for the sales team
    pub fn message(&self) -> String {
        match self.action {
            PriceAction::SellImmediately => {
                format!("Sell now, stock is {} days old", self.age_days)
            }
            PriceAction::OfferDiscount => format!(
                "Offer a {}% discount ({})",
                self.discount_percent.round_dp(0),
                round_money(self.recommended_price)
            ),
            PriceAction::HoldOrSmallDiscount => {
                "Hold the price or offer a small discount".to_string()
            }
            PriceAction::HoldPrice => "Hold the price, stock is moving".to_string(),
        }
    }
}

pub fn recommend(item: &InventoryItem, ctx: &PricingContext<'_>) -> PricingRecommendation {
    let status = classify_age(item.days_in_stock, &ctx.params.pricing);
    let recommended = ctx.price(item.cost_price, item.days_in_stock);
    let quantity = Decimal::from(item.quantity);
    let unit_profit = recommended - item.cost_price;

    tracing::debug!(
        item_id = item.id,
        status = %status,
        recommended = %recommended,
        "Priced inventory item"
    );

    PricingRecommendation {
        id: item.id,
        product: item.name.clone(),
        category: item.category.clone(),
        cost_price: item.cost_price,
        current_price: item.selling_price,
        recommended_price: recommended,
        age_days: item.days_in_stock,
        status,
        action: action_for(status),
        urgency: urgency_for(status),
        quantity: item.quantity,
        total_value: recommended * quantity,
        unit_profit,
        margin_percent: percent_of(unit_profit, item.cost_price),
        total_profit: unit_profit * quantity,
        discount_percent: percent_of(item.selling_price - recommended, item.selling_price),
    }
}

/// Price every item, keeping input order
pub fn recommend_all(items: &[InventoryItem], ctx: &PricingContext<'_>) -> Vec<PricingRecommendation> {
    items.iter().map(|item| recommend(item, ctx)).collect()
}

/// Count of items per age class
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusCounts {
    pub fresh: usize,
    pub normal: usize,
    pub slow_moving: usize,
    pub dead_stock: usize,
}

impl StatusCounts {
    fn record(&mut self, status: InventoryStatus) {
        match status {
            InventoryStatus::Fresh => self.fresh += 1,
            InventoryStatus::Normal => self.normal += 1,
            InventoryStatus::SlowMoving => self.slow_moving += 1,
            InventoryStatus::DeadStock => self.dead_stock += 1,
        }
    }

    pub fn get(&self, status: InventoryStatus) -> usize {
        match status {
            InventoryStatus::Fresh => self.fresh,
            InventoryStatus::Normal => self.normal,
            InventoryStatus::SlowMoving => self.slow_moving,
            InventoryStatus::DeadStock => self.dead_stock,
        }
    }
}

/// Portfolio-level view of a priced inventory
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventorySummary {
    pub product_count: usize,
    pub status_counts: StatusCounts,
    pub total_value: Money,
    pub total_potential_profit: Money,
    pub average_margin_percent: Decimal,
    pub dead_stock_count: usize,
    /// `mean(current - recommended) / mean(current) * 100`
    pub average_discount_percent: Decimal,
}

pub fn summarize_inventory(recommendations: &[PricingRecommendation]) -> InventorySummary {
    if recommendations.is_empty() {
        return InventorySummary::default();
    }

    let mut summary = InventorySummary {
        product_count: recommendations.len(),
        ..InventorySummary::default()
    };
    let mut margin_sum = Decimal::ZERO;
    let mut current_sum = Decimal::ZERO;
    let mut cut_sum = Decimal::ZERO;

    for rec in recommendations {
        summary.status_counts.record(rec.status);
        summary.total_value += rec.total_value;
        summary.total_potential_profit += rec.total_profit;
        margin_sum += rec.margin_percent;
        current_sum += rec.current_price;
        cut_sum += rec.current_price - rec.recommended_price;
    }

    let count = Decimal::from(recommendations.len());
    summary.average_margin_percent = margin_sum / count;
    summary.dead_stock_count = summary.status_counts.dead_stock;
    // Both means share the same count, so it cancels out of the ratio
    summary.average_discount_percent = percent_of(cut_sum, current_sum);
    summary
}

/// What to do with a quoted price compared to the current one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum PriceAdvice {
    Decrease {
        discount_percent: Decimal,
        /// Total saved by the customer over the quoted quantity
        customer_savings: Money,
    },
    Increase {
        gain_per_unit: Money,
        additional_revenue: Money,
    },
    Hold,
}

impl std::fmt::Display for PriceAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceAdvice::Decrease {
                discount_percent,
                customer_savings,
            } => write!(
                f,
                "Lower the price by {}% (customer saves {})",
                discount_percent.round_dp(1),
                round_money(*customer_savings)
            ),
            PriceAdvice::Increase {
                gain_per_unit,
                additional_revenue,
            } => write!(
                f,
                "Raise the price by {} per unit (additional revenue {})",
                round_money(*gain_per_unit),
                round_money(*additional_revenue)
            ),
            PriceAdvice::Hold => write!(f, "Hold the current price"),
        }
    }
}

pub fn price_advice(current_price: Money, recommended: Money, quantity: u32) -> PriceAdvice {
    let quantity = Decimal::from(quantity);
    if recommended < current_price {
        PriceAdvice::Decrease {
            discount_percent: percent_of(current_price - recommended, current_price),
            customer_savings: (current_price - recommended) * quantity,
        }
    } else if recommended > current_price {
        let gain_per_unit = recommended - current_price;
        PriceAdvice::Increase {
            gain_per_unit,
            additional_revenue: gain_per_unit * quantity,
        }
    } else {
        PriceAdvice::Hold
    }
}
