//! Pricing service: single-item quotes and whole-inventory pricing runs

use engine::dataset::{load_inventory_or_sample, InventoryLoad};
use engine::pricing::{
    age_multiplier, cash_gap, financing_cost, price_advice, price_floor, recommend,
    recommend_all, summarize_inventory, PricingContext,
};
use engine::recommendations::inventory_advice;
use engine::{EngineParameters, InventoryItem, DEFAULT_CATEGORY};

use crate::config::InventoryConfig;
use crate::error::{AppError, AppResult};
use crate::models::{InventoryReport, QuoteRequest, QuoteResponse};

/// Pricing service bound to the configured parameters and inventory source
#[derive(Clone)]
pub struct PricingService {
    params: EngineParameters,
    inventory: InventoryConfig,
}

impl PricingService {
    pub fn new(params: EngineParameters, inventory: InventoryConfig) -> Self {
        Self { params, inventory }
    }

    /// Price one item on the given terms, with any per-request overrides applied
    pub fn quote(&self, req: &QuoteRequest) -> AppResult<QuoteResponse> {
        let params = req.parameters.apply(&self.params)?;
        let ctx = PricingContext::new(req.dso, &params);

        let item = InventoryItem {
            id: 0,
            name: "quote".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            cost_price: req.cost_price,
            selling_price: req.current_price,
            quantity: req.quantity,
            days_in_stock: req.days_in_stock,
            min_stock: None,
            supplier: None,
        };
        let rec = recommend(&item, &ctx);

        let base = req.cost_price * age_multiplier(req.days_in_stock, &params.pricing);
        let financing = financing_cost(
            base,
            req.dso,
            params.supplier_terms_days,
            params.annual_interest_rate,
        );

        tracing::info!(
            cost = %req.cost_price,
            days_in_stock = req.days_in_stock,
            dso = req.dso,
            recommended = %rec.recommended_price,
            "Quoted price"
        );

        Ok(QuoteResponse {
            recommended_price: rec.recommended_price,
            price_floor: price_floor(req.cost_price, &params.pricing),
            status: rec.status,
            action: rec.action,
            urgency: rec.urgency,
            cash_gap_days: cash_gap(req.dso, params.supplier_terms_days),
            financing_cost: financing,
            unit_profit: rec.unit_profit,
            total_value: rec.total_value,
            discount_percent: rec.discount_percent,
            advice: price_advice(req.current_price, rec.recommended_price, req.quantity),
            message: rec.message(),
        })
    }

    /// Price the configured inventory, falling back to sample data
    pub async fn inventory_report(&self, dso: Option<u32>) -> AppResult<InventoryReport> {
        let dso = dso.unwrap_or_else(|| self.inventory.dso());
        let load = self.load_inventory().await?;

        let ctx = PricingContext::new(dso, &self.params);
        let items = recommend_all(&load.items, &ctx);
        let summary = summarize_inventory(&items);
        let advice = inventory_advice(&items)
            .iter()
            .map(ToString::to_string)
            .collect();

        tracing::info!(
            dso,
            items = items.len(),
            dead_stock = summary.dead_stock_count,
            "Inventory priced"
        );

        Ok(InventoryReport {
            dso,
            source: load.source,
            warning: load.warning,
            items,
            summary,
            advice,
        })
    }

    async fn load_inventory(&self) -> AppResult<InventoryLoad> {
        let path = self.inventory.csv_path.clone();
        tokio::task::spawn_blocking(move || load_inventory_or_sample(path.as_deref()))
            .await
            .map_err(|e| AppError::Internal(format!("Inventory load task failed: {}", e)))
    }
}
