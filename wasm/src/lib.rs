//! WebAssembly bindings for the pricing & profitability engine
//!
//! Provides client-side computation for:
//! - Recommended prices for a single item or a pasted inventory CSV
//! - Customer real-profit analysis
//! - Cash-flow projections
//!
//! Structured inputs and outputs cross the boundary as JSON strings and use
//! the default engine parameters.

use engine::cash_flow::project;
use engine::dataset::{read_inventory, sample_inventory};
use engine::pricing::{recommend_all, PricingContext};
use engine::profitability::analyze;
use engine::recommendations::customer_advice;
use engine::{CashFlowAssumptions, CostOptions, Customer, EngineError, EngineParameters};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_decimal(value: f64, field: &str) -> Result<Decimal, JsValue> {
    Decimal::try_from(value)
        .map_err(|_| JsValue::from_str(&format!("{} is not a finite number", field)))
}

fn engine_error(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

fn parse_customer(customer_json: &str) -> Result<Customer, JsValue> {
    let customer: Customer = serde_json::from_str(customer_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid customer JSON: {}", e)))?;
    customer.validate().map_err(engine_error)?;
    Ok(customer)
}

/// Recommended unit price with the default tiers and rates
#[wasm_bindgen]
pub fn recommended_price(cost_price: f64, days_in_stock: u32, dso: u32) -> Result<f64, JsValue> {
    let params = EngineParameters::default();
    let cost_price = to_decimal(cost_price, "cost_price")?;
    let price = PricingContext::new(dso, &params).price(cost_price, days_in_stock);
    price
        .round_dp(2)
        .to_f64()
        .ok_or_else(|| JsValue::from_str("price is out of range"))
}

/// Price every row of an inventory CSV; falls back to the sample products
/// when the text cannot be parsed
#[wasm_bindgen]
pub fn price_inventory_csv(csv_text: &str, dso: u32) -> Result<String, JsValue> {
    let items = match read_inventory(csv_text.as_bytes()) {
        Ok(items) if !items.is_empty() => items,
        Ok(_) => {
            web_sys::console::warn_1(&"Inventory CSV has no rows, using sample data".into());
            sample_inventory()
        }
        Err(e) => {
            let warning = format!("Inventory CSV rejected ({}), using sample data", e);
            web_sys::console::warn_1(&warning.into());
            sample_inventory()
        }
    };

    let params = EngineParameters::default();
    to_json(&recommend_all(&items, &PricingContext::new(dso, &params)))
}

/// Analyse a customer given as JSON; returns the analysis as JSON
#[wasm_bindgen]
pub fn analyze_customer(customer_json: &str) -> Result<String, JsValue> {
    let customer = parse_customer(customer_json)?;
    let analysis = analyze(&customer, &EngineParameters::default(), &CostOptions::default())
        .map_err(engine_error)?;
    to_json(&analysis)
}

/// Advice lines for a customer; empty when the customer has no transactions
#[wasm_bindgen]
pub fn customer_advice_lines(customer_json: &str) -> Result<js_sys::Array, JsValue> {
    let customer = parse_customer(customer_json)?;
    let params = EngineParameters::default();
    let lines = js_sys::Array::new();
    let analysis = analyze(&customer, &params, &CostOptions::default()).map_err(engine_error)?;
    if let Some(report) = analysis.report() {
        for advice in customer_advice(&customer, report, &params) {
            lines.push(&JsValue::from_str(&advice.to_string()));
        }
    }
    Ok(lines)
}

/// Twelve-month projection from assumptions given as JSON
#[wasm_bindgen]
pub fn project_cash_flow(assumptions_json: &str) -> Result<String, JsValue> {
    let assumptions: CashFlowAssumptions = serde_json::from_str(assumptions_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid assumptions JSON: {}", e)))?;
    let projection = project(&assumptions).map_err(engine_error)?;
    to_json(&projection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommended_price() {
        let price = recommended_price(10.5, 45, 83).unwrap();
        assert!((price - 13.06).abs() < 0.001);
    }

    #[test]
    fn test_price_inventory_csv() {
        let csv = "id,name,cost,price,days,quantity\n1,Cement,6.00,8.50,20,100\n";
        let json = price_inventory_csv(csv, 60).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["status"], "fresh");
    }

    #[test]
    fn test_analyze_customer_without_transactions() {
        let json = analyze_customer(r#"{"name": "Nobody", "dso": 30}"#).unwrap();
        assert!(json.contains("no_data"));
    }

    #[test]
    fn test_analyze_customer_report() {
        let customer = r#"{
            "name": "Gradevinar DOO", "dso": 110, "customer_type": "large",
            "payment_history": "0.85",
            "transactions": [{"product": "Cement 25kg", "quantity": 200,
                "cost_price": "10.50", "selling_price": "15.75", "days_in_stock": 45}]
        }"#;
        let json = analyze_customer(customer).unwrap();
        let analysis: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(analysis["result"], "report");
        assert_eq!(analysis["total_sales"], "3150.00");
    }

    #[test]
    fn test_project_cash_flow_defaults() {
        let assumptions = serde_json::to_string(&CashFlowAssumptions::default()).unwrap();
        let json = project_cash_flow(&assumptions).unwrap();
        let projection: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(projection["months"].as_array().unwrap().len(), 12);
    }
}
