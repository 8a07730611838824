//! Advisory messages derived from pricing, profitability and cash-flow results

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::EngineParameters;
use crate::models::{CashFlowProjection, CostCategory, Customer, InventoryStatus, ProfitabilityReport};
use crate::pricing::PricingRecommendation;
use crate::types::{round_money, Days, Money};

/// Extra days past supplier terms a customer may take before we push back
pub const DSO_TOLERANCE_DAYS: Days = 30;
/// Extra days past supplier terms we ask a slow payer to commit to
pub const NEGOTIATION_TARGET_DAYS: Days = 15;
/// Storage above this share of real profit means the customer buys slow stock
pub const STORAGE_PROFIT_SHARE: Decimal = dec!(0.3);
pub const MIN_HEALTHY_MARGIN: Decimal = dec!(0.05);
/// Cash conversion cycles above this many days are flagged
pub const CCC_ALERT_DAYS: i64 = 60;
pub const BEST_PERFORMER_LIMIT: usize = 3;

/// A single piece of advice, rendered for people through `Display`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advice {
    NegotiateShorterTerms { current_dso: Days, target_dso: Days },
    OfferEarlyPaymentDiscount { min_percent: u32, max_percent: u32 },
    SteerToFasterMovingGoods,
    ReduceStockHoldingTime,
    ConsiderPriceIncrease,
    LimitRangeOrVolume,
    CustomerIsHealthy,
    ClearDeadStock { product: String, price: Money, age_days: Days },
    HoldBestPerformer { product: String, margin_percent: Decimal },
    ArrangeFinancing { amount: Money, before_month: u32 },
    ShortenCashConversionCycle { days: i64 },
    CollectFasterThanPaying { dso: Days, dpo: Days },
    CashFlowHealthy,
}

impl std::fmt::Display for Advice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advice::NegotiateShorterTerms {
                current_dso,
                target_dso,
            } => write!(
                f,
                "Negotiate payment terms down from {current_dso} to {target_dso} days"
            ),
            Advice::OfferEarlyPaymentDiscount {
                min_percent,
                max_percent,
            } => write!(
                f,
                "Offer a {min_percent}-{max_percent}% discount for early payment"
            ),
            Advice::SteerToFasterMovingGoods => {
                write!(f, "Steer the customer towards faster-moving goods")
            }
            Advice::ReduceStockHoldingTime => write!(f, "Reduce the average stock holding time"),
            Advice::ConsiderPriceIncrease => {
                write!(f, "Consider raising prices for this customer")
            }
            Advice::LimitRangeOrVolume => write!(f, "Limit the product range or volume"),
            Advice::CustomerIsHealthy => {
                write!(f, "This customer is profitable, keep the current terms")
            }
            Advice::ClearDeadStock {
                product,
                price,
                age_days,
            } => write!(
                f,
                "Sell {product} immediately at {} ({age_days} days old)",
                round_money(*price)
            ),
            Advice::HoldBestPerformer {
                product,
                margin_percent,
            } => write!(
                f,
                "Hold the price of {product} ({}% margin)",
                margin_percent.round_dp(1)
            ),
            Advice::ArrangeFinancing {
                amount,
                before_month,
            } => write!(
                f,
                "Arrange financing of {} before month {before_month}",
                round_money(*amount)
            ),
            Advice::ShortenCashConversionCycle { days } => write!(
                f,
                "Cash conversion cycle is {days} days; tighten collections and inventory turnover"
            ),
            Advice::CollectFasterThanPaying { dso, dpo } => write!(
                f,
                "Customers pay in {dso} days but suppliers are paid in {dpo}; shorten customer terms"
            ),
            Advice::CashFlowHealthy => write!(f, "Cash position stays positive over the horizon"),
        }
    }
}

/// Advice for one analysed customer, in a fixed order
pub fn customer_advice(
    customer: &Customer,
    report: &ProfitabilityReport,
    params: &EngineParameters,
) -> Vec<Advice> {
    let mut advice = Vec::new();

    if customer.dso > params.supplier_terms_days.saturating_add(DSO_TOLERANCE_DAYS) {
        advice.push(Advice::NegotiateShorterTerms {
            current_dso: customer.dso,
            target_dso: params.supplier_terms_days.saturating_add(NEGOTIATION_TARGET_DAYS),
        });
        advice.push(Advice::OfferEarlyPaymentDiscount {
            min_percent: 2,
            max_percent: 3,
        });
    }

    if report.costs.amount(CostCategory::Storage) > report.real_profit * STORAGE_PROFIT_SHARE {
        advice.push(Advice::SteerToFasterMovingGoods);
        advice.push(Advice::ReduceStockHoldingTime);
    }

    if report.profit_margin < MIN_HEALTHY_MARGIN {
        advice.push(Advice::ConsiderPriceIncrease);
        advice.push(Advice::LimitRangeOrVolume);
    }

    if advice.is_empty() {
        advice.push(Advice::CustomerIsHealthy);
    }
    advice
}

/// Dead stock to clear first, then up to three fresh items whose price should hold
pub fn inventory_advice(recommendations: &[PricingRecommendation]) -> Vec<Advice> {
    let clear = recommendations
        .iter()
        .filter(|rec| rec.status == InventoryStatus::DeadStock)
        .map(|rec| Advice::ClearDeadStock {
            product: rec.product.clone(),
            price: rec.recommended_price,
            age_days: rec.age_days,
        });

    let hold = recommendations
        .iter()
        .filter(|rec| rec.status == InventoryStatus::Fresh)
        .take(BEST_PERFORMER_LIMIT)
        .map(|rec| Advice::HoldBestPerformer {
            product: rec.product.clone(),
            margin_percent: rec.margin_percent,
        });

    clear.chain(hold).collect()
}

pub fn cash_flow_advice(projection: &CashFlowProjection, dso: Days, dpo: Days) -> Vec<Advice> {
    let summary = &projection.summary;
    let mut advice = Vec::new();

    if summary.needs_financing() {
        advice.push(Advice::ArrangeFinancing {
            amount: summary.financing_required,
            before_month: summary.minimum_cash_month,
        });
    }
    if summary.cash_conversion_cycle > CCC_ALERT_DAYS {
        advice.push(Advice::ShortenCashConversionCycle {
            days: summary.cash_conversion_cycle,
        });
    }
    if dso > dpo {
        advice.push(Advice::CollectFasterThanPaying { dso, dpo });
    }

    if advice.is_empty() {
        advice.push(Advice::CashFlowHealthy);
    }
    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cash_flow::project;
    use crate::config::CostOptions;
    use crate::models::{CashFlowAssumptions, CustomerType, InventoryItem, Transaction};
    use crate::pricing::{recommend_all, PricingContext};
    use crate::profitability::analyze;

    fn analysed(dso: Days, selling_price: Money) -> (Customer, ProfitabilityReport) {
        analysed_with_stock_age(dso, selling_price, 10)
    }

    fn analysed_with_stock_age(
        dso: Days,
        selling_price: Money,
        days_in_stock: Days,
    ) -> (Customer, ProfitabilityReport) {
        let customer = Customer::new("Kupac", dso, CustomerType::Regular, Decimal::ONE)
            .unwrap()
            .with_transactions([Transaction::new(
                "Cement 25kg",
                100,
                dec!(10),
                selling_price,
                days_in_stock,
            )
            .unwrap()]);
        let report = analyze(&customer, &EngineParameters::default(), &CostOptions::default())
            .unwrap()
            .into_report()
            .unwrap();
        (customer, report)
    }

    #[test]
    fn test_healthy_customer_gets_single_affirmation() {
        let (customer, report) = analysed(60, dec!(15));
        let advice = customer_advice(&customer, &report, &EngineParameters::default());
        assert_eq!(advice, vec![Advice::CustomerIsHealthy]);
    }

    #[test]
    fn test_slow_payer_advice_order() {
        // Real profit is negative, so any storage cost trips the storage rule too
        let (customer, report) = analysed(110, dec!(10.20));
        assert!(report.real_profit < Decimal::ZERO);
        let advice = customer_advice(&customer, &report, &EngineParameters::default());

        assert_eq!(
            advice,
            vec![
                Advice::NegotiateShorterTerms {
                    current_dso: 110,
                    target_dso: 75
                },
                Advice::OfferEarlyPaymentDiscount {
                    min_percent: 2,
                    max_percent: 3
                },
                Advice::SteerToFasterMovingGoods,
                Advice::ReduceStockHoldingTime,
                Advice::ConsiderPriceIncrease,
                Advice::LimitRangeOrVolume,
            ]
        );
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let (customer, report) = analysed_with_stock_age(120, dec!(10.20), 900);
        assert_eq!(report.costs.amount(CostCategory::Storage), dec!(150));
        let advice = customer_advice(&customer, &report, &EngineParameters::default());

        assert_eq!(
            advice,
            vec![
                Advice::NegotiateShorterTerms {
                    current_dso: 120,
                    target_dso: 75
                },
                Advice::OfferEarlyPaymentDiscount {
                    min_percent: 2,
                    max_percent: 3
                },
                Advice::SteerToFasterMovingGoods,
                Advice::ReduceStockHoldingTime,
                Advice::ConsiderPriceIncrease,
                Advice::LimitRangeOrVolume,
            ]
        );
    }

    #[test]
    fn test_only_storage_rule_fires() {
        // 1500 sales, 1000 cost, 150 storage: real profit 282.50, margin above 5%
        let (customer, report) = analysed_with_stock_age(60, dec!(15), 900);
        assert_eq!(report.real_profit, dec!(282.50));
        let advice = customer_advice(&customer, &report, &EngineParameters::default());

        assert_eq!(
            advice,
            vec![Advice::SteerToFasterMovingGoods, Advice::ReduceStockHoldingTime]
        );
    }

    #[test]
    fn test_extreme_supplier_terms_do_not_overflow() {
        let (customer, report) = analysed(60, dec!(15));
        let params = EngineParameters {
            supplier_terms_days: Days::MAX,
            ..EngineParameters::default()
        };
        let advice = customer_advice(&customer, &report, &params);
        assert!(!advice
            .iter()
            .any(|a| matches!(a, Advice::NegotiateShorterTerms { .. })));
    }

    #[test]
    fn test_dso_at_tolerance_is_not_flagged() {
        let (customer, report) = analysed(90, dec!(15));
        let advice = customer_advice(&customer, &report, &EngineParameters::default());
        assert!(!advice
            .iter()
            .any(|a| matches!(a, Advice::NegotiateShorterTerms { .. })));
    }

    #[test]
    fn test_inventory_advice() {
        let params = EngineParameters::default();
        let ctx = PricingContext::new(83, &params);
        let items = vec![
            InventoryItem::new(3, "Gvozdeni šip 6mm", dec!(15.00), dec!(22.50), 210, 20).unwrap(),
            InventoryItem::new(4, "Boja bijela 10L", dec!(18.00), dec!(27.00), 15, 30).unwrap(),
            InventoryItem::new(1, "Cement 25kg", dec!(10.50), dec!(15.75), 45, 100).unwrap(),
        ];
        let advice = inventory_advice(&recommend_all(&items, &ctx));

        assert_eq!(advice.len(), 2);
        assert!(matches!(&advice[0], Advice::ClearDeadStock { product, .. } if product == "Gvozdeni šip 6mm"));
        assert!(matches!(&advice[1], Advice::HoldBestPerformer { product, .. } if product == "Boja bijela 10L"));
    }

    #[test]
    fn test_cash_flow_advice() {
        let assumptions = CashFlowAssumptions::default();
        let projection = project(&assumptions).unwrap();
        let advice = cash_flow_advice(&projection, assumptions.dso, assumptions.dpo);

        assert!(matches!(advice[0], Advice::ArrangeFinancing { .. }));
        assert!(advice.contains(&Advice::ShortenCashConversionCycle { days: 75 }));
        assert!(advice.contains(&Advice::CollectFasterThanPaying { dso: 90, dpo: 60 }));
    }

    #[test]
    fn test_display() {
        let advice = Advice::NegotiateShorterTerms {
            current_dso: 110,
            target_dso: 75,
        };
        assert_eq!(advice.to_string(), "Negotiate payment terms down from 110 to 75 days");
    }
}
