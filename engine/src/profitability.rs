//! Customer profitability analysis
//!
//! Turns a customer's transactions into a [`ProfitabilityReport`] by
//! subtracting the active cost categories from the paper profit.

use tracing::instrument;

use crate::config::{CostOptions, EngineParameters};
use crate::cost_model;
use crate::error::{checked_sum, EngineResult};
use crate::models::{
    AggregateInput, CostBreakdown, CostCategory, Customer, ProfitabilityAnalysis,
    ProfitabilityReport, Transaction,
};
use crate::types::{CostBasis, Money};

/// Analyse every transaction of a customer.
///
/// Returns [`ProfitabilityAnalysis::NoData`] when the customer has no
/// transactions, and [`EngineError::Overflow`](crate::EngineError::Overflow)
/// when a figure leaves the Decimal range.
#[instrument(skip_all, fields(customer = %customer.name, transactions = customer.transactions.len()))]
pub fn analyze(
    customer: &Customer,
    params: &EngineParameters,
    options: &CostOptions,
) -> EngineResult<ProfitabilityAnalysis> {
    if !customer.has_transactions() {
        tracing::debug!("No transactions to analyse");
        return Ok(ProfitabilityAnalysis::NoData);
    }

    let total_sales = customer.total_sales()?;
    let total_cost = customer.total_cost()?;
    let costs = customer_costs(customer, total_sales, params, options)?;
    let report = ProfitabilityReport::from_parts(total_sales, total_cost, costs)?;

    tracing::debug!(
        real_profit = %report.real_profit,
        margin = %report.profit_margin,
        status = %report.status,
        "Customer analysed"
    );
    Ok(ProfitabilityAnalysis::Report(report))
}

/// Analyse pre-aggregated figures. Always yields a report; with zero sales
/// the margin is zero and the status is a loss.
#[instrument(skip_all, fields(dso = input.dso))]
pub fn analyze_aggregate(
    input: &AggregateInput,
    params: &EngineParameters,
    options: &CostOptions,
) -> EngineResult<ProfitabilityReport> {
    let sales = input.total_sales;
    let mut costs = CostBreakdown::new();

    for category in &options.categories {
        let amount = match category {
            CostCategory::Financing => cost_model::financing(
                sales,
                input.dso,
                params.supplier_terms_days,
                params.annual_interest_rate,
            )?,
            CostCategory::Storage => cost_model::storage(
                input.total_cost,
                input.average_days_in_stock,
                params.monthly_storage_rate,
            )?,
            CostCategory::Commission => cost_model::commission(sales, params.commission_rate)?,
            CostCategory::Logistics => cost_model::logistics(sales, params.logistics_rate)?,
            CostCategory::Risk => {
                cost_model::risk(sales, input.payment_history, params.risk_coefficient)?
            }
            CostCategory::Administration => options.administration,
            CostCategory::Other => options.other,
        };
        costs.insert(*category, amount);
    }

    ProfitabilityReport::from_parts(sales, input.total_cost, costs)
}

fn customer_costs(
    customer: &Customer,
    total_sales: Money,
    params: &EngineParameters,
    options: &CostOptions,
) -> EngineResult<CostBreakdown> {
    let mut costs = CostBreakdown::new();

    for category in &options.categories {
        let amount = match category {
            CostCategory::Financing => match options.financing_basis {
                CostBasis::PerTransaction => sum_over(&customer.transactions, |t| {
                    cost_model::financing(
                        t.total_sale()?,
                        customer.dso,
                        params.supplier_terms_days,
                        params.annual_interest_rate,
                    )
                })?,
                CostBasis::Aggregate => cost_model::financing(
                    total_sales,
                    customer.dso,
                    params.supplier_terms_days,
                    params.annual_interest_rate,
                )?,
            },
            CostCategory::Storage => sum_over(&customer.transactions, |t| {
                cost_model::storage(t.total_cost()?, t.days_in_stock, params.monthly_storage_rate)
            })?,
            CostCategory::Commission => transactional(customer, total_sales, options, |sale| {
                cost_model::commission(sale, params.commission_rate)
            })?,
            CostCategory::Logistics => transactional(customer, total_sales, options, |sale| {
                cost_model::logistics(sale, params.logistics_rate)
            })?,
            CostCategory::Risk => cost_model::risk(
                total_sales,
                customer.payment_history,
                params.risk_coefficient,
            )?,
            CostCategory::Administration => options.administration,
            CostCategory::Other => options.other,
        };
        costs.insert(*category, amount);
    }

    Ok(costs)
}

fn sum_over(
    transactions: &[Transaction],
    f: impl Fn(&Transaction) -> EngineResult<Money>,
) -> EngineResult<Money> {
    checked_sum(transactions.iter().map(f), "cost total")
}

/// Commission and logistics: per sale or once on total sales
fn transactional(
    customer: &Customer,
    total_sales: Money,
    options: &CostOptions,
    rate: impl Fn(Money) -> EngineResult<Money>,
) -> EngineResult<Money> {
    match options.transactional_basis {
        CostBasis::PerTransaction => sum_over(&customer.transactions, |t| rate(t.total_sale()?)),
        CostBasis::Aggregate => rate(total_sales),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerType, ProfitabilityStatus};
    use crate::EngineError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn customer(dso: u32) -> Customer {
        Customer::new("Gradevinar DOO", dso, CustomerType::Large, dec!(0.85)).unwrap()
    }

    #[test]
    fn test_no_transactions_is_no_data() {
        let analysis = analyze(
            &customer(110),
            &EngineParameters::default(),
            &CostOptions::default(),
        )
        .unwrap();
        assert!(analysis.is_no_data());
        assert!(analysis.report().is_none());
    }

    #[test]
    fn test_report_totals_are_consistent() {
        let c = customer(110).with_transactions([
            Transaction::new("Cement 25kg", 200, dec!(10.50), dec!(15.75), 45).unwrap(),
            Transaction::new("Gvozdeni šip 6mm", 20, dec!(15.00), dec!(22.50), 210).unwrap(),
        ]);
        let analysis = analyze(&c, &EngineParameters::default(), &CostOptions::default()).unwrap();
        let report = analysis.report().unwrap();

        assert_eq!(report.total_sales, dec!(3600.00));
        assert_eq!(report.total_cost, dec!(2400.00));
        assert_eq!(report.paper_profit, dec!(1200.00));
        assert_eq!(report.costs.len(), 5);
        assert_eq!(report.total_additional_costs, report.costs.total().unwrap());
        assert_eq!(report.real_profit, report.paper_profit - report.total_additional_costs);
    }

    #[test]
    fn test_financing_basis_agrees_for_linear_formula() {
        let c = customer(90).with_transactions([
            Transaction::new("A", 1, dec!(100), dec!(1000), 0).unwrap(),
            Transaction::new("B", 1, dec!(10), dec!(20), 0).unwrap(),
        ]);
        let params = EngineParameters::default();
        let per_tx = analyze(&c, &params, &CostOptions::default())
            .unwrap()
            .into_report()
            .unwrap();
        let aggregate = analyze(
            &c,
            &params,
            &CostOptions::default().with_financing_basis(CostBasis::Aggregate),
        )
        .unwrap()
        .into_report()
        .unwrap();

        let diff = per_tx.costs.amount(CostCategory::Financing)
            - aggregate.costs.amount(CostCategory::Financing);
        assert!(diff.abs() < dec!(0.000001));
    }

    #[test]
    fn test_only_selected_categories_present() {
        let c = customer(90)
            .with_transactions([Transaction::new("A", 10, dec!(5), dec!(8), 30).unwrap()]);
        let options = CostOptions::default()
            .with_categories([CostCategory::Commission, CostCategory::Administration]);
        let options = CostOptions {
            administration: dec!(2),
            ..options
        };
        let report = analyze(&c, &EngineParameters::default(), &options)
            .unwrap()
            .into_report()
            .unwrap();

        assert_eq!(report.costs.len(), 2);
        assert_eq!(report.costs.amount(CostCategory::Commission), dec!(2.40));
        assert_eq!(report.costs.amount(CostCategory::Administration), dec!(2));
        assert!(!report.costs.contains(CostCategory::Financing));
    }

    #[test]
    fn test_aggregate_scenario() {
        let input = AggregateInput {
            total_sales: dec!(50000),
            total_cost: dec!(35000),
            dso: 90,
            payment_history: Decimal::ONE,
            average_days_in_stock: 0,
        };
        let report =
            analyze_aggregate(&input, &EngineParameters::default(), &CostOptions::default())
                .unwrap();

        assert_eq!(report.paper_profit, dec!(15000));
        assert_eq!(report.costs.amount(CostCategory::Financing).round_dp(2), dec!(328.77));
        assert_eq!(report.costs.amount(CostCategory::Commission), dec!(1500));
        assert_eq!(report.costs.amount(CostCategory::Logistics), dec!(750));
        assert_eq!(report.status, ProfitabilityStatus::Excellent);
    }

    #[test]
    fn test_aggregate_zero_sales() {
        let input = AggregateInput {
            total_sales: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            dso: 120,
            payment_history: dec!(0.5),
            average_days_in_stock: 60,
        };
        let report =
            analyze_aggregate(&input, &EngineParameters::default(), &CostOptions::default())
                .unwrap();
        assert_eq!(report.profit_margin, Decimal::ZERO);
        assert_eq!(report.status, ProfitabilityStatus::Loss);
    }

    #[test]
    fn test_sale_overflow_is_an_error() {
        let c = customer(110).with_transactions([
            Transaction::new("Cement 25kg", 2, dec!(10.50), Decimal::MAX, 45).unwrap(),
        ]);
        let result = analyze(&c, &EngineParameters::default(), &CostOptions::default());
        assert!(matches!(result, Err(EngineError::Overflow(_))));
    }

    #[test]
    fn test_total_sales_overflow_is_an_error() {
        let half = Decimal::MAX / dec!(2);
        let c = customer(110).with_transactions([
            Transaction::new("A", 1, half, half, 900).unwrap(),
            Transaction::new("B", 1, half, half, 900).unwrap(),
            Transaction::new("C", 1, half, half, 900).unwrap(),
        ]);
        assert!(analyze(&c, &EngineParameters::default(), &CostOptions::default()).is_err());
    }
}
