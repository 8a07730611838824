//! Cash-flow projection
//!
//! Monthly projection with growth, seasonality and collection/payment lags,
//! plus a day-granular variant for short horizons. Lags are whole 30-day
//! months (`dso / 30`, `dpo / 30`). Sales collected or purchases paid after
//! the last projected period do not appear in any row; their totals are
//! returned as the `*_beyond_horizon` fields instead.

use chrono::NaiveDate;
use rust_decimal::prelude::MathematicalOps;
use rust_decimal::Decimal;

use crate::error::{checked, checked_sum, EngineError, EngineResult};
use crate::models::{
    CashFlowAssumptions, CashFlowDay, CashFlowMonth, CashFlowProjection, CashFlowSummary,
    DailyCashFlowAssumptions, DailyCashFlowProjection, ScheduledCashEvent,
};
use crate::types::{round_money, Days, Money, DAYS_PER_MONTH, MONTHS_PER_YEAR};

/// Longest monthly projection, ten years
pub const MAX_HORIZON_MONTHS: u32 = 120;

/// Project the next twelve months
pub fn project(assumptions: &CashFlowAssumptions) -> EngineResult<CashFlowProjection> {
    project_horizon(assumptions, MONTHS_PER_YEAR as u32)
}

/// Project `months` months; seasonal factors repeat every calendar year
pub fn project_horizon(
    assumptions: &CashFlowAssumptions,
    months: u32,
) -> EngineResult<CashFlowProjection> {
    assumptions.validate()?;
    if months == 0 {
        return Err(EngineError::invalid(
            "months",
            "Horizon must be at least one month",
        ));
    }
    if months > MAX_HORIZON_MONTHS {
        return Err(EngineError::invalid(
            "months",
            "Horizon must not exceed 120 months",
        ));
    }

    let sales = adjusted_sales(assumptions, months)?;
    let horizon = sales.len();
    let collection_lag = lag_in_months(assumptions.dso);
    let payment_lag = lag_in_months(assumptions.dpo);

    let mut rows = Vec::with_capacity(horizon);
    let mut cumulative = assumptions.starting_cash;

    for (idx, month_sales) in sales.iter().enumerate() {
        let cash_in = lagged(&sales, idx, collection_lag);
        let cash_out = checked(
            assumptions
                .cogs_percentage
                .checked_mul(lagged(&sales, idx, payment_lag))
                .and_then(|purchases| purchases.checked_add(assumptions.fixed_costs_per_month)),
            "monthly cash out",
        )?;
        let net_cash_flow = checked(cash_in.checked_sub(cash_out), "net cash flow")?;
        cumulative = checked(cumulative.checked_add(net_cash_flow), "cumulative cash")?;

        rows.push(CashFlowMonth {
            month_index: idx as u32 + 1,
            adjusted_sales: *month_sales,
            cash_in,
            cash_out,
            net_cash_flow,
            cumulative_cash: cumulative,
        });
    }

    let receivables_beyond_horizon = tail_sum(&sales, collection_lag)?;
    let payables_beyond_horizon = checked(
        assumptions
            .cogs_percentage
            .checked_mul(tail_sum(&sales, payment_lag)?),
        "payables beyond horizon",
    )?;
    let summary = summarize(&rows, assumptions)?;

    tracing::debug!(
        months = horizon,
        ending_cash = %summary.ending_cash,
        minimum_cash = %summary.minimum_cash,
        minimum_month = summary.minimum_cash_month,
        "Cash-flow projection complete"
    );

    Ok(CashFlowProjection {
        months: rows,
        summary,
        receivables_beyond_horizon,
        payables_beyond_horizon,
    })
}

/// `monthly_sales * (1 + growth)^(i/12) * seasonal[(i - 1) % 12]` for each month `i`,
/// kept to the cent
fn adjusted_sales(assumptions: &CashFlowAssumptions, months: u32) -> EngineResult<Vec<Money>> {
    let base = Decimal::ONE + assumptions.growth_rate;
    let year = Decimal::from(MONTHS_PER_YEAR as u32);

    (1..=months)
        .map(|i| {
            let growth = if assumptions.growth_rate.is_zero() {
                Decimal::ONE
            } else {
                base.checked_powd(Decimal::from(i) / year)
                    .ok_or(EngineError::Overflow("sales growth"))?
            };
            let seasonal = assumptions.seasonal_factors[(i as usize - 1) % MONTHS_PER_YEAR];
            assumptions
                .monthly_sales
                .checked_mul(growth)
                .and_then(|sales| sales.checked_mul(seasonal))
                .map(round_money)
                .ok_or(EngineError::Overflow("adjusted sales"))
        })
        .collect()
}

fn lag_in_months(days: Days) -> usize {
    (days / DAYS_PER_MONTH) as usize
}

/// Sales of the month `lag` months before `idx`, or zero when that precedes the horizon
fn lagged(sales: &[Money], idx: usize, lag: usize) -> Money {
    idx.checked_sub(lag)
        .map(|origin| sales[origin])
        .unwrap_or(Decimal::ZERO)
}

/// Sales of the last `lag` months, whose cash moves after the horizon
fn tail_sum(sales: &[Money], lag: usize) -> EngineResult<Money> {
    checked_sum(
        sales[sales.len().saturating_sub(lag)..].iter().copied().map(Ok),
        "sales beyond horizon",
    )
}

fn summarize(
    rows: &[CashFlowMonth],
    assumptions: &CashFlowAssumptions,
) -> EngineResult<CashFlowSummary> {
    let first = rows
        .first()
        .ok_or(EngineError::invalid("months", "Horizon must be at least one month"))?;

    let mut minimum_cash = first.cumulative_cash;
    let mut minimum_cash_month = first.month_index;
    for row in rows {
        if row.cumulative_cash < minimum_cash {
            minimum_cash = row.cumulative_cash;
            minimum_cash_month = row.month_index;
        }
    }
    let net_total = checked_sum(rows.iter().map(|row| Ok(row.net_cash_flow)), "net cash flow")?;

    let ending_cash = rows
        .last()
        .map(|row| row.cumulative_cash)
        .unwrap_or(assumptions.starting_cash);

    Ok(CashFlowSummary {
        minimum_cash,
        minimum_cash_month,
        average_net_cash_flow: net_total / Decimal::from(rows.len()),
        ending_cash,
        cash_conversion_cycle: assumptions.cash_conversion_cycle(),
        financing_required: shortfall(minimum_cash),
    })
}

fn shortfall(minimum_cash: Money) -> Money {
    if minimum_cash < Decimal::ZERO {
        -minimum_cash
    } else {
        Decimal::ZERO
    }
}

/// Day-by-day projection of scheduled receipts and payments.
///
/// Day 1 is `start_date`. Events dated before the start count on day 1;
/// events after the last day are totalled separately.
pub fn project_daily(assumptions: &DailyCashFlowAssumptions) -> EngineResult<DailyCashFlowProjection> {
    assumptions.validate()?;

    let horizon = assumptions.horizon_days as usize;
    let mut inflows = vec![Decimal::ZERO; horizon];
    let mut outflows = vec![Decimal::ZERO; horizon];

    let receipts_beyond_horizon =
        schedule(&assumptions.receipts, assumptions.start_date, &mut inflows)?;
    let payments_beyond_horizon =
        schedule(&assumptions.payments, assumptions.start_date, &mut outflows)?;

    if let Some(recurring) = &assumptions.recurring_outflow {
        for (idx, outflow) in outflows.iter_mut().enumerate() {
            if recurring.falls_on(idx as u32 + 1) {
                *outflow = checked(outflow.checked_add(recurring.amount), "daily cash out")?;
            }
        }
    }

    let mut days = Vec::with_capacity(horizon);
    let mut cumulative = assumptions.starting_cash;
    let mut minimum_cash = assumptions.starting_cash;
    let mut minimum_cash_date = assumptions.start_date;

    for (idx, (cash_in, cash_out)) in inflows.into_iter().zip(outflows).enumerate() {
        let date = assumptions
            .start_date
            .checked_add_days(chrono::Days::new(idx as u64))
            .ok_or(EngineError::Overflow("projection date"))?;
        let net_cash_flow = checked(cash_in.checked_sub(cash_out), "net cash flow")?;
        cumulative = checked(cumulative.checked_add(net_cash_flow), "cumulative cash")?;

        if idx == 0 || cumulative < minimum_cash {
            minimum_cash = cumulative;
            minimum_cash_date = date;
        }

        days.push(CashFlowDay {
            day_index: idx as u32 + 1,
            date,
            cash_in,
            cash_out,
            net_cash_flow,
            cumulative_cash: cumulative,
        });
    }

    tracing::debug!(
        days = horizon,
        ending_cash = %cumulative,
        minimum_cash = %minimum_cash,
        "Daily cash-flow projection complete"
    );

    Ok(DailyCashFlowProjection {
        days,
        minimum_cash,
        minimum_cash_date,
        ending_cash: cumulative,
        financing_required: shortfall(minimum_cash),
        receipts_beyond_horizon,
        payments_beyond_horizon,
    })
}

/// Add each event to its day slot; returns the total falling after the horizon
fn schedule(
    events: &[ScheduledCashEvent],
    start: NaiveDate,
    slots: &mut [Money],
) -> EngineResult<Money> {
    let mut beyond = Decimal::ZERO;
    for event in events {
        let offset = (event.due_date - start).num_days().max(0) as usize;
        match slots.get_mut(offset) {
            Some(slot) => *slot = checked(slot.checked_add(event.amount), "scheduled cash")?,
            None => beyond = checked(beyond.checked_add(event.amount), "cash beyond horizon")?,
        }
    }
    Ok(beyond)
}
