//! Customer and transaction models

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{check, checked, checked_sum, EngineError, EngineResult};
use crate::types::{Days, Money, Rate};
use crate::validation::{validate_fraction, validate_name, validate_non_negative};

/// Customer segment (informational only; no calculation depends on it)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Large,
    Medium,
    Small,
    Vip,
    #[default]
    Regular,
    New,
    Problematic,
}

impl std::fmt::Display for CustomerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerType::Large => write!(f, "Large"),
            CustomerType::Medium => write!(f, "Medium"),
            CustomerType::Small => write!(f, "Small"),
            CustomerType::Vip => write!(f, "VIP"),
            CustomerType::Regular => write!(f, "Regular"),
            CustomerType::New => write!(f, "New"),
            CustomerType::Problematic => write!(f, "Problematic"),
        }
    }
}

/// A sale to a customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub product: String,
    pub quantity: u32,
    pub cost_price: Money,
    pub selling_price: Money,
    /// Age of the goods at the time of sale
    pub days_in_stock: Days,
}

impl Transaction {
    pub fn new(
        product: impl Into<String>,
        quantity: u32,
        cost_price: Money,
        selling_price: Money,
        days_in_stock: Days,
    ) -> EngineResult<Self> {
        let transaction = Self {
            product: product.into(),
            quantity,
            cost_price,
            selling_price,
            days_in_stock,
        };
        transaction.validate()?;
        Ok(transaction)
    }

    pub fn validate(&self) -> EngineResult<()> {
        check("product", validate_name(&self.product))?;
        check("cost_price", validate_non_negative(self.cost_price))?;
        check("selling_price", validate_non_negative(self.selling_price))
    }

    pub fn total_cost(&self) -> EngineResult<Money> {
        checked(
            self.cost_price.checked_mul(Decimal::from(self.quantity)),
            "transaction cost",
        )
    }

    pub fn total_sale(&self) -> EngineResult<Money> {
        checked(
            self.selling_price.checked_mul(Decimal::from(self.quantity)),
            "transaction sale",
        )
    }
}

/// A customer with the transactions being analysed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    /// Days sales outstanding
    pub dso: Days,
    #[serde(default)]
    pub customer_type: CustomerType,
    /// Share of invoices paid on time (1.0 = always)
    #[serde(default = "default_payment_history")]
    pub payment_history: Rate,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

fn default_payment_history() -> Rate {
    dec!(0.95)
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        dso: Days,
        customer_type: CustomerType,
        payment_history: Rate,
    ) -> EngineResult<Self> {
        let customer = Self {
            name: name.into(),
            dso,
            customer_type,
            payment_history,
            transactions: Vec::new(),
        };
        customer.validate()?;
        Ok(customer)
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn with_transactions(mut self, transactions: impl IntoIterator<Item = Transaction>) -> Self {
        self.transactions.extend(transactions);
        self
    }

    /// Copy of this customer with a different DSO, for what-if runs
    pub fn with_dso(&self, dso: Days) -> Self {
        Self {
            dso,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        check("name", validate_name(&self.name))?;
        check("payment_history", validate_fraction(self.payment_history))?;
        for (index, transaction) in self.transactions.iter().enumerate() {
            transaction.validate().map_err(|e| match e {
                EngineError::InvalidInput { field, message } => {
                    EngineError::invalid(format!("transactions[{index}].{field}"), message)
                }
                other => other,
            })?;
        }
        Ok(())
    }

    pub fn has_transactions(&self) -> bool {
        !self.transactions.is_empty()
    }

    pub fn total_sales(&self) -> EngineResult<Money> {
        checked_sum(self.transactions.iter().map(Transaction::total_sale), "total sales")
    }

    pub fn total_cost(&self) -> EngineResult<Money> {
        checked_sum(self.transactions.iter().map(Transaction::total_cost), "total cost")
    }
}
