use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDateTime;

/// Customer ids are drawn from a deliberately small range so that repeated
/// draws collide and the insert-if-absent path gets exercised.
pub const CUSTOMER_IDS: RangeInclusive<i32> = 1..=100;

/// Bounds of a payment amount, before rounding.
pub const AMOUNT_MIN: f64 = 1000.0;
pub const AMOUNT_MAX: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Placed,
    Shipped,
    Completed,
    Returned,
    ReturnPending,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Returned,
        OrderStatus::ReturnPending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Returned => "returned",
            OrderStatus::ReturnPending => "return_pending",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    CreditCard,
    Coupon,
    BankTransfer,
    GiftCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Coupon,
        PaymentMethod::BankTransfer,
        PaymentMethod::GiftCard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Coupon => "coupon",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::GiftCard => "gift_card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub user_id: i32,
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
}

impl Order {
    pub fn is_placed(&self) -> bool {
        self.status == OrderStatus::Placed
    }
}

/// A payment as synthesized. The order it references is resolved when the
/// row is written, see [`crate::config::PaymentOrderRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    pub payment_method: PaymentMethod,
    pub amount: i32,
}

/// Everything written in one loop iteration, committed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    /// Loop counter, starting at 1.
    pub index: i32,
    pub customer: Customer,
    pub order: Order,
    pub payment: Option<Payment>,
}
