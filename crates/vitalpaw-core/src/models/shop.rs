//! VitalCoin shop models.

use serde::{Deserialize, Serialize};

/// A product redeemable with VitalCoins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Local UUID
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in VitalCoins
    pub price: i64,
    /// Remote image location, if any
    pub image_url: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Product {
    pub fn new(name: String, description: String, price: i64) -> Self {
        Self {
            id: super::new_id(),
            name,
            description,
            price,
            image_url: None,
            created_at: super::now_timestamp(),
        }
    }
}

/// One product line in a user's cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line in VitalCoins.
    pub fn subtotal(&self) -> i64 {
        self.product.price * i64::from(self.quantity)
    }
}

/// A user's cart together with their balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub vital_coins: i64,
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn total(&self) -> i64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A completed checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedeemedPurchase {
    pub id: String,
    pub user_id: String,
    /// VitalCoins spent
    pub points: i64,
    pub created_at: String,
}

/// Purchase summary shown in the shop feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseSummary {
    pub user_name: String,
    pub points: i64,
    pub date: String,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutReceipt {
    pub purchase: RedeemedPurchase,
    /// Balance left after the purchase
    pub remaining_coins: i64,
}
