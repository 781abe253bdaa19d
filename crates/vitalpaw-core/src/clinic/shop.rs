//! VitalCoin shop.

use tracing::info;

use super::{not_found, Clinic, ClinicError, ClinicResult};
use crate::db::CheckoutOutcome;
use crate::models::{Cart, CheckoutReceipt, Product, PurchaseSummary, User};

/// Products inserted into an empty shop: name, description, price.
pub const DEFAULT_CATALOGUE: &[(&str, &str, i64)] = &[
    ("Chew toy", "Durable rubber chew toy for dogs", 20),
    ("Cat scratcher", "Cardboard scratching pad with catnip", 35),
    ("Grooming brush", "Soft bristle brush for short and long coats", 25),
    ("Adjustable leash", "Reflective nylon leash, 1.5 m", 30),
    ("Dental treats", "Pack of 10 dental chews", 15),
    ("Travel bowl", "Collapsible silicone water bowl", 10),
];

impl<'a> Clinic<'a> {
    /// Insert the default catalogue if the shop has no products.
    ///
    /// Returns how many products were inserted.
    pub fn seed_products_if_empty(&self) -> ClinicResult<usize> {
        if self.db.count_products()? > 0 {
            return Ok(0);
        }
        for (name, description, price) in DEFAULT_CATALOGUE {
            let product = Product::new(name.to_string(), description.to_string(), *price);
            self.db.insert_product(&product)?;
        }
        info!(products = DEFAULT_CATALOGUE.len(), "seeded shop catalogue");
        Ok(DEFAULT_CATALOGUE.len())
    }

    pub fn catalog(&self) -> ClinicResult<Vec<Product>> {
        Ok(self.db.list_products()?)
    }

    pub fn get_product(&self, id: &str) -> ClinicResult<Product> {
        self.db.get_product(id)?.ok_or_else(|| not_found("product", id))
    }

    /// The actor's cart and current balance.
    pub fn cart(&self, actor: &User) -> ClinicResult<Cart> {
        let vital_coins = self
            .db
            .get_user(&actor.id)?
            .map(|user| user.vital_coins)
            .ok_or_else(|| not_found("user", &actor.id))?;
        Ok(Cart {
            vital_coins,
            lines: self.db.get_cart_lines(&actor.id)?,
        })
    }

    /// Add `quantity` of a product on top of what is already in the cart.
    pub fn add_to_cart(&self, actor: &User, product_id: &str, quantity: u32) -> ClinicResult<Cart> {
        if quantity == 0 {
            return Err(ClinicError::InvalidInput("quantity must be at least 1".into()));
        }
        self.get_product(product_id)?;
        self.db.add_cart_quantity(&actor.id, product_id, quantity)?;
        self.cart(actor)
    }

    /// Replace the quantity of a product already in the cart.
    pub fn update_cart_item(&self, actor: &User, product_id: &str, quantity: u32) -> ClinicResult<Cart> {
        if quantity == 0 {
            return Err(ClinicError::InvalidInput("quantity must be at least 1".into()));
        }
        if !self.db.set_cart_quantity(&actor.id, product_id, quantity)? {
            return Err(not_found("cart item", product_id));
        }
        self.cart(actor)
    }

    pub fn remove_from_cart(&self, actor: &User, product_id: &str) -> ClinicResult<Cart> {
        if !self.db.remove_cart_item(&actor.id, product_id)? {
            return Err(not_found("cart item", product_id));
        }
        self.cart(actor)
    }

    /// Spend VitalCoins on the whole cart.
    pub fn checkout(&self, actor: &User) -> ClinicResult<CheckoutReceipt> {
        match self.db.checkout_cart(&actor.id)? {
            CheckoutOutcome::EmptyCart => Err(ClinicError::InvalidInput("cart is empty".into())),
            CheckoutOutcome::InsufficientCoins { required, available } => {
                Err(ClinicError::InsufficientCoins { required, available })
            }
            CheckoutOutcome::Completed(receipt) => {
                info!(
                    user_id = %actor.id,
                    points = receipt.purchase.points,
                    remaining = receipt.remaining_coins,
                    "cart redeemed"
                );
                Ok(receipt)
            }
        }
    }

    /// Newest purchases first.
    pub fn recent_purchases(&self, limit: usize) -> ClinicResult<Vec<PurchaseSummary>> {
        Ok(self.db.recent_purchases(limit)?)
    }

    pub fn total_redeemed(&self) -> ClinicResult<i64> {
        Ok(self.db.total_redeemed()?)
    }
}
