//! VitalCoin shop database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{
    new_id, now_timestamp, CartLine, CheckoutReceipt, Product, PurchaseSummary, RedeemedPurchase,
};

/// Outcome of attempting to redeem a cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Cart had no lines; nothing was written
    EmptyCart,
    /// Balance too low; nothing was written
    InsufficientCoins { required: i64, available: i64 },
    /// Coins deducted, purchase recorded and cart cleared
    Completed(CheckoutReceipt),
}

impl Database {
    /// Insert a product.
    pub fn insert_product(&self, product: &Product) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO products (id, name, description, price, image_url, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                product.id,
                product.name,
                product.description,
                product.price,
                product.image_url,
                product.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a product by ID.
    pub fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        self.conn
            .query_row(
                "SELECT id, name, description, price, image_url, created_at FROM products WHERE id = ?",
                [id],
                product_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List the catalogue in insertion order.
    pub fn list_products(&self) -> DbResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, price, image_url, created_at FROM products ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map([], product_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Number of products in the catalogue.
    pub fn count_products(&self) -> DbResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Cart lines of a user joined with their products.
    pub fn get_cart_lines(&self, user_id: &str) -> DbResult<Vec<CartLine>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.image_url, p.created_at, c.quantity
            FROM cart_items c
            JOIN products p ON p.id = c.product_id
            WHERE c.user_id = ?
            ORDER BY p.created_at, p.id
            "#,
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok(CartLine {
                product: product_from_row(row)?,
                quantity: row.get(6)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Add `quantity` of a product to a cart, merging with an existing line.
    pub fn add_cart_quantity(&self, user_id: &str, product_id: &str, quantity: u32) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO cart_items (user_id, product_id, quantity) VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id, product_id) DO UPDATE SET quantity = quantity + excluded.quantity
            "#,
            params![user_id, product_id, quantity],
        )?;
        Ok(())
    }

    /// Overwrite the quantity of an existing cart line.
    pub fn set_cart_quantity(&self, user_id: &str, product_id: &str, quantity: u32) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE cart_items SET quantity = ?3 WHERE user_id = ?1 AND product_id = ?2",
            params![user_id, product_id, quantity],
        )?;
        Ok(rows_affected > 0)
    }

    /// Remove a product from a cart.
    pub fn remove_cart_item(&self, user_id: &str, product_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM cart_items WHERE user_id = ?1 AND product_id = ?2",
            [user_id, product_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Redeem a user's cart in one transaction.
    pub fn checkout_cart(&self, user_id: &str) -> DbResult<CheckoutOutcome> {
        let tx = self.conn.unchecked_transaction()?;

        let available: i64 = tx
            .query_row(
                "SELECT vital_coins FROM users WHERE id = ?",
                [user_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| DbError::NotFound(format!("user {}", user_id)))?;

        let (lines, required): (i64, i64) = tx.query_row(
            r#"
            SELECT COUNT(*), COALESCE(SUM(c.quantity * p.price), 0)
            FROM cart_items c
            JOIN products p ON p.id = c.product_id
            WHERE c.user_id = ?
            "#,
            [user_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        if lines == 0 {
            return Ok(CheckoutOutcome::EmptyCart);
        }
        if available < required {
            return Ok(CheckoutOutcome::InsufficientCoins { required, available });
        }

        let purchase = RedeemedPurchase {
            id: new_id(),
            user_id: user_id.to_string(),
            points: required,
            created_at: now_timestamp(),
        };

        tx.execute(
            "UPDATE users SET vital_coins = vital_coins - ?2, updated_at = ?3 WHERE id = ?1",
            params![user_id, required, purchase.created_at],
        )?;
        tx.execute(
            "INSERT INTO redeemed_purchases (id, user_id, points, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![purchase.id, purchase.user_id, purchase.points, purchase.created_at],
        )?;
        tx.execute("DELETE FROM cart_items WHERE user_id = ?", [user_id])?;
        tx.commit()?;

        Ok(CheckoutOutcome::Completed(CheckoutReceipt {
            purchase,
            remaining_coins: available - required,
        }))
    }

    /// Most recent purchases with the buyer's name.
    pub fn recent_purchases(&self, limit: usize) -> DbResult<Vec<PurchaseSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT u.name, r.points, r.created_at
            FROM redeemed_purchases r
            JOIN users u ON u.id = r.user_id
            ORDER BY r.created_at DESC, r.id
            LIMIT ?
            "#,
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok(PurchaseSummary {
                user_name: row.get(0)?,
                points: row.get(1)?,
                date: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Sum of VitalCoins ever redeemed.
    pub fn total_redeemed(&self) -> DbResult<i64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(points), 0) FROM redeemed_purchases",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        image_url: row.get(4)?,
        created_at: row.get(5)?,
    })
}
