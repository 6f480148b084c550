//! Cart aggregate

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product in a cart. Name, price and images are denormalized at
/// add-time; the line does not follow later catalog edits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub qty: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

/// Ordered list of cart lines, at most one line per product.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Merge a line into the cart: an existing line for the same product
    /// grows by the incoming quantity, otherwise the line is appended.
    pub fn add(&mut self, line: CartLine) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            existing.qty += line.qty;
        } else {
            self.lines.push(line);
        }
    }

    /// Set a line's quantity exactly. Zero is rejected (removal is
    /// [`Cart::remove`]). Returns whether the cart changed.
    pub fn set_quantity(&mut self, product_id: Uuid, qty: u32) -> bool {
        if qty < 1 {
            return false;
        }
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.qty = qty;
                true
            }
            None => false,
        }
    }

    /// Drop the line for a product; no-op when absent.
    pub fn remove(&mut self, product_id: Uuid) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}
