//! Shopping cart model.
//!
//! The cart is an ordered list of lines, at most one per coffee id, held in
//! the visitor's session record. All mutations are synchronous in-memory
//! operations; route handlers read the cart from the session, mutate it and
//! write it back within a single request.

use serde::{Deserialize, Serialize};
use tracing::debug;

use coffee_delivery_core::{CoffeeId, Price};

use crate::catalog::Catalog;

/// One line item: a coffee and how many of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub coffee_id: CoffeeId,
    pub quantity: u32,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Add `quantity` units of a coffee, merging into an existing line.
    ///
    /// A zero quantity is treated as one; every line holds at least one unit.
    pub fn add(&mut self, coffee_id: CoffeeId, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(line) = self.line_mut(&coffee_id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                coffee_id,
                quantity,
            });
        }
    }

    /// Adjust a line's quantity by `delta`, clamped to a minimum of one.
    ///
    /// Never removes the line; use [`Cart::remove`] for that. An unknown id
    /// is a no-op.
    pub fn change_quantity(&mut self, coffee_id: &CoffeeId, delta: i32) {
        let Some(line) = self.line_mut(coffee_id) else {
            debug!(%coffee_id, "quantity change for coffee not in cart, ignoring");
            return;
        };
        let adjusted = i64::from(line.quantity) + i64::from(delta);
        line.quantity = u32::try_from(adjusted.max(1)).unwrap_or(u32::MAX);
    }

    /// Delete a line. An unknown id is a no-op.
    pub fn remove(&mut self, coffee_id: &CoffeeId) {
        self.lines.retain(|line| &line.coffee_id != coffee_id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price × quantity over all lines.
    ///
    /// Lines referencing coffees missing from the catalog contribute
    /// nothing; they can only appear if the catalog shrinks between
    /// releases while a session survives.
    #[must_use]
    pub fn subtotal(&self, catalog: &Catalog) -> Price {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog
                    .get(&line.coffee_id)
                    .map(|coffee| coffee.price.times(line.quantity))
            })
            .sum()
    }

    fn line_mut(&mut self, coffee_id: &CoffeeId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.coffee_id == coffee_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(slug: &str) -> CoffeeId {
        CoffeeId::from(slug)
    }

    #[test]
    fn test_add_inserts_then_merges() {
        let mut cart = Cart::default();
        cart.add(id("latte"), 1);
        cart.add(id("latte"), 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let mut cart = Cart::default();
        cart.add(id("latte"), 0);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_change_quantity_clamps_at_one() {
        let mut cart = Cart::default();
        cart.add(id("latte"), 2);

        cart.change_quantity(&id("latte"), -5);
        assert_eq!(cart.item_count(), 1);

        cart.change_quantity(&id("latte"), 3);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_change_quantity_unknown_id_is_noop() {
        let mut cart = Cart::default();
        cart.add(id("latte"), 2);

        cart.change_quantity(&id("cubano"), 1);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::default();
        cart.add(id("latte"), 1);
        cart.add(id("cubano"), 1);

        cart.remove(&id("latte"));
        assert_eq!(cart.lines().len(), 1);

        cart.remove(&id("descafeinado"));
        assert_eq!(cart.lines().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_over_catalog() {
        // 2 × 9,90 + 1 × 8,90 = 28,70
        let catalog = Catalog::default();
        let mut cart = Cart::default();
        cart.add(id("expresso-tradicional"), 2);
        cart.add(id("capuccino"), 1);

        assert_eq!(cart.subtotal(&catalog), Price::from_cents(2870));
    }

    #[test]
    fn test_subtotal_skips_unknown_ids() {
        let catalog = Catalog::default();
        let mut cart = Cart::default();
        cart.add(id("descafeinado"), 3);

        assert_eq!(cart.subtotal(&catalog), Price::ZERO);
    }

    #[test]
    fn test_session_round_trip() {
        let mut cart = Cart::default();
        cart.add(id("latte"), 2);

        let json = serde_json::to_string(&cart).expect("serialize");
        let restored: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.item_count(), 2);
        assert_eq!(restored.lines().len(), 1);
    }
}
