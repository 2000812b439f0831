//! Shopping cart model.
//!
//! The cart is a list of lines keyed by product variant. Totals and item
//! counts are always derived from the lines, never stored, so the two can
//! never drift apart.

use serde::{Deserialize, Serialize};

use fashion_store_core::{Price, ProductId};

// =============================================================================
// VariantKey
// =============================================================================

/// Identity of a cart line: the same product in a different size or color
/// is a separate line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantKey {
    /// Product ID.
    pub product_id: ProductId,
    /// Selected size.
    pub size: String,
    /// Selected color.
    pub color: String,
}

impl VariantKey {
    /// Create a variant key.
    pub fn new(
        product_id: impl Into<ProductId>,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.into(),
            color: color.into(),
        }
    }
}

// =============================================================================
// CartLine
// =============================================================================

/// One product variant in the cart, with the details captured when it was
/// added.
///
/// The unit price is a snapshot; a later catalog price change does not
/// reprice lines already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name at the time of adding.
    pub name: String,
    /// Unit price at the time of adding.
    pub unit_price: Price,
    /// Number of units.
    pub quantity: u32,
    /// Selected size.
    pub size: String,
    /// Selected color.
    pub color: String,
    /// Product image URL, if any.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CartLine {
    /// Whether this line is for the given variant.
    #[must_use]
    pub fn is_variant(&self, key: &VariantKey) -> bool {
        self.product_id == key.product_id && self.size == key.size && self.color == key.color
    }

    /// This line's variant key.
    #[must_use]
    pub fn variant_key(&self) -> VariantKey {
        VariantKey {
            product_id: self.product_id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    /// Line subtotal (unit price times quantity).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A shopping cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Rebuild a cart from persisted lines.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The cart's lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consume the cart, yielding its lines for persistence.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a line to the cart.
    ///
    /// If a line for the same variant already exists, its quantity is
    /// increased instead and the existing snapshot (name, price, image) is
    /// kept.
    pub fn add(&mut self, line: CartLine) {
        let key = line.variant_key();
        if let Some(existing) = self.lines.iter_mut().find(|l| l.is_variant(&key)) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
    }

    /// Set the quantity of the given variant.
    ///
    /// A quantity of zero or less removes the line. Unknown variants are
    /// ignored.
    pub fn update_quantity(&mut self, key: &VariantKey, quantity: i64) {
        match u32::try_from(quantity) {
            Ok(0) | Err(_) if quantity <= 0 => self.remove(key),
            Ok(quantity) => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.is_variant(key)) {
                    line.quantity = quantity;
                }
            }
            // Larger than u32: clamp rather than wrap
            Err(_) => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.is_variant(key)) {
                    line.quantity = u32::MAX;
                }
            }
        }
    }

    /// Remove the given variant from the cart.
    pub fn remove(&mut self, key: &VariantKey) {
        self.lines.retain(|l| !l.is_variant(key));
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product_id: &str, size: &str, color: &str, quantity: u32, price: &str) -> CartLine {
        CartLine {
            product_id: ProductId::from(product_id),
            name: format!("Product {product_id}"),
            unit_price: price.parse().unwrap(),
            quantity,
            size: size.to_string(),
            color: color.to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_add_merges_same_variant() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 2, "99.90"));
        cart.add(line("p1", "M", "Black", 3, "99.90"));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_keeps_distinct_variants_separate() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 1, "99.90"));
        cart.add(line("p1", "G", "Black", 1, "99.90"));
        cart.add(line("p1", "M", "White", 1, "99.90"));
        cart.add(line("p2", "M", "Black", 1, "59.90"));

        assert_eq!(cart.lines().len(), 4);
    }

    #[test]
    fn test_merge_keeps_original_price_snapshot() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 1, "99.90"));
        cart.add(line("p1", "M", "Black", 1, "149.90"));

        assert_eq!(cart.lines()[0].unit_price, "99.90".parse().unwrap());
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_sets_quantity() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 1, "99.90"));
        cart.update_quantity(&VariantKey::new("p1", "M", "Black"), 7);

        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 3, "99.90"));
        cart.update_quantity(&VariantKey::new("p1", "M", "Black"), 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_negative_removes_line() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 3, "99.90"));
        cart.update_quantity(&VariantKey::new("p1", "M", "Black"), -2);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_variant_is_noop() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 3, "99.90"));
        cart.update_quantity(&VariantKey::new("p1", "G", "Black"), 1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_remove_only_matching_variant() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 1, "99.90"));
        cart.add(line("p1", "G", "Black", 2, "99.90"));
        cart.remove(&VariantKey::new("p1", "M", "Black"));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].size, "G");

        // Removing the same variant again is a no-op
        cart.remove(&VariantKey::new("p1", "M", "Black"));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 1, "99.90"));
        cart.add(line("p2", "G", "White", 2, "59.90"));
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_total_sums_line_subtotals() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 2, "99.90"));
        cart.add(line("p2", "G", "White", 3, "59.90"));

        // 2 * 99.90 + 3 * 59.90 = 199.80 + 179.70 = 379.50
        assert_eq!(cart.total(), "379.50".parse().unwrap());

        // Totals follow quantity changes with no cached value in between
        cart.update_quantity(&VariantKey::new("p2", "G", "White"), 1);
        assert_eq!(cart.total(), "259.70".parse().unwrap());
    }

    #[test]
    fn test_count_sums_quantities() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", 2, "99.90"));
        cart.add(line("p2", "G", "White", 3, "59.90"));

        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn test_quantity_saturates_on_overflow() {
        let mut cart = Cart::default();
        cart.add(line("p1", "M", "Black", u32::MAX, "1.00"));
        cart.add(line("p1", "M", "Black", 10, "1.00"));

        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::default();
        assert!(cart.total().is_zero());
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_lines_round_trip_json() {
        let mut cart = Cart::default();
        cart.add(line("p2", "G", "White", 1, "59.90"));
        cart.add(line("p1", "M", "Black", 2, "99.90"));

        let json = serde_json::to_string(cart.lines()).unwrap();
        let lines: Vec<CartLine> = serde_json::from_str(&json).unwrap();
        let restored = Cart::from_lines(lines);

        assert_eq!(restored, cart);
        assert_eq!(restored.lines()[0].product_id, ProductId::from("p2"));
    }
}
