use std::time::{Duration, Instant};

use crate::config::ShopSettings;
use crate::handoff::{LinkOpener, ORDER_DESTINATION, messaging_link};
use crate::notify::Notifier;
use crate::storage::KeyValueStore;

use super::badge::BadgeSet;
use super::checkout::{CheckoutOutcome, order_message};
use super::model::{
    CART_KEY, CartError, CartLine, ProductCandidate, parse_lines, subtotal, total_item_count,
    validate_candidate,
};
use super::render::{CartContainer, build_view};

/// Badge displays kept in sync with the cart count.
pub const BADGE_NAMES: &[&str] = &["header", "cart-pane"];

/// Owns the persisted cart and every operation on it.
///
/// The store is the only source of truth: each operation re-reads the
/// persisted lines before touching them and writes them back afterwards.
/// Another process sharing the same store can still interleave a write
/// between our read and write (last write wins).
pub struct CartManager<S: KeyValueStore> {
    store: S,
    settings: ShopSettings,
    notifier: Notifier,
    opener: Box<dyn LinkOpener>,
    badges: BadgeSet,
    clear_due: Option<Instant>,
}

impl<S: KeyValueStore> CartManager<S> {
    pub fn new(
        store: S,
        settings: ShopSettings,
        notifier: Notifier,
        opener: Box<dyn LinkOpener>,
    ) -> Self {
        let mut manager = Self {
            store,
            settings,
            notifier,
            opener,
            badges: BadgeSet::new(BADGE_NAMES),
            clear_due: None,
        };
        manager.refresh_badges();
        manager
    }

    fn load_lines(&self) -> Vec<CartLine> {
        match self.store.get_item(CART_KEY) {
            Ok(Some(raw)) => parse_lines(&raw, &self.settings.placeholder_image),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read cart");
                Vec::new()
            }
        }
    }

    fn save_lines(&mut self, lines: &[CartLine]) {
        let json = match serde_json::to_string(lines) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.store.set_item(CART_KEY, &json) {
            tracing::error!(error = %e, "failed to persist cart");
        }
    }

    fn refresh_badges(&mut self) {
        let count = total_item_count(&self.load_lines());
        self.badges.set_count(count);
    }

    /// Current lines, in persisted order.
    pub fn lines(&self) -> Vec<CartLine> {
        self.load_lines()
    }

    pub fn badges(&self) -> &BadgeSet {
        &self.badges
    }

    #[cfg(test)]
    pub(crate) fn store_mut_for_tests(&mut self) -> &mut S {
        &mut self.store
    }

    /// Add one unit of `candidate`. An existing line with the same name gets
    /// its quantity bumped; otherwise a new line with quantity 1 is appended.
    pub fn add_item(&mut self, candidate: &ProductCandidate) -> Result<(), CartError> {
        let (name, price) = match validate_candidate(candidate) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, ?candidate, "rejected add to cart");
                self.notifier.error("Failed to add item to cart");
                return Err(e);
            }
        };

        let mut lines = self.load_lines();
        match lines.iter_mut().find(|l| l.name == name) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
            }
            None => {
                let image = candidate
                    .image
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(self.settings.placeholder_image.as_str())
                    .to_string();
                lines.push(CartLine {
                    name: name.clone(),
                    price,
                    image,
                    quantity: 1,
                });
            }
        }

        self.save_lines(&lines);
        self.badges.set_count(total_item_count(&lines));
        tracing::info!(%name, "added to cart");
        self.notifier.success("Item added to cart!");
        Ok(())
    }

    /// Remove the line at `index`. Out-of-range indices are ignored.
    pub fn remove_item(&mut self, index: usize) -> bool {
        let mut lines = self.load_lines();
        if index >= lines.len() {
            tracing::debug!(index, len = lines.len(), "remove index out of range");
            return false;
        }

        let removed = lines.remove(index);
        self.save_lines(&lines);
        self.badges.set_count(total_item_count(&lines));
        self.notifier.info(format!("{} removed from cart", removed.name));
        true
    }

    /// Set the quantity of the line at `index`, clamping to at least 1.
    /// Out-of-range indices are ignored.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> bool {
        let mut lines = self.load_lines();
        let Some(line) = lines.get_mut(index) else {
            tracing::debug!(index, "set_quantity index out of range");
            return false;
        };

        line.quantity = quantity.clamp(1, i64::from(u32::MAX)) as u32;
        self.save_lines(&lines);
        self.badges.set_count(total_item_count(&lines));
        true
    }

    /// Sum of quantities over all lines.
    pub fn total_item_count(&self) -> u32 {
        total_item_count(&self.load_lines())
    }

    pub fn subtotal(&self) -> f64 {
        subtotal(&self.load_lines())
    }

    /// Rebuild `container` from the persisted cart.
    pub fn render(&self, container: &mut dyn CartContainer) {
        let view = build_view(&self.load_lines(), &self.settings.currency_symbol);
        container.replace_children(&view);
    }

    /// Send the order summary through the messaging link. The cart itself is
    /// cleared by `poll_checkout` once the configured delay has passed.
    pub fn checkout(&mut self, now: Instant) -> CheckoutOutcome {
        if self.clear_due.is_some() {
            tracing::debug!("checkout already in progress");
            return CheckoutOutcome::AlreadyPending;
        }

        let lines = self.load_lines();
        if lines.is_empty() {
            self.notifier.info("Your cart is empty.");
            return CheckoutOutcome::Empty;
        }

        let message = order_message(&lines, &self.settings.currency_symbol);
        let url = messaging_link(ORDER_DESTINATION, &message);
        if let Err(e) = self.opener.open(&url) {
            tracing::error!(error = %e, "failed to open checkout link");
        }
        self.notifier.info("Redirecting to WhatsApp to complete your order...");

        self.clear_due = Some(now + Duration::from_millis(self.settings.checkout_clear_delay_ms));
        tracing::info!(lines = lines.len(), "checkout handed off");
        CheckoutOutcome::Redirecting { url }
    }

    pub fn checkout_pending(&self) -> bool {
        self.clear_due.is_some()
    }

    /// Finish a pending checkout once its delay has elapsed. Returns `true`
    /// when the cart was cleared (callers should re-render).
    pub fn poll_checkout(&mut self, now: Instant) -> bool {
        match self.clear_due {
            Some(due) if now >= due => {
                self.clear_due = None;
                self.save_lines(&[]);
                self.badges.reset();
                self.notifier.success("Your order has been placed successfully!");
                true
            }
            _ => false,
        }
    }
}
