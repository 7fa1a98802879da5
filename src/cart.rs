//! Shopping cart: persisted line items, validation, totals, rendering and the
//! checkout hand-off.

mod badge;
mod checkout;
mod manager;
mod model;
mod render;
mod resolve;

pub use badge::{Badge, BadgeSet};
pub use checkout::{CheckoutOutcome, order_message};
pub use manager::{BADGE_NAMES, CartManager};
pub use model::{CART_KEY, CartError, CartLine, ProductCandidate, subtotal, total_item_count};
pub use render::{CartContainer, CartRow, CartView, MarkupContainer, build_view};
pub use resolve::resolve_product;

#[cfg(test)]
mod tests;
