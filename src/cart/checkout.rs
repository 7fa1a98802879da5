use crate::format::format_price;

use super::model::{CartLine, subtotal};

/// What `CartManager::checkout` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to order; storage untouched.
    Empty,
    /// A previous checkout is still waiting to clear the cart.
    AlreadyPending,
    /// The hand-off link was opened; the cart clears after the delay.
    Redirecting { url: String },
}

/// Human-readable order summary sent through the messaging link.
pub fn order_message(lines: &[CartLine], currency_symbol: &str) -> String {
    let mut message = String::from("*NEW ORDER REQUEST*\n\n*🛒 Order Summary*\n\n");

    for line in lines {
        message.push_str(&format!("✔️ *{}*\n", line.name));
        message.push_str(&format!(
            "   Quantity: {} x {} = {}\n\n",
            line.quantity,
            format_price(currency_symbol, line.price),
            format_price(currency_symbol, line.line_total()),
        ));
    }

    message.push_str(&format!(
        "*Total: {}*\n\n",
        format_price(currency_symbol, subtotal(lines))
    ));
    message.push_str("Please provide your shipping details to complete the order.");
    message
}
