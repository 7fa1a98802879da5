//! Cart view model and its rendering targets.
//!
//! `build_view` turns the persisted lines into display-ready rows. A
//! `CartContainer` receives the whole view on every render, replacing whatever
//! it held before, so rendering twice is the same as rendering once.

use std::fmt::Write as _;

use crate::format::format_price;

use super::model::{CartLine, subtotal, total_item_count};

#[derive(Debug, Clone, PartialEq)]
pub struct CartRow {
    pub index: usize,
    pub name: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartView {
    Empty,
    Lines {
        rows: Vec<CartRow>,
        item_count: u32,
        subtotal: String,
    },
}

pub fn build_view(lines: &[CartLine], currency_symbol: &str) -> CartView {
    if lines.is_empty() {
        return CartView::Empty;
    }

    let rows = lines
        .iter()
        .enumerate()
        .map(|(index, line)| CartRow {
            index,
            name: line.name.clone(),
            image: line.image.clone(),
            unit_price: format_price(currency_symbol, line.price),
            quantity: line.quantity,
            line_total: format_price(currency_symbol, line.line_total()),
        })
        .collect();

    CartView::Lines {
        rows,
        item_count: total_item_count(lines),
        subtotal: format_price(currency_symbol, subtotal(lines)),
    }
}

/// Something a cart view can be rendered into.
pub trait CartContainer {
    /// Drop the current children and show `view` instead.
    fn replace_children(&mut self, view: &CartView);
}

/// Renders the cart as HTML markup (the storefront's checkout table).
#[derive(Debug, Default, Clone)]
pub struct MarkupContainer {
    markup: String,
}

impl MarkupContainer {
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl CartContainer for MarkupContainer {
    fn replace_children(&mut self, view: &CartView) {
        self.markup = view.to_markup();
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        matches!(self, CartView::Empty)
    }

    pub fn to_markup(&self) -> String {
        let CartView::Lines {
            rows, subtotal, ..
        } = self
        else {
            return "<div class=\"empty-cart\">Your cart is empty.</div>\n".to_string();
        };

        let mut out = String::new();
        out.push_str("<div class=\"cart-table\">\n");
        out.push_str(
            "  <div class=\"cart-header\"><div class=\"cart-col item-col\">Item</div>\
             <div class=\"cart-col price-col\">Price</div>\
             <div class=\"cart-col qty-col\">Qty</div>\
             <div class=\"cart-col total-col\">Total</div></div>\n",
        );
        for row in rows {
            let name = escape_html(&row.name);
            let _ = writeln!(
                out,
                "  <div class=\"cart-item\">\
                 <div class=\"cart-col item-col\"><img src=\"{image}\" alt=\"{name}\" class=\"cart-item-image\">\
                 <h4>{name}</h4><button class=\"remove-item\" data-index=\"{index}\">Remove</button></div>\
                 <div class=\"cart-col price-col\">{unit}</div>\
                 <div class=\"cart-col qty-col\"><input type=\"number\" min=\"1\" value=\"{qty}\" class=\"qty-input\" data-index=\"{index}\"></div>\
                 <div class=\"cart-col total-col\">{total}</div></div>",
                image = escape_html(&row.image),
                name = name,
                index = row.index,
                unit = escape_html(&row.unit_price),
                qty = row.quantity,
                total = escape_html(&row.line_total),
            );
        }
        let _ = writeln!(
            out,
            "  <div class=\"cart-footer\"><div class=\"cart-subtotal\"><span>Subtotal:</span>\
             <span class=\"subtotal-amount\">{}</span></div>\
             <button id=\"checkout-btn\" class=\"btn btn-primary\">Proceed to Checkout</button></div>",
            escape_html(subtotal)
        );
        out.push_str("</div>\n");
        out
    }
}
