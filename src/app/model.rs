//! Application model: the shop, the player and the terminal-side UI state
//! (focused pane, selections, the quantity input) tying them together.

use std::time::Instant;

use crate::audio::{AudioPlayer, MediaBackend};
use crate::cart::{CartContainer, CartManager, CartView, ProductCandidate, resolve_product};
use crate::notify::Notifier;
use crate::page::ProductCard;
use crate::storage::KeyValueStore;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Shop,
    Playlist,
    Cart,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Self::Shop => Self::Playlist,
            Self::Playlist => Self::Cart,
            Self::Cart => Self::Shop,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Shop => "Shop",
            Self::Playlist => "Playlist",
            Self::Cart => "Cart",
        }
    }
}

/// The cart pane holds the last rendered view.
#[derive(Debug, Clone)]
pub struct CartPane {
    pub view: CartView,
}

impl Default for CartPane {
    fn default() -> Self {
        Self {
            view: CartView::Empty,
        }
    }
}

impl CartContainer for CartPane {
    fn replace_children(&mut self, view: &CartView) {
        self.view = view.clone();
    }
}

/// The main application model.
pub struct App<S: KeyValueStore, B: MediaBackend> {
    pub products: Vec<ProductCard>,
    pub cart: CartManager<S>,
    pub player: AudioPlayer<B>,
    pub notifier: Notifier,
    pub cart_pane: CartPane,

    pub focus: Pane,
    pub shop_selected: usize,
    pub playlist_selected: usize,
    pub cart_selected: usize,

    /// Digits typed for the selected cart line, while the input is open.
    pub quantity_input: Option<String>,
}

impl<S: KeyValueStore, B: MediaBackend> App<S, B> {
    pub fn new(
        products: Vec<ProductCard>,
        cart: CartManager<S>,
        player: AudioPlayer<B>,
        notifier: Notifier,
    ) -> Self {
        let mut app = Self {
            products,
            cart,
            player,
            notifier,
            cart_pane: CartPane::default(),
            focus: Pane::Shop,
            shop_selected: 0,
            playlist_selected: 0,
            cart_selected: 0,
            quantity_input: None,
        };
        app.refresh_cart();
        app
    }

    /// Player shortcuts are off while this is true.
    pub fn text_input_active(&self) -> bool {
        self.quantity_input.is_some()
    }

    pub fn cycle_focus(&mut self) {
        self.quantity_input = None;
        self.focus = self.focus.next();
    }

    pub fn cart_len(&self) -> usize {
        match &self.cart_pane.view {
            CartView::Empty => 0,
            CartView::Lines { rows, .. } => rows.len(),
        }
    }

    fn pane_len(&self, pane: Pane) -> usize {
        match pane {
            Pane::Shop => self.products.len(),
            Pane::Playlist => self.player.playlist().len(),
            Pane::Cart => self.cart_len(),
        }
    }

    fn selected_mut(&mut self, pane: Pane) -> &mut usize {
        match pane {
            Pane::Shop => &mut self.shop_selected,
            Pane::Playlist => &mut self.playlist_selected,
            Pane::Cart => &mut self.cart_selected,
        }
    }

    pub fn selected(&self, pane: Pane) -> usize {
        match pane {
            Pane::Shop => self.shop_selected,
            Pane::Playlist => self.playlist_selected,
            Pane::Cart => self.cart_selected,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.pane_len(self.focus);
        let sel = self.selected_mut(self.focus);
        if *sel + 1 < len {
            *sel += 1;
        }
    }

    pub fn select_prev(&mut self) {
        let sel = self.selected_mut(self.focus);
        *sel = sel.saturating_sub(1);
    }

    /// Name and price text shown for product `index` in the shop pane.
    pub fn product_candidate(&self, index: usize) -> Option<ProductCandidate> {
        self.products.get(index).map(resolve_product)
    }

    pub fn add_selected_product(&mut self) {
        let Some(candidate) = self.product_candidate(self.shop_selected) else {
            return;
        };
        // Failures already notify and log inside the cart.
        let _ = self.cart.add_item(&candidate);
        self.refresh_cart();
    }

    pub fn toggle_selected_track(&mut self) {
        if self.playlist_selected < self.player.playlist().len() {
            self.player.toggle_track(self.playlist_selected);
        }
    }

    pub fn open_selected_link(&mut self) {
        self.player.open_link(self.playlist_selected);
    }

    pub fn remove_selected_line(&mut self) {
        if self.cart.remove_item(self.cart_selected) {
            self.refresh_cart();
        }
    }

    pub fn adjust_selected_quantity(&mut self, delta: i64) {
        let Some(current) = self.selected_quantity() else {
            return;
        };
        if self
            .cart
            .set_quantity(self.cart_selected, i64::from(current) + delta)
        {
            self.refresh_cart();
        }
    }

    fn selected_quantity(&self) -> Option<u32> {
        match &self.cart_pane.view {
            CartView::Empty => None,
            CartView::Lines { rows, .. } => rows.get(self.cart_selected).map(|r| r.quantity),
        }
    }

    pub fn begin_quantity_input(&mut self) {
        if let Some(q) = self.selected_quantity() {
            self.quantity_input = Some(q.to_string());
        }
    }

    pub fn push_input_char(&mut self, c: char) {
        if let Some(buf) = self.quantity_input.as_mut() {
            if c.is_ascii_digit() && buf.len() < 9 {
                buf.push(c);
            }
        }
    }

    pub fn pop_input_char(&mut self) {
        if let Some(buf) = self.quantity_input.as_mut() {
            buf.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.quantity_input = None;
    }

    /// Apply the typed quantity. An empty input counts as 0 and is clamped
    /// to 1 by the cart.
    pub fn commit_input(&mut self) {
        let Some(buf) = self.quantity_input.take() else {
            return;
        };
        let quantity = buf.parse::<i64>().unwrap_or(0);
        if self.cart.set_quantity(self.cart_selected, quantity) {
            self.refresh_cart();
        }
    }

    pub fn checkout(&mut self, now: Instant) {
        self.cart.checkout(now);
    }

    /// Re-render the cart pane and keep the selection inside it.
    pub fn refresh_cart(&mut self) {
        self.cart.render(&mut self.cart_pane);
        let len = self.cart_len();
        if self.cart_selected >= len {
            self.cart_selected = len.saturating_sub(1);
        }
    }

    /// Timers: player events and polling, the delayed checkout clear, toast expiry.
    pub fn tick(&mut self, now: Instant) {
        self.player.tick(now);
        if let Some(i) = self.player.state().current_index {
            if self.player.state().is_playing() && self.focus != Pane::Playlist {
                self.playlist_selected = i;
            }
        }
        if self.cart.poll_checkout(now) {
            self.refresh_cart();
        }
        self.notifier.expire(now);
    }
}
