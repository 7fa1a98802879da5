//! UI rendering for the terminal storefront.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Pane};
use crate::audio::{MediaBackend, PlayerPhase};
use crate::cart::CartView;
use crate::config::Settings;
use crate::format::{format_price, format_time, parse_float_prefix};
use crate::notify::ToastKind;
use crate::storage::KeyValueStore;

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Controls help for the focused pane, followed by the global keys.
fn controls_text(focus: Pane, editing: bool, seek_step: u64) -> String {
    if editing {
        return "[0-9] type quantity | [backspace] delete | [enter] apply | [esc] cancel"
            .to_string();
    }
    let pane = match focus {
        Pane::Shop => "[enter] add to cart",
        Pane::Playlist => "[enter] play/pause track | [o] open link | [n/p] next/prev",
        Pane::Cart => "[d] remove | [+/-] quantity | [e] edit quantity | [c] checkout",
    };
    format!(
        "{pane} | [tab] switch pane | [j/k] up/down | [space] play/pause | \
         [←/→] seek -/+{seek_step}s | [↑/↓] volume | [m] mute | [q] quit"
    )
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Visible window `[start, end)` keeping `selected` centered when the list
/// is taller than `height`, plus the selection's offset inside the window.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "));
    if focused {
        block.border_style(Style::default().fg(Color::Magenta))
    } else {
        block
    }
}

fn render_list(frame: &mut Frame, area: Rect, block: Block, labels: Vec<String>, selected: usize) {
    let height = area.height.saturating_sub(2) as usize;
    let total = labels.len();
    let (start, end, pos) = visible_window(total, selected.min(total.saturating_sub(1)), height);

    let items: Vec<ListItem> = labels
        .into_iter()
        .skip(start)
        .take(end - start)
        .map(ListItem::new)
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(pos));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn shop_labels<S: KeyValueStore, B: MediaBackend>(app: &App<S, B>, symbol: &str) -> Vec<String> {
    (0..app.products.len())
        .filter_map(|i| app.product_candidate(i))
        .map(|c| {
            let name = if c.name.trim().is_empty() {
                "(unnamed)"
            } else {
                c.name.trim()
            };
            match parse_float_prefix(&c.price) {
                Some(p) if p.is_finite() && p >= 0.0 => {
                    format!("{name}  {}", format_price(symbol, p))
                }
                _ => format!("{name}  -"),
            }
        })
        .collect()
}

fn playlist_labels<S: KeyValueStore, B: MediaBackend>(app: &App<S, B>) -> Vec<String> {
    let state = app.player.state();
    app.player
        .playlist()
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let marker = match (state.current_index == Some(i), state.phase) {
                (true, PlayerPhase::Playing) => "▶ ",
                (true, PlayerPhase::Loading) => "… ",
                (true, PlayerPhase::Paused) => "⏸ ",
                _ => "  ",
            };
            let link = if t.link.is_some() { " ↗" } else { "" };
            format!("{marker}{}{link}", t.display())
        })
        .collect()
}

fn cart_labels(view: &CartView) -> (Vec<String>, Option<String>) {
    match view {
        CartView::Empty => (Vec::new(), None),
        CartView::Lines {
            rows,
            item_count,
            subtotal,
        } => {
            let labels = rows
                .iter()
                .map(|r| {
                    format!(
                        "{}  {} x {} = {}",
                        r.name, r.quantity, r.unit_price, r.line_total
                    )
                })
                .collect();
            (labels, Some(format!("{item_count} items • Subtotal {subtotal}")))
        }
    }
}

/// Render the entire UI into `frame`.
pub fn draw<S: KeyValueStore, B: MediaBackend>(
    frame: &mut Frame,
    app: &App<S, B>,
    settings: &Settings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header with the cart badge.
    let badge = app
        .cart
        .badges()
        .get("header")
        .filter(|b| b.visible)
        .map(|b| format!(" 🛒 {} ", b.text))
        .unwrap_or_else(|| " 🛒 ".to_string());
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" stagefront ")
                .title_alignment(Alignment::Center)
                .title_bottom(Line::from(badge).right_aligned()),
        );
    frame.render_widget(header, chunks[0]);

    draw_player_bar(frame, app, chunks[1]);

    // Shop | Playlist | Cart
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(chunks[2]);

    render_list(
        frame,
        panes[0],
        pane_block(Pane::Shop.title(), app.focus == Pane::Shop),
        shop_labels(app, &settings.shop.currency_symbol),
        app.shop_selected,
    );
    render_list(
        frame,
        panes[1],
        pane_block(Pane::Playlist.title(), app.focus == Pane::Playlist),
        playlist_labels(app),
        app.playlist_selected,
    );

    let (cart_rows, summary) = cart_labels(&app.cart_pane.view);
    let cart_badge = app
        .cart
        .badges()
        .get("cart-pane")
        .filter(|b| b.visible)
        .map(|b| format!("Cart ({})", b.text))
        .unwrap_or_else(|| Pane::Cart.title().to_string());
    let mut cart_block = pane_block(&cart_badge, app.focus == Pane::Cart);
    if let Some(summary) = summary {
        cart_block = cart_block.title_bottom(Line::from(format!(" {summary} ")).right_aligned());
    }
    if cart_rows.is_empty() {
        let empty = Paragraph::new("Your cart is empty.")
            .alignment(Alignment::Center)
            .italic()
            .block(cart_block);
        frame.render_widget(empty, panes[2]);
    } else {
        render_list(frame, panes[2], cart_block, cart_rows, app.cart_selected);
    }

    // Latest notification.
    let toast = app.notifier.latest();
    let (toast_text, toast_style) = match &toast {
        Some(t) => {
            let color = match t.kind {
                ToastKind::Info => Color::Cyan,
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
            };
            (t.message.as_str(), Style::default().fg(color))
        }
        None => ("", Style::default()),
    };
    let toast_par = Paragraph::new(Span::styled(toast_text, toast_style))
        .block(Block::bordered().padding(LEFT_PAD).title(" notifications "));
    frame.render_widget(toast_par, chunks[3]);

    if let Some(input) = &app.quantity_input {
        let popup = centered_rect_sized(30, 3, panes[2]);
        frame.render_widget(Clear, popup);
        let field = Paragraph::new(format!("{input}▏"))
            .block(Block::bordered().padding(LEFT_PAD).title(" quantity "));
        frame.render_widget(field, popup);
    }

    let footer = Paragraph::new(controls_text(
        app.focus,
        app.text_input_active(),
        settings.player.seek_step_seconds,
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" controls ")
            .padding(LEFT_PAD),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_player_bar<S: KeyValueStore, B: MediaBackend>(
    frame: &mut Frame,
    app: &App<S, B>,
    area: Rect,
) {
    let player = &app.player;
    let block = Block::bordered().padding(LEFT_PAD).title(" now playing ");

    if !player.transport_visible() {
        let idle = Paragraph::new("Nothing playing. Pick a track in the playlist.")
            .italic()
            .block(block);
        frame.render_widget(idle, area);
        return;
    }

    let state = player.state();
    let phase = match state.phase {
        PlayerPhase::Idle => "Stopped",
        PlayerPhase::Loading => "Loading",
        PlayerPhase::Playing => "Playing",
        PlayerPhase::Paused => "Paused",
    };
    let (title, artist) = player
        .now_playing()
        .map(|np| (np.title, np.artist))
        .unwrap_or_default();

    let inner_width = area.width.saturating_sub(4) as usize;
    let times = format!(
        " {} / {} ",
        format_time(state.position_seconds),
        format_time(state.duration_seconds)
    );
    let bar_width = inner_width.saturating_sub(times.chars().count() + 8).max(10);
    let filled = ((player.progress_percent() / 100.0) * bar_width as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "━".repeat(filled.min(bar_width)),
        "─".repeat(bar_width - filled.min(bar_width))
    );
    let volume = format!(
        " {} {:>3}%",
        player.volume_icon().glyph(),
        (state.volume * 100.0).round() as u32
    );

    let lines = vec![
        Line::from(vec![
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" — "),
            Span::raw(artist),
            Span::raw(format!("  [{phase}]")).dim(),
        ]),
        Line::from(vec![
            Span::styled(bar, Style::default().fg(Color::Magenta)),
            Span::raw(times),
            Span::raw(volume),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_window_centers_selection() {
        assert_eq!(visible_window(5, 3, 10), (0, 5, 3));
        assert_eq!(visible_window(100, 50, 10), (45, 55, 5));
        assert_eq!(visible_window(100, 2, 10), (0, 10, 2));
        assert_eq!(visible_window(100, 99, 10), (90, 100, 9));
    }

    #[test]
    fn controls_follow_focus_and_input_mode() {
        assert!(controls_text(Pane::Shop, false, 5).contains("[enter] add to cart"));
        assert!(controls_text(Pane::Cart, false, 5).contains("[c] checkout"));
        assert!(controls_text(Pane::Playlist, false, 7).contains("-/+7s"));
        assert!(controls_text(Pane::Cart, true, 5).starts_with("[0-9]"));
    }
}
