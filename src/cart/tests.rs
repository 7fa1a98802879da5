use std::time::{Duration, Instant};

use super::model::parse_lines;
use super::*;
use crate::config::ShopSettings;
use crate::handoff::RecordingOpener;
use crate::notify::Notifier;
use crate::page::ProductCard;
use crate::storage::{KeyValueStore, MemoryStore};

fn candidate(name: &str, price: &str, image: Option<&str>) -> ProductCandidate {
    ProductCandidate {
        name: name.into(),
        price: price.into(),
        image: image.map(Into::into),
    }
}

fn manager_with(store: MemoryStore) -> (CartManager<MemoryStore>, Notifier, RecordingOpener) {
    let notifier = Notifier::default();
    let opener = RecordingOpener::default();
    let manager = CartManager::new(
        store,
        ShopSettings::default(),
        notifier.clone(),
        Box::new(opener.clone()),
    );
    (manager, notifier, opener)
}

fn manager() -> (CartManager<MemoryStore>, Notifier, RecordingOpener) {
    manager_with(MemoryStore::new())
}

#[test]
fn adding_same_name_twice_bumps_quantity() {
    let (mut cart, _, _) = manager();
    cart.add_item(&candidate("Tee", "10", Some("x"))).unwrap();
    cart.add_item(&candidate("Tee", "10", Some("x"))).unwrap();

    let lines = cart.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(cart.subtotal(), 20.0);
    assert_eq!(cart.total_item_count(), 2);
}

#[test]
fn names_are_matched_after_trimming() {
    let (mut cart, _, _) = manager();
    cart.add_item(&candidate("  Tee ", "10", None)).unwrap();
    cart.add_item(&candidate("Tee", "10", None)).unwrap();

    let lines = cart.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "Tee");
    assert_eq!(lines[0].quantity, 2);
}

#[test]
fn invalid_candidates_leave_cart_unchanged() {
    let (mut cart, notifier, _) = manager();
    cart.add_item(&candidate("Cap", "5", None)).unwrap();
    let before = cart.lines();

    assert!(matches!(
        cart.add_item(&candidate("Tee", "abc", None)),
        Err(CartError::InvalidPrice(_))
    ));
    assert!(matches!(
        cart.add_item(&candidate("Tee", "-5", None)),
        Err(CartError::InvalidPrice(_))
    ));
    assert_eq!(
        cart.add_item(&candidate("   ", "5", None)),
        Err(CartError::EmptyName)
    );

    assert_eq!(cart.lines(), before);
    assert_eq!(
        notifier.latest().map(|t| t.message),
        Some("Failed to add item to cart".to_string())
    );
}

#[test]
fn new_lines_get_placeholder_image_and_parsed_price() {
    let (mut cart, notifier, _) = manager();
    cart.add_item(&candidate("Hoodie", "45.5 GHS", Some("  "))).unwrap();

    let line = &cart.lines()[0];
    assert_eq!(line.price, 45.5);
    assert_eq!(line.image, "img/placeholder.jpg");
    assert_eq!(line.quantity, 1);
    assert_eq!(
        notifier.latest().map(|t| t.message),
        Some("Item added to cart!".to_string())
    );
}

#[test]
fn subtotal_is_sum_of_line_totals() {
    let mut store = MemoryStore::new();
    store
        .set_item(
            CART_KEY,
            r#"[{"name":"A","price":10,"image":"a","quantity":2},{"name":"B","price":5,"image":"b","quantity":1}]"#,
        )
        .unwrap();
    let (cart, _, _) = manager_with(store);
    assert_eq!(cart.subtotal(), 25.0);
    assert_eq!(cart.total_item_count(), 3);
    assert_eq!(cart.badges().get("header").unwrap().text, "3");
}

#[test]
fn remove_out_of_range_is_noop() {
    let (mut cart, _, _) = manager();
    cart.add_item(&candidate("Tee", "10", None)).unwrap();
    assert!(!cart.remove_item(1));
    assert!(!cart.remove_item(99));
    assert_eq!(cart.lines().len(), 1);
}

#[test]
fn remove_item_updates_badges_and_notifies() {
    let (mut cart, notifier, _) = manager();
    cart.add_item(&candidate("Tee", "10", None)).unwrap();
    cart.add_item(&candidate("Cap", "5", None)).unwrap();
    cart.add_item(&candidate("Cap", "5", None)).unwrap();
    assert_eq!(cart.badges().get("header").unwrap().text, "3");

    assert!(cart.remove_item(1));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.badges().get("header").unwrap().text, "1");
    assert_eq!(
        notifier.latest().map(|t| t.message),
        Some("Cap removed from cart".to_string())
    );
}

#[test]
fn set_quantity_clamps_to_one() {
    let (mut cart, _, _) = manager();
    cart.add_item(&candidate("Tee", "10", None)).unwrap();

    assert!(cart.set_quantity(0, 0));
    assert_eq!(cart.lines()[0].quantity, 1);
    assert!(cart.set_quantity(0, -7));
    assert_eq!(cart.lines()[0].quantity, 1);
    assert!(cart.set_quantity(0, 4));
    assert_eq!(cart.lines()[0].quantity, 4);
    assert_eq!(cart.badges().get("cart-pane").unwrap().text, "4");

    assert!(!cart.set_quantity(3, 2));
}

#[test]
fn every_operation_rereads_storage() {
    let (mut cart, _, _) = manager();
    cart.add_item(&candidate("Tee", "10", None)).unwrap();

    // Simulate another writer replacing the cart behind our back.
    let other = r#"[{"name":"Poster","price":3,"image":"p","quantity":5}]"#;
    cart_store_write(&mut cart, other);

    cart.add_item(&candidate("Tee", "10", None)).unwrap();
    let lines = cart.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name, "Poster");
    assert_eq!(lines[1].name, "Tee");
    assert_eq!(lines[1].quantity, 1);
}

#[test]
fn adding_keeps_normalized_stored_lines() {
    let (mut cart, _, _) = manager();
    let stored = r#"[
        {"name":"Poster","price":"3.5","image":"p.jpg","quantity":"2"},
        {"name":"Poster","price":3.5,"image":"p.jpg","quantity":1},
        {"name":"Cap","price":"abc","quantity":1}
    ]"#;
    cart_store_write(&mut cart, stored);

    cart.add_item(&candidate("Tee", "10", None)).unwrap();

    let raw = cart.store_mut_for_tests().get_item(CART_KEY).unwrap().unwrap();
    let persisted: Vec<CartLine> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, cart.lines());
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0].name, "Poster");
    assert_eq!(persisted[0].quantity, 3);
    assert_eq!(persisted[1].name, "Tee");
    assert_eq!(persisted[1].image, ShopSettings::default().placeholder_image);
    assert_eq!(cart.badges().get("header").map(|b| b.text.as_str()), Some("4"));
}

fn cart_store_write(cart: &mut CartManager<MemoryStore>, raw: &str) {
    cart.store_mut_for_tests().set_item(CART_KEY, raw).unwrap();
}

#[test]
fn stored_entries_are_normalized() {
    let raw = r#"[
        {"name":"Tee","price":"12.5","quantity":"2"},
        {"name":"  ","price":1,"quantity":1},
        {"name":"Cap","price":"abc","quantity":1},
        {"name":"Mug","price":-1,"quantity":1},
        {"name":"Tee","price":12.5,"image":"t.jpg","quantity":1},
        {"name":"Pin","price":2,"image":"pin.png","quantity":0},
        42,
        null
    ]"#;
    let lines = parse_lines(raw, "ph.jpg");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name, "Tee");
    assert_eq!(lines[0].price, 12.5);
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(lines[0].image, "ph.jpg");
    assert_eq!(lines[1].name, "Pin");
    assert_eq!(lines[1].quantity, 1);
}

#[test]
fn garbage_storage_reads_as_empty() {
    assert!(parse_lines("not json", "ph").is_empty());
    assert!(parse_lines("{\"name\":\"x\"}", "ph").is_empty());
    assert!(parse_lines("[]", "ph").is_empty());
}

#[test]
fn checkout_on_empty_cart_does_nothing_but_notify() {
    let (mut cart, notifier, opener) = manager();
    let now = Instant::now();

    assert_eq!(cart.checkout(now), CheckoutOutcome::Empty);
    assert!(opener.links().is_empty());
    assert!(!cart.checkout_pending());
    assert!(!cart.poll_checkout(now + Duration::from_secs(10)));
    assert_eq!(cart.store_mut_for_tests().get_item(CART_KEY).unwrap(), None);
    assert_eq!(notifier.messages(), vec!["Your cart is empty.".to_string()]);
}

#[test]
fn checkout_hands_off_then_clears_after_delay() {
    let (mut cart, notifier, opener) = manager();
    cart.add_item(&candidate("Tee", "10", None)).unwrap();
    cart.add_item(&candidate("Tee", "10", None)).unwrap();
    cart.add_item(&candidate("Cap", "5.5", None)).unwrap();

    let now = Instant::now();
    let outcome = cart.checkout(now);
    let CheckoutOutcome::Redirecting { url } = outcome else {
        panic!("expected redirect, got {outcome:?}");
    };
    assert!(url.starts_with("https://wa.me/233271326182?text="));
    assert_eq!(opener.links(), vec![url]);
    assert_eq!(
        notifier.latest().map(|t| t.message),
        Some("Redirecting to WhatsApp to complete your order...".to_string())
    );

    // A second checkout while waiting is refused.
    assert_eq!(cart.checkout(now), CheckoutOutcome::AlreadyPending);
    assert_eq!(opener.links().len(), 1);

    // Not yet.
    assert!(!cart.poll_checkout(now + Duration::from_millis(500)));
    assert_eq!(cart.lines().len(), 2);

    assert!(cart.poll_checkout(now + Duration::from_millis(1000)));
    assert_eq!(
        cart.store_mut_for_tests()
            .get_item(CART_KEY)
            .unwrap()
            .as_deref(),
        Some("[]")
    );
    assert!(cart.badges().iter().all(|b| b.text == "0" && !b.visible));
    assert!(!cart.checkout_pending());
    assert_eq!(
        notifier.latest().map(|t| t.message),
        Some("Your order has been placed successfully!".to_string())
    );

    let mut container = MarkupContainer::default();
    cart.render(&mut container);
    assert!(container.markup().contains("empty-cart"));
}

#[test]
fn order_message_lists_lines_and_total() {
    let lines = vec![
        CartLine {
            name: "Tee".into(),
            price: 10.0,
            image: "t".into(),
            quantity: 2,
        },
        CartLine {
            name: "Cap".into(),
            price: 5.0,
            image: "c".into(),
            quantity: 1,
        },
    ];
    let msg = order_message(&lines, "GH¢");
    assert_eq!(
        msg,
        "*NEW ORDER REQUEST*\n\n*🛒 Order Summary*\n\n\
         ✔️ *Tee*\n   Quantity: 2 x GH¢10.00 = GH¢20.00\n\n\
         ✔️ *Cap*\n   Quantity: 1 x GH¢5.00 = GH¢5.00\n\n\
         *Total: GH¢25.00*\n\n\
         Please provide your shipping details to complete the order."
    );
}

#[test]
fn render_is_idempotent_and_escapes_names() {
    let (mut cart, _, _) = manager();
    let mut container = MarkupContainer::default();
    cart.render(&mut container);
    assert!(container.markup().contains("Your cart is empty."));

    cart.add_item(&candidate("<Tee & Co>", "10", Some("tee.jpg")))
        .unwrap();
    cart.render(&mut container);
    let first = container.markup().to_string();
    cart.render(&mut container);
    assert_eq!(container.markup(), first);

    assert!(first.contains("&lt;Tee &amp; Co&gt;"));
    assert!(!first.contains("<Tee"));
    assert!(first.contains("GH¢10.00"));
    assert!(first.contains("checkout-btn"));
    assert_eq!(first.matches("class=\"cart-item\"").count(), 1);
}

#[test]
fn build_view_rows_carry_formatted_totals() {
    let lines = vec![CartLine {
        name: "Tee".into(),
        price: 12.5,
        image: "t".into(),
        quantity: 3,
    }];
    let CartView::Lines {
        rows,
        item_count,
        subtotal,
    } = build_view(&lines, "$")
    else {
        panic!("expected lines");
    };
    assert_eq!(item_count, 3);
    assert_eq!(subtotal, "$37.50");
    assert_eq!(rows[0].unit_price, "$12.50");
    assert_eq!(rows[0].line_total, "$37.50");
    assert!(build_view(&[], "$").is_empty());
}

fn card() -> ProductCard {
    ProductCard::default()
}

#[test]
fn resolve_product_prefers_data_attributes() {
    let c = ProductCard {
        data_name: Some("Tour Tee".into()),
        data_product: Some("ignored".into()),
        data_price: Some("120".into()),
        data_image: Some("img/tee.jpg".into()),
        heading: Some("Heading".into()),
        price_text: Some("GH¢ 99".into()),
        image: Some("img/other.jpg".into()),
    };
    let p = resolve_product(&c);
    assert_eq!(p.name, "Tour Tee");
    assert_eq!(p.price, "120");
    assert_eq!(p.image.as_deref(), Some("img/tee.jpg"));
}

#[test]
fn resolve_product_falls_back_to_card_content() {
    let c = ProductCard {
        data_product: Some("Cap".into()),
        price_text: Some("GH¢ 150.00 each".into()),
        image: Some("img/cap.jpg".into()),
        ..card()
    };
    let p = resolve_product(&c);
    assert_eq!(p.name, "Cap");
    assert_eq!(p.price, "150.00");
    assert_eq!(p.image.as_deref(), Some("img/cap.jpg"));

    let c = ProductCard {
        data_name: Some("   ".into()),
        heading: Some("Poster".into()),
        ..card()
    };
    let p = resolve_product(&c);
    assert_eq!(p.name, "Poster");
    assert_eq!(p.price, "");
    assert_eq!(p.image, None);

    // An unresolvable price is caught by add_item, not here.
    let (mut cart, _, _) = manager();
    assert!(cart.add_item(&p).is_err());
    assert!(cart.lines().is_empty());
}
