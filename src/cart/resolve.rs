use crate::page::ProductCard;

use super::model::ProductCandidate;

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// First run of digits and dots in `text`, e.g. `"GH¢ 150.00 each"` -> `"150.00"`.
fn first_numeric_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit() || c == '.')?;
    let rest = &text[start..];
    let len = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Turn a product card into an add-to-cart candidate.
///
/// Resolution order, first non-blank value wins:
/// - name: `data_name`, `data_product`, `heading`
/// - price: `data_price`, first numeric run of `price_text`
/// - image: `data_image`, `image`
///
/// No validation happens here; `CartManager::add_item` rejects what does not parse.
pub fn resolve_product(card: &ProductCard) -> ProductCandidate {
    let name = non_blank(&card.data_name)
        .or_else(|| non_blank(&card.data_product))
        .or_else(|| non_blank(&card.heading))
        .unwrap_or_default()
        .to_string();

    let price = non_blank(&card.data_price)
        .or_else(|| card.price_text.as_deref().and_then(first_numeric_run))
        .unwrap_or_default()
        .to_string();

    let image = non_blank(&card.data_image)
        .or_else(|| non_blank(&card.image))
        .map(str::to_string);

    ProductCandidate { name, price, image }
}
