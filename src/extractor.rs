use rust_decimal::Decimal;
use scraper::ElementRef;

use crate::models::Observation;
use crate::utils::error::{AppError, Result};

/// Suffix the source page appends to the stock count inside the name cell.
const STOCK_SUFFIX: &str = " in stock";

/// Symbols that mark a text run as a currency label rather than an amount.
const CURRENCY_SYMBOLS: [char; 5] = ['₹', '$', '€', '£', '¥'];

/// Extract one [`Observation`] from a wishlist table row.
///
/// The page's column layout is a fixed schema contract: cell 1 holds the
/// product name (and optionally a `"<N> in stock"` phrase), cell 2 holds the
/// price, with the current price inside an `<ins>` element and any
/// struck-through original price outside it. A missing stock phrase reads as
/// 0 ("unknown").
///
/// Fails with [`AppError::MalformedRow`] when fewer than 3 cells exist, the
/// name cell holds no text, or no price can be parsed. Row errors are meant
/// to be skipped by the caller without aborting sibling rows.
pub fn extract_row(row: ElementRef) -> Result<Observation> {
    let cells: Vec<ElementRef> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .collect();

    if cells.len() < 3 {
        return Err(AppError::malformed_row(format!(
            "expected at least 3 cells, found {}",
            cells.len()
        )));
    }

    let name_texts: Vec<&str> = cells[1]
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let name = name_texts
        .first()
        .ok_or_else(|| AppError::malformed_row("name cell holds no text"))?
        .to_string();

    let stock = name_texts
        .get(1)
        .and_then(|t| t.strip_suffix(STOCK_SUFFIX))
        .and_then(|n| n.trim().parse::<i64>().ok())
        .unwrap_or(0);

    let price = extract_price(cells[2]).ok_or_else(|| {
        AppError::malformed_row(format!("no parseable price for \"{}\"", name))
    })?;

    Ok(Observation::new(name, stock, price))
}

/// Walk the price cell for the `<ins>` (current price) element and take its
/// first text run that is an amount, not a currency label. Struck-through
/// original prices live outside `<ins>` and are never visited.
fn extract_price(cell: ElementRef) -> Option<Decimal> {
    cell.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "ins")
        .flat_map(|el| el.text())
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.contains(CURRENCY_SYMBOLS))
        .find_map(|t| t.replace(',', "").parse::<Decimal>().ok())
}
