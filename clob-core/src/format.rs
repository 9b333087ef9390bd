//! Rendering of book snapshots and trade lines.
//!
//! These are pure functions over read-only book/trade views: the matcher
//! invokes them as emitters but never depends on their output.

use crate::order_book::Book;
use crate::types::{Order, Trade};

const ID_W: usize = 10;
const VOL_W: usize = 13;
const PRICE_W: usize = 7;
const BID_SEG_W: usize = 1 + ID_W + 1 + VOL_W + 1 + PRICE_W;
const ASK_SEG_W: usize = 1 + PRICE_W + 1 + VOL_W + 1 + ID_W + 1;
const ROW_W: usize = BID_SEG_W + ASK_SEG_W;

/// Inserts thousands separators into a non-negative integer's decimal form.
fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let bytes = digits.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

fn border() -> String {
    format!("+{:-<w$}+", "", w = ROW_W - 2)
}

/// A header cell: one leading space, then the label left-aligned to fill
/// the rest of `width`.
fn left_cell(label: &str, width: usize) -> String {
    format!(" {:<w$}", label, w = width - 1)
}

fn title_row() -> String {
    format!(
        "|{}|{}|",
        left_cell("BUY", BID_SEG_W - 1),
        left_cell("SELL", ASK_SEG_W - 2)
    )
}

fn column_header_row() -> String {
    format!(
        "|{}|{}|{}|{}|{}|{}|",
        left_cell("Id", ID_W),
        left_cell("Volume", VOL_W),
        left_cell("Price", PRICE_W),
        left_cell("Price", PRICE_W),
        left_cell("Volume", VOL_W),
        left_cell("Id", ID_W)
    )
}

fn header_divider() -> String {
    format!(
        "+{:-<iw$}+{:-<vw$}+{:-<pw$}+{:-<pw$}+{:-<vw$}+{:-<iw$}+",
        "",
        "",
        "",
        "",
        "",
        "",
        iw = ID_W,
        vw = VOL_W,
        pw = PRICE_W
    )
}

fn bid_segment(id: &str, volume: &str, price: &str) -> String {
    format!(
        "|{:>iw$}|{:>vw$}|{:>pw$}",
        id,
        volume,
        price,
        iw = ID_W,
        vw = VOL_W,
        pw = PRICE_W
    )
}

fn ask_segment(price: &str, volume: &str, id: &str) -> String {
    format!(
        "|{:>pw$}|{:>vw$}|{:>iw$}|",
        price,
        volume,
        id,
        pw = PRICE_W,
        vw = VOL_W,
        iw = ID_W
    )
}

fn data_row(bid: Option<&Order>, ask: Option<&Order>) -> String {
    let (bid_id, bid_vol, bid_price) = match bid {
        Some(o) => (o.id.to_string(), grouped(o.display_quantity()), grouped(o.price)),
        None => (String::new(), String::new(), String::new()),
    };
    let (ask_price, ask_vol, ask_id) = match ask {
        Some(o) => (grouped(o.price), grouped(o.display_quantity()), o.id.to_string()),
        None => (String::new(), String::new(), String::new()),
    };
    format!(
        "{}{}",
        bid_segment(&bid_id, &bid_vol, &bid_price),
        ask_segment(&ask_price, &ask_vol, &ask_id)
    )
}

/// Renders the full two-column snapshot table: bids descending on the left,
/// asks ascending on the right, one row per resting order, padded with a
/// blank row where one side is shorter than the other.
pub fn render_snapshot(book: &Book) -> String {
    let bids: Vec<&Order> = book.bid_rows().collect();
    let asks: Vec<&Order> = book.ask_rows().collect();
    let rows = bids.len().max(asks.len());

    let mut lines = Vec::with_capacity(rows + 4);
    lines.push(border());
    lines.push(title_row());
    lines.push(column_header_row());
    lines.push(header_divider());
    for i in 0..rows {
        lines.push(data_row(bids.get(i).copied(), asks.get(i).copied()));
    }
    lines.push(border());
    lines.join("\n")
}

/// Renders one trade as its wire line (no trailing newline).
pub fn render_trade(trade: &Trade) -> String {
    trade.to_string()
}
