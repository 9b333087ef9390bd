//! # CLOB Core
//!
//! Matching engine for a single-instrument SETSmm-style central limit order
//! book: price-time priority, plus iceberg orders with fan-out matching
//! across same-price peers.
//!
//! ## Example
//!
//! ```rust
//! use clob_core::{Book, Instrument, Order, Side};
//!
//! let mut book = Book::new(Instrument::new("VOD.L"));
//!
//! book.submit(Order::new_limit(1, Side::Bid, 100, 10_000).unwrap()).unwrap();
//! let trades = book.submit(Order::new_limit(2, Side::Ask, 100, 4_000).unwrap()).unwrap();
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].quantity, 4_000);
//! ```

pub mod format;
pub mod order_book;
pub mod parser;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;

pub use order_book::Book;
pub use parser::parse_line;
pub use types::{Id, Instrument, Order, OrderBookError, OrderKind, Price, Quantity, Side, Trade, Trades};
