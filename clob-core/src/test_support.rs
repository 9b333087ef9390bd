#![cfg(test)]

use crate::order_book::Book;
use crate::types::{Id, Instrument, Order, Price, Quantity, Side};

pub(crate) fn new_book() -> Book {
    Book::new(Instrument::new("TEST"))
}

pub(crate) fn limit(id: Id, side: Side, price: Price, quantity: Quantity) -> Order {
    Order::new_limit(id, side, price, quantity).unwrap()
}

#[allow(dead_code)]
pub(crate) fn iceberg(id: Id, side: Side, price: Price, quantity: Quantity, peak_size: Quantity) -> Order {
    Order::new_iceberg(id, side, price, quantity, peak_size).unwrap()
}
