//! A pure, side-effect-free lexer for SETSmm order-entry lines.
//!
//! `<side>,<identity>,<price>,<quantity>[,<peak_size>]` where `side` is `B`
//! or `A`; presence of the fifth field makes the order an iceberg.

use crate::types::{Id, Order, OrderBookError, Price, Quantity, Side};

/// Field names in schema order, used only to name the first field beyond the
/// schema when a line carries more fields than SETSmm defines.
const FIELD_NAMES: [&str; 5] = ["side", "identity", "price", "quantity", "peak_size"];

/// Parses one SETSmm line into an order. Never touches a book.
pub fn parse_line(line: &str) -> Result<Order, OrderBookError> {
    let trimmed = line.trim();
    let format_err = || OrderBookError::Format {
        line: trimmed.to_string(),
    };

    if trimmed.is_empty() {
        return Err(format_err());
    }

    let fields: Vec<&str> = trimmed.split(',').collect();
    if fields.len() < 4 {
        return Err(format_err());
    }
    if fields.len() > FIELD_NAMES.len() {
        return Err(OrderBookError::Field {
            index: FIELD_NAMES.len(),
            line: trimmed.to_string(),
        });
    }

    let side = match fields[0] {
        "B" => Side::Bid,
        "A" => Side::Ask,
        _ => return Err(format_err()),
    };

    let id: Id = fields[1].parse().map_err(|_| format_err())?;
    let price: Price = fields[2].parse().map_err(|_| format_err())?;
    let quantity: Quantity = fields[3].parse().map_err(|_| format_err())?;

    if fields.len() == 5 {
        let peak_size: Quantity = fields[4].parse().map_err(|_| format_err())?;
        Order::new_iceberg(id, side, price, quantity, peak_size)
    } else {
        Order::new_limit(id, side, price, quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_limit_line() {
        let order = parse_line("B,1234567890,32503,1234567890").unwrap();
        assert_eq!(order.side, Side::Bid);
        assert_eq!(order.id, 1234567890);
        assert_eq!(order.price, 32503);
        assert_eq!(order.quantity, 1234567890);
        assert!(!order.is_iceberg());
    }

    #[test]
    fn parses_an_iceberg_line() {
        let order = parse_line("B,99,100,100000,10000").unwrap();
        assert!(order.is_iceberg());
        assert_eq!(order.display_quantity(), 10000);
    }

    #[test]
    fn ask_side_character() {
        let order = parse_line("A,1,100,10").unwrap();
        assert_eq!(order.side, Side::Ask);
    }

    #[test]
    fn rejects_unknown_side_character() {
        let err = parse_line("X,1,100,10").unwrap_err();
        assert!(matches!(err, OrderBookError::Format { .. }));
    }

    #[test]
    fn rejects_lowercase_side_character() {
        let err = parse_line("b,1,100,10").unwrap_err();
        assert!(matches!(err, OrderBookError::Format { .. }));
    }

    #[test]
    fn rejects_too_few_fields() {
        let err = parse_line("B,1,100").unwrap_err();
        assert!(matches!(err, OrderBookError::Format { .. }));
    }

    #[test]
    fn rejects_too_many_fields_as_field_error() {
        let err = parse_line("B,1,100,10,5,extra").unwrap_err();
        assert!(matches!(err, OrderBookError::Field { index: 5, .. }));
    }

    #[test]
    fn rejects_non_integer_field() {
        let err = parse_line("B,1,abc,10").unwrap_err();
        assert!(matches!(err, OrderBookError::Format { .. }));
    }

    #[test]
    fn propagates_invalid_peak_size() {
        let err = parse_line("B,1,100,50,51").unwrap_err();
        assert!(matches!(err, OrderBookError::InvalidPeakSize { .. }));
    }

    #[test]
    fn rejects_empty_line() {
        let err = parse_line("   ").unwrap_err();
        assert!(matches!(err, OrderBookError::Format { .. }));
    }
}
