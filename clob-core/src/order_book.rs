use crate::types::{Id, Instrument, Order, OrderBookError, Price, PriceLevel, Side, Trade, Trades};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A central limit order book: two price-time-priority ladders plus the
/// iceberg-aware matching algorithm that runs between them.
///
/// `submit` is the only mutating entry point. It either rests the incoming
/// order untouched, matches it against the opposite ladder (possibly across
/// several price levels, possibly fanning out across several iceberg peers
/// at one level), or some mixture of the two, leaving any residual resting.
pub struct Book {
    pub instrument: Instrument,
    bids: BTreeMap<Price, PriceLevel>,
    asks: BTreeMap<Price, PriceLevel>,
    id_index: HashSet<Id>,
    best_bid: Option<Price>,
    best_ask: Option<Price>,
    tick_tape: u64,
}

impl Book {
    pub fn new(instrument: Instrument) -> Self {
        Book {
            instrument,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            id_index: HashSet::new(),
            best_bid: None,
            best_ask: None,
            tick_tape: 0,
        }
    }

    /// Highest-priced resting bid, or `None` if the bid side is empty.
    pub fn best_bid(&self) -> Option<Price> {
        self.best_bid
    }

    /// Lowest-priced resting ask, or `None` if the ask side is empty.
    pub fn best_ask(&self) -> Option<Price> {
        self.best_ask
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// The last tick index the book was advanced to.
    pub fn tick_tape(&self) -> u64 {
        self.tick_tape
    }

    /// Advances the book's tick tape. Indices must be non-decreasing; `0`
    /// is the unset sentinel and never counts as a regression.
    pub fn set_tick_tape(&mut self, index: u64) -> Result<(), OrderBookError> {
        if index > 0 && index < self.tick_tape {
            return Err(OrderBookError::Monotonicity {
                got: index,
                last: self.tick_tape,
            });
        }
        self.tick_tape = index;
        Ok(())
    }

    /// Cancelling a resting order is not yet supported.
    pub fn cancel(&mut self, _id: Id) -> Result<(), OrderBookError> {
        Err(OrderBookError::UnsupportedOperation {
            operation: "cancel".to_string(),
        })
    }

    /// Modifying a resting order is not yet supported.
    pub fn modify(&mut self, _id: Id) -> Result<(), OrderBookError> {
        Err(OrderBookError::UnsupportedOperation {
            operation: "modify".to_string(),
        })
    }

    /// Resting bids, best first (highest price, then arrival order within a
    /// level).
    pub fn bid_rows(&self) -> impl Iterator<Item = &Order> {
        self.bids.values().rev().flat_map(|level| level.orders.iter())
    }

    /// Resting asks, best first (lowest price, then arrival order within a
    /// level).
    pub fn ask_rows(&self) -> impl Iterator<Item = &Order> {
        self.asks.values().flat_map(|level| level.orders.iter())
    }

    /// Submits an order to the book: matches it against the opposite side,
    /// then rests whatever residual remains. Returns every trade produced.
    pub fn submit(&mut self, mut incoming: Order) -> Result<Trades, OrderBookError> {
        if self.id_index.contains(&incoming.id) {
            return Err(OrderBookError::DuplicateOrderId(incoming.id));
        }

        let trades = self.match_incoming(&mut incoming);

        if incoming.quantity > 0 {
            self.rest(incoming);
        }

        Ok(trades)
    }

    fn rest(&mut self, order: Order) {
        let side = order.side;
        let price = order.price;
        self.id_index.insert(order.id);
        let ladder = self.ladder_mut(side);
        ladder
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .append(order);
        self.refresh_best(side);
    }

    fn ladder_mut(&mut self, side: Side) -> &mut BTreeMap<Price, PriceLevel> {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    fn refresh_best(&mut self, side: Side) {
        match side {
            Side::Bid => self.best_bid = self.bids.keys().next_back().copied(),
            Side::Ask => self.best_ask = self.asks.keys().next().copied(),
        }
    }

    /// Drains the opposite ladder one crossing price level at a time until
    /// the incoming order is filled or no more crossing liquidity remains.
    fn match_incoming(&mut self, incoming: &mut Order) -> Trades {
        let mut trades = Vec::new();

        loop {
            if incoming.quantity == 0 {
                break;
            }

            let opposite_side = match incoming.side {
                Side::Bid => Side::Ask,
                Side::Ask => Side::Bid,
            };
            let opposite = self.ladder_mut(opposite_side);

            let top_price = match incoming.side {
                Side::Bid => opposite.keys().next().copied(),
                Side::Ask => opposite.keys().next_back().copied(),
            };
            let price = match top_price {
                Some(p) => p,
                None => break,
            };

            let crosses = match incoming.side {
                Side::Bid => incoming.price >= price,
                Side::Ask => incoming.price <= price,
            };
            if !crosses {
                break;
            }

            let level = opposite.get_mut(&price).expect("top price exists");
            Self::drain_level(incoming, level, price, &mut trades);

            let level_empty = level.is_empty();
            if level_empty {
                opposite.remove(&price);
            }
            self.refresh_best(opposite_side);
        }

        trades
    }

    /// Drains a single price level against the incoming order, per spec
    /// cases A/B/C: full fill against a sufficient display, iceberg fan-out
    /// across peers, or partial drain of a head that cannot alone satisfy
    /// the incoming order.
    fn drain_level(incoming: &mut Order, level: &mut PriceLevel, price: Price, trades: &mut Trades) {
        while incoming.quantity > 0 && !level.is_empty() {
            let fan_out_needed = {
                let head = level.head().expect("level is non-empty");
                head.is_iceberg() && head.display_quantity() < incoming.quantity && level.len() > 1
            };
            if fan_out_needed {
                Self::fan_out(incoming, level, price, trades);
                continue;
            }

            let head_sufficient = {
                let head = level.head().expect("level is non-empty");
                head.display_quantity() >= incoming.quantity
            };
            if head_sufficient {
                Self::full_fill_against_head(incoming, level, price, trades);
                break;
            }

            Self::partial_drain_head(incoming, level, price, trades);
        }
    }

    /// Case A: the head's visible quantity alone can fill the incoming
    /// order. If the head is an iceberg that exhausts its peak here, it
    /// refills and, when peers are present, rotates to the tail.
    fn full_fill_against_head(incoming: &mut Order, level: &mut PriceLevel, price: Price, trades: &mut Trades) {
        let other_peers_exist = level.len() > 1;
        let matched = incoming.quantity;

        let resting_id = {
            let head = level.head_mut().expect("level is non-empty");
            let id = head.id;
            head.consume(matched);
            id
        };
        incoming.quantity = 0;

        let (head_empty, head_needs_refill) = {
            let head = level.head().expect("head still present");
            (head.quantity == 0, head.needs_refill())
        };

        if head_empty {
            level.pop_head();
        } else if head_needs_refill {
            level.head_mut().expect("head still present").refill_peak();
            if other_peers_exist {
                level.remove_head_and_append();
            }
        }

        trades.push(trade_from(incoming.side, incoming.id, resting_id, price, matched));
    }

    /// Case C: the head cannot alone satisfy the incoming order. A limit
    /// head drains fully and the level continues to its next order. A sole
    /// iceberg (no peers to fan out across) drains peak-by-peak: execute the
    /// current display, refill, and repeat against the same order until
    /// either it empties or the incoming order is filled, aggregating every
    /// peak execution into a single trade.
    fn partial_drain_head(incoming: &mut Order, level: &mut PriceLevel, price: Price, trades: &mut Trades) {
        let sole_iceberg = level.len() == 1 && level.head().expect("non-empty").is_iceberg();

        if !sole_iceberg {
            let (resting_id, matched, head_empty) = {
                let head = level.head_mut().expect("level is non-empty");
                let matched = head.quantity;
                head.consume(matched);
                (head.id, matched, head.quantity == 0)
            };
            incoming.quantity -= matched;
            if head_empty {
                level.pop_head();
            }
            trades.push(trade_from(incoming.side, incoming.id, resting_id, price, matched));
            return;
        }

        let resting_id = level.head().expect("non-empty").id;
        let mut total_matched: crate::types::Quantity = 0;
        loop {
            let (matched, resting_empty) = {
                let head = level.head_mut().expect("level is non-empty");
                let matched = incoming.quantity.min(head.display_quantity());
                head.consume(matched);
                if head.needs_refill() {
                    head.refill_peak();
                }
                (matched, head.quantity == 0)
            };
            incoming.quantity -= matched;
            total_matched += matched;

            if resting_empty {
                level.pop_head();
                break;
            }
            if incoming.quantity == 0 {
                break;
            }
        }

        trades.push(trade_from(incoming.side, incoming.id, resting_id, price, total_matched));
    }

    /// Case B: an iceberg sits at the head, its display cannot alone fill
    /// the incoming order, and peers exist at this price. Rotate through
    /// the level executing against each order's current peak, wrapping
    /// around, aggregating repeated executions against the same
    /// counterparty into a single trade.
    fn fan_out(incoming: &mut Order, level: &mut PriceLevel, price: Price, trades: &mut Trades) {
        let mut order_of_contact: Vec<Id> = Vec::new();
        let mut aggregated: HashMap<Id, crate::types::Quantity> = HashMap::new();
        let mut pos = 0usize;

        while incoming.quantity > 0 && !level.is_empty() {
            let (resting_id, take, resting_empty) = {
                let resting = level.get_mut(pos).expect("pos within bounds");
                let take = incoming.quantity.min(resting.display_quantity());
                resting.consume(take);
                if resting.needs_refill() {
                    resting.refill_peak();
                }
                (resting.id, take, resting.quantity == 0)
            };

            incoming.quantity -= take;
            aggregated
                .entry(resting_id)
                .and_modify(|q| *q += take)
                .or_insert_with(|| {
                    order_of_contact.push(resting_id);
                    take
                });

            if resting_empty {
                level.remove_at(pos);
            } else {
                pos += 1;
            }
            if pos >= level.len() {
                pos = 0;
            }
        }

        for resting_id in order_of_contact {
            let matched = aggregated[&resting_id];
            trades.push(trade_from(incoming.side, incoming.id, resting_id, price, matched));
        }
    }
}

/// Resolves a resting/incoming pair into a trade, pairing the bid-side
/// participant as buyer and the ask-side participant as seller.
fn trade_from(
    incoming_side: Side,
    incoming_id: Id,
    resting_id: Id,
    price: Price,
    quantity: crate::types::Quantity,
) -> Trade {
    match incoming_side {
        Side::Bid => Trade::new(incoming_id, resting_id, price, quantity),
        Side::Ask => Trade::new(resting_id, incoming_id, price, quantity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn resting_only_book_has_no_trades() {
        let mut book = new_book();
        assert!(book.submit(limit(1, Side::Bid, 100, 10)).unwrap().is_empty());
        assert!(book.submit(limit(2, Side::Ask, 110, 10)).unwrap().is_empty());
        assert_eq!(book.best_bid(), Some(100));
        assert_eq!(book.best_ask(), Some(110));
    }

    #[test]
    fn non_crossing_order_rests() {
        let mut book = new_book();
        book.submit(limit(1, Side::Bid, 90, 100)).unwrap();
        let trades = book.submit(limit(2, Side::Ask, 100, 50)).unwrap();
        assert!(trades.is_empty());
        assert_eq!(book.best_bid(), Some(90));
        assert_eq!(book.best_ask(), Some(100));
    }

    #[test]
    fn exact_fill_consumes_both_sides() {
        let mut book = new_book();
        book.submit(limit(100322, Side::Bid, 5103, 7500)).unwrap();
        let trades = book.submit(limit(100345, Side::Ask, 5103, 7499)).unwrap();
        assert_eq!(trades, vec![Trade::new(100322, 100345, 5103, 7499)]);
        assert_eq!(book.best_bid(), Some(5103));
        let residual: Vec<&Order> = book.bid_rows().collect();
        assert_eq!(residual.len(), 1);
        assert_eq!(residual[0].quantity, 1);
    }

    #[test]
    fn aggressive_order_sweeps_multiple_ask_levels() {
        let mut book = new_book();
        book.submit(limit(10, Side::Ask, 32504, 444)).unwrap();
        book.submit(limit(11, Side::Ask, 32505, 555)).unwrap();
        book.submit(limit(12, Side::Ask, 32507, 777)).unwrap();

        let trades = book.submit(limit(99, Side::Bid, 33000, 445)).unwrap();
        assert_eq!(
            trades,
            vec![
                Trade::new(99, 10, 32504, 444),
                Trade::new(99, 11, 32505, 1),
            ]
        );
        assert_eq!(book.best_ask(), Some(32505));
        let remaining: Vec<&Order> = book.ask_rows().collect();
        assert_eq!(remaining[0].quantity, 554);
        assert!(book.best_bid().is_none());
    }

    #[test]
    fn aggressive_limit_into_two_limit_asks_then_rests_against_untouched_iceberg() {
        let mut book = new_book();
        book.submit(limit(1, Side::Bid, 99, 50_000)).unwrap();
        book.submit(limit(2, Side::Bid, 98, 25_500)).unwrap();
        book.submit(limit(3, Side::Ask, 100, 10_000)).unwrap();
        book.submit(limit(4, Side::Ask, 100, 7_500)).unwrap();
        book.submit(limit(5, Side::Ask, 101, 20_000)).unwrap();

        let incoming = Order::new_iceberg(99, Side::Bid, 100, 100_000, 10_000).unwrap();
        let trades = book.submit(incoming).unwrap();
        assert_eq!(
            trades,
            vec![Trade::new(99, 3, 100, 10_000), Trade::new(99, 4, 100, 7_500),]
        );

        let residual: Vec<&Order> = book.bid_rows().collect();
        let resting_iceberg = residual
            .iter()
            .find(|o| o.id == 99)
            .expect("iceberg residual rests");
        assert_eq!(resting_iceberg.quantity, 82_500);
        assert_eq!(resting_iceberg.display_quantity(), 10_000);
    }

    #[test]
    fn two_iceberg_fan_out_aggregates_per_counterparty() {
        let mut book = new_book();
        book.submit(Order::new_iceberg(88, Side::Bid, 100, 100_000, 10_000).unwrap())
            .unwrap();

        let trades = book.submit(limit(999, Side::Ask, 100, 10_000)).unwrap();
        assert_eq!(trades, vec![Trade::new(88, 999, 100, 10_000)]);
        let after_first: Vec<&Order> = book.bid_rows().collect();
        assert_eq!(after_first[0].quantity, 90_000);
        assert_eq!(after_first[0].display_quantity(), 10_000);

        let trades = book.submit(limit(9999, Side::Ask, 100, 11_000)).unwrap();
        assert_eq!(trades, vec![Trade::new(88, 9999, 100, 11_000)]);
        let after_second: Vec<&Order> = book.bid_rows().collect();
        assert_eq!(after_second[0].quantity, 79_000);
        assert_eq!(after_second[0].display_quantity(), 9_000);

        book.submit(Order::new_iceberg(888, Side::Bid, 100, 50_000, 20_000).unwrap())
            .unwrap();

        let trades = book.submit(limit(99999, Side::Ask, 100, 35_000)).unwrap();
        assert_eq!(
            trades,
            vec![Trade::new(88, 99999, 100, 15_000), Trade::new(888, 99999, 100, 20_000)]
        );

        let rows: Vec<&Order> = book.bid_rows().collect();
        let first = rows.iter().find(|o| o.id == 88).unwrap();
        let second = rows.iter().find(|o| o.id == 888).unwrap();
        assert_eq!(first.quantity, 64_000);
        assert_eq!(first.display_quantity(), 4_000);
        assert_eq!(second.quantity, 30_000);
        assert_eq!(second.display_quantity(), 20_000);
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let mut book = new_book();
        book.submit(limit(1, Side::Bid, 100, 10)).unwrap();
        let err = book.submit(limit(1, Side::Bid, 100, 10)).unwrap_err();
        assert_eq!(err, OrderBookError::DuplicateOrderId(1));
    }

    #[test]
    fn best_bid_is_always_below_best_ask() {
        let mut book = new_book();
        book.submit(limit(1, Side::Bid, 99, 10)).unwrap();
        book.submit(limit(2, Side::Ask, 101, 10)).unwrap();
        assert!(book.best_bid().unwrap() < book.best_ask().unwrap());
    }

    #[test]
    fn tick_tape_accepts_non_decreasing_indices() {
        let mut book = new_book();
        assert_eq!(book.tick_tape(), 0);
        book.set_tick_tape(5).unwrap();
        assert_eq!(book.tick_tape(), 5);
        book.set_tick_tape(5).unwrap();
        book.set_tick_tape(9).unwrap();
        assert_eq!(book.tick_tape(), 9);
    }

    #[test]
    fn tick_tape_rejects_a_regression() {
        let mut book = new_book();
        book.set_tick_tape(9).unwrap();
        let err = book.set_tick_tape(3).unwrap_err();
        assert_eq!(err, OrderBookError::Monotonicity { got: 3, last: 9 });
        assert_eq!(book.tick_tape(), 9);
    }

    #[test]
    fn cancel_and_modify_are_unsupported() {
        let mut book = new_book();
        book.submit(limit(1, Side::Bid, 100, 10)).unwrap();

        let cancel_err = book.cancel(1).unwrap_err();
        assert_eq!(
            cancel_err,
            OrderBookError::UnsupportedOperation {
                operation: "cancel".to_string()
            }
        );

        let modify_err = book.modify(1).unwrap_err();
        assert_eq!(
            modify_err,
            OrderBookError::UnsupportedOperation {
                operation: "modify".to_string()
            }
        );

        let residual: Vec<&Order> = book.bid_rows().collect();
        assert_eq!(residual.len(), 1);
    }
}
