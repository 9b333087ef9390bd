use derive_more::Display;
use std::collections::VecDeque;
use validator::Validate;

pub type Price = u64;
pub type Quantity = u64;
pub type Id = u64;

/// Which side of the book an order rests on.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    #[display("BID")]
    Bid,
    #[display("ASK")]
    Ask,
}

/// Static configuration for the book; carries no numeric constraints, only a
/// label used in the snapshot banner and narration output.
#[derive(Display, Validate, Debug, Clone, PartialEq, Eq, Hash)]
#[display("{}", symbol)]
pub struct Instrument {
    #[validate(length(min = 1))]
    pub symbol: String,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

/// Distinguishes a plain resting order from one with a hidden reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Limit,
    Iceberg {
        peak_size: Quantity,
        peak_remaining: Quantity,
    },
}

/// A resting or incoming order.
///
/// `quantity` is the residual (unfilled) amount; for an iceberg, `kind` also
/// tracks the currently visible slice separately from the residual total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Id,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub kind: OrderKind,
}

impl Order {
    /// Builds a plain limit order. Fails if `quantity` is zero.
    pub fn new_limit(id: Id, side: Side, price: Price, quantity: Quantity) -> Result<Self, OrderBookError> {
        if quantity == 0 {
            return Err(OrderBookError::ZeroQuantity { id });
        }
        Ok(Order {
            id,
            side,
            price,
            quantity,
            kind: OrderKind::Limit,
        })
    }

    /// Builds an iceberg order. Fails if `quantity` is zero, or if
    /// `peak_size` is zero or exceeds `quantity`.
    pub fn new_iceberg(
        id: Id,
        side: Side,
        price: Price,
        quantity: Quantity,
        peak_size: Quantity,
    ) -> Result<Self, OrderBookError> {
        if quantity == 0 {
            return Err(OrderBookError::ZeroQuantity { id });
        }
        if peak_size == 0 || peak_size > quantity {
            return Err(OrderBookError::InvalidPeakSize {
                id,
                peak_size,
                quantity,
            });
        }
        Ok(Order {
            id,
            side,
            price,
            quantity,
            kind: OrderKind::Iceberg {
                peak_size,
                peak_remaining: peak_size,
            },
        })
    }

    pub fn is_iceberg(&self) -> bool {
        matches!(self.kind, OrderKind::Iceberg { .. })
    }

    /// The quantity visible to other participants: the full residual for a
    /// limit order, or the current peak for an iceberg.
    pub fn display_quantity(&self) -> Quantity {
        match self.kind {
            OrderKind::Limit => self.quantity,
            OrderKind::Iceberg { peak_remaining, .. } => peak_remaining,
        }
    }

    /// Reduces the residual quantity by `amount`, also shrinking the visible
    /// peak for an iceberg. `amount` must be in `1..=self.quantity`.
    pub fn consume(&mut self, amount: Quantity) {
        debug_assert!(amount > 0 && amount <= self.quantity);
        self.quantity -= amount;
        if let OrderKind::Iceberg { peak_remaining, .. } = &mut self.kind {
            let reduction = amount.min(*peak_remaining);
            *peak_remaining -= reduction;
        }
    }

    /// True once an iceberg's visible peak has been fully consumed but
    /// residual quantity remains, meaning it must refill before it can
    /// match again.
    pub fn needs_refill(&self) -> bool {
        matches!(self.kind, OrderKind::Iceberg { peak_remaining: 0, .. }) && self.quantity > 0
    }

    /// Refills an exhausted iceberg peak. No-op for a limit order.
    pub fn refill_peak(&mut self) {
        if let OrderKind::Iceberg {
            peak_size,
            peak_remaining,
        } = &mut self.kind
        {
            *peak_remaining = (*peak_size).min(self.quantity);
        }
    }
}

/// A resting queue of orders at a single price, FIFO by arrival.
#[derive(Debug)]
pub(crate) struct PriceLevel {
    pub(crate) price: Price,
    pub(crate) orders: VecDeque<Order>,
}

impl PriceLevel {
    pub(crate) fn new(price: Price) -> Self {
        PriceLevel {
            price,
            orders: VecDeque::new(),
        }
    }

    pub(crate) fn append(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    pub(crate) fn head(&self) -> Option<&Order> {
        self.orders.front()
    }

    pub(crate) fn head_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Order> {
        self.orders.get_mut(index)
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<Order> {
        self.orders.remove(index)
    }

    pub(crate) fn pop_head(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Moves the current head to the tail, in place. Used when an iceberg's
    /// peak refills and it must give up time priority to same-price peers.
    pub(crate) fn remove_head_and_append(&mut self) {
        if let Some(order) = self.orders.pop_front() {
            self.orders.push_back(order);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.orders.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// A completed execution between a bid and an ask participant.
#[derive(Display, Debug, Clone, PartialEq, Eq)]
#[display("{},{},{},{}", buy_order_id, sell_order_id, price, quantity)]
pub struct Trade {
    pub buy_order_id: Id,
    pub sell_order_id: Id,
    pub price: Price,
    pub quantity: Quantity,
}

impl Trade {
    pub fn new(buy_order_id: Id, sell_order_id: Id, price: Price, quantity: Quantity) -> Self {
        Trade {
            buy_order_id,
            sell_order_id,
            price,
            quantity,
        }
    }
}

pub type Trades = Vec<Trade>;

/// Every way a submission can be rejected before, or instead of, resting.
#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    #[display("malformed input line: {}", line)]
    Format { line: String },
    #[display("unknown field at index {} in line: {}", index, line)]
    Field { index: usize, line: String },
    #[display("order {} quantity is 0, no order placed", id)]
    ZeroQuantity { id: Id },
    #[display("order {} peak size {} exceeds quantity {}", id, peak_size, quantity)]
    InvalidPeakSize {
        id: Id,
        peak_size: Quantity,
        quantity: Quantity,
    },
    #[display("order {} already in book", _0)]
    DuplicateOrderId(Id),
    #[display("operation not supported: {}", operation)]
    UnsupportedOperation { operation: String },
    #[display("tick sequence regressed: saw {} after {}", got, last)]
    Monotonicity { got: u64, last: u64 },
}
