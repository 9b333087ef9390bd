//! # CLOB Demo
//!
//! Walks through the book's seed scenarios end to end, narrating each
//! submission and printing the resulting trades and snapshot.
//!
//! This demo shows:
//! - A resting-only book with no crosses
//! - An exact fill
//! - A multi-level sweep leaving a residual
//! - An iceberg order aggressing into two limit asks at one price
//! - Two resting icebergs fanning out against one aggressive sweep

use clob_core::{format, Book, Instrument, Order, OrderBookError, Side, Trades};

fn main() {
    println!("=== Central Limit Order Book Demo ===\n");

    demo_resting_only_book();
    demo_exact_fill();
    demo_multi_level_sweep();
    demo_aggressive_into_iceberg();
    demo_two_iceberg_fan_out();
}

/// Builds a five-order book with no crossing orders at all.
fn demo_resting_only_book() {
    println!("------------------------");
    println!("1. Resting-Only Book:");
    println!("------------------------");

    let mut book = Book::new(Instrument::new("XLON"));
    submit_limit(&mut book, Side::Bid, 1234567890, 32503, 1234567890);
    submit_limit(&mut book, Side::Ask, 1234567891, 32504, 1234567890);
    submit_limit(&mut book, Side::Ask, 6808, 32505, 7777);
    submit_limit(&mut book, Side::Bid, 1138, 31502, 7500);
    submit_limit(&mut book, Side::Ask, 42100, 32507, 3000);

    print_snapshot(&book);
}

/// A resting bid exactly consumed by one incoming ask.
fn demo_exact_fill() {
    println!("------------------");
    println!("2. Exact Fill:");
    println!("------------------");

    let mut book = Book::new(Instrument::new("XLON"));
    submit_limit(&mut book, Side::Bid, 100322, 5103, 7500);
    submit_limit(&mut book, Side::Ask, 100345, 5103, 7499);

    print_snapshot(&book);
}

/// An aggressive bid sweeping two ask levels and leaving a residual.
fn demo_multi_level_sweep() {
    println!("--------------------------");
    println!("3. Multi-Level Sweep:");
    println!("--------------------------");

    let mut book = Book::new(Instrument::new("XLON"));
    submit_limit(&mut book, Side::Ask, 10, 32504, 444);
    submit_limit(&mut book, Side::Ask, 11, 32505, 555);
    submit_limit(&mut book, Side::Ask, 12, 32507, 777);
    submit_limit(&mut book, Side::Bid, 99, 33000, 445);

    print_snapshot(&book);
}

/// An aggressive iceberg eating two limit asks resting at the same price.
fn demo_aggressive_into_iceberg() {
    println!("------------------------------");
    println!("4. Aggressive Into Iceberg:");
    println!("------------------------------");

    let mut book = Book::new(Instrument::new("XLON"));
    submit_limit(&mut book, Side::Bid, 1, 99, 50_000);
    submit_limit(&mut book, Side::Bid, 2, 98, 25_500);
    submit_limit(&mut book, Side::Ask, 3, 100, 10_000);
    submit_limit(&mut book, Side::Ask, 4, 100, 7_500);
    submit_limit(&mut book, Side::Ask, 5, 101, 20_000);
    submit_iceberg(&mut book, Side::Bid, 99, 100, 100_000, 10_000);

    print_snapshot(&book);
}

/// Two resting icebergs at one price, swept three times, with the second
/// sweep fanning out across both.
fn demo_two_iceberg_fan_out() {
    println!("----------------------------");
    println!("5. Two-Iceberg Fan-Out:");
    println!("----------------------------");

    let mut book = Book::new(Instrument::new("XLON"));
    submit_iceberg(&mut book, Side::Bid, 88, 100, 100_000, 10_000);
    submit_limit(&mut book, Side::Ask, 999, 100, 10_000);
    submit_limit(&mut book, Side::Ask, 9999, 100, 11_000);
    submit_iceberg(&mut book, Side::Bid, 888, 100, 50_000, 20_000);
    submit_limit(&mut book, Side::Ask, 99999, 100, 35_000);

    print_snapshot(&book);
}

fn submit_limit(book: &mut Book, side: Side, id: u64, price: u64, quantity: u64) {
    println!("--Submitting {} limit: id={}, price={}, quantity={}", side, id, price, quantity);
    let order = Order::new_limit(id, side, price, quantity).expect("valid demo order");
    handle(book, order);
}

fn submit_iceberg(book: &mut Book, side: Side, id: u64, price: u64, quantity: u64, peak_size: u64) {
    println!(
        "--Submitting {} iceberg: id={}, price={}, quantity={}, peak_size={}",
        side, id, price, quantity, peak_size
    );
    let order = Order::new_iceberg(id, side, price, quantity, peak_size).expect("valid demo order");
    handle(book, order);
}

fn handle(book: &mut Book, order: Order) {
    match book.submit(order) {
        Ok(trades) => print_trades(&trades),
        Err(err) => print_rejection(err),
    }
}

fn print_trades(trades: &Trades) {
    if trades.is_empty() {
        println!("----No trades executed");
    } else {
        for trade in trades {
            println!("----Trade: {}", format::render_trade(trade));
        }
    }
}

fn print_rejection(err: OrderBookError) {
    println!("----Rejected: {}", err);
}

fn print_snapshot(book: &Book) {
    println!("\n{}\n", format::render_snapshot(book));
}
