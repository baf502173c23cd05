//! Derived statistics over normalized collections
//!
//! Pure functions: no network access, no shared state. Every derivation is
//! recomputed from scratch from the collections handed in; malformed numeric
//! fields count as zero and dangling cross-references resolve to sentinel
//! strings, so nothing in here can fail.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{parse_date, Book, BorrowRecord, Fine, Reservation, User};

pub const UNKNOWN_BOOK: &str = "Unknown Book";
pub const UNKNOWN_USER: &str = "Unknown User";

// ---------------------------------------------------------------------------
// Fine totals
// ---------------------------------------------------------------------------

/// Monetary roll-up of a fine list. Invariant: `total == pending + collected`
/// for every input, including the empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FineTotals {
    pub total: Decimal,
    pub pending: Decimal,
    pub collected: Decimal,
    pub unpaid_count: usize,
    pub paid_count: usize,
}

impl FineTotals {
    pub fn fine_count(&self) -> usize {
        self.unpaid_count + self.paid_count
    }

    /// Mean fine amount, zero for an empty list.
    pub fn average(&self) -> Decimal {
        let count = self.fine_count();
        if count == 0 {
            Decimal::ZERO
        } else {
            self.total / Decimal::from(count)
        }
    }
}

pub fn fine_totals(fines: &[Fine]) -> FineTotals {
    let mut totals = FineTotals::default();
    for fine in fines {
        totals.total += fine.amount;
        if fine.is_paid {
            totals.collected += fine.amount;
            totals.paid_count += 1;
        } else {
            totals.pending += fine.amount;
            totals.unpaid_count += 1;
        }
    }
    totals
}

// ---------------------------------------------------------------------------
// User split / reservation counts
// ---------------------------------------------------------------------------

/// Active / inactive split. Invariant: `active + inactive == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserSplit {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

pub fn user_split(users: &[User]) -> UserSplit {
    let active = users.iter().filter(|u| u.is_active).count();
    UserSplit {
        total: users.len(),
        active,
        inactive: users.len() - active,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationCounts {
    pub total: usize,
    pub pending: usize,
}

pub fn reservation_counts(reservations: &[Reservation]) -> ReservationCounts {
    ReservationCounts {
        total: reservations.len(),
        pending: reservations.iter().filter(|r| r.is_pending()).count(),
    }
}

// ---------------------------------------------------------------------------
// Borrowing trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// One month of borrowing activity. `direction` compares against the
/// previous row (the first row compares against zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    /// Month label, e.g. "Mar 2024". Records with an unparseable
    /// `borrow_date` group under "Unknown".
    pub month: String,
    pub count: usize,
    pub direction: TrendDirection,
}

/// Group borrow records by calendar month of `borrow_date`, sorted
/// chronologically by month (an "Unknown" bucket, if any, comes last).
pub fn borrowing_trend(records: &[BorrowRecord]) -> Vec<TrendPoint> {
    // Keyed by month start so that grouping and ordering agree; the label
    // is derived from the same date.
    let mut buckets: Vec<(Option<NaiveDate>, usize)> = Vec::new();
    for record in records {
        let month = record
            .borrow_date
            .as_deref()
            .and_then(parse_date)
            .and_then(|d| d.with_day(1));
        match buckets.iter_mut().find(|(m, _)| *m == month) {
            Some((_, count)) => *count += 1,
            None => buckets.push((month, 1)),
        }
    }

    // Chronological order; None (unparseable dates) sorts after every month.
    buckets.sort_by_key(|(month, _)| match month {
        Some(d) => (0, *d),
        None => (1, NaiveDate::MAX),
    });

    let mut points = Vec::with_capacity(buckets.len());
    let mut previous = 0usize;
    for (month, count) in buckets {
        let direction = match count.cmp(&previous) {
            std::cmp::Ordering::Greater => TrendDirection::Up,
            std::cmp::Ordering::Less => TrendDirection::Down,
            std::cmp::Ordering::Equal => TrendDirection::Stable,
        };
        points.push(TrendPoint {
            month: month
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            count,
            direction,
        });
        previous = count;
    }
    points
}

// ---------------------------------------------------------------------------
// Book utilization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUsage {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub borrow_count: usize,
    /// Historical borrows over total copies, as a rounded percentage.
    /// Deliberately unclamped: more borrows than copies is a legitimate
    /// value above 100; only progress-bar rendering may clamp.
    pub utilization_rate: i64,
}

/// Per-book borrow counts and utilization rates, sorted descending by
/// borrow count with ties kept in catalog order.
pub fn book_utilization(books: &[Book], records: &[BorrowRecord]) -> Vec<BookUsage> {
    let mut usage: Vec<BookUsage> = books
        .iter()
        .map(|book| {
            let borrow_count = records
                .iter()
                .filter(|r| r.book == Some(book.id))
                .count();
            let divisor = book.total_copies.max(1);
            let rate = (borrow_count as f64 / divisor as f64 * 100.0).round() as i64;
            BookUsage {
                book_id: book.id,
                title: book.title.clone(),
                author: book.author.clone(),
                borrow_count,
                utilization_rate: rate,
            }
        })
        .collect();
    // Vec::sort_by is stable, so ties keep the original book order.
    usage.sort_by(|a, b| b.borrow_count.cmp(&a.borrow_count));
    usage
}

// ---------------------------------------------------------------------------
// User activity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActivityRow {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub borrow_count: usize,
    pub reservation_count: usize,
    pub fine_amount: Decimal,
}

/// Per-user borrow / reservation counts and fine totals, sorted descending
/// by borrow count with ties kept in input order.
pub fn user_activity(
    users: &[User],
    records: &[BorrowRecord],
    reservations: &[Reservation],
    fines: &[Fine],
) -> Vec<UserActivityRow> {
    let mut rows: Vec<UserActivityRow> = users
        .iter()
        .map(|user| UserActivityRow {
            user_id: user.id,
            name: user.display_name(),
            email: user.email.clone(),
            borrow_count: records
                .iter()
                .filter(|r| r.borrower == Some(user.id))
                .count(),
            reservation_count: reservations
                .iter()
                .filter(|r| r.user == Some(user.id))
                .count(),
            fine_amount: fines
                .iter()
                .filter(|f| f.user == Some(user.id))
                .map(|f| f.amount)
                .sum(),
        })
        .collect();
    rows.sort_by(|a, b| b.borrow_count.cmp(&a.borrow_count));
    rows
}

// ---------------------------------------------------------------------------
// Cross-reference lookups
// ---------------------------------------------------------------------------

/// Resolve a book id to its title; sentinel when the reference is missing
/// or dangling (e.g. the books fetch failed this round).
pub fn book_title(books: &[Book], id: Option<i64>) -> String {
    id.and_then(|id| books.iter().find(|b| b.id == id))
        .map(|b| b.title.clone())
        .unwrap_or_else(|| UNKNOWN_BOOK.to_string())
}

/// Resolve a user id to a display name, same sentinel policy.
pub fn user_name(users: &[User], id: Option<i64>) -> String {
    id.and_then(|id| users.iter().find(|u| u.id == id))
        .map(|u| u.display_name())
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}

/// Resolve a borrow-record id for fine display.
pub fn borrow_record<'a>(records: &'a [BorrowRecord], id: Option<i64>) -> Option<&'a BorrowRecord> {
    id.and_then(|id| records.iter().find(|r| r.id == id))
}
