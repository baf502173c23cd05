//! Role-scoped dashboard views
//!
//! A [`Dashboard`] owns one role's view of the system: which resources to
//! aggregate, how to scope them, and the latest computed [`Snapshot`].
//! Students only ever see their own rows; the owner-id filter runs before
//! any statistics are derived so a non-privileged snapshot cannot carry
//! other users' data. This is presentation scoping, not access control —
//! the backend enforces privileges on its side.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::{
    aggregate::{self, ResourceSet},
    client::ApiClient,
    error::ClientResult,
    models::{decode_list, Book, BorrowRecord, Category, Fine, Reservation, Role, User},
    stats::{self, BookUsage, FineTotals, ReservationCounts, TrendPoint, UserActivityRow, UserSplit},
};

/// Numbers the server computes itself (`/dashboard-stats/` or
/// `/personal-stats/`); zeroed when that fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStats {
    pub total_books: u64,
    pub active_borrows: u64,
    pub available_books: u64,
    pub overdue_books: u64,
    pub total_users: u64,
}

impl ServerStats {
    /// Read the stats object, accepting both camelCase (the documented
    /// shape) and snake_case keys.
    pub fn from_value(value: &Value) -> Self {
        let read = |keys: [&str; 2]| {
            keys.iter()
                .find_map(|k| value.get(*k))
                .and_then(Value::as_u64)
                .unwrap_or(0)
        };
        Self {
            total_books: read(["totalBooks", "total_books"]),
            active_borrows: read(["activeBorrows", "active_borrows"]),
            available_books: read(["availableBooks", "available_books"]),
            overdue_books: read(["overdueBooks", "overdue_books"]),
            total_users: read(["totalUsers", "total_users"]),
        }
    }
}

/// Headline card numbers: server-computed plus client-derived.
#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub server: ServerStats,
    pub fines: FineTotals,
    pub users: UserSplit,
    pub reservations: ReservationCounts,
}

/// One completed aggregation: the scoped collections, everything derived
/// from them, and the names of resources whose fetch failed (for the
/// stale-data banner). Snapshots are immutable; a refresh replaces the
/// whole thing.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub role: Role,
    pub request_id: u64,
    pub stats: DashboardStats,
    pub books: Vec<Book>,
    pub users: Vec<User>,
    pub records: Vec<BorrowRecord>,
    pub fines: Vec<Fine>,
    pub reservations: Vec<Reservation>,
    pub categories: Vec<Category>,
    pub reading_history: Vec<Value>,
    pub trend: Vec<TrendPoint>,
    pub utilization: Vec<BookUsage>,
    pub activity: Vec<UserActivityRow>,
    pub failed: Vec<String>,
}

impl Snapshot {
    pub fn active_borrows(&self) -> Vec<&BorrowRecord> {
        self.records.iter().filter(|r| r.is_active()).collect()
    }

    pub fn overdue_borrows(&self) -> Vec<&BorrowRecord> {
        self.records
            .iter()
            .filter(|r| r.is_active() && r.is_overdue)
            .collect()
    }

    pub fn unpaid_fines(&self) -> Vec<&Fine> {
        self.fines.iter().filter(|f| !f.is_paid).collect()
    }

    pub fn pending_reservations(&self) -> Vec<&Reservation> {
        self.reservations.iter().filter(|r| r.is_pending()).collect()
    }

    /// Five most recent reading-history entries.
    pub fn recent_history(&self) -> &[Value] {
        let len = self.reading_history.len().min(5);
        &self.reading_history[..len]
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Monotonic request-id guard: a refresh only replaces the displayed
/// snapshot if no newer refresh has been applied since it started, closing
/// the last-completed-wins race between overlapping refreshes.
#[derive(Debug, Default)]
struct RefreshGuard {
    next: AtomicU64,
    applied: Mutex<(u64, Option<Arc<Snapshot>>)>,
}

impl RefreshGuard {
    fn ticket(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply the snapshot if its ticket is the newest seen; either way,
    /// return the snapshot that is current afterwards.
    fn commit(&self, ticket: u64, snapshot: Arc<Snapshot>) -> Arc<Snapshot> {
        let mut applied = self.applied.lock().expect("refresh guard poisoned");
        if ticket > applied.0 {
            applied.0 = ticket;
            applied.1 = Some(snapshot.clone());
            snapshot
        } else {
            tracing::debug!(
                ticket,
                newest = applied.0,
                "Discarding stale refresh result"
            );
            applied.1.clone().unwrap_or(snapshot)
        }
    }

    fn latest(&self) -> Option<Arc<Snapshot>> {
        self.applied.lock().expect("refresh guard poisoned").1.clone()
    }
}

/// A role's dashboard over the REST backend.
pub struct Dashboard {
    client: ApiClient,
    role: Role,
    /// The caller's own user id; required for non-privileged scoping.
    user_id: Option<i64>,
    guard: RefreshGuard,
}

impl Dashboard {
    pub fn new(client: ApiClient, role: Role, user_id: Option<i64>) -> Self {
        Self {
            client,
            role,
            user_id,
            guard: RefreshGuard::default(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Named resource paths this role aggregates.
    pub fn resources(&self) -> &'static [(&'static str, &'static str)] {
        if self.role.is_privileged() {
            &[
                ("stats", "/dashboard-stats/"),
                ("records", "/borrow-records/"),
                ("books", "/books/"),
                ("fines", "/fines/"),
                ("reservations", "/reservations/"),
                ("users", "/users/"),
                ("categories", "/categories/"),
            ]
        } else {
            &[
                ("stats", "/personal-stats/"),
                ("records", "/borrow-records/"),
                ("history", "/reading-history/"),
                ("fines", "/fines/"),
                ("reservations", "/reservations/"),
            ]
        }
    }

    /// Re-aggregate everything and recompute the derived statistics.
    /// Partial failures never fail the refresh; they are reported on the
    /// snapshot. Overlapping refreshes resolve last-requested-wins.
    pub async fn refresh(&self) -> Arc<Snapshot> {
        let ticket = self.guard.ticket();
        let set = aggregate::fetch_all(&self.client, self.resources()).await;
        let snapshot = Arc::new(build_snapshot(self.role, self.user_id, ticket, set));
        self.guard.commit(ticket, snapshot)
    }

    /// The most recently applied snapshot, if any refresh has completed.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.guard.latest()
    }

    // Mutations re-aggregate in full afterwards; the derived statistics are
    // never patched locally, so they cannot drift from server state.

    pub async fn borrow_book(&self, book_id: i64) -> ClientResult<Arc<Snapshot>> {
        self.client
            .post("/borrow-records/", &serde_json::json!({ "book": book_id }))
            .await?;
        Ok(self.refresh().await)
    }

    pub async fn return_book(&self, record_id: i64) -> ClientResult<Arc<Snapshot>> {
        self.client
            .post_action(&format!("/borrow-records/{}/return_book/", record_id))
            .await?;
        Ok(self.refresh().await)
    }

    pub async fn reserve_book(&self, book_id: i64) -> ClientResult<Arc<Snapshot>> {
        self.client
            .post_action(&format!("/books/{}/reserve/", book_id))
            .await?;
        Ok(self.refresh().await)
    }

    pub async fn cancel_reservation(&self, reservation_id: i64) -> ClientResult<Arc<Snapshot>> {
        self.client
            .post_action(&format!("/reservations/{}/cancel/", reservation_id))
            .await?;
        Ok(self.refresh().await)
    }

    pub async fn pay_fine(&self, fine_id: i64) -> ClientResult<Arc<Snapshot>> {
        self.client
            .post_action(&format!("/fines/{}/pay/", fine_id))
            .await?;
        Ok(self.refresh().await)
    }
}

/// Decode, scope and derive: the pure part of a refresh.
pub fn build_snapshot(role: Role, user_id: Option<i64>, request_id: u64, mut set: ResourceSet) -> Snapshot {
    let books: Vec<Book> = decode_list(&set.take_list("books"));
    let users: Vec<User> = decode_list(&set.take_list("users"));
    let categories: Vec<Category> = decode_list(&set.take_list("categories"));
    let reading_history = set.take_list("history");

    let mut records: Vec<BorrowRecord> = decode_list(&set.take_list("records"));
    let mut fines: Vec<Fine> = decode_list(&set.take_list("fines"));
    let mut reservations: Vec<Reservation> = decode_list(&set.take_list("reservations"));

    // Owner scoping for non-privileged roles happens before any statistic
    // is derived. Rows with a missing owner are dropped too: without a
    // known owner they cannot be proven to belong to this caller.
    if !role.is_privileged() {
        let owned = |owner: Option<i64>| matches!((owner, user_id), (Some(a), Some(b)) if a == b);
        records.retain(|r| owned(r.borrower));
        fines.retain(|f| owned(f.user));
        reservations.retain(|r| owned(r.user));
    }

    let server = if set.succeeded("stats") {
        set.raw("stats")
            .map(ServerStats::from_value)
            .unwrap_or_default()
    } else {
        ServerStats::default()
    };

    let stats = DashboardStats {
        server,
        fines: stats::fine_totals(&fines),
        users: stats::user_split(&users),
        reservations: stats::reservation_counts(&reservations),
    };

    let trend = stats::borrowing_trend(&records);
    let utilization = stats::book_utilization(&books, &records);
    let activity = stats::user_activity(&users, &records, &reservations, &fines);
    let failed = set.failed_resources();

    Snapshot {
        role,
        request_id,
        stats,
        books,
        users,
        records,
        fines,
        reservations,
        categories,
        reading_history,
        trend,
        utilization,
        activity,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::settle;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use serde_json::json;

    use crate::error::{ClientError, ClientResult};

    fn resolved(name: &str, value: Value) -> (String, BoxFuture<'static, ClientResult<Value>>) {
        (name.to_string(), async move { Ok(value) }.boxed())
    }

    fn rejected(name: &str) -> (String, BoxFuture<'static, ClientResult<Value>>) {
        (
            name.to_string(),
            async move { Err(ClientError::Http("down".into())) }.boxed(),
        )
    }

    fn sample_set(tasks: Vec<(String, BoxFuture<'static, ClientResult<Value>>)>) -> ResourceSet {
        tokio_test::block_on(settle(tasks))
    }

    #[test]
    fn test_student_snapshot_filters_by_owner() {
        let set = sample_set(vec![
            resolved(
                "records",
                json!([
                    {"id": 1, "borrower": 42, "is_returned": false},
                    {"id": 2, "borrower": 7, "is_returned": false},
                    {"id": 3, "is_returned": false}
                ]),
            ),
            resolved(
                "fines",
                json!([
                    {"id": 1, "user": 42, "amount": "4.00"},
                    {"id": 2, "user": 7, "amount": "9.99"}
                ]),
            ),
            resolved("reservations", json!([{"id": 1, "user": 7, "status": "pending"}])),
        ]);

        let snapshot = build_snapshot(Role::Student, Some(42), 1, set);
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].id, 1);
        assert_eq!(snapshot.fines.len(), 1);
        assert_eq!(snapshot.stats.fines.total, "4.00".parse().unwrap());
        assert!(snapshot.reservations.is_empty());
    }

    #[test]
    fn test_admin_snapshot_keeps_all_rows_and_reports_failures() {
        let set = sample_set(vec![
            resolved("stats", json!({"totalBooks": 12, "totalUsers": 3})),
            rejected("books"),
            resolved(
                "records",
                json!({"results": [{"id": 1, "borrower": 7, "borrow_date": "2024-06-01"}]}),
            ),
            resolved("users", json!([{"id": 7, "is_active": true}])),
        ]);

        let snapshot = build_snapshot(Role::Admin, None, 1, set);
        assert_eq!(snapshot.stats.server.total_books, 12);
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.stats.users.active, 1);
        assert_eq!(snapshot.failed, vec!["books"]);
        assert!(snapshot.has_failures());
        // Books fetch failed: utilization is empty but nothing panicked.
        assert!(snapshot.utilization.is_empty());
        assert_eq!(snapshot.trend.len(), 1);
    }

    #[test]
    fn test_failed_stats_endpoint_zeroes_server_numbers() {
        let set = sample_set(vec![rejected("stats")]);
        let snapshot = build_snapshot(Role::Admin, None, 1, set);
        assert_eq!(snapshot.stats.server, ServerStats::default());
    }

    #[test]
    fn test_refresh_guard_discards_stale_result() {
        let guard = RefreshGuard::default();
        let first = guard.ticket();
        let second = guard.ticket();

        // The later request completes first.
        let newer = Arc::new(Snapshot { request_id: second, ..Default::default() });
        let applied = guard.commit(second, newer.clone());
        assert_eq!(applied.request_id, second);

        // The earlier request completes afterwards and must be discarded.
        let stale = Arc::new(Snapshot { request_id: first, ..Default::default() });
        let current = guard.commit(first, stale);
        assert_eq!(current.request_id, second);
        assert_eq!(guard.latest().unwrap().request_id, second);
    }

    #[test]
    fn test_snapshot_personal_views() {
        let set = sample_set(vec![
            resolved(
                "records",
                json!([
                    {"id": 1, "borrower": 5, "is_returned": false, "is_overdue": true},
                    {"id": 2, "borrower": 5, "is_returned": true}
                ]),
            ),
            resolved("fines", json!([{"id": 1, "user": 5, "amount": "2", "is_paid": false}])),
            resolved("history", json!([1, 2, 3, 4, 5, 6, 7])),
        ]);

        let snapshot = build_snapshot(Role::Student, Some(5), 1, set);
        assert_eq!(snapshot.active_borrows().len(), 1);
        assert_eq!(snapshot.overdue_borrows().len(), 1);
        assert_eq!(snapshot.unpaid_fines().len(), 1);
        assert_eq!(snapshot.recent_history().len(), 5);
    }
}
