use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::models::{Booking, Role, User};
use crate::services::BookingsClient;

/// Maximum number of notifications surfaced at once
pub const NOTIFICATION_CAP: usize = 10;

/// Largest count the badge renders as a number; anything above shows "9+"
const BADGE_MAX: usize = 9;

/// Background poller surfacing bookings that need operator attention.
///
/// Active only for hostel admins and custodians. Each tick fetches the
/// most recent bookings for the operator's hostel, filters and sorts them
/// client-side, and swaps in a fresh snapshot. Fetch failures keep the
/// previous snapshot so a transient outage never blanks the feed.
pub struct NotificationPoller {
    bookings: Arc<BookingsClient>,
    poll_interval: Duration,
    snapshot: RwLock<Snapshot>,
    loading: AtomicBool,
    // Stamp for each dispatched fetch; the snapshot records which stamp it
    // came from, so a slow response can never overwrite a newer one
    dispatch_seq: AtomicU64,
}

/// Current notification list together with the dispatch stamp that
/// produced it
struct Snapshot {
    items: Vec<Booking>,
    applied_seq: u64,
}

impl NotificationPoller {
    /// Create a new poller with the default 30 second interval
    pub fn new(bookings: Arc<BookingsClient>) -> Self {
        Self {
            bookings,
            poll_interval: Duration::from_secs(30),
            snapshot: RwLock::new(Snapshot {
                items: Vec::new(),
                applied_seq: 0,
            }),
            loading: AtomicBool::new(false),
            dispatch_seq: AtomicU64::new(0),
        }
    }

    /// Set poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Resolve the hostel to poll for, or `None` when the poller should
    /// stay idle for this user.
    ///
    /// Custodians may be provisioned without a hostel on their profile; in
    /// that case the assignment endpoint supplies it.
    pub async fn resolve_hostel(&self, user: &User) -> Option<String> {
        if !user.role.receives_booking_alerts() {
            return None;
        }
        if let Some(id) = &user.hostel_id {
            return Some(id.clone());
        }
        if user.role == Role::Custodian {
            match self.bookings.my_hostel().await {
                Ok(id) => return Some(id),
                Err(e) => {
                    warn!("Could not resolve custodian hostel assignment: {}", e);
                    return None;
                }
            }
        }
        warn!("User {} has an eligible role but no hostel context", user.id);
        None
    }

    /// Run one fetch-filter-sort cycle for the given hostel.
    ///
    /// Errors are logged and leave the previous snapshot intact; the
    /// loading flag is cleared on every path.
    pub async fn poll_once(&self, hostel_id: &str) {
        let seq = self.dispatch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);

        let result = self.bookings.recent_bookings(hostel_id).await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(fetched) => {
                let items = relevant_notifications(fetched, Utc::now());
                let mut snap = self.snapshot.write().await;
                if seq > snap.applied_seq {
                    debug!("Booking notification snapshot updated ({} items)", items.len());
                    snap.items = items;
                    snap.applied_seq = seq;
                } else {
                    debug!("Discarding stale booking fetch; a newer snapshot is already applied");
                }
            }
            Err(e) => {
                warn!("Booking notification fetch failed, keeping previous list: {}", e);
            }
        }
    }

    /// Start polling: one immediate fetch, then one per interval.
    ///
    /// Dropping (or stopping) the returned handle cancels the timer; no
    /// orphaned tasks survive the consuming view.
    pub fn spawn(self: Arc<Self>, hostel_id: String) -> PollerHandle {
        info!(
            "Booking notification poller started for hostel {} (every {:?})",
            hostel_id, self.poll_interval
        );
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(self.poll_interval);
            loop {
                ticker.tick().await;
                self.poll_once(&hostel_id).await;
            }
        });
        PollerHandle { handle }
    }

    /// Clone of the current notification snapshot
    pub async fn notifications(&self) -> Vec<Booking> {
        self.snapshot.read().await.items.clone()
    }

    /// Number of surfaced notifications (capped at [`NOTIFICATION_CAP`])
    pub async fn unread_count(&self) -> usize {
        self.snapshot.read().await.items.len()
    }

    /// Whether a fetch is currently in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}

/// Cancellation handle for a running poller task
pub struct PollerHandle {
    handle: JoinHandle<()>,
}

impl PollerHandle {
    /// Cancel the polling task
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Whether the polling task has terminated
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Reduce a raw booking fetch to the notification snapshot: keep what
/// needs attention, newest first, at most [`NOTIFICATION_CAP`] items.
pub fn relevant_notifications(mut bookings: Vec<Booking>, now: DateTime<Utc>) -> Vec<Booking> {
    bookings.retain(|b| b.needs_attention(now));
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    bookings.truncate(NOTIFICATION_CAP);
    bookings
}

/// Render the badge text for a notification count
pub fn badge_label(count: usize) -> String {
    if count > BADGE_MAX {
        "9+".to_string()
    } else {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingSource, BookingStatus};
    use chrono::Duration as ChronoDuration;

    fn booking(
        id: &str,
        status: BookingStatus,
        source: Option<BookingSource>,
        age_days: i64,
    ) -> Booking {
        Booking {
            id: id.to_string(),
            student_name: "Student".to_string(),
            student_phone: None,
            room_number: None,
            payment_status: None,
            status,
            created_at: Utc::now() - ChronoDuration::days(age_days),
            source,
        }
    }

    #[test]
    fn test_filter_keeps_old_pending_and_recent_online() {
        let now = Utc::now();
        let raw = vec![
            booking("old-pending", BookingStatus::Pending, Some(BookingSource::OnSite), 30),
            booking("recent-online", BookingStatus::Confirmed, Some(BookingSource::Online), 6),
            booking("stale-online", BookingStatus::Confirmed, Some(BookingSource::Online), 8),
            booking("walk-in", BookingStatus::Confirmed, Some(BookingSource::OnSite), 1),
        ];

        let kept = relevant_notifications(raw, now);
        let ids: Vec<&str> = kept.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["recent-online", "old-pending"]);
    }

    #[test]
    fn test_filter_sorts_newest_first_and_caps_at_ten() {
        let now = Utc::now();
        let raw: Vec<Booking> = (0..50)
            .map(|i| booking(&format!("b-{}", i), BookingStatus::Pending, None, i))
            .collect();

        let kept = relevant_notifications(raw, now);
        assert_eq!(kept.len(), NOTIFICATION_CAP);
        for pair in kept.windows(2) {
            assert!(pair[0].created_at > pair[1].created_at);
        }
        assert_eq!(kept[0].id, "b-0");
        assert_eq!(kept[9].id, "b-9");
    }

    #[test]
    fn test_badge_label() {
        assert_eq!(badge_label(0), "0");
        assert_eq!(badge_label(9), "9");
        assert_eq!(badge_label(10), "9+");
    }
}
