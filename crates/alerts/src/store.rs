//! Active alerts and the notification feed.
//!
//! Alert lifecycle: none → active → removed. Notification lifecycle:
//! unread → read. Adding an alert inserts its notification under the same
//! write lock, so readers never see one without the other. Removing an alert
//! leaves its notification in the feed.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use sr_core::types::{AlertCategory, AlertId};

use crate::ids::AlertIdGenerator;

/// A currently active alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub category: AlertCategory,
    pub message: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// Feed entry paired with an alert by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: AlertId,
    pub category: AlertCategory,
    pub message: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// Wire form of a [`Notification`] with its relative display time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub category: AlertCategory,
    pub message: String,
    pub location: String,
    pub time: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// "Just now", "N min ago", "N hour(s) ago" or "N day(s) ago".
    pub fn display_time(&self, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(self.created_at);
        if elapsed < Duration::minutes(1) {
            return "Just now".to_string();
        }
        if elapsed < Duration::hours(1) {
            return format!("{} min ago", elapsed.num_minutes());
        }
        if elapsed < Duration::days(1) {
            return plural(elapsed.num_hours(), "hour");
        }
        plural(elapsed.num_days(), "day")
    }

    pub fn view(&self, now: DateTime<Utc>) -> NotificationView {
        NotificationView {
            id: self.id,
            category: self.category,
            message: self.message.clone(),
            location: self.location.clone(),
            time: self.display_time(now),
            read: self.read,
            created_at: self.created_at,
        }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[derive(Debug, Default)]
struct StoreState {
    /// Insertion order.
    alerts: Vec<Alert>,
    /// Most recent first.
    notifications: VecDeque<Notification>,
}

/// Authoritative alert and notification state.
///
/// Shared by `Arc`. All operations are infallible: unknown ids are no-ops.
#[derive(Debug, Default)]
pub struct AlertStore {
    ids: AlertIdGenerator,
    state: RwLock<StoreState>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the dashboard's sample alerts.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        let (alerts, notifications) = demo_data(Utc::now());
        store.seed(alerts, notifications);
        store
    }

    /// Create an alert with a fresh id and the current time, and push an
    /// unread notification to the head of the feed.
    pub fn add_alert(
        &self,
        category: AlertCategory,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Alert {
        let (message, location) = (message.into(), location.into());
        // Id and timestamp are taken under the write lock so the feed head is
        // always the newest id.
        let alert = {
            let mut state = self.state.write();
            let alert = Alert {
                id: self.ids.next_id(),
                category,
                message,
                location,
                timestamp: Utc::now(),
            };
            state.notifications.push_front(Notification {
                id: alert.id,
                category: alert.category,
                message: alert.message.clone(),
                location: alert.location.clone(),
                created_at: alert.timestamp,
                read: false,
            });
            state.alerts.push(alert.clone());
            alert
        };

        info!(
            alert_id = %alert.id,
            category = %alert.category,
            location = %alert.location,
            "alert added"
        );
        alert
    }

    /// Remove an active alert. Returns whether one was removed.
    pub fn remove_alert(&self, id: AlertId) -> bool {
        let mut state = self.state.write();
        let before = state.alerts.len();
        state.alerts.retain(|a| a.id != id);
        let removed = state.alerts.len() != before;
        if removed {
            debug!(alert_id = %id, "alert removed");
        }
        removed
    }

    /// Mark a notification read. Returns whether the id is known.
    pub fn mark_as_read(&self, id: AlertId) -> bool {
        let mut state = self.state.write();
        match state.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn unread_count(&self) -> usize {
        self.state.read().notifications.iter().filter(|n| !n.read).count()
    }

    /// Active alerts in insertion order.
    pub fn active_alerts(&self) -> Vec<Alert> {
        self.state.read().alerts.clone()
    }

    /// Notifications, most recent first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.state.read().notifications.iter().cloned().collect()
    }

    pub fn alert(&self, id: AlertId) -> Option<Alert> {
        self.state.read().alerts.iter().find(|a| a.id == id).cloned()
    }

    pub fn notification(&self, id: AlertId) -> Option<Notification> {
        self.state
            .read()
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    /// Install initial state, appending to anything already present.
    ///
    /// `notifications` are given most recent first. The id generator moves
    /// past every seeded id.
    pub fn seed(&self, alerts: Vec<Alert>, notifications: Vec<Notification>) {
        let mut state = self.state.write();
        for alert in alerts {
            self.ids.advance_past(alert.id);
            state.alerts.push(alert);
        }
        for notification in notifications {
            self.ids.advance_past(notification.id);
            state.notifications.push_back(notification);
        }
        debug!(
            alerts = state.alerts.len(),
            notifications = state.notifications.len(),
            "alert store seeded"
        );
    }
}

/// The dashboard's sample alerts, timestamped relative to `now`.
pub fn demo_data(now: DateTime<Utc>) -> (Vec<Alert>, Vec<Notification>) {
    let alert = |id, category, message: &str, location: &str| Alert {
        id: AlertId(id),
        category,
        message: message.to_string(),
        location: location.to_string(),
        timestamp: now,
    };
    let alerts = vec![
        alert(1, AlertCategory::Emergency, "Flash flood warning in effect", "Harris County, TX"),
        alert(2, AlertCategory::Warning, "Severe thunderstorm approaching", "Miami-Dade County, FL"),
    ];

    let note = |id, category, message: &str, location: &str, age: Duration, read| Notification {
        id: AlertId(id),
        category,
        message: message.to_string(),
        location: location.to_string(),
        created_at: now - age,
        read,
    };
    let notifications = vec![
        note(1, AlertCategory::Emergency, "Flash flood warning issued for Harris County", "Houston, TX", Duration::minutes(10), false),
        note(2, AlertCategory::Warning, "Severe thunderstorm approaching coastal areas", "Miami, FL", Duration::minutes(25), false),
        note(3, AlertCategory::Info, "Evacuation routes updated for coastal residents", "New Orleans, LA", Duration::hours(1), true),
        note(4, AlertCategory::Emergency, "Wildfire spreading rapidly in western region", "Los Angeles, CA", Duration::hours(2), true),
        note(5, AlertCategory::Warning, "High wind advisory for northern counties", "Chicago, IL", Duration::hours(3), true),
    ];

    (alerts, notifications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_add_alert_pairs_notification() {
        let store = AlertStore::new();
        let alert = store.add_alert(AlertCategory::Emergency, "Flooding", "Houston, TX");

        assert_eq!(store.active_alerts(), vec![alert.clone()]);
        let n = store.notification(alert.id).unwrap();
        assert_eq!(n.category, AlertCategory::Emergency);
        assert_eq!(n.message, "Flooding");
        assert!(!n.read);
        assert_eq!(n.created_at, alert.timestamp);
        assert_eq!(store.unread_count(), 1);
    }

    #[test]
    fn test_notifications_most_recent_first() {
        let store = AlertStore::new();
        let a = store.add_alert(AlertCategory::Info, "first", "A");
        let b = store.add_alert(AlertCategory::Info, "second", "B");
        let c = store.add_alert(AlertCategory::Info, "third", "C");

        let feed: Vec<AlertId> = store.notifications().iter().map(|n| n.id).collect();
        assert_eq!(feed, vec![c.id, b.id, a.id]);
        let active: Vec<AlertId> = store.active_alerts().iter().map(|a| a.id).collect();
        assert_eq!(active, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_remove_is_idempotent_and_keeps_notification() {
        let store = AlertStore::new();
        let alert = store.add_alert(AlertCategory::Warning, "Wind", "Houston, TX");

        assert!(store.remove_alert(alert.id));
        assert!(!store.remove_alert(alert.id));
        assert!(!store.remove_alert(AlertId(999)));
        assert!(store.active_alerts().is_empty());
        assert!(store.alert(alert.id).is_none());
        assert!(store.notification(alert.id).is_some());
        assert_eq!(store.unread_count(), 1);
    }

    #[test]
    fn test_mark_as_read_is_monotonic() {
        let store = AlertStore::new();
        let a = store.add_alert(AlertCategory::Info, "a", "A");
        let b = store.add_alert(AlertCategory::Info, "b", "B");
        assert_eq!(store.unread_count(), 2);

        assert!(store.mark_as_read(a.id));
        assert_eq!(store.unread_count(), 1);
        assert!(store.mark_as_read(a.id));
        assert_eq!(store.unread_count(), 1);
        assert!(store.notification(a.id).unwrap().read);

        assert!(!store.mark_as_read(AlertId(42)));
        assert_eq!(store.unread_count(), 1);
        assert!(!store.notification(b.id).unwrap().read);
    }

    #[test]
    fn test_seed_advances_ids() {
        let store = AlertStore::new();
        let (alerts, notifications) = demo_data(Utc::now());
        store.seed(alerts, notifications);

        assert_eq!(store.active_alerts().len(), 2);
        assert_eq!(store.notifications().len(), 5);
        assert_eq!(store.unread_count(), 2);

        let fresh = store.add_alert(AlertCategory::Info, "new", "Houston, TX");
        assert_eq!(fresh.id, AlertId(6));
        assert_eq!(store.notifications()[0].id, fresh.id);
    }

    #[test]
    fn test_demo_store() {
        let store = AlertStore::with_demo_data();
        let now = Utc::now();
        let times: Vec<String> = store
            .notifications()
            .iter()
            .map(|n| n.display_time(now))
            .collect();
        assert_eq!(times[0], "10 min ago");
        assert_eq!(times[2], "1 hour ago");
        assert_eq!(times[4], "3 hours ago");
    }

    #[test]
    fn test_display_time_buckets() {
        let now = Utc::now();
        let n = |age: Duration| Notification {
            id: AlertId(1),
            category: AlertCategory::Info,
            message: String::new(),
            location: String::new(),
            created_at: now - age,
            read: false,
        };
        assert_eq!(n(Duration::seconds(5)).display_time(now), "Just now");
        assert_eq!(n(Duration::minutes(1)).display_time(now), "1 min ago");
        assert_eq!(n(Duration::minutes(59)).display_time(now), "59 min ago");
        assert_eq!(n(Duration::hours(2)).display_time(now), "2 hours ago");
        assert_eq!(n(Duration::days(1)).display_time(now), "1 day ago");
        assert_eq!(n(Duration::days(3)).display_time(now), "3 days ago");
    }

    #[test]
    fn test_view_serializes_wire_shape() {
        let store = AlertStore::new();
        let alert = store.add_alert(AlertCategory::Warning, "Wind", "Houston, TX");
        let view = store.notification(alert.id).unwrap().view(Utc::now());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["time"], "Just now");
        assert_eq!(json["read"], false);
        assert_eq!(json["id"], alert.id.0);

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["location"], "Houston, TX");
    }

    #[test]
    fn test_concurrent_adds_keep_pairs() {
        let store = Arc::new(AlertStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        store.add_alert(AlertCategory::Info, format!("{i}-{j}"), "X");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.active_alerts().len(), 400);
        assert_eq!(store.notifications().len(), 400);
        assert_eq!(store.unread_count(), 400);
        for alert in store.active_alerts() {
            assert!(store.notification(alert.id).is_some());
        }
    }

    #[test]
    fn test_concurrent_adds_keep_feed_newest_first() {
        let store = Arc::new(AlertStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..200 {
                        store.add_alert(AlertCategory::Warning, format!("{i}-{j}"), "X");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let feed = store.notifications();
        assert_eq!(feed.len(), 1600);
        assert!(feed.windows(2).all(|w| w[0].id > w[1].id));
        assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let alerts = store.active_alerts();
        assert!(alerts.windows(2).all(|w| w[0].id < w[1].id));
    }
}
