use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{Subscription, publish, read, write};
use crate::geo::Coordinate;

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Sos,
    Alert,
    Info,
    Action,
}

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosStatus {
    Pending,
    Responded,
    Resolved,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SosDetails {
    pub user_name: String,
    pub user_email: String,
    pub location: Option<Coordinate>,
    pub timestamp: DateTime<Utc>,
    pub status: SosStatus,
}

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    Approved,
    Rejected,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportActionDetails {
    pub report_id: String,
    pub action: ReportAction,
    pub reporter_email: Option<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub sos: Option<SosDetails>,
    pub report_action: Option<ReportActionDetails>,
}

impl Notification {
    /// Shown to administrators: SOS alerts and report actions.
    #[must_use]
    pub fn is_for_admin(&self) -> bool {
        self.kind == NotificationKind::Sos || self.report_action.is_some()
    }

    /// Shown to citizens: alerts, info and report actions.
    #[must_use]
    pub fn is_for_citizen(&self) -> bool {
        matches!(self.kind, NotificationKind::Alert | NotificationKind::Info)
            || self.report_action.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Added(Notification),
    Updated(Notification),
    Removed(String),
    Cleared,
}

/// Newest-first notification list shared between clones.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    items: Arc<RwLock<Vec<Notification>>>,
    events: broadcast::Sender<NotificationEvent>,
    seq: Arc<AtomicU64>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(64)
    }
}

impl NotificationCenter {
    /// `capacity` is the per-subscriber event buffer.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            items: Arc::default(),
            events,
            seq: Arc::default(),
        }
    }

    pub fn subscribe(&self) -> Subscription<NotificationEvent> {
        Subscription::new(self.events.subscribe())
    }

    /// Current list, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        read(&self.items).clone()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Notification> {
        read(&self.items).iter().find(|n| n.id == id).cloned()
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        read(&self.items).iter().filter(|n| !n.read).count()
    }

    /// Unread SOS alerts.
    #[must_use]
    pub fn sos_count(&self) -> usize {
        read(&self.items)
            .iter()
            .filter(|n| n.kind == NotificationKind::Sos && !n.read)
            .count()
    }

    #[must_use]
    pub fn admin_notifications(&self) -> Vec<Notification> {
        read(&self.items)
            .iter()
            .filter(|n| n.is_for_admin())
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn citizen_notifications(&self) -> Vec<Notification> {
        read(&self.items)
            .iter()
            .filter(|n| n.is_for_citizen())
            .cloned()
            .collect()
    }

    fn next_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("notification_{}_{seq}", Utc::now().timestamp_millis())
    }

    fn push(&self, kind: NotificationKind, message: String) -> Notification {
        self.push_with(kind, message, None, None)
    }

    fn push_with(
        &self,
        kind: NotificationKind,
        message: String,
        sos: Option<SosDetails>,
        report_action: Option<ReportActionDetails>,
    ) -> Notification {
        let notification = Notification {
            id: self.next_id(),
            message,
            kind,
            created_at: Utc::now(),
            read: false,
            sos,
            report_action,
        };
        {
            let mut items = write(&self.items);
            items.insert(0, notification.clone());
            publish(&self.events, NotificationEvent::Added(notification.clone()));
        }
        debug!(id = %notification.id, ?kind, "Notification added");
        notification
    }

    /// General alert or info message.
    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) -> Notification {
        self.push(kind, message.into())
    }

    /// Raise an SOS: a pending alert for administrators plus a confirmation
    /// for the user. Returns the alert.
    pub fn emergency_sos(
        &self,
        user_name: &str,
        user_email: &str,
        location: Option<Coordinate>,
    ) -> Notification {
        let location_text = location
            .map(|c| format!(" Location: {:.6}, {:.6}", c.lat, c.lng))
            .unwrap_or_default();
        info!(user = user_name, ?location, "Emergency SOS raised");

        let alert = self.push_with(
            NotificationKind::Sos,
            format!(
                "EMERGENCY SOS from {user_name} ({user_email}).{location_text} Immediate assistance required!"
            ),
            Some(SosDetails {
                user_name: user_name.to_string(),
                user_email: user_email.to_string(),
                location,
                timestamp: Utc::now(),
                status: SosStatus::Pending,
            }),
            None,
        );
        self.push(
            NotificationKind::Action,
            "Your emergency SOS has been sent. Help is on the way.".to_string(),
        );
        alert
    }

    /// Move an SOS alert to `status`, telling its user when it is acted on.
    ///
    /// Responding also marks the alert read. Returns `None` for an unknown id
    /// or a notification that is not an SOS.
    pub fn update_sos_status(&self, id: &str, status: SosStatus) -> Option<Notification> {
        let updated = {
            let mut items = write(&self.items);
            let n = items.iter_mut().find(|n| n.id == id)?;
            let sos = n.sos.as_mut()?;
            sos.status = status;
            if status == SosStatus::Responded {
                n.read = true;
            }
            let updated = n.clone();
            publish(&self.events, NotificationEvent::Updated(updated.clone()));
            updated
        };

        let reply = match status {
            SosStatus::Pending => None,
            SosStatus::Responded => Some(
                "Your emergency SOS has been received! Help is on the way. \
                 An officer is responding to your location. Stay calm and safe.",
            ),
            SosStatus::Resolved => Some(
                "Your emergency SOS has been resolved. The situation has been \
                 addressed by authorities.",
            ),
        };
        if let Some(message) = reply {
            self.push(NotificationKind::Action, message.to_string());
        }
        Some(updated)
    }

    /// Tell a reporter what happened to their report.
    pub fn notify_report_action(
        &self,
        report_id: &str,
        reporter_email: Option<&str>,
        action: ReportAction,
        excerpt: &str,
    ) -> Notification {
        let outcome = match action {
            ReportAction::Approved => {
                "Your safety report has been reviewed and approved. Authorities have been notified."
            }
            ReportAction::Rejected => {
                "Your safety report has been reviewed. No further action is required at this time."
            }
        };
        self.push_with(
            NotificationKind::Action,
            format!("Report Update: \"{excerpt}\" - {outcome}"),
            None,
            Some(ReportActionDetails {
                report_id: report_id.to_string(),
                action,
                reporter_email: reporter_email.map(str::to_string),
            }),
        )
    }

    pub fn mark_read(&self, id: &str) -> bool {
        let mut items = write(&self.items);
        let Some(n) = items.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        n.read = true;
        publish(&self.events, NotificationEvent::Updated(n.clone()));
        true
    }

    /// Mark everything read; returns how many changed.
    pub fn mark_all_read(&self) -> usize {
        let mut items = write(&self.items);
        let mut count = 0;
        for n in items.iter_mut().filter(|n| !n.read) {
            n.read = true;
            publish(&self.events, NotificationEvent::Updated(n.clone()));
            count += 1;
        }
        count
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut items = write(&self.items);
        let before = items.len();
        items.retain(|n| n.id != id);
        let removed = items.len() != before;
        if removed {
            publish(&self.events, NotificationEvent::Removed(id.to_string()));
        }
        removed
    }

    pub fn clear(&self) {
        let mut items = write(&self.items);
        items.clear();
        publish(&self.events, NotificationEvent::Cleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sos_adds_alert_and_confirmation() {
        let center = NotificationCenter::default();
        let alert = center.emergency_sos(
            "Juan",
            "juan@example.com",
            Some(Coordinate::new(16.4125, 120.5964)),
        );

        let all = center.snapshot();
        assert_eq!(all.len(), 2);
        // Newest first: the confirmation was pushed after the alert
        assert_eq!(all[0].kind, NotificationKind::Action);
        assert_eq!(all[1].id, alert.id);
        assert!(alert.message.contains("Location: 16.412500, 120.596400"));
        assert_eq!(alert.sos.as_ref().unwrap().status, SosStatus::Pending);
        assert_eq!(center.sos_count(), 1);
        assert_eq!(center.admin_notifications().len(), 1);
    }

    #[test]
    fn test_sos_status_updates() {
        let center = NotificationCenter::default();
        let alert = center.emergency_sos("Juan", "juan@example.com", None);
        assert!(!alert.message.contains("Location"));

        let responded = center
            .update_sos_status(&alert.id, SosStatus::Responded)
            .unwrap();
        assert!(responded.read);
        assert_eq!(responded.sos.unwrap().status, SosStatus::Responded);
        assert_eq!(center.sos_count(), 0);
        assert_eq!(center.snapshot().len(), 3);

        let resolved = center
            .update_sos_status(&alert.id, SosStatus::Resolved)
            .unwrap();
        assert_eq!(resolved.sos.unwrap().status, SosStatus::Resolved);

        let info = center.notify(NotificationKind::Info, "Road closure on Kennon");
        assert!(center.update_sos_status(&info.id, SosStatus::Resolved).is_none());
        assert!(center.update_sos_status("missing", SosStatus::Resolved).is_none());
    }

    #[test]
    fn test_read_state() {
        let center = NotificationCenter::default();
        let a = center.notify(NotificationKind::Alert, "Landslide warning");
        center.notify(NotificationKind::Info, "Water interruption");
        assert_eq!(center.unread_count(), 2);

        assert!(center.mark_read(&a.id));
        assert!(!center.mark_read("missing"));
        assert_eq!(center.unread_count(), 1);

        assert_eq!(center.mark_all_read(), 1);
        assert_eq!(center.unread_count(), 0);
        assert_eq!(center.citizen_notifications().len(), 2);

        assert!(center.remove(&a.id));
        assert_eq!(center.snapshot().len(), 1);
        center.clear();
        assert!(center.snapshot().is_empty());
    }

    #[test]
    fn test_clones_share_state_and_events() {
        let center = NotificationCenter::default();
        let mut sub = center.subscribe();
        let other = center.clone();

        other.notify(NotificationKind::Info, "hello");
        assert_eq!(center.snapshot().len(), 1);
        assert!(matches!(sub.try_next(), Some(NotificationEvent::Added(n)) if n.message == "hello"));
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn test_concurrent_adds_publish_in_list_order() {
        let center = NotificationCenter::new(256);
        let mut sub = center.subscribe();
        std::thread::scope(|s| {
            for t in 0..4 {
                let center = center.clone();
                s.spawn(move || {
                    for i in 0..40 {
                        center.notify(NotificationKind::Info, format!("{t}-{i}"));
                    }
                });
            }
        });

        let mut added: Vec<String> = sub
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                NotificationEvent::Added(n) => Some(n.id),
                _ => None,
            })
            .collect();
        // List is newest first, events are oldest first
        added.reverse();
        let listed: Vec<String> = center.snapshot().into_iter().map(|n| n.id).collect();
        assert_eq!(listed.len(), 160);
        assert_eq!(added, listed);
    }

    #[test]
    fn test_ids_are_unique() {
        let center = NotificationCenter::default();
        let ids: Vec<String> = (0..20)
            .map(|i| center.notify(NotificationKind::Info, format!("n{i}")).id)
            .collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }
}
