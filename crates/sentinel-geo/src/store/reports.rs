use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU64, Ordering},
};

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

use super::{
    Subscription,
    notifications::{NotificationCenter, ReportAction},
    publish, read, write,
};
use crate::{
    geo::Coordinate,
    report::{Priority, Report, ReportStatus},
};

/// Length of the description excerpt quoted in report-action notifications.
const EXCERPT_CHARS: usize = 50;

pub type ReportSubscription = Subscription<ReportEvent>;

#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Submitted(Report),
    Approved(Report),
    Rejected(Report),
    Updated(Report),
    Deleted(String),
}

/// Fields of a report as submitted by a citizen or admin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewReport {
    pub reporter_id: String,
    pub reporter_name: Option<String>,
    pub reporter_email: Option<String>,
    pub description: String,
    pub street: String,
    pub barangay: String,
    pub landmark: Option<String>,
    pub priority: Option<Priority>,
    pub location: Option<Coordinate>,
}

/// Partial edit; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportUpdate {
    pub description: Option<String>,
    pub street: Option<String>,
    pub barangay: Option<String>,
    pub landmark: Option<Option<String>>,
    pub priority: Option<Option<Priority>>,
    pub location: Option<Option<Coordinate>>,
}

impl ReportUpdate {
    fn apply(self, report: &mut Report) {
        if let Some(v) = self.description {
            report.description = v;
        }
        if let Some(v) = self.street {
            report.street = v;
        }
        if let Some(v) = self.barangay {
            report.barangay = v;
        }
        if let Some(v) = self.landmark {
            report.landmark = v;
        }
        if let Some(v) = self.priority {
            report.priority = v;
        }
        if let Some(v) = self.location {
            report.location = v;
        }
    }
}

/// Shared in-memory report list, oldest first.
#[derive(Debug, Clone)]
pub struct ReportStore {
    reports: Arc<RwLock<Vec<Report>>>,
    events: broadcast::Sender<ReportEvent>,
    notifications: NotificationCenter,
    seq: Arc<AtomicU64>,
}

impl ReportStore {
    /// `capacity` is the per-subscriber event buffer.
    #[must_use]
    pub fn new(notifications: NotificationCenter, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            reports: Arc::default(),
            events,
            notifications,
            seq: Arc::default(),
        }
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn subscribe(&self) -> ReportSubscription {
        Subscription::new(self.events.subscribe())
    }

    fn next_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("report_{}_{seq}", Utc::now().timestamp_millis())
    }

    /// Store a new pending report and return it.
    #[instrument(name = "Submit report", level = "debug", skip_all, fields(barangay = %new.barangay))]
    pub fn submit(&self, new: NewReport) -> Report {
        let now = Utc::now();
        let report = Report {
            id: self.next_id(),
            reporter_id: new.reporter_id,
            reporter_name: new.reporter_name,
            reporter_email: new.reporter_email,
            description: new.description,
            street: new.street,
            barangay: new.barangay,
            landmark: new.landmark,
            priority: new.priority,
            status: ReportStatus::Pending,
            location: new.location,
            created_at: now,
            updated_at: now,
        };
        {
            let mut reports = write(&self.reports);
            reports.push(report.clone());
            publish(&self.events, ReportEvent::Submitted(report.clone()));
        }
        info!(id = %report.id, "Report submitted");
        report
    }

    /// Apply `f` to report `id` and publish the resulting event.
    ///
    /// The event is sent before the lock is released, so subscribers see
    /// changes in the order they were applied to the list.
    fn modify(
        &self,
        id: &str,
        f: impl FnOnce(&mut Report),
        event: impl FnOnce(Report) -> ReportEvent,
    ) -> Option<Report> {
        let mut reports = write(&self.reports);
        let report = reports.iter_mut().find(|r| r.id == id)?;
        f(report);
        report.updated_at = Utc::now();
        let updated = report.clone();
        publish(&self.events, event(updated.clone()));
        Some(updated)
    }

    fn review(&self, id: &str, action: ReportAction) -> Option<Report> {
        let status = match action {
            ReportAction::Approved => ReportStatus::Approved,
            ReportAction::Rejected => ReportStatus::Rejected,
        };
        let event = match action {
            ReportAction::Approved => ReportEvent::Approved,
            ReportAction::Rejected => ReportEvent::Rejected,
        };
        let report = self.modify(id, |r| r.status = status, event)?;
        info!(id, ?status, "Report reviewed");

        if !report.is_admin_report() {
            self.notifications.notify_report_action(
                &report.id,
                report.reporter_email.as_deref(),
                action,
                &report.excerpt(EXCERPT_CHARS),
            );
        }
        Some(report)
    }

    pub fn approve(&self, id: &str) -> Option<Report> {
        self.review(id, ReportAction::Approved)
    }

    pub fn reject(&self, id: &str) -> Option<Report> {
        self.review(id, ReportAction::Rejected)
    }

    pub fn update(&self, id: &str, changes: ReportUpdate) -> Option<Report> {
        let report = self.modify(id, |r| changes.apply(r), ReportEvent::Updated)?;
        debug!(id, "Report updated");
        Some(report)
    }

    pub fn delete(&self, id: &str) -> Option<Report> {
        let removed = {
            let mut reports = write(&self.reports);
            let pos = reports.iter().position(|r| r.id == id)?;
            let removed = reports.remove(pos);
            publish(&self.events, ReportEvent::Deleted(removed.id.clone()));
            removed
        };
        info!(id, "Report deleted");
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Report> {
        read(&self.reports).iter().find(|r| r.id == id).cloned()
    }

    /// Every report, in submission order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Report> {
        read(&self.reports).clone()
    }

    fn with_status(&self, status: ReportStatus) -> Vec<Report> {
        read(&self.reports)
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn approved(&self) -> Vec<Report> {
        self.with_status(ReportStatus::Approved)
    }

    #[must_use]
    pub fn pending(&self) -> Vec<Report> {
        self.with_status(ReportStatus::Pending)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.reports).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        read(&self.reports).is_empty()
    }
}
