//! Incident reports as the geo core sees them.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::geo::Coordinate;

/// Reporter id used for reports filed by administrators.
pub const ADMIN_REPORTER: &str = "ADMIN";

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Marker colour.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::High => "#dc3545",
            Self::Medium => "#ffc107",
            Self::Low => "#28a745",
        }
    }

    /// Short text tag shown in marker labels.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::High => "[HIGH]",
            Self::Medium => "[MED]",
            Self::Low => "[LOW]",
        }
    }
}

/// Colour and tag for a report whose priority was never set.
pub const UNKNOWN_PRIORITY_COLOR: &str = "#6c757d";
pub const UNKNOWN_PRIORITY_TAG: &str = "[--]";

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A citizen or admin incident report.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    pub reporter_name: Option<String>,
    pub reporter_email: Option<String>,
    pub description: String,
    pub street: String,
    /// Free-text region name as typed or inferred
    pub barangay: String,
    pub landmark: Option<String>,
    pub priority: Option<Priority>,
    pub status: ReportStatus,
    pub location: Option<Coordinate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// The report's coordinate, unless absent or the legacy zero placeholder.
    #[must_use]
    pub fn geolocation(&self) -> Option<Coordinate> {
        self.location.filter(|c| !c.is_placeholder())
    }

    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == ReportStatus::Approved
    }

    #[must_use]
    pub fn is_admin_report(&self) -> bool {
        self.reporter_id == ADMIN_REPORTER
    }

    #[must_use]
    pub fn priority_color(&self) -> &'static str {
        self.priority.map_or(UNKNOWN_PRIORITY_COLOR, Priority::color)
    }

    #[must_use]
    pub fn priority_tag(&self) -> &'static str {
        self.priority.map_or(UNKNOWN_PRIORITY_TAG, Priority::tag)
    }

    /// First `max_chars` characters of the description, with an ellipsis when cut.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut chars = self.description.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Which reports the map shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFilter {
    pub approved_only: bool,
    /// Keep only this priority, all when `None`
    pub priority: Option<Priority>,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            approved_only: true,
            priority: None,
        }
    }
}

impl ReportFilter {
    #[must_use]
    pub fn with_priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn accepts(&self, report: &Report) -> bool {
        (!self.approved_only || report.is_approved())
            && self.priority.is_none_or(|p| report.priority == Some(p))
    }
}
