use serde::{Deserialize, Serialize};

/// What happened, from the subscriber's point of view. The delivery channel
/// fan-out (email/push/...) lives behind the notification sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Activated,
    Renewed,
    ExpiringSoon,
    Expired,
    RenewalFailed,
    Cancelled,
    PackageActivated,
    PackageCancelled,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Activated => "activated",
            NotificationKind::Renewed => "renewed",
            NotificationKind::ExpiringSoon => "expiring_soon",
            NotificationKind::Expired => "expired",
            NotificationKind::RenewalFailed => "renewal_failed",
            NotificationKind::Cancelled => "cancelled",
            NotificationKind::PackageActivated => "package_activated",
            NotificationKind::PackageCancelled => "package_cancelled",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
