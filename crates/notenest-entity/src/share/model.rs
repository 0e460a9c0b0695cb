//! Share link entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Unix timestamp of 9999-12-31T23:59:59Z.
const PERMANENT_EXPIRY_TIMESTAMP: i64 = 253_402_300_799;

/// Kind of resource a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// A note; redemption returns its content.
    #[default]
    Note,
    /// An uploaded document; redemption returns metadata and a download URL.
    Document,
}

/// Lifecycle state of a link at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareState {
    /// Redeemable.
    Active,
    /// `expiresAt` has passed.
    Expired,
    /// `viewCount` reached a non-zero `viewLimit`.
    LimitReached,
}

/// A token granting limited access to a note or document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    /// Opaque random token; primary key of the link.
    pub token: String,
    /// ID of the shared resource.
    #[serde(rename = "noteId")]
    pub resource_id: String,
    /// Kind of the shared resource.
    #[serde(default)]
    pub resource_type: ResourceType,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// When the link stops being valid. Permanent links use a far-future sentinel.
    pub expires_at: DateTime<Utc>,
    /// Maximum number of views; 0 means unlimited.
    #[serde(default)]
    pub view_limit: u32,
    /// Number of views recorded so far.
    #[serde(default)]
    pub view_count: u32,
}

impl ShareLink {
    /// Name of the counter field in the stored document.
    pub const VIEW_COUNT_FIELD: &'static str = "viewCount";

    /// Builds a fresh link. `expires_in_hours == 0` makes it permanent, and
    /// an expiry past the permanent sentinel is clamped to it.
    pub fn new(
        token: String,
        resource_type: ResourceType,
        resource_id: String,
        expires_in_hours: u32,
        view_limit: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = if expires_in_hours == 0 {
            Self::permanent_expiry()
        } else {
            Duration::try_hours(i64::from(expires_in_hours))
                .and_then(|ttl| now.checked_add_signed(ttl))
                .filter(|at| *at < Self::permanent_expiry())
                .unwrap_or_else(Self::permanent_expiry)
        };

        Self {
            token,
            resource_id,
            resource_type,
            created_at: now,
            expires_at,
            view_limit,
            view_count: 0,
        }
    }

    /// The far-future expiry stored for permanent links.
    pub fn permanent_expiry() -> DateTime<Utc> {
        DateTime::from_timestamp(PERMANENT_EXPIRY_TIMESTAMP, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether the link was created without an expiry.
    pub fn is_permanent(&self) -> bool {
        self.expires_at >= Self::permanent_expiry()
    }

    /// Whether a non-zero view limit has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.view_limit > 0 && self.view_count >= self.view_limit
    }

    /// State of the link at `now`. Expiry takes precedence over the limit.
    pub fn state_at(&self, now: DateTime<Utc>) -> ShareState {
        if now >= self.expires_at {
            ShareState::Expired
        } else if self.is_exhausted() {
            ShareState::LimitReached
        } else {
            ShareState::Active
        }
    }

    /// `now < expiresAt` and (`viewLimit == 0` or `viewCount < viewLimit`).
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == ShareState::Active
    }

    /// Validity against the current clock.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Views left before the limit, or `None` when unlimited.
    pub fn remaining_views(&self) -> Option<u32> {
        (self.view_limit > 0).then(|| self.view_limit.saturating_sub(self.view_count))
    }

    /// Whether a post-increment count reaches this link's limit.
    pub fn limit_reached_by(&self, view_count: u32) -> bool {
        self.view_limit > 0 && view_count >= self.view_limit
    }
}
