//! Friendship edge and friend-request models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role a friend holds over the owning user's shared schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "friend_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendRole {
    /// No schedule access.
    None,
    /// Read-only schedule access.
    Viewer,
    /// May edit shared schedule entries.
    Administrator,
}

impl FriendRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Viewer => "viewer",
            Self::Administrator => "administrator",
        }
    }
}

impl fmt::Display for FriendRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FriendRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "viewer" => Ok(Self::Viewer),
            "administrator" => Ok(Self::Administrator),
            other => Err(format!("unknown friend role: {other}")),
        }
    }
}

/// Lifecycle status of a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting the requested user's response.
    Pending,
    /// Accepted; friendship edges exist.
    Accepted,
    /// Declined; no edges were created.
    Declined,
}

/// A directional friendship edge.
///
/// A mutual friendship is two rows, one per direction, potentially
/// carrying different roles.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Friendship {
    /// Unique edge identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// The befriended user.
    pub friend_id: Uuid,
    /// The friend's role over the owner's schedule.
    pub role: FriendRole,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create one friendship edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFriendship {
    /// The owning user.
    pub user_id: Uuid,
    /// The befriended user.
    pub friend_id: Uuid,
    /// The friend's role over the owner's schedule.
    pub role: FriendRole,
}

/// A friend request: `pending -> accepted | declined`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FriendRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// The user who sent the request.
    pub requester_id: Uuid,
    /// The user being asked.
    pub requested_id: Uuid,
    /// The role the requester grants the counterpart on acceptance.
    pub role: FriendRole,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// When the request was sent.
    pub created_at: DateTime<Utc>,
    /// When the request was answered.
    pub responded_at: Option<DateTime<Utc>>,
}

impl FriendRequest {
    /// Whether the request is still awaiting a response.
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// The two edges an acceptance creates.
    ///
    /// The requested user's edge toward the requester carries the
    /// requester's chosen role; the reverse edge defaults to viewer.
    pub fn edges_on_accept(&self) -> (NewFriendship, NewFriendship) {
        (
            NewFriendship {
                user_id: self.requested_id,
                friend_id: self.requester_id,
                role: self.role,
            },
            NewFriendship {
                user_id: self.requester_id,
                friend_id: self.requested_id,
                role: FriendRole::Viewer,
            },
        )
    }
}

/// Data required to create a friend request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFriendRequest {
    /// The user sending the request.
    pub requester_id: Uuid,
    /// The user being asked.
    pub requested_id: Uuid,
    /// The role granted to the counterpart on acceptance.
    pub role: FriendRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(
            "administrator".parse::<FriendRole>().unwrap(),
            FriendRole::Administrator
        );
        assert_eq!("VIEWER".parse::<FriendRole>().unwrap(), FriendRole::Viewer);
        assert!("owner".parse::<FriendRole>().is_err());
    }

    #[test]
    fn test_edges_on_accept_roles() {
        let request = FriendRequest {
            id: uuid(9),
            requester_id: uuid(1),
            requested_id: uuid(2),
            role: FriendRole::Administrator,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };

        let (toward_requester, toward_requested) = request.edges_on_accept();
        assert_eq!(toward_requester.user_id, uuid(2));
        assert_eq!(toward_requester.friend_id, uuid(1));
        assert_eq!(toward_requester.role, FriendRole::Administrator);
        assert_eq!(toward_requested.user_id, uuid(1));
        assert_eq!(toward_requested.friend_id, uuid(2));
        assert_eq!(toward_requested.role, FriendRole::Viewer);
    }
}
