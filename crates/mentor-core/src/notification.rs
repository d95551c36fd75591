//! Notification and audience types.
//!
//! The backend encodes the broadcast audience as an integer (0 for everyone,
//! 1-4 for a specific academic level) and document access scopes as fixed
//! strings. Both encodings are kept at the serde boundary so the rest of the
//! client works with typed values.

use serde::{Deserialize, Serialize};

/// The audience of a notification or broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TargetLevel {
    /// Every user.
    All,
    /// Students of one academic level (1-4).
    Level(u8),
}

impl TargetLevel {
    /// The backend integer encoding: 0 for all, 1-4 for a specific level.
    pub fn as_backend_value(&self) -> i64 {
        match self {
            TargetLevel::All => 0,
            TargetLevel::Level(level) => i64::from(*level),
        }
    }
}

impl From<TargetLevel> for i64 {
    fn from(level: TargetLevel) -> Self {
        level.as_backend_value()
    }
}

impl TryFrom<i64> for TargetLevel {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(TargetLevel::All),
            1..=4 => Ok(TargetLevel::Level(value as u8)),
            other => Err(format!("target level out of range 0-4: {}", other)),
        }
    }
}

impl std::fmt::Display for TargetLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLevel::All => write!(f, "all"),
            TargetLevel::Level(level) => write!(f, "level {}", level),
        }
    }
}

impl std::str::FromStr for TargetLevel {
    type Err = String;

    /// Parses the CLI/backend string form: `all` or `0`-`4`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(TargetLevel::All);
        }
        let value: i64 = s
            .parse()
            .map_err(|_| format!("expected 'all' or a level 0-4, got '{}'", s))?;
        TargetLevel::try_from(value)
    }
}

/// Who may retrieve an uploaded document through the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    Public,
    AllStudents,
    Level1,
    Level2,
    Level3,
    Level4,
    AdminOnly,
}

impl AccessScope {
    /// The backend form-field encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessScope::Public => "public",
            AccessScope::AllStudents => "all_students",
            AccessScope::Level1 => "level_1",
            AccessScope::Level2 => "level_2",
            AccessScope::Level3 => "level_3",
            AccessScope::Level4 => "level_4",
            AccessScope::AdminOnly => "admin_only",
        }
    }
}

impl std::str::FromStr for AccessScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "public" => Ok(AccessScope::Public),
            "all_students" => Ok(AccessScope::AllStudents),
            "level_1" => Ok(AccessScope::Level1),
            "level_2" => Ok(AccessScope::Level2),
            "level_3" => Ok(AccessScope::Level3),
            "level_4" => Ok(AccessScope::Level4),
            "admin_only" => Ok(AccessScope::AdminOnly),
            other => Err(format!("unknown access scope '{}'", other)),
        }
    }
}

/// A notification delivered to the current user.
///
/// Fetched on demand and held only in memory; the local list drops entries
/// optimistically when they are marked seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub target_level: TargetLevel,
    /// Set when the notification announces an uploaded document.
    pub document_internal_id: Option<String>,
    /// Timestamp as reported by the backend (RFC 3339).
    pub timestamp: String,
    pub is_seen: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_level_backend_encoding() {
        assert_eq!(TargetLevel::All.as_backend_value(), 0);
        assert_eq!(TargetLevel::Level(3).as_backend_value(), 3);

        let level: TargetLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level, TargetLevel::Level(2));
        let all: TargetLevel = serde_json::from_str("0").unwrap();
        assert_eq!(all, TargetLevel::All);
        assert!(serde_json::from_str::<TargetLevel>("7").is_err());
    }

    #[test]
    fn test_target_level_parse() {
        assert_eq!("all".parse::<TargetLevel>().unwrap(), TargetLevel::All);
        assert_eq!("ALL".parse::<TargetLevel>().unwrap(), TargetLevel::All);
        assert_eq!("4".parse::<TargetLevel>().unwrap(), TargetLevel::Level(4));
        assert!("5".parse::<TargetLevel>().is_err());
        assert!("x".parse::<TargetLevel>().is_err());
    }

    #[test]
    fn test_access_scope_round_trip() {
        for scope in [
            AccessScope::Public,
            AccessScope::AllStudents,
            AccessScope::Level2,
            AccessScope::AdminOnly,
        ] {
            assert_eq!(scope.as_str().parse::<AccessScope>().unwrap(), scope);
        }
    }

    #[test]
    fn test_notification_wire_format() {
        let json = r#"{
            "id": 5,
            "message": "New lecture notes",
            "target_level": 1,
            "document_internal_id": "doc-abc",
            "timestamp": "2026-03-01T10:00:00Z",
            "is_seen": false
        }"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.id, 5);
        assert_eq!(notification.target_level, TargetLevel::Level(1));
        assert_eq!(notification.document_internal_id.as_deref(), Some("doc-abc"));
        assert!(!notification.is_seen);
    }
}
