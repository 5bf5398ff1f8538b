//! Status machines for Content and Object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a recognized status")]
pub struct UnknownStatus(pub String);

/// Content lifecycle status.
///
/// ```text
/// created   → uploading, uploaded, failed
/// uploading → uploaded, failed
/// uploaded  → processing, processed, archived, failed
/// processing→ processed, failed
/// processed → archived, failed
/// failed    → (terminal)
/// archived  → (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Created,
    Uploading,
    Uploaded,
    Processing,
    Processed,
    Failed,
    Archived,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 7] = [
        ContentStatus::Created,
        ContentStatus::Uploading,
        ContentStatus::Uploaded,
        ContentStatus::Processing,
        ContentStatus::Processed,
        ContentStatus::Failed,
        ContentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Created => "created",
            ContentStatus::Uploading => "uploading",
            ContentStatus::Uploaded => "uploaded",
            ContentStatus::Processing => "processing",
            ContentStatus::Processed => "processed",
            ContentStatus::Failed => "failed",
            ContentStatus::Archived => "archived",
        }
    }

    /// Whether a transition from `self` to `next` is allowed.
    pub fn can_transition_to(&self, next: ContentStatus) -> bool {
        use ContentStatus::*;
        if next == Failed {
            return !matches!(self, Failed | Archived);
        }
        matches!(
            (self, next),
            (Created, Uploading)
                | (Created, Uploaded)
                | (Uploading, Uploaded)
                | (Uploaded, Processing)
                | (Uploaded, Processed)
                | (Uploaded, Archived)
                | (Processing, Processed)
                | (Processed, Archived)
        )
    }

    /// Part of the Ready predicate: a content whose own status
    /// indicates completed bytes. Recursing into children is the caller's
    /// job (see [`crate::ready`]).
    pub fn is_ready_status(&self) -> bool {
        matches!(self, ContentStatus::Uploaded | ContentStatus::Processed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ContentStatus::Failed | ContentStatus::Archived)
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(ContentStatus::Created),
            "uploading" => Ok(ContentStatus::Uploading),
            "uploaded" => Ok(ContentStatus::Uploaded),
            "processing" => Ok(ContentStatus::Processing),
            "processed" => Ok(ContentStatus::Processed),
            "failed" => Ok(ContentStatus::Failed),
            "archived" => Ok(ContentStatus::Archived),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Object lifecycle status. Independent of Content status;
/// updating one never cascades to the other. Follows the same shape
/// of graph as Content minus the `archived` terminal (objects are never
/// archived directly — only the Content that owns them is).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectStatus {
    Created,
    Uploading,
    Uploaded,
    Processing,
    Processed,
    Failed,
}

impl ObjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectStatus::Created => "created",
            ObjectStatus::Uploading => "uploading",
            ObjectStatus::Uploaded => "uploaded",
            ObjectStatus::Processing => "processing",
            ObjectStatus::Processed => "processed",
            ObjectStatus::Failed => "failed",
        }
    }

    pub fn can_transition_to(&self, next: ObjectStatus) -> bool {
        use ObjectStatus::*;
        if next == Failed {
            return *self != Failed;
        }
        matches!(
            (self, next),
            (Created, Uploading)
                | (Created, Uploaded)
                | (Uploading, Uploaded)
                | (Uploaded, Processing)
                | (Uploaded, Processed)
                | (Processing, Processed)
        )
    }
}

impl fmt::Display for ObjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ObjectStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(ObjectStatus::Created),
            "uploading" => Ok(ObjectStatus::Uploading),
            "uploaded" => Ok(ObjectStatus::Uploaded),
            "processing" => Ok(ObjectStatus::Processing),
            "processed" => Ok(ObjectStatus::Processed),
            "failed" => Ok(ObjectStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_content_transitions() {
        assert!(ContentStatus::Created.can_transition_to(ContentStatus::Uploading));
        assert!(ContentStatus::Uploaded.can_transition_to(ContentStatus::Archived));
        assert!(ContentStatus::Processed.can_transition_to(ContentStatus::Failed));
        assert!(!ContentStatus::Archived.can_transition_to(ContentStatus::Failed));
        assert!(!ContentStatus::Created.can_transition_to(ContentStatus::Processed));
        assert!(!ContentStatus::Failed.can_transition_to(ContentStatus::Uploaded));
    }

    #[test]
    fn ready_status_set() {
        assert!(ContentStatus::Uploaded.is_ready_status());
        assert!(ContentStatus::Processed.is_ready_status());
        assert!(!ContentStatus::Processing.is_ready_status());
    }

    #[test]
    fn parses_round_trip() {
        for s in ContentStatus::ALL {
            assert_eq!(s, s.as_str().parse().unwrap());
        }
    }
}
