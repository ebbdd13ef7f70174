//! Domain models for linkstash.

use serde::{Deserialize, Serialize};

/// A user-created folder of saved links.
///
/// `system_category` is null until the classification pipeline assigns a
/// label, and is written at most once by this service (classify-once
/// invariant, enforced by a conditional update in the folder repository).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub system_category: Option<String>,
}

/// A saved link. Created by the authoring application; only read here.
///
/// `folder_id` is nullable: a link may be unfiled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedLink {
    pub id: i64,
    pub folder_id: Option<i64>,
    pub title: String,
}

/// An append-only diagnostic log row.
///
/// Write-only from this service's perspective; never read back and never
/// used for control decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugEvent {
    pub device_id: Option<String>,
    pub stage: String,
    pub payload: serde_json::Value,
}

// =============================================================================
// BACKFILL REPORTING
// =============================================================================

/// One folder the backfill batch failed to classify.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackfillFailure {
    #[serde(rename = "folderId")]
    pub folder_id: i64,
    pub error: String,
}

/// Aggregate result of one backfill batch invocation.
///
/// Invariant: `processed + failures.len()` equals the number of folders
/// fetched for the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillReport {
    pub message: String,
    pub processed: usize,
    /// Folders in *this page* that were fetched but not classified
    /// (page-local, not the full backlog size). The external scheduler
    /// re-invokes until a page drains completely.
    pub remaining: usize,
    pub failures: Vec<BackfillFailure>,
}

// =============================================================================
// CHANGE NOTIFICATIONS (webhook payloads)
// =============================================================================

/// Folder row carried inside a `folders` table change notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub system_category: Option<String>,
}

/// Saved-link row carried inside a `saved_links` table change notification.
/// Only the folder reference matters to the classification pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedLinkRecord {
    #[serde(default)]
    pub folder_id: Option<i64>,
}

/// A database change event, discriminated by the `table` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "table")]
pub enum RowEvent {
    /// A row changed in the `folders` table.
    #[serde(rename = "folders")]
    Folders { record: FolderRecord },
    /// A row changed in the `saved_links` table.
    #[serde(rename = "saved_links")]
    SavedLinks { record: SavedLinkRecord },
}

/// Inbound webhook payload: a closed set of recognized shapes.
///
/// Variants are tried in order; anything that matches neither a tagged row
/// event nor the direct-invocation shape falls through to `Unrecognized`,
/// which the router reports as an ignored payload rather than an error
/// (the upstream caller cannot distinguish "ignored" from "error" except by
/// status semantics, and must not retry ignores).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChangeNotification {
    /// Database webhook shape: `{table, record, ...}`.
    Row(RowEvent),
    /// Ad-hoc testing shape carrying a folder name directly, with no id.
    Direct {
        #[serde(rename = "folderName")]
        folder_name: String,
    },
    /// Anything else. Ignored by the router.
    Unrecognized(serde_json::Value),
}

/// Response from the webhook classification router.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ClassifyResponse {
    /// Short-circuit outcomes ("Already classified", ignores).
    Message { message: String },
    /// A classification ran; `updated` reports whether the conditional
    /// store write landed.
    Classified { category: String, updated: bool },
}

impl ClassifyResponse {
    /// Idempotency short-circuit: the folder already carries a category.
    pub fn already_classified() -> Self {
        ClassifyResponse::Message {
            message: "Already classified".to_string(),
        }
    }

    /// Payload shape not recognized or missing the fields needed to act.
    pub fn ignored() -> Self {
        ClassifyResponse::Message {
            message: "Ignored: Invalid payload".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_event_deserializes() {
        let json = r#"{"type":"INSERT","table":"folders","record":{"id":3,"name":"Recipes","system_category":null}}"#;
        let payload: ChangeNotification = serde_json::from_str(json).unwrap();
        match payload {
            ChangeNotification::Row(RowEvent::Folders { record }) => {
                assert_eq!(record.id, 3);
                assert_eq!(record.name, "Recipes");
                assert!(record.system_category.is_none());
            }
            other => panic!("Expected folders row event, got {:?}", other),
        }
    }

    #[test]
    fn test_folder_event_with_category() {
        let json =
            r#"{"table":"folders","record":{"id":3,"name":"Recipes","system_category":"Food"}}"#;
        let payload: ChangeNotification = serde_json::from_str(json).unwrap();
        match payload {
            ChangeNotification::Row(RowEvent::Folders { record }) => {
                assert_eq!(record.system_category.as_deref(), Some("Food"));
            }
            other => panic!("Expected folders row event, got {:?}", other),
        }
    }

    #[test]
    fn test_saved_link_event_deserializes() {
        let json = r#"{"table":"saved_links","record":{"id":9,"folder_id":12,"title":"x"}}"#;
        let payload: ChangeNotification = serde_json::from_str(json).unwrap();
        match payload {
            ChangeNotification::Row(RowEvent::SavedLinks { record }) => {
                assert_eq!(record.folder_id, Some(12));
            }
            other => panic!("Expected saved_links row event, got {:?}", other),
        }
    }

    #[test]
    fn test_saved_link_event_without_folder() {
        let json = r#"{"table":"saved_links","record":{"id":9,"title":"unfiled"}}"#;
        let payload: ChangeNotification = serde_json::from_str(json).unwrap();
        match payload {
            ChangeNotification::Row(RowEvent::SavedLinks { record }) => {
                assert!(record.folder_id.is_none());
            }
            other => panic!("Expected saved_links row event, got {:?}", other),
        }
    }

    #[test]
    fn test_direct_shape_deserializes() {
        let json = r#"{"folderName":"Hiking Trips"}"#;
        let payload: ChangeNotification = serde_json::from_str(json).unwrap();
        match payload {
            ChangeNotification::Direct { folder_name } => {
                assert_eq!(folder_name, "Hiking Trips");
            }
            other => panic!("Expected direct shape, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_table_is_unrecognized() {
        let json = r#"{"table":"comments","record":{"id":1}}"#;
        let payload: ChangeNotification = serde_json::from_str(json).unwrap();
        assert!(matches!(payload, ChangeNotification::Unrecognized(_)));
    }

    #[test]
    fn test_empty_object_is_unrecognized() {
        let payload: ChangeNotification = serde_json::from_str("{}").unwrap();
        assert!(matches!(payload, ChangeNotification::Unrecognized(_)));
    }

    #[test]
    fn test_classify_response_message_shape() {
        let json = serde_json::to_value(ClassifyResponse::already_classified()).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Already classified"}));
    }

    #[test]
    fn test_classify_response_classified_shape() {
        let json = serde_json::to_value(ClassifyResponse::Classified {
            category: "Food".to_string(),
            updated: true,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"category": "Food", "updated": true}));
    }

    #[test]
    fn test_backfill_failure_uses_camel_case_id() {
        let failure = BackfillFailure {
            folder_id: 42,
            error: "Gemini API error: 500".to_string(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert!(json.get("folderId").is_some());
        assert!(json.get("folder_id").is_none());
    }

    #[test]
    fn test_folder_roundtrip() {
        let folder = Folder {
            id: 1,
            name: "Travel".to_string(),
            system_category: None,
        };
        let json = serde_json::to_string(&folder).unwrap();
        let back: Folder = serde_json::from_str(&json).unwrap();
        assert_eq!(folder, back);
    }
}
