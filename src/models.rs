use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Status given to a case created without one
pub const DEFAULT_STATUS: &str = "open";

/// Priority given to a case created without one
pub const DEFAULT_PRIORITY: &str = "medium";

/// A case record as stored and returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /cases`
///
/// Every field is optional at the wire level so that a missing title or
/// description is reported as a validation error rather than a body
/// rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub assigned_to: Option<String>,
}

/// Request body for `PUT /cases/:id`
///
/// `assigned_to` distinguishes an omitted key (`None`) from an explicit
/// `null` (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCaseRequest {
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub assigned_to: Option<Option<String>>,
}

/// Body returned by `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Any JSON scalar accepted for a text field; numbers and booleans keep
/// their JSON spelling.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
            Scalar::Bool(flag) => flag.to_string(),
        }
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scalar>::deserialize(deserializer).map(|value| value.map(String::from))
}

/// Only called when the key is present, so `null` becomes `Some(None)`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(deserializer).map(Some)
}

/// Treats an empty string the same as an omitted field.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl CreateCaseRequest {
    /// Build a request carrying only the two required fields
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }
}

impl UpdateCaseRequest {
    /// Apply this partial update to `case`.
    ///
    /// Text fields only overwrite when given a non-empty value. `assigned_to`
    /// overwrites whenever the key was present. `updated_at` is left to the
    /// caller.
    pub fn apply_to(self, case: &mut Case) {
        if let Some(title) = non_empty(self.title) {
            case.title = title;
        }
        if let Some(description) = non_empty(self.description) {
            case.description = description;
        }
        if let Some(status) = non_empty(self.status) {
            case.status = status;
        }
        if let Some(priority) = non_empty(self.priority) {
            case.priority = priority;
        }
        if let Some(assigned_to) = self.assigned_to {
            case.assigned_to = assigned_to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_case() -> Case {
        let now = Utc::now();
        Case {
            id: "case-1".to_string(),
            title: "Original".to_string(),
            description: "Original description".to_string(),
            status: DEFAULT_STATUS.to_string(),
            priority: DEFAULT_PRIORITY.to_string(),
            assigned_to: Some("clerk@example.com".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_case_serializes_camel_case() {
        let json = serde_json::to_value(sample_case()).unwrap();

        assert!(json.get("assignedTo").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("assigned_to").is_none());
    }

    #[test]
    fn test_unassigned_case_serializes_null() {
        let mut case = sample_case();
        case.assigned_to = None;

        let json = serde_json::to_value(case).unwrap();
        assert!(json["assignedTo"].is_null());
    }

    #[test]
    fn test_update_request_distinguishes_null_from_missing() {
        let missing: UpdateCaseRequest = serde_json::from_str(r#"{"status":"closed"}"#).unwrap();
        assert_eq!(missing.assigned_to, None);

        let cleared: UpdateCaseRequest = serde_json::from_str(r#"{"assignedTo":null}"#).unwrap();
        assert_eq!(cleared.assigned_to, Some(None));

        let set: UpdateCaseRequest =
            serde_json::from_str(r#"{"assignedTo":"judge@example.com"}"#).unwrap();
        assert_eq!(set.assigned_to, Some(Some("judge@example.com".to_string())));
    }

    #[test]
    fn test_apply_ignores_empty_strings() {
        let mut case = sample_case();
        let update = UpdateCaseRequest {
            title: Some(String::new()),
            description: Some(String::new()),
            status: Some("in-progress".to_string()),
            ..UpdateCaseRequest::default()
        };

        update.apply_to(&mut case);

        assert_eq!(case.title, "Original");
        assert_eq!(case.description, "Original description");
        assert_eq!(case.status, "in-progress");
        assert_eq!(case.priority, DEFAULT_PRIORITY);
        assert_eq!(case.assigned_to.as_deref(), Some("clerk@example.com"));
    }

    #[test]
    fn test_apply_clears_assignee_on_explicit_null() {
        let mut case = sample_case();
        let update: UpdateCaseRequest = serde_json::from_str(r#"{"assignedTo":null}"#).unwrap();

        update.apply_to(&mut case);

        assert_eq!(case.assigned_to, None);
    }

    #[test]
    fn test_scalar_values_are_taken_as_text() {
        let request: CreateCaseRequest = serde_json::from_str(
            r#"{"title":"t","description":"d","priority":1,"status":true,"assignedTo":42}"#,
        )
        .unwrap();

        assert_eq!(request.priority.as_deref(), Some("1"));
        assert_eq!(request.status.as_deref(), Some("true"));
        assert_eq!(request.assigned_to.as_deref(), Some("42"));

        let update: UpdateCaseRequest =
            serde_json::from_str(r#"{"priority":2.5,"assignedTo":7}"#).unwrap();
        assert_eq!(update.priority.as_deref(), Some("2.5"));
        assert_eq!(update.assigned_to, Some(Some("7".to_string())));
    }

    #[test]
    fn test_structured_values_are_rejected() {
        let result: Result<CreateCaseRequest, _> =
            serde_json::from_str(r#"{"title":["t"],"description":"d"}"#);
        assert!(result.is_err());

        let result: Result<UpdateCaseRequest, _> =
            serde_json::from_str(r#"{"status":{"state":"closed"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_accepts_partial_body() {
        let request: CreateCaseRequest = serde_json::from_str(r#"{"title":"Only title"}"#).unwrap();

        assert_eq!(request.title.as_deref(), Some("Only title"));
        assert!(request.description.is_none());
    }
}
