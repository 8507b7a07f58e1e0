use super::client::ApiClient;
use super::de::opt_string_or_number;
use super::transport::{ApiRequest, ApiResponse};
use crate::error::{api_error, AppResult, Error};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const CHECK_PARSING_PATH: &str = "lessons/check_parsing/";
const PARSE_LESSONS_PATH: &str = "lessons/parse_lessons/";

/// One lesson recognized in bulk-pasted text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedLesson {
    #[serde(default)]
    pub teacher_first_name: Option<String>,
    #[serde(default)]
    pub teacher_last_name: Option<String>,
    #[serde(default)]
    pub teacher_email: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub event_link: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub student_count: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub flow_number: Option<String>,
}

impl ParsedLesson {
    pub fn teacher_name(&self) -> String {
        let first = self.teacher_first_name.as_deref().unwrap_or("N/A");
        let last = self.teacher_last_name.as_deref().unwrap_or("N/A");
        format!("{} {}", first, last)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    lessons: Option<Vec<ParsedLesson>>,
    #[serde(default)]
    details: Option<Value>,
    #[serde(default)]
    detail: Option<Value>,
}

/// Bulk lesson-link parsing endpoints
#[derive(Clone)]
pub struct LessonsClient {
    api: ApiClient,
}

impl LessonsClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Validate pasted text without creating anything
    pub async fn check_parsing(&self, text: &str) -> AppResult<Vec<ParsedLesson>> {
        self.post_text(CHECK_PARSING_PATH, text).await
    }

    /// Parse pasted text and create the lessons
    pub async fn parse_lessons(&self, text: &str) -> AppResult<Vec<ParsedLesson>> {
        self.post_text(PARSE_LESSONS_PATH, text).await
    }

    async fn post_text(&self, path: &str, text: &str) -> AppResult<Vec<ParsedLesson>> {
        let response = self
            .api
            .send(ApiRequest::post(path, json!({ "text": text })))
            .await?;
        lessons_from_response(response)
    }
}

fn lessons_from_response(response: ApiResponse) -> AppResult<Vec<ParsedLesson>> {
    // Bodies that are not a JSON object carry no lessons or details
    let parsed: ParseResponse = response
        .json_value()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    if let Some(details) = parsed.details.or(parsed.detail) {
        return Err(Error::LessonParsing(clean_details(&details)));
    }

    match (response.is_success(), parsed.lessons) {
        (true, Some(lessons)) => Ok(lessons),
        (true, None) => Ok(Vec::new()),
        (false, _) => Err(api_error(response.status, &response.body)),
    }
}

/// Turn a `details` payload into the message shown to the user.
///
/// The backend sends either a plain string, a stringified Python list such
/// as `"['line 3 missing time']"`, or a JSON list. Bracket and quote markers
/// are stripped and multiple entries are joined with `"; "`.
pub fn clean_details(details: &Value) -> String {
    match details {
        Value::String(s) => clean_details_str(s),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => clean_details_str(s),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn clean_details_str(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return trimmed.to_string();
    };
    let inner = inner.trim();

    match split_quoted(inner) {
        Some(items) if !items.is_empty() => items.join("; "),
        _ => inner.to_string(),
    }
}

// Quoted items of a Python-style list literal; `None` unless the text
// between items is only commas and whitespace
fn split_quoted(inner: &str) -> Option<Vec<String>> {
    let mut items = Vec::new();
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == ',' || c.is_whitespace() {
            continue;
        }
        if c != '\'' && c != '"' {
            return None;
        }
        let quote = c;
        let mut item = String::new();
        let mut closed = false;
        while let Some(ch) = chars.next() {
            if ch == '\\' {
                if let Some(escaped) = chars.next() {
                    item.push(escaped);
                }
                continue;
            }
            if ch == quote {
                closed = true;
                break;
            }
            item.push(ch);
        }
        if !closed {
            return None;
        }
        items.push(item.trim().to_string());
    }

    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_stringified_list() {
        let details = json!("['line 3 missing time']");
        assert_eq!(clean_details(&details), "line 3 missing time");
    }

    #[test]
    fn test_clean_multiple_entries() {
        let details = json!("['line 3 missing time', \"line 7: unknown teacher\"]");
        assert_eq!(
            clean_details(&details),
            "line 3 missing time; line 7: unknown teacher"
        );
    }

    #[test]
    fn test_clean_plain_and_json_list() {
        assert_eq!(clean_details(&json!("  no link found ")), "no link found");
        assert_eq!(
            clean_details(&json!(["first, with comma", "second"])),
            "first, with comma; second"
        );
        assert_eq!(clean_details(&json!("[unquoted message]")), "unquoted message");
        assert_eq!(clean_details(&json!("can't read line 2")), "can't read line 2");
    }

    #[test]
    fn test_plain_message_with_quoted_prefix_is_kept() {
        assert_eq!(
            clean_details(&json!("'EV-3' is not a valid group code")),
            "'EV-3' is not a valid group code"
        );
        assert_eq!(
            clean_details(&json!("['EV-3' is not a valid group code]")),
            "'EV-3' is not a valid group code"
        );
        assert_eq!(
            clean_details(&json!("['group \\'EV-3\\' unknown', 'line 4 empty']")),
            "group 'EV-3' unknown; line 4 empty"
        );
    }

    #[test]
    fn test_non_object_error_body_is_api_error() {
        let err = lessons_from_response(ApiResponse::new(500, "\"oops\"")).unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }), "{err:?}");

        let err = lessons_from_response(ApiResponse::new(502, "[1, 2]")).unwrap_err();
        assert!(matches!(err, Error::Api { status: 502, .. }), "{err:?}");
    }

    #[test]
    fn test_details_on_success_status_is_an_error() {
        let response = ApiResponse::new(200, r#"{"details": "['bad group code']"}"#);
        let err = lessons_from_response(response).unwrap_err();
        assert!(matches!(err, Error::LessonParsing(msg) if msg == "bad group code"));
    }

    #[test]
    fn test_lessons_decoded() {
        let response = ApiResponse::new(
            200,
            r#"{"lessons": [{"teacher_first_name": "Yestay", "teacher_last_name": "Anuarbekov",
                "teacher_email": "yestay@example.com", "group": "EV-3",
                "start_time": "20:15", "end_time": "21:15", "student_count": 7,
                "flow_number": "1.0", "event_link": "https://meet.google.com/defg-hijk-lmn"}]}"#,
        );
        let lessons = lessons_from_response(response).unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].student_count.as_deref(), Some("7"));
        assert_eq!(lessons[0].teacher_name(), "Yestay Anuarbekov");
    }

    #[test]
    fn test_error_without_details() {
        let response = ApiResponse::new(500, "Internal Server Error");
        let err = lessons_from_response(response).unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }));
    }
}
