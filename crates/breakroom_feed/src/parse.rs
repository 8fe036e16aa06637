use feed_logging::{feed_debug, feed_error, feed_warn, tags};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ParsedArticle;

const PUBLICATION_DATE: &str = "webPublicationDate";
const TITLE: &str = "webTitle";
const URL: &str = "webUrl";

/// What to do with the remaining results once an entry lacks a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum MissingFieldPolicy {
    /// Drop the bad entry and keep scanning.
    #[default]
    Skip,
    /// Stop at the bad entry and keep only what preceded it.
    Truncate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIssueKind {
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("unexpected structure: {0}")]
    Structure(String),
    #[error("result entry is not an object")]
    EntryNotObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

/// A problem found while parsing. `index` points into `results` for per-entry issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub index: Option<usize>,
    pub kind: ParseIssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFeed {
    pub articles: Vec<ParsedArticle>,
    pub issues: Vec<ParseIssue>,
}

/// Extracts article records from a `{"response": {"results": [...]}}` payload.
///
/// Parsing never fails as a whole: problems are logged, recorded in
/// [`ParsedFeed::issues`], and whatever was extracted up to that point is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleParser {
    policy: MissingFieldPolicy,
}

impl ArticleParser {
    pub fn new(policy: MissingFieldPolicy) -> Self {
        Self { policy }
    }

    pub fn parse(&self, json_text: &str) -> ParsedFeed {
        let mut feed = ParsedFeed::default();
        if json_text.trim().is_empty() {
            feed_debug!("The JSON text is empty. Returning early.");
            return feed;
        }

        let results = match take_results(json_text) {
            Ok(results) => results,
            Err(kind) => {
                feed_error!(tag: tags::JSON, "Problem parsing the article JSON results: {}", kind);
                feed.issues.push(ParseIssue { index: None, kind });
                return feed;
            }
        };

        for (index, entry) in results.iter().enumerate() {
            match extract_entry(entry) {
                Ok(article) => feed.articles.push(article),
                Err(kind) => {
                    feed_warn!(tag: tags::JSON, "Result {} rejected: {}", index, kind);
                    feed.issues.push(ParseIssue {
                        index: Some(index),
                        kind,
                    });
                    if self.policy == MissingFieldPolicy::Truncate {
                        feed_warn!(
                            tag: tags::JSON,
                            "Dropping {} remaining result(s) after rejected entry",
                            results.len() - index - 1
                        );
                        break;
                    }
                }
            }
        }

        feed
    }
}

fn take_results(json_text: &str) -> Result<Vec<Value>, ParseIssueKind> {
    let root: Value = serde_json::from_str(json_text)
        .map_err(|err| ParseIssueKind::InvalidJson(err.to_string()))?;
    let Value::Object(mut root) = root else {
        return Err(ParseIssueKind::Structure("root is not an object".into()));
    };
    let Some(Value::Object(mut response)) = root.remove("response") else {
        return Err(ParseIssueKind::Structure("missing `response` object".into()));
    };
    match response.remove("results") {
        Some(Value::Array(results)) => Ok(results),
        Some(_) => Err(ParseIssueKind::Structure("`results` is not an array".into())),
        None => Err(ParseIssueKind::Structure("missing `results` array".into())),
    }
}

fn extract_entry(entry: &Value) -> Result<ParsedArticle, ParseIssueKind> {
    let entry = entry.as_object().ok_or(ParseIssueKind::EntryNotObject)?;
    let publication_date = required(entry, PUBLICATION_DATE)?;
    let title = required(entry, TITLE)?;
    let url = required(entry, URL)?;

    // `fields` is only present when the query asked for `show-fields`.
    let fields = entry.get("fields").and_then(Value::as_object);

    Ok(ParsedArticle {
        publication_date,
        title,
        url,
        trail_text: optional(fields, "trailText"),
        byline: optional(fields, "byline"),
        thumbnail_url: optional(fields, "thumbnail"),
    })
}

fn required(entry: &Map<String, Value>, key: &'static str) -> Result<String, ParseIssueKind> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
        .ok_or(ParseIssueKind::MissingField(key))
}

fn optional(fields: Option<&Map<String, Value>>, key: &str) -> String {
    fields
        .and_then(|fields| fields.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_input_is_empty_not_an_issue() {
        let feed = ArticleParser::default().parse("  \n ");
        assert!(feed.articles.is_empty());
        assert!(feed.issues.is_empty());
    }

    #[test]
    fn required_fields_must_be_non_empty_strings() {
        let entry = serde_json::json!({
            "webPublicationDate": "2024-01-01T00:00:00Z",
            "webTitle": 42,
            "webUrl": "http://x/1"
        });
        assert_eq!(
            extract_entry(&entry),
            Err(ParseIssueKind::MissingField(TITLE))
        );

        let entry = serde_json::json!({
            "webPublicationDate": "2024-01-01T00:00:00Z",
            "webTitle": "T1",
            "webUrl": "  "
        });
        assert_eq!(extract_entry(&entry), Err(ParseIssueKind::MissingField(URL)));
    }

    #[test]
    fn non_string_optional_fields_default_to_empty() {
        let entry = serde_json::json!({
            "webPublicationDate": "d",
            "webTitle": "t",
            "webUrl": "u",
            "fields": { "byline": null, "trailText": ["x"], "thumbnail": "http://img/1.jpg" }
        });
        let article = extract_entry(&entry).unwrap();
        assert_eq!(article.byline, "");
        assert_eq!(article.trail_text, "");
        assert_eq!(article.thumbnail_url, "http://img/1.jpg");
    }

    #[test]
    fn structure_errors_name_the_missing_level() {
        assert!(matches!(take_results("[]"), Err(ParseIssueKind::Structure(_))));
        assert_eq!(
            take_results(r#"{"response":{}}"#),
            Err(ParseIssueKind::Structure("missing `results` array".into()))
        );
        assert_eq!(
            take_results(r#"{"response":{"results":{}}}"#),
            Err(ParseIssueKind::Structure("`results` is not an array".into()))
        );
        assert!(matches!(take_results("{"), Err(ParseIssueKind::InvalidJson(_))));
    }
}
