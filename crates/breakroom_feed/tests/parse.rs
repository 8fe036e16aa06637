use breakroom_feed::{
    ArticleParser, MissingFieldPolicy, ParseIssue, ParseIssueKind, ParsedArticle,
};
use pretty_assertions::assert_eq;

fn entry(n: usize) -> String {
    format!(
        r#"{{"webPublicationDate":"2024-01-0{n}T00:00:00Z","webTitle":"T{n}","webUrl":"http://x/{n}",
            "fields":{{"trailText":"trail {n}","byline":"By {n}","thumbnail":"http://img/{n}.jpg"}}}}"#
    )
}

fn feed_of(entries: &[String]) -> String {
    format!(r#"{{"response":{{"status":"ok","results":[{}]}}}}"#, entries.join(","))
}

fn titles(articles: &[ParsedArticle]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
}

#[test]
fn minimal_entry_with_empty_fields() {
    let json = r#"{"response":{"results":[{"webPublicationDate":"2024-01-01T00:00:00Z","webTitle":"T1","webUrl":"http://x/1","fields":{}}]}}"#;
    let feed = ArticleParser::default().parse(json);

    assert!(feed.issues.is_empty());
    assert_eq!(
        feed.articles,
        vec![ParsedArticle {
            publication_date: "2024-01-01T00:00:00Z".into(),
            title: "T1".into(),
            url: "http://x/1".into(),
            trail_text: String::new(),
            byline: String::new(),
            thumbnail_url: String::new(),
        }]
    );
}

#[test]
fn all_entries_are_returned_in_order() {
    let json = feed_of(&[entry(1), entry(2), entry(3)]);
    let feed = ArticleParser::default().parse(&json);

    assert_eq!(titles(&feed.articles), vec!["T1", "T2", "T3"]);
    assert_eq!(feed.articles[1].byline, "By 2");
    assert_eq!(feed.articles[1].trail_text, "trail 2");
    assert_eq!(feed.articles[2].thumbnail_url, "http://img/3.jpg");
}

#[test]
fn missing_fields_object_means_empty_optionals() {
    let json = feed_of(&[
        r#"{"webPublicationDate":"d","webTitle":"No fields","webUrl":"http://x/n"}"#.to_string(),
    ]);
    let feed = ArticleParser::default().parse(&json);

    assert_eq!(feed.articles.len(), 1);
    assert_eq!(feed.articles[0].trail_text, "");
    assert_eq!(feed.articles[0].byline, "");
    assert_eq!(feed.articles[0].thumbnail_url, "");
}

#[test]
fn skip_policy_drops_only_the_bad_entry() {
    let bad = r#"{"webPublicationDate":"d","webUrl":"http://x/bad","fields":{}}"#.to_string();
    let json = feed_of(&[entry(1), bad, entry(3)]);
    let feed = ArticleParser::new(MissingFieldPolicy::Skip).parse(&json);

    assert_eq!(titles(&feed.articles), vec!["T1", "T3"]);
    assert_eq!(
        feed.issues,
        vec![ParseIssue {
            index: Some(1),
            kind: ParseIssueKind::MissingField("webTitle"),
        }]
    );
}

#[test]
fn truncate_policy_stops_at_the_bad_entry() {
    let bad = r#"{"webTitle":"no date","webUrl":"http://x/bad"}"#.to_string();
    let json = feed_of(&[entry(1), entry(2), bad, entry(4)]);
    let feed = ArticleParser::new(MissingFieldPolicy::Truncate).parse(&json);

    assert_eq!(titles(&feed.articles), vec!["T1", "T2"]);
    assert_eq!(
        feed.issues,
        vec![ParseIssue {
            index: Some(2),
            kind: ParseIssueKind::MissingField("webPublicationDate"),
        }]
    );
}

#[test]
fn each_required_field_is_enforced() {
    for missing in ["webPublicationDate", "webTitle", "webUrl"] {
        let mut value: serde_json::Value = serde_json::from_str(&entry(1)).unwrap();
        value.as_object_mut().unwrap().remove(missing);
        let json = feed_of(&[value.to_string(), entry(2)]);

        let feed = ArticleParser::default().parse(&json);
        assert_eq!(titles(&feed.articles), vec!["T2"], "missing {missing}");
        assert_eq!(feed.issues[0].kind, ParseIssueKind::MissingField(missing));
    }
}

#[test]
fn non_object_entries_are_rejected() {
    let json = feed_of(&["42".to_string(), entry(2)]);
    let feed = ArticleParser::default().parse(&json);

    assert_eq!(titles(&feed.articles), vec!["T2"]);
    assert_eq!(feed.issues[0].kind, ParseIssueKind::EntryNotObject);
}

#[test]
fn empty_input_is_not_an_error() {
    let feed = ArticleParser::default().parse("");
    assert!(feed.articles.is_empty());
    assert!(feed.issues.is_empty());
}

#[test]
fn broken_structure_yields_empty_result_and_one_issue() {
    for json in [
        "not json at all",
        r#"{"message":"API key invalid"}"#,
        r#"{"response":{"status":"error"}}"#,
        r#"{"response":[]}"#,
    ] {
        let feed = ArticleParser::default().parse(json);
        assert!(feed.articles.is_empty(), "{json}");
        assert_eq!(feed.issues.len(), 1, "{json}");
        assert_eq!(feed.issues[0].index, None);
    }
}

#[test]
fn empty_results_array_is_fine() {
    let feed = ArticleParser::default().parse(&feed_of(&[]));
    assert!(feed.articles.is_empty());
    assert!(feed.issues.is_empty());
}
