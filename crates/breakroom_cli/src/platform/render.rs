use std::io::{self, Write};

use breakroom_feed::{Article, FeedReport};
use chrono::{DateTime, Utc};

/// Human-readable publication date; the raw value when it is not RFC 3339.
pub(crate) fn format_publication_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn write_article(out: &mut impl Write, position: usize, article: &Article) -> io::Result<()> {
    writeln!(out, "{position:>3}. {}", article.title)?;
    let byline = if article.byline.is_empty() {
        "unknown author"
    } else {
        article.byline.as_str()
    };
    writeln!(
        out,
        "     {} | {}",
        format_publication_date(&article.publication_date),
        byline
    )?;
    if !article.trail_text.is_empty() {
        writeln!(out, "     {}", article.trail_text)?;
    }
    writeln!(out, "     {}", article.url)?;
    match &article.thumbnail {
        Some(thumbnail) => writeln!(
            out,
            "     thumbnail {}x{}",
            thumbnail.width, thumbnail.height
        ),
        None => writeln!(out, "     no thumbnail"),
    }
}

pub(crate) fn write_report(out: &mut impl Write, report: &FeedReport) -> io::Result<()> {
    for (i, article) in report.articles.iter().enumerate() {
        write_article(out, i + 1, article)?;
    }
    if let Some(err) = &report.fetch_error {
        writeln!(out, "fetch failed: {err}")?;
    }
    for issue in &report.parse_issues {
        match issue.index {
            Some(index) => writeln!(out, "skipped result {index}: {}", issue.kind)?,
            None => writeln!(out, "unreadable feed: {}", issue.kind)?,
        }
    }
    writeln!(out, "{} article(s)", report.articles.len())
}
