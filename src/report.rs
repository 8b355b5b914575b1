//! Plain-text output for the one-shot command line modes.

use crate::api::Article;
use crate::util::{single_line, strip_control_chars};
use crate::workflow::{AnalysisDisplay, ArticleView};
use std::fmt::Write;

/// One line per article: id, date, source, topic, title, analysed marker.
pub fn article_line(article: &Article) -> String {
    let mut line = format!(
        "{:>6}  {}  {}",
        article.id,
        article.published_at.format("%Y-%m-%d"),
        single_line(&strip_control_chars(&article.source_name))
    );
    if let Some(topic) = &article.topic {
        let _ = write!(line, " [{}]", single_line(&strip_control_chars(topic)));
    }
    let _ = write!(line, "  {}", single_line(&strip_control_chars(&article.title)));
    if article.has_analysis {
        line.push_str("  (analyzed)");
    }
    line
}

/// Multi-line rendering of an analysis display model.
pub fn analysis_report(display: &AnalysisDisplay) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Verdict:      {}", display.verdict().label());
    let _ = writeln!(
        out,
        "Bias:         {} ({})",
        display.bias_label(),
        display.bias_level().label()
    );
    let _ = writeln!(out, "Credibility:  {}", display.credibility_label());
    let _ = writeln!(out, "Verification: {}", display.source_verification);
    let _ = writeln!(
        out,
        "Analyzed:     {}",
        display.analyzed_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", strip_control_chars(&display.summary));
    if !display.key_points.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Key findings:");
        for point in &display.key_points {
            let _ = writeln!(out, "  - {}", single_line(&strip_control_chars(point)));
        }
    }
    out
}

/// Article header, body and analysis (or a note that there is none).
pub fn article_report(view: &ArticleView) -> String {
    let article = &view.article;
    let mut out = String::new();
    let _ = writeln!(out, "{}", single_line(&strip_control_chars(&article.title)));
    let _ = write!(
        out,
        "{} | {}",
        strip_control_chars(&article.source_name),
        article.published_at.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(author) = &article.author {
        let _ = write!(out, " | {}", strip_control_chars(author));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", article.url);
    for text in [&article.description, &article.content].into_iter().flatten() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", strip_control_chars(text));
    }
    let _ = writeln!(out);
    match &view.analysis {
        Some(display) => {
            let _ = writeln!(out, "-- Analysis --");
            out.push_str(&analysis_report(display));
        }
        None => {
            let _ = writeln!(out, "No analysis yet (run with --analyze-article {}).", article.id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::testing::{analysis, article, at};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_article_line() {
        let mut a = article(42);
        a.has_analysis = true;
        assert_eq!(
            article_line(&a),
            "    42  2025-04-01  Reuters [Economy]  Article 42  (analyzed)"
        );
    }

    #[test]
    fn test_article_line_collapses_multiline_title() {
        let mut a = article(1);
        a.topic = None;
        a.title = "Split\ntitle".to_string();
        assert_eq!(article_line(&a), "     1  2025-04-01  Reuters  Split title");
    }

    #[test]
    fn test_analysis_report_for_text_result() {
        let display = AnalysisDisplay::from_text_result(&analysis(-1, None, 0.42, at(1)));
        let report = analysis_report(&display);
        assert!(report.contains("Bias:         42/100 (Moderate)"));
        assert!(report.contains("Credibility:  N/A"));
        assert!(report.contains("Verification: N/A"));
        assert!(report.contains("  - a\n  - b\n"));
    }
}
