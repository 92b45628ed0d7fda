//! Server-rendered recommender page.
//!
//! The page is a plain GET form: the dropdown submits `?movie=<title>` back to
//! `/`, and the handler decides which of the result states to render.

use std::fmt::Write;

use crate::models::Recommendation;

pub const PAGE_TITLE: &str = "Movie Recommender System";
pub const SUBTITLE: &str = "Select a movie and get recommendations";
pub const SELECT_PROMPT: &str = "Please select a movie first!";
pub const NO_RESULTS: &str = "Sorry, could not find any recommendations for this movie.";
pub const RESULTS_HEADING: &str = "Recommended Movies";

/// What the result area shows
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// No submission yet
    Idle,
    /// Submitted with the empty option selected
    MissingSelection,
    /// Unknown title, or nothing to recommend
    NoRecommendations,
    Recommendations(Vec<Recommendation>),
}

impl PageOutcome {
    /// Maps a submitted selection and its lookup result to a page state
    pub fn from_submission(selection: Option<&str>, recommendations: Vec<Recommendation>) -> Self {
        match selection {
            None => PageOutcome::Idle,
            Some(s) if s.trim().is_empty() => PageOutcome::MissingSelection,
            Some(_) if recommendations.is_empty() => PageOutcome::NoRecommendations,
            Some(_) => PageOutcome::Recommendations(recommendations),
        }
    }
}

const STYLE: &str = r#"
body {
    background-color: #0f0f0f;
    color: white;
    font-family: sans-serif;
    margin: 0;
    padding-top: 40px;
}
.title {
    text-align: center;
    font-size: 42px;
    font-weight: bold;
    margin-bottom: 5px;
}
.subtitle {
    text-align: center;
    color: #aaa;
    margin-bottom: 25px;
}
form {
    display: flex;
    flex-direction: column;
    align-items: center;
    gap: 16px;
}
select {
    width: 60%;
    padding: 10px;
    background: #1c1c1c;
    color: white;
    border-radius: 8px;
}
button {
    background: transparent;
    border: 2px solid #e50914;
    color: #e50914;
    padding: 10px 35px;
    font-size: 16px;
    border-radius: 8px;
    transition: 0.3s;
    cursor: pointer;
}
button:hover {
    background: #e50914;
    color: white;
}
.message {
    width: 60%;
    margin: 20px auto;
    padding: 12px;
    border-radius: 8px;
}
.warning { background: #3a3000; color: #ffd33d; }
.error { background: #3a0a0a; color: #ff6b6b; }
.results { width: 90%; margin: 30px auto; }
.cards {
    display: grid;
    grid-template-columns: repeat(5, 1fr);
    gap: 16px;
}
.movie-card {
    background: #1c1c1c;
    padding: 16px;
    border-radius: 12px;
    text-align: center;
    font-weight: 600;
    transition: 0.3s;
    min-height: 80px;
    display: flex;
    align-items: center;
    justify-content: center;
}
.movie-card:hover {
    background: #e50914;
    transform: scale(1.08);
}
"#;

/// Renders the full page
pub fn render(titles: &[String], selected: Option<&str>, outcome: &PageOutcome) -> String {
    let mut html = String::with_capacity(4096 + titles.len() * 48);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = write!(html, "<title>Movie Recommender</title>\n<style>{STYLE}</style>\n");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<div class=\"title\">&#127916; {}</div>", PAGE_TITLE);
    let _ = writeln!(html, "<div class=\"subtitle\">{}</div>", SUBTITLE);

    html.push_str("<form method=\"get\" action=\"/\">\n");
    html.push_str("<select name=\"movie\" aria-label=\"Choose a movie\">\n<option value=\"\"></option>\n");
    for title in titles {
        let escaped = escape_html(title);
        let marker = if selected == Some(title.as_str()) { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{escaped}\"{marker}>{escaped}</option>");
    }
    html.push_str("</select>\n<button type=\"submit\">Recommend</button>\n</form>\n");

    match outcome {
        PageOutcome::Idle => {}
        PageOutcome::MissingSelection => {
            let _ = writeln!(html, "<div class=\"message warning\">{}</div>", SELECT_PROMPT);
        }
        PageOutcome::NoRecommendations => {
            let _ = writeln!(html, "<div class=\"message error\">{}</div>", NO_RESULTS);
        }
        PageOutcome::Recommendations(recommendations) => {
            html.push_str("<section class=\"results\">\n");
            let _ = writeln!(html, "<h3>&#127871; {}</h3>", RESULTS_HEADING);
            html.push_str("<div class=\"cards\">\n");
            for rec in recommendations {
                let _ = writeln!(html, "<div class=\"movie-card\">{}</div>", escape_html(&rec.title));
            }
            html.push_str("</div>\n</section>\n");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Escapes text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str) -> Recommendation {
        Recommendation {
            id: None,
            title: title.to_string(),
            score: 0.5,
        }
    }

    #[test]
    fn test_outcome_from_submission() {
        assert_eq!(PageOutcome::from_submission(None, vec![]), PageOutcome::Idle);
        assert_eq!(
            PageOutcome::from_submission(Some(""), vec![]),
            PageOutcome::MissingSelection
        );
        assert_eq!(
            PageOutcome::from_submission(Some("Heat"), vec![]),
            PageOutcome::NoRecommendations
        );
        assert_eq!(
            PageOutcome::from_submission(Some("Heat"), vec![rec("Casino")]),
            PageOutcome::Recommendations(vec![rec("Casino")])
        );
    }

    #[test]
    fn test_render_lists_titles_and_marks_selection() {
        let titles = vec!["Heat".to_string(), "Casino".to_string()];
        let html = render(&titles, Some("Casino"), &PageOutcome::Idle);
        assert!(html.contains("<option value=\"Heat\">Heat</option>"));
        assert!(html.contains("<option value=\"Casino\" selected>Casino</option>"));
        assert!(!html.contains(RESULTS_HEADING));
    }

    #[test]
    fn test_render_messages() {
        let html = render(&[], Some(""), &PageOutcome::MissingSelection);
        assert!(html.contains(SELECT_PROMPT));

        let html = render(&[], Some("Nope"), &PageOutcome::NoRecommendations);
        assert!(html.contains(NO_RESULTS));
    }

    #[test]
    fn test_render_cards_are_escaped() {
        let outcome = PageOutcome::Recommendations(vec![rec("Tom & Jerry <Live>")]);
        let html = render(&[], Some("x"), &outcome);
        assert!(html.contains("<div class=\"movie-card\">Tom &amp; Jerry &lt;Live&gt;</div>"));
    }

    #[test]
    fn test_escape_html_quotes() {
        assert_eq!(escape_html(r#"Say "Hi" y'all"#), "Say &quot;Hi&quot; y&#39;all");
    }
}
