//! Server-rendered single page: the upload form, plus either a result or an error banner.

use crate::errors::AppError;
use crate::screening::models::ScreeningOutcome;

const TITLE: &str = "Resume Screening App";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; color: #262730; }
form { margin: 1.5rem 0; padding: 1rem; border: 1px dashed #aaa; border-radius: 8px; }
.success { background: #e6f4ea; color: #1e7e34; padding: 0.75rem 1rem; border-radius: 6px; }
.error { background: #fdecea; color: #b71c1c; padding: 0.75rem 1rem; border-radius: 6px; }
details { margin-top: 1rem; }
pre { white-space: pre-wrap; word-break: break-word; }
"#;

pub enum PageView<'a> {
    Empty,
    Result(&'a ScreeningOutcome),
    Error(&'a AppError),
}

pub fn render(view: PageView<'_>) -> String {
    let body = match view {
        PageView::Empty => String::new(),
        PageView::Result(outcome) => render_outcome(outcome),
        PageView::Error(err) => format!(
            r#"<div class="error" role="alert">{}</div>"#,
            escape_html(&err.user_message())
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{TITLE}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{TITLE}</h1>
<form method="post" action="/" enctype="multipart/form-data">
<label for="resume">Upload Resume</label>
<input type="file" id="resume" name="resume" accept=".txt,.pdf" required>
<button type="submit">Screen</button>
</form>
{body}
</body>
</html>
"#
    )
}

fn render_outcome(outcome: &ScreeningOutcome) -> String {
    let mut html = format!(
        r#"<h3>Predicted Category</h3>
<div class="success">{}</div>
"#,
        escape_html(&outcome.prediction.category)
    );

    if let Some(confidence) = outcome.prediction.confidence {
        html.push_str(&format!("<p>Confidence: {confidence}</p>\n"));
    }

    html.push_str(&format!(
        r#"<details>
<summary>See cleaned resume text (preview)</summary>
<pre>{}</pre>
</details>
"#,
        escape_html(&outcome.cleaned_preview)
    ));
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
