//! HTML for the search page: one text box, one button, one output region.

use std::fmt::{self, Write};
use tracing::warn;

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
input[type=text]{width:100%;padding:.5rem;box-sizing:border-box}\
button{margin-top:.75rem;padding:.4rem 1.2rem}\
pre{white-space:pre-wrap;background:#f6f6f6;padding:.75rem}";

/// Destination the output region is rendered into before it joins the page.
pub trait OutputBuffer: Write + AsRef<str> + Send {}

impl<T: Write + AsRef<str> + Send> OutputBuffer for T {}

pub type OutputBufferFactory = fn() -> Box<dyn OutputBuffer>;

pub fn string_buffer() -> Box<dyn OutputBuffer> {
    Box::new(String::with_capacity(256))
}

/// Full page. `answer` is shown under the form when present.
pub fn render_page(title: &str, query: &str, answer: Option<&str>) -> String {
    render_page_with(title, query, answer, &mut String::new())
}

/// Like [`render_page`], rendering the output region through `buf`.
pub fn render_page_with(
    title: &str,
    query: &str,
    answer: Option<&str>,
    buf: &mut dyn OutputBuffer,
) -> String {
    let mut html = page_start(title, query);
    if let Some(answer) = answer {
        attach_output(&mut html, buf, answer);
    }
    page_end(html)
}

/// The form again, with `message` where the answer would have been.
pub fn render_error_page(title: &str, query: &str, message: &str) -> String {
    let mut html = page_start(title, query);
    let _ = writeln!(
        html,
        r#"<p class="error" role="alert">{}</p>"#,
        escape_html(message)
    );
    page_end(html)
}

fn page_start(title: &str, query: &str) -> String {
    let mut html = String::with_capacity(1024);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{title}</h1>
<form method="post" action="/search">
<label for="query">Talk to the AI Agent</label>
<input type="text" id="query" name="query" value="{query}" autofocus>
<button type="submit">Search</button>
</form>
"#,
        title = escape_html(title),
        query = escape_html(query),
    );
    html
}

fn page_end(mut html: String) -> String {
    html.push_str("</body>\n</html>\n");
    html
}

/// Render the output region into `buf` and append it to `html`.
///
/// A rendering failure is logged and nothing is appended, so the page is
/// served without output. Returns whether the output was attached.
pub fn attach_output(html: &mut String, buf: &mut dyn OutputBuffer, answer: &str) -> bool {
    match write_output(buf, answer) {
        Ok(()) => {
            let rendered: &str = (*buf).as_ref();
            html.push_str(rendered);
            true
        }
        Err(e) => {
            warn!(error = %e, "failed to render agent output");
            false
        }
    }
}

fn write_output(out: &mut dyn OutputBuffer, answer: &str) -> fmt::Result {
    out.write_str("<section id=\"output\">\n<p>AI Output: </p>\n<pre>")?;
    out.write_str(&escape_html(answer))?;
    out.write_str("</pre>\n</section>\n<hr>\n")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenBuffer;

    impl Write for BrokenBuffer {
        fn write_str(&mut self, _s: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    impl AsRef<str> for BrokenBuffer {
        fn as_ref(&self) -> &str {
            "partial"
        }
    }

    #[test]
    fn empty_page_has_form_but_no_output() {
        let html = render_page("AI Search for rate card", "", None);
        assert!(html.contains("<h1>AI Search for rate card</h1>"));
        assert!(html.contains("Talk to the AI Agent"));
        assert!(html.contains(r#"<button type="submit">Search</button>"#));
        assert!(!html.contains("AI Output"));
    }

    #[test]
    fn answer_is_escaped_under_the_form() {
        let html = render_page("t", "rates?", Some("<b>3</b> rates & more"));
        assert!(html.contains("AI Output: "));
        assert!(html.contains("<pre>&lt;b&gt;3&lt;/b&gt; rates &amp; more</pre>"));
        assert!(html.contains(r#"value="rates?""#));
    }

    #[test]
    fn failed_output_rendering_is_swallowed() {
        let mut html = String::from("<body>");
        let attached = attach_output(&mut html, &mut BrokenBuffer, "3 rates are active");
        assert!(!attached);
        assert_eq!(html, "<body>");
    }

    #[test]
    fn error_page_keeps_the_form_and_shows_no_output() {
        let html = render_error_page("t", "rates?", "The agent could not reach an answer.");
        assert!(html.contains(r#"value="rates?""#));
        assert!(html.contains("The agent could not reach an answer."));
        assert!(!html.contains("AI Output"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn query_value_cannot_break_out_of_the_attribute() {
        let html = render_page("t", r#"" onfocus="x"#, None);
        assert!(html.contains(r#"value="&quot; onfocus=&quot;x""#));
    }
}
