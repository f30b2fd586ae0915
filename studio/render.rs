/// Page renderer for the studio.
///
/// The studio has a single HTML template (`studio/assets/studio.html`) with
/// `{{TOKEN}}` placeholders, loaded at compile time. `render_page` hands the
/// template to a closure that fills the tokens, then blanks whatever is left.

const TEMPLATE: &str = include_str!("assets/studio.html");

pub fn render_page<F>(fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    blank_remaining(fill(TEMPLATE.to_owned()))
}

/// Replaces any `{{TOKEN}}` the closure left behind with an empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        match html[start..].find("}}") {
            Some(end) => html.replace_range(start..start + end + 2, ""),
            None => break,
        }
    }
    html
}

/// Escapes text for use inside HTML element content or attributes.
///
/// Braces are escaped too, so user text can never form a `{{TOKEN}}`.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leftover_tokens_are_blanked() {
        assert_eq!(blank_remaining("a{{X}}b{{Y}}c".to_owned()), "abc");
        assert_eq!(blank_remaining("a{{open".to_owned()), "a{{open");
    }

    #[test]
    fn escaped_text_cannot_form_tokens() {
        let escaped = html_escape("'{{DIGITS}}' <b>");
        assert!(!escaped.contains("{{"));
        assert_eq!(escaped, "'&#123;&#123;DIGITS&#125;&#125;' &lt;b&gt;");
    }

    #[test]
    fn template_has_no_leaks_after_render() {
        let html = render_page(|html| html.replace("{{DIGITS}}", "<p>ok</p>"));
        assert!(html.contains("<p>ok</p>"));
        assert!(!html.contains("{{"));
    }
}
