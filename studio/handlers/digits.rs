use log::warn;

use segment_nn::predict::predict_all;
use segment_nn::render::render_digit;
use segment_nn::{Backend, OptimizerKind, ProbabilityDistribution, Result};

use crate::render::{html_escape, render_page};
use crate::routes::{bad_request, html_response, not_found, server_error, svg_response, HttpResponse};
use crate::state::{lock, FlashKind, FlashMessage, SharedState, StudioState};
use crate::util::form::{form_get, parse_form};

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_index(state: SharedState) -> HttpResponse {
    let mut st = lock(&state);
    let flash = st.take_flash();
    let page = index_page(&st, flash.as_ref());
    drop(st);

    match page {
        Ok(html) => html_response(html),
        Err(e) => {
            warn!("prediction failed: {e}");
            server_error(&e.to_string())
        }
    }
}

fn index_page(st: &StudioState, flash: Option<&FlashMessage>) -> Result<String> {
    let mut cards = String::new();
    for (digit, dist) in &predict_all(&st.model, &st.params)? {
        let svg = render_digit(digit.value() as i64, None)?;
        let guess = dist.argmax();
        cards.push_str(&format!(
            r#"<div class="card{misread}">{svg}<div class="guess">{digit} reads as {guess} ({p:.1}%)</div>{bars}</div>"#,
            misread = if guess == *digit { "" } else { " misread" },
            p = dist.probability(guess) * 100.0,
            bars = probability_bars(dist),
        ));
    }

    let flash_html = flash
        .map(|f| {
            let class = if f.kind == FlashKind::Success { "flash-success" } else { "flash-error" };
            format!(r#"<div class="flash {class}">{}</div>"#, html_escape(&f.text))
        })
        .unwrap_or_default();

    let arch = format!(
        "<div><b>Architecture</b>: 7 &rarr; {} &rarr; 10 softmax ({} parameters)</div>",
        if st.hidden.is_empty() {
            "(no hidden layers)".to_owned()
        } else {
            st.model
                .hidden_sizes()
                .iter()
                .map(|s| format!("{s} ReLU"))
                .collect::<Vec<_>>()
                .join(" &rarr; ")
        },
        st.model.parameter_count()
    );
    let report_html = format!(
        "<div><b>Training</b>: {} passes, final loss {:.5}, accuracy {:.0}%</div>",
        st.report.passes_run,
        st.report.final_loss,
        st.report.final_accuracy * 100.0
    );

    let options = &st.options;
    let hidden_text = st.hidden.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
    let selected = |on: bool| if on { "selected" } else { "" };

    // The flash echoes user input, so it goes in after every other token.
    Ok(render_page(|html| {
        html.replace("{{ARCH}}", &arch)
            .replace("{{REPORT}}", &report_html)
            .replace("{{DIGITS}}", &cards)
            .replace("{{HIDDEN}}", &html_escape(&hidden_text))
            .replace("{{PASSES}}", &options.passes.to_string())
            .replace("{{LR}}", &options.learning_rate.to_string())
            .replace("{{OPT_ADAM}}", selected(options.optimizer == OptimizerKind::Adam))
            .replace("{{OPT_SGD}}", selected(options.optimizer == OptimizerKind::Sgd))
            .replace("{{BACKEND_SEQ}}", selected(options.backend == Backend::Sequential))
            .replace("{{BACKEND_PAR}}", selected(options.backend == Backend::Parallel))
            .replace("{{SEED}}", &options.seed.map(|s| s.to_string()).unwrap_or_default())
            .replace("{{FLASH}}", &flash_html)
    }))
}

/// Ten bars, one per class, heights proportional to probability.
fn probability_bars(dist: &ProbabilityDistribution) -> String {
    let top = dist.argmax().index();
    let bars: String = dist
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                r#"<div class="bar{}" style="height:{:.1}%" title="{i}: {:.3}"></div>"#,
                if i == top { " top" } else { "" },
                (p * 100.0).max(1.0),
                p
            )
        })
        .collect();
    let labels: String = (0..dist.as_slice().len()).map(|i| format!("<span>{i}</span>")).collect();
    format!(r#"<div class="bars">{bars}</div><div class="labels">{labels}</div>"#)
}

// ---------------------------------------------------------------------------
// GET /svg/{digit}
// ---------------------------------------------------------------------------

/// Raw SVG for one digit; `?transform=...` is passed through to the renderer.
pub fn handle_svg(digit: &str, query: &str) -> HttpResponse {
    let digit: i64 = match digit.parse() {
        Ok(d) => d,
        Err(_) => return not_found(),
    };
    let pairs = parse_form(query);
    let transform = form_get(&pairs, "transform").filter(|t| !t.is_empty());
    match render_digit(digit, transform) {
        Ok(svg) => svg_response(svg),
        Err(e) => bad_request(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segment_nn::TrainOptions;
    use std::sync::{Arc, Mutex};

    fn studio() -> StudioState {
        StudioState::trained(vec![], TrainOptions::default().passes(1).seed(1)).unwrap()
    }

    #[test]
    fn index_lists_every_digit() {
        let html = index_page(&studio(), None).unwrap();
        assert_eq!(html.matches(r#"<div class="card"#).count(), 10);
        assert!(!html.contains("{{"));
    }

    #[test]
    fn flash_text_is_not_expanded() {
        let flash = FlashMessage::error("'{{DIGITS}}' is not a layer width");
        let html = index_page(&studio(), Some(&flash)).unwrap();
        assert_eq!(html.matches(r#"<div class="card"#).count(), 10);
        assert!(html.contains("&#123;&#123;DIGITS&#125;&#125;"));
    }

    #[test]
    fn index_responds_ok_and_consumes_flash() {
        let mut st = studio();
        st.flash = Some(FlashMessage::success("done"));
        let state = Arc::new(Mutex::new(st));
        assert_eq!(handle_index(state.clone()).status_code().0, 200);
        assert!(lock(&state).flash.is_none());
    }

    #[test]
    fn svg_route_status_codes() {
        assert_eq!(handle_svg("7", "").status_code().0, 200);
        assert_eq!(handle_svg("7", "transform=scale(0.5)").status_code().0, 200);
        assert_eq!(handle_svg("x", "").status_code().0, 404);
        assert_eq!(handle_svg("12", "").status_code().0, 400);
        assert_eq!(handle_svg("-1", "").status_code().0, 400);
    }
}
