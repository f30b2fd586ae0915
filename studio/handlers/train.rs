use std::io::Read;

use log::{info, warn};

use segment_nn::{Result, SegmentError, TrainOptions};

use crate::routes::{json_response, redirect, server_error, HttpResponse};
use crate::state::{lock, FlashMessage, SharedState, StudioState};
use crate::util::form::{form_get, parse_form};

/// Form fields forwarded to `TrainOptions::set` when non-empty.
const OPTION_FIELDS: [&str; 4] = ["passes", "learning_rate", "optimizer", "backend"];

// ---------------------------------------------------------------------------
// POST /train
// ---------------------------------------------------------------------------

/// Retrains from the submitted form and redirects back to `/`.
///
/// Training runs without holding the state lock; the new model replaces the
/// old one only if it succeeds.
pub fn handle_post(request: &mut tiny_http::Request, state: SharedState) -> HttpResponse {
    let mut body = String::new();
    if let Err(e) = request.as_reader().read_to_string(&mut body) {
        return server_error(&format!("cannot read request body: {e}"));
    }
    let pairs = parse_form(&body);

    let base = lock(&state).options.clone();
    let outcome = parse_request(&pairs, base)
        .and_then(|(hidden, options)| StudioState::trained(hidden, options));

    let mut st = lock(&state);
    match outcome {
        Ok(mut fresh) => {
            info!(
                "retrained {:?}: loss={:.5} accuracy={:.2}",
                fresh.hidden, fresh.report.final_loss, fresh.report.final_accuracy
            );
            fresh.flash = Some(FlashMessage::success(format!(
                "Retrained for {} passes.",
                fresh.report.passes_run
            )));
            *st = fresh;
        }
        Err(e) => {
            warn!("retrain rejected: {e}");
            st.flash = Some(FlashMessage::error(e.to_string()));
        }
    }
    redirect("/")
}

fn parse_request(pairs: &[(String, String)], mut options: TrainOptions) -> Result<(Vec<i64>, TrainOptions)> {
    let hidden = parse_hidden(form_get(pairs, "hidden").unwrap_or(""))?;
    for key in OPTION_FIELDS {
        if let Some(value) = form_get(pairs, key).filter(|v| !v.trim().is_empty()) {
            options.set(key, value)?;
        }
    }
    if let Some(seed) = form_get(pairs, "seed") {
        options.set("seed", seed)?;
    }
    Ok((hidden, options))
}

/// `"16, 8"` → `[16, 8]`; blank means no hidden layers.
fn parse_hidden(text: &str) -> Result<Vec<i64>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| SegmentError::InvalidArchitecture(format!("'{s}' is not a layer width")))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// GET /options
// ---------------------------------------------------------------------------

pub fn handle_options(state: SharedState) -> HttpResponse {
    let options = lock(&state).options.clone();
    match serde_json::to_string_pretty(&options) {
        Ok(json) => json_response(json),
        Err(e) => server_error(&e.to_string()),
    }
}
