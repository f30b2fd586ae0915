use log::debug;

use segment_nn::predict;

use crate::routes::{bad_request, json_response, server_error, HttpResponse};
use crate::state::{lock, SharedState};
use crate::util::form::{form_get, parse_form};

/// `GET /predict?digit=N`
///
/// Responds with `{"digit": N, "guess": G, "probabilities": [...]}`.
pub fn handle_get(query: &str, state: SharedState) -> HttpResponse {
    let pairs = parse_form(query);
    let digit: i64 = match form_get(&pairs, "digit").map(|s| s.trim().parse::<i64>()) {
        Some(Ok(d)) => d,
        Some(Err(_)) | None => return bad_request("expected ?digit=<0-9>"),
    };

    let st = lock(&state);
    let result = predict(&st.model, &st.params, digit);
    drop(st);

    let dist = match result {
        Ok(dist) => dist,
        Err(e) => return bad_request(&e.to_string()),
    };
    debug!("predicted digit {digit}: {:?}", dist.as_slice());

    let body = serde_json::json!({
        "digit": digit,
        "guess": dist.argmax(),
        "probabilities": dist.as_slice(),
    });
    match serde_json::to_string(&body) {
        Ok(json) => json_response(json),
        Err(e) => server_error(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StudioState;
    use segment_nn::TrainOptions;
    use std::sync::{Arc, Mutex};

    fn state() -> SharedState {
        let st = StudioState::trained(vec![], TrainOptions::default().passes(1).seed(1)).unwrap();
        Arc::new(Mutex::new(st))
    }

    #[test]
    fn valid_digit_is_answered() {
        assert_eq!(handle_get("digit=3", state()).status_code().0, 200);
    }

    #[test]
    fn bad_digits_are_rejected() {
        let state = state();
        for query in ["digit=10", "digit=-1", "digit=three", "", "other=1"] {
            assert_eq!(handle_get(query, state.clone()).status_code().0, 400, "query {query:?}");
        }
    }
}
