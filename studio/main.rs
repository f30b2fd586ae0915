/// segment-nn Studio
///
/// A browser page showing every digit as a 7-segment SVG next to how the
/// trained network reads it, with a form to retrain under other options.
/// Served by a synchronous tiny_http server.
///
/// Run with:
///   cargo run --bin studio --release
/// Then open http://127.0.0.1:7878 (override with `SEGMENT_NN_ADDR`).
///
/// `SEGMENT_NN_OPTIONS` may name a JSON file of starting training options.

mod handlers;
mod render;
mod routes;
mod state;
mod util;

use std::sync::{Arc, Mutex};

use log::{error, info};
use segment_nn::TrainOptions;
use tiny_http::Server;

use state::StudioState;

const DEFAULT_ADDR: &str = "127.0.0.1:7878";
const DEFAULT_HIDDEN: [i64; 1] = [16];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let addr = std::env::var("SEGMENT_NN_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());

    let options = match std::env::var("SEGMENT_NN_OPTIONS") {
        Ok(path) => match TrainOptions::load_json(&path) {
            Ok(options) => options,
            Err(e) => {
                error!("cannot load options from {path}: {e}");
                std::process::exit(1);
            }
        },
        Err(_) => TrainOptions::default(),
    };

    let initial = match StudioState::trained(DEFAULT_HIDDEN.to_vec(), options) {
        Ok(state) => state,
        Err(e) => {
            error!("initial training failed: {e}");
            std::process::exit(1);
        }
    };
    let shared_state = Arc::new(Mutex::new(initial));

    let server = match Server::http(addr.as_str()) {
        Ok(server) => server,
        Err(e) => {
            error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    info!("segment-nn studio listening on http://{addr}");

    // One thread per request so a retrain does not stall page loads.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
