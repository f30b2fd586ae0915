use std::io::Cursor;

use log::debug;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::handlers;
use crate::state::SharedState;

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .unwrap_or_else(|_| unreachable!("static header {name} is valid ASCII"))
}

fn body_response(status: u16, content_type: &str, body: String) -> HttpResponse {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        vec![header("Content-Type", content_type)],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> HttpResponse {
    body_response(200, "text/html; charset=utf-8", body)
}

pub fn svg_response(body: String) -> HttpResponse {
    body_response(200, "image/svg+xml", body)
}

pub fn json_response(body: String) -> HttpResponse {
    body_response(200, "application/json", body)
}

pub fn bad_request(message: &str) -> HttpResponse {
    body_response(400, "text/plain; charset=utf-8", message.to_owned())
}

pub fn server_error(message: &str) -> HttpResponse {
    body_response(500, "text/plain; charset=utf-8", message.to_owned())
}

pub fn not_found() -> HttpResponse {
    body_response(404, "text/plain", "404 Not Found".to_owned())
}

pub fn redirect(location: &str) -> HttpResponse {
    Response::new(
        StatusCode(303),
        vec![header("Location", location), header("Content-Length", "0")],
        Cursor::new(Vec::new()),
        Some(0),
        None,
    )
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Routes a request to its handler and sends the response.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url = request.url().to_owned();

    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path.to_owned(), query.to_owned()),
        None => (url.clone(), String::new()),
    };
    debug!("{method} {path}");

    let response = match (method, path.as_str()) {
        (Method::Get, "/") => handlers::digits::handle_index(state),
        (Method::Get, "/predict") => handlers::predict::handle_get(&query, state),
        (Method::Get, "/options") => handlers::train::handle_options(state),
        (Method::Post, "/train") => handlers::train::handle_post(&mut request, state),
        (Method::Get, p) if p.starts_with("/svg/") => {
            handlers::digits::handle_svg(&p["/svg/".len()..], &query)
        }
        _ => not_found(),
    };

    let _ = request.respond(response);
}
