use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use maud::Markup;

use crate::htmx_handlers::render_layout;
use crate::models::DashboardSection;

/// HTMX navigation swaps just the fragment; a direct load (or F5) of the
/// same URL gets the fragment wrapped in the full shell.
pub fn build_response(headers: &HeaderMap, section: DashboardSection, content: Markup) -> Response {
    if headers.contains_key("HX-Request") {
        content.into_response()
    } else {
        render_layout(section, content).into_response()
    }
}
