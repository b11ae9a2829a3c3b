//! SOAP 1.1 adapter
//!
//! `POST /soap` takes one envelope whose Body names the operation. Successful calls answer
//! `200` with `<{Operation}Response>`; every failure is a `soap:Fault` with HTTP `500`.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use streamcat_common::{CatalogResult, ErrorKind};
use tracing::{debug, error};

use crate::{api, AppState};

pub mod envelope;
pub mod operations;

pub use envelope::{parse_request, SoapRequest, XmlElement};

/// Listener name reported by `/health`
pub const MODULE: &str = "streamcat-soap";

const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Build the SOAP router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/soap", post(soap_handler))
        .merge(api::health_routes(MODULE))
        .with_state(state)
}

/// Run one envelope against the catalog, returning the response envelope
fn handle(state: &AppState, body: &str) -> CatalogResult<String> {
    let request = parse_request(body)?;
    debug!("SOAP operation {}", request.operation);
    let payload = operations::dispatch(state.catalog.as_ref(), &request.operation, &request.params)?;
    Ok(envelope::response_envelope(&request.operation, &payload))
}

/// POST /soap
pub async fn soap_handler(State(state): State<AppState>, body: String) -> Response {
    match handle(&state, &body) {
        Ok(xml) => (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], xml).into_response(),
        Err(err) => {
            if err.kind() == ErrorKind::Internal {
                error!("SOAP request failed: {}", err);
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, CONTENT_TYPE)],
                envelope::fault_envelope(&err),
            )
                .into_response()
        }
    }
}
