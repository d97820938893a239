use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::Router;
use http::{HeaderName, HeaderValue, StatusCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use url::Url;
use waystation_application::use_cases::RequestRouter;
use waystation_domain::{CacheRequest, CachedResponse};
use waystation_infrastructure::network::is_hop_by_hop;

const MAX_REQUEST_BODY: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RequestRouter>,
    pub app_origin: Url,
}

/// Every path is intercepted; the request router decides what happens.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .fallback(intercept)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_http_server(
    bind_addr: SocketAddr,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(bind_address = %bind_addr, app_origin = %state.app_origin, "HTTP front listening");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn intercept(State(state): State<AppState>, request: Request) -> Response {
    let request = match to_cache_request(&state.app_origin, request).await {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };

    into_http_response(state.router.dispatch(request).await)
}

/// Absolute-form request targets keep their own origin; origin-form ones
/// are resolved against the application origin.
async fn to_cache_request(app_origin: &Url, request: Request) -> Result<CacheRequest, Response> {
    let (parts, body) = request.into_parts();

    let url = if parts.uri.scheme().is_some() && parts.uri.authority().is_some() {
        Url::parse(&parts.uri.to_string())
    } else {
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        app_origin.join(path_and_query)
    }
    .map_err(|e| {
        warn!(uri = %parts.uri, error = %e, "Rejected unparsable request target");
        (StatusCode::BAD_REQUEST, "Invalid request target").into_response()
    })?;

    let body = to_bytes(body, MAX_REQUEST_BODY)
        .await
        .map_err(|_| (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response())?;

    let mut cache_request = CacheRequest::get(url)
        .with_method(parts.method.as_str())
        .with_body(body);
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            cache_request = cache_request.with_header(name.as_str(), value);
        }
    }

    Ok(cache_request)
}

fn into_http_response(cached: CachedResponse) -> Response {
    let status = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = Response::new(Body::from(cached.body.clone()));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in cached.headers.iter() {
        if is_hop_by_hop(name) || name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.append(name, value);
        }
    }

    response
}
