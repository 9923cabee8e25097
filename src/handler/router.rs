//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: access logging, route resolution
//! and dispatch to the student handlers.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{AppState, Config};
use crate::error::ApiError;
use crate::handler::students;
use crate::http::build_error_response;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{RouteAction, RouteMatch, RouteTable};
use crate::store::StudentStore;

/// Dispatches requests to the student handlers over a shared store
#[derive(Debug)]
pub struct Router {
    routes: RouteTable,
    store: Arc<StudentStore>,
    max_body_size: u64,
}

impl Router {
    pub const fn new(routes: RouteTable, store: Arc<StudentStore>, max_body_size: u64) -> Self {
        Self {
            routes,
            store,
            max_body_size,
        }
    }

    /// Build a router for the configured prefix over `store`
    pub fn from_config(config: &Config, store: Arc<StudentStore>) -> Result<Self, regex::Error> {
        let routes = RouteTable::new(&config.routes.prefix)?;
        Ok(Self::new(routes, store, config.http.max_body_size))
    }

    pub const fn store(&self) -> &Arc<StudentStore> {
        &self.store
    }

    /// Resolve the route and run its handler. Failures become error responses.
    pub async fn dispatch<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();

        let result = match self.routes.resolve(&parts.method, parts.uri.path()) {
            Some(RouteMatch {
                action: RouteAction::GetStudent,
                param: Some(id),
            }) => students::get_student(&self.store, id).await,
            Some(RouteMatch {
                action: RouteAction::CreateStudent,
                ..
            }) => students::create_student(&self.store, body, self.max_body_size).await,
            _ => Err(ApiError::RouteNotFound),
        };

        result.unwrap_or_else(|err| {
            if err.is_internal() {
                logger::log_error(&format!(
                    "{} {} failed: {err}",
                    parts.method,
                    parts.uri.path()
                ));
            }
            build_error_response(&err)
        })
    }
}

/// Main entry point for HTTP request handling
///
/// The dispatch runs in its own task so a client that disconnects mid-request
/// does not cancel a store write; the response is simply discarded.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(&req, peer_addr));

    let dispatch_state = Arc::clone(&state);
    let response =
        match tokio::spawn(async move { dispatch_state.router.dispatch(req).await }).await {
            Ok(resp) => resp,
            Err(e) => {
                let err = ApiError::Internal(e.to_string());
                logger::log_error(&format!("Request task failed: {err}"));
                build_error_response(&err)
            }
        };

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}
