use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use maud::Markup;
use quill::{
    errors::UrlError,
    routes::{BLOGS_INDEX, BLOGS_SHOW, RouteResolver, RoutePattern, RouteTable},
    shell::PageShell,
    store::BlogStore,
    views::{blog_index_page, blog_show_page, not_found_page},
};
use tokio::{net::TcpSocket, signal};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{Level, debug, error};

use crate::server_utils::{CustomOnResponse, find_open_port, log_server_start, record_uri};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
    pub routes: Arc<RouteTable>,
    pub shell: Arc<dyn PageShell>,
}

fn html(status: StatusCode, markup: Markup) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        markup.into_string(),
    )
        .into_response()
}

fn internal_error(err: UrlError) -> Response {
    error!(name: "server", "failed to render page: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

fn not_found(state: &AppState, id: Option<&str>) -> Response {
    match not_found_page(id, state.routes.as_ref(), state.shell.as_ref()) {
        Ok(page) => html(StatusCode::NOT_FOUND, page),
        Err(err) => internal_error(err),
    }
}

async fn home(State(state): State<AppState>) -> Response {
    match state.routes.resolve_static(BLOGS_INDEX) {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn index(State(state): State<AppState>) -> Response {
    let summaries = state.store.summaries();

    match blog_index_page(&summaries, state.routes.as_ref(), state.shell.as_ref()) {
        Ok(page) => html(StatusCode::OK, page),
        Err(err) => internal_error(err),
    }
}

async fn show(State(state): State<AppState>, Path(blog): Path<String>) -> Response {
    match state.store.find(&blog) {
        Ok(post) => html(StatusCode::OK, blog_show_page(post, state.shell.as_ref())),
        Err(err) => {
            debug!("{}", err);
            not_found(&state, Some(&blog))
        }
    }
}

async fn fallback(State(state): State<AppState>) -> Response {
    not_found(&state, None)
}

/// `[param]` placeholders become axum's `{param}` captures.
fn axum_path(pattern: &RoutePattern) -> String {
    pattern.replace_params(|key| format!("{{{}}}", key))
}

/// Mounts `name` both with and without a trailing slash, since generated URLs end with one.
fn mount(
    router: Router<AppState>,
    routes: &RouteTable,
    name: &str,
    handler: axum::routing::MethodRouter<AppState>,
) -> Result<Router<AppState>, UrlError> {
    let path = axum_path(routes.get(name)?);
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        return Ok(router.route("/", handler));
    }

    Ok(router
        .route(trimmed, handler.clone())
        .route(&format!("{}/", trimmed), handler))
}

pub fn router(state: AppState) -> Result<Router, UrlError> {
    let mut router = Router::new();

    // Redirect the site root to the listing, unless the listing is the root
    if !axum_path(state.routes.get(BLOGS_INDEX)?)
        .trim_end_matches('/')
        .is_empty()
    {
        router = router.route("/", get(home));
    }

    let router = mount(router, &state.routes, BLOGS_INDEX, get(index))?;
    let router = mount(router, &state.routes, BLOGS_SHOW, get(show))?;

    Ok(router
        .fallback(fallback)
        .layer(middleware::from_fn(record_uri))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(CustomOnResponse),
        )
        .with_state(state))
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", err);
    }
}

pub async fn start_server(
    state: AppState,
    host: bool,
    starting_port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = quanta::Instant::now();
    let posts = state.store.len();

    // 0.0.0.0 with --host, localhost otherwise
    let addr = if host {
        IpAddr::from([0, 0, 0, 0])
    } else {
        IpAddr::from([127, 0, 0, 1])
    };

    let port = find_open_port(&addr, starting_port).await?;
    let socket = TcpSocket::new_v4()?;
    let _ = socket.set_reuseaddr(true);
    socket.bind(SocketAddr::new(addr, port))?;

    let listener = socket.listen(1024)?;
    let local_addr = listener.local_addr()?;
    debug!("listening on {}", local_addr);

    let router = router(state)?;

    log_server_start(start_time, host, local_addr, posts);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
