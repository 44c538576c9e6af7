//! # Tickchart Web
//!
//! Form-driven chart pages on axum.
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `GET /` | Redirect to `/index` |
//! | `GET /index` | Ticker/year/feature form |
//! | `POST /index` | Validate, then redirect to `/graph?...` |
//! | `GET /graph` | Chart page, or the error page with status 500 |
//!
//! Form state travels in the `/graph` query string. The only state the
//! router holds is the shared, immutable [`ChartPipeline`].

pub mod html;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tickchart_core::{normalize, ChartForm, ChartPipeline, ErrorPayload, UserQuery};
use tickchart_render::render_svg;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<ChartPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<ChartPipeline>) -> Self {
        Self { pipeline }
    }
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/index", get(index_form).post(index_submit))
        .route("/graph", get(graph))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    info!(%addr, "tickchart-web listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn root() -> Redirect {
    Redirect::to("/index")
}

async fn index_form() -> Html<String> {
    Html(html::index_page(None, &ChartForm::default()))
}

async fn index_submit(Form(fields): Form<Vec<(String, String)>>) -> Response {
    let form = chart_form(fields);

    match normalize(&form.ticker, &form.year, &form.features) {
        Ok(query) => Redirect::to(&graph_location(&query)).into_response(),
        Err(error) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(html::index_page(Some(&error.to_string()), &form)),
        )
            .into_response(),
    }
}

async fn graph(
    State(state): State<AppState>,
    Query(fields): Query<Vec<(String, String)>>,
) -> Response {
    let form = chart_form(fields);

    let outcome = match state.pipeline.run(&form).await {
        Ok(outcome) => outcome,
        Err(failure) => return error_response(&failure.payload()),
    };

    let payload = outcome.payload();
    match render_svg(&outcome.chart) {
        Ok(svg) => Html(html::graph_page(&payload, &svg)).into_response(),
        Err(render_error) => {
            error!(ticker = %payload.ticker, %render_error, "chart rendering failed");
            error_response(&ErrorPayload {
                ticker: payload.ticker.clone(),
                year: outcome
                    .query
                    .start_year
                    .map(|year| format!("{year:04}"))
                    .unwrap_or_default(),
                code: String::from("render.failed"),
                message: render_error.to_string(),
            })
        }
    }
}

fn error_response(payload: &ErrorPayload) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(html::error_page(payload)),
    )
        .into_response()
}

/// Collect `ticker`, `year` and every `features` value from form pairs.
fn chart_form(fields: Vec<(String, String)>) -> ChartForm {
    let mut form = ChartForm::default();
    let mut ticker = None;
    let mut year = None;

    for (name, value) in fields {
        match name.as_str() {
            "ticker" if ticker.is_none() => ticker = Some(value),
            "year" if year.is_none() => year = Some(value),
            "features" => form.features.push(value),
            _ => {}
        }
    }

    form.ticker = ticker.unwrap_or_default();
    form.year = year.unwrap_or_default();
    form
}

fn graph_location(query: &UserQuery) -> String {
    let year = query
        .start_year
        .map(|year| format!("{year:04}"))
        .unwrap_or_default();
    let mut location = format!(
        "/graph?ticker={}&year={}",
        urlencoding::encode(query.ticker.as_str()),
        year
    );
    for feature in query.features.iter() {
        location.push_str("&features=");
        location.push_str(feature.as_str());
    }
    location
}
