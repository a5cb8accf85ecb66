use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::mpsc};
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};

use crate::{
    catalogue::{Catalogue, Reserve},
    config::AppConfig,
    dashboard::{Dashboard, RunRequest},
    engine::SimulationSample,
    error::{CatalogueError, ConfigError, SimulationError},
    profile::DensityIndicator,
    report::SimulationReport,
};

struct AppState {
    config: AppConfig,
    catalogue: Catalogue,
}

#[derive(Debug, Serialize)]
pub struct ReserveSummary {
    pub id: u32,
    pub name: String,
    pub region: String,
    pub total_area: f64,
    pub tiger_density: DensityIndicator,
}

impl From<&Reserve> for ReserveSummary {
    fn from(reserve: &Reserve) -> Self {
        Self {
            id: reserve.id,
            name: reserve.name.clone(),
            region: reserve.region.clone(),
            total_area: reserve.total_area,
            tiger_density: reserve.tiger_density,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RunParams {
    pub seed: Option<u64>,
    pub horizon: Option<usize>,
    pub noise: Option<bool>,
}

impl RunParams {
    fn into_request(self, config: &AppConfig) -> Result<RunRequest, ApiError> {
        let horizon = self.horizon.unwrap_or(config.horizon);
        config.check_horizon(horizon)?;
        Ok(RunRequest {
            seed: self.seed.or(config.seed),
            horizon,
            noise: self.noise.unwrap_or(config.noise),
        })
    }
}

#[derive(Debug)]
pub enum ApiError {
    Catalogue(CatalogueError),
    Simulation(SimulationError),
    Config(ConfigError),
}

impl From<CatalogueError> for ApiError {
    fn from(value: CatalogueError) -> Self {
        ApiError::Catalogue(value)
    }
}

impl From<SimulationError> for ApiError {
    fn from(value: SimulationError) -> Self {
        ApiError::Simulation(value)
    }
}

impl From<ConfigError> for ApiError {
    fn from(value: ConfigError) -> Self {
        ApiError::Config(value)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Catalogue(err @ CatalogueError::UnknownReserve(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Catalogue(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Simulation(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::Config(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub struct WebServerConfig {
    pub config: AppConfig,
    pub catalogue: Catalogue,
}

pub fn router(config: AppConfig, catalogue: Catalogue) -> Router {
    let state = Arc::new(AppState { config, catalogue });
    Router::new()
        .route("/api/reserves", get(list_reserves))
        .route("/api/reserves/:name", get(reserve_dashboard))
        .route("/api/reserves/:name/simulation", get(simulate))
        .route("/api/reserves/:name/stream", get(stream_samples))
        .with_state(state)
}

pub async fn run(server: WebServerConfig) -> Result<()> {
    let WebServerConfig { config, catalogue } = server;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let router = router(config, catalogue);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("dashboard API live at http://{addr} (Ctrl+C to stop)");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {err}");
    }
    info!("shutting down dashboard API");
}

async fn list_reserves(State(state): State<Arc<AppState>>) -> Json<Vec<ReserveSummary>> {
    Json(
        state
            .catalogue
            .reserves()
            .iter()
            .map(ReserveSummary::from)
            .collect(),
    )
}

async fn reserve_dashboard(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Dashboard>, ApiError> {
    let reserve = state.catalogue.find(&name)?;
    Ok(Json(Dashboard::for_reserve(reserve)))
}

async fn simulate(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<RunParams>,
) -> Result<Json<SimulationReport>, ApiError> {
    let reserve = state.catalogue.find(&name)?;
    let request = params.into_request(&state.config)?;
    let report = request.execute(reserve, &state.config.coefficients)?;
    Ok(Json(report))
}

async fn stream_samples(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<RunParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let reserve = state.catalogue.find(&name)?.clone();
    let request = params.into_request(&state.config)?;
    // Validate up front so a bad profile is a 422, not an empty stream.
    reserve.profile().validate()?;

    let (tx, rx) = mpsc::channel::<String>(64);
    let coefficients = state.config.coefficients;
    tokio::task::spawn_blocking(move || {
        let result = request.execute_with_hook(&reserve, &coefficients, |sample| {
            forward_sample(&tx, &sample);
        });
        if let Err(err) = result {
            warn!("stream for '{}' failed: {err}", reserve.name);
        }
    });

    let stream = ReceiverStream::new(rx).map(|payload| Ok(Event::default().data(payload)));
    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    ))
}

/// Sends one sample to the SSE channel. Returns `false` once the client is
/// gone, skipping serialization for the rest of the run.
fn forward_sample(tx: &mpsc::Sender<String>, sample: &SimulationSample) -> bool {
    if tx.is_closed() {
        return false;
    }
    match serde_json::to_string(sample) {
        Ok(payload) => tx.blocking_send(payload).is_ok(),
        Err(err) => {
            warn!("failed to encode sample {}: {err}", sample.time);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SimulationSample {
        SimulationSample {
            time: 3,
            prey: 120,
            predator: 4,
            vegetation_index: 0.2,
        }
    }

    #[test]
    fn forward_sample_delivers_json() {
        let (tx, mut rx) = mpsc::channel(4);
        assert!(forward_sample(&tx, &sample()));
        let payload = rx.try_recv().unwrap();
        let decoded: SimulationSample = serde_json::from_str(&payload).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn forward_sample_stops_after_disconnect() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        assert!(tx.is_closed());
        for _ in 0..10 {
            assert!(!forward_sample(&tx, &sample()));
        }
    }

    #[test]
    fn params_fall_back_to_config() {
        let config = AppConfig {
            seed: Some(5),
            ..AppConfig::default()
        };
        let request = RunParams::default().into_request(&config).unwrap();
        assert_eq!(
            request,
            RunRequest {
                seed: Some(5),
                horizon: 100,
                noise: true,
            }
        );
    }

    #[test]
    fn params_reject_long_horizon() {
        let params = RunParams {
            horizon: Some(10_000),
            ..RunParams::default()
        };
        let err = params.into_request(&AppConfig::default()).unwrap_err();
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn unknown_reserve_maps_to_not_found() {
        let err = ApiError::from(CatalogueError::UnknownReserve("Atlantis".into()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
