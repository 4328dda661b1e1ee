use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use formats::CoordOrder;
use layers::LevelOfDetail;
use streaming::LoadQuery;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod dataset;

use dataset::BuildingIndex;

/// Pixel coordinates above this zoom no longer fit the wire format.
const MAX_QUERY_ZOOM: u8 = 22;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serves building footprints for the extruded buildings overlay")]
struct Args {
    /// GeoJSON file with Polygon features carrying a `height` property
    #[arg(long)]
    input: PathBuf,

    #[arg(long, default_value = "127.0.0.1:9200")]
    addr: SocketAddr,

    /// Positions are [lat, lon] instead of GeoJSON's [lon, lat]
    #[arg(long)]
    lat_lon: bool,

    /// Zoom at which heights are served unscaled
    #[arg(long, default_value_t = 18)]
    max_zoom: u8,

    /// Cap on served heights, in pixels
    #[arg(long, default_value_t = 350)]
    max_height: u32,
}

#[derive(Clone)]
struct AppState {
    index: Arc<BuildingIndex>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let order = if args.lat_lon {
        CoordOrder::LatLon
    } else {
        CoordOrder::LonLat
    };
    let lod = LevelOfDetail::new(args.max_zoom, args.max_height);
    let index = BuildingIndex::load(&args.input, order, lod).await?;
    info!(buildings = index.len(), "loaded {}", args.input.display());

    let state = AppState {
        index: Arc::new(index),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/buildings", get(get_buildings))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("building server listening on http://{}", args.addr);
    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_buildings(State(state): State<AppState>, Query(query): Query<LoadQuery>) -> Response {
    if query.z > MAX_QUERY_ZOOM {
        return (StatusCode::BAD_REQUEST, "zoom out of range").into_response();
    }

    let response = state.index.query(&query);
    match response.to_json_string() {
        Ok(body) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            (StatusCode::OK, headers, body).into_response()
        }
        Err(err) => {
            error!("encoding load response failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "encoding failed").into_response()
        }
    }
}
