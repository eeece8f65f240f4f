//! Terminal consumer for the route progress engine.
//!
//! Wires an OSRM client, a logging render surface, and a stdout display sink
//! into the tracker, then runs until Ctrl-C. The map this replaces would
//! draw the overlays; here they are reported as log lines so the engine's
//! behavior stays observable from a shell.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use track_core::config::{TrackerConfig, DEFAULT_ENDPOINT};
use track_core::geo::Coordinate;
use track_core::overlay::{ArtifactId, PolylineStyle, RenderSurface};
use track_core::routing::{GeometryFormat, OsrmRouteClient};
use track_core::summary::{DisplaySink, ProgressSummary};
use track_core::tracker::{Tracker, TrackingParams};

#[derive(Parser)]
#[command(
    name = "track_cli",
    about = "Live route progress tracker between two fixed points"
)]
struct Cli {
    /// Route origin as "lat,lng"
    #[arg(long)]
    start: Coordinate,
    /// Route destination as "lat,lng"
    #[arg(long)]
    end: Coordinate,
    /// Current vehicle position as "lat,lng"
    #[arg(long)]
    vehicle: Coordinate,
    /// Measure the vehicle leg back to the origin instead of the destination
    #[arg(long)]
    returning: bool,
    /// Base URL of the routing service
    #[arg(long, env = "OSRM_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Refresh interval in seconds
    #[arg(long, default_value_t = 60)]
    interval_secs: u64,
    /// Request per-step encoded polylines instead of GeoJSON geometry
    #[arg(long)]
    polyline_geometry: bool,
}

/// Render surface that reports overlay activity as log lines.
#[derive(Default)]
struct LogSurface {
    next_id: u64,
}

impl RenderSurface for LogSurface {
    fn add_polyline(&mut self, path: &[Coordinate], style: &PolylineStyle) -> ArtifactId {
        self.next_id += 1;
        let id = ArtifactId(self.next_id);
        tracing::info!(
            artifact = id.0,
            points = path.len(),
            color = %style.color,
            dashed = style.dashed,
            "overlay drawn"
        );
        id
    }

    fn remove_polyline(&mut self, id: ArtifactId) {
        tracing::info!(artifact = id.0, "overlay retracted");
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        tracing::info!(%center, zoom, "viewport recentered on vehicle");
    }
}

/// Display sink that prints the summary panel to stdout.
struct StdoutSink {
    is_routing: bool,
}

impl DisplaySink for StdoutSink {
    fn publish(&mut self, summary: &ProgressSummary) {
        let leg_label = if self.is_routing {
            "vehicle -> destination"
        } else {
            "vehicle -> origin"
        };
        println!("route origin -> destination: {} km", summary.total_distance_km);
        println!("{leg_label}: {} km", summary.vehicle_to_target_km);
        println!("route progress: {}%", summary.progress_percent);
        println!("estimated time ({leg_label}): {}", summary.estimated_time);
        println!("total estimated time: {}", summary.total_estimated_time);
        if summary.route_undetermined {
            println!("warning: route could not be determined, check the points");
        }
        println!();
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "track_cli=info,track_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = TrackerConfig {
        endpoint: cli.endpoint,
        refresh_interval: Duration::from_secs(cli.interval_secs.max(1)),
        geometry_format: if cli.polyline_geometry {
            GeometryFormat::Polyline
        } else {
            GeometryFormat::GeoJson
        },
        ..TrackerConfig::default()
    };
    let params = TrackingParams {
        start: cli.start,
        end: cli.end,
        vehicle: cli.vehicle,
        is_routing: !cli.returning,
    };

    tracing::info!(
        endpoint = %config.endpoint,
        interval_secs = config.refresh_interval.as_secs(),
        "starting tracker"
    );

    let client = OsrmRouteClient::new(&config.endpoint, config.geometry_format);
    let sink = StdoutSink {
        is_routing: params.is_routing,
    };
    let handle = Tracker::new(client, LogSurface::default(), sink, config)
        .with_event_hook(|event| tracing::debug!(?event, "tracker event"))
        .spawn(params);

    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl-C handler");
    tracing::info!("shutting down");
    handle.stop().await;
}
