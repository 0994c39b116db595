//! Lotes overlay renderer
//!
//! Renders the interest-points overlay of one subdivision without a browser
//! and writes the scene as GeoJSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use interest_points::{DeviceClass, PointId};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use overlay_cli::render::{self, RenderRequest};
use overlay_cli::{BackendConfig, FileSource, OverlayConfig, RestSource, SubdivisionSource};

/// Lotes overlay renderer
#[derive(Parser, Debug)]
#[command(name = "lotes-overlay")]
#[command(about = "Render a subdivision's interest points and route as GeoJSON")]
struct Args {
    /// Subdivision id
    #[arg(env = "LOTES_SUBDIVISION_ID")]
    subdivision: String,

    /// Interest point to select
    #[arg(short, long, env = "LOTES_SELECT")]
    select: Option<String>,

    /// Overlay config file
    #[arg(short, long, default_value = "config/overlay.yaml", env = "LOTES_CONFIG")]
    config: PathBuf,

    /// Directory of `{id}.json` subdivision documents
    #[arg(long, default_value = "data/loteamientos", env = "LOTES_DATA_DIR")]
    data_dir: PathBuf,

    /// Backend base URL; overrides the config file
    #[arg(long, env = "LOTES_BACKEND_URL")]
    backend_url: Option<String>,

    /// Backend API key
    #[arg(long, env = "LOTES_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Viewport width in pixels; narrow viewports render for mobile
    #[arg(long, env = "LOTES_VIEWPORT_WIDTH")]
    viewport_width: Option<u32>,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 768, env = "LOTES_VIEWPORT_HEIGHT")]
    viewport_height: u32,

    /// Output file; stdout when omitted
    #[arg(short, long, env = "LOTES_OUTPUT")]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "LOTES_LOG_JSON")]
    log_json: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run(args))
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr so the scene can be piped from stdout.
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = OverlayConfig::load(&args.config)?;

    if let Some(base_url) = &args.backend_url {
        config.backend = Some(BackendConfig {
            base_url: base_url.clone(),
            api_key: args.api_key.clone(),
            table: config
                .backend
                .as_ref()
                .map(|b| b.table.clone())
                .unwrap_or_else(|| overlay_cli::config::DEFAULT_TABLE.to_string()),
        });
    } else if let (Some(backend), Some(key)) = (config.backend.as_mut(), &args.api_key) {
        backend.api_key = Some(key.clone());
    }

    if let Some(width) = args.viewport_width {
        config.device = DeviceClass::from_viewport_width(width);
    }

    // One fetch per process, so the document is read uncached.
    let source: Box<dyn SubdivisionSource> = match &config.backend {
        Some(backend) => {
            info!(base_url = %backend.base_url, table = %backend.table, "Using REST backend");
            Box::new(RestSource::new(backend).context("Failed to create HTTP client")?)
        }
        None => {
            info!(dir = %args.data_dir.display(), "Using local subdivision documents");
            Box::new(FileSource::new(&args.data_dir))
        }
    };

    let request = RenderRequest {
        select: args.select.as_deref().map(PointId::from),
        viewport_px: args
            .viewport_width
            .map(|width| (width, args.viewport_height)),
    };

    info!(
        subdivision = %args.subdivision,
        device = ?config.device,
        "Rendering interest points overlay"
    );

    let report = render::render_subdivision(
        source.as_ref(),
        &args.subdivision,
        config.overlay_options(),
        &request,
    )
    .await?;

    info!(
        points = report.points,
        dropped = report.dropped,
        route = report.route_length_m.is_some(),
        "Overlay rendered"
    );

    match &args.output {
        Some(path) => render::write_scene(path, &report.scene).await?,
        None => println!("{}", render::scene_to_string(&report.scene)?),
    }

    Ok(())
}
