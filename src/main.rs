//! Request router demo server.
//!
//! Serves a small site through the request router:
//!
//! ```text
//! GET    /                 site.index
//! GET    /posts/{id}       site.show
//! POST   /posts            site.store     (middleware: request-log)
//! PUT    /posts/{id}       site.update    (form field _method=PUT)
//! DELETE /posts/{id}       site.destroy   (form field _method=DELETE)
//! GET    /admin/stats      admin.stats    (group: admin., /admin, request-log)
//! GET    /admin/broken     admin.broken   (always fails, exercises the 500 fallback)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use request_router::config::{load_config, validated, RouterConfig};
use request_router::http::HttpServer;
use request_router::observability::{logging, metrics};
use request_router::{
    Controller, GroupOptions, HandlerError, HandlerResult, Middleware, Router, RouterError,
};

#[derive(Parser)]
#[command(name = "request-router")]
#[command(about = "HTTP request router demo server", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

struct SiteController;

impl Controller for SiteController {
    fn call(&self, method: &str, params: &[String]) -> HandlerResult {
        match method {
            "index" | "store" => {
                tracing::info!(action = method, "Site action");
                Ok(())
            }
            "show" | "update" | "destroy" => {
                let id = params.first().map(String::as_str).unwrap_or_default();
                if id.parse::<u64>().is_err() {
                    return Err(HandlerError::not_found(format!("no post with id {id:?}")));
                }
                tracing::info!(action = method, id, "Site action");
                Ok(())
            }
            "stats" => Ok(()),
            "broken" => Err(HandlerError::fault("stats backend unavailable")),
            other => Err(HandlerError::not_found(format!("unknown action {other}"))),
        }
    }
}

struct NotFoundPage;

impl Controller for NotFoundPage {
    fn call(&self, _method: &str, _params: &[String]) -> HandlerResult {
        tracing::info!("Rendering not found page");
        Ok(())
    }
}

struct ErrorReporter;

impl Controller for ErrorReporter {
    fn call(&self, _method: &str, params: &[String]) -> HandlerResult {
        let fault = params.first().map(String::as_str).unwrap_or("unknown fault");
        tracing::error!(fault, "Rendering error page");
        Ok(())
    }
}

#[derive(Default)]
struct RequestLog {
    params: Vec<String>,
}

impl Middleware for RequestLog {
    fn set_params(&mut self, params: Vec<String>) {
        self.params = params;
    }

    fn handle(&mut self) -> HandlerResult {
        tracing::debug!(params = ?self.params, "Middleware request-log");
        Ok(())
    }
}

fn build_routes() -> Result<Router, RouterError> {
    let site: Arc<dyn Controller> = Arc::new(SiteController);
    let mut router = Router::new();
    router.register_middleware_default::<RequestLog>("request-log");

    router.get("/", (site.clone(), "index")).name("site.index")?;
    router.get("/posts/{id}", (site.clone(), "show")).name("site.show")?;
    router
        .middleware(["request-log"])?
        .post("/posts", (site.clone(), "store"))
        .name("site.store")?;
    router.put("/posts/{id}", (site.clone(), "update")).name("site.update")?;
    router
        .delete("/posts/{id}", (site.clone(), "destroy"))
        .name("site.destroy")?;

    router.group(
        GroupOptions::new()
            .name("admin.")
            .prefix("/admin")
            .middleware(["request-log"]),
        |r| {
            r.get("/stats", (site.clone(), "stats")).name("stats")?;
            r.get("/broken", (site.clone(), "broken")).name("broken")
        },
    )?;

    router.fallback_not_found(Arc::new(NotFoundPage), "render");
    router.fallback_internal_server_error(Arc::new(ErrorReporter), "render");
    Ok(router)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    let config = validated(config)?;

    logging::init_logging(&config.observability)?;
    tracing::info!("request-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.listener.request_timeout_secs,
        override_field = %config.dispatch.method_override_field,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to install metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = build_routes()?;
    tracing::info!(
        routes = router.routes().len(),
        named = router.named_routes().len(),
        "Routes registered"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(router, config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
