use newman_relay::application::context::AppContext;
use newman_relay::config::{self, ResolverKind, Settings};
use newman_relay::domain::services::name_resolver::NameResolver;
use newman_relay::infrastructure::newman::cli::NewmanCliExecutor;
use newman_relay::infrastructure::notify::webhook_notifier::WebhookNotifier;
use newman_relay::infrastructure::resolvers::local_files::LocalFileResolver;
use newman_relay::infrastructure::resolvers::postman_api::PostmanApiResolver;
use newman_relay::interface::http;
use newman_relay::interface::http::state::AppState;
use newman_relay::observability;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Step 1: Load configuration.
    let settings = config::load()?;

    // Step 2: Install tracing and the metrics recorder.
    observability::init_tracing(&settings.observability);
    let metrics = observability::install_metrics(&settings.observability)?;

    // Step 3: Build the runner, resolver and notifier.
    let executor = NewmanCliExecutor::new(
        settings.runner.newman_bin.clone(),
        settings.runner.reporters.clone(),
    );
    let resolver = build_resolver(&settings)?;
    let notifier = WebhookNotifier::new(settings.notifications.request_timeout_ms)?;

    // Step 4: Assemble shared application context and HTTP state.
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);
    let ctx = AppContext::new(settings, Arc::new(executor), resolver, Arc::new(notifier));
    let state = AppState {
        ctx: Arc::new(ctx),
        metrics,
    };

    // Step 5: Build the HTTP app.
    let app = http::app(state);

    // Step 6: Bind and serve until interrupted.
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;

    Ok(())
}

fn build_resolver(settings: &Settings) -> Result<Arc<dyn NameResolver>, Box<dyn Error>> {
    match settings.runner.resolver {
        ResolverKind::Local => Ok(Arc::new(LocalFileResolver::new(
            settings.runner.collections_dir.clone(),
            settings.runner.environments_dir.clone(),
        ))),
        ResolverKind::Postman => {
            let api_key = settings
                .postman
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or("postman resolver requires POSTMAN_API_KEY")?;
            let client = reqwest::Client::builder()
                .timeout(Duration::from_millis(
                    settings.notifications.request_timeout_ms,
                ))
                .build()?;
            Ok(Arc::new(PostmanApiResolver::new(
                client,
                settings.postman.api_base_url.clone(),
                api_key,
            )))
        }
    }
}
