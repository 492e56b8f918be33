use lineage_comments::{CommentService, FsStore, ServerConfig, router};
use std::error::Error;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    let service = CommentService::new(Arc::new(FsStore::new(&config.root)))
        .with_location(&config.bucket, &config.key);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        root = %config.root.display(),
        bucket = %config.bucket,
        key = %config.key,
        "serving comments"
    );
    axum::serve(listener, router(service))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

fn main() {
    init_tracing();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let config = ServerConfig::from_env()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(serve(config))
    })();

    if let Err(err) = result {
        eprintln!("lineage-comments: {err}");
        std::process::exit(1);
    }
}
