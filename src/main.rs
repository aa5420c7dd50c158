use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod routing;
mod server;
mod users;
mod views;

use handler::ProfileHandler;
use logger::Logger;
use routing::Router;
use users::MemoryDirectory;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    // Worker count comes from config; unset means one per CPU core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let logger = Logger::from_config(&cfg.logging)?;
    let addr = cfg.get_socket_addr()?;

    let directory = MemoryDirectory::load(&cfg.directory.seed_file).await?;
    if directory.is_empty() {
        logger.warn(
            "user directory is empty",
            &[("source", &cfg.directory.seed_file.display())],
        );
    }
    logger.info(
        "user directory loaded",
        &[
            ("users", &directory.len()),
            ("source", &cfg.directory.seed_file.display()),
        ],
    );

    let mut router = Router::new();
    Arc::new(ProfileHandler::new(
        logger.clone(),
        Arc::new(directory),
        &cfg.resources.root,
    ))
    .mount(&mut router);
    for route in router.describe() {
        logger.debug("route registered", &[("route", &route)]);
    }

    let listener = server::create_reusable_listener(addr)?;
    logger.log_server_start(&addr, &cfg);

    let app = Arc::new(server::App::new(router, logger, &cfg));
    server::serve(listener, app).await
}
