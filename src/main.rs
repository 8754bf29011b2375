use gallery_api::app::create_app;
use gallery_api::config::{load_config, save_default_config};
use gallery_api::constants::{CONFIG_PATH, DATABASE_PATH, DATA_DIR};
use gallery_api::database::{create_pool, init_database, run_migrations};
use gallery_api::logging::{init_logging, install_panic_hook};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--init-config") {
        match save_default_config(&CONFIG_PATH) {
            Ok(_) => {
                println!("Default configuration saved to {:?}", *CONFIG_PATH);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Failed to save default configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    init_logging();
    install_panic_hook();

    let config = Arc::new(load_config(&CONFIG_PATH));

    std::fs::create_dir_all(&*DATA_DIR).expect("Failed to create data directory");

    let pool = create_pool(&DATABASE_PATH, &config.database).expect("Failed to create database pool");

    {
        let mut conn = pool.get().expect("Failed to get connection");
        init_database(&conn).expect("Failed to initialize database");
        run_migrations(&mut conn).expect("Failed to run migrations");
    }

    let app = create_app(Arc::clone(&config), pool);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting gallery API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server failed");
}
