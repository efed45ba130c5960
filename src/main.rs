use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpServer, Responder};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;

use car_management_be::config::Config;
use car_management_be::controller::{self, AppState};
use car_management_be::store::PgCarStore;

#[get("/")]
async fn index() -> impl Responder {
    web::Redirect::to(controller::INDEX_PATH).see_other()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            log::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            log::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let store = PgCarStore::new(pool);
    if let Err(err) = store.migrate().await {
        log::error!("Failed to migrate the database: {}", err);
        std::process::exit(1);
    }

    let state = web::Data::new(AppState {
        store: Arc::new(store),
    });

    log::info!("Server starting on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_header()
                    .allow_any_method()
                    .supports_credentials(),
            )
            .wrap(Logger::default())
            .service(index)
            .configure(controller::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
