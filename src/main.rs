use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use todolist::auth::TokenService;
use todolist::store::PgStore;
use todolist::{routes, AppError, AppState, Config};

fn startup_error(err: AppError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let tokens = TokenService::new(&config.jwt_secret, config.jwt_ttl);

    let state = match &config.database_url {
        Some(url) => {
            let store = Arc::new(PgStore::connect(url).await.map_err(startup_error)?);
            log::info!("connected to postgres store");
            AppState::new(store.clone(), store, tokens, config.bcrypt_cost)
        }
        None => {
            log::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            AppState::in_memory(tokens, config.bcrypt_cost)
        }
    }
    .with_compat(config.compat);

    if config.compat.unscoped_update {
        log::warn!("TODOLIST_UNSCOPED_UPDATE is on: any user can update any task by id");
    }

    let state = web::Data::new(state);
    let cors_origin = config.cors_origin.clone();

    log::info!("Starting todolist server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&cors_origin)
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
