pub mod health;
pub mod tasks;
pub mod user;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route. Expects `web::Data<AppState>` on the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::health)
        .service(
            web::scope("/user")
                .service(user::register)
                .service(user::login),
        )
        .service(
            web::scope("/task")
                .wrap(AuthMiddleware)
                .service(tasks::add_task)
                .service(tasks::get_tasks)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Malformed JSON bodies are answered in the same `{"error": ...}` shape as
/// every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
