#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::lists::ListRegistry;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::memory::InMemoryResources;
#[cfg(feature = "server")]
use crate::routes::api::{api_v1_item, api_v1_list};
#[cfg(feature = "server")]
use crate::routes::controls::{
    clear_filters, remove_filter, search, select_row, set_page, set_page_size, sort,
};
#[cfg(feature = "server")]
use crate::routes::lists::{show_dashboard, show_jobs, show_templates};

pub mod domain;
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
pub mod lists;
#[cfg(feature = "server")]
pub mod models;
pub mod navigation;
pub mod pagination;
pub mod qs;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod services;

/// Registers the console's routes.
#[cfg(feature = "server")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").service(api_v1_list).service(api_v1_item))
        .service(show_dashboard)
        .service(show_templates)
        .service(show_jobs)
        .service(set_page)
        .service(set_page_size)
        .service(search)
        .service(sort)
        .service(remove_filter)
        .service(clear_filters)
        .service(select_row);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let registry = ListRegistry::console(server_config.default_page_size)
        .map_err(|e| std::io::Error::other(format!("Invalid list definitions: {e}")))?;

    // Demo data; a real deployment plugs a backend client in here.
    let repo = InMemoryResources::demo();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(registry.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
