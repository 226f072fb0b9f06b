use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use tera::{Context, Tera};

use crate::dto::list::ListPageData;
use crate::lists::ListRegistry;
use crate::models::config::ServerConfig;
use crate::navigation::Location;
use crate::repository::memory::InMemoryResources;
use crate::routes::render_template;
use crate::services::lists as lists_service;

fn request_location(req: &HttpRequest) -> Location {
    Location::new(req.path(), req.query_string())
}

fn show_list(
    slug: &str,
    req: &HttpRequest,
    registry: &ListRegistry,
    repo: &InMemoryResources,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let Some(list) = registry.get(slug) else {
        log::error!("List {slug} is not registered");
        return HttpResponse::NotFound().finish();
    };

    let data = lists_service::load_list_page(
        repo,
        list,
        &request_location(req),
        &server_config.page_size_options,
    );

    let mut context = Context::new();
    context.insert("title", &data.label);
    context.insert("lists", &[data]);
    render_template(tera, "lists/index.html", &context)
}

/// Every list on one address; each reads only its own query keys.
#[get("/")]
pub async fn show_dashboard(
    req: HttpRequest,
    registry: web::Data<ListRegistry>,
    repo: web::Data<InMemoryResources>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let location = request_location(&req);
    let lists: Vec<ListPageData> = registry
        .iter()
        .map(|list| {
            lists_service::load_list_page(
                repo.get_ref(),
                list,
                &location,
                &server_config.page_size_options,
            )
        })
        .collect();

    let mut context = Context::new();
    context.insert("title", "Dashboard");
    context.insert("lists", &lists);
    render_template(&tera, "lists/index.html", &context)
}

#[get("/templates")]
pub async fn show_templates(
    req: HttpRequest,
    registry: web::Data<ListRegistry>,
    repo: web::Data<InMemoryResources>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    show_list("templates", &req, &registry, &repo, &server_config, &tera)
}

#[get("/jobs")]
pub async fn show_jobs(
    req: HttpRequest,
    registry: web::Data<ListRegistry>,
    repo: web::Data<InMemoryResources>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    show_list("jobs", &req, &registry, &repo, &server_config, &tera)
}
