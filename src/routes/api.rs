use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::lists::ListRegistry;
use crate::repository::errors::RepositoryError;
use crate::repository::memory::InMemoryResources;
use crate::services::{ServiceError, lists as lists_service};

#[get("/v1/{list}")]
pub async fn api_v1_list(
    list: web::Path<String>,
    req: HttpRequest,
    registry: web::Data<ListRegistry>,
    repo: web::Data<InMemoryResources>,
) -> impl Responder {
    let Some(definition) = registry.get(&list) else {
        return HttpResponse::NotFound().finish();
    };

    match lists_service::load_api_list(repo.get_ref(), definition, req.query_string()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Repository(RepositoryError::InvalidFilter(message))) => {
            HttpResponse::BadRequest().body(message)
        }
        Err(err) => {
            log::error!("Failed to list {list}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/{list}/{id}")]
pub async fn api_v1_item(
    path: web::Path<(String, i32)>,
    registry: web::Data<ListRegistry>,
    repo: web::Data<InMemoryResources>,
) -> impl Responder {
    let (list, id) = path.into_inner();
    let Some(definition) = registry.get(&list) else {
        return HttpResponse::NotFound().finish();
    };

    match lists_service::load_api_item(repo.get_ref(), definition, id) {
        Ok(Some(resource)) => HttpResponse::Ok().json(resource),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load {list} {id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
