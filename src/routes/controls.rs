//! POST endpoints behind the pagers and toolbar of a rendered list.
//!
//! Each control posts the address it was rendered at; the handler runs the
//! matching controller against that address and redirects to the result.
use actix_web::{HttpResponse, Responder, post, web};

use crate::forms::ListForm;
use crate::forms::list::{
    ClearFiltersForm, RemoveFilterForm, SearchForm, SelectRowForm, SetPageForm, SetPageSizeForm,
    SortForm,
};
use crate::lists::{ListDefinition, ListRegistry};
use crate::navigation::RedirectNavigator;
use crate::repository::memory::InMemoryResources;
use crate::routes::redirect;
use crate::services::{ServiceError, ServiceResult, lists as lists_service, pagination, toolbar};

fn navigate<F, A>(registry: &ListRegistry, slug: &str, form: &F, action: A) -> HttpResponse
where
    F: ListForm,
    A: FnOnce(&RedirectNavigator, &ListDefinition) -> ServiceResult<bool>,
{
    let Some(list) = registry.get(slug) else {
        log::error!("List {slug} is not registered");
        return HttpResponse::NotFound().finish();
    };

    let location = match form.location() {
        Ok(location) => location,
        Err(err) => {
            log::error!("Rejected {slug} form: {err}");
            return HttpResponse::BadRequest().finish();
        }
    };

    let navigator = RedirectNavigator::new(location);
    match action(&navigator, list) {
        Ok(_) => redirect(&navigator.into_target().href()),
        Err(ServiceError::Column(err)) => {
            log::error!("Rejected {slug} toolbar action: {err}");
            HttpResponse::BadRequest().finish()
        }
        Err(err) => {
            log::error!("Failed to update {slug}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/lists/{list}/page")]
pub async fn set_page(
    slug: web::Path<String>,
    registry: web::Data<ListRegistry>,
    web::Form(form): web::Form<SetPageForm>,
) -> impl Responder {
    navigate(&registry, &slug, &form, |navigator, list| {
        Ok(pagination::set_page(navigator, &list.config, form.page))
    })
}

#[post("/lists/{list}/page-size")]
pub async fn set_page_size(
    slug: web::Path<String>,
    registry: web::Data<ListRegistry>,
    web::Form(form): web::Form<SetPageSizeForm>,
) -> impl Responder {
    navigate(&registry, &slug, &form, |navigator, list| {
        Ok(pagination::set_page_size(
            navigator,
            &list.config,
            form.page_size,
            form.page,
        ))
    })
}

#[post("/lists/{list}/search")]
pub async fn search(
    slug: web::Path<String>,
    registry: web::Data<ListRegistry>,
    web::Form(form): web::Form<SearchForm>,
) -> impl Responder {
    navigate(&registry, &slug, &form, |navigator, list| {
        let column = match form.column.trim() {
            "" => list.toolbar.default_search_column().key.as_str(),
            column => column,
        };
        toolbar::search(
            navigator,
            &list.config,
            &list.toolbar,
            column,
            form.mode,
            &form.term,
        )
    })
}

#[post("/lists/{list}/sort")]
pub async fn sort(
    slug: web::Path<String>,
    registry: web::Data<ListRegistry>,
    web::Form(form): web::Form<SortForm>,
) -> impl Responder {
    navigate(&registry, &slug, &form, |navigator, list| {
        toolbar::sort(navigator, &list.config, &list.toolbar, &form.key, form.direction)
    })
}

#[post("/lists/{list}/remove")]
pub async fn remove_filter(
    slug: web::Path<String>,
    registry: web::Data<ListRegistry>,
    web::Form(form): web::Form<RemoveFilterForm>,
) -> impl Responder {
    navigate(&registry, &slug, &form, |navigator, list| {
        Ok(toolbar::remove_filter(
            navigator,
            &list.config,
            &form.key,
            &form.value,
        ))
    })
}

#[post("/lists/{list}/clear")]
pub async fn clear_filters(
    slug: web::Path<String>,
    registry: web::Data<ListRegistry>,
    web::Form(form): web::Form<ClearFiltersForm>,
) -> impl Responder {
    navigate(&registry, &slug, &form, |navigator, list| {
        Ok(toolbar::clear_filters(navigator, &list.config))
    })
}

#[post("/lists/{list}/select")]
pub async fn select_row(
    slug: web::Path<String>,
    registry: web::Data<ListRegistry>,
    repo: web::Data<InMemoryResources>,
    web::Form(form): web::Form<SelectRowForm>,
) -> impl Responder {
    let Some(list) = registry.get(&slug) else {
        log::error!("List {slug} is not registered");
        return HttpResponse::NotFound().finish();
    };

    let location = match form.location() {
        Ok(location) => location,
        Err(err) => {
            log::error!("Rejected {slug} form: {err}");
            return HttpResponse::BadRequest().finish();
        }
    };

    match lists_service::select_row(repo.get_ref(), list, &location, &form.id) {
        Ok(target) => redirect(&target),
        Err(err) => {
            log::error!("Failed to select a {slug} row: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
