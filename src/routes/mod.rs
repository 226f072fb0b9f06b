//! HTTP handlers of the console.

use actix_web::HttpResponse;
use actix_web::http::header;
use tera::{Context, Tera};

pub mod api;
pub mod controls;
pub mod lists;

/// `303 See Other` to `location`, so the browser follows with a GET.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
