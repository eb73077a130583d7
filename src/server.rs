use std::io;
use std::sync::Arc;

use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use serde::Serialize;
use spdlog::{error, info};

use crate::blog_api::{page_posts, post_detail, query_posts, DataResponse, ErrorResponse, POST_NOT_FOUND};
use crate::config::Config;
use crate::content::post_loader::{categories_of, tags_of, PostLoader};
use crate::content::Post;
use crate::query_string::QueryString;

/// Posts are read once at startup, the directory is not watched
struct AppState {
    config: Config,
    posts: Vec<Post>,
}

fn get_query(req: &HttpRequest) -> QueryString {
    QueryString::from(req.uri().query().unwrap_or(""))
}

fn json_response<T: Serialize>(mut builder: web::HttpResponseBuilder, body: &T) -> web::HttpResponse {
    match serde_json::to_string(body) {
        Ok(json) => builder
            .content_type("application/json")
            .body(json),
        Err(e) => {
            error!("Error serialising response: {}", e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error serialising response: {}", e))
        }
    }
}

#[web::get("/api/blog")]
async fn blog_list(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let res = query_posts(&state.posts, &get_query(&req), state.config.defaults.sort_order);
    json_response(web::HttpResponse::Ok(), &res)
}

#[web::get("/api/blog/page")]
async fn blog_page(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let defaults = &state.config.defaults;
    let res = page_posts(&state.posts, &get_query(&req), defaults.sort_order, defaults.page_size);
    json_response(web::HttpResponse::Ok(), &res)
}

#[web::get("/api/blog/categories")]
async fn blog_categories(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    json_response(web::HttpResponse::Ok(), &DataResponse::ok(categories_of(&state.posts)))
}

#[web::get("/api/blog/tags")]
async fn blog_tags(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    json_response(web::HttpResponse::Ok(), &DataResponse::ok(tags_of(&state.posts)))
}

#[web::get("/api/blog/{slug}")]
async fn blog_post(slug: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let slug = slug.into_inner();
    let state = state.get_ref().clone();
    let rendered_slug = slug.clone();

    // Highlighting is CPU bound, keep it off the async workers
    let detail = web::block(move || {
        post_detail(&state.posts, &rendered_slug, state.config.defaults.sort_order)
    }).await;

    match detail {
        Ok(Some(detail)) => json_response(web::HttpResponse::Ok(), &DataResponse::ok(detail)),
        Ok(None) => json_response(web::HttpResponse::NotFound(), &ErrorResponse::new(POST_NOT_FOUND)),
        Err(e) => {
            error!("Error rendering post {}: {}", slug, e);
            json_response(web::HttpResponse::InternalServerError(), &ErrorResponse::new(format!("Error rendering post {}", slug)))
        }
    }
}

#[web::get("/img/posts/{slug}/{file}")]
async fn post_images(path: web::types::Path<(String, String)>, state: web::types::State<Arc<AppState>>) -> Result<NamedFile, web::Error> {
    let (slug, file) = path.into_inner();
    if escapes_images_dir(&slug, &file) {
        return Err(web::error::ErrorForbidden("Access forbidden").into());
    }

    let file_path = state.config.paths.images_dir.join(slug).join(file);
    Ok(NamedFile::open(file_path)?)
}

fn escapes_images_dir(slug: &str, file: &str) -> bool {
    slug.contains("..") || file.contains("..")
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let loader = PostLoader::new(config.paths.posts_dir.clone());
    let report = loader.load_report();
    for post in report.posts.iter() {
        info!("Post: {}", post.slug());
    }
    info!("Loaded {} posts, skipped {}", report.posts.len(), report.skipped.len());

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    info!("Serving {} on {}:{}", loader.content_dir().display(), bind_addr, bind_port);

    let app_state = Arc::new(AppState {
        config,
        posts: report.posts,
    });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(blog_list)
            .service(blog_page)
            .service(blog_categories)
            .service(blog_tags)
            .service(blog_post)
            .service(post_images)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
