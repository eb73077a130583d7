pub mod config;
pub mod logger;
pub mod server;
pub mod blog_api;
pub mod post_list;
pub mod list_view;
pub mod paginator;
pub mod query_string;
pub mod text_utils;
pub mod content;
pub mod view;
mod test_data;
