pub mod html_renderer;
pub mod reveal;
