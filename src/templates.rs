use minijinja::Environment;
use once_cell::sync::Lazy;

use crate::api::models::PageView;
use crate::error::Result;

const INDEX_TEMPLATE: &str = "index.html";

// Parsed once; the `.html` name turns on HTML auto-escaping.
static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template(INDEX_TEMPLATE, include_str!("templates/index.html"))
        .expect("Failed to parse index template");
    env
});

pub fn render_page(view: &PageView) -> Result<String> {
    let html = TEMPLATES.get_template(INDEX_TEMPLATE)?.render(view)?;
    Ok(html)
}
