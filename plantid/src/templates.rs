//! HTML page rendering.

use crate::errors::{Error, Result};
use minijinja::Environment;
use serde::Serialize;

const INDEX_TEMPLATE: &str = "index.html";

/// Everything the upload page shows
#[derive(Debug, Default, Serialize)]
pub struct IndexPage {
    /// One-shot messages from a failed upload
    pub flashes: Vec<String>,
    /// Pre-formatted result fragment, inserted without escaping
    pub result: String,
    /// Where the uploaded image can be fetched for preview
    pub image_url: Option<String>,
}

/// Templates compiled into the binary, with HTML auto-escaping
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))
            .map_err(|e| Error::Internal {
                operation: format!("load template {INDEX_TEMPLATE}: {e}"),
            })?;
        Ok(Self { env })
    }

    pub fn render_index(&self, page: &IndexPage) -> Result<String> {
        self.env
            .get_template(INDEX_TEMPLATE)
            .and_then(|template| template.render(page))
            .map_err(|e| Error::Internal {
                operation: format!("render {INDEX_TEMPLATE}: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_has_form_only() {
        let html = Templates::new().unwrap().render_index(&IndexPage::default()).unwrap();

        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"file\""));
        assert!(!html.contains("class=\"flash\""));
        assert!(!html.contains("class=\"result\""));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_flashes_are_escaped_but_result_is_not() {
        let page = IndexPage {
            flashes: vec!["Error: Received status code 500. Response content: <b>oops</b>".to_string()],
            result: "<strong>Plant Name:</strong> Fern<br>".to_string(),
            image_url: Some("/static/fern.jpg".to_string()),
        };

        let html = Templates::new().unwrap().render_index(&page).unwrap();

        assert!(html.contains("Response content: &lt;b&gt;oops"));
        assert!(!html.contains("<b>oops</b>"));
        assert!(html.contains("<strong>Plant Name:</strong> Fern<br>"));
        assert!(html.contains("<img class=\"preview\""));
        assert!(html.contains("fern.jpg"));
    }
}
