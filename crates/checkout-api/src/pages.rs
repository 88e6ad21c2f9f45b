//! # Pages
//!
//! HTML page templates and the client script, served from the public
//! directory. Pages are Handlebars templates; `{{NAME}}` values are
//! HTML-escaped and a missing value fails the render.

use handlebars::{Handlebars, RenderError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Page rendered for `/`
pub const DEFAULT_PAGE: &str = "index";

/// Client script file name, served at `/public/index.js`
pub const CLIENT_SCRIPT: &str = "index.js";

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Invalid page name: {0:?}")]
    InvalidName(String),

    #[error("Template not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render {page}: {source}")]
    Render {
        page: String,
        #[source]
        source: RenderError,
    },
}

impl PageError {
    /// Requests for names that can never be a page (e.g. `/favicon.ico`)
    pub fn is_bad_request(&self) -> bool {
        matches!(self, PageError::InvalidName(_) | PageError::NotFound(_))
    }
}

/// Values every page template receives
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
    #[serde(rename = "STRIPE_PUBLISHABLE_KEY")]
    pub stripe_publishable_key: &'a str,
}

/// Loads templates and static assets from the public directory
#[derive(Debug, Clone)]
pub struct PageRenderer {
    public_dir: PathBuf,
    registry: Arc<Handlebars<'static>>,
}

impl PageRenderer {
    pub fn new(public_dir: impl AsRef<Path>) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);

        Self {
            public_dir: public_dir.as_ref().to_path_buf(),
            registry: Arc::new(registry),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Map a page name to its template file.
    ///
    /// Only `[A-Za-z0-9_-]` names are accepted, so a page can never
    /// resolve outside the public directory.
    pub fn template_path(&self, page: &str) -> Result<PathBuf, PageError> {
        let valid = !page.is_empty()
            && page
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PageError::InvalidName(page.to_string()));
        }
        Ok(self.public_dir.join(format!("{}.html", page)))
    }

    /// Render a page template.
    ///
    /// Templates are read on every request, so edits under the public
    /// directory show up without a restart.
    pub async fn render<T: Serialize>(&self, page: &str, data: &T) -> Result<String, PageError> {
        let path = self.template_path(page)?;
        let template = read_file(&path).await?;
        self.registry
            .render_template(&template, data)
            .map_err(|source| PageError::Render {
                page: page.to_string(),
                source,
            })
    }

    /// Contents of the client script
    pub async fn client_script(&self) -> Result<String, PageError> {
        read_file(&self.public_dir.join(CLIENT_SCRIPT)).await
    }
}

async fn read_file(path: &Path) -> Result<String, PageError> {
    tokio::fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            PageError::NotFound(path.to_path_buf())
        } else {
            PageError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
