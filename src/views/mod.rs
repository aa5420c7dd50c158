//! HTML views
//!
//! A page is composed of two files: a base document registered as the
//! `layout` entry template, and a page fragment registered as `content`
//! which the base pulls in with `{% include "content" %}`. Both are read and
//! compiled on every [`TemplateSet::load`]; nothing is cached between calls.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the entry template
pub const LAYOUT: &str = "layout";
/// Name the page fragment is registered under
pub const CONTENT: &str = "content";

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Location of a base document and the fragment rendered inside it
#[derive(Debug, Clone)]
pub struct TemplateSet {
    base: PathBuf,
    fragment: PathBuf,
}

impl TemplateSet {
    /// `base` and `fragment` are resolved relative to `root`
    pub fn new(root: &Path, base: impl AsRef<Path>, fragment: impl AsRef<Path>) -> Self {
        Self {
            base: root.join(base),
            fragment: root.join(fragment),
        }
    }

    /// Read and compile both files into a renderable layout
    pub async fn load(&self) -> Result<Layout, ViewError> {
        let base = read_template(&self.base).await?;
        let fragment = read_template(&self.fragment).await?;

        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template_owned(LAYOUT, base)?;
        env.add_template_owned(CONTENT, fragment)?;
        Ok(Layout { env })
    }
}

async fn read_template(path: &Path) -> Result<String, ViewError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ViewError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Compiled base + fragment pair
pub struct Layout {
    env: Environment<'static>,
}

impl Layout {
    /// Render the `layout` template, streaming output into `out`.
    ///
    /// On error, `out` keeps whatever was produced before the failure.
    pub fn render_into<S: Serialize>(&self, ctx: S, out: &mut Vec<u8>) -> Result<(), ViewError> {
        self.env
            .get_template(LAYOUT)?
            .render_captured_to(ctx, &mut *out)?;
        Ok(())
    }
}
