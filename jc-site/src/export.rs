//! Static export of the site
//!
//! Writes the default page together with its assets and a copy of the data
//! file, so the directory can be published by any static file host. Filtering
//! in the exported page is done by the browser script.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::api::ui::{APP_JS, SITE_CSS};
use crate::catalog::Catalog;
use crate::controller::{PageController, Theme};
use crate::render::render_page;
use crate::SiteSettings;

/// Files written by [`export_site`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
    pub sessions: usize,
}

pub async fn export_site(
    catalog: Arc<Catalog>,
    site: &SiteSettings,
    data_path: &Path,
    out_dir: &Path,
) -> Result<ExportReport> {
    if let Some(error) = &catalog.load_error {
        anyhow::bail!("Refusing to export: {}", error);
    }

    let sessions = catalog.sessions.len();
    let page = PageController::new(catalog, site.default_view, Theme::Light);
    let index = render_page(&page, &site.title);

    let data_copy = out_dir.join(jc_common::config::DEFAULT_DATA_FILE);
    let outputs = [
        (out_dir.join("index.html"), index.into_bytes()),
        (out_dir.join("static").join("app.js"), APP_JS.as_bytes().to_vec()),
        (out_dir.join("static").join("site.css"), SITE_CSS.as_bytes().to_vec()),
    ];

    let mut files = Vec::with_capacity(outputs.len() + 1);
    for (path, contents) in outputs {
        write_file(&path, &contents).await?;
        files.push(path);
    }

    if let Some(parent) = data_copy.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::copy(data_path, &data_copy)
        .await
        .with_context(|| format!("Failed to copy {} to {}", data_path.display(), data_copy.display()))?;
    files.push(data_copy);

    info!("Exported {} sessions to {}", sessions, out_dir.display());
    Ok(ExportReport { files, sessions })
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
