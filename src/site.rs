//! Static hosting for the front-end bundle.
//!
//! Paths that look like files (contain a dot) are served as-is from the site
//! root; every other path gets the single HTML entry point so client-side
//! routes resolve.

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ENTRY_POINT: &str = "index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteRoute<'a> {
    Asset(&'a str),
    EntryPoint,
}

pub fn route(path: &str) -> SiteRoute<'_> {
    if path.contains('.') {
        SiteRoute::Asset(path)
    } else {
        SiteRoute::EntryPoint
    }
}

/// Maps a request path onto a file under `root`. `None` for anything that
/// would escape the root.
fn resolve(root: &Path, path: &str) -> Option<PathBuf> {
    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    Some(root.join(relative))
}

pub fn router(root: PathBuf) -> Router {
    Router::new()
        .fallback(serve_path)
        .with_state(Arc::new(root))
}

async fn serve_path(State(root): State<Arc<PathBuf>>, uri: Uri) -> Response {
    let target = match route(uri.path()) {
        SiteRoute::Asset(path) => resolve(&root, path),
        SiteRoute::EntryPoint => Some(root.join(ENTRY_POINT)),
    };
    let Some(target) = target else {
        warn!("Rejected path outside site root: {}", uri.path());
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&target).await {
        Ok(body) => {
            let mime = mime_guess::from_path(&target).first_or_octet_stream();
            debug!("{} -> {}", uri.path(), target.display());
            ([(header::CONTENT_TYPE, mime.to_string())], body).into_response()
        }
        Err(e) => {
            debug!("{} not served: {}", target.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn serve(root: PathBuf, listen: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("Serving {} on {}", root.display(), listener.local_addr()?);
    axum::serve(listener, router(root)).await?;
    Ok(())
}
