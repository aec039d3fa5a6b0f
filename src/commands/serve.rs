//! Serve the blog over HTTP

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::routes::{default_i18n_handler, router_with_i18n, HandlerOptions};
use crate::Blog;

/// Start the server; with `watch`, content changes clear the post cache
pub async fn start(
    blog: Arc<Blog>,
    options: HandlerOptions,
    watch_paths: Vec<PathBuf>,
    ip: &str,
    port: u16,
    watch: bool,
) -> Result<()> {
    let handler = default_i18n_handler(blog.config_arc());
    let app = router_with_i18n(Arc::clone(&blog), options, handler);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}/", ip, port, blog.config().base_uri());
    println!("Blog running at {}", url);
    if watch {
        println!("Watching for content changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let blog = Arc::clone(&blog);
        tokio::spawn(async move {
            if let Err(e) = watch_and_clear(watch_paths, blog).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Clear the post cache whenever a watched file changes
async fn watch_and_clear(paths: Vec<PathBuf>, blog: Arc<Blog>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<DebounceEventResult>();

    let mut debouncer = new_debouncer(Duration::from_millis(500), move |result: DebounceEventResult| {
        let _ = tx.send(result);
    })?;

    for path in &paths {
        if !path.exists() {
            continue;
        }
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                let changed: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }
                blog.clear_cache().await;
            }
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
            }
        }
    }

    Ok(())
}

fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("content/posts/hello.md")));
        assert!(!is_relevant(Path::new("content/.git/index")));
        assert!(!is_relevant(Path::new("content/posts/hello.md~")));
        assert!(!is_relevant(Path::new("content/.DS_Store")));
    }
}
