//! Development server rendering every page on demand.
//!
//! Nothing is cached: each request reads the content directory again, so an
//! edited article shows up on the next reload.

mod lifecycle;
mod response;

use crate::{
    config::{SiteConfig, cfg},
    core::{is_shutdown, register_server},
    debug,
    embed::assets,
    log,
    render::Renderer,
    site::{ThemeContext, resolve_path},
    utils::mime::types::HTML,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// Worker threads rendering requests.
const REQUEST_THREADS: usize = 4;

/// A response before it is written to the socket.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: HTML,
            body,
        }
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
}

/// Bind the HTTP server and register it for Ctrl+C shutdown.
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);
    Ok(BoundServer { server })
}

impl BoundServer {
    /// Start the request loop (blocking until shutdown).
    pub fn run(self) -> Result<()> {
        run_request_loop(&self.server)
    }
}

/// Bind and serve until Ctrl+C.
pub fn serve_site() -> Result<()> {
    bind_server()?.run()
}

fn run_request_loop(server: &Server) -> Result<()> {
    let config = cfg();
    // Rendering must not stall the accept loop.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let config = Arc::clone(&config);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let reply = reply_for(request.method(), request.url(), config);
    debug!("serve"; "{} {} {}", request.method(), request.url(), reply.status);
    response::respond(request, reply)
}

/// Route one request to an embedded asset or a freshly rendered page.
pub fn reply_for(method: &Method, url: &str, config: &SiteConfig) -> Reply {
    if !matches!(method, Method::Get | Method::Head) {
        return Reply {
            status: 405,
            content_type: crate::utils::mime::types::PLAIN,
            body: "405 Method Not Allowed".into(),
        };
    }

    let path = strip_query(url);
    if let Some((content_type, body)) = assets::lookup(path, config) {
        return Reply {
            status: 200,
            content_type,
            body,
        };
    }

    let theme = ThemeContext::new(config.theme.default, &config.theme.storage_key, path);
    let renderer = Renderer::new(config, theme);
    let store = config.store();

    match resolve_path(path, &config.categories, &store) {
        Ok(page) => Reply::html(200, renderer.page(&page)),
        Err(err) if err.is_not_found() => Reply::html(404, renderer.error(&err)),
        Err(err) => {
            let body = renderer.error(&err);
            log!("serve"; "{:#}", anyhow::Error::new(err));
            Reply::html(500, body)
        }
    }
}

/// Path part of a request target.
fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("");
        config.set_root(dir.path());
        let golang = dir.path().join("content/golang");
        fs::create_dir_all(&golang).unwrap();
        fs::write(
            golang.join("goroutines.mdx"),
            "---\ntitle: Goroutines\n---\n\n## Channels\n\nText.\n",
        )
        .unwrap();
        fs::write(golang.join("broken.mdx"), "<Tabs>\n\nx\n\n</Tabs>\n").unwrap();
        (dir, config)
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/golang?q=chan"), "/golang");
        assert_eq!(strip_query("/golang/x#channels"), "/golang/x");
        assert_eq!(strip_query("/"), "/");
    }

    #[test]
    fn test_reply_statuses() {
        let (_dir, config) = site();
        let get = |url: &str| reply_for(&Method::Get, url, &config);

        assert_eq!(get("/").status, 200);
        assert_eq!(get("/golang").status, 200);
        assert_eq!(get("/golang/goroutines").status, 200);
        assert_eq!(get("/golang/missing").status, 404);
        assert_eq!(get("/rust").status, 404);
        assert_eq!(get("/a/b/c").status, 404);
        assert_eq!(get("/golang/broken").status, 500);
        assert_eq!(reply_for(&Method::Post, "/", &config).status, 405);
    }

    #[test]
    fn test_reply_reads_fresh_content() {
        let (dir, config) = site();
        let path = dir.path().join("content/golang/goroutines.mdx");
        fs::write(&path, "---\ntitle: Edited\n---\n\nBody\n").unwrap();

        let reply = reply_for(&Method::Get, "/golang/goroutines?x=1", &config);
        assert!(reply.body.contains("Edited"));
        assert_eq!(reply.content_type, HTML);
    }

    #[test]
    fn test_reply_serves_assets() {
        let (_dir, config) = site();
        let reply = reply_for(&Method::Head, assets::SCRIPT_PATH, &config);
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/javascript"));
    }
}
