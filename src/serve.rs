//! Development server.
//!
//! A lightweight HTTP server over the build output, built on `tiny_http`:
//!
//! - Static file serving with `index.html` resolution for directories
//! - Directory listing for folders without an index
//! - File watching and auto-rebuild (via the `watch` module)
//! - Graceful shutdown on Ctrl+C
//!
//! Config is re-read through [`cfg`] on every request so watch-mode hot
//! reloads take effect without restarting the server.

use crate::config::cfg;
use crate::head::SyncEngine;
use crate::log;
use crate::watch::watch_for_changes_blocking;
use anyhow::{Context, Result};
use std::{
    fs,
    io::Cursor,
    net::SocketAddr,
    path::Path,
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Start the development server with optional file watching.
///
/// Blocks until Ctrl+C.
pub fn serve_site() -> Result<()> {
    let c = cfg();
    let interface: std::net::IpAddr = c.serve.interface.parse()?;

    let (server, addr) = try_bind_port(interface, c.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    // Spawn file watcher thread
    if c.serve.watch {
        let engine = Arc::new(SyncEngine::new(c.seo.policy));
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking(&engine) {
                log!("watch"; "{err}");
            }
        });
    }

    // Handle requests in main thread (blocks until Ctrl+C)
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < max_retries => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    max_retries,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

/// Handle a single HTTP request.
///
/// Resolution order: exact file, directory index.html, directory
/// listing, 404.
fn handle_request(request: Request) -> Result<()> {
    let config = cfg();
    let serve_root = config.build.output.clone();

    // Decode URL-encoded characters (e.g., %20 -> space)
    let url_path = urlencoding::decode(request.url())
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    // Strip the query string before resolving the path (cache-busting
    // URLs like "site.css?t=123")
    let path_without_query = url_path.split('?').next().unwrap_or(&url_path);
    let request_path = path_without_query.trim_matches('/');
    let local_path = serve_root.join(request_path);

    if local_path.is_file() {
        return serve_file(request, &local_path);
    }

    if local_path.is_dir() {
        let index_path = local_path.join("index.html");
        if index_path.is_file() {
            return serve_file(request, &index_path);
        }
        if let Ok(listing) = directory_listing(&local_path, request_path) {
            return serve_html(request, listing);
        }
    }

    serve_not_found(request)
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = guess_content_type(path);

    let response = Response::from_data(content)
        .with_header(Header::from_bytes("Content-Type", content_type).unwrap());

    request.respond(response)?;
    Ok(())
}

fn serve_html(request: Request, content: String) -> Result<()> {
    let response = Response::from_string(content)
        .with_header(Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap());
    request.respond(response)?;
    Ok(())
}

fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![Header::from_bytes("Content-Type", "text/plain").unwrap()],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",

        // Default binary
        _ => "application/octet-stream",
    }
}

/// Generate an HTML directory listing for browsing.
///
/// Only directories and `.html` files are shown; hidden entries are
/// filtered out.
fn directory_listing(dir_path: &Path, request_path: &str) -> std::io::Result<String> {
    let mut entries: Vec<_> = fs::read_dir(dir_path)?
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !name.starts_with('.') && (is_dir || name.ends_with(".html"))
        })
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let href = if request_path.is_empty() {
                format!("/{name}")
            } else {
                format!("/{request_path}/{name}")
            };
            format!(r#"<li><a href="{href}">{name}</a></li>"#)
        })
        .collect();
    entries.sort();

    let parent_link = if request_path.is_empty() {
        String::new()
    } else {
        let parent = Path::new(request_path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(r#"<li><a href="/{parent}">..</a></li>"#)
    };

    Ok(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"/>\
         <title>/{request_path}</title></head>\
         <body><h1>/{request_path}</h1><ul>{parent_link}{}</ul>\
         <p>vitrine {}</p></body></html>",
        entries.join("\n"),
        env!("CARGO_PKG_VERSION"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(
            guess_content_type(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            guess_content_type(Path::new("styles/site.css")),
            "text/css; charset=utf-8"
        );
        assert_eq!(guess_content_type(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(
            guess_content_type(Path::new("unknown.bin")),
            "application/octet-stream"
        );
        assert_eq!(
            guess_content_type(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_directory_listing_filters_hidden_and_non_html() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("index.html"), "x").unwrap();
        fs::write(tmp.path().join(".hidden"), "x").unwrap();
        fs::write(tmp.path().join("feed.xml"), "x").unwrap();
        fs::create_dir(tmp.path().join("services")).unwrap();

        let listing = directory_listing(tmp.path(), "").unwrap();

        assert!(listing.contains(r#"<a href="/index.html">"#));
        assert!(listing.contains(r#"<a href="/services">"#));
        assert!(!listing.contains(".hidden"));
        assert!(!listing.contains("feed.xml"));
    }

    #[test]
    fn test_directory_listing_has_parent_link() {
        let tmp = tempfile::tempdir().unwrap();
        let listing = directory_listing(tmp.path(), "services/detail").unwrap();

        assert!(listing.contains(r#"<a href="/services">..</a>"#));
    }
}
