//! One-time authorization flow.
//!
//! Prints the consent URL, waits for the provider's redirect on a
//! loopback listener, exchanges the code, and seeds the credential store.

use anyhow::{bail, Context, Result};
use hushify_playback::ProviderConfig;
use hushify_store::TokenStore;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub async fn run(config: &ProviderConfig, store: &TokenStore) -> Result<()> {
    let bind_addr = loopback_addr(&config.redirect_uri)?;
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to listen on {bind_addr}"))?;

    println!("Open this URL in your browser to authorize:");
    println!("\n  {}\n", hushify_playback::authorize_url(config));
    println!("Waiting for the redirect on {bind_addr} ...");

    let code = wait_for_code(&listener).await?;

    let http = reqwest::Client::new();
    let credentials = hushify_playback::exchange_code(&http, config, &code)
        .await
        .context("code exchange failed")?;
    store.save(&credentials)?;

    tracing::info!(path = %store.path().display(), "credentials saved");
    println!("Authorization complete. You can start `hushify run` now.");
    Ok(())
}

/// Host and port of the configured redirect URI.
fn loopback_addr(redirect_uri: &str) -> Result<String> {
    let rest = redirect_uri
        .strip_prefix("http://")
        .context("redirect URI must be a plain http loopback URL")?;
    let host_port = rest.split('/').next().unwrap_or(rest);
    Ok(host_port.to_string())
}

async fn wait_for_code(listener: &TcpListener) -> Result<String> {
    loop {
        let (mut stream, _) = listener.accept().await?;

        let mut buffer = vec![0u8; 4096];
        let read = stream.read(&mut buffer).await.unwrap_or(0);
        let request = String::from_utf8_lossy(&buffer[..read]);

        match parse_callback(&request) {
            Some(Callback::Code(code)) => {
                respond(&mut stream, "Authorization successful. You can close this window.").await;
                return Ok(code);
            }
            Some(Callback::Error(error)) => {
                respond(&mut stream, "Authorization failed. Check the terminal.").await;
                bail!("provider returned an error: {error}");
            }
            // Favicon requests and the like; keep listening.
            None => respond(&mut stream, "Waiting for the authorization redirect.").await,
        }
    }
}

enum Callback {
    Code(String),
    Error(String),
}

/// Pull `code` or `error` out of the redirect's request line.
fn parse_callback(request: &str) -> Option<Callback> {
    let line = request.lines().next()?;
    let path = line.split_whitespace().nth(1)?;
    let query = path.split_once('?')?.1;

    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("code", value)) if !value.is_empty() => {
                return Some(Callback::Code(value.to_string()))
            }
            Some(("error", value)) => return Some(Callback::Error(value.to_string())),
            _ => {}
        }
    }
    None
}

async fn respond(stream: &mut TcpStream, message: &str) {
    let body = format!("<html><body><p>{message}</p></body></html>");
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    if let Err(err) = stream.write_all(response.as_bytes()).await {
        tracing::debug!("failed to answer the browser: {err}");
    }
    let _ = stream.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_code_from_redirect() {
        let request = "GET /callback?code=AQDx12 HTTP/1.1\r\nHost: 127.0.0.1:8888\r\n\r\n";
        match parse_callback(request) {
            Some(Callback::Code(code)) => assert_eq!(code, "AQDx12"),
            _ => panic!("expected a code"),
        }
    }

    #[test]
    fn parses_error_from_redirect() {
        let request = "GET /callback?error=access_denied HTTP/1.1\r\n\r\n";
        match parse_callback(request) {
            Some(Callback::Error(error)) => assert_eq!(error, "access_denied"),
            _ => panic!("expected an error"),
        }
    }

    #[test]
    fn ignores_unrelated_requests() {
        assert!(parse_callback("GET /favicon.ico HTTP/1.1\r\n\r\n").is_none());
        assert!(parse_callback("").is_none());
    }

    #[test]
    fn loopback_addr_strips_scheme_and_path() {
        assert_eq!(
            loopback_addr("http://127.0.0.1:8888/callback").unwrap(),
            "127.0.0.1:8888"
        );
        assert!(loopback_addr("https://example.com/callback").is_err());
    }
}
