//! HTTP plumbing shared by the generator clients.

use std::time::Duration;

use investigator_core::error::GenerationError;
use tracing::warn;

/// Used when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

pub(crate) fn send_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout(err.to_string())
    } else {
        GenerationError::Network(err.to_string())
    }
}

/// Map non-success statuses to typed errors and return the body text.
pub(crate) async fn success_body(
    provider: &str,
    response: reqwest::Response,
) -> Result<String, GenerationError> {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(GenerationError::RateLimited { retry_after_secs });
    }

    if status == 401 || status == 403 {
        return Err(GenerationError::ApiError {
            status_code: status,
            message: "Invalid API key or insufficient permissions".into(),
        });
    }

    if !(200..300).contains(&status) {
        let error_body = response.text().await.unwrap_or_default();
        warn!(provider, status, body = %error_body, "Generator returned error");
        return Err(GenerationError::ApiError {
            status_code: status,
            message: error_body,
        });
    }

    response.text().await.map_err(send_error)
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP server for client tests.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned response. Returns the base URL and a handle
    /// that resolves to the raw request text.
    pub async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if request_complete(&buf) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&buf).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    /// Client without proxy settings, so loopback requests stay local.
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]);
        let content_length = headers
            .lines()
            .find_map(|line| {
                line.to_ascii_lowercase()
                    .strip_prefix("content-length:")
                    .map(|v| v.trim().parse::<usize>().unwrap_or(0))
            })
            .unwrap_or(0);
        buf.len() >= header_end + 4 + content_length
    }
}
