use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::Source;
use anyhow::{Result, bail};

/// HTTP(S) source, fetched with a single GET
pub struct HttpSource {
    url: String,
    name: String,
    transferred_bytes: AtomicU64,
    max_retry: u32,
}

impl HttpSource {
    pub fn new(url: String) -> Self {
        let name = file_name_of(&url).to_string();
        Self {
            url,
            name,
            transferred_bytes: AtomicU64::new(0),
            max_retry: 10,
        }
    }
}

/// Last path segment of a URL, without query or fragment.
fn file_name_of(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path.trim_end_matches('/');
    path.rsplit('/').next().unwrap_or(path)
}

#[async_trait]
impl Source for HttpSource {
    async fn read_all(&self) -> Result<Vec<u8>> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let mut retry_count = 0;

        loop {
            match client.get(&self.url).send().await {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        bail!("HTTP request failed with status: {}", resp.status());
                    }

                    let bytes = resp.bytes().await?;
                    self.transferred_bytes
                        .fetch_add(bytes.len() as u64, Ordering::Relaxed);
                    return Ok(bytes.to_vec());
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= self.max_retry {
                        bail!("Max retries exceeded");
                    }
                    warn!(
                        "Connection error, retry {}/{}: {}",
                        retry_count, self.max_retry, e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn transferred_bytes(&self) -> Option<u64> {
        Some(self.transferred_bytes.load(Ordering::Relaxed))
    }
}
