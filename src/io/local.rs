use super::Source;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncReadExt;

/// Local file source
pub struct LocalFileSource {
    path: String,
}

impl LocalFileSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

#[async_trait]
impl Source for LocalFileSource {
    async fn read_all(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("cannot read {}", self.path))
    }

    fn name(&self) -> &str {
        &self.path
    }
}

/// Standard input, read to the end
pub struct StdinSource;

#[async_trait]
impl Source for StdinSource {
    async fn read_all(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        Ok(buf)
    }

    fn name(&self) -> &str {
        "-"
    }
}
