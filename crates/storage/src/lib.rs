use anyhow::{Context, Result};
use async_trait::async_trait;
use consent_core::FailureReport;
use std::path::{Path, PathBuf};
use tracing::info;

#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Persist a report and return the locations it was written to.
    async fn save_report(&self, report: &FailureReport) -> Result<Vec<String>>;
}

/// Writes `<name>.txt`, `<name>.html` and `<name>.png` into a folder.
pub struct FileReportStorage {
    pub folder: PathBuf,
    /// Public URL the folder is served from, used instead of local paths
    pub public_url: Option<String>,
}

impl FileReportStorage {
    pub fn new(folder: impl AsRef<Path>) -> Self {
        Self {
            folder: folder.as_ref().to_path_buf(),
            public_url: None,
        }
    }

    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    fn location(&self, file_name: &str, path: &Path) -> String {
        match &self.public_url {
            Some(url) => format!("{}/{}", url.trim_end_matches('/'), file_name),
            None => path.display().to_string(),
        }
    }

    async fn write(&self, file_name: String, data: &[u8]) -> Result<String> {
        let path = self.folder.join(&file_name);
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("failed to write report file {}", path.display()))?;
        Ok(self.location(&file_name, &path))
    }
}

#[async_trait]
impl ReportStorage for FileReportStorage {
    async fn save_report(&self, report: &FailureReport) -> Result<Vec<String>> {
        tokio::fs::create_dir_all(&self.folder)
            .await
            .with_context(|| format!("failed to create report folder {}", self.folder.display()))?;

        let mut written = vec![self.write(format!("{}.txt", report.name), report.text().as_bytes()).await?];
        if let Some(html) = &report.html {
            written.push(self.write(format!("{}.html", report.name), html.as_bytes()).await?);
        }
        if let Some(png) = &report.screenshot {
            written.push(self.write(format!("{}.png", report.name), png).await?);
        }

        for location in &written {
            println!("Report saved: {}", location);
        }
        info!(name = %report.name, files = written.len(), "failure report saved");
        Ok(written)
    }
}
