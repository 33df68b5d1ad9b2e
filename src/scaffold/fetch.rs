//! Template archive download.

use crate::error::ScaffoldError;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

const USER_AGENT: &str = concat!("backpack-installer/", env!("CARGO_PKG_VERSION"));

/// Source of the template archive.
pub trait Fetcher {
    /// Write the resource at `url` to `dest`, replacing any existing file.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ScaffoldError>;
}

/// Blocking HTTP download with a progress bar.
#[derive(Debug, Default, Clone)]
pub struct HttpFetcher {
    pub show_progress: bool,
}

impl HttpFetcher {
    pub fn new(show_progress: bool) -> Self {
        Self { show_progress }
    }

    fn progress_bar(&self, total_size: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        match total_size {
            Some(total) => {
                let pb = ProgressBar::new(total);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.blue} [{elapsed_precise}] [{bar:40.green/black}] {bytes}/{total_bytes} ({eta})")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .tick_chars("◐◓◑◒")
                        .progress_chars("━━╸"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.blue} {bytes} downloaded")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb
            }
        }
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), ScaffoldError> {
        let response = ureq::get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| ScaffoldError::Transport(format!("{}: {}", url, e)))?;

        let total_size = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        tracing::debug!(url, ?total_size, status = %response.status(), "template response");

        let pb = self.progress_bar(total_size);
        let write_err =
            |e: std::io::Error| ScaffoldError::Transport(format!("{}: {}", dest.display(), e));

        let mut file = File::create(dest).map_err(write_err)?;
        let mut reader = response.into_body().into_reader();
        let mut buffer = [0; 8192];

        loop {
            let n = reader
                .read(&mut buffer)
                .map_err(|e| ScaffoldError::Transport(format!("{}: {}", url, e)))?;
            if n == 0 {
                break;
            }
            file.write_all(&buffer[..n]).map_err(write_err)?;
            pb.inc(n as u64);
        }
        file.flush().map_err(write_err)?;

        pb.finish_and_clear();
        Ok(())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ScaffoldError> {
        tracing::debug!(url, dest = %dest.display(), "fetching template archive");
        let result = self.download(url, dest);
        if result.is_err() && dest.exists() {
            // Half-written archives are useless to the next stage.
            let _ = fs::remove_file(dest);
        }
        result
    }
}
