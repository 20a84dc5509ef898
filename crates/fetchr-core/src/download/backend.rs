//! libcurl-backed `Downloader`.
//!
//! One blocking GET (or SFTP/SMB/file/ftp read) per fetch, streaming the body
//! sequentially into the destination file.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{http, sftp, smb, Downloader, DownloaderOptions, FetchRequest, TransferError};
use crate::config::FetchrConfig;

/// Timeouts and limits applied to every curl transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Abort when throughput stays below `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    /// Hard wall-clock limit; `None` lets a slow but steady transfer run forever.
    pub timeout: Option<Duration>,
    pub max_redirections: u32,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            timeout: None,
            max_redirections: 10,
        }
    }
}

impl From<&FetchrConfig> for CurlOptions {
    fn from(cfg: &FetchrConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            low_speed_limit: cfg.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            timeout: cfg.timeout_secs.map(Duration::from_secs),
            max_redirections: cfg.max_redirections,
        }
    }
}

/// Downloader for every protocol variant, backed by libcurl.
#[derive(Debug, Clone, Default)]
pub struct CurlDownloader {
    options: CurlOptions,
}

impl CurlDownloader {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CurlOptions {
        &self.options
    }
}

impl Downloader for CurlDownloader {
    fn fetch(&self, request: &FetchRequest, dest: &Path) -> Result<(), TransferError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.low_speed_limit(self.options.low_speed_limit)?;
        easy.low_speed_time(self.options.low_speed_time)?;
        if let Some(timeout) = self.options.timeout {
            easy.timeout(timeout)?;
        }

        match &request.options {
            DownloaderOptions::Sftp(opts) => sftp::configure(&mut easy, opts)?,
            DownloaderOptions::Smb(opts) => smb::configure(&mut easy, opts)?,
            DownloaderOptions::Http(opts) => {
                http::configure(&mut easy, opts, self.options.max_redirections)?
            }
            DownloaderOptions::Url => {
                easy.follow_location(true)?;
            }
        }

        let file = File::create(dest).map_err(|source| TransferError::Write {
            path: dest.to_path_buf(),
            source,
        })?;
        let file = Arc::new(Mutex::new(file));
        let file_cb = Arc::clone(&file);
        let write_error: Arc<Mutex<Option<std::io::Error>>> = Arc::new(Mutex::new(None));
        let write_error_cb = Arc::clone(&write_error);

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(move |data| {
                let mut f = file_cb.lock().unwrap_or_else(|e| e.into_inner());
                match f.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        *write_error_cb.lock().unwrap_or_else(|e| e.into_inner()) = Some(e);
                        Ok(0) // abort transfer
                    }
                }
            })?;
            transfer.perform()
        };

        if let Some(source) = write_error.lock().unwrap_or_else(|e| e.into_inner()).take() {
            return Err(TransferError::Write {
                path: dest.to_path_buf(),
                source,
            });
        }
        performed?;

        if matches!(request.options, DownloaderOptions::Http(_)) {
            let code = easy.response_code()?;
            if !(200..300).contains(&code) {
                return Err(TransferError::Status { code });
            }
        }

        file.lock()
            .unwrap_or_else(|e| e.into_inner())
            .sync_all()
            .map_err(|source| TransferError::Write {
                path: dest.to_path_buf(),
                source,
            })?;
        Ok(())
    }
}
