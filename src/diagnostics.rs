//! Optional append-only diagnostic files, mirroring the original block's
//! `errors_to_file`/`data_to_file` redirection of `stderr`/`stdout` to
//! `errors_<addr>.txt`/`data_<addr>.txt`. Kept as a plain file behind a
//! `parking_lot::Mutex` rather than a `tracing` layer, since the
//! structured `tracing::debug!` call sites in `engine` are independent,
//! and a host embedding this core is free to install its own subscriber.

use crate::error::DfloodResult;
use crate::proto::Addr;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::time::SystemTime;

pub struct Diagnostics {
    error_file: Option<Mutex<File>>,
    data_file: Option<Mutex<File>>,
}

impl Diagnostics {
    pub fn new(addr: Addr, errors_to_file: bool, data_to_file: bool) -> DfloodResult<Self> {
        let error_file = if errors_to_file {
            let path = format!("errors_{}.txt", addr.0);
            Some(Mutex::new(open_append(&path).inspect_err(|e| {
                tracing::warn!(%path, error = %e, "failed to open error diagnostic file");
            })?))
        } else {
            None
        };
        let data_file = if data_to_file {
            let path = format!("data_{}.txt", addr.0);
            Some(Mutex::new(open_append(&path).inspect_err(|e| {
                tracing::warn!(%path, error = %e, "failed to open data diagnostic file");
            })?))
        } else {
            None
        };
        Ok(Self {
            error_file,
            data_file,
        })
    }

    pub fn none() -> Self {
        Self {
            error_file: None,
            data_file: None,
        }
    }

    /// Appends a diagnostic line. A no-op when `errors_to_file` wasn't set.
    pub fn log_error(&self, line: &str) {
        if let Some(f) = &self.error_file {
            let mut f = f.lock();
            let _ = writeln!(f, "{line}");
        }
    }

    /// Appends a delivered-payload line. A no-op when `data_to_file` wasn't set.
    pub fn log_data(&self, line: &str) {
        if let Some(f) = &self.data_file {
            let mut f = f.lock();
            let _ = writeln!(f, "{line}");
        }
    }
}

fn open_append(path: &str) -> std::io::Result<File> {
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    let now = humantime_now();
    let _ = writeln!(f, "*** START: {now}");
    Ok(f)
}

fn humantime_now() -> String {
    match SystemTime::now().duration_since(SystemTime::UNIX_EPOCH) {
        Ok(d) => format!("{}s since epoch", d.as_secs()),
        Err(_) => "unknown".to_string(),
    }
}
