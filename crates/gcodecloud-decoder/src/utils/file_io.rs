//! G-code file reading
//!
//! Opens a source file up front so a missing or unreadable path fails
//! before any decoding starts, then streams it line by line through a
//! callback. Lines that are not valid UTF-8 (slicers sometimes write
//! Latin-1 in comments) are decoded lossily rather than rejected.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Instant;

use gcodecloud_core::constants::LARGE_FILE_WARN_BYTES;
use gcodecloud_core::InputError;
use tracing::{debug, warn};

/// Buffer size for reading large files (256 KB)
const READ_BUFFER_SIZE: usize = 256 * 1024;

/// File read statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReadStats {
    /// Total bytes read
    pub bytes_read: u64,
    /// Total lines read
    pub lines_read: u64,
    /// Lines that needed lossy UTF-8 decoding
    pub lossy_lines: u64,
    /// File size in bytes
    pub file_size: u64,
    /// Reading stopped before the end of the file
    pub stopped_early: bool,
    /// Time taken to read (milliseconds)
    pub read_time_ms: u64,
}

impl FileReadStats {
    /// Get progress percentage
    pub fn progress_percent(&self) -> f64 {
        if self.file_size == 0 {
            0.0
        } else {
            (self.bytes_read as f64 / self.file_size as f64) * 100.0
        }
    }
}

/// G-code file reader with streaming support
#[derive(Debug, Clone)]
pub struct GcodeFileReader {
    path: PathBuf,
    file_size: u64,
}

impl GcodeFileReader {
    /// Create a new G-code file reader
    ///
    /// # Errors
    /// Returns an [`InputError`] if the path does not exist, is not a regular
    /// file, or its metadata cannot be read.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(InputError::NotFound { path });
        }

        if !path.is_file() {
            return Err(InputError::NotAFile { path });
        }

        let file_size = fs::metadata(&path)
            .map_err(|source| InputError::Unreadable {
                path: path.clone(),
                source,
            })?
            .len();

        Ok(Self { path, file_size })
    }

    /// Get file size in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Get file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unreadable(&self, source: std::io::Error) -> InputError {
        InputError::Unreadable {
            path: self.path.clone(),
            source,
        }
    }

    /// Read entire file into memory
    pub fn read_all(&self) -> Result<String, InputError> {
        if self.file_size > LARGE_FILE_WARN_BYTES {
            warn!(
                "Reading very large file ({}MB) into memory",
                self.file_size / (1024 * 1024)
            );
        }

        let bytes = fs::read(&self.path).map_err(|e| self.unreadable(e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Stream the file line by line
    ///
    /// The callback sees each line without its terminator and returns
    /// [`ControlFlow::Break`] to stop reading early.
    ///
    /// # Errors
    /// Returns an [`InputError`] if the file cannot be opened or a read fails.
    pub fn read_lines<F>(&self, mut callback: F) -> Result<FileReadStats, InputError>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        let start_time = Instant::now();
        let file = File::open(&self.path).map_err(|e| self.unreadable(e))?;
        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

        let mut stats = FileReadStats {
            file_size: self.file_size,
            ..FileReadStats::default()
        };
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| self.unreadable(e))?;
            if n == 0 {
                break;
            }
            stats.bytes_read += n as u64;
            stats.lines_read += 1;

            let mut content = buf.as_slice();
            if let Some(stripped) = content.strip_suffix(b"\n") {
                content = stripped;
            }
            if let Some(stripped) = content.strip_suffix(b"\r") {
                content = stripped;
            }

            let flow = match std::str::from_utf8(content) {
                Ok(line) => callback(line),
                Err(_) => {
                    stats.lossy_lines += 1;
                    callback(&String::from_utf8_lossy(content))
                }
            };

            if flow.is_break() {
                stats.stopped_early = true;
                break;
            }
        }

        stats.read_time_ms = start_time.elapsed().as_millis() as u64;
        debug!(
            "Read {} lines ({} bytes) from {} in {}ms",
            stats.lines_read,
            stats.bytes_read,
            self.path.display(),
            stats.read_time_ms
        );
        Ok(stats)
    }

    /// Read at most `max_lines` lines
    pub fn read_lines_limited(
        &self,
        max_lines: usize,
    ) -> Result<(Vec<String>, FileReadStats), InputError> {
        let mut lines = Vec::new();
        if max_lines == 0 {
            let stats = FileReadStats {
                file_size: self.file_size,
                stopped_early: self.file_size > 0,
                ..FileReadStats::default()
            };
            return Ok((lines, stats));
        }

        let stats = self.read_lines(|line| {
            lines.push(line.to_string());
            if lines.len() >= max_lines {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok((lines, stats))
    }
}
