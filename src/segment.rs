//! Size-capped output segments.
//!
//! Generated script text is packed into consecutively numbered files so that
//! no file exceeds a byte budget; a single block bigger than the budget gets
//! a file of its own.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use tracing::debug;

use crate::foundation::error::{BasvidError, BasvidResult};

/// Incremental writer producing `{prefix}_{n}.{ext}` files under a byte cap.
///
/// Each pushed line costs its byte length plus one separator byte. A line
/// that would overflow the open segment closes it first; a line whose own
/// cost exceeds the cap is written alone to its own segment, the only case
/// where the cap is exceeded.
pub struct SegmentWriter {
    prefix: String,
    ext: String,
    max_bytes: usize,
    file: Option<File>,
    current_bytes: usize,
    segments: usize,
}

impl SegmentWriter {
    /// Create a writer; no file is opened until the first line arrives.
    pub fn new(prefix: impl Into<String>, ext: impl Into<String>, max_bytes: usize) -> BasvidResult<Self> {
        if max_bytes == 0 {
            return Err(BasvidError::invalid_input(
                "segment size budget must be >= 1 byte",
            ));
        }
        Ok(Self {
            prefix: prefix.into(),
            ext: ext.into(),
            max_bytes,
            file: None,
            current_bytes: 0,
            segments: 0,
        })
    }

    fn open_next(&mut self) -> BasvidResult<()> {
        let path = format!("{}_{}.{}", self.prefix, self.segments, self.ext);
        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    BasvidError::io(format!(
                        "failed to create output directory '{}': {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        debug!(segment = self.segments, path = %path, "opening output segment");
        self.file = Some(File::create(&path).map_err(|e| {
            BasvidError::io(format!("failed to create segment '{path}': {e}"))
        })?);
        self.segments += 1;
        self.current_bytes = 0;
        Ok(())
    }

    /// Append one line (a separator byte is added and accounted for).
    pub fn push(&mut self, line: &str) -> BasvidResult<()> {
        let cost = line.len() + 1;
        if self.file.is_none() || self.current_bytes + cost > self.max_bytes {
            self.open_next()?;
        }
        let file = self.file.as_mut().expect("segment file open after open_next");
        file.write_all(line.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .map_err(|e| {
                BasvidError::io(format!(
                    "failed to write segment {}: {e}",
                    self.segments.saturating_sub(1)
                ))
            })?;
        self.current_bytes += cost;
        Ok(())
    }

    /// Flush and close the open segment, returning the segment count.
    pub fn finish(mut self) -> BasvidResult<usize> {
        if let Some(mut f) = self.file.take() {
            f.flush()
                .map_err(|e| BasvidError::io(format!("failed to flush final segment: {e}")))?;
        }
        Ok(self.segments)
    }
}

/// Write all `lines` through a [`SegmentWriter`] and return the segment count.
pub fn write_segments<I, S>(
    lines: I,
    max_bytes: usize,
    prefix: &str,
    ext: &str,
) -> BasvidResult<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = SegmentWriter::new(prefix, ext, max_bytes)?;
    for line in lines {
        writer.push(line.as_ref())?;
    }
    writer.finish()
}

#[cfg(test)]
#[path = "../tests/unit/segment.rs"]
mod tests;
