//! Stream adapter over the host's data fork
//!
//! The host owns the open file; the codec only sees a [`ForkStream`]. The
//! count/flag operations never fail loudly: a failed host call shows up as a
//! short count or `false`, and it is up to the codec to treat a short read
//! as a malformed file.

use std::io::{self, Read, Seek, SeekFrom, Write};

/// The host's file primitives.
pub trait DataFork {
    /// Read up to `buf.len()` bytes at the current mark.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write up to `buf.len()` bytes at the current mark.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Move the mark.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;

    /// Total length of the file in bytes.
    fn size(&mut self) -> io::Result<u64>;

    /// Flush pending writes.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Read + Write + Seek> DataFork for T {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(self, buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(self, pos)
    }

    fn size(&mut self) -> io::Result<u64> {
        let mark = Seek::stream_position(self)?;
        let end = Seek::seek(self, SeekFrom::End(0))?;
        Seek::seek(self, SeekFrom::Start(mark))?;
        Ok(end)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}

/// How a stream was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamAccess {
    /// Readable and seekable.
    Read,
    /// Readable, writable and seekable.
    ReadWrite,
}

impl StreamAccess {
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

/// Codec-facing view of a host data fork.
pub struct ForkStream<'a> {
    fork: &'a mut dyn DataFork,
    access: StreamAccess,
}

impl<'a> ForkStream<'a> {
    /// Wrap `fork` and rewind it to the start of the file.
    pub fn new(fork: &'a mut dyn DataFork, access: StreamAccess) -> Self {
        let mut stream = Self { fork, access };
        stream.seek(0, false);
        stream
    }

    /// Read into `buf`, returning how many bytes actually arrived.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        let mut filled = 0;
        while filled < buf.len() {
            match self.fork.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    tracing::debug!("data fork read failed: {err}");
                    break;
                }
            }
        }
        filled
    }

    /// Write `bytes`, returning how many were accepted.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        if !self.access.is_writable() {
            return 0;
        }
        let mut written = 0;
        while written < bytes.len() {
            match self.fork.write(&bytes[written..]) {
                Ok(0) => break,
                Ok(count) => written += count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    tracing::debug!("data fork write failed: {err}");
                    break;
                }
            }
        }
        written
    }

    /// Seek relative to the current mark or from the start of the file.
    pub fn seek(&mut self, offset: i64, relative: bool) -> bool {
        let pos = if relative {
            SeekFrom::Current(offset)
        } else {
            match u64::try_from(offset) {
                Ok(start) => SeekFrom::Start(start),
                Err(_) => return false,
            }
        };
        self.fork.seek(pos).is_ok()
    }

    /// Total byte length of the file, 0 if the host cannot tell.
    pub fn size(&mut self) -> u64 {
        self.fork.size().unwrap_or(0)
    }

    /// Current mark.
    pub fn offset(&mut self) -> u64 {
        self.fork.seek(SeekFrom::Current(0)).unwrap_or(0)
    }

    /// Bytes left to read; unknown while open for writing since the file
    /// may still grow.
    pub fn remaining(&mut self) -> Option<u64> {
        if self.access.is_writable() {
            return None;
        }
        let size = self.size();
        Some(size.saturating_sub(self.offset()))
    }

    #[must_use]
    pub fn access(&self) -> StreamAccess {
        self.access
    }
}

impl Read for ForkStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.fork.read(buf)
    }
}

impl Write for ForkStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.access.is_writable() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream opened read-only",
            ));
        }
        self.fork.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.fork.flush()
    }
}

impl Seek for ForkStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.fork.seek(pos)
    }
}
