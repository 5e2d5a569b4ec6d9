use crate::NrbfError;
use anyhow::Result;
use std::io::{self, ErrorKind, Read, Write};

/// Declared lengths come from untrusted bytes; never preallocate more than this.
const PREALLOC_LIMIT: usize = 1 << 16;

fn map_eof(e: io::Error, what: &'static str) -> anyhow::Error {
    if e.kind() == ErrorKind::UnexpectedEof {
        NrbfError::unexpected_eos(what).into()
    } else {
        e.into()
    }
}

pub fn read_exact(r: &mut impl Read, buf: &mut [u8], what: &'static str) -> Result<()> {
    r.read_exact(buf).map_err(|e| map_eof(e, what))
}

pub fn read_array<const N: usize>(r: &mut impl Read, what: &'static str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    read_exact(r, &mut buf, what)?;
    Ok(buf)
}

pub fn read_vec(r: &mut impl Read, len: usize, what: &'static str) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    r.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(NrbfError::unexpected_eos(what).into());
    }
    Ok(buf)
}

/// Reads one byte, or `None` if the stream is cleanly exhausted.
pub fn read_u8_or_eof(r: &mut impl Read) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match r.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

pub fn write_all(w: &mut impl Write, buf: &[u8], w_len: &mut usize) -> Result<()> {
    w.write_all(buf)?;
    *w_len += buf.len();
    Ok(())
}

/// Wraps a reader and tracks the number of bytes consumed through it.
pub struct CountingReader<R> {
    r: R,
    pos: usize,
}
impl<R: Read> CountingReader<R> {
    pub fn new(r: R) -> Self {
        Self { r, pos: 0 }
    }
    pub fn position(&self) -> usize {
        self.pos
    }
    pub fn into_inner(self) -> R {
        self.r
    }
}
impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.r.read(buf)?;
        self.pos += n;
        Ok(n)
    }
}
