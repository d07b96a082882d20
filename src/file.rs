use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use crate::{
    error::{Error, Result},
    storage::EllipticsStorage,
};

/// Access mode a handle is bound to for its whole lifetime. Combined
/// read/write access does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    Append,
}

impl AccessMode {
    /// Parses an fopen-style mode string, checking for `r`, `w`, `a` in that
    /// priority order. A `+` anywhere requests mixed access and is rejected.
    pub fn parse(mode: &str) -> Result<Self> {
        if mode.contains('+') {
            return Err(Error::InvalidMode(format!(
                "mixed mode access not supported: {:?}",
                mode
            )));
        }

        if mode.contains('r') {
            Ok(AccessMode::Read)
        } else if mode.contains('w') {
            Ok(AccessMode::Write)
        } else if mode.contains('a') {
            Ok(AccessMode::Append)
        } else {
            Err(Error::InvalidMode(format!(
                "mode must contain at least one of \"r\", \"w\" or \"a\": {:?}",
                mode
            )))
        }
    }
}

/// Single-use file handle bound to one remote object.
///
/// The buffer materializes lazily: the first `read` fetches the whole object
/// into a seekable cursor, the first `write` allocates an empty one. Writes
/// stay local until [`close`](Self::close) flushes them in one upload; a
/// handle dropped without `close` silently loses its buffered writes.
pub struct EllipticsFile<'a> {
    name: String,
    storage: &'a EllipticsStorage,
    mode: AccessMode,
    stream: Option<Cursor<Vec<u8>>>,
    flushed: bool,
}

impl<'a> EllipticsFile<'a> {
    pub(crate) fn new(name: &str, storage: &'a EllipticsStorage, mode: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            storage,
            mode: AccessMode::parse(mode)?,
            stream: None,
            flushed: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Reads up to `num_bytes` from the current position, or everything
    /// remaining when `None`. The first call fetches the whole object.
    pub fn read(&mut self, num_bytes: Option<usize>) -> Result<Vec<u8>> {
        if self.mode != AccessMode::Read {
            return Err(Error::Mode(
                "reading from a file opened for writing".to_string(),
            ));
        }

        if self.stream.is_none() {
            let content = self.storage.fetch(&self.name)?;
            self.stream = Some(Cursor::new(content));
        }
        let stream = self.stream.get_or_insert_with(Cursor::default);

        match num_bytes {
            None => {
                let mut rest = Vec::new();
                stream.read_to_end(&mut rest)?;
                Ok(rest)
            }
            Some(limit) => {
                let mut chunk = vec![0u8; limit];
                let count = stream.read(&mut chunk)?;
                chunk.truncate(count);
                Ok(chunk)
            }
        }
    }

    /// Appends `content` to the local buffer and returns the number of bytes
    /// accepted. No request is made until `close`.
    pub fn write(&mut self, content: &[u8]) -> Result<usize> {
        if self.mode == AccessMode::Read {
            return Err(Error::Mode(
                "writing to a file opened for reading".to_string(),
            ));
        }

        let stream = self.stream.get_or_insert_with(Cursor::default);

        Ok(stream.write(content)?)
    }

    /// Flushes the buffered writes in one upload, appending when the handle
    /// was opened in append mode. A handle that never materialized a buffer
    /// closes without any request, and only the first `close` flushes.
    pub fn close(&mut self) -> Result<()> {
        if self.flushed {
            return Ok(());
        }
        self.flushed = true;

        let stream = match self.stream.as_ref() {
            Some(stream) => stream,
            None => return Ok(()),
        };

        if self.mode != AccessMode::Read {
            self.storage.save(
                &self.name,
                stream.get_ref(),
                self.mode == AccessMode::Append,
            )?;
        }

        Ok(())
    }

    /// The backend does not expose object sizes through this protocol.
    pub fn size(&self) -> Result<u64> {
        Err(Error::Unsupported("size"))
    }

    /// True until the handle materializes a buffer. A proxy for "never
    /// touched" rather than a record of `close` calls, kept for compatibility
    /// with the original backend semantics.
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Repositions the underlying buffer. Fails until a buffer exists, that
    /// is before the first read or write.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream.seek(pos)?),
            None => Err(Error::Uninitialized("seek")),
        }
    }
}
