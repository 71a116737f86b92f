// Copyright 2025 HyperZoekt Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use memmap2::Mmap;
use std::{fs::File, path::Path};

use super::{FilePointer, HEADER_LEN};
use crate::error::DecodeError;

enum Source {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

/// An index file held open for the duration of a run.
pub struct IndexFile {
    data: Source,
}

impl IndexFile {
    /// Memory-map the file at `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            data: Source::Mapped(mmap),
        })
    }

    /// Wrap bytes already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            data: Source::Owned(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.data {
            Source::Mapped(m) => &m[..],
            Source::Owned(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A fresh reader positioned at offset 0.
    pub fn reader(&self) -> IndexReader<'_> {
        IndexReader::new(self.as_bytes())
    }
}

/// Cursor over the index bytes with big-endian / C-string primitives.
///
/// Failed reads leave the cursor where it was.
#[derive(Clone)]
pub struct IndexReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> IndexReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    pub fn len(&self) -> u64 {
        self.buf.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Move the cursor to an absolute offset. Seeking to exactly the end is
    /// allowed; any read from there reports `TruncatedInput`.
    pub fn seek_absolute(&mut self, offset: u64) -> Result<(), DecodeError> {
        if offset > self.len() {
            return Err(DecodeError::InvalidOffset {
                offset,
                len: self.len(),
            });
        }
        self.pos = offset as usize;
        Ok(())
    }

    pub fn seek_to(&mut self, ptr: FilePointer) -> Result<(), DecodeError> {
        self.seek_absolute(u64::from(ptr.get()))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::TruncatedInput {
                offset: self.position(),
                wanted: n,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read the raw header bytes from the start of the stream.
    pub fn read_header(&mut self) -> Result<[u8; HEADER_LEN], DecodeError> {
        self.seek_absolute(0)?;
        let mut out = [0u8; HEADER_LEN];
        out.copy_from_slice(self.take(HEADER_LEN)?);
        Ok(out)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_pointer(&mut self) -> Result<FilePointer, DecodeError> {
        self.read_u32_be().map(FilePointer::new)
    }

    /// Read bytes up to a NUL (consumed, not returned) or end of stream.
    ///
    /// Fails with `MalformedString` once `max_len` bytes have been scanned
    /// without finding a terminator.
    pub fn read_cstring(&mut self, max_len: usize) -> Result<String, DecodeError> {
        let start = self.pos;
        let rest = &self.buf[start..];
        let window = &rest[..rest.len().min(max_len)];
        match window.iter().position(|&b| b == 0) {
            Some(nul) => {
                self.pos = start + nul + 1;
                Ok(String::from_utf8_lossy(&window[..nul]).into_owned())
            }
            None if window.len() >= max_len => {
                Err(DecodeError::MalformedString {
                    offset: start as u64,
                    max_len,
                })
            }
            None => {
                // end of stream without terminator
                self.pos = self.buf.len();
                Ok(String::from_utf8_lossy(window).into_owned())
            }
        }
    }
}
