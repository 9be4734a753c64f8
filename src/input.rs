//! Buffered input with byte offset tracking, used by the header parser and
//! both element decoders.

use std::{
    io::{self, BufRead, BufReader, Read},
    mem,
};

use crate::error::Error;


/// Something that decides where a scan stops.
pub(crate) trait Stopper {
    fn should_stop(&self, byte: u8) -> bool;
}

impl Stopper for u8 {
    fn should_stop(&self, byte: u8) -> bool {
        byte == *self
    }
}

impl<F: Fn(u8) -> bool> Stopper for F {
    fn should_stop(&self, byte: u8) -> bool {
        self(byte)
    }
}

/// A buffered reader that knows how many bytes were consumed so far.
///
/// Implements `io::Read`, so binary values can be read with `byteorder`'s
/// `ReadBytesExt`.
#[derive(Debug)]
pub(crate) struct Input<R: Read> {
    reader: BufReader<R>,
    offset: u64,

    /// Reused for tokens and lines to retain allocations.
    scratch: Vec<u8>,
}

impl<R: Read> Input<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            offset: 0,
            scratch: Vec::new(),
        }
    }

    /// Number of bytes consumed so far.
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    fn fill_buf(&mut self) -> Result<&[u8], io::Error> {
        loop {
            match self.reader.fill_buf() {
                // Returning `buf` from here directly is rejected by the
                // borrow checker, so we fetch it again below.
                Ok(_) => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }

        self.reader.fill_buf()
    }

    fn consume(&mut self, num_bytes: usize) {
        self.reader.consume(num_bytes);
        self.offset += num_bytes as u64;
    }

    /// Skips bytes until `stopper` says stop. The stopping byte is not
    /// consumed. Returns `false` if EOF was reached instead.
    pub(crate) fn skip_until(&mut self, stopper: impl Stopper) -> Result<bool, Error> {
        loop {
            let (found, pos) = {
                let buf = self.fill_buf()?;
                if buf.is_empty() {
                    return Ok(false);
                }

                match buf.iter().position(|&b| stopper.should_stop(b)) {
                    Some(pos) => (true, pos),
                    None => (false, buf.len()),
                }
            };

            self.consume(pos);
            if found {
                return Ok(true);
            }
        }
    }

    /// Collects bytes until `stopper` says stop or EOF is reached and passes
    /// them to `func`. The stopping byte is not consumed.
    pub(crate) fn take_until<F, O>(&mut self, stopper: impl Stopper, func: F) -> Result<O, Error>
    where
        F: FnOnce(&[u8]) -> Result<O, Error>,
    {
        let mut data = mem::take(&mut self.scratch);
        data.clear();

        loop {
            let (done, len) = {
                let buf = self.fill_buf()?;
                match buf.iter().position(|&b| stopper.should_stop(b)) {
                    _ if buf.is_empty() => (true, 0),
                    Some(pos) => {
                        data.extend_from_slice(&buf[..pos]);
                        (true, pos)
                    }
                    None => {
                        data.extend_from_slice(buf);
                        (false, buf.len())
                    }
                }
            };

            self.consume(len);
            if done {
                break;
            }
        }

        let out = func(&data);
        self.scratch = data;
        out
    }

    /// Reads one line including the `'\n'` and passes it to `func` without
    /// the line terminator (`"\n"` or `"\r\n"`). Returns `None` if the input
    /// is already exhausted.
    pub(crate) fn read_line<F, O>(&mut self, func: F) -> Result<Option<O>, Error>
    where
        F: FnOnce(&[u8]) -> Result<O, Error>,
    {
        let mut line = mem::take(&mut self.scratch);
        line.clear();

        let n = self.reader.read_until(b'\n', &mut line)?;
        self.offset += n as u64;

        let out = if n == 0 {
            Ok(None)
        } else {
            let mut content = &line[..];
            if content.ends_with(b"\n") {
                content = &content[..content.len() - 1];
            }
            if content.ends_with(b"\r") {
                content = &content[..content.len() - 1];
            }
            func(content).map(Some)
        };

        self.scratch = line;
        out
    }
}

impl<R: Read> Read for Input<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.offset += n as u64;
        Ok(n)
    }
}
