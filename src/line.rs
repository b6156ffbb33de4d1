//! CRLF line codec for tokio.
//!
//! [`LineCodec`] turns an arbitrarily chunked byte stream into complete
//! UTF-8 lines and serializes outgoing [`Command`]s. Lines that cannot be
//! used (bad UTF-8, over-long) are dropped inside the codec so a noisy
//! stream never ends the session.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::command::Command;
use crate::error::{ClientError, LineError};

/// Maximum accepted line length in bytes, excluding CRLF.
pub const MAX_IRC_LINE_LEN: usize = 8191;

const CRLF: &[u8] = b"\r\n";

/// Line-based codec for CRLF-terminated IRC messages.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of the next byte to scan for a delimiter.
    next_index: usize,
    /// Maximum line length.
    max_len: usize,
    /// Skipping the remainder of an over-long line.
    discarding: bool,
    /// Lines dropped so far.
    discarded: u64,
}

impl LineCodec {
    /// Create a codec with the default maximum line length.
    pub fn new() -> Self {
        Self::with_max_len(MAX_IRC_LINE_LEN)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
            discarded: 0,
        }
    }

    /// Number of lines dropped because they were undecodable or too long.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Sanitize outgoing data: everything from the first CR or LF is cut.
    pub fn sanitize(mut data: String) -> String {
        if let Some(pos) = data.find(['\r', '\n']) {
            data.truncate(pos);
        }
        data
    }

    fn discard(&mut self, reason: LineError) {
        self.discarded += 1;
        debug!(error = %reason, "discarding line");
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn find_crlf(haystack: &[u8]) -> Option<usize> {
    haystack.windows(CRLF.len()).position(|w| w == CRLF)
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ClientError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ClientError> {
        loop {
            // Back up one byte: a CR may have ended the previous chunk.
            let start = self.next_index.saturating_sub(1).min(src.len());
            let Some(offset) = find_crlf(&src[start..]) else {
                // A trailing CR may be half of the delimiter.
                let pending = src.len() - usize::from(src.last() == Some(&b'\r'));
                if pending > self.max_len {
                    // Over-long partial line: drop what we have, keep a
                    // trailing CR so the delimiter is still recognised.
                    if !self.discarding {
                        self.discard(LineError::TooLong {
                            actual: pending,
                            limit: self.max_len,
                        });
                        self.discarding = true;
                    }
                    let keep_cr = src.last() == Some(&b'\r');
                    src.clear();
                    if keep_cr {
                        src.put_u8(b'\r');
                    }
                }
                self.next_index = src.len();
                return Ok(None);
            };

            let end = start + offset;
            let raw = src.split_to(end + CRLF.len());
            self.next_index = 0;
            let line = &raw[..end];

            if std::mem::take(&mut self.discarding) || line.is_empty() {
                continue;
            }
            if line.len() > self.max_len {
                self.discard(LineError::TooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
                continue;
            }
            match std::str::from_utf8(line) {
                Ok(s) => return Ok(Some(s.to_owned())),
                Err(e) => self.discard(LineError::InvalidUtf8 {
                    valid_up_to: e.valid_up_to(),
                }),
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, ClientError> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if !src.is_empty() {
            debug!(bytes = src.len(), "dropping unterminated line at end of stream");
            src.clear();
        }
        self.next_index = 0;
        self.discarding = false;
        Ok(None)
    }
}

impl Encoder<Command> for LineCodec {
    type Error = ClientError;

    fn encode(&mut self, command: Command, dst: &mut BytesMut) -> Result<(), ClientError> {
        let line = Self::sanitize(command.to_string());
        dst.reserve(line.len() + CRLF.len());
        dst.put_slice(line.as_bytes());
        dst.put_slice(CRLF);
        Ok(())
    }
}
