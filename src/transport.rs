//! Length-prefixed message framing for mail-client native messaging.
//!
//! Every message in either direction is a 4-byte unsigned length followed by
//! that many bytes of UTF-8 JSON. The host supplies one request at a time and
//! waits for the matching response before sending the next.

use crate::config::{ByteOrder, TransportConfig};
use crate::scorer::PhishingScorer;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, ErrorKind, Read, Write};
use thiserror::Error;

const PREFIX_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("I/O error on host stream: {0}")]
    Io(#[from] io::Error),
    #[error("stream closed inside a length prefix ({0} of 4 bytes)")]
    TruncatedHeader(usize),
    #[error("stream closed after {received} of {expected} payload bytes")]
    TruncatedPayload { expected: usize, received: usize },
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    TooLarge { len: usize, max: usize },
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ByteOrder {
    pub fn decode(self, bytes: [u8; PREFIX_LEN]) -> u32 {
        match self {
            ByteOrder::Native => u32::from_ne_bytes(bytes),
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }

    pub fn encode(self, len: u32) -> [u8; PREFIX_LEN] {
        match self {
            ByteOrder::Native => len.to_ne_bytes(),
            ByteOrder::Little => len.to_le_bytes(),
            ByteOrder::Big => len.to_be_bytes(),
        }
    }
}

pub struct FrameReader<R> {
    inner: R,
    byte_order: ByteOrder,
    max_frame_len: u32,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R, config: &TransportConfig) -> Self {
        Self {
            inner,
            byte_order: config.byte_order,
            max_frame_len: config.max_frame_len,
        }
    }

    /// Next raw payload, or `None` when the stream ended cleanly between frames
    pub fn read_frame(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        let mut prefix = [0u8; PREFIX_LEN];
        let mut filled = 0;

        while filled < PREFIX_LEN {
            match self.inner.read(&mut prefix[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => return Ok(None),
            PREFIX_LEN => {}
            partial => return Err(FrameError::TruncatedHeader(partial)),
        }

        let len = self.byte_order.decode(prefix);
        if len > self.max_frame_len {
            return Err(FrameError::TooLarge {
                len: len as usize,
                max: self.max_frame_len as usize,
            });
        }

        let expected = len as usize;
        let mut payload = Vec::with_capacity(expected);
        (&mut self.inner)
            .take(u64::from(len))
            .read_to_end(&mut payload)?;

        if payload.len() < expected {
            return Err(FrameError::TruncatedPayload {
                expected,
                received: payload.len(),
            });
        }

        log::debug!("Read frame of {} bytes", expected);
        Ok(Some(payload))
    }

    /// Next payload decoded as JSON
    pub fn read_message(&mut self) -> Result<Option<Value>, FrameError> {
        match self.read_frame()? {
            Some(payload) => {
                let text = std::str::from_utf8(&payload)?;
                Ok(Some(serde_json::from_str(text)?))
            }
            None => Ok(None),
        }
    }
}

pub struct FrameWriter<W> {
    inner: W,
    byte_order: ByteOrder,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W, config: &TransportConfig) -> Self {
        Self {
            inner,
            byte_order: config.byte_order,
        }
    }

    /// Write one frame and flush it to the host
    pub fn write_frame(&mut self, payload: &[u8]) -> Result<(), FrameError> {
        let len = u32::try_from(payload.len()).map_err(|_| FrameError::TooLarge {
            len: payload.len(),
            max: u32::MAX as usize,
        })?;

        self.inner.write_all(&self.byte_order.encode(len))?;
        self.inner.write_all(payload)?;
        self.inner.flush()?;

        log::debug!("Wrote frame of {} bytes", payload.len());
        Ok(())
    }

    pub fn write_message<T: Serialize>(&mut self, message: &T) -> Result<(), FrameError> {
        let payload = serde_json::to_vec(message)?;
        self.write_frame(&payload)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Request/response loop serving one mail client over a pair of byte streams
pub struct NativeMessagingHost<R, W> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    scorer: PhishingScorer,
}

impl<R: Read, W: Write> NativeMessagingHost<R, W> {
    pub fn new(reader: R, writer: W, scorer: PhishingScorer, config: &TransportConfig) -> Self {
        Self {
            reader: FrameReader::new(reader, config),
            writer: FrameWriter::new(writer, config),
            scorer,
        }
    }

    /// Serve until the host closes its end. Returns the number of messages
    /// answered; any framing or decoding error ends the session.
    pub fn run(&mut self) -> Result<usize, FrameError> {
        let mut handled = 0;

        while let Some(request) = self.reader.read_message()? {
            if !request.is_object() {
                log::warn!("Request is not a JSON object, scoring it as an empty message");
            }

            let result = self.scorer.score_value(request);
            self.writer.write_message(&result)?;
            handled += 1;
        }

        log::info!("Host closed the stream after {} message(s)", handled);
        Ok(handled)
    }

    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }
}
