//! Reply framing policies.
//!
//! The server writes one reply per connection with no length prefix, so the
//! client has to infer where the reply ends. [`ShortReadFraming`] reproduces
//! the inference the existing clients use and stays the default; the other
//! policies are exact for servers that close the socket or terminate replies
//! with a newline.

use std::io::{self, BufRead, Read};

use pgpt_config::FramingMode;

/// Decides when a reply has been fully received.
pub(crate) trait FramingPolicy {
    /// Reads one complete reply from `reader`.
    fn read_message(&self, reader: &mut dyn Read) -> io::Result<Vec<u8>>;
}

/// Keeps reading only while each read fills the whole buffer.
///
/// A reply whose length is an exact multiple of `capacity` triggers one more
/// read. That read returns once the server closes the connection, and blocks
/// for as long as the server keeps it open.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShortReadFraming {
    capacity: usize,
}

impl ShortReadFraming {
    pub(crate) const fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl FramingPolicy for ShortReadFraming {
    fn read_message(&self, reader: &mut dyn Read) -> io::Result<Vec<u8>> {
        let mut buffer = vec![0_u8; self.capacity];
        let mut message = Vec::new();
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(read) => read,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };
            if let Some(chunk) = buffer.get(..read) {
                message.extend_from_slice(chunk);
            }
            if read < self.capacity {
                break;
            }
        }
        Ok(message)
    }
}

/// Reads until the server closes its side of the connection.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct UntilCloseFraming;

impl FramingPolicy for UntilCloseFraming {
    fn read_message(&self, reader: &mut dyn Read) -> io::Result<Vec<u8>> {
        let mut message = Vec::new();
        reader.read_to_end(&mut message)?;
        Ok(message)
    }
}

/// Reads until `delimiter`, which is stripped from the reply.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DelimitedFraming {
    delimiter: u8,
}

impl DelimitedFraming {
    pub(crate) const fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl FramingPolicy for DelimitedFraming {
    fn read_message(&self, reader: &mut dyn Read) -> io::Result<Vec<u8>> {
        let mut buffered = io::BufReader::new(reader);
        let mut message = Vec::new();
        buffered.read_until(self.delimiter, &mut message)?;
        if message.last() == Some(&self.delimiter) {
            message.pop();
        }
        Ok(message)
    }
}

/// Builds the policy selected by configuration.
pub(crate) fn framing_for(mode: FramingMode, capacity: usize) -> Box<dyn FramingPolicy> {
    match mode {
        FramingMode::ShortRead => Box::new(ShortReadFraming::new(capacity)),
        FramingMode::UntilClose => Box::new(UntilCloseFraming),
        FramingMode::Newline => Box::new(DelimitedFraming::new(b'\n')),
    }
}
