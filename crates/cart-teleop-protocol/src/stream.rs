//! Receiver-side decoding of a raw frame stream.
//!
//! There is no delimiter or checksum on the wire, so a reader that joins the
//! stream mid-frame has to hunt for the `MARKER_A, MARKER_B` pair and take the
//! next three bytes as the payload.

use crate::frame::{CommandFrame, FRAME_LEN, MARKER_A, MARKER_B};

#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
    discarded: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Returns the next complete frame, skipping any bytes before a marker pair.
    pub fn next_frame(&mut self) -> Option<CommandFrame> {
        match self.buf.windows(2).position(|w| w == [MARKER_A, MARKER_B]) {
            Some(pos) => self.skip(pos),
            None => {
                // A lone MARKER_A at the end may be the first half of a pair.
                let keep = usize::from(self.buf.last() == Some(&MARKER_A));
                self.skip(self.buf.len() - keep);
                return None;
            }
        }

        if self.buf.len() < FRAME_LEN {
            return None;
        }

        let frame = CommandFrame {
            throttle: self.buf[2],
            brake: self.buf[3],
            steering: self.buf[4],
        };
        self.buf.drain(..FRAME_LEN);
        Some(frame)
    }

    /// Decodes every complete frame currently buffered.
    pub fn drain_frames(&mut self) -> Vec<CommandFrame> {
        std::iter::from_fn(|| self.next_frame()).collect()
    }

    /// Bytes thrown away while hunting for markers.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    fn skip(&mut self, n: usize) {
        self.buf.drain(..n);
        self.discarded += n;
    }
}
