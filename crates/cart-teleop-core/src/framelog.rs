use cart_teleop_protocol::CommandFrame;

/// What the status display needs to know about transmitted frames.
#[derive(Debug, Default)]
pub struct FrameLog {
    last: Option<CommandFrame>,
    total: u64,
}

impl FrameLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: CommandFrame) {
        self.last = Some(frame);
        self.total += 1;
    }

    /// Last frame's wire bytes, upper-case hex.
    pub fn last_hex(&self) -> Option<String> {
        self.last.map(|frame| hex::encode_upper(frame.to_bytes()))
    }

    /// Frames sent so far.
    pub fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_latest_frame_and_count() {
        let mut log = FrameLog::new();
        for t in [10, 20, 30] {
            log.push(CommandFrame::new(t, 0, 50));
        }
        assert_eq!(log.last_hex().as_deref(), Some("2A151E0032"));
        assert_eq!(log.total(), 3);
    }

    #[test]
    fn renders_last_frame_as_hex() {
        let mut log = FrameLog::new();
        assert_eq!(log.last_hex(), None);
        log.push(CommandFrame::new(45, 0, 50));
        assert_eq!(log.last_hex().as_deref(), Some("2A152D0032"));
    }
}
