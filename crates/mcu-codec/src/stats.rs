//! Link statistics.

/// Counters describing traffic over one link.
///
/// Every reassembled frame counts as received; it then counts as either
/// valid or corrupted depending on whether it decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommunicationStatistics {
    /// Frames written to the transport.
    pub frames_sent: u64,
    /// Frames reassembled from the transport.
    pub total_frames_received: u64,
    /// Received frames that decoded.
    pub valid_frames_received: u64,
    /// Received frames that failed to decode.
    pub corrupted_frames_received: u64,
    /// Requests whose response did not arrive in time.
    pub timed_out_requests: u64,
}

impl CommunicationStatistics {
    /// Create zeroed statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame written to the transport.
    pub fn record_sent(&mut self) {
        self.frames_sent += 1;
    }

    /// Record a received frame that decoded.
    pub fn record_valid(&mut self) {
        self.total_frames_received += 1;
        self.valid_frames_received += 1;
    }

    /// Record a received frame that failed to decode.
    pub fn record_corrupted(&mut self) {
        self.total_frames_received += 1;
        self.corrupted_frames_received += 1;
    }

    /// Record a request that timed out.
    pub fn record_timeout(&mut self) {
        self.timed_out_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = CommunicationStatistics::new();
        stats.record_sent();
        stats.record_valid();
        stats.record_valid();
        stats.record_corrupted();
        stats.record_timeout();

        assert_eq!(stats.frames_sent, 1);
        assert_eq!(stats.total_frames_received, 3);
        assert_eq!(stats.valid_frames_received, 2);
        assert_eq!(stats.corrupted_frames_received, 1);
        assert_eq!(stats.timed_out_requests, 1);
    }
}
