//! Frame recording for regression tests.

use bytes::Bytes;

/// A recorded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFrame {
    /// Frame direction (true = device to host).
    pub from_device: bool,
    /// Raw frame bytes as seen on the wire.
    pub data: Bytes,
}

/// Frame recorder for capturing and replaying link sessions.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    frames: Vec<RecordedFrame>,
}

impl FrameRecorder {
    /// Create a new frame recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame.
    pub fn record(&mut self, from_device: bool, data: Bytes) {
        self.frames.push(RecordedFrame { from_device, data });
    }

    /// Get all recorded frames.
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Iterate over frames sent by the host.
    pub fn requests(&self) -> impl Iterator<Item = &Bytes> {
        self.frames
            .iter()
            .filter(|f| !f.from_device)
            .map(|f| &f.data)
    }

    /// Iterate over frames sent by the device.
    pub fn responses(&self) -> impl Iterator<Item = &Bytes> {
        self.frames
            .iter()
            .filter(|f| f.from_device)
            .map(|f| &f.data)
    }

    /// Concatenate every device-to-host frame into one byte stream.
    ///
    /// Useful for replaying a session into a reassembler.
    pub fn response_stream(&self) -> Vec<u8> {
        self.responses().flat_map(|data| data.iter().copied()).collect()
    }

    /// Save recorded frames to a file.
    pub async fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        use tokio::fs::File;
        use tokio::io::AsyncWriteExt;

        let mut file = File::create(path).await?;

        for frame in &self.frames {
            // Direction (1 byte) + length (2 bytes) + data
            file.write_u8(u8::from(frame.from_device)).await?;
            let len = u16::try_from(frame.data.len())
                .map_err(|_| std::io::Error::from(std::io::ErrorKind::InvalidInput))?;
            file.write_u16_le(len).await?;
            file.write_all(&frame.data).await?;
        }

        file.flush().await
    }

    /// Load recorded frames from a file.
    pub async fn load(path: &std::path::Path) -> std::io::Result<Self> {
        use tokio::fs::File;
        use tokio::io::AsyncReadExt;

        let mut file = File::open(path).await?;
        let mut recorder = Self::new();

        loop {
            let from_device = match file.read_u8().await {
                Ok(b) => b != 0,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            };

            let len = file.read_u16_le().await? as usize;
            let mut data = vec![0u8; len];
            file.read_exact(&mut data).await?;

            recorder.record(from_device, Bytes::from(data));
        }

        Ok(recorder)
    }
}
