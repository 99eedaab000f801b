//! Request/response client.

use bytes::Bytes;
use mcu_codec::{CommunicationStatistics, Connection};
use mcu_protocol::{RequestFrame, ResponseFrame};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::Config;
use crate::error::{Error, Result};

/// A client performing one request/response cycle at a time with a target.
///
/// Requests carry a CRC byte of zero. There is no retry: a failed cycle is
/// reported to the caller, who decides whether to try again.
///
/// # Example
///
/// ```rust,ignore
/// use mcu_client::{Client, Config};
///
/// let config = Config::from_connection_string("Target=0x01;Timeout=10")?;
/// let mut client = Client::new(serial_port, config);
/// let response = client.request(0x01, vec![0x01, 0x02, 0x03]).await?;
/// if response.status()?.is_ok() {
///     println!("payload: {:02X?}", &response.payload()[..]);
/// }
/// ```
pub struct Client<T>
where
    T: AsyncRead + AsyncWrite,
{
    connection: Connection<T>,
    config: Config,
}

impl<T> Client<T>
where
    T: AsyncRead + AsyncWrite,
{
    /// Create a client over an already opened transport.
    pub fn new(transport: T, config: Config) -> Self {
        tracing::debug!(
            port = %config.port,
            baud_rate = config.baud_rate,
            target_id = config.target_id,
            "creating client"
        );

        Self {
            connection: Connection::new(transport),
            config,
        }
    }

    /// Send `payload` with `op_code` to the configured target and wait for
    /// the response.
    pub async fn request(&mut self, op_code: u8, payload: impl Into<Bytes>) -> Result<ResponseFrame> {
        self.request_to(self.config.target_id, op_code, payload).await
    }

    /// Send `payload` with `op_code` to `target_id` and wait for the
    /// response.
    pub async fn request_to(
        &mut self,
        target_id: u8,
        op_code: u8,
        payload: impl Into<Bytes>,
    ) -> Result<ResponseFrame> {
        let request = RequestFrame::new(target_id, op_code, payload)?;
        self.send(request).await
    }

    /// Send a prepared request and wait for the response.
    ///
    /// When a response timeout is configured and expires, the cycle fails
    /// with [`Error::ResponseTimeout`]. Bytes of a late response stay
    /// buffered and are read by the next cycle.
    pub async fn send(&mut self, request: RequestFrame) -> Result<ResponseFrame> {
        let op_code = request.op_code();
        self.connection.send_request(request).await?;

        let outcome = match self.config.response_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.connection.read_response())
                .await
                .ok(),
            None => Some(self.connection.read_response().await),
        };

        let Some(result) = outcome else {
            self.connection.record_timeout();
            tracing::warn!(
                op_code = op_code,
                timeout = ?self.config.response_timeout,
                "response timed out"
            );
            return Err(Error::ResponseTimeout);
        };

        let response = result?.ok_or(Error::ConnectionClosed)?;
        tracing::debug!(
            op_code = op_code,
            response_code = response.response_code(),
            payload_length = response.payload_length(),
            "request completed"
        );
        Ok(response)
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Traffic counters for this client.
    #[must_use]
    pub fn statistics(&self) -> &CommunicationStatistics {
        self.connection.statistics()
    }

    /// Consume the client and return the underlying connection.
    pub fn into_connection(self) -> Connection<T> {
        self.connection
    }
}

impl<T> std::fmt::Debug for Client<T>
where
    T: AsyncRead + AsyncWrite,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("connection", &self.connection)
            .finish()
    }
}
