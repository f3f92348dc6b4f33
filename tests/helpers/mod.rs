/// Test doubles to simulate the serial connection during integration tests.
use std::collections::VecDeque;
use triplecan::protocol::transport::traits::serial_link::SerialLink;
use tokio::sync::mpsc;

#[allow(dead_code)]
/// In-memory serial port reproducing the `SerialLink` trait behavior.
///
/// Each `write` is delivered as one chunk to the peer; `read` hands chunks
/// out in pieces no larger than the caller's buffer.
pub struct MockSerialLink {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
    pending: VecDeque<u8>,
}

#[allow(dead_code)]
impl MockSerialLink {
    /// Construct a pair of interconnected ports (DUT ↔ host).
    pub fn create_pair() -> (Self, Self) {
        let (dut_tx, host_rx) = mpsc::unbounded_channel();
        let (host_tx, dut_rx) = mpsc::unbounded_channel();

        let dut = Self {
            tx: dut_tx,
            rx: dut_rx,
            pending: VecDeque::new(),
        };

        let host = Self {
            tx: host_tx,
            rx: host_rx,
            pending: VecDeque::new(),
        };

        (dut, host)
    }

    /// Push raw bytes to the peer without going through the trait.
    pub fn inject(&self, bytes: &[u8]) {
        self.tx.send(bytes.to_vec()).expect("peer dropped");
    }

    /// Wait for the next chunk written by the peer.
    pub async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }
}

impl SerialLink for MockSerialLink {
    type Error = ();

    async fn write<'a>(&'a mut self, bytes: &'a [u8]) -> Result<(), Self::Error> {
        self.tx.send(bytes.to_vec()).map_err(|_| ())
    }

    async fn read<'a>(&'a mut self, buffer: &'a mut [u8]) -> Result<usize, Self::Error> {
        if self.pending.is_empty() {
            match self.rx.recv().await {
                Some(chunk) => self.pending.extend(chunk),
                None => return Ok(0),
            }
        }
        let count = buffer.len().min(self.pending.len());
        for (slot, byte) in buffer.iter_mut().zip(self.pending.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}
