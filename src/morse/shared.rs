//! Shared Transmitter
//!
//! The keying outputs and transmit gate belong to one message at a time.
//! When several tasks can raise messages (alarm loop, watchdog failsafe),
//! they go through this async mutex so transmissions never interleave.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::delay::DelayNs;

use super::keying::KeyLines;
use super::transmit::{MessageTransmitter, SendOutcome, SuppressInput};

/// [`MessageTransmitter`] behind an `embassy-sync` mutex
pub struct SharedTransmitter<'c, M: RawMutex, K, D, S> {
    inner: Mutex<M, MessageTransmitter<'c, K, D, S>>,
}

impl<'c, M, K, D, S> SharedTransmitter<'c, M, K, D, S>
where
    M: RawMutex,
    K: KeyLines,
    D: DelayNs,
    S: SuppressInput,
{
    /// Wrap a transmitter
    pub const fn new(transmitter: MessageTransmitter<'c, K, D, S>) -> Self {
        Self {
            inner: Mutex::new(transmitter),
        }
    }

    /// Wait for the outputs, then key one message
    pub async fn send(&self, message: &str) -> SendOutcome {
        let mut tx = self.inner.lock().await;
        tx.send(message)
    }

    /// Wait for the outputs, then key one message ignoring suppression
    pub async fn send_unsuppressed(&self, message: &str) -> SendOutcome {
        let mut tx = self.inner.lock().await;
        tx.send_unsuppressed(message)
    }

    /// Key several messages back to back without releasing the outputs
    ///
    /// Returns the outcome of the last message, or None for an empty list.
    pub async fn send_all(&self, messages: &[&str]) -> Option<SendOutcome> {
        let mut tx = self.inner.lock().await;
        let mut outcome = None;
        for message in messages {
            outcome = Some(tx.send(message));
        }
        outcome
    }

    /// Key a message only if no other transmission is in progress
    pub fn try_send(&self, message: &str) -> Option<SendOutcome> {
        match self.inner.try_lock() {
            Ok(mut tx) => Some(tx.send(message)),
            Err(_) => {
                debug!("transmitter busy, message dropped");
                None
            }
        }
    }

    /// Take the transmitter back
    pub fn into_inner(self) -> MessageTransmitter<'c, K, D, S> {
        self.inner.into_inner()
    }
}
