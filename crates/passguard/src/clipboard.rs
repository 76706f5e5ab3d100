// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal clipboard via OSC 52 escape sequences.
//!
//! OSC 52 asks the terminal emulator itself to set the selection, which
//! works over SSH and needs no display-server dependency. The copied
//! password is cleared after a configurable delay; if the process exits
//! before the delay elapses, the pending clear is simply discarded.

use std::io::Write;
use std::time::Duration;

use base64::Engine as _;
use passguard_core::PassguardError;
use tracing::debug;

/// Clipboard handle carrying the configured clear delay.
pub struct Clipboard {
    clear_secs: u64,
}

impl Clipboard {
    pub fn new(clear_secs: u64) -> Self {
        Self { clear_secs }
    }

    /// Place `text` on the terminal clipboard.
    pub fn copy(&self, text: &str) -> Result<(), PassguardError> {
        let payload = base64::engine::general_purpose::STANDARD.encode(text);
        write_osc52(&payload)
    }

    /// Copy, then block until the clear delay elapses and clear.
    ///
    /// Killing the process during the delay discards the pending clear.
    pub fn copy_with_deferred_clear(&self, text: &str) -> Result<(), PassguardError> {
        self.copy(text)?;
        std::thread::sleep(Duration::from_secs(self.clear_secs));
        self.clear()?;
        debug!(secs = self.clear_secs, "cleared clipboard after delay");
        Ok(())
    }

    /// Overwrite the clipboard with an empty selection.
    pub fn clear(&self) -> Result<(), PassguardError> {
        write_osc52("")
    }
}

fn write_osc52(payload: &str) -> Result<(), PassguardError> {
    let mut stdout = std::io::stdout().lock();
    // OSC 52, clipboard selection `c`, base64 payload, terminated by BEL.
    write!(stdout, "\x1b]52;c;{payload}\x07")
        .and_then(|()| stdout.flush())
        .map_err(|e| PassguardError::Internal(format!("failed to write to terminal: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_payload_is_plain_base64() {
        let payload = base64::engine::general_purpose::STANDARD.encode("pw!123");
        assert_eq!(payload, "cHchMTIz");
    }

    #[test]
    fn copy_and_clear_do_not_error_without_a_tty() {
        // Under `cargo test` stdout is a pipe; the escape bytes just land
        // in the captured output.
        let clipboard = Clipboard::new(0);
        clipboard.copy("secret").unwrap();
        clipboard.clear().unwrap();
    }

    #[test]
    fn deferred_clear_with_zero_delay_completes() {
        let clipboard = Clipboard::new(0);
        clipboard.copy_with_deferred_clear("secret").unwrap();
    }
}
