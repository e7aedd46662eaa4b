//! Turning key presses into barcodes.
//!
//! A scan arrives as one key press per character followed by a press of the
//! terminator key. [`BarcodeDecoder::read_barcode`] consumes events until it
//! sees that terminator and hands back the characters collected so far:
//!
//! ```text
//! Idle --press--> Accumulating --terminator--> Complete
//!   |                  |
//!   +----- more than max_length characters ---> Overflowed
//!   +----- cancel predicate true --------------> Cancelled
//! ```
//!
//! Releases, autorepeats, non-key events and key code 0 are ignored.

use std::time::Duration;

use derive_more::{Display, Into};
use tracing::{debug, trace, warn};

use crate::config::ScannerConfig;
use crate::constants::{MAX_BARCODE_LEN, TERMINATOR_CODE};
use crate::device::InputDevice;
use crate::error::{ScannerError, ScannerResult};
use crate::event::RawInputEvent;
use crate::handle::ScannerHandle;
use crate::keycodes::keycode_to_char;

/// How long a cancellable read waits for an event before checking the
/// cancel predicate again.
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Predicate polled before every read; returning `true` stops the read.
pub type Cancel<'a> = Option<&'a dyn Fn() -> bool>;

/// A complete barcode. Owned by the caller.
#[derive(Debug, Display, Into, Clone, PartialEq, Eq, Hash)]
pub struct Barcode(String);

impl Barcode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for Barcode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Outcome of feeding a single event to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep reading.
    Continue,
    /// The terminator was pressed.
    Complete,
    /// The character did not fit.
    Overflow,
}

/// Decodes the key presses of a scanner handle into barcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeDecoder {
    terminator_code: u16,
    max_length: usize,
}

impl Default for BarcodeDecoder {
    fn default() -> Self {
        BarcodeDecoder::new(TERMINATOR_CODE, MAX_BARCODE_LEN)
    }
}

impl BarcodeDecoder {
    pub fn new(terminator_code: u16, max_length: usize) -> Self {
        BarcodeDecoder {
            terminator_code,
            max_length,
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        BarcodeDecoder::new(config.terminator_code, config.max_length)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Apply one event to `buffer`.
    pub fn feed(&self, buffer: &mut String, event: &RawInputEvent) -> Step {
        if !event.is_key_press() {
            return Step::Continue;
        }
        if event.code == self.terminator_code {
            return Step::Complete;
        }
        if event.code == 0 {
            return Step::Continue;
        }
        if buffer.len() >= self.max_length {
            return Step::Overflow;
        }

        let c = keycode_to_char(event.code);
        trace!("Char: {} ({:#04x})", c, event.code);
        buffer.push(c);
        Step::Continue
    }

    /// Read events until a whole barcode has been scanned.
    ///
    /// Returns `Ok(None)` once `cancel` returns `true`. The predicate is
    /// checked before every read; while it is supplied, reads wait at most
    /// [`CANCEL_POLL_INTERVAL`] so a pending cancel is noticed even if the
    /// scanner stays silent. Without a predicate the call blocks until the
    /// terminator arrives.
    ///
    /// On [`ScannerError::BufferOverflow`] the characters read so far are
    /// dropped; the rest of the oversized scan is still pending on the device
    /// (see [`BarcodeDecoder::discard_until_terminator`]).
    #[tracing::instrument(skip(self, cancel))]
    pub fn read_barcode<D: InputDevice>(
        &self,
        handle: &mut ScannerHandle<D>,
        cancel: Cancel<'_>,
    ) -> ScannerResult<Option<Barcode>> {
        let mut buffer = String::with_capacity(self.max_length.min(MAX_BARCODE_LEN));

        loop {
            let event = match next_event(handle, cancel)? {
                Some(event) => event,
                None => {
                    debug!("Barcode read cancelled.");
                    return Ok(None);
                }
            };

            match self.feed(&mut buffer, &event) {
                Step::Continue => {}
                Step::Complete => {
                    debug!("Read barcode {:?}.", buffer);
                    return Ok(Some(Barcode(buffer)));
                }
                Step::Overflow => {
                    warn!("Barcode buffer full, discarding {:?}.", buffer);
                    return Err(ScannerError::BufferOverflow {
                        capacity: self.max_length,
                    });
                }
            }
        }
    }

    /// Drop events up to and including the next terminator press.
    ///
    /// Returns `Ok(false)` if cancelled first.
    #[tracing::instrument(skip(self, cancel))]
    pub fn discard_until_terminator<D: InputDevice>(
        &self,
        handle: &mut ScannerHandle<D>,
        cancel: Cancel<'_>,
    ) -> ScannerResult<bool> {
        while let Some(event) = next_event(handle, cancel)? {
            if event.is_key_press() && event.code == self.terminator_code {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Next event, or `None` when cancelled.
fn next_event<D: InputDevice>(
    handle: &mut ScannerHandle<D>,
    cancel: Cancel<'_>,
) -> ScannerResult<Option<RawInputEvent>> {
    let timeout = cancel.map(|_| CANCEL_POLL_INTERVAL);
    loop {
        if let Some(cancel) = cancel {
            if cancel() {
                return Ok(None);
            }
        }
        if let Some(event) = handle.next_event(timeout)? {
            return Ok(Some(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EV_KEY, KEY_REPEATED};

    fn feed_all(decoder: &BarcodeDecoder, events: &[RawInputEvent]) -> (String, Vec<Step>) {
        let mut buffer = String::new();
        let steps = events.iter().map(|e| decoder.feed(&mut buffer, e)).collect();
        (buffer, steps)
    }

    #[test]
    fn test_feed_collects_pressed_characters() {
        let decoder = BarcodeDecoder::default();
        let events = [
            RawInputEvent::key_press(0x1e),
            RawInputEvent::key_press(0x2d),
            RawInputEvent::key_press(0x32),
            RawInputEvent::key_press(28),
        ];

        let (buffer, steps) = feed_all(&decoder, &events);

        assert_eq!(buffer, "axm");
        assert_eq!(steps.last(), Some(&Step::Complete));
    }

    #[test]
    fn test_feed_ignores_non_presses() {
        let decoder = BarcodeDecoder::default();
        let events = [
            RawInputEvent::sync(),
            RawInputEvent::key_release(0x02),
            RawInputEvent::new(EV_KEY, 0x02, KEY_REPEATED),
            RawInputEvent::new(0x04, 0x02, 1),
            RawInputEvent::key_press(0),
            RawInputEvent::key_release(28),
        ];

        let (buffer, steps) = feed_all(&decoder, &events);

        assert!(buffer.is_empty());
        assert!(steps.iter().all(|s| *s == Step::Continue));
    }

    #[test]
    fn test_feed_maps_unknown_codes_to_sentinel() {
        let decoder = BarcodeDecoder::default();
        let (buffer, _) = feed_all(&decoder, &[RawInputEvent::key_press(0x39)]);
        assert_eq!(buffer, "-");
    }

    #[test]
    fn test_feed_overflows_on_fifteenth_character() {
        let decoder = BarcodeDecoder::default();
        let events = vec![RawInputEvent::key_press(0x02); 15];

        let (buffer, steps) = feed_all(&decoder, &events);

        assert_eq!(buffer.len(), 14);
        assert!(steps[..14].iter().all(|s| *s == Step::Continue));
        assert_eq!(steps[14], Step::Overflow);
    }

    #[test]
    fn test_feed_honours_custom_terminator() {
        let decoder = BarcodeDecoder::new(0x0f, 4);
        let mut buffer = String::new();

        assert_eq!(decoder.feed(&mut buffer, &RawInputEvent::key_press(28)), Step::Continue);
        assert_eq!(decoder.feed(&mut buffer, &RawInputEvent::key_press(0x0f)), Step::Complete);
        assert_eq!(buffer, "-");
    }

    #[test]
    fn test_unbounded_length_reads_short_barcode() {
        let decoder = BarcodeDecoder::new(TERMINATOR_CODE, usize::MAX);
        let mut buffer = String::new();

        assert_eq!(decoder.feed(&mut buffer, &RawInputEvent::key_press(0x02)), Step::Continue);
        assert_eq!(decoder.feed(&mut buffer, &RawInputEvent::key_press(28)), Step::Complete);
        assert_eq!(buffer, "1");
    }

    #[test]
    fn test_barcode_compares_with_str() {
        let barcode = Barcode("4006381333931".to_string());
        assert_eq!(barcode, "4006381333931");
        assert_eq!(barcode.as_str(), "4006381333931");
        assert_eq!(String::from(barcode), "4006381333931");
    }
}
