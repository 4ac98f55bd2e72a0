//! Display state machine: the edited total and its edit operations.
//!
//! The buffer is the local source of truth. Every operation that actually
//! changes the buffer commits the change and pushes the parsed value to the
//! connection manager; operations that leave the buffer untouched notify
//! nobody, so the backend never sees duplicate values for a no-op.
//!
//! Buffer invariants: non-empty, at most one decimal point, a leading zero is
//! replaced rather than prefixed, and the contents always parse to a
//! non-negative finite number.

use crate::connection::ConnectionHandle;

/// Upper bound on the buffer length. The source of a register total is a
/// human on a keypad; sixteen characters is beyond any real ticket and keeps
/// the numeric string inside exact `f64` territory.
pub const MAX_DISPLAY_LEN: usize = 16;

/// The numeric display buffer and its connection to the backend mirror.
#[derive(Debug)]
pub struct DisplayState {
    buffer: String,
    conn: ConnectionHandle,
}

impl DisplayState {
    pub fn new(conn: ConnectionHandle) -> Self {
        Self {
            buffer: "0".to_string(),
            conn,
        }
    }

    /// The currently edited decimal string, exactly as displayed.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Parsed numeric value of the buffer.
    ///
    /// The edit operations cannot produce an unparseable buffer, but a bad
    /// parse is normalized to zero for transmission rather than disturbing
    /// the visible buffer.
    pub fn total(&self) -> f64 {
        self.buffer
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0)
    }

    /// Append a digit; a lone "0" is replaced instead of extended.
    pub fn append_digit(&mut self, digit: u8) {
        if digit > 9 {
            log::warn!("ignoring out-of-range digit {digit}");
            return;
        }
        if self.buffer.len() >= MAX_DISPLAY_LEN {
            return;
        }
        let ch = char::from(b'0' + digit);
        let next = if self.buffer == "0" {
            ch.to_string()
        } else {
            let mut next = self.buffer.clone();
            next.push(ch);
            next
        };
        self.commit(next);
    }

    /// Append the decimal point; no-op when one is already present.
    pub fn append_decimal_point(&mut self) {
        if self.buffer.contains('.') || self.buffer.len() >= MAX_DISPLAY_LEN {
            return;
        }
        let mut next = self.buffer.clone();
        next.push('.');
        self.commit(next);
    }

    /// Remove the last character; a single-character buffer resets to "0".
    pub fn backspace(&mut self) {
        let next = if self.buffer.len() <= 1 {
            "0".to_string()
        } else {
            let mut next = self.buffer.clone();
            next.pop();
            next
        };
        self.commit(next);
    }

    /// Reset the buffer to "0".
    pub fn clear(&mut self) {
        self.commit("0".to_string());
    }

    /// Adopt `next` and push the new total iff the buffer changed.
    fn commit(&mut self, next: String) {
        if next == self.buffer {
            return;
        }
        self.buffer = next;
        self.conn.send(self.total());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::manager::ConnectionCommand;
    use tokio::sync::mpsc::error::TryRecvError;

    fn harness() -> (
        DisplayState,
        tokio::sync::mpsc::UnboundedReceiver<ConnectionCommand>,
    ) {
        let (handle, cmd_rx, _status_tx) = ConnectionHandle::test_pair();
        (DisplayState::new(handle), cmd_rx)
    }

    fn sent_totals(
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<ConnectionCommand>,
    ) -> Vec<f64> {
        let mut totals = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            match cmd {
                ConnectionCommand::Send(total) => totals.push(total),
                other => panic!("unexpected command: {other:?}"),
            }
        }
        totals
    }

    #[test]
    fn digit_entry_builds_decimal_total() {
        let (mut display, mut rx) = harness();

        display.append_digit(5);
        assert_eq!(display.buffer(), "5");
        display.append_digit(2);
        assert_eq!(display.buffer(), "52");
        display.append_decimal_point();
        assert_eq!(display.buffer(), "52.");
        display.append_digit(5);
        assert_eq!(display.buffer(), "52.5");

        assert_eq!(sent_totals(&mut rx), vec![5.0, 52.0, 52.0, 52.5]);
    }

    #[test]
    fn leading_zero_is_replaced_not_prefixed() {
        let (mut display, _rx) = harness();

        display.append_digit(0);
        assert_eq!(display.buffer(), "0");
        display.append_digit(7);
        assert_eq!(display.buffer(), "7");
    }

    #[test]
    fn second_decimal_point_is_a_silent_noop() {
        let (mut display, mut rx) = harness();

        display.append_digit(3);
        display.append_decimal_point();
        let before = sent_totals(&mut rx).len();

        display.append_decimal_point();
        assert_eq!(display.buffer(), "3.");
        // No send for the no-op
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
        assert_eq!(before, 2);
    }

    #[test]
    fn backspace_on_single_char_resets_to_zero() {
        let (mut display, mut rx) = harness();

        display.append_digit(7);
        display.backspace();
        assert_eq!(display.buffer(), "0");
        assert_eq!(sent_totals(&mut rx), vec![7.0, 0.0]);

        // Further backspaces leave the buffer (and the wire) alone
        display.backspace();
        assert_eq!(display.buffer(), "0");
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn backspace_trims_multi_char_buffer() {
        let (mut display, _rx) = harness();

        display.append_digit(1);
        display.append_digit(2);
        display.append_decimal_point();
        display.backspace();
        assert_eq!(display.buffer(), "12");
        display.backspace();
        assert_eq!(display.buffer(), "1");
    }

    #[test]
    fn clear_resets_unconditionally() {
        let (mut display, mut rx) = harness();

        display.append_digit(9);
        display.append_digit(9);
        display.clear();
        assert_eq!(display.buffer(), "0");
        assert_eq!(sent_totals(&mut rx), vec![9.0, 99.0, 0.0]);

        // Clearing an already-clear display changes nothing and sends nothing
        display.clear();
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn clear_then_sequence_matches_fresh_start() {
        let (mut display, _rx) = harness();
        display.append_digit(4);
        display.append_decimal_point();
        display.append_digit(2);
        display.clear();

        display.append_digit(8);
        display.append_decimal_point();
        display.append_digit(1);

        let (mut fresh, _rx2) = harness();
        fresh.append_digit(8);
        fresh.append_decimal_point();
        fresh.append_digit(1);

        assert_eq!(display.buffer(), fresh.buffer());
    }

    #[test]
    fn buffer_length_is_bounded() {
        let (mut display, _rx) = harness();
        for _ in 0..40 {
            display.append_digit(9);
        }
        assert_eq!(display.buffer().len(), MAX_DISPLAY_LEN);

        display.append_decimal_point();
        assert_eq!(display.buffer().len(), MAX_DISPLAY_LEN);
    }

    #[test]
    fn out_of_range_digit_is_ignored() {
        let (mut display, mut rx) = harness();
        display.append_digit(10);
        assert_eq!(display.buffer(), "0");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn total_parses_the_buffer() {
        let (mut display, _rx) = harness();
        assert_eq!(display.total(), 0.0);

        display.append_digit(5);
        display.append_digit(2);
        display.append_decimal_point();
        display.append_digit(5);
        assert_eq!(display.total(), 52.5);

        // Trailing decimal point still parses
        let (mut other, _rx2) = harness();
        other.append_digit(3);
        other.append_decimal_point();
        assert_eq!(other.total(), 3.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Digit(u8),
            Decimal,
            Backspace,
            Clear,
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..=9).prop_map(Op::Digit),
                Just(Op::Decimal),
                Just(Op::Backspace),
                Just(Op::Clear),
            ]
        }

        fn apply(display: &mut DisplayState, op: &Op) {
            match op {
                Op::Digit(d) => display.append_digit(*d),
                Op::Decimal => display.append_decimal_point(),
                Op::Backspace => display.backspace(),
                Op::Clear => display.clear(),
            }
        }

        proptest! {
            #[test]
            fn buffer_invariants_hold(ops in proptest::collection::vec(op_strategy(), 0..64)) {
                let (mut display, _rx) = harness();
                for op in &ops {
                    apply(&mut display, op);

                    let buffer = display.buffer();
                    prop_assert!(!buffer.is_empty());
                    prop_assert!(buffer.len() <= MAX_DISPLAY_LEN);
                    prop_assert!(buffer.matches('.').count() <= 1);
                    prop_assert!(!buffer.starts_with("00"));

                    let parsed = buffer.parse::<f64>();
                    prop_assert!(parsed.is_ok());
                    let value = parsed.unwrap();
                    prop_assert!(value.is_finite() && value >= 0.0);
                }
            }

            #[test]
            fn every_send_matches_the_buffer_parse(
                ops in proptest::collection::vec(op_strategy(), 0..32)
            ) {
                let (mut display, mut rx) = harness();
                for op in &ops {
                    apply(&mut display, op);
                    if let Ok(cmd) = rx.try_recv() {
                        match cmd {
                            ConnectionCommand::Send(total) => {
                                prop_assert_eq!(total, display.total());
                            }
                            other => prop_assert!(false, "unexpected command: {:?}", other),
                        }
                    }
                }
            }
        }
    }
}
