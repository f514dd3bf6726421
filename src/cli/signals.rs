//! Interactive control input for the record and play commands
//!
//! Merges Ctrl+C and Enter presses on stdin into one event stream.

use std::io::BufRead;

use colored::Colorize;
use tokio::sync::mpsc;

/// A user control action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// A line was entered on stdin
    Enter,
    /// Ctrl+C (SIGINT)
    Interrupt,
}

/// Receiver of user control events
pub struct ControlEvents {
    receiver: mpsc::UnboundedReceiver<ControlEvent>,
}

impl ControlEvents {
    /// Start listening for Ctrl+C and Enter.
    ///
    /// Must be called from within a tokio runtime.
    pub fn listen() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let tx_int = tx.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                eprintln!();
                eprintln!("{} Received Ctrl+C", "↓".cyan());
                if tx_int.send(ControlEvent::Interrupt).is_err() {
                    break;
                }
            }
        });

        // Outside the runtime so shutdown never waits on a pending read
        let spawned = std::thread::Builder::new()
            .name("voice-memos-stdin".into())
            .spawn(move || forward_lines(std::io::stdin().lock(), &tx));
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "stdin listener unavailable; only Ctrl+C works");
        }

        Self { receiver: rx }
    }

    /// Build from an existing channel
    pub fn from_receiver(receiver: mpsc::UnboundedReceiver<ControlEvent>) -> Self {
        Self { receiver }
    }

    /// Wait for the next event
    pub async fn recv(&mut self) -> Option<ControlEvent> {
        self.receiver.recv().await
    }
}

/// Send one `Enter` per line read until EOF or the receiver goes away
fn forward_lines(input: impl BufRead, tx: &mpsc::UnboundedSender<ControlEvent>) {
    for line in input.lines() {
        if line.is_err() || tx.send(ControlEvent::Enter).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_line_is_one_enter() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        forward_lines("\n\nfoo\n".as_bytes(), &tx);

        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event, ControlEvent::Enter);
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        forward_lines("a\nb\n".as_bytes(), &tx);
    }

    #[tokio::test]
    async fn from_receiver_yields_events() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut events = ControlEvents::from_receiver(rx);
        tx.send(ControlEvent::Interrupt).unwrap();
        assert_eq!(events.recv().await, Some(ControlEvent::Interrupt));
        drop(tx);
        assert_eq!(events.recv().await, None);
    }
}
