//! Character-by-character reveal of an assistant message.
//!
//! The answer is already fully received when the reveal starts; this is a
//! presentation effect layered on top of `reveal_pending`. The task is tied
//! to a cancellation token so a consumer that goes away (view closed, Ctrl-C)
//! stops the timer instead of leaking ticks into a dead view.

use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Lower bound of the per-character delay.
const MIN_DELAY_MS: u64 = 10;
/// Upper bound of the per-character delay.
const MAX_DELAY_MS: u64 = 20;

/// Spawns the reveal task for one message and returns the character stream.
///
/// One character is emitted per tick with 10-20 ms randomized jitter until
/// the text is exhausted, then the channel closes. Cancelling the token or
/// dropping the receiver stops the task without further emissions.
///
/// The consumer is expected to call `ChatSession::mark_reveal_complete`
/// exactly once after draining the stream.
pub fn spawn(text: String, cancel: CancellationToken) -> mpsc::UnboundedReceiver<char> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for ch in text.chars() {
            let jitter = rand::thread_rng().gen_range(MIN_DELAY_MS..=MAX_DELAY_MS);
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(Duration::from_millis(jitter)) => {}
            }
            if tx.send(ch).is_err() {
                // Receiver dropped; the consuming view is gone.
                return;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_reveal_emits_every_character_in_order() {
        let text = "FCDS is the faculty.";
        let mut chunks = spawn(text.to_string(), CancellationToken::new());

        let mut revealed = String::new();
        while let Some(ch) = chunks.recv().await {
            revealed.push(ch);
        }

        assert_eq!(revealed, text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_the_stream() {
        let cancel = CancellationToken::new();
        let mut chunks = spawn("a long answer".to_string(), cancel.clone());

        let first = chunks.recv().await;
        assert!(first.is_some());

        cancel.cancel();

        // After cancellation the channel drains and closes; at most one
        // character that was already in flight can still be delivered.
        let mut remaining = 0;
        while chunks.recv().await.is_some() {
            remaining += 1;
        }
        assert!(remaining <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_closes_immediately() {
        let mut chunks = spawn(String::new(), CancellationToken::new());
        assert!(chunks.recv().await.is_none());
    }
}
