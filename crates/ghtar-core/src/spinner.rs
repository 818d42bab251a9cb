//! Terminal spinner shown while the archive downloads and unpacks.
//!
//! Runs as its own tokio task and redraws one character in place. It has no
//! data dependency on the work it decorates; the owner stops it with
//! [`Spinner::stop`], which also waits for the task to finish and leaves the
//! line blank, so later output starts clean. Dropping the
//! handle without calling `stop` ends the loop on its next tick.

use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Frames drawn in order, then repeated.
pub const FRAMES: [char; 4] = ['-', '\\', '|', '/'];

/// Written once on stop: blanks the last frame and returns the cursor.
const CLEAR: &str = "\r \r";

/// Smallest accepted frame delay; `tokio::time::interval` rejects zero.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub struct Spinner {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl Spinner {
    /// Starts spinning on stdout. Must be called inside a tokio runtime.
    pub fn start(interval: Duration) -> Self {
        Self::start_with_writer(interval, io::stdout())
    }

    /// Starts spinning on an arbitrary writer.
    pub fn start_with_writer<W>(interval: Duration, mut out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let interval = interval.max(MIN_INTERVAL);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut frames = FRAMES.iter().cycle();
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if let Some(frame) = frames.next() {
                            // Cosmetic only; a closed terminal is not an error.
                            let _ = write!(out, "\r{frame}");
                            let _ = out.flush();
                        }
                    }
                }
            }
            let _ = out.write_all(CLEAR.as_bytes());
            let _ = out.flush();
        });
        Self {
            stop_tx: Some(stop_tx),
            handle,
        }
    }

    /// Signals the task to stop and waits for it.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            tracing::warn!("spinner task ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn frame_order() {
        assert_eq!(FRAMES, ['-', '\\', '|', '/']);
    }

    #[tokio::test]
    async fn draws_frames_in_order_until_stopped() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start_with_writer(Duration::from_millis(5), buf.clone());
        tokio::time::sleep(Duration::from_millis(100)).await;
        spinner.stop().await;

        let out = buf.contents();
        assert!(out.starts_with("\r-\r\\"), "unexpected output {out:?}");
        let out = out
            .strip_suffix(CLEAR)
            .expect("last frame cleared on stop")
            .to_string();
        let expected: String = FRAMES
            .iter()
            .cycle()
            .take(out.len() / 2)
            .map(|c| format!("\r{c}"))
            .collect();
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn nothing_drawn_after_stop() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start_with_writer(Duration::from_millis(2), buf.clone());
        tokio::time::sleep(Duration::from_millis(10)).await;
        spinner.stop().await;
        let len_after_stop = buf.contents().len();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(buf.contents().len(), len_after_stop);
    }

    #[tokio::test]
    async fn zero_interval_is_clamped() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start_with_writer(Duration::ZERO, buf.clone());
        tokio::time::sleep(Duration::from_millis(5)).await;
        spinner.stop().await;
        assert!(buf.contents().starts_with("\r-"));
    }

    #[tokio::test]
    async fn stop_blanks_the_line() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start_with_writer(Duration::from_millis(2), buf.clone());
        tokio::time::sleep(Duration::from_millis(10)).await;
        spinner.stop().await;
        assert!(buf.contents().ends_with("\r \r"));
    }
}
