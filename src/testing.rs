//! Test helpers shared across modules.

use std::io;
use std::sync::{Arc, Mutex};

/// Collects formatted `tracing` output.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a scoped subscriber and returns the WARN lines it logged.
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    let warnings = output
        .lines()
        .filter(|line| line.contains("WARN"))
        .map(str::to_string)
        .collect();
    (result, warnings)
}
