use std::io;
use std::sync::Mutex;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Activate buffering. While active, log lines and `warn` calls are stored
/// instead of printed to stderr.
pub fn activate() {
    if let Ok(mut guard) = BUFFER.lock() {
        *guard = Some(Vec::new());
    }
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    BUFFER
        .lock()
        .ok()
        .and_then(|mut guard| guard.take())
        .unwrap_or_default()
}

/// Write a warning message. If buffering is active the message is stored;
/// otherwise it is printed to stderr immediately.
pub fn warn(msg: String) {
    let mut guard = match BUFFER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// `tracing` writer that hands each formatted event to `warn` on drop, so log
/// output never lands on a terminal the TUI is drawing on.
#[derive(Default)]
pub struct BufferedWriter {
    line: Vec<u8>,
}

impl io::Write for BufferedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.line.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for BufferedWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.line);
        let text = text.trim_end();
        if !text.is_empty() {
            warn(text.to_string());
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct MakeBufferedWriter;

impl<'a> MakeWriter<'a> for MakeBufferedWriter {
    type Writer = BufferedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferedWriter::default()
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` for this
/// crate and `warn` is the default.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "acroscore=debug"
    } else {
        "acroscore=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(false)
        .with_writer(MakeBufferedWriter)
        .try_init();
}
