//! Conversion lifecycle: run state, bounded history, and notices.

use std::fs;
use std::path::Path;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::blob;
use crate::converter;
use crate::model::{ConversionOptions, ConversionResult, Notice, NoticeKind, SourceFile};
use crate::progress::{merge_progress, ConversionEvent};

/// How many past results the recent-conversions panel keeps around.
const HISTORY_LIMIT: usize = 5;

/// Snapshot of the conversion lifecycle, read by the UI each frame.
#[derive(Default)]
pub struct ConversionState {
    /// Whether a run is in flight
    pub is_converting: bool,
    /// Percent complete for the current run (0.0 to 100.0)
    pub progress: f32,
    /// Result of the most recent successful run, until cleared
    pub last_result: Option<ConversionResult>,
    /// Past results, most recent first, at most `HISTORY_LIMIT` entries
    pub history: Vec<ConversionResult>,
}

/// Owns [`ConversionState`] and the channel back from the running task.
///
/// All mutation of the state goes through here: the UI only reads the
/// snapshot and calls the operations below on user interaction.
pub struct ConversionManager {
    runtime: Handle,
    state: ConversionState,
    events: Option<UnboundedReceiver<ConversionEvent>>,
    notices: Vec<Notice>,
}

impl ConversionManager {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            state: ConversionState::default(),
            events: None,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    /// Starts a simulated conversion of `file` on the shared runtime.
    ///
    /// A request made while another run is in flight is rejected with a
    /// notice and leaves all state untouched; there is no queueing and no
    /// cancellation.
    pub fn start_conversion(&mut self, file: &SourceFile, options: ConversionOptions) {
        if self.state.is_converting {
            log::warn!("conversion of {} rejected: another run is in flight", file.name);
            self.notify(
                NoticeKind::Error,
                "Conversion already running",
                "Wait for the current conversion to finish before starting another.",
            );
            return;
        }

        log::info!(
            "converting {} ({} bytes) at {} quality",
            file.name,
            file.size_bytes,
            options.quality.name()
        );
        self.state.is_converting = true;
        self.state.progress = 0.0;

        let (tx, rx) = unbounded_channel();
        self.events = Some(rx);

        let file = file.clone();
        self.runtime.spawn(async move {
            let progress_tx = tx.clone();
            let outcome = converter::convert_video_to_mp3(&file, options, move |p| {
                let _ = progress_tx.send(ConversionEvent::Progress(p));
            })
            .await;
            let _ = tx.send(match outcome {
                Ok(result) => ConversionEvent::Finished(result),
                Err(e) => ConversionEvent::Failed(e.to_string()),
            });
        });
    }

    /// Drains pending events from the conversion task. Called once per frame.
    pub fn poll(&mut self) {
        let mut pending = Vec::new();
        if let Some(rx) = self.events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                pending.push(event);
            }
        }
        for event in pending {
            match event {
                ConversionEvent::Progress(p) => {
                    self.state.progress = merge_progress(self.state.progress, p);
                }
                ConversionEvent::Finished(result) => self.finish(result),
                ConversionEvent::Failed(message) => self.fail(message),
            }
        }
    }

    fn finish(&mut self, result: ConversionResult) {
        log::info!("conversion finished: {} ({} bytes)", result.filename, result.size_bytes);
        self.state.is_converting = false;
        self.state.progress = 100.0;
        self.events = None;
        self.notify(
            NoticeKind::Success,
            "Conversion Complete",
            &format!("{} is ready to download.", result.filename),
        );
        self.state.last_result = Some(result.clone());
        self.state.history.insert(0, result);
        while self.state.history.len() > HISTORY_LIMIT {
            if let Some(evicted) = self.state.history.pop() {
                blob::release(&evicted.handle);
            }
        }
    }

    fn fail(&mut self, message: String) {
        log::error!("conversion failed: {message}");
        self.state.is_converting = false;
        self.events = None;
        self.notify(
            NoticeKind::Error,
            "Conversion Failed",
            &format!("There was an error converting your file: {message}"),
        );
    }

    /// Asks the user where to save `result` and writes the payload there.
    ///
    /// Pure side effect: run state, last result, and history are untouched.
    /// A cancelled dialog does nothing; a handle that no longer resolves or
    /// a write error surfaces an error notice.
    pub fn download_result(&mut self, result: &ConversionResult) {
        let Some(payload) = blob::resolve(&result.handle) else {
            self.notify(
                NoticeKind::Error,
                "Download unavailable",
                "This result has been cleared and can no longer be saved.",
            );
            return;
        };
        let Some(target) = rfd::FileDialog::new()
            .set_file_name(&result.filename)
            .save_file()
        else {
            return;
        };
        match save_payload(&target, &payload) {
            Ok(()) => {
                log::info!("saved {} to {}", result.filename, target.display());
                self.notify(
                    NoticeKind::Success,
                    "Download saved",
                    &format!("Written to {}", target.display()),
                );
            }
            Err(e) => {
                log::error!("saving {} failed: {e}", target.display());
                self.notify(
                    NoticeKind::Error,
                    "Download failed",
                    &format!("Could not write the file: {e}"),
                );
            }
        }
    }

    /// Releases the last result's download handle and clears it from state.
    pub fn clear_result(&mut self) {
        if let Some(result) = self.state.last_result.take() {
            blob::release(&result.handle);
        }
    }

    /// Queues a user-facing notice; the UI drains these once per frame.
    pub fn notify(&mut self, kind: NoticeKind, title: &str, detail: &str) {
        self.notices.push(Notice {
            kind,
            title: title.to_string(),
            detail: detail.to_string(),
        });
    }

    /// Hands all queued notices to the caller.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

/// Writes a downloaded payload to disk.
fn save_payload(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    fs::write(path, payload)
}
