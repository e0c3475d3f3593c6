use super::{EditorApp, NativeDialog};
use crate::controller::{Download, DownloadSink};
use crate::image::human_readable_bytes;
use crate::util::write_atomic;
use egui::Context;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

/// Holds the latest export until the user picks where to write it.
#[derive(Debug, Default)]
pub struct SaveQueue {
    queued: Option<Download>,
}

impl SaveQueue {
    pub const fn take(&mut self) -> Option<Download> {
        self.queued.take()
    }
}

impl DownloadSink for SaveQueue {
    fn deliver(&mut self, download: Download) {
        if self.queued.is_some() {
            tracing::debug!("replacing export that was never written");
        }
        self.queued = Some(download);
    }
}

/// Background write of an export picked in the save dialog.
pub struct PendingWrite {
    path: PathBuf,
    byte_len: usize,
    rx: Receiver<Result<(), String>>,
}

impl EditorApp {
    pub(crate) fn open_save_dialog(&mut self, download: Download) {
        let mut dialog = Self::make_save_dialog(&download.file_name, self.last_export_dir.as_deref());
        dialog.save_file();
        self.active_dialog = Some(NativeDialog::Save { dialog, download });
    }

    pub(crate) fn start_export_write(&mut self, path: PathBuf, bytes: Vec<u8>) {
        if self.pending_write.is_some() {
            self.set_status("Save already in progress.");
            return;
        }
        if let Some(dir) = path.parent() {
            self.last_export_dir = Some(dir.to_path_buf());
        }
        let byte_len = bytes.len();
        let (tx, rx) = mpsc::channel();
        let target = path.clone();
        thread::spawn(move || {
            let result = write_atomic(&target, &bytes).map_err(|err| format!("{err:#}"));
            let _ = tx.send(result);
        });
        self.pending_write = Some(PendingWrite { path, byte_len, rx });
        self.set_status("Saving image…");
    }

    pub(crate) fn poll_export_write(&mut self, ctx: &Context) {
        let Some(job) = self.pending_write.take() else {
            return;
        };
        match job.rx.try_recv() {
            Ok(Ok(())) => {
                tracing::info!(path = %job.path.display(), bytes = job.byte_len, "export written");
                self.set_status(format!(
                    "Saved {} ({}).",
                    job.path.display(),
                    human_readable_bytes(u64::try_from(job.byte_len).unwrap_or(u64::MAX))
                ));
            }
            Ok(Err(err)) => {
                tracing::warn!(path = %job.path.display(), %err, "export write failed");
                self.set_status(format!("Save failed: {err}"));
            }
            Err(TryRecvError::Empty) => {
                self.pending_write = Some(job);
                ctx.request_repaint_after(Duration::from_millis(16));
            }
            Err(TryRecvError::Disconnected) => {
                self.set_status("Save failed: writer disconnected.");
            }
        }
    }
}
