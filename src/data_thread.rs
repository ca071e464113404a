//! Background worker that re-runs the filter whenever the host changes a
//! setting.
//!
//! Requests are latest-wins: [`send_latest_config`] raises the shared abort
//! flag so a pass that is still running stops early, the worker folds every
//! queued command into one pass, and a result is dropped if another request
//! arrived while it was computed. Only the newest request ever reaches
//! `frame_lock`.

use crate::config::{ConfigCommand, FilterConfig};
use crate::error::{FilterError, FilterResult};
use crate::normalize::DisplayBuffer;
use crate::pipeline::FilterOutput;
use crate::session::Session;
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

/// A published filtering result.
#[derive(Clone, Debug)]
pub struct FilterFrame {
    /// Increases by one with every published frame
    pub generation: u64,
    pub config: FilterConfig,
    pub output: FilterOutput,
}

/// Shared handles between the host and the worker.
#[derive(Clone)]
pub struct ThreadCommunication {
    pub config_tx: Sender<ConfigCommand>,
    pub config_rx: Receiver<ConfigCommand>,
    pub abort_flag: Arc<AtomicBool>,
    pub input_lock: Arc<RwLock<Option<DisplayBuffer>>>,
    pub frame_lock: Arc<RwLock<Option<FilterFrame>>>,
}

impl Default for ThreadCommunication {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadCommunication {
    pub fn new() -> Self {
        let (config_tx, config_rx) = crossbeam_channel::unbounded();
        ThreadCommunication {
            config_tx,
            config_rx,
            abort_flag: Arc::new(AtomicBool::new(false)),
            input_lock: Arc::new(RwLock::new(None)),
            frame_lock: Arc::new(RwLock::new(None)),
        }
    }

    /// Most recent published frame.
    pub fn latest_frame(&self) -> Option<FilterFrame> {
        self.frame_lock.read().ok().and_then(|frame| frame.clone())
    }

    /// Display rendering of the currently loaded source.
    pub fn input_display(&self) -> Option<DisplayBuffer> {
        self.input_lock.read().ok().and_then(|img| img.clone())
    }
}

/// Supersedes any in-flight pass and queues `command`.
pub fn send_latest_config(
    thread_communication: &ThreadCommunication,
    command: ConfigCommand,
) -> FilterResult<()> {
    thread_communication
        .abort_flag
        .store(true, Ordering::Relaxed);
    thread_communication
        .config_tx
        .send(command)
        .map_err(|_| FilterError::Disconnected)
}

/// Starts [`main_thread`] on its own thread.
pub fn spawn(thread_communication: ThreadCommunication) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("fft-filter".into())
        .spawn(move || main_thread(thread_communication))
}

/// Worker loop. Returns on [`ConfigCommand::Quit`] or once every sender is gone.
pub fn main_thread(thread_communication: ThreadCommunication) {
    let ThreadCommunication {
        config_tx,
        config_rx,
        abort_flag,
        input_lock,
        frame_lock,
    } = thread_communication;
    // keep only the host's senders alive so the loop ends when they are dropped
    drop(config_tx);

    let mut session = Session::new();
    let mut generation = 0;

    while let Ok(first) = config_rx.recv() {
        let mut dirty = false;
        let mut quit = false;
        for command in std::iter::once(first).chain(config_rx.try_iter()) {
            match command {
                ConfigCommand::Quit => {
                    quit = true;
                    break;
                }
                ConfigCommand::OpenFile(path) => match session.open(&path) {
                    Ok(display) => {
                        if let Ok(mut write_guard) = input_lock.write() {
                            *write_guard = Some(display.clone());
                        }
                        dirty = true;
                    }
                    Err(err) => {
                        log::error!("failed opening {path:?}: {err}");
                    }
                },
                ConfigCommand::LoadRaster(raster) => {
                    let display = session.load(raster);
                    if let Ok(mut write_guard) = input_lock.write() {
                        *write_guard = Some(display.clone());
                    }
                    dirty = true;
                }
                other => dirty |= session.update(&other),
            }
        }
        if quit {
            log::info!("filter thread shutting down");
            break;
        }
        if !dirty {
            continue;
        }

        abort_flag.store(false, Ordering::Relaxed);
        match session.refresh_cancellable(&abort_flag) {
            Ok(Some(output)) => {
                if !config_rx.is_empty() {
                    log::debug!("discarding result superseded by a newer request");
                    continue;
                }
                generation += 1;
                if let Ok(mut write_guard) = frame_lock.write() {
                    *write_guard = Some(FilterFrame {
                        generation,
                        config: *session.config(),
                        output,
                    });
                }
            }
            Ok(None) => {
                log::debug!("no raster loaded, nothing to filter");
            }
            Err(FilterError::Cancelled) => {
                log::debug!("filter pass cancelled by a newer request");
            }
            Err(err) => {
                log::error!("filter pass failed: {err}");
            }
        }
    }
}
