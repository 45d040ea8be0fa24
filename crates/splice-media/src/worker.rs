//! Background probe worker.
//!
//! Owns one probe thread. Requests go in tagged with an [`ImportTicket`];
//! completions come back on a channel that the editor session drains each
//! tick. The worker never touches the timeline: whether a completion still
//! matters is decided by the ticket registry on the editor side.

use crossbeam_channel::{unbounded, Receiver, Sender};
use splice_core::{RationalTime, Result, SpliceError};
use splice_timeline::{ImportCompletion, ImportTicket, MediaRef};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

use crate::probe::{probe_or_fallback, Prober};

struct ProbeRequest {
    ticket: ImportTicket,
    path: PathBuf,
}

pub struct ProbeWorker {
    requests: Option<Sender<ProbeRequest>>,
    completions: Receiver<ImportCompletion>,
    handle: Option<JoinHandle<()>>,
}

impl ProbeWorker {
    /// Start the probe thread.
    pub fn spawn<P>(prober: P, fallback_duration: RationalTime) -> Result<Self>
    where
        P: Prober + 'static,
    {
        let (request_tx, request_rx) = unbounded::<ProbeRequest>();
        let (completion_tx, completion_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("splice-probe".into())
            .spawn(move || {
                for request in request_rx {
                    let outcome = probe_or_fallback(&prober, &request.path, fallback_duration);
                    let completion = ImportCompletion {
                        ticket: request.ticket,
                        name: outcome.probe.display_name(),
                        media: MediaRef::new(outcome.probe.path.clone()),
                        duration: outcome.probe.duration,
                        thumbnail: None,
                        fallback: outcome.fallback,
                    };
                    if completion_tx.send(completion).is_err() {
                        // Receiver gone: the session shut down.
                        break;
                    }
                }
                debug!("Probe worker stopped");
            })?;

        info!("Probe worker started");
        Ok(Self {
            requests: Some(request_tx),
            completions: completion_rx,
            handle: Some(handle),
        })
    }

    /// Queue a probe. Fire-and-forget: the result arrives on
    /// [`completions`](Self::completions).
    pub fn submit(&self, ticket: ImportTicket, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        debug!(ticket = %ticket.id, path = %path.display(), "Queueing probe");
        self.requests
            .as_ref()
            .ok_or_else(|| SpliceError::Internal("probe worker is shut down".into()))?
            .send(ProbeRequest { ticket, path })
            .map_err(|_| SpliceError::Internal("probe worker thread exited".into()))
    }

    pub fn completions(&self) -> &Receiver<ImportCompletion> {
        &self.completions
    }

    /// Completions ready right now, without blocking.
    pub fn drain(&self) -> impl Iterator<Item = ImportCompletion> + '_ {
        self.completions.try_iter()
    }
}

impl Drop for ProbeWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the thread's loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
