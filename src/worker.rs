//! Request/response worker on a dedicated thread
//!
//! Both directions go through capacity-1 channels. Callers are expected to
//! alternate `write` and `read`. Without a `read` in between, writes still
//! go through until the pipeline is full: one output waiting to be read,
//! one input held by the worker while it blocks on sending its result, and
//! one input queued. Only then does `write` block. Outputs come back in
//! input order.

use std::{
    sync::mpsc::{Receiver, SyncSender, sync_channel},
    thread::JoinHandle,
};

use log::*;

use crate::{Error, Result};

pub struct Worker<I, O> {
    name: String,
    input: Option<SyncSender<I>>,
    output: Option<Receiver<O>>,
    join_handle: Option<JoinHandle<()>>,
}

impl<I, O> Worker<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Spawn a thread named `name` that maps every input through `process`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerSpawn`] if the thread cannot be created.
    pub fn spawn<F>(name: impl Into<String>, mut process: F) -> Result<Self>
    where
        F: FnMut(I) -> O + Send + 'static,
    {
        let name = name.into();
        let (input_tx, input_rx) = sync_channel::<I>(1);
        let (output_tx, output_rx) = sync_channel::<O>(1);

        let thread_name = name.clone();
        let handle = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                debug!("Worker '{thread_name}' started");
                while let Ok(input) = input_rx.recv() {
                    if output_tx.send(process(input)).is_err() {
                        break;
                    }
                }
                debug!("Worker '{thread_name}' exited");
            })
            .map_err(|source| Error::WorkerSpawn {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            input: Some(input_tx),
            output: Some(output_rx),
            join_handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hand one input to the worker.
    ///
    /// Blocks only while another input is already queued, which happens
    /// once two earlier outputs are still unread.
    pub fn write(&self, input: I) -> Result<()> {
        self.input
            .as_ref()
            .ok_or_else(|| self.disconnected())?
            .send(input)
            .map_err(|_| self.disconnected())
    }

    /// Wait for the oldest unread output.
    ///
    /// After several writes this is the result of the earliest of them, not
    /// of the most recent one.
    pub fn read(&self) -> Result<O> {
        self.output
            .as_ref()
            .ok_or_else(|| self.disconnected())?
            .recv()
            .map_err(|_| self.disconnected())
    }

    /// Close both channels and wait for the thread to finish its current
    /// cycle. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerPanicked`] if the processing function panicked.
    pub fn stop(&mut self) -> Result<()> {
        self.input.take();
        self.output.take();

        if let Some(handle) = self.join_handle.take() {
            if handle.join().is_err() {
                return Err(Error::WorkerPanicked {
                    name: self.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn disconnected(&self) -> Error {
        Error::WorkerDisconnected {
            name: self.name.clone(),
        }
    }
}

impl<I, O> Drop for Worker<I, O> {
    fn drop(&mut self) {
        self.input.take();
        self.output.take();

        if let Some(handle) = self.join_handle.take() {
            if let Err(panic_payload) = handle.join() {
                if std::thread::panicking() {
                    error!("Worker '{}' panicked (during unwind)", self.name);
                } else {
                    std::panic::resume_unwind(panic_payload);
                }
            }
        }
    }
}
