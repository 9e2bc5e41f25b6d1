// Thu Jan 16 2026 - Alex

use crate::engine::{Session, WorkerState};
use crate::memory::ProcessIntrospection;
use log::{debug, info};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

struct Shared {
    running: Mutex<bool>,
    wake: Condvar,
    input: AtomicU32,
    state: AtomicU8,
}

/// Background thread that attaches to a host, locks its RAM and publishes the
/// controller input word every cycle.
pub struct PollingWorker {
    shared: Arc<Shared>,
    thread_handle: Option<JoinHandle<()>>,
}

impl PollingWorker {
    pub fn start<P: ProcessIntrospection + 'static>(session: Session<P>) -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            running: Mutex::new(true),
            wake: Condvar::new(),
            input: AtomicU32::new(0),
            state: AtomicU8::new(session.state().as_u8()),
        });

        let worker_shared = shared.clone();
        let handle = thread::Builder::new()
            .name("pad-poller".to_string())
            .spawn(move || PollingWorker::worker_loop(worker_shared, session))?;

        Ok(Self {
            shared,
            thread_handle: Some(handle),
        })
    }

    fn worker_loop<P: ProcessIntrospection + 'static>(shared: Arc<Shared>, mut session: Session<P>) {
        info!("poller started");
        let mut running = shared.running.lock();
        while *running {
            let interval = session.interval();
            shared.wake.wait_for(&mut running, interval);
            if !*running {
                break;
            }

            let before = session.state();
            let input = MutexGuard::unlocked(&mut running, || session.cycle());
            let after = session.state();
            if before != after {
                debug!("state {} -> {}", before, after);
            }

            shared.input.store(input, Ordering::Release);
            shared.state.store(after.as_u8(), Ordering::Release);
        }
        info!("poller stopped");
    }

    /// Most recently published input word.
    pub fn current_input(&self) -> u32 {
        self.shared.input.load(Ordering::Acquire)
    }

    pub fn current_state(&self) -> WorkerState {
        WorkerState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Stops the loop and waits for the cycle in flight to finish.
    pub fn shutdown(&mut self) {
        {
            let mut running = self.shared.running.lock();
            *running = false;
            self.shared.wake.notify_all();
        }
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PollingWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
