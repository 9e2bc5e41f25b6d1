// Thu Jan 16 2026 - Alex

use crate::analysis::{analyze, AnalyzeResult};
use crate::config::Config;
use crate::engine::WorkerState;
use crate::locator::{Attachment, RamLocator};
use crate::memory::{Address, Pid, ProcessIntrospection, RamImage};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

/// RAM base plus what analysis found there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedRam {
    pub base: Address,
    pub result: AnalyzeResult,
}

/// State owned by the polling worker: the attached host and, once analysis
/// succeeds, the locked RAM.
pub struct Session<P: ProcessIntrospection + 'static> {
    locator: RamLocator<P>,
    attachment: Option<Attachment<P::Handle>>,
    ram: Option<LockedRam>,
}

impl<P: ProcessIntrospection + 'static> Session<P> {
    pub fn new(introspection: Arc<P>, config: Config) -> Self {
        Self {
            locator: RamLocator::new(introspection, config),
            attachment: None,
            ram: None,
        }
    }

    pub fn state(&self) -> WorkerState {
        match (&self.attachment, &self.ram) {
            (None, _) => WorkerState::Searching,
            (Some(_), None) => WorkerState::LocatingRam,
            (Some(_), Some(_)) => WorkerState::Extracting,
        }
    }

    pub fn config(&self) -> &Config {
        self.locator.config()
    }

    /// How long to wait before the next cycle.
    pub fn interval(&self) -> Duration {
        match self.state() {
            WorkerState::Searching => self.config().search_interval(),
            WorkerState::LocatingRam => self.config().locate_interval(),
            WorkerState::Extracting => self.config().extract_interval(),
        }
    }

    pub fn pid(&self) -> Option<Pid> {
        self.attachment.as_ref().map(|a| a.pid)
    }

    pub fn locked_ram(&self) -> Option<&LockedRam> {
        self.ram.as_ref()
    }

    /// Runs the action for the current state and returns the value to
    /// publish, 0 when no input was read.
    pub fn cycle(&mut self) -> u32 {
        match self.state() {
            WorkerState::Searching => {
                self.search();
                0
            }
            WorkerState::LocatingRam => {
                self.locate_ram();
                0
            }
            WorkerState::Extracting => self.extract(),
        }
    }

    pub fn reset(&mut self) {
        self.ram = None;
        self.attachment = None;
    }

    fn search(&mut self) {
        match self.locator.find_host() {
            Ok(found) => self.attachment = found,
            Err(e) => warn!("process enumeration failed: {}", e),
        }
    }

    fn host_alive(&self) -> bool {
        self.attachment
            .as_ref()
            .is_some_and(|a| self.locator.introspection().is_alive(&a.handle))
    }

    fn locate_ram(&mut self) {
        if !self.host_alive() {
            info!("host process exited");
            self.reset();
            return;
        }
        let Some(attachment) = self.attachment.as_ref() else {
            return;
        };
        let base = match self.locator.locate(attachment) {
            Ok(Some(base)) => base,
            Ok(None) => return,
            Err(e) => {
                warn!("RAM search in pid {} failed: {}", attachment.pid, e);
                return;
            }
        };

        let introspection = self.locator.introspection();
        let image = match RamImage::capture(
            introspection,
            &attachment.handle,
            base,
            self.config().ram_words(),
        ) {
            Ok(image) => image,
            Err(e) => {
                warn!("RAM capture at {} failed: {}", base, e);
                return;
            }
        };

        match analyze(&image) {
            Ok(result) => {
                info!("RAM locked at {}: {}", base, result);
                self.ram = Some(LockedRam { base, result });
            }
            Err(e) => debug!("analysis at {} found nothing: {}", base, e),
        }
    }

    fn extract(&mut self) -> u32 {
        if !self.host_alive() {
            info!("host process exited");
            self.reset();
            return 0;
        }
        let (Some(attachment), Some(ram)) = (self.attachment.as_ref(), self.ram.as_ref()) else {
            return 0;
        };
        let introspection = self.locator.introspection();

        let window_at = ram.base + ram.result.window_byte_offset();
        let live = match introspection.read_words(&attachment.handle, window_at, ram.result.window_len()) {
            Ok(words) => words,
            Err(e) => {
                warn!("verification read failed: {}", e);
                self.ram = None;
                return 0;
            }
        };
        if !ram.result.verify(&live) {
            info!("verification window changed, relocating RAM");
            self.ram = None;
            return 0;
        }

        let input_at = ram.base + ram.result.input_offset as u64;
        introspection
            .read_u32(&attachment.handle, input_at)
            .unwrap_or_else(|e| {
                debug!("input read failed: {}", e);
                0
            })
    }
}
