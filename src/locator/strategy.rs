// Wed Jan 15 2026 - Alex

use crate::locator::{LocatorError, MagicProbe};
use crate::memory::{Address, ProcessIntrospection};
use log::debug;

/// One way of finding the RAM mirror inside an attached host.
pub trait RamLocationStrategy<P: ProcessIntrospection>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Base of the RAM mirror, or `None` when nothing matched this time.
    fn locate(&self, introspection: &P, handle: &P::Handle) -> Result<Option<Address>, LocatorError>;
}

/// Probes the base of each region that could back the RAM mirror.
#[derive(Debug, Clone)]
pub struct RegionScan {
    probe: MagicProbe,
}

impl RegionScan {
    pub fn new(probe: MagicProbe) -> Self {
        Self { probe }
    }
}

impl<P: ProcessIntrospection> RamLocationStrategy<P> for RegionScan {
    fn name(&self) -> &'static str {
        "region-scan"
    }

    fn locate(&self, introspection: &P, handle: &P::Handle) -> Result<Option<Address>, LocatorError> {
        let regions = introspection.list_memory_regions(handle)?;
        let candidates: Vec<Address> = regions
            .iter()
            .filter(|r| r.protection().may_hold_ram())
            .map(|r| r.base())
            .collect();
        debug!("{} of {} regions may hold RAM", candidates.len(), regions.len());

        Ok(candidates
            .into_iter()
            .find(|&base| self.probe.test(introspection, handle, base)))
    }
}

/// Probes every `step` bytes inside the first loaded module whose name
/// contains `filter`.
#[derive(Debug, Clone)]
pub struct ModuleScan {
    probe: MagicProbe,
    filter: String,
    step: u64,
}

impl ModuleScan {
    pub const DEFAULT_STEP: u64 = 0x1000;

    pub fn new(probe: MagicProbe, filter: &str) -> Self {
        Self {
            probe,
            filter: filter.to_ascii_lowercase(),
            step: Self::DEFAULT_STEP,
        }
    }

    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }
}

impl<P: ProcessIntrospection> RamLocationStrategy<P> for ModuleScan {
    fn name(&self) -> &'static str {
        "module-scan"
    }

    fn locate(&self, introspection: &P, handle: &P::Handle) -> Result<Option<Address>, LocatorError> {
        let modules = introspection.list_loaded_modules(handle)?;
        let Some(module) = modules
            .iter()
            .find(|m| m.name_lowercase().contains(&self.filter))
        else {
            debug!("no module matching {:?} among {}", self.filter, modules.len());
            return Ok(None);
        };
        debug!("scanning {}", module);

        Ok(module
            .base
            .stride(module.end(), self.step)
            .find(|&addr| self.probe.test(introspection, handle, addr)))
    }
}
