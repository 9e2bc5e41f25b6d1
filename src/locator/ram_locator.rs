// Wed Jan 15 2026 - Alex

use crate::config::{Config, HostConfig, StrategyKind};
use crate::locator::{LocatorError, MagicProbe, ModuleScan, RamLocationStrategy, RegionScan};
use crate::memory::{Address, Pid, ProcessIntrospection};
use log::{debug, info};
use std::sync::Arc;

/// An open, read-only handle on a recognised host process.
pub struct Attachment<H> {
    pub pid: Pid,
    pub handle: H,
    pub host: HostConfig,
}

pub struct RamLocator<P: ProcessIntrospection> {
    introspection: Arc<P>,
    config: Config,
}

impl<P: ProcessIntrospection + 'static> RamLocator<P> {
    pub fn new(introspection: Arc<P>, config: Config) -> Self {
        Self {
            introspection,
            config,
        }
    }

    pub fn introspection(&self) -> &P {
        &self.introspection
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// First running process whose image name is a configured host.
    pub fn find_host(&self) -> Result<Option<Attachment<P::Handle>>, LocatorError> {
        for pid in self.introspection.enumerate_process_ids()? {
            let Some(handle) = self.introspection.open_for_read(pid) else {
                continue;
            };
            let Some(name) = self.introspection.main_module_name(&handle) else {
                continue;
            };
            if let Some(host) = self.config.host_for(&name) {
                info!("attached to {} (pid {})", name, pid);
                return Ok(Some(Attachment {
                    pid,
                    handle,
                    host: host.clone(),
                }));
            }
        }
        Ok(None)
    }

    pub fn strategy_for(&self, host: &HostConfig) -> Result<Box<dyn RamLocationStrategy<P>>, LocatorError> {
        let probe = MagicProbe::from_config(&self.config).with_offset(host.probe_offset);
        match host.strategy {
            StrategyKind::RegionScan => Ok(Box::new(RegionScan::new(probe))),
            StrategyKind::ModuleScan => {
                let filter = host
                    .module_filter
                    .as_deref()
                    .ok_or_else(|| LocatorError::MissingModuleFilter {
                        host: host.process_name.clone(),
                    })?;
                Ok(Box::new(
                    ModuleScan::new(probe, filter).with_step(self.config.module_scan_step),
                ))
            }
        }
    }

    /// Runs the strategy selected by the attached host.
    pub fn locate(&self, attachment: &Attachment<P::Handle>) -> Result<Option<Address>, LocatorError> {
        let strategy = self.strategy_for(&attachment.host)?;
        let found = strategy.locate(self.introspection.as_ref(), &attachment.handle)?;
        match found {
            Some(base) => debug!("{}: RAM candidate at {}", strategy.name(), base),
            None => debug!("{}: no RAM candidate in pid {}", strategy.name(), attachment.pid),
        }
        Ok(found)
    }
}
