// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How the RAM mirror is found inside a host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Probe the base of every qualifying virtual-memory region.
    RegionScan,
    /// Probe every step inside one named loaded module.
    ModuleScan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    pub process_name: String,
    pub strategy: StrategyKind,
    #[serde(default)]
    pub module_filter: Option<String>,
    #[serde(default)]
    pub probe_offset: u64,
}

impl HostConfig {
    pub fn region_scan(process_name: &str) -> Self {
        Self {
            process_name: process_name.to_string(),
            strategy: StrategyKind::RegionScan,
            module_filter: None,
            probe_offset: 0,
        }
    }

    pub fn module_scan(process_name: &str, module_filter: &str) -> Self {
        Self {
            process_name: process_name.to_string(),
            strategy: StrategyKind::ModuleScan,
            module_filter: Some(module_filter.to_string()),
            probe_offset: 0,
        }
    }

    pub fn with_probe_offset(mut self, offset: u64) -> Self {
        self.probe_offset = offset;
        self
    }

    /// Case-insensitive match against a process image name.
    pub fn matches(&self, name: &str) -> bool {
        self.process_name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hosts: Vec<HostConfig>,
    pub search_interval_ms: u64,
    pub locate_interval_ms: u64,
    pub extract_interval_ms: u64,
    pub ram_size: u32,
    pub module_scan_step: u64,
    pub magic_value: u32,
    pub magic_mask: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: vec![
                HostConfig::region_scan("project64.exe"),
                HostConfig::module_scan("retroarch.exe", "parallel_n64"),
                HostConfig::module_scan("retroarch", "parallel_n64"),
            ],
            search_interval_ms: 1000,
            locate_interval_ms: 1000,
            extract_interval_ms: 15,
            ram_size: 0x40_0000,
            module_scan_step: 0x1000,
            magic_value: 0x3C1A_8000,
            magic_mask: 0xFFFF_F000,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_hosts(mut self, hosts: Vec<HostConfig>) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn with_intervals(mut self, search_ms: u64, locate_ms: u64, extract_ms: u64) -> Self {
        self.search_interval_ms = search_ms;
        self.locate_interval_ms = locate_ms;
        self.extract_interval_ms = extract_ms;
        self
    }

    pub fn with_magic(mut self, value: u32, mask: u32) -> Self {
        self.magic_value = value;
        self.magic_mask = mask;
        self
    }

    pub fn search_interval(&self) -> Duration {
        Duration::from_millis(self.search_interval_ms)
    }

    pub fn locate_interval(&self) -> Duration {
        Duration::from_millis(self.locate_interval_ms)
    }

    pub fn extract_interval(&self) -> Duration {
        Duration::from_millis(self.extract_interval_ms)
    }

    pub fn ram_words(&self) -> usize {
        self.ram_size as usize / 4
    }

    pub fn host_for(&self, name: &str) -> Option<&HostConfig> {
        self.hosts.iter().find(|h| h.matches(name))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::Invalid("at least one host must be configured".to_string()));
        }
        for host in &self.hosts {
            if host.strategy == StrategyKind::ModuleScan && host.module_filter.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "host {} uses module_scan without a module_filter",
                    host.process_name
                )));
            }
        }
        if self.ram_size == 0 || self.ram_size % 4 != 0 {
            return Err(ConfigError::Invalid(format!(
                "ram_size {:#x} must be a nonzero multiple of 4",
                self.ram_size
            )));
        }
        if self.module_scan_step == 0 {
            return Err(ConfigError::Invalid("module_scan_step must be greater than 0".to_string()));
        }
        if self.magic_value & !self.magic_mask != 0 {
            return Err(ConfigError::Invalid("magic_value has bits outside magic_mask".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ram_words(), 0x10_0000);
        assert_eq!(config.extract_interval(), Duration::from_millis(15));
    }

    #[test]
    fn test_host_lookup_ignores_case() {
        let config = Config::default();
        let host = config.host_for("Project64.EXE").unwrap();
        assert_eq!(host.strategy, StrategyKind::RegionScan);
        let ra = config.host_for("retroarch.exe").unwrap();
        assert_eq!(ra.module_filter.as_deref(), Some("parallel_n64"));
        assert!(config.host_for("mupen64plus").is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "extract_interval_ms": 5 }"#).unwrap();
        assert_eq!(config.extract_interval_ms, 5);
        assert_eq!(config.search_interval_ms, 1000);
        assert_eq!(config.hosts.len(), 3);
    }

    #[test]
    fn test_validate_rejects() {
        assert!(Config::new().with_hosts(Vec::new()).validate().is_err());
        assert!(Config::new().with_magic(0x3C1A_8001, 0xFFFF_F000).validate().is_err());

        let mut bad = HostConfig::module_scan("retroarch.exe", "x");
        bad.module_filter = None;
        assert!(Config::new().with_hosts(vec![bad]).validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::new().with_intervals(10, 20, 1);
        let back: Config = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
