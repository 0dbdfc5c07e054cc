use anyhow::{Context, Result};

/// Default number of attempts an evaluation gets before it is failed.
pub const DEFAULT_MAX_SCHEDULE_ATTEMPTS: u32 = 5;

/// Datacenter used for jobs that don't name any.
pub const DEFAULT_DATACENTER: &str = "dc1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Attempts per evaluation before giving up.
    pub max_schedule_attempts: u32,

    /// Datacenters searched for ready nodes when a job names none.
    pub default_datacenters: Vec<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_schedule_attempts: DEFAULT_MAX_SCHEDULE_ATTEMPTS,
            default_datacenters: vec![DEFAULT_DATACENTER.to_string()],
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("CONVOY_MAX_SCHEDULE_ATTEMPTS") {
            config.max_schedule_attempts = raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid CONVOY_MAX_SCHEDULE_ATTEMPTS: {raw:?}"))?;
        }

        if let Some(raw) = lookup("CONVOY_DATACENTERS") {
            let dcs: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|dc| !dc.is_empty())
                .map(String::from)
                .collect();
            if !dcs.is_empty() {
                config.default_datacenters = dcs;
            }
        }

        Ok(config)
    }
}
