// src/config/subsystems/processor.rs

use serde::{Serialize, Deserialize};
use crate::config::FromIni;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Worker threads for distance evaluation; 0 uses every logical core.
    pub n_jobs: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self { n_jobs: 1 }
    }
}

impl ProcessorConfig {
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    pub fn thread_count(&self) -> usize {
        if self.n_jobs > 0 {
            self.n_jobs
        } else {
            num_cpus::get()
        }
    }
}

impl FromIni for ProcessorConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "processor" {
            return None;
        }

        match key {
            "n_jobs" => {
                // -1 is accepted as "all cores", as in joblib.
                match value.trim_matches('"').parse::<i64>() {
                    Ok(-1) => {
                        self.n_jobs = 0;
                        Some(Ok(()))
                    }
                    Ok(n) if n >= 0 => {
                        self.n_jobs = n as usize;
                        Some(Ok(()))
                    }
                    _ => Some(Err(Error::config(
                        format!("Invalid n_jobs (must be >= 0, or -1 for all cores): {}", value)
                    ))),
                }
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_jobs_parsing() {
        let mut config = ProcessorConfig::default();
        config.from_ini_section("processor", "n_jobs", "4").unwrap().unwrap();
        assert_eq!(config.thread_count(), 4);

        config.from_ini_section("processor", "n_jobs", "-1").unwrap().unwrap();
        assert_eq!(config.n_jobs, 0);
        assert!(config.thread_count() >= 1);

        assert!(config.from_ini_section("processor", "n_jobs", "-3").unwrap().is_err());
    }
}
