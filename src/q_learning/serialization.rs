//! Serialization support for trained TD agents.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::q_learning::{
    agent::{TdAgent, TdAgentState},
    update::UpdateRule,
};

/// Information about the run that produced a saved agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub episodes: usize,
    pub players: usize,
    pub wins: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTdAgent {
    pub version: u32,
    pub rule: UpdateRule,
    state: TdAgentState,
    pub metadata: TrainingMetadata,
}

impl SavedTdAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &TdAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            rule: agent.rule(),
            state: agent.export_state(),
            metadata,
        }
    }

    pub fn to_agent(&self) -> Result<TdAgent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported TD save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        if self.state.rule != self.rule {
            return Err(anyhow!(
                "Saved agent header says {} but its state was trained with {}",
                self.rule,
                self.state.rule
            ));
        }
        Ok(TdAgent::from_state(self.state.clone()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize TD agent")?;
        writer.flush().context("Failed to flush TD agent file")?;

        info!(rule = %self.rule, path = %path.as_ref().display(), "agent saved");
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize TD agent")
    }
}
