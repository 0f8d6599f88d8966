use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PetriError, Result};

/// Correction applied to a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelRole {
    Brightfield,
    Fluorescence,
}

impl FromStr for ChannelRole {
    type Err = PetriError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brightfield" | "bf" => Ok(Self::Brightfield),
            "fluorescence" | "fluo" | "fl" => Ok(Self::Fluorescence),
            other => Err(PetriError::Config(format!(
                "Unknown channel role {other:?} (expected brightfield or fluorescence)"
            ))),
        }
    }
}

impl std::fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brightfield => write!(f, "Brightfield"),
            Self::Fluorescence => write!(f, "Fluorescence"),
        }
    }
}

/// Per-channel processing choice made by the operator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Zero-based channel index within the acquisition.
    pub index: usize,
    pub role: ChannelRole,
    /// When false the channel passes through uncorrected.
    #[serde(default = "default_true")]
    pub process: bool,
}

/// Flat-field (illumination) reference for one processed channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlatFieldConfig {
    pub channel: usize,
    /// Reference illumination image, any format the `image` crate decodes.
    pub reference: Option<PathBuf>,
    /// When false (fluorescence only) the channel gets background
    /// subtraction without the flat-field divide.
    #[serde(default = "default_true")]
    pub apply: bool,
}

fn default_true() -> bool {
    true
}

/// Validated channel-to-correction mapping for one batch.
///
/// Built once from operator input; immutable afterwards. Construction
/// enforces the plan invariants, `validate` re-checks them for plans
/// deserialized from a config file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChannelPlan {
    pub channels: Vec<ChannelConfig>,
    #[serde(default)]
    pub flat_fields: Vec<FlatFieldConfig>,
}

impl ChannelPlan {
    pub fn new(channels: Vec<ChannelConfig>, flat_fields: Vec<FlatFieldConfig>) -> Result<Self> {
        let plan = Self {
            channels,
            flat_fields,
        };
        plan.validate()?;
        Ok(plan)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn flat_field_for(&self, channel: usize) -> Option<&FlatFieldConfig> {
        self.flat_fields.iter().find(|ff| ff.channel == channel)
    }

    /// Check the plan invariants.
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(PetriError::Config("Plan contains no channels".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for ch in &self.channels {
            if !seen.insert(ch.index) {
                return Err(PetriError::Config(format!(
                    "Channel index {} configured twice",
                    ch.index
                )));
            }
        }

        let brightfield_count = self
            .channels
            .iter()
            .filter(|ch| ch.role == ChannelRole::Brightfield)
            .count();
        if brightfield_count > 1 {
            return Err(PetriError::Config(
                "Only one channel can be marked as Brightfield".into(),
            ));
        }

        if !self.channels.iter().any(|ch| ch.process) {
            return Err(PetriError::Config(
                "At least one channel must be selected for processing".into(),
            ));
        }

        for ff in &self.flat_fields {
            let Some(ch) = self.channels.iter().find(|ch| ch.index == ff.channel) else {
                return Err(PetriError::Config(format!(
                    "Flat-field entry targets unknown channel {}",
                    ff.channel
                )));
            };
            if !ch.process {
                return Err(PetriError::Config(format!(
                    "Flat-field entry targets unprocessed channel {}",
                    ff.channel
                )));
            }
            let has_reference = ff
                .reference
                .as_ref()
                .map_or(false, |p| !p.as_os_str().is_empty());
            if ff.apply && !has_reference {
                return Err(PetriError::Config(format!(
                    "Missing flat-field image path for channel {}",
                    ff.channel + 1
                )));
            }
        }

        Ok(())
    }

    /// Flat-field reference paths claimed by more than one channel.
    ///
    /// The caller must get operator confirmation for these before
    /// processing starts; sharing a reference is occasionally intentional.
    pub fn duplicate_flat_field_paths(&self) -> Vec<(PathBuf, Vec<usize>)> {
        let mut by_path: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
        for ff in &self.flat_fields {
            if !ff.apply {
                continue;
            }
            if let Some(path) = &ff.reference {
                by_path.entry(path.clone()).or_default().push(ff.channel);
            }
        }
        by_path
            .into_iter()
            .filter(|(_, channels)| channels.len() > 1)
            .collect()
    }
}
