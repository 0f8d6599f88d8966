use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::assemble::{assemble, save_hyperstack};
use crate::consts::{GAUSSIAN_SUFFIX, PROCESSED_SUFFIX};
use crate::correct;
use crate::error::{PetriError, Result};
use crate::io::plane_io::load_reference;
use crate::io::plane_set::discover_plane_sets;
use crate::io::source::AcquisitionUnit;
use crate::plan::ChannelRole;
use crate::plane::{Calibration, Plane};
use crate::staging::StagingStore;

use super::config::BatchConfig;
use super::types::{BatchSummary, PipelineStage, ProgressReporter, SkippedUnit, UnitReport};

enum UnitInput {
    StackFile(PathBuf),
    PlaneSet(crate::io::plane_set::PlaneSet),
}

impl UnitInput {
    fn name(&self) -> String {
        match self {
            Self::StackFile(path) => path.display().to_string(),
            Self::PlaneSet(set) => set.name.clone(),
        }
    }
}

/// Run one preprocessing batch: resolve units from the configured inputs,
/// process each, and report what was written and what was skipped.
///
/// Configuration errors abort before any processing. Once processing has
/// started, a failing unit is logged and skipped and the batch continues;
/// staging cleanup runs for every unit regardless of its outcome.
pub fn run_batch(config: &BatchConfig, reporter: Arc<dyn ProgressReporter>) -> Result<BatchSummary> {
    config.plan.validate()?;
    if config.inputs.is_empty() {
        return Err(PetriError::Config("No input files selected".into()));
    }

    let mut units: Vec<UnitInput> = Vec::new();
    let mut summary = BatchSummary::default();
    for input in &config.inputs {
        if input.is_dir() {
            match discover_plane_sets(input, config.plan.channel_count()) {
                Ok(sets) => units.extend(sets.into_iter().map(UnitInput::PlaneSet)),
                Err(e) => {
                    warn!(input = %input.display(), error = %e, "Cannot scan input directory");
                    summary.skipped.push(SkippedUnit {
                        name: input.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        } else {
            units.push(UnitInput::StackFile(input.clone()));
        }
    }

    let total = units.len();
    for (index, unit) in units.into_iter().enumerate() {
        let name = unit.name();
        reporter.begin_unit(&name, index, total);
        info!(unit = %name, "Processing");
        match process_unit(unit, config, &reporter) {
            Ok(outputs) => summary.processed.push(UnitReport { name, outputs }),
            Err(e) => {
                warn!(unit = %name, error = %e, "Skipping unit");
                summary.skipped.push(SkippedUnit {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

fn process_unit(
    input: UnitInput,
    config: &BatchConfig,
    reporter: &Arc<dyn ProgressReporter>,
) -> Result<Vec<PathBuf>> {
    reporter.begin_stage(PipelineStage::Opening, None);
    let mut unit = match input {
        UnitInput::StackFile(path) => AcquisitionUnit::open_stack(&path)?,
        UnitInput::PlaneSet(set) => AcquisitionUnit::from_plane_set(set),
    };
    reporter.finish_stage();

    if unit.channels() != config.plan.channel_count() {
        return Err(PetriError::InvalidStack(format!(
            "source has {} channels but the plan configures {}",
            unit.channels(),
            config.plan.channel_count()
        )));
    }

    // Load each processed channel's flat-field reference once per unit.
    let mut references: HashMap<usize, Plane> = HashMap::new();
    for ch in &config.plan.channels {
        if !ch.process {
            continue;
        }
        if let Some(ff) = config.plan.flat_field_for(ch.index) {
            if ff.apply {
                let path = ff
                    .reference
                    .as_ref()
                    .ok_or_else(|| PetriError::FlatField("reference path missing".into()))?;
                references.insert(ch.index, load_reference(path)?);
            }
        }
    }

    let out_dir = match &config.output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => unit.dir(),
    };

    let multi_location = unit.locations() > 1;
    let mut outputs = Vec::new();
    for location in 0..unit.locations() {
        let staging = StagingStore::create(&unit.dir())?;
        let result = process_location(
            &mut unit,
            location,
            multi_location,
            config,
            &references,
            &staging,
            &out_dir,
            reporter,
        );

        // Scratch files go away whether or not assembly produced anything.
        reporter.begin_stage(PipelineStage::Cleanup, None);
        staging.cleanup(location);
        staging.remove_dir_if_empty();
        reporter.finish_stage();

        outputs.push(result?);
    }

    Ok(outputs)
}

#[allow(clippy::too_many_arguments)]
fn process_location(
    unit: &mut AcquisitionUnit,
    location: usize,
    multi_location: bool,
    config: &BatchConfig,
    references: &HashMap<usize, Plane>,
    staging: &StagingStore,
    out_dir: &Path,
    reporter: &Arc<dyn ProgressReporter>,
) -> Result<PathBuf> {
    let frames = unit.frames();
    let channel_count = config.plan.channel_count();
    if frames == 0 {
        return Err(PetriError::EmptySequence);
    }

    // Pixel size comes from the first plane of the unit (or the operator
    // override) and is threaded explicitly through every correction.
    let first_index = config.plan.channels[0].index;
    let calibration = match config.pixel_width {
        Some(width) => Calibration::new(
            width,
            config.pixel_unit.clone().unwrap_or_else(|| "um".to_string()),
        ),
        None => unit.read_plane(location, first_index, 0)?.calibration,
    };

    let mut staged: Vec<Vec<PathBuf>> = vec![Vec::with_capacity(frames); channel_count];
    reporter.begin_stage(PipelineStage::Correcting, Some(frames * channel_count));
    let mut done = 0;
    for frame in 1..=frames {
        for (slot, ch) in config.plan.channels.iter().enumerate() {
            let mut plane = unit.read_plane(location, ch.index, frame - 1)?;
            plane.calibration = calibration.clone();

            if ch.process {
                if let Some(reference) = references.get(&ch.index) {
                    plane = correct::flat_field(&plane, reference)?;
                }
                plane = match ch.role {
                    ChannelRole::Brightfield => {
                        let corrected = correct::brightfield(&plane, config.median_radius);
                        match config.gaussian_sigma {
                            Some(sigma) => correct::gaussian(&corrected, sigma),
                            None => corrected,
                        }
                    }
                    ChannelRole::Fluorescence => {
                        correct::fluorescence(&plane, calibration.pixel_width)
                    }
                };
            }

            let path = staging.stage(frame, ch.index, location, &plane)?;
            staged[slot].push(path);
            done += 1;
            reporter.advance(done);
        }
    }
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Assembling, None);
    let hyperstack = assemble(&staged)?;
    reporter.finish_stage();

    let name = output_file_name(
        &unit.stem(),
        config.gaussian_sigma.is_some(),
        multi_location.then_some(location),
    );
    let output_path = out_dir.join(name);

    reporter.begin_stage(PipelineStage::Writing, None);
    save_hyperstack(&hyperstack, &output_path)?;
    info!(
        output = %output_path.display(),
        channels = hyperstack.channels,
        frames = hyperstack.frames,
        "Output saved"
    );
    reporter.finish_stage();

    Ok(output_path)
}

/// Derive the output filename for one unit: the stem plus a suffix encoding
/// which corrections were applied, plus a 1-based location marker for
/// multi-position sources.
pub fn output_file_name(stem: &str, gaussian: bool, location: Option<usize>) -> String {
    let mut name = format!("{stem}_{PROCESSED_SUFFIX}");
    if gaussian {
        name.push('_');
        name.push_str(GAUSSIAN_SUFFIX);
    }
    if let Some(location) = location {
        name.push_str(&format!("_Loc{}", location + 1));
    }
    name.push_str(".tif");
    name
}
