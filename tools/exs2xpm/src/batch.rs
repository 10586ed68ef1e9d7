//! Batch and single-file conversion
//!
//! Output layout, one directory per instrument:
//!
//! ```text
//! output/
//! └── MyInstrument/
//!     ├── MyInstrument.xpm
//!     ├── Sample1.WAV
//!     └── Sample2.WAV
//! ```
//!
//! The MPC only finds samples sitting next to the program file.

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use exs24::{
    DrumHeuristic, Instrument, ProgramClassifier, ProgramKind, instrument_name, load_exs,
};
use mpc_xpm::ProgramType;

use crate::error::{ConvertError, Result};
use crate::project::{Projection, project};
use crate::samples::SampleIndex;

/// Inputs for a conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Root searched for `.exs` files
    pub search_path: PathBuf,
    /// Root receiving one directory per instrument
    pub output_path: PathBuf,
    /// Root searched for samples, defaults to `search_path`
    pub samples_path: Option<PathBuf>,
    /// Zones per instrument before a key range is split
    pub layers_per_instrument: usize,
    /// Log failures and continue instead of aborting the batch
    pub skip_errors: bool,
    /// Forced program type, `None` to classify each file
    pub program_type: Option<ProgramType>,
    pub classifier: DrumHeuristic,
    /// Worker threads; `None` or 1 converts sequentially
    pub jobs: Option<usize>,
}

impl ConvertOptions {
    pub fn new(search_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            search_path: search_path.into(),
            output_path: output_path.into(),
            samples_path: None,
            layers_per_instrument: 4,
            skip_errors: true,
            program_type: None,
            classifier: DrumHeuristic::default(),
            jobs: None,
        }
    }

    /// Directory the sample index is built from
    pub fn samples_root(&self) -> &Path {
        self.samples_path.as_deref().unwrap_or(&self.search_path)
    }

    /// Program type for one decoded instrument
    pub fn resolve_program_type(&self, instrument: &Instrument) -> ProgramType {
        if let Some(program_type) = self.program_type {
            return program_type;
        }
        let program_type = match self.classifier.classify(instrument) {
            ProgramKind::Drum => ProgramType::Drum,
            ProgramKind::Keygroup => ProgramType::Keygroup,
        };
        debug!("Detected {} program: {}", program_type, instrument.name);
        program_type
    }
}

/// One successfully written program
#[derive(Debug, Clone)]
pub struct Converted {
    pub source: PathBuf,
    pub name: String,
    pub program_type: ProgramType,
    pub instruments: usize,
    pub samples: usize,
    /// Path of the written `.xpm`
    pub output: PathBuf,
}

/// A file that was skipped
#[derive(Debug, Clone)]
pub struct Failure {
    pub source: PathBuf,
    pub reason: String,
}

/// Outcome of [`convert_all`]
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub converted: Vec<Converted>,
    pub failed: Vec<Failure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

/// All `.exs` files under `root`, in file-name order per directory
pub fn find_exs_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_exs = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("exs"));
        if is_exs {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// A discovered file and, when its instrument name is already taken, the
/// earlier file that owns the output directory
#[derive(Debug, Clone)]
struct Planned {
    path: PathBuf,
    claimed_by: Option<PathBuf>,
}

/// Pair each file with the first earlier file sharing its instrument name
///
/// Every output directory then has exactly one writer, so conversions never
/// touch each other's files, whichever order they run in.
fn plan_outputs(files: &[PathBuf]) -> Vec<Planned> {
    let mut owners: HashMap<String, &PathBuf> = HashMap::new();
    files
        .iter()
        .map(|path| {
            let claimed_by = match owners.entry(instrument_name(path)) {
                Entry::Occupied(first) => Some((*first.get()).clone()),
                Entry::Vacant(slot) => {
                    slot.insert(path);
                    None
                }
            };
            Planned {
                path: path.clone(),
                claimed_by,
            }
        })
        .collect()
}

fn run_planned(planned: &Planned, options: &ConvertOptions, index: &SampleIndex) -> Result<Converted> {
    match &planned.claimed_by {
        Some(first) => Err(ConvertError::DuplicateName {
            name: instrument_name(&planned.path),
            first: first.clone(),
        }),
        None => convert_file(&planned.path, options, index),
    }
}

/// Convert every `.exs` file under the search path
///
/// The sample index is built once before any file is converted. A file
/// whose instrument name was already used by an earlier file fails with
/// [`ConvertError::DuplicateName`]. With `skip_errors` a failing file is
/// logged and recorded in the report; otherwise the first failure (in
/// discovery order) is returned.
pub fn convert_all(options: &ConvertOptions) -> Result<BatchReport> {
    let files = find_exs_files(&options.search_path)?;
    if files.is_empty() {
        return Err(ConvertError::NoExsFiles(options.search_path.clone()));
    }
    info!("Found {} EXS files", files.len());
    let planned = plan_outputs(&files);

    let index = SampleIndex::build(options.samples_root())?;
    info!(
        "Indexed {} files under {}",
        index.len(),
        options.samples_root().display()
    );

    let results: Vec<(PathBuf, Result<Converted>)> = match options.jobs {
        Some(jobs) if jobs > 1 => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
            pool.install(|| {
                planned
                    .par_iter()
                    .map(|p| (p.path.clone(), run_planned(p, options, &index)))
                    .collect()
            })
        }
        _ => {
            let mut results = Vec::with_capacity(planned.len());
            for p in &planned {
                let result = run_planned(p, options, &index);
                let failed = result.is_err();
                results.push((p.path.clone(), result));
                if failed && !options.skip_errors {
                    break;
                }
            }
            results
        }
    };

    let mut report = BatchReport::default();
    for (source, result) in results {
        match result {
            Ok(converted) => {
                info!(
                    "Converted {} as {} program",
                    converted.name, converted.program_type
                );
                report.converted.push(converted);
            }
            Err(e) if options.skip_errors => {
                warn!("Skipping {}: {}", source.display(), e);
                report.failed.push(Failure {
                    source,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}

/// Decode, project and write a single file
pub fn convert_file(path: &Path, options: &ConvertOptions, index: &SampleIndex) -> Result<Converted> {
    debug!("Processing {}", path.display());
    let instrument = load_exs(path)?;
    let program_type = options.resolve_program_type(&instrument);
    let projection = project(
        &instrument,
        program_type,
        options.layers_per_instrument,
        index,
    )?;

    let dest_dir = options.output_path.join(&projection.name);
    let output = write_program(&projection, &dest_dir)?;

    Ok(Converted {
        source: path.to_path_buf(),
        name: projection.name.clone(),
        program_type,
        instruments: projection.instrument_count(),
        samples: projection.copies.len(),
        output,
    })
}

/// Copy samples and save the program into `dest_dir`
///
/// If anything fails and this call created `dest_dir`, the directory is
/// removed again so no partial instrument is left behind.
pub fn write_program(projection: &Projection, dest_dir: &Path) -> Result<PathBuf> {
    let created = !dest_dir.exists();
    fs::create_dir_all(dest_dir).map_err(ConvertError::io(dest_dir))?;

    let result = write_contents(projection, dest_dir);
    if result.is_err() && created {
        debug!("Rolling back {}", dest_dir.display());
        if let Err(e) = fs::remove_dir_all(dest_dir) {
            warn!("Failed to remove {}: {}", dest_dir.display(), e);
        }
    }
    result
}

fn write_contents(projection: &Projection, dest_dir: &Path) -> Result<PathBuf> {
    for copy in &projection.copies {
        copy.copy_into(dest_dir)?;
    }
    let path = dest_dir.join(format!("{}.xpm", projection.name));
    projection.program.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::SampleCopy;
    use mpc_xpm::MpcvObject;

    #[test]
    fn test_find_exs_files_sorted_any_case() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Kits");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("b.exs"), b"").unwrap();
        fs::write(dir.path().join("a.EXS"), b"").unwrap();
        fs::write(nested.join("c.exs"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let files = find_exs_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        // "Kits" sorts before lowercase names and is walked depth-first
        assert_eq!(names, vec!["c.exs", "a.EXS", "b.exs"]);
    }

    #[test]
    fn test_convert_all_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions::new(dir.path(), dir.path().join("out"));

        assert!(matches!(
            convert_all(&options),
            Err(ConvertError::NoExsFiles(_))
        ));
    }

    #[test]
    fn test_write_program_rolls_back_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("Broken");
        let projection = Projection {
            name: "Broken".to_string(),
            program_type: ProgramType::Keygroup,
            program: MpcvObject::new(ProgramType::Keygroup, "Broken"),
            copies: vec![SampleCopy::new(&dir.path().join("gone.wav"))],
        };

        assert!(write_program(&projection, &dest).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_write_program_keeps_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("Existing");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("keep.txt"), b"keep").unwrap();
        let projection = Projection {
            name: "Existing".to_string(),
            program_type: ProgramType::Keygroup,
            program: MpcvObject::new(ProgramType::Keygroup, "Existing"),
            copies: vec![SampleCopy::new(&dir.path().join("gone.wav"))],
        };

        assert!(write_program(&projection, &dest).is_err());
        assert!(dest.join("keep.txt").exists());
    }

    #[test]
    fn test_write_program_success() {
        let dir = tempfile::tempdir().unwrap();
        let sample = dir.path().join("ride.wav");
        fs::write(&sample, b"RIFF").unwrap();
        let dest = dir.path().join("out").join("Ride");
        let projection = Projection {
            name: "Ride".to_string(),
            program_type: ProgramType::Drum,
            program: MpcvObject::new(ProgramType::Drum, "Ride"),
            copies: vec![SampleCopy::new(&sample)],
        };

        let path = write_program(&projection, &dest).unwrap();

        assert_eq!(path, dest.join("Ride.xpm"));
        assert!(path.exists());
        assert!(dest.join("ride.WAV").exists());
    }

    fn write_fixture(dir: &Path, name: &str, sample: &str) {
        use exs24::{Endian, ExsWriter, Group, Sample, Zone};

        let mut writer = ExsWriter::new(Endian::Little);
        writer
            .add_group(&Group::default())
            .add_zone(&Zone {
                key: 60,
                key_low: 60,
                key_high: 60,
                group_index: 0,
                sample_index: 0,
                ..Default::default()
            })
            .add_sample(&Sample {
                name: sample.to_string(),
                file_name: sample.to_string(),
                ..Default::default()
            });
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), writer.finish()).unwrap();
    }

    #[test]
    fn test_plan_outputs_marks_later_same_name() {
        let files = vec![
            PathBuf::from("a/Kit.exs"),
            PathBuf::from("a/Piano.exs"),
            PathBuf::from("b/Kit.EXS"),
        ];
        let planned = plan_outputs(&files);

        assert!(planned[0].claimed_by.is_none());
        assert!(planned[1].claimed_by.is_none());
        assert_eq!(planned[2].claimed_by, Some(PathBuf::from("a/Kit.exs")));
    }

    #[test]
    fn test_parallel_batch_converts_all() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        for (name, sample) in [
            ("Bass.exs", "bass.wav"),
            ("Keys.exs", "keys.wav"),
            ("Lead.exs", "lead.wav"),
        ] {
            write_fixture(&input, name, sample);
            fs::write(input.join(sample), b"RIFF").unwrap();
        }
        let output = dir.path().join("out");
        let mut options = ConvertOptions::new(&input, &output);
        options.jobs = Some(2);

        let report = convert_all(&options).unwrap();

        assert_eq!(report.converted.len(), 3);
        assert!(report.failed.is_empty());
        let names: Vec<_> = report.converted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bass", "Keys", "Lead"]);
        for name in names {
            assert!(output.join(name).join(format!("{name}.xpm")).exists());
        }
    }

    #[test]
    fn test_parallel_batch_same_name_keeps_first_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        write_fixture(&input.join("a"), "Kit.exs", "kick.wav");
        fs::write(input.join("a").join("kick.wav"), b"RIFF").unwrap();
        // Its sample is missing, so this one would fail and roll back
        write_fixture(&input.join("b"), "Kit.exs", "gone.wav");
        let output = dir.path().join("out");
        let mut options = ConvertOptions::new(&input, &output);
        options.jobs = Some(2);

        let report = convert_all(&options).unwrap();

        assert_eq!(report.converted.len(), 1);
        assert!(report.converted[0].source.starts_with(input.join("a")));
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].source.starts_with(input.join("b")));
        assert!(report.failed[0].reason.contains("output name already used"));
        assert!(output.join("Kit").join("Kit.xpm").exists());
        assert!(output.join("Kit").join("kick.WAV").exists());

        options.skip_errors = false;
        assert!(matches!(
            convert_all(&options),
            Err(ConvertError::DuplicateName { name, .. }) if name == "Kit"
        ));
    }

    #[test]
    fn test_forced_program_type_skips_classifier() {
        let mut options = ConvertOptions::new(".", "out");
        options.program_type = Some(ProgramType::Drum);
        assert_eq!(
            options.resolve_program_type(&Instrument::default()),
            ProgramType::Drum
        );

        options.program_type = None;
        assert_eq!(
            options.resolve_program_type(&Instrument::default()),
            ProgramType::Keygroup
        );
    }
}
