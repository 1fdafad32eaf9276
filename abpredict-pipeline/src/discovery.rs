//! Locating genomes and annotation outputs on disk

use crate::error::PipelineResult;
use crate::tasks::{file_stem, Bgc, Genome};
use abpredict_core::AbpredictError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn glob_files(pattern: &str) -> PipelineResult<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|e| AbpredictError::InvalidInput(format!("bad glob '{}': {}", pattern, e)))?;
    let mut files: Vec<PathBuf> = paths.flatten().filter(|p| p.is_file()).collect();
    files.sort();
    Ok(files)
}

/// Genome assemblies matching `pattern`; directories are ignored
pub fn discover_genomes(pattern: &str) -> PipelineResult<Vec<Genome>> {
    Ok(glob_files(pattern)?
        .into_iter()
        .map(Genome::from_path)
        .collect())
}

/// Files matching `pattern` under `<data_dir>/<genome>/<sub_folder>/`, keyed by
/// genome folder name. Files named after the genome itself are whole-genome
/// outputs and are left out.
pub fn discover_data_files(
    data_dir: &Path,
    sub_folder: &str,
    pattern: &str,
) -> PipelineResult<BTreeMap<String, Vec<PathBuf>>> {
    AbpredictError::require_exists(data_dir)?;

    let mut found = BTreeMap::new();
    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let genome = entry.file_name().to_string_lossy().into_owned();
        let base = entry.path().join(sub_folder);
        if !base.is_dir() {
            continue;
        }

        let full = format!(
            "{}/{}",
            glob::Pattern::escape(&base.to_string_lossy()),
            pattern
        );
        let files: Vec<PathBuf> = glob_files(&full)?
            .into_iter()
            .filter(|f| file_stem(f) != genome)
            .collect();

        if !files.is_empty() {
            found.insert(genome, files);
        }
    }

    Ok(found)
}

/// `<data>/<genome>/antismash/*.gbk`
pub fn discover_bgcs(data_dir: &Path) -> PipelineResult<BTreeMap<String, Vec<Bgc>>> {
    Ok(discover_data_files(data_dir, "antismash", "*.gbk")?
        .into_iter()
        .map(|(genome, files)| {
            let bgcs = files.into_iter().map(|f| Bgc::new(genome.clone(), f)).collect();
            (genome, bgcs)
        })
        .collect())
}

/// `<data>/<genome>/rgi/**/*.txt`
pub fn discover_query_markers(data_dir: &Path) -> PipelineResult<BTreeMap<String, Vec<PathBuf>>> {
    discover_data_files(data_dir, "rgi", "**/*.txt")
}
