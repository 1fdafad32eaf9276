//! Resistance marker calling with RGI

use crate::command::{ToolCommand, ToolResult};
use crate::traits::MarkerCaller;
use abpredict_core::config::ToolsConfig;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct RgiCaller {
    program: String,
    extra_args: Vec<String>,
}

impl RgiCaller {
    pub fn new(program: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            extra_args,
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(config.rgi.clone(), config.rgi_args.clone())
    }

    /// `rgi main` writes `<prefix>.txt` next to its other outputs
    pub fn table_path(genome: &Path, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.txt", genome_stem(genome)))
    }

    pub fn command(&self, genome: &Path, output_dir: &Path) -> ToolCommand {
        ToolCommand::new(self.program.clone())
            .arg("main")
            .arg("--input_sequence")
            .arg(genome)
            .arg("--output_file")
            .arg(output_dir.join(genome_stem(genome)))
            .args(&self.extra_args)
            .expect_output(Self::table_path(genome, output_dir))
    }
}

fn genome_stem(genome: &Path) -> String {
    genome
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl MarkerCaller for RgiCaller {
    fn call_markers(&self, genome: &Path, output_dir: &Path) -> ToolResult<PathBuf> {
        std::fs::create_dir_all(output_dir)?;
        let cmd = self.command(genome, output_dir);
        cmd.run()?;

        info!("Called markers for {}", genome.display());
        Ok(Self::table_path(genome, output_dir))
    }

    fn name(&self) -> &str {
        "rgi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_line() {
        let caller = RgiCaller::from_config(&ToolsConfig::default());
        let cmd = caller.command(Path::new("/g/genome_a.fna"), Path::new("/out/genome_a/markers"));

        assert_eq!(
            cmd.command_line(),
            "rgi main --input_sequence /g/genome_a.fna --output_file /out/genome_a/markers/genome_a --input_type contig --clean"
        );
        assert_eq!(
            cmd.output_path(),
            Some(Path::new("/out/genome_a/markers/genome_a.txt"))
        );
    }

    #[test]
    fn test_custom_program_and_args() {
        let caller = RgiCaller::new("/opt/rgi/bin/rgi", vec!["--low_quality".to_string()]);
        let cmd = caller.command(Path::new("g.fa"), Path::new("out"));
        assert_eq!(cmd.program(), "/opt/rgi/bin/rgi");
        assert!(cmd.command_line().ends_with("--low_quality"));
    }
}
