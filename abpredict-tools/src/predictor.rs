//! BGC function prediction through an external script

use crate::command::{ToolCommand, ToolResult};
use crate::traits::FunctionPredictor;
use abpredict_core::config::ToolsConfig;
use std::path::Path;
use tracing::info;

pub struct ScriptPredictor {
    program: String,
}

impl ScriptPredictor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(config.predictor.clone())
    }

    /// The script takes the SSN switch as a literal `True`/`False` argument
    pub fn command(&self, genome: &Path, output_dir: &Path, no_ssn: bool) -> ToolCommand {
        ToolCommand::new(self.program.clone())
            .arg(genome)
            .arg(output_dir)
            .arg(if no_ssn { "True" } else { "False" })
    }
}

impl FunctionPredictor for ScriptPredictor {
    fn predict(&self, genome: &Path, output_dir: &Path, no_ssn: bool) -> ToolResult<()> {
        std::fs::create_dir_all(output_dir)?;
        self.command(genome, output_dir, no_ssn).run()?;
        info!("Predicted BGC functions for {}", genome.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "predict-function"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_line() {
        let predictor = ScriptPredictor::from_config(&ToolsConfig::default());
        let cmd = predictor.command(
            Path::new("/g/genome_a.fna"),
            Path::new("/out/genome_a/function_prediction"),
            false,
        );

        assert_eq!(
            cmd.command_line(),
            "predict_function.sh /g/genome_a.fna /out/genome_a/function_prediction False"
        );
        assert_eq!(cmd.output_path(), None);
    }

    #[test]
    fn test_no_ssn_flag() {
        let predictor = ScriptPredictor::new("/opt/predict/run.sh");
        let cmd = predictor.command(Path::new("g.fna"), Path::new("out"), true);
        assert_eq!(cmd.program(), "/opt/predict/run.sh");
        assert!(cmd.command_line().ends_with(" True"));
    }
}
