//! Transcode command: load, classify, write.

use anyhow::{Context, Result};

use crate::config::NobgConfig;
use crate::debug;
use crate::image::background::{self, Summary};

/// Run the configured job.
///
/// Prints `Saved transparent logo to <path>` on success, or a pixel summary
/// in dry mode.
pub fn run(config: &NobgConfig) -> Result<()> {
    let input = config.input_path();
    let output = config.output_path();
    let rule = config.rule;

    debug!("rule"; "{} on {}", rule, input.display());

    if config.dry {
        let summary = background::preview(&input, &rule)
            .with_context(|| format!("failed to classify `{}`", input.display()))?;
        println!("{}", describe(&summary));
        return Ok(());
    }

    let summary = background::transcode(&input, &output, &rule)
        .with_context(|| format!("failed to make `{}` transparent", input.display()))?;
    debug!("nobg"; "{}", describe(&summary));

    println!("Saved transparent logo to {}", output.display());
    Ok(())
}

fn describe(summary: &Summary) -> String {
    format!(
        "{}x{}: {} kept, {} cleared",
        summary.width, summary.height, summary.kept, summary.cleared
    )
}
