//! Extract command implementation.

use std::io::{self, Write};

use anyhow::{Context, Result};

use runtime::PipelineOrchestrator;
use tts_core::{AggregatedBody, AppConfig};

/// Run the extract command: print the normalized text and page statistics.
pub fn run(config: &AppConfig, filename: &str) -> Result<()> {
    let orchestrator = PipelineOrchestrator::from_config(config);
    let paths = orchestrator.resolve(filename)?;

    let body = orchestrator
        .extractor()
        .extract(&paths.input)
        .with_context(|| format!("failed to extract {}", paths.input.display()))?;

    write_body(&mut io::stdout().lock(), &body)?;
    Ok(())
}

fn write_body<W: Write>(out: &mut W, body: &AggregatedBody) -> io::Result<()> {
    writeln!(out, "{}", body.text)?;
    writeln!(out)?;
    writeln!(
        out,
        "Pages: {} of {} used, {} characters",
        body.pages_used,
        body.total_pages,
        body.char_count()
    )?;
    for failure in &body.failures {
        writeln!(out, "  skipped page {}: {}", failure.page, failure.reason)?;
    }
    Ok(())
}
