//! Implementation of the `scaffai extract` command.

use std::{io::Read as _, path::Path};

use serde::Serialize;
use tracing::instrument;

use scaffai_adapters::{GrammarExtractor, LocalFilesystem};
use scaffai_core::{
    application::{FileExtractor, MaterializeService},
    domain::{ExtractionGrammar, GeneratedFileSet},
};

use crate::{
    cli::{ExtractArgs, ExtractFormat},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct ExtractReport<'a> {
    grammar: Option<ExtractionGrammar>,
    files: Vec<FileEntry<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<&'a Path>,
}

#[derive(Debug, Serialize)]
struct FileEntry<'a> {
    path: &'a str,
    content: &'a str,
}

#[instrument(skip_all)]
pub fn execute(args: ExtractArgs, output: OutputManager) -> CliResult<()> {
    let (source_name, raw) = read_input(args.input.as_deref())?;

    let files = GrammarExtractor::new().extract(&raw);
    if files.is_empty() {
        return Err(CliError::NoFilesExtracted { source_name });
    }

    if let Some(root) = &args.out {
        let report = MaterializeService::new(Box::new(LocalFilesystem::new()))
            .materialize(&files, root)?;
        output.success(&format!(
            "Wrote {} file(s) to {}",
            report.files.len(),
            report.root.display()
        ))?;
    }

    if args.format == ExtractFormat::Json || output.wants_json() {
        output.json(&report(&files, args.out.as_deref()))?;
    } else {
        render_table(&files, &output)?;
    }
    Ok(())
}

fn report<'a>(files: &'a GeneratedFileSet, written_to: Option<&'a Path>) -> ExtractReport<'a> {
    ExtractReport {
        grammar: files.grammar(),
        files: files
            .iter()
            .map(|(path, content)| FileEntry { path, content })
            .collect(),
        written_to,
    }
}

fn render_table(files: &GeneratedFileSet, output: &OutputManager) -> CliResult<()> {
    if let Some(grammar) = files.grammar() {
        output.header(&format!("Extracted {} file(s) from {grammar}:", files.len()))?;
    }
    for (path, content) in files.iter() {
        output.data(&format!(
            "  {path}  {}",
            output.dim(&format!("({} bytes)", content.len()))
        ))?;
    }
    Ok(())
}

/// Read the model output from `path`, or stdin when absent or `-`.
fn read_input(path: Option<&Path>) -> CliResult<(String, String)> {
    match path {
        Some(p) if p != Path::new("-") => {
            let raw = std::fs::read_to_string(p)
                .with_cli_context(|| format!("failed to read '{}'", p.display()))?;
            Ok((p.display().to_string(), raw))
        }
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .with_cli_context(|| "failed to read stdin")?;
            Ok(("stdin".to_string(), raw))
        }
    }
}
