//! Batch conversion: find statement files, parse each, write exports.

use anyhow::{Context, Result, bail};
use mutasi_core::Statement;
use mutasi_ingest::{ParseOptions, parse_bca_bytes};
use mutasi_report::{ExportFormat, export, reconcile};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const STATEMENT_EXTENSIONS: [&str; 2] = ["txt", "pdf"];

fn is_statement_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| STATEMENT_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("read dir {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if is_statement_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Expand directories recursively to their .txt/.pdf files and drop
/// duplicates, keeping first-seen order. Plain file arguments are kept even
/// when missing so the caller reports them.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for p in paths {
        if p.is_dir() {
            walk(p, &mut found)?;
        } else if is_statement_file(p) || !p.exists() {
            found.push(p.clone());
        } else {
            warn!(path = %p.display(), "skipping file that is not .txt or .pdf");
        }
    }

    let mut seen = HashSet::new();
    found.retain(|p| seen.insert(fs::canonicalize(p).unwrap_or_else(|_| p.clone())));
    Ok(found)
}

/// Read and parse one text statement.
pub async fn load_statement(path: &Path, opts: &ParseOptions) -> Result<Statement> {
    if path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
    {
        bail!("PDF input needs converting to text first (e.g. pdftotext -layout)");
    }
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    Ok(parse_bca_bytes(&bytes, opts))
}

/// Export target directory: the configured one, else the input's own folder.
pub fn output_dir(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string())
}

/// Convert one file, returning the first written path and the row count.
pub async fn convert_one(
    input: &Path,
    format: ExportFormat,
    out_dir: Option<&Path>,
    opts: &ParseOptions,
) -> Result<(PathBuf, usize)> {
    let st = load_statement(input, opts).await?;
    if st.transactions.is_empty() {
        bail!("no transactions found (is this a BCA statement?)");
    }

    // mismatches are logged, not fatal
    let recon = reconcile(&st);
    debug!(path = %input.display(), clean = recon.is_clean(), "reconciled");

    let dir = output_dir(input, out_dir);
    let written = export(&st, format, &dir, &file_stem(input))
        .with_context(|| format!("export to {}", dir.display()))?;
    let first = written
        .into_iter()
        .next()
        .with_context(|| format!("nothing written for {}", input.display()))?;
    Ok((first, st.transactions.len()))
}

/// Run the batch and print one OK:/ERROR: line per file plus a DONE: tally.
/// Returns the number of failures.
pub async fn run_convert(
    inputs: &[PathBuf],
    format: ExportFormat,
    out_dir: Option<&Path>,
    opts: &ParseOptions,
) -> usize {
    let mut ok = 0usize;
    let mut failed = 0usize;

    for input in inputs {
        match convert_one(input, format, out_dir, opts).await {
            Ok((written, rows)) => {
                ok += 1;
                println!("OK: {} -> {} ({} transactions)", input.display(), written.display(), rows);
            }
            Err(e) => {
                failed += 1;
                println!("ERROR: {}: {:#}", input.display(), e);
            }
        }
    }

    println!("DONE: {ok} succeeded, {failed} failed");
    failed
}
