//! Command-line entrypoint for digesting text files without running a server.
//!
//! `digest run` processes one file and prints the final record as JSON. `digest batch` walks a
//! directory and digests every matching file, optionally writing one JSON file per document.
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use paper_digest::{
    config, logging,
    pipeline::{DigestService, IngestRequest, RunOutcome},
    store::ProcessingRecord,
};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "digest",
    about = "Summarize research papers from extracted text files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Digest a single text file.
    Run {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "cli")]
        owner: String,
    },
    /// Digest every matching file under a directory.
    Batch {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long, default_value = "txt")]
        extension: String,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "cli")]
        owner: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    config::init_config();
    logging::init_tracing_with(logging::ConsoleStream::Stderr);
    let service = DigestService::new();

    match cli.command {
        Command::Run { file, owner } => run_file(&service, &file, &owner).await,
        Command::Batch {
            dir,
            extension,
            output,
            owner,
        } => run_batch(&service, &dir, &extension, output.as_deref(), &owner).await,
    }
}

async fn run_file(service: &DigestService, file: &Path, owner: &str) -> Result<()> {
    match digest_file(service, file, owner).await? {
        RunOutcome::Completed(record) => {
            println!("{}", render(&record)?);
            Ok(())
        }
        RunOutcome::Failed { reason, record } => {
            println!("{}", render(&record)?);
            bail!("digest of {} failed: {reason}", file.display())
        }
    }
}

async fn run_batch(
    service: &DigestService,
    dir: &Path,
    extension: &str,
    output: Option<&Path>,
    owner: &str,
) -> Result<()> {
    let extension = extension.trim_start_matches('.');
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == extension)
        })
        .map(|e| e.into_path())
        .collect();
    if files.is_empty() {
        bail!("no .{extension} files found under {}", dir.display());
    }

    let mut failures = 0usize;
    for file in &files {
        let outcome = match digest_file(service, file, owner).await {
            Ok(outcome) => outcome,
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err:#}", file.display());
                continue;
            }
        };
        let record = outcome.record();
        if let Some(out_dir) = output {
            let stem = file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| record.doc_id.clone());
            write_string(&out_dir.join(format!("{stem}.json")), &render(record)?)?;
        } else {
            println!("{}", render(record)?);
        }
        if let RunOutcome::Failed { reason, .. } = &outcome {
            failures += 1;
            eprintln!("{}: {reason}", file.display());
        }
    }

    eprintln!(
        "digested {} of {} files",
        files.len() - failures,
        files.len()
    );
    if failures > 0 {
        bail!("{failures} file(s) failed");
    }
    Ok(())
}

async fn digest_file(service: &DigestService, file: &Path, owner: &str) -> Result<RunOutcome> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let ingested = service
        .ingest(IngestRequest {
            text,
            filename,
            owner_id: owner.to_string(),
        })
        .await
        .with_context(|| format!("failed to ingest {}", file.display()))?;
    service
        .run(&ingested.doc_id)
        .await
        .with_context(|| format!("failed to digest {}", file.display()))
}

fn render(record: &ProcessingRecord) -> Result<String> {
    serde_json::to_string_pretty(record).context("failed to serialize record")
}

fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create parent directories for {}",
                parent.display()
            )
        })?;
    }
    let mut file = fs::File::create(path)
        .with_context(|| format!("failed to create file at {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write data to {}", path.display()))?;
    Ok(())
}
