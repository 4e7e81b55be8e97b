mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use output::{EntryInfo, LsOutput, OutputWriter, PathsOutput, StatData, StatOutput};
use pk2_core::{FolderTree, Manifest};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// PK2 - Inspect the folder tree of a PK2 archive
#[derive(Parser)]
#[command(name = "pk2")]
#[command(about = "Inspect PK2 folder trees described by a JSON manifest", long_about = None)]
#[command(version)]
struct Cli {
    /// Tree manifest (defaults to PK2_MANIFEST env var or ./pk2-manifest.json)
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the direct children of a folder
    Ls {
        /// Archive path of the folder (root if omitted)
        path: Option<String>,

        /// Show offsets and sizes
        #[arg(short, long)]
        long: bool,
    },

    /// Show the diagnostic summary of a folder or file
    Stat {
        /// Archive path of the entry
        path: String,
    },

    /// Print the canonical path of every folder
    Paths,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let out = OutputWriter::new(cli.json);

    // Determine manifest: CLI arg > PK2_MANIFEST env var > ./pk2-manifest.json default
    let manifest = cli
        .manifest
        .or_else(|| std::env::var("PK2_MANIFEST").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("./pk2-manifest.json"));

    let result = load_tree(&manifest).and_then(|tree| match cli.command {
        Commands::Ls { path, long } => cmd_ls(&out, &tree, path.as_deref().unwrap_or(""), long),
        Commands::Stat { path } => cmd_stat(&out, &tree, &path),
        Commands::Paths => cmd_paths(&out, &tree),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            out.write_error(&err, 1);
            ExitCode::from(1)
        }
    }
}

fn load_tree(manifest: &Path) -> Result<FolderTree> {
    debug!(manifest = %manifest.display(), "loading manifest");

    let file = File::open(manifest)
        .with_context(|| format!("Failed to open manifest {}", manifest.display()))?;

    Manifest::from_reader(BufReader::new(file))
        .and_then(|m| m.build())
        .with_context(|| format!("Failed to build tree from {}", manifest.display()))
}

fn cmd_ls(out: &OutputWriter, tree: &FolderTree, path: &str, long: bool) -> Result<()> {
    let id = tree
        .find_folder(path)?
        .with_context(|| format!("Folder not found: {}", path))?;
    let folder = tree.folder(id)?;

    let mut entries: Vec<EntryInfo> = Vec::new();
    for &child_id in folder.subfolders().values() {
        let child = tree.folder(child_id)?;
        entries.push(EntryInfo {
            name: child.name().to_string(),
            entry_type: "folder",
            offset: child.offset(),
            size: None,
        });
    }
    for file in folder.files().values() {
        entries.push(EntryInfo {
            name: file.name().to_string(),
            entry_type: "file",
            offset: file.offset(),
            size: Some(file.size()),
        });
    }

    let output = LsOutput {
        success: true,
        result_code: 0,
        path: tree.full_path(id)?,
        entries,
    };

    out.write(&output, || {
        let mut text = String::new();
        for entry in &output.entries {
            let suffix = if entry.entry_type == "folder" { "/" } else { "" };
            if long {
                let size = entry.size.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
                text.push_str(&format!(
                    "{:>12} {:>10} {}{}\n",
                    entry.offset, size, entry.name, suffix
                ));
            } else {
                text.push_str(&format!("{}{}\n", entry.name, suffix));
            }
        }
        text
    })
}

fn cmd_stat(out: &OutputWriter, tree: &FolderTree, path: &str) -> Result<()> {
    // Folders win over files of the same name
    let (data, summary) = if let Some(id) = tree.find_folder(path)? {
        let folder = tree.folder(id)?;
        let data = StatData::Folder {
            name: folder.name().to_string(),
            path: tree.full_path(id)?,
            offset: folder.offset(),
            depth: tree.depth(id)?,
            files: folder.files().len(),
            folders: folder.subfolders().len(),
        };
        (data, folder.to_string())
    } else if let Some(file) = tree.find_file(path)? {
        let data = StatData::File {
            name: file.name().to_string(),
            offset: file.offset(),
            size: file.size(),
        };
        (data, file.to_string())
    } else {
        anyhow::bail!("Entry not found: {}", path);
    };

    let output = StatOutput {
        success: true,
        result_code: 0,
        data,
    };

    out.write(&output, || format!("{}\n", summary))
}

fn cmd_paths(out: &OutputWriter, tree: &FolderTree) -> Result<()> {
    let paths = tree
        .walk()
        .map(|(id, _)| tree.full_path(id))
        .collect::<pk2_core::Result<Vec<_>>>()?;

    let output = PathsOutput {
        success: true,
        result_code: 0,
        folders: tree.len(),
        files: tree.file_count(),
        paths,
    };

    out.write(&output, || {
        let mut text = String::new();
        for path in &output.paths {
            if path.is_empty() {
                text.push_str(".\n");
            } else {
                text.push_str(path);
                text.push('\n');
            }
        }
        text
    })
}
