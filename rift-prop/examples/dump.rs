//! Dumps a PROP file as text.
//!
//! Accepts files straight out of an archive: a zstd-compressed
//! payload is inflated first, and a `PTCH` wrapper is handled by the
//! parser. Hash names resolve through any `hashes.*.txt` lists found
//! in the given directory; without them every reference prints as
//! hex.

use std::{fs, path::PathBuf};

use clap::Parser;
use rift_decompress::ZstdDecompressor;
use rift_prop::{HashDb, PropFile, dump_text};
use tracing::info;

#[derive(Parser)]
#[command(name = "dump")]
struct Cli {
    /// PROP file to decode (may still be zstd-compressed).
    pub bin: PathBuf,

    /// Directory of hashes.*.txt list files.
    #[clap(long)]
    pub hashes: Option<PathBuf>,

    /// Write the dump here instead of stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    let mut db = HashDb::default();
    if let Some(dir) = &args.hashes {
        let loaded = db.load_dir(dir)?;
        info!("{loaded} hash entries loaded");
    }

    let raw = fs::read(&args.bin)?;
    let file = PropFile::parse_compressed(&raw, &ZstdDecompressor)?;
    info!(
        "{}: PROP v{}, {} linked, {} entries",
        args.bin.display(),
        file.version,
        file.linked.len(),
        file.entries.len(),
    );

    let text = dump_text(&file, &db);
    match &args.output {
        Some(path) => fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}
