//! Extracts every chunk of a WAD archive to disk.
//!
//! Chunk names come from the archive's own manifest plus any hash
//! list files given on the command line; unnamed chunks fall back to
//! `<hash>.<ext>` with the extension sniffed from the payload.
//!
//! Path components longer than the destination filesystem tolerates
//! are truncated, keeping the extension and a short hash tag for
//! uniqueness.

use std::{fs, path::PathBuf};

use clap::Parser;
use rift_decompress::ZstdDecompressor;
use rift_wad::{ArchiveIndex, NameTable, default_file_name};
use tracing::{info, warn};

/// Longest path component written without truncation.
const MAX_COMPONENT_BYTES: usize = 120;

#[derive(Parser)]
#[command(name = "extract")]
struct Cli {
    /// WAD archive to extract.
    pub archive: PathBuf,

    /// Directory to write assets into.
    #[clap(long, default_value = "output_chunks")]
    pub output: PathBuf,

    /// Hash list files of `<hex hash> <path>` lines.
    #[clap(long)]
    pub hashes: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    let wad = fs::read(&args.archive)?;
    let decompressor = ZstdDecompressor;
    let index = ArchiveIndex::parse(&wad, &decompressor);
    info!(
        "{}: {} chunks ({} skipped)",
        args.archive.display(),
        index.len(),
        index.skipped_entries(),
    );

    let mut names = NameTable::default();
    for list in &args.hashes {
        names.load_file(list)?;
    }
    names.merge_manifest(index.manifest());

    let stem = args
        .archive
        .file_stem()
        .map_or_else(|| PathBuf::from("archive"), PathBuf::from);
    let out_root = args.output.join(stem);

    for hash in index.hashes().collect::<Vec<_>>() {
        let data = match index.read(hash, &decompressor) {
            Ok(d) => d,
            Err(e) => {
                warn!("chunk {hash:#018x} failed to decompress: {e}");
                continue;
            }
        };

        let rel = names
            .resolve(hash)
            .map_or_else(|| default_file_name(hash, &data), str::to_string);
        let rel: PathBuf = rel
            .split('/')
            .map(|c| safe_component(c, MAX_COMPONENT_BYTES))
            .collect();

        let dest = out_root.join(&rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &data)?;
        info!("{} ({} bytes)", dest.display(), data.len());
    }

    Ok(())
}

/// Truncates one path component to `max_len` bytes, keeping the
/// extension and appending a hash tag so truncated names stay unique.
fn safe_component(comp: &str, max_len: usize) -> String {
    if comp.len() <= max_len {
        return comp.to_string();
    }
    let (base, ext) = match comp.rsplit_once('.') {
        Some((b, e)) => (b, Some(e)),
        None => (comp, None),
    };
    let tag = {
        // FNV-1a, enough to disambiguate truncated siblings.
        let mut h = 0xcbf29ce484222325u64;
        for b in comp.bytes() {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x100000001b3);
        }
        format!("{:08x}", h as u32)
    };
    let mut cut = max_len / 2;
    while !base.is_char_boundary(cut) {
        cut -= 1;
    }
    match ext {
        Some(e) => format!("{}_{tag}.{e}", &base[..cut]),
        None => format!("{}_{tag}", &base[..cut]),
    }
}
