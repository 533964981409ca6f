//! Payload type sniffing.
//!
//! When no name resolves for a chunk, extraction falls back to
//! `<hash>.<ext>`, with the extension guessed from the payload's
//! leading magic bytes.

/// Guesses a file extension from a decompressed payload.
pub fn guess_extension(data: &[u8]) -> &'static str {
    if data.starts_with(b"DDS ") {
        return "dds";
    }
    if data.starts_with(b"\x89PNG") {
        return "png";
    }
    if data.starts_with(b"PROP") || data.starts_with(b"PTCH") {
        return "bin";
    }
    if data.starts_with(b"SKN\0") {
        return "skn";
    }
    if data.starts_with(b"SKL\0") {
        return "skl";
    }
    if data.starts_with(b"r3d2Mesh") {
        return "scb";
    }
    if data.starts_with(b"[Obj") {
        return "sco";
    }
    "bin"
}

/// Fallback file name for an unnamed chunk: bare hex plus a guessed
/// extension.
pub fn default_file_name(hash: u64, data: &[u8]) -> String {
    format!("{hash:016x}.{}", guess_extension(data))
}
