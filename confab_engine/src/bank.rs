//! Dialog bank files: the binary container holding a serialized registry.
//!
//! A bank is a 4-byte magic and a u16 format version, followed by the
//! registry record stream. Load is whole-or-nothing: the registry is built
//! completely before being returned, so a corrupt file never publishes a
//! half-populated registry.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::codec::{BinReader, BinWriter, NodeReader, NodeWriter, WireError};
use crate::registry::{Mode, Registry};

/// Magic bytes at the start of every dialog bank file.
pub const BANK_MAGIC: [u8; 4] = *b"CFB\x01";
/// Current bank format version.
pub const BANK_VERSION: u16 = 1;

/// Load a dialog bank file into a fresh registry in the given mode.
///
/// # Errors
/// Returns an error for I/O failures, a bad magic or version, or malformed
/// records; nothing is published on failure.
pub fn load_bank(path: &Path, mode: Mode) -> Result<Registry> {
    let file = File::open(path).with_context(|| format!("opening bank {}", path.display()))?;
    let mut buffered = BufReader::new(file);

    let mut magic = [0u8; 4];
    buffered
        .read_exact(&mut magic)
        .with_context(|| format!("reading bank header {}", path.display()))?;
    if magic != BANK_MAGIC {
        return Err(WireError::InvalidMagic { found: magic })
            .with_context(|| format!("reading bank header {}", path.display()));
    }

    let mut reader = BinReader::new(buffered);
    let version = reader.take_u16().context("reading bank version")?;
    if version != BANK_VERSION {
        return Err(WireError::UnsupportedVersion(version).into());
    }

    let registry = Registry::load(mode, &mut reader)
        .with_context(|| format!("parsing bank {}", path.display()))?;
    info!("bank {} loaded: {} dialogs", path.display(), registry.len());
    Ok(registry)
}

/// Write a registry out as a dialog bank file.
///
/// # Errors
/// Returns an error for I/O failures or when `registry` is read-only.
pub fn save_bank(path: &Path, registry: &Registry) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating bank {}", path.display()))?;
    let mut buffered = BufWriter::new(file);
    buffered
        .write_all(&BANK_MAGIC)
        .with_context(|| format!("writing bank header {}", path.display()))?;

    let mut writer = BinWriter::new(buffered);
    writer.put_u16(BANK_VERSION).context("writing bank version")?;
    registry
        .save(&mut writer)
        .with_context(|| format!("writing bank {}", path.display()))?;
    writer
        .into_inner()
        .flush()
        .with_context(|| format!("flushing bank {}", path.display()))?;
    info!("bank {} saved: {} dialogs", path.display(), registry.len());
    Ok(())
}
