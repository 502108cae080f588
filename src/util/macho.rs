//! Mach-O image classification.
//!
//! Signing order depends on what a file *is*, not on its permission bits: a
//! shell script with the executable bit set must never be signed, while a
//! helper binary without it must be. Files are sniffed by magic number first
//! and parsed with goblin only when the prefix matches.

use crate::pipeline::error::{ErrorExt, Result};
use std::io::Read;
use std::path::Path;

/// Classification of a Mach-O image relevant to signing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MachOKind {
    /// `MH_EXECUTE` image: the main binary or a helper executable.
    Executable,
    /// `MH_DYLIB` or `MH_BUNDLE` image: loadable code, signed before
    /// executables.
    Library,
}

/// Determines whether a file is a Mach-O image and, if so, of which kind.
///
/// Returns `Ok(None)` for anything that is not Mach-O (scripts, data files,
/// files shorter than a magic number). Read failures are reported as errors
/// so the caller can decide how tolerant to be.
pub fn classify(path: &Path) -> Result<Option<MachOKind>> {
    let mut prefix = [0u8; 4];
    {
        let mut file = std::fs::File::open(path).fs_context("opening file for inspection", path)?;
        if file.read_exact(&mut prefix).is_err() {
            return Ok(None);
        }
    }
    if !is_mach_magic(prefix) {
        return Ok(None);
    }

    let buffer = std::fs::read(path).fs_context("reading file for inspection", path)?;
    match goblin::Object::parse(&buffer) {
        Ok(goblin::Object::Mach(mach)) => Ok(kind_of_mach(&mach)),
        Ok(_) => Ok(None),
        Err(err) => {
            // Shares a magic with other formats (e.g. Java class files).
            log::debug!("{} has a Mach-O magic but did not parse: {}", path.display(), err);
            Ok(None)
        }
    }
}

/// Thin and fat Mach-O magic numbers, checked in both byte orders.
fn is_mach_magic(prefix: [u8; 4]) -> bool {
    const MAGICS: [u32; 3] = [0xfeed_face, 0xfeed_facf, 0xcafe_babe];
    MAGICS.contains(&u32::from_be_bytes(prefix)) || MAGICS.contains(&u32::from_le_bytes(prefix))
}

fn kind_of_mach(mach: &goblin::mach::Mach) -> Option<MachOKind> {
    match mach {
        goblin::mach::Mach::Binary(image) => kind_of_filetype(image.header.filetype),
        goblin::mach::Mach::Fat(fat) => match fat.get(0) {
            // Every slice of a fat binary has the same filetype.
            Ok(goblin::mach::SingleArch::MachO(image)) => kind_of_filetype(image.header.filetype),
            _ => None,
        },
    }
}

fn kind_of_filetype(filetype: u32) -> Option<MachOKind> {
    use goblin::mach::header::{MH_BUNDLE, MH_DYLIB, MH_EXECUTE};
    match filetype {
        MH_EXECUTE => Some(MachOKind::Executable),
        MH_DYLIB | MH_BUNDLE => Some(MachOKind::Library),
        _ => None,
    }
}

/// Minimal 64-bit little-endian Mach-O header with no load commands, enough
/// for [`classify`] to recognize. Shared by tests across the crate.
#[cfg(test)]
pub(crate) fn test_image(filetype: u32) -> Vec<u8> {
    const MH_MAGIC_64: u32 = 0xfeed_facf;
    const CPU_TYPE_X86_64: u32 = 0x0100_0007;
    let mut bytes = Vec::with_capacity(32);
    for word in [MH_MAGIC_64, CPU_TYPE_X86_64, 3, filetype, 0, 0, 0, 0] {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes
}
