//! Host architecture detection and per-architecture compiler flags.

use std::fmt;

/// CPU architecture the build host runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    AArch64,
    /// Anything else; built with generic optimization flags.
    Other,
}

impl Arch {
    /// Detects the architecture of the machine running the build.
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86_64" => Arch::X86_64,
            "aarch64" => Arch::AArch64,
            _ => Arch::Other,
        }
    }

    /// C compiler flags passed to the configure step for this architecture.
    pub fn cflags(&self) -> &'static str {
        match self {
            Arch::AArch64 => "-O2 -mcpu=apple-m1",
            Arch::X86_64 => "-O2 -march=native",
            Arch::Other => "-O2",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X86_64 => write!(f, "x86_64"),
            Arch::AArch64 => write!(f, "aarch64"),
            Arch::Other => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cflags_are_arch_specific() {
        assert!(Arch::AArch64.cflags().contains("apple-m1"));
        assert!(Arch::X86_64.cflags().contains("march=native"));
        assert_eq!(Arch::Other.cflags(), "-O2");
    }

    #[test]
    fn host_matches_compile_target() {
        #[cfg(target_arch = "x86_64")]
        assert_eq!(Arch::host(), Arch::X86_64);
        #[cfg(target_arch = "aarch64")]
        assert_eq!(Arch::host(), Arch::AArch64);
    }
}
