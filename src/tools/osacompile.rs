//! AppleScript compilation through the macOS `osacompile` tool.

use crate::pipeline::error::Result;
use crate::tools::invoke::Invoker;
use std::path::Path;

/// Compiles an AppleScript source file into an applet bundle.
pub trait ScriptCompiler {
    fn compile(&self, script: &Path, bundle: &Path) -> Result<()>;
}

/// The system `osacompile` tool. With a `.app` output path it produces a
/// complete applet bundle around the compiled script.
#[derive(Clone, Copy, Debug)]
pub struct OsacompileCompiler {
    invoker: Invoker,
}

impl OsacompileCompiler {
    pub fn new(invoker: Invoker) -> Self {
        Self { invoker }
    }
}

impl ScriptCompiler for OsacompileCompiler {
    fn compile(&self, script: &Path, bundle: &Path) -> Result<()> {
        let bundle = bundle.to_string_lossy();
        let script = script.to_string_lossy();
        self.invoker
            .run("osacompile", &["-o", &bundle, &script], None)
    }
}
