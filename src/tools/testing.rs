//! In-memory fakes for pipeline tests.
//!
//! Each fake honors the contract of its trait closely enough that the
//! stages cannot tell the difference: the rasterizer and packer do real
//! file IO in temp directories, the compiler produces the bundle skeleton
//! `osacompile` would, and everything records what it was asked to do.

use crate::bail;
use crate::metadata::memory::MemoryStore;
use crate::metadata::{MetadataStore, PlistValue};
use crate::pipeline::error::Result;
use crate::tools::{
    Fetcher, IconPacker, QuarantineStripper, Rasterizer, ScriptCompiler, Signer, Toolbox,
    Toolchain,
};
use crate::util::fs::Fs;
use std::cell::RefCell;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A [`MemoryStore`] that can sit in the toolbox while the test keeps a
/// handle for assertions.
#[derive(Clone, Default)]
pub(crate) struct SharedStore(Rc<MemoryStore>);

impl Deref for SharedStore {
    type Target = MemoryStore;

    fn deref(&self) -> &MemoryStore {
        &self.0
    }
}

impl MetadataStore for SharedStore {
    fn get(&self, doc: &Path, key_path: &str) -> Result<Option<String>> {
        self.0.get(doc, key_path)
    }

    fn set(&self, doc: &Path, key_path: &str, value: &PlistValue) -> Result<()> {
        self.0.set(doc, key_path, value)
    }

    fn add_if_absent(&self, doc: &Path, key_path: &str, value: &PlistValue) -> Result<bool> {
        self.0.add_if_absent(doc, key_path, value)
    }

    fn delete_if_present(&self, doc: &Path, key_path: &str) -> Result<bool> {
        self.0.delete_if_present(doc, key_path)
    }
}

/// Records which build steps ran; optionally fails one of them.
pub(crate) struct FakeToolchain {
    pub ran: Rc<RefCell<Vec<&'static str>>>,
    pub fail: Option<&'static str>,
}

impl FakeToolchain {
    fn step(&self, name: &'static str) -> Result<()> {
        self.ran.borrow_mut().push(name);
        if self.fail == Some(name) {
            bail!("{name} failed with exit code 2");
        }
        Ok(())
    }
}

impl Toolchain for FakeToolchain {
    fn bootstrap(&self, _src: &Path) -> Result<()> {
        self.step("bootstrap")
    }

    fn configure(&self, _src: &Path, _cflags: &str) -> Result<()> {
        self.step("configure")
    }

    fn build(&self, _src: &Path, _jobs: usize) -> Result<()> {
        self.step("build")
    }

    fn install(&self, _src: &Path) -> Result<()> {
        self.step("install")
    }
}

/// "Resizes" by copying the source; optionally fails for given pixel
/// sizes so the fallback path can be exercised.
pub(crate) struct CopyRasterizer {
    pub fail_sizes: Vec<u32>,
}

impl Rasterizer for CopyRasterizer {
    fn resize(&self, src: &Path, dst: &Path, size: u32) -> Result<()> {
        if self.fail_sizes.contains(&size) {
            bail!("cannot render {size}x{size}");
        }
        std::fs::copy(src, dst)?;
        Ok(())
    }
}

/// Records the iconset contents it was asked to pack and writes a token
/// payload as the packed file.
pub(crate) struct StubPacker {
    pub iconsets: Rc<RefCell<Vec<Vec<String>>>>,
}

impl IconPacker for StubPacker {
    fn pack(&self, iconset: &Path, icns: &Path) -> Result<()> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(iconset)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        self.iconsets.borrow_mut().push(names);
        std::fs::write(icns, b"icns")?;
        Ok(())
    }
}

/// Records compiled scripts and produces the applet skeleton that
/// `osacompile` would, generic Info.plist identity included.
pub(crate) struct RecordingCompiler {
    pub scripts: Rc<RefCell<Vec<String>>>,
    pub store: SharedStore,
}

impl ScriptCompiler for RecordingCompiler {
    fn compile(&self, script: &Path, bundle: &Path) -> Result<()> {
        self.scripts
            .borrow_mut()
            .push(std::fs::read_to_string(script)?);
        let contents = bundle.join("Contents");
        std::fs::create_dir_all(contents.join("MacOS"))?;
        std::fs::create_dir_all(contents.join("Resources"))?;
        std::fs::write(contents.join("MacOS/applet"), b"applet")?;
        std::fs::write(contents.join("Info.plist"), b"<plist/>")?;
        self.store.insert_value(
            &contents.join("Info.plist"),
            ":CFBundleIdentifier",
            PlistValue::string("com.apple.ScriptEditor.id"),
        );
        Ok(())
    }
}

/// Records signing and verification; optionally rejects artifacts whose
/// path contains a substring. The attempt is recorded before failing.
pub(crate) struct RecordingSigner {
    pub signed: Rc<RefCell<Vec<PathBuf>>>,
    pub verified: Rc<RefCell<Vec<PathBuf>>>,
    pub fail_substring: Option<String>,
}

impl Signer for RecordingSigner {
    fn sign(&self, path: &Path, _identity: &str) -> Result<()> {
        self.signed.borrow_mut().push(path.to_path_buf());
        if let Some(needle) = &self.fail_substring {
            if path.to_string_lossy().contains(needle.as_str()) {
                bail!("codesign rejected {path:?}");
            }
        }
        Ok(())
    }

    fn verify(&self, path: &Path) -> Result<()> {
        self.verified.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

pub(crate) struct RecordingStripper {
    pub stripped: Rc<RefCell<Vec<PathBuf>>>,
}

impl QuarantineStripper for RecordingStripper {
    fn strip(&self, path: &Path) -> Result<()> {
        self.stripped.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Writes a token payload as the download, or fails.
#[derive(Default)]
pub(crate) struct StubFetcher {
    fail: bool,
}

impl StubFetcher {
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        if self.fail {
            bail!("Download failed: connection refused ({url})");
        }
        std::fs::write(dest, b"download")?;
        Ok(())
    }
}

/// A toolbox of fakes plus the handles to inspect them.
pub(crate) struct TestTools {
    pub tools: Toolbox,
    pub store: SharedStore,
    pub toolchain_ran: Rc<RefCell<Vec<&'static str>>>,
    pub scripts: Rc<RefCell<Vec<String>>>,
    pub iconsets: Rc<RefCell<Vec<Vec<String>>>>,
    pub signed: Rc<RefCell<Vec<PathBuf>>>,
    pub verified: Rc<RefCell<Vec<PathBuf>>>,
    pub stripped: Rc<RefCell<Vec<PathBuf>>>,
}

pub(crate) fn test_tools() -> TestTools {
    let store = SharedStore::default();
    let toolchain_ran = Rc::new(RefCell::new(Vec::new()));
    let scripts = Rc::new(RefCell::new(Vec::new()));
    let iconsets = Rc::new(RefCell::new(Vec::new()));
    let signed = Rc::new(RefCell::new(Vec::new()));
    let verified = Rc::new(RefCell::new(Vec::new()));
    let stripped = Rc::new(RefCell::new(Vec::new()));

    let tools = Toolbox {
        fs: Fs::new(false),
        toolchain: Box::new(FakeToolchain {
            ran: toolchain_ran.clone(),
            fail: None,
        }),
        metadata: Box::new(store.clone()),
        rasterizer: Box::new(CopyRasterizer {
            fail_sizes: Vec::new(),
        }),
        packer: Box::new(StubPacker {
            iconsets: iconsets.clone(),
        }),
        compiler: Box::new(RecordingCompiler {
            scripts: scripts.clone(),
            store: store.clone(),
        }),
        signer: Box::new(RecordingSigner {
            signed: signed.clone(),
            verified: verified.clone(),
            fail_substring: None,
        }),
        quarantine: Box::new(RecordingStripper {
            stripped: stripped.clone(),
        }),
        fetcher: Box::new(StubFetcher::default()),
    };

    TestTools {
        tools,
        store,
        toolchain_ran,
        scripts,
        iconsets,
        signed,
        verified,
        stripped,
    }
}
