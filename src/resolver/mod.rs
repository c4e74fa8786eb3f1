//! Import-name resolution
//!
//! There is no algorithm that derives a pip distribution name from an
//! import name; the two are linked only by an external, evolving registry.
//! Resolution therefore runs an ordered list of best-effort lookups and
//! short-circuits on the first hit:
//!
//! 1. user override mapping
//! 2. installed-package registry (venv dist-info snapshot)
//! 3. built-in table of well-known discrepancies
//! 4. identity fallback, flagged so callers can warn
//!
//! Standard-library modules are filtered out before any lookup; they never
//! belong in a requirements manifest. Resolution is a pure function of the
//! import name and the loaded tables, so re-running it is deterministic.

pub mod mapping;
pub mod registry;

use std::collections::HashSet;
use std::sync::OnceLock;

use mapping::PackageMapping;
use registry::InstalledRegistry;

/// Which lookup tier produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// User override mapping file
    Override,
    /// Installed-package registry
    Registry,
    /// Built-in discrepancy table
    BuiltIn,
    /// No source matched; package name assumed equal to the import name
    Identity,
}

/// A resolved distribution name plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub package: String,
    pub source: ResolutionSource,
}

/// Resolves import names against the loaded lookup tables
pub struct Resolver {
    mapping: PackageMapping,
    registry: InstalledRegistry,
}

impl Resolver {
    pub fn new(mapping: PackageMapping, registry: InstalledRegistry) -> Self {
        Self { mapping, registry }
    }

    /// Resolve an import name to a distribution package name.
    ///
    /// Returns `None` for standard-library and dunder modules, which are
    /// excluded from manifests entirely.
    pub fn resolve(&self, import_name: &str) -> Option<Resolution> {
        if import_name.starts_with("__") || is_stdlib(import_name) {
            return None;
        }

        let hit = self
            .mapping
            .lookup_override(import_name)
            .map(|package| (package, ResolutionSource::Override))
            .or_else(|| {
                self.registry
                    .lookup(import_name)
                    .map(|package| (package, ResolutionSource::Registry))
            })
            .or_else(|| {
                self.mapping
                    .lookup_built_in(import_name)
                    .map(|package| (package, ResolutionSource::BuiltIn))
            });

        let (package, source) = match hit {
            Some((package, source)) => (package.to_string(), source),
            None => (import_name.to_string(), ResolutionSource::Identity),
        };
        Some(Resolution { package, source })
    }
}

/// Whether a top-level module ships with the Python interpreter
pub fn is_stdlib(import_name: &str) -> bool {
    stdlib_modules().contains(import_name)
}

// CPython's `sys.stdlib_module_names` (3.12), minus the private
// underscore-prefixed entries; dunder names are filtered separately.
// Platform-specific modules (fcntl, winreg, ...) are kept: scans must not
// depend on the scanning host's platform.
fn stdlib_modules() -> &'static HashSet<&'static str> {
    static STDLIB: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STDLIB.get_or_init(|| {
        [
            "abc",
            "aifc",
            "antigravity",
            "argparse",
            "array",
            "ast",
            "asyncio",
            "atexit",
            "audioop",
            "base64",
            "bdb",
            "binascii",
            "bisect",
            "builtins",
            "bz2",
            "cProfile",
            "calendar",
            "cgi",
            "cgitb",
            "chunk",
            "cmath",
            "cmd",
            "code",
            "codecs",
            "codeop",
            "collections",
            "colorsys",
            "compileall",
            "concurrent",
            "configparser",
            "contextlib",
            "contextvars",
            "copy",
            "copyreg",
            "crypt",
            "csv",
            "ctypes",
            "curses",
            "dataclasses",
            "datetime",
            "dbm",
            "decimal",
            "difflib",
            "dis",
            "doctest",
            "email",
            "encodings",
            "ensurepip",
            "enum",
            "errno",
            "faulthandler",
            "fcntl",
            "filecmp",
            "fileinput",
            "fnmatch",
            "fractions",
            "ftplib",
            "functools",
            "gc",
            "genericpath",
            "getopt",
            "getpass",
            "gettext",
            "glob",
            "graphlib",
            "grp",
            "gzip",
            "hashlib",
            "heapq",
            "hmac",
            "html",
            "http",
            "idlelib",
            "imaplib",
            "imghdr",
            "importlib",
            "inspect",
            "io",
            "ipaddress",
            "itertools",
            "json",
            "keyword",
            "lib2to3",
            "linecache",
            "locale",
            "logging",
            "lzma",
            "mailbox",
            "mailcap",
            "marshal",
            "math",
            "mimetypes",
            "mmap",
            "modulefinder",
            "msilib",
            "msvcrt",
            "multiprocessing",
            "netrc",
            "nis",
            "nntplib",
            "nt",
            "ntpath",
            "nturl2path",
            "numbers",
            "opcode",
            "operator",
            "optparse",
            "os",
            "ossaudiodev",
            "pathlib",
            "pdb",
            "pickle",
            "pickletools",
            "pipes",
            "pkgutil",
            "platform",
            "plistlib",
            "poplib",
            "posix",
            "posixpath",
            "pprint",
            "profile",
            "pstats",
            "pty",
            "pwd",
            "py_compile",
            "pyclbr",
            "pydoc",
            "pydoc_data",
            "pyexpat",
            "queue",
            "quopri",
            "random",
            "re",
            "readline",
            "reprlib",
            "resource",
            "rlcompleter",
            "runpy",
            "sched",
            "secrets",
            "select",
            "selectors",
            "shelve",
            "shlex",
            "shutil",
            "signal",
            "site",
            "smtplib",
            "sndhdr",
            "socket",
            "socketserver",
            "spwd",
            "sqlite3",
            "sre_compile",
            "sre_constants",
            "sre_parse",
            "ssl",
            "stat",
            "statistics",
            "string",
            "stringprep",
            "struct",
            "subprocess",
            "sunau",
            "symtable",
            "sys",
            "sysconfig",
            "syslog",
            "tabnanny",
            "tarfile",
            "telnetlib",
            "tempfile",
            "termios",
            "textwrap",
            "this",
            "threading",
            "time",
            "timeit",
            "tkinter",
            "token",
            "tokenize",
            "tomllib",
            "trace",
            "traceback",
            "tracemalloc",
            "tty",
            "turtle",
            "turtledemo",
            "types",
            "typing",
            "unicodedata",
            "unittest",
            "urllib",
            "uu",
            "uuid",
            "venv",
            "warnings",
            "wave",
            "weakref",
            "webbrowser",
            "winreg",
            "winsound",
            "wsgiref",
            "xdrlib",
            "xml",
            "xmlrpc",
            "zipapp",
            "zipfile",
            "zipimport",
            "zlib",
            "zoneinfo",
        ]
        .into_iter()
        .collect()
    })
}
