use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{TidyError, TidyResult};
use crate::tidy::columns::ColumnSelection;

// ---------------------------------------------------------------------------
// Conversion settings
// ---------------------------------------------------------------------------

/// Everything one conversion run needs, independent of how it was parsed.
#[derive(Debug, Clone, Default)]
pub struct TidyConfig {
    /// Measurement document; standard input when `None`.
    pub input: Option<PathBuf>,
    /// File, directory, or `-`; standard output when `None`.
    pub output: Option<PathBuf>,
    /// Category reference document used to look up identifiers.
    pub category_path: Option<PathBuf>,
    /// Category names overriding the document, indexed by level.
    pub category_names: [Option<String>; 3],
    pub no_header: bool,
    pub no_clobber: bool,
    pub quiet: bool,
    pub upc: Option<String>,
    pub temperature: Option<String>,
    pub columns: ColumnSelection,
    /// Fail when a requested category is missing from the reference document.
    pub strict_categories: bool,
}

impl TidyConfig {
    /// Name of the input for messages.
    pub fn input_name(&self) -> String {
        self.input
            .as_ref()
            .map_or_else(|| "stdin".to_string(), |p| p.display().to_string())
    }
}

// ---------------------------------------------------------------------------
// Output target
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn display_name(&self) -> String {
        match self {
            OutputTarget::Stdout => "stdout".to_string(),
            OutputTarget::File(path) => path.display().to_string(),
        }
    }
}

/// Work out where rows go.
///
/// * absent or `-` → standard output
/// * existing directory → `<dir>/<input stem>.csv`
/// * path without extension → `.csv` appended
/// * anything else → used as given
pub fn resolve_output(output: Option<&Path>, input: Option<&Path>) -> OutputTarget {
    let Some(output) = output.filter(|p| p.as_os_str() != "-") else {
        return OutputTarget::Stdout;
    };

    if output.is_dir() {
        let stem = input
            .and_then(|p| p.file_stem())
            .map_or_else(|| OsString::from("stdin"), |s| s.to_os_string());
        let mut file_name = stem;
        file_name.push(".csv");
        return OutputTarget::File(output.join(file_name));
    }

    if output.extension().is_none() {
        let mut path = output.as_os_str().to_os_string();
        path.push(".csv");
        return OutputTarget::File(PathBuf::from(path));
    }

    OutputTarget::File(output.to_path_buf())
}

/// Open the output sink, refusing to replace an existing file under no-clobber.
pub fn open_output(target: &OutputTarget, no_clobber: bool) -> TidyResult<Box<dyn Write>> {
    match target {
        OutputTarget::Stdout => Ok(Box::new(io::stdout().lock())),
        OutputTarget::File(path) => {
            if no_clobber && path.exists() {
                return Err(TidyError::NoClobber(path.clone()));
            }
            let file = create_file(path, no_clobber).map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => TidyError::NoClobber(path.clone()),
                _ => TidyError::io(
                    format!("problem opening specified files in command args: {}", path.display()),
                    e,
                ),
            })?;
            Ok(Box::new(file))
        }
    }
}

fn create_file(path: &Path, no_clobber: bool) -> io::Result<File> {
    if no_clobber {
        OpenOptions::new().write(true).create_new(true).open(path)
    } else {
        File::create(path)
    }
}
