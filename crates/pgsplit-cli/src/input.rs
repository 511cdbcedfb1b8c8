//! Input selection: a dump file given with `-f`, or a pipe on stdin

use crate::error::{CliError, Result};
use crate::progress::{create_file_progress, create_spinner, ProgressReader};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Opened dump source
pub struct Input {
    pub reader: Box<dyn BufRead>,
    pub progress: ProgressBar,
    /// Human readable origin, used in logs
    pub description: String,
}

/// Open `file`, or stdin when no file is given.
///
/// Reading from an interactive terminal is refused; the dump has to be
/// piped in.
pub fn open(file: Option<&Path>, quiet: bool) -> Result<Input> {
    match file {
        Some(path) => open_file(path, quiet),
        None => open_stdin(quiet),
    }
}

fn open_file(path: &Path, quiet: bool) -> Result<Input> {
    let file = File::open(path).map_err(|e| CliError::input_file(path, e))?;
    let size = file.metadata().map_err(|e| CliError::input_file(path, e))?.len();

    let description = path.display().to_string();
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        create_file_progress(size, &format!("Splitting {description}"))
    };

    Ok(Input {
        reader: Box::new(BufReader::new(ProgressReader::new(file, progress.clone()))),
        progress,
        description,
    })
}

fn open_stdin(quiet: bool) -> Result<Input> {
    if atty::is(atty::Stream::Stdin) {
        return Err(CliError::NoInput);
    }

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        create_spinner("Splitting stdin")
    };

    Ok(Input {
        reader: Box::new(BufReader::new(ProgressReader::new(io::stdin(), progress.clone()))),
        progress,
        description: "stdin".to_string(),
    })
}
