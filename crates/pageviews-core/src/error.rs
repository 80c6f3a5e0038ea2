use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The chart a render failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Box,
}

impl ChartKind {
    /// All charts, in the order the runner executes them.
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Bar, ChartKind::Box];

    /// File name of the chart's image inside the output directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::Line => "line_plot.png",
            ChartKind::Bar => "bar_plot.png",
            ChartKind::Box => "box_plot.png",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Box => "box",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ChartKind {
    type Err = PageviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "box" => Ok(ChartKind::Box),
            other => Err(PageviewError::Config(format!("unknown chart: {other}"))),
        }
    }
}

/// Coarse classification used by the runner to decide whether a failure
/// aborts the whole run or only one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    EmptyDataset,
    Render,
    Config,
    Io,
}

/// All errors produced by the page-view visualizer.
#[derive(Error, Debug)]
pub enum PageviewError {
    /// The input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer rejected the file (bad quoting, uneven rows, bad UTF-8).
    #[error("Malformed CSV in {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// A required column is absent from the header row.
    #[error("Missing required column \"{column}\" in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A row's date field did not match any recognised format.
    #[error("Invalid date \"{value}\" at {path}:{line}")]
    DateParse {
        path: PathBuf,
        line: u64,
        value: String,
    },

    /// A row's value field is not a finite number.
    #[error("Invalid value \"{value}\" at {path}:{line}")]
    ValueParse {
        path: PathBuf,
        line: u64,
        value: String,
    },

    /// Nothing left to chart.
    #[error("No data rows available from {0}")]
    EmptyDataset(PathBuf),

    /// A chart could not be drawn or written.
    #[error("Failed to render {chart} chart to {path}: {message}")]
    Render {
        chart: ChartKind,
        path: PathBuf,
        message: String,
    },

    /// The run summary could not be encoded.
    #[error("Failed to encode JSON: {0}")]
    JsonEncode(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PageviewError {
    /// Classify the error for stage-level handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PageviewError::FileRead { .. }
            | PageviewError::Csv { .. }
            | PageviewError::MissingColumn { .. }
            | PageviewError::DateParse { .. }
            | PageviewError::ValueParse { .. } => ErrorKind::Input,
            PageviewError::EmptyDataset(_) => ErrorKind::EmptyDataset,
            PageviewError::Render { .. } => ErrorKind::Render,
            PageviewError::Config(_) => ErrorKind::Config,
            PageviewError::JsonEncode(_) | PageviewError::Io(_) | PageviewError::Other(_) => {
                ErrorKind::Io
            }
        }
    }

    /// `true` when the error must abort the run before any chart is drawn.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Input | ErrorKind::EmptyDataset | ErrorKind::Config
        )
    }
}

/// Convenience alias used throughout the page-view crates.
pub type Result<T> = std::result::Result<T, PageviewError>;
