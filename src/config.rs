use std::path::{Path, PathBuf};

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    pub delimiter: char,              // field separator in the input dump
    pub skip_header: bool,            // discard the first line before counting
    pub geo_precision: u32,           // decimal places for cluster keys
    pub top_n: usize,                 // length of "top" result lists
    pub store_path: Option<PathBuf>,  // if None, records stay in memory
    pub parallelism: Option<usize>,   // Some(N) to size rayon's pool, None for default
    pub progress: bool,               // show progress bars
    pub progress_label: Option<String>,

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity
    pub write_buffer_bytes: usize,    // BufWriter capacity
}

impl Default for PipelineOptions {
    fn default() -> Self {
        // Buffer defaults chosen to be safe but noticeably faster than std defaults.
        let default_read = 256 * 1024;
        let default_write = 256 * 1024;

        Self {
            delimiter: ',',
            skip_header: false,
            geo_precision: 2,
            top_n: 10,
            store_path: None,
            parallelism: None,
            progress: true,
            progress_label: None,

            read_buffer_bytes: default_read,
            write_buffer_bytes: default_write,
        }
    }
}

impl PipelineOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
    pub fn with_skip_header(mut self, yes: bool) -> Self {
        self.skip_header = yes;
        self
    }
    pub fn with_geo_precision(mut self, places: u32) -> Self {
        self.geo_precision = places.min(8);
        self
    }
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n.max(1);
        self
    }
    pub fn with_store_path(mut self, path: impl AsRef<Path>) -> Self {
        self.store_path = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }

    // IO buffers tuning
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}
