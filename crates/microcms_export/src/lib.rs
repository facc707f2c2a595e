//! microCMS export: page through a microCMS list endpoint and write each
//! entry as a Hugo Markdown file with TOML front matter.
mod config;
mod convert;
mod fetch;
mod filename;
mod frontmatter;
mod persist;
mod pipeline;
mod types;

pub use config::{
    ConfigError, ExportConfig, API_KEY_VAR, BASE_URL_VAR, DEFAULT_PAGE_SIZE, MAX_RESPONSE_BYTES_VAR,
    OUTPUT_DIR_VAR, PAGE_SIZE_VAR,
};
pub use convert::{ConvertError, Converter, Html2MdConverter};
pub use fetch::{ContentFetcher, FetchSettings, MicrocmsFetcher, API_KEY_HEADER};
pub use filename::{markdown_filename, UnsafeIdentifier};
pub use frontmatter::render_document;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{export_from_config, ExportError, ExportPipeline, ExportSummary, RecordError};
pub use types::{ContentImage, ContentPage, ContentRecord, ContentTag, FailureKind, FetchError};
