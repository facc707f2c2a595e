use std::num::NonZeroU32;
use std::path::PathBuf;

use export_logging::{export_debug, export_info, export_warn};

use crate::config::ExportConfig;
use crate::convert::{ConvertError, Converter, Html2MdConverter};
use crate::fetch::{ContentFetcher, MicrocmsFetcher};
use crate::filename::{markdown_filename, UnsafeIdentifier};
use crate::frontmatter::render_document;
use crate::persist::{ensure_output_dir, AtomicFileWriter, PersistError};
use crate::{ContentRecord, FetchError};

/// Failure that aborts a whole run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot prepare output directory: {0}")]
    OutputDir(#[source] PersistError),
    #[error("cannot set up http client: {0}")]
    Client(#[source] FetchError),
    #[error("fetching page at offset {offset} failed: {source}")]
    Fetch {
        offset: u64,
        #[source]
        source: FetchError,
    },
}

/// Failure confined to one record; the run logs it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    UnsafeIdentifier(#[from] UnsafeIdentifier),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("write failed: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Non-empty pages processed.
    pub pages: u64,
    pub written: u64,
    pub skipped: u64,
    pub output_dir: PathBuf,
}

pub struct ExportPipeline<'a> {
    fetcher: &'a dyn ContentFetcher,
    converter: &'a dyn Converter,
    output_dir: PathBuf,
    page_size: NonZeroU32,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(
        fetcher: &'a dyn ContentFetcher,
        converter: &'a dyn Converter,
        output_dir: impl Into<PathBuf>,
        page_size: NonZeroU32,
    ) -> Self {
        Self {
            fetcher,
            converter,
            output_dir: output_dir.into(),
            page_size,
        }
    }

    pub async fn run(&self) -> Result<ExportSummary, ExportError> {
        ensure_output_dir(&self.output_dir).map_err(ExportError::OutputDir)?;
        let writer = AtomicFileWriter::new(self.output_dir.clone());

        let mut summary = ExportSummary {
            pages: 0,
            written: 0,
            skipped: 0,
            output_dir: self.output_dir.clone(),
        };
        let mut offset: u64 = 0;
        loop {
            let page = self
                .fetcher
                .fetch(offset, self.page_size.get())
                .await
                .map_err(|source| ExportError::Fetch { offset, source })?;
            if page.is_empty() {
                break;
            }
            export_info!("Fetched {} records at offset {}", page.len(), offset);
            summary.pages += 1;

            for record in &page {
                match self.export_record(&writer, record) {
                    Ok(path) => {
                        export_debug!("Wrote {:?}", path);
                        summary.written += 1;
                    }
                    Err(err) => {
                        export_warn!("Skipping record {:?}: {}", record.id, err);
                        summary.skipped += 1;
                    }
                }
            }

            offset += u64::from(self.page_size.get());
        }

        export_info!(
            "Export finished: {} written, {} skipped, {} pages into {:?}",
            summary.written,
            summary.skipped,
            summary.pages,
            summary.output_dir
        );
        Ok(summary)
    }

    fn export_record(
        &self,
        writer: &AtomicFileWriter,
        record: &ContentRecord,
    ) -> Result<PathBuf, RecordError> {
        let filename = markdown_filename(&record.id)?;
        let body = self.converter.to_markdown(&record.body)?;
        let document = render_document(record, &body);
        Ok(writer.write(&filename, &document)?)
    }
}

/// Run a full export against the configured microCMS endpoint using `html2md`.
pub async fn export_from_config(config: &ExportConfig) -> Result<ExportSummary, ExportError> {
    let fetcher = MicrocmsFetcher::new(&config.base_url, &config.api_key, config.fetch.clone())
        .map_err(ExportError::Client)?;
    let converter = Html2MdConverter;
    ExportPipeline::new(&fetcher, &converter, &config.output_dir, config.page_size)
        .run()
        .await
}
