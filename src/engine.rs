use crate::charts::{ChartBuilder, Figure, DEFAULT_FILTER_COLUMN};
use crate::storage::{DatasetStore, DEFAULT_ORIGINAL_FILE, DEFAULT_WORKING_FILE};
use crate::table::{Dataset, Record};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Ties the working dataset to the chart builder.
///
/// Every query re-reads the working file; nothing is cached between requests.
#[derive(Debug)]
pub struct PenguinEngine {
    store: DatasetStore,
    charts: ChartBuilder,
}

impl PenguinEngine {
    /// Create a builder for more control over engine configuration.
    pub fn builder() -> PenguinEngineBuilder {
        PenguinEngineBuilder::new()
    }

    /// Create a new engine from application configuration.
    pub async fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        Self::builder()
            .working_file(&config.paths.working_file)
            .default_file(&config.paths.default_file)
            .filter_column(&config.charts.filter_column)
            .build()
            .await
    }

    /// Replace the working dataset with uploaded CSV content.
    #[tracing::instrument(
        name = "upload_dataset",
        skip(self, content),
        fields(
            penguin.size_bytes = content.len(),
            penguin.row_count = tracing::field::Empty,
        )
    )]
    pub async fn upload(&self, content: &[u8]) -> Result<Dataset> {
        let dataset = self.store.replace(content).await?;

        tracing::Span::current().record("penguin.row_count", dataset.num_rows());
        info!(
            rows = dataset.num_rows(),
            columns = ?dataset.column_names(),
            "Working dataset replaced"
        );

        Ok(dataset)
    }

    /// Every row of the working dataset.
    #[tracing::instrument(name = "read_records", skip(self))]
    pub async fn records(&self) -> Result<Vec<Record>> {
        let dataset = self.store.read_all().await?;
        Ok(dataset.to_records()?)
    }

    #[tracing::instrument(name = "build_scatter", skip(self))]
    pub async fn scatter(&self, x: &str, y: &str, color: &str, filter_min: i64) -> Result<Figure> {
        let dataset = self.store.read_all().await?;
        Ok(self
            .charts
            .scatter(&dataset, x, y, color, filter_min as f64)?)
    }

    #[tracing::instrument(name = "build_histogram", skip(self))]
    pub async fn histogram(&self, column: &str, color: &str, filter_min: i64) -> Result<Figure> {
        let dataset = self.store.read_all().await?;
        Ok(self
            .charts
            .histogram(&dataset, column, color, filter_min as f64)?)
    }

    /// One of the fixed bill-measurement charts as an HTML fragment.
    #[tracing::instrument(name = "render_chart", skip(self))]
    pub async fn render(&self, mode: &str) -> Result<String> {
        let dataset = self.store.read_all().await?;
        Ok(self.charts.render_default(&dataset, mode)?)
    }
}

/// Builder for [`PenguinEngine`].
///
/// `build()` seeds the working file from the default file when needed.
#[derive(Debug, Default)]
pub struct PenguinEngineBuilder {
    working_file: Option<PathBuf>,
    default_file: Option<PathBuf>,
    filter_column: Option<String>,
}

impl PenguinEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn working_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_file = Some(path.into());
        self
    }

    pub fn default_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_file = Some(path.into());
        self
    }

    pub fn filter_column(mut self, column: impl Into<String>) -> Self {
        self.filter_column = Some(column.into());
        self
    }

    pub async fn build(self) -> Result<PenguinEngine> {
        let store = DatasetStore::new(
            self.working_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKING_FILE)),
            self.default_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ORIGINAL_FILE)),
        );
        let charts = ChartBuilder::new(
            self.filter_column
                .unwrap_or_else(|| DEFAULT_FILTER_COLUMN.to_string()),
        );

        store.initialize().await?;

        info!(
            working_file = %store.working_file().display(),
            filter_column = %charts.filter_column(),
            "Engine initialized"
        );

        Ok(PenguinEngine { store, charts })
    }
}
