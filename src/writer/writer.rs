use arrow::{
    array::{ArrayRef, BooleanArray, Float64Array, StringArray, UInt32Array},
    compute::concat_batches,
    record_batch::RecordBatch,
};
use object_store::{path::Path, ObjectStore};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::Compression,
    file::properties::WriterProperties,
};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use anyhow::{Result, Context};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{FuturesOrdered, StreamExt};
use tracing::{error, info, warn};
use crate::models::{LmsRecord, MetricKind, PercentileResult, Sex};
use crate::tables::ReferenceTable;
use crate::writer::MeasurementSink;

const MAX_CONCURRENT_WRITES: usize = 4;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const SD_COLUMNS: [&str; 7] = ["sd3neg", "sd2neg", "sd1neg", "sd0", "sd1", "sd2", "sd3"];

/// Writes reference curves and measurement history as Parquet files into an
/// object store.
pub struct ParquetChartWriter {
    write_semaphore: Arc<Semaphore>,
    object_store: Arc<dyn ObjectStore>,
    history_lock: Mutex<()>,
    max_attempts: u32,
}

impl ParquetChartWriter {
    pub fn new(object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            write_semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_WRITES)),
            object_store,
            history_lock: Mutex::new(()),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Number of `put` attempts per file. At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn chart_path(metric: MetricKind, sex: Sex) -> Path {
        Path::from(format!("charts/{}_{}.parquet", metric, sex))
    }

    pub fn history_path() -> Path {
        Path::from("history/measurements.parquet")
    }

    /// Exports every partition of `table` to its own file. Returns the number
    /// of files written.
    pub async fn write_reference_charts(&self, table: &ReferenceTable) -> Result<usize> {
        let mut chart_tasks = FuturesOrdered::new();

        for (metric, sex, records) in table.partitions() {
            let store = self.object_store.clone();
            let semaphore = self.write_semaphore.clone();
            let path = Self::chart_path(metric, sex);
            let records = records.to_vec();
            let max_attempts = self.max_attempts;

            let task = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let batch = create_record_batch_from_chart(metric, &records)?;
                write_batch_to_store(store, path, batch, max_attempts).await
            });

            chart_tasks.push_back(task);
        }

        let mut written = 0;
        while let Some(result) = chart_tasks.next().await {
            match result {
                Ok(Ok(_)) => written += 1,
                Ok(Err(e)) => {
                    error!("Chart write failed: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    error!("Task join failed: {}", e);
                    return Err(anyhow::anyhow!("Task join failed: {}", e));
                }
            }
        }

        info!("Exported {} reference charts", written);
        Ok(written)
    }
}

#[async_trait]
impl MeasurementSink for ParquetChartWriter {
    /// Appends `results` to the history file, creating it on first use.
    async fn persist(&self, results: &[PercentileResult]) -> Result<()> {
        if results.is_empty() {
            warn!("No measurements to persist");
            return Ok(());
        }

        // read-modify-write of the history object
        let _history = self.history_lock.lock().await;
        let _permit = self.write_semaphore.acquire().await?;

        let path = Self::history_path();
        let mut batches = read_batches_from_store(&self.object_store, &path).await?;
        let previous: usize = batches.iter().map(|b| b.num_rows()).sum();

        let batch = create_record_batch_from_results(results)?;
        let schema = batch.schema();
        batches.push(batch);
        let merged = concat_batches(&schema, &batches)
            .context("Existing measurement history has an incompatible schema")?;

        write_batch_to_store(self.object_store.clone(), path, merged, self.max_attempts).await?;

        info!(
            "Persisted {} measurements ({} already in history)",
            results.len(),
            previous
        );
        Ok(())
    }
}

// Helper functions
async fn write_batch_to_store(
    store: Arc<dyn ObjectStore>,
    path: Path,
    batch: RecordBatch,
    max_attempts: u32,
) -> Result<()> {
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
    }

    let payload = Bytes::from(buffer);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match store.put(&path, payload.clone().into()).await {
            Ok(_) => return Ok(()),
            Err(e) if attempt < max_attempts => {
                let delay = std::time::Duration::from_secs(2u64.pow(attempt));
                warn!(
                    "Write attempt {} of {} failed for {}: {}. Retrying in {}s",
                    attempt, max_attempts, path, e, delay.as_secs()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to write {} after {} attempts", path, attempt)))
            }
        }
    }
}

async fn read_batches_from_store(store: &Arc<dyn ObjectStore>, path: &Path) -> Result<Vec<RecordBatch>> {
    let bytes = match store.get(path).await {
        Ok(object) => object.bytes().await?,
        Err(object_store::Error::NotFound { .. }) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    ParquetRecordBatchReaderBuilder::try_new(bytes)?
        .build()?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to decode {}", path))
}

fn sd_columns<'a>(points: impl Iterator<Item = &'a [f64; 7]> + Clone) -> Vec<(&'static str, ArrayRef)> {
    SD_COLUMNS
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let column = points.clone().map(|p| p[idx]).collect::<Vec<_>>();
            (*name, Arc::new(Float64Array::from(column)) as ArrayRef)
        })
        .collect()
}

fn create_record_batch_from_chart(metric: MetricKind, records: &[LmsRecord]) -> Result<RecordBatch> {
    let mut columns = vec![
        ("age_index", Arc::new(UInt32Array::from(records.iter().map(|r| r.age_index).collect::<Vec<_>>())) as ArrayRef),
        ("age_unit", Arc::new(StringArray::from(records.iter().map(|_| metric.age_unit().to_string()).collect::<Vec<_>>())) as ArrayRef),
        ("l", Arc::new(Float64Array::from(records.iter().map(|r| r.l).collect::<Vec<_>>())) as ArrayRef),
        ("m", Arc::new(Float64Array::from(records.iter().map(|r| r.m).collect::<Vec<_>>())) as ArrayRef),
        ("s", Arc::new(Float64Array::from(records.iter().map(|r| r.s).collect::<Vec<_>>())) as ArrayRef),
    ];
    columns.extend(sd_columns(records.iter().map(|r| &r.sd.points)));

    RecordBatch::try_from_iter(columns).context("Failed to create reference chart record batch")
}

fn create_record_batch_from_results(results: &[PercentileResult]) -> Result<RecordBatch> {
    let mut columns = vec![
        ("metric", Arc::new(StringArray::from(results.iter().map(|r| r.query.metric.to_string()).collect::<Vec<_>>())) as ArrayRef),
        ("sex", Arc::new(StringArray::from(results.iter().map(|r| r.query.sex.to_string()).collect::<Vec<_>>())) as ArrayRef),
        ("age", Arc::new(Float64Array::from(results.iter().map(|r| r.query.age).collect::<Vec<_>>())) as ArrayRef),
        ("value", Arc::new(Float64Array::from(results.iter().map(|r| r.query.value).collect::<Vec<_>>())) as ArrayRef),
        ("z_score", Arc::new(Float64Array::from(results.iter().map(|r| r.z_score).collect::<Vec<_>>())) as ArrayRef),
        ("percentile", Arc::new(Float64Array::from(results.iter().map(|r| r.percentile).collect::<Vec<_>>())) as ArrayRef),
        ("band", Arc::new(StringArray::from(results.iter().map(|r| r.band.label().to_string()).collect::<Vec<_>>())) as ArrayRef),
        ("l", Arc::new(Float64Array::from(results.iter().map(|r| r.lms.l).collect::<Vec<_>>())) as ArrayRef),
        ("m", Arc::new(Float64Array::from(results.iter().map(|r| r.lms.m).collect::<Vec<_>>())) as ArrayRef),
        ("s", Arc::new(Float64Array::from(results.iter().map(|r| r.lms.s).collect::<Vec<_>>())) as ArrayRef),
        ("exact_match", Arc::new(BooleanArray::from(results.iter().map(|r| r.source.is_exact()).collect::<Vec<_>>())) as ArrayRef),
        ("approximate", Arc::new(BooleanArray::from(results.iter().map(|r| r.approximate).collect::<Vec<_>>())) as ArrayRef),
    ];
    columns.extend(sd_columns(results.iter().map(|r| &r.sd_reference.points)));

    RecordBatch::try_from_iter(columns).context("Failed to create measurement history record batch")
}
