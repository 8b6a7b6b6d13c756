//! Pipeline driver: fetch, decode and hand over every configured region.

use crate::config::HarvestConfig;
use crate::decode::{decode, decode_many};
use crate::error::Result;
use crate::fetch::RegionFetcher;
use crate::http::{HttpTransport, Transport};
use crate::types::ResultRecord;

/// Receives decoded records as the pipeline produces them.
pub trait ResultSink {
    fn accept(&mut self, record: &ResultRecord) -> Result<()>;
}

impl ResultSink for Vec<ResultRecord> {
    fn accept(&mut self, record: &ResultRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

impl<F> ResultSink for F
where
    F: FnMut(&ResultRecord) -> Result<()>,
{
    fn accept(&mut self, record: &ResultRecord) -> Result<()> {
        self(record)
    }
}

/// Called before every fetch attempt with the region, the attempt number
/// and the attempt limit.
pub type AttemptHook = Box<dyn Fn(&str, u32, u32)>;

/// Sequential harvest over the regions of a [`HarvestConfig`].
///
/// Regions are processed one at a time in configuration order. The first
/// failure aborts the run.
pub struct Pipeline<T> {
    regions: Vec<String>,
    fetcher: RegionFetcher<T>,
    on_attempt: Option<AttemptHook>,
}

impl Pipeline<HttpTransport> {
    /// Build a pipeline that talks HTTP with the configured timeout.
    pub fn from_config(config: HarvestConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Self::new(config, transport)
    }
}

impl<T: Transport> Pipeline<T> {
    /// # Errors
    /// Fails if the configuration does not validate.
    pub fn new(config: HarvestConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let fetcher = RegionFetcher::from_config(&config, transport);
        Ok(Self {
            regions: config.regions,
            fetcher,
            on_attempt: None,
        })
    }

    /// Report every fetch attempt to `hook`, e.g. to drive a progress display.
    pub fn with_attempt_hook(mut self, hook: impl Fn(&str, u32, u32) + 'static) -> Self {
        self.on_attempt = Some(Box::new(hook));
        self
    }

    fn fetch(&self, region: &str) -> Result<String> {
        match &self.on_attempt {
            Some(hook) => self.fetcher.fetch_with(region, &**hook),
            None => self.fetcher.fetch(region),
        }
    }

    /// Fetch and decode every region, collecting the records in order.
    pub fn run(&self) -> Result<Vec<ResultRecord>> {
        let mut records: Vec<ResultRecord> = Vec::with_capacity(self.regions.len());
        self.run_with(&mut records)?;
        Ok(records)
    }

    /// Fetch and decode every region, passing each record to `sink` as soon
    /// as it is decoded.
    pub fn run_with<S: ResultSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for region in &self.regions {
            let raw = self.fetch(region)?;
            let record = decode(&raw)?;
            tracing::info!(
                region = record.region_id(),
                total_votes = record.total_votes(),
                "Region decoded"
            );
            sink.accept(&record)?;
        }
        Ok(())
    }

    /// Like [`run`](Self::run), but yields the district (`OKRES`) records
    /// of every region instead of the region totals.
    pub fn run_districts(&self) -> Result<Vec<ResultRecord>> {
        let mut records: Vec<ResultRecord> = Vec::new();
        self.run_districts_with(&mut records)?;
        Ok(records)
    }

    pub fn run_districts_with<S: ResultSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for region in &self.regions {
            let raw = self.fetch(region)?;
            let districts = decode_many(&raw)?;
            tracing::info!(region = %region, districts = districts.len(), "Districts decoded");
            for district in &districts {
                sink.accept(district)?;
            }
        }
        Ok(())
    }
}
