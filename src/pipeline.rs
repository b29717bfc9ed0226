//! Background fetch pipeline
//!
//! Runs forecast and icon requests on tokio tasks and reports their results
//! over a channel. Only the receiving side (the UI loop) applies results to
//! view state.

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use crate::cache::{fetch_icon, Icon, IconCache, IconClaim};
use crate::data::{ForecastClient, ForecastDay, ForecastError};

/// Maximum number of forecast requests running at once
pub const MAX_CONCURRENT_REQUESTS: usize = 4;

/// Maximum number of icon downloads running at once
pub const MAX_CONCURRENT_ICONS: usize = 4;

/// Capacity of the result channel
const CHANNEL_CAPACITY: usize = 64;

/// Messages sent from background tasks to the UI loop
#[derive(Debug, Clone)]
pub enum PipelineMessage {
    /// A forecast request completed and parsed successfully
    ForecastLoaded {
        generation: u64,
        city: String,
        days: Vec<ForecastDay>,
    },
    /// A forecast request failed; view state must stay as it was
    ForecastFailed {
        generation: u64,
        error: ForecastError,
    },
    /// An icon was downloaded and is now in the cache
    IconLoaded { url: String },
    /// An icon download or decode failed
    IconFailed { url: String },
}

/// Result of asking the pipeline for an icon
#[derive(Debug, Clone)]
pub enum IconRequest {
    /// Served from cache, no I/O performed
    Ready(Arc<Icon>),
    /// A download is running; an `IconLoaded` or `IconFailed` message follows
    Pending,
    /// The pipeline is shut down and will not download it
    Unavailable,
}

/// Owns the worker budgets, the icon cache handle and the result channel
///
/// Forecasts and icons draw from separate budgets so that slow icon hosts
/// never hold up a forecast.
pub struct ForecastPipeline {
    client: ForecastClient,
    icons: IconCache,
    forecast_permits: Arc<Semaphore>,
    icon_permits: Arc<Semaphore>,
    sender: mpsc::Sender<PipelineMessage>,
    receiver: mpsc::Receiver<PipelineMessage>,
    generation: u64,
}

impl ForecastPipeline {
    /// Creates a pipeline around `client`, storing icons in `icons`
    pub fn new(client: ForecastClient, icons: IconCache) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            client,
            icons,
            forecast_permits: Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS)),
            icon_permits: Arc::new(Semaphore::new(MAX_CONCURRENT_ICONS)),
            sender,
            receiver,
            generation: 0,
        }
    }

    pub fn client(&self) -> &ForecastClient {
        &self.client
    }

    pub fn icons(&self) -> &IconCache {
        &self.icons
    }

    /// Generation number of the most recent accepted forecast request
    pub fn latest_generation(&self) -> u64 {
        self.generation
    }

    /// Whether the pipeline still accepts new work
    pub fn is_running(&self) -> bool {
        !self.forecast_permits.is_closed()
    }

    /// Starts a background forecast request for `city`
    ///
    /// The URL is built before anything is spawned, so invalid input fails
    /// here without a network call.
    ///
    /// # Returns
    /// * `Ok(generation)` - The request was started; its result carries this number
    /// * `Err(ForecastError::InvalidInput)` - The city could not be encoded into a URL
    /// * `Err(ForecastError::Connect)` - The pipeline has been shut down
    pub fn request_forecast(&mut self, city: &str) -> Result<u64, ForecastError> {
        if !self.is_running() {
            return Err(ForecastError::Connect("pipeline is shut down".to_string()));
        }
        let url = self.client.build_url(city)?;

        self.generation += 1;
        let generation = self.generation;
        let city = city.trim().to_string();
        let client = self.client.clone();
        let permits = Arc::clone(&self.forecast_permits);
        let tx = self.sender.clone();

        info!(generation, city = %city, "requesting forecast");
        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                debug!(generation, "pipeline shut down before forecast request started");
                return;
            };

            let message = match client.fetch(url).await {
                Ok(days) => PipelineMessage::ForecastLoaded {
                    generation,
                    city,
                    days,
                },
                Err(error) => PipelineMessage::ForecastFailed { generation, error },
            };
            let _ = tx.send(message).await;
        });

        Ok(generation)
    }

    /// Returns the icon for `url` from cache or starts downloading it
    ///
    /// At most one download per URL runs at a time, and a URL that was
    /// downloaded once is never fetched again.
    pub fn request_icon(&self, url: &str) -> IconRequest {
        match self.icons.claim(url) {
            IconClaim::Hit(icon) => IconRequest::Ready(icon),
            IconClaim::InFlight => IconRequest::Pending,
            IconClaim::Claimed => {
                if !self.is_running() {
                    self.icons.release(url);
                    return IconRequest::Unavailable;
                }
                self.spawn_icon_download(url.to_string());
                IconRequest::Pending
            }
        }
    }

    fn spawn_icon_download(&self, url: String) {
        let http = self.client.http().clone();
        let icons = self.icons.clone();
        let permits = Arc::clone(&self.icon_permits);
        let tx = self.sender.clone();

        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                icons.release(&url);
                return;
            };

            let message = match fetch_icon(&http, &url).await {
                Ok(icon) => {
                    debug!(
                        url = %url,
                        width = icon.width(),
                        height = icon.height(),
                        "icon cached"
                    );
                    icons.insert(&url, icon);
                    PipelineMessage::IconLoaded { url }
                }
                Err(e) => {
                    icons.release(&url);
                    warn!(url = %url, error = %e, "icon download failed");
                    PipelineMessage::IconFailed { url }
                }
            };
            let _ = tx.send(message).await;
        });
    }

    /// Checks for a pending result without blocking
    pub fn try_recv(&mut self) -> Option<PipelineMessage> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next result
    pub async fn recv(&mut self) -> Option<PipelineMessage> {
        self.receiver.recv().await
    }

    /// Stops accepting new work
    ///
    /// Requests already holding a worker slot run to completion and still
    /// deliver their results; queued ones are dropped.
    pub fn shutdown(&self) {
        if self.is_running() {
            info!("shutting down fetch pipeline");
            self.forecast_permits.close();
            self.icon_permits.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> ForecastPipeline {
        ForecastPipeline::new(ForecastClient::new("test-key"), IconCache::new())
    }

    #[test]
    fn test_new_pipeline_is_running_and_idle() {
        let mut pipeline = pipeline();
        assert!(pipeline.is_running());
        assert_eq!(pipeline.latest_generation(), 0);
        assert!(pipeline.try_recv().is_none());
    }

    #[test]
    fn test_invalid_city_fails_without_spawning() {
        // No tokio runtime here: spawning would panic, so this also proves
        // nothing was scheduled.
        let mut pipeline = pipeline();
        let result = pipeline.request_forecast("   ");

        assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
        assert_eq!(pipeline.latest_generation(), 0);
    }

    #[test]
    fn test_shutdown_rejects_new_forecast_requests() {
        let mut pipeline = pipeline();
        pipeline.shutdown();

        assert!(!pipeline.is_running());
        assert!(matches!(
            pipeline.request_forecast("Boston"),
            Err(ForecastError::Connect(_))
        ));
    }

    #[test]
    fn test_shutdown_rejects_new_icon_downloads() {
        let pipeline = pipeline();
        pipeline.shutdown();

        let url = "https://cdn.weatherapi.com/weather/64x64/day/113.png";
        assert!(matches!(pipeline.request_icon(url), IconRequest::Unavailable));
        assert!(!pipeline.icons().is_loading(url));
    }

    #[test]
    fn test_cached_icon_is_served_without_io() {
        let pipeline = pipeline();
        let url = "https://cdn.weatherapi.com/weather/64x64/day/113.png";
        pipeline.icons().insert(
            url,
            Icon::from_image(image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255]))),
        );

        // No runtime: a download attempt would panic.
        assert!(matches!(pipeline.request_icon(url), IconRequest::Ready(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_reports_connect_error() {
        let client = ForecastClient::new("k")
            .with_base_url("http://127.0.0.1:9/v1/forecast.json?key={key}&q={city}");
        let mut pipeline = ForecastPipeline::new(client, IconCache::new());

        let generation = pipeline.request_forecast("Boston").unwrap();
        assert_eq!(generation, 1);

        match pipeline.recv().await {
            Some(PipelineMessage::ForecastFailed { generation, error }) => {
                assert_eq!(generation, 1);
                assert!(matches!(error, ForecastError::Connect(_)));
            }
            other => panic!("Expected ForecastFailed, got {:?}", other),
        }
    }
}
