//! Periodic weather refresh task
//!
//! Triggers a refresh cycle on a fixed interval, and once right away when
//! configured to. Ticks that arrive while a cycle is still running are
//! delayed rather than bunched up.

use std::sync::Arc;

use application::RefreshService;
use infrastructure::RefreshConfig;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, error, info};

/// Handle to the running scheduler
///
/// Dropping the handle also ends scheduling, without waiting for the task.
#[derive(Debug)]
pub struct RefreshScheduler {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Stop scheduling and wait for the task to exit
    ///
    /// A cycle already running keeps going on its own task and still
    /// updates the cache.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            error!(error = %e, "Refresh scheduler task failed");
        }
        info!("Refresh scheduler stopped");
    }

    /// Whether the task is still running
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Spawn the periodic refresh task
pub fn spawn_refresh_scheduler(
    service: Arc<RefreshService>,
    config: &RefreshConfig,
) -> RefreshScheduler {
    let period = config.interval();
    let run_on_startup = config.run_on_startup;
    let (stop, mut stopped) = watch::channel(false);

    info!(
        interval_secs = period.as_secs(),
        run_on_startup, "Starting refresh scheduler"
    );

    let handle = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if !run_on_startup {
            // First tick completes immediately
            ticker.tick().await;
        }

        loop {
            tokio::select! {
                _ = stopped.changed() => break,
                _ = ticker.tick() => {},
            }

            debug!("Scheduled refresh triggered");
            tokio::select! {
                _ = stopped.changed() => break,
                result = service.refresh() => match result {
                    Ok(snapshot) => debug!(
                        cycle = snapshot.cycle(),
                        locations = snapshot.len(),
                        "Scheduled refresh finished"
                    ),
                    Err(e) => error!(error = %e, "Scheduled refresh failed"),
                },
            }
        }
    });

    RefreshScheduler { stop, handle }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use application::{
        ApplicationError, Publisher, WeatherCache,
        ports::{ForecastPort, LocationRegistryPort},
    };
    use async_trait::async_trait;
    use domain::{ForecastSnapshot, Location, MarineReading, WindReading};

    use super::*;

    struct OneLocation;

    #[async_trait]
    impl LocationRegistryPort for OneLocation {
        async fn locations(&self) -> Result<Vec<Location>, ApplicationError> {
            Ok(vec![
                Location::parse("Goa", 15.4909, 73.8278).expect("valid location"),
            ])
        }
    }

    #[derive(Default)]
    struct CountingForecasts {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ForecastPort for CountingForecasts {
        async fn fetch_forecast(
            &self,
            location: &Location,
        ) -> Result<ForecastSnapshot, ApplicationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ForecastSnapshot::new(
                location.coordinates(),
                WindReading::default(),
                MarineReading::default(),
            ))
        }
    }

    fn service(forecasts: Arc<CountingForecasts>) -> Arc<RefreshService> {
        let cache = WeatherCache::new();
        Arc::new(RefreshService::new(
            Arc::new(OneLocation),
            forecasts,
            cache.clone(),
            Arc::new(Publisher::new(cache)),
        ))
    }

    fn config(run_on_startup: bool) -> RefreshConfig {
        RefreshConfig {
            interval_secs: 300,
            run_on_startup,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_on_startup_and_every_interval() {
        let forecasts = Arc::new(CountingForecasts::default());
        let service = service(Arc::clone(&forecasts));
        let scheduler = spawn_refresh_scheduler(Arc::clone(&service), &config(true));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(service.cache().get().cycle(), 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(service.cache().get().cycle(), 2);
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 2);

        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn skips_startup_refresh_when_disabled() {
        let forecasts = Arc::new(CountingForecasts::default());
        let service = service(Arc::clone(&forecasts));
        let scheduler = spawn_refresh_scheduler(Arc::clone(&service), &config(false));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(service.cache().get().cycle(), 0);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(service.cache().get().cycle(), 1);

        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_scheduling() {
        let forecasts = Arc::new(CountingForecasts::default());
        let service = service(Arc::clone(&forecasts));
        let scheduler = spawn_refresh_scheduler(Arc::clone(&service), &config(true));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(scheduler.is_running());
        scheduler.stop().await;

        tokio::time::sleep(Duration::from_secs(900)).await;
        assert_eq!(service.cache().get().cycle(), 1);
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 1);
    }
}
