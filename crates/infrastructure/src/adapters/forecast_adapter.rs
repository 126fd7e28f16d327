//! Forecast adapter - Implements ForecastPort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::ForecastPort;
use async_trait::async_trait;
use domain::{ForecastSnapshot, Location, MarineReading, WindReading};
use integration_weather::{
    ForecastClient, MarineForecast, OpenMeteoClient, WeatherConfig, WeatherError, WindForecast,
};
use tracing::{debug, instrument};

/// Adapter fetching wind and marine forecasts from Open-Meteo
pub struct OpenMeteoForecastAdapter {
    client: Arc<dyn ForecastClient>,
}

impl std::fmt::Debug for OpenMeteoForecastAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenMeteoForecastAdapter")
            .field("client", &"ForecastClient")
            .finish()
    }
}

impl OpenMeteoForecastAdapter {
    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenMeteoClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Wrap an existing client
    pub fn with_client(client: Arc<dyn ForecastClient>) -> Self {
        Self { client }
    }

    /// Map an integration error to an application error
    fn map_error(source: &str, location: &Location, err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::InvalidCoordinates => ApplicationError::Internal(format!(
                "{source} request for {} rejected coordinates {}",
                location.name(),
                location.coordinates()
            )),
            other => ApplicationError::UpstreamUnavailable(format!(
                "{source} forecast for {}: {other}",
                location.name()
            )),
        }
    }

    const fn map_wind(wind: WindForecast) -> WindReading {
        WindReading {
            speed: wind.speed,
            direction: wind.direction,
        }
    }

    const fn map_marine(marine: MarineForecast) -> MarineReading {
        MarineReading {
            wave_height: marine.wave_height,
            sea_surface_temperature: marine.sea_surface_temperature,
        }
    }
}

#[async_trait]
impl ForecastPort for OpenMeteoForecastAdapter {
    #[instrument(skip(self), fields(location = %location.name()))]
    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastSnapshot, ApplicationError> {
        let coordinates = location.coordinates();
        let (lat, lon) = (coordinates.latitude(), coordinates.longitude());

        let (wind, marine) = tokio::join!(
            self.client.get_wind(lat, lon),
            self.client.get_marine(lat, lon)
        );

        let wind = wind.map_err(|e| Self::map_error("wind", location, e))?;
        let marine = marine.map_err(|e| Self::map_error("marine", location, e))?;

        let snapshot = ForecastSnapshot::new(
            coordinates,
            Self::map_wind(wind),
            Self::map_marine(marine),
        );
        debug!(missing = snapshot.missing_readings(), "Forecast fetched");
        Ok(snapshot)
    }
}
