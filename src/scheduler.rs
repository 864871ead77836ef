//! Scheduled refresh: resolve → fetch → append, once per interval.
//!
//! The loop is single-flight: a tick is only taken after the previous cycle
//! has finished, and missed ticks are delayed rather than bursted, so two
//! cycles for the same location can never run concurrently.

use chrono::NaiveDateTime;
use common::{GeoPlace, Reading, Result, TIMESTAMP_FORMAT};
use geocoding_client::GeocodingClient;
use observation_store::ObservationStore;
use open_meteo_client::OpenMeteoClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Owned state of the refresh loop for one tracked location.
pub struct RefreshJob {
    geocoding: GeocodingClient,
    open_meteo: OpenMeteoClient,
    store: Arc<ObservationStore>,
    /// Display name handed to the geocoding API.
    city: String,
    /// Normalized store key.
    location_key: String,
    /// Coordinate cached after the first successful resolution. A later
    /// fetch failure keeps the cache; resolution is retried only while
    /// nothing has been cached yet.
    place: Option<GeoPlace>,
}

impl RefreshJob {
    pub fn new(
        geocoding: GeocodingClient,
        open_meteo: OpenMeteoClient,
        store: Arc<ObservationStore>,
        city: String,
        location_key: String,
    ) -> Self {
        Self {
            geocoding,
            open_meteo,
            store,
            city,
            location_key,
            place: None,
        }
    }

    /// Run one refresh cycle: resolve (or reuse) the coordinate, fetch the
    /// current weather, parse its timestamp, append the reading.
    ///
    /// Any failure aborts the cycle before the append — the store never sees
    /// a partial reading.
    pub async fn run_cycle(&mut self) -> Result<()> {
        let place = match &self.place {
            Some(cached) => cached.clone(),
            None => {
                let resolved = self.geocoding.resolve(&self.city).await?;
                info!(
                    "Resolved {} to {}, {} ({}, {})",
                    self.city, resolved.name, resolved.country, resolved.latitude,
                    resolved.longitude
                );
                self.place = Some(resolved.clone());
                resolved
            }
        };

        let current = self
            .open_meteo
            .fetch_current(place.latitude, place.longitude)
            .await?;

        let timestamp = NaiveDateTime::parse_from_str(&current.time, TIMESTAMP_FORMAT)?;

        self.store
            .append(
                &self.location_key,
                Reading {
                    timestamp,
                    value: current.temperature_2m,
                },
            )
            .await;

        info!(
            "Appended reading for {}: {:.1}° at {} ({} total)",
            self.location_key,
            current.temperature_2m,
            current.time,
            self.store.len(&self.location_key).await
        );

        Ok(())
    }

    /// Recurring loop. Cycle errors are logged and contained; the loop only
    /// exits when `shutdown` fires. A cycle in flight finishes before the
    /// loop stops.
    pub async fn run(mut self, period: Duration, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        warn!("Refresh cycle failed for {}: {}", self.city, e);
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("Refresh loop for {} stopping", self.city);
                    return;
                }
            }
        }
    }
}
