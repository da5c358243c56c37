//! Refresh engine: fetch cycles, the event channel, and the dispatcher.
//!
//! Every trigger (tick, selection change, mutation) spawns a short-lived
//! task that performs one fetch cycle and sends exactly one [`PollEvent`]
//! back. The run loop drains the channel and routes events through
//! [`apply_event`], the only place fetch results touch [`App`].
//!
//! Cycles are never cancelled. Overlap is resolved at apply time: a
//! timeseries result tagged with a stale target id is dropped, and an
//! overview replaces state wholesale so re-applying is harmless. An
//! overview carries no sequence number, so under pathological reordering
//! an older cycle can overwrite a newer one; the next tick repairs it.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::api::{AlertRecord, ApiError, Backend, NewTarget, Target, TargetId, TimeseriesPoint};
use crate::app::{App, SelectionChange};

/// Lookback windows and bounds used by the fetch cycles.
#[derive(Debug, Clone, Copy)]
pub struct FetchWindows {
    /// Availability lookback in hours.
    pub availability_hours: u32,
    /// Timeseries lookback in minutes.
    pub timeseries_minutes: u32,
    /// Maximum alerts per fetch.
    pub alerts_limit: u32,
}

impl Default for FetchWindows {
    fn default() -> Self {
        Self {
            availability_hours: 24,
            timeseries_minutes: 60,
            alerts_limit: 20,
        }
    }
}

/// One completed fetch cycle.
#[derive(Debug)]
pub enum PollEvent {
    /// Target list plus the availability batch computed over it.
    OverviewLoaded {
        targets: Vec<Target>,
        availability: BTreeMap<TargetId, Option<f64>>,
    },
    /// The target-list fetch failed; view state is left as it was.
    OverviewFailed(ApiError),
    TimeseriesLoaded {
        target_id: TargetId,
        points: Vec<TimeseriesPoint>,
    },
    TimeseriesFailed {
        target_id: TargetId,
        error: ApiError,
    },
    AlertsLoaded(Vec<AlertRecord>),
    AlertsFailed(ApiError),
    /// A target was created; it becomes the selection.
    TargetCreated(Target),
    /// A deletion was acknowledged; the next overview reconciles it.
    TargetDeleted(TargetId),
    /// A create or delete request failed.
    MutationFailed(ApiError),
}

/// Spawns fetch cycles and funnels their results into one channel.
///
/// Requests are fire-and-forget: each spawned task ends by sending one
/// event, and a full channel just delays that send, never the UI thread.
#[derive(Debug, Clone)]
pub struct Poller {
    backend: Arc<dyn Backend>,
    handle: Handle,
    events: mpsc::Sender<PollEvent>,
    windows: FetchWindows,
}

impl Poller {
    pub fn new(
        backend: Arc<dyn Backend>,
        handle: Handle,
        events: mpsc::Sender<PollEvent>,
        windows: FetchWindows,
    ) -> Self {
        Self {
            backend,
            handle,
            events,
            windows,
        }
    }

    /// Start one overview cycle: the target list, then availability for
    /// every listed target, delivered as a single event so the table and
    /// the availability column always move together.
    pub fn request_overview(&self) {
        let backend = self.backend.clone();
        let events = self.events.clone();
        let hours = self.windows.availability_hours;
        self.handle.spawn(async move {
            let event = match backend.overview().await {
                Ok(overview) => {
                    let ids: Vec<TargetId> = overview.targets.iter().map(|t| t.id).collect();
                    let availability = availability_map(backend.clone(), &ids, hours).await;
                    PollEvent::OverviewLoaded {
                        targets: overview.targets,
                        availability,
                    }
                }
                Err(error) => {
                    tracing::debug!(error = %error, "overview fetch failed");
                    PollEvent::OverviewFailed(error)
                }
            };
            let _ = events.send(event).await;
        });
    }

    /// Start a timeseries cycle for one target. The result is tagged, so
    /// a response arriving after the selection moved on is dropped at
    /// apply time.
    pub fn request_timeseries(&self, target_id: TargetId) {
        let backend = self.backend.clone();
        let events = self.events.clone();
        let minutes = self.windows.timeseries_minutes;
        self.handle.spawn(async move {
            let event = match backend.timeseries(target_id, minutes).await {
                Ok(response) => PollEvent::TimeseriesLoaded {
                    target_id,
                    points: response.series,
                },
                Err(error) => {
                    tracing::debug!(target_id = %target_id, error = %error, "timeseries fetch failed");
                    PollEvent::TimeseriesFailed { target_id, error }
                }
            };
            let _ = events.send(event).await;
        });
    }

    /// Start an alerts cycle.
    pub fn request_alerts(&self) {
        let backend = self.backend.clone();
        let events = self.events.clone();
        let limit = self.windows.alerts_limit;
        self.handle.spawn(async move {
            let event = match backend.alerts(limit).await {
                Ok(response) => PollEvent::AlertsLoaded(response.alerts),
                Err(error) => {
                    tracing::debug!(error = %error, "alerts fetch failed");
                    PollEvent::AlertsFailed(error)
                }
            };
            let _ = events.send(event).await;
        });
    }

    /// Create a target on the backend.
    pub fn request_create(&self, payload: NewTarget) {
        let backend = self.backend.clone();
        let events = self.events.clone();
        self.handle.spawn(async move {
            let event = match backend.create_target(&payload).await {
                Ok(target) => PollEvent::TargetCreated(target),
                Err(error) => {
                    tracing::warn!(error = %error, "target creation failed");
                    PollEvent::MutationFailed(error)
                }
            };
            let _ = events.send(event).await;
        });
    }

    /// Delete a target on the backend.
    pub fn request_delete(&self, id: TargetId) {
        let backend = self.backend.clone();
        let events = self.events.clone();
        self.handle.spawn(async move {
            let event = match backend.delete_target(id).await {
                Ok(()) => PollEvent::TargetDeleted(id),
                Err(error) => {
                    tracing::warn!(target_id = %id, error = %error, "target deletion failed");
                    PollEvent::MutationFailed(error)
                }
            };
            let _ = events.send(event).await;
        });
    }

    /// Fire everything a periodic tick refreshes: the overview cycle,
    /// the alerts cycle, and the chart for the current selection.
    pub fn request_tick(&self, selected: Option<TargetId>) {
        self.request_overview();
        self.request_alerts();
        if let Some(id) = selected {
            self.request_timeseries(id);
        }
    }
}

/// Availability for a set of targets, fetched concurrently.
///
/// The returned map has exactly one entry per input id. A failed fetch
/// (or one the backend answers with null) is recorded as unknown rather
/// than omitted, so one bad target never leaves a hole that blocks the
/// rest of the batch.
pub async fn availability_map(
    backend: Arc<dyn Backend>,
    ids: &[TargetId],
    hours: u32,
) -> BTreeMap<TargetId, Option<f64>> {
    let mut map: BTreeMap<TargetId, Option<f64>> = ids.iter().map(|id| (*id, None)).collect();

    let mut requests = JoinSet::new();
    for id in ids {
        let backend = backend.clone();
        let id = *id;
        requests.spawn(async move { (id, backend.availability(id, hours).await) });
    }

    while let Some(joined) = requests.join_next().await {
        match joined {
            Ok((id, Ok(response))) => {
                map.insert(id, response.availability);
            }
            Ok((id, Err(error))) => {
                tracing::debug!(target_id = %id, error = %error, "availability fetch failed");
            }
            Err(error) => {
                tracing::debug!(error = %error, "availability task failed");
            }
        }
    }

    map
}

/// Apply one completed cycle to the view state and fire the follow-up
/// fetches it calls for.
pub fn apply_event(app: &mut App, poller: &Poller, event: PollEvent) {
    match event {
        PollEvent::OverviewLoaded {
            targets,
            availability,
        } => match app.apply_overview(targets, availability) {
            SelectionChange::Selected(id) => poller.request_timeseries(id),
            SelectionChange::Cleared | SelectionChange::Unchanged => {}
        },
        PollEvent::OverviewFailed(error) => {
            app.set_error(error.to_string());
        }
        PollEvent::TimeseriesLoaded { target_id, points } => {
            app.apply_timeseries(target_id, points);
        }
        PollEvent::TimeseriesFailed { error, .. } => {
            // Keep the stale chart rather than clearing it
            app.set_error(error.to_string());
        }
        PollEvent::AlertsLoaded(alerts) => {
            app.apply_alerts(alerts);
        }
        PollEvent::AlertsFailed(error) => {
            app.set_error(error.to_string());
        }
        PollEvent::TargetCreated(target) => {
            app.clear_error();
            app.select(target.id);
            poller.request_timeseries(target.id);
            poller.request_overview();
        }
        PollEvent::TargetDeleted(_) => {
            app.clear_error();
            poller.request_overview();
        }
        PollEvent::MutationFailed(error) => {
            app.set_error(error.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::api::{AlertsResponse, ApiResult, AvailabilityResponse, Overview, TimeseriesResponse};
    use crate::ui::Theme;

    /// Scripted in-memory backend. Anything not scripted fails with a
    /// network error, which doubles as the failure case in tests.
    #[derive(Debug, Default)]
    struct MockBackend {
        overview: Mutex<Option<Vec<Target>>>,
        availability: Mutex<HashMap<TargetId, Option<f64>>>,
        timeseries: Mutex<HashMap<TargetId, Vec<TimeseriesPoint>>>,
        alerts: Mutex<Option<Vec<AlertRecord>>>,
        created: Mutex<Option<Target>>,
        overview_calls: AtomicUsize,
        availability_calls: AtomicUsize,
        timeseries_calls: AtomicUsize,
    }

    impl MockBackend {
        fn with_targets(targets: Vec<Target>) -> Self {
            let backend = Self::default();
            *backend.overview.lock().unwrap() = Some(targets);
            backend
        }

        fn script_availability(&self, id: i64, value: Option<f64>) {
            self.availability.lock().unwrap().insert(TargetId(id), value);
        }

        fn script_timeseries(&self, id: i64, points: Vec<TimeseriesPoint>) {
            self.timeseries.lock().unwrap().insert(TargetId(id), points);
        }
    }

    #[async_trait::async_trait]
    impl Backend for MockBackend {
        async fn overview(&self) -> ApiResult<Overview> {
            self.overview_calls.fetch_add(1, Ordering::SeqCst);
            match self.overview.lock().unwrap().clone() {
                Some(targets) => Ok(Overview {
                    window_minutes: 60,
                    targets,
                }),
                None => Err(ApiError::Network("overview unavailable".to_string())),
            }
        }

        async fn availability(&self, id: TargetId, hours: u32) -> ApiResult<AvailabilityResponse> {
            self.availability_calls.fetch_add(1, Ordering::SeqCst);
            match self.availability.lock().unwrap().get(&id).copied() {
                Some(value) => Ok(AvailabilityResponse {
                    target_id: id,
                    hours,
                    availability: value,
                }),
                None => Err(ApiError::Http { status: 500 }),
            }
        }

        async fn timeseries(&self, id: TargetId, minutes: u32) -> ApiResult<TimeseriesResponse> {
            self.timeseries_calls.fetch_add(1, Ordering::SeqCst);
            match self.timeseries.lock().unwrap().get(&id).cloned() {
                Some(series) => Ok(TimeseriesResponse {
                    target_id: id,
                    minutes,
                    series,
                }),
                None => Err(ApiError::Http { status: 404 }),
            }
        }

        async fn alerts(&self, _limit: u32) -> ApiResult<AlertsResponse> {
            match self.alerts.lock().unwrap().clone() {
                Some(alerts) => Ok(AlertsResponse { alerts }),
                None => Err(ApiError::Network("alerts unavailable".to_string())),
            }
        }

        async fn create_target(&self, _payload: &NewTarget) -> ApiResult<Target> {
            match self.created.lock().unwrap().clone() {
                Some(target) => Ok(target),
                None => Err(ApiError::Http { status: 422 }),
            }
        }

        async fn delete_target(&self, _id: TargetId) -> ApiResult<()> {
            Ok(())
        }
    }

    fn target(id: i64, name: &str) -> Target {
        Target {
            id: TargetId(id),
            name: name.to_string(),
            url: format!("https://{}.example.com", name),
            enabled: true,
            latest_status_code: Some(200),
            latest_error: None,
            latest_response_time_ms: Some(10.0),
            latest_dns_time_ms: None,
            latest_ts: Some("2025-06-01T12:00:00+00:00".to_string()),
        }
    }

    fn point(ms: f64) -> TimeseriesPoint {
        TimeseriesPoint {
            ts: "2025-06-01T12:00:00+00:00".to_string(),
            response_time_ms: Some(ms),
        }
    }

    fn poller(
        backend: Arc<MockBackend>,
    ) -> (Poller, mpsc::Receiver<PollEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let poller = Poller::new(backend, Handle::current(), tx, FetchWindows::default());
        (poller, rx)
    }

    fn app() -> App {
        App::new("http://127.0.0.1:8000", Theme::dark())
    }

    #[tokio::test]
    async fn test_availability_map_complete_on_partial_failure() {
        let backend = Arc::new(MockBackend::default());
        // id 5 is unscripted and fails with HTTP 500; id 7 succeeds
        backend.script_availability(7, Some(0.987));

        let ids = [TargetId(5), TargetId(7)];
        let map = availability_map(backend, &ids, 24).await;

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&TargetId(5)), Some(&None));
        assert_eq!(map.get(&TargetId(7)), Some(&Some(0.987)));
    }

    #[tokio::test]
    async fn test_availability_map_null_reads_as_unknown() {
        let backend = Arc::new(MockBackend::default());
        backend.script_availability(3, None);

        let map = availability_map(backend, &[TargetId(3)], 24).await;
        assert_eq!(map.get(&TargetId(3)), Some(&None));
    }

    #[tokio::test]
    async fn test_availability_map_empty_ids() {
        let backend = Arc::new(MockBackend::default());
        let map = availability_map(backend.clone(), &[], 24).await;
        assert!(map.is_empty());
        assert_eq!(backend.availability_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_overview_cycle_delivers_one_event() {
        let backend = Arc::new(MockBackend::with_targets(vec![
            target(1, "api"),
            target(2, "web"),
        ]));
        backend.script_availability(1, Some(1.0));
        backend.script_availability(2, Some(0.5));

        let (poller, mut rx) = poller(backend);
        poller.request_overview();

        match rx.recv().await.unwrap() {
            PollEvent::OverviewLoaded {
                targets,
                availability,
            } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(availability.len(), 2);
                assert_eq!(availability.get(&TargetId(1)), Some(&Some(1.0)));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_overview_failure_skips_availability() {
        let backend = Arc::new(MockBackend::default());
        let (poller, mut rx) = poller(backend.clone());

        poller.request_overview();

        assert!(matches!(
            rx.recv().await.unwrap(),
            PollEvent::OverviewFailed(ApiError::Network(_))
        ));
        assert_eq!(backend.availability_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_overview_failure_is_fail_soft() {
        let backend = Arc::new(MockBackend::default());
        let (poller, _rx) = poller(backend);

        let mut app = app();
        app.apply_overview(
            vec![target(1, "api")],
            [(TargetId(1), Some(0.9))].into_iter().collect(),
        );

        apply_event(
            &mut app,
            &poller,
            PollEvent::OverviewFailed(ApiError::Network("connection refused".to_string())),
        );

        // Everything stays; only the error line changes
        assert_eq!(app.targets.len(), 1);
        assert_eq!(app.availability_of(TargetId(1)), Some(0.9));
        assert_eq!(app.selected(), Some(TargetId(1)));
        assert_eq!(
            app.last_error.as_deref(),
            Some("network error: connection refused")
        );
    }

    #[tokio::test]
    async fn test_selection_change_triggers_timeseries() {
        let backend = Arc::new(MockBackend::default());
        backend.script_timeseries(1, vec![point(12.0)]);
        let (poller, mut rx) = poller(backend);

        let mut app = app();
        apply_event(
            &mut app,
            &poller,
            PollEvent::OverviewLoaded {
                targets: vec![target(1, "api"), target(2, "web")],
                availability: BTreeMap::new(),
            },
        );
        assert_eq!(app.selected(), Some(TargetId(1)));

        // The dispatcher fired a fetch for the fresh selection
        let event = rx.recv().await.unwrap();
        match &event {
            PollEvent::TimeseriesLoaded { target_id, points } => {
                assert_eq!(*target_id, TargetId(1));
                assert_eq!(points.len(), 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        apply_event(&mut app, &poller, event);
        assert_eq!(app.chart_series().unwrap().target_id, TargetId(1));
    }

    #[tokio::test]
    async fn test_stale_timeseries_dropped_through_dispatcher() {
        let backend = Arc::new(MockBackend::default());
        let (poller, _rx) = poller(backend);

        let mut app = app();
        app.apply_overview(vec![target(3, "a"), target(4, "b")], BTreeMap::new());
        app.select(TargetId(4));

        // A late result for the previous selection arrives afterward
        apply_event(
            &mut app,
            &poller,
            PollEvent::TimeseriesLoaded {
                target_id: TargetId(3),
                points: vec![point(99.0)],
            },
        );
        assert!(app.chart_series().is_none());

        apply_event(
            &mut app,
            &poller,
            PollEvent::TimeseriesLoaded {
                target_id: TargetId(4),
                points: vec![point(7.0)],
            },
        );
        let series = app.chart_series().unwrap();
        assert_eq!(series.target_id, TargetId(4));
        assert_eq!(series.points[0].response_time_ms, Some(7.0));
    }

    #[tokio::test]
    async fn test_created_target_selected_and_reconciled() {
        let created = target(9, "new");
        let backend = Arc::new(MockBackend::with_targets(vec![
            target(1, "api"),
            created.clone(),
        ]));
        backend.script_availability(1, Some(1.0));
        backend.script_availability(9, Some(1.0));
        backend.script_timeseries(9, vec![point(3.0)]);
        *backend.created.lock().unwrap() = Some(created.clone());

        let (poller, mut rx) = poller(backend);
        let mut app = app();

        apply_event(&mut app, &poller, PollEvent::TargetCreated(created));
        assert_eq!(app.selected(), Some(TargetId(9)));

        // The dispatcher fired a timeseries cycle and an overview cycle;
        // apply both in whatever order they complete
        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            apply_event(&mut app, &poller, event);
        }

        assert!(app.contains_target(TargetId(9)));
        assert_eq!(app.selected(), Some(TargetId(9)));
        assert_eq!(app.chart_series().unwrap().target_id, TargetId(9));
    }

    #[tokio::test]
    async fn test_deleted_target_reconciles_on_refresh() {
        // Backend already answers without the deleted target
        let backend = Arc::new(MockBackend::with_targets(vec![target(1, "api")]));
        backend.script_availability(1, Some(1.0));

        let (poller, mut rx) = poller(backend);
        let mut app = app();
        app.apply_overview(vec![target(1, "api"), target(2, "web")], BTreeMap::new());
        app.select(TargetId(2));

        apply_event(&mut app, &poller, PollEvent::TargetDeleted(TargetId(2)));
        // Deletion alone does not move the selection
        assert_eq!(app.selected(), Some(TargetId(2)));

        // The triggered overview applies the fallback rule
        let event = rx.recv().await.unwrap();
        apply_event(&mut app, &poller, event);
        assert_eq!(app.selected(), Some(TargetId(1)));
        assert!(!app.contains_target(TargetId(2)));
    }

    #[tokio::test]
    async fn test_tick_skips_timeseries_without_selection() {
        let backend = Arc::new(MockBackend::with_targets(Vec::new()));
        *backend.alerts.lock().unwrap() = Some(Vec::new());

        let (poller, mut rx) = poller(backend.clone());
        poller.request_tick(None);

        // Exactly two cycles complete: overview and alerts
        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        assert_eq!(backend.timeseries_calls.load(Ordering::SeqCst), 0);

        poller.request_tick(Some(TargetId(1)));
        for _ in 0..3 {
            rx.recv().await.unwrap();
        }
        assert_eq!(backend.timeseries_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mutation_failure_surfaces_error() {
        let backend = Arc::new(MockBackend::default());
        let (poller, _rx) = poller(backend);
        let mut app = app();

        apply_event(
            &mut app,
            &poller,
            PollEvent::MutationFailed(ApiError::Http { status: 422 }),
        );
        assert_eq!(app.last_error.as_deref(), Some("HTTP 422"));
    }

    #[tokio::test]
    async fn test_alerts_failure_keeps_existing_alerts() {
        let backend = Arc::new(MockBackend::default());
        let (poller, _rx) = poller(backend);
        let mut app = app();
        app.apply_alerts(vec![AlertRecord {
            id: 1,
            ts: "2025-06-01T12:00:00+00:00".to_string(),
            target_id: TargetId(1),
            message: "latency above threshold".to_string(),
        }]);

        apply_event(
            &mut app,
            &poller,
            PollEvent::AlertsFailed(ApiError::Http { status: 502 }),
        );
        assert_eq!(app.alerts.len(), 1);
        assert_eq!(app.last_error.as_deref(), Some("HTTP 502"));
    }
}
