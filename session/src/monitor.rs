use crate::error::ClientError;
use crate::runtime::{PeriodicTask, Runtime};
use shared::{
    sort_newest_first, Detection, JobId, ProgressPhase, ProgressSnapshot, UploadAck, UploadConfig,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// The monitoring backend's HTTP surface.
#[allow(async_fn_in_trait)]
pub trait MonitorApi {
    /// Whatever the platform hands us as the picked video file.
    type Video;

    async fn upload_video(
        &self,
        video: Self::Video,
        config: UploadConfig,
    ) -> Result<UploadAck, ClientError>;

    async fn fetch_progress(&self) -> Result<ProgressSnapshot, ClientError>;

    async fn fetch_detections(&self) -> Result<Vec<Detection>, ClientError>;
}

impl<T: MonitorApi + ?Sized> MonitorApi for Rc<T> {
    type Video = T::Video;

    async fn upload_video(
        &self,
        video: Self::Video,
        config: UploadConfig,
    ) -> Result<UploadAck, ClientError> {
        (**self).upload_video(video, config).await
    }

    async fn fetch_progress(&self) -> Result<ProgressSnapshot, ClientError> {
        (**self).fetch_progress().await
    }

    async fn fetch_detections(&self) -> Result<Vec<Detection>, ClientError> {
        (**self).fetch_detections().await
    }
}

/// Where the dashboard draws what the session learns.
pub trait MonitorView {
    fn render_upload_pending(&self, job: JobId);
    fn render_upload_accepted(&self, job: JobId, ack: &UploadAck);
    fn render_upload_failed(&self, job: JobId, error: &ClientError);
    fn render_progress(&self, snapshot: &ProgressSnapshot, phase: ProgressPhase);
    /// Receives the list already sorted newest-first.
    fn render_detections(&self, detections: &[Detection]);
    fn render_detections_failed(&self, error: &ClientError);
}

impl<T: MonitorView + ?Sized> MonitorView for Rc<T> {
    fn render_upload_pending(&self, job: JobId) {
        (**self).render_upload_pending(job)
    }

    fn render_upload_accepted(&self, job: JobId, ack: &UploadAck) {
        (**self).render_upload_accepted(job, ack)
    }

    fn render_upload_failed(&self, job: JobId, error: &ClientError) {
        (**self).render_upload_failed(job, error)
    }

    fn render_progress(&self, snapshot: &ProgressSnapshot, phase: ProgressPhase) {
        (**self).render_progress(snapshot, phase)
    }

    fn render_detections(&self, detections: &[Detection]) {
        (**self).render_detections(detections)
    }

    fn render_detections_failed(&self, error: &ClientError) {
        (**self).render_detections_failed(error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOptions {
    pub progress_period: Duration,
    pub detections_period: Duration,
    /// Pages without a progress bar leave this off.
    pub poll_progress: bool,
    /// Pages without a detections table leave this off.
    pub poll_detections: bool,
    /// Whether a finished job also stops the detections poll.
    pub stop_detections_on_finish: bool,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            progress_period: Duration::from_secs(1),
            detections_period: Duration::from_secs(3),
            poll_progress: true,
            poll_detections: true,
            stop_detections_on_finish: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    #[default]
    Idle,
    Uploading(JobId),
    Active(JobId),
    UploadFailed(JobId),
    Finished(JobId),
    Inactive(JobId),
}

impl MonitorState {
    pub fn job(&self) -> Option<JobId> {
        match *self {
            MonitorState::Idle => None,
            MonitorState::Uploading(job)
            | MonitorState::Active(job)
            | MonitorState::UploadFailed(job)
            | MonitorState::Finished(job)
            | MonitorState::Inactive(job) => Some(job),
        }
    }
}

/// One dashboard's upload and polling lifecycle.
///
/// Only one job is tracked; submitting again abandons the previous one.
pub struct MonitorSession<A: MonitorApi, V: MonitorView> {
    inner: Rc<Inner<A, V>>,
}

impl<A: MonitorApi, V: MonitorView> Clone for MonitorSession<A, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct Inner<A: MonitorApi, V: MonitorView> {
    api: A,
    view: V,
    runtime: Rc<dyn Runtime>,
    options: MonitorOptions,
    state: Cell<MonitorState>,
    progress_task: RefCell<Option<PeriodicTask>>,
    detections_task: RefCell<Option<PeriodicTask>>,
}

impl<A, V> MonitorSession<A, V>
where
    A: MonitorApi + 'static,
    A::Video: 'static,
    V: MonitorView + 'static,
{
    pub fn new(api: A, view: V, runtime: Rc<dyn Runtime>, options: MonitorOptions) -> Self {
        Self {
            inner: Rc::new(Inner {
                api,
                view,
                runtime,
                options,
                state: Cell::new(MonitorState::Idle),
                progress_task: RefCell::new(None),
                detections_task: RefCell::new(None),
            }),
        }
    }

    pub fn state(&self) -> MonitorState {
        self.inner.state.get()
    }

    pub fn is_polling_progress(&self) -> bool {
        Inner::<A, V>::task_active(&self.inner.progress_task)
    }

    pub fn is_polling_detections(&self) -> bool {
        Inner::<A, V>::task_active(&self.inner.detections_task)
    }

    /// Starts a new job. Polling for any previous job stops right away.
    pub fn submit(&self, video: A::Video, config: UploadConfig) -> JobId {
        let inner = &self.inner;
        inner.stop_polling();

        let job = JobId::new();
        inner.set_state(MonitorState::Uploading(job));
        inner.view.render_upload_pending(job);
        log::info!(
            "Uploading video for job {} (interval {}s, tree detection {})",
            job,
            config.detection_interval.seconds(),
            config.tree_detection_enabled
        );

        let this = Rc::clone(inner);
        inner.runtime.spawn(Box::pin(async move {
            let result = this.api.upload_video(video, config).await;
            this.finish_upload(job, result);
        }));

        job
    }

    /// One-off fetch of progress and detections without starting any timer.
    pub fn refresh(&self) {
        let job = match self.inner.state.get() {
            MonitorState::Active(job) => Some(job),
            _ => None,
        };
        if self.inner.options.poll_progress {
            self.inner.spawn_progress_poll(job);
        }
        if self.inner.options.poll_detections {
            self.inner.spawn_detections_poll(job);
        }
    }

    /// Cancels both polls, leaving the state as it is.
    pub fn stop(&self) {
        self.inner.stop_polling();
    }
}

impl<A, V> Inner<A, V>
where
    A: MonitorApi + 'static,
    V: MonitorView + 'static,
{
    fn set_state(&self, next: MonitorState) {
        let previous = self.state.replace(next);
        if previous != next {
            log::debug!("Monitor state {:?} -> {:?}", previous, next);
        }
    }

    fn task_active(slot: &RefCell<Option<PeriodicTask>>) -> bool {
        slot.borrow().as_ref().is_some_and(PeriodicTask::is_active)
    }

    fn cancel_task(slot: &RefCell<Option<PeriodicTask>>) {
        let task = slot.borrow_mut().take();
        if let Some(mut task) = task {
            task.cancel();
        }
    }

    fn stop_polling(&self) {
        Self::cancel_task(&self.progress_task);
        Self::cancel_task(&self.detections_task);
    }

    fn finish_upload(self: &Rc<Self>, job: JobId, result: Result<UploadAck, ClientError>) {
        if self.state.get() != MonitorState::Uploading(job) {
            log::debug!("Dropping upload response for superseded job {}", job);
            return;
        }

        match result {
            Ok(ack) => {
                log::info!("Monitoring started for job {}: {}", job, ack.summary());
                self.set_state(MonitorState::Active(job));
                self.view.render_upload_accepted(job, &ack);
                self.start_polling(job);
            }
            Err(err) => {
                log::error!("Upload for job {} failed: {}", job, err);
                self.stop_polling();
                self.set_state(MonitorState::UploadFailed(job));
                self.view.render_upload_failed(job, &err);
            }
        }
    }

    fn start_polling(self: &Rc<Self>, job: JobId) {
        if self.options.poll_progress {
            let weak = Rc::downgrade(self);
            let task = PeriodicTask::start(
                &*self.runtime,
                "progress",
                self.options.progress_period,
                move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.spawn_progress_poll(Some(job));
                    }
                },
            );
            *self.progress_task.borrow_mut() = Some(task);
            self.spawn_progress_poll(Some(job));
        }

        if self.options.poll_detections {
            let weak = Rc::downgrade(self);
            let task = PeriodicTask::start(
                &*self.runtime,
                "detections",
                self.options.detections_period,
                move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.spawn_detections_poll(Some(job));
                    }
                },
            );
            *self.detections_task.borrow_mut() = Some(task);
            self.spawn_detections_poll(Some(job));
        }
    }

    fn spawn_progress_poll(self: &Rc<Self>, job: Option<JobId>) {
        let this = Rc::clone(self);
        self.runtime.spawn(Box::pin(async move {
            let snapshot = match this.api.fetch_progress().await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    log::warn!("Failed to fetch progress: {}", err);
                    ProgressSnapshot::idle()
                }
            };
            this.apply_progress(job, snapshot);
        }));
    }

    fn spawn_detections_poll(self: &Rc<Self>, job: Option<JobId>) {
        let this = Rc::clone(self);
        self.runtime.spawn(Box::pin(async move {
            let result = this.api.fetch_detections().await;
            this.apply_detections(job, result);
        }));
    }

    fn apply_progress(&self, job: Option<JobId>, snapshot: ProgressSnapshot) {
        let state = self.state.get();
        let current = match (job, state) {
            (Some(job), MonitorState::Active(active)) if job == active => Some(job),
            (None, MonitorState::Active(_)) | (Some(_), _) => {
                log::debug!("Dropping progress reading taken for {:?}, now {:?}", job, state);
                return;
            }
            (None, _) => None,
        };

        let phase = snapshot.phase();
        self.view.render_progress(&snapshot, phase);

        let Some(job) = current else {
            return;
        };
        if !phase.is_terminal() {
            return;
        }

        Self::cancel_task(&self.progress_task);
        if phase == ProgressPhase::Finished {
            log::info!("Monitoring finished for job {}", job);
            self.set_state(MonitorState::Finished(job));
            if self.options.stop_detections_on_finish {
                Self::cancel_task(&self.detections_task);
            }
        } else {
            log::warn!(
                "Monitoring for job {} stopped at {}/{} frames",
                job,
                snapshot.processed_frames,
                snapshot.total_frames
            );
            self.set_state(MonitorState::Inactive(job));
            Self::cancel_task(&self.detections_task);
        }
    }

    fn apply_detections(&self, job: Option<JobId>, result: Result<Vec<Detection>, ClientError>) {
        let state = self.state.get();
        let stale = match job {
            Some(job) => state.job() != Some(job),
            None => matches!(state, MonitorState::Active(_)),
        };
        if stale {
            log::debug!("Dropping detections taken for {:?}, now {:?}", job, state);
            return;
        }

        match result {
            Ok(mut detections) => {
                sort_newest_first(&mut detections);
                self.view.render_detections(&detections);
            }
            Err(err) => {
                log::warn!("Failed to fetch detections: {}", err);
                self.view.render_detections_failed(&err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualRuntime, Scripted};
    use serde_json::json;

    const PROGRESS: Duration = Duration::from_secs(1);
    const DETECTIONS: Duration = Duration::from_secs(3);

    #[derive(Default)]
    struct FakeBackend {
        uploads: Scripted<UploadAck>,
        progress: Scripted<ProgressSnapshot>,
        detections: Scripted<Vec<Detection>>,
        uploaded: RefCell<Vec<(String, UploadConfig)>>,
    }

    impl MonitorApi for FakeBackend {
        type Video = String;

        async fn upload_video(
            &self,
            video: String,
            config: UploadConfig,
        ) -> Result<UploadAck, ClientError> {
            self.uploaded.borrow_mut().push((video, config));
            self.uploads
                .next(|| Ok(UploadAck(json!({"status": "started"}))))
                .await
        }

        async fn fetch_progress(&self) -> Result<ProgressSnapshot, ClientError> {
            self.progress.next(|| Ok(ProgressSnapshot::idle())).await
        }

        async fn fetch_detections(&self) -> Result<Vec<Detection>, ClientError> {
            self.detections.next(|| Ok(Vec::new())).await
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Pending(JobId),
        Accepted(JobId, String),
        Failed(JobId, ClientError),
        Progress(String, ProgressPhase),
        Detections(Vec<String>),
        DetectionsFailed(ClientError),
    }

    #[derive(Default)]
    struct RecordingView {
        events: RefCell<Vec<Event>>,
    }

    impl RecordingView {
        fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        fn progress_renders(&self) -> usize {
            self.events
                .borrow()
                .iter()
                .filter(|e| matches!(e, Event::Progress(..)))
                .count()
        }
    }

    impl MonitorView for RecordingView {
        fn render_upload_pending(&self, job: JobId) {
            self.events.borrow_mut().push(Event::Pending(job));
        }

        fn render_upload_accepted(&self, job: JobId, ack: &UploadAck) {
            self.events
                .borrow_mut()
                .push(Event::Accepted(job, ack.summary()));
        }

        fn render_upload_failed(&self, job: JobId, error: &ClientError) {
            self.events
                .borrow_mut()
                .push(Event::Failed(job, error.clone()));
        }

        fn render_progress(&self, snapshot: &ProgressSnapshot, phase: ProgressPhase) {
            self.events
                .borrow_mut()
                .push(Event::Progress(snapshot.percent_label(), phase));
        }

        fn render_detections(&self, detections: &[Detection]) {
            let stamps = detections.iter().map(|d| d.timestamp.clone()).collect();
            self.events.borrow_mut().push(Event::Detections(stamps));
        }

        fn render_detections_failed(&self, error: &ClientError) {
            self.events
                .borrow_mut()
                .push(Event::DetectionsFailed(error.clone()));
        }
    }

    struct Harness {
        runtime: Rc<ManualRuntime>,
        backend: Rc<FakeBackend>,
        view: Rc<RecordingView>,
        session: MonitorSession<Rc<FakeBackend>, Rc<RecordingView>>,
    }

    fn harness(options: MonitorOptions) -> Harness {
        let runtime = Rc::new(ManualRuntime::new());
        let backend = Rc::new(FakeBackend::default());
        let view = Rc::new(RecordingView::default());
        let session = MonitorSession::new(
            Rc::clone(&backend),
            Rc::clone(&view),
            runtime.clone(),
            options,
        );
        Harness {
            runtime,
            backend,
            view,
            session,
        }
    }

    fn detection(timestamp: &str) -> Detection {
        Detection {
            timestamp: timestamp.to_string(),
            ..Default::default()
        }
    }

    fn server_error() -> ClientError {
        ClientError::Status {
            status: 500,
            body: r#"{"error": "boom"}"#.to_string(),
        }
    }

    #[test]
    fn accepted_upload_polls_immediately_and_on_schedule() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(50, 100, true)));

        let config = UploadConfig {
            tree_detection_enabled: true,
            ..Default::default()
        };
        let job = h.session.submit("orchard.mp4".to_string(), config);
        assert_eq!(h.session.state(), MonitorState::Uploading(job));

        h.runtime.run();
        assert_eq!(h.session.state(), MonitorState::Active(job));
        assert_eq!(h.backend.uploaded.borrow()[0], ("orchard.mp4".to_string(), config));
        assert_eq!(h.backend.progress.calls(), 1);
        assert_eq!(h.backend.detections.calls(), 1);
        assert!(h.session.is_polling_progress());
        assert!(h.session.is_polling_detections());
        let events = h.view.events();
        assert_eq!(events[0], Event::Pending(job));
        assert_eq!(events[1], Event::Accepted(job, "started".to_string()));
        assert!(events.contains(&Event::Progress(
            "50.0%".to_string(),
            ProgressPhase::Running
        )));

        h.runtime.tick(PROGRESS);
        h.runtime.tick(PROGRESS);
        assert_eq!(h.backend.progress.calls(), 3);
        assert_eq!(h.backend.detections.calls(), 1);

        h.runtime.tick(DETECTIONS);
        assert_eq!(h.backend.detections.calls(), 2);
    }

    #[test]
    fn finished_job_stops_polling() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(50, 100, true)));
        h.backend.progress.push(Ok(ProgressSnapshot::new(100, 100, false)));

        let job = h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        h.runtime.tick(PROGRESS);

        assert_eq!(h.session.state(), MonitorState::Finished(job));
        assert!(!h.session.is_polling_progress());
        assert!(!h.session.is_polling_detections());
        assert_eq!(h.runtime.live_timers(PROGRESS), 0);
        assert_eq!(h.runtime.live_timers(DETECTIONS), 0);

        h.runtime.tick(PROGRESS);
        h.runtime.tick(DETECTIONS);
        assert_eq!(h.backend.progress.calls(), 2);
        assert_eq!(h.backend.detections.calls(), 1);
    }

    #[test]
    fn finished_job_can_keep_detections_polling() {
        let h = harness(MonitorOptions {
            stop_detections_on_finish: false,
            ..Default::default()
        });
        h.backend.progress.push(Ok(ProgressSnapshot::new(100, 100, false)));

        let job = h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        assert_eq!(h.session.state(), MonitorState::Finished(job));
        assert!(!h.session.is_polling_progress());
        assert!(h.session.is_polling_detections());

        h.backend.detections.push(Ok(vec![detection("2024-05-01T10:00:00")]));
        h.runtime.tick(DETECTIONS);
        assert_eq!(h.backend.detections.calls(), 2);
        assert_eq!(
            h.view.events().last(),
            Some(&Event::Detections(vec!["2024-05-01T10:00:00".to_string()]))
        );
    }

    #[test]
    fn early_stop_is_inactive() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(30, 100, false)));

        let job = h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();

        assert_eq!(h.session.state(), MonitorState::Inactive(job));
        assert_eq!(h.runtime.live_timers(PROGRESS), 0);
        assert_eq!(h.runtime.live_timers(DETECTIONS), 0);
        assert!(h.view.events().contains(&Event::Progress(
            "30.0%".to_string(),
            ProgressPhase::Halted
        )));
    }

    #[test]
    fn rejected_upload_never_starts_timers() {
        let h = harness(MonitorOptions::default());
        h.backend.uploads.push(Err(server_error()));

        let job = h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();

        assert_eq!(h.session.state(), MonitorState::UploadFailed(job));
        assert_eq!(h.runtime.live_timers(PROGRESS), 0);
        assert_eq!(h.runtime.live_timers(DETECTIONS), 0);
        assert_eq!(h.backend.progress.calls(), 0);
        assert_eq!(h.backend.detections.calls(), 0);
        assert_eq!(h.view.events().last(), Some(&Event::Failed(job, server_error())));
    }

    #[test]
    fn failed_upload_cancels_timers_of_the_previous_job() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(10, 100, true)));
        h.session.submit("first.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        assert_eq!(h.runtime.live_timers(PROGRESS), 1);

        h.backend
            .uploads
            .push(Err(ClientError::Transport("connection refused".into())));
        let second = h.session.submit("second.mp4".to_string(), UploadConfig::default());
        h.runtime.run();

        assert_eq!(h.session.state(), MonitorState::UploadFailed(second));
        assert_eq!(h.runtime.live_timers(PROGRESS), 0);
        assert_eq!(h.runtime.live_timers(DETECTIONS), 0);
    }

    #[test]
    fn failed_progress_poll_reads_as_idle_and_keeps_polling() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(10, 100, true)));
        h.backend
            .progress
            .push(Err(ClientError::Transport("reset by peer".into())));
        h.backend.progress.push(Ok(ProgressSnapshot::new(20, 100, true)));

        let job = h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        h.runtime.tick(PROGRESS);

        assert_eq!(h.session.state(), MonitorState::Active(job));
        assert!(h.session.is_polling_progress());
        assert_eq!(
            h.view.events().last(),
            Some(&Event::Progress("0%".to_string(), ProgressPhase::NoVideo))
        );

        h.runtime.tick(PROGRESS);
        assert_eq!(h.backend.progress.calls(), 3);
        assert_eq!(
            h.view.events().last(),
            Some(&Event::Progress("20.0%".to_string(), ProgressPhase::Running))
        );
    }

    #[test]
    fn detections_render_newest_first_and_failures_show() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(1, 100, true)));
        h.backend.detections.push(Ok(vec![
            detection("2024-05-01T10:00:00"),
            detection("2024-05-01T10:00:09"),
        ]));
        h.backend.detections.push(Err(server_error()));

        h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        assert!(h.view.events().contains(&Event::Detections(vec![
            "2024-05-01T10:00:09".to_string(),
            "2024-05-01T10:00:00".to_string(),
        ])));

        h.runtime.tick(DETECTIONS);
        assert_eq!(
            h.view.events().last(),
            Some(&Event::DetectionsFailed(server_error()))
        );
        assert!(h.session.is_polling_detections());
    }

    #[test]
    fn resubmitting_cancels_the_previous_job_at_once() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(10, 100, true)));
        h.session.submit("first.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        assert_eq!(h.runtime.live_timers(PROGRESS), 1);

        let gate = h.backend.uploads.push_gated();
        let second = h.session.submit("second.mp4".to_string(), UploadConfig::default());
        assert_eq!(h.session.state(), MonitorState::Uploading(second));
        assert_eq!(h.runtime.live_timers(PROGRESS), 0);
        assert_eq!(h.runtime.live_timers(DETECTIONS), 0);

        gate.send(Ok(UploadAck(json!({"status": "second"})))).unwrap();
        h.runtime.run();
        assert_eq!(h.session.state(), MonitorState::Active(second));
        assert_eq!(h.runtime.live_timers(PROGRESS), 1);
        assert_eq!(h.runtime.live_timers(DETECTIONS), 1);
    }

    #[test]
    fn late_ack_for_a_superseded_upload_is_ignored() {
        let h = harness(MonitorOptions::default());
        let first_gate = h.backend.uploads.push_gated();
        let first = h.session.submit("first.mp4".to_string(), UploadConfig::default());
        h.runtime.run();

        let second = h.session.submit("second.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        assert_eq!(h.session.state(), MonitorState::Active(second));

        first_gate
            .send(Ok(UploadAck(json!({"status": "first"}))))
            .unwrap();
        h.runtime.run();

        assert_eq!(h.session.state(), MonitorState::Active(second));
        assert_eq!(h.runtime.live_timers(PROGRESS), 1);
        assert!(!h
            .view
            .events()
            .iter()
            .any(|e| matches!(e, Event::Accepted(job, _) if *job == first)));
    }

    #[test]
    fn in_flight_poll_after_finish_is_dropped() {
        let h = harness(MonitorOptions::default());
        let slow = h.backend.progress.push_gated();
        h.backend.progress.push(Ok(ProgressSnapshot::new(100, 100, false)));

        let job = h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        h.runtime.tick(PROGRESS);
        assert_eq!(h.session.state(), MonitorState::Finished(job));
        let renders = h.view.progress_renders();

        slow.send(Ok(ProgressSnapshot::new(50, 100, true))).unwrap();
        h.runtime.run();

        assert_eq!(h.session.state(), MonitorState::Finished(job));
        assert_eq!(h.view.progress_renders(), renders);
        assert_eq!(h.runtime.live_timers(PROGRESS), 0);
        h.runtime.tick(PROGRESS);
        assert_eq!(h.backend.progress.calls(), 2);
    }

    #[test]
    fn refresh_renders_without_timers() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(5, 10, false)));
        h.backend.detections.push(Ok(vec![detection("2024-05-01T10:00:00")]));

        h.session.refresh();
        h.runtime.run();

        assert_eq!(h.session.state(), MonitorState::Idle);
        assert_eq!(h.backend.progress.calls(), 1);
        assert_eq!(h.backend.detections.calls(), 1);
        assert_eq!(h.runtime.live_timers(PROGRESS), 0);
        let events = h.view.events();
        assert_eq!(events.len(), 2);
        assert!(events.contains(&Event::Progress(
            "50.0%".to_string(),
            ProgressPhase::Halted
        )));
        assert!(events.contains(&Event::Detections(vec![
            "2024-05-01T10:00:00".to_string()
        ])));
    }

    #[test]
    fn refresh_results_landing_after_activation_are_dropped() {
        let h = harness(MonitorOptions {
            poll_progress: false,
            ..Default::default()
        });
        let slow = h.backend.detections.push_gated();
        h.session.refresh();
        h.runtime.run();

        let job = h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        assert_eq!(h.session.state(), MonitorState::Active(job));
        let before = h.view.events().len();

        slow.send(Ok(vec![detection("2020-01-01T00:00:00")])).unwrap();
        h.runtime.run();
        assert_eq!(h.view.events().len(), before);
    }

    #[test]
    fn progress_only_page_skips_detections() {
        let h = harness(MonitorOptions {
            poll_detections: false,
            ..Default::default()
        });
        h.backend.progress.push(Ok(ProgressSnapshot::new(1, 10, true)));

        h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        h.runtime.tick(DETECTIONS);

        assert!(h.session.is_polling_progress());
        assert!(!h.session.is_polling_detections());
        assert_eq!(h.backend.detections.calls(), 0);
    }

    #[test]
    fn dropping_the_session_cancels_its_timers() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(1, 10, true)));
        let job = h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();
        assert_eq!(h.session.state(), MonitorState::Active(job));
        assert_eq!(h.runtime.live_timers(PROGRESS), 1);
        assert_eq!(h.runtime.live_timers(DETECTIONS), 1);

        drop(h.session);
        assert_eq!(h.runtime.live_timers(PROGRESS), 0);
        assert_eq!(h.runtime.live_timers(DETECTIONS), 0);

        h.runtime.tick(PROGRESS);
        h.runtime.tick(DETECTIONS);
        assert_eq!(h.backend.progress.calls(), 1);
        assert_eq!(h.backend.detections.calls(), 1);
    }

    #[test]
    fn stop_silences_both_timers() {
        let h = harness(MonitorOptions::default());
        h.backend.progress.push(Ok(ProgressSnapshot::new(1, 10, true)));
        h.session.submit("a.mp4".to_string(), UploadConfig::default());
        h.runtime.run();

        h.session.stop();
        assert_eq!(h.runtime.live_timers(PROGRESS), 0);
        h.runtime.tick(PROGRESS);
        assert_eq!(h.backend.progress.calls(), 1);
    }
}
