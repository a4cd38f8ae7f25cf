use crate::api::HttpMonitorApi;
use crate::components::detections_table::{render_detections_table, DetectionsState};
use crate::components::progress_panel::render_progress_panel;
use crate::components::upload_form::render_upload_form;
use crate::components::utils::{render_status_message, StatusKind, StatusMessage};
use crate::config::FrontendConfig;
use crate::runtime::BrowserRuntime;
use gloo_file::{File as GlooFile, ObjectUrl};
use session::{ClientError, ErrorKind, MonitorSession, MonitorState, MonitorView};
use shared::{
    Detection, DetectionInterval, JobId, ProgressPhase, ProgressSnapshot, UploadAck, UploadConfig,
};
use std::rc::Rc;
use yew::html::Scope;
use yew::prelude::*;

pub enum Msg {
    // Form
    VideoSelected(Option<GlooFile>),
    SetInterval(DetectionInterval),
    SetTreeDetection(bool),
    Submit,

    // Session callbacks
    UploadPending(JobId),
    UploadAccepted(JobId, UploadAck),
    UploadFailed(JobId, ClientError),
    Progress(ProgressSnapshot, ProgressPhase),
    Detections(Vec<Detection>),
    DetectionsFailed(ClientError),
}

#[derive(Properties, PartialEq)]
pub struct MonitorProps {
    pub config: Rc<FrontendConfig>,
    #[prop_or(true)]
    pub show_detections: bool,
}

/// Forwards session callbacks into the component's message queue.
pub struct MonitorLink(Scope<MonitorPage>);

impl MonitorView for MonitorLink {
    fn render_upload_pending(&self, job: JobId) {
        self.0.send_message(Msg::UploadPending(job));
    }

    fn render_upload_accepted(&self, job: JobId, ack: &UploadAck) {
        self.0.send_message(Msg::UploadAccepted(job, ack.clone()));
    }

    fn render_upload_failed(&self, job: JobId, error: &ClientError) {
        self.0.send_message(Msg::UploadFailed(job, error.clone()));
    }

    fn render_progress(&self, snapshot: &ProgressSnapshot, phase: ProgressPhase) {
        self.0.send_message(Msg::Progress(*snapshot, phase));
    }

    fn render_detections(&self, detections: &[Detection]) {
        self.0.send_message(Msg::Detections(detections.to_vec()));
    }

    fn render_detections_failed(&self, error: &ClientError) {
        self.0.send_message(Msg::DetectionsFailed(error.clone()));
    }
}

pub struct MonitorPage {
    session: MonitorSession<HttpMonitorApi, MonitorLink>,
    upload_config: UploadConfig,
    selected_video: Option<GlooFile>,
    video_name: Option<String>,
    video_url: Option<ObjectUrl>,
    status: Option<StatusMessage>,
    progress: ProgressSnapshot,
    phase: ProgressPhase,
    detections: DetectionsState,
}

fn upload_error_text(error: &ClientError) -> String {
    match error.kind() {
        ErrorKind::Transport => format!(
            "Network error: Could not connect to the monitoring server ({})",
            error
        ),
        ErrorKind::Application => format!("Upload failed: {}", error.reason()),
    }
}

fn detections_error_text(error: &ClientError) -> &'static str {
    match error.kind() {
        ErrorKind::Transport => "Network error fetching predictions. Ensure API is running.",
        ErrorKind::Application => "Failed to load predictions. Please check server.",
    }
}

impl Component for MonitorPage {
    type Message = Msg;
    type Properties = MonitorProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let api = HttpMonitorApi::new(
            props.config.monitor_api_url.clone(),
            props.config.detections_limit,
        );
        let session = MonitorSession::new(
            api,
            MonitorLink(ctx.link().clone()),
            Rc::new(BrowserRuntime),
            props.config.monitor_options(props.show_detections),
        );
        session.refresh();

        let progress = ProgressSnapshot::idle();
        Self {
            session,
            upload_config: UploadConfig::default(),
            selected_video: None,
            video_name: None,
            video_url: None,
            status: None,
            phase: ProgressPhase::of(&progress),
            progress,
            detections: DetectionsState::Waiting,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::VideoSelected(video) => {
                if video.is_none() {
                    self.status = Some(StatusMessage::new(
                        StatusKind::Error,
                        "Please select a valid video file.",
                    ));
                }
                self.selected_video = video;
                true
            }
            Msg::SetInterval(interval) => {
                self.upload_config.detection_interval = interval;
                false
            }
            Msg::SetTreeDetection(enabled) => {
                self.upload_config.tree_detection_enabled = enabled;
                false
            }
            Msg::Submit => self.handle_submit(),

            Msg::UploadPending(job) => {
                log::debug!("Job {} pending", job);
                self.status = Some(StatusMessage::new(
                    StatusKind::Uploading,
                    "Uploading video and starting monitoring...",
                ));
                self.progress = ProgressSnapshot::idle();
                self.phase = ProgressPhase::of(&self.progress);
                self.detections = DetectionsState::Waiting;
                true
            }
            Msg::UploadAccepted(job, ack) => {
                log::debug!("Job {} accepted", job);
                self.status = Some(StatusMessage::new(
                    StatusKind::Success,
                    format!(
                        "Video uploaded successfully. Monitoring started: {}",
                        ack.summary()
                    ),
                ));
                true
            }
            Msg::UploadFailed(job, error) => {
                log::debug!("Job {} failed", job);
                self.status = Some(StatusMessage::new(
                    StatusKind::Error,
                    upload_error_text(&error),
                ));
                true
            }
            Msg::Progress(snapshot, phase) => {
                self.progress = snapshot;
                self.phase = phase;
                true
            }
            Msg::Detections(detections) => {
                self.detections = DetectionsState::Loaded(detections);
                true
            }
            Msg::DetectionsFailed(error) => {
                self.detections = DetectionsState::Failed(detections_error_text(&error).into());
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let busy = matches!(self.session.state(), MonitorState::Uploading(_));
        html! {
            <div class="monitor-page">
                <section class="upload-panel">
                    { render_upload_form(&self.upload_config, busy, ctx.link()) }
                    if let Some(video) = &self.selected_video {
                        <p class="selected-file">{ format!("Selected: {}", video.name()) }</p>
                    }
                    { render_status_message(self.status.as_ref()) }
                </section>

                <section class="monitor-panel">
                    { self.render_video() }
                    { render_progress_panel(&self.progress, self.phase, self.video_name.as_deref()) }
                </section>

                if ctx.props().show_detections {
                    { render_detections_table(&self.detections) }
                }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.session.stop();
    }
}

impl MonitorPage {
    fn handle_submit(&mut self) -> bool {
        let Some(video) = self.selected_video.clone() else {
            self.status = Some(StatusMessage::new(
                StatusKind::Error,
                "Please select a video file first.",
            ));
            return true;
        };

        self.video_name = Some(video.name());
        // Dropping the previous ObjectUrl revokes it.
        self.video_url = Some(ObjectUrl::from(video.clone()));
        let job = self.session.submit(video, self.upload_config);
        log::debug!("Submitted job {}", job);
        true
    }

    fn render_video(&self) -> Html {
        match &self.video_url {
            Some(url) => html! {
                <video
                    id="video-player"
                    class="video-player"
                    src={url.to_string()}
                    controls=true
                    autoplay=true
                    muted=true
                />
            },
            None => html! {
                <div class="video-placeholder">
                    <i class="fa-solid fa-film"></i>
                    <p>{"No video loaded"}</p>
                </div>
            },
        }
    }
}
