use shared::{ProgressPhase, ProgressSnapshot};
use yew::prelude::*;

pub fn render_progress_panel(
    snapshot: &ProgressSnapshot,
    phase: ProgressPhase,
    video_name: Option<&str>,
) -> Html {
    html! {
        <div class="progress-panel">
            <p id="current-video-status">{ phase.status_text(video_name) }</p>
            <div class="progress-track">
                <div
                    id="progress-bar"
                    class={classes!("progress-bar", phase.css_class())}
                    style={format!("width: {}%", snapshot.bar_width())}
                >
                    { snapshot.percent_label() }
                </div>
            </div>
            <div class="frame-counters">
                <span id="processed-frames-status">{ snapshot.processed_label() }</span>
                <span id="total-frames-status">{ snapshot.total_label() }</span>
            </div>
        </div>
    }
}
