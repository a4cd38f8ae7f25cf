use shared::Detection;
use yew::prelude::*;

const COLUMNS: usize = 5;

/// What the predictions table currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionsState {
    Waiting,
    Loaded(Vec<Detection>),
    Failed(String),
}

fn placeholder_row(text: &str) -> Html {
    html! {
        <tr><td colspan={COLUMNS.to_string()} class="no-data">{ text }</td></tr>
    }
}

fn render_row(detection: &Detection) -> Html {
    html! {
        <tr>
            <td>{ detection.time_label() }</td>
            <td>{ detection.fruit_label() }</td>
            <td>{ detection.ripeness_label() }</td>
            <td>{ detection.disease_label() }</td>
            <td>{ detection.notes_label() }</td>
        </tr>
    }
}

pub fn render_detections_table(state: &DetectionsState) -> Html {
    let body = match state {
        DetectionsState::Waiting => placeholder_row("No predictions yet."),
        DetectionsState::Loaded(detections) if detections.is_empty() => {
            placeholder_row("No predictions yet. Upload a video to start monitoring!")
        }
        DetectionsState::Loaded(detections) => detections.iter().map(render_row).collect::<Html>(),
        DetectionsState::Failed(reason) => placeholder_row(reason),
    };

    html! {
        <div class="detections-section">
            <h2><i class="fa-solid fa-table-list"></i>{" Latest Predictions"}</h2>
            <table class="prediction-table">
                <thead>
                    <tr>
                        <th>{"Time"}</th>
                        <th>{"Fruit"}</th>
                        <th>{"Ripeness"}</th>
                        <th>{"Disease"}</th>
                        <th>{"Notes"}</th>
                    </tr>
                </thead>
                <tbody id="prediction-table-body">{ body }</tbody>
            </table>
        </div>
    }
}
