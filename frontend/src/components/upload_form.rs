use crate::pages::monitor::{MonitorPage, Msg};
use shared::{DetectionInterval, UploadConfig};
use std::str::FromStr;
use strum::IntoEnumIterator;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

use super::utils::take_selected_file;

pub fn render_upload_form(config: &UploadConfig, busy: bool, link: &Scope<MonitorPage>) -> Html {
    let handle_file = link.callback(|e: Event| Msg::VideoSelected(take_selected_file(&e, "video/")));

    let handle_interval = link.batch_callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        DetectionInterval::from_str(&select.value())
            .ok()
            .map(Msg::SetInterval)
    });

    let handle_tree_detection = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetTreeDetection(input.checked())
    });

    let handle_submit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::Submit
    });

    html! {
        <form id="upload-form" class="upload-section" onsubmit={handle_submit}>
            <label for="video-file">{"Video file"}</label>
            <input type="file" id="video-file" accept="video/*" onchange={handle_file} />

            <label for="detection-interval">{"Detection interval"}</label>
            <select id="detection-interval" onchange={handle_interval}>
                { for DetectionInterval::iter().map(|interval| html! {
                    <option
                        value={interval.to_string()}
                        selected={interval == config.detection_interval}
                    >
                        { interval.label() }
                    </option>
                })}
            </select>

            <label class="checkbox-label">
                <input
                    type="checkbox"
                    id="enable-tree-detection"
                    checked={config.tree_detection_enabled}
                    onchange={handle_tree_detection}
                />
                {" Enable tree detection"}
            </label>

            <button type="submit" class="analyze-btn" disabled={busy}>
                if busy {
                    <><i class="fa-solid fa-spinner fa-spin"></i>{" Uploading..."}</>
                } else {
                    <><i class="fa-solid fa-upload"></i>{" Upload & Start Monitoring"}</>
                }
            </button>
        </form>
    }
}
