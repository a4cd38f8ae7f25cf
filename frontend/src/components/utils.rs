use gloo_file::File as GlooFile;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn css_class(&self) -> &'static str {
        match self.kind {
            StatusKind::Uploading => "uploading",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

/// Browsers leave the MIME type empty for containers they don't know (often `.mkv`, `.avi`),
/// so an unknown type is let through and left for the backend to judge.
fn accepts_mime(mime: &str, accept_prefix: &str) -> bool {
    mime.is_empty() || mime.starts_with(accept_prefix)
}

/// First file of a file input, clearing the input so the same file can be picked again.
pub fn take_selected_file(event: &Event, accept_prefix: &str) -> Option<GlooFile> {
    let input: HtmlInputElement = event.target_unchecked_into();
    let file = input
        .files()
        .and_then(|files| files.item(0))
        .filter(|file| accepts_mime(&file.type_(), accept_prefix))
        .map(GlooFile::from);
    input.set_value("");
    file
}

pub fn render_status_message(message: Option<&StatusMessage>) -> Html {
    if let Some(message) = message {
        html! {
            <div class={classes!("message-box", message.css_class())}>
                if message.kind == StatusKind::Error {
                    <i class="fa-solid fa-circle-exclamation"></i>
                }
                <p>{ &message.text }</p>
            </div>
        }
    } else {
        html! {}
    }
}
