use session::{ChatBody, ChatMessage, MessageId};
use yew::prelude::*;

pub fn render_chat_message(id: MessageId, message: &ChatMessage) -> Html {
    let variant = match message.body {
        ChatBody::Warning(_) => Some("warning-message"),
        ChatBody::Error(_) => Some("error-message"),
        _ => None,
    };

    let content = match &message.body {
        ChatBody::Text(text) | ChatBody::Warning(text) | ChatBody::Error(text) => {
            html! { { text.clone() } }
        }
        ChatBody::Notice(text) => html! { <em>{ text.clone() }</em> },
        ChatBody::ImagePreview { name, data_url } => html! {
            <img class="chat-image-preview" src={data_url.clone()} alt={name.clone()} />
        },
        ChatBody::Typing => html! {
            <div class="typing-indicator">
                <span></span><span></span><span></span>
            </div>
        },
    };

    html! {
        <div
            key={id.raw().to_string()}
            class={classes!("message", message.sender.css_class(), variant)}
        >
            { content }
        </div>
    }
}
