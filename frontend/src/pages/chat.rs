use crate::api::{BrowserImage, HttpChatApi};
use crate::components::chat_message::render_chat_message;
use crate::components::utils::take_selected_file;
use crate::config::FrontendConfig;
use gloo_events::EventListener;
use gloo_file::File as GlooFile;
use session::{ChatMessage, ChatSession, ChatView, MessageId, TurnOutcome};
use std::rc::Rc;
use web_sys::{Element, HtmlInputElement};
use yew::html::Scope;
use yew::prelude::*;

pub enum Msg {
    Input(String),
    Send,
    Attach(GlooFile),
    ToggleAttachMenu,
    CloseAttachMenu,
    Append(MessageId, ChatMessage),
    Remove(MessageId),
    TurnDone(TurnOutcome),
}

#[derive(Properties, PartialEq)]
pub struct ChatProps {
    pub config: Rc<FrontendConfig>,
}

pub struct ChatLink(Scope<ChatPage>);

impl ChatView for ChatLink {
    fn append_message(&self, id: MessageId, message: ChatMessage) {
        self.0.send_message(Msg::Append(id, message));
    }

    fn remove_message(&self, id: MessageId) {
        self.0.send_message(Msg::Remove(id));
    }
}

pub struct ChatPage {
    session: Rc<ChatSession<HttpChatApi, ChatLink>>,
    messages: Vec<(MessageId, ChatMessage)>,
    input: String,
    attach_menu_open: bool,
    waiting: bool,
    window_ref: NodeRef,
    _outside_click: Option<EventListener>,
}

impl Component for ChatPage {
    type Message = Msg;
    type Properties = ChatProps;

    fn create(ctx: &Context<Self>) -> Self {
        let api = HttpChatApi::new(ctx.props().config.chat_api_url.clone());
        log::debug!("Chat endpoint: {}", api.endpoint());
        let session = ChatSession::new(api, ChatLink(ctx.link().clone()));

        let link = ctx.link().clone();
        let outside_click = web_sys::window()
            .and_then(|window| window.document())
            .map(|document| {
                EventListener::new(&document, "click", move |_| {
                    link.send_message(Msg::CloseAttachMenu);
                })
            });

        Self {
            session: Rc::new(session),
            messages: Vec::new(),
            input: String::new(),
            attach_menu_open: false,
            waiting: false,
            window_ref: NodeRef::default(),
            _outside_click: outside_click,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Input(text) => {
                self.input = text;
                false
            }
            Msg::Send => self.handle_send(ctx),
            Msg::Attach(file) => {
                self.attach_menu_open = false;
                self.session.attach_image(BrowserImage(file));
                true
            }
            Msg::ToggleAttachMenu => {
                self.attach_menu_open = !self.attach_menu_open;
                true
            }
            Msg::CloseAttachMenu => std::mem::replace(&mut self.attach_menu_open, false),
            Msg::Append(id, message) => {
                self.messages.push((id, message));
                true
            }
            Msg::Remove(id) => {
                self.messages.retain(|(existing, _)| *existing != id);
                true
            }
            Msg::TurnDone(outcome) => {
                log::debug!("Chat turn finished: {:?}", outcome);
                self.waiting = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        let handle_input = link.callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::Input(input.value())
        });
        let handle_key = link.batch_callback(|e: KeyboardEvent| {
            (e.key() == "Enter" && !e.shift_key()).then(|| {
                e.prevent_default();
                Msg::Send
            })
        });
        let handle_send = link.callback(|_: MouseEvent| Msg::Send);
        let handle_toggle = link.callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::ToggleAttachMenu
        });
        let keep_menu_open = Callback::from(|e: MouseEvent| e.stop_propagation());
        let handle_image = link.batch_callback(|e: Event| take_selected_file(&e, "image/").map(Msg::Attach));

        html! {
            <div class="chatbot-container">
                <div class="chat-window" ref={self.window_ref.clone()}>
                    { for self.messages.iter().map(|(id, message)| render_chat_message(*id, message)) }
                </div>

                <div class="chat-input-area">
                    <div class="attach-wrapper">
                        <button class="attach-btn" title="Attach" onclick={handle_toggle}>
                            <i class="fa-solid fa-paperclip"></i>
                        </button>
                        if self.attach_menu_open {
                            <div class="attach-menu" onclick={keep_menu_open}>
                                <label for="chat-image-input" class="attach-option">
                                    <i class="fa-solid fa-image"></i>{" Image"}
                                </label>
                                <input
                                    type="file"
                                    id="chat-image-input"
                                    accept="image/*"
                                    hidden=true
                                    onchange={handle_image}
                                />
                            </div>
                        }
                    </div>
                    <input
                        type="text"
                        class="chat-input"
                        placeholder="Ask about your orchard..."
                        value={self.input.clone()}
                        oninput={handle_input}
                        onkeydown={handle_key}
                    />
                    <button class="send-btn" onclick={handle_send} disabled={self.waiting}>
                        <i class="fa-solid fa-paper-plane"></i>
                    </button>
                </div>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if let Some(window) = self.window_ref.cast::<Element>() {
            window.set_scroll_top(window.scroll_height());
        }
    }
}

impl ChatPage {
    fn handle_send(&mut self, ctx: &Context<Self>) -> bool {
        if self.session.is_busy() {
            return false;
        }
        if self.input.trim().is_empty() && !self.session.has_pending_image() {
            return false;
        }

        let text = std::mem::take(&mut self.input);
        self.waiting = true;
        let session = Rc::clone(&self.session);
        ctx.link().send_future(async move { Msg::TurnDone(session.send(&text).await) });
        true
    }
}
