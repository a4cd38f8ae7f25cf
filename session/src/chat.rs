use crate::error::ClientError;
use shared::ChatReply;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const EMPTY_REPLY_WARNING: &str = "The chatbot answered without a response. Please try again.";
const IMAGE_FALLBACK_TEXT: &str = "(Image attached)";

/// An image picked on the client, not yet sent anywhere.
#[allow(async_fn_in_trait)]
pub trait LocalImage {
    fn name(&self) -> String;

    /// Decodes the image locally into something the view can show, e.g. a `data:` URL.
    async fn preview(&self) -> Result<String, ClientError>;
}

/// The chatbot backend's HTTP surface.
#[allow(async_fn_in_trait)]
pub trait ChatApi {
    type Image: LocalImage;

    async fn send_turn(
        &self,
        message: &str,
        image: Option<Self::Image>,
    ) -> Result<ChatReply, ClientError>;
}

impl<T: ChatApi + ?Sized> ChatApi for Rc<T> {
    type Image = T::Image;

    async fn send_turn(
        &self,
        message: &str,
        image: Option<Self::Image>,
    ) -> Result<ChatReply, ClientError> {
        (**self).send_turn(message, image).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn css_class(self) -> &'static str {
        match self {
            Sender::User => "user-message",
            Sender::Bot => "bot-message",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatBody {
    Text(String),
    ImagePreview { name: String, data_url: String },
    Notice(String),
    /// Stand-in for a reply that has not arrived yet.
    Typing,
    Warning(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub body: ChatBody,
}

pub trait ChatView {
    fn append_message(&self, id: MessageId, message: ChatMessage);
    fn remove_message(&self, id: MessageId);
}

impl<T: ChatView + ?Sized> ChatView for Rc<T> {
    fn append_message(&self, id: MessageId, message: ChatMessage) {
        (**self).append_message(id, message)
    }

    fn remove_message(&self, id: MessageId) {
        (**self).remove_message(id)
    }
}

/// How a call to [`ChatSession::send`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing to send.
    Skipped,
    /// Another turn was still waiting for its reply.
    Busy,
    Replied,
    EmptyReply,
    Failed,
}

/// Turn-taking with the chatbot: one outstanding message at a time, no retries.
pub struct ChatSession<A: ChatApi, V: ChatView> {
    api: A,
    view: V,
    pending_image: RefCell<Option<A::Image>>,
    in_flight: Cell<bool>,
    next_id: Cell<u64>,
}

impl<A: ChatApi, V: ChatView> ChatSession<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            pending_image: RefCell::new(None),
            in_flight: Cell::new(false),
            next_id: Cell::new(0),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    pub fn has_pending_image(&self) -> bool {
        self.pending_image.borrow().is_some()
    }

    /// Holds `image` for the next turn, replacing any image picked earlier.
    pub fn attach_image(&self, image: A::Image) {
        let name = image.name();
        log::debug!("Image {} attached to the next chat turn", name);
        self.pending_image.replace(Some(image));
        self.append(
            Sender::User,
            ChatBody::Notice(format!(
                "Image selected: \"{}\". This image will be sent with your next message.",
                name
            )),
        );
    }

    pub async fn send(&self, text: &str) -> TurnOutcome {
        let text = text.trim();
        if self.in_flight.get() {
            log::debug!("Chat turn ignored: previous reply still pending");
            return TurnOutcome::Busy;
        }
        if text.is_empty() && !self.has_pending_image() {
            return TurnOutcome::Skipped;
        }

        self.in_flight.set(true);
        let image = self.pending_image.borrow_mut().take();

        if !text.is_empty() {
            self.append(Sender::User, ChatBody::Text(text.to_string()));
        }
        if let Some(image) = &image {
            let body = match image.preview().await {
                Ok(data_url) => ChatBody::ImagePreview {
                    name: image.name(),
                    data_url,
                },
                Err(err) => {
                    log::warn!("Could not preview {}: {}", image.name(), err);
                    ChatBody::Notice(IMAGE_FALLBACK_TEXT.to_string())
                }
            };
            self.append(Sender::User, body);
        }

        let typing = self.append(Sender::Bot, ChatBody::Typing);
        let result = self.api.send_turn(text, image).await;
        self.view.remove_message(typing);

        let outcome = match result {
            Ok(reply) => match reply.text() {
                Some(answer) => {
                    self.append(Sender::Bot, ChatBody::Text(answer.to_string()));
                    TurnOutcome::Replied
                }
                None => {
                    log::warn!("Chatbot reply had no response text");
                    self.append(
                        Sender::Bot,
                        ChatBody::Warning(EMPTY_REPLY_WARNING.to_string()),
                    );
                    TurnOutcome::EmptyReply
                }
            },
            Err(err) => {
                log::error!("Chat turn failed: {}", err);
                self.append(
                    Sender::Bot,
                    ChatBody::Error(format!(
                        "Error: Could not get a reply from the chatbot: {}",
                        err.reason()
                    )),
                );
                TurnOutcome::Failed
            }
        };

        self.in_flight.set(false);
        outcome
    }

    fn append(&self, sender: Sender, body: ChatBody) -> MessageId {
        let id = MessageId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.view.append_message(id, ChatMessage { sender, body });
        id
    }
}
