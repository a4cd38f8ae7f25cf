mod api;
mod components;
mod config;
mod pages;
mod runtime;

use components::header::render_header;
use config::FrontendConfig;
use pages::chat::ChatPage;
use pages::monitor::MonitorPage;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Monitoring,
    Chat,
}

impl Page {
    fn title(self) -> &'static str {
        match self {
            Page::Monitoring => "Monitoring",
            Page::Chat => "Assistant",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Page::Monitoring => "fa-solid fa-video",
            Page::Chat => "fa-solid fa-comments",
        }
    }
}

enum Msg {
    Show(Page),
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: Rc<FrontendConfig>,
}

struct App {
    page: Page,
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            page: Page::Monitoring,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Show(page) => {
                let changed = self.page != page;
                self.page = page;
                changed
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let config = &ctx.props().config;

        // Both pages stay mounted so polling and chat history survive tab switches.
        html! {
            <div class="container">
                { render_header(self.render_nav(ctx)) }

                <main class="main-content">
                    <div hidden={self.page != Page::Monitoring}>
                        <MonitorPage config={Rc::clone(config)} />
                    </div>
                    <div hidden={self.page != Page::Chat}>
                        <ChatPage config={Rc::clone(config)} />
                    </div>
                </main>

                <footer class="app-footer">
                    <p>{"Orchard Monitoring | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

impl App {
    fn render_nav(&self, ctx: &Context<Self>) -> Html {
        let tab = |page: Page| {
            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Show(page));
            html! {
                <button
                    class={classes!("nav-tab", (self.page == page).then_some("active"))}
                    {onclick}
                >
                    <i class={page.icon()}></i>{ format!(" {}", page.title()) }
                </button>
            }
        };

        html! {
            <nav class="app-nav">
                { tab(Page::Monitoring) }
                { tab(Page::Chat) }
            </nav>
        }
    }
}

fn main() {
    let config = FrontendConfig::load();
    wasm_logger::init(wasm_logger::Config::new(config.log_level));
    log::info!("App starting...");
    log::debug!(
        "Monitoring API at {}, chat API at {}",
        config.monitor_api_url,
        config.chat_api_url
    );

    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
