use yew::prelude::*;

/// Renders the application header
pub fn render_header(nav: Html) -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-seedling"></i> {" Orchard Monitoring"}</h1>
            <p class="subtitle">{"Upload a video to track fruit, ripeness and disease, or ask the assistant"}</p>
            { nav }
        </header>
    }
}
