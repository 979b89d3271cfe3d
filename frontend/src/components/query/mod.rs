//! Query form: root module wiring the Yew `Component` implementation with
//! submodules for state, update logic, view rendering and the HTTP client.
//!
//! On first render the component asks the server for its defaults (search
//! endpoint, sheet name, data path) and fills the fields that are still empty.

use yew::platform::spawn_local;
use yew::prelude::*;

mod engine_client;
mod helpers;
mod messages;
mod state;
mod update;
mod view;

pub use messages::{Field, Msg};
pub use state::QueryComponent;

impl Component for QueryComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        QueryComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;

            let link = ctx.link().clone();
            spawn_local(async move {
                match engine_client::fetch_defaults().await {
                    Some(defaults) => link.send_message(Msg::SetDefaults(defaults)),
                    None => gloo_console::warn!("no se pudieron cargar los valores por defecto"),
                }
            });
        }
    }
}
