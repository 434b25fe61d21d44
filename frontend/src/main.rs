use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod analytics;
mod config;
mod contact;
mod components {
    pub mod contact_form;
    pub mod debug_panel;
    pub mod testimonials;
}
mod pages {
    pub mod home;
}

use analytics::hooks::{use_error_tracking, use_tracker, use_web_vitals};
use analytics::TrackerHandle;
use components::debug_panel::DebugPanel;
use pages::home::Home;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! {
                <div class="not-found">
                    <h1>{"Page not found"}</h1>
                    <Link<Route> to={Route::Home}>{"Back to the clinic"}</Link<Route>>
                </div>
            }
        },
    }
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let is_scrolled = use_state(|| false);
    let tracker = use_tracker();

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(move |_| {
            let listener = web_sys::window().and_then(|window| {
                let window_clone = window.clone();
                let scroll_callback = Closure::wrap(Box::new(move || {
                    let scroll_top = window_clone.scroll_y().unwrap_or(0.0);
                    is_scrolled.set(scroll_top > 80.0);
                }) as Box<dyn FnMut()>);
                window
                    .add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref())
                    .ok()?;
                Some((window, scroll_callback))
            });

            move || {
                if let Some((window, scroll_callback)) = listener {
                    let _ = window.remove_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
                }
            }
        }, ());
    }

    let book_now = Callback::from(move |_: MouseEvent| {
        if let Some(tracker) = &tracker {
            tracker.track_cta_click("Book now", "nav");
        }
    });

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"Bright Smile Dental"}
                </Link<Route>>
                <a href="#contact" class="nav-cta" onclick={book_now}>{"Book now"}</a>
            </div>
        </nav>
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub tracker: TrackerHandle,
}

#[function_component(Instrumentation)]
fn instrumentation() -> Html {
    use_web_vitals();
    use_error_tracking();
    html! {}
}

#[function_component]
fn App(props: &AppProps) -> Html {
    html! {
        <ContextProvider<TrackerHandle> context={props.tracker.clone()}>
            <Instrumentation />
            <BrowserRouter>
                <Nav />
                <Switch<Route> render={switch} />
            </BrowserRouter>
            if !props.tracker.config().production {
                <DebugPanel />
            }
        </ContextProvider<TrackerHandle>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    if let Err(e) = console_log::init_with_level(Level::Info) {
        web_sys::console::warn_1(&format!("error initializing log: {}", e).into());
    }

    info!("Starting application");
    let tracker = TrackerHandle::new(analytics::browser_tracker(config::TrackingConfig::from_build()));
    tracker.initialize();
    yew::Renderer::<App>::with_props(AppProps { tracker }).render();
}
