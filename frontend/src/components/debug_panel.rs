use yew::prelude::*;

use crate::analytics::hooks::use_tracker;

/// Floating inspector for the local event log. Only mounted in debug builds.
#[function_component(DebugPanel)]
pub fn debug_panel() -> Html {
    let tracker = use_tracker();
    let is_open = use_state(|| false);
    let refresh = use_state(|| 0u32);

    let toggle = {
        let is_open = is_open.clone();
        Callback::from(move |_: MouseEvent| is_open.set(!*is_open))
    };

    let reload = {
        let refresh = refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.set(*refresh + 1))
    };

    let clear = {
        let tracker = tracker.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(tracker) = &tracker {
                tracker.clear_debug_events();
            }
            refresh.set(*refresh + 1);
        })
    };

    let Some(tracker) = tracker else {
        return html! {};
    };
    let events = tracker.debug_events();

    html! {
        <div class="analytics-debug">
            <style>
                {r#"
                    .analytics-debug {
                        position: fixed;
                        bottom: 1rem;
                        right: 1rem;
                        z-index: 1000;
                        font-family: monospace;
                        font-size: 12px;
                    }
                    .analytics-debug-body {
                        background: rgba(20, 20, 20, 0.95);
                        color: #e0f2f1;
                        width: 360px;
                        max-height: 50vh;
                        overflow-y: auto;
                        padding: 0.75rem;
                        border-radius: 8px;
                    }
                    .analytics-debug-row {
                        border-bottom: 1px solid rgba(255, 255, 255, 0.1);
                        padding: 0.25rem 0;
                    }
                "#}
            </style>
            <button onclick={toggle}>
                { format!("Analytics ({})", events.len()) }
            </button>
            if *is_open {
                <div class="analytics-debug-body">
                    <div>
                        <button onclick={reload}>{"Refresh"}</button>
                        <button onclick={clear}>{"Clear"}</button>
                    </div>
                    { for events.iter().rev().map(|event| html! {
                        <div class="analytics-debug-row">
                            <strong>{event.kind.as_str()}</strong>
                            {" "}
                            <span>{event.timestamp.clone()}</span>
                            <pre>{serde_json::to_string_pretty(&event.properties).unwrap_or_default()}</pre>
                        </div>
                    }) }
                </div>
            }
        </div>
    }
}
