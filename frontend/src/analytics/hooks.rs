use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Object, Reflect};
use web_sys::{ErrorEvent, PerformanceObserver, PerformanceObserverEntryList, Window};
use yew::prelude::*;

use super::{scroll_depth_percent, Metric, TrackerHandle};

#[hook]
pub fn use_tracker() -> Option<TrackerHandle> {
    use_context::<TrackerHandle>()
}

fn current_scroll_depth(window: &Window) -> Option<f64> {
    let root = window.document()?.document_element()?;
    let scroll_top = window.scroll_y().ok()?;
    let viewport = window.inner_height().ok()?.as_f64()?;
    Some(scroll_depth_percent(
        scroll_top,
        f64::from(root.scroll_height()),
        viewport,
    ))
}

/// Reports scroll-depth milestones for the lifetime of the calling component.
#[hook]
pub fn use_scroll_tracking() {
    let tracker = use_tracker();
    use_effect_with_deps(
        move |tracker| {
            let listener = tracker.clone().and_then(|tracker| {
                let window = web_sys::window()?;
                let window_clone = window.clone();
                let scroll_callback = Closure::wrap(Box::new(move || {
                    if let Some(depth) = current_scroll_depth(&window_clone) {
                        tracker.record_scroll_depth(depth);
                    }
                }) as Box<dyn FnMut()>);
                window
                    .add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref())
                    .ok()?;
                Some((window, scroll_callback))
            });

            move || {
                if let Some((window, scroll_callback)) = listener {
                    let _ = window.remove_event_listener_with_callback(
                        "scroll",
                        scroll_callback.as_ref().unchecked_ref(),
                    );
                }
            }
        },
        tracker,
    );
}

/// Forwards uncaught script errors as `error` events.
#[hook]
pub fn use_error_tracking() {
    let tracker = use_tracker();
    use_effect_with_deps(
        move |tracker| {
            let listener = tracker.clone().and_then(|tracker| {
                let window = web_sys::window()?;
                let error_callback = Closure::wrap(Box::new(move |event: ErrorEvent| {
                    let source = format!("{}:{}", event.filename(), event.lineno());
                    tracker.track_error(&event.message(), &source);
                }) as Box<dyn FnMut(ErrorEvent)>);
                window
                    .add_event_listener_with_callback("error", error_callback.as_ref().unchecked_ref())
                    .ok()?;
                Some((window, error_callback))
            });

            move || {
                if let Some((window, error_callback)) = listener {
                    let _ = window.remove_event_listener_with_callback(
                        "error",
                        error_callback.as_ref().unchecked_ref(),
                    );
                }
            }
        },
        tracker,
    );
}

type EntryCallback = Closure<dyn FnMut(PerformanceObserverEntryList)>;

fn number(entry: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(entry, &JsValue::from_str(key)).ok()?.as_f64()
}

fn observe_entries(
    entry_type: &str,
    duration_threshold: Option<f64>,
    mut on_entry: impl FnMut(&JsValue) + 'static,
) -> Option<(PerformanceObserver, EntryCallback)> {
    let callback = Closure::wrap(Box::new(move |list: PerformanceObserverEntryList| {
        for entry in list.get_entries().iter() {
            on_entry(&entry);
        }
    }) as Box<dyn FnMut(PerformanceObserverEntryList)>);
    let observer = PerformanceObserver::new(callback.as_ref().unchecked_ref()).ok()?;
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("type"), &JsValue::from_str(entry_type)).ok()?;
    Reflect::set(&options, &JsValue::from_str("buffered"), &JsValue::TRUE).ok()?;
    if let Some(threshold) = duration_threshold {
        Reflect::set(
            &options,
            &JsValue::from_str("durationThreshold"),
            &JsValue::from_f64(threshold),
        )
        .ok()?;
    }
    observer.observe(options.unchecked_ref());
    Some((observer, callback))
}

fn report_ttfb(tracker: &TrackerHandle) {
    let navigation = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.get_entries_by_type("navigation"));
    if let Some(entry) = navigation.map(|entries| entries.get(0)) {
        if let Some(ttfb) = number(&entry, "responseStart") {
            tracker.record_web_vital(Metric::Ttfb, ttfb);
        }
    }
}

/// Subscribes to paint, input, interaction and layout-shift signals and
/// reports them. INP is the slowest interaction seen so far.
#[hook]
pub fn use_web_vitals() {
    let tracker = use_tracker();
    use_effect_with_deps(
        move |tracker| {
            let mut observers = Vec::new();
            if let Some(tracker) = tracker.clone() {
                report_ttfb(&tracker);

                let lcp = tracker.clone();
                observers.extend(observe_entries("largest-contentful-paint", None, move |entry| {
                    if let Some(start) = number(entry, "startTime") {
                        lcp.record_web_vital(Metric::Lcp, start);
                    }
                }));

                let fcp = tracker.clone();
                observers.extend(observe_entries("paint", None, move |entry| {
                    let name = Reflect::get(entry, &JsValue::from_str("name"))
                        .ok()
                        .and_then(|v| v.as_string());
                    if name.as_deref() == Some("first-contentful-paint") {
                        if let Some(start) = number(entry, "startTime") {
                            fcp.record_web_vital(Metric::Fcp, start);
                        }
                    }
                }));

                let fid = tracker.clone();
                observers.extend(observe_entries("first-input", None, move |entry| {
                    if let (Some(start), Some(processing)) =
                        (number(entry, "startTime"), number(entry, "processingStart"))
                    {
                        fid.record_web_vital(Metric::Fid, processing - start);
                    }
                }));

                let inp = tracker.clone();
                let slowest_interaction = Rc::new(Cell::new(0.0_f64));
                observers.extend(observe_entries("event", Some(40.0), move |entry| {
                    let interaction = number(entry, "interactionId").unwrap_or(0.0);
                    if interaction <= 0.0 {
                        return;
                    }
                    if let Some(duration) = number(entry, "duration") {
                        if duration > slowest_interaction.get() {
                            slowest_interaction.set(duration);
                            inp.record_web_vital(Metric::Inp, duration);
                        }
                    }
                }));

                let cls = tracker;
                let shift_total = Rc::new(Cell::new(0.0_f64));
                observers.extend(observe_entries("layout-shift", None, move |entry| {
                    let recent_input = Reflect::get(entry, &JsValue::from_str("hadRecentInput"))
                        .ok()
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false);
                    if recent_input {
                        return;
                    }
                    if let Some(value) = number(entry, "value") {
                        shift_total.set(shift_total.get() + value);
                        cls.record_web_vital(Metric::Cls, shift_total.get());
                    }
                }));
            }

            move || {
                for (observer, _callback) in observers {
                    observer.disconnect();
                }
            }
        },
        tracker,
    );
}
