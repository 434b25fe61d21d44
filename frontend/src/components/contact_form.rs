use gloo_net::http::Request;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::analytics::hooks::use_tracker;
use crate::analytics::EventKind;
use crate::config;
use crate::contact::{ContactFields, Field, FormStep, MultiStepForm, SubmitOutcome};

const FORM_NAME: &str = "contact";

async fn send_contact_request(fields: ContactFields) -> Result<(), String> {
    let response = Request::post(&format!("{}/api/contact", config::get_backend_url()))
        .json(&fields)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.ok() {
        Ok(())
    } else {
        Err(format!("server responded with status {}", response.status()))
    }
}

#[derive(Properties, PartialEq)]
struct FieldErrorProps {
    message: Option<&'static str>,
}

#[function_component(FieldError)]
fn field_error(props: &FieldErrorProps) -> Html {
    match props.message {
        Some(message) => html! { <p class="field-error">{message}</p> },
        None => html! {},
    }
}

#[function_component(ContactForm)]
pub fn contact_form() -> Html {
    let form = use_state(MultiStepForm::new);
    let tracker = use_tracker();

    let on_field = {
        let form = form.clone();
        let tracker = tracker.clone();
        move |field: Field, value: String| {
            let mut next = (*form).clone();
            if next.set_field(field, value) {
                if let Some(tracker) = &tracker {
                    tracker.track_form_started(FORM_NAME);
                }
            }
            form.set(next);
        }
    };

    let input = |field: Field| {
        let on_field = on_field.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            on_field(field, value);
        })
    };

    let on_service = {
        let on_field = on_field.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            on_field(Field::Service, value);
        })
    };

    let on_message = {
        let on_field = on_field.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlTextAreaElement>().value();
            on_field(Field::Message, value);
        })
    };

    let on_new_patient = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
            let mut next = (*form).clone();
            next.set_new_patient(checked);
            form.set(next);
        })
    };

    let on_next = {
        let form = form.clone();
        let tracker = tracker.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let mut next = (*form).clone();
            let completed_step = next.step().number();
            if let Some(tracker) = &tracker {
                if next.next() {
                    tracker.track_form_step(FORM_NAME, completed_step);
                } else {
                    tracker.track(
                        EventKind::FormError,
                        crate::props! {
                            "form" => FORM_NAME,
                            "step" => completed_step,
                            "fields" => next.invalid_fields(),
                        },
                    );
                }
            } else {
                next.next();
            }
            form.set(next);
        })
    };

    let on_previous = {
        let form = form.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let mut next = (*form).clone();
            next.previous();
            form.set(next);
        })
    };

    let on_submit = {
        let form = form.clone();
        let tracker = tracker.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let mut pending = (*form).clone();
            let Some(fields) = pending.begin_submit() else {
                form.set(pending);
                return;
            };
            form.set(pending.clone());

            let form = form.clone();
            let tracker = tracker.clone();
            spawn_local(async move {
                let result = send_contact_request(fields.clone()).await;
                if pending.finish_submit(result) == SubmitOutcome::Sent {
                    if let Some(tracker) = &tracker {
                        tracker.track_form_submitted(
                            FORM_NAME,
                            crate::props! {
                                "service" => fields.service.clone(),
                                "new_patient" => fields.new_patient,
                            },
                        );
                        tracker.track_conversion(
                            "contact_request",
                            crate::props! { "service" => fields.service },
                        );
                    }
                }
                form.set(pending);
            });
        })
    };

    if form.is_completed() {
        return html! {
            <div class="contact-form contact-form-done">
                <h3>{"Thank you!"}</h3>
                <p>{"Our front desk will call you within one business day to confirm your visit."}</p>
            </div>
        };
    }

    let step = form.step();
    let fields = form.fields();

    let step_body = match step {
        FormStep::Contact => html! {
            <>
                <label>{"Full name"}
                    <input type="text" value={fields.name.clone()} oninput={input(Field::Name)} />
                </label>
                <FieldError message={form.error(Field::Name)} />
                <label>{"Email"}
                    <input type="email" value={fields.email.clone()} oninput={input(Field::Email)} />
                </label>
                <FieldError message={form.error(Field::Email)} />
                <label>{"Phone"}
                    <input type="tel" value={fields.phone.clone()} oninput={input(Field::Phone)} />
                </label>
                <FieldError message={form.error(Field::Phone)} />
            </>
        },
        FormStep::Appointment => html! {
            <>
                <label>{"Service"}
                    <select onchange={on_service}>
                        <option value="" selected={fields.service.is_empty()}>{"Choose a service"}</option>
                        { for ["cleaning", "whitening", "implants", "orthodontics", "emergency"].iter().map(|service| html! {
                            <option value={*service} selected={fields.service == *service}>{*service}</option>
                        }) }
                    </select>
                </label>
                <FieldError message={form.error(Field::Service)} />
                <label>{"Preferred date"}
                    <input type="date" value={fields.preferred_date.clone()} oninput={input(Field::PreferredDate)} />
                </label>
                <FieldError message={form.error(Field::PreferredDate)} />
                <label>{"Preferred time"}
                    <input type="time" value={fields.preferred_time.clone()} oninput={input(Field::PreferredTime)} />
                </label>
            </>
        },
        FormStep::Details => html! {
            <>
                <label>{"Message"}
                    <textarea value={fields.message.clone()} oninput={on_message}></textarea>
                </label>
                <label class="checkbox">
                    <input type="checkbox" checked={fields.new_patient} onchange={on_new_patient} />
                    {"I am a new patient"}
                </label>
            </>
        },
    };

    html! {
        <form class="contact-form" onsubmit={on_submit}>
            <div class="contact-form-progress">
                { for [FormStep::Contact, FormStep::Appointment, FormStep::Details].iter().map(|s| html! {
                    <span class={classes!("progress-dot", (s.number() <= step.number()).then(|| "active"))}>
                        {s.number().to_string()}
                    </span>
                }) }
            </div>
            <h3>{step.title()}</h3>
            {step_body}
            <div class="contact-form-actions">
                if step != FormStep::Contact {
                    <button type="button" class="secondary" onclick={on_previous}>{"Back"}</button>
                }
                if step == FormStep::Details {
                    <button type="submit" disabled={form.is_submitting()}>
                        { if form.is_submitting() { "Sending..." } else { "Request appointment" } }
                    </button>
                } else {
                    <button type="button" onclick={on_next}>{"Continue"}</button>
                }
            </div>
        </form>
    }
}
