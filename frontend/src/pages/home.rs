use yew::prelude::*;

use crate::analytics::hooks::{use_scroll_tracking, use_tracker};
use crate::analytics::Variant;
use crate::components::contact_form::ContactForm;
use crate::components::testimonials::Testimonials;

const CLINIC_PHONE: &str = "+1-555-0142";
const HERO_EXPERIMENT: &str = "hero_headline";

const SERVICES: [(&str, &str); 4] = [
    ("Cleanings & checkups", "Gentle hygiene visits with digital x-rays and a clear plan."),
    ("Whitening", "In-office and take-home whitening, several shades in one visit."),
    ("Implants", "Permanent, natural-looking replacements placed in-house."),
    ("Emergency care", "Same-day slots for pain, chips and lost fillings."),
];

fn scroll_to_contact() {
    if let Some(section) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("contact"))
    {
        section.scroll_into_view();
    }
}

#[function_component(Home)]
pub fn home() -> Html {
    let tracker = use_tracker();
    use_scroll_tracking();

    let variant = {
        let tracker = tracker.clone();
        use_memo(
            move |_| {
                tracker
                    .as_ref()
                    .map(|t| t.experiment_variant(HERO_EXPERIMENT))
                    .unwrap_or(Variant::A)
            },
            (),
        )
    };

    let headline = match *variant {
        Variant::A => "Healthy smiles, without the waiting room dread",
        Variant::B => "Book today, smile brighter this week",
    };

    let cta = |label: &'static str, location: &'static str| {
        let tracker = tracker.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            if let Some(tracker) = &tracker {
                tracker.track_cta_click(label, location);
            }
            scroll_to_contact();
        })
    };

    let on_phone = {
        let tracker = tracker.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(tracker) = &tracker {
                tracker.track_phone_click("hero");
            }
        })
    };

    html! {
        <div class="landing-page">
            <header class="hero">
                <div class="hero-content">
                    <h1>{headline}</h1>
                    <p class="hero-subtitle">
                        {"Family, cosmetic and emergency dentistry in one calm, modern clinic."}
                    </p>
                    <div class="hero-cta-group">
                        <button class="hero-cta" onclick={cta("Book an appointment", "hero")}>
                            {"Book an appointment"}
                        </button>
                        <a href={format!("tel:{}", CLINIC_PHONE)} class="phone-link" onclick={on_phone}>
                            {format!("Call {}", CLINIC_PHONE)}
                        </a>
                    </div>
                </div>
            </header>

            <section class="services">
                <h2>{"What we do"}</h2>
                <div class="service-grid">
                    { for SERVICES.iter().map(|(title, blurb)| html! {
                        <div class="service-card">
                            <h3>{*title}</h3>
                            <p>{*blurb}</p>
                        </div>
                    }) }
                </div>
                <button class="secondary-cta" onclick={cta("See available times", "services")}>
                    {"See available times"}
                </button>
            </section>

            <Testimonials />

            <section id="contact" class="contact-section">
                <h2>{"Request an appointment"}</h2>
                <ContactForm />
            </section>
        </div>
    }
}
