use std::rc::Rc;

use gloo_timers::callback::Interval;
use yew::prelude::*;

const ROTATE_MS: u32 = 6000;

const TESTIMONIALS: [(&str, &str); 3] = [
    ("Maria G.", "I used to dread the dentist. The team here made my implant visit genuinely calm."),
    ("James T.", "Booked online in a minute and was seen the same week. Spotless clinic."),
    ("Priya S.", "My kids actually ask when their next cleaning is. That says it all."),
];

enum CarouselAction {
    Advance,
    Show(usize),
}

#[derive(Default, PartialEq)]
struct Carousel {
    index: usize,
}

impl Reducible for Carousel {
    type Action = CarouselAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let index = match action {
            CarouselAction::Advance => (self.index + 1) % TESTIMONIALS.len(),
            CarouselAction::Show(index) => index % TESTIMONIALS.len(),
        };
        Rc::new(Carousel { index })
    }
}

#[function_component(Testimonials)]
pub fn testimonials() -> Html {
    let carousel = use_reducer(Carousel::default);

    {
        let dispatcher = carousel.dispatcher();
        use_effect_with_deps(
            move |_| {
                let interval = Interval::new(ROTATE_MS, move || {
                    dispatcher.dispatch(CarouselAction::Advance);
                });
                move || drop(interval)
            },
            (),
        );
    }

    let (author, quote) = TESTIMONIALS[carousel.index];

    html! {
        <section class="testimonials">
            <blockquote>
                <p>{quote}</p>
                <cite>{author}</cite>
            </blockquote>
            <div class="testimonial-dots">
                { for (0..TESTIMONIALS.len()).map(|i| {
                    let dispatcher = carousel.dispatcher();
                    html! {
                        <button
                            class={classes!("dot", (i == carousel.index).then(|| "active"))}
                            onclick={Callback::from(move |_: MouseEvent| dispatcher.dispatch(CarouselAction::Show(i)))}
                        />
                    }
                }) }
            </div>
        </section>
    }
}
