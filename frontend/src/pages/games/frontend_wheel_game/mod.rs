mod wheel_canvas;
mod wheel_utils;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Interval;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use shared::constants::SPIN_FAILED_ERROR;
use shared::reward_wheel::{format_time, TierTable};
use shared::{spin_once, GateRejection, SpinAuthority, SpinOutcome, WheelController, WheelError};
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;

use crate::authority::{get_auth_token, HttpSpinAuthority};
use crate::config::get_api_base_url;
use crate::styles;
use wheel_canvas::WheelCanvas;
use wheel_utils::{ResultDisplay, SpinButton};

type FrameSlot = Rc<RefCell<Option<AnimationFrame>>>;

// Same clock for starting and sampling the animation
fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Ticks the controller once per animation frame until the spin settles.
/// Dropping the handle in `slot` cancels the pending frame.
fn run_animation(controller: Rc<RefCell<WheelController>>, slot: FrameSlot, redraw: UseForceUpdateHandle) {
    let next_slot = slot.clone();
    let handle = request_animation_frame(move |_| {
        let frame = controller.borrow_mut().tick(now_ms());
        redraw.force_update();
        match frame {
            Some(frame) if !frame.finished => run_animation(controller, next_slot, redraw),
            _ => {
                next_slot.borrow_mut().take();
            }
        }
    });
    *slot.borrow_mut() = Some(handle);
}

fn start_cooldown(cooldown_until: &UseStateHandle<Option<f64>>, clock: &UseStateHandle<f64>, seconds: i64) {
    let now = js_sys::Date::now();
    clock.set(now);
    if seconds > 0 {
        cooldown_until.set(Some(now + seconds as f64 * 1000.0));
    } else {
        cooldown_until.set(None);
    }
}

#[function_component(FrontendWheelGame)]
pub fn frontend_wheel_game() -> Html {
    let controller = use_mut_ref(|| WheelController::new(TierTable::reference().clone()));
    let frame_slot: FrameSlot = use_mut_ref(|| None);
    let redraw = use_force_update();

    let loading = use_state(|| true);
    let cooldown_until = use_state(|| None::<f64>);
    let clock = use_state(js_sys::Date::now);
    let window_seconds = use_state(|| None::<i64>);
    let error_message = use_state(String::new);

    // Fetch cooldown status on mount. Leaving the page abandons any spin in
    // flight without showing its reward.
    {
        let controller = controller.clone();
        let frame_slot = frame_slot.clone();
        let loading = loading.clone();
        let cooldown_until = cooldown_until.clone();
        let clock = clock.clone();
        let window_seconds = window_seconds.clone();
        let error_message = error_message.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let authority = HttpSpinAuthority::new(get_api_base_url(), get_auth_token());
                match authority.spin_status().await {
                    Ok(status) => {
                        start_cooldown(&cooldown_until, &clock, status.cooldown_seconds);
                        window_seconds.set(status.window_seconds);
                    }
                    Err(err) => {
                        log::warn!("Failed to fetch wheel status: {}", err);
                        error_message.set(err.to_string());
                    }
                }
                loading.set(false);
            });

            move || {
                frame_slot.borrow_mut().take();
                controller.borrow_mut().dismiss();
            }
        });
    }

    // Tick the countdown once a second while a cooldown is set
    {
        let clock = clock.clone();
        use_effect_with(*cooldown_until, move |until| {
            let interval = until.map(|_| {
                Interval::new(1000, move || clock.set(js_sys::Date::now()))
            });
            move || drop(interval)
        });
    }

    let cooldown_seconds = cooldown_until
        .map(|until| ((until - *clock) / 1000.0).ceil().max(0.0) as i64)
        .unwrap_or(0);

    let on_spin = {
        let controller = controller.clone();
        let frame_slot = frame_slot.clone();
        let redraw = redraw.clone();
        let cooldown_until = cooldown_until.clone();
        let clock = clock.clone();
        let window_seconds = window_seconds.clone();
        let error_message = error_message.clone();

        Callback::from(move |_: MouseEvent| {
            // spin_once checks the gate again; this just saves a request
            if controller.borrow().is_spinning() {
                return;
            }
            error_message.set(String::new());

            let controller = controller.clone();
            let frame_slot = frame_slot.clone();
            let redraw = redraw.clone();
            let cooldown_until = cooldown_until.clone();
            let clock = clock.clone();
            let window_seconds = window_seconds.clone();
            let error_message = error_message.clone();

            spawn_local(async move {
                let authority = HttpSpinAuthority::new(get_api_base_url(), get_auth_token());
                let mut rng = SmallRng::from_entropy();

                let outcome = spin_once(&controller, &authority, &mut rng, now_ms).await;

                let cooldown = authority.last_cooldown().unwrap_or(0);
                if authority.last_cooldown().is_some() {
                    start_cooldown(&cooldown_until, &clock, cooldown);
                }
                if let Some(window) = authority.last_window() {
                    window_seconds.set(Some(window));
                }

                match outcome {
                    SpinOutcome::Started { angle } => {
                        log::debug!("wheel spinning to {:.2} degrees", angle);
                        run_animation(controller.clone(), frame_slot, redraw.clone());
                    }
                    SpinOutcome::Rejected(GateRejection::AlreadySpinning) => {}
                    SpinOutcome::Rejected(GateRejection::NotPermitted) => {
                        if cooldown <= 0 {
                            error_message.set(GateRejection::NotPermitted.to_string());
                        }
                    }
                    SpinOutcome::Aborted(WheelError::SessionDiscarded) => {}
                    SpinOutcome::Aborted(err) => {
                        log::warn!("Wheel spin aborted: {}", err);
                        // A refused spin already shows its countdown on the button
                        if cooldown <= 0 {
                            error_message.set(SPIN_FAILED_ERROR.to_string());
                        }
                    }
                }
                redraw.force_update();
            });
        })
    };

    let (is_spinning, rotation, won_tier, tiers) = {
        let wheel = controller.borrow();
        (
            wheel.is_spinning(),
            wheel.rotation(),
            wheel.displayed_tier().cloned(),
            wheel.tiers().clone(),
        )
    };

    // Until the server reports its window the bar starts empty
    let window = (*window_seconds).unwrap_or(cooldown_seconds).max(1);
    let cooldown_progress = (1.0 - cooldown_seconds as f64 / window as f64).clamp(0.0, 1.0) * 100.0;

    html! {
        <div class="container mx-auto px-4 py-8">
            <h1 class={styles::TEXT_H1}>
                <span class="bg-clip-text text-transparent bg-gradient-to-r from-yellow-400 to-orange-500">{"Daily Ride Rewards"}</span>
            </h1>

            <div class={styles::CARD_WHEEL}>
                <div class="relative mx-auto mb-8 flex justify-center items-center">
                    <div class="w-full max-w-[450px] mx-auto">
                        <WheelCanvas rotation={rotation} is_spinning={is_spinning} tiers={tiers.clone()} />
                    </div>
                </div>

                if !(*error_message).is_empty() {
                    <div class={classes!(styles::CARD_ERROR, "mb-6", "text-center")}>
                        {(*error_message).clone()}
                    </div>
                }

                <div class="flex justify-center mt-4">
                    <div class="w-full max-w-[300px]">
                        if *loading {
                            <div class="w-full flex items-center justify-center py-4 px-8 rounded-full bg-gray-300 dark:bg-gray-700 animate-pulse">
                                <div class={classes!(styles::LOADING_SPINNER, "mr-3")}></div>
                                <span class="text-gray-700 dark:text-gray-300 font-medium">{"Loading..."}</span>
                            </div>
                        } else {
                            if cooldown_seconds > 0 && !is_spinning {
                                <div class="mb-2 flex justify-between items-center">
                                    <span class="text-sm font-medium text-gray-700 dark:text-gray-300">{"Next spin available in:"}</span>
                                    <span class="text-sm font-bold text-blue-600 dark:text-blue-400">{format_time(cooldown_seconds)}</span>
                                </div>
                                <div class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5 mb-4">
                                    <div class="bg-gradient-to-r from-blue-500 to-purple-600 h-2.5 rounded-full transition-all duration-500"
                                        style={format!("width: {}%", cooldown_progress)}>
                                    </div>
                                </div>
                            }
                            <SpinButton
                                is_spinning={is_spinning}
                                cooldown_seconds={if is_spinning { 0 } else { cooldown_seconds }}
                                disabled={*loading}
                                onclick={on_spin}
                            />
                        }
                    </div>
                </div>

                <ResultDisplay tier={won_tier} />

                <div class="mt-8 text-center bg-gray-50 dark:bg-gray-700/30 p-6 rounded-xl shadow-sm">
                    <h3 class="font-bold text-lg mb-3 text-gray-800 dark:text-gray-200">{"How it works"}</h3>
                    <p class="mb-4 text-gray-700 dark:text-gray-300">{"Spin once a day for bonus ride points. Every segment is a win."}</p>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-3 mt-4">
                        { for tiers.tiers().iter().map(|tier| html! {
                            <div class="bg-white dark:bg-gray-800 p-3 rounded-lg shadow-sm flex items-center"
                                style={format!("border-left: 4px solid {};", tier.color_pair.1)}>
                                <span class="mr-3">{tier.emoji.clone()}</span>
                                <span class="font-medium text-gray-900 dark:text-white">{tier.label.clone()}</span>
                            </div>
                        }) }
                    </div>
                    if let Some(window) = *window_seconds {
                        <div class={classes!(styles::TEXT_SMALL, "mt-4", "inline-block")}>
                            {format!("{} cooldown between spins", format_time(window))}
                        </div>
                    }
                </div>
            </div>
        </div>
    }
}
