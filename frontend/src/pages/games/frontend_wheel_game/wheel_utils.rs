use shared::reward_wheel::{format_time, RewardTier};
use yew::prelude::*;

// Result display component
#[derive(Properties, PartialEq)]
pub struct ResultDisplayProps {
    pub tier: Option<RewardTier>,
}

#[function_component(ResultDisplay)]
pub fn result_display(props: &ResultDisplayProps) -> Html {
    let Some(tier) = &props.tier else {
        return html! {};
    };

    let gradient = format!(
        "background-image: linear-gradient(to right, {}, {});",
        tier.color_pair.0, tier.color_pair.1
    );

    html! {
        <div class="mt-8 mb-4 flex flex-col items-center justify-center">
            <div
                class="flex items-center justify-center px-6 py-4 rounded-xl text-white font-bold text-xl shadow-lg border-2 border-white/40 animate-bounce"
                style={gradient}
            >
                <span class="mr-2">{tier.emoji.clone()}</span>
                <span>{format!("You won {}!", tier.label)}</span>
            </div>
        </div>
    }
}

// Spin button component
#[derive(Properties, PartialEq)]
pub struct SpinButtonProps {
    pub is_spinning: bool,
    pub cooldown_seconds: i64,
    pub disabled: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(SpinButton)]
pub fn spin_button(props: &SpinButtonProps) -> Html {
    let is_on_cooldown = props.cooldown_seconds > 0;

    let button_text = if props.is_spinning {
        "Spinning...".to_string()
    } else if is_on_cooldown {
        format!("Cooldown: {}", format_time(props.cooldown_seconds))
    } else {
        "Spin (Free)".to_string()
    };

    let is_disabled = props.disabled || props.is_spinning || is_on_cooldown;

    let button_class = if is_disabled {
        if is_on_cooldown {
            "bg-gradient-to-r from-blue-400 to-gray-400 opacity-80 cursor-not-allowed text-white"
        } else {
            "bg-gradient-to-r from-gray-400 to-gray-500 opacity-75 cursor-not-allowed text-white"
        }
    } else {
        "bg-gradient-to-r from-yellow-400 to-orange-500 hover:from-yellow-500 hover:to-orange-600 text-white shadow-lg hover:shadow-xl transform hover:-translate-y-0.5 active:translate-y-0"
    };

    let spin_icon_class = if props.is_spinning {
        "inline-block mr-2 animate-spin"
    } else {
        "hidden"
    };

    html! {
        <div class={classes!("relative", "overflow-hidden", "rounded-full", "w-full", button_class)}>
            <button
                onclick={props.onclick.clone()}
                disabled={is_disabled}
                class="relative w-full px-8 py-4 font-bold text-lg transition-all duration-300 border-2 border-transparent hover:border-white focus:outline-none focus:ring-4 focus:ring-yellow-300 focus:ring-opacity-50 bg-transparent"
            >
                <div class="flex items-center justify-center relative z-10">
                    <svg class={spin_icon_class} xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
                        <circle cx="12" cy="12" r="10" />
                        <path d="M12 6v6l4 2" />
                    </svg>
                    <span>{button_text}</span>
                </div>
            </button>
        </div>
    }
}
