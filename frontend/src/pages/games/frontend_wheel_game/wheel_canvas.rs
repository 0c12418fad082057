use std::f64::consts::PI;

use shared::reward_wheel::TierTable;
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct WheelCanvasProps {
    pub rotation: f64,
    pub is_spinning: bool,
    pub tiers: TierTable,
}

fn is_dark_mode() -> bool {
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .map(|el| el.class_list().contains("dark"))
        .unwrap_or(false)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Tier *i* is drawn clockwise from the top, where the pointer sits, and the
/// whole wheel is turned clockwise by `rotation` degrees.
fn draw_wheel(
    context: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    rotation: f64,
    is_spinning: bool,
    tiers: &TierTable,
) {
    let center_x = width / 2.0;
    let center_y = height / 2.0;
    let radius = width.min(height) / 2.0 - 20.0;
    let dark = is_dark_mode();

    context.clear_rect(0.0, 0.0, width, height);

    // Outer glow
    let glow = if is_spinning { 0.25 } else { 0.15 };
    context.begin_path();
    if dark {
        context.set_fill_style_str(&format!("rgba(130, 100, 255, {})", glow));
    } else {
        context.set_fill_style_str(&format!("rgba(100, 130, 255, {})", glow));
    }
    let _ = context.arc(center_x, center_y, radius + 15.0, 0.0, 2.0 * PI);
    context.fill();

    context.save();
    let _ = context.translate(center_x, center_y);
    let _ = context.rotate(rotation * PI / 180.0);

    let seg = tiers.segment_span() * PI / 180.0;
    let top = -PI / 2.0;

    for (index, tier) in tiers.tiers().iter().enumerate() {
        let start = top + index as f64 * seg;
        let end = start + seg;

        context.begin_path();
        context.set_fill_style_str(&tier.color_pair.1);
        context.move_to(0.0, 0.0);
        let _ = context.arc(0.0, 0.0, radius, start, end);
        context.close_path();
        context.fill();

        // Lighter inner band
        context.begin_path();
        context.set_fill_style_str(&tier.color_pair.0);
        context.move_to(0.0, 0.0);
        let _ = context.arc(0.0, 0.0, radius * 0.45, start, end);
        context.close_path();
        context.fill();

        // Divider
        context.begin_path();
        context.set_stroke_style_str(if dark { "rgba(255, 255, 255, 0.7)" } else { "rgba(255, 255, 255, 0.9)" });
        context.set_line_width(2.5);
        context.move_to(0.0, 0.0);
        context.line_to(radius * start.cos(), radius * start.sin());
        context.stroke();

        // Label, reading outwards from the hub
        let mid = start + seg / 2.0;
        context.save();
        let _ = context.rotate(mid + PI / 2.0);
        context.set_text_align("center");
        context.set_text_baseline("middle");
        context.set_fill_style_str("#ffffff");
        context.set_font("bold 22px sans-serif");
        let _ = context.fill_text(&tier.emoji, 0.0, -radius * 0.78);
        context.set_font("bold 15px sans-serif");
        let _ = context.fill_text(&tier.points.to_string(), 0.0, -radius * 0.6);
        context.restore();
    }

    context.restore();

    // Hub
    context.begin_path();
    context.set_fill_style_str(if dark { "#1a1c2e" } else { "#f0f2ff" });
    let _ = context.arc(center_x, center_y, radius * 0.18, 0.0, 2.0 * PI);
    context.fill();

    // Pointer, fixed at the top
    context.begin_path();
    context.set_fill_style_str(if dark { "#fde68a" } else { "#f59e0b" });
    context.move_to(center_x - 14.0, center_y - radius - 18.0);
    context.line_to(center_x + 14.0, center_y - radius - 18.0);
    context.line_to(center_x, center_y - radius + 10.0);
    context.close_path();
    context.fill();
}

#[function_component(WheelCanvas)]
pub fn wheel_canvas(props: &WheelCanvasProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with(
            (props.rotation, props.is_spinning, props.tiers.clone()),
            move |(rotation, is_spinning, tiers)| {
                if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                    if let Some(context) = context_2d(&canvas) {
                        let (width, height) = (canvas.width() as f64, canvas.height() as f64);
                        draw_wheel(&context, width, height, *rotation, *is_spinning, tiers);
                    }
                }
                || ()
            },
        );
    }

    html! {
        <canvas
            ref={canvas_ref}
            width="450"
            height="450"
            class="w-full h-auto"
        />
    }
}
