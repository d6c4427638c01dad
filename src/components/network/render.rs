use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::options::{Arrows, LabelAlign, NodeShape};
use super::state::{EdgeInfo, NetworkState};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let positions = state.positions();
	draw_edges(state, &positions, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(
	state: &NetworkState,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	let k = state.transform.k;
	let radius = state.node_radius();
	let arrows = state.options.edges.arrows;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for edge in state.edges() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted =
			state.is_highlighted(edge.source) && state.is_highlighted(edge.target);

		// t=0: all edges at base (0.6), t=1: highlighted at 0.9, others at 0.15
		let (edge_alpha, arrow_alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		let (start_gap, end_gap) = match arrows {
			Arrows::To => (radius, radius + arrow_size),
			Arrows::From => (radius + arrow_size, radius),
			Arrows::None => (radius, radius),
		};
		ctx.begin_path();
		ctx.move_to(x1 + ux * start_gap, y1 + uy * start_gap);
		ctx.line_to(x2 - ux * end_gap, y2 - uy * end_gap);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		let head = match arrows {
			Arrows::To => Some((x2 - ux * radius, y2 - uy * radius, ux, uy)),
			Arrows::From => Some((x1 + ux * radius, y1 + uy * radius, -ux, -uy)),
			Arrows::None => None,
		};
		if let Some((tip_x, tip_y, ux, uy)) = head {
			ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", arrow_alpha));
			let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}

		draw_edge_label(state, edge, (x1, y1, x2, y2), edge_alpha, ctx);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edge_label(
	state: &NetworkState,
	edge: &EdgeInfo,
	(x1, y1, x2, y2): (f64, f64, f64, f64),
	alpha: f64,
	ctx: &CanvasRenderingContext2d,
) {
	let Some(label) = &edge.label else {
		return;
	};
	let k = state.transform.k;
	let font_size = 9.0 / k.max(0.5);
	let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);

	// Keep rotated text upright.
	let mut angle = (y2 - y1).atan2(x2 - x1);
	if angle > PI / 2.0 || angle < -PI / 2.0 {
		angle += PI;
	}
	let (angle, offset, baseline) = match state.options.edges.font.align {
		LabelAlign::Horizontal => (0.0, 0.0, "middle"),
		LabelAlign::Middle => (angle, 0.0, "middle"),
		LabelAlign::Top => (angle, -3.0 / k, "bottom"),
		LabelAlign::Bottom => (angle, 3.0 / k, "top"),
	};

	ctx.save();
	let _ = ctx.translate(mx, my);
	let _ = ctx.rotate(angle);
	ctx.set_font(&format!("{}px sans-serif", font_size));
	ctx.set_text_align("center");
	ctx.set_text_baseline(baseline);
	ctx.set_fill_style_str(&format!("rgba(200, 220, 255, {})", alpha.max(0.3)));
	let _ = ctx.fill_text(label, 0.0, offset);
	ctx.restore();
}

fn node_path(
	state: &NetworkState,
	x: f64,
	y: f64,
	radius: f64,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.begin_path();
	match state.options.nodes.shape {
		NodeShape::Dot => {
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		}
		NodeShape::Square => ctx.rect(x - radius, y - radius, radius * 2.0, radius * 2.0),
	}
}

fn draw_nodes(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);
	let base_radius = state.node_radius();

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let (alpha, radius) = (1.0 - 0.7 * t, base_radius * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		node_path(state, x, y, radius, ctx);
		ctx.set_fill_style_str(&node.data.user_data.color);
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if let Some(label) = &node.data.user_data.label {
			ctx.set_text_align("start");
			ctx.set_text_baseline("alphabetic");
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(label, x + radius + 3.0, y + 3.0);
		}
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(base_radius * (1.0 + 0.35 * t), base_radius * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(base_radius * (1.0 + 0.2 * t), base_radius * (1.4 + 0.6 * t))
		} else {
			(base_radius, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius)
			{
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient
					.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		node_path(state, x, y, radius, ctx);
		ctx.set_fill_style_str(&node.data.user_data.color);
		ctx.fill();

		if is_hovered && t > 0.01 {
			node_path(state, x, y, radius + 2.0 / k, ctx);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		if let Some(label) = &node.data.user_data.label {
			ctx.set_text_align("start");
			ctx.set_text_baseline("alphabetic");
			ctx.set_fill_style_str("white");
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(label, x + radius + 3.0, y + 3.0);
		}
	});
}
