use crate::BoardCanvas;
use js_sys::Array;
use pinboard::drag::Preview;
use pinboard::model::{Vec2, Viewport, Visibility};
use wasm_bindgen::prelude::*;

use crate::error;
use crate::interop::{arr_f32, arr_u32, arr_u8, new_obj, set_kv};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn preview_to_js(preview: &Preview) -> JsValue {
    let mut ids = Vec::with_capacity(preview.len());
    let mut positions = Vec::with_capacity(preview.len() * 2);
    for (&id, pos) in preview {
        ids.push(id);
        positions.push(pos.x);
        positions.push(pos.y);
    }
    let obj = new_obj();
    set_kv(&obj, "ids", &arr_u32(&ids).into());
    set_kv(&obj, "positions", &arr_f32(&positions).into());
    obj.into()
}

fn css_color(c: pinboard::model::Color) -> String {
    format!("rgba({},{},{},{})", c.r, c.g, c.b, f64::from(c.a) / 255.0)
}

fn visibility_code(v: Visibility) -> u8 {
    match v {
        Visibility::Full => 0,
        Visibility::Placeholder => 1,
        Visibility::Hidden => 2,
    }
}

#[wasm_bindgen]
impl BoardCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> BoardCanvas {
        crate::BoardCanvas::rs_new()
    }
    pub fn rev(&self) -> u64 {
        self.rs_rev()
    }

    // Store: nodes and edges
    pub fn add_node(&mut self, x: f32, y: f32) -> Option<u32> {
        self.board.add_node(x, y)
    }
    pub fn add_node_res(&mut self, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        match self.board.add_node(x, y) {
            Some(id) => error::ok(JsValue::from_f64(f64::from(id))),
            None => error::err("invalid_node", "failed to add node", None),
        }
    }
    pub fn move_node(&mut self, id: u32, x: f32, y: f32) -> bool {
        self.board.move_node(id, x, y, Some("Moved 1 card(s)"))
    }
    pub fn move_node_res(&mut self, id: u32, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if self.board.get_node(id).is_none() {
            return error::invalid_id("node", id);
        }
        let ok = self.board.move_node(id, x, y, Some("Moved 1 card(s)"));
        error::ok(JsValue::from_bool(ok))
    }
    pub fn get_node(&self, id: u32) -> JsValue {
        match self.board.get_node(id) {
            Some(n) => match serde_wasm_bindgen::to_value(n) {
                Ok(v) => v,
                Err(_) => JsValue::NULL,
            },
            None => JsValue::NULL,
        }
    }
    pub fn update_node(
        &mut self,
        id: u32,
        x: Option<f32>,
        y: Option<f32>,
        width: Option<f32>,
        height: Option<f32>,
    ) -> bool {
        self.board.update_node(id, x, y, width, height)
    }
    pub fn remove_node(&mut self, id: u32) -> bool {
        let ok = self.board.remove_node(id, Some("Deleted card"));
        if ok {
            self.engine.forget_node(id);
        }
        ok
    }
    pub fn remove_node_res(&mut self, id: u32) -> JsValue {
        if self.board.get_node(id).is_none() {
            return error::invalid_id("node", id);
        }
        error::ok(JsValue::from_bool(self.remove_node(id)))
    }
    pub fn node_count(&self) -> u32 {
        self.board.node_count() as u32
    }
    pub fn add_edge(&mut self, a: u32, b: u32) -> Option<u32> {
        self.board.add_edge(a, b)
    }
    pub fn add_edge_res(&mut self, a: u32, b: u32) -> JsValue {
        if self.board.get_node(a).is_none() {
            return error::invalid_id("node", a);
        }
        if self.board.get_node(b).is_none() {
            return error::invalid_id("node", b);
        }
        if a == b {
            return error::err("invalid_edge", "edge endpoints cannot be the same node", None);
        }
        match self.board.add_edge(a, b) {
            Some(eid) => error::ok(JsValue::from_f64(f64::from(eid))),
            None => error::err("invalid_edge", "failed to add edge", None),
        }
    }
    pub fn update_edge(&mut self, id: u32, label: Option<String>, kind: Option<String>) -> bool {
        self.board.update_edge(id, label.as_deref(), kind.as_deref())
    }
    pub fn remove_edge(&mut self, id: u32) -> bool {
        self.board.remove_edge(id, Some("Deleted link"))
    }
    pub fn remove_edge_res(&mut self, id: u32) -> JsValue {
        if self.board.get_edge(id).is_none() {
            return error::invalid_id("edge", id);
        }
        error::ok(JsValue::from_bool(self.remove_edge(id)))
    }
    pub fn edge_count(&self) -> u32 {
        self.board.edge_count() as u32
    }
    pub fn history(&self) -> JsValue {
        match serde_wasm_bindgen::to_value(self.board.history()) {
            Ok(v) => v,
            Err(_) => JsValue::NULL,
        }
    }

    // Snapshots
    pub fn to_json(&self) -> String {
        pinboard::json::to_json_string(&self.board)
    }
    pub fn load_json(&mut self, text: &str) -> bool {
        let ok = pinboard::json::from_json_str(&mut self.board, text);
        if ok {
            self.engine.clear_selection();
            self.engine.sync_viewport(&self.board);
        }
        ok
    }
    pub fn load_json_res(&mut self, text: &str) -> JsValue {
        let v: serde_json::Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => return error::err("json_parse", format!("{}", e), None),
        };
        match pinboard::json::from_json_impl_strict(&mut self.board, v) {
            Ok(()) => {
                self.engine.clear_selection();
                self.engine.sync_viewport(&self.board);
                error::ok(JsValue::TRUE)
            }
            Err((code, detail)) => error::err(code, detail, None),
        }
    }

    // Camera
    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.engine.set_container_size(width, height);
    }
    pub fn viewport_event(&mut self, pan_x: f32, pan_y: f32, zoom: f32) -> bool {
        self.engine.viewport_event(Viewport { pan_x, pan_y, zoom })
    }
    /// Animation-frame callback. Logs an FPS sample to the console once
    /// per window.
    pub fn on_frame(&mut self, now_ms: f64) {
        if let Some(sample) = self.engine.on_frame(&mut self.board, now_ms) {
            web_sys::console::log_1(
                &format!(
                    "board canvas fps: {:.1} over {} frames",
                    sample.average, sample.frames
                )
                .into(),
            );
        }
    }
    pub fn get_viewport(&self) -> JsValue {
        match serde_wasm_bindgen::to_value(&self.engine.viewport()) {
            Ok(v) => v,
            Err(_) => JsValue::NULL,
        }
    }
    pub fn to_world(&self, x: f32, y: f32) -> JsValue {
        let w = self.engine.to_world(Vec2::new(x, y));
        arr_f32(&[w.x, w.y]).into()
    }
    pub fn to_screen(&self, x: f32, y: f32) -> JsValue {
        let s = self.engine.to_screen(Vec2::new(x, y));
        arr_f32(&[s.x, s.y]).into()
    }
    pub fn visible_rect(&self) -> JsValue {
        let r = self.engine.visible_rect();
        arr_f32(&[r.left, r.top, r.right, r.bottom]).into()
    }

    // Pointer input
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        node_id: u32,
        sx: f32,
        sy: f32,
        shift: bool,
    ) -> JsValue {
        use pinboard::PointerOutcome::*;
        let outcome =
            self.engine
                .pointer_down(&self.board, pointer_id, node_id, Vec2::new(sx, sy), shift);
        let obj = new_obj();
        match outcome {
            DragStarted => set_kv(&obj, "kind", &JsValue::from_str("drag")),
            LinkSourceSet(id) => {
                set_kv(&obj, "kind", &JsValue::from_str("link_source"));
                set_kv(&obj, "source", &JsValue::from_f64(f64::from(id)));
            }
            LinkCancelled => set_kv(&obj, "kind", &JsValue::from_str("link_cancelled")),
            LinkRequested { source, target } => {
                set_kv(&obj, "kind", &JsValue::from_str("link_requested"));
                set_kv(&obj, "source", &JsValue::from_f64(f64::from(source)));
                set_kv(&obj, "target", &JsValue::from_f64(f64::from(target)));
            }
            Ignored => set_kv(&obj, "kind", &JsValue::from_str("ignored")),
        }
        obj.into()
    }
    pub fn pointer_move(&mut self, pointer_id: i32, sx: f32, sy: f32, now_ms: f64) -> JsValue {
        match self.engine.pointer_move(pointer_id, Vec2::new(sx, sy), now_ms) {
            Some(update) => {
                let obj = new_obj();
                if let Some(preview) = update.preview {
                    set_kv(&obj, "preview", &preview_to_js(&preview));
                }
                if let Some(delay) = update.schedule_flush_ms {
                    set_kv(&obj, "scheduleFlushMs", &JsValue::from_f64(delay));
                }
                obj.into()
            }
            None => JsValue::NULL,
        }
    }
    pub fn drag_flush(&mut self, now_ms: f64) -> JsValue {
        match self.engine.drag_flush(now_ms) {
            Some(preview) => preview_to_js(&preview),
            None => JsValue::NULL,
        }
    }
    pub fn pointer_up(&mut self, pointer_id: i32, sx: f32, sy: f32) -> JsValue {
        match self
            .engine
            .pointer_up(&mut self.board, pointer_id, Vec2::new(sx, sy))
        {
            Some(commit) => {
                let obj = new_obj();
                set_kv(&obj, "ids", &arr_u32(&commit.ids).into());
                set_kv(&obj, "dx", &JsValue::from_f64(f64::from(commit.delta.x)));
                set_kv(&obj, "dy", &JsValue::from_f64(f64::from(commit.delta.y)));
                obj.into()
            }
            None => JsValue::NULL,
        }
    }
    pub fn nudge_node(&mut self, id: u32, dx: f32, dy: f32) -> bool {
        self.engine.nudge_node(&mut self.board, id, dx, dy)
    }
    pub fn spawn_position(&self) -> JsValue {
        let p = self.engine.spawn_position();
        arr_f32(&[p.x, p.y]).into()
    }
    pub fn drag_active(&self) -> bool {
        self.engine.drag_active()
    }
    pub fn detach(&mut self) {
        self.engine.detach();
    }

    // Selection and modes
    pub fn selected_nodes(&self) -> JsValue {
        arr_u32(self.engine.selected_nodes()).into()
    }
    pub fn select_edge(&mut self, id: Option<u32>) {
        self.engine.select_edge(id);
    }
    pub fn set_hovered_edge(&mut self, id: Option<u32>) {
        self.engine.set_hovered_edge(id);
    }
    pub fn focus_node(&mut self, id: Option<u32>) {
        self.engine.focus_node(id);
    }
    pub fn clear_selection(&mut self) {
        self.engine.clear_selection();
    }
    pub fn set_link_mode(&mut self, on: bool) {
        self.engine.set_link_mode(on);
    }
    pub fn link_mode(&self) -> bool {
        self.engine.link_mode()
    }
    pub fn pending_link_source(&self) -> Option<u32> {
        self.engine.pending_link_source()
    }
    pub fn set_perf_mode(&mut self, on: bool) {
        self.engine.set_perf_mode(on);
    }
    pub fn set_snap_to_grid(&mut self, on: bool) {
        self.engine.set_snap_to_grid(on);
    }
    pub fn set_node_size(&mut self, id: u32, width: f32, height: f32) {
        self.engine.set_node_size(id, width, height);
    }

    // Render data
    pub fn render_data(&mut self) -> JsValue {
        let set = self.engine.render_set(&self.board);

        let mut ids = Vec::with_capacity(set.nodes.len());
        let mut rects = Vec::with_capacity(set.nodes.len() * 4);
        let mut tiers = Vec::with_capacity(set.nodes.len());
        for n in &set.nodes {
            ids.push(n.id);
            rects.extend_from_slice(&[n.x, n.y, n.width, n.height]);
            tiers.push(visibility_code(n.visibility));
        }
        let nodes = new_obj();
        set_kv(&nodes, "ids", &arr_u32(&ids).into());
        set_kv(&nodes, "rects", &arr_f32(&rects).into());
        set_kv(&nodes, "visibility", &arr_u8(&tiers).into());

        let edges = Array::new();
        for e in &set.edges {
            let obj = new_obj();
            set_kv(&obj, "id", &JsValue::from_f64(f64::from(e.id)));
            set_kv(&obj, "source", &JsValue::from_f64(f64::from(e.source)));
            set_kv(&obj, "target", &JsValue::from_f64(f64::from(e.target)));
            set_kv(&obj, "path", &JsValue::from_str(&e.curve.to_path_spec()));
            set_kv(&obj, "stroke", &JsValue::from_str(&css_color(e.colors.0)));
            set_kv(&obj, "accent", &JsValue::from_str(&css_color(e.colors.1)));
            set_kv(&obj, "selected", &JsValue::from_bool(e.selected));
            set_kv(&obj, "showLabel", &JsValue::from_bool(e.show_label));
            set_kv(&obj, "showArrowhead", &JsValue::from_bool(e.show_arrowhead));
            if let Some(label) = &e.label {
                set_kv(&obj, "label", &JsValue::from_str(label));
            }
            if let Some(anchor) = &e.label_anchor {
                set_kv(&obj, "labelX", &JsValue::from_f64(f64::from(anchor.position.x)));
                set_kv(&obj, "labelY", &JsValue::from_f64(f64::from(anchor.position.y)));
            }
            edges.push(&obj.into());
        }

        let root = new_obj();
        let rect = set.rect;
        set_kv(
            &root,
            "rect",
            &arr_f32(&[rect.left, rect.top, rect.right, rect.bottom]).into(),
        );
        set_kv(&root, "zoom", &JsValue::from_f64(f64::from(set.zoom)));
        set_kv(&root, "nodes", &nodes.into());
        set_kv(&root, "edges", &edges.into());
        root.into()
    }
}

impl Default for BoardCanvas {
    fn default() -> Self {
        Self::new()
    }
}
