use morph_core::gesture::Landmark;
use morph_core::session::{FrameResult, MorphSession};
use morph_core::{MorphConfig, MorphError, MorphUniforms, MorphVertex};
use wasm_bindgen::prelude::*;

fn to_js(err: MorphError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct MorphWorld {
    session: MorphSession,
    gpu_buffer: Vec<MorphVertex>,
    uniforms: MorphUniforms,
    vertices_dirty: bool,
}

#[wasm_bindgen]
impl MorphWorld {
    /// `config_json` may be empty or a partial JSON object of tunables.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: u32, height: u32) -> Result<MorphWorld, JsValue> {
        let config = if config_json.trim().is_empty() {
            MorphConfig::default()
        } else {
            MorphConfig::from_json(config_json).map_err(to_js)?
        };
        let session = MorphSession::new(config, width, height).map_err(to_js)?;

        web_sys::console::log_1(
            &format!(
                "WASM MorphWorld created: {} particles, {} -> {}",
                session.buffer().count(),
                session.config().source_shape,
                session.config().target_shape,
            )
            .into(),
        );

        let gpu_buffer = session.vertices();
        let uniforms = session.renderer().uniforms(session.camera(), session.control());
        Ok(MorphWorld {
            session,
            gpu_buffer,
            uniforms,
            vertices_dirty: true,
        })
    }

    /// Run one render tick. Returns the time spent in milliseconds.
    #[wasm_bindgen]
    pub fn render_tick(&mut self) -> f32 {
        let start = js_sys::Date::now();
        self.uniforms = self.session.render_tick();
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    /// Feed one detector result as flat `[x, y, z, ...]` landmarks.
    /// An empty slice means no hand was detected.
    #[wasm_bindgen]
    pub fn on_hand(&mut self, landmarks: &[f32]) {
        let result = if landmarks.is_empty() {
            self.session.on_camera_frame(None)
        } else {
            self.session.on_detection(Landmark::from_flat(landmarks, 3).map(Some))
        };
        if let FrameResult::Dropped = result {
            web_sys::console::debug_1(&"gesture frame dropped".into());
        }
    }

    #[wasm_bindgen]
    pub fn camera_started(&mut self) -> Result<(), JsValue> {
        self.session.on_camera_started(Ok(())).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn camera_failed(&mut self, message: &str) -> Result<(), JsValue> {
        web_sys::console::error_1(&format!("camera/detector error: {message}").into());
        self.session
            .on_camera_started(Err(MorphError::Initialization(message.to_string())))
            .map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn camera_stopped(&mut self, error: Option<String>) -> Result<(), JsValue> {
        let result = match error {
            None => Ok(()),
            Some(message) => Err(MorphError::Initialization(message)),
        };
        self.session.on_camera_stopped(result).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn status_text(&self) -> String {
        self.session.status().to_string()
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.session.status().is_running()
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: u32, height: u32) {
        self.session.resize(width, height);
    }

    #[wasm_bindgen]
    pub fn set_video_size(&mut self, width: u32, height: u32) {
        self.session.set_video_size(width, height);
    }

    #[wasm_bindgen]
    pub fn set_shapes(&mut self, source: &str, target: &str) -> Result<(), JsValue> {
        self.session.set_shapes_by_name(source, target).map_err(to_js)?;
        self.gpu_buffer = self.session.vertices();
        self.vertices_dirty = true;
        Ok(())
    }

    /// True once after the particle pairs changed and need re-uploading.
    #[wasm_bindgen]
    pub fn take_vertices_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.vertices_dirty, false)
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_ptr(&self) -> *const f32 {
        self.gpu_buffer.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_byte_length(&self) -> usize {
        self.gpu_buffer.len() * std::mem::size_of::<MorphVertex>()
    }

    #[wasm_bindgen]
    pub fn get_uniforms(&self) -> Vec<u8> {
        bytemuck::bytes_of(&self.uniforms).to_vec()
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.session.buffer().count()
    }

    #[wasm_bindgen]
    pub fn vertices_per_particle(&self) -> u32 {
        morph_core::morph::VERTICES_PER_PARTICLE
    }

    #[wasm_bindgen]
    pub fn transition(&self) -> f32 {
        self.session.control().transition
    }

    #[wasm_bindgen]
    pub fn yaw(&self) -> f32 {
        self.session.control().rotation.yaw
    }

    #[wasm_bindgen]
    pub fn pitch(&self) -> f32 {
        self.session.control().rotation.pitch
    }

    /// Landmark dots in video pixels, `[x0, y0, x1, y1, ...]`. Empty when the
    /// overlay is cleared.
    #[wasm_bindgen]
    pub fn overlay_dots(&self) -> Vec<f32> {
        self.session.overlay().flattened()
    }

    #[wasm_bindgen]
    pub fn detector_options(&self) -> Vec<f32> {
        let options = self.session.detector_options();
        vec![
            options.max_hands as f32,
            options.min_detection_confidence,
            options.min_tracking_confidence,
        ]
    }

    #[wasm_bindgen]
    pub fn shader_source() -> String {
        morph_core::shaders::MORPH.to_string()
    }
}

impl Drop for MorphWorld {
    fn drop(&mut self) {
        self.session.shutdown();
    }
}
