pub mod runner;

pub use runner::BackdropRunner;

use std::cell::RefCell;

use beamfall::{BeamRegistry, Engine, EngineConfig, HostEvent, Surface};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<BackdropRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Calls before `beams_init()` are logged and
/// yield `None`.
fn with_runner<R>(f: impl FnOnce(&mut BackdropRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("beamfall: not initialized, call beams_init() first");
                None
            }
        }
    })
}

/// Config: empty string or a JSON object. Malformed documents fall back to defaults.
fn parse_config(json: &str) -> EngineConfig {
    if json.trim().is_empty() {
        return EngineConfig::default();
    }
    EngineConfig::from_json(json).unwrap_or_else(|err| {
        log::error!("beamfall: bad config, using defaults: {}", err);
        EngineConfig::default()
    })
}

/// Registry: empty string selects the stock backdrop.
fn parse_registry(json: &str) -> BeamRegistry {
    if json.trim().is_empty() {
        return BeamRegistry::default_backdrop();
    }
    BeamRegistry::from_json(json).unwrap_or_else(|err| {
        log::error!("beamfall: bad beam registry, using default backdrop: {}", err);
        BeamRegistry::default_backdrop()
    })
}

#[wasm_bindgen]
pub fn beams_init(config_json: &str, registry_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let engine = Engine::with_seed(parse_config(config_json), parse_registry(registry_json));
    let beams = engine.beams().len();
    let runner = BackdropRunner::new(engine);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("beamfall: initialized with {} beams", beams);
}

// ---- Host signals ----

#[wasm_bindgen]
pub fn beams_ready() {
    with_runner(|r| r.push_host_event(HostEvent::Ready));
}

#[wasm_bindgen]
pub fn beams_set_surface(left: f32, top: f32, width: f32, height: f32) {
    with_runner(|r| {
        r.push_host_event(HostEvent::SurfaceChanged(Surface::new(left, top, width, height)))
    });
}

#[wasm_bindgen]
pub fn beams_surface_lost() {
    with_runner(|r| r.push_host_event(HostEvent::SurfaceLost));
}

#[wasm_bindgen]
pub fn beams_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

/// Tear down immediately; the runner is dropped.
#[wasm_bindgen]
pub fn beams_shutdown() {
    with_runner(|r| {
        r.push_host_event(HostEvent::Shutdown);
        r.tick(0.0);
    });
    RUNNER.with(|cell| {
        cell.borrow_mut().take();
    });
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_frame_len() -> u32 {
    with_runner(|r| r.frame_len()).unwrap_or_default()
}

/// Copy of the packed frame, for hosts without shared memory access.
#[wasm_bindgen]
pub fn beams_frame_copy() -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.frame()))
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_beam_split() -> u32 {
    with_runner(|r| r.beam_split()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_event_count() -> u32 {
    with_runner(|r| r.event_count()).unwrap_or_default()
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_instances() -> u32 {
    with_runner(|r| r.max_instances()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_instance_data_offset() -> u32 {
    with_runner(|r| r.instance_data_offset()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_event_data_offset() -> u32 {
    with_runner(|r| r.event_data_offset()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or_default()
}
