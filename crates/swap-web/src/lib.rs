pub mod game;
pub mod runner;

use std::cell::RefCell;

use swap_engine::{GameEvent, InputEvent};
use wasm_bindgen::prelude::*;

pub use game::{Hint, Mode, SwapGame};
pub use runner::GameRunner;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner<SwapGame>>> = const { RefCell::new(None) };
}

/// Run `f` against the runner, or return `fallback` before `game_init`.
fn with_runner<R>(fallback: R, f: impl FnOnce(&mut GameRunner<SwapGame>) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("game not initialized; call game_init() first");
            fallback
        }
    })
}

#[wasm_bindgen]
pub fn game_init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"swap: logger was already installed".into());
    }

    let mut runner = GameRunner::new(SwapGame::new());
    runner.init();
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("swap: initialized");
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner((), |r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner((), |r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_up(x: f32, y: f32) {
    with_runner((), |r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_move(x: f32, y: f32) {
    with_runner((), |r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner((), |r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn game_key_up(key_code: u32) {
    with_runner((), |r| r.push_input(InputEvent::KeyUp { key_code }));
}

#[wasm_bindgen]
pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
    with_runner((), |r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

/// The page lost focus; key releases after this point never arrive.
#[wasm_bindgen]
pub fn game_blur() {
    with_runner((), |r| r.game_mut().release_input());
}

/// Replace the level set with a JSON manifest. Returns false if it does not parse.
#[wasm_bindgen]
pub fn game_load_levels(json: &str) -> bool {
    with_runner(false, |r| {
        r.with_game(|game, ctx| match game.load_manifest(json, ctx) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{err}");
                false
            }
        })
    })
}

// ---- Game state accessors ----

#[wasm_bindgen]
pub fn get_level() -> u32 {
    with_runner(0, |r| r.game().level() as u32)
}

#[wasm_bindgen]
pub fn get_in_menu() -> bool {
    with_runner(true, |r| r.game().mode() == Mode::Menu)
}

/// Revealed tutorial text, if a hint is showing.
#[wasm_bindgen]
pub fn get_hint() -> Option<String> {
    with_runner(None, |r| r.game().hint().map(|h| h.visible().to_string()))
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.instances_ptr())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(0, |r| r.instance_count())
}

#[wasm_bindgen]
pub fn get_sound_events_ptr() -> *const u8 {
    with_runner(std::ptr::null(), |r| r.sound_events_ptr())
}

#[wasm_bindgen]
pub fn get_sound_events_len() -> u32 {
    with_runner(0, |r| r.sound_events_len())
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.game_events_ptr())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(0, |r| r.game_events_len())
}

#[wasm_bindgen]
pub fn get_game_event_floats() -> u32 {
    GameEvent::FLOATS as u32
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(0.0, |r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(0.0, |r| r.world_height())
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_instances() -> u32 {
    with_runner(0, |r| r.max_instances())
}

#[wasm_bindgen]
pub fn get_max_sounds() -> u32 {
    with_runner(0, |r| r.max_sounds())
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(0, |r| r.max_events())
}
