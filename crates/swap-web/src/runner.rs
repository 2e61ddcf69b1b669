use swap_engine::{
    EngineContext, FixedTimestep, Game, GameConfig, GameEvent, InputEvent, InputQueue,
    RenderBuffer, RenderContext,
};

/// Generic game runner that wires up the engine loop.
///
/// The browser shell creates one `thread_local!` GameRunner and reaches it
/// through free `#[wasm_bindgen]` functions, because wasm-bindgen cannot
/// export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    /// Handed to every step after the first in a frame, so held input is not
    /// folded twice.
    no_input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    /// Flat buffer of sound event IDs for host reads.
    sound_buffer: Vec<u8>,
    /// Game events of the last frame, capped at `max_events`.
    event_buffer: Vec<GameEvent>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt());

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            no_input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            timestep,
            sound_buffer: Vec::with_capacity(config.max_sounds),
            event_buffer: Vec::with_capacity(config.max_events),
            config,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.timestep = FixedTimestep::new(self.config.fixed_dt());
        self.render_buffer = RenderBuffer::with_capacity(self.config.max_instances);
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame of `dt` seconds: zero or more fixed ticks, then
    /// render and publish the outboxes.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            self.ctx.clock.advance(self.timestep.dt());
            let input = if step == 0 { &self.input } else { &self.no_input };
            self.game.update(&mut self.ctx, input);
        }

        // Events wait for the next frame that runs a tick.
        if steps > 0 {
            self.input.clear();
        }

        self.publish();
    }

    fn publish(&mut self) {
        self.render_buffer.clear();
        {
            let mut render_ctx = RenderContext {
                render_buffer: &mut self.render_buffer,
            };
            self.game.render(&mut render_ctx);
        }

        if self.ctx.sounds.len() > self.config.max_sounds {
            log::warn!("dropping {} sound events", self.ctx.sounds.len() - self.config.max_sounds);
        }
        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.config.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.event_buffer.clear();
        self.event_buffer
            .extend(self.ctx.events.iter().take(self.config.max_events).copied());
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Run `f` against the game with the engine context, then republish.
    pub fn with_game<R>(&mut self, f: impl FnOnce(&mut G, &mut EngineContext) -> R) -> R {
        let out = f(&mut self.game, &mut self.ctx);
        self.publish();
        out
    }

    // ---- Pointer accessors for host reads ----

    pub fn instances(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn sound_events(&self) -> &[u8] {
        &self.sound_buffer
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.event_buffer
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.event_buffer.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Capacity accessors ----

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.config.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swap_engine::{RenderInstance, SoundEvent};

    /// Counts ticks and the input events each tick saw.
    #[derive(Default)]
    struct Recorder {
        ticks: u32,
        seen: Vec<usize>,
        last_ms: f64,
    }

    impl Game for Recorder {
        fn init(&mut self, ctx: &mut EngineContext) {
            ctx.emit_event(GameEvent::simple(GameEvent::LEVEL_STARTED));
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.ticks += 1;
            self.seen.push(input.len());
            self.last_ms = ctx.clock.now_ms();
            ctx.emit_sound(SoundEvent::SHOOT);
        }

        fn render(&self, ctx: &mut RenderContext) {
            for _ in 0..self.ticks {
                ctx.render_buffer.push(RenderInstance::default());
            }
        }
    }

    #[test]
    fn does_nothing_before_init() {
        let mut runner = GameRunner::new(Recorder::default());
        runner.tick(1.0);
        assert_eq!(runner.game().ticks, 0);
    }

    #[test]
    fn init_publishes_startup_events() {
        let mut runner = GameRunner::new(Recorder::default());
        runner.init();
        assert_eq!(runner.game_events_len(), 1);
        assert_eq!(runner.game_events()[0].kind, GameEvent::LEVEL_STARTED);
    }

    #[test]
    fn fixed_ticks_advance_clock_and_see_input_once() {
        let mut runner = GameRunner::new(Recorder::default());
        runner.init();
        runner.push_input(InputEvent::KeyDown { key_code: 68 });

        // Two ticks at 40 Hz, with headroom for float error.
        runner.tick(2.0 / 40.0 + 1e-4);
        let game = runner.game();
        assert_eq!(game.ticks, 2);
        assert_eq!(game.seen, vec![1, 0]);
        assert!((game.last_ms - 50.0).abs() < 1e-3);
        assert_eq!(runner.sound_events(), &[1, 1]);
        assert_eq!(runner.instance_count(), 2);
        assert_eq!(runner.game_events_len(), 0);
    }

    #[test]
    fn short_frame_keeps_input_for_later() {
        let mut runner = GameRunner::new(Recorder::default());
        runner.init();
        runner.push_input(InputEvent::KeyDown { key_code: 68 });
        runner.tick(0.001);
        assert_eq!(runner.game().ticks, 0);
        runner.tick(1.0 / 40.0);
        assert_eq!(runner.game().seen, vec![1]);
    }

    #[test]
    fn sound_outbox_is_capped() {
        let mut runner = GameRunner::new(Recorder::default());
        runner.init();
        runner.config.max_sounds = 3;
        // A long frame is capped at ten ticks.
        runner.tick(10.0);
        assert!(runner.game().ticks >= 9 && runner.game().ticks <= 10);
        assert_eq!(runner.sound_events_len(), 3);
    }
}
