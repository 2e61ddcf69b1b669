//! The platformer itself: menu, level progression and tutorial hints.

use std::path::PathBuf;

use swap_engine::{
    build_render_buffer, Controls, EngineContext, Game, GameConfig, GameEvent, InputQueue,
    InputState, KeyBindings, LevelError, LevelManifest, LevelProvider, LevelSet,
    RenderContext, World, WorldStatus,
};

/// Levels in a full directory-backed set.
pub const LEVEL_COUNT: usize = 17;

/// Custom input kind the host sends to start play from the menu.
pub const CUSTOM_START: u32 = 1;

const DEMO_LEVELS: &str = include_str!("../levels/demo.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Playing,
}

/// Tutorial line shown over the player, revealed one character per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    text: &'static str,
    shown: usize,
}

impl Hint {
    pub fn for_level(level: usize) -> Option<Self> {
        let text = match level {
            1 => "I can use the W A and D keys to move. [Press S]",
            3 => "I can also shoot targets with the mouse.",
            4 => "If I get stuck, I can press R to restart the level.",
            6 => "Swapping conserves momentum.",
            14 => "Better not touch those saws...",
            _ => return None,
        };
        Some(Self { text, shown: 0 })
    }

    pub fn reveal(&mut self) {
        if self.shown < self.text.chars().count() {
            self.shown += 1;
        }
    }

    /// The revealed prefix.
    pub fn visible(&self) -> &str {
        match self.text.char_indices().nth(self.shown) {
            Some((end, _)) => &self.text[..end],
            None => self.text,
        }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }
}

pub struct SwapGame {
    config: GameConfig,
    bindings: KeyBindings,
    input: InputState,
    levels: Box<dyn LevelProvider>,
    level: usize,
    world: Option<World>,
    mode: Mode,
    hint: Option<Hint>,
}

impl SwapGame {
    /// A game over the bundled demo levels.
    pub fn new() -> Self {
        let levels = LevelManifest::from_json(DEMO_LEVELS).unwrap_or_else(|err| {
            log::error!("bundled levels are invalid: {err}");
            LevelManifest::default()
        });
        Self::with_levels(Box::new(levels))
    }

    /// A game over `<root>/<n>.txt` for levels 1 to 17.
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self::with_levels(Box::new(LevelSet::new(root, LEVEL_COUNT)))
    }

    pub fn with_levels(levels: Box<dyn LevelProvider>) -> Self {
        Self {
            config: GameConfig::default(),
            bindings: KeyBindings::default(),
            input: InputState::new(),
            levels,
            level: 1,
            world: None,
            mode: Mode::Menu,
            hint: None,
        }
    }

    /// Use `config` for every level built from now on. An invalid config is
    /// logged and the current one kept.
    pub fn with_config(mut self, config: GameConfig) -> Self {
        match config.validate() {
            Ok(()) => self.config = config,
            Err(err) => log::warn!("keeping current config: {err}"),
        }
        self
    }

    /// Swap in a JSON level manifest and go back to level 1.
    pub fn load_manifest(&mut self, json: &str, ctx: &mut EngineContext) -> Result<(), LevelError> {
        let manifest = LevelManifest::from_json(json)?;
        log::info!("loaded {} levels", manifest.levels.len());
        self.levels = Box::new(manifest);
        self.level = 1;
        if self.mode == Mode::Playing {
            self.start_level(ctx);
        }
        Ok(())
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn hint(&self) -> Option<&Hint> {
        self.hint.as_ref()
    }

    /// Drop every held key and the pointer button, for when the page loses
    /// focus and the matching releases never arrive.
    pub fn release_input(&mut self) {
        self.input.clear();
    }

    fn next_level(&self) -> usize {
        if self.level >= self.levels.count() {
            1
        } else {
            self.level + 1
        }
    }

    /// Build the world for the current level. A level that fails to load
    /// falls back to level 1.
    fn start_level(&mut self, ctx: &mut EngineContext) {
        let source = match self.levels.load(self.level) {
            Ok(source) => source,
            Err(err) if self.level != 1 => {
                log::warn!("level {}: {err}; back to level 1", self.level);
                self.level = 1;
                return self.start_level(ctx);
            }
            Err(err) => {
                log::error!("level 1: {err}");
                self.world = None;
                return;
            }
        };

        self.world = Some(World::load(&source, &self.config, ctx));
        self.hint = Hint::for_level(self.level);
        ctx.emit_event(GameEvent::new(GameEvent::LEVEL_STARTED, self.level as f32, 0.0, 0.0));
        log::info!("level {} started", self.level);
    }

    /// One playing tick. Menu and restart are honored even while a swap or
    /// death holds the world.
    fn play(&mut self, controls: &Controls, ctx: &mut EngineContext) {
        if controls.menu {
            self.mode = Mode::Menu;
            self.world = None;
            self.hint = None;
            ctx.emit_event(GameEvent::simple(GameEvent::MENU_REQUESTED));
            log::info!("level {} abandoned for the menu", self.level);
            return;
        }
        if controls.restart {
            ctx.emit_event(GameEvent::new(GameEvent::RESTART, self.level as f32, 0.0, 0.0));
            self.start_level(ctx);
            return;
        }

        if controls.dismiss {
            self.hint = None;
        }
        if let Some(hint) = self.hint.as_mut() {
            hint.reveal();
        }

        let Some(world) = self.world.as_mut() else {
            return;
        };
        match world.update(controls, ctx) {
            WorldStatus::Complete => {
                log::info!("level {} complete", self.level);
                ctx.emit_event(GameEvent::new(GameEvent::LEVEL_COMPLETE, self.level as f32, 0.0, 0.0));
                self.level = self.next_level();
                self.start_level(ctx);
            }
            WorldStatus::PlayerLost => self.start_level(ctx),
            WorldStatus::Playing | WorldStatus::Swapping | WorldStatus::Dying => {}
        }
    }
}

impl Default for SwapGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SwapGame {
    fn config(&self) -> GameConfig {
        self.config.clone()
    }

    fn init(&mut self, _ctx: &mut EngineContext) {
        log::info!("{} levels available", self.levels.count());
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.input.apply_queue(input);
        let start = input.has_custom(CUSTOM_START);
        let controls = self.input.controls(&self.bindings);

        match self.mode {
            Mode::Menu => {
                if start || controls.dismiss {
                    self.mode = Mode::Playing;
                    self.start_level(ctx);
                } else if controls.menu {
                    ctx.emit_event(GameEvent::simple(GameEvent::QUIT_REQUESTED));
                }
            }
            Mode::Playing => self.play(&controls, ctx),
        }
    }

    fn render(&self, ctx: &mut RenderContext) {
        if let Some(world) = self.world.as_ref() {
            build_render_buffer(world, ctx.render_buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swap_engine::input::state::keys;
    use swap_engine::InputEvent;
    use swap_engine::LevelLayout;
    use swap_engine::LevelSource;
    use swap_engine::PatrolExtents;

    fn manifest(levels: &[&[&str]]) -> Box<LevelManifest> {
        Box::new(LevelManifest {
            levels: levels
                .iter()
                .map(|rows| LevelSource::new(rows.iter().copied().collect::<LevelLayout>(), vec![]))
                .collect(),
        })
    }

    fn step(game: &mut SwapGame, ctx: &mut EngineContext, events: &[InputEvent]) {
        let queue: InputQueue = events.iter().copied().collect();
        game.update(ctx, &queue);
    }

    fn tap(game: &mut SwapGame, ctx: &mut EngineContext, key_code: u32) {
        step(game, ctx, &[InputEvent::KeyDown { key_code }]);
        step(game, ctx, &[InputEvent::KeyUp { key_code }]);
    }

    fn status(game: &SwapGame) -> Option<WorldStatus> {
        game.world().map(World::status)
    }

    /// Step with no input until the world reports `wanted`.
    fn run_until(game: &mut SwapGame, ctx: &mut EngineContext, wanted: WorldStatus) {
        let mut ticks = 0;
        while status(game) != Some(wanted) {
            step(game, ctx, &[]);
            ticks += 1;
            assert!(ticks < 60, "world never reached {wanted:?}");
        }
    }

    fn assert_back_in_menu(game: &SwapGame, ctx: &EngineContext) {
        assert_eq!(game.mode(), Mode::Menu);
        assert!(game.world().is_none());
        assert_eq!(kinds(ctx, GameEvent::MENU_REQUESTED).len(), 1);
    }

    fn kinds(ctx: &EngineContext, kind: f32) -> Vec<f32> {
        ctx.events.iter().filter(|e| e.kind == kind).map(|e| e.a).collect()
    }

    #[test]
    fn bundled_levels_parse() {
        let game = SwapGame::new();
        assert_eq!(game.levels.count(), 3);
        assert_eq!(game.mode(), Mode::Menu);
        assert!(game.world().is_none());
    }

    #[test]
    fn menu_starts_on_s_and_quits_on_escape() {
        let mut game = SwapGame::new();
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::ESCAPE);
        assert_eq!(kinds(&ctx, GameEvent::QUIT_REQUESTED).len(), 1);
        assert_eq!(game.mode(), Mode::Menu);

        tap(&mut game, &mut ctx, keys::S);
        assert_eq!(game.mode(), Mode::Playing);
        assert!(game.world().is_some());
        assert_eq!(kinds(&ctx, GameEvent::LEVEL_STARTED), vec![1.0]);
    }

    #[test]
    fn host_can_start_play() {
        let mut game = SwapGame::new();
        let mut ctx = EngineContext::new();
        step(
            &mut game,
            &mut ctx,
            &[InputEvent::Custom { kind: CUSTOM_START, a: 0.0, b: 0.0, c: 0.0 }],
        );
        assert_eq!(game.mode(), Mode::Playing);
    }

    #[test]
    fn escape_during_play_returns_to_menu() {
        let mut game = SwapGame::new();
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::S);
        tap(&mut game, &mut ctx, keys::ESCAPE);
        assert_eq!(game.mode(), Mode::Menu);
        assert!(game.world().is_none());
        assert_eq!(kinds(&ctx, GameEvent::MENU_REQUESTED).len(), 1);
        assert!(kinds(&ctx, GameEvent::QUIT_REQUESTED).is_empty());
    }

    #[test]
    fn hint_reveals_and_dismisses() {
        let mut game = SwapGame::new();
        let mut ctx = EngineContext::new();
        // Starting consumes the S press; the release tick reveals one char.
        tap(&mut game, &mut ctx, keys::S);
        let hint = game.hint().unwrap();
        assert_eq!(hint.visible(), "I");

        for _ in 0..3 {
            step(&mut game, &mut ctx, &[]);
        }
        assert_eq!(game.hint().unwrap().visible(), "I ca");

        tap(&mut game, &mut ctx, keys::S);
        assert!(game.hint().is_none());
    }

    #[test]
    fn hint_reveal_stops_at_full_text() {
        let mut hint = Hint::for_level(6).unwrap();
        for _ in 0..200 {
            hint.reveal();
        }
        assert_eq!(hint.visible(), hint.text());
        assert!(Hint::for_level(2).is_none());
    }

    #[test]
    fn restart_rebuilds_level() {
        let mut game = SwapGame::with_levels(manifest(&[&["Q", "2"]]));
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::S);
        step(&mut game, &mut ctx, &[InputEvent::KeyDown { key_code: keys::D }]);
        for _ in 0..5 {
            step(&mut game, &mut ctx, &[]);
        }
        let moved = game.world().unwrap().player.as_ref().unwrap().center();
        assert!(moved.x > 20.0);

        step(
            &mut game,
            &mut ctx,
            &[InputEvent::KeyUp { key_code: keys::D }, InputEvent::KeyDown { key_code: keys::R }],
        );
        let world = game.world().unwrap();
        assert_eq!(world.player.as_ref().unwrap().center(), world.entrance);
        assert_eq!(kinds(&ctx, GameEvent::RESTART), vec![1.0]);
    }

    #[test]
    fn exits_advance_and_wrap() {
        let level = ["Q E", "222"];
        let mut game = SwapGame::with_levels(manifest(&[&level, &level]));
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::S);
        step(&mut game, &mut ctx, &[InputEvent::KeyDown { key_code: keys::D }]);

        let mut ticks = 0;
        while kinds(&ctx, GameEvent::LEVEL_COMPLETE).len() < 2 {
            step(&mut game, &mut ctx, &[]);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert_eq!(kinds(&ctx, GameEvent::LEVEL_COMPLETE), vec![1.0, 2.0]);
        assert_eq!(kinds(&ctx, GameEvent::LEVEL_STARTED), vec![1.0, 2.0, 1.0]);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn losing_the_player_restarts_same_level() {
        let mut game = SwapGame::with_levels(manifest(&[&["", "  Q"], &["Q", "2"]]));
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::S);
        let mut ticks = 0;
        while kinds(&ctx, GameEvent::LEVEL_STARTED).len() < 2 {
            step(&mut game, &mut ctx, &[]);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert_eq!(kinds(&ctx, GameEvent::LEVEL_STARTED), vec![1.0, 1.0]);
        assert_eq!(kinds(&ctx, GameEvent::PLAYER_DIED).len(), 1);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn missing_level_files_leave_no_world() {
        let mut game = SwapGame::from_dir("/nonexistent/swap-levels");
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::S);
        assert_eq!(game.mode(), Mode::Playing);
        assert!(game.world().is_none());
        step(&mut game, &mut ctx, &[]);
    }

    #[test]
    fn manifest_reload_restarts_at_level_one() {
        let mut game = SwapGame::new();
        let mut ctx = EngineContext::new();
        assert!(game.load_manifest("not json", &mut ctx).is_err());

        tap(&mut game, &mut ctx, keys::S);
        game.load_manifest(r#"{ "levels": [ { "layout": ["Q", "2"] } ] }"#, &mut ctx)
            .unwrap();
        assert_eq!(game.levels.count(), 1);
        assert_eq!(game.level(), 1);
        assert_eq!(kinds(&ctx, GameEvent::LEVEL_STARTED), vec![1.0, 1.0]);
    }

    #[test]
    fn escape_during_swap_returns_to_menu() {
        let mut game = SwapGame::with_levels(manifest(&[&["Q    S", "222222"]]));
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::S);

        // Level with the player's top edge, straight right.
        step(&mut game, &mut ctx, &[InputEvent::PointerDown { x: 800.0, y: 0.0 }]);
        step(&mut game, &mut ctx, &[InputEvent::PointerUp { x: 800.0, y: 0.0 }]);
        run_until(&mut game, &mut ctx, WorldStatus::Swapping);

        step(&mut game, &mut ctx, &[InputEvent::KeyDown { key_code: keys::ESCAPE }]);
        assert_back_in_menu(&game, &ctx);
    }

    #[test]
    fn escape_during_death_returns_to_menu() {
        let layout: LevelLayout = ["V Q", "222"].into_iter().collect();
        let level = LevelSource::new(layout, vec![PatrolExtents::new(0.0, 100.0)]);
        let mut game = SwapGame::with_levels(Box::new(LevelManifest { levels: vec![level] }));
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::S);
        run_until(&mut game, &mut ctx, WorldStatus::Dying);

        step(&mut game, &mut ctx, &[InputEvent::KeyDown { key_code: keys::ESCAPE }]);
        assert_back_in_menu(&game, &ctx);
        assert!(kinds(&ctx, GameEvent::PLAYER_DIED).is_empty());
    }

    #[test]
    fn tap_inside_one_tick_restarts() {
        let mut game = SwapGame::with_levels(manifest(&[&["Q", "2"]]));
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::S);
        step(
            &mut game,
            &mut ctx,
            &[InputEvent::KeyDown { key_code: keys::R }, InputEvent::KeyUp { key_code: keys::R }],
        );
        assert_eq!(kinds(&ctx, GameEvent::RESTART), vec![1.0]);

        step(&mut game, &mut ctx, &[]);
        assert_eq!(kinds(&ctx, GameEvent::RESTART).len(), 1);
    }

    #[test]
    fn released_input_stops_walking() {
        let mut game = SwapGame::with_levels(manifest(&[&["Q", "2"]]));
        let mut ctx = EngineContext::new();
        tap(&mut game, &mut ctx, keys::S);
        step(&mut game, &mut ctx, &[InputEvent::KeyDown { key_code: keys::D }]);
        let walked = game.world().unwrap().player.as_ref().unwrap().center().x;

        game.release_input();
        step(&mut game, &mut ctx, &[]);
        let player = game.world().unwrap().player.as_ref().unwrap();
        assert_eq!(player.center().x, walked);
        assert_eq!(player.velocity_x, 0.0);
    }

    #[test]
    fn invalid_config_is_not_adopted() {
        let mut tiny = GameConfig::default();
        tiny.tile_size = 8.0;
        let game = SwapGame::new().with_config(tiny);
        assert_eq!(game.config().tile_size, 40.0);

        let mut big = GameConfig::default();
        big.tile_size = 50.0;
        let game = SwapGame::new().with_config(big);
        assert_eq!(game.config().tile_size, 50.0);
    }
}
