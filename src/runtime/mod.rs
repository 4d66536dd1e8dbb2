use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;

use crate::action::{ActionEffect, ActionTable};
use crate::config::{PlacementMode, TileConfig, TilesConfig, validate};
use crate::error::{ConfigError, Result, TilesError};
use crate::generator::ContentGenerator;
use crate::geometry::Size;
use crate::layout;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::EngineMetrics;
use crate::queue::FreshnessQueue;
use crate::style::{KEY_BACKGROUND, KEY_BORDER, StyleHandle, StyleTable, StyleTranslator};
use crate::surface::{KeyInput, Surface};
use crate::tile::Tile;
use crate::worker::{Payload, Worker, WorkerSettings};

pub mod driver;

/// Stops the engine.
pub const QUIT_KEY: char = 'Q';
/// Freezes and unfreezes drawing.
pub const PAUSE_KEY: char = ' ';

const LOG_TARGET: &str = "tiles::engine";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    /// Tiles are neither drained nor drawn; workers keep producing.
    Paused,
    Exiting,
}

/// Configuration knobs for the engine loop.
#[derive(Clone)]
pub struct EngineConfig {
    /// Optional structured logger shared with the workers.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<EngineMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Longest wait for a key press per frame.
    pub input_poll: Duration,
    /// How long shutdown waits for each worker before detaching it.
    pub shutdown_grace: Duration,
    /// Command check interval of paused workers.
    pub paused_poll: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "tiles::engine.metrics".to_string(),
            input_poll: Duration::from_millis(10),
            shutdown_grace: Duration::from_secs(2),
            paused_poll: Duration::from_millis(100),
        }
    }
}

impl EngineConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(EngineMetrics::new())));
        }
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<EngineMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// A generator waiting for `start` to give it a thread.
struct PendingWorker {
    generator: Box<dyn ContentGenerator>,
    settings: WorkerSettings,
}

/// Owns the surface, the tiles and their workers, and runs the frame loop.
pub struct Engine<S: Surface> {
    surface: S,
    config: EngineConfig,
    translator: StyleTranslator,
    global: StyleTable,
    mode: PlacementMode,
    tiles: Vec<Tile>,
    queues: Vec<FreshnessQueue<Payload>>,
    pending: Vec<PendingWorker>,
    workers: Vec<Worker>,
    state: EngineState,
    background: StyleHandle,
    last_size: Option<Size>,
    full_redraw: bool,
    started: bool,
    stopped: bool,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl<S: Surface> Engine<S> {
    /// Validate `tiles` and resolve every style. Nothing is drawn and no
    /// thread is spawned until [`Engine::start`].
    pub fn new(tiles: TilesConfig, mut surface: S, config: EngineConfig) -> Result<Self> {
        validate(&tiles)?;
        let mode = tiles.placement_mode();

        let mut translator = StyleTranslator::new();
        translator.register_x11_palette(&mut surface);
        let global = StyleTable::build(&tiles.style, &mut translator, &mut surface)?;

        let count = tiles.tiles.len();
        let mut built = Vec::with_capacity(count);
        let mut queues = Vec::with_capacity(count);
        let mut pending = Vec::with_capacity(count);
        for (index, TileConfig { spec, generator }) in tiles.tiles.into_iter().enumerate() {
            let local = StyleTable::build(&spec.style, &mut translator, &mut surface)?;
            let actions = ActionTable::build(&spec.action, &mut translator, &mut surface)?;
            let queue = FreshnessQueue::new();

            let label = spec
                .title
                .clone()
                .unwrap_or_else(|| format!("tile {index}"));
            let period = spec.period().ok_or_else(|| {
                ConfigError::Invalid(vec![format!("tile {index}: frequency out of range")])
            })?;
            let mut settings = WorkerSettings::new(label, period);
            settings.paused_poll = config.paused_poll;
            settings.start_paused = !spec.starts_active();

            built.push(Tile::new(
                index,
                &spec,
                global.merge(&local),
                actions,
                queue.clone(),
            ));
            queues.push(queue);
            pending.push(PendingWorker {
                generator,
                settings,
            });
        }

        let background = global.handle(KEY_BACKGROUND);
        Ok(Self {
            surface,
            config,
            translator,
            global,
            mode,
            tiles: built,
            queues,
            pending,
            workers: Vec::new(),
            state: EngineState::Running,
            background,
            last_size: None,
            full_redraw: true,
            started: false,
            stopped: false,
            start_instant: None,
            last_metrics_emit: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn placement_mode(&self) -> PlacementMode {
        self.mode
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Style handles allocated so far, the X11 palette included.
    pub fn allocated_styles(&self) -> usize {
        self.translator.allocated()
    }

    /// Spawn the workers and prepare the surface. Idempotent.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        self.ensure_metrics_initialized();
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);

        for (index, pending) in std::mem::take(&mut self.pending).into_iter().enumerate() {
            let PendingWorker {
                generator,
                mut settings,
            } = pending;
            settings.logger = self.config.logger.clone();
            settings.metrics = self.config.metrics_handle();
            let worker = Worker::spawn(index, generator, self.queues[index].clone(), settings)
                .map_err(|source| TilesError::WorkerSpawn { index, source })?;
            self.workers.push(worker);
        }

        self.surface.set_cursor_visible(false)?;
        self.surface.set_background(self.background)?;
        self.full_redraw = true;

        let size = self.surface.size()?;
        self.log(
            LogLevel::Info,
            "engine_started",
            [
                json_kv("tiles", json!(self.tiles.len())),
                json_kv("mode", json!(mode_name(self.mode))),
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
        Ok(())
    }

    /// Run one frame: drain, draw, then react to at most one key.
    pub fn step(&mut self) -> Result<EngineState> {
        self.start()?;
        if self.state == EngineState::Exiting {
            return Ok(self.state);
        }

        if self.state == EngineState::Running {
            self.drain()?;
            if self.state == EngineState::Exiting {
                return Ok(self.state);
            }
            self.refresh()?;
        }

        if let Some(key) = self.surface.poll_key(self.config.input_poll)? {
            self.handle_key(key)?;
        }

        self.with_metrics(|metrics| metrics.record_frame());
        self.maybe_emit_metrics();
        Ok(self.state)
    }

    /// Loop frames until exit, then shut down. Workers are stopped on error too.
    pub fn run(&mut self) -> Result<()> {
        let result = self.run_frames();
        self.shutdown();
        result
    }

    fn run_frames(&mut self) -> Result<()> {
        while self.step()? != EngineState::Exiting {}
        Ok(())
    }

    /// Stop every worker, wait out the grace period and close the queues.
    /// Returns the number of workers that had to be detached.
    pub fn shutdown(&mut self) -> usize {
        if self.stopped {
            return 0;
        }
        self.stopped = true;
        self.state = EngineState::Exiting;

        for worker in &mut self.workers {
            worker.stop();
        }
        let grace = self.config.shutdown_grace;
        let detached = self
            .workers
            .iter_mut()
            .map(|worker| worker.join(grace))
            .filter(|finished| !finished)
            .count();
        for queue in &self.queues {
            queue.close();
        }
        let _ = self.surface.set_cursor_visible(true);
        let _ = self.surface.flush();

        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log(
            LogLevel::Info,
            "engine_stopped",
            [
                json_kv("uptime_ms", json!(uptime_ms)),
                json_kv("detached_workers", json!(detached)),
            ],
        );
        detached
    }

    /// Take pending payloads from every tile before anything is drawn.
    fn drain(&mut self) -> Result<()> {
        let mut received = 0;
        for index in 0..self.tiles.len() {
            let before = self.tiles[index].payloads_received();
            let effect = self.tiles[index].load();
            if self.tiles[index].payloads_received() > before {
                received += 1;
            }
            if let Some(effect) = effect {
                self.apply_effect(index, effect)?;
                if self.state == EngineState::Exiting {
                    break;
                }
            }
        }
        self.with_metrics(|metrics| metrics.record_payloads(received));
        Ok(())
    }

    /// Background first, then halt, then exit.
    fn apply_effect(&mut self, index: usize, effect: ActionEffect) -> Result<()> {
        if effect.is_noop() {
            return Ok(());
        }
        self.with_metrics(|metrics| metrics.record_action());
        self.log(
            LogLevel::Info,
            "action_applied",
            [
                json_kv("tile", json!(index)),
                json_kv("background", json!(effect.background.is_some())),
                json_kv("halt", json!(effect.halt)),
                json_kv("exit", json!(effect.exit)),
            ],
        );

        if let Some(background) = effect.background {
            self.set_background(background)?;
        }
        if effect.halt && self.state == EngineState::Running {
            self.state = EngineState::Paused;
            self.log(
                LogLevel::Info,
                "paused",
                [json_kv("tile", json!(index)), json_kv("reason", json!("action"))],
            );
        }
        if effect.exit {
            self.state = EngineState::Exiting;
        }
        Ok(())
    }

    fn set_background(&mut self, background: StyleHandle) -> Result<()> {
        if background != self.background {
            self.background = background;
            self.surface.set_background(background)?;
            self.full_redraw = true;
        }
        Ok(())
    }

    /// Re-arrange on resize, then draw everything or only the dirty tiles.
    fn refresh(&mut self) -> Result<()> {
        let size = self.surface.size()?;
        if self.last_size != Some(size) {
            if self.last_size.is_some() {
                self.log(
                    LogLevel::Info,
                    "resized",
                    [
                        json_kv("width", json!(size.width)),
                        json_kv("height", json!(size.height)),
                    ],
                );
            }
            self.last_size = Some(size);
            self.arrange(size)?;
        }

        let rendered = if self.full_redraw {
            self.surface.clear()?;
            if self.has_border() {
                draw_frame(&mut self.surface, size)?;
            }
            for tile in &mut self.tiles {
                tile.render(&mut self.surface)?;
            }
            self.full_redraw = false;
            self.tiles
                .iter()
                .filter(|tile| tile.is_placed() && !tile.is_hidden())
                .count()
        } else {
            let mut count = 0;
            for tile in self.tiles.iter_mut().filter(|tile| tile.is_dirty()) {
                tile.render(&mut self.surface)?;
                count += 1;
            }
            count
        };
        self.with_metrics(|metrics| metrics.record_render(rendered));
        self.surface.flush()
    }

    /// Place visible tiles on a fresh grid in configuration order.
    fn arrange(&mut self, size: Size) -> Result<()> {
        if self.mode == PlacementMode::Auto {
            let footprints: Vec<Option<(u16, u16)>> = self
                .tiles
                .iter()
                .map(|tile| (!tile.is_hidden()).then(|| tile.footprint()))
                .collect();
            let placements = layout::arrange(size, self.inset(), &footprints)?;

            let mut unplaced = Vec::new();
            for (tile, placement) in self.tiles.iter_mut().zip(placements) {
                if tile.is_hidden() {
                    continue;
                }
                match placement {
                    Some(placement) => tile.place_at(placement.y, placement.x),
                    None => {
                        tile.unplace();
                        unplaced.push(tile.index());
                    }
                }
            }
            for index in unplaced {
                self.log(
                    LogLevel::Warn,
                    "tile_unplaced",
                    [json_kv("tile", json!(index))],
                );
            }
        }

        self.full_redraw = true;
        self.with_metrics(|metrics| metrics.record_arrangement());
        let placed = self
            .tiles
            .iter()
            .filter(|tile| tile.is_placed() && !tile.is_hidden())
            .count();
        self.log(
            LogLevel::Debug,
            "tiles_arranged",
            [
                json_kv("placed", json!(placed)),
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
        Ok(())
    }

    fn handle_key(&mut self, key: KeyInput) -> Result<()> {
        match key {
            KeyInput::Interrupt | KeyInput::Char(QUIT_KEY) => {
                self.state = EngineState::Exiting;
                self.log(
                    LogLevel::Info,
                    "exit_requested",
                    [json_kv("interrupt", json!(key == KeyInput::Interrupt))],
                );
            }
            KeyInput::Char(PAUSE_KEY) => self.toggle_pause()?,
            KeyInput::Char(ch) => {
                if let Some(index) = self
                    .tiles
                    .iter()
                    .position(|tile| tile.toggle_key() == Some(ch))
                {
                    self.toggle_tile(index)?;
                }
            }
        }
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        match self.state {
            EngineState::Paused => {
                self.state = EngineState::Running;
                self.set_background(self.global.handle(KEY_BACKGROUND))?;
                self.full_redraw = true;
                self.log(LogLevel::Info, "resumed", std::iter::empty());
            }
            EngineState::Running => {
                self.state = EngineState::Paused;
                self.log(
                    LogLevel::Info,
                    "paused",
                    [json_kv("reason", json!("key"))],
                );
            }
            EngineState::Exiting => {}
        }
        Ok(())
    }

    /// Flip a tile and its worker together, then re-arrange the rest. A paused
    /// engine drains nothing, so the tile is shown with its stashed lines.
    fn toggle_tile(&mut self, index: usize) -> Result<()> {
        if let Some(worker) = self.workers.get_mut(index) {
            worker.toggle_pause();
        }
        let effect = if self.state == EngineState::Running {
            self.tiles[index].toggle(&mut self.surface)?
        } else {
            self.tiles[index].flip(&mut self.surface)?;
            None
        };
        let hidden = self.tiles[index].is_hidden();
        self.with_metrics(|metrics| metrics.record_toggle());
        self.log(
            LogLevel::Info,
            "tile_toggled",
            [json_kv("tile", json!(index)), json_kv("hidden", json!(hidden))],
        );

        let size = self.surface.size()?;
        self.last_size = Some(size);
        self.arrange(size)?;
        if let Some(effect) = effect {
            self.apply_effect(index, effect)?;
        }
        Ok(())
    }

    fn has_border(&self) -> bool {
        self.global.flag(KEY_BORDER)
    }

    fn inset(&self) -> u16 {
        u16::from(self.has_border())
    }

    fn ensure_metrics_initialized(&mut self) {
        if self.config.metrics.is_none() && !self.config.metrics_interval.is_zero() {
            self.config.enable_metrics();
        }
    }

    fn with_metrics(&self, record: impl FnOnce(&mut EngineMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval.is_zero() {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let event = guard
                    .snapshot(uptime)
                    .to_log_event(&self.config.metrics_target);
                let _ = logger.log_event(event);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

impl<S: Surface> Drop for Engine<S> {
    fn drop(&mut self) {
        if !self.stopped {
            for worker in &mut self.workers {
                worker.stop();
            }
            for queue in &self.queues {
                queue.close();
            }
        }
    }
}

fn mode_name(mode: PlacementMode) -> &'static str {
    match mode {
        PlacementMode::Auto => "auto",
        PlacementMode::Absolute => "absolute",
    }
}

/// Screen-wide frame drawn when the global style asks for a border.
fn draw_frame<S: Surface + ?Sized>(surface: &mut S, size: Size) -> Result<()> {
    if size.width < 2 || size.height < 2 {
        return Ok(());
    }
    let inner = size.width as usize - 2;
    let none = StyleHandle::NONE;
    surface.write_clipped(0, 0, &format!("┌{}┐", "─".repeat(inner)), size.width, none)?;
    for row in 1..size.height - 1 {
        surface.write_clipped(row, 0, "│", 1, none)?;
        surface.write_clipped(row, size.width - 1, "│", 1, none)?;
    }
    let bottom = format!("└{}┘", "─".repeat(inner));
    surface.write_clipped(size.height - 1, 0, &bottom, size.width, none)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StyleSpec, TileConfig};
    use crate::generator::fixed_lines;
    use crate::logging::MemorySink;
    use crate::surface::MemorySurface;

    fn quiet() -> EngineConfig {
        EngineConfig {
            metrics_interval: Duration::ZERO,
            input_poll: Duration::ZERO,
            shutdown_grace: Duration::from_millis(500),
            ..EngineConfig::default()
        }
    }

    fn idle_tile(height: u16, width: u16) -> TileConfig {
        TileConfig::new(height, width, fixed_lines(Vec::<String>::new())).with_frequency(60.0)
    }

    #[test]
    fn invalid_configuration_is_rejected_before_start() {
        let config = TilesConfig::default().with_tile(idle_tile(0, 5));
        let err = Engine::new(config, MemorySurface::new(Size::new(10, 5)), quiet())
            .err()
            .expect("zero height must be rejected");
        assert!(matches!(err, TilesError::Config(_)));
    }

    #[test]
    fn oversized_frequency_is_an_error_not_a_panic() {
        let config = TilesConfig::default()
            .with_tile(TileConfig::new(1, 5, fixed_lines(["x"])).with_frequency(1e30));
        let err = Engine::new(config, MemorySurface::new(Size::new(10, 5)), quiet())
            .err()
            .expect("frequency beyond any Duration must be rejected");
        assert!(matches!(err, TilesError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn start_hides_cursor_and_sets_background() {
        let style = StyleSpec::new().with_background(["WHITE", "BLUE"]);
        let config = TilesConfig::new(style).with_tile(idle_tile(2, 4));
        let mut engine =
            Engine::new(config, MemorySurface::new(Size::new(10, 5)), quiet()).unwrap();
        engine.start().unwrap();
        assert!(!engine.surface().cursor_visible());
        assert!(!engine.surface().background().is_none());
        engine.shutdown();
        assert!(engine.surface().cursor_visible());
    }

    #[test]
    fn quit_key_and_interrupt_exit() {
        for key in [KeyInput::Char(QUIT_KEY), KeyInput::Interrupt] {
            let config = TilesConfig::default().with_tile(idle_tile(1, 1));
            let mut engine =
                Engine::new(config, MemorySurface::new(Size::new(4, 4)), quiet()).unwrap();
            engine.surface_mut().push_key(key);
            assert_eq!(engine.step().unwrap(), EngineState::Exiting);
            assert_eq!(engine.shutdown(), 0);
        }
    }

    #[test]
    fn lowercase_q_does_not_quit() {
        let config = TilesConfig::default().with_tile(idle_tile(1, 1));
        let mut engine = Engine::new(config, MemorySurface::new(Size::new(4, 4)), quiet()).unwrap();
        engine.surface_mut().push_char('q');
        assert_eq!(engine.step().unwrap(), EngineState::Running);
        engine.shutdown();
    }

    #[test]
    fn space_pauses_and_resume_restores_background() {
        let style = StyleSpec::new().with_background(["WHITE", "BLUE"]);
        let config = TilesConfig::new(style).with_tile(idle_tile(1, 1));
        let mut engine = Engine::new(config, MemorySurface::new(Size::new(4, 4)), quiet()).unwrap();
        engine.surface_mut().push_char(PAUSE_KEY);
        assert_eq!(engine.step().unwrap(), EngineState::Paused);
        let global = engine.surface().background();

        let recolor = ActionEffect {
            background: Some(StyleHandle::NONE),
            ..ActionEffect::default()
        };
        engine.apply_effect(0, recolor).unwrap();
        assert!(engine.surface().background().is_none());

        engine.surface_mut().push_char(PAUSE_KEY);
        assert_eq!(engine.step().unwrap(), EngineState::Running);
        assert_eq!(engine.surface().background(), global);
        engine.shutdown();
    }

    #[test]
    fn showing_a_tile_while_paused_does_not_drain_it() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let generator = move || -> crate::generator::GeneratorResult {
            let call = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(vec![format!("call {call}")])
        };
        let config = TilesConfig::default().with_tile(
            TileConfig::new(1, 10, generator)
                .with_frequency(0.005)
                .with_toggle('k', true),
        );
        let mut engine = Engine::new(config, MemorySurface::new(Size::new(10, 2)), quiet()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        while engine.tile(0).unwrap().payloads_received() == 0 {
            assert!(Instant::now() < deadline, "no payload arrived");
            engine.step().unwrap();
            std::thread::sleep(Duration::from_millis(2));
        }

        engine.surface_mut().push_char(PAUSE_KEY);
        engine.step().unwrap();
        let shown = engine.tile(0).unwrap().lines().to_vec();
        let received = engine.tile(0).unwrap().payloads_received();
        // Worker keeps publishing while the engine is paused.
        std::thread::sleep(Duration::from_millis(40));

        engine.surface_mut().push_char('k');
        engine.step().unwrap();
        assert!(engine.tile(0).unwrap().is_hidden());
        engine.surface_mut().push_char('k');
        engine.step().unwrap();
        let tile = engine.tile(0).unwrap();
        assert!(!tile.is_hidden());
        assert_eq!(tile.lines(), shown.as_slice());
        assert_eq!(tile.payloads_received(), received);
        assert_eq!(engine.state(), EngineState::Paused);
        engine.shutdown();
    }

    #[test]
    fn unplaced_tiles_are_logged() {
        let sink = MemorySink::new();
        let config = TilesConfig::default()
            .with_tile(idle_tile(4, 4))
            .with_tile(idle_tile(4, 4));
        let settings = quiet().with_logger(Logger::new(sink.clone()));
        let mut engine =
            Engine::new(config, MemorySurface::new(Size::new(4, 4)), settings).unwrap();
        engine.step().unwrap();
        assert!(engine.tile(0).unwrap().is_placed());
        assert!(!engine.tile(1).unwrap().is_placed());
        engine.shutdown();

        let messages = sink.messages();
        assert!(messages.contains(&"engine_started".to_string()));
        assert!(messages.contains(&"tile_unplaced".to_string()));
        assert!(messages.contains(&"engine_stopped".to_string()));
    }

    #[test]
    fn global_border_draws_a_frame_and_insets_tiles() {
        let style = StyleSpec::new().with_border(true);
        let config = TilesConfig::new(style).with_tile(idle_tile(2, 3));
        let mut engine = Engine::new(config, MemorySurface::new(Size::new(6, 4)), quiet()).unwrap();
        engine.step().unwrap();
        assert_eq!(engine.surface().row_text(0), "┌────┐");
        assert_eq!(engine.surface().row_text(3), "└────┘");
        let rect = engine.tile(0).unwrap().rect();
        assert_eq!((rect.y, rect.x), (1, 1));
        engine.shutdown();
    }

    #[test]
    fn absolute_mode_keeps_configured_positions() {
        let config = TilesConfig::default()
            .with_tile(idle_tile(1, 2).at(3, 5))
            .with_tile(idle_tile(1, 2).at(0, 0));
        let mut engine =
            Engine::new(config, MemorySurface::new(Size::new(10, 5)), quiet()).unwrap();
        assert_eq!(engine.placement_mode(), PlacementMode::Absolute);
        engine.step().unwrap();
        let rect = engine.tile(0).unwrap().rect();
        assert_eq!((rect.y, rect.x), (3, 5));
        engine.shutdown();
    }
}
