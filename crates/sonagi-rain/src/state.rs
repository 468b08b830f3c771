//! Rain animation state and the per-frame update order.

use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Frame, widgets::Paragraph};
use sonagi_audio::LevelSource;
use sonagi_core::RainConfig;

use crate::animations::debris::Debris;
use crate::animations::shockwave::Shockwave;
use crate::animations::stream::{Stream, init_streams};
use crate::canvas::Canvas;
use crate::color::flash_weight;

/// Everything that moves on screen, plus the surface it is drawn on.
#[derive(Debug)]
pub struct RainState {
    config: RainConfig,
    canvas: Canvas,
    streams: Vec<Stream>,
    shockwaves: Vec<Shockwave>,
    debris: Debris,
    rng: StdRng,
    /// Frames ticked so far; 1 during the first frame.
    frame_count: u64,
    /// Smoothed audio level of the current frame.
    audio_level: f32,
}

impl RainState {
    /// Create the rain for a `cols` by `rows` terminal.
    pub fn new(config: RainConfig, cols: u16, rows: u16, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let canvas = Canvas::new(cols, rows, config.cell);
        let streams = init_streams(canvas.width(), &config, &mut rng);
        tracing::debug!(cols, rows, streams = streams.len(), seed, "rain initialized");

        Self {
            config,
            canvas,
            streams,
            shockwaves: Vec::new(),
            debris: Debris::default(),
            rng,
            frame_count: 0,
            audio_level: 0.0,
        }
    }

    /// Advance and draw one frame.
    ///
    /// Order: fade, audio, shockwaves, particles and flying characters,
    /// streams, shockwave outlines.
    pub fn tick(&mut self, audio: &mut dyn LevelSource) {
        self.frame_count += 1;
        self.canvas.fade(self.config.background_alpha);
        let flash = self.update_audio(audio);
        self.update_shockwaves();
        self.update_debris();
        self.render_streams(flash);
        self.render_outlines();
    }

    /// Poll the audio level and return this frame's flash weight.
    ///
    /// While audio reactivity is off the level is forced to zero and the
    /// source is reset.
    pub fn update_audio(&mut self, audio: &mut dyn LevelSource) -> Option<f32> {
        if self.config.audio.enabled {
            self.audio_level = audio.poll_level();
        } else {
            audio.reset();
            self.audio_level = 0.0;
        }
        flash_weight(self.audio_level, &self.config.audio)
    }

    /// Grow every shockwave, apply it to every symbol and drop finished ones.
    ///
    /// Returns how many symbols were struck this frame.
    pub fn update_shockwaves(&mut self) -> usize {
        let mut struck = 0;
        for i in (0..self.shockwaves.len()).rev() {
            self.shockwaves[i].update(&self.config.shockwave);
            let wave = self.shockwaves[i];

            for symbol in self.streams.iter_mut().flat_map(|s| s.symbols.iter_mut()) {
                if wave.apply(symbol, &self.config, &mut self.debris, &mut self.rng) {
                    struck += 1;
                }
            }

            if wave.is_finished(&self.config.shockwave) {
                tracing::trace!(x = wave.x, y = wave.y, "shockwave finished");
                self.shockwaves.swap_remove(i);
            }
        }
        struck
    }

    /// Advance, draw and cull particles and flying characters.
    pub fn update_debris(&mut self) {
        self.debris.update(&mut self.canvas, &self.config);
    }

    /// Draw every stream, then let it fall.
    pub fn render_streams(&mut self, flash: Option<f32>) {
        for stream in &mut self.streams {
            stream.render(
                &mut self.canvas,
                &self.config,
                flash,
                self.frame_count,
                &mut self.rng,
            );
        }
    }

    /// Draw shockwave rings, when enabled.
    pub fn render_outlines(&mut self) {
        if !self.config.shockwave.show_circle {
            return;
        }
        for wave in &self.shockwaves {
            wave.render(&mut self.canvas, &self.config.shockwave);
        }
    }

    /// Render the canvas to the frame, following terminal size changes.
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.width != self.canvas.cols() || area.height != self.canvas.rows() {
            self.resize(area.width, area.height);
        }
        frame.render_widget(Paragraph::new(self.canvas.lines()), area);
    }

    /// Start a shockwave at a surface pixel position.
    pub fn spawn_shockwave(&mut self, x: f32, y: f32) {
        tracing::debug!(x, y, "shockwave spawned");
        self.shockwaves.push(Shockwave::new(x, y));
    }

    /// Start a shockwave at the center of a terminal cell.
    pub fn click(&mut self, col: u16, row: u16) {
        let (x, y) = self.canvas.cell_center(col, row);
        self.spawn_shockwave(x, y);
    }

    /// Flip audio reactivity and return the new setting.
    pub fn toggle_audio(&mut self) -> bool {
        self.config.audio.enabled = !self.config.audio.enabled;
        tracing::info!(enabled = self.config.audio.enabled, "audio reactivity toggled");
        self.config.audio.enabled
    }

    /// Resize the canvas.
    ///
    /// Existing streams keep their columns; symbols left below a shorter
    /// surface wrap to the top, and slots uncovered by a wider terminal get
    /// new streams.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols == self.canvas.cols() && rows == self.canvas.rows() {
            return;
        }
        self.canvas.resize(cols, rows);

        let height = self.canvas.height();
        for symbol in self.streams.iter_mut().flat_map(|s| s.symbols.iter_mut()) {
            symbol.wrap(height, &mut self.rng);
        }

        let slots = (self.canvas.width() / self.config.symbol_size).floor().max(0.0) as usize;
        for i in self.streams.len()..slots {
            let x = i as f32 * self.config.symbol_size;
            self.streams.push(Stream::new(x, &self.config, &mut self.rng));
        }
        tracing::debug!(cols, rows, streams = self.streams.len(), "canvas resized");
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Mutable access to the streams, for placing symbols by hand.
    pub fn streams_mut(&mut self) -> &mut [Stream] {
        &mut self.streams
    }

    pub fn shockwaves(&self) -> &[Shockwave] {
        &self.shockwaves
    }

    pub fn debris(&self) -> &Debris {
        &self.debris
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn audio_level(&self) -> f32 {
        self.audio_level
    }

    pub fn audio_enabled(&self) -> bool {
        self.config.audio.enabled
    }
}
