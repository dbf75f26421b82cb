/// Terminal front end for the Painter3D pipeline
use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use painter3d_core::{Camera, FrameStats, Mesh, Pipeline, Vec3, Viewport};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::info;

pub mod config;
pub mod input;
pub mod renderer;
pub mod timing;

pub use config::{AppConfig, ControlsConfig};
pub use input::InputState;
pub use renderer::Canvas;
pub use timing::FrameTimer;

/// Rows reserved above the canvas for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    meshes: Vec<Mesh>,
    camera: Camera,
    pipeline: Pipeline,
    canvas: Canvas,
    controls: ControlsConfig,
    input: InputState,
    timer: FrameTimer,
    last_stats: FrameStats,
}

impl TerminalApp {
    pub fn new(meshes: Vec<Mesh>, config: AppConfig) -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;
        let viewport = viewport_for(width, height, &config.controls);
        let pipeline = Pipeline::new(config.pipeline, viewport)?;

        Ok(Self {
            meshes,
            camera: Camera::new(Vec3::ORIGIN),
            canvas: Canvas::new(viewport.width as usize, viewport.height as usize),
            pipeline,
            controls: config.controls,
            input: InputState::default(),
            timer: FrameTimer::new(),
            last_stats: FrameStats::default(),
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        info!(meshes = self.meshes.len(), "renderer started");

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        info!("renderer stopped");

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        loop {
            let frame_start = Instant::now();

            // Drain pending events into this frame's input state
            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(key) => self.input.record(key),
                    Event::Resize(width, height) => self.resize(width, height)?,
                    _ => {}
                }
            }
            if self.input.quit {
                break;
            }

            // Update phase completes before the pipeline borrows the scene
            self.input.apply(&mut self.camera, &self.controls);

            self.render()?;

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
            self.timer.tick(Instant::now());
        }

        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) -> anyhow::Result<()> {
        let viewport = viewport_for(width, height, &self.controls);
        self.pipeline.resize(viewport)?;
        self.canvas
            .resize(viewport.width as usize, viewport.height as usize);
        execute!(stdout(), terminal::Clear(ClearType::All))?;
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.canvas.clear();
        self.last_stats = self
            .pipeline
            .render(&self.meshes, &mut self.camera, &mut self.canvas);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, STATUS_ROWS))?;
        self.canvas.draw(&mut stdout)?;

        // Status line
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Painter3D | FPS: {:.1} ({:.1} ms) | Tris: {}/{} | W/S=Move A/D=Turn Up/Down=Climb R/F=Look Q=Quit",
                self.timer.fps(),
                self.timer.ms_per_frame(),
                self.last_stats.emitted,
                self.last_stats.submitted,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn viewport_for(columns: u16, rows: u16, controls: &ControlsConfig) -> Viewport {
    let rows = rows.saturating_sub(STATUS_ROWS).max(2);
    Viewport::new(u32::from(columns.max(2)), u32::from(rows))
        .with_pixel_aspect(controls.cell_aspect)
}
