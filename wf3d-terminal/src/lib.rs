/// Interactive terminal frontend for the wireframe rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wf3d_core::{Camera, Model, Movement, Rasterizer, Vec3};

pub mod presenter;

pub use presenter::FramePresenter;

/// Units per second of camera travel while a movement key repeats
const MOVE_SPEED: f32 = 2.0;

/// Degrees of camera rotation per arrow key event
const ROTATE_STEP: f32 = 2.0;

/// Main application struct: owns the camera, rasterizer, and presenter,
/// and runs the input/render loop over the whole terminal
pub struct TerminalApp {
    model: Model,
    camera: Camera,
    rasterizer: Rasterizer,
    presenter: FramePresenter,
    running: bool,
    frame_time: f32,
    last_instant: Instant,
    fps_window_start: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Sizes the pixel buffer from the current terminal: one pixel column
    /// per cell and two pixel rows per cell (half-block presentation)
    pub fn new(model: Model) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        let width = columns.max(1) as i32;
        let height = rows.max(1) as i32 * 2;

        let camera = Camera::new(
            Vec3::new(0.0, 0.0, 5.0),
            60.0,
            width as f32 / height as f32,
            0.1,
            100.0,
        )
        .map_err(invalid_input)?;
        let rasterizer = Rasterizer::new(width, height).map_err(invalid_input)?;
        let presenter = FramePresenter::new(width as usize, height as usize).map_err(invalid_input)?;

        Ok(Self {
            model,
            camera,
            rasterizer,
            presenter,
            running: true,
            frame_time: 0.0,
            last_instant: Instant::now(),
            fps_window_start: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();
            self.frame_time = (frame_start - self.last_instant).as_secs_f32();
            self.last_instant = frame_start;

            // Handle all pending input before drawing
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            self.render()?;

            // Frame pacing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter once a second
            let now = Instant::now();
            if (now - self.fps_window_start).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.fps_window_start).as_secs_f32();
                self.frame_count = 0;
                self.fps_window_start = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            Event::Resize(columns, rows) => self.handle_resize(columns, rows)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        let distance = MOVE_SPEED * self.frame_time;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') => self.camera.move_by(Movement::Forward, distance),
            KeyCode::Char('s') => self.camera.move_by(Movement::Backward, distance),
            KeyCode::Char('a') => self.camera.move_by(Movement::Left, distance),
            KeyCode::Char('d') => self.camera.move_by(Movement::Right, distance),
            KeyCode::Char(' ') => self.camera.move_by(Movement::Up, distance),
            KeyCode::Char('z') => self.camera.move_by(Movement::Down, distance),
            KeyCode::Left => self.camera.rotate(-ROTATE_STEP, 0.0),
            KeyCode::Right => self.camera.rotate(ROTATE_STEP, 0.0),
            KeyCode::Up => self.camera.rotate(0.0, ROTATE_STEP),
            KeyCode::Down => self.camera.rotate(0.0, -ROTATE_STEP),
            _ => {}
        }
    }

    fn handle_resize(&mut self, columns: u16, rows: u16) -> io::Result<()> {
        let width = columns.max(1) as i32;
        let height = rows.max(1) as i32 * 2;

        self.rasterizer.resize(width, height).map_err(invalid_input)?;
        self.presenter
            .resize(width as usize, height as usize)
            .map_err(invalid_input)?;
        self.camera
            .set_aspect(width as f32 / height as f32)
            .map_err(invalid_input)?;
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.rasterizer.render(&self.camera, &self.model);

        let mut stdout = stdout();
        self.presenter
            .present(self.rasterizer.colorbuffer(), &mut stdout)?;

        // UI overlay on the top row
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "WF3D | {:.1} FPS | {} triangles | WASD move  arrows look  space/z up/down  q quit",
                self.fps,
                self.model.triangle_count(),
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn invalid_input(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}
