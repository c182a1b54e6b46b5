use crate::utils::error::{DeployError, Result};
use sdl3::event::Event;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

fn gui_error<E: std::fmt::Display>(e: E) -> DeployError {
    DeployError::GuiError {
        message: e.to_string(),
    }
}

/// Toolkit context plus one empty top-level window.
pub struct Application {
    args: Vec<String>,
    sdl: sdl3::Sdl,
    _video: sdl3::VideoSubsystem,
    _window: sdl3::video::Window,
    #[cfg(feature = "gui-network")]
    _network: reqwest::Client,
}

impl Application {
    pub fn new(args: Vec<String>) -> Result<Self> {
        let sdl = sdl3::init().map_err(gui_error)?;
        let video = sdl.video().map_err(gui_error)?;

        let title = args
            .first()
            .and_then(|program| std::path::Path::new(program).file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| super::smoke::BANNER.to_string());

        let mut window = video
            .window(&title, WINDOW_WIDTH, WINDOW_HEIGHT)
            .position_centered()
            .build()
            .map_err(gui_error)?;
        window.show();
        tracing::debug!("Window \"{}\" shown", title);

        #[cfg(feature = "gui-network")]
        let network = {
            tracing::debug!("Creating network client");
            reqwest::Client::new()
        };

        Ok(Self {
            args,
            sdl,
            _video: video,
            _window: window,
            #[cfg(feature = "gui-network")]
            _network: network,
        })
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Blocks until the user closes the window; returns the exit code.
    pub fn exec(self) -> Result<i32> {
        let mut event_pump = self.sdl.event_pump().map_err(gui_error)?;
        tracing::debug!("Entering event loop with {} arguments", self.args().len());

        loop {
            if let Event::Quit { .. } = event_pump.wait_event() {
                return Ok(0);
            }
        }
    }
}
