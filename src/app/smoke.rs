//! Link smoke test: touches the threading, archive and (optionally) GUI and
//! network libraries, prints a fixed line and exits.

use crate::utils::error::Result;
use std::io::{Seek, Write};
use zip::ZipWriter;

pub const BANNER: &str = "DLLDeployer!";
pub const REQUESTED_THREADS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmokeVariant {
    Headless,
    Gui,
    GuiNetwork,
}

impl SmokeVariant {
    /// Variant selected by the enabled cargo features.
    pub fn current() -> Self {
        if cfg!(feature = "gui-network") {
            SmokeVariant::GuiNetwork
        } else if cfg!(feature = "gui") {
            SmokeVariant::Gui
        } else {
            SmokeVariant::Headless
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SmokeVariant::Headless => "headless",
            SmokeVariant::Gui => "gui",
            SmokeVariant::GuiNetwork => "gui-network",
        }
    }
}

/// Asks the global rayon pool for `threads` workers. A pool that is already
/// running keeps its size.
pub fn request_thread_count(threads: usize) {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        Ok(()) => tracing::debug!("Global thread pool configured with {} threads", threads),
        Err(e) => tracing::debug!("Global thread pool left unchanged: {}", e),
    }
}

/// Finishes an archive writer. `None` is accepted and does nothing.
pub fn close_archive<W: Write + Seek>(archive: Option<ZipWriter<W>>) -> Result<Option<W>> {
    match archive {
        Some(writer) => Ok(Some(writer.finish()?)),
        None => Ok(None),
    }
}

pub fn write_banner<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", BANNER)?;
    out.flush()?;
    Ok(())
}

/// The steps every variant runs after the optional GUI setup.
pub fn run_common<W: Write>(out: &mut W) -> Result<()> {
    request_thread_count(REQUESTED_THREADS);
    close_archive::<std::fs::File>(None)?;
    write_banner(out)
}

/// Runs the smoke test and returns the process exit code.
///
/// Headless builds return 0 right after printing. GUI builds forward `args`
/// to the toolkit, show an empty window before printing and then return
/// whatever the event loop returns.
pub fn run(args: Vec<String>) -> Result<i32> {
    let variant = SmokeVariant::current();
    tracing::debug!("Running {} smoke test", variant.name());

    #[cfg(feature = "gui")]
    {
        let app = crate::app::gui::Application::new(args)?;
        run_common(&mut std::io::stdout().lock())?;
        app.exec()
    }

    #[cfg(not(feature = "gui"))]
    {
        tracing::debug!("Ignoring {} process arguments", args.len());
        run_common(&mut std::io::stdout().lock())?;
        Ok(0)
    }
}
