//! Vitrine - inspector host
//!
//! Runs the inspector against a logging renderer, either headless at a fixed
//! 60 Hz or inside a window (`--window`) that feeds it real input.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use vitrine::core::{camera::Camera, input::InputState, logging, Error, Result};
use vitrine::inspector::{
    ContextPreset, FrameRenderer, Inspector, InspectorConfig, RenderTarget, WipeMask, WipeUniform,
};
use vitrine::remote::RemoteBridge;
use vitrine::scene::{DrawItem, ModelLoader, DEMO_KEY};
use vitrine_remote::ServerConfig;

const FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Renderer stand-in that records what each frame would draw
#[derive(Default)]
struct LogRenderer {
    context: String,
    passes: u64,
    composites: u64,
}

impl FrameRenderer for LogRenderer {
    fn apply_context(&mut self, preset: &ContextPreset) {
        if self.context != preset.name {
            log::debug!("Context -> {} (exposure {:.2})", preset.name, preset.exposure);
            self.context = preset.name.clone();
        }
    }

    fn render_scene(&mut self, target: RenderTarget, items: &[DrawItem], _camera: &Camera) {
        self.passes += 1;
        log::trace!("{:?}: {} draw items", target, items.len());
    }

    fn composite(&mut self, mask: &WipeMask) {
        self.composites += 1;
        let uniform = WipeUniform::from(mask);
        log::trace!(
            "Composite {} at {:.3}: uniform {:02x?}",
            mask.direction,
            mask.progress,
            bytemuck::bytes_of(&uniform)
        );
    }
}

/// Parsed command line
struct Options {
    config: Option<PathBuf>,
    models: PathBuf,
    model: String,
    port: u16,
    max_clients: usize,
    remote: bool,
    window: bool,
    frames: Option<u64>,
}

impl Options {
    fn parse(args: &[String]) -> Self {
        let value = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1))
                .cloned()
        };
        Self {
            config: value("--config").map(PathBuf::from),
            models: value("--models")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets/models")),
            model: value("--model").unwrap_or_else(|| DEMO_KEY.to_string()),
            port: value("--port")
                .and_then(|p| p.parse().ok())
                .unwrap_or(vitrine_remote::DEFAULT_PORT),
            max_clients: value("--max-clients")
                .and_then(|n| n.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().max_connections),
            remote: !args.iter().any(|a| a == "--no-remote"),
            window: args.iter().any(|a| a == "--window"),
            frames: value("--frames").and_then(|f| f.parse().ok()),
        }
    }
}

/// One frame: remote input, update, draw, publish.
fn tick(
    inspector: &mut Inspector,
    renderer: &mut LogRenderer,
    mut remote: Option<&mut RemoteBridge>,
) {
    if let Some(bridge) = remote.as_deref_mut() {
        bridge.apply_pending(inspector);
    }
    inspector.update();
    inspector.render(renderer);
    if let Some(bridge) = remote {
        bridge.publish(inspector);
    }
    if inspector.frame() % 600 == 0 {
        log::info!(
            "Frame {}: {} passes, {} composites, view {}",
            inspector.frame(),
            renderer.passes,
            renderer.composites,
            inspector.camera().view_name()
        );
    }
}

fn run_headless(mut inspector: Inspector, mut remote: Option<RemoteBridge>, frames: Option<u64>) {
    let mut renderer = LogRenderer::default();
    loop {
        let start = Instant::now();
        tick(&mut inspector, &mut renderer, remote.as_mut());
        if frames.is_some_and(|n| inspector.frame() >= n) {
            break;
        }
        std::thread::sleep(FRAME_TIME.saturating_sub(start.elapsed()));
    }
    log::info!("Stopped after {} frames", inspector.frame());
}

/// Windowed host
struct App {
    window: Option<Arc<Window>>,
    inspector: Inspector,
    input: InputState,
    renderer: LogRenderer,
    remote: Option<RemoteBridge>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title("Vitrine")
            .with_inner_size(LogicalSize::new(1280, 720));
        match event_loop.create_window(attributes) {
            Ok(window) => {
                let size = window.inner_size();
                self.inspector.resize(size.width as f32, size.height as f32);
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.inspector.resize(size.width as f32, size.height as f32);
            }
            WindowEvent::RedrawRequested => {
                tick(&mut self.inspector, &mut self.renderer, self.remote.as_mut());
            }
            other => {
                if let Some(input) = self.input.process_event(&other) {
                    self.inspector.handle_input(input);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let options = Options::parse(args);

    let config = match &options.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            InspectorConfig::from_file(path)?
        }
        None => InspectorConfig::default(),
    };

    let loader = ModelLoader::new(&options.models)?;
    let mut inspector = Inspector::new(config, Some(loader))?;
    inspector.request_model(options.model.clone())?;
    log::info!("Requested model '{}'", options.model);

    let remote = if options.remote {
        Some(RemoteBridge::start(ServerConfig {
            port: options.port,
            max_connections: options.max_clients,
        })?)
    } else {
        None
    };

    if options.window {
        let event_loop =
            EventLoop::new().map_err(|e| Error::Runtime(format!("event loop: {}", e)))?;
        let mut app = App {
            window: None,
            inspector,
            input: InputState::new(),
            renderer: LogRenderer::default(),
            remote,
        };
        event_loop
            .run_app(&mut app)
            .map_err(|e| Error::Runtime(format!("event loop: {}", e)))?;
    } else {
        run_headless(inspector, remote, options.frames);
    }
    Ok(())
}

fn main() {
    logging::init();
    log::info!("Vitrine starting...");

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
