use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{env, num::NonZeroU32, path::PathBuf};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

use mynecraft::{
    config::AppConfig,
    player::input::MovementInput,
    render::{
        atlas::TextureAtlas,
        camera::Camera,
        device::{GlDevice, PixelFormat, PixelType, RenderContext},
        pipeline::RenderPipeline,
        shaders::{default_shaders, ShaderProgram},
        texture::Texture2D,
    },
    utils::timing::FramePacer,
    APP_VERSION,
};

/// Owns the window, the GL context and everything drawn into it.
///
/// `pipeline` is declared first so its GPU resources are released while the
/// context is still alive.
struct App {
    pipeline: Option<RenderPipeline>,
    ctx: RenderContext,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    camera: Camera,
    input: MovementInput,
    pacer: FramePacer,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: &AppConfig, event_loop: &EventLoop<()>) -> Result<Self> {
        let window_config = &config.window;
        let window_builder = WindowBuilder::new()
            .with_title(&window_config.title)
            .with_resizable(window_config.resizable)
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height));

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("glutin offers at least one config")
            })
            .map_err(|e| anyhow!("Failed to create window: {e}"))?;
        let window = window.context("Failed to create window")?;

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));

        let gl_display = gl_config.display();
        let gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .context("Failed to create OpenGL context")?
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .context("Failed to create GL surface")?
        };

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        if window_config.vsync {
            if let Err(e) = gl_surface
                .set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("Could not enable vsync: {e}");
            }
        }

        let ctx = RenderContext::new(GlDevice::load(|symbol| {
            gl_display.get_proc_address(symbol) as *const _
        }));

        let device_info = ctx.info();
        info!("Mynecraft version: {}", APP_VERSION);
        info!("Renderer: {}", device_info.renderer);
        info!("OpenGL version supported: {}", device_info.version);

        let size = window.inner_size();
        ctx.set_viewport(size.width, size.height);
        ctx.clear(config.render.clear_color);
        gl_surface
            .swap_buffers(&gl_context)
            .context("Failed to present first frame")?;

        let pipeline = Self::build_pipeline(config, &ctx)?;

        let [x, y, z] = config.gameplay.start_position;
        let mut camera = Camera::new(size.width, size.height, Vec3::new(x, y, z));
        camera.speed = config.gameplay.move_speed;
        camera.aspect_mode = config.render.aspect_mode;

        Ok(Self {
            pipeline: Some(pipeline),
            ctx,
            gl_surface,
            gl_context,
            window,
            camera,
            input: MovementInput::default(),
            pacer: FramePacer::new(config.render.target_fps),
            failure: None,
        })
    }

    fn build_pipeline(config: &AppConfig, ctx: &RenderContext) -> Result<RenderPipeline> {
        let assets = &config.assets;
        let strict = config.render.strict_shaders;

        let program = match (&assets.vertex_shader, &assets.fragment_shader) {
            (Some(vertex), Some(fragment)) => {
                ShaderProgram::from_files(ctx, vertex, fragment, strict)
                    .context("Failed to build shader program")?
            }
            (None, None) if strict => ShaderProgram::compile(
                ctx,
                default_shaders::VERTEX_SRC,
                default_shaders::FRAGMENT_SRC,
            )
            .context("Built-in shaders failed to compile")?,
            (None, None) => ShaderProgram::compile_permissive(
                ctx,
                default_shaders::VERTEX_SRC,
                default_shaders::FRAGMENT_SRC,
            ),
            _ => {
                return Err(anyhow!(
                    "vertex_shader and fragment_shader must be set together"
                ))
            }
        };

        let atlas = TextureAtlas::new(assets.atlas_columns, assets.atlas_rows);
        let [column, row] = assets.atlas_tile;
        let uv = atlas
            .tile(column, row)
            .with_context(|| format!("Atlas tile [{column}, {row}] does not exist"))?;
        let mesh = config.render.scene.mesh(uv);

        let mut pipeline = RenderPipeline::new(ctx, program, &mesh, config.render.clone());

        let texture = Texture2D::load(
            ctx,
            &assets.texture,
            assets.texture_unit,
            PixelFormat::Rgba,
            PixelType::UnsignedByte,
        )
        .context("Failed to load texture")?;
        pipeline.set_texture(texture)?;

        Ok(pipeline)
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<()>) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(elwt),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::Focused(false) => self.input.reset(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape {
                    self.shutdown(elwt);
                } else {
                    self.input.handle_key(key, state == ElementState::Pressed);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    error!("Frame failed: {:#}", e);
                    self.failure = Some(e);
                    self.shutdown(elwt);
                }
            }
            _ => {}
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, width, height);
        self.ctx.set_viewport(size.width, size.height);
        self.camera.set_viewport(size.width, size.height);
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(pipeline) = &self.pipeline else {
            return Ok(());
        };

        self.pacer.begin_frame();
        self.camera.apply_input(&self.input);
        pipeline.draw_frame(&self.camera)?;
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("Failed to swap buffers")?;
        self.pacer.end_frame();
        Ok(())
    }

    fn shutdown(&mut self, elwt: &EventLoopWindowTarget<()>) {
        if self.pipeline.take().is_some() {
            info!("Shutting down after {:.1}s", self.pacer.elapsed());
        }
        elwt.exit();
    }
}

fn main() -> Result<()> {
    let config_path = env::args_os().nth(1).map(PathBuf::from);
    let (config, config_source) =
        AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    SimpleLogger::new()
        .with_level(config.level_filter()?)
        .init()?;
    match &config_source {
        Some(path) => info!("Loaded configuration from {:?}", path),
        None => info!("Using default configuration"),
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(&config, &event_loop)?;

    event_loop.run(|event, elwt| match event {
        Event::WindowEvent { event, .. } => app.handle_window_event(event, elwt),
        Event::AboutToWait => app.window.request_redraw(),
        _ => (),
    })?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
