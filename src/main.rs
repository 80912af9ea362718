//! Bounce Lab entry point
//!
//! Browser builds open the canvas and run the animation on
//! `requestAnimationFrame`; native builds run the same scene headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use bounce_lab::consts::*;
    use bounce_lab::renderer::{RenderState, scene_vertices};
    use bounce_lab::resources::{SpriteImage, fetch_sprite};
    use bounce_lab::settings::Settings;
    use bounce_lab::sim::{FixedStep, FrameInput, Key, Scene, setup_scene, tick};

    /// Game instance holding all state
    struct Game {
        scene: Scene,
        render_state: Option<RenderState>,
        clock: FixedStep,
        last_time: f64,
        input: FrameInput,
        /// Canvas CSS pixels per scene unit
        canvas_scale: (f32, f32),
    }

    impl Game {
        fn new(scene: Scene) -> Self {
            Self {
                scene,
                render_state: None,
                clock: FixedStep::default(),
                last_time: 0.0,
                input: FrameInput::default(),
                canvas_scale: (1.0, 1.0),
            }
        }

        fn set_canvas_size(&mut self, w: f32, h: f32) {
            if w <= 0.0 || h <= 0.0 {
                return;
            }
            self.canvas_scale = (w / self.scene.size.x, h / self.scene.size.y);
        }

        /// Convert a canvas offset to scene coordinates
        fn to_scene(&self, x: f32, y: f32) -> glam::Vec2 {
            glam::Vec2::new(x / self.canvas_scale.0, y / self.canvas_scale.1)
        }

        /// Run simulation steps owed since the last frame
        fn update(&mut self, dt: f32) {
            let steps = self.clock.advance(dt);
            for _ in 0..steps {
                tick(&mut self.scene, &mut self.input, self.clock.step());
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = scene_vertices(&self.scene);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("{} starting...", TITLE);

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        document.set_title(TITLE);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Fixed-size stage
        let dpr = window.device_pixel_ratio();
        let width = (SIZE as f64 * dpr) as u32;
        let height = (SIZE as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        log::info!("Variant: {}", settings.variant().as_str());
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let (sprite, sprite_size) = match fetch_sprite(&settings.bouncer_image).await {
            Ok(sprite) => {
                let size = sprite.size();
                (sprite, Ok(size))
            }
            Err(err) => (SpriteImage::blank(), Err(err)),
        };

        let scene = match setup_scene(&settings.spawn, sprite_size, seed) {
            Ok(scene) => scene,
            Err(err) => {
                log::error!("Setup failed: {}", err);
                return;
            }
        };

        let game = Rc::new(RefCell::new(Game::new(scene)));
        game.borrow_mut()
            .set_canvas_size(canvas.client_width() as f32, canvas.client_height() as f32);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, &sprite).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("{} running!", TITLE);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click - grow the grower
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let w = canvas_clone.client_width() as f32;
                let h = canvas_clone.client_height() as f32;
                g.set_canvas_size(w, h);
                let point = g.to_scene(event.offset_x() as f32, event.offset_y() as f32);
                g.input.push_click(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard - move the mover
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_dom_key(&event.key());
                if key != Key::Other {
                    // Keep arrow keys from scrolling the page
                    event.prevent_default();
                    game.borrow_mut().input.push_key(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SECOND_DELAY
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use bounce_lab::consts::*;
    use bounce_lab::resources::load_sprite;
    use bounce_lab::settings::Settings;
    use bounce_lab::sim::{FrameInput, Key, SetupError, setup_scene, tick};

    /// How long the headless run lasts
    const HEADLESS_SECONDS: u64 = 10;

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Run the scene without a window, feeding a little scripted input
    pub fn run() -> Result<(), SetupError> {
        let settings = Settings::load();
        log::info!("Variant: {}", settings.variant().as_str());
        let seed = settings.seed.unwrap_or_else(clock_seed);
        let sprite_size = load_sprite(&settings.bouncer_image).map(|sprite| sprite.size());
        let mut scene = setup_scene(&settings.spawn, sprite_size, seed)?;

        let fps = FRAMES_PER_SECOND as u64;
        let mut input = FrameInput::default();
        let mut reflections = 0u64;
        let mut mover_hits = 0u64;
        let mut grower_hits = 0u64;

        for frame in 0..HEADLESS_SECONDS * fps {
            // March the mover down toward the grower, click the grower now and then
            if frame % 10 == 0 {
                input.push_key(Key::Down);
            }
            if frame % fps == 0 {
                input.push_click(scene.grower.center());
            }

            let report = tick(&mut scene, &mut input, SECOND_DELAY);
            reflections += report.reflections as u64;
            mover_hits += report.mover_hit as u64;
            grower_hits += report.grower_hit as u64;

            if (frame + 1) % fps == 0 {
                log::info!(
                    "t={}s reflections={} mover_hit_frames={} grower_hit_frames={} grower_scale={:.3}",
                    (frame + 1) / fps,
                    reflections,
                    mover_hits,
                    grower_hits,
                    scene.grower.scale.x
                );
            }
        }

        let escaped = scene.escaped_bouncers();
        if escaped > 0 {
            log::debug!("{} bouncers mid-reflection at exit", escaped);
        }
        log::info!(
            "Finished {} frames; mover at {:?}, grower scale {:?}",
            scene.time_ticks,
            scene.mover.pos,
            scene.grower.scale
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("{} (native) starting...", bounce_lab::consts::TITLE);
    log::info!("Native mode runs headless - use `trunk serve` for the windowed version");

    if let Err(err) = headless::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
