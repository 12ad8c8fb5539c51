use futures::task::{Spawn, SpawnExt};
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ViewerConfig;
use crate::core::animation::{AnimationDriver, AnimationTransform, Placement};
use crate::core::asset_loader::{AssetLoader, LoadEvent};
use crate::core::interaction::{Effect, InteractionMachine, InteractionState, PointerEvent};
use crate::core::timer::Countdown;
use crate::error::LoadError;
use crate::frame::FrameInfo;
use crate::loaders::AssetSource;
use crate::math::Rgb;
use crate::scenes::{generate, particles};
use crate::types::{GeometryDescription, ModelKind, ModelParameters, Shape, ShapeInstance};

/// Outbound notification, called once per click that engages the model
pub type InteractionCallback = Box<dyn FnMut(ModelKind)>;

const LABEL_HEIGHT: f32 = 2.0;
const LABEL_FONT_SIZE: f32 = 0.3;

/// Progress of the external asset for one viewer
#[derive(Debug)]
pub enum LoadState {
    NotRequested,
    Loading { progress: f32 },
    Loaded(Arc<GeometryDescription>),
    Failed { reason: LoadError },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoadState::NotRequested => "not-requested",
            LoadState::Loading { .. } => "loading",
            LoadState::Loaded(_) => "loaded",
            LoadState::Failed { .. } => "failed",
        }
    }
}

/// Geometry currently on screen, chosen once per load-state change
#[derive(Debug, Clone)]
pub enum DisplayedGeometry {
    Loaded(Arc<GeometryDescription>),
    /// Both palettes are built up front; hovering only flips between them
    Procedural {
        neutral: GeometryDescription,
        emphasized: GeometryDescription,
    },
}

impl DisplayedGeometry {
    pub fn procedural(params: &ModelParameters) -> Self {
        DisplayedGeometry::Procedural {
            neutral: generate(params, false),
            emphasized: generate(params, true),
        }
    }

    /// Loaded assets keep their own materials regardless of emphasis
    pub fn geometry(&self, emphasized: bool) -> &GeometryDescription {
        match self {
            DisplayedGeometry::Loaded(geometry) => geometry,
            DisplayedGeometry::Procedural { emphasized: e, .. } if emphasized => e,
            DisplayedGeometry::Procedural { neutral, .. } => neutral,
        }
    }

    pub fn is_procedural(&self) -> bool {
        matches!(self, DisplayedGeometry::Procedural { .. })
    }
}

/// Floating caption shown while the model is hovered
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub color: Rgb,
    pub position: [f32; 3],
    pub font_size: f32,
}

impl Label {
    pub fn for_model(params: &ModelParameters) -> Self {
        Self {
            text: params.kind.label(),
            color: params.accent,
            position: [0.0, LABEL_HEIGHT, 0.0],
            font_size: LABEL_FONT_SIZE,
        }
    }
}

/// Everything the host needs to draw one frame
#[derive(Debug)]
pub struct FrameView<'a> {
    pub frame: Option<FrameInfo>,
    pub motion: AnimationTransform,
    /// Placement composed with the idle motion
    pub model: Mat4,
    pub geometry: &'a GeometryDescription,
    pub label: Option<&'a Label>,
    /// Label drift, added to the label's own height
    pub label_offset: f32,
    pub particles: &'a [Shape],
    pub particle_offset: f32,
    pub load_state: &'a LoadState,
}

impl FrameView<'_> {
    /// GPU records for the model and its particles
    pub fn instances(&self) -> Vec<ShapeInstance> {
        let mut instances = self.geometry.instances(&self.model);
        let cluster = self.model * Mat4::from_translation(Vec3::Y * self.particle_offset);
        instances.extend(
            self.particles
                .iter()
                .map(|p| ShapeInstance::new(p, &(cluster * p.local_matrix()))),
        );
        instances
    }
}

/// One interactive product model: loading, animation and pointer handling
///
/// The host drives it: [`Viewer::on_frame`] once per displayed frame and the
/// pointer methods as events arrive, all on one thread. Asset loads run on
/// the host's executor and only touch viewer state inside `on_frame`.
pub struct Viewer {
    params: ModelParameters,
    placement: Placement,
    driver: AnimationDriver,
    // Dropping the loader aborts its in-flight task and closes the channel,
    // so a late result can never reach a torn-down viewer.
    loader: AssetLoader,
    spawner: Box<dyn Spawn>,
    load_state: LoadState,
    load_timeout: Option<Countdown>,
    displayed: DisplayedGeometry,
    interaction: InteractionMachine,
    emphasized: bool,
    label: Option<Label>,
    particles: Vec<Shape>,
    rng: StdRng,
    on_interaction: Option<InteractionCallback>,
    last_frame: Option<FrameInfo>,
    motion: AnimationTransform,
}

impl Viewer {
    /// Mounts a viewer, starting the asset load right away when a URL is set
    pub fn new(
        config: ViewerConfig,
        source: Arc<dyn AssetSource>,
        spawner: impl Spawn + 'static,
    ) -> Self {
        let params = ModelParameters::new(config.kind);
        let rng = match config.particle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut viewer = Self {
            params,
            placement: config.placement,
            driver: AnimationDriver::new(config.animation),
            loader: AssetLoader::new(source),
            spawner: Box::new(spawner),
            load_state: LoadState::NotRequested,
            load_timeout: config
                .load_timeout_secs
                .filter(|secs| *secs > 0.0)
                .and_then(|secs| Duration::try_from_secs_f32(secs).ok())
                .map(Countdown::new),
            displayed: DisplayedGeometry::procedural(&params),
            interaction: InteractionMachine::new(params.kind),
            emphasized: false,
            label: None,
            particles: Vec::new(),
            rng,
            on_interaction: None,
            last_frame: None,
            motion: AnimationTransform::IDENTITY,
        };

        if let Some(url) = config.asset_url {
            viewer.start_load(&url);
        }
        viewer
    }

    pub fn with_callback(mut self, callback: impl FnMut(ModelKind) + 'static) -> Self {
        self.on_interaction = Some(Box::new(callback));
        self
    }

    pub fn kind(&self) -> ModelKind {
        self.params.kind
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn displayed(&self) -> &DisplayedGeometry {
        &self.displayed
    }

    pub fn displayed_geometry(&self) -> &GeometryDescription {
        self.displayed.geometry(self.emphasized)
    }

    pub fn is_emphasized(&self) -> bool {
        self.emphasized
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn particles(&self) -> &[Shape] {
        &self.particles
    }

    pub fn motion(&self) -> AnimationTransform {
        self.motion
    }

    /// Replaces the asset, treating the change like a fresh mount
    pub fn set_asset_url(&mut self, url: Option<&str>) {
        self.loader.cancel();
        self.stop_timeout();
        self.load_state = LoadState::NotRequested;
        if !self.displayed.is_procedural() {
            self.displayed = DisplayedGeometry::procedural(&self.params);
        }

        if let Some(url) = url {
            self.start_load(url);
        }
    }

    /// Per-frame callback from the host. Repeating a frame number is a no-op.
    pub fn on_frame(&mut self, frame: FrameInfo) -> FrameView<'_> {
        if self.last_frame.map(|f| f.number) == Some(frame.number) {
            log::trace!("Frame {} already applied", frame.number);
            return self.view();
        }

        self.apply_load_events();
        self.tick_timeout(frame.delta);
        self.motion = self.driver.advance(frame.elapsed);
        self.last_frame = Some(frame);

        self.view()
    }

    /// The most recently computed frame, without advancing anything
    pub fn view(&self) -> FrameView<'_> {
        let elapsed = self.last_frame.map(|f| f.elapsed).unwrap_or_default();
        FrameView {
            frame: self.last_frame,
            motion: self.motion,
            model: self.placement.matrix(self.motion),
            geometry: self.displayed_geometry(),
            label: self.label.as_ref(),
            label_offset: AnimationDriver::float_offset(elapsed, 1.0, 0.2),
            particles: &self.particles,
            particle_offset: AnimationDriver::float_offset(elapsed, 2.0, 0.5),
            load_state: &self.load_state,
        }
    }

    pub fn pointer_enter(&mut self) {
        self.handle_pointer(PointerEvent::Enter);
    }

    pub fn pointer_leave(&mut self) {
        self.handle_pointer(PointerEvent::Leave);
    }

    pub fn click(&mut self) {
        self.handle_pointer(PointerEvent::Click);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        for effect in self.interaction.handle(event) {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::EmphasisOn => self.emphasized = true,
            Effect::EmphasisOff => self.emphasized = false,
            Effect::ShowLabel => self.label = Some(Label::for_model(&self.params)),
            Effect::HideLabel => self.label = None,
            Effect::RegenerateParticles => {
                self.particles = particles::scatter(&mut self.rng, self.params.accent);
            }
            Effect::ClearParticles => self.particles.clear(),
            Effect::Notify(kind) => self.notify(kind),
        }
    }

    fn notify(&mut self, kind: ModelKind) {
        let Some(callback) = self.on_interaction.as_mut() else {
            return;
        };
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(kind))) {
            log::error!(
                "Interaction callback for {} bike failed: {}",
                kind,
                panic_message(panic.as_ref())
            );
        }
    }

    fn start_load(&mut self, url: &str) {
        let task = self.loader.begin_load(url);
        self.load_state = LoadState::Loading { progress: 0.0 };
        if let Some(timeout) = self.load_timeout.as_mut() {
            timeout.start();
        }

        if let Err(err) = self.spawner.spawn(task) {
            self.loader.cancel();
            self.fail(err.into());
        }
    }

    fn apply_load_events(&mut self) {
        for event in self.loader.poll_events() {
            match event {
                LoadEvent::Progress(fraction) => {
                    if let LoadState::Loading { progress } = &mut self.load_state {
                        *progress = fraction;
                        log::info!("Loading progress: {:.0}%", fraction * 100.0);
                    }
                }
                LoadEvent::Loaded(geometry) => {
                    self.stop_timeout();
                    log::info!("Loaded {} bike model ({} shapes)", self.params.kind, geometry.len());
                    let geometry = Arc::new(geometry);
                    self.displayed = DisplayedGeometry::Loaded(Arc::clone(&geometry));
                    self.load_state = LoadState::Loaded(geometry);
                }
                LoadEvent::Failed(reason) => self.fail(reason),
            }
        }
    }

    fn tick_timeout(&mut self, delta: Duration) {
        let Some(timeout) = self.load_timeout.as_mut() else {
            return;
        };
        if timeout.tick(delta) {
            let limit = timeout.limit();
            self.loader.cancel();
            self.fail(LoadError::Timeout(limit.as_secs_f32()));
        }
    }

    fn stop_timeout(&mut self) {
        if let Some(timeout) = self.load_timeout.as_mut() {
            timeout.stop();
        }
    }

    fn fail(&mut self, reason: LoadError) {
        log::warn!(
            "Error loading model: {}; showing procedural {} bike",
            reason,
            self.params.kind
        );
        self.stop_timeout();
        if !self.displayed.is_procedural() {
            self.displayed = DisplayedGeometry::procedural(&self.params);
        }
        self.load_state = LoadState::Failed { reason };
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
