/* The session controller owns all measurement state of one map session and
is the only thing that mutates it. Every input event runs the same pipeline:

    mutate -> redraw (if any path changed) -> persist (if anything persistent changed)

Redraw is a full redraw of the overlay; persistence writes the whole snapshot
and a failed write is only logged.
*/

use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use crate::calculation::{self, JourneySummary};
use crate::calibration::{Calibration, CalibrationStage};
use crate::config::ViewerConfig;
use crate::coordinates::{to_image_space, Coordinate};
use crate::input::InputEvent;
use crate::journey_manager::JourneyManager;
use crate::renderer::{JourneyRenderer, PixmapSurface, Surface};
use crate::session::{RestoredSession, SessionSnapshot, SessionStore};
use crate::viewport::Viewport;

pub type SharedSessionStore = Arc<dyn SessionStore + Send + Sync>;

/// A map image that the shell can display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    pub url: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Ready(ImageResource),
    Missing,
}

#[derive(Debug, Default, Clone, Copy)]
struct Change {
    overlay: bool,
    persistent: bool,
}

impl Change {
    fn none() -> Self {
        Self::default()
    }

    fn persistent(changed: bool) -> Self {
        Self {
            overlay: false,
            persistent: changed,
        }
    }

    fn overlay_and_persistent(changed: bool) -> Self {
        Self {
            overlay: changed,
            persistent: changed,
        }
    }

    fn any(self) -> bool {
        self.overlay || self.persistent
    }
}

/// Read-only picture of the session for the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub image_url: Option<String>,
    pub image_missing: bool,
    pub scale: f64,
    pub position: Coordinate,
    pub is_dragging: bool,
    pub calibration_stage: CalibrationStage,
    pub calibration_point1: Option<Coordinate>,
    pub calibration_point2: Option<Coordinate>,
    pub distance_input: String,
    pub map_scale: f64,
    pub journeys: Vec<JourneySummary>,
    pub total_distance: f64,
    pub total_travel_days: f64,
    pub can_undo: bool,
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

pub struct SessionController {
    id: Uuid,
    viewport: Viewport,
    calibration: Calibration,
    journeys: JourneyManager,
    image: ImageState,
    container_size: (f64, f64),
    renderer: JourneyRenderer,
    surface: PixmapSurface,
    store: SharedSessionStore,
}

impl SessionController {
    pub fn new(config: ViewerConfig, store: SharedSessionStore, width: f64, height: f64) -> Result<Self> {
        let surface = PixmapSurface::new(to_pixels(width), to_pixels(height), config.render.supersample)?;
        let id = Uuid::new_v4();
        info!("[session] new session {} ({}x{})", id, width, height);
        Ok(Self {
            id,
            viewport: Viewport::new(config.zoom),
            calibration: Calibration::default(),
            journeys: JourneyManager::new(),
            image: ImageState::Pending,
            container_size: (width, height),
            renderer: JourneyRenderer::new(config.render),
            surface,
            store,
        })
    }

    pub fn from_restored(
        config: ViewerConfig,
        store: SharedSessionStore,
        restored: RestoredSession,
        width: f64,
        height: f64,
    ) -> Result<Self> {
        let zoom = config.zoom;
        let mut controller = Self::new(config, store, width, height)?;
        controller.viewport = Viewport::from_record(zoom, &restored.viewport);
        controller.calibration = restored.calibration;
        controller.journeys = restored.journeys;
        info!(
            "[session] restored {} journeys, calibration {}",
            controller.journeys.len(),
            controller.calibration.stage()
        );
        controller.redraw();
        Ok(controller)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn journeys(&self) -> &JourneyManager {
        &self.journeys
    }

    pub fn image(&self) -> &ImageState {
        &self.image
    }

    pub fn surface(&self) -> &PixmapSurface {
        &self.surface
    }

    /// Only the image reference changes; measurement state is untouched.
    pub fn on_image_loaded(&mut self, image: Option<ImageResource>) {
        self.image = match image {
            Some(image) => {
                info!("[session] image ready at {}", image.url);
                ImageState::Ready(image)
            }
            None => {
                warn!("[session] no image available");
                ImageState::Missing
            }
        };
    }

    fn measurement_enabled(&self) -> bool {
        matches!(self.image, ImageState::Ready(_))
    }

    pub fn handle(&mut self, event: InputEvent) -> bool {
        let is_measurement = Self::is_measurement_event(&event);
        if is_measurement && !self.measurement_enabled() {
            debug!("[session] ignoring {} without a map image", event);
            return false;
        }

        let change = self.apply(event);
        if change.overlay {
            self.redraw();
        }
        if change.persistent {
            self.persist();
        }
        change.any()
    }

    fn is_measurement_event(event: &InputEvent) -> bool {
        matches!(
            event,
            InputEvent::Click { .. }
                | InputEvent::SetDistanceInput(_)
                | InputEvent::SubmitCalibration
                | InputEvent::ResetCalibration
                | InputEvent::AddJourney
                | InputEvent::SelectJourney(_)
                | InputEvent::DeleteJourney(_)
                | InputEvent::ResetJourney(_)
                | InputEvent::UndoJourney
                | InputEvent::SetMilesPerDay(_)
                | InputEvent::SetPace(_)
        )
    }

    fn apply(&mut self, event: InputEvent) -> Change {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => {
                self.viewport.begin_drag(x, y, button, modifiers);
                Change::none()
            }
            InputEvent::PointerMove { x, y } => Change::persistent(self.viewport.drag_to(x, y)),
            InputEvent::PointerUp => {
                self.viewport.end_drag();
                Change::none()
            }
            InputEvent::Click { x, y, modifiers } => {
                // ctrl/cmd + click is the pan gesture
                if modifiers.ctrl || modifiers.meta {
                    return Change::none();
                }
                Change::overlay_and_persistent(self.place_point(x, y))
            }
            InputEvent::Wheel { delta_y } => Change::persistent(self.viewport.wheel(delta_y)),
            InputEvent::MenuHover(hovering) => {
                self.viewport.set_menu_hover(hovering);
                Change::none()
            }
            InputEvent::ZoomIn => Change::persistent(self.viewport.zoom_in()),
            InputEvent::ZoomOut => Change::persistent(self.viewport.zoom_out()),
            InputEvent::ResetZoom => Change::persistent(self.viewport.reset_zoom()),
            InputEvent::SetDistanceInput(input) => {
                Change::persistent(self.calibration.set_distance_input(&input))
            }
            InputEvent::SubmitCalibration => match self.calibration.submit() {
                Ok(map_scale) => {
                    info!("[session] calibrated, map scale = {}", map_scale);
                    Change::overlay_and_persistent(true)
                }
                Err(e) => {
                    info!("[session] calibration rejected: {}", e);
                    Change::none()
                }
            },
            InputEvent::ResetCalibration => {
                Change::overlay_and_persistent(self.calibration.reset())
            }
            InputEvent::AddJourney => {
                self.journeys.create_journey();
                Change::persistent(true)
            }
            InputEvent::SelectJourney(index) => {
                Change::persistent(self.journeys.select_journey(index))
            }
            InputEvent::DeleteJourney(index) => {
                Change::overlay_and_persistent(self.journeys.delete_journey(index))
            }
            InputEvent::ResetJourney(index) => {
                Change::overlay_and_persistent(self.journeys.reset_journey(index))
            }
            InputEvent::UndoJourney => Change::overlay_and_persistent(self.journeys.undo_current()),
            InputEvent::SetMilesPerDay(miles_per_day) => {
                Change::persistent(self.journeys.set_speed(miles_per_day))
            }
            InputEvent::SetPace(pace) => Change::persistent(self.journeys.set_pace(pace)),
            InputEvent::Resize { width, height } => {
                self.container_size = (width, height);
                if let Err(e) = self.surface.resize(to_pixels(width), to_pixels(height)) {
                    warn!("[session] failed to resize overlay: {}", e);
                    return Change::none();
                }
                Change {
                    overlay: true,
                    persistent: false,
                }
            }
        }
    }

    // Until calibration is complete clicks feed the calibration, afterwards
    // they extend the current journey.
    fn place_point(&mut self, x: f64, y: f64) -> bool {
        if self.calibration.is_complete() {
            return self.journeys.place_coordinate(
                &self.calibration,
                &self.viewport,
                self.container_size,
                x,
                y,
            );
        }
        let (width, height) = self.container_size;
        let bbox = self.viewport.container_box(width, height);
        let coordinate = to_image_space(x, y, &bbox, self.viewport.scale());
        self.calibration.place_point(coordinate)
    }

    fn redraw(&mut self) {
        self.renderer.render(self.journeys.journeys(), &mut self.surface);
        self.renderer
            .render_calibration_guide(&self.calibration, &mut self.surface);
    }

    pub fn persist(&self) {
        if let Err(e) = self.store.save(&self.snapshot()) {
            warn!("[session] failed to persist session {}: {}", self.id, e);
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            viewport: self.viewport.to_record(),
            calibration: self.calibration.clone(),
            journeys: self
                .journeys
                .journeys()
                .iter()
                .map(|journey| journey.to_record())
                .collect(),
            current_journey: self.journeys.stored_current_index(),
        }
    }

    pub fn render_overlay_png(&self) -> Result<Vec<u8>> {
        self.surface.to_png()
    }

    pub fn overlay_size(&self) -> (u32, u32) {
        self.surface.logical_size()
    }

    pub fn view(&self) -> SessionView {
        let map_scale = self.calibration.effective_map_scale();
        let journeys = self.journeys.journeys();
        let (image_url, image_missing) = match &self.image {
            ImageState::Ready(image) => (Some(image.url.clone()), false),
            ImageState::Pending => (None, false),
            ImageState::Missing => (None, true),
        };
        SessionView {
            image_url,
            image_missing,
            scale: self.viewport.scale(),
            position: self.viewport.position(),
            is_dragging: self.viewport.is_dragging(),
            calibration_stage: self.calibration.stage(),
            calibration_point1: self.calibration.point1,
            calibration_point2: self.calibration.point2,
            distance_input: self.calibration.distance_input.clone(),
            map_scale,
            journeys: calculation::summarize(&self.journeys, map_scale),
            total_distance: calculation::calculate_total_distance(journeys, map_scale),
            total_travel_days: calculation::calculate_total_time_all(journeys, map_scale),
            can_undo: self
                .journeys
                .current_journey()
                .is_some_and(|journey| !journey.is_empty()),
        }
    }
}
