use std::sync::{Arc, Mutex, OnceLock};
use std::thread;

use anyhow::Result;
use uuid::Uuid;

use crate::config::ViewerConfig;
use crate::image_db::ImageBlob;
use crate::image_server::{ImageServer, Token};
use crate::input::InputEvent;
use crate::journey_manager::TravelPace;
use crate::logs;
use crate::session::SessionStore;
use crate::session_controller::{ImageResource, SessionController, SessionView};
use crate::storage::Storage;

// Lock order is `session` before `image_token`. The image fetch thread takes
// `image_token` only while holding `session`.
struct MainState {
    storage: Arc<Storage>,
    image_server: Mutex<ImageServer>,
    session: Mutex<Option<SessionController>>,
    image_token: Mutex<Option<Token>>,
    cache_dir: String,
    config: ViewerConfig,
}

static MAIN_STATE: OnceLock<MainState> = OnceLock::new();

pub fn init(support_dir: String, cache_dir: String) -> Result<()> {
    if MAIN_STATE.get().is_some() {
        warn!("`init` is called multiple times");
        return Ok(());
    }

    if let Err(e) = logs::init(&cache_dir) {
        eprintln!("failed to initialize logging: {}", e);
    }

    let storage = Storage::init(&support_dir)?;
    let mut image_server = ImageServer::new("127.0.0.1", 0);
    image_server.start()?;

    let state = MainState {
        storage: Arc::new(storage),
        image_server: Mutex::new(image_server),
        session: Mutex::new(None),
        image_token: Mutex::new(None),
        cache_dir,
        config: ViewerConfig::default(),
    };
    if MAIN_STATE.set(state).is_err() {
        warn!("`init` raced with another `init`");
    }
    info!("initialized");
    Ok(())
}

fn get() -> Result<&'static MainState> {
    MAIN_STATE
        .get()
        .ok_or_else(|| anyhow!("main state is not initialized"))
}

/// Stores the uploaded map, drops any saved measurements and opens a fresh
/// session on it.
pub fn start_new_session(image: Vec<u8>, width: f64, height: f64) -> Result<()> {
    let state = get()?;
    let mut session = state.session.lock().unwrap();

    state.storage.clear()?;
    state.storage.save_image(&ImageBlob::from_bytes(image))?;

    let controller = SessionController::new(
        state.config.clone(),
        state.storage.clone(),
        width,
        height,
    )?;
    // an untouched upload can still be resumed later
    controller.persist();
    let session_id = controller.id();
    *session = Some(controller);
    drop(session);

    info!("[api] started new session {}", session_id);
    spawn_image_fetch(state, session_id);
    Ok(())
}

pub fn pace_presets() -> Vec<(TravelPace, f64)> {
    TravelPace::presets()
}

pub fn has_saved_session() -> bool {
    match get() {
        Ok(state) => state.storage.has_saved_session(),
        Err(_) => false,
    }
}

/// Returns `false` when there is nothing usable to resume.
pub fn resume_saved_session(width: f64, height: f64) -> Result<bool> {
    let state = get()?;
    let mut session = state.session.lock().unwrap();

    let restored = match state.storage.load()? {
        Some(restored) => restored,
        None => {
            info!("[api] no saved session to resume");
            return Ok(false);
        }
    };
    let controller = SessionController::from_restored(
        state.config.clone(),
        state.storage.clone(),
        restored,
        width,
        height,
    )?;
    let session_id = controller.id();
    *session = Some(controller);
    drop(session);

    info!("[api] resumed saved session as {}", session_id);
    spawn_image_fetch(state, session_id);
    Ok(true)
}

/// Leaves the viewer. The saved session and image are kept as they are.
pub fn navigate_back() {
    let Ok(state) = get() else {
        return;
    };
    let mut session = state.session.lock().unwrap();
    if let Some(controller) = session.take() {
        info!("[api] closing session {}", controller.id());
    }
    *state.image_token.lock().unwrap() = None;
}

pub fn handle_input(event: InputEvent) -> bool {
    let Ok(state) = get() else {
        return false;
    };
    let mut session = state.session.lock().unwrap();
    match session.as_mut() {
        Some(controller) => controller.handle(event),
        None => {
            debug!("[api] no active session for {}", event);
            false
        }
    }
}

pub fn get_view() -> Option<SessionView> {
    let state = get().ok()?;
    let session = state.session.lock().unwrap();
    session.as_ref().map(|controller| controller.view())
}

pub fn render_overlay_png() -> Result<Option<Vec<u8>>> {
    let state = get()?;
    let session = state.session.lock().unwrap();
    match session.as_ref() {
        Some(controller) => Ok(Some(controller.render_overlay_png()?)),
        None => Ok(None),
    }
}

pub fn export_logs(target_file_path: String) -> Result<()> {
    let state = get()?;
    if let Err(e) = state.storage.flush() {
        warn!("[api] failed to flush storage before exporting logs: {}", e);
    }
    logs::export(&state.cache_dir, &target_file_path)
}

// The blob is read and served off the caller's thread. A result for a session
// that has since been replaced is dropped.
fn spawn_image_fetch(state: &'static MainState, session_id: Uuid) {
    thread::spawn(move || {
        let token = match state.storage.load_image() {
            Ok(Some(image)) => {
                let image_server = state.image_server.lock().unwrap();
                let content_type = image.content_type.clone();
                Some((image_server.register(image), content_type))
            }
            Ok(None) => {
                warn!("[api] no stored map image");
                None
            }
            Err(e) => {
                warn!("[api] failed to load map image: {}", e);
                None
            }
        };

        let mut session = state.session.lock().unwrap();
        match session.as_mut() {
            Some(controller) if controller.id() == session_id => {
                let resource = token.as_ref().map(|(token, content_type)| ImageResource {
                    url: token.url(),
                    content_type: content_type.clone(),
                });
                controller.on_image_loaded(resource);
                *state.image_token.lock().unwrap() = token.map(|(token, _)| token);
            }
            _ => debug!("[api] session {} is gone, dropping fetched image", session_id),
        }
    });
}
