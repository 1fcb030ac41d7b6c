use anyhow::Result;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempdir::TempDir;
use travelmap_core::config::ViewerConfig;
use travelmap_core::input::{InputEvent, Modifiers};
use travelmap_core::session::{RestoredSession, SessionSnapshot, SessionStore};
use travelmap_core::session_controller::{ImageResource, SessionController};
use travelmap_core::storage::Storage;

/// Keeps the latest snapshot in memory and counts writes.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Option<SessionSnapshot>>,
    save_count: AtomicUsize,
}

impl MemoryStore {
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub fn last_snapshot(&self) -> Option<SessionSnapshot> {
        self.saved.lock().unwrap().clone()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        *self.saved.lock().unwrap() = Some(snapshot.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load(&self) -> Result<Option<RestoredSession>> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .clone()
            .map(|snapshot| RestoredSession::from_snapshot(snapshot, None)))
    }

    fn has_saved_session(&self) -> bool {
        self.saved.lock().unwrap().is_some()
    }

    fn clear(&self) -> Result<()> {
        *self.saved.lock().unwrap() = None;
        Ok(())
    }
}

pub fn temp_storage(name: &str) -> (TempDir, Storage) {
    let temp_dir = TempDir::new(name).unwrap();
    println!("temp dir: {:?}", temp_dir.path());
    let support_dir = temp_dir
        .path()
        .join("support/")
        .into_os_string()
        .into_string()
        .unwrap();
    let storage = Storage::init(&support_dir).unwrap();
    (temp_dir, storage)
}

pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 180, 120, 255]));
    let mut data = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut data), image::ImageFormat::Png)
        .unwrap();
    data
}

/// A 100x100 session whose map image is already available.
pub fn ready_controller(store: Arc<MemoryStore>) -> SessionController {
    let mut controller =
        SessionController::new(ViewerConfig::default(), store, 100.0, 100.0).unwrap();
    controller.on_image_loaded(Some(ImageResource {
        url: "http://127.0.0.1/map.png".to_string(),
        content_type: "image/png".to_string(),
    }));
    controller
}

pub fn click(controller: &mut SessionController, x: f64, y: f64) -> bool {
    controller.handle(InputEvent::Click {
        x,
        y,
        modifiers: Modifiers::none(),
    })
}

pub fn calibrate(
    controller: &mut SessionController,
    point1: (f64, f64),
    point2: (f64, f64),
    distance: &str,
) {
    assert!(click(controller, point1.0, point1.1));
    assert!(click(controller, point2.0, point2.1));
    controller.handle(InputEvent::SetDistanceInput(distance.to_string()));
    assert!(controller.handle(InputEvent::SubmitCalibration));
}
