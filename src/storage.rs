use anyhow::Result;
use std::sync::Mutex;

use crate::image_db::{ImageBlob, ImageDb};
use crate::session::{RestoredSession, SessionSnapshot, SessionStore};
use crate::session_db::SessionDb;

pub const SESSION_KEY: &str = "appState";
pub const IMAGE_KEY: &str = "uploadedImage";

pub struct Storage {
    session_db: Mutex<SessionDb>,
    image_db: Mutex<ImageDb>,
}

impl Storage {
    pub fn init(support_dir: &str) -> Result<Self> {
        std::fs::create_dir_all(support_dir)?;
        let session_db = SessionDb::open(support_dir)?;
        let image_db = ImageDb::open(support_dir)?;
        info!("[storage] opened stores in {}", support_dir);
        Ok(Storage {
            session_db: Mutex::new(session_db),
            image_db: Mutex::new(image_db),
        })
    }

    pub fn save_image(&self, image: &ImageBlob) -> Result<()> {
        debug!(
            "[storage] saving image: {} bytes of {}",
            image.data.len(),
            image.content_type
        );
        let mut image_db = self.image_db.lock().unwrap();
        image_db.put_image(IMAGE_KEY, image)
    }

    pub fn load_image(&self) -> Result<Option<ImageBlob>> {
        let image_db = self.image_db.lock().unwrap();
        image_db.get_image(IMAGE_KEY)
    }

    pub fn flush(&self) -> Result<()> {
        debug!("[storage] flushing");
        let session_db = self.session_db.lock().unwrap();
        session_db.flush()
    }
}

impl SessionStore for Storage {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        let mut session_db = self.session_db.lock().unwrap();
        session_db.put(SESSION_KEY, &json)
    }

    fn load(&self) -> Result<Option<RestoredSession>> {
        let mut session_db = self.session_db.lock().unwrap();
        let stored = match session_db.get(SESSION_KEY)? {
            None => return Ok(None),
            Some(stored) => stored,
        };
        match SessionSnapshot::from_json(&stored.value) {
            Ok(snapshot) => Ok(Some(RestoredSession::from_snapshot(
                snapshot,
                stored.saved_at,
            ))),
            Err(e) => {
                warn!("[storage] discarding corrupt saved session: {}", e);
                session_db.delete(SESSION_KEY)?;
                Ok(None)
            }
        }
    }

    // A record that no longer parses is dropped here too, so callers never
    // offer a resume that `load` would refuse.
    fn has_saved_session(&self) -> bool {
        let mut session_db = self.session_db.lock().unwrap();
        let stored = match session_db.get(SESSION_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return false,
            Err(e) => {
                warn!("[storage] failed to check for saved session: {}", e);
                return false;
            }
        };
        match SessionSnapshot::from_json(&stored.value) {
            Ok(_) => true,
            Err(e) => {
                warn!("[storage] discarding corrupt saved session: {}", e);
                if let Err(e) = session_db.delete(SESSION_KEY) {
                    warn!("[storage] failed to delete corrupt saved session: {}", e);
                }
                false
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let mut session_db = self.session_db.lock().unwrap();
        session_db.delete(SESSION_KEY)?;
        Ok(())
    }
}
