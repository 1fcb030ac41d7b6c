use actix_web::dev::{Service, ServerHandle};
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};
use std::thread;
use tokio::runtime::Runtime;
use uuid::Uuid;

use crate::image_db::ImageBlob;

/// Keeps an image reachable over http. The shell gets the url from here; the
/// image is unregistered when the token is dropped.
pub struct Token {
    id: Uuid,
    url: String,
    registry: Weak<RwLock<HashMap<Uuid, Arc<ImageBlob>>>>,
}

impl Token {
    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for Token {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            debug!("[image_server] dropping image {} from registry", self.id);
            let mut items = registry.write().unwrap();
            items.remove(&self.id);
        }
    }
}

#[derive(Default, Clone)]
pub struct Registry {
    url_prefix: Arc<RwLock<String>>,
    items: Arc<RwLock<HashMap<Uuid, Arc<ImageBlob>>>>,
}

impl Registry {
    pub fn new(url_prefix: &str) -> Self {
        Self {
            url_prefix: Arc::new(RwLock::new(url_prefix.to_string())),
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn set_url_prefix(&self, url_prefix: &str) {
        let mut prefix = self.url_prefix.write().unwrap();
        *prefix = url_prefix.to_string();
    }

    pub fn register(&self, image: ImageBlob) -> Token {
        let id = Uuid::new_v4();
        {
            let mut items = self.items.write().unwrap();
            items.insert(id, Arc::new(image));
        }
        let url_prefix = self.url_prefix.read().unwrap();
        Token {
            id,
            url: format!("{}/images/{}", *url_prefix, id),
            registry: Arc::downgrade(&self.items),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<ImageBlob>> {
        let items = self.items.read().unwrap();
        items.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct AppState {
    registry: Registry,
}

async fn serve_image(id: web::Path<String>, data: web::Data<AppState>) -> HttpResponse {
    match Uuid::parse_str(&id)
        .ok()
        .and_then(|uuid| data.registry.get(&uuid))
    {
        Some(image) => HttpResponse::Ok()
            .content_type(image.content_type.as_str())
            .body(image.data.clone()),
        None => HttpResponse::NotFound().finish(),
    }
}

pub struct ImageServer {
    host: String,
    port: u16,
    handle: Option<thread::JoinHandle<()>>,
    server_handle: Option<ServerHandle>,
    registry: Registry,
}

impl ImageServer {
    /// Port 0 picks a free port when the server starts.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            handle: None,
            server_handle: None,
            registry: Registry::new(&format!("http://{}:{}", host, port)),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn register(&self, image: ImageBlob) -> Token {
        self.registry.register(image)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    // Start the server in a separate thread
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        let host = self.host.clone();
        let port = self.port;
        let registry = self.registry.clone();
        let random_prefix = Uuid::new_v4().to_string();

        // reports back once the url prefix is known (or binding failed)
        let (tx, rx) = std::sync::mpsc::channel::<Result<ServerHandle>>();

        let handle = thread::spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = tx.send(Err(e.into()));
                    return;
                }
            };
            runtime.block_on(async move {
                let app_state = web::Data::new(AppState {
                    registry: registry.clone(),
                });
                let route = format!("/{}/images/{{id}}", random_prefix);
                let server = match HttpServer::new(move || {
                    App::new()
                        .app_data(app_state.clone())
                        .wrap_fn(|req, srv| {
                            debug!("[image_server] {} {}", req.method(), req.uri());
                            srv.call(req)
                        })
                        .route(&route, web::get().to(serve_image))
                })
                .workers(1)
                .bind(format!("{}:{}", host, port))
                {
                    Ok(server) => server,
                    Err(e) => {
                        let _ = tx.send(Err(e.into()));
                        return;
                    }
                };

                let actual_port = server
                    .addrs()
                    .first()
                    .map(|addr| addr.port())
                    .unwrap_or(port);
                registry.set_url_prefix(&format!(
                    "http://{}:{}/{}",
                    host, actual_port, random_prefix
                ));

                let server = server.run();
                let _ = tx.send(Ok(server.handle()));
                info!("[image_server] listening on {}:{}", host, actual_port);
                if let Err(e) = server.await {
                    error!("[image_server] server stopped with error: {}", e);
                }
            });
        });

        let server_handle = rx
            .recv()
            .map_err(|_| anyhow!("image server thread exited before starting"))??;
        self.server_handle = Some(server_handle);
        self.handle = Some(handle);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(server_handle) = self.server_handle.take() {
            match tokio::runtime::Builder::new_current_thread().build() {
                Ok(runtime) => runtime.block_on(server_handle.stop(true)),
                Err(e) => warn!("[image_server] cannot stop server cleanly: {}", e),
            }
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("[image_server] server thread panicked");
            }
        }
    }
}

impl Drop for ImageServer {
    fn drop(&mut self) {
        self.stop();
    }
}
