use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_models::session::{Session, User};

pub const SESSION_KEY: &str = "hms.session";

/// Key-value storage behind the session manager, the server-side stand-in for
/// browser local storage.
pub trait SessionStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "session store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "session store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Stores all keys as one JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    fn load(&self) -> HashMap<String, String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> io::Result<()> {
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)
    }
}

impl SessionStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        let _lock = self.guard.lock().ok()?;
        self.load().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let _lock = self.guard.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "session file lock poisoned"))?;
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let _lock = self.guard.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "session file lock poisoned"))?;
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// Process-wide session for the signed-in user.
///
/// Lifecycle: `init` restores whatever the store holds, `login` replaces it,
/// `logout` clears both memory and store.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn init(&self) -> Option<User> {
        let restored = match self.store.read(SESSION_KEY) {
            Some(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("Discarding corrupt stored session: {}", e);
                    if let Err(e) = self.store.remove(SESSION_KEY) {
                        warn!("Failed to clear corrupt session: {}", e);
                    }
                    None
                }
            },
            None => None,
        };

        let user = restored.as_ref().map(|session| session.user.clone());
        match &user {
            Some(user) => info!("Restored session for {} ({})", user.email, user.role),
            None => debug!("No stored session to restore"),
        }

        *self.current.write().await = restored;
        user
    }

    pub async fn login(&self, user: User) -> io::Result<Session> {
        let session = Session::new(user);
        let raw = serde_json::to_string(&session)?;
        self.store.write(SESSION_KEY, &raw)?;

        info!("User {} signed in as {}", session.user.email, session.user.role);
        *self.current.write().await = Some(session.clone());
        Ok(session)
    }

    pub async fn logout(&self) -> io::Result<Option<User>> {
        let previous = self.current.write().await.take();
        self.store.remove(SESSION_KEY)?;

        if let Some(session) = &previous {
            info!("User {} signed out", session.user.email);
        }
        Ok(previous.map(|session| session.user))
    }

    pub async fn current(&self) -> Option<User> {
        self.current.read().await.as_ref().map(|session| session.user.clone())
    }

    pub async fn session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }
}
