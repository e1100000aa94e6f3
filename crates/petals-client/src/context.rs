//! Client context - shared handles for materialization and actions
//!
//! Every `Message` holds one of these so its actions can reach the REST
//! collaborator and the caches without ambient globals.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use petals_cache::ClientCache;
use petals_core::{RestClient, Snowflake, User};

/// Default cap on nested referenced messages
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 3;

/// Shared client state
pub struct ClientContext {
    http: Arc<dyn RestClient>,
    cache: Arc<ClientCache>,

    /// Identity from READY; unknown until the first shard is ready
    current_user: RwLock<Option<Arc<User>>>,
    session_id: RwLock<Option<String>>,

    max_reference_depth: usize,

    /// Runtime for background channel fetches when none is entered
    runtime: Option<Handle>,
}

impl ClientContext {
    #[must_use]
    pub fn new(http: Arc<dyn RestClient>, cache: Arc<ClientCache>) -> Self {
        Self {
            http,
            cache,
            current_user: RwLock::new(None),
            session_id: RwLock::new(None),
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            runtime: Handle::try_current().ok(),
        }
    }

    #[must_use]
    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth;
        self
    }

    /// Runtime that runs channel fetches started outside of any runtime
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    // === Collaborators ===

    pub fn http(&self) -> &dyn RestClient {
        self.http.as_ref()
    }

    pub(crate) fn http_shared(&self) -> Arc<dyn RestClient> {
        Arc::clone(&self.http)
    }

    pub fn cache(&self) -> &Arc<ClientCache> {
        &self.cache
    }

    /// The entered runtime, else the one captured at construction
    pub(crate) fn runtime(&self) -> Option<Handle> {
        Handle::try_current().ok().or_else(|| self.runtime.clone())
    }

    // === Identity ===

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.current_user.read().clone()
    }

    pub fn current_user_id(&self) -> Option<Snowflake> {
        self.current_user.read().as_ref().map(|user| user.id)
    }

    /// Record the identity this client runs as
    pub fn set_current_user(&self, user: User) -> Arc<User> {
        let user = Arc::new(user);
        *self.current_user.write() = Some(Arc::clone(&user));
        user
    }

    pub fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    pub fn set_session_id(&self, session_id: impl Into<String>) {
        *self.session_id.write() = Some(session_id.into());
    }

    // === Settings ===

    #[inline]
    pub fn max_reference_depth(&self) -> usize {
        self.max_reference_depth
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("current_user", &self.current_user_id())
            .field("guilds", &self.cache.guild_count())
            .field("max_reference_depth", &self.max_reference_depth)
            .finish()
    }
}
