use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Key under which a pending authorization is parked until its callback arrives.
pub fn state_key(provider: &str, token: &str) -> String {
    format!("{}_state:{}", provider, token)
}

/// Key for cached credentials. Namespaced by org then user so two users
/// never share an entry.
pub fn credentials_key(provider: &str, org_id: &str, user_id: &str) -> String {
    format!("{}_credentials:{}:{}", provider, org_id, user_id)
}

/// Short-lived key/value storage with per-key expiry.
///
/// Values are opaque strings (JSON text in practice). Callers own
/// serialization so that an unreadable payload can be reported distinctly
/// from a missing one.
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> anyhow::Result<()>;

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Read and remove in one step. Of several concurrent callers for the
    /// same key, at most one gets the value.
    async fn take(&self, key: &str) -> anyhow::Result<Option<String>>;
}

// ── Redis ────────────────────────────────────────────────────

/// Redis-backed store. Expiry is delegated to Redis (`SET ... EX`).
#[derive(Clone)]
pub struct RedisStore {
    redis: ConnectionManager,
}

impl RedisStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl EphemeralStore for RedisStore {
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> anyhow::Result<()> {
        let mut conn = self.redis.clone();
        // Redis rejects EX 0
        let secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, secs).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut conn = self.redis.clone();
        let value = conn.get::<_, Option<String>>(key).await?;
        Ok(value)
    }

    async fn take(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut conn = self.redis.clone();
        // GETDEL needs Redis >= 6.2
        let value: Option<String> = redis::cmd("GETDEL")
            .arg(key)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }
}

// ── In-memory ────────────────────────────────────────────────

/// Upper bound on a local entry's lifetime, applied when `now + ttl`
/// is not representable.
const MAX_LOCAL_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

#[derive(Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local store on a DashMap.
///
/// Entries are checked on read and evicted lazily. A periodic sweep can be
/// run with `evict_expired()` to bound memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    local: Arc<DashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all expired entries. Returns how many were dropped.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        // Counted inside retain: len() races with concurrent inserts.
        let mut evicted = 0;
        self.local.retain(|_, entry| {
            let live = entry.is_live(now);
            if !live {
                evicted += 1;
            }
            live
        });
        evicted
    }

    /// Current number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }
}

#[async_trait]
impl EphemeralStore for MemoryStore {
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> anyhow::Result<()> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl.min(MAX_LOCAL_TTL))
            .unwrap_or(now + MAX_LOCAL_TTL);
        self.local
            .insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        if let Some(entry) = self.local.get(key) {
            if entry.is_live(Instant::now()) {
                return Ok(Some(entry.value.clone()));
            }
            // expired: drop the ref before removing
            drop(entry);
            // only if still expired; a fresh write may have replaced it
            self.local
                .remove_if(key, |_, entry| !entry.is_live(Instant::now()));
        }
        Ok(None)
    }

    async fn take(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .local
            .remove(key)
            .filter(|(_, entry)| entry.is_live(Instant::now()))
            .map(|(_, entry)| entry.value))
    }
}
