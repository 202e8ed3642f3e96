use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::{self, AsyncCommands};

use blindbox_auth_types::cookie::SESSION_EXP;

use crate::domain::repository::{ExpiryStore, SessionBag};
use crate::error::BlindBoxError;

#[derive(Clone)]
pub struct RedisExpiryStore {
    pub pool: Pool,
}

impl ExpiryStore for RedisExpiryStore {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), BlindBoxError> {
        let mut conn = self.pool.get().await.context("redis pool")?;
        let (): () = conn.set_ex(key, value, ttl_secs).await.context("redis SET EX")?;
        Ok(())
    }

    async fn set_nx_ex(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<bool, BlindBoxError> {
        let mut conn = self.pool.get().await.context("redis pool")?;
        // Reply is "OK" when the key was created and nil when it already existed.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .context("redis SET NX EX")?;
        Ok(reply.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BlindBoxError> {
        let mut conn = self.pool.get().await.context("redis pool")?;
        let value: Option<String> = conn.get(key).await.context("redis GET")?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<bool, BlindBoxError> {
        let mut conn = self.pool.get().await.context("redis pool")?;
        let removed: u64 = conn.del(key).await.context("redis DEL")?;
        Ok(removed > 0)
    }
}

fn session_key(session_id: &str) -> String {
    format!("session:{session_id}")
}

/// Session bag stored as one Redis hash per browser. Every write slides the expiry.
#[derive(Clone)]
pub struct RedisSession {
    pub pool: Pool,
    pub session_id: String,
}

impl SessionBag for RedisSession {
    async fn get(&self, key: &str) -> Result<Option<String>, BlindBoxError> {
        let mut conn = self.pool.get().await.context("redis pool")?;
        let value: Option<String> = conn
            .hget(session_key(&self.session_id), key)
            .await
            .context("redis HGET")?;
        Ok(value)
    }

    async fn insert(&self, key: &str, value: &str) -> Result<(), BlindBoxError> {
        let mut conn = self.pool.get().await.context("redis pool")?;
        let hash = session_key(&self.session_id);
        let (): () = redis::pipe()
            .atomic()
            .hset(&hash, key, value)
            .ignore()
            .expire(&hash, SESSION_EXP as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .context("redis HSET")?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), BlindBoxError> {
        let mut conn = self.pool.get().await.context("redis pool")?;
        let (): () = conn
            .hdel(session_key(&self.session_id), key)
            .await
            .context("redis HDEL")?;
        Ok(())
    }
}
