use crate::daemon::error::SwitchError;
use crate::database::queries;
use crate::utils::validation::decorative_chars;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Read access to the nickname pool.
#[async_trait]
pub trait NicknameStore: Send + Sync {
    async fn list_nicknames(&self) -> anyhow::Result<Vec<String>>;
}

#[async_trait]
impl NicknameStore for SqlitePool {
    async fn list_nicknames(&self) -> anyhow::Result<Vec<String>> {
        queries::list_nicknames(self).await
    }
}

/// Lookup and mutation of guild members.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Current display name of `user` inside `guild`.
    ///
    /// Fails with [`SwitchError::TargetNotFound`] when either cannot be resolved.
    async fn display_name(
        &self,
        guild: serenity::GuildId,
        user: serenity::UserId,
    ) -> Result<String, SwitchError>;

    /// Fails with [`SwitchError::PermissionDenied`] or [`SwitchError::MutationFailed`].
    async fn set_nickname(
        &self,
        guild: serenity::GuildId,
        user: serenity::UserId,
        nickname: &str,
    ) -> Result<(), SwitchError>;
}

/// Record of one applied rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    pub old_name: String,
    pub new_name: String,
}

/// The nickname switch routine for a single target member.
pub struct Rotation {
    store: Arc<dyn NicknameStore>,
    directory: Arc<dyn MemberDirectory>,
    guild_id: serenity::GuildId,
    target_id: serenity::UserId,
}

impl Rotation {
    pub fn new(
        store: Arc<dyn NicknameStore>,
        directory: Arc<dyn MemberDirectory>,
        guild_id: serenity::GuildId,
        target_id: serenity::UserId,
    ) -> Self {
        Self {
            store,
            directory,
            guild_id,
            target_id,
        }
    }

    pub fn target_id(&self) -> serenity::UserId {
        self.target_id
    }

    /// Draw a nickname from the pool and apply it to the target, carrying
    /// over the decorative glyphs of the current name.
    pub async fn switch(&self) -> Result<Switch, SwitchError> {
        let pool = self
            .store
            .list_nicknames()
            .await
            .map_err(|e| SwitchError::Storage(e.to_string()))?;

        if pool.is_empty() {
            return Err(SwitchError::NoNicknamesAvailable);
        }

        let old_name = self
            .directory
            .display_name(self.guild_id, self.target_id)
            .await?;

        let new_name = compose_nickname(&pool, &old_name, &mut rand::thread_rng())
            .ok_or(SwitchError::NoNicknamesAvailable)?;

        self.directory
            .set_nickname(self.guild_id, self.target_id, &new_name)
            .await?;

        Ok(Switch { old_name, new_name })
    }
}

/// Pick a nickname from `pool` and, when `current` carries at least two
/// decorative glyphs, wrap it with two of them drawn without replacement.
///
/// Returns `None` only for an empty pool.
pub fn compose_nickname<R: Rng + ?Sized>(
    pool: &[String],
    current: &str,
    rng: &mut R,
) -> Option<String> {
    let base = pool.choose(rng)?;
    let glyphs = decorative_chars(current);

    if glyphs.len() < 2 {
        return Some(base.clone());
    }

    let left = rng.gen_range(0..glyphs.len());
    let mut right = rng.gen_range(0..glyphs.len() - 1);
    if right >= left {
        right += 1;
    }

    Some(format!("{}{}{}", glyphs[left], base, glyphs[right]))
}
