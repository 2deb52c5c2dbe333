//! In-memory collaborators for daemon tests.

use crate::daemon::Announcer;
use crate::daemon::error::SwitchError;
use crate::daemon::rotation::{MemberDirectory, NicknameStore};
use crate::daemon::schedule::Schedule;
use async_trait::async_trait;
use parking_lot::Mutex;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

pub const GUILD: serenity::GuildId = serenity::GuildId::new(319955430732464128);
pub const TARGET: serenity::UserId = serenity::UserId::new(209018651360100352);

pub struct FakeStore {
    names: Option<Vec<String>>,
    reads: AtomicUsize,
}

impl FakeStore {
    pub fn with(names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            names: Some(names.iter().map(|s| s.to_string()).collect()),
            reads: AtomicUsize::new(0),
        })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            names: None,
            reads: AtomicUsize::new(0),
        })
    }

    /// How many times the pool was read, i.e. how many rotations were attempted.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NicknameStore for FakeStore {
    async fn list_nicknames(&self) -> anyhow::Result<Vec<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.names
            .clone()
            .ok_or_else(|| anyhow::anyhow!("database is locked"))
    }
}

pub struct FakeDirectory {
    current: Mutex<Option<String>>,
    failure: Mutex<Option<SwitchError>>,
    applied: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl FakeDirectory {
    fn build(current: Option<String>, gate: Option<Arc<Notify>>) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(current),
            failure: Mutex::new(None),
            applied: Mutex::new(Vec::new()),
            gate,
        })
    }

    pub fn named(name: &str) -> Arc<Self> {
        Self::build(Some(name.to_string()), None)
    }

    pub fn missing() -> Arc<Self> {
        Self::build(None, None)
    }

    /// Renames block until the returned gate is notified.
    pub fn gated(name: &str) -> (Arc<Self>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (Self::build(Some(name.to_string()), Some(gate.clone())), gate)
    }

    /// Make the next rename fail with `error`.
    pub fn fail_next(&self, error: SwitchError) {
        *self.failure.lock() = Some(error);
    }

    pub fn current(&self) -> Option<String> {
        self.current.lock().clone()
    }

    pub fn applied(&self) -> Vec<String> {
        self.applied.lock().clone()
    }
}

#[async_trait]
impl MemberDirectory for FakeDirectory {
    async fn display_name(
        &self,
        guild: serenity::GuildId,
        user: serenity::UserId,
    ) -> Result<String, SwitchError> {
        self.current
            .lock()
            .clone()
            .ok_or_else(|| {
                SwitchError::TargetNotFound(format!("member {} in guild {}", user, guild))
            })
    }

    async fn set_nickname(
        &self,
        _guild: serenity::GuildId,
        _user: serenity::UserId,
        nickname: &str,
    ) -> Result<(), SwitchError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(error) = self.failure.lock().take() {
            return Err(error);
        }
        *self.current.lock() = Some(nickname.to_string());
        self.applied.lock().push(nickname.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAnnouncer {
    sent: Mutex<Vec<String>>,
}

impl FakeAnnouncer {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Announcer for FakeAnnouncer {
    async fn announce(&self, content: &str) -> anyhow::Result<()> {
        self.sent.lock().push(content.to_string());
        Ok(())
    }
}

/// Fires after a fixed delay regardless of the wall clock.
pub struct FixedSchedule(pub Duration);

impl Schedule for FixedSchedule {
    fn until_next(&self) -> Duration {
        self.0
    }
}
