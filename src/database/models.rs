use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Nickname {
    pub author: i64,
    pub target: i64,
    pub name: String,
}

/// Keys of the primitive key-value store.
#[derive(Debug, Clone, Copy)]
pub enum SettingKey {
    AnnounceRotation,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::AnnounceRotation => "announce_rotation",
        }
    }
}
