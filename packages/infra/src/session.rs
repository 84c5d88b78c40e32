//! # セッション管理
//!
//! 認証情報ごとに上流サービスの認証済みセッションをキャッシュする。
//!
//! ## 解決の流れ
//!
//! 1. 認証情報からキャッシュキーを導出する（[`CredentialKeyDeriver`]）
//! 2. キャッシュに有効期限内のセッションがあれば、今日の日付で生存確認（probe）を行う
//! 3. probe に成功すればキャッシュ済みセッションを返す
//! 4. キャッシュに無い、期限切れ、または probe に失敗した場合は上流にログインし直し、
//!    新しいセッションでキャッシュを上書きする
//! 5. ログインに失敗した場合はキャッシュを変更せずにエラーを返す
//!
//! ## 排他制御
//!
//! キーごとに非同期 Mutex（スロット）を持ち、probe とログインをその中で行う。
//! 同じ認証情報の同時リクエストは直列化され、ログインは 1 回だけ行われる。
//! キー → スロットの対応表自体は同期 Mutex で保護し、`await` をまたいで保持しない。
//!
//! ## 上限
//!
//! | 項目 | 既定値 |
//! |------|--------|
//! | 有効期限 | 28800 秒（8 時間） |
//! | 最大エントリ数 | 1024（超過時は最も長く使われていないものを破棄） |

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::time::Instant;
use vitalsync_domain::{clock::Clock, credentials::Credentials};

use crate::{
    CredentialKey,
    CredentialKeyDeriver,
    SessionError,
    upstream::{UpstreamAuthenticator, UpstreamSession},
};

/// セッションの有効期限の既定値（8 時間）
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(28800);

/// キャッシュの最大エントリ数の既定値
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// セッションキャッシュの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCacheConfig {
    /// セッションの有効期限
    pub ttl:         Duration,
    /// 最大エントリ数
    pub max_entries: usize,
}

impl Default for SessionCacheConfig {
    fn default() -> Self {
        Self {
            ttl:         DEFAULT_SESSION_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// キャッシュ済みのセッション
struct CachedSession {
    session:    Arc<dyn UpstreamSession>,
    created_at: Instant,
}

type Slot = Arc<tokio::sync::Mutex<Option<CachedSession>>>;

struct SlotEntry {
    slot:      Slot,
    last_used: u64,
}

#[derive(Default)]
struct SlotTable {
    entries: HashMap<CredentialKey, SlotEntry>,
    tick:    u64,
}

/// セッションの解決結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// キャッシュ済みセッションを再利用した
    Cached,
    /// 新しくログインした
    LoggedIn,
}

/// 上流セッションのキャッシュ（Session Manager）
pub struct SessionManager {
    authenticator: Arc<dyn UpstreamAuthenticator>,
    clock:         Arc<dyn Clock>,
    key_deriver:   CredentialKeyDeriver,
    config:        SessionCacheConfig,
    slots:         Mutex<SlotTable>,
}

impl SessionManager {
    pub fn new(
        authenticator: Arc<dyn UpstreamAuthenticator>,
        clock: Arc<dyn Clock>,
        key_deriver: CredentialKeyDeriver,
        config: SessionCacheConfig,
    ) -> Self {
        Self {
            authenticator,
            clock,
            key_deriver,
            config,
            slots: Mutex::new(SlotTable::default()),
        }
    }

    /// 認証情報に対応する認証済みセッションを返す
    ///
    /// # Errors
    ///
    /// - 上流へのログインに失敗した場合は [`SessionError::Authentication`]
    pub async fn resolve(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn UpstreamSession>, SessionError> {
        self.resolve_with_outcome(credentials)
            .await
            .map(|(session, _)| session)
    }

    /// [`resolve`](Self::resolve) と同じだが、キャッシュを再利用したかも返す
    #[tracing::instrument(skip_all, fields(email = %credentials.email()))]
    pub async fn resolve_with_outcome(
        &self,
        credentials: &Credentials,
    ) -> Result<(Arc<dyn UpstreamSession>, Resolution), SessionError> {
        let key = self.key_deriver.derive(credentials)?;
        let slot = self.acquire_slot(key);
        let mut cached = slot.lock().await;

        if let Some(entry) = cached.as_ref() {
            if entry.created_at.elapsed() < self.config.ttl {
                match entry.session.probe(self.clock.today()).await {
                    Ok(()) => {
                        tracing::debug!("キャッシュ済みセッションを再利用します");
                        return Ok((entry.session.clone(), Resolution::Cached));
                    }
                    Err(e) => {
                        tracing::info!(
                            error.kind = e.kind(),
                            "セッションの生存確認に失敗したため再ログインします: {}",
                            e
                        );
                    }
                }
            } else {
                tracing::info!("セッションの有効期限が切れたため再ログインします");
            }
        }

        match self.authenticator.login(credentials).await {
            Ok(session) => {
                *cached = Some(CachedSession {
                    session:    session.clone(),
                    created_at: Instant::now(),
                });
                tracing::info!("上流サービスにログインし、新しいセッションを作成しました");
                Ok((session, Resolution::LoggedIn))
            }
            Err(e) => {
                tracing::warn!(
                    error.category = "upstream",
                    error.kind = e.kind(),
                    "上流サービスへのログインに失敗しました: {}",
                    e
                );
                if cached.is_none() {
                    self.release_empty_slot(key, &slot);
                }
                Err(SessionError::Authentication(e))
            }
        }
    }

    /// キャッシュ中のエントリ数（空のスロットを含む）
    pub fn len(&self) -> usize {
        self.table().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> std::sync::MutexGuard<'_, SlotTable> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// キーに対応するスロットを取得する（無ければ作成する）
    ///
    /// 作成時に上限に達していれば、最も長く使われていないスロットを破棄する。
    fn acquire_slot(&self, key: CredentialKey) -> Slot {
        let mut table = self.table();
        table.tick += 1;
        let tick = table.tick;

        if let Some(entry) = table.entries.get_mut(&key) {
            entry.last_used = tick;
            return entry.slot.clone();
        }

        if table.entries.len() >= self.config.max_entries {
            let oldest = table
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| *key);
            if let Some(oldest) = oldest {
                table.entries.remove(&oldest);
                tracing::debug!("キャッシュの上限に達したため最も古いセッションを破棄しました");
            }
        }

        let slot: Slot = Arc::new(tokio::sync::Mutex::new(None));
        table.entries.insert(
            key,
            SlotEntry {
                slot:      slot.clone(),
                last_used: tick,
            },
        );
        slot
    }

    /// ログインに失敗した空のスロットを取り除く
    fn release_empty_slot(&self, key: CredentialKey, slot: &Slot) {
        let mut table = self.table();
        if table
            .entries
            .get(&key)
            .is_some_and(|entry| Arc::ptr_eq(&entry.slot, slot))
        {
            table.entries.remove(&key);
        }
    }
}
