use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::model::{OpenEntry, Organization, User};

/// 時間記録の永続化層を表すtrait。
///
/// 参照系は「見つからない」と「ストレージ障害」を区別するため`Result<Option<_>>`を返す。
/// テストでは`MockTrackingRepository`を利用してストレージなしで判定ロジックを検証する。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TrackingRepository {
    /// 組織を名前で検索する。名前は完全一致で比較する。
    async fn get_organization(&self, name: &str) -> Result<Option<Organization>>;

    /// ユーザーを名前で検索する。
    ///
    /// 検索は組織をまたいだ完全一致で行う。そのため複数の組織に同名のユーザーが
    /// 存在すると、別組織のユーザーに記録が紐づく可能性がある(既知の課題として保持)。
    async fn get_user(&self, name: &str) -> Result<Option<User>>;

    /// 指定した(組織, ユーザー)のopenな記録を検索する。
    ///
    /// 複数openな記録が存在した場合は、開始時刻が最も新しいものを返す。
    async fn find_open_entry(
        &self,
        organization_name: &str,
        user_name: &str,
    ) -> Result<Option<OpenEntry>>;

    /// プロジェクトを登録し、そのIDを返す。
    ///
    /// 同名のプロジェクトが組織内に既に存在する場合は、既存のIDを返し新規作成しない。
    /// 組織が見つからない場合は`Ok(None)`を返す。
    async fn add_project(
        &self,
        organization_name: &str,
        project_name: &str,
    ) -> Result<Option<Uuid>>;

    /// 新しい時間記録をopen状態で登録し、そのIDを返す。
    ///
    /// 組織・ユーザー・プロジェクトのいずれかが解決できない場合は`Ok(None)`を返す。
    async fn add_time_entry(
        &self,
        organization_name: &str,
        user_name: &str,
        project_name: &str,
        start_time: DateTime<Utc>,
    ) -> Result<Option<Uuid>>;

    /// 指定したIDの記録に終了時刻を設定してcloseする。
    ///
    /// IDが存在しない場合はエラーを返す。既にcloseされている記録は変更しない。
    async fn close_time_entry(&self, entry_id: Uuid, end_time: DateTime<Utc>) -> Result<()>;
}
