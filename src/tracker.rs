use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use uuid::Uuid;

use crate::repository::TrackingRepository;

/// プロジェクト登録に必要なリクエスト情報。
#[derive(Clone, Debug, PartialEq)]
pub struct AddProjectRequest {
    pub organization_name: String,
    pub project_name: String,
}

/// 記録開始に必要なリクエスト情報。
#[derive(Clone, Debug, PartialEq)]
pub struct StartTrackingRequest {
    pub organization_name: String,
    pub user_name: String,
    pub project_name: String,
    pub start_time: DateTime<Utc>,
}

/// 記録停止に必要なリクエスト情報。
#[derive(Clone, Debug, PartialEq)]
pub struct StopTrackingRequest {
    pub organization_name: String,
    pub user_name: String,
    pub stop_time: DateTime<Utc>,
}

/// 記録開始の結果を表す列挙型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartTrackingResult {
    Success,
    Failure,
    /// 同じプロジェクトが既に記録中のため、何も変更しなかった。
    ProjectAlreadyStarted,
}

/// 記録停止の結果を表す列挙型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopTrackingResult {
    Success,
    Failure,
    /// openな記録が存在しないため、停止する対象がなかった。
    NoOpenProjects,
}

/// 記録セッションの状態遷移を判定する構造体。
///
/// ストレージへは直接アクセスせず、`TrackingRepository`を経由して操作する。
/// 各操作はストレージ障害を内部で捕捉し、`Failure`へ変換して返す。
pub struct SessionTracker<'a, T: TrackingRepository> {
    repository: &'a T,
}

impl<'a, T: TrackingRepository> SessionTracker<'a, T> {
    /// 新しい`SessionTracker`を返す。
    ///
    /// # Arguments
    /// * `repository` - 永続化層へアクセスするためのリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// プロジェクトを登録し、そのIDを返す。
    ///
    /// 同名のプロジェクトが既に存在する場合は既存のIDを返す(冪等)。
    /// 組織が見つからない場合やストレージ障害の場合はログを出力し`None`を返す。
    pub async fn add_project(&self, request: &AddProjectRequest) -> Option<Uuid> {
        info!("Adding project {}...", request.project_name);
        match self
            .repository
            .add_project(&request.organization_name, &request.project_name)
            .await
        {
            Ok(Some(project_id)) => Some(project_id),
            Ok(None) => {
                error!(
                    "Organization {} doesn't exist in our system. Project won't be added.",
                    request.organization_name
                );
                None
            }
            Err(err) => {
                error!("Error when adding project: {:#}", err);
                None
            }
        }
    }

    /// ユーザーのプロジェクト記録を開始する。
    ///
    /// 同じプロジェクトが既に記録中の場合は`ProjectAlreadyStarted`を返し、何も変更しない。
    /// 別のプロジェクトが記録中の場合は、その記録を新しい開始時刻でcloseしてから開始する。
    /// 途中で発生したエラーはここで捕捉し`Failure`として返す。
    pub async fn start_tracking(&self, request: &StartTrackingRequest) -> StartTrackingResult {
        match self.try_start_tracking(request).await {
            Ok(result) => result,
            Err(err) => {
                error!("Error when starting tracking: {:#}", err);
                StartTrackingResult::Failure
            }
        }
    }

    /// ユーザーが現在記録中のプロジェクトを停止する。
    ///
    /// openな記録が存在しない場合は`NoOpenProjects`を返す。
    pub async fn stop_tracking(&self, request: &StopTrackingRequest) -> StopTrackingResult {
        match self.try_stop_tracking(request).await {
            Ok(result) => result,
            Err(err) => {
                error!("Error when stopping tracking: {:#}", err);
                StopTrackingResult::Failure
            }
        }
    }

    // 記録開始の本体。エラーは呼び出し元でFailureに変換する。
    async fn try_start_tracking(
        &self,
        request: &StartTrackingRequest,
    ) -> Result<StartTrackingResult> {
        // openな記録があれば、先にそのプロジェクトを確認する
        info!("Checking for open entries.");
        let open_entry = self
            .repository
            .find_open_entry(&request.organization_name, &request.user_name)
            .await
            .context("Failed to find open time entry")?;

        if let Some(open_entry) = open_entry {
            if open_entry.project_name == request.project_name {
                info!(
                    "User has already started project {}.",
                    request.project_name
                );
                return Ok(StartTrackingResult::ProjectAlreadyStarted);
            }

            // 別プロジェクトの記録中。新しい記録の開始時刻でcloseし、隙間も重なりも作らない
            self.repository
                .close_time_entry(open_entry.entry.id, request.start_time)
                .await
                .with_context(|| {
                    format!("Failed to close open time entry {}", open_entry.entry.id)
                })?;
        }

        info!("Starting tracking...");
        let entry_id = self
            .repository
            .add_time_entry(
                &request.organization_name,
                &request.user_name,
                &request.project_name,
                request.start_time,
            )
            .await
            .context("Failed to add time entry")?;

        Ok(match entry_id {
            Some(_) => StartTrackingResult::Success,
            None => StartTrackingResult::Failure,
        })
    }

    // 記録停止の本体。
    async fn try_stop_tracking(
        &self,
        request: &StopTrackingRequest,
    ) -> Result<StopTrackingResult> {
        info!("Ensuring user already has an entry started.");
        let open_entry = self
            .repository
            .find_open_entry(&request.organization_name, &request.user_name)
            .await
            .context("Failed to find open time entry")?;

        let open_entry = match open_entry {
            Some(open_entry) => open_entry,
            None => {
                info!("User has no entries open.");
                return Ok(StopTrackingResult::NoOpenProjects);
            }
        };

        self.repository
            .close_time_entry(open_entry.entry.id, request.stop_time)
            .await
            .with_context(|| format!("Failed to close time entry {}", open_entry.entry.id))?;

        Ok(StopTrackingResult::Success)
    }
}
