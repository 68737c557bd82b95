use std::io::Write;

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::tracker::{StartTrackingResult, StopTrackingResult};

/// Consoleに操作結果を表示するためのtrait。
pub trait OutcomePresenter {
    /// 記録開始の結果を表示する。
    fn show_start_result(&mut self, result: StartTrackingResult) -> Result<()>;

    /// 記録停止の結果を表示する。
    fn show_stop_result(&mut self, result: StopTrackingResult) -> Result<()>;

    /// プロジェクト登録の結果を表示する。
    fn show_added_project(&mut self, project_id: Option<Uuid>) -> Result<()>;

    /// 組織登録の結果を表示する。
    fn show_added_organization(&mut self, organization_id: Uuid) -> Result<()>;

    /// ユーザー登録の結果を表示する。
    fn show_added_user(&mut self, user_id: Uuid) -> Result<()>;
}

/// 操作結果を1行のステータス文字列で表示する。
///
/// 呼び出し元にはスタックトレースや内部エラーの詳細は見せず、短い定型文のみを返す。
pub struct ConsoleStatusLine<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleStatusLine<'a, W> {
    /// 新しい`ConsoleStatusLine`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    fn show(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message)
            .with_context(|| format!("Failed to write message: {}", message))
    }
}

impl<'a, W: Write> OutcomePresenter for ConsoleStatusLine<'a, W> {
    fn show_start_result(&mut self, result: StartTrackingResult) -> Result<()> {
        let message = match result {
            StartTrackingResult::Success => "Project Started.",
            StartTrackingResult::Failure => "Project Start FAILED.",
            StartTrackingResult::ProjectAlreadyStarted => "Project Already Being Tracked.",
        };

        self.show(message)
    }

    fn show_stop_result(&mut self, result: StopTrackingResult) -> Result<()> {
        let message = match result {
            StopTrackingResult::Success => "Project Stopped.",
            StopTrackingResult::Failure => "Project Stop FAILED.",
            StopTrackingResult::NoOpenProjects => "User has no open projects.",
        };

        self.show(message)
    }

    fn show_added_project(&mut self, project_id: Option<Uuid>) -> Result<()> {
        match project_id {
            Some(_) => self.show("Project Added."),
            None => self.show("Project Add FAILED."),
        }
    }

    fn show_added_organization(&mut self, organization_id: Uuid) -> Result<()> {
        self.show(&format!("Organization Added: {}", organization_id))
    }

    fn show_added_user(&mut self, user_id: Uuid) -> Result<()> {
        self.show(&format!("User Added: {}", user_id))
    }
}
