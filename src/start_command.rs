use chrono::{DateTime, Utc};
use log::info;

use crate::datetime;
use crate::datetime::parse_timestamp;
use crate::repository::TrackingRepository;
use crate::tracker::{SessionTracker, StartTrackingRequest, StartTrackingResult};

/// `start`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct StartArgs {
    #[clap(help = "Name of the project to track")]
    project: String,

    #[clap(
        short = 'o',
        long = "organization",
        help = "Organization (workspace) name"
    )]
    organization: String,

    #[clap(
        short = 'u',
        long = "user",
        help = "Name of the user tracking the project"
    )]
    user: String,

    #[clap(
        long = "at",
        help = "Custom start time in RFC3339 format",
        parse(try_from_str = parse_timestamp),
    )]
    at: Option<DateTime<Utc>>,
}

pub struct StartCommand<'a, T: TrackingRepository> {
    tracker: SessionTracker<'a, T>,
}

impl<'a, T: TrackingRepository> StartCommand<'a, T> {
    /// 新しい`StartCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - 永続化層へアクセスするためのリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self {
            tracker: SessionTracker::new(repository),
        }
    }

    /// `start`サブコマンドの処理を行う。
    ///
    /// 開始時刻が指定されていない場合は現在時刻を利用する。
    ///
    /// # Arguments
    ///
    /// * `start` - `start`サブコマンドの引数
    pub async fn run(&self, start: StartArgs) -> StartTrackingResult {
        let start_time = start.at.unwrap_or_else(datetime::now);
        let request = StartTrackingRequest {
            organization_name: start.organization,
            user_name: start.user,
            project_name: start.project,
            start_time,
        };
        info!(
            "Start tracking {} for {}/{} at {}",
            request.project_name, request.organization_name, request.user_name, request.start_time
        );

        self.tracker.start_tracking(&request).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::{StartArgs, StartCommand};
    use crate::datetime::mock_datetime;
    use crate::repository::MockTrackingRepository;
    use crate::tracker::StartTrackingResult;

    /// 引数の内容がそのままリクエストへ渡されることを確認する。
    #[tokio::test]
    async fn test_start_command_with_time() {
        let start_time = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let args = StartArgs {
            project: "proj_a".to_string(),
            organization: "acme".to_string(),
            user: "alice".to_string(),
            at: Some(start_time),
        };
        let mut repository = MockTrackingRepository::new();
        repository
            .expect_find_open_entry()
            .withf(|organization, user| organization == "acme" && user == "alice")
            .times(1)
            .returning(|_, _| Ok(None));
        repository
            .expect_add_time_entry()
            .withf(move |_, _, project, start| project == "proj_a" && *start == start_time)
            .times(1)
            .returning(|_, _, _, _| Ok(Some(Uuid::new_v4())));

        let command = StartCommand::new(&repository);
        let result = command.run(args).await;

        assert_eq!(result, StartTrackingResult::Success);
    }

    /// 開始時刻を指定しない場合、現在時刻が利用されることを確認する。
    #[tokio::test]
    async fn test_start_command_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();
        mock_datetime::set_mock_time(now);

        let args = StartArgs {
            project: "proj_a".to_string(),
            organization: "acme".to_string(),
            user: "alice".to_string(),
            at: None,
        };
        let mut repository = MockTrackingRepository::new();
        repository
            .expect_find_open_entry()
            .times(1)
            .returning(|_, _| Ok(None));
        repository
            .expect_add_time_entry()
            .withf(move |_, _, _, start| *start == now)
            .times(1)
            .returning(|_, _, _, _| Ok(Some(Uuid::new_v4())));

        let command = StartCommand::new(&repository);
        let result = command.run(args).await;

        assert_eq!(result, StartTrackingResult::Success);

        mock_datetime::clear_mock_time();
    }
}
