use chrono::{DateTime, Utc};
use log::info;

use crate::datetime;
use crate::datetime::parse_timestamp;
use crate::repository::TrackingRepository;
use crate::tracker::{SessionTracker, StopTrackingRequest, StopTrackingResult};

/// `stop`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct StopArgs {
    #[clap(
        short = 'o',
        long = "organization",
        help = "Organization (workspace) name"
    )]
    organization: String,

    #[clap(
        short = 'u',
        long = "user",
        help = "Name of the user to stop tracking for"
    )]
    user: String,

    #[clap(
        long = "at",
        help = "Custom stop time in RFC3339 format",
        parse(try_from_str = parse_timestamp),
    )]
    at: Option<DateTime<Utc>>,
}

pub struct StopCommand<'a, T: TrackingRepository> {
    tracker: SessionTracker<'a, T>,
}

impl<'a, T: TrackingRepository> StopCommand<'a, T> {
    /// 新しい`StopCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - 永続化層へアクセスするためのリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self {
            tracker: SessionTracker::new(repository),
        }
    }

    /// `stop`サブコマンドの処理を行う。
    ///
    /// 停止時刻が指定されていない場合は現在時刻で記録をcloseする。
    ///
    /// # Arguments
    ///
    /// * `stop` - `stop`サブコマンドの引数
    pub async fn run(&self, stop: StopArgs) -> StopTrackingResult {
        let stop_time = stop.at.unwrap_or_else(datetime::now);
        let request = StopTrackingRequest {
            organization_name: stop.organization,
            user_name: stop.user,
            stop_time,
        };
        info!(
            "Stop tracking for {}/{} at {}",
            request.organization_name, request.user_name, request.stop_time
        );

        self.tracker.stop_tracking(&request).await
    }
}
