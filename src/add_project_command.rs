use log::info;
use uuid::Uuid;

use crate::repository::TrackingRepository;
use crate::tracker::{AddProjectRequest, SessionTracker};

/// `add-project`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct AddProjectArgs {
    #[clap(help = "Name of the project to add")]
    project: String,

    #[clap(
        short = 'o',
        long = "organization",
        help = "Organization (workspace) name"
    )]
    organization: String,
}

pub struct AddProjectCommand<'a, T: TrackingRepository> {
    tracker: SessionTracker<'a, T>,
}

impl<'a, T: TrackingRepository> AddProjectCommand<'a, T> {
    /// 新しい`AddProjectCommand`を返す。
    pub fn new(repository: &'a T) -> Self {
        Self {
            tracker: SessionTracker::new(repository),
        }
    }

    /// `add-project`サブコマンドの処理を行う。
    ///
    /// 登録された(または既存の)プロジェクトのIDを返す。失敗した場合は`None`を返す。
    ///
    /// # Arguments
    ///
    /// * `add_project` - `add-project`サブコマンドの引数
    pub async fn run(&self, add_project: AddProjectArgs) -> Option<Uuid> {
        let request = AddProjectRequest {
            organization_name: add_project.organization,
            project_name: add_project.project,
        };
        info!(
            "Add project {} to {}",
            request.project_name, request.organization_name
        );

        self.tracker.add_project(&request).await
    }
}
