use anyhow::{Context, Result};
use uuid::Uuid;

use crate::json_store::JsonStore;

/// `add-organization`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct AddOrganizationArgs {
    #[clap(help = "Name of the organization to add")]
    name: String,

    #[clap(
        short = 'p',
        long = "platform",
        default_value = "slack",
        help = "Originating chat platform tag"
    )]
    platform: String,
}

/// `add-user`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct AddUserArgs {
    #[clap(help = "Name of the user to add")]
    name: String,

    #[clap(
        short = 'e',
        long = "external-id",
        help = "User identifier on the chat platform"
    )]
    external_id: Option<String>,
}

/// `add-organization`サブコマンドの処理を行う。
///
/// 組織の登録は管理用の操作で、記録ロジックの外側でストアを直接操作する。
/// 登録された(または既存の)組織のIDを返す。
///
/// # Arguments
///
/// * `store` - 登録先のストア
/// * `add_organization` - `add-organization`サブコマンドの引数
pub async fn add_organization_command(
    store: &JsonStore,
    add_organization: AddOrganizationArgs,
) -> Result<Uuid> {
    store
        .add_organization(&add_organization.name, &add_organization.platform)
        .await
        .context("Failed to add organization")
}

/// `add-user`サブコマンドの処理を行う。
///
/// プラットフォーム側の識別子が指定されていない場合は、ユーザー名をそのまま利用する。
/// 登録された(または既存の)ユーザーのIDを返す。
///
/// # Arguments
///
/// * `store` - 登録先のストア
/// * `add_user` - `add-user`サブコマンドの引数
pub async fn add_user_command(store: &JsonStore, add_user: AddUserArgs) -> Result<Uuid> {
    let external_id = add_user
        .external_id
        .unwrap_or_else(|| add_user.name.clone());
    store
        .add_user(&add_user.name, &external_id)
        .await
        .context("Failed to add user")
}

#[cfg(test)]
mod tests {
    use super::{
        add_organization_command, add_user_command, AddOrganizationArgs, AddUserArgs,
    };
    use crate::json_store::JsonStore;
    use crate::repository::TrackingRepository;

    /// 組織が登録され、そのIDが返ることを確認する。
    #[tokio::test]
    async fn test_add_organization_command() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("store.json"));
        let args = AddOrganizationArgs {
            name: "acme".to_string(),
            platform: "slack".to_string(),
        };

        let organization_id = add_organization_command(&store, args).await.unwrap();

        let organization = store.get_organization("acme").await.unwrap().unwrap();
        assert_eq!(organization.id, organization_id);
        assert_eq!(organization.platform, "slack");
    }

    /// 識別子を指定しない場合、ユーザー名が識別子として利用されることを確認する。
    #[tokio::test]
    async fn test_add_user_command_without_external_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("store.json"));
        let args = AddUserArgs {
            name: "alice".to_string(),
            external_id: None,
        };

        let user_id = add_user_command(&store, args).await.unwrap();

        let user = store.get_user("alice").await.unwrap().unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.external_id, "alice");
    }
}
