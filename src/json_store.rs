use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{OpenEntry, Organization, Project, TimeEntry, User};
use crate::repository::TrackingRepository;

/// ストアファイルに保存するデータ全体。
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    organizations: Vec<Organization>,
    users: Vec<User>,
    projects: Vec<Project>,
    time_entries: Vec<TimeEntry>,
}

impl StoreData {
    fn organization(&self, name: &str) -> Option<&Organization> {
        self.organizations
            .iter()
            .find(|organization| organization.name == name)
    }

    fn user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|user| user.name == name)
    }

    fn project(&self, organization_id: Uuid, name: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|project| project.organization_id == organization_id && project.name == name)
    }

    // (組織, ユーザー)のopenな記録のうち、開始時刻が最も新しいものを返す
    fn open_entry(&self, organization_id: Uuid, user_id: Uuid) -> Option<&TimeEntry> {
        self.time_entries
            .iter()
            .filter(|entry| {
                entry.end.is_none()
                    && entry.user_id == user_id
                    && self
                        .projects
                        .iter()
                        .any(|project| {
                            project.id == entry.project_id
                                && project.organization_id == organization_id
                        })
            })
            .max_by_key(|entry| entry.start)
    }
}

/// JSONファイルを永続化層とするストア。
///
/// 各操作は読み込み → 変更 → 書き戻しを1サイクルで行う。コマンドごとに独立した
/// 短命な処理として動作するため、プロセス内に共有状態を持たない。
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// 新しい`JsonStore`を返す。
    ///
    /// # Arguments
    /// * `path` - ストアファイルのパス。存在しない場合は空のストアとして扱う
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 組織を登録し、そのIDを返す。
    ///
    /// 同名の組織が既に存在する場合は既存のIDを返す。
    /// 管理用の操作であり、`TrackingRepository`の契約には含まれない。
    pub async fn add_organization(&self, name: &str, platform: &str) -> Result<Uuid> {
        let mut data = self.load()?;
        if let Some(organization) = data.organization(name) {
            warn!("Organization {} already exists. It won't be added.", name);
            return Ok(organization.id);
        }

        let organization = Organization {
            id: Uuid::new_v4(),
            name: name.to_string(),
            platform: platform.to_string(),
        };
        let organization_id = organization.id;
        data.organizations.push(organization);
        self.save(&data)?;
        info!("Organization {} added.", name);

        Ok(organization_id)
    }

    /// ユーザーを登録し、そのIDを返す。
    ///
    /// 同名のユーザーが既に存在する場合は既存のIDを返す。
    pub async fn add_user(&self, name: &str, external_id: &str) -> Result<Uuid> {
        let mut data = self.load()?;
        if let Some(user) = data.user(name) {
            warn!("User {} already exists. It won't be added.", name);
            return Ok(user.id);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            external_id: external_id.to_string(),
        };
        let user_id = user.id;
        data.users.push(user);
        self.save(&data)?;
        info!("User {} added.", name);

        Ok(user_id)
    }

    /// ストアファイルを読み込む。ファイルが存在しない場合は空のデータを返す。
    fn load(&self) -> Result<StoreData> {
        if !self.path.exists() {
            return Ok(StoreData::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file: {}", self.path.display()))?;
        let data = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store file: {}", self.path.display()))?;

        Ok(data)
    }

    /// ストアファイルへ書き戻す。
    ///
    /// 一時ファイルへ書き出してからrenameし、書き込み途中のファイルが残らないようにする。
    fn save(&self, data: &StoreData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(data).context("Failed to serialize store data")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write store file: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace store file: {}", self.path.display()))?;

        Ok(())
    }

    /// テストから記録の状態を検証するためのアクセサ。
    #[cfg(test)]
    pub fn all_entries(&self) -> Result<Vec<TimeEntry>> {
        Ok(self.load()?.time_entries)
    }

    /// テストから記録を直接投入するためのアクセサ。
    ///
    /// openな記録の件数に関する不変条件の検査は行わない。
    #[cfg(test)]
    pub fn insert_entries(&self, entries: Vec<TimeEntry>) -> Result<()> {
        let mut data = self.load()?;
        data.time_entries.extend(entries);
        self.save(&data)
    }
}

#[async_trait]
impl TrackingRepository for JsonStore {
    async fn get_organization(&self, name: &str) -> Result<Option<Organization>> {
        Ok(self.load()?.organization(name).cloned())
    }

    async fn get_user(&self, name: &str) -> Result<Option<User>> {
        Ok(self.load()?.user(name).cloned())
    }

    async fn find_open_entry(
        &self,
        organization_name: &str,
        user_name: &str,
    ) -> Result<Option<OpenEntry>> {
        let data = self.load()?;
        let organization = match data.organization(organization_name) {
            Some(organization) => organization,
            None => return Ok(None),
        };
        let user = match data.user(user_name) {
            Some(user) => user,
            None => return Ok(None),
        };

        let entry = match data.open_entry(organization.id, user.id) {
            Some(entry) => entry.clone(),
            None => return Ok(None),
        };
        let project_name = data
            .projects
            .iter()
            .find(|project| project.id == entry.project_id)
            .map(|project| project.name.clone())
            .with_context(|| format!("Project {} not found for entry {}", entry.project_id, entry.id))?;

        Ok(Some(OpenEntry {
            entry,
            project_name,
        }))
    }

    async fn add_project(
        &self,
        organization_name: &str,
        project_name: &str,
    ) -> Result<Option<Uuid>> {
        let mut data = self.load()?;
        let organization = match data.organization(organization_name) {
            Some(organization) => organization,
            None => return Ok(None),
        };
        let organization_id = organization.id;

        // 同名のプロジェクトが組織内に存在する場合は既存のIDを返す(冪等)
        if let Some(project) = data.project(organization_id, project_name) {
            info!(
                "Project {} already exists for organization {}. It won't be added.",
                project_name, organization_name
            );
            return Ok(Some(project.id));
        }

        let project = Project {
            id: Uuid::new_v4(),
            name: project_name.to_string(),
            organization_id,
        };
        let project_id = project.id;
        data.projects.push(project);
        self.save(&data)?;

        Ok(Some(project_id))
    }

    async fn add_time_entry(
        &self,
        organization_name: &str,
        user_name: &str,
        project_name: &str,
        start_time: DateTime<Utc>,
    ) -> Result<Option<Uuid>> {
        let mut data = self.load()?;
        let organization = match data.organization(organization_name) {
            Some(organization) => organization,
            None => {
                warn!(
                    "Organization {} doesn't exist in our system. Entry won't be logged.",
                    organization_name
                );
                return Ok(None);
            }
        };
        let organization_id = organization.id;
        let user = match data.user(user_name) {
            Some(user) => user,
            None => {
                warn!(
                    "User {} doesn't exist in our system. Entry won't be logged.",
                    user_name
                );
                return Ok(None);
            }
        };
        let user_id = user.id;
        let project = match data.project(organization_id, project_name) {
            Some(project) => project,
            None => {
                warn!(
                    "Project {} couldn't be found for organization {}. Entry won't be logged.",
                    project_name, organization_name
                );
                return Ok(None);
            }
        };
        let project_id = project.id;

        // (組織, ユーザー)につきopenな記録は高々1件という不変条件をストア側でも守る
        if data.open_entry(organization_id, user_id).is_some() {
            bail!(
                "User {}/{} already has an open time entry",
                organization_name,
                user_name
            );
        }

        let entry = TimeEntry {
            id: Uuid::new_v4(),
            project_id,
            user_id,
            start: start_time,
            end: None,
        };
        let entry_id = entry.id;
        data.time_entries.push(entry);
        self.save(&data)?;

        Ok(Some(entry_id))
    }

    async fn close_time_entry(&self, entry_id: Uuid, end_time: DateTime<Utc>) -> Result<()> {
        let mut data = self.load()?;
        let entry = data
            .time_entries
            .iter_mut()
            .find(|entry| entry.id == entry_id)
            .with_context(|| format!("Time entry {} not found", entry_id))?;

        // 既にcloseされた記録への再closeは何もしない(リトライ時の安全策)
        if entry.end.is_some() {
            warn!("Time entry {} is already closed.", entry_id);
            return Ok(());
        }

        entry.end = Some(end_time);
        self.save(&data)?;

        Ok(())
    }
}
