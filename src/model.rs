use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 組織を表す構造体。
///
/// チャットプラットフォームのワークスペースに対応し、ユーザーとプロジェクトの境界となる。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    /// 組織が由来するチャットプラットフォームのタグ(例: `slack`)。
    pub platform: String,
}

/// 時間を記録するユーザーを表す構造体。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// チャットプラットフォーム側のユーザー識別子。
    pub external_id: String,
}

/// 1つの組織に属するプロジェクトを表す構造体。
///
/// プロジェクト名は組織内で一意となる。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub organization_id: Uuid,
}

/// 1回の作業時間の記録を表す構造体。
///
/// `end`が`None`の場合は記録中(open)の状態を表す。
/// 同一の(組織, ユーザー)につきopenな記録は同時に高々1件しか存在しない。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// openな記録と、その記録が属するプロジェクト名の組。
///
/// 記録の判定ロジックはプロジェクト名の比較を行うため、
/// 検索時に解決済みの名前を一緒に返す。
#[derive(Clone, Debug, PartialEq)]
pub struct OpenEntry {
    pub entry: TimeEntry,
    pub project_name: String,
}
