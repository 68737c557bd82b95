use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};

mod add_project_command;
mod admin_command;
mod console;
mod datetime;
mod json_store;
mod model;
mod repository;
mod start_command;
mod stop_command;
mod tracker;

use add_project_command::{AddProjectArgs, AddProjectCommand};
use admin_command::{
    add_organization_command, add_user_command, AddOrganizationArgs, AddUserArgs,
};
use console::{ConsoleStatusLine, OutcomePresenter};
use json_store::JsonStore;
use start_command::{StartArgs, StartCommand};
use stop_command::{StopArgs, StopCommand};

/// プロジェクトの作業時間を記録するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- start proj_a -o acme -u alice
/// $ cargo run -- stop -o acme -u alice
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(subcommand)]
    subcommand: SubCommands,

    #[clap(
        short = 'f',
        long = "file",
        help = "Path to the store file",
        global = true
    )]
    file: Option<PathBuf>,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    Start(StartArgs),
    Stop(StopArgs),
    AddProject(AddProjectArgs),
    AddOrganization(AddOrganizationArgs),
    AddUser(AddUserArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger().context("Failed to set up logger")?;

    let args = Args::parse();
    let store_path = match args.file {
        Some(path) => path,
        None => default_store_path().context("Failed to resolve default store path")?,
    };
    let store = JsonStore::new(store_path);

    let mut stdout = io::stdout();
    let mut presenter = ConsoleStatusLine::new(&mut stdout);
    match args.subcommand {
        SubCommands::Start(start) => {
            let result = StartCommand::new(&store).run(start).await;
            presenter.show_start_result(result)?;
        }
        SubCommands::Stop(stop) => {
            let result = StopCommand::new(&store).run(stop).await;
            presenter.show_stop_result(result)?;
        }
        SubCommands::AddProject(add_project) => {
            let project_id = AddProjectCommand::new(&store).run(add_project).await;
            presenter.show_added_project(project_id)?;
        }
        SubCommands::AddOrganization(add_organization) => {
            let organization_id = add_organization_command(&store, add_organization).await?;
            presenter.show_added_organization(organization_id)?;
        }
        SubCommands::AddUser(add_user) => {
            let user_id = add_user_command(&store, add_user).await?;
            presenter.show_added_user(user_id)?;
        }
    }

    Ok(())
}

/// ロガーを初期化する。
///
/// ログレベルは環境変数`RUST_LOG`で変更できる。指定がない場合は`warn`とする。
fn setup_logger() -> Result<()> {
    let level = env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(log::LevelFilter::Warn);
    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("Failed to apply logger settings")?;

    Ok(())
}

/// デフォルトのストアファイルのパスを返す。
fn default_store_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Failed to resolve data directory")?;

    Ok(data_dir.join("trackrs").join("store.json"))
}
