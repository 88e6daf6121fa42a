// ==========================================
// 会众聚会安排系统 - 命令行入口
// ==========================================
// 用法:
//   assignment-engine [--db <path>] <preview|generate|publish|show> [week_start] [选项]
// 结果以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use anyhow::anyhow;
use assignment_engine::app::{get_default_db_path, AppState};
use assignment_engine::engine::GenerationOptions;
use assignment_engine::logging;
use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "assignment-engine")]
#[command(about = "会众聚会安排系统 - 周节目自动安排")]
#[command(version)]
struct Cli {
    /// 数据库路径（缺省时使用用户数据目录）
    #[arg(long, global = true, value_name = "PATH", env = "ASSIGNMENT_ENGINE_DB_PATH")]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// 预览一周安排（不写库）
    Preview {
        #[command(flatten)]
        week: WeekArg,

        #[command(flatten)]
        exclude: ExcludeArg,
    },

    /// 生成并保存一周安排
    Generate {
        #[command(flatten)]
        week: WeekArg,

        #[command(flatten)]
        exclude: ExcludeArg,

        /// 允许覆盖已发布的周
        #[arg(long)]
        overwrite: bool,
    },

    /// 发布一周安排并计入历史
    Publish {
        #[command(flatten)]
        week: WeekArg,
    },

    /// 显示已保存的一周安排
    Show {
        #[command(flatten)]
        week: WeekArg,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
struct WeekArg {
    /// 周起始日期 YYYY-MM-DD（缺省为下一个周一）
    #[arg(value_name = "WEEK_START")]
    week_start: Option<NaiveDate>,
}

impl WeekArg {
    fn resolve(&self) -> NaiveDate {
        self.week_start
            .unwrap_or_else(|| next_monday(Local::now().date_naive()))
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
struct ExcludeArg {
    /// 本周排除的学员（可重复）
    #[arg(long = "exclude", value_name = "STUDENT_ID")]
    student_ids: Vec<String>,
}

impl ExcludeArg {
    fn to_options(&self) -> GenerationOptions {
        GenerationOptions {
            excluded_student_ids: self.student_ids.iter().cloned().collect(),
        }
    }
}

/// 下一个周一（今天是周一则取今天）
fn next_monday(today: NaiveDate) -> NaiveDate {
    let offset = (7 - today.weekday().num_days_from_monday()) % 7;
    today + Duration::days(offset as i64)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", assignment_engine::APP_NAME, assignment_engine::VERSION);
    tracing::info!(db_path = %db_path, command = ?cli.command, "启动");
    tracing::info!("==================================================");

    let state = AppState::new(db_path)?;
    let api = state.assignment_api.clone();

    let output = match &cli.command {
        Command::Preview { week, exclude } => {
            let result = api
                .preview_week_with_options(week.resolve(), &exclude.to_options())
                .await?;
            serde_json::to_string_pretty(&result)?
        }
        Command::Generate {
            week,
            exclude,
            overwrite,
        } => {
            let (generation_id, result) = api
                .generate_week_with_options(week.resolve(), *overwrite, &exclude.to_options())
                .await?;
            serde_json::to_string_pretty(&serde_json::json!({
                "generation_id": generation_id,
                "result": result,
            }))?
        }
        Command::Publish { week } => {
            let week = week.resolve();
            let history_updates = api.publish_week(week).await?;
            serde_json::to_string_pretty(&serde_json::json!({
                "week": week,
                "history_updates": history_updates,
            }))?
        }
        Command::Show { week } => {
            let week = week.resolve();
            let stored = api
                .find_week(week)?
                .ok_or_else(|| anyhow!("周安排(week={})不存在", week))?;
            serde_json::to_string_pretty(&stored)?
        }
    };

    println!("{}", output);
    Ok(())
}
