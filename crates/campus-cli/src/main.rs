mod logging;

use std::path::PathBuf;

use anyhow::{Context, bail};
use campus::modules::ExamGroupService;
use campus_config::{DatabaseConfig, OracleConfig};
use campus_core::hash_password;
use campus_db::PgPool;
use campus_sync::{
    JobReport, OracleSource, SnapshotSource, SourceSystem, SyncJob, classify_elements, run_all,
    run_job,
};
use clap::{Parser, Subcommand};
use dialoguer::Password;
use dotenvy::dotenv;
use tracing::info;

#[derive(Parser)]
#[command(name = "campus-cli")]
#[command(about = "Campus CLI - Administrative tools for the student portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Pull data from the source system into PostgreSQL
    Sync {
        /// students, elements, grades, situation, laureats or all
        job: String,

        /// Only sync grades of this academic year
        #[arg(short = 'y', long)]
        year: Option<String>,

        /// Read rows from a JSON snapshot instead of Oracle
        #[arg(long, value_name = "FILE")]
        from_json: Option<PathBuf>,
    },
    /// Re-run semester classification on every stored element
    ClassifyElements,
    /// Set the login password of a student
    SetStudentPassword {
        /// Student code (cod_etu)
        cod_etu: String,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Print a bcrypt hash, e.g. for ADMIN_PASSWORD_HASH
    HashPassword {
        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Print the students of a module group
    ResolveGroup {
        /// Module code pattern, e.g. JMDS1%
        module: String,

        /// Group specifier, e.g. "G1 (Amphi A)+G2"; everyone when omitted
        groups: Option<String>,

        /// Only students enrolled this academic year
        #[arg(short = 'y', long)]
        year: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init_console_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { password } => handle_hash_password(password),
        command => {
            let pool = connect().await?;
            let result = run(&pool, command).await;
            campus_db::close_pool(&pool).await;
            result
        }
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let config = DatabaseConfig::from_env()?;
    campus_db::connect(&config)
        .await
        .context("Failed to connect to database")
}

async fn run(pool: &PgPool, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Migrate => {
            campus_db::run_migrations(pool).await?;
            println!("✅ Migrations applied");
            Ok(())
        }
        Commands::Sync {
            job,
            year,
            from_json,
        } => handle_sync(pool, &job, year.as_deref(), from_json).await,
        Commands::ClassifyElements => {
            let (total, changed) = classify_elements(pool).await?;
            println!("✅ Classified {} elements ({} changed)", total, changed);
            Ok(())
        }
        Commands::SetStudentPassword { cod_etu, password } => {
            handle_set_student_password(pool, &cod_etu, password).await
        }
        Commands::ResolveGroup {
            module,
            groups,
            year,
        } => handle_resolve_group(pool, &module, groups.as_deref(), year.as_deref()).await,
        Commands::HashPassword { password } => handle_hash_password(password),
    }
}

async fn handle_sync(
    pool: &PgPool,
    job: &str,
    year: Option<&str>,
    from_json: Option<PathBuf>,
) -> anyhow::Result<()> {
    let source: Box<dyn SourceSystem> = match from_json {
        Some(path) => {
            info!(path = %path.display(), "Syncing from JSON snapshot");
            Box::new(SnapshotSource::from_path(&path).await?)
        }
        None => {
            info!("Syncing from Oracle");
            Box::new(OracleSource::new(OracleConfig::from_env()?))
        }
    };

    let reports = if job.eq_ignore_ascii_case("all") {
        run_all(pool, source.as_ref(), year).await?
    } else {
        let job: SyncJob = job.parse()?;
        vec![run_job(pool, source.as_ref(), job, year).await?]
    };

    for report in &reports {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &JobReport) {
    println!(
        "✅ {:<10} fetched {:>6}  inserted {:>6}  updated {:>6}  unchanged {:>6}  ({} ms)",
        report.job.as_str(),
        report.counts.fetched,
        report.counts.inserted,
        report.counts.updated,
        report.counts.unchanged,
        report.elapsed_ms
    );
}

fn read_password(password: Option<String>) -> anyhow::Result<String> {
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }
    Ok(password)
}

fn handle_hash_password(password: Option<String>) -> anyhow::Result<()> {
    let password = read_password(password)?;
    let hash = hash_password(&password).map_err(|e| e.error)?;
    println!("{}", hash);
    Ok(())
}

async fn handle_set_student_password(
    pool: &PgPool,
    cod_etu: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = read_password(password)?;
    let hash = hash_password(&password).map_err(|e| e.error)?;

    let result =
        sqlx::query("UPDATE students SET password_hash = $2, updated_at = NOW() WHERE cod_etu = $1")
            .bind(cod_etu)
            .bind(&hash)
            .execute(pool)
            .await
            .context("Failed to update student password")?;

    if result.rows_affected() == 0 {
        bail!("Student {} not found", cod_etu);
    }
    info!(cod_etu = %cod_etu, "Student password updated");
    println!("✅ Password updated for student {}", cod_etu);
    Ok(())
}

async fn handle_resolve_group(
    pool: &PgPool,
    module: &str,
    groups: Option<&str>,
    year: Option<&str>,
) -> anyhow::Result<()> {
    let resolved = ExamGroupService::resolve(pool, module, groups, year)
        .await
        .map_err(|e| e.error)?;

    for student in &resolved.students {
        println!(
            "{}\t{}\t{}",
            student.cod_etu, student.lib_nom_pat_ind, student.lib_pr1_ind
        );
    }
    eprintln!("{} students", resolved.total);
    if !resolved.unmatched_groups.is_empty() {
        eprintln!(
            "⚠️  No grouping rule for: {}",
            resolved.unmatched_groups.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sync_arguments() {
        let cli = Cli::parse_from(["campus-cli", "sync", "grades", "--year", "2024"]);
        match cli.command {
            Commands::Sync {
                job,
                year,
                from_json,
            } => {
                assert_eq!(job, "grades");
                assert_eq!(year.as_deref(), Some("2024"));
                assert!(from_json.is_none());
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn test_resolve_group_arguments() {
        let cli = Cli::parse_from(["campus-cli", "resolve-group", "JMDS1%", "G1+G2"]);
        assert!(matches!(
            cli.command,
            Commands::ResolveGroup { ref module, ref groups, year: None }
                if module == "JMDS1%" && groups.as_deref() == Some("G1+G2")
        ));
    }

    #[test]
    fn test_short_password_is_rejected() {
        assert!(read_password(Some("short".to_string())).is_err());
        assert!(read_password(Some("long enough".to_string())).is_ok());
    }
}
