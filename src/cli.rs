use crate::catalog::{
    entity_url, fetch_detail, filter_by_name, load_catalog, CatalogSource, HttpCatalog,
};
use crate::config::Config;
use crate::data::Entity;
use crate::error::{AppError, Result};
use crate::server;
use crate::versus::{build_comparison, Advantage, Comparison};

pub const USAGE: &str = "usage: dexvs <serve|list|show|compare>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    List,
    Show,
    Compare,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("list") => Some(Command::List),
        Some("show") => Some(Command::Show),
        Some("compare") => Some(Command::Compare),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = Config::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&config),
        Some(Command::List) => handle_list(&config, args),
        Some(Command::Show) => handle_show(&config, args),
        Some(Command::Compare) => handle_compare(&config, args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_serve(config: &Config) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_list(config: &Config, args: &[String]) -> i32 {
    let filter = args.get(2).map(String::as_str).unwrap_or("");
    let outcome = block_on(config, |source| async move {
        let roster = load_catalog(&source, &config.index_url(), config.batch_size, |progress| {
            eprintln!(
                "batch {}/{}: {} of {} loaded",
                progress.batch_index,
                progress.batch_count,
                progress.loaded_count,
                progress.manifest_len
            );
        })
        .await?;
        Ok(roster)
    });

    match outcome {
        Ok(roster) => {
            let matches = filter_by_name(&roster, filter);
            for entity in &matches {
                println!("#{}\t{}", entity.id, entity.name);
            }
            eprintln!("{} of {} entities", matches.len(), roster.len());
            0
        }
        Err(err) => {
            eprintln!("list failed: {err}");
            1
        }
    }
}

fn handle_show(config: &Config, args: &[String]) -> i32 {
    let Some(key) = args.get(2) else {
        eprintln!("usage: dexvs show <name|id>");
        return 2;
    };

    let outcome = block_on(config, |source| async move {
        let entity = fetch_entity(&source, config, key).await?;
        let view = fetch_detail(&source, entity, &config.language).await;
        Ok(serde_json::to_string_pretty(&view)?)
    });

    match outcome {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("show failed: {err}");
            1
        }
    }
}

fn handle_compare(config: &Config, args: &[String]) -> i32 {
    let positional: Vec<&String> = args
        .iter()
        .skip(2)
        .filter(|arg| !arg.starts_with("--"))
        .collect();
    let (Some(left), Some(right)) = (positional.first().copied(), positional.get(1).copied())
    else {
        eprintln!("usage: dexvs compare <left> <right> [--table]");
        return 2;
    };
    let as_table = args.iter().any(|arg| arg == "--table");

    let outcome = block_on(config, |source| async move {
        let left = fetch_entity(&source, config, left).await?;
        let right = fetch_entity(&source, config, right).await?;
        Ok(build_comparison(&left, &right))
    });

    let comparison = match outcome {
        Ok(comparison) => comparison,
        Err(err) => {
            eprintln!("compare failed: {err}");
            return 1;
        }
    };

    if as_table {
        print!("{}", comparison_table(&comparison));
        return 0;
    }
    match serde_json::to_string_pretty(&comparison) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize comparison: {err}");
            1
        }
    }
}

/// Tab-separated view: one row per stat, then the verdict.
pub fn comparison_table(comparison: &Comparison) -> String {
    let mut out = format!(
        "stat\t{}\t{}\tadvantage\tdelta_pct\n",
        comparison.left.name, comparison.right.name
    );
    for line in &comparison.stats {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{:.1}\n",
            line.stat,
            line.left,
            line.right,
            advantage_label(line.comparison.advantage),
            line.comparison.percentage_delta
        ));
    }
    let battle = &comparison.battle;
    out.push_str(&format!(
        "winner\t{}\t{:.1}%\t{}\n",
        battle.winner_name, battle.win_chance, battle.reasoning
    ));
    out
}

fn advantage_label(advantage: Advantage) -> &'static str {
    match advantage {
        Advantage::Left => "left",
        Advantage::Right => "right",
        Advantage::Equal => "equal",
    }
}

async fn fetch_entity<S>(source: &S, config: &Config, key: &str) -> Result<Entity>
where
    S: CatalogSource + ?Sized,
{
    Ok(source.fetch_entity(&entity_url(&config.api_base, key)).await?)
}

fn block_on<T, F, Fut>(config: &Config, run: F) -> Result<T>
where
    F: FnOnce(HttpCatalog) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let runtime = tokio::runtime::Runtime::new()?;
    let source = HttpCatalog::new(config.timeout).map_err(|e| AppError::Client(e.to_string()))?;
    runtime.block_on(run(source))
}
