//! Train command - Train one tabular agent against random opponents

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    analysis::CurveSummary,
    cli::{
        config::LearningArgs,
        output::{format_number, print_kv, print_section, print_value_table},
    },
    export,
    pipeline::{
        AGENT_SEAT, JsonlObserver, MetricsObserver, ProgressObserver, TdPlayer, TrainingPipeline,
        TrainingResult,
    },
    q_learning::{SavedTdAgent, TrainingMetadata, UpdateRule},
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    rule: String,
    players: usize,
    episodes: usize,
    wins: usize,
    final_win_rate: f64,
    win_rate: CurveSummary,
    reward: CurveSummary,
    final_epsilon: f64,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    learning_rate: f64,
    discount: f64,
    epsilon: f64,
    epsilon_decay: f64,
    seed: Option<u64>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separators or a missing filename name a directory.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(about = "Train a tabular agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Update rule (q-learning, double-q-learning, sarsa, td0)
    #[arg(default_value = "q-learning")]
    pub rule: UpdateRule,

    /// Players at the table, the agent included (2-4)
    #[arg(long, short = 'p', default_value_t = 4)]
    pub players: usize,

    #[command(flatten)]
    pub learning: LearningArgs,

    /// Output file for the trained agent (MessagePack)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional CSV file for the per-episode history
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Print the learned value table(s)
    #[arg(long, default_value_t = false)]
    pub show_table: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let agent = args
        .learning
        .agent_config(args.rule)
        .build()
        .context("invalid agent configuration")?;
    let config = args.learning.training_config(args.players);

    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    print_section(&format!("Training {}", args.rule.name()));
    print_kv("Players", &args.players.to_string());
    print_kv("Episodes", &format_number(config.episodes));
    print_kv("Learning rate", &args.learning.learning_rate.to_string());
    print_kv("Discount", &args.learning.discount.to_string());
    print_kv(
        "Exploration",
        &format!(
            "{} (decay {})",
            args.learning.epsilon, args.learning.epsilon_decay
        ),
    );

    let metrics = MetricsObserver::new(AGENT_SEAT);
    let metrics_handle = metrics.handle();

    let mut pipeline = TrainingPipeline::new(config).with_observer(Box::new(metrics));
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        ensure_parent(path)?;
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let mut player = TdPlayer::new(agent, args.rule.name().to_string());
    let result = pipeline.run(&mut player).context("training failed")?;
    let metrics = metrics_handle.summary()?;

    print_section("Training Complete");
    print_kv("Wins", &format!("{} / {}", result.wins, result.episodes));
    print_kv("Final win rate", &format!("{:.1}%", result.win_rate()));
    let win_rate = result.win_rate_summary();
    print_kv(
        "Win rate curve",
        &format!("mean {:.2}% std {:.2}", win_rate.mean, win_rate.std_dev),
    );
    print_kv("Avg reward", &format!("{:.3}", metrics.avg_reward));
    print_kv("Avg turns", &format!("{:.1}", metrics.avg_turns));
    print_kv(
        "Explored",
        &format!("{:.1}% of decisions", metrics.exploration_share * 100.0),
    );
    print_kv("Captures / deaths", &format!("{} / {}", metrics.captures, metrics.deaths));
    print_kv("Final epsilon", &format!("{:.4}", player.agent().epsilon()));

    if args.show_table {
        print_value_table("Q1", player.agent().q_table());
        if let Some(q2) = player.agent().q2_table() {
            print_value_table("Q2", q2);
        }
    }

    if let Some(path) = &args.output {
        ensure_parent(path)?;
        let metadata = TrainingMetadata {
            episodes: result.episodes,
            players: result.players,
            wins: result.wins,
            seed: args.learning.seed,
        };
        SavedTdAgent::from_agent(player.agent(), metadata).save_to_file(path)?;
        println!("\n✓ Agent saved to: {}", path.display());
    }

    if let Some(path) = &args.history {
        ensure_parent(path)?;
        export::write_history(path, &result)
            .with_context(|| format!("failed to write history to {}", path.display()))?;
        println!("History written to {}", path.display());
    }

    if let Some((summary_path, normalized)) = summary_target {
        if normalized {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }
        ensure_parent(&summary_path)?;
        write_summary(&summary_path, &args, &result, player.agent().epsilon())?;
        println!("Summary written to {}", summary_path.display());
    }

    Ok(())
}

fn write_summary(
    path: &Path,
    args: &TrainArgs,
    result: &TrainingResult,
    final_epsilon: f64,
) -> Result<()> {
    let summary = TrainingSummaryFile {
        rule: result.rule.clone(),
        players: result.players,
        episodes: result.episodes,
        wins: result.wins,
        final_win_rate: result.win_rate(),
        win_rate: result.win_rate_summary(),
        reward: result.reward_summary(),
        final_epsilon,
        metadata: SummaryMetadata {
            learning_rate: args.learning.learning_rate,
            discount: args.learning.discount,
            epsilon: args.learning.epsilon,
            epsilon_decay: args.learning.epsilon_decay,
            seed: args.learning.seed,
        },
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create summary file {}", path.display()))?;
    to_writer_pretty(file, &summary)?;
    Ok(())
}
