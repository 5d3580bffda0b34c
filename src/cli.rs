//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};

use crate::adapters::csv_tick_adapter::CsvTickAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::jsonl_sink::JsonlDecisionSink;
use crate::domain::aggregator::{CandleAggregator, EmitThrottle};
use crate::domain::bar::{normalize_timestamp, Timeframe};
use crate::domain::engine;
use crate::domain::error::TickscoreError;
use crate::domain::settings::EngineSettings;
use crate::domain::signal::{CandidateSignal, Side};
use crate::ports::decision_port::DecisionSink;
use crate::ports::tick_port::TickSource;

#[derive(Parser, Debug)]
#[command(
    name = "tickscore",
    about = "Streaming candle aggregation and trade-signal scoring"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate one candidate signal against a candle history file
    Evaluate {
        /// Settings INI; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// CSV of candles/ticks: time,open,high,low,close,volume
        #[arg(long)]
        candles: PathBuf,
        #[arg(long)]
        instrument: String,
        /// BUY or SELL
        #[arg(long)]
        side: Side,
        #[arg(long)]
        entry: Decimal,
        #[arg(long)]
        stop_loss: Decimal,
        #[arg(long)]
        take_profit: Decimal,
        #[arg(long, default_value = "1")]
        size: Decimal,
        /// Reward-to-risk multiple claimed by the signal generator
        #[arg(long, default_value = "1.5")]
        r: Decimal,
        #[arg(long, default_value = "1m")]
        timeframe: Timeframe,
    },
    /// Replay a tick file through the aggregator, optionally re-evaluating
    /// a signal at a bounded cadence
    Replay {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// CSV of ticks: time,open,high,low,close,volume[,complete]
        #[arg(long)]
        ticks: PathBuf,
        #[arg(long)]
        instrument: String,
        #[arg(long, default_value = "1m")]
        timeframe: Timeframe,
        /// Re-evaluate at most once per this many seconds of tick time
        #[arg(long, default_value_t = 60)]
        eval_interval_secs: i64,
        #[arg(long)]
        side: Option<Side>,
        #[arg(long)]
        entry: Option<Decimal>,
        #[arg(long)]
        stop_loss: Option<Decimal>,
        #[arg(long)]
        take_profit: Option<Decimal>,
        #[arg(long, default_value = "1")]
        size: Decimal,
        #[arg(long, default_value = "1.5")]
        r: Decimal,
    },
    /// Validate a settings file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Evaluate {
            config,
            candles,
            instrument,
            side,
            entry,
            stop_loss,
            take_profit,
            size,
            r,
            timeframe,
        } => run_evaluate(
            config.as_deref(),
            &candles,
            CandidateSignal {
                instrument,
                side,
                entry,
                stop_loss,
                take_profit,
                size,
                r,
            },
            timeframe,
        ),
        Command::Replay {
            config,
            ticks,
            instrument,
            timeframe,
            eval_interval_secs,
            side,
            entry,
            stop_loss,
            take_profit,
            size,
            r,
        } => {
            let signal = match build_replay_signal(
                &instrument,
                side,
                entry,
                stop_loss,
                take_profit,
                size,
                r,
            ) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            };
            run_replay(
                config.as_deref(),
                &ticks,
                &instrument,
                timeframe,
                eval_interval_secs,
                signal,
            )
        }
        Command::Validate { config } => run_validate(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn load_settings(config_path: Option<&std::path::Path>) -> Result<EngineSettings, TickscoreError> {
    match config_path {
        None => Ok(EngineSettings::default()),
        Some(path) => {
            let adapter =
                FileConfigAdapter::from_file(path).map_err(|e| TickscoreError::ConfigParse {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            EngineSettings::from_config(&adapter)
        }
    }
}

fn run_evaluate(
    config_path: Option<&std::path::Path>,
    candles_path: &std::path::Path,
    signal: CandidateSignal,
    timeframe: Timeframe,
) -> Result<(), TickscoreError> {
    let settings = load_settings(config_path)?;

    let mut source = CsvTickAdapter::from_file(candles_path, signal.instrument.clone())?;
    let mut aggregator = CandleAggregator::new(signal.instrument.clone(), timeframe.frame_secs());

    let mut ticks = 0usize;
    while let Some(tick) = source.next_tick()? {
        aggregator.ingest(&tick);
        ticks += 1;
    }
    info!(
        ticks,
        bars = aggregator.history().len(),
        "candle history loaded"
    );

    let snapshot = aggregator.snapshot();
    let result = engine::evaluate(&signal, &snapshot, &settings);
    info!(
        instrument = %signal.instrument,
        decision = ?result.decision,
        score_pct = result.score_pct,
        "signal evaluated"
    );

    JsonlDecisionSink::stdout().publish(&result)
}

fn build_replay_signal(
    instrument: &str,
    side: Option<Side>,
    entry: Option<Decimal>,
    stop_loss: Option<Decimal>,
    take_profit: Option<Decimal>,
    size: Decimal,
    r: Decimal,
) -> Result<Option<CandidateSignal>, TickscoreError> {
    match (side, entry, stop_loss, take_profit) {
        (None, None, None, None) => Ok(None),
        (Some(side), Some(entry), Some(stop_loss), Some(take_profit)) => {
            Ok(Some(CandidateSignal {
                instrument: instrument.to_string(),
                side,
                entry,
                stop_loss,
                take_profit,
                size,
                r,
            }))
        }
        _ => Err(TickscoreError::SignalArg {
            field: "side/entry/stop-loss/take-profit".into(),
            reason: "a replay signal needs all four, or none".into(),
        }),
    }
}

fn run_replay(
    config_path: Option<&std::path::Path>,
    ticks_path: &std::path::Path,
    instrument: &str,
    timeframe: Timeframe,
    eval_interval_secs: i64,
    signal: Option<CandidateSignal>,
) -> Result<(), TickscoreError> {
    let settings = load_settings(config_path)?;

    let mut source = CsvTickAdapter::from_file(ticks_path, instrument)?;
    let mut aggregator = CandleAggregator::new(instrument, timeframe.frame_secs());
    let mut throttle = EmitThrottle::per_second();
    let mut sink = JsonlDecisionSink::stdout();

    let mut ticks = 0usize;
    let mut bars_completed = 0usize;
    let mut evaluations = 0usize;
    let mut last_eval_time: Option<i64> = None;

    while let Some(tick) = source.next_tick()? {
        ticks += 1;
        let tick_time = normalize_timestamp(tick.time);
        let outcome = aggregator.ingest(&tick);

        if let Some(closed) = &outcome.finalized {
            bars_completed += 1;
            let when = closed
                .period_start_utc()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| closed.period_start.to_string());
            debug!(instrument, period_start = %when, close = %closed.close, "bar closed");
        }

        if throttle.allow(Instant::now()) {
            info!(
                instrument,
                tf = timeframe.as_str(),
                period_start = outcome.current.period_start,
                close = %outcome.current.close,
                volume = outcome.current.volume,
                "bar update"
            );
        }

        // Bounded evaluation cadence in tick time; recomputing more often
        // would produce the same result for the same bar state.
        if let Some(signal) = &signal {
            let due = match last_eval_time {
                Some(last) => tick_time - last >= eval_interval_secs,
                None => true,
            };
            if due {
                last_eval_time = Some(tick_time);
                let result = engine::evaluate(signal, &aggregator.snapshot(), &settings);
                info!(
                    instrument,
                    decision = ?result.decision,
                    score_pct = result.score_pct,
                    "signal evaluated"
                );
                sink.publish(&result)?;
                evaluations += 1;
            }
        }
    }

    info!(
        instrument,
        ticks,
        bars_completed,
        history = aggregator.history().len(),
        evaluations,
        "replay finished"
    );
    Ok(())
}

fn run_validate(config_path: &std::path::Path) -> Result<(), TickscoreError> {
    let adapter =
        FileConfigAdapter::from_file(config_path).map_err(|e| TickscoreError::ConfigParse {
            file: config_path.display().to_string(),
            reason: e.to_string(),
        })?;
    let settings = EngineSettings::from_config(&adapter)?;

    println!("{} is valid", config_path.display());
    println!(
        "  threshold {}%, rr_min {}, hard band {:?}, soft band {:?}",
        settings.decision_threshold,
        settings.rr_min_target(),
        settings.hard_band(),
        settings.soft_band()
    );
    println!(
        "  weights: regime {} volatility {} momentum {} levels {} costs {} liquidity {}",
        settings.regime_weight(),
        settings.volatility_weight(),
        settings.momentum_weight(),
        settings.levels_weight(),
        settings.costs_weight(),
        settings.liquidity_weight()
    );
    Ok(())
}
