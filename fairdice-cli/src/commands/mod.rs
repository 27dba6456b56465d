use crate::console::{probability_table, StdioConsole};
use anyhow::{Context, Result};
use fairdice_core::{verify_disclosure, Die, GameConfig, ProbabilityMatrix};
use serde::Serialize;

#[derive(Serialize)]
struct MatrixReport<'a> {
    dice: &'a [Die],
    probabilities: &'a [Vec<f64>],
}

pub async fn play(specs: &[String]) -> Result<()> {
    let config = GameConfig::from_specs(specs)?;
    let mut game = fairdice_core::new_game(config, StdioConsole::new());

    tracing::debug!("Starting game {}", game.id());
    let summary = game.run().await?;

    tracing::debug!(
        "Game {} finished: {} rounds played",
        summary.id,
        summary.rounds.len()
    );
    Ok(())
}

pub fn show_table(specs: &[String], json: bool) -> Result<()> {
    let config = GameConfig::from_specs(specs)?;
    let matrix = ProbabilityMatrix::compute(&config.dice);

    if json {
        let report = MatrixReport {
            dice: &config.dice,
            probabilities: matrix.rows(),
        };
        let output =
            serde_json::to_string_pretty(&report).context("Failed to encode probability table")?;
        println!("{}", output);
        return Ok(());
    }

    println!("Probability that the row die beats the column die:");
    println!("{}", probability_table(&config.dice, &matrix));
    for (index, die) in config.dice.iter().enumerate() {
        println!("  #{} = {}", index, die);
    }

    let undominated = matrix.undominated();
    if undominated.is_empty() {
        println!("No die dominates: every die loses to some other die.");
    } else {
        let labels: Vec<String> = undominated.iter().map(|i| format!("#{}", i)).collect();
        println!("Never beaten at better than even odds: {}", labels.join(", "));
    }

    Ok(())
}

pub fn verify(key_hex: &str, value: u64, digest_hex: &str) -> Result<()> {
    let matches = verify_disclosure(key_hex, value, digest_hex)?;

    if !matches {
        anyhow::bail!(
            "HMAC mismatch: value {} with this key does not produce {}",
            value,
            digest_hex
        );
    }

    println!("HMAC verified: {} was committed before your move.", value);
    Ok(())
}
