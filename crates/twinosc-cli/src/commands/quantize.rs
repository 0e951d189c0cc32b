//! Quantizer table command.

use anyhow::bail;
use clap::{Args, ValueEnum};
use twinosc_synth::{relative_tuning, unison_detune};

/// Which quantizer to print
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Table {
    Unison,
    Relative,
}

#[derive(Args)]
pub struct QuantizeArgs {
    /// Number of evenly spaced control values, from 0 to 1 inclusive
    #[arg(long, default_value = "21")]
    steps: usize,

    /// Print only one table
    #[arg(long, value_enum)]
    only: Option<Table>,
}

pub fn run(args: QuantizeArgs) -> anyhow::Result<()> {
    if args.steps < 2 {
        bail!("need at least 2 steps, got {}", args.steps);
    }

    let inputs: Vec<f32> = (0..args.steps)
        .map(|i| i as f32 / (args.steps - 1) as f32)
        .collect();

    if args.only != Some(Table::Relative) {
        print_unison(&inputs);
    }
    if args.only.is_none() {
        println!();
    }
    if args.only != Some(Table::Unison) {
        print_relative(&inputs);
    }
    Ok(())
}

fn print_unison(inputs: &[f32]) {
    println!("Unison Detune");
    println!("=============");
    println!("  {:>8}  {:>10}", "control", "detune");
    for &v in inputs {
        match unison_detune(v) {
            Some(detune) => println!("  {v:>8.3}  {detune:>10.3}"),
            None => println!("  {v:>8.3}  {:>10}", "off"),
        }
    }
}

fn print_relative(inputs: &[f32]) {
    println!("Relative Tuning");
    println!("===============");
    println!("  {:>8}  {:>8}  {:>10}", "knob", "bipolar", "interval");
    for &knob in inputs {
        let bipolar = knob * 2.0 - 1.0;
        let interval = relative_tuning(bipolar);
        println!("  {knob:>8.3}  {bipolar:>8.3}  {interval:>+10.3}");
    }
}
