//! Offline render command.
//!
//! Drives the oscillator core with constant control readings, the way the
//! audio callback would, and reports what the core derived. No audio is
//! written anywhere.

use anyhow::{Context, bail};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use twinosc_config::{Settings, load_or_default, settings_path};
use twinosc_platform::{Calibration, ControlFrame, CvChannel, SyncTarget, TwinOscillator};
use twinosc_synth::Voice;

#[derive(Args)]
pub struct RenderArgs {
    /// Duration in seconds
    #[arg(long, default_value = "1.0")]
    duration: f32,

    /// Settings file (defaults to the user settings file, if present)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the sample rate from the settings
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Treat control values as already calibrated
    #[arg(long)]
    uncalibrated: bool,

    /// Samples per simulated audio callback
    #[arg(long, default_value = "48")]
    block_size: usize,

    /// Pitch bend CV
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pitch_bend: f32,

    /// Coarse pitch CV
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    coarse_pitch: f32,

    /// Glide time knob
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    glide_time: f32,

    /// First fine-tune CV
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    fine_tune_a: f32,

    /// Second fine-tune CV
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    fine_tune_b: f32,

    /// Shared sync amount CV
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    sync_amount: f32,

    /// First additive sync CV
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    sync_offset_a: f32,

    /// Second additive sync CV
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    sync_offset_b: f32,

    /// Voice A timbre knob
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    timbre_a: f32,

    /// Voice B timbre knob
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    timbre_b: f32,

    /// Unison CV
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    unison: f32,

    /// Relative tuning knob (0.5 is unison with voice A)
    #[arg(long, default_value = "0.5", allow_hyphen_values = true)]
    relative_tune: f32,

    /// Route sync to voice A (mode switch on)
    #[arg(long)]
    sync_to_a: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl RenderArgs {
    fn controls(&self) -> ControlFrame {
        [
            (CvChannel::PitchBend, self.pitch_bend),
            (CvChannel::CoarsePitch, self.coarse_pitch),
            (CvChannel::GlideTime, self.glide_time),
            (CvChannel::FineTuneA, self.fine_tune_a),
            (CvChannel::FineTuneB, self.fine_tune_b),
            (CvChannel::SyncAmount, self.sync_amount),
            (CvChannel::SyncOffsetA, self.sync_offset_a),
            (CvChannel::SyncOffsetB, self.sync_offset_b),
            (CvChannel::TimbreA, self.timbre_a),
            (CvChannel::TimbreB, self.timbre_b),
            (CvChannel::Unison, self.unison),
            (CvChannel::RelativeTune, self.relative_tune),
        ]
        .into_iter()
        .fold(ControlFrame::new(), |frame, (channel, value)| frame.with(channel, value))
        .with_mode_switch(self.sync_to_a)
    }
}

/// Final state and level statistics of one voice.
#[derive(Debug, Serialize)]
struct VoiceReport {
    pitch: f32,
    frequency: f32,
    secondary_frequency: f32,
    sync_frequency: f32,
    unison_enabled: bool,
    detune_semitones: f32,
    peak: f32,
    rms: f32,
}

#[derive(Debug, Serialize)]
struct RenderReport {
    settings: String,
    sample_rate: u32,
    samples: usize,
    quantized_pitch: i32,
    glide: f32,
    glide_target: f32,
    glide_settled: bool,
    interval_b: f32,
    sync_amount: f32,
    sync_target: &'static str,
    unison: f32,
    pitch_events: usize,
    voice_a: VoiceReport,
    voice_b: VoiceReport,
}

/// Running peak and RMS of one output.
#[derive(Default)]
struct Level {
    peak: f32,
    sum_squares: f64,
    count: usize,
}

impl Level {
    fn add(&mut self, block: &[f32]) {
        for &s in block {
            self.peak = self.peak.max(s.abs());
            self.sum_squares += f64::from(s) * f64::from(s);
        }
        self.count += block.len();
    }

    fn rms(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum_squares / self.count as f64).sqrt() as f32
        }
    }
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if !(args.duration > 0.0 && args.duration.is_finite()) {
        bail!("duration must be a positive number of seconds, got {}", args.duration);
    }
    if args.block_size == 0 {
        bail!("block size must be at least 1");
    }

    let (mut settings, source) = match &args.settings {
        Some(path) => {
            let settings = Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?;
            (settings, path.display().to_string())
        }
        None => {
            let path = settings_path();
            let settings = load_or_default()
                .with_context(|| format!("loading settings from {}", path.display()))?;
            let source = if path.is_file() {
                path.display().to_string()
            } else {
                "defaults".to_string()
            };
            (settings, source)
        }
    };
    if let Some(sample_rate) = args.sample_rate {
        settings.sample_rate = sample_rate;
        settings.validate()?;
    }
    tracing::info!(settings = %source, sample_rate = settings.sample_rate, "settings loaded");

    let mut core = TwinOscillator::new(settings.core_config());
    core.set_calibration(if args.uncalibrated {
        Calibration::identity()
    } else {
        settings.calibration()
    });

    let samples = (args.duration * settings.sample_rate as f32).round() as usize;
    tracing::info!(samples, block_size = args.block_size, "rendering");

    let mut controls = args.controls();
    let mut left = vec![0.0f32; args.block_size];
    let mut right = vec![0.0f32; args.block_size];
    let mut level_a = Level::default();
    let mut level_b = Level::default();
    let mut pitch_events = 0;

    let mut remaining = samples;
    while remaining > 0 {
        let n = remaining.min(args.block_size);
        core.process_block(&mut controls, &mut left[..n], &mut right[..n]);
        level_a.add(&left[..n]);
        level_b.add(&right[..n]);
        remaining -= n;

        // Indicator driver polls between callbacks
        if let Some(pitch) = core.indicator().take() {
            tracing::debug!(pitch, "pitch changed");
            pitch_events += 1;
        }
    }

    let snap = core.snapshot();
    let report = RenderReport {
        settings: source,
        sample_rate: settings.sample_rate,
        samples,
        quantized_pitch: snap.quantized_pitch,
        glide: snap.glide,
        glide_target: core.glide().target(),
        glide_settled: core.glide().is_settled(),
        interval_b: snap.interval_b,
        sync_amount: snap.sync_amount,
        sync_target: match snap.sync_target {
            SyncTarget::VoiceA => "voice_a",
            SyncTarget::VoiceB => "voice_b",
        },
        unison: snap.unison,
        pitch_events,
        voice_a: voice_report(core.voice_a(), snap.pitch_a, &level_a),
        voice_b: voice_report(core.voice_b(), snap.pitch_b, &level_b),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn voice_report(voice: &Voice, pitch: f32, level: &Level) -> VoiceReport {
    VoiceReport {
        pitch,
        frequency: voice.primary().frequency,
        secondary_frequency: voice.secondary().frequency,
        sync_frequency: voice.primary().sync_frequency,
        unison_enabled: voice.unison_enabled(),
        detune_semitones: voice.detune_semitones(),
        peak: level.peak,
        rms: level.rms(),
    }
}

fn print_report(report: &RenderReport) {
    println!("Render");
    println!("======");
    println!("  Settings:        {}", report.settings);
    println!("  Sample rate:     {} Hz", report.sample_rate);
    println!("  Samples:         {}", report.samples);
    println!("  Quantized pitch: {}", report.quantized_pitch);
    println!(
        "  Glide:           {:.3} -> {:.0}{}",
        report.glide,
        report.glide_target,
        if report.glide_settled { "" } else { " (gliding)" }
    );
    println!("  Interval B:      {:+.3} semitones", report.interval_b);
    println!("  Sync amount:     {:.3} -> {}", report.sync_amount, report.sync_target);
    println!("  Unison:          {:.3}", report.unison);
    println!("  Pitch events:    {}", report.pitch_events);
    println!();

    for (name, voice) in [("Voice A (left)", &report.voice_a), ("Voice B (right)", &report.voice_b)] {
        println!("{name}");
        println!("  Pitch:       {:.3}", voice.pitch);
        println!("  Frequency:   {:.2} Hz", voice.frequency);
        if voice.unison_enabled {
            println!(
                "  Unison:      on, {:.3} semitones ({:.2} Hz)",
                voice.detune_semitones, voice.secondary_frequency
            );
        } else {
            println!("  Unison:      off");
        }
        println!("  Sync freq:   {:.2} Hz", voice.sync_frequency);
        println!("  Peak:        {:.4}", voice.peak);
        println!("  RMS:         {:.4}", voice.rms);
        println!();
    }
}
