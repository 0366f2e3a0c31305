use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use steganowav_core::{commands, human_bytes, HidingParams};

use crate::CliResult;

/// Hides a payload file inside a WAV audio file, in place
#[derive(Args, Debug)]
pub struct HideArgs {
    /// WAVE/PCM audio file used as carrier, modified in place
    #[arg(short = 'w', long = "wave", value_name = "wave file", required = true)]
    pub wave: PathBuf,

    /// File containing the data to hide
    #[arg(
        short = 'p',
        long = "payload",
        value_name = "payload file",
        required = true
    )]
    pub payload: PathBuf,

    /// Bits hidden per sample: 1, 2, 4 or 8; 0 picks one by sample size
    #[arg(short = 'd', long, value_name = "density", default_value_t = 0)]
    pub density: u8,

    /// Starting sample index, this is one of your secrets
    #[arg(
        short = 'o',
        long,
        value_name = "offset",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub offset: u32,

    /// Keystream seed obfuscating the payload, 0 disables
    #[arg(short = 's', long, value_name = "seed", default_value_t = 0)]
    pub seed: u8,
}

impl HideArgs {
    pub fn run(self) -> CliResult<()> {
        let params = HidingParams {
            density: self.density,
            sample_offset: self.offset,
            seed: self.seed,
        };

        println!(
            "Hiding {:?} inside {:?} ...",
            self.payload, self.wave
        );

        let started = Instant::now();
        let report = commands::hide(&self.wave, &self.payload, &params)?;
        let elapsed = started.elapsed();

        let rate = report.sample_bytes as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        println!(
            "Read {} from {:?} and wrote {} to {:?} in {:?} ({}/s).",
            human_bytes(report.payload_bytes),
            self.payload,
            human_bytes(report.sample_bytes),
            self.wave,
            elapsed,
            human_bytes(rate as u64)
        );

        Ok(())
    }
}
